//! End-to-end tests for `mosaic-actions insert`.

use std::process::Command;

mod fixtures;
use fixtures::*;

/// Path to the mosaic-actions binary
fn mosaic_bin() -> &'static str {
    env!("CARGO_BIN_EXE_mosaic-actions")
}

fn run_insert(tile: &str) -> (Option<i32>, serde_json::Value) {
    let (options_path, _temp_dir) = create_temp_options_file(&sample_options());

    let output = Command::new(mosaic_bin())
        .args([
            "insert",
            "--options",
            options_path.to_str().unwrap(),
            tile,
            "--json",
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let value = serde_json::from_str(&stdout).unwrap_or(serde_json::Value::Null);
    (output.status.code(), value)
}

#[test]
fn test_insert_static_tile() {
    let (code, result) = run_insert("text");

    assert_eq!(code, Some(0));
    assert_eq!(result["proceeded"], true);
    let committed = result["committed"].as_array().unwrap();
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0]["content"], "<p>x</p>");
    assert!(result["pending"].as_array().unwrap().is_empty());
}

#[test]
fn test_insert_templated_tile() {
    let (code, result) = run_insert("plone.app.standardtiles.rawhtml");

    assert_eq!(code, Some(0));
    let url = result["committed"][0]["url"].as_str().unwrap();
    assert!(url.starts_with("http://localhost/plone/page/@@plone.app.standardtiles.rawhtml/"));
}

#[test]
fn test_insert_form_tile_stays_pending() {
    let (code, result) = run_insert("plone.app.standardtiles.image");

    assert_eq!(code, Some(0));
    assert!(result["committed"].as_array().unwrap().is_empty());
    let pending = result["pending"].as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["state"], "awaiting_form_fetch");

    let calls: Vec<&str> = result["calls"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c.as_str())
        .collect();
    assert!(calls.iter().any(|c| c.contains(
        "@@add-tile?tiletype=plone.app.standardtiles.image&form.button.Create=Create"
    )));
}

#[test]
fn test_insert_none_does_not_proceed() {
    let (code, result) = run_insert("none");

    assert_eq!(code, Some(0));
    assert_eq!(result["proceeded"], false);
    assert!(result["calls"].as_array().unwrap().is_empty());
}

#[test]
fn test_insert_unknown_tile_fails() {
    let (code, _) = run_insert("plone.app.unknown");
    assert_eq!(code, Some(1), "Unresolved block type should exit with code 1");
}
