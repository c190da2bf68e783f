//! Shared test fixtures for integration and CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use mosaic_actions::config::EditorOptions;
use mosaic_actions::host::HeadlessHost;
use mosaic_actions::models::{BlockTypeConfig, FormatAction, FormatGroup, TileGroup, TileStrategy};
use mosaic_actions::Editor;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Base address used by every fixture.
pub const CONTEXT_URL: &str = "http://localhost/plone/page";

/// Add form whose required image field is still empty.
pub const FORM_WITH_EMPTY_REQUIRED: &str = r#"<html><body>
<form id="add_tile" method="post" action="http://localhost/plone/page/@@add-tile/plone.app.standardtiles.image">
  <input type="hidden" name="_authenticator" value="abc123"/>
  <div class="field error" data-fieldname="image">
    <label for="image">Image <span class="required horizontal" title="Required">&nbsp;</span></label>
    <div class="fieldErrorBox">Required input is missing.</div>
    <input type="file" id="image" name="image"/>
    <input type="text" name="image.url" value=""/>
  </div>
  <div class="formControls">
    <button type="submit" name="buttons.save">Save</button>
    <input type="submit" name="buttons.cancel" value="Cancel"/>
  </div>
</form>
</body></html>"#;

/// Add form that can be submitted without user input.
pub const FORM_COMPLETE: &str = r#"<html><body>
<form id="add_tile" method="post" action="http://localhost/plone/page/@@add-tile/plone.app.standardtiles.navigation">
  <input type="hidden" name="_authenticator" value="abc123"/>
  <div class="field" data-fieldname="title">
    <label>Title <span class="required" title="Required"></span></label>
    <input type="text" name="title" value="Navigation"/>
  </div>
  <div class="field" data-fieldname="depth">
    <label>Depth</label>
    <select name="depth"><option value="1">1</option><option value="3" selected>3</option></select>
  </div>
  <div class="field">
    <label><input type="checkbox" name="show_root" checked/> Show root</label>
  </div>
</form>
</body></html>"#;

/// Options with every strategy and both format scopes.
pub fn sample_options() -> EditorOptions {
    let mut options = EditorOptions::new(CONTEXT_URL);
    options.available_layouts = vec!["default/document.html".to_string()];
    options.can_change_layout = true;
    options.formats = vec![
        FormatGroup {
            name: "tile".to_string(),
            label: Some("Tile".to_string()),
            actions: vec![
                FormatAction::new("highlight", "tile").with_action("tile-toggle-class"),
                FormatAction::new("drop-shadow", "tile").with_action("tile-toggle-class"),
            ],
        },
        FormatGroup {
            name: "row".to_string(),
            label: Some("Row".to_string()),
            actions: vec![FormatAction::new("wide-row", "row").with_action("row-toggle-class")],
        },
    ];
    options.tiles = vec![
        TileGroup {
            name: "text".to_string(),
            label: Some("Text".to_string()),
            tiles: vec![
                BlockTypeConfig::new("text", "tile", TileStrategy::Static)
                    .with_default_value("<p>x</p>"),
                BlockTypeConfig::new("plone.app.standardtiles.rawhtml", "tile", TileStrategy::TemplatedApp)
                    .with_default_value("<p>raw</p>"),
            ],
        },
        TileGroup {
            name: "media".to_string(),
            label: Some("Media".to_string()),
            tiles: vec![
                BlockTypeConfig::new("plone.app.standardtiles.image", "tile", TileStrategy::FormApp),
                BlockTypeConfig::new("plone.app.standardtiles.navigation", "tile", TileStrategy::FormApp),
            ],
        },
    ];
    options
}

/// An initialized editor on a recording host with [`sample_options`].
pub fn sample_editor() -> Editor<HeadlessHost> {
    editor_with(HeadlessHost::new(), sample_options())
}

/// An initialized editor on the given host and options.
pub fn editor_with(host: HeadlessHost, options: EditorOptions) -> Editor<HeadlessHost> {
    let mut editor = Editor::new(host, options);
    editor.init_actions();
    editor
}

/// Writes options to a temporary TOML file.
///
/// Returns the path and the TempDir, which must be kept alive.
pub fn create_temp_options_file(options: &EditorOptions) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("options.toml");
    options.save_to(&path).expect("Failed to write options file");
    (path, temp_dir)
}

/// Writes raw content to a temporary file with the given name.
pub fn create_temp_file(name: &str, content: &str) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(name);
    fs::write(&path, content).expect("Failed to write file");
    (path, temp_dir)
}
