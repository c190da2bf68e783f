//! Registry and keyboard dispatch tests against the public editor API.

mod fixtures;
use fixtures::*;

use mosaic_actions::actions::builtins::{names, ALIGN_LEFT_CLASS, ALIGN_RIGHT_CLASS};
use mosaic_actions::host::{HeadlessHost, HostCall};
use mosaic_actions::models::Scope;
use mosaic_actions::{
    prefixed_class_name, ActionOptions, Chord, Editor, EditorOptions, KeyPress, MenuSelection,
    Propagation,
};

fn ctrl_shift(c: char) -> KeyPress {
    KeyPress::char(c).with_ctrl().with_shift()
}

#[test]
fn test_prefixed_class_name_conventions() {
    assert_eq!(prefixed_class_name("mosaic", "align-right"), "mosaic-align-right");
    assert_eq!(prefixed_class_name("mosaic", "properties"), "mosaicProperties");

    let editor = sample_editor();
    assert_eq!(editor.prefixed_class_name("align-right"), "mosaic-align-right");
}

#[test]
fn test_builtin_shortcut_codes_are_upper_case() {
    let editor = sample_editor();
    for binding in editor.shortcuts().bindings() {
        let action = editor
            .actions()
            .find(|action| action.name() == binding.action)
            .expect("binding points at a registered action");
        let first = action.shortcut().key.chars().next().expect("non-empty key");
        assert_eq!(binding.char_code, u32::from(first.to_ascii_uppercase()));
    }
}

#[test]
fn test_each_chord_matches_exactly_one_action() {
    let editor = sample_editor();
    let table = editor.shortcuts();

    let cases = [
        (ctrl_shift('B'), names::TILE_ALIGN_BLOCK),
        (ctrl_shift('L'), names::TILE_ALIGN_LEFT),
        (ctrl_shift('R'), names::TILE_ALIGN_RIGHT),
        (KeyPress::char('S').with_ctrl(), names::SAVE),
    ];

    for (press, expected) in cases {
        let matching: Vec<&str> = table
            .bindings()
            .iter()
            .filter(|binding| binding.matches(&press, table.platform_meta()))
            .map(|binding| binding.action.as_str())
            .collect();
        assert_eq!(matching, vec![expected], "press {:?}", press);
    }

    assert!(table.find(&KeyPress::char('B')).is_none());
}

#[test]
fn test_lower_case_key_matches() {
    let mut editor = sample_editor();
    assert_eq!(editor.handle_keypress(&ctrl_shift('l')), Propagation::Stop);
    assert!(editor.host().classes(Scope::Element).contains(ALIGN_LEFT_CLASS));
}

#[test]
fn test_shift_must_match_exactly() {
    let mut editor = sample_editor();
    // ctrl+shift+s is not save
    assert_eq!(editor.handle_keypress(&ctrl_shift('s')), Propagation::Continue);
    assert_eq!(editor.queued(), 0);
}

#[test]
fn test_unknown_alt_state_matches() {
    let mut editor = sample_editor();
    let press = KeyPress::char('r').with_ctrl().with_shift().with_unknown_alt();
    assert!(editor.handle_keypress(&press).is_handled());
    assert!(editor.host().classes(Scope::Element).contains(ALIGN_RIGHT_CLASS));
}

#[test]
fn test_alt_pressed_does_not_match() {
    let mut editor = sample_editor();
    let press = KeyPress::char('s').with_ctrl().with_alt();
    assert_eq!(editor.handle_keypress(&press), Propagation::Continue);
}

#[test]
fn test_meta_stands_in_for_ctrl_on_meta_platforms() {
    let mut options = sample_options();
    options.platform_meta = true;
    let mut editor = editor_with(HeadlessHost::new(), options);
    assert!(editor.handle_keypress(&KeyPress::char('s').with_meta()).is_handled());
    assert!(editor.is_saving());

    let mut editor = sample_editor();
    assert!(!editor.handle_keypress(&KeyPress::char('s').with_meta()).is_handled());
}

#[test]
fn test_first_registered_binding_wins() {
    let mut editor = sample_editor();
    editor.register_action(
        "late-save",
        ActionOptions::new()
            .exec(|editor: &mut Editor<HeadlessHost>, _| {
                editor.host_mut().clear_calls();
                Some(true)
            })
            .shortcut(Chord::ctrl("s")),
    );

    assert_eq!(editor.shortcuts().collisions().len(), 1);
    editor.handle_keypress(&KeyPress::char('s').with_ctrl());
    // The built-in save ran, not the later binding
    assert_eq!(editor.queued(), 1);
}

#[test]
fn test_reregistered_name_keeps_both_bindings() {
    let mut editor = sample_editor();
    let before = editor.shortcuts().len();

    editor.register_action(
        names::TILE_ALIGN_LEFT,
        ActionOptions::new()
            .exec(|editor: &mut Editor<HeadlessHost>, _| {
                editor.host_mut().clear_calls();
                None
            })
            .shortcut(Chord::ctrl_shift("k")),
    );

    let bindings = editor.shortcuts().bindings();
    assert_eq!(bindings.len(), before + 1);
    let left: Vec<String> = bindings
        .iter()
        .filter(|binding| binding.action == names::TILE_ALIGN_LEFT)
        .map(|binding| binding.display())
        .collect();
    assert_eq!(left, vec!["Ctrl+Shift+L", "Ctrl+Shift+K"]);

    // Both chords now reach the replacement handler
    editor.handle_keypress(&ctrl_shift('L'));
    assert!(editor.host().classes(Scope::Element).is_empty());
    assert_eq!(editor.actions().filter(|a| a.name() == names::TILE_ALIGN_LEFT).count(), 1);
}

#[test]
fn test_exec_unknown_action_has_no_effect() {
    let mut editor = sample_editor();
    assert_eq!(editor.exec_action("nonexistent", None), None);
    assert!(editor.host().calls().is_empty());
    assert!(editor.host().committed().is_empty());
}

#[test]
fn test_format_menu_drives_toggle_actions() {
    let mut editor = sample_editor();
    let mut menu = MenuSelection::new("wide-row");

    editor.exec_action(names::FORMAT, Some(&mut menu));
    assert!(editor.host().classes(Scope::Row).contains("mosaic-wide-row"));
    assert!(menu.is_none());

    menu.select("wide-row");
    editor.exec_action(names::FORMAT, Some(&mut menu));
    assert!(editor.host().classes(Scope::Row).is_empty());
    assert_eq!(menu.reset_count(), 2);
}

#[test]
fn test_save_flow_through_queue() {
    let mut editor = sample_editor();
    editor.exec_action(names::SAVE, None);

    assert_eq!(
        editor.host().calls(),
        &[HostCall::BlurSelected, HostCall::RefreshActions]
    );
    assert_eq!(editor.run_queued(), 1);
    assert!(!editor.is_saving());
    assert_eq!(editor.host().calls().len(), 4);
}

#[test]
fn test_registry_is_per_editor() {
    let mut first = sample_editor();
    first.register_action("only-here", ActionOptions::new());

    let second = editor_with(HeadlessHost::new(), EditorOptions::default());
    assert!(first.actions().any(|action| action.name() == "only-here"));
    assert!(!second.actions().any(|action| action.name() == "only-here"));
}
