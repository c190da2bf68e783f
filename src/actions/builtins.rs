//! Built-in editor actions.
//!
//! Registered by [`Editor::init_actions`](crate::editor::Editor::init_actions).
//! Each handler is a single guarded effect on the host; the only exceptions are
//! `save`, which defers its work to the operation queue, and the menu-driven
//! `format` and `insert` relays.

use std::time::Duration;

use tracing::debug;

use super::{ActionOptions, ActionRegistry};
use crate::editor::Editor;
use crate::host::{FormButton, Host, ModalContent};
use crate::models::Scope;
use crate::shortcuts::Chord;
use crate::source::SourceControl;

/// Names of the built-in actions.
pub mod names {
    /// Toggle a format class on the selected tile.
    pub const TILE_TOGGLE_CLASS: &str = "tile-toggle-class";
    /// Strip every tile-scope format class from the selected tile.
    pub const TILE_REMOVE_FORMAT: &str = "tile-remove-format";
    /// Toggle a format class on the selected tile's row.
    pub const ROW_TOGGLE_CLASS: &str = "row-toggle-class";
    /// Strip every row-scope format class from the selected tile's row.
    pub const ROW_REMOVE_FORMAT: &str = "row-remove-format";
    /// Full-width alignment.
    pub const TILE_ALIGN_BLOCK: &str = "tile-align-block";
    /// Left alignment.
    pub const TILE_ALIGN_LEFT: &str = "tile-align-left";
    /// Right alignment.
    pub const TILE_ALIGN_RIGHT: &str = "tile-align-right";
    /// Save the document.
    pub const SAVE: &str = "save";
    /// Cancel editing.
    pub const CANCEL: &str = "cancel";
    /// Preview the layout in a new window.
    pub const PREVIEW: &str = "preview";
    /// Edit the selected tile as raw HTML.
    pub const HTML: &str = "html";
    /// Open the page properties.
    pub const PROPERTIES: &str = "properties";
    /// Toggle the layout drop-down.
    pub const LAYOUT: &str = "layout";
    /// Start customizing the layout.
    pub const CUSTOMIZE_LAYOUT: &str = "customizelayout";
    /// Switch to another layout.
    pub const CHANGE_LAYOUT: &str = "changelayout";
    /// Save the layout for reuse.
    pub const SAVE_LAYOUT: &str = "savelayout";
    /// Open the server's add-tile dialog.
    pub const ADD_TILE: &str = "add-tile";
    /// Format menu relay.
    pub const FORMAT: &str = "format";
    /// Insert menu entry point.
    pub const INSERT: &str = "insert";
}

/// Class marking a left-aligned tile.
pub const ALIGN_LEFT_CLASS: &str = "mosaic-tile-align-left";

/// Class marking a right-aligned tile.
pub const ALIGN_RIGHT_CLASS: &str = "mosaic-tile-align-right";

/// Delay before the preview window opens, so the layout field can sync.
pub const PREVIEW_DELAY: Duration = Duration::from_millis(1000);

/// Prompt shown before replacing a custom layout.
pub const CHANGE_LAYOUT_PROMPT: &str = "Changing your layout will destroy all existing custom layout \
settings you have in place. Are you sure you want to continue?";

type Registry<H> = ActionRegistry<Editor<H>>;

/// Registers every built-in action.
pub fn register<H: Host + 'static>(registry: &mut Registry<H>) {
    register_format_actions(registry);
    register_alignment_actions(registry);
    register_document_actions(registry);
    register_layout_actions(registry);
    register_menu_actions(registry);
}

fn register_format_actions<H: Host + 'static>(registry: &mut Registry<H>) {
    registry.register(
        names::TILE_TOGGLE_CLASS,
        ActionOptions::new().exec(|editor: &mut Editor<H>, source| {
            toggle_format(editor, Scope::Element, source);
            None
        }),
    );

    registry.register(
        names::TILE_REMOVE_FORMAT,
        ActionOptions::new().exec(|editor: &mut Editor<H>, _| {
            remove_formats(editor, Scope::Element);
            None
        }),
    );

    registry.register(
        names::ROW_TOGGLE_CLASS,
        ActionOptions::new().exec(|editor: &mut Editor<H>, source| {
            toggle_format(editor, Scope::Row, source);
            None
        }),
    );

    registry.register(
        names::ROW_REMOVE_FORMAT,
        ActionOptions::new().exec(|editor: &mut Editor<H>, _| {
            remove_formats(editor, Scope::Row);
            None
        }),
    );
}

fn register_alignment_actions<H: Host + 'static>(registry: &mut Registry<H>) {
    registry.register(
        names::TILE_ALIGN_BLOCK,
        ActionOptions::new()
            .exec(|editor: &mut Editor<H>, _| {
                if !tile_selected(editor, names::TILE_ALIGN_BLOCK) {
                    return None;
                }
                editor.host.remove_class(Scope::Element, ALIGN_RIGHT_CLASS);
                editor.host.remove_class(Scope::Element, ALIGN_LEFT_CLASS);
                None
            })
            .shortcut(Chord::ctrl_shift("b")),
    );

    registry.register(
        names::TILE_ALIGN_LEFT,
        ActionOptions::new()
            .exec(|editor: &mut Editor<H>, _| {
                if !tile_selected(editor, names::TILE_ALIGN_LEFT) {
                    return None;
                }
                editor.host.remove_class(Scope::Element, ALIGN_RIGHT_CLASS);
                editor.host.add_class(Scope::Element, ALIGN_LEFT_CLASS);
                None
            })
            .shortcut(Chord::ctrl_shift("l")),
    );

    registry.register(
        names::TILE_ALIGN_RIGHT,
        ActionOptions::new()
            .exec(|editor: &mut Editor<H>, _| {
                if !tile_selected(editor, names::TILE_ALIGN_RIGHT) {
                    return None;
                }
                editor.host.remove_class(Scope::Element, ALIGN_LEFT_CLASS);
                editor.host.add_class(Scope::Element, ALIGN_RIGHT_CLASS);
                None
            })
            .shortcut(Chord::ctrl_shift("r")),
    );
}

fn register_document_actions<H: Host + 'static>(registry: &mut Registry<H>) {
    registry.register(
        names::SAVE,
        ActionOptions::new()
            .exec(|editor: &mut Editor<H>, _| {
                editor.set_saving(true);
                editor.blur_selected_tile();
                editor.enqueue(|editor| {
                    editor.host.save_layout_to_form();
                    editor.host.click_form_button(FormButton::Save);
                    editor.set_saving(false);
                });
                None
            })
            .shortcut(Chord::ctrl("s")),
    );

    registry.register(
        names::CANCEL,
        ActionOptions::new().exec(|editor: &mut Editor<H>, _| {
            editor.host.click_form_button(FormButton::Cancel);
            None
        }),
    );

    registry.register(
        names::PREVIEW,
        ActionOptions::new().exec(|editor: &mut Editor<H>, _| {
            editor.host.sync_layout_field();
            let url = format!("{}/@@layout_preview", editor.options.context_url);
            editor.host.open_window_after(&url, PREVIEW_DELAY);
            None
        }),
    );

    registry.register(
        names::HTML,
        ActionOptions::new().exec(|editor: &mut Editor<H>, _| {
            if tile_selected(editor, names::HTML) {
                editor.host.edit_selected_as_html();
            }
            None
        }),
    );

    registry.register(
        names::PROPERTIES,
        ActionOptions::new().exec(|editor: &mut Editor<H>, _| {
            editor.host.open_properties();
            None
        }),
    );
}

fn register_layout_actions<H: Host + 'static>(registry: &mut Registry<H>) {
    registry.register(
        names::LAYOUT,
        ActionOptions::new().exec(|editor: &mut Editor<H>, _| {
            editor.host.toggle_layout_menu();
            None
        }),
    );

    registry.register(
        names::CUSTOMIZE_LAYOUT,
        ActionOptions::new()
            .exec(|editor: &mut Editor<H>, _| {
                // Empty falls back to the stored layout
                editor.host.set_selected_content_layout("");
                editor.host.show_layout_editing();
                editor.host.make_tiles_movable();
                editor.host.close_layout_menu();
                None
            })
            .visible(|editor: &Editor<H>| editor.options.can_change_layout),
    );

    registry.register(
        names::CHANGE_LAYOUT,
        ActionOptions::new()
            .exec(|editor: &mut Editor<H>, _| {
                let proceed =
                    editor.host.has_content_layout() || editor.host.confirm(CHANGE_LAYOUT_PROMPT);
                if proceed {
                    editor.host.select_layout();
                } else {
                    debug!("Layout change declined");
                }
                editor.host.close_layout_menu();
                None
            })
            .visible(|editor: &Editor<H>| !editor.options.available_layouts.is_empty()),
    );

    registry.register(
        names::SAVE_LAYOUT,
        ActionOptions::new().exec(|editor: &mut Editor<H>, _| {
            editor.host.save_layout();
            editor.host.close_layout_menu();
            None
        }),
    );
}

fn register_menu_actions<H: Host + 'static>(registry: &mut Registry<H>) {
    registry.register(
        names::ADD_TILE,
        ActionOptions::new().exec(|editor: &mut Editor<H>, _| {
            let url = format!(
                "{}/@@add-tile?form.button.Create=Create",
                editor.options.context_url
            );
            editor.open_modal(ModalContent::Remote(url));
            None
        }),
    );

    registry.register(
        names::FORMAT,
        ActionOptions::new().exec(|editor: &mut Editor<H>, source| {
            let source = source?;
            if let Some(value) = source.value().map(str::to_string) {
                relay_format(editor, &value);
            }
            source.reset();
            None
        }),
    );

    registry.register(
        names::INSERT,
        ActionOptions::new().exec(|editor: &mut Editor<H>, source| {
            // Failures are logged and surfaced by the workflow itself
            Some(editor.insert(source).unwrap_or(false))
        }),
    );
}

/// Runs the action a format menu value names.
///
/// A value that is not an action name but a format entry with an attached
/// action runs that action with the entry's name as its source.
fn relay_format<H: Host + 'static>(editor: &mut Editor<H>, value: &str) {
    if editor.registry.contains(value) {
        editor.exec_action(value, None);
        return;
    }

    let attached = editor
        .options
        .format_actions()
        .find(|format| format.name == value)
        .and_then(|format| format.action.clone());

    match attached {
        Some(action) => {
            let mut name = value;
            editor.exec_action(&action, Some(&mut name));
        }
        None => {
            // Logs the unknown name
            editor.exec_action(value, None);
        }
    }
}

/// Tile-scoped actions are no-ops while no tile is selected.
fn tile_selected<H: Host + 'static>(editor: &Editor<H>, action: &str) -> bool {
    let selected = editor.host.has_selection();
    if !selected {
        debug!("No tile selected, skipping '{}'", action);
    }
    selected
}

fn toggle_format<H: Host + 'static>(
    editor: &mut Editor<H>,
    scope: Scope,
    source: Option<&mut dyn SourceControl>,
) {
    let Some(name) = source.and_then(|source| source.value().map(str::to_string)) else {
        return;
    };
    if !tile_selected(editor, "toggle-class") {
        return;
    }
    let class = editor.prefixed_class_name(&name);
    editor.host.toggle_class(scope, &class);
}

fn remove_formats<H: Host + 'static>(editor: &mut Editor<H>, scope: Scope) {
    if !tile_selected(editor, "remove-format") {
        return;
    }
    let formats: Vec<String> = editor
        .options
        .format_actions_in(scope)
        .map(|format| format.name.clone())
        .collect();

    for name in formats {
        let class = editor.prefixed_class_name(&name);
        editor.host.remove_class(scope, &class);
        if scope == Scope::Row {
            // Rows may also carry the bare name
            editor.host.remove_class(scope, &name);
        }
    }
}
