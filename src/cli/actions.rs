//! Registered action listing.

use crate::cli::common::{headless_editor, load_options, print_json, CliResult};
use clap::Args;
use mosaic_actions::ShortcutBinding;
use serde::Serialize;
use std::path::PathBuf;

/// List registered actions and their visibility
#[derive(Debug, Clone, Args)]
pub struct ActionsArgs {
    /// Options file (TOML or JSON)
    #[arg(short, long, value_name = "FILE")]
    pub options: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize, Debug)]
struct ActionEntry {
    name: String,
    visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    shortcut: Option<String>,
}

impl ActionsArgs {
    /// Execute the actions command
    pub fn execute(&self) -> CliResult<()> {
        let options = load_options(&self.options)?;
        let editor = headless_editor(options);

        let entries: Vec<ActionEntry> = editor
            .actions()
            .map(|action| ActionEntry {
                name: action.name().to_string(),
                visible: editor.is_visible(action.name()),
                shortcut: ShortcutBinding::from_chord(action.shortcut(), action.name())
                    .map(|binding| binding.display()),
            })
            .collect();

        if self.json {
            print_json(&entries)?;
        } else {
            for entry in &entries {
                let marker = if entry.visible { "✓" } else { "-" };
                match &entry.shortcut {
                    Some(shortcut) => println!("{} {:<18} {}", marker, entry.name, shortcut),
                    None => println!("{} {}", marker, entry.name),
                }
            }
        }

        Ok(())
    }
}
