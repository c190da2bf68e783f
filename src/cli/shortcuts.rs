//! Shortcut table listing.

use crate::cli::common::{headless_editor, load_options_or_default, print_json, CliError, CliResult};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// List the shortcut table in registration order
#[derive(Debug, Clone, Args)]
pub struct ShortcutsArgs {
    /// Options file (TOML or JSON); defaults to the user options file
    #[arg(short, long, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize, Debug)]
struct ShortcutsOutput {
    shortcuts: Vec<ShortcutEntry>,
    collisions: Vec<CollisionEntry>,
}

#[derive(Serialize, Debug)]
struct ShortcutEntry {
    chord: String,
    action: String,
    ctrl: bool,
    alt: bool,
    shift: bool,
    char_code: u32,
}

#[derive(Serialize, Debug)]
struct CollisionEntry {
    chord: String,
    actions: [String; 2],
}

impl ShortcutsArgs {
    /// Execute the shortcuts command
    pub fn execute(&self) -> CliResult<()> {
        let options = load_options_or_default(self.options.as_deref())?;
        let editor = headless_editor(options);
        let table = editor.shortcuts();

        let shortcuts: Vec<ShortcutEntry> = table
            .bindings()
            .iter()
            .map(|binding| ShortcutEntry {
                chord: binding.display(),
                action: binding.action.clone(),
                ctrl: binding.ctrl,
                alt: binding.alt,
                shift: binding.shift,
                char_code: binding.char_code,
            })
            .collect();

        let collisions: Vec<CollisionEntry> = table
            .collisions()
            .into_iter()
            .map(|(first, second)| CollisionEntry {
                chord: shortcuts[first].chord.clone(),
                actions: [
                    shortcuts[first].action.clone(),
                    shortcuts[second].action.clone(),
                ],
            })
            .collect();

        let output = ShortcutsOutput {
            shortcuts,
            collisions,
        };

        if self.json {
            print_json(&output)?;
        } else {
            for entry in &output.shortcuts {
                println!("{:<18} {}", entry.chord, entry.action);
            }
            for collision in &output.collisions {
                println!(
                    "✗ {} is bound to both '{}' and '{}'",
                    collision.chord, collision.actions[0], collision.actions[1]
                );
            }
        }

        if !output.collisions.is_empty() {
            return Err(CliError::validation(format!(
                "{} shortcut collision(s) found",
                output.collisions.len()
            )));
        }

        Ok(())
    }
}
