//! Dry-run insertion against the headless host.

use crate::cli::common::{headless_editor, load_options, print_json, CliError, CliResult};
use clap::Args;
use mosaic_actions::{ActionError, MenuSelection};
use serde::Serialize;
use std::path::PathBuf;

/// Insert a tile into a headless document and show what the host was asked to do
#[derive(Debug, Clone, Args)]
pub struct InsertArgs {
    /// Options file (TOML or JSON)
    #[arg(short, long, value_name = "FILE")]
    pub options: PathBuf,

    /// Block type name as picked from the insert menu
    #[arg(value_name = "TILE")]
    pub tile: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize, Debug)]
struct InsertOutput {
    tile: String,
    proceeded: bool,
    committed: Vec<CommittedEntry>,
    pending: Vec<PendingEntry>,
    calls: Vec<String>,
}

#[derive(Serialize, Debug)]
struct CommittedEntry {
    tile_type: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

#[derive(Serialize, Debug)]
struct PendingEntry {
    id: String,
    state: String,
}

impl InsertArgs {
    /// Execute the insert command
    pub fn execute(&self) -> CliResult<()> {
        let options = load_options(&self.options)?;
        let mut editor = headless_editor(options);

        let mut menu = MenuSelection::new(self.tile.as_str());
        let proceeded = editor.insert(Some(&mut menu)).map_err(|e| match e {
            ActionError::UnresolvedBlockType(_) => CliError::validation(e.to_string()),
            other => CliError::io(other.to_string()),
        })?;

        let output = InsertOutput {
            tile: self.tile.clone(),
            proceeded,
            committed: editor
                .host()
                .committed()
                .iter()
                .map(|tile| CommittedEntry {
                    tile_type: tile.tile_type.clone(),
                    content: tile.content.clone(),
                    url: tile.url.clone(),
                })
                .collect(),
            pending: editor
                .pending_insertions()
                .map(|request| PendingEntry {
                    id: request.id().to_string(),
                    state: request.state().to_string(),
                })
                .collect(),
            calls: editor
                .host()
                .calls()
                .iter()
                .map(|call| format!("{call:?}"))
                .collect(),
        };

        if self.json {
            return print_json(&output);
        }

        if !output.proceeded {
            println!("Nothing to insert");
            return Ok(());
        }

        println!("Host calls:");
        for call in &output.calls {
            println!("  {}", call);
        }
        for tile in &output.committed {
            match &tile.url {
                Some(url) => println!("✓ Committed '{}' at {}", tile.tile_type, url),
                None => println!("✓ Committed '{}'", tile.tile_type),
            }
        }
        for request in &output.pending {
            println!("… Insertion {} is {}", request.id, request.state);
        }

        Ok(())
    }
}
