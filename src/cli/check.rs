//! Options file validation.

use crate::cli::common::{load_options, print_json, CliError, CliResult};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Validate an options file
#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Options file (TOML or JSON)
    #[arg(short, long, value_name = "FILE")]
    pub options: PathBuf,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize, Debug)]
struct CheckResponse {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    block_types: usize,
    format_actions: usize,
    layouts: usize,
}

impl CheckArgs {
    /// Execute the check command
    pub fn execute(&self) -> CliResult<()> {
        let options = load_options(&self.options)?;
        let result = options.validate();

        let response = CheckResponse {
            valid: result.is_ok(),
            error: result.as_ref().err().map(ToString::to_string),
            block_types: options.block_types().count(),
            format_actions: options.format_actions().count(),
            layouts: options.available_layouts.len(),
        };

        if self.json {
            print_json(&response)?;
        } else {
            if response.valid {
                println!("✓ Options are valid");
            } else {
                println!("✗ Options are invalid");
            }
            println!("  Block types:    {}", response.block_types);
            println!("  Format actions: {}", response.format_actions);
            println!("  Layouts:        {}", response.layouts);
            if let Some(error) = &response.error {
                println!("\n  ✗ {}", error);
            }
        }

        match result {
            Ok(()) => Ok(()),
            Err(e) => Err(CliError::validation(e.to_string())),
        }
    }
}
