//! Shared CLI types: exit codes, errors and option loading.

use std::fmt;
use std::path::Path;

use mosaic_actions::host::HeadlessHost;
use mosaic_actions::{Editor, EditorOptions};
use serde::Serialize;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded.
    Success = 0,
    /// Input was read but failed validation.
    ValidationError = 1,
    /// Input could not be read or parsed.
    IoError = 2,
}

/// Error returned by a CLI command.
#[derive(Debug, Clone)]
pub struct CliError {
    /// Exit code the process ends with.
    pub code: ExitCode,
    /// Message printed to stderr.
    pub message: String,
}

impl CliError {
    /// An I/O or parse failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::IoError,
            message: message.into(),
        }
    }

    /// A validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::ValidationError,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result alias for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Loads an options file, reporting failures as I/O errors.
pub fn load_options(path: &Path) -> CliResult<EditorOptions> {
    EditorOptions::load_from(path).map_err(|e| CliError::io(format!("{e:#}")))
}

/// Loads options from a file, or the default options file, or built-in defaults.
pub fn load_options_or_default(path: Option<&Path>) -> CliResult<EditorOptions> {
    match path {
        Some(path) => load_options(path),
        None => EditorOptions::load().map_err(|e| CliError::io(format!("{e:#}"))),
    }
}

/// An initialized editor on a recording host.
pub fn headless_editor(options: EditorOptions) -> Editor<HeadlessHost> {
    let mut editor = Editor::new(HeadlessHost::new(), options);
    editor.init_actions();
    editor
}

/// Prints a value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}
