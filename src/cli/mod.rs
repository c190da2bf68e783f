//! CLI command handlers.
//!
//! Headless access to the action registry and insertion workflow for
//! scripting, catalog checks and CI.

pub mod actions;
pub mod check;
pub mod common;
pub mod insert;
pub mod shortcuts;

// Re-export types used by main.rs
pub use actions::ActionsArgs;
pub use check::CheckArgs;
pub use common::ExitCode;
pub use insert::InsertArgs;
pub use shortcuts::ShortcutsArgs;
