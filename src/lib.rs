//! Mosaic Actions Library
//!
//! Action registry, keyboard shortcut dispatch and the tile insertion workflow
//! of a visual layout editor. The editor drives its host page through the
//! capability traits in [`host`]; [`host::HeadlessHost`] records those calls
//! for scripting and tests.

// Module declarations
pub mod actions;
pub mod config;
pub mod editor;
pub mod error;
pub mod host;
pub mod models;
pub mod queue;
pub mod shortcuts;
pub mod source;
pub mod workflow;

pub use actions::{prefixed_class_name, ActionDefinition, ActionOptions, ActionRegistry};
pub use config::EditorOptions;
pub use editor::{Editor, Propagation};
pub use error::{ActionError, ErrorSeverity};
pub use host::{HeadlessHost, Host, HttpResponse, RequestId};
pub use shortcuts::{Chord, KeyPress, ShortcutBinding, ShortcutTable};
pub use source::{MenuSelection, SourceControl};
pub use workflow::{InsertionRequest, InsertionState};
