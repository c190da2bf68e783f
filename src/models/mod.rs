//! Data models for block-type and format catalogs.
//!
//! Models are plain serde types with no knowledge of the host page.

pub mod catalog;

// Re-export all model types
pub use catalog::{
    find_block_type, BlockTypeConfig, FormatAction, FormatGroup, Scope, TileGroup, TileStrategy,
};
