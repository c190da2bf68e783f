//! Editor options: catalogs, layout choices and base addresses.
//!
//! Options are normally handed over by the host page as JSON. For headless use
//! they can also be loaded from a TOML or JSON file, with the default file
//! living in the platform-specific configuration directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ActionError;
use crate::models::{find_block_type, BlockTypeConfig, FormatAction, FormatGroup, Scope, TileGroup};

/// Default class-name prefix.
pub const DEFAULT_PREFIX: &str = "mosaic";

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

/// Options an editor instance is created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorOptions {
    /// Prefix for generated class names (e.g. "mosaic").
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Base content address of the document being edited.
    #[serde(default)]
    pub context_url: String,
    /// Whether the user may customize the layout.
    #[serde(default)]
    pub can_change_layout: bool,
    /// Layouts the user can switch to.
    #[serde(default)]
    pub available_layouts: Vec<String>,
    /// Whether the meta key stands in for ctrl (macOS hosts).
    #[serde(default)]
    pub platform_meta: bool,
    /// Format menu catalog.
    #[serde(default)]
    pub formats: Vec<FormatGroup>,
    /// Insert menu catalog.
    #[serde(default)]
    pub tiles: Vec<TileGroup>,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            context_url: String::new(),
            can_change_layout: false,
            available_layouts: Vec::new(),
            platform_meta: false,
            formats: Vec::new(),
            tiles: Vec::new(),
        }
    }
}

impl EditorOptions {
    /// Creates options for the given base address with empty catalogs.
    pub fn new(context_url: impl Into<String>) -> Self {
        Self {
            context_url: normalize_context_url(context_url.into()),
            ..Self::default()
        }
    }

    /// Parses options from a TOML document.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, ActionError> {
        let mut options: Self = toml::from_str(content)?;
        options.context_url = normalize_context_url(options.context_url);
        Ok(options)
    }

    /// Parses options from a JSON document, the format host pages embed.
    pub fn from_json_str(content: &str) -> std::result::Result<Self, ActionError> {
        let mut options: Self = serde_json::from_str(content)?;
        options.context_url = normalize_context_url(options.context_url);
        Ok(options)
    }

    /// Gets the configuration directory path.
    ///
    /// - Linux: `~/.config/MosaicActions/`
    /// - macOS: `~/Library/Application Support/MosaicActions/`
    /// - Windows: `%APPDATA%\MosaicActions\`
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("MosaicActions");

        Ok(config_dir)
    }

    /// Gets the default options file path.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("options.toml"))
    }

    /// Loads options from the default location, or defaults if none exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Loads options from a TOML or JSON file, chosen by extension.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(ActionError::Io)
            .context(format!("Failed to read options file: {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let options = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
        .context(format!("Failed to parse options file: {}", path.display()))?;

        Ok(options)
    }

    /// Saves options to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves options as TOML, creating the parent directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).context(format!(
                    "Failed to create config directory: {}",
                    parent.display()
                ))?;
            }
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize options")?;
        fs::write(path, content)
            .context(format!("Failed to write options file: {}", path.display()))?;

        Ok(())
    }

    /// Validates the catalogs.
    ///
    /// Block-type names must be non-empty and unique across all groups, since
    /// the insert menu identifies them by name alone.
    pub fn validate(&self) -> std::result::Result<(), ActionError> {
        if self.prefix.is_empty() {
            return Err(ActionError::InvalidCatalog(
                "class-name prefix cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for tile in self.block_types() {
            if tile.name.is_empty() {
                return Err(ActionError::InvalidCatalog(
                    "block type with an empty name".to_string(),
                ));
            }
            if tile.name == crate::source::NONE_VALUE {
                return Err(ActionError::InvalidCatalog(format!(
                    "block type name '{}' is reserved",
                    tile.name
                )));
            }
            if !seen.insert(tile.name.as_str()) {
                return Err(ActionError::InvalidCatalog(format!(
                    "block type '{}' is defined more than once",
                    tile.name
                )));
            }
        }

        for action in self.format_actions() {
            if action.name.is_empty() {
                return Err(ActionError::InvalidCatalog(
                    "format action with an empty name".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// All block types in catalog order.
    pub fn block_types(&self) -> impl Iterator<Item = &BlockTypeConfig> {
        self.tiles.iter().flat_map(|group| group.tiles.iter())
    }

    /// All format actions in catalog order.
    pub fn format_actions(&self) -> impl Iterator<Item = &FormatAction> {
        self.formats.iter().flat_map(|group| group.actions.iter())
    }

    /// Format actions belonging to the given scope.
    pub fn format_actions_in(&self, scope: Scope) -> impl Iterator<Item = &FormatAction> {
        self.format_actions()
            .filter(move |action| action.scope() == Some(scope))
    }

    /// Resolves a selected block-type name against the insert catalog.
    pub fn resolve_block_type(&self, name: &str) -> Option<&BlockTypeConfig> {
        find_block_type(&self.tiles, name)
    }
}

/// Strips trailing slashes so addresses can be joined with "/@@view".
fn normalize_context_url(url: String) -> String {
    let trimmed = url.trim_end_matches('/');
    if trimmed.len() == url.len() {
        url
    } else {
        trimmed.to_string()
    }
}
