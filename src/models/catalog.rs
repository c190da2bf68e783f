//! Block-type and format-action catalogs supplied by the host page.

use serde::{Deserialize, Serialize};

/// Scope a class-based format applies to.
///
/// The host vocabulary calls these "tile" and "row"; both spellings are
/// accepted when reading a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The selected element itself.
    Element,
    /// The nearest row enclosing the selected element.
    Row,
}

impl Scope {
    /// Maps a catalog category to a scope, if it names one.
    #[must_use]
    pub fn from_category(category: &str) -> Option<Self> {
        match category {
            "tile" | "element-scope" => Some(Self::Element),
            "row" | "row-scope" => Some(Self::Row),
            _ => None,
        }
    }

    /// Canonical category name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Element => "element-scope",
            Self::Row => "row-scope",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creation strategy for a block type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TileStrategy {
    /// Content comes straight from the type's default value.
    #[default]
    Static,
    /// Content is synthesized locally and addressed by a fresh identifier.
    TemplatedApp,
    /// Content comes from a server-rendered add form.
    FormApp,
}

impl TileStrategy {
    /// Tag used when writing a catalog back out.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::TemplatedApp => "templated-app",
            Self::FormApp => "form-app",
        }
    }
}

impl From<String> for TileStrategy {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "templated-app" | "textapp" => Self::TemplatedApp,
            "form-app" | "app" => Self::FormApp,
            // Unknown tags fall through to static, like the host does
            _ => Self::Static,
        }
    }
}

impl From<TileStrategy> for String {
    fn from(strategy: TileStrategy) -> Self {
        strategy.as_str().to_string()
    }
}

impl std::fmt::Display for TileStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A block type the user can insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTypeConfig {
    /// Name matching the value selected in the insert menu.
    pub name: String,
    /// Host category (e.g. "tile" or "row").
    #[serde(default)]
    pub category: String,
    /// Creation strategy.
    #[serde(default)]
    pub tile_type: TileStrategy,
    /// Human readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Default content for new blocks of this type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl BlockTypeConfig {
    /// Creates a block type with no label or default value.
    pub fn new(name: impl Into<String>, category: impl Into<String>, tile_type: TileStrategy) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            tile_type,
            label: None,
            default_value: None,
        }
    }

    /// Sets the default content.
    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Scope derived from the category, if any.
    #[must_use]
    pub fn scope(&self) -> Option<Scope> {
        Scope::from_category(&self.category)
    }
}

/// A named group of block types, as shown in the insert menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGroup {
    /// Group name.
    pub name: String,
    /// Human readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Block types in this group.
    #[serde(default)]
    pub tiles: Vec<BlockTypeConfig>,
}

/// A single entry in the format menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatAction {
    /// Class-name stem, also the value the format menu yields.
    pub name: String,
    /// Host category (e.g. "tile" or "row").
    #[serde(default)]
    pub category: String,
    /// Human readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Action to run when picked from the format menu.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl FormatAction {
    /// Creates a format entry.
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            label: None,
            action: None,
        }
    }

    /// Sets the action the format menu runs for this entry.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Scope derived from the category, if any.
    #[must_use]
    pub fn scope(&self) -> Option<Scope> {
        Scope::from_category(&self.category)
    }
}

/// A named group of format entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatGroup {
    /// Group name.
    pub name: String,
    /// Human readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Entries in this group.
    #[serde(default)]
    pub actions: Vec<FormatAction>,
}

/// Finds the block type with the given name by scanning every group.
///
/// The last match wins when a name appears more than once.
pub fn find_block_type<'a>(groups: &'a [TileGroup], name: &str) -> Option<&'a BlockTypeConfig> {
    groups
        .iter()
        .flat_map(|group| group.tiles.iter())
        .filter(|tile| tile.name == name)
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_from_host_categories() {
        assert_eq!(Scope::from_category("tile"), Some(Scope::Element));
        assert_eq!(Scope::from_category("row"), Some(Scope::Row));
        assert_eq!(Scope::from_category("row-scope"), Some(Scope::Row));
        assert_eq!(Scope::from_category("actions"), None);
    }

    #[test]
    fn test_strategy_accepts_legacy_tags() {
        assert_eq!(TileStrategy::from("textapp".to_string()), TileStrategy::TemplatedApp);
        assert_eq!(TileStrategy::from("app".to_string()), TileStrategy::FormApp);
        assert_eq!(TileStrategy::from("text".to_string()), TileStrategy::Static);
        assert_eq!(TileStrategy::from("form-app".to_string()), TileStrategy::FormApp);
    }

    #[test]
    fn test_strategy_deserializes_from_json() {
        let tile: BlockTypeConfig =
            serde_json::from_str(r#"{"name": "image", "category": "tile", "tile_type": "app"}"#)
                .unwrap();
        assert_eq!(tile.tile_type, TileStrategy::FormApp);
        assert_eq!(tile.scope(), Some(Scope::Element));
        assert_eq!(tile.default_value, None);
    }

    #[test]
    fn test_find_block_type_scans_all_groups() {
        let groups = vec![
            TileGroup {
                name: "text".to_string(),
                label: None,
                tiles: vec![BlockTypeConfig::new("text", "tile", TileStrategy::Static)],
            },
            TileGroup {
                name: "media".to_string(),
                label: None,
                tiles: vec![BlockTypeConfig::new("image", "tile", TileStrategy::FormApp)],
            },
        ];

        let found = find_block_type(&groups, "image").unwrap();
        assert_eq!(found.tile_type, TileStrategy::FormApp);
        assert!(find_block_type(&groups, "video").is_none());
    }
}
