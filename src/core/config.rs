//! Engine and character configuration.
//!
//! Games configure the engine at startup by providing:
//! - `EngineConfig`: the attribute names and tag hierarchy in play
//! - `CharacterConfig`: a character's level and starting base values
//!
//! Both deserialize from JSON so a content loader can hand them over
//! unchanged. Effect and ability definitions are built separately.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::attributes::AttributeRegistry;
use crate::tags::{TagRegistry, DEFAULT_SEARCH_LIMIT};

/// Level assigned to characters that do not configure one.
pub const DEFAULT_LEVEL: f32 = 1.0;

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

fn default_level() -> f32 {
    DEFAULT_LEVEL
}

/// Engine-wide configuration.
///
/// ```
/// use rust_gas::core::EngineConfig;
///
/// let config = EngineConfig::from_json(r#"{
///     "attributes": ["Health", "MaxHealth"],
///     "tags": ["Ability.Cooldown.Fireball", "Status.Stunned"]
/// }"#).unwrap();
///
/// let (attributes, tags) = config.build().unwrap();
/// assert!(attributes.find("Health").is_some());
///
/// let fireball = tags.find("Ability.Cooldown.Fireball").unwrap();
/// let cooldown = tags.find("Ability.Cooldown").unwrap();
/// assert!(tags.is_descendant_of(fireball, cooldown));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Attribute names, registered in order.
    #[serde(default)]
    pub attributes: Vec<String>,

    /// Dotted tag paths ("Ability.Cooldown.Fireball").
    /// Intermediate ancestors are registered automatically.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Maximum number of ancestors visited by hierarchy checks.
    #[serde(default = "default_search_limit")]
    pub tag_search_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            attributes: Vec::new(),
            tags: Vec::new(),
            tag_search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Create an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Declare an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(name.into());
        self
    }

    /// Declare a tag path.
    #[must_use]
    pub fn with_tag(mut self, path: impl Into<String>) -> Self {
        self.tags.push(path.into());
        self
    }

    /// Set the ancestor search limit.
    #[must_use]
    pub fn with_tag_search_limit(mut self, limit: usize) -> Self {
        self.tag_search_limit = limit;
        self
    }

    /// Build the attribute and tag registries described by this configuration.
    pub fn build(&self) -> Result<(AttributeRegistry, TagRegistry), ConfigError> {
        if self.tag_search_limit == 0 {
            return Err(ConfigError::ZeroSearchLimit);
        }

        let mut attributes = AttributeRegistry::new();
        for name in &self.attributes {
            if attributes.find(name).is_some() {
                return Err(ConfigError::DuplicateAttribute(name.clone()));
            }
            attributes.register(name.clone());
        }

        let mut tags = TagRegistry::with_search_limit(self.tag_search_limit);
        for path in &self.tags {
            tags.register_path(path)?;
        }

        tracing::debug!(
            attributes = attributes.len(),
            tags = tags.len(),
            "built engine registries"
        );
        Ok((attributes, tags))
    }
}

/// Starting base value for one attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeInit {
    /// Attribute name, resolved through the `AttributeRegistry`.
    pub name: String,
    /// Initial base value.
    #[serde(default)]
    pub base: f32,
}

/// Per-character configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterConfig {
    /// Character level, used as the default level of outgoing effect specs.
    #[serde(default = "default_level")]
    pub level: f32,

    /// Attributes the character owns, with their starting base values.
    #[serde(default)]
    pub attributes: Vec<AttributeInit>,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            attributes: Vec::new(),
        }
    }
}

impl CharacterConfig {
    /// Create a configuration with the default level and no attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the level.
    #[must_use]
    pub fn with_level(mut self, level: f32) -> Self {
        self.level = level;
        self
    }

    /// Add an attribute with a starting base value.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, base: f32) -> Self {
        self.attributes.push(AttributeInit {
            name: name.into(),
            base,
        });
        self
    }
}
