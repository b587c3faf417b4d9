//! Attribute identity and name lookup.
//!
//! The `AttributeRegistry` maps attribute names ("Health", "MaxHealth")
//! to compact `AttributeId`s. Attribute stores and effect modifiers refer
//! to attributes only through these IDs.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Attribute identifier. Games define what attributes exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttributeId(pub u16);

impl AttributeId {
    /// Create a new attribute ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for AttributeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Attribute({})", self.0)
    }
}

/// Registry of attribute names.
///
/// ## Example
///
/// ```
/// use rust_gas::attributes::AttributeRegistry;
///
/// let mut registry = AttributeRegistry::new();
/// let health = registry.register("Health");
///
/// assert_eq!(registry.find("Health"), Some(health));
/// assert_eq!(registry.name(health), Some("Health"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct AttributeRegistry {
    names: Vec<String>,
    by_name: FxHashMap<String, AttributeId>,
}

impl AttributeRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an attribute name with an auto-assigned ID.
    ///
    /// Registering an existing name returns the existing ID.
    pub fn register(&mut self, name: impl Into<String>) -> AttributeId {
        let name = name.into();
        if let Some(&id) = self.by_name.get(&name) {
            return id;
        }

        let id = AttributeId::new(self.names.len() as u16);
        self.by_name.insert(name.clone(), id);
        self.names.push(name);
        id
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<AttributeId> {
        self.by_name.get(name).copied()
    }

    /// Get an attribute's name.
    #[must_use]
    pub fn name(&self, id: AttributeId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    /// Check if an attribute ID is registered.
    #[must_use]
    pub fn contains(&self, id: AttributeId) -> bool {
        (id.0 as usize) < self.names.len()
    }

    /// Get the number of registered attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over all attributes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (AttributeId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (AttributeId::new(i as u16), name.as_str()))
    }
}
