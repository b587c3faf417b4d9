//! Per-character attribute store.
//!
//! `AttributeSystem` owns one `AttributeValue` per attribute the character
//! has. Values are kept in registration order, which is also the order in
//! which modifiers are evaluated and change notifications are produced.
//!
//! ## Per-tick protocol
//!
//! 1. [`AttributeSystem::reset_modifiers`] clears every pending modifier.
//! 2. [`AttributeSystem::accumulate_modifier`] folds in each active contribution.
//! 3. [`AttributeSystem::recompute_current_values`] derives current values,
//!    runs event handlers and reports what changed.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::handler::AttributeEventHandler;
use super::registry::AttributeId;
use super::value::{AttributeChange, AttributeModifier, AttributeValue};

/// Attribute table of a single character.
///
/// ## Example
///
/// ```
/// use rust_gas::attributes::{AttributeId, AttributeModifier, AttributeSystem};
///
/// let health = AttributeId::new(0);
/// let mut attributes = AttributeSystem::new();
/// attributes.add_attribute(health, 10.0);
///
/// attributes.reset_modifiers();
/// attributes.accumulate_modifier(health, AttributeModifier::add(5.0));
/// let changes = attributes.recompute_current_values();
///
/// assert_eq!(attributes.current_value(health), Some(15.0));
/// assert_eq!(changes.len(), 1);
/// assert_eq!(changes[0].previous, 10.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct AttributeSystem {
    values: Vec<AttributeValue>,
    index: FxHashMap<AttributeId, usize>,
    handlers: Vec<Arc<dyn AttributeEventHandler>>,
    previous: Vec<AttributeValue>,
}

impl AttributeSystem {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute with a base value. Duplicates are ignored.
    ///
    /// Returns `true` if the attribute was added.
    pub fn add_attribute(&mut self, attribute: AttributeId, base_value: f32) -> bool {
        if self.index.contains_key(&attribute) {
            return false;
        }
        self.index.insert(attribute, self.values.len());
        self.values.push(AttributeValue::new(attribute, base_value));
        true
    }

    /// Add several attributes at base zero. Duplicates are ignored.
    pub fn add_attributes(&mut self, attributes: impl IntoIterator<Item = AttributeId>) {
        for attribute in attributes {
            self.add_attribute(attribute, 0.0);
        }
    }

    /// Remove an attribute. Returns `false` if it was not present.
    pub fn remove_attribute(&mut self, attribute: AttributeId) -> bool {
        let Some(position) = self.index.remove(&attribute) else {
            return false;
        };
        self.values.remove(position);
        self.rebuild_index();
        true
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, value) in self.values.iter().enumerate() {
            self.index.insert(value.attribute, i);
        }
    }

    /// Register an event handler, run after every recomputation.
    pub fn add_handler(&mut self, handler: Arc<dyn AttributeEventHandler>) {
        self.handlers.push(handler);
    }

    /// Check whether the attribute is present.
    #[must_use]
    pub fn contains(&self, attribute: AttributeId) -> bool {
        self.index.contains_key(&attribute)
    }

    /// Get a copy of an attribute's value.
    ///
    /// `None` means the character does not have the attribute; callers
    /// treat that as zero.
    #[must_use]
    pub fn get(&self, attribute: AttributeId) -> Option<AttributeValue> {
        self.index.get(&attribute).map(|&i| self.values[i])
    }

    /// Get an attribute's current value.
    #[must_use]
    pub fn current_value(&self, attribute: AttributeId) -> Option<f32> {
        self.get(attribute).map(|value| value.current_value)
    }

    /// Get an attribute's base value.
    #[must_use]
    pub fn base_value(&self, attribute: AttributeId) -> Option<f32> {
        self.get(attribute).map(|value| value.base_value)
    }

    /// Overwrite an attribute's base value.
    ///
    /// Returns `false` if the attribute is not present.
    pub fn set_base(&mut self, attribute: AttributeId, base_value: f32) -> bool {
        match self.index.get(&attribute) {
            Some(&i) => {
                self.values[i].base_value = base_value;
                true
            }
            None => false,
        }
    }

    /// Fold a modifier into the attribute's pending modifier.
    ///
    /// Returns `false` if the attribute is not present.
    pub fn accumulate_modifier(&mut self, attribute: AttributeId, modifier: AttributeModifier) -> bool {
        match self.index.get(&attribute) {
            Some(&i) => {
                let value = &mut self.values[i];
                value.modifier = value.modifier.combine(modifier);
                true
            }
            None => false,
        }
    }

    /// Clear every pending modifier.
    pub fn reset_modifiers(&mut self) {
        for value in &mut self.values {
            value.modifier = AttributeModifier::default();
        }
    }

    /// Reset every attribute to its default value, keeping the attribute.
    pub fn reset_all(&mut self) {
        for value in &mut self.values {
            *value = AttributeValue::zero(value.attribute);
        }
    }

    /// Recompute every current value from base and pending modifier.
    ///
    /// Event handlers run afterwards and may adjust the results. Returns
    /// one change per attribute whose final current value differs from
    /// its value before the call, in registration order.
    pub fn recompute_current_values(&mut self) -> Vec<AttributeChange> {
        self.previous.clear();
        self.previous.extend_from_slice(&self.values);

        for value in &mut self.values {
            value.current_value = value.calculate_current();
        }

        for handler in &self.handlers {
            handler.pre_attribute_change(&self.previous, &mut self.values);
        }

        self.previous
            .iter()
            .zip(&self.values)
            .filter(|(before, after)| before.current_value != after.current_value)
            .map(|(before, after)| AttributeChange {
                attribute: after.attribute,
                previous: before.current_value,
                current: after.current_value,
            })
            .collect()
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the store has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over values in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &AttributeValue> {
        self.values.iter()
    }
}
