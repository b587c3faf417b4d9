//! Attribute values and modifiers.
//!
//! ## Evaluation
//!
//! `current = (base + add) * (1 + multiply)`, replaced entirely by the
//! override when one is present. Additive and multiplicative contributions
//! sum across effects; of several overrides, the last one accumulated wins.

use serde::{Deserialize, Serialize};

use super::registry::AttributeId;

/// Pending modifier of an attribute, rebuilt every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeModifier {
    /// Added to the base value.
    pub add: f32,
    /// Summed fraction; the sum plus one scales `base + add`.
    pub multiply: f32,
    /// Replaces the computed value when present. `Some(0.0)` forces zero.
    pub override_value: Option<f32>,
}

impl AttributeModifier {
    /// An additive modifier.
    #[must_use]
    pub fn add(amount: f32) -> Self {
        Self {
            add: amount,
            ..Self::default()
        }
    }

    /// A multiplicative modifier (`0.5` means +50%).
    #[must_use]
    pub fn multiply(amount: f32) -> Self {
        Self {
            multiply: amount,
            ..Self::default()
        }
    }

    /// An overriding modifier.
    #[must_use]
    pub fn override_with(value: f32) -> Self {
        Self {
            override_value: Some(value),
            ..Self::default()
        }
    }

    /// Combine `other` into this modifier.
    ///
    /// Adds and multiplies sum. An override in `other` replaces this one;
    /// an absent override in `other` keeps this one.
    #[must_use]
    pub fn combine(self, other: AttributeModifier) -> Self {
        Self {
            add: self.add + other.add,
            multiply: self.multiply + other.multiply,
            override_value: other.override_value.or(self.override_value),
        }
    }

    /// Check whether this modifier changes nothing.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.add == 0.0 && self.multiply == 0.0 && self.override_value.is_none()
    }
}

/// The value of one attribute on one character.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeValue {
    /// Which attribute this is.
    pub attribute: AttributeId,
    /// Persistent value, changed only by instant effects.
    pub base_value: f32,
    /// Derived value, recomputed every tick.
    pub current_value: f32,
    /// Modifier accumulated this tick.
    pub modifier: AttributeModifier,
}

impl AttributeValue {
    /// Create a value whose current value equals its base.
    #[must_use]
    pub fn new(attribute: AttributeId, base_value: f32) -> Self {
        Self {
            attribute,
            base_value,
            current_value: base_value,
            modifier: AttributeModifier::default(),
        }
    }

    /// The zero value used when an attribute is missing.
    #[must_use]
    pub fn zero(attribute: AttributeId) -> Self {
        Self::new(attribute, 0.0)
    }

    /// Evaluate the current value from base and modifier.
    #[must_use]
    pub fn calculate_current(&self) -> f32 {
        match self.modifier.override_value {
            Some(value) => value,
            None => (self.base_value + self.modifier.add) * (1.0 + self.modifier.multiply),
        }
    }
}

/// Notification that an attribute's current value changed during recomputation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeChange {
    /// The attribute that changed.
    pub attribute: AttributeId,
    /// Current value before recomputation.
    pub previous: f32,
    /// Current value after recomputation.
    pub current: f32,
}
