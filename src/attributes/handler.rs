//! Attribute event handlers.
//!
//! Handlers run at the end of every recomputation with the values from
//! before and after it. They may adjust current values in place, which is
//! how derived constraints such as "Health never exceeds MaxHealth" are
//! expressed.

use std::fmt;

use super::registry::AttributeId;
use super::value::AttributeValue;

/// Hook invoked after current values are recomputed.
pub trait AttributeEventHandler: fmt::Debug + Send + Sync {
    /// Adjust `current` given the values before recomputation.
    ///
    /// Both slices are in the store's registration order.
    fn pre_attribute_change(&self, previous: &[AttributeValue], current: &mut [AttributeValue]);
}

/// Clamp an attribute's current value.
///
/// ```
/// use rust_gas::attributes::{AttributeId, ClampAttribute};
///
/// let health = AttributeId::new(0);
/// let max_health = AttributeId::new(1);
///
/// let clamp = ClampAttribute::new(health)
///     .with_min(0.0)
///     .with_max_attribute(max_health);
/// assert_eq!(clamp.attribute, health);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ClampAttribute {
    /// The attribute to clamp.
    pub attribute: AttributeId,
    /// Lower bound.
    pub min: Option<f32>,
    /// Fixed upper bound.
    pub max: Option<f32>,
    /// Upper bound taken from another attribute's current value.
    pub max_attribute: Option<AttributeId>,
}

impl ClampAttribute {
    /// Create an unbounded clamp for `attribute`.
    #[must_use]
    pub fn new(attribute: AttributeId) -> Self {
        Self {
            attribute,
            min: None,
            max: None,
            max_attribute: None,
        }
    }

    /// Set the lower bound.
    #[must_use]
    pub fn with_min(mut self, min: f32) -> Self {
        self.min = Some(min);
        self
    }

    /// Set a fixed upper bound.
    #[must_use]
    pub fn with_max(mut self, max: f32) -> Self {
        self.max = Some(max);
        self
    }

    /// Bound by another attribute's current value.
    #[must_use]
    pub fn with_max_attribute(mut self, attribute: AttributeId) -> Self {
        self.max_attribute = Some(attribute);
        self
    }
}

impl AttributeEventHandler for ClampAttribute {
    fn pre_attribute_change(&self, _previous: &[AttributeValue], current: &mut [AttributeValue]) {
        let dynamic_max = self.max_attribute.and_then(|max_attribute| {
            current
                .iter()
                .find(|value| value.attribute == max_attribute)
                .map(|value| value.current_value)
        });

        let Some(value) = current.iter_mut().find(|value| value.attribute == self.attribute) else {
            return;
        };

        let mut clamped = value.current_value;
        if let Some(max) = self.max {
            clamped = clamped.min(max);
        }
        if let Some(max) = dynamic_max {
            clamped = clamped.min(max);
        }
        if let Some(min) = self.min {
            clamped = clamped.max(min);
        }
        value.current_value = clamped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEALTH: AttributeId = AttributeId::new(0);
    const MAX_HEALTH: AttributeId = AttributeId::new(1);

    #[test]
    fn test_clamp_to_fixed_bounds() {
        let clamp = ClampAttribute::new(HEALTH).with_min(0.0).with_max(100.0);

        let mut values = [AttributeValue::new(HEALTH, 150.0)];
        clamp.pre_attribute_change(&[], &mut values);
        assert_eq!(values[0].current_value, 100.0);

        values[0].current_value = -5.0;
        clamp.pre_attribute_change(&[], &mut values);
        assert_eq!(values[0].current_value, 0.0);
    }

    #[test]
    fn test_clamp_to_other_attribute() {
        let clamp = ClampAttribute::new(HEALTH).with_max_attribute(MAX_HEALTH);

        let mut values = [
            AttributeValue::new(HEALTH, 120.0),
            AttributeValue::new(MAX_HEALTH, 80.0),
        ];
        clamp.pre_attribute_change(&[], &mut values);

        assert_eq!(values[0].current_value, 80.0);
        // Base value is never touched by the handler.
        assert_eq!(values[0].base_value, 120.0);
    }

    #[test]
    fn test_clamp_missing_attribute_is_noop() {
        let clamp = ClampAttribute::new(HEALTH).with_max(1.0);
        let mut values = [AttributeValue::new(MAX_HEALTH, 50.0)];
        clamp.pre_attribute_change(&[], &mut values);
        assert_eq!(values[0].current_value, 50.0);
    }
}
