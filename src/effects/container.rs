//! Registered durational effects.

use std::sync::Arc;

use smallvec::SmallVec;

use super::definition::{DurationPolicy, EffectDefinition};
use super::spec::EffectSpec;
use crate::attributes::{AttributeId, AttributeModifier};

/// A fixed contribution to one attribute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModifierDelta {
    /// Attribute contributed to.
    pub attribute: AttributeId,
    /// The contribution.
    pub modifier: AttributeModifier,
}

/// A durational effect registered on a character.
///
/// Deltas are computed once, when the effect is applied, and re-accumulated
/// unchanged every tick.
#[derive(Clone, Debug)]
pub struct AppliedEffect {
    /// The live spec, aged every tick.
    pub spec: EffectSpec,
    /// Contributions in modifier order.
    pub deltas: SmallVec<[ModifierDelta; 4]>,
}

impl AppliedEffect {
    /// Register a spec with precomputed deltas.
    #[must_use]
    pub fn new(spec: EffectSpec, deltas: SmallVec<[ModifierDelta; 4]>) -> Self {
        Self { spec, deltas }
    }

    /// The definition of the registered spec.
    #[must_use]
    pub fn definition(&self) -> &Arc<EffectDefinition> {
        self.spec.definition()
    }

    /// Check whether a `HasDuration` effect has run out.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.definition().duration_policy == DurationPolicy::HasDuration && self.spec.duration_remaining() <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_depends_on_policy() {
        let mut timed = AppliedEffect::new(
            EffectSpec::new(Arc::new(EffectDefinition::has_duration("Haste", 1.0)), None, 1.0),
            SmallVec::new(),
        );
        assert!(!timed.is_expired());
        timed.spec.update_remaining_duration(1.0);
        assert!(timed.is_expired());

        let mut infinite = AppliedEffect::new(
            EffectSpec::new(Arc::new(EffectDefinition::infinite("Aura")), None, 1.0),
            SmallVec::new(),
        );
        infinite.spec.update_remaining_duration(100.0);
        assert!(!infinite.is_expired());
    }
}
