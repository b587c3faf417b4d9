//! Effect resolution - executing effect specs on attribute tables.
//!
//! The `EffectResolver` evaluates a spec's modifiers and either writes
//! them straight into base values (instant effects and periodic
//! executions) or turns them into fixed deltas for registration.
//! Registration itself and tag bookkeeping live on the character.

use smallvec::SmallVec;
use tracing::trace;

use super::container::ModifierDelta;
use super::definition::ModifierOperator;
use super::magnitude::MagnitudeContext;
use super::spec::EffectSpec;
use crate::attributes::{AttributeModifier, AttributeSystem};
use crate::tags::TagSet;

/// Where a spec's source attributes can be read from.
#[derive(Clone, Copy, Debug)]
pub enum SourceAccess<'a> {
    /// The source is the target itself.
    Target,
    /// The source is another character.
    Other(&'a AttributeSystem),
    /// The source cannot be reached; live source reads use the value
    /// captured when the spec was created.
    Unavailable,
}

impl<'a> SourceAccess<'a> {
    fn context<'b>(self, target: &'b AttributeSystem) -> MagnitudeContext<'b>
    where
        'a: 'b,
    {
        let source = match self {
            SourceAccess::Target => Some(target),
            SourceAccess::Other(source) => Some(source),
            SourceAccess::Unavailable => None,
        };
        MagnitudeContext::new(source, Some(target))
    }
}

/// Resolves effect specs against attribute tables.
pub struct EffectResolver;

impl EffectResolver {
    /// Check a spec's application requirements against the target's tags.
    #[must_use]
    pub fn satisfies_application(spec: &EffectSpec, granted: &TagSet) -> bool {
        spec.definition().tags.application_requirements.is_satisfied_by(granted)
    }

    /// Apply every modifier of `spec` to base values.
    ///
    /// Modifiers run in declaration order. Modifiers of attributes the
    /// target does not have are skipped. Returns the number of base values
    /// written.
    pub fn apply_instant(target: &mut AttributeSystem, spec: &EffectSpec, source: SourceAccess<'_>) -> usize {
        let mut applied = 0;

        for modifier in &spec.definition().modifiers {
            let magnitude = modifier.evaluate(spec, &source.context(target));

            let Some(base) = target.base_value(modifier.attribute) else {
                trace!(attribute = %modifier.attribute, effect = %spec.definition().name, "instant modifier skipped");
                continue;
            };
            let new_base = match modifier.operator {
                ModifierOperator::Add => base + magnitude,
                ModifierOperator::Multiply => base * magnitude,
                ModifierOperator::Override => magnitude,
            };
            target.set_base(modifier.attribute, new_base);
            applied += 1;

            trace!(
                attribute = %modifier.attribute,
                previous = base,
                current = new_base,
                "base value written"
            );
        }

        applied
    }

    /// Compute the fixed deltas a durational spec contributes.
    #[must_use]
    pub fn build_deltas(
        target: &AttributeSystem,
        spec: &EffectSpec,
        source: SourceAccess<'_>,
    ) -> SmallVec<[ModifierDelta; 4]> {
        let context = source.context(target);

        spec.definition()
            .modifiers
            .iter()
            .map(|modifier| {
                let magnitude = modifier.evaluate(spec, &context);
                let delta = match modifier.operator {
                    ModifierOperator::Add => AttributeModifier::add(magnitude),
                    ModifierOperator::Multiply => AttributeModifier::multiply(magnitude),
                    ModifierOperator::Override => AttributeModifier::override_with(magnitude),
                };
                ModifierDelta {
                    attribute: modifier.attribute,
                    modifier: delta,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::attributes::AttributeId;
    use crate::effects::{Curve, EffectDefinition, EffectModifier, Magnitude, ModifierOperator};
    use crate::tags::{TagId, TagRequirements};

    const HEALTH: AttributeId = AttributeId::new(0);
    const ARMOR: AttributeId = AttributeId::new(1);
    const MISSING: AttributeId = AttributeId::new(9);

    fn attributes() -> AttributeSystem {
        let mut attributes = AttributeSystem::new();
        attributes.add_attribute(HEALTH, 10.0);
        attributes.add_attribute(ARMOR, 4.0);
        attributes
    }

    fn spec(definition: EffectDefinition) -> EffectSpec {
        EffectSpec::new(Arc::new(definition), None, 1.0)
    }

    #[test]
    fn test_instant_operators() {
        let mut target = attributes();
        let spec = spec(
            EffectDefinition::instant("Mixed")
                .with_modifier(EffectModifier::add(HEALTH, 5.0))
                .with_modifier(EffectModifier::multiply(HEALTH, 2.0))
                .with_modifier(EffectModifier::override_with(ARMOR, 0.0)),
        );

        let applied = EffectResolver::apply_instant(&mut target, &spec, SourceAccess::Unavailable);

        assert_eq!(applied, 3);
        assert_eq!(target.base_value(HEALTH), Some(30.0));
        assert_eq!(target.base_value(ARMOR), Some(0.0));
        // Current values wait for the next recomputation.
        assert_eq!(target.current_value(HEALTH), Some(10.0));
    }

    #[test]
    fn test_instant_skips_missing_attribute() {
        let mut target = attributes();
        let spec = spec(EffectDefinition::instant("Ghost").with_modifier(EffectModifier::add(MISSING, 5.0)));

        assert_eq!(EffectResolver::apply_instant(&mut target, &spec, SourceAccess::Target), 0);
        assert!(!target.contains(MISSING));
    }

    #[test]
    fn test_instant_multiplier() {
        let mut target = attributes();
        let spec = spec(
            EffectDefinition::instant("Bleed").with_modifier(EffectModifier::add(HEALTH, 2.0).with_multiplier(-3.0)),
        );

        EffectResolver::apply_instant(&mut target, &spec, SourceAccess::Unavailable);
        assert_eq!(target.base_value(HEALTH), Some(4.0));
    }

    #[test]
    fn test_target_reads_use_current_value() {
        let mut target = attributes();
        target.set_base(ARMOR, 4.0);
        target.recompute_current_values();

        // Instant writes only touch base values, so the read sees 4.
        let spec = spec(
            EffectDefinition::instant("Reflect")
                .with_modifier(EffectModifier::add(ARMOR, 6.0))
                .with_modifier(EffectModifier::new(
                    HEALTH,
                    ModifierOperator::Add,
                    Magnitude::target_attribute(ARMOR, Curve::Identity),
                )),
        );

        EffectResolver::apply_instant(&mut target, &spec, SourceAccess::Target);
        assert_eq!(target.base_value(ARMOR), Some(10.0));
        assert_eq!(target.base_value(HEALTH), Some(14.0));
    }

    #[test]
    fn test_build_deltas() {
        let target = attributes();
        let spec = spec(
            EffectDefinition::infinite("Aura")
                .with_modifier(EffectModifier::add(HEALTH, 3.0))
                .with_modifier(EffectModifier::multiply(HEALTH, 0.5))
                .with_modifier(EffectModifier::override_with(ARMOR, 1.0)),
        );

        let deltas = EffectResolver::build_deltas(&target, &spec, SourceAccess::Unavailable);

        assert_eq!(deltas.len(), 3);
        assert_eq!(deltas[0], ModifierDelta { attribute: HEALTH, modifier: AttributeModifier::add(3.0) });
        assert_eq!(deltas[1].modifier, AttributeModifier::multiply(0.5));
        assert_eq!(deltas[2].modifier.override_value, Some(1.0));
    }

    #[test]
    fn test_satisfies_application() {
        let stunned = TagId::new(1);
        let definition = EffectDefinition::instant("Heal")
            .with_application_requirements(TagRequirements::new().ignore(stunned));
        let spec = spec(definition);

        assert!(EffectResolver::satisfies_application(&spec, &TagSet::new()));
        assert!(!EffectResolver::satisfies_application(&spec, &[stunned].into_iter().collect()));
    }
}
