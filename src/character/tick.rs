//! The per-frame update.
//!
//! ## Order
//!
//! 1. Reset every pending modifier.
//! 2. Accumulate the fixed deltas of registered effects, in registration
//!    order, skipping effects whose ongoing requirements are unmet.
//! 3. Recompute current values and notify subscribers.
//! 4. Age registered effects and run due periodic executions, which write
//!    base values directly. Effects whose ongoing requirements are unmet
//!    keep aging and keep their period timer running, but do not execute.
//! 5. Remove expired effects and effects whose removal requirements are met.

use tracing::trace;

use super::Character;
use crate::attributes::{AttributeChange, AttributeSystem};
use crate::core::CharacterId;
use crate::effects::{EffectResolver, SourceAccess};

/// What happened during one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickSummary {
    /// Current values that changed, in attribute registration order.
    pub changes: Vec<AttributeChange>,
    /// Periodic executions performed.
    pub periodic_executions: usize,
    /// Effects removed.
    pub removed: usize,
}

impl Character {
    /// Advance the character by `dt` seconds.
    ///
    /// Periodic executions of specs from other characters read source
    /// attributes as captured when the spec was created. Use
    /// [`Self::tick_with_sources`] to read them live.
    pub fn tick(&mut self, dt: f32) -> TickSummary {
        self.tick_with_sources(dt, |_| None)
    }

    /// Advance the character by `dt` seconds, looking up the attributes of
    /// other characters that are the source of a periodic execution.
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use rust_gas::attributes::AttributeId;
    /// # use rust_gas::character::Character;
    /// # use rust_gas::core::CharacterId;
    /// # use rust_gas::effects::{Curve, EffectDefinition, EffectModifier, Magnitude, ModifierOperator};
    /// let power = AttributeId::new(0);
    /// let health = AttributeId::new(1);
    ///
    /// let mut caster = Character::new(CharacterId::new(1));
    /// caster.attributes_mut().add_attribute(power, 10.0);
    /// let mut victim = Character::new(CharacterId::new(2));
    /// victim.attributes_mut().add_attribute(health, 100.0);
    ///
    /// let poison = EffectDefinition::infinite("Poison").with_period(1.0, false).with_modifier(
    ///     EffectModifier::new(health, ModifierOperator::Add, Magnitude::live_source_attribute(power, Curve::Identity))
    ///         .with_multiplier(-1.0),
    /// );
    /// let spec = caster.make_outgoing_spec(Arc::new(poison), None);
    /// caster.apply_effect_spec_to_target(spec, &mut victim);
    ///
    /// caster.attributes_mut().set_base(power, 25.0);
    /// caster.tick(0.0);
    ///
    /// victim.tick_with_sources(1.0, |id| (id == caster.id()).then(|| caster.attributes()));
    /// assert_eq!(victim.attributes().base_value(health), Some(75.0));
    /// ```
    pub fn tick_with_sources<'s, F>(&mut self, dt: f32, sources: F) -> TickSummary
    where
        F: Fn(CharacterId) -> Option<&'s AttributeSystem>,
    {
        let granted = self.granted_tags();

        self.attributes.reset_modifiers();
        for effect in &self.active_effects {
            if !effect.definition().tags.ongoing_requirements.is_satisfied_by(&granted) {
                continue;
            }
            for delta in &effect.deltas {
                self.attributes.accumulate_modifier(delta.attribute, delta.modifier);
            }
        }

        let changes = self.attributes.recompute_current_values();
        self.notify(&changes);

        let id = self.id;
        let mut periodic_executions = 0;
        for effect in &mut self.active_effects {
            if effect.definition().is_instant() {
                continue;
            }
            effect.spec.update_remaining_duration(dt);

            if !effect.spec.tick_periodic(dt) {
                continue;
            }
            if !effect.definition().tags.ongoing_requirements.is_satisfied_by(&granted) {
                trace!(character = %id, effect = %effect.definition().name, "periodic execution inhibited");
                continue;
            }

            let access = match effect.spec.source() {
                Some(source) if source == id => SourceAccess::Target,
                Some(source) => sources(source).map_or(SourceAccess::Unavailable, SourceAccess::Other),
                None => SourceAccess::Unavailable,
            };
            EffectResolver::apply_instant(&mut self.attributes, &effect.spec, access);
            periodic_executions += 1;
            trace!(character = %id, effect = %effect.definition().name, "periodic execution");
        }

        let granted = self.granted_tags();
        let before = self.active_effects.len();
        self.active_effects.retain(|effect| {
            let removal = &effect.definition().tags.removal_requirements;
            let removed = effect.is_expired() || (!removal.is_empty() && removal.is_satisfied_by(&granted));
            if removed {
                trace!(character = %id, effect = %effect.definition().name, "effect culled");
            }
            !removed
        });

        TickSummary {
            changes,
            periodic_executions,
            removed: before - self.active_effects.len(),
        }
    }
}
