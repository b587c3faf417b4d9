//! Activation gating.
//!
//! An ability may activate when it is not already active, its tag
//! requirements hold, its owner can pay its instant cost and no active
//! effect marks it as cooling down.

use std::sync::Arc;

use super::spec::{AbilitySpec, CooldownTime};
use crate::character::Character;
use crate::effects::{DurationPolicy, MagnitudeContext, ModifierOperator};

impl AbilitySpec {
    /// Check every gating condition.
    ///
    /// `target` defaults to the owner.
    #[must_use]
    pub fn can_activate(&self, owner: &Character, target: Option<&Character>) -> bool {
        !self.is_active()
            && self.satisfies_tags(owner, target)
            && self.satisfies_cost(owner)
            && self.cooldown(owner).is_ready()
    }

    /// Check owner, source and target requirements and blocking.
    #[must_use]
    pub fn satisfies_tags(&self, owner: &Character, target: Option<&Character>) -> bool {
        let tags = &self.definition().tags;
        let owner_tags = owner.granted_tags();

        if !tags.owner_requirements.is_satisfied_by(&owner_tags)
            || !tags.source_requirements.is_satisfied_by(&owner_tags)
        {
            return false;
        }

        let target_ok = match target {
            Some(target) => tags.target_requirements.is_satisfied_by(&target.granted_tags()),
            None => tags.target_requirements.is_satisfied_by(&owner_tags),
        };
        if !target_ok {
            return false;
        }

        let Some(asset) = tags.asset_tag else {
            return true;
        };
        !owner
            .abilities()
            .iter()
            .filter(|other| other.id() != self.id() && other.is_active())
            .any(|other| other.definition().tags.block_abilities_with_tags.contains(&asset))
    }

    /// Check that every instant additive cost leaves its attribute non-negative.
    ///
    /// Costs that are not instant, and non-additive modifiers, are not checked.
    #[must_use]
    pub fn satisfies_cost(&self, owner: &Character) -> bool {
        let Some(cost) = &self.definition().cost else {
            return true;
        };
        if !cost.is_instant() {
            return true;
        }

        let spec = owner.make_outgoing_spec(Arc::clone(cost), Some(self.level()));
        let context = MagnitudeContext::new(Some(owner.attributes()), Some(owner.attributes()));

        cost.modifiers
            .iter()
            .filter(|modifier| modifier.operator == ModifierOperator::Add)
            .all(|modifier| {
                let amount = modifier.evaluate(&spec, &context);
                let current = owner.attributes().current_value(modifier.attribute).unwrap_or(0.0);
                current + amount >= 0.0
            })
    }

    /// Find the longest remaining cooldown.
    ///
    /// Active effects granting any tag the cooldown effect grants count.
    /// An infinite match never expires.
    #[must_use]
    pub fn cooldown(&self, owner: &Character) -> CooldownTime {
        let Some(cooldown) = &self.definition().cooldown else {
            return CooldownTime::default();
        };
        let cooldown_tags = &cooldown.tags.granted_tags;

        let mut longest = CooldownTime::default();
        for effect in owner.active_effects() {
            let definition = effect.definition();
            if !definition.tags.granted_tags.iter().any(|tag| cooldown_tags.contains(tag)) {
                continue;
            }
            if definition.duration_policy == DurationPolicy::Infinite {
                return CooldownTime {
                    time_remaining: f32::INFINITY,
                    total_duration: 0.0,
                };
            }
            let remaining = effect.spec.duration_remaining();
            if remaining > longest.time_remaining {
                longest = CooldownTime {
                    time_remaining: remaining,
                    total_duration: effect.spec.total_duration(),
                };
            }
        }
        longest
    }
}
