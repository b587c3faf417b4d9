//! Applying effect specs.

use std::sync::Arc;

use tracing::debug;

use super::Character;
use crate::effects::{AppliedEffect, ConditionalEffect, EffectResolver, EffectSpec, SourceAccess};
use crate::tags::TagId;

impl Character {
    /// Apply a spec to this character.
    ///
    /// Returns `false`, changing nothing, when the spec's application
    /// requirements are not met by the tags currently granted here.
    /// Instant specs write base values; durational specs are registered
    /// with deltas fixed at this moment.
    pub fn apply_effect_spec_to_self(&mut self, spec: EffectSpec) -> bool {
        self.apply_spec(spec, None)
    }

    /// Apply a spec created by this character to `target`.
    ///
    /// Live source reads see this character's attributes.
    pub fn apply_effect_spec_to_target(&self, mut spec: EffectSpec, target: &mut Character) -> bool {
        spec.set_target(target.id);
        target.apply_spec(spec, Some(self))
    }

    fn apply_spec(&mut self, mut spec: EffectSpec, source: Option<&Character>) -> bool {
        let definition = Arc::clone(spec.definition());

        if !EffectResolver::satisfies_application(&spec, &self.granted_tags()) {
            debug!(target_character = %self.id, effect = %definition.name, "application requirements not met");
            return false;
        }
        spec.set_target(self.id);

        if !definition.tags.remove_effects_with_tag.is_empty() {
            self.remove_effects_matching(&definition.tags.remove_effects_with_tag);
        }

        let self_sourced = source.is_none() && spec.source() == Some(self.id);
        let access = match source {
            Some(source) => SourceAccess::Other(&source.attributes),
            None if self_sourced => SourceAccess::Target,
            None => SourceAccess::Unavailable,
        };

        let level = spec.level();
        if definition.is_instant() {
            EffectResolver::apply_instant(&mut self.attributes, &spec, access);
            debug!(target_character = %self.id, effect = %definition.name, "instant effect applied");
        } else {
            let deltas = EffectResolver::build_deltas(&self.attributes, &spec, access);
            self.active_effects.push(AppliedEffect::new(spec, deltas));
            debug!(
                target_character = %self.id,
                effect = %definition.name,
                active = self.active_effects.len(),
                "effect registered"
            );
        }

        for conditional in &definition.conditional_effects {
            match source {
                Some(source) => {
                    if let Some(spec) = Self::conditional_spec(source, conditional, level) {
                        self.apply_spec(spec, Some(source));
                    }
                }
                None if self_sourced => {
                    if let Some(spec) = Self::conditional_spec(self, conditional, level) {
                        self.apply_spec(spec, None);
                    }
                }
                None => {}
            }
        }

        true
    }

    fn conditional_spec(source: &Character, conditional: &ConditionalEffect, level: f32) -> Option<EffectSpec> {
        if !source.granted_tags().contains_all(&conditional.required_source_tags) {
            return None;
        }
        Some(source.make_outgoing_spec(Arc::clone(&conditional.effect), Some(level)))
    }

    /// Remove every registered effect whose asset tag or granted tags include `tag`.
    ///
    /// Returns the number of effects removed.
    pub fn remove_effects_with_tag(&mut self, tag: TagId) -> usize {
        self.remove_effects_matching(&[tag])
    }

    fn remove_effects_matching(&mut self, tags: &[TagId]) -> usize {
        let before = self.active_effects.len();
        self.active_effects
            .retain(|effect| !effect.definition().tags.has_any(tags));

        let removed = before - self.active_effects.len();
        if removed > 0 {
            debug!(character = %self.id, removed, "effects removed by tag");
        }
        removed
    }
}
