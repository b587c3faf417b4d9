//! Built-in ability behaviours.

use std::sync::Arc;

use async_trait::async_trait;

use super::activation::{AbilityBehavior, ActivationContext};
use crate::effects::EffectDefinition;

/// Applies cooldown, cost, then one effect to the owner.
#[derive(Clone, Debug)]
pub struct SimpleAbility {
    /// The primary effect.
    pub effect: Arc<EffectDefinition>,
}

impl SimpleAbility {
    /// Create the behaviour.
    #[must_use]
    pub fn new(effect: Arc<EffectDefinition>) -> Self {
        Self { effect }
    }
}

#[async_trait(?Send)]
impl AbilityBehavior for SimpleAbility {
    async fn start(&self, context: &mut ActivationContext) {
        context.apply_cooldown();
        context.apply_cost();
        context.apply_to_owner(&self.effect);
    }
}

/// Applies cooldown, cost, then a list of effects to the owner.
///
/// Current values are recomputed after the cost and after each effect, so
/// every effect reads what was paid or set up before it (for example
/// MaxHealth before Health).
#[derive(Clone, Debug, Default)]
pub struct InitializeStatsAbility {
    /// Effects applied in order.
    pub effects: Vec<Arc<EffectDefinition>>,
}

impl InitializeStatsAbility {
    /// Create the behaviour.
    #[must_use]
    pub fn new(effects: Vec<Arc<EffectDefinition>>) -> Self {
        Self { effects }
    }
}

#[async_trait(?Send)]
impl AbilityBehavior for InitializeStatsAbility {
    async fn start(&self, context: &mut ActivationContext) {
        context.apply_cooldown();
        context.apply_cost();
        context.update_owner_attributes();

        for effect in &self.effects {
            context.apply_to_owner(effect);
            context.update_owner_attributes();
        }
    }
}
