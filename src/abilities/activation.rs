//! Suspendable ability activation.
//!
//! Activation is a future: gating runs first, then the behaviour's
//! pre-start step, then its main step. Either step may suspend (waiting
//! for a target, an animation, a timer). Cancelling is dropping the
//! future, directly or through an `AbortHandle`; the activation state is
//! reset to `Inactive` on every exit path.
//!
//! Gating is evaluated once, before the pre-start step. Nothing is
//! re-validated after a suspension.

use std::cell::Cell;
use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{abortable, AbortHandle, Abortable};
use tracing::debug;

use super::definition::AbilityDefinition;
use super::spec::{AbilityId, ActivationState};
use crate::character::SharedCharacter;
use crate::effects::EffectDefinition;

/// How an activation attempt ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// Both steps ran to completion.
    Completed,
    /// Gating failed; nothing ran.
    Blocked,
    /// The owner has no ability with that ID.
    NotGranted,
}

/// The steps an ability runs when activated.
#[async_trait(?Send)]
pub trait AbilityBehavior: fmt::Debug {
    /// Runs first, for example to pick a target.
    async fn pre_start(&self, _context: &mut ActivationContext) {}

    /// The main step: apply cost, cooldown and effects.
    async fn start(&self, context: &mut ActivationContext);

    /// Called when the activation is dropped before the main step finished.
    fn cancel(&self, _context: &ActivationContext) {}
}

/// What a running activation can see and do.
///
/// Effects are applied through short borrows of the owner; none is held
/// across a suspension point.
pub struct ActivationContext {
    owner: SharedCharacter,
    target: Option<SharedCharacter>,
    ability: AbilityId,
    definition: Arc<AbilityDefinition>,
    level: f32,
}

impl ActivationContext {
    /// The owning character.
    #[must_use]
    pub fn owner(&self) -> &SharedCharacter {
        &self.owner
    }

    /// The activation target, if one was given or chosen.
    #[must_use]
    pub fn target(&self) -> Option<&SharedCharacter> {
        self.target.as_ref()
    }

    /// Choose a target.
    pub fn set_target(&mut self, target: SharedCharacter) {
        self.target = Some(target);
    }

    /// The ability being activated.
    #[must_use]
    pub fn ability(&self) -> AbilityId {
        self.ability
    }

    /// Its definition.
    #[must_use]
    pub fn definition(&self) -> &Arc<AbilityDefinition> {
        &self.definition
    }

    /// Level of the specs this activation creates.
    #[must_use]
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Apply the cost effect to the owner. `true` when there is none.
    pub fn apply_cost(&self) -> bool {
        match &self.definition.cost {
            Some(cost) => self.apply_to_owner(cost),
            None => true,
        }
    }

    /// Apply the cooldown effect to the owner. `true` when there is none.
    pub fn apply_cooldown(&self) -> bool {
        match &self.definition.cooldown {
            Some(cooldown) => self.apply_to_owner(cooldown),
            None => true,
        }
    }

    /// Apply an effect from the owner to the owner.
    pub fn apply_to_owner(&self, effect: &Arc<EffectDefinition>) -> bool {
        let mut owner = self.owner.borrow_mut();
        let spec = owner.make_outgoing_spec(Arc::clone(effect), Some(self.level));
        owner.apply_effect_spec_to_self(spec)
    }

    /// Apply an effect from the owner to the target, or to the owner when
    /// there is no other target.
    pub fn apply_to_target(&self, effect: &Arc<EffectDefinition>) -> bool {
        let Some(target) = self.target.as_ref().filter(|target| !Rc::ptr_eq(target, &self.owner)) else {
            return self.apply_to_owner(effect);
        };

        let owner = self.owner.borrow();
        let mut target = target.borrow_mut();
        let spec = owner.make_outgoing_spec(Arc::clone(effect), Some(self.level));
        owner.apply_effect_spec_to_target(spec, &mut target)
    }

    /// Recompute the owner's current values.
    pub fn update_owner_attributes(&self) {
        self.owner.borrow_mut().update_attribute_current_values();
    }
}

impl fmt::Debug for ActivationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivationContext")
            .field("ability", &self.ability)
            .field("definition", &self.definition.name)
            .field("level", &self.level)
            .field("has_target", &self.target.is_some())
            .finish()
    }
}

/// Resets the activation state however the sequence exits.
struct ActivationGuard {
    context: ActivationContext,
    behavior: Arc<dyn AbilityBehavior>,
    state: Rc<Cell<ActivationState>>,
    completed: bool,
}

impl ActivationGuard {
    fn transition(&self, state: ActivationState) {
        debug!(ability = %self.context.ability, from = ?self.state.get(), to = ?state, "activation state");
        self.state.set(state);
    }
}

impl Drop for ActivationGuard {
    fn drop(&mut self) {
        if !self.completed {
            debug!(ability = %self.context.ability, state = ?self.state.get(), "activation cancelled");
            self.behavior.cancel(&self.context);
        }
        self.state.set(ActivationState::Inactive);
    }
}

/// Try to activate an ability with the owner as target.
pub async fn try_activate_ability(owner: SharedCharacter, ability: AbilityId) -> ActivationOutcome {
    activate(owner, ability, None).await
}

/// Try to activate an ability against an explicit target.
pub async fn try_activate_ability_on(
    owner: SharedCharacter,
    ability: AbilityId,
    target: SharedCharacter,
) -> ActivationOutcome {
    activate(owner, ability, Some(target)).await
}

/// Try to activate an ability, returning a handle that cancels it.
///
/// An aborted activation resolves to `Err(Aborted)`.
pub fn try_activate_ability_abortable(
    owner: SharedCharacter,
    ability: AbilityId,
) -> (Abortable<impl Future<Output = ActivationOutcome>>, AbortHandle) {
    abortable(try_activate_ability(owner, ability))
}

async fn activate(owner: SharedCharacter, ability: AbilityId, target: Option<SharedCharacter>) -> ActivationOutcome {
    let (definition, level, state) = {
        let character = owner.borrow();
        let Some(spec) = character.ability(ability) else {
            debug!(character = %character.id(), %ability, "ability not granted");
            return ActivationOutcome::NotGranted;
        };

        let target_character = target.as_ref().map(|target| target.borrow());
        if !spec.can_activate(&character, target_character.as_deref()) {
            debug!(character = %character.id(), %ability, "activation blocked");
            return ActivationOutcome::Blocked;
        }
        (Arc::clone(spec.definition()), spec.level(), Rc::clone(&spec.activation))
    };

    let behavior = Arc::clone(&definition.behavior);
    let mut guard = ActivationGuard {
        context: ActivationContext {
            owner,
            target,
            ability,
            definition,
            level,
        },
        behavior: Arc::clone(&behavior),
        state,
        completed: false,
    };

    guard.transition(ActivationState::Validating);
    behavior.pre_start(&mut guard.context).await;

    guard.transition(ActivationState::Running);
    behavior.start(&mut guard.context).await;

    guard.transition(ActivationState::Ending);
    guard.completed = true;
    drop(guard);

    ActivationOutcome::Completed
}
