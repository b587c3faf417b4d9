//! Grantable, gated abilities.
//!
//! - `AbilityDefinition`: Immutable content (tags, cost, cooldown, behaviour)
//! - `AbilitySpec`: An ability granted to one character
//! - Gating: `AbilitySpec::can_activate` and its parts
//! - Activation: `try_activate_ability` and friends, driven as futures
//! - Built-in behaviours: `SimpleAbility`, `InitializeStatsAbility`

mod activation;
mod builtin;
mod definition;
mod gating;
mod spec;

pub use activation::{
    try_activate_ability, try_activate_ability_abortable, try_activate_ability_on, AbilityBehavior,
    ActivationContext, ActivationOutcome,
};
pub use builtin::{InitializeStatsAbility, SimpleAbility};
pub use definition::{AbilityDefinition, AbilityTags};
pub use spec::{AbilityId, AbilitySpec, ActivationState, CooldownTime};
