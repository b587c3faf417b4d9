//! # rust-gas
//!
//! A data-driven gameplay effect, attribute and ability engine.
//!
//! ## Design Principles
//!
//! 1. **Content-Driven**: Attributes, tags, effects and abilities are data.
//!    Games register names at startup and build definitions from them.
//!
//! 2. **Character-Local**: Each character owns its attribute table and
//!    active effects. Other characters are referred to by ID only.
//!
//! 3. **Deterministic Ticks**: Every tick resets, accumulates, recomputes,
//!    ages and culls in a fixed order, so the same inputs always produce
//!    the same attribute values.
//!
//! ## Architecture
//!
//! - **Base vs. current**: Instant effects write base values. Durational
//!   effects contribute deltas fixed at application time, folded into
//!   current values every tick.
//!
//! - **Suspendable activation**: Abilities activate as futures. Dropping
//!   (or aborting) one cancels it and always returns the ability to the
//!   inactive state.
//!
//! ## Modules
//!
//! - `core`: Character IDs, configuration, errors
//! - `tags`: Hierarchical tags and require/ignore requirements
//! - `attributes`: Attribute values, modifiers and per-character tables
//! - `effects`: Effect definitions, magnitudes, specs and resolution
//! - `character`: Effect application and the per-frame tick
//! - `abilities`: Gating and activation

pub mod core;
pub mod tags;
pub mod attributes;
pub mod effects;
pub mod character;
pub mod abilities;

// Re-export commonly used types
pub use crate::core::{
    CharacterId,
    EngineConfig, CharacterConfig, AttributeInit,
    ConfigError, DefinitionError,
};

pub use crate::tags::{TagId, TagRegistry, TagRequirements, TagSet};

pub use crate::attributes::{
    AttributeId, AttributeRegistry, AttributeSystem,
    AttributeValue, AttributeModifier, AttributeChange,
    AttributeEventHandler, ClampAttribute,
};

pub use crate::effects::{
    DurationPolicy, ModifierOperator,
    EffectDefinition, EffectModifier, EffectTags,
    Magnitude, Curve, MagnitudeCalculation,
    EffectSpec, AppliedEffect, EffectResolver,
};

pub use crate::character::{Character, SharedCharacter, TickSummary};

pub use crate::abilities::{
    AbilityDefinition, AbilityTags, AbilityBehavior, ActivationContext,
    AbilityId, AbilitySpec, ActivationState, ActivationOutcome, CooldownTime,
    SimpleAbility, InitializeStatsAbility,
    try_activate_ability, try_activate_ability_on, try_activate_ability_abortable,
};
