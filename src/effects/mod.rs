//! Gameplay effects.
//!
//! Effects are the only way attributes change:
//! - `EffectDefinition`: Immutable content (modifiers, duration, period, tags)
//! - `Magnitude` / `Curve`: Strategies that size modifiers and durations
//! - `EffectSpec`: One application of a definition, aged every tick
//! - `AppliedEffect`: A registered durational spec with fixed deltas
//! - `EffectResolver`: Evaluates specs against attribute tables
//!
//! ## Duration policies
//!
//! Instant effects write base values once and are never registered.
//! `HasDuration` and `Infinite` effects are registered on the target and
//! contribute their deltas to current values every tick until they
//! expire or are removed by tag.

mod container;
mod definition;
mod magnitude;
mod resolver;
mod spec;

pub use container::{AppliedEffect, ModifierDelta};
pub use definition::{
    ConditionalEffect, DurationPolicy, EffectDefinition, EffectModifier, EffectPeriod, EffectTags,
    ModifierOperator,
};
pub use magnitude::{
    AttributeBackedMagnitude, CaptureFrom, CaptureWhen, Curve, CurvePoint, CustomCurve, Magnitude,
    MagnitudeCalculation, MagnitudeContext, ScalingFunction,
};
pub use resolver::{EffectResolver, SourceAccess};
pub use spec::{EffectSpec, SpecSource};
