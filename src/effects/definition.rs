//! Effect definitions.
//!
//! An `EffectDefinition` is immutable content: what an effect modifies, for
//! how long, how often it repeats and which tags it grants or requires.
//! Definitions are shared behind `Arc` and instantiated as
//! [`EffectSpec`](super::EffectSpec)s when applied.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::magnitude::{Magnitude, MagnitudeCalculation, MagnitudeContext};
use super::spec::EffectSpec;
use crate::attributes::AttributeId;
use crate::core::DefinitionError;
use crate::tags::{TagId, TagRequirements};

/// How long an effect lasts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationPolicy {
    /// Applied once to base values; never registered.
    Instant,
    /// Registered until its duration runs out.
    HasDuration,
    /// Registered until removed by tag.
    Infinite,
}

/// How a modifier combines with an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierOperator {
    /// Add the magnitude.
    Add,
    /// Instant: multiply the base. Durational: add to the summed multiplier.
    Multiply,
    /// Replace the value.
    Override,
}

fn default_multiplier() -> f32 {
    1.0
}

/// One attribute modification.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EffectModifier {
    /// Attribute to modify.
    pub attribute: AttributeId,
    /// How to modify it.
    pub operator: ModifierOperator,
    /// Size of the modification.
    pub magnitude: Magnitude,
    /// Scales the magnitude.
    #[serde(default = "default_multiplier")]
    pub multiplier: f32,
}

impl EffectModifier {
    /// Create a modifier with a multiplier of one.
    pub fn new(attribute: AttributeId, operator: ModifierOperator, magnitude: Magnitude) -> Self {
        Self {
            attribute,
            operator,
            magnitude,
            multiplier: 1.0,
        }
    }

    /// A constant additive modifier.
    pub fn add(attribute: AttributeId, amount: f32) -> Self {
        Self::new(attribute, ModifierOperator::Add, Magnitude::Constant(amount))
    }

    /// A constant multiplicative modifier.
    pub fn multiply(attribute: AttributeId, amount: f32) -> Self {
        Self::new(attribute, ModifierOperator::Multiply, Magnitude::Constant(amount))
    }

    /// A constant overriding modifier.
    pub fn override_with(attribute: AttributeId, value: f32) -> Self {
        Self::new(attribute, ModifierOperator::Override, Magnitude::Constant(value))
    }

    /// Set the multiplier (builder pattern).
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Magnitude times multiplier.
    #[must_use]
    pub fn evaluate(&self, spec: &EffectSpec, context: &MagnitudeContext<'_>) -> f32 {
        self.magnitude.calculate(spec, context) * self.multiplier
    }
}

/// Periodic execution settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectPeriod {
    /// Seconds between executions. Non-positive means never.
    pub interval: f32,
    /// Execute on the tick the effect is applied.
    #[serde(default)]
    pub execute_on_application: bool,
}

/// Tags an effect carries, grants and checks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectTags {
    /// Identifies the effect itself.
    #[serde(default)]
    pub asset_tag: Option<TagId>,

    /// Granted to the target while the effect is active.
    #[serde(default)]
    pub granted_tags: SmallVec<[TagId; 4]>,

    /// Checked against the target when the effect is applied.
    #[serde(default)]
    pub application_requirements: TagRequirements,

    /// While unmet, the effect stays registered but contributes nothing.
    #[serde(default)]
    pub ongoing_requirements: TagRequirements,

    /// Once met, the effect is removed.
    #[serde(default)]
    pub removal_requirements: TagRequirements,

    /// Active effects carrying any of these tags are removed on application.
    #[serde(default)]
    pub remove_effects_with_tag: SmallVec<[TagId; 4]>,
}

impl EffectTags {
    /// Check whether the asset tag or any granted tag is in `tags`.
    #[must_use]
    pub fn has_any(&self, tags: &[TagId]) -> bool {
        self.asset_tag.is_some_and(|asset| tags.contains(&asset))
            || self.granted_tags.iter().any(|granted| tags.contains(granted))
    }
}

/// An effect applied alongside another when the source has certain tags.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConditionalEffect {
    /// Effect to apply.
    pub effect: Arc<EffectDefinition>,
    /// Tags the source must have.
    #[serde(default)]
    pub required_source_tags: SmallVec<[TagId; 4]>,
}

/// Immutable effect configuration.
///
/// ## Example
///
/// ```
/// use rust_gas::attributes::AttributeId;
/// use rust_gas::effects::{DurationPolicy, EffectDefinition, EffectModifier};
///
/// let armor = AttributeId::new(3);
/// let buff = EffectDefinition::has_duration("Stoneskin", 10.0)
///     .with_modifier(EffectModifier::add(armor, 25.0));
///
/// assert_eq!(buff.duration_policy, DurationPolicy::HasDuration);
/// assert!(buff.validate().is_ok());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EffectDefinition {
    /// Display name, used in logs and errors.
    pub name: String,

    /// Lifetime of the effect.
    pub duration_policy: DurationPolicy,

    /// Duration in seconds, for `HasDuration`.
    #[serde(default)]
    pub duration_magnitude: Option<Magnitude>,

    /// Scales the duration magnitude.
    #[serde(default = "default_multiplier")]
    pub duration_multiplier: f32,

    /// Periodic execution, for durational effects.
    #[serde(default)]
    pub period: Option<EffectPeriod>,

    /// Attribute modifications, applied in order.
    #[serde(default)]
    pub modifiers: Vec<EffectModifier>,

    /// Tag behaviour.
    #[serde(default)]
    pub tags: EffectTags,

    /// Effects applied alongside this one.
    #[serde(default)]
    pub conditional_effects: Vec<ConditionalEffect>,
}

impl EffectDefinition {
    fn with_policy(name: impl Into<String>, duration_policy: DurationPolicy) -> Self {
        Self {
            name: name.into(),
            duration_policy,
            duration_magnitude: None,
            duration_multiplier: 1.0,
            period: None,
            modifiers: Vec::new(),
            tags: EffectTags::default(),
            conditional_effects: Vec::new(),
        }
    }

    /// An instant effect.
    pub fn instant(name: impl Into<String>) -> Self {
        Self::with_policy(name, DurationPolicy::Instant)
    }

    /// An effect lasting `seconds`.
    pub fn has_duration(name: impl Into<String>, seconds: f32) -> Self {
        Self::with_policy(name, DurationPolicy::HasDuration).with_duration(Magnitude::Constant(seconds))
    }

    /// An effect lasting until removed.
    pub fn infinite(name: impl Into<String>) -> Self {
        Self::with_policy(name, DurationPolicy::Infinite)
    }

    /// Add a modifier (builder pattern).
    #[must_use]
    pub fn with_modifier(mut self, modifier: EffectModifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Set the duration magnitude.
    #[must_use]
    pub fn with_duration(mut self, duration: Magnitude) -> Self {
        self.duration_magnitude = Some(duration);
        self
    }

    /// Set the duration multiplier.
    #[must_use]
    pub fn with_duration_multiplier(mut self, multiplier: f32) -> Self {
        self.duration_multiplier = multiplier;
        self
    }

    /// Execute every `interval` seconds.
    #[must_use]
    pub fn with_period(mut self, interval: f32, execute_on_application: bool) -> Self {
        self.period = Some(EffectPeriod {
            interval,
            execute_on_application,
        });
        self
    }

    /// Set the asset tag.
    #[must_use]
    pub fn with_asset_tag(mut self, tag: TagId) -> Self {
        self.tags.asset_tag = Some(tag);
        self
    }

    /// Grant a tag while active.
    #[must_use]
    pub fn with_granted_tag(mut self, tag: TagId) -> Self {
        self.tags.granted_tags.push(tag);
        self
    }

    /// Set the application requirements.
    #[must_use]
    pub fn with_application_requirements(mut self, requirements: TagRequirements) -> Self {
        self.tags.application_requirements = requirements;
        self
    }

    /// Set the ongoing requirements.
    #[must_use]
    pub fn with_ongoing_requirements(mut self, requirements: TagRequirements) -> Self {
        self.tags.ongoing_requirements = requirements;
        self
    }

    /// Set the removal requirements.
    #[must_use]
    pub fn with_removal_requirements(mut self, requirements: TagRequirements) -> Self {
        self.tags.removal_requirements = requirements;
        self
    }

    /// Remove active effects carrying `tag` on application.
    #[must_use]
    pub fn with_remove_effects_with_tag(mut self, tag: TagId) -> Self {
        self.tags.remove_effects_with_tag.push(tag);
        self
    }

    /// Apply `effect` alongside this one when the source has every required tag.
    #[must_use]
    pub fn with_conditional_effect(
        mut self,
        effect: Arc<EffectDefinition>,
        required_source_tags: impl IntoIterator<Item = TagId>,
    ) -> Self {
        self.conditional_effects.push(ConditionalEffect {
            effect,
            required_source_tags: required_source_tags.into_iter().collect(),
        });
        self
    }

    /// Check if this is an instant effect.
    #[must_use]
    pub fn is_instant(&self) -> bool {
        self.duration_policy == DurationPolicy::Instant
    }

    /// Check the definition for content mistakes.
    ///
    /// Conditional effects are validated too.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        let effect = || self.name.clone();

        if self.duration_policy == DurationPolicy::HasDuration && self.duration_magnitude.is_none() {
            return Err(DefinitionError::MissingDuration { effect: effect() });
        }
        if self.is_instant() && self.period.is_some() {
            return Err(DefinitionError::PeriodicInstant { effect: effect() });
        }

        let finite = self.duration_multiplier.is_finite()
            && self.modifiers.iter().all(|modifier| modifier.multiplier.is_finite());
        if !finite {
            return Err(DefinitionError::NonFiniteMultiplier { effect: effect() });
        }

        for conditional in &self.conditional_effects {
            conditional.effect.validate()?;
        }
        Ok(())
    }
}
