//! Ability definitions.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::activation::AbilityBehavior;
use super::builtin::SimpleAbility;
use crate::core::DefinitionError;
use crate::effects::EffectDefinition;
use crate::tags::{TagId, TagRequirements};

/// Tags an ability carries, checks and grants.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AbilityTags {
    /// Identifies the ability; used by blocking and tag-based removal.
    #[serde(default)]
    pub asset_tag: Option<TagId>,

    /// Checked against the owner's granted tags.
    #[serde(default)]
    pub owner_requirements: TagRequirements,

    /// Checked against the source's granted tags (the owner).
    #[serde(default)]
    pub source_requirements: TagRequirements,

    /// Checked against the activation target's granted tags.
    #[serde(default)]
    pub target_requirements: TagRequirements,

    /// While this ability is active, abilities with these asset tags are blocked.
    #[serde(default)]
    pub block_abilities_with_tags: SmallVec<[TagId; 4]>,

    /// Granted to the owner while this ability is active.
    #[serde(default)]
    pub activation_owned_tags: SmallVec<[TagId; 4]>,
}

impl AbilityTags {
    /// Create empty tags.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the asset tag.
    #[must_use]
    pub fn with_asset_tag(mut self, tag: TagId) -> Self {
        self.asset_tag = Some(tag);
        self
    }

    /// Set the owner requirements.
    #[must_use]
    pub fn with_owner_requirements(mut self, requirements: TagRequirements) -> Self {
        self.owner_requirements = requirements;
        self
    }

    /// Set the source requirements.
    #[must_use]
    pub fn with_source_requirements(mut self, requirements: TagRequirements) -> Self {
        self.source_requirements = requirements;
        self
    }

    /// Set the target requirements.
    #[must_use]
    pub fn with_target_requirements(mut self, requirements: TagRequirements) -> Self {
        self.target_requirements = requirements;
        self
    }

    /// Block abilities with `tag` while active.
    #[must_use]
    pub fn blocking(mut self, tag: TagId) -> Self {
        self.block_abilities_with_tags.push(tag);
        self
    }

    /// Grant `tag` to the owner while active.
    #[must_use]
    pub fn with_activation_owned_tag(mut self, tag: TagId) -> Self {
        self.activation_owned_tags.push(tag);
        self
    }
}

/// Immutable ability configuration.
///
/// The behaviour decides what activation does; cost and cooldown are
/// checked by gating before it runs and applied by the behaviour.
#[derive(Clone, Debug)]
pub struct AbilityDefinition {
    /// Display name.
    pub name: String,
    /// Tag behaviour.
    pub tags: AbilityTags,
    /// Effect paying for the activation.
    pub cost: Option<Arc<EffectDefinition>>,
    /// Effect whose granted tags mark the ability as cooling down.
    pub cooldown: Option<Arc<EffectDefinition>>,
    /// The activation sequence.
    pub behavior: Arc<dyn AbilityBehavior>,
}

impl AbilityDefinition {
    /// Create an ability with a behaviour and no cost or cooldown.
    pub fn new(name: impl Into<String>, behavior: impl AbilityBehavior + 'static) -> Self {
        Self {
            name: name.into(),
            tags: AbilityTags::default(),
            cost: None,
            cooldown: None,
            behavior: Arc::new(behavior),
        }
    }

    /// Create an ability applying one effect to its owner.
    pub fn simple(name: impl Into<String>, effect: Arc<EffectDefinition>) -> Self {
        Self::new(name, SimpleAbility::new(effect))
    }

    /// Set the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: AbilityTags) -> Self {
        self.tags = tags;
        self
    }

    /// Set the cost effect.
    #[must_use]
    pub fn with_cost(mut self, cost: Arc<EffectDefinition>) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Set the cooldown effect.
    #[must_use]
    pub fn with_cooldown(mut self, cooldown: Arc<EffectDefinition>) -> Self {
        self.cooldown = Some(cooldown);
        self
    }

    /// Validate the cost and cooldown effects.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if let Some(cost) = &self.cost {
            cost.validate()?;
        }
        if let Some(cooldown) = &self.cooldown {
            cooldown.validate()?;
            if cooldown.tags.granted_tags.is_empty() {
                return Err(DefinitionError::CooldownWithoutTags {
                    ability: self.name.clone(),
                    effect: cooldown.name.clone(),
                });
            }
        }
        Ok(())
    }
}
