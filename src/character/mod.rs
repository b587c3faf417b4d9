//! Characters: the owners of attributes, active effects and abilities.
//!
//! A `Character` exclusively owns its attribute table, its list of
//! registered effects and its granted abilities. Other characters are
//! only ever referred to by `CharacterId`. Abilities that suspend mid
//! activation share their owner through [`SharedCharacter`].
//!
//! - `application`: applying effect specs to self or to another character
//! - `tick`: the per-frame update

mod application;
mod tick;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use tracing::debug;

pub use tick::TickSummary;

use crate::abilities::{AbilityDefinition, AbilityId, AbilitySpec};
use crate::attributes::{AttributeChange, AttributeRegistry, AttributeSystem};
use crate::core::{CharacterConfig, CharacterId, ConfigError, DEFAULT_LEVEL};
use crate::effects::{AppliedEffect, EffectDefinition, EffectSpec, SpecSource};
use crate::tags::{TagId, TagSet};

/// A character shared with in-flight ability activations.
pub type SharedCharacter = Rc<RefCell<Character>>;

type AttributeListener = Box<dyn FnMut(&AttributeChange)>;

/// A character taking part in the simulation.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use rust_gas::attributes::AttributeId;
/// use rust_gas::character::Character;
/// use rust_gas::core::CharacterId;
/// use rust_gas::effects::{EffectDefinition, EffectModifier};
///
/// let health = AttributeId::new(0);
/// let mut hero = Character::new(CharacterId::new(1));
/// hero.attributes_mut().add_attribute(health, 10.0);
///
/// let heal = Arc::new(EffectDefinition::instant("Heal").with_modifier(EffectModifier::add(health, 5.0)));
/// let spec = hero.make_outgoing_spec(heal, None);
/// assert!(hero.apply_effect_spec_to_self(spec));
///
/// hero.tick(0.016);
/// assert_eq!(hero.attributes().current_value(health), Some(15.0));
/// ```
pub struct Character {
    id: CharacterId,
    level: f32,
    attributes: AttributeSystem,
    active_effects: Vec<AppliedEffect>,
    abilities: Vec<AbilitySpec>,
    next_ability_id: u32,
    listeners: Vec<AttributeListener>,
}

impl Character {
    /// Create a character with no attributes at the default level.
    #[must_use]
    pub fn new(id: CharacterId) -> Self {
        Self {
            id,
            level: DEFAULT_LEVEL,
            attributes: AttributeSystem::new(),
            active_effects: Vec::new(),
            abilities: Vec::new(),
            next_ability_id: 0,
            listeners: Vec::new(),
        }
    }

    /// Create a character from configuration.
    ///
    /// Every configured attribute name must be registered.
    pub fn from_config(
        id: CharacterId,
        config: &CharacterConfig,
        registry: &AttributeRegistry,
    ) -> Result<Self, ConfigError> {
        let mut character = Self::new(id);
        character.level = config.level;

        for init in &config.attributes {
            let attribute = registry
                .find(&init.name)
                .ok_or_else(|| ConfigError::UnknownAttribute(init.name.clone()))?;
            character.attributes.add_attribute(attribute, init.base);
        }

        debug!(character = %id, attributes = character.attributes.len(), "character created from config");
        Ok(character)
    }

    /// Wrap the character for sharing with ability activations.
    #[must_use]
    pub fn into_shared(self) -> SharedCharacter {
        Rc::new(RefCell::new(self))
    }

    /// The character's ID.
    #[must_use]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    /// Default level of outgoing specs.
    #[must_use]
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Set the level.
    pub fn set_level(&mut self, level: f32) {
        self.level = level;
    }

    /// The attribute table.
    #[must_use]
    pub fn attributes(&self) -> &AttributeSystem {
        &self.attributes
    }

    /// Mutable access to the attribute table.
    pub fn attributes_mut(&mut self) -> &mut AttributeSystem {
        &mut self.attributes
    }

    /// Registered durational effects, in application order.
    #[must_use]
    pub fn active_effects(&self) -> &[AppliedEffect] {
        &self.active_effects
    }

    /// Granted abilities, in grant order.
    #[must_use]
    pub fn abilities(&self) -> &[AbilitySpec] {
        &self.abilities
    }

    /// Union of the tags granted by active effects and active abilities.
    #[must_use]
    pub fn granted_tags(&self) -> TagSet {
        let mut tags: TagSet = self
            .active_effects
            .iter()
            .flat_map(|effect| effect.definition().tags.granted_tags.iter().copied())
            .collect();

        for ability in self.abilities.iter().filter(|ability| ability.is_active()) {
            tags.extend(ability.definition().tags.activation_owned_tags.iter().copied());
        }
        tags
    }

    /// Grant an ability at the character's level.
    pub fn grant_ability(&mut self, definition: Arc<AbilityDefinition>) -> AbilityId {
        self.grant_ability_at_level(definition, self.level)
    }

    /// Grant an ability at an explicit level.
    pub fn grant_ability_at_level(&mut self, definition: Arc<AbilityDefinition>, level: f32) -> AbilityId {
        let id = AbilityId::new(self.next_ability_id);
        self.next_ability_id += 1;

        debug!(character = %self.id, ability = %definition.name, %id, "ability granted");
        self.abilities.push(AbilitySpec::new(id, definition, self.id, level));
        id
    }

    /// Revoke every ability whose asset tag is `tag`.
    ///
    /// Returns the number of abilities removed. An activation already in
    /// flight runs to completion.
    pub fn remove_abilities_with_tag(&mut self, tag: TagId) -> usize {
        let before = self.abilities.len();
        self.abilities
            .retain(|ability| ability.definition().tags.asset_tag != Some(tag));

        let removed = before - self.abilities.len();
        if removed > 0 {
            debug!(character = %self.id, %tag, removed, "abilities removed");
        }
        removed
    }

    /// Look up a granted ability.
    #[must_use]
    pub fn ability(&self, id: AbilityId) -> Option<&AbilitySpec> {
        self.abilities.iter().find(|ability| ability.id() == id)
    }

    /// Create a spec with this character as its source.
    ///
    /// Source snapshots are taken from the current attribute values.
    /// `level` defaults to the character's level.
    #[must_use]
    pub fn make_outgoing_spec(&self, definition: Arc<EffectDefinition>, level: Option<f32>) -> EffectSpec {
        EffectSpec::new(
            definition,
            Some(SpecSource::new(self.id, &self.attributes)),
            level.unwrap_or(self.level),
        )
    }

    /// Subscribe to attribute change notifications.
    pub fn on_attribute_changed(&mut self, listener: impl FnMut(&AttributeChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Recompute current values outside the tick and notify subscribers.
    ///
    /// Uses the modifiers accumulated by the last tick.
    pub fn update_attribute_current_values(&mut self) -> Vec<AttributeChange> {
        let changes = self.attributes.recompute_current_values();
        self.notify(&changes);
        changes
    }

    fn notify(&mut self, changes: &[AttributeChange]) {
        for change in changes {
            for listener in &mut self.listeners {
                listener(change);
            }
        }
    }
}

impl fmt::Debug for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Character")
            .field("id", &self.id)
            .field("level", &self.level)
            .field("attributes", &self.attributes)
            .field("active_effects", &self.active_effects.len())
            .field("abilities", &self.abilities)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
