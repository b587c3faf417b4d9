//! Granted abilities.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::definition::AbilityDefinition;
use crate::core::CharacterId;

/// Identifies a granted ability on its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AbilityId(pub u32);

impl AbilityId {
    /// Create a new ability ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for AbilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ability({})", self.0)
    }
}

/// Phase of an ability's activation sequence.
///
/// `Inactive → Validating → Running → Ending → Inactive`. Any state other
/// than `Inactive` counts as active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivationState {
    /// Not activated.
    #[default]
    Inactive,
    /// Gating passed; the pre-start step is running.
    Validating,
    /// The main step is running.
    Running,
    /// The main step finished; about to become inactive.
    Ending,
}

/// Remaining cooldown of an ability.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CooldownTime {
    /// Seconds left. Infinite when a matching effect never expires.
    pub time_remaining: f32,
    /// Duration the matching effect started with.
    pub total_duration: f32,
}

impl CooldownTime {
    /// Check whether the ability is off cooldown.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.time_remaining <= 0.0
    }
}

/// An ability granted to a character.
///
/// The activation state is shared with any in-flight activation, which
/// resets it when it finishes or is dropped.
#[derive(Clone, Debug)]
pub struct AbilitySpec {
    id: AbilityId,
    definition: Arc<AbilityDefinition>,
    owner: CharacterId,
    level: f32,
    pub(crate) activation: Rc<Cell<ActivationState>>,
}

impl AbilitySpec {
    /// Create an inactive ability.
    #[must_use]
    pub fn new(id: AbilityId, definition: Arc<AbilityDefinition>, owner: CharacterId, level: f32) -> Self {
        Self {
            id,
            definition,
            owner,
            level,
            activation: Rc::new(Cell::new(ActivationState::Inactive)),
        }
    }

    /// The ability's ID on its owner.
    #[must_use]
    pub fn id(&self) -> AbilityId {
        self.id
    }

    /// The definition.
    #[must_use]
    pub fn definition(&self) -> &Arc<AbilityDefinition> {
        &self.definition
    }

    /// The owning character.
    #[must_use]
    pub fn owner(&self) -> CharacterId {
        self.owner
    }

    /// Level of the specs this ability creates.
    #[must_use]
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Current activation phase.
    #[must_use]
    pub fn state(&self) -> ActivationState {
        self.activation.get()
    }

    /// Check whether an activation is in flight.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state() != ActivationState::Inactive
    }
}
