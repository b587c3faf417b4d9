//! Character identification.
//!
//! Every character that owns attributes, effects and abilities has a
//! unique `CharacterId`. Effect specs refer to their source and target
//! through these IDs only: they are lookup keys, never owners.
//!
//! ```
//! use rust_gas::core::CharacterId;
//!
//! let hero = CharacterId::new(1);
//! assert_eq!(hero.raw(), 1);
//! assert_eq!(format!("{hero}"), "Character(1)");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(pub u32);

impl CharacterId {
    /// Create a new character ID.
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

impl From<u32> for CharacterId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Character({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_id() {
        let id = CharacterId::new(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(CharacterId::from(7), id);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CharacterId(42)), "Character(42)");
    }

    #[test]
    fn test_serialization() {
        let id = CharacterId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: CharacterId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
