//! Hierarchical gameplay tags.
//!
//! Tags label effects and abilities ("Status.Stunned",
//! "Ability.Cooldown.Fireball") and drive every tag-based gate in the
//! engine:
//! - [`TagId`]: Opaque identifier for a tag (game-defined)
//! - [`TagRegistry`]: Names, parents and bounded ancestor search
//! - [`TagSet`]: The tags currently granted to a character
//! - [`TagRequirements`]: Require/ignore checks against a `TagSet`
//!
//! Gates compare tags by exact identity. The hierarchy is available to
//! games through [`TagRegistry::is_descendant_of`] and
//! [`TagRegistry::matches`].

mod requirements;
mod tag;

pub use requirements::{TagRequirements, TagSet};
pub use tag::{TagId, TagRegistry, DEFAULT_SEARCH_LIMIT};
