//! Error types for the configuration boundary.
//!
//! Gameplay outcomes (an effect failing its tag requirements, an ability
//! blocked by cost or cooldown) are ordinary `bool`/enum results and never
//! errors. The types here only describe malformed input handed to the
//! engine by whoever loads definitions and configuration.

use thiserror::Error;

/// Errors produced while loading or building configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The same attribute name was declared twice.
    #[error("attribute `{0}` is declared more than once")]
    DuplicateAttribute(String),

    /// A character configuration referenced an attribute that was never declared.
    #[error("unknown attribute `{0}`")]
    UnknownAttribute(String),

    /// A tag path was empty or contained an empty segment.
    #[error("invalid tag path `{0}`")]
    InvalidTagPath(String),

    /// The ancestor search limit must allow at least one step.
    #[error("tag search limit must be greater than zero")]
    ZeroSearchLimit,
}

/// Errors reported by definition validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefinitionError {
    /// A `HasDuration` effect has no duration magnitude, so it would expire immediately.
    #[error("effect `{effect}` has a finite duration but no duration magnitude")]
    MissingDuration {
        /// Name of the offending effect.
        effect: String,
    },

    /// Instant effects are never registered, so their period would never tick.
    #[error("effect `{effect}` is instant but declares a period")]
    PeriodicInstant {
        /// Name of the offending effect.
        effect: String,
    },

    /// A multiplier is NaN or infinite.
    #[error("effect `{effect}` has a non-finite multiplier")]
    NonFiniteMultiplier {
        /// Name of the offending effect.
        effect: String,
    },

    /// A cooldown effect must grant at least one tag to be detectable.
    #[error("cooldown effect `{effect}` of ability `{ability}` grants no tags")]
    CooldownWithoutTags {
        /// Name of the ability.
        ability: String,
        /// Name of the cooldown effect.
        effect: String,
    },
}
