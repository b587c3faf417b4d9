//! Core engine types: character IDs, configuration, errors.
//!
//! This module contains the game-agnostic building blocks shared by every
//! subsystem. Games configure the engine via `EngineConfig` and
//! `CharacterConfig` rather than modifying the core.

pub mod entity;
pub mod config;
pub mod error;

pub use entity::CharacterId;
pub use config::{AttributeInit, CharacterConfig, EngineConfig, DEFAULT_LEVEL};
pub use error::{ConfigError, DefinitionError};
