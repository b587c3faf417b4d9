//! Character attributes.
//!
//! Attributes are named numeric quantities (Health, Mana, AttackPower):
//! - [`AttributeRegistry`]: Name ↔ [`AttributeId`] lookup
//! - [`AttributeValue`]: Base value, derived current value, pending modifier
//! - [`AttributeSystem`]: One character's attribute table
//! - [`AttributeEventHandler`]: Post-recompute hooks such as [`ClampAttribute`]
//!
//! The base value is persistent and only instant effects change it. The
//! current value is derived every tick from the base value and the
//! modifiers contributed by active effects.

mod handler;
mod registry;
mod system;
mod value;

pub use handler::{AttributeEventHandler, ClampAttribute};
pub use registry::{AttributeId, AttributeRegistry};
pub use system::AttributeSystem;
pub use value::{AttributeChange, AttributeModifier, AttributeValue};
