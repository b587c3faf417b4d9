//! Effect specs: live instances of effect definitions.

use std::sync::Arc;

use smallvec::SmallVec;

use super::definition::EffectDefinition;
use super::magnitude::{MagnitudeCalculation, MagnitudeContext};
use crate::attributes::{AttributeId, AttributeSystem, AttributeValue};
use crate::core::CharacterId;

/// The character creating a spec, with its attributes at that moment.
#[derive(Clone, Copy, Debug)]
pub struct SpecSource<'a> {
    /// Who creates the spec.
    pub id: CharacterId,
    /// Their attributes, read by snapshotting magnitudes.
    pub attributes: &'a AttributeSystem,
}

impl<'a> SpecSource<'a> {
    /// Create a source.
    #[must_use]
    pub fn new(id: CharacterId, attributes: &'a AttributeSystem) -> Self {
        Self { id, attributes }
    }
}

/// A runtime instance of an effect bound to one application.
///
/// Source and target are plain `CharacterId`s; the spec never keeps
/// either character alive. A spec is created per application and never
/// reused.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use rust_gas::effects::{EffectDefinition, EffectSpec};
///
/// let regen = Arc::new(EffectDefinition::has_duration("Regen", 4.0).with_period(2.0, true));
/// let mut spec = EffectSpec::new(regen, None, 1.0);
///
/// assert_eq!(spec.duration_remaining(), 4.0);
/// assert!(spec.tick_periodic(0.5));
/// assert!(!spec.tick_periodic(0.5));
/// ```
#[derive(Clone, Debug)]
pub struct EffectSpec {
    definition: Arc<EffectDefinition>,
    source: Option<CharacterId>,
    target: Option<CharacterId>,
    level: f32,
    duration_remaining: f32,
    total_duration: f32,
    time_until_period_tick: f32,
    captured_source_attributes: SmallVec<[AttributeValue; 2]>,
}

impl EffectSpec {
    /// Instantiate `definition`.
    ///
    /// Runs every modifier's initialization hook (source snapshots are
    /// taken here), then computes the duration and primes the period.
    pub fn new(definition: Arc<EffectDefinition>, source: Option<SpecSource<'_>>, level: f32) -> Self {
        let mut spec = Self {
            definition: Arc::clone(&definition),
            source: source.map(|source| source.id),
            target: None,
            level,
            duration_remaining: 0.0,
            total_duration: 0.0,
            time_until_period_tick: 0.0,
            captured_source_attributes: SmallVec::new(),
        };
        let source_attributes = source.map(|source| source.attributes);

        for modifier in &definition.modifiers {
            modifier.magnitude.initialize(&mut spec, source_attributes);
        }

        if let Some(duration) = &definition.duration_magnitude {
            duration.initialize(&mut spec, source_attributes);
            let context = MagnitudeContext::new(source_attributes, None);
            let seconds = duration.calculate(&spec, &context) * definition.duration_multiplier;
            spec.duration_remaining = seconds;
            spec.total_duration = seconds;
        }

        if let Some(period) = definition.period {
            spec.time_until_period_tick = if period.execute_on_application {
                0.0
            } else {
                period.interval
            };
        }

        spec
    }

    /// The definition this spec instantiates.
    #[must_use]
    pub fn definition(&self) -> &Arc<EffectDefinition> {
        &self.definition
    }

    /// Who created the spec.
    #[must_use]
    pub fn source(&self) -> Option<CharacterId> {
        self.source
    }

    /// Who the spec was applied to.
    #[must_use]
    pub fn target(&self) -> Option<CharacterId> {
        self.target
    }

    /// Set the target.
    pub fn set_target(&mut self, target: CharacterId) {
        self.target = Some(target);
    }

    /// Level used by level-scaled magnitudes.
    #[must_use]
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Set the level.
    pub fn set_level(&mut self, level: f32) {
        self.level = level;
    }

    /// Seconds left before a `HasDuration` effect expires.
    #[must_use]
    pub fn duration_remaining(&self) -> f32 {
        self.duration_remaining
    }

    /// Duration the spec started with.
    #[must_use]
    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }

    /// Seconds until the next periodic execution.
    #[must_use]
    pub fn time_until_period_tick(&self) -> f32 {
        self.time_until_period_tick
    }

    /// Overwrite the remaining duration.
    pub fn set_duration(&mut self, seconds: f32) {
        self.duration_remaining = seconds;
    }

    /// Overwrite the total duration.
    pub fn set_total_duration(&mut self, seconds: f32) {
        self.total_duration = seconds;
    }

    /// Age the spec by `dt` seconds.
    pub fn update_remaining_duration(&mut self, dt: f32) {
        self.duration_remaining -= dt;
    }

    /// Advance the period by `dt` seconds.
    ///
    /// Returns `true` when the periodic execution is due. The countdown
    /// restarts at the interval; a non-positive interval never fires.
    pub fn tick_periodic(&mut self, dt: f32) -> bool {
        let Some(period) = self.definition.period else {
            return false;
        };

        self.time_until_period_tick -= dt;
        if self.time_until_period_tick <= 0.0 {
            self.time_until_period_tick = period.interval;
            return period.interval > 0.0;
        }
        false
    }

    /// Store a snapshot of a source attribute, replacing an earlier one.
    pub fn capture_source_attribute(&mut self, value: AttributeValue) {
        match self
            .captured_source_attributes
            .iter_mut()
            .find(|captured| captured.attribute == value.attribute)
        {
            Some(captured) => *captured = value,
            None => self.captured_source_attributes.push(value),
        }
    }

    /// Get a snapshot taken at creation.
    #[must_use]
    pub fn captured_source_attribute(&self, attribute: AttributeId) -> Option<&AttributeValue> {
        self.captured_source_attributes
            .iter()
            .find(|captured| captured.attribute == attribute)
    }
}
