//! Magnitude strategies.
//!
//! A modifier's size comes from a [`Magnitude`]: a constant, a curve over
//! the spec's level, a curve over a captured attribute, or any custom
//! [`MagnitudeCalculation`]. Curves are the opaque `f(x) -> f32` scaling
//! functions supplied by content; a few common shapes are built in.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::attributes::{AttributeId, AttributeSystem, AttributeValue};

use super::spec::EffectSpec;

/// Attribute tables visible while a magnitude is calculated.
///
/// Either side may be unavailable, for example the source of a spec that
/// was applied by a character the target cannot see. Missing tables and
/// missing attributes read as zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct MagnitudeContext<'a> {
    /// Attributes of the character that created the spec.
    pub source: Option<&'a AttributeSystem>,
    /// Attributes of the character the spec is applied to.
    pub target: Option<&'a AttributeSystem>,
}

impl<'a> MagnitudeContext<'a> {
    /// Create a context.
    #[must_use]
    pub fn new(source: Option<&'a AttributeSystem>, target: Option<&'a AttributeSystem>) -> Self {
        Self { source, target }
    }
}

/// A magnitude strategy.
pub trait MagnitudeCalculation: fmt::Debug + Send + Sync {
    /// Called once when a spec is created, before its duration is computed.
    ///
    /// Strategies that snapshot source attributes do it here.
    fn initialize(&self, _spec: &mut EffectSpec, _source: Option<&AttributeSystem>) {}

    /// Calculate the magnitude for `spec`.
    fn calculate(&self, spec: &EffectSpec, context: &MagnitudeContext<'_>) -> f32;
}

/// An opaque `f(x) -> f32` supplied in code.
pub trait ScalingFunction: Send + Sync {
    /// Evaluate at `x`.
    fn evaluate(&self, x: f32) -> f32;
}

impl<F> ScalingFunction for F
where
    F: Fn(f32) -> f32 + Send + Sync,
{
    fn evaluate(&self, x: f32) -> f32 {
        self(x)
    }
}

/// A user-supplied scaling function.
#[derive(Clone)]
pub struct CustomCurve(pub Arc<dyn ScalingFunction>);

impl fmt::Debug for CustomCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomCurve(..)")
    }
}

/// A control point of a piecewise-linear curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Input.
    pub x: f32,
    /// Output.
    pub y: f32,
}

/// Scaling function `f(x) -> f32`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Curve {
    /// `f(x) = x`.
    Identity,

    /// `f(x) = c`.
    Constant(f32),

    /// `f(x) = slope * x + intercept`.
    Linear { slope: f32, intercept: f32 },

    /// Piecewise-linear through points sorted by `x`, clamped at both ends.
    /// An empty curve evaluates to zero.
    Points(Vec<CurvePoint>),

    /// Arbitrary function supplied in code.
    #[serde(skip)]
    Custom(CustomCurve),
}

impl Curve {
    /// Create a linear curve.
    pub fn linear(slope: f32, intercept: f32) -> Self {
        Self::Linear { slope, intercept }
    }

    /// Create a piecewise-linear curve from `(x, y)` pairs.
    pub fn points(points: impl IntoIterator<Item = (f32, f32)>) -> Self {
        let mut points: Vec<_> = points.into_iter().map(|(x, y)| CurvePoint { x, y }).collect();
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self::Points(points)
    }

    /// Wrap a closure.
    pub fn custom(f: impl Fn(f32) -> f32 + Send + Sync + 'static) -> Self {
        Self::Custom(CustomCurve(Arc::new(f)))
    }

    /// Evaluate the curve.
    #[must_use]
    pub fn evaluate(&self, x: f32) -> f32 {
        match self {
            Curve::Identity => x,
            Curve::Constant(c) => *c,
            Curve::Linear { slope, intercept } => slope * x + intercept,
            Curve::Points(points) => evaluate_points(points, x),
            Curve::Custom(CustomCurve(f)) => f.evaluate(x),
        }
    }
}

fn evaluate_points(points: &[CurvePoint], x: f32) -> f32 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return 0.0;
    };
    if x <= first.x {
        return first.y;
    }
    if x >= last.x {
        return last.y;
    }

    for window in points.windows(2) {
        let (a, b) = (window[0], window[1]);
        if x <= b.x {
            let span = b.x - a.x;
            if span <= 0.0 {
                return b.y;
            }
            return a.y + (b.y - a.y) * (x - a.x) / span;
        }
    }
    last.y
}

/// Which character an attribute is captured from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureFrom {
    /// The character that created the spec.
    Source,
    /// The character the spec is applied to.
    Target,
}

/// When an attribute is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureWhen {
    /// Snapshot when the spec is created. Only meaningful for the source.
    OnApplication,
    /// Read live whenever the magnitude is calculated.
    OnExecution,
}

/// Magnitude derived from an attribute value through a curve.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttributeBackedMagnitude {
    /// Attribute to read.
    pub attribute: AttributeId,
    /// Character to read it from.
    pub capture_from: CaptureFrom,
    /// When to read it.
    pub capture_when: CaptureWhen,
    /// Applied to the attribute's current value.
    pub curve: Curve,
}

impl AttributeBackedMagnitude {
    fn snapshots(&self) -> bool {
        self.capture_from == CaptureFrom::Source && self.capture_when == CaptureWhen::OnApplication
    }
}

impl MagnitudeCalculation for AttributeBackedMagnitude {
    fn initialize(&self, spec: &mut EffectSpec, source: Option<&AttributeSystem>) {
        if self.capture_from != CaptureFrom::Source {
            return;
        }
        // Live reads fall back to this value when the source is unreachable.
        if !self.snapshots() && source.is_none() {
            return;
        }
        let captured = source
            .and_then(|attributes| attributes.get(self.attribute))
            .unwrap_or_else(|| AttributeValue::zero(self.attribute));
        spec.capture_source_attribute(captured);
    }

    fn calculate(&self, spec: &EffectSpec, context: &MagnitudeContext<'_>) -> f32 {
        let captured = || spec.captured_source_attribute(self.attribute).copied();
        let value = match (self.capture_from, self.capture_when) {
            (CaptureFrom::Source, CaptureWhen::OnApplication) => captured(),
            (CaptureFrom::Source, CaptureWhen::OnExecution) => context
                .source
                .and_then(|attributes| attributes.get(self.attribute))
                .or_else(captured),
            (CaptureFrom::Target, _) => context.target.and_then(|attributes| attributes.get(self.attribute)),
        };

        let current = value.map_or(0.0, |value| value.current_value);
        self.curve.evaluate(current)
    }
}

/// How big a modifier (or a duration) is.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Magnitude {
    /// A fixed value.
    Constant(f32),

    /// A curve evaluated at the spec's level.
    LevelScaled(Curve),

    /// A curve evaluated at an attribute's current value.
    AttributeBacked(AttributeBackedMagnitude),

    /// Any strategy supplied in code.
    #[serde(skip)]
    Custom(Arc<dyn MagnitudeCalculation>),
}

impl Magnitude {
    /// Magnitude read from the source's attribute, snapshotted at creation.
    pub fn source_attribute(attribute: AttributeId, curve: Curve) -> Self {
        Self::AttributeBacked(AttributeBackedMagnitude {
            attribute,
            capture_from: CaptureFrom::Source,
            capture_when: CaptureWhen::OnApplication,
            curve,
        })
    }

    /// Magnitude read from the source's attribute whenever it is calculated.
    ///
    /// When the source cannot be reached, the value captured at creation is used.
    pub fn live_source_attribute(attribute: AttributeId, curve: Curve) -> Self {
        Self::AttributeBacked(AttributeBackedMagnitude {
            attribute,
            capture_from: CaptureFrom::Source,
            capture_when: CaptureWhen::OnExecution,
            curve,
        })
    }

    /// Magnitude read live from the target's attribute.
    pub fn target_attribute(attribute: AttributeId, curve: Curve) -> Self {
        Self::AttributeBacked(AttributeBackedMagnitude {
            attribute,
            capture_from: CaptureFrom::Target,
            capture_when: CaptureWhen::OnExecution,
            curve,
        })
    }
}

impl From<f32> for Magnitude {
    fn from(value: f32) -> Self {
        Magnitude::Constant(value)
    }
}

impl MagnitudeCalculation for Magnitude {
    fn initialize(&self, spec: &mut EffectSpec, source: Option<&AttributeSystem>) {
        match self {
            Magnitude::Constant(_) | Magnitude::LevelScaled(_) => {}
            Magnitude::AttributeBacked(backed) => backed.initialize(spec, source),
            Magnitude::Custom(custom) => custom.initialize(spec, source),
        }
    }

    fn calculate(&self, spec: &EffectSpec, context: &MagnitudeContext<'_>) -> f32 {
        match self {
            Magnitude::Constant(value) => *value,
            Magnitude::LevelScaled(curve) => curve.evaluate(spec.level()),
            Magnitude::AttributeBacked(backed) => backed.calculate(spec, context),
            Magnitude::Custom(custom) => custom.calculate(spec, context),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectDefinition;

    const POWER: AttributeId = AttributeId::new(0);

    fn spec_at_level(level: f32) -> EffectSpec {
        EffectSpec::new(Arc::new(EffectDefinition::instant("Test")), None, level)
    }

    #[test]
    fn test_curve_shapes() {
        assert_eq!(Curve::Identity.evaluate(3.0), 3.0);
        assert_eq!(Curve::Constant(2.0).evaluate(99.0), 2.0);
        assert_eq!(Curve::linear(2.0, 1.0).evaluate(3.0), 7.0);
        assert_eq!(Curve::custom(|x| x * x).evaluate(4.0), 16.0);
    }

    #[test]
    fn test_points_curve() {
        let curve = Curve::points([(10.0, 100.0), (0.0, 0.0)]);

        assert_eq!(curve.evaluate(-5.0), 0.0);
        assert_eq!(curve.evaluate(5.0), 50.0);
        assert_eq!(curve.evaluate(20.0), 100.0);
        assert_eq!(Curve::Points(Vec::new()).evaluate(1.0), 0.0);
    }

    #[test]
    fn test_level_scaled() {
        let magnitude = Magnitude::LevelScaled(Curve::linear(10.0, 0.0));
        let spec = spec_at_level(3.0);

        assert_eq!(magnitude.calculate(&spec, &MagnitudeContext::default()), 30.0);
    }

    #[test]
    fn test_source_snapshot_ignores_later_changes() {
        let mut source = AttributeSystem::new();
        source.add_attribute(POWER, 12.0);

        let magnitude = Magnitude::source_attribute(POWER, Curve::Identity);
        let mut spec = spec_at_level(1.0);
        magnitude.initialize(&mut spec, Some(&source));

        source.set_base(POWER, 50.0);
        source.recompute_current_values();

        let context = MagnitudeContext::new(Some(&source), None);
        assert_eq!(magnitude.calculate(&spec, &context), 12.0);
    }

    #[test]
    fn test_target_reads_live() {
        let mut target = AttributeSystem::new();
        target.add_attribute(POWER, 4.0);

        let magnitude = Magnitude::target_attribute(POWER, Curve::linear(0.5, 0.0));
        let spec = spec_at_level(1.0);

        assert_eq!(magnitude.calculate(&spec, &MagnitudeContext::new(None, Some(&target))), 2.0);
        assert_eq!(magnitude.calculate(&spec, &MagnitudeContext::default()), 0.0);
    }

    #[test]
    fn test_live_source_falls_back_to_creation_value() {
        let mut source = AttributeSystem::new();
        source.add_attribute(POWER, 12.0);

        let magnitude = Magnitude::live_source_attribute(POWER, Curve::Identity);
        let mut spec = spec_at_level(1.0);
        magnitude.initialize(&mut spec, Some(&source));

        source.set_base(POWER, 50.0);
        source.recompute_current_values();

        assert_eq!(magnitude.calculate(&spec, &MagnitudeContext::new(Some(&source), None)), 50.0);
        assert_eq!(magnitude.calculate(&spec, &MagnitudeContext::default()), 12.0);
    }

    #[test]
    fn test_live_source_without_any_source_is_zero() {
        let magnitude = Magnitude::live_source_attribute(POWER, Curve::linear(2.0, 0.0));
        let mut spec = spec_at_level(1.0);
        magnitude.initialize(&mut spec, None);

        assert_eq!(magnitude.calculate(&spec, &MagnitudeContext::default()), 0.0);
    }

    #[test]
    fn test_missing_source_captures_zero() {
        let magnitude = Magnitude::source_attribute(POWER, Curve::linear(1.0, 3.0));
        let mut spec = spec_at_level(1.0);
        magnitude.initialize(&mut spec, None);

        assert_eq!(magnitude.calculate(&spec, &MagnitudeContext::default()), 3.0);
    }

    #[test]
    fn test_magnitude_serialization() {
        let magnitude = Magnitude::source_attribute(POWER, Curve::points([(0.0, 1.0), (1.0, 2.0)]));
        let json = serde_json::to_string(&magnitude).unwrap();
        let deserialized: Magnitude = serde_json::from_str(&json).unwrap();

        let mut spec = spec_at_level(1.0);
        deserialized.initialize(&mut spec, None);
        assert_eq!(deserialized.calculate(&spec, &MagnitudeContext::default()), 1.0);
    }

    #[test]
    fn test_custom_curve_not_serializable() {
        let magnitude = Magnitude::LevelScaled(Curve::custom(|x| x));
        assert!(serde_json::to_string(&magnitude).is_err());
    }
}
