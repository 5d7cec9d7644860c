//! Kinematic metric records.
//!
//! These are flat serializable outputs of the metrics engine. A metric whose
//! required keypoints were not visible resolves to an explicit
//! [`MetricValue::Unavailable`] sentinel, never a numeric default.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Grouping tag fixed at metric definition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    /// Swing power proxies.
    Power,
    /// Rotational mechanics.
    Rotation,
    /// Body posture angles.
    Posture,
}

/// The fixed set of derived kinematic metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Lead-wrist angular displacement rate across the swing window.
    BatSpeedProxy,
    /// Hip-line rotation between the setup frame and the reference frame.
    HipRotation,
    /// Lead-leg hip-knee-ankle interior angle at the reference frame.
    LeadKneeAngle,
    /// Lead-arm shoulder-elbow-wrist interior angle at the reference frame.
    LeadElbowAngle,
    /// Trail-arm shoulder-elbow-wrist interior angle at the reference frame.
    TrailElbowAngle,
}

impl MetricKind {
    /// All metric kinds in canonical order.
    pub const ALL: [MetricKind; 5] = [
        MetricKind::BatSpeedProxy,
        MetricKind::HipRotation,
        MetricKind::LeadKneeAngle,
        MetricKind::LeadElbowAngle,
        MetricKind::TrailElbowAngle,
    ];

    /// Category tag, fixed at definition time.
    pub fn category(&self) -> MetricCategory {
        match self {
            MetricKind::BatSpeedProxy => MetricCategory::Power,
            MetricKind::HipRotation => MetricCategory::Rotation,
            MetricKind::LeadKneeAngle
            | MetricKind::LeadElbowAngle
            | MetricKind::TrailElbowAngle => MetricCategory::Posture,
        }
    }

    /// Unit of the metric value.
    pub fn unit(&self) -> &'static str {
        match self {
            MetricKind::BatSpeedProxy => "deg/s",
            _ => "deg",
        }
    }

    /// Returns the metric name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::BatSpeedProxy => "bat_speed_proxy",
            MetricKind::HipRotation => "hip_rotation",
            MetricKind::LeadKneeAngle => "lead_knee_angle",
            MetricKind::LeadElbowAngle => "lead_elbow_angle",
            MetricKind::TrailElbowAngle => "trail_elbow_angle",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A metric result: a measurement, or an explicit sentinel when the required
/// keypoints were below the visibility threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum MetricValue {
    Available(f64),
    Unavailable,
}

impl MetricValue {
    /// The measurement, if available.
    pub fn value(&self) -> Option<f64> {
        match self {
            MetricValue::Available(v) => Some(*v),
            MetricValue::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, MetricValue::Available(_))
    }
}

/// One metric entry tied to its kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricEntry {
    pub kind: MetricKind,
    pub value: MetricValue,
}

/// The full metric set derived from one sequence at one reference frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricSet {
    /// Canonical frame index the metrics were measured at.
    pub reference_frame: u32,
    /// One entry per kind, in `MetricKind::ALL` order.
    pub entries: Vec<MetricEntry>,
}

impl MetricSet {
    /// Build a set from per-kind values in canonical order.
    pub fn new(reference_frame: u32, values: [MetricValue; MetricKind::ALL.len()]) -> Self {
        let entries = MetricKind::ALL
            .iter()
            .zip(values)
            .map(|(&kind, value)| MetricEntry { kind, value })
            .collect();
        Self {
            reference_frame,
            entries,
        }
    }

    /// Value for one metric kind.
    pub fn get(&self, kind: MetricKind) -> MetricValue {
        self.entries
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.value)
            .unwrap_or(MetricValue::Unavailable)
    }
}

/// Signed per-metric differences, subject minus model.
///
/// Carries no grading or interpretation; that belongs to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiffSet {
    pub entries: Vec<MetricEntry>,
}

impl DiffSet {
    /// Difference for one metric kind.
    pub fn get(&self, kind: MetricKind) -> MetricValue {
        self.entries
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.value)
            .unwrap_or(MetricValue::Unavailable)
    }
}

/// Body side, used to resolve lead/trail limbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// Batter handedness.
///
/// A right-handed batter leads with the left side of the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    Right,
    Left,
}

impl Handedness {
    pub fn lead_side(&self) -> Side {
        match self {
            Handedness::Right => Side::Left,
            Handedness::Left => Side::Right,
        }
    }

    pub fn trail_side(&self) -> Side {
        match self {
            Handedness::Right => Side::Right,
            Handedness::Left => Side::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_fixed_at_definition() {
        assert_eq!(MetricKind::BatSpeedProxy.category(), MetricCategory::Power);
        assert_eq!(MetricKind::HipRotation.category(), MetricCategory::Rotation);
        assert_eq!(MetricKind::LeadKneeAngle.category(), MetricCategory::Posture);
        assert_eq!(MetricKind::LeadElbowAngle.category(), MetricCategory::Posture);
        assert_eq!(MetricKind::TrailElbowAngle.category(), MetricCategory::Posture);
    }

    #[test]
    fn test_metric_set_lookup() {
        let set = MetricSet::new(
            42,
            [
                MetricValue::Available(850.0),
                MetricValue::Available(40.0),
                MetricValue::Unavailable,
                MetricValue::Available(95.0),
                MetricValue::Available(120.0),
            ],
        );
        assert_eq!(set.reference_frame, 42);
        assert_eq!(set.get(MetricKind::HipRotation), MetricValue::Available(40.0));
        assert_eq!(set.get(MetricKind::LeadKneeAngle), MetricValue::Unavailable);
    }

    #[test]
    fn test_sentinel_never_a_number() {
        let json = serde_json::to_string(&MetricValue::Unavailable).unwrap();
        assert!(json.contains("unavailable"));
        let back: MetricValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value(), None);
    }

    #[test]
    fn test_handedness_sides() {
        assert_eq!(Handedness::Right.lead_side(), Side::Left);
        assert_eq!(Handedness::Right.trail_side(), Side::Right);
        assert_eq!(Handedness::Left.lead_side(), Side::Right);
        assert_eq!(Handedness::Left.trail_side(), Side::Left);
    }
}
