//! Metric derivation and subject/model comparison.
//!
//! Every metric resolves independently: a missing frame or a keypoint below
//! the visibility threshold makes that one metric `Unavailable` and leaves
//! the rest untouched. The engine never fails a whole analysis over one
//! occluded joint.

use tracing::debug;

use swinglab_models::{
    DiffSet, Handedness, Keypoint, Landmark, MetricEntry, MetricKind, MetricSet, MetricValue,
    Side, SkeletonFrame, SkeletonSequence,
};

use crate::geometry::{angle_delta, interior_angle, segment_angle};

fn hip(side: Side) -> Landmark {
    match side {
        Side::Left => Landmark::LeftHip,
        Side::Right => Landmark::RightHip,
    }
}

fn knee(side: Side) -> Landmark {
    match side {
        Side::Left => Landmark::LeftKnee,
        Side::Right => Landmark::RightKnee,
    }
}

fn ankle(side: Side) -> Landmark {
    match side {
        Side::Left => Landmark::LeftAnkle,
        Side::Right => Landmark::RightAnkle,
    }
}

fn shoulder(side: Side) -> Landmark {
    match side {
        Side::Left => Landmark::LeftShoulder,
        Side::Right => Landmark::RightShoulder,
    }
}

fn elbow(side: Side) -> Landmark {
    match side {
        Side::Left => Landmark::LeftElbow,
        Side::Right => Landmark::RightElbow,
    }
}

fn wrist(side: Side) -> Landmark {
    match side {
        Side::Left => Landmark::LeftWrist,
        Side::Right => Landmark::RightWrist,
    }
}

/// Derives the fixed metric set from a skeleton sequence.
#[derive(Debug, Clone, Copy)]
pub struct MetricsEngine {
    /// Keypoints below this confidence do not contribute to any metric.
    pub visibility_threshold: f64,
    /// Number of canonical frames before the reference frame that the
    /// bat-speed proxy integrates over.
    pub swing_window: u32,
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self {
            visibility_threshold: 0.5,
            swing_window: 10,
        }
    }
}

impl MetricsEngine {
    pub fn new(visibility_threshold: f64, swing_window: u32) -> Self {
        Self {
            visibility_threshold,
            swing_window,
        }
    }

    /// Derive all metrics at `reference_frame` (canonical index).
    pub fn analyze(
        &self,
        sequence: &SkeletonSequence,
        reference_frame: u32,
        handedness: Handedness,
    ) -> MetricSet {
        let lead = handedness.lead_side();
        let trail = handedness.trail_side();

        let values = [
            self.bat_speed_proxy(sequence, reference_frame, lead),
            self.hip_rotation(sequence, reference_frame),
            self.joint_angle(sequence, reference_frame, hip(lead), knee(lead), ankle(lead)),
            self.joint_angle(
                sequence,
                reference_frame,
                shoulder(lead),
                elbow(lead),
                wrist(lead),
            ),
            self.joint_angle(
                sequence,
                reference_frame,
                shoulder(trail),
                elbow(trail),
                wrist(trail),
            ),
        ];

        let unavailable = values.iter().filter(|v| !v.is_available()).count();
        if unavailable > 0 {
            debug!(
                reference_frame,
                unavailable, "some metrics unresolved at reference frame"
            );
        }

        MetricSet::new(reference_frame, values)
    }

    /// Signed per-kind difference, subject minus model.
    ///
    /// A kind unavailable on either side stays unavailable in the diff.
    pub fn compare(&self, subject: &MetricSet, model: &MetricSet) -> DiffSet {
        let entries = MetricKind::ALL
            .iter()
            .map(|&kind| {
                let value = match (subject.get(kind).value(), model.get(kind).value()) {
                    (Some(s), Some(m)) => MetricValue::Available(s - m),
                    _ => MetricValue::Unavailable,
                };
                MetricEntry { kind, value }
            })
            .collect();
        DiffSet { entries }
    }

    /// Keypoint position if the frame carries it and its confidence clears
    /// the threshold.
    fn point(&self, frame: &SkeletonFrame, landmark: Landmark) -> Option<(f64, f64)> {
        let kp: &Keypoint = frame.keypoint(landmark)?;
        kp.is_visible(self.visibility_threshold)
            .then_some((kp.x, kp.y))
    }

    /// Midpoint of the two hips, the pivot for the bat-speed proxy.
    fn mid_hip(&self, frame: &SkeletonFrame) -> Option<(f64, f64)> {
        let left = self.point(frame, Landmark::LeftHip)?;
        let right = self.point(frame, Landmark::RightHip)?;
        Some(((left.0 + right.0) / 2.0, (left.1 + right.1) / 2.0))
    }

    /// Interior angle `a - vertex - b` at the reference frame.
    fn joint_angle(
        &self,
        sequence: &SkeletonSequence,
        reference_frame: u32,
        a: Landmark,
        vertex: Landmark,
        b: Landmark,
    ) -> MetricValue {
        let angle = sequence.frame_at(reference_frame).and_then(|frame| {
            interior_angle(
                self.point(frame, a)?,
                self.point(frame, vertex)?,
                self.point(frame, b)?,
            )
        });
        angle.map_or(MetricValue::Unavailable, MetricValue::Available)
    }

    /// Hip-line rotation from the setup frame (first frame present) to the
    /// reference frame.
    fn hip_rotation(&self, sequence: &SkeletonSequence, reference_frame: u32) -> MetricValue {
        let rotation = (|| {
            let setup = sequence.first()?;
            let reference = sequence.frame_at(reference_frame)?;
            let setup_angle = segment_angle(
                self.point(setup, Landmark::LeftHip)?,
                self.point(setup, Landmark::RightHip)?,
            )?;
            let reference_angle = segment_angle(
                self.point(reference, Landmark::LeftHip)?,
                self.point(reference, Landmark::RightHip)?,
            )?;
            Some(angle_delta(setup_angle, reference_angle))
        })();
        rotation.map_or(MetricValue::Unavailable, MetricValue::Available)
    }

    /// Lead-wrist angular speed about the mid-hip pivot, in deg/s, summed
    /// over the frames present in the swing window ending at the reference
    /// frame.
    fn bat_speed_proxy(
        &self,
        sequence: &SkeletonSequence,
        reference_frame: u32,
        lead: Side,
    ) -> MetricValue {
        if sequence.frame_at(reference_frame).is_none() {
            return MetricValue::Unavailable;
        }
        let window_start = reference_frame.saturating_sub(self.swing_window);

        // Wrist angle about the pivot at every usable frame in the window.
        // Gaps shrink the window; they never substitute neighbours.
        let mut samples: Vec<(f64, f64)> = Vec::new();
        for index in window_start..=reference_frame {
            let Some(frame) = sequence.frame_at(index) else {
                continue;
            };
            let Some(pivot) = self.mid_hip(frame) else {
                continue;
            };
            let Some(wrist_point) = self.point(frame, wrist(lead)) else {
                continue;
            };
            if let Some(angle) = segment_angle(pivot, wrist_point) {
                samples.push((frame.timestamp, angle));
            }
        }

        if samples.len() < 2 {
            return MetricValue::Unavailable;
        }
        let elapsed = samples[samples.len() - 1].0 - samples[0].0;
        if elapsed <= 0.0 {
            return MetricValue::Unavailable;
        }
        let displacement: f64 = samples
            .windows(2)
            .map(|pair| angle_delta(pair[0].1, pair[1].1).abs())
            .sum();
        MetricValue::Available(displacement / elapsed)
    }
}
