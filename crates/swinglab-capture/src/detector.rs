//! Pose detector seam.
//!
//! The detector is a stateful tracking capability: its internal state
//! accumulates across consecutive frames, so calls take `&mut self` and the
//! pipeline never runs two detections in parallel. The handle is a
//! single-owner resource whose lifecycle brackets one extraction run;
//! release happens by drop on every exit path.

use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;

use swinglab_models::{Keypoint, Landmark};

use crate::error::{CaptureError, CaptureResult};
use crate::video::VideoFrame;

/// The full keypoint set detected in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseDetection {
    /// All 33 keypoints in vocabulary order.
    pub keypoints: Vec<Keypoint>,
}

impl PoseDetection {
    /// Build a detection, checking the vocabulary size.
    pub fn new(keypoints: Vec<Keypoint>) -> Option<Self> {
        if keypoints.len() != Landmark::COUNT {
            return None;
        }
        Some(Self { keypoints })
    }
}

/// One-frame pose detection over a black-box model.
///
/// `Ok(None)` means "no pose found" and produces a sequence gap, never an
/// empty-keypoint frame. `Err` is a transient detector failure the pipeline
/// also absorbs as a gap.
#[async_trait]
pub trait PoseDetector: Send {
    async fn detect(&mut self, frame: &VideoFrame) -> CaptureResult<Option<PoseDetection>>;
}

/// What the scripted detector does for one sample ordinal.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ScriptedOutcome {
    Pose,
    NoPose,
    Fail,
}

/// Deterministic detector stub for pipeline tests.
///
/// Outcomes are keyed by the frame's sample index, recovered from its
/// timestamp at the given sample rate. A sample the pipeline skips before
/// detection (seek failure, timeout) therefore never shifts the outcomes
/// scripted for later samples.
pub struct ScriptedPoseDetector {
    calls: u32,
    sample_rate: f64,
    never: bool,
    no_pose_frames: HashSet<u32>,
    failing_frames: HashSet<u32>,
    slow_frames: HashSet<u32>,
    delay: Duration,
    visibility: f64,
}

impl ScriptedPoseDetector {
    /// A detector that finds a pose on every frame sampled at `sample_rate`.
    pub fn always_detects(sample_rate: f64) -> Self {
        Self {
            calls: 0,
            sample_rate,
            never: false,
            no_pose_frames: HashSet::new(),
            failing_frames: HashSet::new(),
            slow_frames: HashSet::new(),
            delay: Duration::from_secs(0),
            visibility: 0.9,
        }
    }

    /// A detector that never finds a pose.
    pub fn never_detects(sample_rate: f64) -> Self {
        let mut d = Self::always_detects(sample_rate);
        d.never = true;
        d
    }

    /// Return "no pose" on the given sample indices.
    pub fn with_no_pose_frames(mut self, frames: &[u32]) -> Self {
        self.no_pose_frames = frames.iter().copied().collect();
        self
    }

    /// Fail with a detector error on the given sample indices.
    pub fn with_failing_frames(mut self, frames: &[u32]) -> Self {
        self.failing_frames = frames.iter().copied().collect();
        self
    }

    /// Sleep for `delay` before answering on the given sample indices.
    pub fn with_slow_frames(mut self, frames: &[u32], delay: Duration) -> Self {
        self.slow_frames = frames.iter().copied().collect();
        self.delay = delay;
        self
    }

    /// Number of detect calls made so far.
    pub fn calls(&self) -> u32 {
        self.calls
    }

    /// Sample index of a frame, recovered from its timestamp.
    fn sample_index(&self, frame: &VideoFrame) -> u32 {
        (frame.timestamp * self.sample_rate).round() as u32
    }

    fn outcome_for(&self, index: u32) -> ScriptedOutcome {
        if self.never || self.no_pose_frames.contains(&index) {
            ScriptedOutcome::NoPose
        } else if self.failing_frames.contains(&index) {
            ScriptedOutcome::Fail
        } else {
            ScriptedOutcome::Pose
        }
    }

    /// A plausible standing pose scaled to the frame, deterministic per frame.
    fn synth_pose(&self, frame: &VideoFrame) -> PoseDetection {
        let w = frame.width() as f64;
        let h = frame.height() as f64;
        let keypoints = Landmark::ALL
            .iter()
            .map(|landmark| {
                // Spread landmarks down the vertical axis by vocabulary
                // position; exact geometry does not matter for the stub.
                let i = landmark.index() as f64;
                let x = w * (0.4 + 0.2 * (i / Landmark::COUNT as f64));
                let y = h * (0.1 + 0.8 * (i / Landmark::COUNT as f64));
                Keypoint::new(x, y, 0.0, self.visibility)
            })
            .collect();
        PoseDetection { keypoints }
    }
}

#[async_trait]
impl PoseDetector for ScriptedPoseDetector {
    async fn detect(&mut self, frame: &VideoFrame) -> CaptureResult<Option<PoseDetection>> {
        self.calls += 1;
        let index = self.sample_index(frame);

        if self.slow_frames.contains(&index) {
            tokio::time::sleep(self.delay).await;
        }

        match self.outcome_for(index) {
            ScriptedOutcome::Pose => Ok(Some(self.synth_pose(frame))),
            ScriptedOutcome::NoPose => Ok(None),
            ScriptedOutcome::Fail => Err(CaptureError::detection_failed(format!(
                "scripted failure at sample {index}"
            ))),
        }
    }
}
