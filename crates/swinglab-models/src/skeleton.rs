//! Skeleton frames and sequences.
//!
//! A `SkeletonSequence` is produced once per extraction run and is read-only
//! afterwards; the caller owns persistence. Gaps (skipped frames) are
//! permitted and never shift the indices of later frames.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::landmark::{Keypoint, Landmark};

/// Tolerance when checking `timestamp ≈ frame_index / nominal_fps`.
const TIMESTAMP_TOLERANCE: f64 = 1e-3;

/// Validation errors for skeleton sequences.
#[derive(Debug, Error, PartialEq)]
pub enum SequenceError {
    #[error("nominal rate must be positive, got {0}")]
    InvalidRate(f64),

    #[error("frame at position {position} has {count} keypoints, expected {expected}")]
    WrongKeypointCount {
        position: usize,
        count: usize,
        expected: usize,
    },

    #[error("frame index {index} at position {position} does not increase over {previous}")]
    NonMonotonicIndex {
        position: usize,
        index: u32,
        previous: u32,
    },

    #[error("frame index {index} has timestamp {timestamp}, expected about {expected}")]
    TimestampMismatch {
        index: u32,
        timestamp: f64,
        expected: f64,
    },
}

/// The keypoints detected at one sampled video timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SkeletonFrame {
    /// Canonical frame index, 0-based, strictly increasing within a sequence.
    pub frame_index: u32,
    /// Timestamp in seconds from the start of the video.
    pub timestamp: f64,
    /// All 33 keypoints in vocabulary order.
    pub keypoints: Vec<Keypoint>,
}

impl SkeletonFrame {
    /// Create a frame from a full keypoint set.
    pub fn new(frame_index: u32, timestamp: f64, keypoints: Vec<Keypoint>) -> Self {
        Self {
            frame_index,
            timestamp,
            keypoints,
        }
    }

    /// Keypoint for a named landmark.
    ///
    /// `None` when the frame carries fewer keypoints than the vocabulary;
    /// external callers may hand back stored sequences without validating
    /// them first, so a malformed frame must not panic the reader.
    pub fn keypoint(&self, landmark: Landmark) -> Option<&Keypoint> {
        self.keypoints.get(landmark.index())
    }

    /// Mean visibility across all keypoints.
    pub fn mean_visibility(&self) -> f64 {
        if self.keypoints.is_empty() {
            return 0.0;
        }
        self.keypoints.iter().map(|k| k.visibility).sum::<f64>() / self.keypoints.len() as f64
    }
}

/// The ordered collection of skeleton frames from one extraction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SkeletonSequence {
    /// Frames in strictly increasing `frame_index` order. Gaps allowed.
    pub frames: Vec<SkeletonFrame>,
    /// Declared nominal sampling rate in frames per second.
    pub nominal_fps: f64,
    /// Source video width in pixels.
    pub width: u32,
    /// Source video height in pixels.
    pub height: u32,
    /// True when fewer than the minimum share of targeted samples succeeded.
    pub degraded: bool,
}

impl SkeletonSequence {
    /// Create an empty sequence shell.
    pub fn new(nominal_fps: f64, width: u32, height: u32) -> Self {
        Self {
            frames: Vec::new(),
            nominal_fps,
            width,
            height,
            degraded: false,
        }
    }

    /// Number of frames actually present (gaps excluded).
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when no frames were produced.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// First frame present, if any.
    pub fn first(&self) -> Option<&SkeletonFrame> {
        self.frames.first()
    }

    /// Last frame present, if any.
    pub fn last(&self) -> Option<&SkeletonFrame> {
        self.frames.last()
    }

    /// Look up the frame whose canonical index equals `index`.
    ///
    /// Returns `None` on a gap; callers must treat that as "no skeleton this
    /// tick", never substitute a neighbouring frame.
    pub fn frame_at(&self, index: u32) -> Option<&SkeletonFrame> {
        self.frames
            .binary_search_by_key(&index, |f| f.frame_index)
            .ok()
            .map(|pos| &self.frames[pos])
    }

    /// Check the sequence invariants.
    ///
    /// Frame indices strictly increase, every frame carries the full
    /// vocabulary, and timestamps agree with `frame_index / nominal_fps`.
    pub fn validate(&self) -> Result<(), SequenceError> {
        if !(self.nominal_fps > 0.0) {
            return Err(SequenceError::InvalidRate(self.nominal_fps));
        }

        let mut previous: Option<u32> = None;
        for (position, frame) in self.frames.iter().enumerate() {
            if frame.keypoints.len() != Landmark::COUNT {
                return Err(SequenceError::WrongKeypointCount {
                    position,
                    count: frame.keypoints.len(),
                    expected: Landmark::COUNT,
                });
            }

            if let Some(prev) = previous {
                if frame.frame_index <= prev {
                    return Err(SequenceError::NonMonotonicIndex {
                        position,
                        index: frame.frame_index,
                        previous: prev,
                    });
                }
            }
            previous = Some(frame.frame_index);

            let expected = frame.frame_index as f64 / self.nominal_fps;
            if (frame.timestamp - expected).abs() > TIMESTAMP_TOLERANCE {
                return Err(SequenceError::TimestampMismatch {
                    index: frame.frame_index,
                    timestamp: frame.timestamp,
                    expected,
                });
            }
        }

        Ok(())
    }
}
