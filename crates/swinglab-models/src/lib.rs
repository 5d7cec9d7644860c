//! Shared data models for the SwingLab motion-capture pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Body landmarks and keypoints
//! - Skeleton frames and sequences
//! - Foreground isolation masks
//! - Kinematic metric sets and comparisons
//! - Extraction progress reports

pub mod landmark;
pub mod mask;
pub mod metric;
pub mod progress;
pub mod skeleton;

// Re-export common types
pub use landmark::{Keypoint, Landmark};
pub use mask::{IsolationMask, MaskBox};
pub use metric::{
    DiffSet, Handedness, MetricCategory, MetricEntry, MetricKind, MetricSet, MetricValue, Side,
};
pub use progress::ProgressReport;
pub use skeleton::{SequenceError, SkeletonFrame, SkeletonSequence};
