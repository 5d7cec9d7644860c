//! Biomechanical swing metrics for SwingLab.
//!
//! - `geometry` — planar angle primitives
//! - `engine` — metric derivation and subject/model comparison

pub mod engine;
pub mod geometry;

pub use engine::MetricsEngine;
pub use geometry::{angle_delta, interior_angle, segment_angle};
