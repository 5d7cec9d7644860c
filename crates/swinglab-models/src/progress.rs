//! Extraction progress records consumed by an external progress UI.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Snapshot of extraction progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProgressReport {
    /// Samples processed so far, including skipped ones.
    pub frames_processed: u32,
    /// Total samples targeted for this run.
    pub frames_total: u32,
    /// Wall-clock estimate for the remainder of the run, when known.
    pub estimated_seconds_remaining: Option<f64>,
}

impl ProgressReport {
    pub fn new(frames_processed: u32, frames_total: u32, estimated_seconds_remaining: Option<f64>) -> Self {
        Self {
            frames_processed,
            frames_total,
            estimated_seconds_remaining,
        }
    }

    /// Completion ratio in 0.0..=1.0.
    pub fn fraction(&self) -> f64 {
        if self.frames_total == 0 {
            return 0.0;
        }
        (self.frames_processed as f64 / self.frames_total as f64).min(1.0)
    }
}
