//! Error types for capture operations.
//!
//! Only `InputRejected`, `NoPersonDetected` and `Cancelled` ever reach the
//! caller of a full extraction run. Per-frame seek/detect/isolate failures
//! are absorbed inside the pipeline as sequence gaps.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Errors that can occur during pose capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("input rejected: {reason}")]
    InputRejected { reason: String },

    #[error("no person detected in any sampled frame")]
    NoPersonDetected,

    #[error("extraction cancelled")]
    Cancelled,

    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("video probe failed: {message}")]
    ProbeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("frame seek failed at {timestamp:.3}s: {message}")]
    SeekFailed { timestamp: f64, message: String },

    #[error("pose detection failed: {0}")]
    DetectionFailed(String),

    #[error("foreground isolation failed: {0}")]
    IsolationFailed(String),

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl CaptureError {
    /// Create an input rejection error.
    pub fn input_rejected(reason: impl Into<String>) -> Self {
        Self::InputRejected {
            reason: reason.into(),
        }
    }

    /// Create a probe failure error.
    pub fn probe_failed(message: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ProbeFailed {
            message: message.into(),
            stderr,
        }
    }

    /// Create a seek failure error.
    pub fn seek_failed(timestamp: f64, message: impl Into<String>) -> Self {
        Self::SeekFailed {
            timestamp,
            message: message.into(),
        }
    }

    /// Create a detection failure error.
    pub fn detection_failed(message: impl Into<String>) -> Self {
        Self::DetectionFailed(message.into())
    }

    /// Create an isolation failure error.
    pub fn isolation_failed(message: impl Into<String>) -> Self {
        Self::IsolationFailed(message.into())
    }

    /// True for errors a full run surfaces to the caller; everything else is
    /// absorbed per frame.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CaptureError::InputRejected { .. }
                | CaptureError::NoPersonDetected
                | CaptureError::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(CaptureError::input_rejected("too long").is_fatal());
        assert!(CaptureError::NoPersonDetected.is_fatal());
        assert!(CaptureError::Cancelled.is_fatal());
        assert!(!CaptureError::seek_failed(1.5, "decoder stall").is_fatal());
        assert!(!CaptureError::detection_failed("tracker lost").is_fatal());
        assert!(!CaptureError::isolation_failed("mask overflow").is_fatal());
    }
}
