//! Video pose extraction for SwingLab.
//!
//! Turns an uploaded swing video into a time-indexed skeleton sequence:
//! - `sampler` — adaptive, bounded frame sampling
//! - `video` — seekable video seam (ffprobe/ffmpeg backed)
//! - `detector` — black-box pose detector seam
//! - `isolation` — optional subject/background masks
//! - `pipeline` — the orchestrating extraction run
//! - `progress` — non-blocking progress channel

pub mod detector;
pub mod error;
pub mod isolation;
pub mod pipeline;
pub mod progress;
pub mod sampler;
pub mod video;

pub use detector::{PoseDetection, PoseDetector, ScriptedPoseDetector};
pub use error::{CaptureError, CaptureResult};
pub use isolation::{ForegroundIsolator, KeypointPriorIsolator};
pub use pipeline::{
    CancelFlag, ExtractOptions, Extraction, ExtractionPipeline, ExtractionStats, SkipCounts,
};
pub use progress::{channel, noop_sender, ProgressEvent, ProgressReceiver, ProgressSender};
pub use sampler::{FrameBudget, FrameSampler, SampleRate};
pub use video::{FfmpegVideoSource, ScriptedVideoSource, VideoFrame, VideoInfo, VideoSource};
