//! Extraction pipeline.
//!
//! Orchestrates sampler, detector and (optionally) isolation over one video,
//! producing a validated skeleton sequence. Strictly sequential: the
//! detector's tracking state accumulates across consecutive frames, so each
//! result is fully consumed before the next detection starts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use swinglab_models::{IsolationMask, ProgressReport, SkeletonFrame, SkeletonSequence};

use crate::detector::PoseDetector;
use crate::error::{CaptureError, CaptureResult};
use crate::isolation::ForegroundIsolator;
use crate::progress::ProgressSender;
use crate::sampler::{FrameBudget, FrameSampler, SampleRate};
use crate::video::VideoSource;

/// Options for one extraction run.
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    /// Hard duration ceiling; longer inputs are rejected before any work.
    pub max_duration: f64,
    /// Soft ceiling; longer inputs proceed with a warning.
    pub warn_duration: f64,
    /// Sampling bounds.
    pub budget: FrameBudget,
    /// Per-frame budget for seek + detect.
    pub frame_timeout: Duration,
    /// Run foreground isolation on a subsample of successful frames.
    pub isolation: bool,
    /// Isolate every Nth successful frame.
    pub isolation_stride: u32,
    /// Below this share of targeted samples the result is flagged degraded.
    pub min_yield: f64,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_duration: 60.0,
            warn_duration: 20.0,
            budget: FrameBudget::default(),
            frame_timeout: Duration::from_secs(10),
            isolation: false,
            isolation_stride: 10,
            min_yield: 0.3,
        }
    }
}

/// Cloneable cancellation flag, checked only between frames.
///
/// A cancelled run is not resumable; retry by resubmitting the whole video.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Per-reason tally of skipped samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub timeouts: u32,
    pub seek_failures: u32,
    pub detector_failures: u32,
    pub no_pose: u32,
}

impl SkipCounts {
    pub fn total(&self) -> u32 {
        self.timeouts + self.seek_failures + self.detector_failures + self.no_pose
    }
}

/// Counters for one extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub frames_targeted: u32,
    pub frames_produced: u32,
    pub skips: SkipCounts,
}

/// The result of one extraction run.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub sequence: SkeletonSequence,
    pub masks: Vec<IsolationMask>,
    pub stats: ExtractionStats,
}

/// Video-to-skeleton extraction pipeline.
pub struct ExtractionPipeline {
    options: ExtractOptions,
}

impl ExtractionPipeline {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Run one extraction over `source`.
    ///
    /// The detector handle is borrowed for the whole run and released on
    /// every exit path when the caller drops it. Per-frame failures become
    /// sequence gaps; only `InputRejected`, `NoPersonDetected` and
    /// `Cancelled` are returned as errors.
    pub async fn extract(
        &self,
        source: &dyn VideoSource,
        detector: &mut dyn PoseDetector,
        isolator: Option<&dyn ForegroundIsolator>,
        progress: &ProgressSender,
        cancel: &CancelFlag,
    ) -> CaptureResult<Extraction> {
        let info = source.info().await.map_err(|e| {
            CaptureError::input_rejected(format!("video could not be probed: {e}"))
        })?;

        if info.duration > self.options.max_duration {
            progress.failed("video too long");
            return Err(CaptureError::input_rejected(format!(
                "duration {:.1}s exceeds the {:.0}s ceiling; trim the clip to the swing",
                info.duration, self.options.max_duration
            )));
        }
        if info.duration > self.options.warn_duration {
            warn!(
                duration = info.duration,
                soft_ceiling = self.options.warn_duration,
                "long clip; extraction will sample at the rate floor"
            );
        }

        let rate = SampleRate::adaptive(info.duration, self.options.budget, info.native_fps);
        let sampler = FrameSampler::new(rate);
        let timestamps = sampler.timestamps(info.duration);
        let targeted = timestamps.len() as u32;

        info!(
            duration = info.duration,
            fps = rate.fps(),
            samples = targeted,
            isolation = self.options.isolation,
            "starting extraction run"
        );
        progress.started(targeted);

        let mut sequence = SkeletonSequence::new(rate.fps(), info.width, info.height);
        let mut masks: Vec<IsolationMask> = Vec::new();
        let mut skips = SkipCounts::default();
        let started_at = Instant::now();

        for (ordinal, &timestamp) in timestamps.iter().enumerate() {
            let index = ordinal as u32;

            // Cancellation is only observed between frames.
            if cancel.is_cancelled() {
                progress.failed("cancelled");
                return Err(CaptureError::Cancelled);
            }

            let attempt = async {
                let frame = source.frame_at(timestamp).await?;
                let detection = detector.detect(&frame).await?;
                Ok::<_, CaptureError>(detection.map(|d| (frame, d)))
            };

            // Dropping the timed-out future discards any seek/detect result
            // that resolves late, so it can never be attributed to a later
            // frame index.
            match tokio::time::timeout(self.options.frame_timeout, attempt).await {
                Err(_elapsed) => {
                    skips.timeouts += 1;
                    debug!(index, timestamp, "frame timed out, skipping");
                }
                Ok(Err(CaptureError::SeekFailed { message, .. })) => {
                    skips.seek_failures += 1;
                    debug!(index, timestamp, %message, "seek failed, skipping");
                }
                Ok(Err(e)) => {
                    skips.detector_failures += 1;
                    debug!(index, timestamp, error = %e, "detection failed, skipping");
                }
                Ok(Ok(None)) => {
                    skips.no_pose += 1;
                    debug!(index, timestamp, "no pose found, skipping");
                }
                Ok(Ok(Some((frame, detection)))) => {
                    if self.options.isolation {
                        if let Some(isolator) = isolator {
                            let produced = sequence.len() as u32;
                            if produced % self.options.isolation_stride.max(1) == 0 {
                                match isolator.isolate(&frame, &detection.keypoints) {
                                    Ok(mut mask) => {
                                        mask.frame_index = index;
                                        masks.push(mask);
                                    }
                                    Err(e) => {
                                        // Isolation never affects the main sequence.
                                        debug!(index, error = %e, "isolation failed for frame");
                                    }
                                }
                            }
                        }
                    }
                    sequence
                        .frames
                        .push(SkeletonFrame::new(index, timestamp, detection.keypoints));
                }
            }

            let processed = index + 1;
            let eta = estimate_remaining(started_at, processed, targeted);
            progress.frame(ProgressReport::new(processed, targeted, eta));
        }

        let produced = sequence.len() as u32;
        let stats = ExtractionStats {
            frames_targeted: targeted,
            frames_produced: produced,
            skips,
        };

        if produced == 0 {
            warn!(targeted, "extraction produced no frames");
            progress.failed("no person detected");
            return Err(CaptureError::NoPersonDetected);
        }

        let yield_ratio = produced as f64 / targeted.max(1) as f64;
        if yield_ratio < self.options.min_yield {
            warn!(
                produced,
                targeted,
                yield_ratio,
                "low sample yield, flagging result as degraded"
            );
            sequence.degraded = true;
        }

        debug_assert!(sequence.validate().is_ok());

        info!(
            produced,
            targeted,
            skipped = skips.total(),
            masks = masks.len(),
            degraded = sequence.degraded,
            "extraction run complete"
        );
        progress.complete();

        Ok(Extraction {
            sequence,
            masks,
            stats,
        })
    }
}

fn estimate_remaining(started_at: Instant, processed: u32, targeted: u32) -> Option<f64> {
    if processed == 0 || targeted <= processed {
        return (targeted == processed).then_some(0.0);
    }
    let elapsed = started_at.elapsed().as_secs_f64();
    let per_frame = elapsed / processed as f64;
    Some(per_frame * (targeted - processed) as f64)
}
