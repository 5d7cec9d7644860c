//! Seekable video sources.
//!
//! `VideoSource` is the seam between the pipeline and the decoding backend.
//! The concrete implementation shells out to ffprobe/ffmpeg; tests use
//! [`ScriptedVideoSource`] for deterministic frames.

use async_trait::async_trait;
use image::RgbaImage;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{CaptureError, CaptureResult};

/// Basic properties of a video resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    /// Duration in seconds.
    pub duration: f64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Native frame rate (fps).
    pub native_fps: f64,
}

/// One decoded frame at a sampled timestamp.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGBA pixels at the source resolution.
    pub image: RgbaImage,
    /// Timestamp in seconds the frame was seeked to.
    pub timestamp: f64,
}

impl VideoFrame {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// A seekable video resource with readable duration and dimensions.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Probe the resource for duration, dimensions and native rate.
    async fn info(&self) -> CaptureResult<VideoInfo>;

    /// Seek to `timestamp` and decode one frame.
    ///
    /// Seek failures are `Err`; the pipeline absorbs them per frame.
    async fn frame_at(&self, timestamp: f64) -> CaptureResult<VideoFrame>;
}

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
}

/// Video source backed by the ffprobe/ffmpeg CLIs.
pub struct FfmpegVideoSource {
    path: PathBuf,
}

impl FfmpegVideoSource {
    /// Open a video file. Fails when the file does not exist.
    pub fn open(path: impl AsRef<Path>) -> CaptureResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CaptureError::FileNotFound(path.to_path_buf()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

#[async_trait]
impl VideoSource for FfmpegVideoSource {
    async fn info(&self) -> CaptureResult<VideoInfo> {
        which::which("ffprobe").map_err(|_| CaptureError::FfprobeNotFound)?;

        let output = Command::new("ffprobe")
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(&self.path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(CaptureError::probe_failed(
                "ffprobe failed",
                Some(String::from_utf8_lossy(&output.stderr).to_string()),
            ));
        }

        let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)?;

        let video_stream = probe
            .streams
            .iter()
            .find(|s| s.codec_type == "video")
            .ok_or_else(|| CaptureError::probe_failed("no video stream found", None))?;

        let duration = probe
            .format
            .duration
            .as_ref()
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(0.0);

        let native_fps = video_stream
            .avg_frame_rate
            .as_ref()
            .or(video_stream.r_frame_rate.as_ref())
            .and_then(|r| parse_frame_rate(r))
            .unwrap_or(30.0);

        Ok(VideoInfo {
            duration,
            width: video_stream.width.unwrap_or(0),
            height: video_stream.height.unwrap_or(0),
            native_fps,
        })
    }

    async fn frame_at(&self, timestamp: f64) -> CaptureResult<VideoFrame> {
        which::which("ffmpeg").map_err(|_| CaptureError::FfmpegNotFound)?;

        let output = Command::new("ffmpeg")
            .args(["-ss", &format!("{:.4}", timestamp), "-i"])
            .arg(&self.path)
            .args([
                "-frames:v",
                "1",
                "-f",
                "image2pipe",
                "-vcodec",
                "png",
                "pipe:1",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() || output.stdout.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CaptureError::seek_failed(timestamp, stderr.to_string()));
        }

        let image = image::load_from_memory(&output.stdout)
            .map_err(|e| CaptureError::seek_failed(timestamp, e.to_string()))?
            .to_rgba8();

        Ok(VideoFrame { image, timestamp })
    }
}

/// Deterministic in-memory source for tests.
///
/// Yields a solid-color frame whose red channel encodes the sample ordinal,
/// so repeated runs over the same source are bitwise identical.
pub struct ScriptedVideoSource {
    info: VideoInfo,
    /// Timestamps (in millisecond resolution) whose seeks fail.
    failing_ms: HashSet<u64>,
}

impl ScriptedVideoSource {
    pub fn new(duration: f64, width: u32, height: u32, native_fps: f64) -> Self {
        Self {
            info: VideoInfo {
                duration,
                width,
                height,
                native_fps,
            },
            failing_ms: HashSet::new(),
        }
    }

    /// Make seeks at the given timestamps fail.
    pub fn with_failing_seeks(mut self, timestamps: &[f64]) -> Self {
        self.failing_ms = timestamps.iter().map(|t| (t * 1000.0).round() as u64).collect();
        self
    }
}

#[async_trait]
impl VideoSource for ScriptedVideoSource {
    async fn info(&self) -> CaptureResult<VideoInfo> {
        Ok(self.info)
    }

    async fn frame_at(&self, timestamp: f64) -> CaptureResult<VideoFrame> {
        let ms = (timestamp * 1000.0).round() as u64;
        if self.failing_ms.contains(&ms) {
            return Err(CaptureError::seek_failed(timestamp, "scripted seek failure"));
        }
        let shade = (ms % 251) as u8;
        let image = RgbaImage::from_pixel(
            self.info.width,
            self.info.height,
            image::Rgba([shade, 64, 64, 255]),
        );
        Ok(VideoFrame { image, timestamp })
    }
}

/// Parse frame rate string (e.g., "30/1" or "29.97").
fn parse_frame_rate(s: &str) -> Option<f64> {
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate() {
        assert!((parse_frame_rate("30/1").unwrap() - 30.0).abs() < 0.01);
        assert!((parse_frame_rate("30000/1001").unwrap() - 29.97).abs() < 0.01);
        assert!((parse_frame_rate("29.97").unwrap() - 29.97).abs() < 0.01);
        assert!(parse_frame_rate("x").is_none());
    }

    #[tokio::test]
    async fn test_scripted_source_is_deterministic() {
        let source = ScriptedVideoSource::new(2.0, 64, 48, 30.0);
        let a = source.frame_at(0.5).await.unwrap();
        let b = source.frame_at(0.5).await.unwrap();
        assert_eq!(a.image.as_raw(), b.image.as_raw());
        assert_eq!(a.width(), 64);
        assert_eq!(a.height(), 48);
    }

    #[tokio::test]
    async fn test_scripted_source_failing_seek() {
        let source = ScriptedVideoSource::new(2.0, 64, 48, 30.0).with_failing_seeks(&[1.0]);
        assert!(source.frame_at(0.5).await.is_ok());
        assert!(matches!(
            source.frame_at(1.0).await,
            Err(CaptureError::SeekFailed { .. })
        ));
    }

    #[test]
    fn test_missing_file_rejected() {
        assert!(matches!(
            FfmpegVideoSource::open("/definitely/not/here.mp4"),
            Err(CaptureError::FileNotFound(_))
        ));
    }
}
