//! Foreground isolation masks.
//!
//! Masks are produced on a fixed subsample of extraction frames and live for
//! one playback session. Storage is one coverage byte per pixel so the
//! accumulated memory stays bounded: `data.len() == width * height` always.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Integer pixel bounding box for the masked foreground region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MaskBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl MaskBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Clamp the box so it lies inside a `frame_w` x `frame_h` frame.
    pub fn clamp(self, frame_w: u32, frame_h: u32) -> Self {
        let x = self.x.min(frame_w.saturating_sub(1));
        let y = self.y.min(frame_h.saturating_sub(1));
        Self {
            x,
            y,
            width: self.width.min(frame_w - x),
            height: self.height.min(frame_h - y),
        }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Per-pixel foreground coverage for one sampled frame.
///
/// The mask may be lower resolution than the source frame; use
/// [`IsolationMask::coverage_at_source`] to sample it back up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IsolationMask {
    /// Canonical frame index this mask belongs to.
    pub frame_index: u32,
    /// Mask width in mask pixels.
    pub width: u32,
    /// Mask height in mask pixels.
    pub height: u32,
    /// One coverage byte per pixel, row-major. 0 = background, 255 = subject.
    pub data: Vec<u8>,
    /// Foreground bounding box in mask coordinates.
    pub bbox: MaskBox,
}

impl IsolationMask {
    /// Build a mask, checking the byte-per-pixel bound.
    ///
    /// Returns `None` when `data` is not exactly `width * height` bytes.
    pub fn new(frame_index: u32, width: u32, height: u32, data: Vec<u8>, bbox: MaskBox) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            frame_index,
            width,
            height,
            data,
            bbox: bbox.clamp(width, height),
        })
    }

    /// Coverage byte at mask coordinates, 0 outside the mask bounds.
    pub fn coverage(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Coverage at source-frame coordinates via nearest sampling.
    pub fn coverage_at_source(&self, x: u32, y: u32, source_w: u32, source_h: u32) -> u8 {
        if source_w == 0 || source_h == 0 {
            return 0;
        }
        let mx = (x as u64 * self.width as u64 / source_w as u64) as u32;
        let my = (y as u64 * self.height as u64 / source_h as u64) as u32;
        self.coverage(mx.min(self.width.saturating_sub(1)), my.min(self.height.saturating_sub(1)))
    }

    /// Share of mask pixels classified as foreground (coverage >= 128).
    pub fn foreground_ratio(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let fg = self.data.iter().filter(|&&b| b >= 128).count();
        fg as f64 / self.data.len() as f64
    }
}
