//! Foreground isolation.
//!
//! Pluggable per-frame subject/background separation. The pipeline invokes
//! it only on a fixed subsample of successful frames and swallows every
//! isolation error, so a failing isolator can never break extraction.

use swinglab_models::{IsolationMask, Keypoint, Landmark, MaskBox};

use crate::error::{CaptureError, CaptureResult};
use crate::video::VideoFrame;

/// Per-frame foreground isolation capability.
///
/// Keypoints are available as a segmentation prior; the internal algorithm
/// is unspecified.
pub trait ForegroundIsolator: Send + Sync {
    fn isolate(&self, frame: &VideoFrame, keypoints: &[Keypoint]) -> CaptureResult<IsolationMask>;
}

/// Limb segments used to seed the silhouette.
const LIMBS: [(Landmark, Landmark); 12] = [
    (Landmark::LeftShoulder, Landmark::RightShoulder),
    (Landmark::LeftShoulder, Landmark::LeftElbow),
    (Landmark::LeftElbow, Landmark::LeftWrist),
    (Landmark::RightShoulder, Landmark::RightElbow),
    (Landmark::RightElbow, Landmark::RightWrist),
    (Landmark::LeftShoulder, Landmark::LeftHip),
    (Landmark::RightShoulder, Landmark::RightHip),
    (Landmark::LeftHip, Landmark::RightHip),
    (Landmark::LeftHip, Landmark::LeftKnee),
    (Landmark::LeftKnee, Landmark::LeftAnkle),
    (Landmark::RightHip, Landmark::RightKnee),
    (Landmark::RightKnee, Landmark::RightAnkle),
];

/// Default isolator: a keypoint-seeded silhouette on a downsampled grid.
///
/// Pixels within a body-scaled radius of any limb segment are foreground.
/// The mask is produced at `1 / downsample` of the source resolution, one
/// byte per mask pixel, keeping accumulated memory bounded.
pub struct KeypointPriorIsolator {
    /// Source-to-mask shrink factor.
    downsample: u32,
    /// Radius around limb segments as a fraction of the torso length.
    radius_scale: f64,
    /// Keypoints below this visibility do not seed the silhouette.
    visibility_threshold: f64,
}

impl KeypointPriorIsolator {
    pub fn new(downsample: u32) -> Self {
        Self {
            downsample: downsample.max(1),
            radius_scale: 0.35,
            visibility_threshold: 0.5,
        }
    }

    fn torso_length(&self, keypoints: &[Keypoint]) -> Option<f64> {
        let shoulder = keypoints.get(Landmark::LeftShoulder.index())?;
        let hip = keypoints.get(Landmark::LeftHip.index())?;
        if !shoulder.is_visible(self.visibility_threshold)
            || !hip.is_visible(self.visibility_threshold)
        {
            return None;
        }
        let len = ((shoulder.x - hip.x).powi(2) + (shoulder.y - hip.y).powi(2)).sqrt();
        (len > 1.0).then_some(len)
    }
}

impl Default for KeypointPriorIsolator {
    fn default() -> Self {
        Self::new(4)
    }
}

/// Squared distance from point `p` to segment `a`-`b`.
fn dist_sq_to_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (px, py) = p;
    let (ax, ay) = a;
    let (bx, by) = b;
    let (dx, dy) = (bx - ax, by - ay);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (ax + t * dx, ay + t * dy);
    (px - cx).powi(2) + (py - cy).powi(2)
}

impl ForegroundIsolator for KeypointPriorIsolator {
    fn isolate(&self, frame: &VideoFrame, keypoints: &[Keypoint]) -> CaptureResult<IsolationMask> {
        if keypoints.len() != Landmark::COUNT {
            return Err(CaptureError::isolation_failed(format!(
                "expected {} keypoints, got {}",
                Landmark::COUNT,
                keypoints.len()
            )));
        }

        let radius = self.torso_length(keypoints).map(|t| t * self.radius_scale).ok_or_else(
            || CaptureError::isolation_failed("torso landmarks not visible enough for a prior"),
        )?;
        let radius_sq = radius * radius;

        let mask_w = (frame.width() / self.downsample).max(1);
        let mask_h = (frame.height() / self.downsample).max(1);
        let scale = self.downsample as f64;

        let segments: Vec<((f64, f64), (f64, f64))> = LIMBS
            .iter()
            .filter_map(|(a, b)| {
                let ka = &keypoints[a.index()];
                let kb = &keypoints[b.index()];
                (ka.is_visible(self.visibility_threshold)
                    && kb.is_visible(self.visibility_threshold))
                .then_some(((ka.x, ka.y), (kb.x, kb.y)))
            })
            .collect();

        if segments.is_empty() {
            return Err(CaptureError::isolation_failed(
                "no visible limb segments to seed the silhouette",
            ));
        }

        let mut data = vec![0u8; (mask_w as usize) * (mask_h as usize)];
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (mask_w, mask_h, 0u32, 0u32);

        for my in 0..mask_h {
            for mx in 0..mask_w {
                // Sample at the center of the mask cell in source coordinates.
                let p = ((mx as f64 + 0.5) * scale, (my as f64 + 0.5) * scale);
                let inside = segments
                    .iter()
                    .any(|(a, b)| dist_sq_to_segment(p, *a, *b) <= radius_sq);
                if inside {
                    data[(my as usize) * (mask_w as usize) + mx as usize] = 255;
                    min_x = min_x.min(mx);
                    min_y = min_y.min(my);
                    max_x = max_x.max(mx);
                    max_y = max_y.max(my);
                }
            }
        }

        let bbox = if max_x >= min_x && max_y >= min_y {
            MaskBox::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
        } else {
            return Err(CaptureError::isolation_failed("empty silhouette"));
        };

        IsolationMask::new(0, mask_w, mask_h, data, bbox)
            .ok_or_else(|| CaptureError::isolation_failed("mask buffer size mismatch"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn frame(w: u32, h: u32) -> VideoFrame {
        VideoFrame {
            image: RgbaImage::new(w, h),
            timestamp: 0.0,
        }
    }

    /// Upright figure centered in a w x h frame.
    fn standing_keypoints(w: f64, h: f64) -> Vec<Keypoint> {
        let mut kps = vec![Keypoint::default(); Landmark::COUNT];
        let mut set = |l: Landmark, x: f64, y: f64| {
            kps[l.index()] = Keypoint::new(x, y, 0.0, 0.95);
        };
        set(Landmark::LeftShoulder, w * 0.45, h * 0.25);
        set(Landmark::RightShoulder, w * 0.55, h * 0.25);
        set(Landmark::LeftElbow, w * 0.40, h * 0.40);
        set(Landmark::RightElbow, w * 0.60, h * 0.40);
        set(Landmark::LeftWrist, w * 0.38, h * 0.52);
        set(Landmark::RightWrist, w * 0.62, h * 0.52);
        set(Landmark::LeftHip, w * 0.46, h * 0.55);
        set(Landmark::RightHip, w * 0.54, h * 0.55);
        set(Landmark::LeftKnee, w * 0.46, h * 0.72);
        set(Landmark::RightKnee, w * 0.54, h * 0.72);
        set(Landmark::LeftAnkle, w * 0.46, h * 0.90);
        set(Landmark::RightAnkle, w * 0.54, h * 0.90);
        kps
    }

    #[test]
    fn test_mask_is_downsampled_byte_buffer() {
        let isolator = KeypointPriorIsolator::new(4);
        let mask = isolator
            .isolate(&frame(160, 120), &standing_keypoints(160.0, 120.0))
            .unwrap();
        assert_eq!(mask.width, 40);
        assert_eq!(mask.height, 30);
        assert_eq!(mask.data.len(), 40 * 30);
    }

    #[test]
    fn test_silhouette_covers_torso_not_corners() {
        let isolator = KeypointPriorIsolator::new(2);
        let mask = isolator
            .isolate(&frame(160, 120), &standing_keypoints(160.0, 120.0))
            .unwrap();
        // Torso center is foreground.
        assert_eq!(mask.coverage(mask.width / 2, (mask.height as f64 * 0.4) as u32), 255);
        // Frame corners are background.
        assert_eq!(mask.coverage(0, 0), 0);
        assert_eq!(mask.coverage(mask.width - 1, mask.height - 1), 0);
        let ratio = mask.foreground_ratio();
        assert!(ratio > 0.02 && ratio < 0.8, "ratio {ratio}");
    }

    #[test]
    fn test_bbox_tracks_figure() {
        let isolator = KeypointPriorIsolator::new(2);
        let mask = isolator
            .isolate(&frame(160, 120), &standing_keypoints(160.0, 120.0))
            .unwrap();
        let bbox = mask.bbox;
        assert!(bbox.width < mask.width);
        assert!(bbox.height > mask.height / 2);
    }

    #[test]
    fn test_invisible_keypoints_fail_gracefully() {
        let isolator = KeypointPriorIsolator::default();
        let kps = vec![Keypoint::default(); Landmark::COUNT];
        assert!(matches!(
            isolator.isolate(&frame(64, 48), &kps),
            Err(CaptureError::IsolationFailed(_))
        ));
    }

    #[test]
    fn test_wrong_vocabulary_size_rejected() {
        let isolator = KeypointPriorIsolator::default();
        let kps = vec![Keypoint::default(); 17];
        assert!(isolator.isolate(&frame(64, 48), &kps).is_err());
    }
}
