//! Dual-sequence overlay/split renderer.
//!
//! The renderer is a pure function of `(play-head time, sequences, masks,
//! mode, impact frame)`: it writes one composed image per tick and holds no
//! cross-call state, so it is safe to call on every play-head update. Any
//! per-element failure (missing frame, absent font, out-of-bounds geometry)
//! degrades to skipping that draw, never to halting playback.

use ab_glyph::{FontVec, PxScale};
use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut, draw_text_mut,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use swinglab_models::{IsolationMask, SkeletonFrame, SkeletonSequence};

use crate::skeleton::{DIVIDER_COLOR, IMPACT_COLOR, MODEL_COLOR, SKELETON_EDGES, SUBJECT_COLOR};
use crate::sync::canonical_index;

/// Brightness kept for pixels outside the isolation mask.
const DIM_FACTOR: f32 = 0.4;

/// Joint dot radius in pixels.
const JOINT_RADIUS: i32 = 3;

/// Visualization layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Both skeletons over one video image.
    Overlay,
    /// Side-by-side halves, one skeleton each.
    Split,
}

/// Everything one render tick reads.
#[derive(Clone, Copy)]
pub struct RenderInput<'a> {
    /// Decoded video image for the current play-head position.
    pub video_frame: &'a RgbaImage,
    /// Play-head time in seconds.
    pub time: f64,
    /// Reference ("model") sequence.
    pub model: Option<&'a SkeletonSequence>,
    /// Player ("subject") sequence.
    pub subject: Option<&'a SkeletonSequence>,
    /// Isolation masks for this playback session, if any.
    pub masks: &'a [IsolationMask],
    /// Dim the background outside the subject mask.
    pub show_isolation: bool,
    pub mode: RenderMode,
    /// Caller-designated contact frame; draws a cosmetic marker only.
    pub impact_frame: Option<u32>,
}

/// Mapping from sequence pixel space into a canvas region.
#[derive(Debug, Clone, Copy)]
struct Placement {
    scale_x: f64,
    scale_y: f64,
    offset_x: f64,
}

impl Placement {
    fn apply(&self, x: f64, y: f64) -> (f32, f32) {
        (
            (x * self.scale_x + self.offset_x) as f32,
            (y * self.scale_y) as f32,
        )
    }
}

/// Stateless dual-sequence renderer.
pub struct Renderer {
    canonical_fps: f64,
    visibility_threshold: f64,
    label_font: Option<FontVec>,
}

impl Renderer {
    /// Create a renderer for the declared nominal rendering rate.
    pub fn new(canonical_fps: f64) -> Self {
        Self {
            canonical_fps,
            visibility_threshold: 0.5,
            label_font: None,
        }
    }

    /// Override the edge/joint visibility threshold.
    pub fn with_visibility_threshold(mut self, threshold: f64) -> Self {
        self.visibility_threshold = threshold;
        self
    }

    /// Supply a TTF/OTF font for split-view labels.
    ///
    /// An unparsable font is dropped and labels are skipped, in keeping with
    /// per-element degradation.
    pub fn with_label_font(mut self, bytes: Vec<u8>) -> Self {
        match FontVec::try_from_vec(bytes) {
            Ok(font) => self.label_font = Some(font),
            Err(e) => debug!(error = %e, "label font unusable, labels will be skipped"),
        }
        self
    }

    pub fn canonical_fps(&self) -> f64 {
        self.canonical_fps
    }

    /// Compose one tick onto `canvas`.
    ///
    /// Identical inputs produce pixel-identical output.
    pub fn render(&self, input: &RenderInput<'_>, canvas: &mut RgbaImage) {
        let index = canonical_index(input.time, self.canonical_fps);
        match input.mode {
            RenderMode::Overlay => self.render_overlay(input, index, canvas),
            RenderMode::Split => self.render_split(input, index, canvas),
        }

        if input.impact_frame == Some(index) {
            let cx = canvas.width() as i32 / 2;
            let cy = (canvas.height() / 8) as i32;
            draw_hollow_circle_mut(canvas, (cx, cy), 12, IMPACT_COLOR);
            draw_hollow_circle_mut(canvas, (cx, cy), 13, IMPACT_COLOR);
        }
    }

    fn render_overlay(&self, input: &RenderInput<'_>, index: u32, canvas: &mut RgbaImage) {
        self.blit(input.video_frame, canvas, canvas.width(), canvas.height(), 0);

        if input.show_isolation {
            if let Some(mask) = input.masks.iter().find(|m| m.frame_index == index) {
                dim_outside_mask(canvas, mask);
            }
        }

        // Model first so the subject reads on top where they cross.
        if let Some(frame) = lookup(input.model, index) {
            let placement = self.placement(input.model, canvas.width(), canvas.height(), 0);
            self.draw_skeleton(canvas, frame, MODEL_COLOR, placement);
        }
        if let Some(frame) = lookup(input.subject, index) {
            let placement = self.placement(input.subject, canvas.width(), canvas.height(), 0);
            self.draw_skeleton(canvas, frame, SUBJECT_COLOR, placement);
        }
    }

    fn render_split(&self, input: &RenderInput<'_>, index: u32, canvas: &mut RgbaImage) {
        let (w, h) = canvas.dimensions();
        let half_w = (w / 2).max(1);

        self.blit(input.video_frame, canvas, half_w, h, 0);
        self.blit(input.video_frame, canvas, half_w, h, half_w as i64);

        if let Some(frame) = lookup(input.model, index) {
            let placement = self.placement(input.model, half_w, h, 0);
            self.draw_skeleton(canvas, frame, MODEL_COLOR, placement);
        }
        if let Some(frame) = lookup(input.subject, index) {
            let placement = self.placement(input.subject, half_w, h, half_w as i64);
            self.draw_skeleton(canvas, frame, SUBJECT_COLOR, placement);
        }

        // Divider between the halves.
        draw_line_segment_mut(
            canvas,
            (half_w as f32, 0.0),
            (half_w as f32, h as f32),
            DIVIDER_COLOR,
        );
        draw_line_segment_mut(
            canvas,
            (half_w as f32 - 1.0, 0.0),
            (half_w as f32 - 1.0, h as f32),
            DIVIDER_COLOR,
        );

        if let Some(font) = &self.label_font {
            let scale = PxScale::from((h as f32 * 0.045).max(14.0));
            draw_text_mut(canvas, MODEL_COLOR, 8, 8, scale, font, "MODEL");
            draw_text_mut(
                canvas,
                SUBJECT_COLOR,
                half_w as i32 + 8,
                8,
                scale,
                font,
                "PLAYER",
            );
        }
    }

    /// Copy the video image into a `region_w` x `region_h` region at
    /// horizontal offset `offset_x`, scaling when the sizes differ.
    fn blit(
        &self,
        video: &RgbaImage,
        canvas: &mut RgbaImage,
        region_w: u32,
        region_h: u32,
        offset_x: i64,
    ) {
        if video.dimensions() == (region_w, region_h) {
            imageops::replace(canvas, video, offset_x, 0);
        } else {
            let scaled = imageops::resize(video, region_w, region_h, imageops::FilterType::Triangle);
            imageops::replace(canvas, &scaled, offset_x, 0);
        }
    }

    fn placement(
        &self,
        sequence: Option<&SkeletonSequence>,
        region_w: u32,
        region_h: u32,
        offset_x: i64,
    ) -> Placement {
        let (seq_w, seq_h) = sequence
            .map(|s| (s.width.max(1), s.height.max(1)))
            .unwrap_or((region_w.max(1), region_h.max(1)));
        Placement {
            scale_x: region_w as f64 / seq_w as f64,
            scale_y: region_h as f64 / seq_h as f64,
            offset_x: offset_x as f64,
        }
    }

    fn draw_skeleton(
        &self,
        canvas: &mut RgbaImage,
        frame: &SkeletonFrame,
        color: Rgba<u8>,
        placement: Placement,
    ) {
        for (a, b) in SKELETON_EDGES {
            // An edge with a missing or low-visibility endpoint is skipped,
            // never drawn to an extrapolated position.
            let (Some(ka), Some(kb)) = (frame.keypoint(a), frame.keypoint(b)) else {
                continue;
            };
            if !ka.is_visible(self.visibility_threshold) || !kb.is_visible(self.visibility_threshold)
            {
                continue;
            }
            let pa = placement.apply(ka.x, ka.y);
            let pb = placement.apply(kb.x, kb.y);
            if !pa.0.is_finite() || !pa.1.is_finite() || !pb.0.is_finite() || !pb.1.is_finite() {
                continue;
            }
            draw_line_segment_mut(canvas, pa, pb, color);
        }

        for keypoint in &frame.keypoints {
            if !keypoint.is_visible(self.visibility_threshold) {
                continue;
            }
            let (px, py) = placement.apply(keypoint.x, keypoint.y);
            if !px.is_finite() || !py.is_finite() {
                continue;
            }
            draw_filled_circle_mut(canvas, (px as i32, py as i32), JOINT_RADIUS, color);
        }
    }
}

/// Frame for the canonical index, or `None` — a gap omits the skeleton for
/// this tick; there is no hold-over of stale poses.
fn lookup(sequence: Option<&SkeletonSequence>, index: u32) -> Option<&SkeletonFrame> {
    sequence.and_then(|s| s.frame_at(index))
}

fn dim_outside_mask(canvas: &mut RgbaImage, mask: &IsolationMask) {
    let (w, h) = canvas.dimensions();
    for y in 0..h {
        for x in 0..w {
            if mask.coverage_at_source(x, y, w, h) < 128 {
                let pixel = canvas.get_pixel_mut(x, y);
                for channel in &mut pixel.0[..3] {
                    *channel = (*channel as f32 * DIM_FACTOR) as u8;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swinglab_models::{Keypoint, Landmark, MaskBox, SkeletonFrame};

    const W: u32 = 128;
    const H: u32 = 96;
    const FPS: f64 = 30.0;

    fn keypoints(visibility: f64) -> Vec<Keypoint> {
        Landmark::ALL
            .iter()
            .map(|l| {
                let i = l.index() as f64;
                Keypoint::new(
                    W as f64 * (0.3 + 0.4 * i / 33.0),
                    H as f64 * (0.1 + 0.8 * i / 33.0),
                    0.0,
                    visibility,
                )
            })
            .collect()
    }

    fn sequence(indices: &[u32], visibility: f64) -> SkeletonSequence {
        let mut seq = SkeletonSequence::new(FPS, W, H);
        seq.frames = indices
            .iter()
            .map(|&i| SkeletonFrame::new(i, i as f64 / FPS, keypoints(visibility)))
            .collect();
        seq
    }

    fn video() -> RgbaImage {
        RgbaImage::from_pixel(W, H, Rgba([120, 130, 140, 255]))
    }

    fn render_to_buffer(renderer: &Renderer, input: &RenderInput<'_>) -> Vec<u8> {
        let mut canvas = RgbaImage::new(W, H);
        renderer.render(input, &mut canvas);
        canvas.into_raw()
    }

    fn base_input<'a>(
        video: &'a RgbaImage,
        model: Option<&'a SkeletonSequence>,
        subject: Option<&'a SkeletonSequence>,
    ) -> RenderInput<'a> {
        RenderInput {
            video_frame: video,
            time: 0.05, // canonical index 1 at 30 fps
            model,
            subject,
            masks: &[],
            show_isolation: false,
            mode: RenderMode::Overlay,
            impact_frame: None,
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = Renderer::new(FPS);
        let video = video();
        let model = sequence(&[0, 1, 2], 0.9);
        let subject = sequence(&[0, 1, 2], 0.9);
        let input = base_input(&video, Some(&model), Some(&subject));

        assert_eq!(
            render_to_buffer(&renderer, &input),
            render_to_buffer(&renderer, &input)
        );
    }

    #[test]
    fn test_gap_omits_subject_entirely() {
        let renderer = Renderer::new(FPS);
        let video = video();
        let model = sequence(&[0, 1, 2], 0.9);
        // Subject has no frame at canonical index 1.
        let gappy = sequence(&[0, 2], 0.9);

        let with_gap = render_to_buffer(&renderer, &base_input(&video, Some(&model), Some(&gappy)));
        let without = render_to_buffer(&renderer, &base_input(&video, Some(&model), None));
        assert_eq!(with_gap, without);
    }

    #[test]
    fn test_low_visibility_skeleton_draws_nothing() {
        let renderer = Renderer::new(FPS);
        let video = video();
        let invisible = sequence(&[1], 0.1);

        let drawn = render_to_buffer(&renderer, &base_input(&video, None, Some(&invisible)));
        let blank = render_to_buffer(&renderer, &base_input(&video, None, None));
        assert_eq!(drawn, blank);
    }

    #[test]
    fn test_visible_skeleton_changes_pixels() {
        let renderer = Renderer::new(FPS);
        let video = video();
        let subject = sequence(&[1], 0.9);

        let drawn = render_to_buffer(&renderer, &base_input(&video, None, Some(&subject)));
        let blank = render_to_buffer(&renderer, &base_input(&video, None, None));
        assert_ne!(drawn, blank);
    }

    #[test]
    fn test_split_draws_divider() {
        let renderer = Renderer::new(FPS);
        let video = video();
        let mut input = base_input(&video, None, None);
        input.mode = RenderMode::Split;

        let mut canvas = RgbaImage::new(W, H);
        renderer.render(&input, &mut canvas);
        assert_eq!(*canvas.get_pixel(W / 2, H / 2), DIVIDER_COLOR);
    }

    #[test]
    fn test_isolation_dims_background_only() {
        let renderer = Renderer::new(FPS);
        let video = video();
        // Foreground strip down the middle of a 16x12 mask at index 1.
        let mut data = vec![0u8; 16 * 12];
        for y in 0..12usize {
            for x in 6..10usize {
                data[y * 16 + x] = 255;
            }
        }
        let mask = IsolationMask::new(1, 16, 12, data, MaskBox::new(6, 0, 4, 12)).unwrap();
        let masks = [mask];

        let mut input = base_input(&video, None, None);
        input.masks = &masks;
        input.show_isolation = true;

        let mut canvas = RgbaImage::new(W, H);
        renderer.render(&input, &mut canvas);

        // Outside the mask: dimmed, not erased.
        let outside = canvas.get_pixel(2, H / 2);
        assert_eq!(outside.0[0], (120.0 * DIM_FACTOR) as u8);
        assert_ne!(outside.0[0], 0);
        // Inside the mask: untouched.
        let inside = canvas.get_pixel(W / 2, H / 2);
        assert_eq!(inside.0[0], 120);
    }

    #[test]
    fn test_impact_marker_only_on_matching_index() {
        let renderer = Renderer::new(FPS);
        let video = video();

        let mut on = base_input(&video, None, None);
        on.impact_frame = Some(1);
        let mut off = base_input(&video, None, None);
        off.impact_frame = Some(7);

        assert_ne!(
            render_to_buffer(&renderer, &on),
            render_to_buffer(&renderer, &off)
        );
        assert_eq!(
            render_to_buffer(&renderer, &off),
            render_to_buffer(&renderer, &base_input(&video, None, None))
        );
    }

    #[test]
    fn test_truncated_keypoint_vector_degrades_instead_of_panicking() {
        // A stored sequence may come back malformed; rendering it must skip
        // the missing joints, not bring down the tick.
        let renderer = Renderer::new(FPS);
        let video = video();
        let mut short = sequence(&[1], 0.9);
        short.frames[0].keypoints.truncate(20);

        let mut canvas = RgbaImage::new(W, H);
        renderer.render(&base_input(&video, None, Some(&short)), &mut canvas);
    }

    #[test]
    fn test_missing_font_skips_labels_without_failing() {
        // A renderer with a bogus font byte blob drops it and still renders.
        let renderer = Renderer::new(FPS).with_label_font(vec![1, 2, 3]);
        let video = video();
        let mut input = base_input(&video, None, None);
        input.mode = RenderMode::Split;

        let mut canvas = RgbaImage::new(W, H);
        renderer.render(&input, &mut canvas);
    }
}
