//! `MotionDetector`: the orchestrator that turns a stream of grayscale
//! frames into per-frame bounding boxes, owning every working buffer so
//! that `detect()` never allocates.
//!
//! Frame width/height are runtime constructor parameters, not const
//! generics — the same reasoning `Labeler` documents applies here too: a
//! caller driving this from a JPEG decoder only knows the frame's
//! dimensions once it has decoded the first image, not at compile time.
//! `MAX_BOXES` stays a const generic since it is a pure output-capacity
//! policy, independent of any frame's actual size.

use std::num::NonZeroU32;

use crate::error::CoreError;
use crate::image::{ImageView, ImageViewMut, PixelGrid};
use crate::labeler::Labeler;
use crate::transforms;
use crate::BoundingBox;

/// Governs when the reference (background) frame is refreshed.
///
/// The original implementation only ever replaced the reference with the
/// incoming frame on every call, which makes a first real motion event
/// permanently redraw the background around it (the "ghost box" effect:
/// whatever moved becomes part of the new background on the very next
/// frame). This enum makes that choice explicit and configurable instead
/// of implicit in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferencePolicy {
    /// Replace the reference with every incoming frame after `detect()`
    /// runs — the original implementation's only behavior.
    EveryFrame,
    /// Replace the reference every `N`th call to `detect()`.
    EveryN(NonZeroU32),
    /// Never replace the reference automatically; callers update it via
    /// [`MotionDetector::set_reference`].
    Manual,
}

/// Downscale factor, threshold, dilation granularity and output box count
/// are all fixed at construction so every per-frame buffer can be sized
/// once. `frame_w x frame_h` is the input frame's resolution; the working
/// resolution after downscaling is `frame_w / downscale_factor x frame_h /
/// downscale_factor`.
pub struct MotionDetector<const MAX_BOXES: usize = 5> {
    frame_w: u32,
    frame_h: u32,
    downscale_factor: u32,
    threshold: u8,
    granularity: u32,
    min_bbox_dim: u32,
    reference_policy: ReferencePolicy,
    frames_since_reference_update: u32,

    reference: Box<[u8]>,
    scaled: Box<[u8]>,
    diff: Box<[u8]>,
    dilated: Box<[u8]>,
    labeler: Labeler<MAX_BOXES>,

    scaled_w: u32,
    scaled_h: u32,

    cursor: usize,
}

impl<const MAX_BOXES: usize> MotionDetector<MAX_BOXES> {
    /// `downscale_factor` must evenly divide both `frame_w` and `frame_h`;
    /// `1` disables downscaling. `granularity` is the dilation structuring
    /// element's side length in the (possibly downscaled) working
    /// resolution, defaulting to `1 + min(w, h) / (8 * downscale_factor)`
    /// when `None` is passed, mirroring the original implementation's
    /// default. `min_bbox_dim` filters out components whose shorter side
    /// (in the working resolution) is smaller than this, defaulting to `16`
    /// when `None` is passed.
    ///
    /// Panics if `frame_w`/`frame_h` are zero, `downscale_factor` is zero
    /// or does not evenly divide the frame dimensions, or the resolved
    /// `granularity` is zero — all precondition violations per spec's error
    /// taxonomy.
    pub fn new(
        frame_w: u32,
        frame_h: u32,
        downscale_factor: u32,
        threshold: u8,
        granularity: Option<u32>,
        min_bbox_dim: Option<u32>,
        reference_policy: ReferencePolicy,
    ) -> Self {
        if frame_w == 0 || frame_h == 0 {
            CoreError::InvalidConstruction {
                reason: "frame width and height must both be > 0",
            }
            .panic();
        }
        if downscale_factor == 0 {
            CoreError::InvalidConstruction {
                reason: "downscale factor must be > 0",
            }
            .panic();
        }
        if frame_w % downscale_factor != 0 || frame_h % downscale_factor != 0 {
            CoreError::InvalidConstruction {
                reason: "downscale factor must evenly divide both frame dimensions",
            }
            .panic();
        }
        let scaled_w = frame_w / downscale_factor;
        let scaled_h = frame_h / downscale_factor;
        let granularity = granularity.unwrap_or_else(|| 1 + scaled_w.min(scaled_h) / 8);
        if granularity == 0 {
            CoreError::InvalidConstruction {
                reason: "dilation granularity must be > 0",
            }
            .panic();
        }
        let min_bbox_dim = min_bbox_dim.unwrap_or(16);

        Self {
            frame_w,
            frame_h,
            downscale_factor,
            threshold,
            granularity,
            min_bbox_dim,
            reference_policy,
            frames_since_reference_update: 0,
            reference: vec![0u8; (scaled_w * scaled_h) as usize].into_boxed_slice(),
            scaled: vec![0u8; (scaled_w * scaled_h) as usize].into_boxed_slice(),
            diff: vec![0u8; (scaled_w * scaled_h) as usize].into_boxed_slice(),
            dilated: vec![0u8; (scaled_w * scaled_h) as usize].into_boxed_slice(),
            labeler: Labeler::new(scaled_w, scaled_h),
            scaled_w,
            scaled_h,
            cursor: 0,
        }
    }

    fn downscale_into(&mut self, frame: &dyn PixelGrid) {
        if self.downscale_factor == 1 {
            for row in 0..self.scaled_h {
                for col in 0..self.scaled_w {
                    self.scaled[(row * self.scaled_w + col) as usize] = frame.at(row, col);
                }
            }
        } else {
            let mut dst = ImageViewMut::new(&mut self.scaled, self.scaled_w, self.scaled_h);
            transforms::downscale(&mut dst, frame, self.downscale_factor);
        }
    }

    fn check_frame_shape(&self, frame: &dyn PixelGrid, operation: &'static str) {
        if frame.width() != self.frame_w || frame.height() != self.frame_h {
            CoreError::ShapeMismatch {
                operation,
                expected: (self.frame_w, self.frame_h),
                actual: (frame.width(), frame.height()),
            }
            .panic();
        }
    }

    /// Replaces the reference (background) frame with `frame` immediately,
    /// regardless of [`ReferencePolicy`]. Used both for the initial
    /// reference and for [`ReferencePolicy::Manual`] callers.
    pub fn set_reference(&mut self, frame: &dyn PixelGrid) {
        self.check_frame_shape(frame, "MotionDetector::set_reference");
        self.downscale_into(frame);
        self.reference.copy_from_slice(&self.scaled);
        self.frames_since_reference_update = 0;
    }

    /// Runs the full pipeline — (downscale →) absdiff against the
    /// reference → threshold → dilate → label — and returns up to
    /// `MAX_BOXES` bounding boxes in the *working* (possibly downscaled)
    /// coordinate space, most prominent first. Applies the configured
    /// [`ReferencePolicy`] afterward.
    ///
    /// Panics if `frame`'s dimensions don't match this detector's
    /// construction-time `frame_w x frame_h`.
    pub fn detect(&mut self, frame: &dyn PixelGrid) -> &[BoundingBox] {
        self.check_frame_shape(frame, "MotionDetector::detect");
        tracing::trace!(scaled_w = self.scaled_w, scaled_h = self.scaled_h, "detect: frame accepted");

        self.downscale_into(frame);

        {
            let scaled_view = ImageView::new(&self.scaled, self.scaled_w, self.scaled_h);
            let reference_view = ImageView::new(&self.reference, self.scaled_w, self.scaled_h);
            let mut diff_view = ImageViewMut::new(&mut self.diff, self.scaled_w, self.scaled_h);
            transforms::absdiff(&mut diff_view, &scaled_view, &reference_view);
        }
        {
            let diff_snapshot = ImageView::new(&self.diff, self.scaled_w, self.scaled_h);
            let mut diff_view = ImageViewMut::new(&mut self.diff, self.scaled_w, self.scaled_h);
            transforms::threshold(&mut diff_view, &diff_snapshot, self.threshold);
        }
        {
            let diff_view = ImageView::new(&self.diff, self.scaled_w, self.scaled_h);
            let mut dilated_view = ImageViewMut::new(&mut self.dilated, self.scaled_w, self.scaled_h);
            transforms::dilate(&mut dilated_view, &diff_view, self.granularity);
        }

        let dilated_view = ImageView::new(&self.dilated, self.scaled_w, self.scaled_h);
        let box_count = self.labeler.label(&dilated_view, self.min_bbox_dim).len();
        self.cursor = 0;
        if self.labeler.last_call_saturated() {
            tracing::debug!("detect: labeler hit the 255-label cap, some components were dropped");
        }

        self.frames_since_reference_update += 1;
        match self.reference_policy {
            ReferencePolicy::EveryFrame => {
                self.reference.copy_from_slice(&self.scaled);
                self.frames_since_reference_update = 0;
            }
            ReferencePolicy::EveryN(n) => {
                if self.frames_since_reference_update >= n.get() {
                    self.reference.copy_from_slice(&self.scaled);
                    self.frames_since_reference_update = 0;
                }
            }
            ReferencePolicy::Manual => {}
        }

        tracing::trace!(boxes = box_count, "detect: done");
        &self.labeler.last_output()[..box_count]
    }

    /// Pulls the next box from the most recent [`detect`](Self::detect)
    /// call, or `None` once the sequence is exhausted — at which point the
    /// cursor resets, so the following call restarts from the first box.
    /// Mirrors the original implementation's streaming `get_bounding_box()`
    /// iteration contract (spec.md §4.6) for callers who prefer pull-based
    /// iteration over the plain slice `detect` already returns.
    pub fn next_bounding_box(&mut self) -> Option<BoundingBox> {
        let boxes = self.labeler.last_output();
        if self.cursor >= boxes.len() {
            self.cursor = 0;
            return None;
        }
        let bbox = boxes[self.cursor];
        self.cursor += 1;
        Some(bbox)
    }

    pub fn frame_width(&self) -> u32 {
        self.frame_w
    }

    pub fn frame_height(&self) -> u32 {
        self.frame_h
    }

    pub fn scaled_width(&self) -> u32 {
        self.scaled_w
    }

    pub fn scaled_height(&self) -> u32 {
        self.scaled_h
    }

    pub fn downscale_factor(&self) -> u32 {
        self.downscale_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::StaticImage;

    #[test]
    fn identical_frames_produce_no_boxes() {
        let mut detector = MotionDetector::<5>::new(16, 16, 1, 30, Some(3), Some(1), ReferencePolicy::EveryFrame);
        let frame = StaticImage::<16, 16>::new();
        detector.set_reference(&frame.view());
        let boxes = detector.detect(&frame.view());
        assert!(boxes.is_empty());
    }

    #[test]
    fn single_bright_block_is_detected() {
        let mut detector = MotionDetector::<5>::new(16, 16, 1, 30, Some(3), Some(1), ReferencePolicy::EveryFrame);
        let background = StaticImage::<16, 16>::new();
        detector.set_reference(&background.view());

        let mut frame = StaticImage::<16, 16>::new();
        for y in 6..10 {
            for x in 6..10 {
                frame.view_mut().set(y, x, 255);
            }
        }
        let boxes = detector.detect(&frame.view());
        assert_eq!(boxes.len(), 1);
        assert!(boxes[0].width() >= 4);
        assert!(boxes[0].height() >= 4);
    }

    #[test]
    #[should_panic(expected = "shape mismatch")]
    fn detect_rejects_wrong_sized_frame() {
        let mut detector = MotionDetector::<5>::new(16, 16, 1, 30, Some(3), Some(1), ReferencePolicy::EveryFrame);
        let wrong = StaticImage::<8, 8>::new();
        detector.set_reference(&wrong.view());
    }

    #[test]
    fn every_frame_policy_tracks_a_slowly_drifting_background() {
        let mut detector = MotionDetector::<5>::new(16, 16, 1, 30, Some(3), Some(1), ReferencePolicy::EveryFrame);
        let background = StaticImage::<16, 16>::new();
        detector.set_reference(&background.view());

        let mut frame = StaticImage::<16, 16>::new();
        for y in 6..10 {
            for x in 6..10 {
                frame.view_mut().set(y, x, 255);
            }
        }
        let first = detector.detect(&frame.view()).len();
        let second = detector.detect(&frame.view()).len();
        assert_eq!(first, 1);
        assert_eq!(second, 0); // frame became its own reference after the first call
    }

    #[test]
    fn manual_policy_keeps_tracking_moved_object_against_original_background() {
        let mut detector = MotionDetector::<5>::new(16, 16, 1, 30, Some(3), Some(1), ReferencePolicy::Manual);
        let background = StaticImage::<16, 16>::new();
        detector.set_reference(&background.view());

        let mut frame = StaticImage::<16, 16>::new();
        for y in 6..10 {
            for x in 6..10 {
                frame.view_mut().set(y, x, 255);
            }
        }
        let first = detector.detect(&frame.view()).len();
        let second = detector.detect(&frame.view()).len();
        assert_eq!(first, 1);
        assert_eq!(second, 1); // reference never advances under Manual
    }

    #[test]
    fn downscale_factor_shrinks_working_resolution() {
        let detector = MotionDetector::<5>::new(32, 32, 4, 30, Some(2), Some(1), ReferencePolicy::EveryFrame);
        assert_eq!(detector.scaled_width(), 8);
        assert_eq!(detector.scaled_height(), 8);
    }

    #[test]
    fn next_bounding_box_iterates_then_resets() {
        let mut detector = MotionDetector::<5>::new(16, 16, 1, 30, Some(3), Some(1), ReferencePolicy::EveryFrame);
        let background = StaticImage::<16, 16>::new();
        detector.set_reference(&background.view());

        let mut frame = StaticImage::<16, 16>::new();
        for (x, y) in [(1, 1), (12, 12)] {
            for dy in 0..2 {
                for dx in 0..2 {
                    frame.view_mut().set(y + dy, x + dx, 255);
                }
            }
        }
        detector.detect(&frame.view());
        let first = detector.next_bounding_box();
        let second = detector.next_bounding_box();
        let third = detector.next_bounding_box();
        assert!(first.is_some());
        assert!(second.is_some());
        assert!(third.is_none());
        // cursor reset: iterating again from the start yields a box.
        assert!(detector.next_bounding_box().is_some());
    }
}
