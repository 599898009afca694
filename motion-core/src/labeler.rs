//! Single-pass connected-components labeling over a binary (0/255) image,
//! producing the `MAX_BOXES` most prominent bounding boxes.
//!
//! Each foreground pixel inspects exactly two already-labeled neighbors —
//! west and (resolved) north — never a diagonal NW/NE lookup, matching
//! spec.md §4.4's literal algorithm and both original implementations
//! (`MotionDetector.h`, `CoreMotionDetector.h`), which only ever read
//! `W_label`/`N_label`.
//!
//! Labels live in a `u8` scratch buffer (`0` = background, `1..=255` =
//! component id) with a forwarding table resolving merged labels to their
//! root. Capacity tops out at 255 simultaneously-live components; once
//! exhausted, the entire raster scan stops (not just new-label allocation)
//! — a documented soft failure, not a precondition violation, since a
//! camera pointed at a field of static can legitimately produce more
//! "motion" blobs than the scratch buffer can track.
//!
//! Width and height are runtime fields rather than const generics: a
//! [`crate::detector::MotionDetector`] only knows its *working* resolution
//! (after an arbitrary downscale factor) at construction time, not at
//! compile time, so tying this type to const dimensions would force every
//! caller to either duplicate the algorithm or pick dimensions by hand.
//! Only `MAX_BOXES`, the output capacity, is fixed at compile time, since
//! that is a policy choice independent of frame size.

use crate::bbox::BoundingBox;
use crate::error::CoreError;
use crate::image::PixelGrid;

/// Holds the per-frame labeling scratch state for a fixed-size binary
/// image, keeping the top `MAX_BOXES` bounding boxes by shorter-side
/// length. Every buffer is allocated once in [`Labeler::new`] and reused by
/// every subsequent [`Labeler::label`] call.
pub struct Labeler<const MAX_BOXES: usize = 5> {
    width: u32,
    height: u32,
    labels: Box<[u8]>,
    parent: [u8; 256],
    bboxes: [BoundingBox; 256],
    output: [BoundingBox; MAX_BOXES],
    output_len: usize,
    saturated: bool,
}

impl<const MAX_BOXES: usize> Labeler<MAX_BOXES> {
    pub fn new(width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            CoreError::InvalidConstruction {
                reason: "labeler width and height must both be > 0",
            }
            .panic();
        }
        Self {
            width,
            height,
            labels: vec![0u8; (width * height) as usize].into_boxed_slice(),
            parent: [0u8; 256],
            bboxes: [BoundingBox::null(); 256],
            output: [BoundingBox::null(); MAX_BOXES],
            output_len: 0,
            saturated: false,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The bounding boxes produced by the most recent [`Labeler::label`]
    /// call.
    pub fn last_output(&self) -> &[BoundingBox] {
        &self.output[..self.output_len]
    }

    /// Whether the previous [`Labeler::label`] call hit the 255-label
    /// ceiling and silently dropped at least one component.
    pub fn last_call_saturated(&self) -> bool {
        self.saturated
    }

    fn resolve(&self, mut label: u8) -> u8 {
        while self.parent[label as usize] != label {
            label = self.parent[label as usize];
        }
        label
    }

    fn try_insert(&mut self, candidate: BoundingBox) {
        if self.output_len < MAX_BOXES {
            let mut i = self.output_len;
            while i > 0 && self.output[i - 1] < candidate {
                self.output[i] = self.output[i - 1];
                i -= 1;
            }
            self.output[i] = candidate;
            self.output_len += 1;
        } else if candidate > self.output[MAX_BOXES - 1] {
            let mut i = MAX_BOXES - 1;
            while i > 0 && self.output[i - 1] < candidate {
                self.output[i] = self.output[i - 1];
                i -= 1;
            }
            self.output[i] = candidate;
        }
    }

    /// Labels every nonzero pixel of `src` (any nonzero value counts as
    /// foreground; the pipeline only ever feeds this a 0/255 image), then
    /// returns up to `MAX_BOXES` bounding boxes with `shorter_side() >=
    /// min_dim`, sorted by descending shorter side.
    ///
    /// Panics if `src`'s dimensions don't match this labeler's.
    pub fn label(&mut self, src: &dyn PixelGrid, min_dim: u32) -> &[BoundingBox] {
        if src.width() != self.width || src.height() != self.height {
            CoreError::ShapeMismatch {
                operation: "Labeler::label",
                expected: (self.width, self.height),
                actual: (src.width(), src.height()),
            }
            .panic();
        }

        self.labels.fill(0);
        for i in 0..256 {
            self.parent[i] = i as u8;
            self.bboxes[i] = BoundingBox::null();
        }
        self.output_len = 0;
        self.saturated = false;

        let mut next_label: u16 = 1;
        let width = self.width;
        let height = self.height;

        // The scan loop condition is checked on every row and every column,
        // not just when a new label would be allocated: once `next_label`
        // exceeds the 8-bit label capacity the entire raster scan stops,
        // matching the original implementation's `next_label < capacity`
        // loop guard (which leaves later rows/columns unlabeled rather than
        // merely refusing to mint new labels while still unioning existing
        // ones).
        'scan: for row in 0..height {
            if next_label > 255 {
                self.saturated = true;
                break 'scan;
            }
            for col in 0..width {
                if next_label > 255 {
                    self.saturated = true;
                    break 'scan;
                }

                if src.at(row, col) == 0 {
                    continue;
                }

                // Only the west and (resolved) north neighbor are
                // inspected — no NW/NE lookups — per spec.md §4.4's
                // literal two-neighbor algorithm.
                let w_label = if col == 0 {
                    0
                } else {
                    self.labels[(row * width + col - 1) as usize]
                };
                let n_raw = if row == 0 {
                    0
                } else {
                    self.labels[((row - 1) * width + col) as usize]
                };
                let n_label = if n_raw == 0 { 0 } else { self.resolve(n_raw) };

                let point = BoundingBox::new_point(col, row);

                match (w_label, n_label) {
                    (0, 0) => {
                        let label = next_label as u8;
                        next_label += 1;
                        self.labels[(row * width + col) as usize] = label;
                        self.parent[label as usize] = label;
                        self.bboxes[label as usize] = point;
                    }
                    (w, 0) => {
                        self.labels[(row * width + col) as usize] = w;
                        self.bboxes[w as usize] = self.bboxes[w as usize].merge(&point);
                    }
                    (0, n) => {
                        self.labels[(row * width + col) as usize] = n;
                        self.bboxes[n as usize] = self.bboxes[n as usize].merge(&point);
                    }
                    (w, n) if w == n => {
                        self.labels[(row * width + col) as usize] = w;
                        self.bboxes[w as usize] = self.bboxes[w as usize].merge(&point);
                    }
                    (w, n) => {
                        let (smaller, larger) = if w < n { (w, n) } else { (n, w) };
                        self.labels[(row * width + col) as usize] = smaller;
                        let larger_bbox = self.bboxes[larger as usize];
                        self.bboxes[smaller as usize] =
                            self.bboxes[smaller as usize].merge(&larger_bbox).merge(&point);
                        self.parent[larger as usize] = smaller;
                    }
                }
            }
        }

        let labels_created = next_label.min(256) as usize - 1;
        for label in 1..=labels_created {
            let label = label as u8;
            if self.parent[label as usize] != label {
                continue; // not a root, already merged away
            }
            let bbox = self.bboxes[label as usize];
            if bbox.shorter_side() >= min_dim {
                self.try_insert(bbox);
            }
        }

        &self.output[..self.output_len]
    }
}
