//! # motion-core: fixed-buffer frame-to-frame motion detection
//!
//! This crate implements the pixel-level pipeline that turns a pair of
//! grayscale frames into a set of bounding boxes around the regions that
//! changed between them. It is built for embedded / on-device use: every
//! working buffer is sized and allocated once, there is no dynamic
//! allocation on the hot path, and CPU cost per frame is predictable.
//!
//! ## Architecture Overview
//!
//! The pipeline is a straight line, leaves first:
//!
//! 1. [`image`]: a thin view over a fixed-size grayscale byte buffer, with
//!    `(row, col)` access and a padded variant for convolution.
//! 2. [`kernel`]: a 2D convolution engine with configurable anchor, stride
//!    and postprocessing callable, generic over heterogeneous or
//!    single-repeating-element kernels.
//! 3. [`transforms`]: `absdiff`, `threshold`, `downscale` and `dilate`, all
//!    expressed in terms of the convolution engine or as element-wise passes.
//! 4. [`bbox`]: the `BoundingBox` value type.
//! 5. [`labeler`]: single-pass connected-components labeling (inspecting
//!    only the west and resolved north neighbor per pixel) with on-the-fly
//!    equivalence resolution, producing a filtered list of bounding boxes.
//! 6. [`detector`]: `MotionDetector`, which orchestrates
//!    (downscale →) absdiff → threshold → dilate → label, maintains a
//!    reference frame, and exposes a `detect(frame) -> &[BoundingBox]`
//!    contract.
//!
//! ## Concurrency & Resource Model
//!
//! The core is single-threaded and synchronous. `MotionDetector::detect` is
//! a straight-line CPU computation with no I/O and no suspension points.
//! Each `MotionDetector` owns its buffers exclusively; there is no shared
//! mutable state between instances, so running one per camera on a
//! dedicated thread requires no coordination.
//!
//! ## Non-goals
//!
//! No multi-frame temporal models, no color processing (luminance only), no
//! sub-pixel accuracy, no cross-frame object tracking or classification, no
//! rotation- or scale-invariant kernels, and no recovery from corrupt input
//! — the caller is trusted to deliver a raw pixel buffer of the declared
//! size.

pub mod bbox;
pub mod detector;
pub mod error;
pub mod image;
pub mod kernel;
pub mod labeler;
pub mod transforms;

pub use bbox::BoundingBox;
pub use detector::{MotionDetector, ReferencePolicy};
pub use error::CoreError;
pub use image::{ImageView, ImageViewMut, StaticImage};
