//! # motion_detect: reference CLI driver around `motion-core`
//!
//! Owns everything spec.md §6 calls an "external collaborator": walking a
//! directory of JPEG frames in lexicographic order, decoding them to 8-bit
//! luma, feeding them through a [`motion_core::MotionDetector`], and saving
//! an annotated, rotated copy of any frame that produced at least one
//! bounding box. None of this is part of the core contract — `motion-core`
//! only ever sees raw `(&[u8], width, height)` triples.

pub mod annotate;
pub mod config;
pub mod error;
pub mod logging;

use std::fs;
use std::path::{Path, PathBuf};

use image::GrayImage;
use motion_core::MotionDetector;
use tracing::{debug, info, warn};

use config::DetectorConfig;
use error::DriverError;

/// Lists every `.jpg` file directly inside `dir` (non-recursive, matching
/// spec.md §6), sorted lexicographically by filename.
pub fn list_jpg_frames(dir: &Path) -> Result<Vec<PathBuf>, DriverError> {
    if !dir.is_dir() {
        return Err(DriverError::InvalidInputDir(dir.to_path_buf()));
    }
    let mut paths = Vec::new();
    let entries = fs::read_dir(dir).map_err(|source| DriverError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| DriverError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("jpg") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Decodes `path` into an 8-bit grayscale (luma) image. spec.md §7's
/// "upstream frame unavailable" case: a decode failure is reported here and
/// the core pipeline is never entered for this frame.
pub fn decode_luma(path: &Path) -> Result<GrayImage, DriverError> {
    let img = image::open(path).map_err(|e| DriverError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(img.to_luma8())
}

/// Per-run outcome, returned so callers (and integration tests) can assert
/// on behavior without parsing stdout.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub frames_processed: usize,
    pub frames_with_motion: usize,
    pub frames_skipped: usize,
}

/// Runs the reference pipeline over every `.jpg` in `input_dir`, writing
/// annotated copies of frames with motion into `output_dir` (created if
/// absent). The first frame becomes the initial reference and is also
/// itself run through `detect` (which — as with any frame compared to
/// itself — yields no boxes), matching the original driver's loop
/// structure (`examples/original_source/main.cpp`).
pub fn run(input_dir: &Path, output_dir: &Path, config: &DetectorConfig) -> Result<RunSummary, DriverError> {
    let frame_paths = list_jpg_frames(input_dir)?;
    let Some(first_path) = frame_paths.first() else {
        return Err(DriverError::NoInputFrames(input_dir.to_path_buf()));
    };

    if output_dir.exists() && !output_dir.is_dir() {
        return Err(DriverError::InvalidOutputDir(output_dir.to_path_buf()));
    }
    fs::create_dir_all(output_dir).map_err(|source| DriverError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let first_frame = decode_luma(first_path)?;
    let (frame_w, frame_h) = (first_frame.width(), first_frame.height());
    config.validate(frame_w, frame_h).map_err(DriverError::InvalidConfig)?;

    info!(width = frame_w, height = frame_h, frames = frame_paths.len(), "starting motion detection");

    let mut detector = MotionDetector::<5>::new(
        frame_w,
        frame_h,
        config.downscale_factor,
        config.threshold,
        config.granularity.map(u32::from),
        Some(config.min_bbox_dim),
        config.reference_policy(),
    );
    detector.set_reference(&to_view(&first_frame));

    let mut summary = RunSummary::default();
    for path in &frame_paths {
        let frame = match decode_luma(path) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(%err, path = %path.display(), "skipping undecodable frame");
                summary.frames_skipped += 1;
                continue;
            }
        };
        if frame.width() != frame_w || frame.height() != frame_h {
            warn!(path = %path.display(), "skipping frame with mismatched dimensions");
            summary.frames_skipped += 1;
            continue;
        }

        let bboxes = detector.detect(&to_view(&frame)).to_vec();
        summary.frames_processed += 1;
        debug!(path = %path.display(), boxes = bboxes.len(), "processed frame");

        if !bboxes.is_empty() {
            summary.frames_with_motion += 1;
            let annotated = annotate::annotate_and_rotate(&frame, &bboxes, config.downscale_factor);
            let Some(file_name) = path.file_name() else {
                continue;
            };
            let out_path = output_dir.join(file_name);
            annotated.save(&out_path).map_err(|e| DriverError::Io {
                path: out_path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
            })?;
            info!(path = %out_path.display(), boxes = bboxes.len(), "wrote annotated frame");
        }
    }

    Ok(summary)
}

fn to_view(frame: &GrayImage) -> motion_core::ImageView<'_> {
    motion_core::ImageView::new(frame.as_raw(), frame.width(), frame.height())
}
