//! Integration tests for the reference CLI driver (`motion_detect::run`):
//! walking a directory of JPEGs, running them through the pipeline, and
//! writing annotated output for frames with detected motion.
//!
//! Mirrors the end-to-end scenarios in spec.md §8 at the driver level
//! (per-pixel pipeline invariants are covered by `motion-core`'s own unit
//! tests; these exercise the filesystem glue around them).

use image::{GrayImage, Luma};
use motion_detect::config::DetectorConfig;

fn write_jpg(dir: &std::path::Path, name: &str, width: u32, height: u32, block: Option<(u32, u32, u32, u32)>) {
    let mut img = GrayImage::from_pixel(width, height, Luma([60u8]));
    if let Some((x0, y0, x1, y1)) = block {
        for y in y0..y1 {
            for x in x0..x1 {
                img.put_pixel(x, y, Luma([220]));
            }
        }
    }
    img.save(dir.join(name)).expect("failed to write fixture jpg");
}

#[test]
fn no_motion_between_identical_frames_writes_nothing() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_jpg(input.path(), "a.jpg", 64, 48, None);
    write_jpg(input.path(), "b.jpg", 64, 48, None);

    let config = DetectorConfig {
        threshold: 30,
        min_bbox_dim: 2,
        ..Default::default()
    };
    let summary = motion_detect::run(input.path(), output.path(), &config).unwrap();

    assert_eq!(summary.frames_processed, 2);
    assert_eq!(summary.frames_with_motion, 0);
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
}

#[test]
fn a_moving_block_produces_one_annotated_frame() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_jpg(input.path(), "1.jpg", 64, 48, None);
    write_jpg(input.path(), "2.jpg", 64, 48, Some((20, 16, 30, 26)));

    let config = DetectorConfig {
        threshold: 30,
        min_bbox_dim: 2,
        ..Default::default()
    };
    let summary = motion_detect::run(input.path(), output.path(), &config).unwrap();

    assert_eq!(summary.frames_with_motion, 1);
    assert!(output.path().join("2.jpg").exists());
    assert!(!output.path().join("1.jpg").exists());
}

#[test]
fn frames_are_processed_in_lexicographic_filename_order() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    // Written out of order; the driver must still sort by filename so
    // "a" becomes the reference before "b" or "c" are compared against it.
    write_jpg(input.path(), "c.jpg", 32, 32, Some((4, 4, 10, 10)));
    write_jpg(input.path(), "a.jpg", 32, 32, None);
    write_jpg(input.path(), "b.jpg", 32, 32, None);

    let config = DetectorConfig {
        threshold: 30,
        min_bbox_dim: 2,
        ..Default::default()
    };
    let summary = motion_detect::run(input.path(), output.path(), &config).unwrap();
    // a (reference) -> no motion, b identical to a -> no motion, c differs -> motion.
    assert_eq!(summary.frames_with_motion, 1);
    assert!(output.path().join("c.jpg").exists());
}

#[test]
fn missing_input_directory_is_reported_as_invalid_input_dir() {
    let output = tempfile::tempdir().unwrap();
    let missing = std::path::PathBuf::from("/nonexistent/path/for/motion-detect-tests");
    let config = DetectorConfig::default();
    let err = motion_detect::run(&missing, output.path(), &config).unwrap_err();
    assert!(matches!(err, motion_detect::error::DriverError::InvalidInputDir(_)));
}

#[test]
fn empty_input_directory_is_reported_as_no_input_frames() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let config = DetectorConfig::default();
    let err = motion_detect::run(input.path(), output.path(), &config).unwrap_err();
    assert!(matches!(err, motion_detect::error::DriverError::NoInputFrames(_)));
}

#[test]
fn non_jpg_files_in_input_directory_are_ignored() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    std::fs::write(input.path().join("readme.txt"), b"not a frame").unwrap();
    write_jpg(input.path(), "only.jpg", 32, 32, None);

    let config = DetectorConfig {
        min_bbox_dim: 2,
        ..Default::default()
    };
    let summary = motion_detect::run(input.path(), output.path(), &config).unwrap();
    assert_eq!(summary.frames_processed, 1);
}

#[test]
fn output_directory_is_created_when_absent() {
    let input = tempfile::tempdir().unwrap();
    let output_parent = tempfile::tempdir().unwrap();
    let output_dir = output_parent.path().join("nested").join("output");
    write_jpg(input.path(), "only.jpg", 32, 32, None);

    let config = DetectorConfig::default();
    motion_detect::run(input.path(), &output_dir, &config).unwrap();
    assert!(output_dir.is_dir());
}
