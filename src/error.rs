//! Error taxonomy for the CLI driver.
//!
//! `motion-core` panics on precondition violations (see
//! `motion_core::error::CoreError`) because those are programmer errors
//! inside a trusted pipeline. Everything in this module is the opposite:
//! ordinary runtime failure arising from the outside world — a bad path, a
//! directory that can't be created, a JPEG the decoder refuses — so it is
//! surfaced as a `Result`, not a panic.

use std::fmt;
use std::path::PathBuf;

/// Failures the driver can hit before or while running the core pipeline.
#[derive(Debug)]
pub enum DriverError {
    /// `input_dir` does not exist or is not a directory.
    InvalidInputDir(PathBuf),
    /// `output_dir` exists but is not a directory (it is created if absent).
    InvalidOutputDir(PathBuf),
    /// No `.jpg` files were found in `input_dir`.
    NoInputFrames(PathBuf),
    /// `DetectorConfig::validate` rejected the resolved configuration
    /// against the first frame's actual dimensions.
    InvalidConfig(String),
    /// The decoder could not produce a luma frame from `path`. This is
    /// spec's "upstream frame unavailable" case: the core is never entered
    /// for this frame.
    Decode { path: PathBuf, reason: String },
    /// A filesystem operation (read_dir, create_dir_all, save) failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::InvalidInputDir(p) => {
                write!(f, "input directory does not exist: {}", p.display())
            }
            DriverError::InvalidOutputDir(p) => {
                write!(f, "output path exists and is not a directory: {}", p.display())
            }
            DriverError::NoInputFrames(p) => {
                write!(f, "no .jpg files found in input directory: {}", p.display())
            }
            DriverError::InvalidConfig(reason) => write!(f, "invalid configuration: {reason}"),
            DriverError::Decode { path, reason } => {
                write!(f, "failed to decode {}: {reason}", path.display())
            }
            DriverError::Io { path, source } => {
                write!(f, "I/O error at {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriverError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
