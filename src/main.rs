use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use motion_detect::config::{DetectorConfig, ReferenceUpdateArg};

/// Reference driver for the frame-to-frame motion detector: walks a
/// directory of `.jpg` frames in filename order and writes an annotated
/// copy of each frame that contains detected motion.
#[derive(Parser, Debug)]
#[command(name = "motion")]
#[command(about = "Detect motion across a directory of JPEG frames")]
struct Args {
    /// Directory containing input `.jpg` frames, processed in lexicographic
    /// filename order.
    input_dir: PathBuf,

    /// Directory annotated frames are written to (created if absent).
    output_dir: PathBuf,

    /// Absdiff/threshold cutoff: pixels differing from the reference by
    /// more than this count as motion.
    #[arg(short, long, default_value_t = 127)]
    threshold: u8,

    /// Dilation structuring-element side length. Defaults to
    /// `1 + min(w, h) / 8` in the working resolution when unset.
    #[arg(short, long)]
    granularity: Option<u8>,

    /// Internal downscaling factor applied before detection (must evenly
    /// divide both frame dimensions).
    #[arg(short, long, default_value_t = 1)]
    downscale_factor: u32,

    /// Minimum shorter-side length (working-resolution pixels) a connected
    /// component must have to be reported.
    #[arg(short = 'm', long, default_value_t = 16)]
    min_bbox_dim: u32,

    /// When the reference (background) frame is refreshed.
    #[arg(short, long, value_enum, default_value_t = ReferenceUpdateArg::EveryFrame)]
    reference_update: ReferenceUpdateArg,

    /// Refresh interval used when `--reference-update=every-n`.
    #[arg(long, default_value_t = 5)]
    every_n: u32,
}

fn main() -> ExitCode {
    motion_detect::logging::init();
    let args = Args::parse();

    match run(&args) {
        Ok(summary) => {
            tracing::info!(
                processed = summary.frames_processed,
                with_motion = summary.frames_with_motion,
                skipped = summary.frames_skipped,
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("motion: {err:?}");
            ExitCode::FAILURE
        }
    }
}

/// Maps CLI args onto a `DetectorConfig` and runs the pipeline, wrapping the
/// driver's own `DriverError` into `anyhow::Error` at this top-level
/// boundary so a CLI misuse gets a one-line cause chain instead of a bare
/// `Display`.
fn run(args: &Args) -> anyhow::Result<motion_detect::RunSummary> {
    let config = DetectorConfig {
        threshold: args.threshold,
        granularity: args.granularity,
        downscale_factor: args.downscale_factor,
        min_bbox_dim: args.min_bbox_dim,
        reference_update: args.reference_update,
        every_n: args.every_n,
    };

    motion_detect::run(&args.input_dir, &args.output_dir, &config)
        .map_err(anyhow::Error::from)
        .with_context(|| format!("processing {}", args.input_dir.display()))
}
