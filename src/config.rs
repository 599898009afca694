//! Driver-facing configuration: the CLI's `Args` map onto a
//! [`DetectorConfig`], which is validated once and then used to build a
//! [`motion_core::MotionDetector`].
//!
//! Grounded on `CaptureConfig` from the teacher repo: a plain struct with a
//! `Default` impl and a `validate(&self) -> Result<(), String>` that mirrors
//! the constructor's own precondition checks, so CLI users see a clean error
//! message instead of a panic for bad input, while the library API itself
//! keeps panicking for programmatic misuse (spec.md §7).

use motion_core::ReferencePolicy;

/// How the reference (background) frame is refreshed, mirrored from
/// [`motion_core::ReferencePolicy`] but expressed as a CLI/config-friendly
/// value (plain `u32`, not `NonZeroU32`) so `clap` can parse it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReferenceUpdateArg {
    /// Replace the reference with every processed frame (default, matches
    /// the original implementation's only behavior).
    EveryFrame,
    /// Replace the reference only every `every_n` frames (see
    /// [`DetectorConfig::every_n`]).
    EveryN,
    /// Never update the reference automatically.
    Manual,
}

impl std::fmt::Display for ReferenceUpdateArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReferenceUpdateArg::EveryFrame => "every-frame",
            ReferenceUpdateArg::EveryN => "every-n",
            ReferenceUpdateArg::Manual => "manual",
        };
        write!(f, "{s}")
    }
}

/// Validated, driver-facing mirror of `MotionDetector`'s constructor
/// parameters. spec.md §9 explicitly declines to pick a crate-level
/// threshold default (127 and 150 both appear in the original's lineage),
/// so the default lives here, at the driver layer, not in `motion-core`.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Absdiff/threshold cutoff: pixels differing by more than this from
    /// the reference count as motion.
    pub threshold: u8,
    /// Dilation structuring-element side length. `None` defers to
    /// `motion_core`'s own default (`1 + min(w, h) / 8` in the working
    /// resolution).
    pub granularity: Option<u8>,
    /// Internal downscaling factor applied before detection. `1` disables
    /// downscaling. Must evenly divide both frame dimensions.
    pub downscale_factor: u32,
    /// Minimum shorter-side length (in working-resolution pixels) a
    /// connected component must have to be reported.
    pub min_bbox_dim: u32,
    /// How the reference frame is refreshed between calls.
    pub reference_update: ReferenceUpdateArg,
    /// Refresh interval used when `reference_update == EveryN`.
    pub every_n: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold: 127,
            granularity: None,
            downscale_factor: 1,
            min_bbox_dim: 16,
            reference_update: ReferenceUpdateArg::EveryFrame,
            every_n: 5,
        }
    }
}

impl DetectorConfig {
    /// Checks the same invariants `MotionDetector::new` asserts, returning a
    /// message instead of panicking — CLI input is untrusted, unlike direct
    /// library calls.
    pub fn validate(&self, frame_w: u32, frame_h: u32) -> Result<(), String> {
        if self.downscale_factor == 0 {
            return Err("downscale factor must be greater than 0".to_string());
        }
        if frame_w % self.downscale_factor != 0 || frame_h % self.downscale_factor != 0 {
            return Err(format!(
                "downscale factor {} must evenly divide the frame dimensions {}x{}",
                self.downscale_factor, frame_w, frame_h
            ));
        }
        if let Some(g) = self.granularity {
            if g == 0 {
                return Err("granularity must be greater than 0".to_string());
            }
        }
        if self.reference_update == ReferenceUpdateArg::EveryN && self.every_n == 0 {
            return Err("every_n must be greater than 0 when reference-update=every-n".to_string());
        }
        Ok(())
    }

    pub fn reference_policy(&self) -> ReferencePolicy {
        match self.reference_update {
            ReferenceUpdateArg::EveryFrame => ReferencePolicy::EveryFrame,
            ReferenceUpdateArg::Manual => ReferencePolicy::Manual,
            ReferenceUpdateArg::EveryN => ReferencePolicy::EveryN(
                std::num::NonZeroU32::new(self.every_n).expect("validated non-zero"),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_for_a_typical_frame() {
        let config = DetectorConfig::default();
        assert!(config.validate(1024, 768).is_ok());
    }

    #[test]
    fn rejects_downscale_factor_that_does_not_divide_evenly() {
        let mut config = DetectorConfig::default();
        config.downscale_factor = 3;
        assert!(config.validate(1024, 768).is_err());
    }

    #[test]
    fn rejects_zero_granularity() {
        let mut config = DetectorConfig::default();
        config.granularity = Some(0);
        assert!(config.validate(1024, 768).is_err());
    }

    #[test]
    fn rejects_every_n_zero_under_every_n_policy() {
        let mut config = DetectorConfig::default();
        config.reference_update = ReferenceUpdateArg::EveryN;
        config.every_n = 0;
        assert!(config.validate(1024, 768).is_err());
    }
}
