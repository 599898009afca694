//! # Error taxonomy for the motion-detection core
//!
//! Everything this crate can get wrong falls into one of two buckets per
//! the design: a *precondition violation* (shape mismatch, malformed
//! kernel) that is a programmer error and is surfaced loudly, or a
//! documented *soft failure* (label saturation) that is handled silently
//! and never reaches this error type at all.
//!
//! Following the hand-rolled style used elsewhere in this codebase's
//! ancestry rather than reaching for `thiserror`: these errors back
//! `panic!` call sites, not `Result`-propagated ones, so the payoff of a
//! derive macro is small and a plain `Display` impl keeps the dependency
//! footprint at zero.

use std::fmt;

/// Precondition violations raised by the core pipeline.
///
/// None of these are meant to be caught and handled at runtime — they are
/// always paired with a `panic!` at the call site (see [`CoreError::panic`])
/// so that a violated invariant fails loudly, as spec'd.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Two images that were expected to share a shape do not.
    ShapeMismatch {
        operation: &'static str,
        expected: (u32, u32),
        actual: (u32, u32),
    },
    /// A kernel was constructed with an anchor or stride outside its
    /// allowed range.
    InvalidKernel { reason: &'static str },
    /// A detector or image was constructed with an invalid parameter
    /// (e.g. zero width/height, zero granularity).
    InvalidConstruction { reason: &'static str },
}

impl CoreError {
    /// Panics with this error's message. Call sites use this instead of a
    /// bare `assert!` so the panic message stays structured and greppable.
    pub fn panic(self) -> ! {
        panic!("{self}")
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::ShapeMismatch {
                operation,
                expected,
                actual,
            } => write!(
                f,
                "shape mismatch in {operation}: expected {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
            CoreError::InvalidKernel { reason } => write!(f, "invalid kernel: {reason}"),
            CoreError::InvalidConstruction { reason } => {
                write!(f, "invalid construction: {reason}")
            }
        }
    }
}

impl std::error::Error for CoreError {}
