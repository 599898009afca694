//! Structured logging setup for the CLI.
//!
//! `motion-core` emits `tracing` events at frame granularity (never
//! per-pixel); this module wires up the subscriber that renders them. The
//! teacher repo logs with plain `println!`/`eprintln!`, which is too thin
//! for a driver meant to be run unattended over a directory of frames — a
//! long-running capture session benefits from `RUST_LOG`-filterable levels
//! the way `freddiehaddad-oxidized` sets up its own subscriber.

use tracing_subscriber::EnvFilter;

/// Installs a `tracing_subscriber::fmt` subscriber honoring `RUST_LOG`,
/// defaulting to `info` when the variable is unset or unparseable.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .ok();
}
