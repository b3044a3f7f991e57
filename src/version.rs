//! Harness version information.
//!
//! The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time, so the CLI and
//! the JSON reporter agree on the same value.

/// The bamboo harness version string (for example, `0.1.0`).
pub const BAMBOO_VERSION: &str = env!("CARGO_PKG_VERSION");
