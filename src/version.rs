//! Plur version information.
//!
//! The CLI banner and `plur --version` both read [`PLUR_VERSION`] so they never disagree.
//!
//! ## Notes
//!
//! - The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time.

/// The plur version string (for example, `0.1.0`).
pub const PLUR_VERSION: &str = env!("CARGO_PKG_VERSION");
