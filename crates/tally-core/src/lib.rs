//! Core types and constants shared across tally crates.
//!
//! This crate provides:
//! - Default configuration values
//! - Error type constants for metrics/logging
//! - Panel endpoint addressing
//! - Project version

pub mod defaults;
pub mod errors;
pub mod panel;

// Re-export commonly used items at crate root
pub use defaults::*;
pub use errors::*;
pub use panel::PanelEndpoint;

/// Project version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
