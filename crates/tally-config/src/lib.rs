//! Configuration loading, CLI overrides and validation.
//!
//! The configuration is read from a JSON, YAML or TOML file, patched with
//! command-line overrides and then validated before any service starts.

mod cli;
mod defaults;
mod loader;
mod types;
mod validate;

pub use cli::{CliOverrides, apply_overrides};
pub use loader::{ConfigError, load_config};
pub use types::*;
pub use validate::validate_config;
