//! Parsing and validation of `kestrel.toml` compiler configuration.
//!
//! The configuration controls default build options, the environment variable
//! consulted for a per-process build-option override, the optional on-disk
//! binary store, and extra device tuning rules.

#![warn(missing_docs)]

pub mod env;
pub mod error;
pub mod loader;
pub mod types;

pub use env::{lookup_override, DEFAULT_OVERRIDE_ENV};
pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use types::*;
