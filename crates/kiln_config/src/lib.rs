//! Parsing and validation of `kiln.toml` project configuration files.
//!
//! This crate reads the project configuration file and produces a
//! strongly-typed [`ProjectConfig`], plus the resolution helpers that
//! flatten the nested source tree and expand a binary's library
//! dependencies into concrete source and system-library sets.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{expand_link_inputs, flatten, LinkInputs};
pub use types::{ProjectConfig, SourceEntry, TargetConfig};
