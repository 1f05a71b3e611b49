//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `kiln.toml`
/// configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A `libdeps` entry names a library that is not defined under `[libs]`.
    #[error("unknown library '{0}' in libdeps")]
    UnknownLib(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}
