//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// File name of the project configuration.
pub const CONFIG_FILE_NAME: &str = "kiln.toml";

/// Loads and validates a `kiln.toml` configuration from a project directory.
///
/// Reads `<project_dir>/kiln.toml`, parses it, and validates cross
/// references between targets.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `kiln.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that every `libdeps` entry names a known library.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    let all_libdeps = config
        .libs
        .values()
        .chain(config.bins.values())
        .flat_map(|t| t.libdeps.iter());
    for dep in all_libdeps {
        if !config.libs.contains_key(dep) {
            return Err(ConfigError::UnknownLib(dep.clone()));
        }
    }
    if config.build_root.is_empty() {
        return Err(ConfigError::ValidationError(
            "build_root must not be empty".to_string(),
        ));
    }
    Ok(())
}
