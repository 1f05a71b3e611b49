//! Shared project-loading helpers for CLI commands.
//!
//! Every subcommand starts the same way: load `kiln.toml`, derive the
//! artifact layout from its build root, and (for the per-source scans)
//! build the header-unit registry from configuration. Scans run as
//! separate processes, so the registry is rebuilt per invocation — its
//! source of truth is the configuration, never accumulated state.

use std::path::Path;

use kiln_common::ArtifactLayout;
use kiln_config::{flatten, load_config, load_config_from_str, ProjectConfig};
use kiln_scan::HeaderUnitRegistry;

use crate::GlobalArgs;

/// A loaded project: configuration plus the artifact layout it implies.
pub struct Project {
    /// The parsed `kiln.toml`.
    pub config: ProjectConfig,
    /// Artifact path layout rooted at the configured build root.
    pub layout: ArtifactLayout,
}

/// Loads the project configuration.
///
/// With `--config` the given file is read directly; otherwise `kiln.toml`
/// is expected in the current directory, which is where the generated
/// graph always invokes kiln from.
pub fn load(global: &GlobalArgs) -> Result<Project, Box<dyn std::error::Error>> {
    let config = match &global.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read {path}: {e}"))?;
            load_config_from_str(&content)?
        }
        None => load_config(Path::new("."))?,
    };
    let layout = ArtifactLayout::new(&config.build_root);
    Ok(Project { config, layout })
}

/// Builds the header-unit registry from the project's configured list.
pub fn build_registry(project: &Project) -> Result<HeaderUnitRegistry, kiln_scan::ScanError> {
    let headers = flatten(&project.config.header_units);
    HeaderUnitRegistry::build(&project.layout, &headers)
}
