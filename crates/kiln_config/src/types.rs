//! Configuration types deserialized from `kiln.toml`.

use serde::Deserialize;
use std::collections::BTreeMap;

/// The top-level project configuration parsed from `kiln.toml`.
///
/// Describes the header units promoted to importable precompiled form,
/// the library and binary link targets, and the sources excluded from
/// module-flag treatment.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Root directory for all build artifacts.
    #[serde(default = "default_build_root")]
    pub build_root: String,

    /// Headers compiled once as header units, as a nested prefix tree.
    #[serde(default)]
    pub header_units: Vec<SourceEntry>,

    /// Sources compiled without module-file flags (escape hatch for
    /// translation units the module scheme mishandles).
    #[serde(default)]
    pub module_exclusions: Vec<String>,

    /// Named libraries: groups of sources linked into binaries via `libdeps`.
    #[serde(default)]
    pub libs: BTreeMap<String, TargetConfig>,

    /// Named binaries to link.
    #[serde(default)]
    pub bins: BTreeMap<String, TargetConfig>,
}

fn default_build_root() -> String {
    "build".to_string()
}

/// One entry in a nested source tree.
///
/// A bare string is a path; a group contributes its `dir` as a path prefix
/// for everything below it, so deep trees need not repeat directory names.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SourceEntry {
    /// A single source or header path.
    Path(String),
    /// A directory prefix applied to the nested entries.
    Group {
        /// The directory component prepended to each nested entry.
        dir: String,
        /// The entries under this prefix.
        files: Vec<SourceEntry>,
    },
}

/// A library or binary link target.
#[derive(Debug, Default, Deserialize)]
pub struct TargetConfig {
    /// Sources belonging to this target, as a nested prefix tree.
    #[serde(default)]
    pub sources: Vec<SourceEntry>,

    /// Names of `[libs]` entries this target links against.
    #[serde(default)]
    pub libdeps: Vec<String>,

    /// System libraries passed to the linker as `-l` flags.
    #[serde(default)]
    pub syslibdeps: Vec<String>,
}
