//! The compiler flags-file format.
//!
//! Scanners emit one flags file per artifact; the compiler consumes it via
//! `@file`, and the link-closure resolver re-reads it to recover a unit's
//! resolved dependency set. Known directives:
//!
//! - `-fmodule-file=PATH` — use a precompiled module file (PATH ends `.pcm`)
//! - `-fmodule-name=NAME` — the unit's own module name (at most one)
//! - `-x c++` — force C++ compilation for a plain source
//! - `-o PATH` — redirect output to a module-link artifact
//! - a bare path — an extra input passed through verbatim
//!
//! Any other option-looking line is a contract violation.

use crate::error::ScanError;
use std::path::{Path, PathBuf};

/// Directive prefix for a module-file dependency.
pub const MODULE_FILE_PREFIX: &str = "-fmodule-file=";

/// Directive prefix for the unit's own module name.
pub const MODULE_NAME_PREFIX: &str = "-fmodule-name=";

/// Suffix every module-file dependency must carry.
const PCM_SUFFIX: &str = ".pcm";

/// The dependency-relevant content of a flags file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagsFile {
    /// The unit's own module name, if declared.
    pub module_name: Option<String>,
    /// Each `-fmodule-file=` dependency with its `.pcm` suffix stripped
    /// (the artifact base the link scan derives object paths from).
    pub module_file_bases: Vec<PathBuf>,
}

/// Reads and parses a flags file.
pub fn read_flags_file(path: &Path) -> Result<FlagsFile, ScanError> {
    let text = std::fs::read_to_string(path).map_err(|e| ScanError::io(path, e))?;
    parse_flags_file(&text)
}

/// Parses flags-file text, rejecting unrecognized directives.
pub fn parse_flags_file(text: &str) -> Result<FlagsFile, ScanError> {
    let mut parsed = FlagsFile::default();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(name) = line.strip_prefix(MODULE_NAME_PREFIX) {
            if parsed.module_name.is_some() {
                return Err(ScanError::FlagsFormat {
                    line: line.to_string(),
                });
            }
            parsed.module_name = Some(name.to_string());
        } else if let Some(dep) = line.strip_prefix(MODULE_FILE_PREFIX) {
            let Some(base) = dep.strip_suffix(PCM_SUFFIX) else {
                return Err(ScanError::FlagsFormat {
                    line: line.to_string(),
                });
            };
            parsed.module_file_bases.push(PathBuf::from(base));
        } else if line.starts_with("-x ") || line.starts_with("-o ") {
            // Output redirects and language overrides carry no
            // dependency information.
        } else if line.starts_with('-') {
            return Err(ScanError::FlagsFormat {
                line: line.to_string(),
            });
        }
        // Bare paths pass through to the compiler untouched.
    }
    Ok(parsed)
}

/// Formats a module-file directive line.
pub fn module_file_flag(path: &Path) -> String {
    format!("{MODULE_FILE_PREFIX}{}", path.display())
}

/// Formats a module-name directive line.
pub fn module_name_flag(name: &str) -> String {
    format!("{MODULE_NAME_PREFIX}{name}")
}
