//! Make-style dependency record parsing.
//!
//! The compiler's preprocessor emits `target: dep1 dep2 ...` records with
//! `\`-newline continuations. These list every file the preprocessor
//! touched; the scanners match the entries against the header-unit
//! registry.

use crate::error::ScanError;
use std::path::{Path, PathBuf};

/// A parsed dependency record: the target and its ordered dependency list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepRecord {
    /// The record's target (the artifact the compiler would produce).
    pub target: String,
    /// Every dependency path, in record order.
    pub deps: Vec<PathBuf>,
}

/// Reads and parses a dependency record file.
pub fn read_dep_record(path: &Path) -> Result<DepRecord, ScanError> {
    let text = std::fs::read_to_string(path).map_err(|e| ScanError::io(path, e))?;
    parse_dep_record(&text).map_err(|_| ScanError::DepRecordFormat {
        path: path.to_path_buf(),
    })
}

/// Parses a dependency record from text.
///
/// Backslash-continued lines are joined first. The record must contain
/// exactly one `:`; anything else fails fast.
pub fn parse_dep_record(text: &str) -> Result<DepRecord, ScanError> {
    let joined = text.replace("\\\n", "");
    let bad_format = || ScanError::DepRecordFormat {
        path: PathBuf::new(),
    };
    if joined.matches(':').count() != 1 {
        return Err(bad_format());
    }
    let (target, deps) = joined.split_once(':').ok_or_else(bad_format)?;
    Ok(DepRecord {
        target: target.trim().to_string(),
        deps: deps.split_whitespace().map(PathBuf::from).collect(),
    })
}
