//! Change-detecting file writer.
//!
//! Generated dyndep and flags files are inputs to the rest of the build
//! graph. Rewriting one with identical content would bump its mtime and
//! invalidate every dependent step, so the writer compares first and only
//! replaces the file when the content actually differs.

use std::path::{Path, PathBuf};

/// Error writing a generated build-state file.
#[derive(Debug, thiserror::Error)]
#[error("failed to write {}: {source}", .path.display())]
pub struct WriteError {
    /// The target path.
    pub path: PathBuf,
    /// The underlying io error.
    #[source]
    pub source: std::io::Error,
}

/// Writes `content` to `path` unless the file already holds exactly those
/// bytes.
///
/// With `force` set the file is always replaced (used for link-closure
/// outputs, which the executor re-reads unconditionally). The content is
/// fully computed before this is called, so a target is never left holding
/// a half-written result that could be mistaken for valid output.
pub fn write_if_changed(content: &str, path: &Path, force: bool) -> Result<(), WriteError> {
    if !force {
        if let Ok(existing) = std::fs::read(path) {
            if existing == content.as_bytes() {
                return Ok(());
            }
        }
    }

    std::fs::write(path, content).map_err(|source| WriteError {
        path: path.to_path_buf(),
        source,
    })
}
