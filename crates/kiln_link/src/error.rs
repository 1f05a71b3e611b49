//! Error types for link-closure resolution.

use std::path::PathBuf;

/// Errors that can occur while resolving a binary's link closure.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// A dependency-file path did not end in the expected `.dd` suffix.
    ///
    /// The static graph only ever feeds `.dd` files into a link scan, so
    /// this is a contract violation, not a skippable oddity.
    #[error("expected a .dd dependency file, got {}", .0.display())]
    BadDepFileName(PathBuf),

    /// Reading or parsing an object's flags file failed.
    #[error(transparent)]
    Scan(#[from] kiln_scan::ScanError),

    /// A generated output file could not be written.
    #[error(transparent)]
    Write(#[from] kiln_common::WriteError),
}
