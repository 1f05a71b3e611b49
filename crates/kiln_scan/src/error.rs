//! Error types for the scanning phase.

use std::path::PathBuf;

/// Errors that can occur while scanning a source, header unit, or the
/// files they reference.
///
/// Format variants signal a contract violation with the upstream
/// record/annotation producer; they are never patched around. All variants
/// are fatal for the invocation that hits them.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// An I/O error reading a scan input file.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying io error.
        #[source]
        source: std::io::Error,
    },

    /// A dependency record did not contain exactly one `:`.
    #[error("malformed dependency record {}: expected exactly one ':'", .path.display())]
    DepRecordFormat {
        /// The offending record file.
        path: PathBuf,
    },

    /// A module annotation's declaration marker was missing required fields.
    #[error("malformed module declaration marker: {line:?}")]
    AnnotationFormat {
        /// The offending marker line.
        line: String,
    },

    /// A flags file contained an option outside the known directive set.
    #[error("unrecognized directive in flags file: {line:?}")]
    FlagsFormat {
        /// The offending flags line.
        line: String,
    },

    /// A path could not be resolved to a filesystem identity.
    #[error(transparent)]
    Identity(#[from] kiln_common::IdentityError),

    /// Two configured header units resolve to the same file.
    #[error("header units {} and {} are the same file", .first.display(), .second.display())]
    DuplicateHeaderUnit {
        /// The first configured path.
        first: PathBuf,
        /// The colliding configured path.
        second: PathBuf,
    },

    /// A generated output file could not be written.
    #[error(transparent)]
    Write(#[from] kiln_common::WriteError),
}

impl ScanError {
    /// Wraps an io error with the path being read.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
