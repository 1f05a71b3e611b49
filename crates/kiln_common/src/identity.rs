//! Filesystem identity resolution.
//!
//! Dependency records and header-unit configuration refer to the same file
//! through different path strings (relative vs. absolute, via symlinks).
//! Matching them by string comparison would miss those duplicates, so kiln
//! compares files by their stat identity instead.

use std::path::{Path, PathBuf};

/// The identity of a file on disk: its device and inode numbers.
///
/// Two paths refer to the same underlying file iff their `FileIdentity`
/// values are equal. Identities are computed on demand and are only
/// meaningful within a single invocation; they are never persisted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FileIdentity {
    device: u64,
    inode: u64,
}

/// Error resolving a path to its filesystem identity.
#[derive(Debug, thiserror::Error)]
#[error("failed to stat {}: {source}", .path.display())]
pub struct IdentityError {
    /// The path that could not be resolved.
    pub path: PathBuf,
    /// The underlying stat error.
    #[source]
    pub source: std::io::Error,
}

/// Resolves a path to its [`FileIdentity`].
///
/// Symlinks are followed, so a symlink and its target share one identity.
/// Fails if the path cannot be stat'd; callers must treat that as fatal —
/// a dependency list citing a nonexistent file means the upstream tool and
/// the configuration have drifted apart.
#[cfg(unix)]
pub fn identity_of(path: &Path) -> Result<FileIdentity, IdentityError> {
    use std::os::unix::fs::MetadataExt;

    let meta = std::fs::metadata(path).map_err(|source| IdentityError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(FileIdentity {
        device: meta.dev(),
        inode: meta.ino(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn same_file_two_spellings() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.h");
        fs::write(&file, "x").unwrap();

        let direct = identity_of(&file).unwrap();
        let dotted = identity_of(&dir.path().join("./a.h")).unwrap();
        assert_eq!(direct, dotted);
    }

    #[test]
    fn symlink_shares_identity() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.h");
        let link = dir.path().join("b.h");
        fs::write(&file, "x").unwrap();
        std::os::unix::fs::symlink(&file, &link).unwrap();

        assert_eq!(identity_of(&file).unwrap(), identity_of(&link).unwrap());
    }

    #[test]
    fn distinct_files_differ() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.h");
        let b = dir.path().join("b.h");
        fs::write(&a, "x").unwrap();
        fs::write(&b, "x").unwrap();

        assert_ne!(identity_of(&a).unwrap(), identity_of(&b).unwrap());
    }

    #[test]
    fn missing_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = identity_of(&dir.path().join("nope.h")).unwrap_err();
        assert!(err.path.ends_with("nope.h"));
        assert_eq!(err.source.kind(), std::io::ErrorKind::NotFound);
    }
}
