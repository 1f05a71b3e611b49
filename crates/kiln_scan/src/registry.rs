//! The project-wide header-unit registry.
//!
//! Built once per invocation from the configured header-unit list, then
//! read-only: scanners look dependency-list entries up by filesystem
//! identity, never by path string, so symlinked or relative spellings of a
//! registered header still match. Lookup is O(1), keeping a whole-list
//! match at O(N + M) instead of pairwise comparison.

use crate::error::ScanError;
use kiln_common::{identity_of, ArtifactLayout, FileIdentity};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A header promoted to a header unit, with its artifact locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderUnit {
    /// The header's configured source path.
    pub source: PathBuf,
    /// The precompiled-module artifact it builds into.
    pub pcm: PathBuf,
    /// The object artifact it builds into.
    pub object: PathBuf,
}

/// Immutable mapping from filesystem identity to header-unit artifacts.
#[derive(Debug, Default)]
pub struct HeaderUnitRegistry {
    units: HashMap<FileIdentity, HeaderUnit>,
}

impl HeaderUnitRegistry {
    /// Builds the registry from the configured header-unit paths.
    ///
    /// Fails fast if any configured header cannot be stat'd or if two
    /// configured paths are the same file; both indicate a configuration
    /// error that would silently corrupt scan output if ignored.
    pub fn build(layout: &ArtifactLayout, headers: &[PathBuf]) -> Result<Self, ScanError> {
        let mut units = HashMap::with_capacity(headers.len());
        for header in headers {
            let id = identity_of(header)?;
            let unit = HeaderUnit {
                source: header.clone(),
                pcm: layout.pcm(header),
                object: layout.object(header),
            };
            if let Some(existing) = units.insert(id, unit) {
                return Err(ScanError::DuplicateHeaderUnit {
                    first: existing.source,
                    second: header.clone(),
                });
            }
        }
        Ok(Self { units })
    }

    /// Looks up a header unit by filesystem identity.
    pub fn get(&self, id: FileIdentity) -> Option<&HeaderUnit> {
        self.units.get(&id)
    }

    /// The number of registered header units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Matches a dependency list against the registry by identity.
///
/// Entries identical to `self_path` are dropped (a header legitimately
/// lists itself in its own record). Matches come back in input order,
/// deduplicated by identity, so output is stable across runs.
pub fn match_header_units(
    registry: &HeaderUnitRegistry,
    self_path: &Path,
    deps: &[PathBuf],
) -> Result<Vec<PathBuf>, ScanError> {
    let self_id = identity_of(self_path)?;
    let mut seen = std::collections::HashSet::new();
    let mut matches = Vec::new();
    for dep in deps {
        let id = identity_of(dep)?;
        if id == self_id || !seen.insert(id) {
            continue;
        }
        if let Some(unit) = registry.get(id) {
            matches.push(unit.pcm.clone());
        }
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let p = dir.join(name);
        fs::write(&p, name).unwrap();
        p
    }

    #[test]
    fn build_and_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.h");
        let layout = ArtifactLayout::new(dir.path().join("build"));

        let registry = HeaderUnitRegistry::build(&layout, &[a.clone()]).unwrap();
        assert_eq!(registry.len(), 1);
        let unit = registry.get(identity_of(&a).unwrap()).unwrap();
        assert_eq!(unit.source, a);
        assert!(unit.pcm.to_string_lossy().ends_with("a.h.pcm"));
    }

    #[test]
    fn missing_header_fails_build() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArtifactLayout::new(dir.path().join("build"));
        let err =
            HeaderUnitRegistry::build(&layout, &[dir.path().join("ghost.h")]).unwrap_err();
        assert!(matches!(err, ScanError::Identity(_)));
    }

    #[test]
    fn duplicate_identity_fails_build() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.h");
        let link = dir.path().join("alias.h");
        std::os::unix::fs::symlink(&a, &link).unwrap();
        let layout = ArtifactLayout::new(dir.path().join("build"));

        let err = HeaderUnitRegistry::build(&layout, &[a, link]).unwrap_err();
        assert!(matches!(err, ScanError::DuplicateHeaderUnit { .. }));
    }

    #[test]
    fn match_dedupes_two_spellings_of_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.h");
        let b = touch(dir.path(), "b.h");
        let a_dotted = dir.path().join("./a.h");
        let layout = ArtifactLayout::new(dir.path().join("build"));
        let registry = HeaderUnitRegistry::build(&layout, &[a.clone()]).unwrap();

        let matches =
            match_header_units(&registry, &b, &[b.clone(), a.clone(), a_dotted]).unwrap();
        assert_eq!(matches.len(), 1);
        assert!(matches[0].to_string_lossy().ends_with("a.h.pcm"));
    }

    #[test]
    fn self_entry_never_matches() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.h");
        let layout = ArtifactLayout::new(dir.path().join("build"));
        let registry = HeaderUnitRegistry::build(&layout, &[a.clone()]).unwrap();

        // a.h is itself registered and lists itself in its own record.
        let matches = match_header_units(&registry, &a, &[a.clone()]).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn dep_citing_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.h");
        let layout = ArtifactLayout::new(dir.path().join("build"));
        let registry = HeaderUnitRegistry::build(&layout, &[]).unwrap();

        let err =
            match_header_units(&registry, &a, &[dir.path().join("gone.h")]).unwrap_err();
        assert!(matches!(err, ScanError::Identity(_)));
    }
}
