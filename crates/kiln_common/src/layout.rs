//! Deterministic artifact path layout.
//!
//! Every artifact location is a pure function of the source path (never of
//! source content), so re-scanning a source always targets the same files.
//! Module-link artifacts live in their own subdirectory of the build root;
//! that namespace is what the link-closure resolver excludes.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Subdirectory of the build root holding module-link artifacts.
const MOD_LINK_SUBDIR: &str = "mod_links";

/// Character substituted for path separators when flattening a source path
/// into an artifact file name.
const PATH_SEP_SUBST: char = '_';

/// Character substituted for the module partition separator in a
/// module-link file name.
const PARTITION_SUBST: char = '=';

/// The build-output path layout for one project.
///
/// Owns the build root and derives every artifact path from it. Cheap to
/// construct; scanners build one per invocation from configuration.
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    build_root: PathBuf,
    mod_link_dir: PathBuf,
}

/// The full artifact set for one translation unit or header unit.
///
/// For header units the dyndep and flags files hang off the pcm (the scan
/// unlocks the pcm build); for sources they hang off the object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifacts {
    /// Precompiled module artifact.
    pub pcm: PathBuf,
    /// Object file artifact.
    pub object: PathBuf,
    /// Generated dynamic-dependency file.
    pub dyndep: PathBuf,
    /// Generated compiler-flags file.
    pub flags: PathBuf,
}

impl ArtifactLayout {
    /// Creates a layout rooted at `build_root`.
    pub fn new(build_root: impl Into<PathBuf>) -> Self {
        let build_root = build_root.into();
        let mod_link_dir = build_root.join(MOD_LINK_SUBDIR);
        Self {
            build_root,
            mod_link_dir,
        }
    }

    /// The build root directory.
    pub fn build_root(&self) -> &Path {
        &self.build_root
    }

    /// The directory holding module-link artifacts.
    pub fn mod_link_dir(&self) -> &Path {
        &self.mod_link_dir
    }

    /// Flattens a source path into its artifact base name under the build
    /// root: `core/lib.cpp` becomes `<build_root>/core_lib.cpp`.
    pub fn out_base(&self, source: &Path) -> PathBuf {
        let flat: String = source
            .to_string_lossy()
            .chars()
            .map(|c| {
                if c == std::path::MAIN_SEPARATOR {
                    PATH_SEP_SUBST
                } else {
                    c
                }
            })
            .collect();
        self.build_root.join(flat)
    }

    /// Precompiled-module artifact path for a source or header.
    pub fn pcm(&self, source: &Path) -> PathBuf {
        append_suffix(&self.out_base(source), ".pcm")
    }

    /// Object artifact path for a source or header.
    pub fn object(&self, source: &Path) -> PathBuf {
        append_suffix(&self.out_base(source), ".o")
    }

    /// Artifact set for a header unit (dyndep/flags derived from the pcm).
    pub fn header_artifacts(&self, header: &Path) -> BuildArtifacts {
        let pcm = self.pcm(header);
        let dyndep = append_suffix(&pcm, ".dd");
        let flags = append_suffix(&pcm, ".flags");
        BuildArtifacts {
            pcm,
            object: self.object(header),
            dyndep,
            flags,
        }
    }

    /// Artifact set for a translation unit (dyndep/flags derived from the
    /// object).
    pub fn source_artifacts(&self, source: &Path) -> BuildArtifacts {
        let object = self.object(source);
        let dyndep = append_suffix(&object, ".dd");
        let flags = append_suffix(&object, ".flags");
        BuildArtifacts {
            pcm: self.pcm(source),
            object,
            dyndep,
            flags,
        }
    }

    /// Canonical module-link artifact path for a module name.
    ///
    /// Partition separators are replaced with a filesystem-safe character,
    /// so `foo:part` maps to `<mod_links>/foo=part.pcm`. One module name
    /// maps to exactly one link artifact project-wide.
    pub fn module_link(&self, module_name: &str) -> PathBuf {
        let safe: String = module_name
            .chars()
            .map(|c| if c == ':' { PARTITION_SUBST } else { c })
            .collect();
        self.mod_link_dir.join(format!("{safe}.pcm"))
    }

    /// Returns `true` if `path` lies inside the module-link namespace.
    pub fn is_module_link(&self, path: &Path) -> bool {
        path.starts_with(&self.mod_link_dir)
    }
}

/// Appends a literal suffix to a path's final component (`a/b.cpp` +
/// `".o"` → `a/b.cpp.o`).
pub fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = OsString::from(path);
    s.push(suffix);
    PathBuf::from(s)
}
