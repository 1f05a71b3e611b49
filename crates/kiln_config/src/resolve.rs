//! Source-tree flattening and link-target dependency expansion.

use crate::error::ConfigError;
use crate::types::{ProjectConfig, SourceEntry, TargetConfig};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Flattens a nested source tree into concrete paths.
///
/// Each [`SourceEntry::Group`] contributes its `dir` as a prefix joined
/// onto everything below it. Order is preserved.
pub fn flatten(entries: &[SourceEntry]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    flatten_into(entries, Path::new(""), &mut out);
    out
}

fn flatten_into(entries: &[SourceEntry], prefix: &Path, out: &mut Vec<PathBuf>) {
    for entry in entries {
        match entry {
            SourceEntry::Path(p) => out.push(prefix.join(p)),
            SourceEntry::Group { dir, files } => {
                flatten_into(files, &prefix.join(dir), out);
            }
        }
    }
}

/// The full set of inputs a binary links: its own sources plus everything
/// contributed transitively through `libdeps`.
#[derive(Debug, Default)]
pub struct LinkInputs {
    /// Every translation unit linked into the binary.
    pub sources: BTreeSet<PathBuf>,
    /// Every system library, from the binary and all reachable libs.
    pub syslibs: BTreeSet<String>,
}

/// Expands a binary's `libdeps` recursively into the complete source and
/// system-library set.
///
/// Already-visited libraries are skipped, so diamond and cyclic `libdeps`
/// shapes terminate. Unknown library names fail with
/// [`ConfigError::UnknownLib`].
pub fn expand_link_inputs(
    config: &ProjectConfig,
    target: &TargetConfig,
) -> Result<LinkInputs, ConfigError> {
    let mut inputs = LinkInputs::default();
    inputs.sources.extend(flatten(&target.sources));
    inputs.syslibs.extend(target.syslibdeps.iter().cloned());

    let mut visited = BTreeSet::new();
    let mut pending: Vec<&str> = target.libdeps.iter().map(String::as_str).collect();
    while let Some(name) = pending.pop() {
        if !visited.insert(name.to_string()) {
            continue;
        }
        let lib = config
            .libs
            .get(name)
            .ok_or_else(|| ConfigError::UnknownLib(name.to_string()))?;
        inputs.sources.extend(flatten(&lib.sources));
        inputs.syslibs.extend(lib.syslibdeps.iter().cloned());
        pending.extend(lib.libdeps.iter().map(String::as_str));
    }

    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn flatten_nested_groups() {
        let config = load_config_from_str(
            r#"
header_units = [
    "top.h",
    { dir = "include", files = ["a.h", { dir = "detail", files = ["b.h"] }] },
]
"#,
        )
        .unwrap();
        let flat = flatten(&config.header_units);
        assert_eq!(
            flat,
            vec![
                PathBuf::from("top.h"),
                PathBuf::from("include/a.h"),
                PathBuf::from("include/detail/b.h"),
            ]
        );
    }

    #[test]
    fn expand_transitive_libdeps() {
        let config = load_config_from_str(
            r#"
[libs.core]
sources = ["core/lib.cpp"]
syslibdeps = ["z"]

[libs.net]
sources = ["net/socket.cpp"]
libdeps = ["core"]

[bins.app]
sources = ["app/main.cpp"]
libdeps = ["net"]
syslibdeps = ["pthread"]
"#,
        )
        .unwrap();
        let inputs = expand_link_inputs(&config, &config.bins["app"]).unwrap();
        let sources: Vec<_> = inputs.sources.iter().cloned().collect();
        assert_eq!(
            sources,
            vec![
                PathBuf::from("app/main.cpp"),
                PathBuf::from("core/lib.cpp"),
                PathBuf::from("net/socket.cpp"),
            ]
        );
        let syslibs: Vec<_> = inputs.syslibs.iter().cloned().collect();
        assert_eq!(syslibs, vec!["pthread", "z"]);
    }

    #[test]
    fn diamond_libdeps_visit_once() {
        let config = load_config_from_str(
            r#"
[libs.base]
sources = ["base.cpp"]

[libs.left]
sources = ["left.cpp"]
libdeps = ["base"]

[libs.right]
sources = ["right.cpp"]
libdeps = ["base"]

[bins.app]
sources = ["main.cpp"]
libdeps = ["left", "right"]
"#,
        )
        .unwrap();
        let inputs = expand_link_inputs(&config, &config.bins["app"]).unwrap();
        assert_eq!(inputs.sources.len(), 4);
    }
}
