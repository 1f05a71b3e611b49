//! The link-closure worklist algorithm.

use crate::error::LinkError;
use kiln_common::{append_suffix, write_if_changed, ArtifactLayout};
use kiln_ninja::{BuildEdge, NinjaWriter};
use kiln_scan::read_flags_file;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

/// Dependency-file suffix every worklist entry must carry.
const DD_SUFFIX: &str = ".dd";

/// Resolves a binary's link closure and emits its dyndep fragment.
///
/// The worklist starts from one `.dd` file per translation unit in the
/// binary; a considered set prevents revisiting. For each entry the object
/// path is derived by stripping the suffix, then the object's flags file
/// is parsed to recover its resolved dependency set:
///
/// - dependencies under the module-link namespace are skipped entirely —
///   importing a module must not re-link the module's defining object into
///   every importer;
/// - any other dependency is another unit's artifact one hop away, and its
///   object joins the result directly (such dependencies do not chain
///   further through this mechanism).
///
/// Termination is structural: the queue only drains and no entry is
/// revisited. The result is sorted and deduplicated, then written as the
/// binary's dyndep fragment plus a side file listing the objects one per
/// line for the link command. Both writes are forced; the executor re-reads
/// them unconditionally after every link scan.
///
/// Returns the sorted object set.
pub fn resolve_link_closure(
    layout: &ArtifactLayout,
    binary_dd_path: &Path,
    initial_dds: &[PathBuf],
) -> Result<Vec<PathBuf>, LinkError> {
    let binary = strip_dd_suffix(binary_dd_path)?;

    let mut objects = BTreeSet::new();
    let mut considered: HashSet<PathBuf> = HashSet::with_capacity(initial_dds.len());
    let mut queue: Vec<PathBuf> = initial_dds.to_vec();

    while let Some(dd) = queue.pop() {
        if !considered.insert(dd.clone()) {
            continue;
        }
        let object = strip_dd_suffix(&dd)?;
        let flags = read_flags_file(&append_suffix(&object, ".flags"))?;
        objects.insert(object);

        for base in &flags.module_file_bases {
            if layout.is_module_link(base) {
                continue;
            }
            // One hop only: other units' objects join the result directly,
            // without re-queueing their own .dd files.
            objects.insert(append_suffix(base, ".o"));
        }
    }

    let objects: Vec<PathBuf> = objects.into_iter().collect();

    let mut ninja = NinjaWriter::new();
    ninja.dyndep_header();
    ninja.build(
        &BuildEdge::new(binary.display().to_string(), "dyndep")
            .implicits(objects.iter().map(|p| p.display().to_string())),
    );
    write_if_changed(&ninja.into_string(), binary_dd_path, true)?;

    let mut listing = String::new();
    for object in &objects {
        listing.push_str(&object.display().to_string());
        listing.push('\n');
    }
    write_if_changed(&listing, &append_suffix(binary_dd_path, ".flags"), true)?;

    Ok(objects)
}

/// Strips the `.dd` suffix, failing fast on anything else.
fn strip_dd_suffix(path: &Path) -> Result<PathBuf, LinkError> {
    path.to_str()
        .and_then(|s| s.strip_suffix(DD_SUFFIX))
        .map(PathBuf::from)
        .ok_or_else(|| LinkError::BadDepFileName(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    struct Fixture {
        _dir: tempfile::TempDir,
        out: PathBuf,
        layout: ArtifactLayout,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let out = dir.path().join("out");
            fs::create_dir(&out).unwrap();
            let layout = ArtifactLayout::new(&out);
            Self {
                _dir: dir,
                out,
                layout,
            }
        }

        /// Writes `<name>.o.flags` and returns the matching `<name>.o.dd` path.
        fn unit(&self, name: &str, flags: &str) -> PathBuf {
            fs::write(self.out.join(format!("{name}.o.flags")), flags).unwrap();
            self.out.join(format!("{name}.o.dd"))
        }
    }

    /// End to end: real scan output for an importer and the module
    /// interface it imports, fed straight into the closure resolver.
    #[test]
    fn scanned_units_resolve_to_their_objects() {
        let fx = Fixture::new();
        let scan = |name: &str, annotation: &str| {
            let source = fx._dir.path().join(name);
            fs::write(&source, name).unwrap();
            let record = fx._dir.path().join(format!("{name}.t"));
            fs::write(&record, format!("{name}.o: {}\n", source.display())).unwrap();
            let annotation_path = fx._dir.path().join(format!("{name}.imports"));
            fs::write(&annotation_path, annotation).unwrap();

            let a = fx.layout.source_artifacts(&source);
            kiln_scan::scan_source(
                &kiln_scan::HeaderUnitRegistry::default(),
                &fx.layout,
                &record,
                &annotation_path,
                &source,
                &a.dyndep,
                &a.flags,
            )
            .unwrap();
            (a.dyndep, a.object)
        };

        let (s1_dd, s1_obj) = scan("s1.cpp", "m\n");
        let (s2_dd, s2_obj) = scan("s2.cpp", "module,export,m\n");

        let bin_dd = fx.out.join("app.dd");
        let objects =
            resolve_link_closure(&fx.layout, &bin_dd, &[s1_dd, s2_dd]).unwrap();

        let mut expected = vec![s1_obj, s2_obj];
        expected.sort();
        assert_eq!(objects, expected);
        let listing = fs::read_to_string(fx.out.join("app.dd.flags")).unwrap();
        assert!(!listing.contains("mod_links"));
    }

    #[test]
    fn closure_excludes_module_link_artifacts() {
        let fx = Fixture::new();
        let s2_pcm = fx.layout.pcm(Path::new("s2.cpp"));
        let m_link = fx.layout.module_link("m");

        // S1 (plain) references S2's pcm directly; S2 imports module m.
        let s1_dd = fx.unit(
            "s1.cpp",
            &format!("-fmodule-file={}\n-x c++\ns1.cpp\n", s2_pcm.display()),
        );
        let s2_dd = fx.unit(
            "s2.cpp",
            &format!("-fmodule-file={}\n-x c++\ns2.cpp\n", m_link.display()),
        );

        let bin_dd = fx.out.join("app.dd");
        let objects =
            resolve_link_closure(&fx.layout, &bin_dd, &[s1_dd, s2_dd]).unwrap();

        assert_eq!(
            objects,
            vec![fx.out.join("s1.cpp.o"), fx.out.join("s2.cpp.o")]
        );
        let listing = fs::read_to_string(fx.out.join("app.dd.flags")).unwrap();
        assert!(!listing.contains("mod_links"));
    }

    #[test]
    fn module_unit_flags_contribute_no_deps() {
        let fx = Fixture::new();
        // A module interface's object flags hold only the bare module-link
        // path it compiles from.
        let foo_dd = fx.unit(
            "foo.cpp",
            &format!("{}\n", fx.layout.module_link("foo").display()),
        );

        let bin_dd = fx.out.join("app.dd");
        let objects = resolve_link_closure(&fx.layout, &bin_dd, &[foo_dd]).unwrap();
        assert_eq!(objects, vec![fx.out.join("foo.cpp.o")]);
    }

    #[test]
    fn header_unit_deps_link_their_objects() {
        let fx = Fixture::new();
        let a_pcm = fx.layout.pcm(Path::new("a.h"));
        let main_dd = fx.unit(
            "main.cpp",
            &format!("-fmodule-file={}\n-x c++\nmain.cpp\n", a_pcm.display()),
        );

        let bin_dd = fx.out.join("app.dd");
        let objects = resolve_link_closure(&fx.layout, &bin_dd, &[main_dd]).unwrap();
        assert_eq!(
            objects,
            vec![fx.out.join("a.h.o"), fx.out.join("main.cpp.o")]
        );
    }

    #[test]
    fn emits_sorted_dyndep_and_listing() {
        let fx = Fixture::new();
        let z_dd = fx.unit("z.cpp", "-x c++\nz.cpp\n");
        let a_dd = fx.unit("a.cpp", "-x c++\na.cpp\n");

        let bin_dd = fx.out.join("app.dd");
        resolve_link_closure(&fx.layout, &bin_dd, &[z_dd, a_dd]).unwrap();

        let dd_text = fs::read_to_string(&bin_dd).unwrap();
        assert!(dd_text.starts_with("ninja_dyndep_version = 1\n"));
        let a_pos = dd_text.find("a.cpp.o").unwrap();
        let z_pos = dd_text.find("z.cpp.o").unwrap();
        assert!(a_pos < z_pos);

        let listing = fs::read_to_string(fx.out.join("app.dd.flags")).unwrap();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("a.cpp.o"));
        assert!(lines[1].ends_with("z.cpp.o"));
    }

    #[test]
    fn non_dd_input_fails_fast() {
        let fx = Fixture::new();
        let bin_dd = fx.out.join("app.dd");
        let err = resolve_link_closure(
            &fx.layout,
            &bin_dd,
            &[fx.out.join("oops.flags")],
        )
        .unwrap_err();
        assert!(matches!(err, LinkError::BadDepFileName(_)));
    }

    #[test]
    fn missing_flags_file_is_fatal() {
        let fx = Fixture::new();
        let bin_dd = fx.out.join("app.dd");
        let err = resolve_link_closure(
            &fx.layout,
            &bin_dd,
            &[fx.out.join("ghost.cpp.o.dd")],
        )
        .unwrap_err();
        assert!(matches!(err, LinkError::Scan(_)));
    }
}
