//! Header-unit dependency scanning.
//!
//! Given the preprocessor's dependency record for one header, determines
//! which of its textual dependencies are registered header units and emits
//! the dyndep fragment and flags file that unlock the header's pcm build.

use crate::error::ScanError;
use crate::flags::module_file_flag;
use crate::registry::{match_header_units, HeaderUnitRegistry};
use kiln_common::{write_if_changed, ArtifactLayout};
use kiln_ninja::{BuildEdge, NinjaWriter};
use std::path::Path;

/// Scans one header unit.
///
/// Parses the dependency record at `dep_record_path`, drops entries that
/// are the header itself, matches the rest against the registry by
/// filesystem identity, and writes:
///
/// - a dyndep fragment at `dyndep_out` declaring the header's pcm to
///   implicitly depend on every matched pcm, and
/// - a flags file at `flags_out` with one module-file directive per match.
///
/// Both writes are idempotent; unchanged inputs produce byte-identical
/// output and leave the files untouched. Returns the number of matched
/// header units.
pub fn scan_header_unit(
    registry: &HeaderUnitRegistry,
    layout: &ArtifactLayout,
    dep_record_path: &Path,
    header_path: &Path,
    dyndep_out: &Path,
    flags_out: &Path,
) -> Result<usize, ScanError> {
    let record = crate::depfile::read_dep_record(dep_record_path)?;
    let source_mods = match_header_units(registry, header_path, &record.deps)?;

    let pcm = layout.pcm(header_path);
    let mut ninja = NinjaWriter::new();
    ninja.dyndep_header();
    ninja.build(
        &BuildEdge::new(pcm.display().to_string(), "dyndep")
            .implicits(source_mods.iter().map(|p| p.display().to_string())),
    );
    write_if_changed(&ninja.into_string(), dyndep_out, false)?;

    let mut flags = String::new();
    for dep in &source_mods {
        flags.push_str(&module_file_flag(dep));
        flags.push('\n');
    }
    write_if_changed(&flags, flags_out, false)?;

    Ok(source_mods.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::HeaderUnitRegistry;
    use std::fs;
    use std::path::PathBuf;

    struct Fixture {
        _dir: tempfile::TempDir,
        root: PathBuf,
        layout: ArtifactLayout,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let root = dir.path().to_path_buf();
            fs::create_dir(root.join("out")).unwrap();
            let layout = ArtifactLayout::new(root.join("out"));
            Self {
                _dir: dir,
                root,
                layout,
            }
        }

        fn touch(&self, name: &str) -> PathBuf {
            let p = self.root.join(name);
            fs::write(&p, name).unwrap();
            p
        }
    }

    #[test]
    fn end_to_end_header_scan() {
        let fx = Fixture::new();
        let a = fx.touch("a.h");
        let b = fx.touch("b.h");
        let registry = HeaderUnitRegistry::build(&fx.layout, &[a.clone(), b.clone()]).unwrap();

        // b.h includes a.h; the record lists b.h itself too.
        let record = fx.root.join("b.h.pcm.t");
        fs::write(
            &record,
            format!("b.h.pcm: {} {}\n", b.display(), a.display()),
        )
        .unwrap();

        let dd = fx.root.join("out/b.h.pcm.dd");
        let flags = fx.root.join("out/b.h.pcm.flags");
        let matched =
            scan_header_unit(&registry, &fx.layout, &record, &b, &dd, &flags).unwrap();
        assert_eq!(matched, 1);

        let a_pcm = fx.layout.pcm(&a);
        // Rejoin `$` continuations so the whole logical line can be matched.
        let dd_text = fs::read_to_string(&dd).unwrap().replace(" $\n    ", " ");
        assert!(dd_text.starts_with("ninja_dyndep_version = 1\n"));
        assert!(dd_text.contains(&format!("dyndep | {}", a_pcm.display())));

        let flags_text = fs::read_to_string(&flags).unwrap();
        assert_eq!(
            flags_text,
            format!("-fmodule-file={}\n", a_pcm.display())
        );
    }

    #[test]
    fn self_only_record_yields_no_deps() {
        let fx = Fixture::new();
        let b = fx.touch("b.h");
        let registry = HeaderUnitRegistry::build(&fx.layout, &[b.clone()]).unwrap();

        let record = fx.root.join("b.h.pcm.t");
        fs::write(&record, format!("b.h.pcm: {}\n", b.display())).unwrap();

        let dd = fx.root.join("out/b.h.pcm.dd");
        let flags = fx.root.join("out/b.h.pcm.flags");
        let matched =
            scan_header_unit(&registry, &fx.layout, &record, &b, &dd, &flags).unwrap();
        assert_eq!(matched, 0);
        assert_eq!(fs::read_to_string(&flags).unwrap(), "");
        let dd_text = fs::read_to_string(&dd).unwrap();
        assert!(dd_text.trim_end().ends_with(": dyndep"));
    }

    #[test]
    fn rescan_of_unchanged_input_is_byte_identical() {
        let fx = Fixture::new();
        let a = fx.touch("a.h");
        let b = fx.touch("b.h");
        let registry = HeaderUnitRegistry::build(&fx.layout, &[a.clone()]).unwrap();

        let record = fx.root.join("b.h.pcm.t");
        fs::write(
            &record,
            format!("b.h.pcm: {} {}\n", b.display(), a.display()),
        )
        .unwrap();

        let dd = fx.root.join("out/b.h.pcm.dd");
        let flags = fx.root.join("out/b.h.pcm.flags");
        scan_header_unit(&registry, &fx.layout, &record, &b, &dd, &flags).unwrap();
        let first = fs::read(&dd).unwrap();
        scan_header_unit(&registry, &fx.layout, &record, &b, &dd, &flags).unwrap();
        assert_eq!(first, fs::read(&dd).unwrap());
    }
}
