//! Translation-unit scanning and classification.
//!
//! Combines the dependency record, the import annotation, and the
//! header-unit registry to classify one source, resolve every import and
//! header dependency to a concrete artifact path, and emit its dyndep
//! fragment and flags files.

use crate::annotation::{read_imports, TranslationUnitKind};
use crate::error::ScanError;
use crate::flags::{module_file_flag, module_name_flag};
use crate::registry::{match_header_units, HeaderUnitRegistry};
use kiln_common::{append_suffix, write_if_changed, ArtifactLayout};
use kiln_ninja::{BuildEdge, NinjaWriter};
use std::path::{Path, PathBuf};

/// What a source scan concluded about its translation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceScanOutcome {
    /// The unit's classification.
    pub kind: TranslationUnitKind,
    /// The module-link artifact this unit produces, for interface and
    /// partition units.
    pub module_link: Option<PathBuf>,
}

/// Scans one translation unit.
///
/// Resolves header-unit matches from the dependency record (self entries
/// excluded) and one module-link path per import directive, then emits by
/// classification:
///
/// - **interface/partition**: the pcm dyndep declares the resolved set as
///   implicit inputs and the unit's module-link artifact as an implicit
///   output; the pcm flags file carries the module-file directives, the
///   module name, and the output redirect; the object flags file (at
///   `flags_out`) holds the module-link path the object is compiled from —
///   it doubles as the side file the link scan reads.
/// - **plain/implementation**: the pcm dyndep is empty (present only for
///   graph-shape uniformity); the object depends on the resolved set
///   directly and its flags end with `-x c++` plus the source path, since
///   the compile command names its input only through this file.
///
/// The object dyndep edge is written in both cases. All writes are
/// idempotent.
pub fn scan_source(
    registry: &HeaderUnitRegistry,
    layout: &ArtifactLayout,
    dep_record_path: &Path,
    annotation_path: &Path,
    source_path: &Path,
    dyndep_out: &Path,
    flags_out: &Path,
) -> Result<SourceScanOutcome, ScanError> {
    let record = crate::depfile::read_dep_record(dep_record_path)?;
    let descriptor = read_imports(annotation_path)?;

    let mut resolved = match_header_units(registry, source_path, &record.deps)?;
    for import in &descriptor.imports {
        resolved.push(layout.module_link(import));
    }
    resolved.sort();
    resolved.dedup();

    let pcm = layout.pcm(source_path);
    let object = layout.object(source_path);
    let kind = descriptor.kind();

    let mut ninja = NinjaWriter::new();
    ninja.dyndep_header();

    let module_link = match (kind, descriptor.module_name.as_deref()) {
        (TranslationUnitKind::ModuleInterfaceOrPartition, Some(name)) => {
            let module_link = layout.module_link(name);
            ninja.build(
                &BuildEdge::new(pcm.display().to_string(), "dyndep")
                    .implicits(resolved.iter().map(|p| p.display().to_string()))
                    .implicit_output(module_link.display().to_string()),
            );
            ninja.build(
                &BuildEdge::new(object.display().to_string(), "dyndep")
                    .implicit(pcm.display().to_string()),
            );

            let mut pcm_flags = String::new();
            for dep in &resolved {
                pcm_flags.push_str(&module_file_flag(dep));
                pcm_flags.push('\n');
            }
            pcm_flags.push_str(&module_name_flag(name));
            pcm_flags.push('\n');
            pcm_flags.push_str(&format!("-o {}\n", module_link.display()));
            write_if_changed(&pcm_flags, &append_suffix(&pcm, ".flags"), false)?;

            // The object is compiled from the module-link pcm; the bare
            // path is also what future importers' link scans read back.
            write_if_changed(&format!("{}\n", module_link.display()), flags_out, false)?;

            Some(module_link)
        }
        _ => {
            // Implementation units compile as plain sources; their pcm
            // edge exists but nothing depends on it.
            ninja.build(&BuildEdge::new(pcm.display().to_string(), "dyndep"));
            ninja.build(
                &BuildEdge::new(object.display().to_string(), "dyndep")
                    .implicits(resolved.iter().map(|p| p.display().to_string())),
            );

            let mut obj_flags = String::new();
            for dep in &resolved {
                obj_flags.push_str(&module_file_flag(dep));
                obj_flags.push('\n');
            }
            obj_flags.push_str("-x c++\n");
            obj_flags.push_str(&format!("{}\n", source_path.display()));
            write_if_changed(&obj_flags, flags_out, false)?;

            None
        }
    };

    write_if_changed(&ninja.into_string(), dyndep_out, false)?;

    Ok(SourceScanOutcome { kind, module_link })
}
