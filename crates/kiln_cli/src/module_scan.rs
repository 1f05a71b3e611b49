//! `kiln module-scan` — translation-unit scanning and classification.

use kiln_scan::{scan_source, TranslationUnitKind};

use crate::{project, GlobalArgs, ModuleScanArgs};

/// Runs the `kiln module-scan` command.
pub fn run(args: &ModuleScanArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = project::load(global)?;
    let registry = project::build_registry(&project)?;

    let outcome = scan_source(
        &registry,
        &project.layout,
        &args.dep_record,
        &args.annotation,
        &args.source,
        &args.dyndep_out,
        &args.flags_out,
    )?;

    if global.verbose {
        let kind = match outcome.kind {
            TranslationUnitKind::Plain => "plain",
            TranslationUnitKind::ModuleInterfaceOrPartition => "module interface/partition",
            TranslationUnitKind::ModuleImplementation => "module implementation",
        };
        eprintln!("   Scanned {} ({kind})", args.source.display());
    }
    Ok(0)
}
