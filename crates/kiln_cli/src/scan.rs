//! `kiln scan` — header-unit dependency scanning.

use kiln_scan::scan_header_unit;

use crate::{project, GlobalArgs, ScanArgs};

/// Runs the `kiln scan` command.
///
/// Rebuilds the header-unit registry from configuration (each scan is an
/// independent process), then scans one header unit.
pub fn run(args: &ScanArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = project::load(global)?;
    let registry = project::build_registry(&project)?;

    let matched = scan_header_unit(
        &registry,
        &project.layout,
        &args.dep_record,
        &args.header,
        &args.dyndep_out,
        &args.flags_out,
    )?;

    if global.verbose {
        eprintln!(
            "   Scanned header unit {} ({matched} header-unit deps)",
            args.header.display()
        );
    }
    Ok(0)
}
