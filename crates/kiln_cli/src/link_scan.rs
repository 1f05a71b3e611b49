//! `kiln link-scan` — link-closure resolution for one binary.

use kiln_link::resolve_link_closure;

use crate::{project, GlobalArgs, LinkScanArgs};

/// Runs the `kiln link-scan` command.
///
/// Needs only the artifact layout from configuration; the per-object
/// dependency sets were already recorded by earlier module scans.
pub fn run(args: &LinkScanArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = project::load(global)?;

    let objects = resolve_link_closure(&project.layout, &args.binary_dd, &args.object_dds)?;

    if global.verbose {
        eprintln!(
            "   Resolved link closure for {} ({} objects)",
            args.binary_dd.display(),
            objects.len()
        );
    }
    Ok(0)
}
