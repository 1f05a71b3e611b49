//! `kiln gen` — static build-graph emission.
//!
//! Emits the non-dynamic portion of the graph to `build.ninja`. The full
//! pipeline:
//!
//! 1. Load `kiln.toml` and flatten header units and target sources
//! 2. Verify the toolchain (patched clang++ on PATH)
//! 3. Create the module-link directory
//! 4. Emit rules, then per-header-unit, per-source, and per-binary edges
//! 5. Write `build.ninja` (idempotently — regeneration with an unchanged
//!    config must not churn the graph's mtime)
//!
//! Everything dependency-shaped is deferred to the scan edges: each source
//! gets a SCAN/MAYBE_MODULE_SCAN edge whose output dyndep file gates its
//! pcm and object builds, and each binary a LINKSCAN edge gating its link.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use kiln_common::{append_suffix, write_if_changed, ArtifactLayout};
use kiln_config::{expand_link_inputs, flatten, ProjectConfig, CONFIG_FILE_NAME};
use kiln_ninja::{BuildEdge, NinjaWriter};

use crate::{project, toolchain, GenArgs, GlobalArgs};

/// Output file name for the static graph.
const BUILD_FILE: &str = "build.ninja";

/// Runs the `kiln gen` command.
pub fn run(args: &GenArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    // Step 1: Load config and flatten the source trees.
    let project = project::load(global)?;
    let config = &project.config;
    let layout = &project.layout;

    // Step 2: Toolchain check.
    let cxx = if args.no_toolchain_check {
        PathBuf::from("clang++")
    } else {
        toolchain::discover()?.cxx
    };

    // Step 3: The module-link directory must exist before any scan runs.
    std::fs::create_dir_all(layout.mod_link_dir())?;

    // Step 4: Emit the graph.
    let kiln_exe = std::env::current_exe()?;
    let config_file = global
        .config
        .clone()
        .unwrap_or_else(|| CONFIG_FILE_NAME.to_string());
    let graph = emit_graph(config, layout, &cxx, &kiln_exe, &config_file)?;

    // Step 5: Write it.
    write_if_changed(&graph, Path::new(BUILD_FILE), false)?;

    if !global.quiet {
        let header_units = flatten(&config.header_units).len();
        let sources = collect_sources(config).len();
        eprintln!(
            "   Generated {BUILD_FILE} ({sources} sources, {header_units} header units, {} binaries)",
            config.bins.len()
        );
    }
    Ok(0)
}

/// Every translation unit in the project, libs first, deduplicated in
/// first-seen order.
fn collect_sources(config: &ProjectConfig) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();
    for target in config.libs.values().chain(config.bins.values()) {
        for source in flatten(&target.sources) {
            if seen.insert(source.clone()) {
                sources.push(source);
            }
        }
    }
    sources
}

/// Emits the complete static graph as ninja text.
fn emit_graph(
    config: &ProjectConfig,
    layout: &ArtifactLayout,
    cxx: &Path,
    kiln_exe: &Path,
    config_file: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let header_units = flatten(&config.header_units);
    let sources = collect_sources(config);
    let excluded: HashSet<PathBuf> = config
        .module_exclusions
        .iter()
        .map(PathBuf::from)
        .collect();

    let mut ninja = NinjaWriter::new();
    ninja.comment("This file was generated by kiln. DO NOT EDIT.");
    ninja.variable("KILN", &kiln_exe.display().to_string());
    ninja.variable("CXX", &cxx.display().to_string());
    ninja.newline();
    emit_rules(&mut ninja);
    ninja.newline();

    let scan_implicits = ["$CXX".to_string(), "$KILN".to_string(), config_file.to_string()];

    let mut maybe_mod_scans = Vec::new();
    let mut scans = Vec::new();
    let mut pcms = Vec::new();
    let mut objs = Vec::new();

    for hu in &header_units {
        let a = layout.header_artifacts(hu);
        let dyndep = a.dyndep.display().to_string();
        let pcm = a.pcm.display().to_string();
        let object = a.object.display().to_string();
        let flags = a.flags.display().to_string();
        scans.push(dyndep.clone());
        pcms.push(pcm.clone());
        objs.push(object.clone());

        ninja.build(
            &BuildEdge::new(&dyndep, "SCAN")
                .input(hu.display().to_string())
                .implicits(scan_implicits.iter().cloned())
                .variable("KIND", "c++-header")
                .variable("PCMFLAGS_FILE", &flags),
        );
        ninja.build(
            &BuildEdge::new(&pcm, "HEADER_UNIT")
                .input(hu.display().to_string())
                .implicit("$CXX")
                .order_only(&dyndep)
                .order_only("maybe_mod_scans")
                .variable("dyndep", &dyndep)
                .variable("PCMFLAGS_FILE", &flags),
        );
        ninja.build(
            &BuildEdge::new(&object, "HEADER_UNIT_CXX")
                .input(&pcm)
                .implicit("$CXX"),
        );
        ninja.newline();
    }

    for cpp in &sources {
        let a = layout.source_artifacts(cpp);
        let dyndep = a.dyndep.display().to_string();
        let object = a.object.display().to_string();
        let pcm = a.pcm.display().to_string();
        maybe_mod_scans.push(dyndep.clone());
        scans.push(dyndep.clone());
        objs.push(object.clone());

        ninja.build(
            &BuildEdge::new(&dyndep, "MAYBE_MODULE_SCAN")
                .input(cpp.display().to_string())
                .implicits(scan_implicits.iter().cloned())
                .variable("KIND", "c++-module")
                .variable("PCMFLAGS_FILE", a.flags.display().to_string()),
        );

        // Excluded sources compile without module-file flags, but dropping
        // the flags file would also drop the input source it names, so it
        // is sneaked back in as an extra @file parameter.
        let flags_file = if excluded.contains(cpp) {
            format!("/dev/null {}", cpp.display())
        } else {
            a.flags.display().to_string()
        };

        for (rule, target) in [("CXX", &object), ("CXXPRE", &pcm)] {
            ninja.build(
                &BuildEdge::new(target, rule)
                    .input(cpp.display().to_string())
                    .implicit("$CXX")
                    .order_only(&dyndep)
                    .order_only("maybe_mod_scans")
                    .variable("dyndep", &dyndep)
                    .variable("FLAGS_FILE", &flags_file),
            );
        }
        ninja.newline();
    }

    let mut bin_outs = Vec::new();
    for (name, bin) in &config.bins {
        let out = layout.out_base(Path::new(name));
        let deps_file = append_suffix(&out, ".dd").display().to_string();
        let inputs = expand_link_inputs(config, bin)?;

        ninja.build(
            &BuildEdge::new(&deps_file, "LINKSCAN")
                .inputs(
                    inputs
                        .sources
                        .iter()
                        .map(|s| layout.source_artifacts(s).dyndep.display().to_string()),
                )
                .implicit("$KILN"),
        );

        let mut edge = BuildEdge::new(out.display().to_string(), "BIN")
            .input(&deps_file)
            .variable("dyndep", &deps_file);
        if !inputs.syslibs.is_empty() {
            let extralibs: Vec<String> =
                inputs.syslibs.iter().map(|l| format!("-l{l}")).collect();
            edge = edge.variable("EXTRALIBS", extralibs.join(" "));
        }
        ninja.build(&edge);
        bin_outs.push(out.display().to_string());
    }

    ninja.newline();
    ninja.build(&BuildEdge::new("maybe_mod_scans", "phony").inputs(maybe_mod_scans));
    ninja.build(&BuildEdge::new("scans", "phony").inputs(scans));
    ninja.build(&BuildEdge::new("pcms", "phony").inputs(pcms));
    ninja.build(&BuildEdge::new("objs", "phony").inputs(objs));
    ninja.build(&BuildEdge::new("bins", "phony").inputs(bin_outs));
    ninja.default(&["bins"]);

    ninja.newline();
    ninja.build(
        &BuildEdge::new(BUILD_FILE, "GENERATOR")
            .implicit("$KILN")
            .implicit(config_file),
    );

    Ok(ninja.into_string())
}

/// Emits the rule preamble.
///
/// The scan rules preprocess with the patched compiler, then hand the
/// dependency record (and import annotation) to the matching kiln
/// subcommand; restat stops unchanged scan output from cascading.
fn emit_rules(ninja: &mut NinjaWriter) {
    ninja.rule(
        "SCAN",
        "$CXX -x $KIND $in -fsyntax-only -MD -MF $out.t && \
         $KILN scan $out.t $in $out $PCMFLAGS_FILE",
        &[("description", "SCAN $in"), ("restat", "1")],
    );
    ninja.rule(
        "MAYBE_MODULE_SCAN",
        "$CXX -x $KIND $in -Eonly -MD -MF $out.t \
         -fmodules-write-imports=$out.imports && \
         $KILN module-scan $out.t $out.imports $in $out $PCMFLAGS_FILE",
        &[("description", "MODSCAN $in"), ("restat", "1")],
    );
    ninja.rule(
        "HEADER_UNIT",
        "$CXX -x c++-header --precompile @$PCMFLAGS_FILE $in -o $out",
        &[("description", "HEADER_UNIT $in"), ("restat", "1")],
    );
    ninja.rule(
        "HEADER_UNIT_CXX",
        "$CXX -c $in -o $out",
        &[("description", "CXX $in")],
    );
    ninja.rule(
        "CXX",
        "$CXX @$FLAGS_FILE -c -o $out",
        &[("description", "CXX $in"), ("restat", "1")],
    );
    ninja.rule(
        "CXXPRE",
        "$CXX @$out.flags --precompile -o $out",
        &[("description", "CXXPRE $in"), ("restat", "1")],
    );
    ninja.rule(
        "LINKSCAN",
        "$KILN link-scan $out $in",
        &[("description", "LINKSCAN $out")],
    );
    ninja.rule(
        "BIN",
        "$CXX @$in.flags -o $out $EXTRALIBS",
        &[("description", "LINK $out")],
    );
    ninja.rule(
        "GENERATOR",
        "$KILN gen",
        &[("description", "GENERATOR build.ninja"), ("generator", "1")],
    );
}
