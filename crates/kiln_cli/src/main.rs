//! Kiln CLI — the command-line interface for the kiln build-graph generator.
//!
//! Invoked with no subcommand it regenerates the static `build.ninja` from
//! `kiln.toml`. The three scan subcommands are invoked by the generated
//! graph itself, one process per artifact: `kiln scan` for header units,
//! `kiln module-scan` for translation units, and `kiln link-scan` for a
//! binary's link closure.

#![warn(missing_docs)]

mod gen;
mod link_scan;
mod module_scan;
mod project;
mod scan;
mod toolchain;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

/// Kiln — a two-phase ninja build-graph generator for C++ modules.
#[derive(Parser, Debug)]
#[command(name = "kiln", version, about = "C++ modules build-graph generator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (per-scan) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `kiln.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run; defaults to `gen`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Regenerate the static build graph (`build.ninja`).
    Gen(GenArgs),
    /// Scan one header unit's dependency record.
    Scan(ScanArgs),
    /// Scan and classify one translation unit.
    ModuleScan(ModuleScanArgs),
    /// Resolve a binary's link closure from its objects' scans.
    LinkScan(LinkScanArgs),
}

/// Arguments for the `kiln gen` subcommand.
#[derive(Parser, Debug, Default)]
pub struct GenArgs {
    /// Skip the patched-clang toolchain check (use `clang++` as found).
    #[arg(long)]
    pub no_toolchain_check: bool,
}

/// Arguments for the `kiln scan` subcommand.
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// The preprocessor's dependency record for the header.
    pub dep_record: PathBuf,

    /// The header unit being scanned.
    pub header: PathBuf,

    /// Output path for the dyndep fragment.
    pub dyndep_out: PathBuf,

    /// Output path for the compiler flags file.
    pub flags_out: PathBuf,
}

/// Arguments for the `kiln module-scan` subcommand.
#[derive(Parser, Debug)]
pub struct ModuleScanArgs {
    /// The preprocessor's dependency record for the source.
    pub dep_record: PathBuf,

    /// The compiler's import annotation for the source.
    pub annotation: PathBuf,

    /// The translation unit being scanned.
    pub source: PathBuf,

    /// Output path for the dyndep fragment.
    pub dyndep_out: PathBuf,

    /// Output path for the object's compiler flags file.
    pub flags_out: PathBuf,
}

/// Arguments for the `kiln link-scan` subcommand.
#[derive(Parser, Debug)]
pub struct LinkScanArgs {
    /// The binary's dependency file to generate.
    pub binary_dd: PathBuf,

    /// One object dependency file per translation unit in the binary.
    #[arg(required = true)]
    pub object_dds: Vec<PathBuf>,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print per-scan information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    let command = cli.command.unwrap_or(Command::Gen(GenArgs::default()));
    let result = match command {
        Command::Gen(ref args) => gen::run(args, &global),
        Command::Scan(ref args) => scan::run(args, &global),
        Command::ModuleScan(ref args) => module_scan::run(args, &global),
        Command::LinkScan(ref args) => link_scan::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
