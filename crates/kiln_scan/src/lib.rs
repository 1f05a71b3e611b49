//! Per-source dependency scanning for C++ modules and header units.
//!
//! Module and header-unit dependencies are discoverable only by inspecting
//! source content, so the build runs in two phases: the static graph hands
//! each source to a scan subcommand, and the scanners here turn the
//! compiler's dependency record and import annotation into a ninja dyndep
//! fragment plus a compiler flags file, unlocking that one artifact's
//! build just-in-time.

#![warn(missing_docs)]

pub mod annotation;
pub mod depfile;
pub mod error;
pub mod flags;
pub mod header_unit;
pub mod registry;
pub mod source;

pub use annotation::{parse_imports, read_imports, ModuleDescriptor, TranslationUnitKind};
pub use depfile::{parse_dep_record, read_dep_record, DepRecord};
pub use error::ScanError;
pub use flags::{parse_flags_file, read_flags_file, FlagsFile};
pub use header_unit::scan_header_unit;
pub use registry::{match_header_units, HeaderUnit, HeaderUnitRegistry};
pub use source::{scan_source, SourceScanOutcome};
