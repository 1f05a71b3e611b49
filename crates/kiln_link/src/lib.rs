//! Transitive link-closure resolution for binaries.
//!
//! After every per-object scan for a binary's sources has run, the closure
//! resolver expands each object's recorded dependency set into the full
//! object list the link step needs, stopping at module boundaries: a named
//! module's defining object links exactly once, as one of the binary's own
//! initial sources, so module-link artifacts never contribute link edges.

#![warn(missing_docs)]

mod closure;
mod error;

pub use closure::resolve_link_closure;
pub use error::LinkError;
