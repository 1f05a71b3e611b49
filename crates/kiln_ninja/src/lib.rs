//! Minimal ninja-syntax emitter.
//!
//! Builds ninja file text in memory; the caller decides where it lands
//! (usually through `kiln_common::write_if_changed`, since these files are
//! themselves build-graph inputs). Output is byte-stable: the same call
//! sequence always produces the same text.

#![warn(missing_docs)]

mod writer;

pub use writer::{escape_path, BuildEdge, NinjaWriter};
