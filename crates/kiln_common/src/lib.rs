//! Shared foundational types used across the kiln build-graph generator.
//!
//! This crate provides filesystem identity resolution, the deterministic
//! artifact path layout, and the change-detecting file writer that all
//! scanners emit through.

#![warn(missing_docs)]

pub mod identity;
pub mod layout;
pub mod writer;

pub use identity::{identity_of, FileIdentity, IdentityError};
pub use layout::{append_suffix, ArtifactLayout, BuildArtifacts};
pub use writer::{write_if_changed, WriteError};
