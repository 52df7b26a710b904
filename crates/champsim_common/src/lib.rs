//! Shared foundational types for the ChampSim configuration tooling.
//!
//! This crate provides the build identifier used to namespace generated files
//! per configuration, together with the canonical serialization it is computed
//! from.

#![warn(missing_docs)]

pub mod hash;

pub use hash::{canonical_json, BuildId, HashError, BUILD_ID_BYTES};
