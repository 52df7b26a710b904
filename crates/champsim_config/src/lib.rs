//! Data model and writer settings for ChampSim file generation.
//!
//! This crate holds the already resolved simulator configuration
//! ([`ParsedConfig`]) that generated files are derived from, and the
//! [`WriterOptions`] the file writer is constructed with, loaded from TOML.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod options;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_options, load_options_from_str};
pub use options::{BannerKind, FlushPolicy, WriterOptions};
pub use resolve::{normalize_lexically, resolve_dirs, DirOverrides, ResolvedDirs};
pub use types::*;
