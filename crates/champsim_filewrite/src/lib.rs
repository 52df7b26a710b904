//! Generated-file writer for the ChampSim build configuration.
//!
//! Content generators contribute `(path, lines)` fragments for the
//! instantiation file, constants header, module declaration/definition files,
//! per-module function maps and the makefile fragment. Headers are namespaced
//! under `{objdir}/{build_id}/inc/` so several configurations can share one
//! object directory. At flush time fragments are grouped by path, given an
//! extension-specific banner, and written only when the content actually
//! changed, leaving modification times alone for incremental builds.

#![warn(missing_docs)]

pub mod banner;
pub mod change;
pub mod error;
pub mod fragment;
pub mod generate;
pub mod scoped;
pub mod writer;

pub use banner::{banner_lines, BannerTable, BUILD_TOOL_BANNER, SOURCE_BANNER};
pub use error::{FileWriteError, GenerateError};
pub use fragment::{Fragment, FragmentGroup, FragmentSet};
pub use generate::{function_map_lines, FileWriter, FragmentSources, MakefileInputs, ModuleLines};
pub use scoped::with_writer;
pub use writer::{flush, FlushReport};
