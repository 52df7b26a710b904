//! Settings for the file writer, deserialized from a TOML options file.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default settings a file writer is constructed with.
///
/// `bindir`, `objdir` and `srcdirs` can be overridden per generation call
/// through [`DirOverrides`](crate::DirOverrides).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WriterOptions {
    /// Directory the simulator executable is placed in.
    #[serde(default)]
    pub bindir: Option<PathBuf>,
    /// Directory object files and generated headers are placed under.
    #[serde(default)]
    pub objdir: Option<PathBuf>,
    /// Root of the simulator repository; core sources live in `src/` below it
    /// and the makefile fragment is written directly into it.
    #[serde(default = "default_repo_root")]
    pub repo_root: PathBuf,
    /// Extra source directories searched before the core sources.
    #[serde(default, deserialize_with = "deserialize_path_or_vec")]
    pub srcdirs: Vec<PathBuf>,
    /// What to do with collected fragments when generation fails.
    #[serde(default)]
    pub flush_policy: FlushPolicy,
    /// Extension-to-banner entries layered over the built-in table.
    #[serde(default)]
    pub banners: BTreeMap<String, BannerKind>,
}

fn default_repo_root() -> PathBuf {
    PathBuf::from(".")
}

impl WriterOptions {
    /// Creates options with no default directories for the given repository root.
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            bindir: None,
            objdir: None,
            repo_root: repo_root.into(),
            srcdirs: Vec::new(),
            flush_policy: FlushPolicy::default(),
            banners: BTreeMap::new(),
        }
    }

    /// Sets the default binary directory.
    pub fn with_bindir(mut self, bindir: impl Into<PathBuf>) -> Self {
        self.bindir = Some(bindir.into());
        self
    }

    /// Sets the default object directory.
    pub fn with_objdir(mut self, objdir: impl Into<PathBuf>) -> Self {
        self.objdir = Some(objdir.into());
        self
    }

    /// Sets the flush policy.
    pub fn with_flush_policy(mut self, policy: FlushPolicy) -> Self {
        self.flush_policy = policy;
        self
    }

    /// Overrides the banner used for files with the given extension.
    pub fn with_banner(mut self, extension: impl Into<String>, kind: BannerKind) -> Self {
        self.banners.insert(extension.into(), kind);
        self
    }
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self::new(default_repo_root())
    }
}

/// Deserializes a field that can be either a single path or a list of paths.
fn deserialize_path_or_vec<'de, D>(deserializer: D) -> Result<Vec<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PathOrVec;

    impl<'de> Visitor<'de> for PathOrVec {
        type Value = Vec<PathBuf>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a path or a list of paths")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![PathBuf::from(v)])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<PathBuf>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(PathOrVec)
}

/// Whether fragments collected before a generation error are still written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlushPolicy {
    /// Always flush, even when generation failed partway (default).
    #[default]
    Always,
    /// Flush only when generation completed without error.
    OnSuccess,
}

/// The style of auto-generated warning banner placed at the top of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BannerKind {
    /// C/C++ block comment.
    Source,
    /// Makefile `#` comment.
    BuildTool,
    /// No banner.
    None,
}
