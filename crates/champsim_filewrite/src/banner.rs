//! "Automatically generated" banners, chosen by file extension.

use std::collections::BTreeMap;
use std::path::Path;

use champsim_config::BannerKind;

/// Banner for C and C++ sources and headers.
pub const SOURCE_BANNER: [&str; 5] = [
    "/***",
    " * THIS FILE IS AUTOMATICALLY GENERATED",
    " * Do not edit this file. It will be overwritten when the configure script is run.",
    " ***/",
    "",
];

/// Banner for makefile fragments.
pub const BUILD_TOOL_BANNER: [&str; 5] = [
    "###",
    "# THIS FILE IS AUTOMATICALLY GENERATED",
    "# Do not edit this file. It will be overwritten when the configure script is run.",
    "###",
    "",
];

/// Built-in extension table.
const DEFAULT_BANNERS: [(&str, BannerKind); 4] = [
    ("cc", BannerKind::Source),
    ("h", BannerKind::Source),
    ("inc", BannerKind::Source),
    ("mk", BannerKind::BuildTool),
];

/// Returns the banner lines for a banner kind.
pub fn banner_lines(kind: BannerKind) -> &'static [&'static str] {
    match kind {
        BannerKind::Source => &SOURCE_BANNER,
        BannerKind::BuildTool => &BUILD_TOOL_BANNER,
        BannerKind::None => &[],
    }
}

/// Lookup table from file extension (without the dot) to banner kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerTable {
    by_extension: BTreeMap<String, BannerKind>,
}

impl Default for BannerTable {
    fn default() -> Self {
        Self {
            by_extension: DEFAULT_BANNERS
                .iter()
                .map(|(ext, kind)| (ext.to_string(), *kind))
                .collect(),
        }
    }
}

impl BannerTable {
    /// Builds the default table with `overrides` layered on top.
    pub fn with_overrides(overrides: &BTreeMap<String, BannerKind>) -> Self {
        let mut table = Self::default();
        for (ext, kind) in overrides {
            table.by_extension.insert(ext.clone(), *kind);
        }
        table
    }

    /// Returns the banner kind for `path`. Unlisted or missing extensions get none.
    pub fn kind_for(&self, path: &Path) -> BannerKind {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.by_extension.get(ext))
            .copied()
            .unwrap_or(BannerKind::None)
    }

    /// Returns the banner lines to place at the top of `path`.
    pub fn banner_for(&self, path: &Path) -> &'static [&'static str] {
        banner_lines(self.kind_for(path))
    }
}
