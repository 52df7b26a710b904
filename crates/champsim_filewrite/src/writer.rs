//! Flushing fragments to disk.
//!
//! Each target path gets its banner and the lines of every fragment submitted
//! for it. The file is written only if it is missing or its content differs
//! after trimming, so regenerating an unchanged configuration leaves
//! modification times alone and downstream builds do not recompile.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::banner::BannerTable;
use crate::change::needs_write;
use crate::error::FileWriteError;
use crate::fragment::{FragmentGroup, FragmentSet};

/// Outcome of a flush, per target path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Files that were created or rewritten.
    pub written: Vec<PathBuf>,
    /// Files whose existing content already matched.
    pub unchanged: Vec<PathBuf>,
}

impl FlushReport {
    /// Returns `true` if nothing was written.
    pub fn is_noop(&self) -> bool {
        self.written.is_empty()
    }

    /// Total number of target files considered.
    pub fn total(&self) -> usize {
        self.written.len() + self.unchanged.len()
    }
}

/// Renders a group as the final file text: banner lines, then group lines,
/// joined with `\n` and without a trailing newline.
pub fn render_group(banner: &[&str], group: &FragmentGroup) -> String {
    banner
        .iter()
        .copied()
        .chain(group.lines.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes every group of `fragments` that differs from what is on disk.
///
/// Parent directories are created as needed. The first I/O error aborts the
/// flush; files handled before it stay written.
pub fn flush(fragments: FragmentSet, banners: &BannerTable) -> Result<FlushReport, FileWriteError> {
    let mut report = FlushReport::default();
    for group in fragments.into_groups() {
        let content = render_group(banners.banner_for(&group.path), &group);
        if write_if_different(&group.path, &content)? {
            report.written.push(group.path);
        } else {
            report.unchanged.push(group.path);
        }
    }
    debug!(
        written = report.written.len(),
        unchanged = report.unchanged.len(),
        "flush complete"
    );
    Ok(report)
}

/// Writes `content` to `path` unless the existing file already matches.
///
/// Returns whether a write happened.
pub fn write_if_different(path: &Path, content: &str) -> Result<bool, FileWriteError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| FileWriteError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    if !needs_write(path, content)? {
        debug!(path = ?path, "generated file unchanged");
        return Ok(false);
    }

    std::fs::write(path, content).map_err(|e| FileWriteError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(path = ?path, bytes = content.len(), "wrote generated file");
    Ok(true)
}
