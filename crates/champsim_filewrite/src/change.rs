//! Change detection between prospective and existing file contents.
//!
//! Both sides are split into lines and each line is trimmed, so whitespace at
//! line ends does not force a rewrite. Any other difference, including a
//! changed number of lines, counts as a change.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::FileWriteError;

/// Splits text into lines with surrounding whitespace removed.
pub fn normalized_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).collect()
}

/// Returns `true` if the two texts differ after per-line trimming.
pub fn contents_differ(old: &str, new: &str) -> bool {
    normalized_lines(old) != normalized_lines(new)
}

/// Decides whether `path` must be (re)written to hold `new_content`.
///
/// A missing file always needs writing. An existing file is read and compared
/// with [`contents_differ`]; bytes that are not valid UTF-8 are replaced, which
/// makes the comparison fail and the file be rewritten.
pub fn needs_write(path: &Path, new_content: &str) -> Result<bool, FileWriteError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(contents_differ(&String::from_utf8_lossy(&bytes), new_content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(true),
        Err(e) => Err(FileWriteError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
