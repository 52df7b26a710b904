//! Fragment accumulation and grouping by target path.
//!
//! Generators contribute `(path, lines)` fragments. A [`FragmentSet`] is an
//! explicit value the caller threads through generation calls; at flush time it
//! is consumed and grouped so that every target path is written exactly once.

use std::path::{Path, PathBuf};

/// A run of lines destined for one target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// The file the lines belong to.
    pub path: PathBuf,
    /// Lines without terminators, in output order.
    pub lines: Vec<String>,
}

/// All fragments sharing one target path, concatenated in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentGroup {
    /// The target file.
    pub path: PathBuf,
    /// Lines from every fragment for this path.
    pub lines: Vec<String>,
}

/// An ordered collection of submitted fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentSet {
    fragments: Vec<Fragment>,
}

impl FragmentSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one fragment. Neither the path nor the lines are validated.
    pub fn submit<I, S>(&mut self, path: impl Into<PathBuf>, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fragments.push(Fragment {
            path: path.into(),
            lines: lines.into_iter().map(Into::into).collect(),
        });
    }

    /// Appends every fragment of `other`, keeping its order.
    pub fn extend(&mut self, other: FragmentSet) {
        self.fragments.extend(other.fragments);
    }

    /// Number of fragments submitted so far.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Returns `true` if nothing has been submitted.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Iterates over the fragments in submission order.
    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter()
    }

    /// Returns the distinct target paths in sorted order.
    pub fn paths(&self) -> Vec<&Path> {
        let mut paths: Vec<&Path> = self.fragments.iter().map(|f| f.path.as_path()).collect();
        paths.sort();
        paths.dedup();
        paths
    }

    /// Consumes the set and merges fragments that share a path.
    ///
    /// Groups are returned sorted by path. The sort is stable, so lines from
    /// fragments with the same path keep their submission order.
    pub fn into_groups(self) -> Vec<FragmentGroup> {
        let mut fragments = self.fragments;
        fragments.sort_by(|a, b| a.path.cmp(&b.path));

        let mut groups: Vec<FragmentGroup> = Vec::new();
        for fragment in fragments {
            match groups.last_mut() {
                Some(group) if group.path == fragment.path => {
                    group.lines.extend(fragment.lines);
                }
                _ => groups.push(FragmentGroup {
                    path: fragment.path,
                    lines: fragment.lines,
                }),
            }
        }
        groups
    }
}

impl FromIterator<Fragment> for FragmentSet {
    fn from_iter<T: IntoIterator<Item = Fragment>>(iter: T) -> Self {
        Self {
            fragments: iter.into_iter().collect(),
        }
    }
}
