//! Output-directory resolution: merging writer defaults with per-call overrides.

use crate::error::ConfigError;
use crate::options::WriterOptions;
use std::path::{Component, Path, PathBuf};

/// Subdirectory of the repository root holding the core simulator sources.
const CORE_SOURCES_SUBDIR: &str = "src";

/// Per-call replacements for the writer's default directories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirOverrides {
    /// Replaces the default binary directory.
    pub bindir: Option<PathBuf>,
    /// Replaces the default object directory.
    pub objdir: Option<PathBuf>,
    /// Replaces the default extra source directories.
    pub srcdirs: Option<Vec<PathBuf>>,
}

/// Directories in effect for one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDirs {
    /// Binary directory, as configured.
    pub bindir: PathBuf,
    /// Object directory, as configured (possibly relative).
    pub objdir: PathBuf,
    /// Absolute, normalized object directory.
    pub objdir_abs: PathBuf,
    /// Source directories: extra ones first, core sources last.
    pub srcdirs: Vec<PathBuf>,
    /// Repository root.
    pub repo_root: PathBuf,
}

impl ResolvedDirs {
    /// Path of the executable inside the binary directory, lexically normalized.
    pub fn executable_path(&self, executable: &str) -> PathBuf {
        normalize_lexically(&self.bindir.join(executable))
    }
}

/// Resolves the directories for one call.
///
/// Overrides win over writer defaults. A missing `bindir` or `objdir` is an
/// error, since every generation pass needs both.
pub fn resolve_dirs(
    options: &WriterOptions,
    overrides: &DirOverrides,
) -> Result<ResolvedDirs, ConfigError> {
    let bindir = overrides
        .bindir
        .clone()
        .or_else(|| options.bindir.clone())
        .ok_or_else(|| ConfigError::MissingField("bindir".to_string()))?;
    let objdir = overrides
        .objdir
        .clone()
        .or_else(|| options.objdir.clone())
        .ok_or_else(|| ConfigError::MissingField("objdir".to_string()))?;

    let objdir_abs = normalize_lexically(&std::path::absolute(&objdir)?);

    let mut srcdirs = overrides
        .srcdirs
        .clone()
        .unwrap_or_else(|| options.srcdirs.clone());
    srcdirs.push(options.repo_root.join(CORE_SOURCES_SUBDIR));

    Ok(ResolvedDirs {
        bindir,
        objdir,
        objdir_abs,
        srcdirs,
        repo_root: options.repo_root.clone(),
    })
}

/// Collapses `.` and `name/..` components without touching the filesystem.
///
/// Leading `..` components of a relative path are kept. An empty result
/// becomes `.`.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> WriterOptions {
        WriterOptions::new("/champsim")
            .with_bindir("bin")
            .with_objdir("/champsim/.csconfig")
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let dirs = resolve_dirs(&options(), &DirOverrides::default()).unwrap();
        assert_eq!(dirs.bindir, PathBuf::from("bin"));
        assert_eq!(dirs.objdir, PathBuf::from("/champsim/.csconfig"));
        assert_eq!(dirs.objdir_abs, PathBuf::from("/champsim/.csconfig"));
        assert_eq!(dirs.srcdirs, vec![PathBuf::from("/champsim/src")]);
    }

    #[test]
    fn overrides_win() {
        let overrides = DirOverrides {
            bindir: Some(PathBuf::from("out/bin")),
            objdir: Some(PathBuf::from("/tmp/obj")),
            srcdirs: Some(vec![PathBuf::from("extra")]),
        };
        let dirs = resolve_dirs(&options(), &overrides).unwrap();
        assert_eq!(dirs.bindir, PathBuf::from("out/bin"));
        assert_eq!(dirs.objdir_abs, PathBuf::from("/tmp/obj"));
        assert_eq!(
            dirs.srcdirs,
            vec![PathBuf::from("extra"), PathBuf::from("/champsim/src")]
        );
    }

    #[test]
    fn default_srcdirs_precede_core_sources() {
        let mut opts = options();
        opts.srcdirs = vec![PathBuf::from("team/modules")];
        let dirs = resolve_dirs(&opts, &DirOverrides::default()).unwrap();
        assert_eq!(
            dirs.srcdirs,
            vec![PathBuf::from("team/modules"), PathBuf::from("/champsim/src")]
        );
    }

    #[test]
    fn missing_objdir_errors() {
        let opts = WriterOptions::new("/champsim").with_bindir("bin");
        let err = resolve_dirs(&opts, &DirOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "objdir"));
    }

    #[test]
    fn missing_bindir_errors() {
        let opts = WriterOptions::new("/champsim").with_objdir("obj");
        let err = resolve_dirs(&opts, &DirOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "bindir"));
    }

    #[test]
    fn relative_objdir_becomes_absolute() {
        let opts = WriterOptions::new("/champsim")
            .with_bindir("bin")
            .with_objdir("./obj/../.csconfig");
        let dirs = resolve_dirs(&opts, &DirOverrides::default()).unwrap();
        assert!(dirs.objdir_abs.is_absolute());
        assert!(dirs.objdir_abs.ends_with(".csconfig"));
        assert_eq!(dirs.objdir, PathBuf::from("./obj/../.csconfig"));
    }

    #[test]
    fn executable_path_is_normalized() {
        let dirs = resolve_dirs(&options(), &DirOverrides::default()).unwrap();
        assert_eq!(
            dirs.executable_path("champsim"),
            PathBuf::from("bin/champsim")
        );
        assert_eq!(
            dirs.executable_path("../champsim"),
            PathBuf::from("champsim")
        );
    }

    #[test]
    fn normalize_cases() {
        for (input, expected) in [
            ("a/./b", "a/b"),
            ("a/b/../c", "a/c"),
            ("./a", "a"),
            ("../a", "../a"),
            ("a/..", "."),
            ("/../a", "/a"),
            ("", "."),
        ] {
            assert_eq!(
                normalize_lexically(Path::new(input)),
                PathBuf::from(expected),
                "normalizing {input:?}"
            );
        }
    }
}
