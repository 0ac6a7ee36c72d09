//! Resource overlay: copy a template tree into the project without touching
//! existing files, resolve placeholder-named directories, and substitute
//! placeholder tokens in the files this run created.
//!
//! Phases run in a fixed order because each consumes the [`Manifest`]
//! populated by the previous one:
//!
//! 1. [`copy::copy_tree`] records every file it writes.
//! 2. [`placeholder::resolve_placeholder_dirs`] renames or merges
//!    placeholder directories and rewrites manifest paths.
//! 3. [`substitute::substitute_manifest`] replaces tokens in manifest files.
pub mod copy;
pub mod placeholder;
pub mod substitute;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Files created by the overlay copy in the current run.
///
/// Only these paths are eligible for directory resolution and placeholder
/// substitution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    files: BTreeSet<PathBuf>,
}

impl Manifest {
    /// An empty manifest, as at the start of every run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a created file. Returns `false` if it was already recorded.
    pub fn insert(&mut self, path: PathBuf) -> bool {
        self.files.insert(path)
    }

    /// Forget a file. Returns `false` if it was not recorded.
    pub fn remove(&mut self, path: &Path) -> bool {
        self.files.remove(path)
    }

    /// Whether this run created `path`.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    /// Recorded paths in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter()
    }

    /// Number of recorded files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether this run created no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Move every recorded path under `from` to the same relative path under
    /// `to`. Returns how many paths moved.
    pub fn reassign(&mut self, from: &Path, to: &Path) -> usize {
        let moved: Vec<PathBuf> = self
            .files
            .iter()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        for old in &moved {
            self.files.remove(old);
            if let Ok(rel) = old.strip_prefix(from) {
                self.files.insert(to.join(rel));
            }
        }
        moved.len()
    }

    /// Ancestor directories of recorded files, strictly below `root`, whose
    /// name is `name`. Deepest first, so resolving one never invalidates a
    /// later entry.
    #[must_use]
    pub fn dirs_named(&self, root: &Path, name: &str) -> Vec<PathBuf> {
        let mut dirs: BTreeSet<PathBuf> = BTreeSet::new();
        for file in &self.files {
            for ancestor in file.ancestors().skip(1) {
                if ancestor == root || !ancestor.starts_with(root) {
                    break;
                }
                if ancestor.file_name().is_some_and(|n| n == name) {
                    dirs.insert(ancestor.to_path_buf());
                }
            }
        }
        let mut dirs: Vec<PathBuf> = dirs.into_iter().collect();
        dirs.sort_by(|a, b| {
            b.components()
                .count()
                .cmp(&a.components().count())
                .then_with(|| a.cmp(b))
        });
        dirs
    }
}

/// Locations tried for a configured resource path, in order.
///
/// Absolute paths are used as-is; relative ones are tried against the
/// engine's install directory first, then the working directory.
#[must_use]
pub fn candidates(raw: &str, install_dir: &Path, cwd: &Path) -> Vec<PathBuf> {
    let path = Path::new(raw);
    if path.is_absolute() {
        vec![path.to_path_buf()]
    } else {
        vec![install_dir.join(path), cwd.join(path)]
    }
}

/// First candidate that exists and is a directory.
#[must_use]
pub fn resolve_source_dir(raw: &str, install_dir: &Path, cwd: &Path) -> Option<PathBuf> {
    candidates(raw, install_dir, cwd)
        .into_iter()
        .find(|c| c.is_dir())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------
    // Manifest
    // ------------------------------------------------------------------

    #[test]
    fn reassign_moves_only_paths_under_prefix() {
        let mut m = Manifest::new();
        m.insert(PathBuf::from("/p/app/projectname/a.h"));
        m.insert(PathBuf::from("/p/app/projectname/sub/b.h"));
        m.insert(PathBuf::from("/p/app/other.c"));

        let moved = m.reassign(Path::new("/p/app/projectname"), Path::new("/p/app/blinky"));
        assert_eq!(moved, 2);
        assert!(m.contains(Path::new("/p/app/blinky/a.h")));
        assert!(m.contains(Path::new("/p/app/blinky/sub/b.h")));
        assert!(m.contains(Path::new("/p/app/other.c")));
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn reassign_does_not_match_name_prefix() {
        let mut m = Manifest::new();
        m.insert(PathBuf::from("/p/projectname2/a.h"));
        assert_eq!(m.reassign(Path::new("/p/projectname"), Path::new("/p/x")), 0);
    }

    #[test]
    fn dirs_named_deepest_first() {
        let mut m = Manifest::new();
        m.insert(PathBuf::from("/p/projectname/inc/projectname/a.h"));
        m.insert(PathBuf::from("/p/projectname/b.h"));
        m.insert(PathBuf::from("/p/src/c.c"));
        let dirs = m.dirs_named(Path::new("/p"), "projectname");
        assert_eq!(
            dirs,
            [
                PathBuf::from("/p/projectname/inc/projectname"),
                PathBuf::from("/p/projectname"),
            ]
        );
    }

    #[test]
    fn dirs_named_ignores_root_itself() {
        let mut m = Manifest::new();
        m.insert(PathBuf::from("/work/projectname/a.h"));
        let dirs = m.dirs_named(Path::new("/work/projectname"), "projectname");
        assert!(dirs.is_empty());
    }

    #[test]
    fn insert_and_remove() {
        let mut m = Manifest::new();
        assert!(m.is_empty());
        assert!(m.insert(PathBuf::from("/a")));
        assert!(!m.insert(PathBuf::from("/a")));
        assert!(m.remove(Path::new("/a")));
        assert!(m.is_empty());
    }

    // ------------------------------------------------------------------
    // candidates / resolve_source_dir
    // ------------------------------------------------------------------

    #[test]
    fn absolute_path_is_only_candidate() {
        let c = candidates("/opt/res", Path::new("/install"), Path::new("/cwd"));
        assert_eq!(c, [PathBuf::from("/opt/res")]);
    }

    #[test]
    fn relative_path_tries_install_then_cwd() {
        let c = candidates("resources", Path::new("/install"), Path::new("/cwd"));
        assert_eq!(
            c,
            [
                PathBuf::from("/install/resources"),
                PathBuf::from("/cwd/resources")
            ]
        );
    }

    #[test]
    fn resolve_prefers_install_dir() {
        let install = tempfile::tempdir().unwrap();
        let cwd = tempfile::tempdir().unwrap();
        std::fs::create_dir(install.path().join("resources")).unwrap();
        std::fs::create_dir(cwd.path().join("resources")).unwrap();
        assert_eq!(
            resolve_source_dir("resources", install.path(), cwd.path()),
            Some(install.path().join("resources"))
        );
    }

    #[test]
    fn resolve_falls_back_to_cwd_and_skips_files() {
        let install = tempfile::tempdir().unwrap();
        let cwd = tempfile::tempdir().unwrap();
        std::fs::write(install.path().join("resources"), "not a dir").unwrap();
        std::fs::create_dir(cwd.path().join("resources")).unwrap();
        assert_eq!(
            resolve_source_dir("resources", install.path(), cwd.path()),
            Some(cwd.path().join("resources"))
        );
    }

    #[test]
    fn resolve_none_when_absent() {
        let install = tempfile::tempdir().unwrap();
        let cwd = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_source_dir("resources", install.path(), cwd.path()),
            None
        );
    }
}
