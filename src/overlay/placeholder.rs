//! Placeholder directory resolution: rename when the real directory is
//! absent, merge into it when present.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::Manifest;
use crate::config::PLACEHOLDER_DIR;
use crate::resources::helpers::fs::ensure_parent_dir;

/// How one placeholder directory becomes the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirResolution {
    /// Destination absent: move the directory.
    Rename { from: PathBuf, to: PathBuf },
    /// Destination present: copy files over it, then delete the placeholder.
    Merge { from: PathBuf, into: PathBuf },
}

impl DirResolution {
    /// Decide how to resolve `dir` to a sibling named `project_name`.
    #[must_use]
    pub fn plan(dir: &Path, project_name: &str) -> Self {
        let target = dir.with_file_name(project_name);
        if target.exists() {
            Self::Merge {
                from: dir.to_path_buf(),
                into: target,
            }
        } else {
            Self::Rename {
                from: dir.to_path_buf(),
                to: target,
            }
        }
    }

    /// Perform the transition and carry manifest membership along.
    ///
    /// # Errors
    ///
    /// Returns an error if a rename, copy or removal fails.
    pub fn apply(&self, manifest: &mut Manifest) -> Result<()> {
        match self {
            Self::Rename { from, to } => {
                std::fs::rename(from, to)
                    .with_context(|| format!("renaming {} to {}", from.display(), to.display()))?;
                manifest.reassign(from, to);
            }
            Self::Merge { from, into } => {
                merge_into(from, into, manifest)?;
                std::fs::remove_dir_all(from)
                    .with_context(|| format!("removing {}", from.display()))?;
            }
        }
        Ok(())
    }
}

fn merge_into(from: &Path, into: &Path, manifest: &mut Manifest) -> Result<()> {
    for entry in walkdir::WalkDir::new(from).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", from.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let src = entry.path();
        let rel = src
            .strip_prefix(from)
            .with_context(|| format!("relativizing {}", src.display()))?;
        let dest = into.join(rel);
        ensure_parent_dir(&dest)?;
        std::fs::copy(src, &dest)
            .with_context(|| format!("merging {} into {}", src.display(), dest.display()))?;
        if manifest.remove(src) {
            manifest.insert(dest);
        }
    }
    Ok(())
}

/// Resolve every placeholder directory holding manifest files under `root`.
///
/// Directories are handled deepest first. Nothing happens when the project
/// name is itself the placeholder name.
///
/// # Errors
///
/// Returns an error if any resolution fails.
pub fn resolve_placeholder_dirs(
    root: &Path,
    project_name: &str,
    manifest: &mut Manifest,
) -> Result<Vec<DirResolution>> {
    if project_name == PLACEHOLDER_DIR {
        return Ok(Vec::new());
    }
    let mut done = Vec::new();
    for dir in manifest.dirs_named(root, PLACEHOLDER_DIR) {
        if !dir.is_dir() {
            continue;
        }
        let resolution = DirResolution::plan(&dir, project_name);
        resolution.apply(manifest)?;
        done.push(resolution);
    }
    Ok(done)
}
