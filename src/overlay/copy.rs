//! Non-destructive copy of a template tree into the project root.
use anyhow::{Context as _, Result};
use std::path::{Component, Path, PathBuf};

use super::Manifest;
use crate::config::PLACEHOLDER_DIR;
use crate::resources::helpers::fs::ensure_parent_dir;

/// Files handled by one [`copy_tree`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Destination files written (or that would be written in dry-run).
    pub copied: Vec<PathBuf>,
    /// Destination files left alone because they already existed.
    pub existing: Vec<PathBuf>,
}

/// `rel` with every placeholder directory component replaced by
/// `project_name`.
#[must_use]
pub fn resolved_relative(rel: &Path, project_name: &str) -> PathBuf {
    rel.components()
        .map(|c| match c {
            Component::Normal(name) if name == PLACEHOLDER_DIR => {
                Component::Normal(project_name.as_ref())
            }
            other => other,
        })
        .collect()
}

/// Copy every file under `src` to the same relative path under `dest_root`.
///
/// A file is skipped when its destination exists, or when the destination it
/// will have after placeholder resolution exists, so earlier output and user
/// edits are never overwritten. Written files are recorded in `manifest`.
/// With `dry_run` nothing is written or recorded.
///
/// # Errors
///
/// Returns an error if the tree cannot be walked or a file cannot be copied.
pub fn copy_tree(
    src: &Path,
    dest_root: &Path,
    project_name: &str,
    manifest: &mut Manifest,
    dry_run: bool,
) -> Result<CopyReport> {
    let mut report = CopyReport::default();

    for entry in walkdir::WalkDir::new(src)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("walking {}", src.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("relativizing {}", entry.path().display()))?;
        let dest = dest_root.join(rel);
        let resolved = dest_root.join(resolved_relative(rel, project_name));

        if dest.exists() || resolved.exists() {
            report.existing.push(dest);
            continue;
        }

        if !dry_run {
            ensure_parent_dir(&dest)?;
            std::fs::copy(entry.path(), &dest).with_context(|| {
                format!("copying {} to {}", entry.path().display(), dest.display())
            })?;
            manifest.insert(dest.clone());
        }
        report.copied.push(dest);
    }

    Ok(report)
}
