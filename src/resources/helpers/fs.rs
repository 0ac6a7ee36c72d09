//! File-system resource helpers.
use anyhow::{Context as _, Result};
use std::io::ErrorKind;
use std::path::Path;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// This is a shared helper for resource `apply()` methods that need to
/// create parent directories before writing a file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// What was found when reading a file as UTF-8 text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextContent {
    /// No file at the path.
    Missing,
    /// The full decoded content.
    Text(String),
    /// The file exists but is not valid UTF-8.
    Binary,
}

/// Read a whole file as text, distinguishing absent and undecodable files
/// from real I/O failures.
///
/// # Errors
///
/// Returns an error for any I/O failure other than a missing file or
/// invalid UTF-8 content.
pub fn read_text(path: &Path) -> Result<TextContent> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(TextContent::Text(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(TextContent::Missing),
        Err(e) if e.kind() == ErrorKind::InvalidData => Ok(TextContent::Binary),
        Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
    }
}

/// Write `content` to `path`, creating parent directories first.
///
/// # Errors
///
/// Returns an error if the parent cannot be created or the write fails.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))
}
