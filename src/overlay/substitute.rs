//! Placeholder token substitution in files created by the overlay copy.
use anyhow::Result;
use std::path::{Path, PathBuf};

use super::Manifest;
use crate::resources::helpers::fs::{TextContent, read_text, write_text};

/// What happened to one manifest file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Substitution {
    /// At least one token was replaced and the file rewritten.
    Replaced,
    /// No token occurs in the file.
    Unchanged,
    /// Not a regular text file (binary, undecodable or gone).
    Skipped,
}

/// Replace every `(token, value)` pair in `text`, in order.
#[must_use]
pub fn replace_tokens(text: &str, replacements: &[(&str, &str)]) -> String {
    replacements
        .iter()
        .fold(text.to_string(), |acc, (token, value)| acc.replace(token, value))
}

/// Substitute tokens in one file.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read for a reason other
/// than undecodable content, or if the write fails.
pub fn substitute_file(path: &Path, replacements: &[(&str, &str)]) -> Result<Substitution> {
    if !path.is_file() {
        return Ok(Substitution::Skipped);
    }
    let text = match read_text(path)? {
        TextContent::Text(text) => text,
        TextContent::Missing | TextContent::Binary => return Ok(Substitution::Skipped),
    };
    let replaced = replace_tokens(&text, replacements);
    if replaced == text {
        return Ok(Substitution::Unchanged);
    }
    write_text(path, &replaced)?;
    Ok(Substitution::Replaced)
}

/// Substitute tokens in every manifest file, in path order.
///
/// # Errors
///
/// Returns the first file error.
pub fn substitute_manifest(
    manifest: &Manifest,
    replacements: &[(&str, &str)],
) -> Result<Vec<(PathBuf, Substitution)>> {
    manifest
        .iter()
        .map(|path| Ok((path.clone(), substitute_file(path, replacements)?)))
        .collect()
}
