//! A text file converged by an ordered list of in-memory patches.
use anyhow::Result;
use std::fmt;
use std::path::{Path, PathBuf};

use super::error::ResourceError;
use super::helpers::fs::{TextContent, read_text, write_text};
use super::{Resource, ResourceChange, ResourceState};

/// A pure transformation of a whole text buffer.
///
/// Patches must be idempotent: applying one to its own output returns the
/// same text.
pub trait TextPatch: Send + Sync + fmt::Debug {
    /// Short label used in logs (e.g. `"variables"`).
    fn description(&self) -> String;

    /// Return the patched buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if a matcher for the patch cannot be built.
    fn patch(&self, text: &str) -> Result<String>;
}

/// A file on disk plus the patches that converge it.
///
/// The whole file is read, every patch is applied in order against the
/// progressively mutated buffer, and the result is written back once.
#[derive(Debug)]
pub struct PatchedFileResource {
    /// Absolute path of the file.
    pub path: PathBuf,
    label: String,
    patches: Vec<Box<dyn TextPatch>>,
    required: bool,
}

impl PatchedFileResource {
    /// Create an optional file resource with no patches.
    #[must_use]
    pub fn new(path: PathBuf, label: impl Into<String>) -> Self {
        Self {
            path,
            label: label.into(),
            patches: Vec::new(),
            required: false,
        }
    }

    /// Mark the file as required: a missing file is an error, not a skip.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Append a patch.
    #[must_use]
    pub fn with_patch(mut self, patch: impl TextPatch + 'static) -> Self {
        self.patches.push(Box::new(patch));
        self
    }

    /// Number of patches attached to this file.
    #[must_use]
    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }

    /// Run every patch over `text` in order.
    ///
    /// # Errors
    ///
    /// Returns the first patch error.
    pub fn render(&self, text: &str) -> Result<String> {
        self.patches.iter().try_fold(text.to_string(), |acc, p| {
            p.patch(&acc)
                .map_err(|e| e.context(format!("{} patch failed", p.description())))
        })
    }

    fn missing(&self) -> Result<ResourceState> {
        if self.required {
            return Err(ResourceError::NotFound {
                resource: self.path.display().to_string(),
            }
            .into());
        }
        Ok(ResourceState::Missing)
    }
}

fn line_summary(current: &str, desired: &str) -> String {
    let differing = current
        .lines()
        .zip(desired.lines())
        .filter(|(a, b)| a != b)
        .count()
        + current.lines().count().abs_diff(desired.lines().count());
    format!("{differing} line(s) differ")
}

fn display_name(path: &Path, label: &str) -> String {
    if label.is_empty() {
        path.display().to_string()
    } else {
        format!("{} ({label})", path.display())
    }
}

impl Resource for PatchedFileResource {
    fn description(&self) -> String {
        display_name(&self.path, &self.label)
    }

    fn current_state(&self) -> Result<ResourceState> {
        match read_text(&self.path)? {
            TextContent::Missing => self.missing(),
            TextContent::Binary => Ok(ResourceState::Invalid {
                reason: "not valid UTF-8".to_string(),
            }),
            TextContent::Text(current) => {
                let desired = self.render(&current)?;
                if desired == current {
                    Ok(ResourceState::Correct)
                } else {
                    Ok(ResourceState::Incorrect {
                        current: line_summary(&current, &desired),
                    })
                }
            }
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        let current = match read_text(&self.path)? {
            TextContent::Text(text) => text,
            TextContent::Missing => {
                return Ok(ResourceChange::Skipped {
                    reason: "file not found".to_string(),
                });
            }
            TextContent::Binary => {
                return Ok(ResourceChange::Skipped {
                    reason: "not valid UTF-8".to_string(),
                });
            }
        };
        let desired = self.render(&current)?;
        if desired == current {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        write_text(&self.path, &desired)?;
        Ok(ResourceChange::Applied)
    }
}
