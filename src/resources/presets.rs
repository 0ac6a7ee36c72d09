//! The `binaryDir` of the `default` configure preset in `CMakePresets.json`.
use anyhow::{Context as _, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

use super::error::ResourceError;
use super::helpers::fs::{TextContent, read_text, write_text};
use super::{Resource, ResourceChange, ResourceState};

/// Name of the configure preset whose output directory is managed.
pub const DEFAULT_PRESET: &str = "default";

/// A presets document whose `default` configure preset should build into
/// `binary_dir`.
#[derive(Debug, Clone)]
pub struct PresetsResource {
    /// Absolute path of `CMakePresets.json`.
    pub path: PathBuf,
    /// Desired `binaryDir` template.
    pub binary_dir: String,
}

impl PresetsResource {
    /// Manage `binaryDir` in the presets file at `path`.
    #[must_use]
    pub const fn new(path: PathBuf, binary_dir: String) -> Self {
        Self { path, binary_dir }
    }

    fn load(&self) -> Result<Value> {
        let text = match read_text(&self.path)? {
            TextContent::Text(text) => text,
            TextContent::Missing => {
                return Err(ResourceError::NotFound {
                    resource: self.path.display().to_string(),
                }
                .into());
            }
            TextContent::Binary => {
                return Err(ResourceError::InvalidState {
                    resource: self.path.display().to_string(),
                    reason: "not valid UTF-8".to_string(),
                }
                .into());
            }
        };
        serde_json::from_str(&text).with_context(|| format!("parsing {}", self.path.display()))
    }

    fn default_presets(&self, doc: &Value) -> Result<Vec<String>> {
        Ok(self
            .configure_presets(doc)?
            .iter()
            .filter(|p| p.get("name").and_then(Value::as_str) == Some(DEFAULT_PRESET))
            .map(|p| {
                p.get("binaryDir")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            })
            .collect())
    }

    fn configure_presets<'a>(&self, doc: &'a Value) -> Result<&'a [Value]> {
        match doc.get("configurePresets") {
            None => Ok(&[][..]),
            Some(Value::Array(presets)) => Ok(presets),
            Some(_) => Err(ResourceError::InvalidState {
                resource: self.path.display().to_string(),
                reason: "configurePresets is not an array".to_string(),
            }
            .into()),
        }
    }
}

/// Serialize with four-space indentation, preserving key order.
///
/// Non-ASCII text is written as UTF-8 rather than `\u` escapes, and the
/// output ends with a newline.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn to_pretty_json(value: &Value) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser).context("serializing presets")?;
    let mut out = String::from_utf8(buf).context("presets are not UTF-8")?;
    out.push('\n');
    Ok(out)
}

impl Resource for PresetsResource {
    fn description(&self) -> String {
        format!(
            "{} binaryDir = {}",
            self.path.file_name().map_or_else(
                || self.path.display().to_string(),
                |n| n.to_string_lossy().into_owned()
            ),
            self.binary_dir
        )
    }

    fn current_state(&self) -> Result<ResourceState> {
        let doc = self.load()?;
        let current = self.default_presets(&doc)?;
        if current.is_empty() {
            return Ok(ResourceState::Invalid {
                reason: format!("no \"{DEFAULT_PRESET}\" configure preset"),
            });
        }
        match current.iter().find(|dir| **dir != self.binary_dir) {
            None => Ok(ResourceState::Correct),
            Some(dir) => Ok(ResourceState::Incorrect {
                current: if dir.is_empty() {
                    "unset".to_string()
                } else {
                    dir.clone()
                },
            }),
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        let mut doc = self.load()?;
        let mut changed = false;
        if let Some(Value::Array(presets)) = doc.get_mut("configurePresets") {
            for preset in presets.iter_mut() {
                if preset.get("name").and_then(Value::as_str) != Some(DEFAULT_PRESET) {
                    continue;
                }
                if let Value::Object(map) = preset
                    && map.get("binaryDir").and_then(Value::as_str) != Some(self.binary_dir.as_str())
                {
                    map.insert(
                        "binaryDir".to_string(),
                        Value::String(self.binary_dir.clone()),
                    );
                    changed = true;
                }
            }
        }
        if !changed {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        write_text(&self.path, &to_pretty_json(&doc)?)?;
        Ok(ResourceChange::Applied)
    }
}
