//! Chip identifier detection in the generated CubeMX CMake file.
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::config::{CUBEMX_CMAKE_FILE, DEFAULT_CHIP};

#[allow(clippy::expect_used)]
static CHIP_DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)target_compile_definitions\([^)]+\bINTERFACE\s+[^)]*?(STM32[A-Z0-9]+xx)")
        .expect("chip definition pattern is valid")
});

/// Result of looking for the chip identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipDetection {
    /// Detected identifier, or the default.
    pub chip: String,
    /// Why the default was used, when it was.
    pub warning: Option<String>,
}

/// First chip identifier inside an `INTERFACE` compile definition block.
#[must_use]
pub fn extract_chip(text: &str) -> Option<String> {
    CHIP_DEFINITION
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Detect the chip for the project at `root`, falling back to the default.
#[must_use]
pub fn detect_chip(root: &Path) -> ChipDetection {
    let path = root.join(CUBEMX_CMAKE_FILE);
    let fallback = |reason: String| ChipDetection {
        chip: DEFAULT_CHIP.to_string(),
        warning: Some(format!("{reason}; using default {DEFAULT_CHIP}")),
    };

    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return fallback(format!("{} not found", path.display()));
        }
        Err(e) => return fallback(format!("failed to read {}: {e}", path.display())),
    };

    extract_chip(&text).map_or_else(
        || fallback(format!("chip type not found in {}", path.display())),
        |chip| ChipDetection {
            chip,
            warning: None,
        },
    )
}
