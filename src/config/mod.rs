//! The configuration document driving every patch pass.
//!
//! The base document ships embedded in the binary (`conf/default.toml`). A
//! project may replace it wholesale with a `cubepp.toml` at its root.
pub mod profiles;
pub mod toml_loader;

use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Token replaced with the destination directory name.
pub const PROJECT_NAME_TOKEN: &str = "{{PROJECTNAME}}";

/// Token replaced with the detected chip identifier.
pub const CHIP_TOKEN: &str = "{{STM32TYPE}}";

/// Directory name resolved to the project name after the overlay copy.
pub const PLACEHOLDER_DIR: &str = "projectname";

/// Chip identifier used when none can be detected.
pub const DEFAULT_CHIP: &str = "STM32F405xx";

/// Presets document, relative to the project root.
pub const PRESETS_FILE: &str = "CMakePresets.json";

/// Primary build description, relative to the project root.
pub const CMAKE_LISTS_FILE: &str = "CMakeLists.txt";

/// Generated chip configuration, relative to the project root.
pub const CUBEMX_CMAKE_FILE: &str = "cmake/stm32cubemx/CMakeLists.txt";

/// Optional per-project override of the embedded document.
pub const OVERRIDE_FILE: &str = "cubepp.toml";

const DEFAULT_DOCUMENT: &str = include_str!("../../conf/default.toml");

fn default_target() -> String {
    "${CMAKE_PROJECT_NAME}".to_string()
}

/// Fully resolved configuration for one patch pass.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    /// Call target used in generated and matched `target_*` blocks.
    #[serde(default = "default_target")]
    pub target: String,
    /// `binaryDir` for the `default` configure preset.
    #[serde(default)]
    pub binary_dir: Option<String>,
    #[serde(default)]
    pub variables: IndexMap<String, String>,
    #[serde(default)]
    pub functions: IndexMap<String, Vec<String>>,
    /// Body of the managed extra section.
    #[serde(default)]
    pub extra: String,
    #[serde(default)]
    pub source_patterns: Vec<String>,
    #[serde(default)]
    pub resource_paths: Vec<String>,
    #[serde(default)]
    pub injections: Vec<Injection>,
    #[serde(default)]
    pub profiles: IndexMap<String, PartialDocument>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            target: default_target(),
            binary_dir: None,
            variables: IndexMap::new(),
            functions: IndexMap::new(),
            extra: String::new(),
            source_patterns: Vec::new(),
            resource_paths: Vec::new(),
            injections: Vec::new(),
            profiles: IndexMap::new(),
        }
    }
}

/// A profile overlay: every field of [`Document`] made optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialDocument {
    pub target: Option<String>,
    pub binary_dir: Option<String>,
    pub variables: Option<IndexMap<String, String>>,
    pub functions: Option<IndexMap<String, Vec<String>>>,
    pub extra: Option<String>,
    pub source_patterns: Option<Vec<String>>,
    pub resource_paths: Option<Vec<String>>,
    pub injections: Option<Vec<Injection>>,
}

/// A marker-anchored insertion into a project source file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Injection {
    /// File relative to the project root.
    pub file: PathBuf,
    pub marker: String,
    /// Inserted text; may reference the project name token.
    pub content: String,
    /// Literal whose presence means the injection was already applied.
    #[serde(default)]
    pub check: Option<String>,
}

impl Injection {
    /// Content with the project name token resolved.
    #[must_use]
    pub fn render(&self, project_name: &str) -> String {
        self.content.replace(PROJECT_NAME_TOKEN, project_name)
    }

    /// Existence check with the project name token resolved.
    ///
    /// Without an explicit check the trimmed rendered content guards itself,
    /// so re-running never duplicates the insertion.
    #[must_use]
    pub fn guard(&self, project_name: &str) -> String {
        self.check.as_ref().map_or_else(
            || self.render(project_name).trim().to_string(),
            |check| check.replace(PROJECT_NAME_TOKEN, project_name),
        )
    }
}

/// Parse the embedded default document.
///
/// # Errors
///
/// Returns an error if the embedded document is malformed.
pub fn embedded() -> Result<Document, ConfigError> {
    toml_loader::parse_str(DEFAULT_DOCUMENT, "<embedded>")
}

/// Load the document for a project root.
///
/// Uses `<root>/cubepp.toml` when it exists, otherwise the embedded default.
///
/// # Errors
///
/// Returns an error if the chosen document cannot be read or parsed.
pub fn load(root: &Path) -> Result<Document, ConfigError> {
    let override_path = root.join(OVERRIDE_FILE);
    if override_path.is_file() {
        toml_loader::load_config(&override_path)
    } else {
        embedded()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn embedded_document_parses() {
        let doc = embedded().expect("embedded document should parse");
        assert_eq!(doc.target, "${CMAKE_PROJECT_NAME}");
        assert_eq!(
            doc.binary_dir.as_deref(),
            Some("${sourceDir}/.build/${presetName}")
        );
        assert_eq!(doc.variables["CMAKE_CXX_STANDARD"], "20");
        assert!(doc.functions.contains_key("target_link_options"));
        assert!(doc.extra.contains("STM32_SOURCES"));
        assert_eq!(doc.injections.len(), 3);
    }

    #[test]
    fn embedded_variables_keep_declaration_order() {
        let doc = embedded().unwrap();
        let names: Vec<&str> = doc.variables.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            [
                "CMAKE_CXX_STANDARD",
                "CMAKE_CXX_STANDARD_REQUIRED",
                "CMAKE_CXX_EXTENSIONS"
            ]
        );
    }

    #[test]
    fn embedded_profiles_are_declared() {
        let doc = embedded().unwrap();
        let names: Vec<&str> = doc.profiles.keys().map(String::as_str).collect();
        assert_eq!(names, ["armmath", "dsp"]);
    }

    #[test]
    fn load_falls_back_to_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let doc = load(dir.path()).unwrap();
        assert_eq!(doc, embedded().unwrap());
    }

    #[test]
    fn load_prefers_project_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(OVERRIDE_FILE),
            "target = \"blinky\"\n[variables]\nSTD = \"20\"\n",
        )
        .unwrap();
        let doc = load(dir.path()).unwrap();
        assert_eq!(doc.target, "blinky");
        assert_eq!(doc.variables["STD"], "20");
        assert!(doc.functions.is_empty());
        assert!(doc.profiles.is_empty());
    }

    #[test]
    fn load_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(OVERRIDE_FILE), "bogus = 1\n").unwrap();
        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSyntax { .. }));
    }

    #[test]
    fn injection_renders_project_name() {
        let inj = Injection {
            file: PathBuf::from("Core/Src/main.c"),
            marker: "/* USER CODE BEGIN Includes */".to_string(),
            content: "#include \"{{PROJECTNAME}}/main_exec.h\"".to_string(),
            check: None,
        };
        assert_eq!(inj.render("blinky"), "#include \"blinky/main_exec.h\"");
        assert_eq!(inj.guard("blinky"), "#include \"blinky/main_exec.h\"");
    }

    #[test]
    fn injection_guard_prefers_explicit_check() {
        let inj = Injection {
            file: PathBuf::from("main.c"),
            marker: "M".to_string(),
            content: "  Setup();".to_string(),
            check: Some("Setup();".to_string()),
        };
        assert_eq!(inj.guard("blinky"), "Setup();");
    }

    #[test]
    fn injection_content_without_token_is_verbatim() {
        let inj = Injection {
            file: PathBuf::from("main.c"),
            marker: "M".to_string(),
            content: "  Loop();".to_string(),
            check: None,
        };
        assert_eq!(inj.render("blinky"), "  Loop();");
        assert_eq!(inj.guard("blinky"), "Loop();");
    }
}
