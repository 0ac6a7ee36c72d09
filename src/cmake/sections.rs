//! Whole-block replacements keyed by a header comment.
use anyhow::Result;
use regex::{NoExpand, Regex};

use crate::resources::text_file::TextPatch;

/// Header of the application source scaffold.
pub const SOURCES_HEADER: &str = "# Add sources to executable";

/// Header of the managed extra section.
pub const EXTRA_HEADER: &str = "# Extra CMake configurations";

fn scaffold_matcher(target: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        concat!(
            r"# Add sources to executable\n",
            r"(?:file\(GLOB_RECURSE SOURCES\n[^)]*\)\n)?",
            r"target_sources\({}\s+PRIVATE\s*\n",
            r"\s*# Add user sources here\s*\n",
            r"(?:[ \t]*\$\{{SOURCES\}}\s*\n)?",
            r"\)"
        ),
        regex::escape(target)
    ))
}

/// Render the glob + `target_sources` scaffold.
#[must_use]
pub fn render_source_glob(target: &str, patterns: &[String]) -> String {
    format!(
        "{SOURCES_HEADER}\nfile(GLOB_RECURSE SOURCES\n  {}\n)\ntarget_sources({target} PRIVATE\n    # Add user sources here\n    ${{SOURCES}}\n)",
        patterns.join("\n  ")
    )
}

/// Regenerate the source scaffold with the current glob patterns.
///
/// Matches both the pristine generated scaffold and one produced by an
/// earlier run. When neither is present nothing is inserted; creating the
/// scaffold is left to the project generator.
///
/// # Errors
///
/// Returns an error if the scaffold matcher cannot be compiled.
pub fn replace_source_glob(
    text: &str,
    target: &str,
    patterns: &[String],
) -> crate::error::Result<(String, bool)> {
    if patterns.is_empty() {
        return Ok((text.to_string(), false));
    }
    let matcher = scaffold_matcher(target)?;
    if !matcher.is_match(text) {
        return Ok((text.to_string(), false));
    }
    let rendered = render_source_glob(target, patterns);
    let out = matcher.replace_all(text, NoExpand(&rendered)).into_owned();
    Ok((out, true))
}

/// Delete any existing extra section and append a fresh one.
///
/// A section runs from its header to the next line starting with `#` or the
/// end of the file, and everything in it is discarded. When the section
/// starts with the configured body, `#` lines inside that body do not end
/// it. An empty `extra` leaves the text untouched.
#[must_use]
pub fn replace_extra_section(text: &str, extra: &str) -> String {
    let body = extra.trim();
    if body.is_empty() {
        return text.to_string();
    }

    let mut out = text.to_string();
    while let Some(start) = out.find(EXTRA_HEADER) {
        let body_start = start + EXTRA_HEADER.len();
        let rest = out.get(body_start..).unwrap_or_default();
        let scan_from = match rest.strip_prefix('\n') {
            Some(tail) if tail.starts_with(body) => 1 + body.len(),
            _ => 0,
        };
        let end = rest
            .get(scan_from..)
            .and_then(|after| after.find("\n#"))
            .map_or(out.len(), |i| body_start + scan_from + i);
        out.replace_range(start..end, "");
    }

    format!("{}\n\n{EXTRA_HEADER}\n{body}\n", out.trim_end())
}

/// [`TextPatch`] applying [`replace_source_glob`].
#[derive(Debug, Clone)]
pub struct SourceGlobPatch {
    pub target: String,
    pub patterns: Vec<String>,
}

impl TextPatch for SourceGlobPatch {
    fn description(&self) -> String {
        "source glob".to_string()
    }

    fn patch(&self, text: &str) -> Result<String> {
        Ok(replace_source_glob(text, &self.target, &self.patterns)?.0)
    }
}

/// [`TextPatch`] applying [`replace_extra_section`].
#[derive(Debug, Clone)]
pub struct ExtraSectionPatch {
    pub extra: String,
}

impl TextPatch for ExtraSectionPatch {
    fn description(&self) -> String {
        "extra section".to_string()
    }

    fn patch(&self, text: &str) -> Result<String> {
        Ok(replace_extra_section(text, &self.extra))
    }
}
