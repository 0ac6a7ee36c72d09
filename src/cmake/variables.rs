//! `set(NAME VALUE)` upserts.
use anyhow::Result;
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

use super::mutator::{Statement, Upsert, upsert_statement};
use crate::resources::text_file::TextPatch;

/// Header comment that introduces the generated block of `set()` lines.
pub const SETTINGS_HEADER: &str = "# Setup compiler settings";

#[allow(clippy::expect_used)]
static SETTINGS_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)# Setup compiler settings.*?((?:set\([^)]+\)\n)+)")
        .expect("settings anchor pattern is valid")
});

/// A single-line `set(NAME VALUE)` statement.
#[derive(Debug, Clone)]
pub struct SetStatement {
    name: String,
    value: String,
    matcher: Regex,
}

impl SetStatement {
    /// Build the statement and its matcher.
    ///
    /// # Errors
    ///
    /// Returns an error if the matcher cannot be compiled.
    pub fn new(name: &str, value: &str) -> Result<Self, regex::Error> {
        let matcher = Regex::new(&format!(
            r"\bset\({}[ \t]+[^)\n]+\)",
            regex::escape(name)
        ))?;
        Ok(Self {
            name: name.to_string(),
            value: value.to_string(),
            matcher,
        })
    }
}

impl Statement for SetStatement {
    fn matcher(&self) -> &Regex {
        &self.matcher
    }

    fn render(&self) -> String {
        format!("set({} {})", self.name, self.value)
    }

    fn anchor(&self) -> Option<&Regex> {
        Some(&SETTINGS_ANCHOR)
    }
}

/// Upsert every variable in declaration order.
///
/// # Errors
///
/// Returns an error if a variable name produces an invalid matcher.
pub fn upsert_variables(
    text: &str,
    variables: &IndexMap<String, String>,
) -> crate::error::Result<(String, Vec<(String, Upsert)>)> {
    let mut out = text.to_string();
    let mut outcomes = Vec::with_capacity(variables.len());
    for (name, value) in variables {
        let statement = SetStatement::new(name, value)?;
        let (next, how) = upsert_statement(&out, &statement);
        out = next;
        outcomes.push((name.clone(), how));
    }
    Ok((out, outcomes))
}

/// [`TextPatch`] applying [`upsert_variables`].
#[derive(Debug, Clone)]
pub struct VariablesPatch {
    pub variables: IndexMap<String, String>,
}

impl TextPatch for VariablesPatch {
    fn description(&self) -> String {
        "variables".to_string()
    }

    fn patch(&self, text: &str) -> Result<String> {
        Ok(upsert_variables(text, &self.variables)?.0)
    }
}
