//! Accreting merges into `target_*(<target> ...)` argument blocks.
use anyhow::Result;
use indexmap::IndexMap;
use regex::Regex;

use super::sections::EXTRA_HEADER;
use crate::resources::text_file::TextPatch;

/// Function produced only by the source glob scaffold.
pub const SOURCES_FUNCTION: &str = "target_sources";

/// Functions whose appended blocks use the `PUBLIC` scope.
const PUBLIC_FUNCTIONS: &[&str] = &["target_compile_options"];

const ITEM_INDENT: &str = "    ";

/// What [`merge_function`] did to the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Every item was already present.
    Unchanged,
    /// The existing block gained the listed items.
    Extended { added: Vec<String> },
    /// No block existed; a new one was appended.
    Appended,
}

/// Scope keyword for a newly appended block.
#[must_use]
pub fn scope_for(function: &str) -> &'static str {
    if PUBLIC_FUNCTIONS.contains(&function) {
        "PUBLIC"
    } else {
        "PRIVATE"
    }
}

fn block_matcher(function: &str, target: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?s)(\b{}\({}\s.*?)(\n[ \t]*\))",
        regex::escape(function),
        regex::escape(target)
    ))
}

fn render_block(function: &str, target: &str, items: &[String]) -> String {
    let body = items.join(&format!("\n{ITEM_INDENT}"));
    format!(
        "{function}({target} {}\n{ITEM_INDENT}{body}\n)",
        scope_for(function)
    )
}

/// Place a new block at the end of the user-owned part of the file.
///
/// The managed extra section is rebuilt from scratch on every run, so a block
/// appended after it would be discarded; the block goes before it instead.
fn append_block(text: &str, block: &str) -> String {
    match text.find(EXTRA_HEADER) {
        Some(at) => {
            let (head, tail) = text.split_at(at);
            format!("{}\n\n{block}\n\n{tail}", head.trim_end())
        }
        None => format!("{}\n\n{block}\n", text.trim_end()),
    }
}

/// Merge `items` into the `function(<target> ...)` block of `text`.
///
/// Items already present as a raw substring of the block are left alone;
/// the rest are inserted in order before the closing line. Existing content
/// is never reordered or removed. A missing block is appended whole.
///
/// # Errors
///
/// Returns an error if the block matcher cannot be compiled.
pub fn merge_function(
    text: &str,
    function: &str,
    target: &str,
    items: &[String],
) -> crate::error::Result<(String, MergeOutcome)> {
    let matcher = block_matcher(function, target)?;

    let Some(caps) = matcher.captures(text) else {
        let block = render_block(function, target, items);
        return Ok((append_block(text, &block), MergeOutcome::Appended));
    };
    let (Some(whole), Some(body), Some(close)) = (caps.get(0), caps.get(1), caps.get(2)) else {
        return Ok((text.to_string(), MergeOutcome::Unchanged));
    };

    let mut added: Vec<String> = Vec::new();
    for item in items {
        if !whole.as_str().contains(item.as_str()) && !added.contains(item) {
            added.push(item.clone());
        }
    }
    if added.is_empty() {
        return Ok((text.to_string(), MergeOutcome::Unchanged));
    }

    let insertion = added.join(&format!("\n{ITEM_INDENT}"));
    let merged = format!(
        "{}{}\n{ITEM_INDENT}{insertion}{}{}",
        text.get(..whole.start()).unwrap_or_default(),
        body.as_str(),
        close.as_str(),
        text.get(whole.end()..).unwrap_or_default(),
    );
    Ok((merged, MergeOutcome::Extended { added }))
}

/// Merge every configured function in declaration order.
///
/// `target_sources` and empty item lists are skipped.
///
/// # Errors
///
/// Returns an error if a block matcher cannot be compiled.
pub fn merge_functions(
    text: &str,
    target: &str,
    functions: &IndexMap<String, Vec<String>>,
) -> crate::error::Result<(String, Vec<(String, MergeOutcome)>)> {
    let mut out = text.to_string();
    let mut outcomes = Vec::new();
    for (function, items) in functions {
        if function == SOURCES_FUNCTION || items.is_empty() {
            continue;
        }
        let (next, outcome) = merge_function(&out, function, target, items)?;
        out = next;
        outcomes.push((function.clone(), outcome));
    }
    Ok((out, outcomes))
}

/// [`TextPatch`] applying [`merge_functions`].
#[derive(Debug, Clone)]
pub struct FunctionsPatch {
    pub target: String,
    pub functions: IndexMap<String, Vec<String>>,
}

impl TextPatch for FunctionsPatch {
    fn description(&self) -> String {
        "functions".to_string()
    }

    fn patch(&self, text: &str) -> Result<String> {
        Ok(merge_functions(text, &self.target, &self.functions)?.0)
    }
}
