//! Marker-anchored source injection with an existence guard.
use anyhow::Result;

use crate::config::Injection;
use crate::resources::text_file::TextPatch;

/// What [`inject`] did to the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectOutcome {
    /// The content was placed on the line after the marker.
    Inserted,
    /// The guard string is already in the text.
    AlreadyPresent,
    /// No line contains the marker; the text is returned unchanged.
    MarkerNotFound,
}

/// Insert `content` on its own line right after the first line containing
/// `marker`.
///
/// Nothing changes when the marker is absent or when `check` already occurs
/// anywhere in the text. The marker line itself is preserved.
#[must_use]
pub fn inject(text: &str, marker: &str, content: &str, check: Option<&str>) -> (String, InjectOutcome) {
    let Some(at) = text.find(marker) else {
        return (text.to_string(), InjectOutcome::MarkerNotFound);
    };
    if check.is_some_and(|c| text.contains(c)) {
        return (text.to_string(), InjectOutcome::AlreadyPresent);
    }

    let after_marker = at + marker.len();
    let line_end = text
        .get(after_marker..)
        .and_then(|rest| rest.find('\n'))
        .map(|i| after_marker + i + 1);

    let out = match line_end {
        Some(end) => {
            let (head, tail) = text.split_at(end);
            format!("{head}{content}\n{tail}")
        }
        None => format!("{text}\n{content}\n"),
    };
    (out, InjectOutcome::Inserted)
}

/// Apply `injections` in order against one buffer.
///
/// Returns the final text and each injection's outcome, in the same order.
#[must_use]
pub fn inject_all(
    text: &str,
    injections: &[Injection],
    project_name: &str,
) -> (String, Vec<InjectOutcome>) {
    let mut out = text.to_string();
    let mut outcomes = Vec::with_capacity(injections.len());
    for injection in injections {
        let guard = injection.guard(project_name);
        let (next, outcome) = inject(
            &out,
            &injection.marker,
            &injection.render(project_name),
            Some(&guard),
        );
        out = next;
        outcomes.push(outcome);
    }
    (out, outcomes)
}

/// [`TextPatch`] applying every injection aimed at one file.
#[derive(Debug, Clone)]
pub struct InjectionPatch {
    pub injections: Vec<Injection>,
    pub project_name: String,
}

impl TextPatch for InjectionPatch {
    fn description(&self) -> String {
        format!("{} injection(s)", self.injections.len())
    }

    fn patch(&self, text: &str) -> Result<String> {
        Ok(inject_all(text, &self.injections, &self.project_name).0)
    }
}
