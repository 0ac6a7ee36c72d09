//! The three-tier upsert primitive: update in place, else insert after an
//! anchor, else prepend.
use regex::{NoExpand, Regex};

/// A single-statement matcher paired with its canonical rendering.
pub trait Statement {
    /// Matches any existing form of the statement.
    fn matcher(&self) -> &Regex;

    /// The canonical text of the statement, without a trailing newline.
    fn render(&self) -> String;

    /// Region after which a new statement is inserted.
    ///
    /// The insertion point is the end of capture group 1, or the end of the
    /// whole match when the pattern has no groups.
    fn anchor(&self) -> Option<&Regex>;
}

/// Which tier of [`upsert_statement`] produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// Every existing occurrence was rewritten in place.
    Updated,
    /// A new statement was inserted after the anchor.
    Inserted,
    /// Neither statement nor anchor was found; the statement was prepended.
    Prepended,
}

/// Update, insert or prepend `statement` in `text`.
///
/// Existing occurrences are replaced literally, so rendered text containing
/// `$` is never interpreted as a capture reference.
#[must_use]
pub fn upsert_statement(text: &str, statement: &dyn Statement) -> (String, Upsert) {
    let rendered = statement.render();

    if statement.matcher().is_match(text) {
        let updated = statement
            .matcher()
            .replace_all(text, NoExpand(&rendered))
            .into_owned();
        return (updated, Upsert::Updated);
    }

    if let Some(at) = statement.anchor().and_then(|anchor| insertion_point(anchor, text)) {
        let (head, tail) = text.split_at(at);
        return (format!("{head}{rendered}\n{tail}"), Upsert::Inserted);
    }

    (format!("{rendered}\n\n{text}"), Upsert::Prepended)
}

fn insertion_point(anchor: &Regex, text: &str) -> Option<usize> {
    let caps = anchor.captures(text)?;
    caps.get(1).or_else(|| caps.get(0)).map(|m| m.end())
}
