//! Converging a list of resources and tallying what happened to each.
//!
//! - [`apply`]: one resource, from state check to write

mod apply;

use anyhow::Result;

use super::Context;
use crate::resources::Resource;

/// Outcome of a task that had work to do.
///
/// # Examples
///
/// ```
/// use cubepp_cli::tasks::{Tally, TaskResult};
///
/// let done = TaskResult::Done(Tally { written: 1, ..Tally::default() });
/// let skipped = TaskResult::Skipped("no resource directory found".into());
///
/// assert!(matches!(done, TaskResult::Done(t) if t.written == 1));
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// ```
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Files were checked and, where needed, written.
    Done(Tally),
    /// Dry run: the tally counts what would have been written.
    Preview(Tally),
    /// Nothing to operate on.
    Skipped(String),
}

/// Per-task file counts.
///
/// # Examples
///
/// ```
/// use cubepp_cli::tasks::Tally;
///
/// let tally = Tally { written: 1, unchanged: 2, skipped: 0 };
/// assert_eq!(tally.summary(false), "1 written, 2 unchanged");
/// assert_eq!(tally.summary(true), "1 would be written, 2 unchanged");
///
/// let tally = Tally { written: 0, unchanged: 0, skipped: 3 };
/// assert_eq!(tally.summary(false), "0 written, 0 unchanged, 3 skipped");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Files rewritten or created.
    pub written: u32,
    /// Files already holding their desired content.
    pub unchanged: u32,
    /// Files left alone because they were absent or not text.
    pub skipped: u32,
}

impl Tally {
    /// One-line summary for logs and the run summary.
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let written = if dry_run { "would be written" } else { "written" };
        let mut out = format!("{} {written}, {} unchanged", self.written, self.unchanged);
        if self.skipped > 0 {
            out.push_str(&format!(", {} skipped", self.skipped));
        }
        out
    }

    /// Wrap the tally in the result matching the run mode.
    #[must_use]
    pub const fn finish(self, ctx: &Context) -> TaskResult {
        if ctx.dry_run {
            TaskResult::Preview(self)
        } else {
            TaskResult::Done(self)
        }
    }
}

impl std::ops::AddAssign for Tally {
    fn add_assign(&mut self, other: Self) {
        self.written += other.written;
        self.unchanged += other.unchanged;
        self.skipped += other.skipped;
    }
}

/// Converge `resources` in order, logging each write as `<verb>`.
///
/// Absent optional files and files that are not text are skipped with a
/// warning. In a dry run nothing is written.
///
/// # Errors
///
/// Returns the first error from checking or applying a resource, such as a
/// missing required file.
pub fn process_resources<R: Resource>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    verb: &str,
) -> Result<TaskResult> {
    let mut tally = Tally::default();
    for resource in resources {
        tally += apply::converge(ctx, &resource, verb)?;
    }
    Ok(tally.finish(ctx))
}
