//! Pass outcomes kept for the run summary, and the [`Log`] seam passes log through.

/// What one pass did to the project tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// At least one file was written.
    Changed,
    /// Every file the pass manages was already converged.
    Unchanged,
    /// The merged document gives the pass nothing to do.
    NotApplicable,
    /// The pass found none of its inputs (e.g. no resource directory).
    Skipped,
    /// Dry run: files were checked, nothing was written.
    DryRun,
    /// The pass returned an error.
    Failed,
}

impl TaskStatus {
    /// Marker shown in front of the pass name in the summary.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Changed => "✓",
            Self::Unchanged => "=",
            Self::NotApplicable => "·",
            Self::Skipped => "○",
            Self::DryRun => "~",
            Self::Failed => "✗",
        }
    }

    pub(super) const fn color(self) -> &'static str {
        match self {
            Self::Changed => "\x1b[32m",
            Self::Unchanged | Self::NotApplicable => "\x1b[2m",
            Self::Skipped | Self::DryRun => "\x1b[33m",
            Self::Failed => "\x1b[31m",
        }
    }
}

/// One pass as listed in the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEntry {
    /// Pass name, including the profile suffix when one is active.
    pub name: String,
    /// Final status.
    pub status: TaskStatus,
    /// File tally, skip reason or error text.
    pub detail: Option<String>,
}

/// Sink for everything a run reports.
///
/// Passes log through this trait so tests can swap in an isolated logger
/// without touching the global subscriber.
pub trait Log: Send + Sync {
    /// Announce a pass or a command phase.
    fn phase(&self, msg: &str);
    /// Report progress.
    fn info(&self, msg: &str);
    /// Report detail only shown with `--verbose` (always in the log file).
    fn debug(&self, msg: &str);
    /// Report a recoverable problem; the run continues.
    fn warn(&self, msg: &str);
    /// Report a failed pass.
    fn error(&self, msg: &str);
    /// Report a write a dry run would have made.
    fn preview(&self, msg: &str);
    /// Keep a pass outcome for the summary.
    fn record(&self, name: &str, status: TaskStatus, detail: Option<&str>);
}
