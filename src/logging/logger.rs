//! The run logger: forwards messages to `tracing` and keeps pass outcomes
//! for the closing summary.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{PHASE_TARGET, PREVIEW_TARGET};
use super::types::{Log, TaskEntry, TaskStatus};
use super::utils::log_file_path;

/// Logger for one command run.
///
/// Every message also lands in `$XDG_CACHE_HOME/cubepp/<command>.log`
/// (default `~/.cache/cubepp/<command>.log`), whatever the console verbosity.
#[derive(Debug)]
pub struct Logger {
    entries: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create the logger for `command`.
    ///
    /// Only the log path is resolved here, for the summary footer; the file
    /// is opened by [`init_subscriber`](super::subscriber::init_subscriber).
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Where this run's log file lives.
    #[cfg(test)]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Pass outcomes in the order they were recorded.
    #[must_use]
    pub fn entries(&self) -> Vec<TaskEntry> {
        self.entries.lock().map_or_else(|_| Vec::new(), |g| g.clone())
    }

    fn count(&self, status: TaskStatus) -> usize {
        self.entries
            .lock()
            .map_or(0, |g| g.iter().filter(|e| e.status == status).count())
    }

    /// Number of passes that failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.count(TaskStatus::Failed)
    }

    /// Whether any pass failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Print every recorded pass, per-status counts and what the run
    /// amounts to for the project.
    pub fn print_summary(&self) {
        let entries = self.entries();
        if entries.is_empty() {
            return;
        }

        println!();
        Log::phase(self, "Summary");
        for entry in &entries {
            let detail = entry
                .detail
                .as_ref()
                .map_or_else(String::new, |d| format!(" ({d})"));
            Log::info(
                self,
                &format!(
                    "{}{} {}{detail}\x1b[0m",
                    entry.status.color(),
                    entry.status.icon(),
                    entry.name
                ),
            );
        }

        println!();
        Log::info(self, &counts_line(&entries));
        Log::info(self, &conclusion(&entries));
        if let Some(path) = &self.log_file {
            Log::info(self, &format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

/// `"7 passes: 2 changed, 4 unchanged, 1 n/a"`, listing only statuses seen.
fn counts_line(entries: &[TaskEntry]) -> String {
    let labels = [
        (TaskStatus::Changed, "changed"),
        (TaskStatus::Unchanged, "unchanged"),
        (TaskStatus::DryRun, "previewed"),
        (TaskStatus::NotApplicable, "n/a"),
        (TaskStatus::Skipped, "skipped"),
        (TaskStatus::Failed, "failed"),
    ];
    let parts: Vec<String> = labels
        .iter()
        .filter_map(|(status, label)| {
            let n = entries.iter().filter(|e| e.status == *status).count();
            (n > 0).then(|| format!("{n} {label}"))
        })
        .collect();
    format!("{} passes: {}", entries.len(), parts.join(", "))
}

fn conclusion(entries: &[TaskEntry]) -> String {
    let has = |status: TaskStatus| entries.iter().any(|e| e.status == status);
    let failed = entries.iter().filter(|e| e.status == TaskStatus::Failed).count();
    if failed > 0 {
        format!("\x1b[31m{failed} pass(es) failed; the project may be partially patched\x1b[0m")
    } else if has(TaskStatus::DryRun) {
        "preview only, nothing written".to_string()
    } else if has(TaskStatus::Changed) {
        "\x1b[32mproject updated\x1b[0m".to_string()
    } else {
        "project already converged".to_string()
    }
}

impl Log for Logger {
    fn phase(&self, msg: &str) {
        tracing::info!(target: PHASE_TARGET, "{msg}");
    }

    fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    fn preview(&self, msg: &str) {
        tracing::info!(target: PREVIEW_TARGET, "{msg}");
    }

    fn record(&self, name: &str, status: TaskStatus, detail: Option<&str>) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                detail: detail.map(String::from),
            });
        }
    }
}
