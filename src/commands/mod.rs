pub mod setup;

use anyhow::Result;

use crate::logging::{Logger, TaskStatus};
use crate::tasks::{self, Context, Task};

/// Execute tasks in order until one fails, print the summary, and bail if
/// any task failed.
///
/// Tasks after a failure are not started: later phases depend on the files
/// and manifest the earlier ones produce.
///
/// # Errors
///
/// Returns an error if a task recorded a failure.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    for task in tasks {
        if tasks::execute(task, ctx) == TaskStatus::Failed {
            break;
        }
    }

    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} task(s) failed");
    }
    Ok(())
}
