//! Named, phase-ordered tasks that converge a generated project.
pub mod cmake_lists;
mod context;
pub mod inject;
pub mod overlay;
pub mod presets;
mod processing;

pub use context::{Context, install_dir_or, project_name_of};
pub use processing::{Tally, TaskResult, process_resources};

use std::sync::Arc;

use anyhow::Result;

use crate::config::Document;
use crate::config::profiles::Selection;
use crate::logging::TaskStatus;

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task has anything to do for the loaded document.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if a required file is missing or unreadable, a
    /// document cannot be parsed, or a write fails.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// Task name for a pass, suffixed with the profile when there is one.
///
/// # Examples
///
/// ```
/// use cubepp_cli::tasks::pass_name;
///
/// assert_eq!(pass_name("Update CMakeLists.txt", None), "Update CMakeLists.txt");
/// assert_eq!(
///     pass_name("Update CMakeLists.txt", Some("dsp")),
///     "Update CMakeLists.txt [dsp]"
/// );
/// ```
#[must_use]
pub fn pass_name(base: &str, profile: Option<&str>) -> String {
    profile.map_or_else(|| base.to_string(), |p| format!("{base} [{p}]"))
}

/// The three CMake passes for one document.
fn cmake_passes(document: &Arc<Document>, profile: Option<&str>) -> Vec<Box<dyn Task>> {
    vec![
        Box::new(presets::UpdatePresets::new(Arc::clone(document), profile)),
        Box::new(cmake_lists::UpdateCMakeLists::new(
            Arc::clone(document),
            profile,
        )),
        Box::new(cmake_lists::UpdateExtraSection::new(
            Arc::clone(document),
            profile,
        )),
    ]
}

/// The complete, ordered set of tasks run by the setup command.
///
/// Base passes come first, then one set of passes per selected profile in
/// declaration order, then the overlay phases, then a single injection pass
/// over the merged injection set.
#[must_use]
pub fn all_setup_tasks(base: &Arc<Document>, selection: &Selection) -> Vec<Box<dyn Task>> {
    let mut tasks = cmake_passes(base, None);
    for profile in &selection.profiles {
        tasks.extend(cmake_passes(
            &Arc::new(profile.document.clone()),
            Some(&profile.name),
        ));
    }
    tasks.push(Box::new(overlay::CopyResources));
    tasks.push(Box::new(overlay::ResolveProjectDirs));
    tasks.push(Box::new(overlay::SubstitutePlaceholders));
    tasks.push(Box::new(inject::InjectSources::new(
        selection.merged_injections(base),
    )));
    tasks
}

/// Execute a task, recording its status and tally in the logger.
///
/// A task that wrote at least one file is [`TaskStatus::Changed`]; one that
/// only found converged files is [`TaskStatus::Unchanged`]. Returns the
/// recorded status so callers can stop at the first failure.
pub fn execute(task: &dyn Task, ctx: &Context) -> TaskStatus {
    let name = task.name();
    if !task.should_run(ctx) {
        ctx.log.debug(&format!("{name}: nothing configured"));
        ctx.log.record(name, TaskStatus::NotApplicable, None);
        return TaskStatus::NotApplicable;
    }

    ctx.log.phase(name);

    let (status, detail) = match task.run(ctx) {
        Ok(TaskResult::Done(tally)) => {
            let status = if tally.written > 0 {
                TaskStatus::Changed
            } else {
                TaskStatus::Unchanged
            };
            (status, tally.summary(false))
        }
        Ok(TaskResult::Preview(tally)) => (TaskStatus::DryRun, tally.summary(true)),
        Ok(TaskResult::Skipped(reason)) => (TaskStatus::Skipped, reason),
        Err(e) => {
            let detail = format!("{e:#}");
            ctx.log.error(&format!("{name}: {detail}"));
            (TaskStatus::Failed, detail)
        }
    };
    if status != TaskStatus::Failed {
        ctx.log.info(&detail);
    }
    ctx.log.record(name, status, Some(&detail));
    status
}
