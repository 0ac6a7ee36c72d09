use anyhow::Result;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

use super::{Context, Task, TaskResult, process_resources};
use crate::config::Injection;
use crate::inject::{InjectOutcome, InjectionPatch, inject_all};
use crate::resources::helpers::fs::{TextContent, read_text};
use crate::resources::text_file::PatchedFileResource;

/// Insert configured snippets after their markers in project sources.
///
/// Injections are grouped per file in declaration order; each file is
/// patched in memory and written at most once.
#[derive(Debug)]
pub struct InjectSources {
    injections: Vec<Injection>,
}

impl InjectSources {
    /// Create the task for a merged injection set.
    #[must_use]
    pub const fn new(injections: Vec<Injection>) -> Self {
        Self { injections }
    }

    fn by_file(&self) -> IndexMap<PathBuf, Vec<Injection>> {
        let mut grouped: IndexMap<PathBuf, Vec<Injection>> = IndexMap::new();
        for injection in &self.injections {
            grouped
                .entry(injection.file.clone())
                .or_default()
                .push(injection.clone());
        }
        grouped
    }

    /// Warn about markers missing from a file that exists.
    fn report_missing_markers(ctx: &Context, path: &Path, injections: &[Injection]) -> Result<()> {
        let TextContent::Text(text) = read_text(path)? else {
            return Ok(());
        };
        let (_, outcomes) = inject_all(&text, injections, &ctx.project_name);
        for (injection, outcome) in injections.iter().zip(outcomes) {
            if outcome == InjectOutcome::MarkerNotFound {
                ctx.log.warn(&format!(
                    "marker not found in {}: {}",
                    injection.file.display(),
                    injection.marker
                ));
            }
        }
        Ok(())
    }
}

impl Task for InjectSources {
    fn name(&self) -> &'static str {
        "Inject source markers"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        !self.injections.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut resources = Vec::new();
        for (file, injections) in self.by_file() {
            let path = ctx.project_path(&file);
            Self::report_missing_markers(ctx, &path, &injections)?;
            let label = format!("{} injection(s)", injections.len());
            resources.push(PatchedFileResource::new(path, label).with_patch(InjectionPatch {
                injections,
                project_name: ctx.project_name.clone(),
            }));
        }
        process_resources(ctx, resources, "inject")
    }
}
