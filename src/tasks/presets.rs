use anyhow::Result;
use std::sync::Arc;

use super::{Context, Task, TaskResult, pass_name, process_resources};
use crate::config::{Document, PRESETS_FILE};
use crate::resources::presets::PresetsResource;

/// Point the `default` configure preset at the document's build directory.
#[derive(Debug)]
pub struct UpdatePresets {
    name: String,
    document: Arc<Document>,
}

impl UpdatePresets {
    /// Create the task for one pass.
    #[must_use]
    pub fn new(document: Arc<Document>, profile: Option<&str>) -> Self {
        Self {
            name: pass_name("Update CMake presets", profile),
            document,
        }
    }
}

impl Task for UpdatePresets {
    fn name(&self) -> &str {
        &self.name
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        self.document.binary_dir.is_some()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let Some(binary_dir) = self.document.binary_dir.clone() else {
            return Ok(TaskResult::Skipped("no binary_dir configured".to_string()));
        };
        let resource = PresetsResource::new(ctx.project_path(PRESETS_FILE), binary_dir);
        process_resources(ctx, [resource], "update")
    }
}
