//! Overlay phases: copy the template tree, resolve placeholder directories,
//! substitute placeholder tokens.
use anyhow::Result;

use super::{Context, Tally, Task, TaskResult};
use crate::cmake::chip::detect_chip;
use crate::config::{CHIP_TOKEN, PROJECT_NAME_TOKEN};
use crate::overlay::copy::copy_tree;
use crate::overlay::placeholder::{DirResolution, resolve_placeholder_dirs};
use crate::overlay::resolve_source_dir;
use crate::overlay::substitute::{Substitution, substitute_manifest};

/// Copy every configured resource directory into the project root without
/// overwriting anything.
#[derive(Debug)]
pub struct CopyResources;

impl Task for CopyResources {
    fn name(&self) -> &'static str {
        "Copy resources"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.document.resource_paths.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut tally = Tally::default();
        let mut found = false;

        for raw in &ctx.document.resource_paths {
            let Some(src) = resolve_source_dir(raw, &ctx.install_dir, &ctx.root) else {
                ctx.log
                    .warn(&format!("resource directory not found: {raw}"));
                tally.skipped += 1;
                continue;
            };
            found = true;
            ctx.log.debug(&format!("copying from {}", src.display()));

            let report = {
                let mut manifest = ctx.manifest();
                copy_tree(
                    &src,
                    &ctx.root,
                    &ctx.project_name,
                    &mut manifest,
                    ctx.dry_run,
                )?
            };
            for path in &report.copied {
                if ctx.dry_run {
                    ctx.log.preview(&format!("would copy {}", path.display()));
                } else {
                    ctx.log.debug(&format!("copied: {}", path.display()));
                }
            }
            for path in &report.existing {
                ctx.log.debug(&format!("exists: {}", path.display()));
            }
            tally.written += u32::try_from(report.copied.len()).unwrap_or(u32::MAX);
            tally.unchanged += u32::try_from(report.existing.len()).unwrap_or(u32::MAX);
        }

        if !found {
            return Ok(TaskResult::Skipped(
                "no resource directory found".to_string(),
            ));
        }
        Ok(tally.finish(ctx))
    }
}

/// Rename or merge placeholder-named directories holding copied files into
/// directories named after the project.
#[derive(Debug)]
pub struct ResolveProjectDirs;

impl Task for ResolveProjectDirs {
    fn name(&self) -> &'static str {
        "Resolve project directories"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.document.resource_paths.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut manifest = ctx.manifest();
        if manifest.is_empty() {
            return Ok(TaskResult::Skipped("no files copied".to_string()));
        }

        let done = resolve_placeholder_dirs(&ctx.root, &ctx.project_name, &mut manifest)?;
        for resolution in &done {
            ctx.log.info(&format!("\u{2713} {}", describe(resolution)));
        }
        drop(manifest);
        let tally = Tally {
            written: u32::try_from(done.len()).unwrap_or(u32::MAX),
            ..Tally::default()
        };
        Ok(tally.finish(ctx))
    }
}

fn describe(resolution: &DirResolution) -> String {
    match resolution {
        DirResolution::Rename { from, to } => {
            format!("renamed {} to {}", from.display(), to.display())
        }
        DirResolution::Merge { from, into } => {
            format!("merged {} into {}", from.display(), into.display())
        }
    }
}

/// Replace the project name and chip tokens in files copied by this run.
#[derive(Debug)]
pub struct SubstitutePlaceholders;

impl Task for SubstitutePlaceholders {
    fn name(&self) -> &'static str {
        "Substitute placeholders"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.document.resource_paths.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let manifest = ctx.manifest();
        if manifest.is_empty() {
            return Ok(TaskResult::Skipped("no files copied".to_string()));
        }

        let detection = detect_chip(&ctx.root);
        if let Some(warning) = &detection.warning {
            ctx.log.warn(warning);
        }
        ctx.log.debug(&format!("chip: {}", detection.chip));

        let replacements = [
            (PROJECT_NAME_TOKEN, ctx.project_name.as_str()),
            (CHIP_TOKEN, detection.chip.as_str()),
        ];
        let results = substitute_manifest(&manifest, &replacements)?;
        drop(manifest);

        let mut tally = Tally::default();
        for (path, outcome) in results {
            match outcome {
                Substitution::Replaced => {
                    ctx.log.debug(&format!("substituted: {}", path.display()));
                    tally.written += 1;
                }
                Substitution::Unchanged => tally.unchanged += 1,
                Substitution::Skipped => {
                    ctx.log.debug(&format!("not text: {}", path.display()));
                    tally.skipped += 1;
                }
            }
        }
        Ok(tally.finish(ctx))
    }
}
