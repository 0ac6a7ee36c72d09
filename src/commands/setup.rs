use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::cli::Cli;
use crate::config::Document;
use crate::config::profiles;
use crate::logging::{Log, Logger};
use crate::tasks::{self, Context};

/// Run the setup command against the project rooted at `root`.
///
/// # Errors
///
/// Returns an error if the project name cannot be derived from `root` or a
/// task fails.
pub fn run(document: Document, cli: &Cli, root: &Path, log: &Arc<Logger>) -> Result<()> {
    let version = option_env!("CUBEPP_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
    log.info(&format!("cubepp {version}"));

    log.phase("Resolving profiles");
    let selection = profiles::resolve(&document, &cli.profiles);
    for name in &selection.unknown {
        log.warn(&format!("unknown profile '{name}', skipping"));
    }
    if selection.profiles.is_empty() {
        log.info("profiles: none");
    } else {
        log.info(&format!("profiles: {}", selection.names().join(", ")));
    }

    let ctx = Context::new(
        Arc::new(document),
        root.to_path_buf(),
        tasks::install_dir_or(root),
        Arc::clone(log) as Arc<dyn Log>,
        cli.dry_run,
    )?;
    log.info(&format!("project: {}", ctx.project_name));
    log.debug(&format!("install dir: {}", ctx.install_dir.display()));

    let all_tasks = tasks::all_setup_tasks(&ctx.document, &selection);
    super::run_tasks_to_completion(all_tasks.iter().map(AsRef::as_ref), &ctx, log)
}
