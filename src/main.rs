use anyhow::{Context as _, Result};
use std::sync::Arc;

use cubepp_cli::{cli, commands, config, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();

    let root = std::env::current_dir().context("determining the project root")?;
    let document = config::load(&root)?;
    let args = cli::parse_with_profiles(&document.profile_names(), std::env::args_os())
        .unwrap_or_else(|e| e.exit());

    logging::init_subscriber(args.verbose, "setup");
    let log = Arc::new(logging::Logger::new("setup"));

    commands::setup::run(document, &args, &root, &log)
}
