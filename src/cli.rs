use clap::{Arg, ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};

/// Top-level CLI entry point for the CubeMX project patcher.
///
/// Profile flags are not declared here: they are added at runtime from the
/// loaded document by [`command_for`].
#[derive(Parser, Debug)]
#[command(
    name = "cubepp",
    about = "Idempotently patch a generated STM32 CubeMX CMake project",
    version
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Profiles selected through their `--<name>` flags, in declaration order.
    #[arg(skip)]
    pub profiles: Vec<String>,
}

/// Long flags a profile may not shadow.
const RESERVED: &[&str] = &["verbose", "dry-run", "dry_run", "help", "version"];

/// Whether `name` can be exposed as a `--<name>` flag.
#[must_use]
pub fn is_flag_name(name: &str) -> bool {
    !name.is_empty()
        && !RESERVED.contains(&name)
        && !name.starts_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// The derived command plus one boolean flag per usable profile name.
#[must_use]
pub fn command_for(profile_names: &[String]) -> clap::Command {
    profile_names
        .iter()
        .filter(|name| is_flag_name(name))
        .fold(Cli::command(), |cmd, name| {
            cmd.arg(
                Arg::new(name.clone())
                    .long(name.clone())
                    .action(ArgAction::SetTrue)
                    .help(format!("Apply the {name} profile")),
            )
        })
}

fn selected(matches: &ArgMatches, profile_names: &[String]) -> Vec<String> {
    profile_names
        .iter()
        .filter(|name| is_flag_name(name) && matches.get_flag(name.as_str()))
        .cloned()
        .collect()
}

/// Parse `args` against the command generated for `profile_names`.
///
/// # Errors
///
/// Returns the clap error for unknown flags, positional arguments, `--help`
/// and `--version`; callers normally `exit()` on it.
pub fn parse_with_profiles<I, T>(profile_names: &[String], args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = command_for(profile_names).try_get_matches_from(args)?;
    let mut cli = Cli::from_arg_matches(&matches)?;
    cli.profiles = selected(&matches, profile_names);
    Ok(cli)
}
