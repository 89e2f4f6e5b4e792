use crate::cli::actions::Action;
use anyhow::Result;

/// No subcommands: every invocation is the stdin-driven check. Flags only
/// tune logging and never alter the lookup.
pub fn handler(_matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Check)
}
