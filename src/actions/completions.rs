//! Completions action logic.

use clap::ArgMatches;
use clap_complete::Shell;
use std::io;

use crate::{commands::params::PARAMETER_SHELL, error::CliError};

pub const BINARY_NAME: &str = "pim";

/// Generate completions for the requested shell and write them to stdout.
pub fn generate_completions(sub_matches: &ArgMatches) -> Result<(), CliError> {
    let shell = sub_matches
        .get_one::<Shell>(PARAMETER_SHELL)
        .copied()
        .ok_or_else(|| CliError::MissingRequiredArgument(PARAMETER_SHELL.to_string()))?;

    // completions cover the whole tree, not just this subcommand
    let mut cmd = crate::commands::create_full_command();
    clap_complete::generate(shell, &mut cmd, BINARY_NAME, &mut io::stdout());

    Ok(())
}
