//! Authentication command definitions.
//!
//! This module defines CLI commands related to the cached access token.

use crate::commands::params::{
    output_parameters, COMMAND_AUTH, COMMAND_LOGIN, COMMAND_LOGOUT, COMMAND_STATUS,
};
use clap::Command;

/// Create the authentication command with all its subcommands.
pub fn auth_command() -> Command {
    Command::new(COMMAND_AUTH)
        .about("Authentication operations")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LOGIN)
                .about("Request a new access token with the configured credentials"),
        )
        .subcommand(Command::new(COMMAND_LOGOUT).about("Clear the cached access token"))
        .subcommand(
            Command::new(COMMAND_STATUS)
                .about("Show whether credentials are configured and the token is valid")
                .args(output_parameters()),
        )
}
