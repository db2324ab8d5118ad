//! Configuration command definitions.
//!
//! This module defines CLI commands related to configuration management.

use crate::commands::params::{
    base_url_parameter, client_id_parameter, client_secret_parameter, output_parameters,
    password_parameter, username_parameter, COMMAND_CONFIG, COMMAND_CONFIGURE, COMMAND_GET,
    COMMAND_LIST, COMMAND_PATH, COMMAND_SET, PARAMETER_KEY, PARAMETER_VALUE,
};
use crate::configuration::KNOWN_KEYS;
use clap::{Arg, Command};

fn key_argument() -> Arg {
    Arg::new(PARAMETER_KEY)
        .num_args(1)
        .required(true)
        .value_parser(KNOWN_KEYS)
        .help("Configuration key")
}

/// Create the interactive configure command.
pub fn configure_command() -> Command {
    Command::new(COMMAND_CONFIGURE)
        .about("Set up the API connection, prompting for anything not given as an option")
        .arg(client_id_parameter())
        .arg(client_secret_parameter())
        .arg(username_parameter())
        .arg(password_parameter())
        .arg(base_url_parameter())
}

/// Create the config command with all its subcommands.
pub fn config_command() -> Command {
    Command::new(COMMAND_CONFIG)
        .about("Configuration management")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_GET)
                .about("Print one configuration value")
                .arg(key_argument()),
        )
        .subcommand(
            Command::new(COMMAND_SET)
                .about("Set one configuration value")
                .arg(key_argument())
                .arg(
                    Arg::new(PARAMETER_VALUE)
                        .num_args(1)
                        .required(true)
                        .help("New value"),
                ),
        )
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List configuration with secrets masked")
                .visible_alias("ls")
                .args(output_parameters()),
        )
        .subcommand(Command::new(COMMAND_PATH).about("Show configuration file path"))
}
