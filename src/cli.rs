//! Command dispatch.
//!
//! Maps the parsed command tree onto the action functions.

use clap::ArgMatches;
use tracing::trace;

use crate::{
    actions::{attributes, auth, categories, completions, config, products},
    commands::params::{
        COMMAND_ATTRIBUTE, COMMAND_AUTH, COMMAND_CATEGORY, COMMAND_COMPLETIONS, COMMAND_CONFIG,
        COMMAND_CONFIGURE, COMMAND_CREATE, COMMAND_GET, COMMAND_LIST, COMMAND_LOGIN,
        COMMAND_LOGOUT, COMMAND_PATH, COMMAND_PRODUCT, COMMAND_SET, COMMAND_STATUS,
    },
    error::CliError,
};

fn extract_subcommand_name(sub_matches: &ArgMatches) -> String {
    let message = match sub_matches.subcommand() {
        Some(m) => m.0,
        None => "unknown",
    };

    message.to_string()
}

fn unsupported(sub_matches: &ArgMatches) -> CliError {
    CliError::UnsupportedSubcommand(extract_subcommand_name(sub_matches))
}

pub async fn execute_command(commands: &ArgMatches) -> Result<(), CliError> {
    trace!("Dispatching command");

    match commands.subcommand() {
        Some((COMMAND_PRODUCT, sub_matches)) => match sub_matches.subcommand() {
            Some((COMMAND_LIST, sub_matches)) => products::list_products(sub_matches).await,
            Some((COMMAND_GET, sub_matches)) => products::get_product(sub_matches).await,
            Some((COMMAND_CREATE, sub_matches)) => products::create_product(sub_matches).await,
            _ => Err(unsupported(sub_matches)),
        },
        Some((COMMAND_CATEGORY, sub_matches)) => match sub_matches.subcommand() {
            Some((COMMAND_LIST, sub_matches)) => categories::list_categories(sub_matches).await,
            Some((COMMAND_GET, sub_matches)) => categories::get_category(sub_matches).await,
            Some((COMMAND_CREATE, sub_matches)) => {
                categories::create_category(sub_matches).await
            }
            _ => Err(unsupported(sub_matches)),
        },
        Some((COMMAND_ATTRIBUTE, sub_matches)) => match sub_matches.subcommand() {
            Some((COMMAND_LIST, sub_matches)) => attributes::list_attributes(sub_matches).await,
            Some((COMMAND_GET, sub_matches)) => attributes::get_attribute(sub_matches).await,
            Some((COMMAND_CREATE, sub_matches)) => {
                attributes::create_attribute(sub_matches).await
            }
            _ => Err(unsupported(sub_matches)),
        },
        Some((COMMAND_AUTH, sub_matches)) => match sub_matches.subcommand() {
            Some((COMMAND_LOGIN, _)) => auth::login().await,
            Some((COMMAND_LOGOUT, _)) => auth::logout(),
            Some((COMMAND_STATUS, sub_matches)) => auth::status(sub_matches),
            _ => Err(unsupported(sub_matches)),
        },
        Some((COMMAND_CONFIGURE, sub_matches)) => config::configure(sub_matches),
        Some((COMMAND_CONFIG, sub_matches)) => match sub_matches.subcommand() {
            Some((COMMAND_GET, sub_matches)) => config::get(sub_matches),
            Some((COMMAND_SET, sub_matches)) => config::set(sub_matches),
            Some((COMMAND_LIST, sub_matches)) => config::list(sub_matches),
            Some((COMMAND_PATH, _)) => config::path(),
            _ => Err(unsupported(sub_matches)),
        },
        Some((COMMAND_COMPLETIONS, sub_matches)) => {
            completions::generate_completions(sub_matches)
        }
        _ => Err(unsupported(commands)),
    }
}
