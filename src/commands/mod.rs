//! CLI command definitions and argument parsing.
//!
//! This module defines all the CLI commands and their arguments using the clap
//! builder API. Each command group lives in its own file.

use clap::{ArgMatches, Command};

pub mod attribute;
pub mod auth;
pub mod category;
pub mod completions;
pub mod config;
pub mod params;
pub mod product;

/// Build the complete command tree.
pub fn create_full_command() -> Command {
    Command::new("pim")
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .propagate_version(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(params::verbose_parameter())
        .subcommand(product::product_command())
        .subcommand(category::category_command())
        .subcommand(attribute::attribute_command())
        .subcommand(auth::auth_command())
        .subcommand(config::configure_command())
        .subcommand(config::config_command())
        .subcommand(completions::completions_command())
}

/// Parse the process arguments.
pub fn create_cli_commands() -> Result<ArgMatches, clap::Error> {
    create_full_command().try_get_matches()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::params::*;

    #[test]
    fn test_command_tree_is_consistent() {
        create_full_command().debug_assert();
    }

    #[test]
    fn test_attribute_list_type_filter() {
        let matches = create_full_command()
            .try_get_matches_from(["pim", "attribute", "list", "--type", "pim_catalog_text"])
            .unwrap();
        let (_, attribute) = matches.subcommand().unwrap();
        let (_, list) = attribute.subcommand().unwrap();
        assert_eq!(
            list.get_one::<String>(PARAMETER_TYPE).map(String::as_str),
            Some("pim_catalog_text")
        );
        assert_eq!(
            list.get_one::<String>(PARAMETER_FORMAT).map(String::as_str),
            Some("table")
        );
    }

    #[test]
    fn test_limit_is_bounded() {
        let result =
            create_full_command().try_get_matches_from(["pim", "product", "list", "--limit", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_product_categories_are_split() {
        let matches = create_full_command()
            .try_get_matches_from([
                "pim",
                "product",
                "create",
                "--identifier",
                "tee",
                "--categories",
                "master,summer",
            ])
            .unwrap();
        let (_, product) = matches.subcommand().unwrap();
        let (_, create) = product.subcommand().unwrap();
        let categories: Vec<&String> = create
            .get_many::<String>(PARAMETER_CATEGORIES)
            .unwrap()
            .collect();
        assert_eq!(categories, vec!["master", "summer"]);
    }

    #[test]
    fn test_config_set_rejects_unknown_keys() {
        let result =
            create_full_command().try_get_matches_from(["pim", "config", "set", "colour", "red"]);
        assert!(result.is_err());
    }
}
