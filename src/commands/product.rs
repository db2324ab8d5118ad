//! Product command definitions.

use crate::commands::params::{
    family_parameter, identifier_argument, limit_parameter, output_parameters, page_parameter,
    COMMAND_CREATE, COMMAND_GET, COMMAND_LIST, COMMAND_PRODUCT, PARAMETER_CATEGORIES,
    PARAMETER_DISABLED, PARAMETER_IDENTIFIER,
};
use clap::{Arg, ArgAction, Command};

/// Create the product command with all its subcommands.
pub fn product_command() -> Command {
    Command::new(COMMAND_PRODUCT)
        .about("Manage products")
        .visible_alias("products")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List products (one page)")
                .visible_alias("ls")
                .arg(limit_parameter())
                .arg(page_parameter())
                .arg(family_parameter("Only list products of this family"))
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_GET)
                .about("Get product details")
                .arg(identifier_argument("Product identifier (SKU)"))
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_CREATE)
                .about("Create a new product")
                .arg(
                    Arg::new(PARAMETER_IDENTIFIER)
                        .short('i')
                        .long(PARAMETER_IDENTIFIER)
                        .num_args(1)
                        .required(true)
                        .help("Identifier (SKU) of the new product"),
                )
                .arg(family_parameter("Family of the new product"))
                .arg(
                    Arg::new(PARAMETER_CATEGORIES)
                        .long(PARAMETER_CATEGORIES)
                        .num_args(1)
                        .value_delimiter(',')
                        .action(ArgAction::Append)
                        .required(false)
                        .help("Comma separated category codes"),
                )
                .arg(
                    Arg::new(PARAMETER_DISABLED)
                        .long(PARAMETER_DISABLED)
                        .action(ArgAction::SetTrue)
                        .help("Create the product disabled"),
                )
                .args(output_parameters()),
        )
}
