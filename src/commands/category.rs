//! Category command definitions.

use crate::commands::params::{
    code_parameter, identifier_argument, limit_parameter, output_parameters, page_parameter,
    parent_parameter, COMMAND_CATEGORY, COMMAND_CREATE, COMMAND_GET, COMMAND_LIST,
    PARAMETER_LABEL,
};
use clap::{Arg, ArgAction, Command};

/// Create the category command with all its subcommands.
pub fn category_command() -> Command {
    Command::new(COMMAND_CATEGORY)
        .about("Manage categories")
        .visible_alias("categories")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List categories (one page)")
                .visible_alias("ls")
                .arg(limit_parameter())
                .arg(page_parameter())
                .arg(parent_parameter("Only list direct children of this category"))
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_GET)
                .about("Get category details")
                .arg(identifier_argument("Category code"))
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_CREATE)
                .about("Create a new category")
                .arg(code_parameter())
                .arg(parent_parameter("Parent category code"))
                .arg(
                    Arg::new(PARAMETER_LABEL)
                        .long(PARAMETER_LABEL)
                        .num_args(1)
                        .action(ArgAction::Append)
                        .required(false)
                        .help("Label as locale=text (e.g. en_US=Shoes), may be repeated"),
                )
                .args(output_parameters()),
        )
}
