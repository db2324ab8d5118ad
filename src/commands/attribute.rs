//! Attribute command definitions.

use crate::commands::params::{
    code_parameter, identifier_argument, limit_parameter, output_parameters, page_parameter,
    type_parameter, COMMAND_ATTRIBUTE, COMMAND_CREATE, COMMAND_GET, COMMAND_LIST,
    DEFAULT_ATTRIBUTE_GROUP, PARAMETER_GROUP, PARAMETER_LOCALIZABLE, PARAMETER_SCOPABLE,
};
use clap::{Arg, ArgAction, Command};

/// Create the attribute command with all its subcommands.
pub fn attribute_command() -> Command {
    Command::new(COMMAND_ATTRIBUTE)
        .about("Manage attributes")
        .visible_alias("attributes")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List attributes (one page)")
                .visible_alias("ls")
                .arg(limit_parameter())
                .arg(page_parameter())
                .arg(
                    type_parameter("Only list attributes of this type (e.g. pim_catalog_text)")
                        .required(false),
                )
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_GET)
                .about("Get attribute details")
                .arg(identifier_argument("Attribute code"))
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_CREATE)
                .about("Create a new attribute")
                .arg(code_parameter())
                .arg(
                    type_parameter("Attribute type (e.g. pim_catalog_text)").required(true),
                )
                .arg(
                    Arg::new(PARAMETER_GROUP)
                        .short('g')
                        .long(PARAMETER_GROUP)
                        .num_args(1)
                        .default_value(DEFAULT_ATTRIBUTE_GROUP)
                        .help("Attribute group code"),
                )
                .arg(
                    Arg::new(PARAMETER_LOCALIZABLE)
                        .long(PARAMETER_LOCALIZABLE)
                        .action(ArgAction::SetTrue)
                        .help("Values differ per locale"),
                )
                .arg(
                    Arg::new(PARAMETER_SCOPABLE)
                        .long(PARAMETER_SCOPABLE)
                        .action(ArgAction::SetTrue)
                        .help("Values differ per channel"),
                )
                .args(output_parameters()),
        )
}
