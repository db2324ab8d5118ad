//! Shared command parameters for all CLI commands.
//!
//! This module defines common parameters that are used across multiple command modules.
//! It provides a centralized place to define parameter names and common argument configurations.

use crate::format::{OutputFormat, TABLE};
use clap::{Arg, ArgAction};

// CRUD operations
pub const COMMAND_CREATE: &str = "create";
pub const COMMAND_GET: &str = "get";
pub const COMMAND_LIST: &str = "list";

// Resource commands
pub const COMMAND_PRODUCT: &str = "product";
pub const COMMAND_CATEGORY: &str = "category";
pub const COMMAND_ATTRIBUTE: &str = "attribute";

// Auth commands
pub const COMMAND_AUTH: &str = "auth";
pub const COMMAND_LOGIN: &str = "login";
pub const COMMAND_LOGOUT: &str = "logout";
pub const COMMAND_STATUS: &str = "status";

// Config commands
pub const COMMAND_CONFIGURE: &str = "configure";
pub const COMMAND_CONFIG: &str = "config";
pub const COMMAND_SET: &str = "set";
pub const COMMAND_PATH: &str = "path";

pub const COMMAND_COMPLETIONS: &str = "completions";

pub const PARAMETER_VERBOSE: &str = "verbose";
pub const PARAMETER_FORMAT: &str = "format";
pub const PARAMETER_JSON: &str = "json";
pub const PARAMETER_PRETTY: &str = "pretty";
pub const PARAMETER_HEADERS: &str = "headers";

pub const PARAMETER_LIMIT: &str = "limit";
pub const PARAMETER_PAGE: &str = "page";
pub const PARAMETER_IDENTIFIER: &str = "identifier";
pub const PARAMETER_CODE: &str = "code";
pub const PARAMETER_FAMILY: &str = "family";
pub const PARAMETER_CATEGORIES: &str = "categories";
pub const PARAMETER_DISABLED: &str = "disabled";
pub const PARAMETER_PARENT: &str = "parent";
pub const PARAMETER_LABEL: &str = "label";
pub const PARAMETER_TYPE: &str = "type";
pub const PARAMETER_GROUP: &str = "group";
pub const PARAMETER_LOCALIZABLE: &str = "localizable";
pub const PARAMETER_SCOPABLE: &str = "scopable";

pub const PARAMETER_KEY: &str = "key";
pub const PARAMETER_VALUE: &str = "value";
pub const PARAMETER_CLIENT_ID: &str = "client-id";
pub const PARAMETER_CLIENT_SECRET: &str = "client-secret";
pub const PARAMETER_USERNAME: &str = "username";
pub const PARAMETER_PASSWORD: &str = "password";
pub const PARAMETER_BASE_URL: &str = "base-url";
pub const PARAMETER_SHELL: &str = "shell";

pub const DEFAULT_ATTRIBUTE_GROUP: &str = "other";

/// Global flag that raises the log level to debug.
pub fn verbose_parameter() -> Arg {
    Arg::new(PARAMETER_VERBOSE)
        .short('v')
        .long(PARAMETER_VERBOSE)
        .action(ArgAction::SetTrue)
        .global(true)
        .help("Enable verbose output for debugging")
}

/// This parameter is used across multiple commands for output formatting.
pub fn format_parameter() -> Arg {
    Arg::new(PARAMETER_FORMAT)
        .short('f')
        .long(PARAMETER_FORMAT)
        .num_args(1)
        .required(false)
        .default_value(TABLE)
        .help("Output data format")
        .value_parser(OutputFormat::names())
}

/// Shorthand for `--format json`.
pub fn json_parameter() -> Arg {
    Arg::new(PARAMETER_JSON)
        .long(PARAMETER_JSON)
        .action(ArgAction::SetTrue)
        .required(false)
        .help("Print the raw JSON returned by the API (same as --format json)")
}

/// This parameter flag is used across multiple commands for output formatting.
pub fn format_pretty_parameter() -> Arg {
    Arg::new(PARAMETER_PRETTY)
        .long(PARAMETER_PRETTY)
        .action(ArgAction::SetTrue)
        .required(false)
        .help("Format JSON output pretty")
}

/// This parameter flag is used across multiple commands for output formatting.
pub fn format_with_headers_parameter() -> Arg {
    Arg::new(PARAMETER_HEADERS)
        .long(PARAMETER_HEADERS)
        .action(ArgAction::SetTrue)
        .required(false)
        .env("PIM_CLI_HEADERS")
        .help("Include a header row in CSV output")
}

/// All output parameters at once.
pub fn output_parameters() -> [Arg; 4] {
    [
        format_parameter(),
        json_parameter(),
        format_pretty_parameter(),
        format_with_headers_parameter(),
    ]
}

pub fn limit_parameter() -> Arg {
    Arg::new(PARAMETER_LIMIT)
        .short('l')
        .long(PARAMETER_LIMIT)
        .num_args(1)
        .required(false)
        .value_parser(clap::value_parser!(u32).range(1..=100))
        .help("Maximum number of items on the page (1-100)")
}

pub fn page_parameter() -> Arg {
    Arg::new(PARAMETER_PAGE)
        .long(PARAMETER_PAGE)
        .num_args(1)
        .required(false)
        .value_parser(clap::value_parser!(u32).range(1..))
        .help("Page number to fetch")
}

/// Positional identifier of a single resource.
pub fn identifier_argument(help: &'static str) -> Arg {
    Arg::new(PARAMETER_IDENTIFIER)
        .num_args(1)
        .required(true)
        .help(help)
}

pub fn code_parameter() -> Arg {
    Arg::new(PARAMETER_CODE)
        .short('c')
        .long(PARAMETER_CODE)
        .num_args(1)
        .required(true)
        .help("Code of the new resource")
}

pub fn family_parameter(help: &'static str) -> Arg {
    Arg::new(PARAMETER_FAMILY)
        .long(PARAMETER_FAMILY)
        .num_args(1)
        .required(false)
        .help(help)
}

pub fn parent_parameter(help: &'static str) -> Arg {
    Arg::new(PARAMETER_PARENT)
        .short('p')
        .long(PARAMETER_PARENT)
        .num_args(1)
        .required(false)
        .help(help)
}

pub fn type_parameter(help: &'static str) -> Arg {
    Arg::new(PARAMETER_TYPE)
        .short('t')
        .long(PARAMETER_TYPE)
        .num_args(1)
        .help(help)
}

pub fn client_id_parameter() -> Arg {
    Arg::new(PARAMETER_CLIENT_ID)
        .long(PARAMETER_CLIENT_ID)
        .num_args(1)
        .required(false)
        .help("Client ID of the API connection")
}

pub fn client_secret_parameter() -> Arg {
    Arg::new(PARAMETER_CLIENT_SECRET)
        .long(PARAMETER_CLIENT_SECRET)
        .num_args(1)
        .required(false)
        .help("Client secret of the API connection")
}

pub fn username_parameter() -> Arg {
    Arg::new(PARAMETER_USERNAME)
        .long(PARAMETER_USERNAME)
        .num_args(1)
        .required(false)
        .help("Username of the API user")
}

pub fn password_parameter() -> Arg {
    Arg::new(PARAMETER_PASSWORD)
        .long(PARAMETER_PASSWORD)
        .num_args(1)
        .required(false)
        .help("Password of the API user")
}

pub fn base_url_parameter() -> Arg {
    Arg::new(PARAMETER_BASE_URL)
        .long(PARAMETER_BASE_URL)
        .num_args(1)
        .required(false)
        .value_parser(clap::value_parser!(url::Url))
        .help("API base URL (e.g., https://demo.akeneo.com/api/rest/v1)")
}
