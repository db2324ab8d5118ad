//! Command actions.
//!
//! Each submodule turns parsed arguments into calls on the API client or the
//! credential store and prints the result. Output is rendered completely
//! before anything is written, so a failing command prints only its error.

use clap::ArgMatches;

use crate::{
    commands::params::{
        PARAMETER_FORMAT, PARAMETER_HEADERS, PARAMETER_JSON, PARAMETER_LIMIT, PARAMETER_PAGE,
        PARAMETER_PRETTY,
    },
    error::CliError,
    format::{Formattable, OutputFormat, OutputFormatOptions, JSON, TABLE},
    model::Paging,
};

pub mod attributes;
pub mod auth;
pub mod categories;
pub mod completions;
pub mod config;
pub mod products;

/// Read the output options of a command. `--json` wins over `--format`.
pub fn output_format(sub_matches: &ArgMatches) -> Result<OutputFormat, CliError> {
    let options = OutputFormatOptions {
        with_headers: sub_matches.get_flag(PARAMETER_HEADERS),
        pretty: sub_matches.get_flag(PARAMETER_PRETTY),
    };

    let format_str = if sub_matches.get_flag(PARAMETER_JSON) {
        JSON
    } else {
        sub_matches
            .get_one::<String>(PARAMETER_FORMAT)
            .map(String::as_str)
            .unwrap_or(TABLE)
    };

    Ok(OutputFormat::from_string_with_options(format_str, options)?)
}

/// A string argument clap is expected to have enforced already.
pub fn required<'a>(sub_matches: &'a ArgMatches, name: &str) -> Result<&'a String, CliError> {
    sub_matches
        .get_one::<String>(name)
        .ok_or_else(|| CliError::MissingRequiredArgument(name.to_string()))
}

pub fn paging(sub_matches: &ArgMatches) -> Paging {
    Paging {
        limit: sub_matches.get_one::<u32>(PARAMETER_LIMIT).copied(),
        page: sub_matches.get_one::<u32>(PARAMETER_PAGE).copied(),
    }
}

/// Render `value` and print it to stdout.
pub fn print_formatted<T: Formattable>(value: &T, format: &OutputFormat) -> Result<(), CliError> {
    let output = value.format(format)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create_full_command;

    fn list_matches(args: &[&str]) -> ArgMatches {
        let matches = create_full_command().try_get_matches_from(args).unwrap();
        let (_, resource) = matches.subcommand().unwrap();
        let (_, list) = resource.subcommand().unwrap();
        list.clone()
    }

    #[test]
    fn test_default_format_is_table() {
        let matches = list_matches(&["pim", "category", "list"]);
        assert_eq!(output_format(&matches).unwrap(), OutputFormat::default());
    }

    #[test]
    fn test_json_flag_overrides_format() {
        let matches = list_matches(&[
            "pim", "product", "list", "--format", "csv", "--json", "--pretty",
        ]);
        assert_eq!(
            output_format(&matches).unwrap(),
            OutputFormat::Json(OutputFormatOptions {
                with_headers: false,
                pretty: true,
            })
        );
    }

    #[test]
    fn test_paging_options() {
        let matches = list_matches(&["pim", "attribute", "list", "--limit", "25", "--page", "3"]);
        assert_eq!(
            paging(&matches),
            Paging {
                limit: Some(25),
                page: Some(3),
            }
        );

        let matches = list_matches(&["pim", "attribute", "list"]);
        assert_eq!(paging(&matches), Paging::default());
    }
}
