use clap::ArgMatches;
use std::collections::BTreeMap;
use tracing::trace;

use crate::{
    actions::{output_format, paging, print_formatted, required},
    commands::params::{PARAMETER_CODE, PARAMETER_IDENTIFIER, PARAMETER_LABEL, PARAMETER_PARENT},
    context::ExecutionContext,
    error::CliError,
    model::{CategoryListOptions, NewCategory, ResourceItem, ResourceKind, ResourceList},
};

/// Turn `locale=text` pairs into a label map. The last label for a locale wins.
fn parse_labels<'a, I>(values: I) -> Result<BTreeMap<String, String>, CliError>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut labels = BTreeMap::new();
    for value in values {
        match value.split_once('=') {
            Some((locale, text)) if !locale.trim().is_empty() => {
                labels.insert(locale.trim().to_string(), text.to_string());
            }
            _ => {
                return Err(CliError::InvalidArgument(format!(
                    "label {:?} must be given as locale=text",
                    value
                )))
            }
        }
    }
    Ok(labels)
}

pub async fn list_categories(sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing 'category list' command");

    let format = output_format(sub_matches)?;
    let options = CategoryListOptions {
        paging: paging(sub_matches),
        parent: sub_matches.get_one::<String>(PARAMETER_PARENT).cloned(),
    };

    let mut context = ExecutionContext::from_default()?;
    let items = context.api().list_categories(&options).await?;

    print_formatted(
        &ResourceList {
            kind: ResourceKind::Category,
            items,
        },
        &format,
    )
}

pub async fn get_category(sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing 'category get' command");

    let format = output_format(sub_matches)?;
    let code = required(sub_matches, PARAMETER_IDENTIFIER)?;

    let mut context = ExecutionContext::from_default()?;
    let item = context.api().get_category(code).await?;

    print_formatted(
        &ResourceItem {
            kind: ResourceKind::Category,
            item,
        },
        &format,
    )
}

pub async fn create_category(sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing 'category create' command");

    let format = output_format(sub_matches)?;
    let category = NewCategory {
        code: required(sub_matches, PARAMETER_CODE)?.clone(),
        parent: sub_matches.get_one::<String>(PARAMETER_PARENT).cloned(),
        labels: parse_labels(
            sub_matches
                .get_many::<String>(PARAMETER_LABEL)
                .into_iter()
                .flatten(),
        )?,
    };

    let mut context = ExecutionContext::from_default()?;
    let item = context.api().create_category(&category).await?;

    print_formatted(
        &ResourceItem {
            kind: ResourceKind::Category,
            item,
        },
        &format,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        let values = vec!["en_US=Shoes".to_string(), "fr_FR=Chaussures = neuves".to_string()];
        let labels = parse_labels(&values).unwrap();
        assert_eq!(labels.get("en_US").map(String::as_str), Some("Shoes"));
        assert_eq!(
            labels.get("fr_FR").map(String::as_str),
            Some("Chaussures = neuves")
        );
    }

    #[test]
    fn test_label_without_locale_is_rejected() {
        let values = vec!["Shoes".to_string()];
        assert!(matches!(
            parse_labels(&values),
            Err(CliError::InvalidArgument(_))
        ));

        let values = vec!["=Shoes".to_string()];
        assert!(parse_labels(&values).is_err());
    }
}
