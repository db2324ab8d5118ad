use clap::ArgMatches;
use tracing::trace;

use crate::{
    actions::{output_format, paging, print_formatted, required},
    commands::params::{
        PARAMETER_CATEGORIES, PARAMETER_DISABLED, PARAMETER_FAMILY, PARAMETER_IDENTIFIER,
    },
    context::ExecutionContext,
    error::CliError,
    model::{NewProduct, ProductListOptions, ResourceItem, ResourceKind, ResourceList},
};

pub async fn list_products(sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing 'product list' command");

    let format = output_format(sub_matches)?;
    let options = ProductListOptions {
        paging: paging(sub_matches),
        family: sub_matches.get_one::<String>(PARAMETER_FAMILY).cloned(),
    };

    let mut context = ExecutionContext::from_default()?;
    let items = context.api().list_products(&options).await?;

    print_formatted(
        &ResourceList {
            kind: ResourceKind::Product,
            items,
        },
        &format,
    )
}

pub async fn get_product(sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing 'product get' command");

    let format = output_format(sub_matches)?;
    let identifier = required(sub_matches, PARAMETER_IDENTIFIER)?;

    let mut context = ExecutionContext::from_default()?;
    let item = context.api().get_product(identifier).await?;

    print_formatted(
        &ResourceItem {
            kind: ResourceKind::Product,
            item,
        },
        &format,
    )
}

pub async fn create_product(sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing 'product create' command");

    let format = output_format(sub_matches)?;
    let product = NewProduct {
        identifier: required(sub_matches, PARAMETER_IDENTIFIER)?.clone(),
        family: sub_matches.get_one::<String>(PARAMETER_FAMILY).cloned(),
        categories: sub_matches
            .get_many::<String>(PARAMETER_CATEGORIES)
            .map(|values| {
                values
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
        enabled: !sub_matches.get_flag(PARAMETER_DISABLED),
    };

    let mut context = ExecutionContext::from_default()?;
    let item = context.api().create_product(&product).await?;

    print_formatted(
        &ResourceItem {
            kind: ResourceKind::Product,
            item,
        },
        &format,
    )
}
