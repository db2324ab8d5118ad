use clap::ArgMatches;
use tracing::trace;

use crate::{
    actions::{output_format, paging, print_formatted, required},
    commands::params::{
        DEFAULT_ATTRIBUTE_GROUP, PARAMETER_CODE, PARAMETER_GROUP, PARAMETER_IDENTIFIER,
        PARAMETER_LOCALIZABLE, PARAMETER_SCOPABLE, PARAMETER_TYPE,
    },
    context::ExecutionContext,
    error::CliError,
    model::{AttributeListOptions, NewAttribute, ResourceItem, ResourceKind, ResourceList},
};

pub async fn list_attributes(sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing 'attribute list' command");

    let format = output_format(sub_matches)?;
    let options = AttributeListOptions {
        paging: paging(sub_matches),
        attribute_type: sub_matches.get_one::<String>(PARAMETER_TYPE).cloned(),
    };

    let mut context = ExecutionContext::from_default()?;
    let items = context.api().list_attributes(&options).await?;

    print_formatted(
        &ResourceList {
            kind: ResourceKind::Attribute,
            items,
        },
        &format,
    )
}

pub async fn get_attribute(sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing 'attribute get' command");

    let format = output_format(sub_matches)?;
    let code = required(sub_matches, PARAMETER_IDENTIFIER)?;

    let mut context = ExecutionContext::from_default()?;
    let item = context.api().get_attribute(code).await?;

    print_formatted(
        &ResourceItem {
            kind: ResourceKind::Attribute,
            item,
        },
        &format,
    )
}

pub async fn create_attribute(sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing 'attribute create' command");

    let format = output_format(sub_matches)?;
    let attribute = NewAttribute {
        code: required(sub_matches, PARAMETER_CODE)?.clone(),
        attribute_type: required(sub_matches, PARAMETER_TYPE)?.clone(),
        group: sub_matches
            .get_one::<String>(PARAMETER_GROUP)
            .cloned()
            .unwrap_or_else(|| DEFAULT_ATTRIBUTE_GROUP.to_string()),
        localizable: sub_matches.get_flag(PARAMETER_LOCALIZABLE),
        scopable: sub_matches.get_flag(PARAMETER_SCOPABLE),
    };

    let mut context = ExecutionContext::from_default()?;
    let item = context.api().create_attribute(&attribute).await?;

    print_formatted(
        &ResourceItem {
            kind: ResourceKind::Attribute,
            item,
        },
        &format,
    )
}
