use chrono::{DateTime, Utc};
use clap::ArgMatches;
use tracing::trace;

use crate::{
    actions::{output_format, print_formatted},
    context::ExecutionContext,
    error::CliError,
};

pub async fn login() -> Result<(), CliError> {
    trace!("Executing 'auth login' command");

    let mut context = ExecutionContext::from_default()?;
    let token = context.api().tokens_mut().login().await?;

    match DateTime::<Utc>::from_timestamp_millis(token.expires_at_millis) {
        Some(expires_at) => println!(
            "Login successful, token valid until {}",
            expires_at.to_rfc3339()
        ),
        None => println!("Login successful"),
    }
    Ok(())
}

pub fn logout() -> Result<(), CliError> {
    trace!("Executing 'auth logout' command");

    let mut context = ExecutionContext::from_default()?;
    context.api().tokens_mut().logout()?;

    println!("Cached access token removed");
    Ok(())
}

pub fn status(sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing 'auth status' command");

    let format = output_format(sub_matches)?;
    let mut context = ExecutionContext::from_default()?;
    let status = context.api().tokens().status()?;

    print_formatted(&status, &format)
}
