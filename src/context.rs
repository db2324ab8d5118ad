//! Execution context for the pim CLI client.
//!
//! Commands that talk to the API share the same setup: open the credential
//! store and wrap it in an API client. The store is handed over explicitly;
//! nothing is kept in process-wide state.

use crate::{api::PimApiClient, configuration::FileCredentialStore, error::CliError};

/// Execution context containing common resources needed by CLI commands.
pub struct ExecutionContext {
    pub api: PimApiClient<FileCredentialStore>,
}

impl ExecutionContext {
    /// Open the default configuration file and build an API client around it.
    pub fn from_default() -> Result<Self, CliError> {
        let store = FileCredentialStore::load_default()?;
        Ok(Self::with_store(store)?)
    }

    pub fn with_store(store: FileCredentialStore) -> Result<Self, reqwest::Error> {
        Ok(ExecutionContext {
            api: PimApiClient::new(store)?,
        })
    }

    /// Get a mutable reference to the API client.
    pub fn api(&mut self) -> &mut PimApiClient<FileCredentialStore> {
        &mut self.api
    }
}
