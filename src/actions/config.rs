//! Configuration action logic.
//!
//! `pim configure` and `pim config ...` work on the credential store only;
//! they never contact the API.

use clap::ArgMatches;
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::{debug, trace};
use url::Url;

use crate::{
    actions::{output_format, print_formatted, required},
    commands::params::{
        PARAMETER_BASE_URL, PARAMETER_CLIENT_ID, PARAMETER_CLIENT_SECRET, PARAMETER_KEY,
        PARAMETER_PASSWORD, PARAMETER_USERNAME, PARAMETER_VALUE,
    },
    configuration::{
        check_key, ConfigurationView, CredentialStore, FileCredentialStore, DEFAULT_BASE_URL,
        KEY_ACCESS_TOKEN, KEY_BASE_URL, KEY_CLIENT_ID, KEY_CLIENT_SECRET, KEY_PASSWORD,
        KEY_TOKEN_EXPIRY, KEY_USERNAME,
    },
    error::CliError,
};

/// Keys whose change makes the cached token meaningless.
const TOKEN_BOUND_KEYS: [&str; 5] = [
    KEY_CLIENT_ID,
    KEY_CLIENT_SECRET,
    KEY_USERNAME,
    KEY_PASSWORD,
    KEY_BASE_URL,
];

/// Accept only absolute http(s) URLs.
pub fn validate_base_url(value: &str) -> Result<String, CliError> {
    let value = value.trim();
    let url = Url::parse(value)
        .map_err(|e| CliError::InvalidArgument(format!("invalid base URL {:?}: {}", value, e)))?;

    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(value.to_string()),
        _ => Err(CliError::InvalidArgument(format!(
            "invalid base URL {:?}: expected an http or https URL",
            value
        ))),
    }
}

/// Store one value. Changing anything the token was issued for drops the
/// cached token.
pub fn set_value<S: CredentialStore + ?Sized>(
    store: &mut S,
    key: &str,
    value: &str,
) -> Result<(), CliError> {
    check_key(key)?;
    let value = if key == KEY_BASE_URL {
        validate_base_url(value)?
    } else {
        value.to_string()
    };

    store.set(key, &value)?;
    if TOKEN_BOUND_KEYS.contains(&key) {
        debug!("{} changed, clearing the cached access token", key);
        store.remove(KEY_ACCESS_TOKEN)?;
        store.remove(KEY_TOKEN_EXPIRY)?;
    }
    Ok(())
}

pub fn get(sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing 'config get' command");

    let key = required(sub_matches, PARAMETER_KEY)?;
    check_key(key)?;

    let store = FileCredentialStore::load_default()?;
    if let Some(value) = store.get(key)? {
        println!("{}", value);
    }
    Ok(())
}

pub fn set(sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing 'config set' command");

    let key = required(sub_matches, PARAMETER_KEY)?;
    let value = required(sub_matches, PARAMETER_VALUE)?;

    let mut store = FileCredentialStore::load_default()?;
    set_value(&mut store, key, value)
}

pub fn list(sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing 'config list' command");

    let format = output_format(sub_matches)?;
    let store = FileCredentialStore::load_default()?;
    let view = ConfigurationView::new(store.get_all()?);

    print_formatted(&view, &format)
}

pub fn path() -> Result<(), CliError> {
    let path = FileCredentialStore::get_default_configuration_file_path()?;
    println!("{}", path.display());
    Ok(())
}

fn prompt_text(message: &str, current: Option<&str>) -> Result<String, CliError> {
    let mut prompt = Text::new(message);
    if let Some(current) = current.filter(|c| !c.is_empty()) {
        prompt = prompt.with_default(current);
    }
    Ok(prompt.prompt()?.trim().to_string())
}

fn prompt_secret(message: &str, current: Option<&str>) -> Result<String, CliError> {
    let mut prompt = Password::new(message)
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked);
    let current = current.filter(|c| !c.is_empty());
    if current.is_some() {
        prompt = prompt.with_help_message("Leave empty to keep the current value");
    }

    let answer = prompt.prompt()?;
    match current {
        Some(current) if answer.is_empty() => Ok(current.to_string()),
        _ => Ok(answer),
    }
}

fn non_empty(name: &str, value: String) -> Result<String, CliError> {
    if value.trim().is_empty() {
        Err(CliError::InvalidArgument(format!("{} must not be empty", name)))
    } else {
        Ok(value)
    }
}

/// Interactive setup. Values given as options are used as is; everything
/// else is prompted for, offering the stored value as the default.
pub fn configure(sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing 'configure' command");

    let mut store = FileCredentialStore::load_default()?;
    let stored_values = store.get_all()?;
    let current = |key: &str| stored_values.get(key).cloned();

    let client_id = match sub_matches.get_one::<String>(PARAMETER_CLIENT_ID) {
        Some(value) => value.clone(),
        None => prompt_text("Client ID:", current(KEY_CLIENT_ID).as_deref())?,
    };
    let client_secret = match sub_matches.get_one::<String>(PARAMETER_CLIENT_SECRET) {
        Some(value) => value.clone(),
        None => prompt_secret("Client secret:", current(KEY_CLIENT_SECRET).as_deref())?,
    };
    let username = match sub_matches.get_one::<String>(PARAMETER_USERNAME) {
        Some(value) => value.clone(),
        None => prompt_text("Username:", current(KEY_USERNAME).as_deref())?,
    };
    let password = match sub_matches.get_one::<String>(PARAMETER_PASSWORD) {
        Some(value) => value.clone(),
        None => prompt_secret("Password:", current(KEY_PASSWORD).as_deref())?,
    };
    let base_url = match sub_matches.get_one::<Url>(PARAMETER_BASE_URL) {
        Some(url) => url.to_string(),
        None => {
            let stored = current(KEY_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
            prompt_text("API base URL:", Some(stored.as_str()))?
        }
    };

    let settings = [
        (KEY_CLIENT_ID, non_empty("client id", client_id)?),
        (KEY_CLIENT_SECRET, non_empty("client secret", client_secret)?),
        (KEY_USERNAME, non_empty("username", username)?),
        (KEY_PASSWORD, non_empty("password", password)?),
        (KEY_BASE_URL, validate_base_url(&base_url)?),
    ];
    for (key, value) in settings.iter() {
        set_value(&mut store, key, value)?;
    }

    println!("Configuration saved to {}", store.path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::MemoryCredentialStore;

    fn store_with_token() -> MemoryCredentialStore {
        MemoryCredentialStore::with_values([
            (KEY_CLIENT_ID, "client"),
            (KEY_ACCESS_TOKEN, "token"),
            (KEY_TOKEN_EXPIRY, "1700000000000"),
        ])
    }

    #[test]
    fn test_changing_credentials_clears_token() {
        let mut store = store_with_token();
        set_value(&mut store, KEY_USERNAME, "julia").unwrap();

        assert_eq!(store.get(KEY_USERNAME).unwrap().as_deref(), Some("julia"));
        assert_eq!(store.get(KEY_ACCESS_TOKEN).unwrap(), None);
        assert_eq!(store.get(KEY_TOKEN_EXPIRY).unwrap(), None);
    }

    #[test]
    fn test_setting_token_keeps_it() {
        let mut store = store_with_token();
        set_value(&mut store, KEY_ACCESS_TOKEN, "other").unwrap();
        assert_eq!(store.get(KEY_ACCESS_TOKEN).unwrap().as_deref(), Some("other"));
        assert_eq!(
            store.get(KEY_TOKEN_EXPIRY).unwrap().as_deref(),
            Some("1700000000000")
        );
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let mut store = MemoryCredentialStore::new();
        assert!(matches!(
            set_value(&mut store, "colour", "red"),
            Err(CliError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_base_url_must_be_http() {
        assert_eq!(
            validate_base_url(" https://pim.example.com/api/rest/v1 ").unwrap(),
            "https://pim.example.com/api/rest/v1"
        );
        assert!(validate_base_url("pim.example.com").is_err());
        assert!(validate_base_url("ftp://pim.example.com").is_err());

        let mut store = MemoryCredentialStore::new();
        assert!(set_value(&mut store, KEY_BASE_URL, "not a url").is_err());
        assert_eq!(store.get(KEY_BASE_URL).unwrap(), None);
    }
}
