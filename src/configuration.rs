//! Persisted configuration and credential storage.
//!
//! The CLI keeps everything it needs between invocations (client credentials,
//! user credentials, the API base URL and the cached access token) in a flat
//! key/value store. The default store is a YAML file in the user's
//! configuration directory; an in-memory store is provided for tests.

use dirs::config_dir;
use std::{
    collections::{BTreeMap, HashMap},
    fs::{self, File},
    io::Write,
    path::PathBuf,
};
use tracing::{debug, trace};

use crate::format::{render_table, to_csv, to_json, Formattable, FormattingError, OutputFormat};

pub const DEFAULT_APPLICATION_ID: &str = "pim-cli";
pub const DEFAULT_CONFIGURATION_FILE_NAME: &str = "config.yml";
pub const CONFIG_DIR_ENV_VAR: &str = "PIM_CLI_CONFIG_DIR";

/// Public demo instance used when no base URL has been configured.
pub const DEFAULT_BASE_URL: &str = "https://demo.akeneo.com/api/rest/v1";

pub const KEY_CLIENT_ID: &str = "clientId";
pub const KEY_CLIENT_SECRET: &str = "clientSecret";
pub const KEY_USERNAME: &str = "username";
pub const KEY_PASSWORD: &str = "password";
pub const KEY_BASE_URL: &str = "baseUrl";
pub const KEY_ACCESS_TOKEN: &str = "accessToken";
pub const KEY_TOKEN_EXPIRY: &str = "tokenExpiry";

/// Every key the store understands, in display order.
pub const KNOWN_KEYS: [&str; 7] = [
    KEY_CLIENT_ID,
    KEY_CLIENT_SECRET,
    KEY_USERNAME,
    KEY_PASSWORD,
    KEY_BASE_URL,
    KEY_ACCESS_TOKEN,
    KEY_TOKEN_EXPIRY,
];

/// Keys whose values must never be echoed back in clear text.
pub const SECRET_KEYS: [&str; 3] = [KEY_CLIENT_SECRET, KEY_PASSWORD, KEY_ACCESS_TOKEN];

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("failed to resolve the configuration directory")]
    FailedToFindConfigurationDirectory,
    #[error("failed to load configuration data, because of: {cause}")]
    FailedToLoadData {
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("failed to write configuration data to file, because of: {cause}")]
    FailedToWriteData {
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("unknown configuration key {name:?}, expected one of: {}", KNOWN_KEYS.join(", "))]
    UnknownKey { name: String },
}

/// A flat, persisted key/value store.
///
/// Implementations must not cache values between calls: every `get` reflects
/// the state written by the most recent `set`, including writes made by
/// another process.
pub trait CredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigurationError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigurationError>;
    fn remove(&mut self, key: &str) -> Result<(), ConfigurationError>;
    fn get_all(&self) -> Result<BTreeMap<String, String>, ConfigurationError>;
}

/// Validate that `key` is one the store knows about.
pub fn check_key(key: &str) -> Result<(), ConfigurationError> {
    if KNOWN_KEYS.contains(&key) {
        Ok(())
    } else {
        Err(ConfigurationError::UnknownKey {
            name: key.to_string(),
        })
    }
}

pub fn is_secret_key(key: &str) -> bool {
    SECRET_KEYS.contains(&key)
}

/// The connection settings read from a store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub base_url: String,
}

impl Credentials {
    /// Read the current credentials. Missing values become empty strings;
    /// a missing base URL falls back to [`DEFAULT_BASE_URL`].
    pub fn load<S: CredentialStore + ?Sized>(store: &S) -> Result<Credentials, ConfigurationError> {
        let values = store.get_all()?;
        let value = |key: &str| values.get(key).cloned().unwrap_or_default();

        let base_url = values
            .get(KEY_BASE_URL)
            .filter(|url| !url.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Credentials {
            client_id: value(KEY_CLIENT_ID),
            client_secret: value(KEY_CLIENT_SECRET),
            username: value(KEY_USERNAME),
            password: value(KEY_PASSWORD),
            base_url,
        })
    }

    /// Authentication is configured iff all four credentials are non-empty.
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty()
            && !self.client_secret.is_empty()
            && !self.username.is_empty()
            && !self.password.is_empty()
    }
}

/// Replace all but the last four characters of a secret.
pub fn mask(value: &str) -> String {
    let count = value.chars().count();
    if count <= 8 {
        "********".to_string()
    } else {
        let tail: String = value.chars().skip(count - 4).collect();
        format!("********{}", tail)
    }
}

/// Printable snapshot of a store with secrets masked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationView {
    values: BTreeMap<String, String>,
}

impl ConfigurationView {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        let values = values
            .into_iter()
            .map(|(key, value)| {
                let value = if is_secret_key(&key) && !value.is_empty() {
                    mask(&value)
                } else {
                    value
                };
                (key, value)
            })
            .collect();
        Self { values }
    }

    /// Rows in the order of [`KNOWN_KEYS`]; unknown keys found in the file
    /// follow alphabetically.
    fn rows(&self) -> Vec<Vec<String>> {
        let known = KNOWN_KEYS
            .iter()
            .filter_map(|key| self.values.get(*key).map(|v| vec![key.to_string(), v.clone()]));
        let unknown = self
            .values
            .iter()
            .filter(|(key, _)| !KNOWN_KEYS.contains(&key.as_str()))
            .map(|(key, value)| vec![key.clone(), value.clone()]);
        known.chain(unknown).collect()
    }
}

impl Formattable for ConfigurationView {
    fn format(&self, f: &OutputFormat) -> Result<String, FormattingError> {
        match f {
            OutputFormat::Json(options) => to_json(&self.values, options.pretty),
            OutputFormat::Csv(options) => {
                to_csv(&["KEY", "VALUE"], &self.rows(), options.with_headers)
            }
            OutputFormat::Table(_) => Ok(render_table(&["KEY", "VALUE"], &self.rows())),
        }
    }
}

/// Credential store backed by a YAML file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    file_path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    pub fn load_default() -> Result<Self, ConfigurationError> {
        let file_path = Self::get_default_configuration_file_path()?;
        debug!("Using configuration file {}", file_path.display());
        Ok(Self::new(file_path))
    }

    pub fn path(&self) -> &PathBuf {
        &self.file_path
    }

    pub fn get_default_configuration_file_path() -> Result<PathBuf, ConfigurationError> {
        if let Ok(config_dir_str) = std::env::var(CONFIG_DIR_ENV_VAR) {
            let mut config_path = PathBuf::from(config_dir_str);
            config_path.push(DEFAULT_CONFIGURATION_FILE_NAME);
            return Ok(config_path);
        }

        match config_dir() {
            Some(configuration_directory) => {
                let mut default_config_file_path = configuration_directory;
                default_config_file_path.push(DEFAULT_APPLICATION_ID);
                default_config_file_path.push(DEFAULT_CONFIGURATION_FILE_NAME);

                Ok(default_config_file_path)
            }
            None => Err(ConfigurationError::FailedToFindConfigurationDirectory),
        }
    }

    fn read(&self) -> Result<BTreeMap<String, String>, ConfigurationError> {
        match fs::read_to_string(&self.file_path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => serde_yaml::from_str(&content)
                .map_err(|cause| ConfigurationError::FailedToLoadData {
                    cause: Box::new(cause),
                }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                trace!("Configuration file {} does not exist yet", self.file_path.display());
                Ok(BTreeMap::new())
            }
            Err(cause) => Err(ConfigurationError::FailedToLoadData {
                cause: Box::new(cause),
            }),
        }
    }

    fn write(&self, values: &BTreeMap<String, String>) -> Result<(), ConfigurationError> {
        // create the parent directory on first write
        match self.file_path.parent() {
            Some(directory) => fs::create_dir_all(directory)
                .map_err(|_| ConfigurationError::FailedToFindConfigurationDirectory)?,
            None => return Err(ConfigurationError::FailedToFindConfigurationDirectory),
        }

        let content = serde_yaml::to_string(values)
            .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })?;

        let mut file = File::create(&self.file_path)
            .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })?;
        restrict_permissions(&file)?;
        file.write_all(content.as_bytes())
            .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })?;

        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(file: &File) -> Result<(), ConfigurationError> {
    use std::os::unix::fs::PermissionsExt;

    // the file holds a password and a bearer token
    file.set_permissions(fs::Permissions::from_mode(0o600))
        .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &File) -> Result<(), ConfigurationError> {
    Ok(())
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigurationError> {
        Ok(self.read()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigurationError> {
        let mut values = self.read()?;
        values.insert(key.to_string(), value.to_string());
        self.write(&values)
    }

    fn remove(&mut self, key: &str) -> Result<(), ConfigurationError> {
        let mut values = self.read()?;
        if values.remove(key).is_some() {
            self.write(&values)?;
        }
        Ok(())
    }

    fn get_all(&self) -> Result<BTreeMap<String, String>, ConfigurationError> {
        self.read()
    }
}

/// Credential store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    values: HashMap<String, String>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigurationError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigurationError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), ConfigurationError> {
        self.values.remove(key);
        Ok(())
    }

    fn get_all(&self) -> Result<BTreeMap<String, String>, ConfigurationError> {
        Ok(self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
