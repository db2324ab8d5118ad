use reqwest::StatusCode;
use serde::Deserialize;
use strum::Display;
use thiserror::Error;

use crate::exit_codes::PimExitCode;

/// The kind of failure reported by the token manager or the API gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ApiErrorKind {
    #[strum(serialize = "AuthError")]
    Auth,
    #[strum(serialize = "PermissionError")]
    Permission,
    #[strum(serialize = "NotFoundError")]
    NotFound,
    #[strum(serialize = "ValidationError")]
    Validation,
    #[strum(serialize = "RateLimitError")]
    RateLimit,
    #[strum(serialize = "ConnectivityError")]
    Connectivity,
    #[strum(serialize = "ApiError")]
    Api,
}

/// Error emitted by the PIM API client and the token manager
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Permission denied: {0}")]
    Permission(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),
    #[error("Cannot reach {url}: {cause}")]
    Connectivity { url: String, cause: String },
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
}

impl ApiError {
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Auth(_) => ApiErrorKind::Auth,
            ApiError::Permission(_) => ApiErrorKind::Permission,
            ApiError::NotFound(_) => ApiErrorKind::NotFound,
            ApiError::Validation(_) => ApiErrorKind::Validation,
            ApiError::RateLimit(_) => ApiErrorKind::RateLimit,
            ApiError::Connectivity { .. } => ApiErrorKind::Connectivity,
            ApiError::Api { .. } => ApiErrorKind::Api,
        }
    }

    /// No response was received from `url`.
    pub fn connectivity(url: &str, cause: &reqwest::Error) -> ApiError {
        ApiError::Connectivity {
            url: url.to_string(),
            cause: cause.to_string(),
        }
    }

    /// Translate a non-successful HTTP response into an error.
    ///
    /// This is the only place where status codes are interpreted; every
    /// resource operation funnels its failures through here.
    pub fn from_status(status: StatusCode, body: &str) -> ApiError {
        let remote = RemoteError::parse(body);

        match status {
            StatusCode::UNAUTHORIZED => ApiError::Auth(format!(
                "{}. Run 'pim configure' to update your credentials.",
                remote
                    .message()
                    .unwrap_or_else(|| "credentials rejected or access token invalid".to_string())
                    .trim_end_matches('.')
            )),
            StatusCode::FORBIDDEN => ApiError::Permission(
                remote
                    .message()
                    .unwrap_or_else(|| "insufficient rights for this operation".to_string()),
            ),
            StatusCode::NOT_FOUND => ApiError::NotFound(
                remote
                    .message()
                    .unwrap_or_else(|| "the requested resource does not exist".to_string()),
            ),
            StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::Validation(remote.validation_detail(body))
            }
            StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimit(
                "too many requests, wait a moment before trying again".to_string(),
            ),
            _ => ApiError::Api {
                status: status.as_u16(),
                message: remote.message().unwrap_or_else(|| {
                    if body.trim().is_empty() {
                        status
                            .canonical_reason()
                            .unwrap_or("unexpected response")
                            .to_string()
                    } else {
                        body.trim().to_string()
                    }
                }),
            },
        }
    }
}

/// Error body as returned by the remote API and its OAuth endpoint.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RemoteError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    errors: Vec<RemoteFieldError>,
}

#[derive(Debug, Default, Deserialize)]
struct RemoteFieldError {
    #[serde(default)]
    property: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl RemoteError {
    pub(crate) fn parse(body: &str) -> RemoteError {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// The most specific human readable message in the body, if any.
    pub(crate) fn message(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.error_description.clone())
            .or_else(|| self.error.clone())
            .filter(|m| !m.trim().is_empty())
    }

    fn validation_detail(&self, body: &str) -> String {
        let details: Vec<String> = self
            .errors
            .iter()
            .filter_map(|e| match (&e.property, &e.message) {
                (Some(property), Some(message)) => Some(format!("{}: {}", property, message)),
                (None, Some(message)) => Some(message.clone()),
                _ => None,
            })
            .collect();

        let headline = self.message().unwrap_or_else(|| {
            if details.is_empty() && !body.trim().is_empty() {
                body.trim().to_string()
            } else {
                "the request was rejected".to_string()
            }
        });

        if details.is_empty() {
            headline
        } else {
            format!("{} {}", headline, details.join("; "))
        }
    }
}

/// Error types that can occur during CLI command execution
#[derive(Debug, Error)]
pub enum CliError {
    /// Error when an unsupported or undefined subcommand is encountered
    #[error("Undefined or unsupported subcommand: {0}")]
    UnsupportedSubcommand(String),
    /// Error when a required command-line argument is missing
    #[error("Missing required argument: {0}")]
    MissingRequiredArgument(String),
    /// Error when a command-line argument has an unusable value
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Error related to the configuration file
    #[error("Configuration error: {0}")]
    ConfigurationError(#[from] crate::configuration::ConfigurationError),
    /// Error related to data formatting
    #[error("Formatting error: {0}")]
    FormattingError(#[from] crate::format::FormattingError),
    #[error("{0}")]
    ApiError(#[from] ApiError),
    /// Error related to JSON serialization/deserialization
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    /// Error raised by an interactive prompt (e.g. cancelled with Ctrl-C)
    #[error("Prompt error: {0}")]
    PromptError(#[from] inquire::InquireError),
    /// The HTTP client could not be set up
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

impl CliError {
    /// The failure kind, for errors raised by the token manager or the API.
    pub fn api_error_kind(&self) -> Option<ApiErrorKind> {
        match self {
            CliError::ApiError(e) => Some(e.kind()),
            _ => None,
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> PimExitCode {
        match self {
            CliError::UnsupportedSubcommand(_) => PimExitCode::UsageError,
            CliError::MissingRequiredArgument(_) => PimExitCode::UsageError,
            CliError::InvalidArgument(_) => PimExitCode::UsageError,
            CliError::ConfigurationError(_) => PimExitCode::ConfigError,
            CliError::FormattingError(_) => PimExitCode::DataError,
            CliError::JsonError(_) => PimExitCode::DataError,
            CliError::ApiError(e) => match e.kind() {
                ApiErrorKind::Auth => PimExitCode::AuthError,
                ApiErrorKind::Permission => PimExitCode::NoPermission,
                ApiErrorKind::NotFound => PimExitCode::NotFound,
                ApiErrorKind::Validation => PimExitCode::ApiError,
                ApiErrorKind::RateLimit => PimExitCode::TempFail,
                ApiErrorKind::Connectivity => PimExitCode::NetworkError,
                ApiErrorKind::Api => PimExitCode::ApiError,
            },
            CliError::PromptError(_) => PimExitCode::SoftwareError,
            CliError::HttpClientError(_) => PimExitCode::SoftwareError,
        }
    }
}
