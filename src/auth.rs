//! Access token lifecycle.
//!
//! Tokens are obtained with the OAuth2 password grant and cached in the
//! credential store together with their expiry. A cached token is reused
//! until it expires; refresh is lazy and happens at the start of an API call.

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error, trace, warn};
use url::Url;

use crate::{
    configuration::{
        ConfigurationError, CredentialStore, Credentials, KEY_ACCESS_TOKEN, KEY_TOKEN_EXPIRY,
    },
    error::{ApiError, RemoteError},
    format::{Formattable, FormattingError, OutputFormat},
    http_utils::HttpClient,
};

/// Path suffix of the REST API, removed from the base URL to find the
/// authority that serves the token endpoint.
pub const API_PATH_SUFFIX: &str = "/api/rest/v1";
pub const TOKEN_ENDPOINT_PATH: &str = "/api/oauth/v1/token";

/// Tokens are considered expired this long before the server says so.
pub const EXPIRY_MARGIN_MILLIS: i64 = 60_000;

pub const NOT_CONFIGURED_MESSAGE: &str = "credentials are not configured. \
    Run 'pim configure' to set client id, client secret, username and password";

#[derive(Debug, Serialize)]
struct PasswordGrantRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// The token as persisted in the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at_millis: i64,
}

impl CachedToken {
    pub fn is_valid_at(&self, now_millis: i64) -> bool {
        now_millis < self.expires_at_millis
    }
}

/// What is known about authentication without talking to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenStatus {
    pub configured: bool,
    pub token_cached: bool,
    pub expires_at_millis: Option<i64>,
    /// RFC 3339 rendering of `expires_at_millis`.
    pub expires_at: Option<String>,
    pub valid: bool,
}

/// Milliseconds since the Unix epoch.
pub fn epoch_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// Expiry of a token issued at `issued_at_millis` that the server declared
/// valid for `expires_in_seconds`.
pub fn compute_expiry(issued_at_millis: i64, expires_in_seconds: i64) -> i64 {
    issued_at_millis
        .saturating_add(expires_in_seconds.saturating_mul(1000))
        .saturating_sub(EXPIRY_MARGIN_MILLIS)
}

/// Derive the token endpoint from the configured API base URL.
pub fn auth_endpoint(base_url: &str) -> Result<String, ApiError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let authority = trimmed.strip_suffix(API_PATH_SUFFIX).unwrap_or(trimmed);
    let endpoint = format!("{}{}", authority, TOKEN_ENDPOINT_PATH);

    Url::parse(&endpoint)
        .map(|url| url.to_string())
        .map_err(|e| ApiError::Auth(format!("invalid base URL {:?}: {}", base_url, e)))
}

fn store_error(e: ConfigurationError) -> ApiError {
    ApiError::Auth(format!("cannot access the credential store: {}", e))
}

/// Obtains and caches access tokens.
///
/// The manager owns the credential store but keeps no copy of its values:
/// every call reads the current state.
pub struct TokenManager<S: CredentialStore> {
    store: S,
    http: HttpClient,
    clock: fn() -> i64,
}

impl<S: CredentialStore> TokenManager<S> {
    pub fn new(store: S, http: HttpClient) -> Self {
        Self {
            store,
            http,
            clock: epoch_millis,
        }
    }

    /// Replace the wall clock, mostly useful for tests.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn credentials(&self) -> Result<Credentials, ApiError> {
        Credentials::load(&self.store).map_err(store_error)
    }

    /// The cached token, if one is stored with a readable expiry.
    pub fn cached_token(&self) -> Result<Option<CachedToken>, ApiError> {
        let access_token = self.store.get(KEY_ACCESS_TOKEN).map_err(store_error)?;
        let expiry = self.store.get(KEY_TOKEN_EXPIRY).map_err(store_error)?;

        match (access_token, expiry) {
            (Some(access_token), Some(expiry)) if !access_token.is_empty() => {
                match expiry.trim().parse::<i64>() {
                    Ok(expires_at_millis) => Ok(Some(CachedToken {
                        access_token,
                        expires_at_millis,
                    })),
                    Err(e) => {
                        warn!("Ignoring cached token with unreadable expiry {:?}: {}", expiry, e);
                        Ok(None)
                    }
                }
            }
            _ => Ok(None),
        }
    }

    /// Return a valid access token, exchanging credentials only when the
    /// cached token is missing or expired.
    pub async fn ensure_access_token(&mut self) -> Result<String, ApiError> {
        let now = (self.clock)();

        if let Some(cached) = self.cached_token()? {
            if cached.is_valid_at(now) {
                trace!("Using cached access token, valid until {}", cached.expires_at_millis);
                return Ok(cached.access_token);
            }
            debug!("Cached access token expired at {}", cached.expires_at_millis);
        }

        Ok(self.exchange().await?.access_token)
    }

    /// Authenticate again, replacing the cached token. A failed exchange
    /// leaves the previous token in place.
    pub async fn login(&mut self) -> Result<CachedToken, ApiError> {
        self.exchange().await
    }

    /// Remove the cached token.
    pub fn logout(&mut self) -> Result<(), ApiError> {
        self.store.remove(KEY_ACCESS_TOKEN).map_err(store_error)?;
        self.store.remove(KEY_TOKEN_EXPIRY).map_err(store_error)?;
        Ok(())
    }

    pub fn status(&self) -> Result<TokenStatus, ApiError> {
        let configured = self.credentials()?.is_configured();
        let cached = self.cached_token()?;
        let now = (self.clock)();

        Ok(TokenStatus {
            configured,
            token_cached: cached.is_some(),
            expires_at_millis: cached.as_ref().map(|t| t.expires_at_millis),
            expires_at: cached
                .as_ref()
                .and_then(|t| DateTime::<Utc>::from_timestamp_millis(t.expires_at_millis))
                .map(|t| t.to_rfc3339()),
            valid: cached.map(|t| t.is_valid_at(now)).unwrap_or(false),
        })
    }

    async fn exchange(&mut self) -> Result<CachedToken, ApiError> {
        let credentials = self.credentials()?;
        if !credentials.is_configured() {
            return Err(ApiError::Auth(NOT_CONFIGURED_MESSAGE.to_string()));
        }

        let endpoint = auth_endpoint(&credentials.base_url)?;
        let response = self.request_token(&endpoint, &credentials).await?;

        let token = CachedToken {
            access_token: response.access_token,
            expires_at_millis: compute_expiry((self.clock)(), response.expires_in),
        };

        self.store
            .set(KEY_ACCESS_TOKEN, &token.access_token)
            .map_err(store_error)?;
        self.store
            .set(KEY_TOKEN_EXPIRY, &token.expires_at_millis.to_string())
            .map_err(store_error)?;

        debug!("Cached new access token, valid until {}", token.expires_at_millis);
        Ok(token)
    }

    async fn request_token(
        &self,
        endpoint: &str,
        credentials: &Credentials,
    ) -> Result<TokenResponse, ApiError> {
        debug!("Authenticating with token URL: {}", endpoint);
        debug!("Client ID: {}", &credentials.client_id);

        let body = PasswordGrantRequest {
            grant_type: "password",
            client_id: &credentials.client_id,
            client_secret: &credentials.client_secret,
            username: &credentials.username,
            password: &credentials.password,
        };

        let request = self
            .http
            .request(Method::POST, endpoint, None)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .json(&body);

        let response = self.http.send_sensitive(request, endpoint).await?;

        if response.status.is_success() {
            serde_json::from_str::<TokenResponse>(&response.body).map_err(|e| {
                error!("Unexpected token response: {}", e);
                ApiError::Auth(format!("unexpected response from the token endpoint: {}", e))
            })
        } else {
            error!(
                "Authentication request failed with status {}: {}",
                response.status, &response.body
            );
            Err(ApiError::Auth(format!(
                "HTTP {} {}",
                response.status,
                describe_token_failure(&response.body)
            )))
        }
    }
}

/// Turn a token endpoint error body into a message for the user.
fn describe_token_failure(body: &str) -> String {
    let remote = RemoteError::parse(body);

    let detail = match remote.message() {
        Some(message) => message,
        None if body.trim().is_empty() => return "no details provided".to_string(),
        None => return body.trim().to_string(),
    };

    match serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .as_deref()
    {
        Some("invalid_client") => format!("{}. Please check your client ID and secret.", detail),
        Some("invalid_grant") => format!("{}. Please check your username and password.", detail),
        Some("unauthorized_client") => format!(
            "{}. The client is not authorized to use the password grant.",
            detail
        ),
        _ => detail,
    }
}

impl Formattable for TokenStatus {
    fn format(&self, f: &OutputFormat) -> Result<String, FormattingError> {
        let expires_at = self.expires_at.clone().unwrap_or_default();
        let rows = vec![
            vec!["configured".to_string(), self.configured.to_string()],
            vec!["token_cached".to_string(), self.token_cached.to_string()],
            vec!["expires_at".to_string(), expires_at],
            vec!["valid".to_string(), self.valid.to_string()],
        ];

        match f {
            OutputFormat::Json(options) => crate::format::to_json(self, options.pretty),
            OutputFormat::Csv(options) => {
                crate::format::to_csv(&["FIELD", "VALUE"], &rows, options.with_headers)
            }
            OutputFormat::Table(_) => Ok(crate::format::render_table(&["FIELD", "VALUE"], &rows)),
        }
    }
}
