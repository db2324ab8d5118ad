//! HTTP utilities for the pim CLI client.
//!
//! Both the token manager and the resource gateway go through [`HttpClient`],
//! so default headers, timeouts and the "no response received" translation
//! live in one place.

use reqwest::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, RequestBuilder, StatusCode,
};
use serde::de::DeserializeOwned;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tracing::{debug, error, trace};

use crate::error::ApiError;

pub const APPLICATION_JSON: &str = "application/json";

/// Configuration for HTTP requests with common settings
#[derive(Debug, Clone)]
pub struct HttpRequestConfig {
    /// Default headers to include with all requests
    pub default_headers: HashMap<String, String>,
    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for HttpRequestConfig {
    fn default() -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert(
            "User-Agent".to_string(),
            format!("pim-cli/{}", env!("CARGO_PKG_VERSION")),
        );

        Self {
            default_headers,
            timeout: 60,
        }
    }
}

/// A response that made it back from the server, whatever its status.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// HTTP client wrapper with common request handling logic
#[derive(Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    config: HttpRequestConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpRequestConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }

    /// Start a JSON request, optionally authenticated with a bearer token.
    pub fn request(&self, method: Method, url: &str, bearer: Option<&str>) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(ACCEPT, APPLICATION_JSON);

        for (key, value) in &self.config.default_headers {
            request = request.header(key, value);
        }

        if let Some(token) = bearer {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        request
    }

    /// Send a request and collect status and body.
    ///
    /// Only a request that got no response at all fails here; it is reported
    /// as [`ApiError::Connectivity`] naming `target`.
    pub async fn send(
        &self,
        request: RequestBuilder,
        target: &str,
    ) -> Result<RawResponse, ApiError> {
        let response = self.receive(request, target).await?;
        trace!("Raw response body: {}", response.body);
        Ok(response)
    }

    /// Like [`HttpClient::send`], for responses that carry credentials. The
    /// body is never written to the log, only its length.
    pub async fn send_sensitive(
        &self,
        request: RequestBuilder,
        target: &str,
    ) -> Result<RawResponse, ApiError> {
        let response = self.receive(request, target).await?;
        trace!("Response body withheld from the log ({} bytes)", response.body.len());
        Ok(response)
    }

    async fn receive(
        &self,
        request: RequestBuilder,
        target: &str,
    ) -> Result<RawResponse, ApiError> {
        let response = request.send().await.map_err(|e| {
            debug!("No response from {}: {}", target, e);
            ApiError::connectivity(target, &e)
        })?;

        let status = response.status();
        debug!("Response status: {}", status);

        let body = response.text().await.map_err(|e| ApiError::Api {
            status: status.as_u16(),
            message: format!("failed to read response body: {}", e),
        })?;

        Ok(RawResponse { status, body })
    }

    /// Send a request and decode a successful JSON response.
    ///
    /// Non-successful statuses are translated by [`ApiError::from_status`].
    pub async fn execute_json<T>(
        &self,
        request: RequestBuilder,
        target: &str,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.execute(request, target).await?;

        serde_json::from_str::<T>(&response.body).map_err(|e| {
            error!(
                "Failed to deserialize response ({} bytes): {}",
                response.body.len(),
                e
            );
            ApiError::Api {
                status: response.status.as_u16(),
                message: format!("unexpected response body: {}", e),
            }
        })
    }

    /// Send a request whose successful response body is not needed.
    pub async fn execute(
        &self,
        request: RequestBuilder,
        target: &str,
    ) -> Result<RawResponse, ApiError> {
        let response = self.send(request, target).await?;

        if response.status.is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_status(response.status, &response.body))
        }
    }
}
