//! Client for the PIM REST API.
//!
//! Every operation first asks the [`TokenManager`] for a valid token, then
//! issues exactly one request. Failures are translated by
//! [`ApiError::from_status`] regardless of the resource involved; nothing is
//! retried.

use reqwest::Method;
use tracing::{debug, trace};
use url::Url;

use crate::{
    auth::{TokenManager, NOT_CONFIGURED_MESSAGE},
    configuration::CredentialStore,
    error::ApiError,
    http_utils::{HttpClient, HttpRequestConfig},
    model::{
        AttributeListOptions, CategoryListOptions, NewAttribute, NewCategory, NewProduct,
        NewResource, ProductListOptions, Resource, ResourceEnvelope, ResourceKind,
    },
};

/// Build `<base_url>/<collection>[/<identifier>]`, percent-encoding the
/// identifier as a single path segment.
pub fn resource_url(
    base_url: &str,
    kind: ResourceKind,
    identifier: Option<&str>,
) -> Result<Url, ApiError> {
    let invalid = |cause: String| ApiError::Connectivity {
        url: base_url.to_string(),
        cause: format!("invalid base URL: {}", cause),
    };

    let mut url = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| invalid("cannot be used as a base".to_string()))?;
        segments.pop_if_empty().push(kind.path());
        if let Some(identifier) = identifier {
            segments.push(identifier);
        }
    }

    Ok(url)
}

pub struct PimApiClient<S: CredentialStore> {
    http: HttpClient,
    tokens: TokenManager<S>,
}

impl<S: CredentialStore> PimApiClient<S> {
    /// Create a client with default HTTP settings around `store`.
    pub fn new(store: S) -> Result<Self, reqwest::Error> {
        let http = HttpClient::new(HttpRequestConfig::default())?;
        let tokens = TokenManager::new(store, http.clone());
        Ok(Self::with_parts(http, tokens))
    }

    pub fn with_parts(http: HttpClient, tokens: TokenManager<S>) -> Self {
        Self { http, tokens }
    }

    pub fn tokens(&self) -> &TokenManager<S> {
        &self.tokens
    }

    pub fn tokens_mut(&mut self) -> &mut TokenManager<S> {
        &mut self.tokens
    }

    pub async fn list_products(
        &mut self,
        options: &ProductListOptions,
    ) -> Result<Vec<Resource>, ApiError> {
        let query = options.query().map_err(invalid_query)?;
        self.list(ResourceKind::Product, &query).await
    }

    pub async fn get_product(&mut self, identifier: &str) -> Result<Resource, ApiError> {
        self.get(ResourceKind::Product, identifier).await
    }

    pub async fn create_product(&mut self, product: &NewProduct) -> Result<Resource, ApiError> {
        self.create(product).await
    }

    pub async fn list_categories(
        &mut self,
        options: &CategoryListOptions,
    ) -> Result<Vec<Resource>, ApiError> {
        let query = options.query().map_err(invalid_query)?;
        self.list(ResourceKind::Category, &query).await
    }

    pub async fn get_category(&mut self, code: &str) -> Result<Resource, ApiError> {
        self.get(ResourceKind::Category, code).await
    }

    pub async fn create_category(&mut self, category: &NewCategory) -> Result<Resource, ApiError> {
        self.create(category).await
    }

    pub async fn list_attributes(
        &mut self,
        options: &AttributeListOptions,
    ) -> Result<Vec<Resource>, ApiError> {
        let query = options.query().map_err(invalid_query)?;
        self.list(ResourceKind::Attribute, &query).await
    }

    pub async fn get_attribute(&mut self, code: &str) -> Result<Resource, ApiError> {
        self.get(ResourceKind::Attribute, code).await
    }

    pub async fn create_attribute(
        &mut self,
        attribute: &NewAttribute,
    ) -> Result<Resource, ApiError> {
        self.create(attribute).await
    }

    /// Credentials must be complete even when a cached token is still
    /// around. Token first, then the base URL as currently stored.
    async fn prepare(&mut self) -> Result<(String, String), ApiError> {
        if !self.tokens.credentials()?.is_configured() {
            return Err(ApiError::Auth(NOT_CONFIGURED_MESSAGE.to_string()));
        }
        let token = self.tokens.ensure_access_token().await?;
        let base_url = self.tokens.credentials()?.base_url;
        Ok((token, base_url))
    }

    async fn list(
        &mut self,
        kind: ResourceKind,
        query: &[(&'static str, String)],
    ) -> Result<Vec<Resource>, ApiError> {
        let (token, base_url) = self.prepare().await?;
        let url = resource_url(&base_url, kind, None)?;
        debug!("Listing {} from {}", kind.path(), url);
        trace!("Query: {:?}", query);

        let request = self
            .http
            .request(Method::GET, url.as_str(), Some(&token))
            .query(query);
        let envelope: ResourceEnvelope = self.http.execute_json(request, &base_url).await?;

        Ok(envelope.into_items())
    }

    async fn get(&mut self, kind: ResourceKind, identifier: &str) -> Result<Resource, ApiError> {
        let (token, base_url) = self.prepare().await?;
        let url = resource_url(&base_url, kind, Some(identifier))?;
        debug!("Fetching {} {:?} from {}", kind, identifier, url);

        let request = self.http.request(Method::GET, url.as_str(), Some(&token));
        self.http.execute_json(request, &base_url).await
    }

    /// Submit a new resource and echo back its identifying fields. The
    /// created resource is not fetched again.
    async fn create<R: NewResource>(&mut self, resource: &R) -> Result<Resource, ApiError> {
        let (token, base_url) = self.prepare().await?;
        let url = resource_url(&base_url, R::KIND, None)?;
        debug!("Creating {} at {}", R::KIND, url);

        let request = self
            .http
            .request(Method::POST, url.as_str(), Some(&token))
            .json(resource);
        let response = self.http.execute(request, &base_url).await?;
        debug!("Created {} (HTTP {})", R::KIND, response.status);

        Ok(resource.identifying_fields())
    }
}

fn invalid_query(e: serde_json::Error) -> ApiError {
    ApiError::Api {
        status: 0,
        message: format!("failed to encode the search filter: {}", e),
    }
}
