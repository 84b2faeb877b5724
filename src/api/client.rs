use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::types::{CategoryPayload, CategoryRecord};
use crate::util::{validate_base_url, BaseUrlError};

/// Path of the nested category endpoint, relative to the API base URL.
pub const CATEGORY_TREE_PATH: &str = "categories/tree";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

const MAX_BODY_SIZE: usize = 5 * 1024 * 1024; // 5MB

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Malformed category payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid API base URL: {0}")]
    BaseUrl(#[from] BaseUrlError),
}

/// Anything that can produce the nested category payload.
///
/// The view only depends on this trait, so tests can drive it without a
/// server.
pub trait CategorySource: Send + Sync + 'static {
    fn fetch_category_tree(
        &self,
    ) -> impl Future<Output = Result<Vec<CategoryRecord>, ApiError>> + Send;
}

/// HTTP client for the platform's category endpoint.
pub struct CategoryClient {
    http: reqwest::Client,
    endpoint: Url,
    token: Option<SecretString>,
    timeout: Duration,
    max_body: usize,
}

impl std::fmt::Debug for CategoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CategoryClient {
    /// Create a client for `base_url` (e.g. `https://learn.example.edu/api`).
    ///
    /// Fails if the base URL is not HTTPS (loopback hosts excepted) or the
    /// HTTP client cannot be constructed.
    pub fn new(
        base_url: &str,
        token: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("edutree/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(3))
            .build()?;
        Self::with_http_client(http, base_url, token, timeout)
    }

    pub fn with_http_client(
        http: reqwest::Client,
        base_url: &str,
        token: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base = validate_base_url(base_url)?;
        let endpoint = Url::parse(&format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            CATEGORY_TREE_PATH
        ))
        .map_err(BaseUrlError::from)?;

        tracing::debug!(endpoint = %endpoint, authenticated = token.is_some(), "Category client ready");
        Ok(Self {
            http,
            endpoint,
            token,
            timeout,
            max_body: MAX_BODY_SIZE,
        })
    }

    /// Override the response size cap.
    pub fn with_max_body(mut self, bytes: usize) -> Self {
        self.max_body = bytes;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch and decode the nested category payload.
    ///
    /// No retries: a failed load is reported to the caller, which keeps
    /// whatever tree it already has.
    pub async fn fetch_category_tree(&self) -> Result<Vec<CategoryRecord>, ApiError> {
        let mut request = self
            .http
            .get(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(token) = &self.token {
            tracing::trace!("API authentication configured");
            request = request.bearer_auth(token.expose_secret());
        }

        let started = std::time::Instant::now();
        // One deadline covers both the response head and the body.
        let fetch = async {
            let response = request.send().await.map_err(ApiError::Network)?;

            let status = response.status();
            if !status.is_success() {
                tracing::warn!(status = status.as_u16(), endpoint = %self.endpoint, "Category request rejected");
                return Err(ApiError::HttpStatus(status.as_u16()));
            }

            read_limited_bytes(response, self.max_body).await
        };
        let body = tokio::time::timeout(self.timeout, fetch)
            .await
            .map_err(|_| ApiError::Timeout(self.timeout))??;

        let records = serde_json::from_slice::<CategoryPayload>(&body)?.into_records();
        tracing::debug!(
            roots = records.len(),
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fetched category tree"
        );
        Ok(records)
    }
}

impl CategorySource for CategoryClient {
    fn fetch_category_tree(
        &self,
    ) -> impl Future<Output = Result<Vec<CategoryRecord>, ApiError>> + Send {
        CategoryClient::fetch_category_tree(self)
    }
}

async fn read_limited_bytes(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, ApiError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(ApiError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
