//! Async HTTP client utilities for the catalog API.
//!
//! Provides a small builder API over `reqwest` with a base URL, default
//! headers, ordered query parameters and JSON decoding.
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_data::FetchClient;
//!
//! let client = FetchClient::new().with_base_url("https://api.autocare.example");
//!
//! let body: serde_json::Value = client
//!     .get("/api/products/suggestions")
//!     .query([("q", "öl")])
//!     .send()
//!     .await?
//!     .error_for_status()?
//!     .json()?;
//! ```

mod error;
mod request;
mod response;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

pub use error::FetchError;
pub use request::{Method, RequestBuilder};
pub use response::Response;

/// Settings for the underlying HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Total request timeout.
    pub timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: concat!("autocare-catalog/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// HTTP client for making outbound requests.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: reqwest::Client,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    /// Create a client with `reqwest` defaults.
    pub fn new() -> Self {
        Self::from_client(reqwest::Client::new())
    }

    /// Create a client with explicit timeout and user agent.
    pub fn with_config(config: &ClientConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::ClientError(e.to_string()))?;
        Ok(Self::from_client(http))
    }

    fn from_client(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: None,
            default_headers: HashMap::new(),
        }
    }

    /// Create a client with a base URL that will be prepended to all requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Get, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                format!("{}{}", base.trim_end_matches('/'), url)
            }
            _ => url,
        };

        let builder = RequestBuilder::new(method, full_url)
            .headers(self.default_headers.clone());

        ClientRequestBuilder {
            client: self,
            builder,
        }
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder<'a> {
    client: &'a FetchClient,
    builder: RequestBuilder,
}

impl ClientRequestBuilder<'_> {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Append query parameters.
    pub fn query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.builder = self.builder.query(pairs);
        self
    }

    /// Set the Accept header.
    pub fn accept(mut self, content_type: impl Into<String>) -> Self {
        self.builder = self.builder.accept(content_type);
        self
    }

    /// The request as built so far.
    pub fn as_builder(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Send the request and read the full response.
    pub async fn send(self) -> Result<Response, FetchError> {
        let url = self.builder.build_url()?;
        let started = Instant::now();

        let mut request = self
            .client
            .http
            .request(self.builder.method.into(), url.clone());
        for (key, value) in &self.builder.headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = Response::read(request.send().await?).await?;

        debug!(
            method = self.builder.method.as_str(),
            url = %url,
            status = response.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetch completed"
        );

        Ok(response)
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{ClientConfig, FetchClient, FetchError, Method, Response};
}
