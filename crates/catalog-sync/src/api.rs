//! The catalog backend seam and its HTTP implementation.

use async_trait::async_trait;
use catalog_core::envelope::{ApiResponse, CategoriesData, SuggestionsData};
use catalog_core::search::keys;
use catalog_core::{catalog::Category, search::FilterState, search::SearchResult};
use catalog_data::FetchClient;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::SyncError;

pub const SUGGESTIONS_PATH: &str = "/api/products/suggestions";
pub const SEARCH_PATH: &str = "/api/products/search";
pub const CATEGORIES_PATH: &str = "/api/categories";

/// One search call: the filter plus paging.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub filter: FilterState,
    /// Page number (1-indexed).
    pub page: u32,
    pub page_size: u32,
}

impl SearchRequest {
    pub fn new(filter: FilterState, page: u32, page_size: u32) -> Self {
        Self {
            filter,
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// Query parameters for the search endpoint.
    ///
    /// Filter fields go through the same minimization as the page URL;
    /// `page` and `limit` are always sent.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = self.filter.to_params();
        params.push((keys::PAGE, self.page.to_string()));
        params.push((keys::LIMIT, self.page_size.to_string()));
        params
    }
}

/// Backend operations the catalog page depends on.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Autocomplete strings for a partial query.
    async fn suggestions(&self, query: &str) -> Result<Vec<String>, SyncError>;

    /// One page of matching products with facets.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResult, SyncError>;

    /// Main categories with product counts.
    async fn categories(&self) -> Result<Vec<Category>, SyncError>;

    /// Name of the backend, for logs.
    fn backend_name(&self) -> &'static str;
}

/// [`CatalogApi`] over the REST endpoints.
pub struct HttpCatalogApi {
    client: FetchClient,
}

impl HttpCatalogApi {
    /// `client` must carry the API base URL.
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    async fn get<T, K, V>(&self, path: &str, params: Vec<(K, V)>) -> Result<T, SyncError>
    where
        T: DeserializeOwned,
        K: Into<String>,
        V: Into<String>,
    {
        let envelope: ApiResponse<T> = self
            .client
            .get(path)
            .accept("application/json")
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json()?;

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "success: false".to_string());
            return Err(SyncError::api(path, message));
        }
        envelope
            .into_data()
            .ok_or_else(|| SyncError::api(path, "response without data"))
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn suggestions(&self, query: &str) -> Result<Vec<String>, SyncError> {
        debug!(query, "requesting suggestions");
        let data: SuggestionsData = self
            .get(SUGGESTIONS_PATH, vec![(keys::QUERY, query.to_string())])
            .await?;
        Ok(data.suggestions)
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResult, SyncError> {
        let params = request.params();
        debug!(?params, "requesting search");
        self.get(SEARCH_PATH, params).await
    }

    async fn categories(&self) -> Result<Vec<Category>, SyncError> {
        let data: CategoriesData = self
            .get(
                CATEGORIES_PATH,
                vec![("onlyMain", "true"), ("includeProductCount", "true")],
            )
            .await?;
        Ok(data.categories)
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}
