//! In-process catalog backend.
//!
//! Serves a bundled product list with the same filtering, sorting,
//! faceting and paging rules as the REST API. Used for offline mode and
//! as a test double: every call is recorded, and the backend can be made
//! slow or failing.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use catalog_core::catalog::{Category, Product};
use catalog_core::search::{
    Facets, FilterState, Pagination, PriceBucket, SearchResult, SortKey,
};
use catalog_core::CatalogError;
use serde::Deserialize;
use tracing::warn;

use crate::api::{CatalogApi, SearchRequest};
use crate::error::SyncError;

const SAMPLE_CATALOG: &str = include_str!("../data/sample_catalog.json");

/// Maximum number of suggestions returned per lookup.
pub const MAX_SUGGESTIONS: usize = 8;

/// Price facet boundaries in euros; the last bucket is open-ended.
const PRICE_BUCKETS: [(f64, Option<f64>); 4] = [
    (0.0, Some(25.0)),
    (25.0, Some(50.0)),
    (50.0, Some(100.0)),
    (100.0, None),
];

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Suggestions(String),
    Search(SearchRequest),
    Categories,
}

#[derive(Debug, Deserialize)]
struct CatalogData {
    #[serde(default)]
    categories: Vec<Category>,
    products: Vec<Product>,
}

/// [`CatalogApi`] over an in-memory product list.
#[derive(Debug)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
    categories: Vec<Category>,
    latency: Duration,
    failing: AtomicBool,
    calls: Mutex<Vec<ApiCall>>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<Product>, categories: Vec<Category>) -> Self {
        let categories = categories
            .into_iter()
            .map(|mut category| {
                let count = products.iter().filter(|p| p.category == category.name).count();
                category.product_count = Some(count as u64);
                category
            })
            .collect();

        Self {
            products,
            categories,
            latency: Duration::ZERO,
            failing: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The bundled AutoCare sample catalog.
    pub fn sample() -> Self {
        Self::from_json(SAMPLE_CATALOG).unwrap_or_else(|err| {
            warn!(error = %err, "bundled sample catalog is invalid");
            Self::new(Vec::new(), Vec::new())
        })
    }

    /// Load from `{ "categories": [..], "products": [..] }`.
    pub fn from_json(json: &str) -> Result<Self, SyncError> {
        let data: CatalogData = serde_json::from_str(json).map_err(CatalogError::from)?;
        Ok(Self::new(data.products, data.categories))
    }

    /// Delay every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make every subsequent call fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock_calls().clone()
    }

    pub fn suggestion_calls(&self) -> Vec<String> {
        self.lock_calls()
            .iter()
            .filter_map(|call| match call {
                ApiCall::Suggestions(query) => Some(query.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn search_calls(&self) -> Vec<SearchRequest> {
        self.lock_calls()
            .iter()
            .filter_map(|call| match call {
                ApiCall::Search(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    /// Filter, sort, facet and page the catalog.
    pub fn query(&self, request: &SearchRequest) -> SearchResult {
        let filter = &request.filter;
        let terms = search_terms(&filter.query);

        let mut matches: Vec<(usize, &Product)> = self
            .products
            .iter()
            .enumerate()
            .filter(|(_, product)| matches_filter(product, filter, &terms))
            .collect();

        match filter.sort_key {
            SortKey::Relevance => {
                matches.sort_by_key(|(_, product)| Reverse(relevance(product, &terms)))
            }
            SortKey::Price => matches.sort_by(|(_, a), (_, b)| a.price.total_cmp(&b.price)),
            SortKey::Rating => matches.sort_by(|(_, a), (_, b)| b.rating.total_cmp(&a.rating)),
            SortKey::Newest => matches.sort_by_key(|(index, _)| Reverse(*index)),
            SortKey::Name => matches.sort_by_key(|(_, product)| product.name.to_lowercase()),
        }

        let products: Vec<&Product> = matches.into_iter().map(|(_, product)| product).collect();
        let facets = facets(&products);
        let pagination = Pagination::new(request.page, request.page_size, products.len() as u64);

        let offset = (pagination.page as usize - 1) * pagination.page_size as usize;
        let page = products
            .into_iter()
            .skip(offset)
            .take(pagination.page_size as usize)
            .cloned()
            .collect();

        SearchResult {
            products: page,
            pagination,
            facets,
            processing_time_ms: self.latency.as_millis() as u64,
        }
    }

    /// Names, brands and categories containing `query`, case-insensitive.
    pub fn suggest(&self, query: &str) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let brands = self.products.iter().map(|p| p.brand.as_str());
        let categories = self.categories.iter().map(|c| c.name.as_str());
        let names = self.products.iter().map(|p| p.name.as_str());

        let mut suggestions: Vec<String> = Vec::new();
        for candidate in brands.chain(categories).chain(names) {
            if suggestions.len() == MAX_SUGGESTIONS {
                break;
            }
            if candidate.to_lowercase().contains(&needle)
                && !suggestions.iter().any(|s| s == candidate)
            {
                suggestions.push(candidate.to_string());
            }
        }
        suggestions
    }

    async fn begin(&self, call: ApiCall) -> Result<(), SyncError> {
        self.lock_calls().push(call);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(SyncError::Unavailable(
                "in-memory catalog is set to fail".to_string(),
            ));
        }
        Ok(())
    }

    fn lock_calls(&self) -> MutexGuard<'_, Vec<ApiCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::sample()
    }
}

#[async_trait]
impl CatalogApi for InMemoryCatalog {
    async fn suggestions(&self, query: &str) -> Result<Vec<String>, SyncError> {
        self.begin(ApiCall::Suggestions(query.to_string())).await?;
        Ok(self.suggest(query))
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResult, SyncError> {
        self.begin(ApiCall::Search(request.clone())).await?;
        Ok(self.query(request))
    }

    async fn categories(&self) -> Result<Vec<Category>, SyncError> {
        self.begin(ApiCall::Categories).await?;
        Ok(self.categories.clone())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

fn search_terms(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

fn matches_filter(product: &Product, filter: &FilterState, terms: &[String]) -> bool {
    if !terms.is_empty() {
        let haystack = format!(
            "{} {} {} {}",
            product.name,
            product.brand,
            product.category,
            product.features.join(" ")
        )
        .to_lowercase();
        if !terms.iter().all(|term| haystack.contains(term.as_str())) {
            return false;
        }
    }

    filter
        .category
        .as_ref()
        .map_or(true, |category| product.category.eq_ignore_ascii_case(category))
        && (filter.brands.is_empty() || filter.brands.contains(&product.brand))
        && filter
            .price_range
            .map_or(true, |range| range.contains(product.price))
        && filter
            .min_rating
            .map_or(true, |rating| product.rating >= f64::from(rating))
        && (!filter.in_stock_only || product.in_stock)
}

/// Name hits outrank hits in brand, category or features.
fn relevance(product: &Product, terms: &[String]) -> usize {
    let name = product.name.to_lowercase();
    terms.iter().filter(|term| name.contains(term.as_str())).count()
}

fn facets(products: &[&Product]) -> Facets {
    let mut brand_counts = BTreeMap::new();
    let mut category_counts = BTreeMap::new();
    let mut feature_counts = BTreeMap::new();

    for product in products {
        *brand_counts.entry(product.brand.clone()).or_insert(0) += 1;
        *category_counts.entry(product.category.clone()).or_insert(0) += 1;
        for feature in &product.features {
            *feature_counts.entry(feature.clone()).or_insert(0) += 1;
        }
    }

    let price_buckets = PRICE_BUCKETS
        .iter()
        .map(|&(min, max)| PriceBucket {
            min,
            max,
            count: products
                .iter()
                .filter(|p| p.price >= min && max.map_or(true, |max| p.price < max))
                .count() as u64,
        })
        .filter(|bucket| bucket.count > 0)
        .collect();

    Facets {
        brand_counts,
        category_counts,
        price_buckets,
        feature_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::search::{FilterPatch, PriceRange};
    use pretty_assertions::assert_eq;

    fn request(patch: FilterPatch) -> SearchRequest {
        let mut filter = FilterState::default();
        filter.apply(patch);
        SearchRequest::new(filter, 1, 20)
    }

    fn ids(result: &SearchResult) -> Vec<&str> {
        result.products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_sample_loads_with_counts() {
        let catalog = InMemoryCatalog::sample();
        assert_eq!(catalog.products().len(), 18);
        let motor = catalog
            .categories
            .iter()
            .find(|c| c.name == "Motoröle")
            .unwrap();
        assert_eq!(motor.product_count, Some(5));
    }

    #[test]
    fn test_query_matches_umlauts() {
        let catalog = InMemoryCatalog::sample();
        let result = catalog.query(&request(FilterPatch::new().query("öl")));
        assert!(result.products.iter().any(|p| p.id == "p-6002"));
        assert!(result.products.iter().all(|p| p.category != "Reifen"));
    }

    #[test]
    fn test_combined_filters() {
        let catalog = InMemoryCatalog::sample();
        let result = catalog.query(&request(
            FilterPatch::new()
                .category("Motoröle")
                .brands(["Castrol", "Liqui Moly"])
                .price_range(PriceRange::new(10.0, Some(50.0)).unwrap())
                .in_stock_only(true)
                .sort(SortKey::Price),
        ));
        assert_eq!(ids(&result), vec!["p-1004", "p-1005", "p-1001"]);
        assert_eq!(result.facets.brand_counts.get("Castrol"), Some(&1));
    }

    #[test]
    fn test_min_rating_and_sort_by_rating() {
        let catalog = InMemoryCatalog::sample();
        let result = catalog.query(&request(
            FilterPatch::new().min_rating(4).sort(SortKey::Rating),
        ));
        let ratings: Vec<f64> = result.products.iter().map(|p| p.rating).collect();
        assert!(ratings.iter().all(|r| *r >= 4.0));
        assert!(ratings.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_paging() {
        let catalog = InMemoryCatalog::sample();
        let mut filter = FilterState::default();
        filter.apply(FilterPatch::new().sort(SortKey::Name));

        let page = catalog.query(&SearchRequest::new(filter.clone(), 4, 5));
        assert_eq!(page.pagination.total_pages, 4);
        assert_eq!(page.len(), 3);

        let beyond = catalog.query(&SearchRequest::new(filter, 9, 5));
        assert!(beyond.is_empty());
        assert_eq!(beyond.pagination.total_count, 18);
    }

    #[test]
    fn test_price_buckets() {
        let catalog = InMemoryCatalog::sample();
        let result = catalog.query(&request(FilterPatch::new().category("Batterien")));
        assert_eq!(
            result.facets.price_buckets,
            vec![
                PriceBucket { min: 50.0, max: Some(100.0), count: 1 },
                PriceBucket { min: 100.0, max: None, count: 1 },
            ]
        );
    }

    #[test]
    fn test_suggest() {
        let catalog = InMemoryCatalog::sample();
        let suggestions = catalog.suggest("liqui");
        assert_eq!(suggestions[0], "Liqui Moly");
        assert!(suggestions.len() <= MAX_SUGGESTIONS);
        assert!(catalog.suggest("  ").is_empty());
        assert!(catalog.suggest("zzz").is_empty());
    }

    #[tokio::test]
    async fn test_calls_recorded_and_failure() {
        let catalog = InMemoryCatalog::sample();
        catalog.categories().await.unwrap();
        catalog.set_failing(true);
        assert!(catalog.suggestions("öl").await.is_err());

        assert_eq!(
            catalog.calls(),
            vec![ApiCall::Categories, ApiCall::Suggestions("öl".to_string())]
        );
    }
}
