//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use catalog_core::catalog::Category;
use catalog_core::search::SearchResult;
use catalog_sync::{CatalogApi, InMemoryCatalog, SearchRequest, SyncError};
use tokio::time::Instant;

/// A backend call with the (paused) clock time it started at.
#[derive(Debug, Clone)]
pub struct TimedCall {
    pub kind: &'static str,
    pub query: String,
    pub at: Instant,
}

/// Sample catalog with per-query response delays.
///
/// Delays are keyed on the suggestion text or the search query, so tests
/// can make an older request return after a newer one.
pub struct ScriptedApi {
    inner: InMemoryCatalog,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<TimedCall>>,
}

impl ScriptedApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryCatalog::sample(),
            delays: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn delay(&self, query: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(query.to_string(), delay);
    }

    pub fn set_failing(&self, failing: bool) {
        self.inner.set_failing(failing);
    }

    pub fn calls(&self, kind: &str) -> Vec<TimedCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.kind == kind)
            .cloned()
            .collect()
    }

    async fn record(&self, kind: &'static str, query: &str) {
        self.calls.lock().unwrap().push(TimedCall {
            kind,
            query: query.to_string(),
            at: Instant::now(),
        });
        let delay = self.delays.lock().unwrap().get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl CatalogApi for ScriptedApi {
    async fn suggestions(&self, query: &str) -> Result<Vec<String>, SyncError> {
        self.record("suggestions", query).await;
        self.inner.suggestions(query).await
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResult, SyncError> {
        self.record("search", &request.filter.query).await;
        self.inner.search(request).await
    }

    async fn categories(&self) -> Result<Vec<Category>, SyncError> {
        self.record("categories", "").await;
        self.inner.categories().await
    }

    fn backend_name(&self) -> &'static str {
        "scripted"
    }
}

/// Let spawned tasks run without advancing the paused clock.
pub async fn yield_now() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
