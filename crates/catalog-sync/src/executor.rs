//! Search execution with latest-wins response handling.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use catalog_core::search::{FilterState, SearchResult};
use tracing::{debug, info, warn};

use crate::api::{CatalogApi, SearchRequest};

/// Lifecycle of the result area.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No search has run yet.
    #[default]
    Idle,
    /// The latest request is in flight.
    Loading,
    /// The latest request succeeded.
    Loaded,
    /// The latest request failed.
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// What happened to one executed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Applied,
    Failed,
    /// A newer request was issued before this one returned.
    Stale,
}

/// Point-in-time copy of the executor state.
#[derive(Debug, Clone, Default)]
pub struct SearchSnapshot {
    pub state: LoadState,
    pub result: Option<SearchResult>,
    pub last_request: Option<SearchRequest>,
}

/// Runs searches. No caching: every call hits the backend.
///
/// Overlapping calls are allowed. Each call takes a sequence number and
/// only the most recently issued one may change the state.
pub struct SearchExecutor {
    api: Arc<dyn CatalogApi>,
    page_size: u32,
    latest: AtomicU64,
    inner: Mutex<SearchSnapshot>,
}

impl SearchExecutor {
    pub fn new(api: Arc<dyn CatalogApi>, page_size: u32) -> Self {
        Self {
            api,
            page_size,
            latest: AtomicU64::new(0),
            inner: Mutex::new(SearchSnapshot::default()),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn request_for(&self, filter: &FilterState, page: u32) -> SearchRequest {
        SearchRequest::new(filter.clone(), page, self.page_size)
    }

    /// Search `filter` at `page`.
    pub async fn search(&self, filter: &FilterState, page: u32) -> SearchOutcome {
        self.execute(self.request_for(filter, page)).await
    }

    /// Re-run the last issued request.
    pub async fn retry(&self) -> Option<SearchOutcome> {
        let request = self.lock().last_request.clone()?;
        info!("retrying last search");
        Some(self.execute(request).await)
    }

    pub async fn execute(&self, request: SearchRequest) -> SearchOutcome {
        // The sequence is bumped and compared under the state lock, so a
        // stale response cannot slip in between the check and the write.
        let seq = {
            let mut inner = self.lock();
            inner.state = LoadState::Loading;
            inner.last_request = Some(request.clone());
            self.latest.fetch_add(1, Ordering::SeqCst) + 1
        };

        info!(
            seq,
            page = request.page,
            query = %request.filter.query,
            backend = self.api.backend_name(),
            "running search"
        );
        let result = self.api.search(&request).await;

        let mut inner = self.lock();
        if self.latest.load(Ordering::SeqCst) != seq {
            debug!(seq, "discarding stale search response");
            return SearchOutcome::Stale;
        }

        match result {
            Ok(result) => {
                debug!(
                    seq,
                    total = result.pagination.total_count,
                    took_ms = result.processing_time_ms,
                    "search applied"
                );
                inner.result = Some(result);
                inner.state = LoadState::Loaded;
                SearchOutcome::Applied
            }
            Err(err) => {
                warn!(error = %err, "search failed");
                inner.result = None;
                inner.state = LoadState::Failed(err.to_string());
                SearchOutcome::Failed
            }
        }
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.lock().clone()
    }

    pub fn state(&self) -> LoadState {
        self.lock().state.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.is_loading()
    }

    fn lock(&self) -> MutexGuard<'_, SearchSnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryCatalog;
    use catalog_core::search::FilterPatch;
    use pretty_assertions::assert_eq;

    fn executor(catalog: &Arc<InMemoryCatalog>) -> SearchExecutor {
        SearchExecutor::new(catalog.clone(), 20)
    }

    #[tokio::test]
    async fn test_search_applies_result() {
        let catalog = Arc::new(InMemoryCatalog::sample());
        let executor = executor(&catalog);
        assert_eq!(executor.state(), LoadState::Idle);

        let outcome = executor.search(&FilterState::default(), 1).await;
        assert_eq!(outcome, SearchOutcome::Applied);

        let snapshot = executor.snapshot();
        assert_eq!(snapshot.state, LoadState::Loaded);
        assert!(!snapshot.result.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_clears_result_and_retry_recovers() {
        let catalog = Arc::new(InMemoryCatalog::sample());
        let executor = executor(&catalog);
        executor.search(&FilterState::default(), 1).await;

        catalog.set_failing(true);
        let mut filter = FilterState::default();
        filter.apply(FilterPatch::new().query("wachs"));
        assert_eq!(executor.search(&filter, 1).await, SearchOutcome::Failed);

        let snapshot = executor.snapshot();
        assert!(matches!(snapshot.state, LoadState::Failed(_)));
        assert!(snapshot.result.is_none());

        catalog.set_failing(false);
        assert_eq!(executor.retry().await, Some(SearchOutcome::Applied));
        assert_eq!(
            executor.snapshot().last_request.unwrap().filter.query,
            "wachs"
        );
    }

    #[tokio::test]
    async fn test_retry_without_request() {
        let catalog = Arc::new(InMemoryCatalog::sample());
        assert_eq!(executor(&catalog).retry().await, None);
    }

    #[test]
    fn test_request_uses_page_size() {
        let catalog = Arc::new(InMemoryCatalog::sample());
        let request = executor(&catalog).request_for(&FilterState::default(), 3);
        assert_eq!(request.page, 3);
        assert_eq!(request.page_size, 20);
    }
}
