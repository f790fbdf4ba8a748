//! The catalog page controller.
//!
//! Owns the filter store, search executor and suggestion fetcher, and
//! wires user actions to them: every effective filter or page change
//! pushes one history entry and runs exactly one search.

use std::sync::Arc;

use catalog_core::catalog::Category;
use catalog_core::search::{ActiveFilter, FilterPatch, FilterState};
use tracing::{info, warn};

use crate::api::CatalogApi;
use crate::config::SyncConfig;
use crate::executor::{SearchExecutor, SearchOutcome, SearchSnapshot};
use crate::store::FilterStore;
use crate::suggest::{SuggestionFetcher, Suggestions};
use crate::view::{ViewMode, ViewModel};

pub struct CatalogPage {
    config: SyncConfig,
    store: FilterStore,
    executor: SearchExecutor,
    suggestions: SuggestionFetcher,
    categories: Vec<Category>,
    view_mode: ViewMode,
}

impl CatalogPage {
    /// Hydrate from `url` and load categories and the first result page
    /// concurrently.
    pub async fn mount(api: Arc<dyn CatalogApi>, config: SyncConfig, url: &str) -> Self {
        let store = FilterStore::initialize(url);
        let executor = SearchExecutor::new(Arc::clone(&api), config.page_size);
        let suggestions = SuggestionFetcher::new(Arc::clone(&api), &config);

        info!(url = store.url(), backend = api.backend_name(), "mounting catalog page");
        let (categories, _) = futures::join!(
            load_categories(api.as_ref()),
            executor.search(store.state(), store.page())
        );

        Self {
            config,
            store,
            executor,
            suggestions,
            categories,
            view_mode: ViewMode::default(),
        }
    }

    /// Apply a patch. Runs a search only when the filters changed.
    pub async fn update(&mut self, patch: FilterPatch) -> Option<SearchOutcome> {
        if !self.store.update(patch) {
            return None;
        }
        Some(self.search().await)
    }

    /// Remove one chip.
    pub async fn remove_filter(&mut self, filter: &ActiveFilter) -> Option<SearchOutcome> {
        self.update(filter.removal_patch()).await
    }

    /// Drop every filter except the query and sort order.
    pub async fn clear_filters(&mut self) -> Option<SearchOutcome> {
        self.update(FilterPatch::clear_filters()).await
    }

    pub async fn go_to_page(&mut self, page: u32) -> Option<SearchOutcome> {
        if !self.store.set_page(page) {
            return None;
        }
        Some(self.search().await)
    }

    pub async fn back(&mut self) -> Option<SearchOutcome> {
        if !self.store.back() {
            return None;
        }
        Some(self.search().await)
    }

    pub async fn forward(&mut self) -> Option<SearchOutcome> {
        if !self.store.forward() {
            return None;
        }
        Some(self.search().await)
    }

    /// Search-box keystroke. Only feeds the suggestion fetcher.
    pub fn type_query(&mut self, text: &str) {
        self.suggestions.input(text);
    }

    /// Wait for the pending suggestion lookup to be answered.
    pub async fn await_suggestions(&mut self) {
        self.suggestions.settle().await;
    }

    /// Search-box submit: commit the typed text as the query.
    pub async fn submit_query(&mut self) -> Option<SearchOutcome> {
        let text = self.suggestions.snapshot().input;
        self.suggestions.dismiss();
        self.update(FilterPatch::new().query(text.trim())).await
    }

    /// Pick a suggestion: sets the query, closes the dropdown and searches
    /// after the select delay.
    pub async fn select_suggestion(&mut self, index: usize) -> Option<SearchOutcome> {
        let choice = self.suggestions.select(index)?;
        self.commit_suggestion(choice).await
    }

    /// Pick the highlighted suggestion (Enter).
    pub async fn select_highlighted(&mut self) -> Option<SearchOutcome> {
        let choice = self.suggestions.select_highlighted()?;
        self.commit_suggestion(choice).await
    }

    async fn commit_suggestion(&mut self, choice: String) -> Option<SearchOutcome> {
        tokio::time::sleep(self.config.select_delay()).await;
        self.update(FilterPatch::new().query(choice)).await
    }

    pub fn highlight_next(&mut self) -> Option<usize> {
        self.suggestions.highlight_next()
    }

    pub fn highlight_prev(&mut self) -> Option<usize> {
        self.suggestions.highlight_prev()
    }

    pub fn dismiss_suggestions(&mut self) {
        self.suggestions.dismiss();
    }

    /// Re-run the last search after a failure.
    pub async fn retry(&mut self) -> Option<SearchOutcome> {
        self.executor.retry().await
    }

    pub fn toggle_view_mode(&mut self) -> ViewMode {
        self.view_mode = self.view_mode.toggle();
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn model(&self) -> ViewModel {
        ViewModel::build(
            self.store.state(),
            &self.executor.snapshot(),
            self.view_mode,
            self.config.page_window,
        )
    }

    pub fn state(&self) -> &FilterState {
        self.store.state()
    }

    pub fn page(&self) -> u32 {
        self.store.page()
    }

    /// Current URL query string.
    pub fn url(&self) -> &str {
        self.store.url()
    }

    pub fn store(&self) -> &FilterStore {
        &self.store
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn suggestions(&self) -> Suggestions {
        self.suggestions.snapshot()
    }

    pub fn search_snapshot(&self) -> SearchSnapshot {
        self.executor.snapshot()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    async fn search(&self) -> SearchOutcome {
        self.executor
            .search(self.store.state(), self.store.page())
            .await
    }
}

async fn load_categories(api: &dyn CatalogApi) -> Vec<Category> {
    match api.categories().await {
        Ok(categories) => categories,
        Err(err) => {
            warn!(error = %err, "failed to load categories");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::LoadState;
    use crate::memory::InMemoryCatalog;
    use crate::view::ResultBody;
    use catalog_core::search::SortKey;
    use pretty_assertions::assert_eq;

    async fn mount(url: &str) -> (Arc<InMemoryCatalog>, CatalogPage) {
        let catalog = Arc::new(InMemoryCatalog::sample());
        let page = CatalogPage::mount(catalog.clone(), SyncConfig::default(), url).await;
        (catalog, page)
    }

    #[tokio::test]
    async fn test_mount_loads_categories_and_results() {
        let (catalog, page) = mount("?category=Motoröle&page=1").await;

        assert_eq!(page.categories().len(), 6);
        assert_eq!(page.url(), "category=Motor%C3%B6le");
        assert_eq!(page.search_snapshot().state, LoadState::Loaded);
        assert_eq!(catalog.search_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_mount_survives_category_failure() {
        let catalog = Arc::new(InMemoryCatalog::sample());
        catalog.set_failing(true);
        let page = CatalogPage::mount(catalog.clone(), SyncConfig::default(), "").await;

        assert!(page.categories().is_empty());
        assert!(matches!(page.model().body, ResultBody::Error(_)));
    }

    #[tokio::test]
    async fn test_noop_update_runs_no_search() {
        let (catalog, mut page) = mount("sortBy=price").await;
        assert_eq!(page.update(FilterPatch::new().sort(SortKey::Price)).await, None);
        assert_eq!(catalog.search_calls().len(), 1);
        assert_eq!(page.store().history().len(), 1);
    }

    #[tokio::test]
    async fn test_page_change_keeps_filters() {
        let (catalog, mut page) = mount("").await;
        assert_eq!(page.go_to_page(2).await, Some(SearchOutcome::Applied));
        assert_eq!(page.url(), "page=2");
        assert_eq!(catalog.search_calls().last().unwrap().page, 2);

        page.update(FilterPatch::new().in_stock_only(true)).await;
        assert_eq!(page.page(), 1);
        assert_eq!(page.url(), "inStock=true");
    }

    #[tokio::test]
    async fn test_view_mode_is_not_in_url() {
        let (_, mut page) = mount("q=wachs").await;
        assert_eq!(page.toggle_view_mode(), ViewMode::List);
        assert_eq!(page.url(), "q=wachs");
        assert_eq!(page.model().mode, ViewMode::List);
    }
}
