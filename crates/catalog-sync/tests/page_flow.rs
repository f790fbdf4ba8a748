mod common;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use catalog_core::search::{ActiveFilter, FilterPatch, FilterState, PriceRange};
use catalog_sync::{
    CatalogPage, LoadState, ResultBody, SearchExecutor, SearchOutcome, SyncConfig,
};
use common::{yield_now, ScriptedApi};
use pretty_assertions::assert_eq;
use tokio::time::{sleep, Instant};

async fn mount(api: &Arc<ScriptedApi>, url: &str) -> CatalogPage {
    CatalogPage::mount(api.clone(), SyncConfig::default(), url).await
}

#[tokio::test]
async fn test_removing_brand_chip_runs_one_search() {
    let api = ScriptedApi::new();
    let mut page = mount(&api, "?brand=Liqui+Moly%2CCastrol&category=Motor%C3%B6le").await;
    assert_eq!(api.calls("search").len(), 1);

    let chip = page
        .model()
        .chips
        .into_iter()
        .find(|chip| chip.label == "brand: Liqui Moly")
        .unwrap();
    assert_eq!(chip.filter, ActiveFilter::Brand("Liqui Moly".to_string()));

    assert_eq!(
        page.remove_filter(&chip.filter).await,
        Some(SearchOutcome::Applied)
    );
    assert_eq!(api.calls("search").len(), 2);

    let expected: BTreeSet<String> = ["Castrol".to_string()].into_iter().collect();
    assert_eq!(page.state().brands, expected);
    assert_eq!(page.state().category.as_deref(), Some("Motoröle"));
    assert_eq!(page.url(), "category=Motor%C3%B6le&brand=Castrol");

    if let ResultBody::Products(cards) = page.model().body {
        assert!(cards.iter().all(|card| card.brand == "Castrol"));
    } else {
        panic!("expected products");
    }
}

#[tokio::test(start_paused = true)]
async fn test_selecting_suggestion_searches() {
    let api = ScriptedApi::new();
    let mut page = mount(&api, "").await;

    page.type_query("liqui");
    sleep(Duration::from_millis(310)).await;
    let suggestions = page.suggestions();
    assert!(suggestions.visible);
    assert_eq!(suggestions.items[0], "Liqui Moly");

    let before = Instant::now();
    let outcome = page.select_suggestion(0).await;
    assert_eq!(outcome, Some(SearchOutcome::Applied));
    assert!(Instant::now() - before >= Duration::from_millis(150));

    assert_eq!(page.state().query, "Liqui Moly");
    assert!(!page.suggestions().visible);
    assert_eq!(api.calls("search").len(), 2);
    assert_eq!(api.calls("search")[1].query, "Liqui Moly");
    assert_eq!(page.url(), "q=Liqui+Moly");
}

#[tokio::test(start_paused = true)]
async fn test_keyboard_selection() {
    let api = ScriptedApi::new();
    let mut page = mount(&api, "").await;

    page.type_query("bosch");
    sleep(Duration::from_millis(310)).await;
    assert_eq!(page.highlight_next(), Some(0));

    assert_eq!(page.select_highlighted().await, Some(SearchOutcome::Applied));
    assert_eq!(page.state().query, "Bosch");
}

#[tokio::test]
async fn test_submit_query_trims_input() {
    let api = ScriptedApi::new();
    let mut page = mount(&api, "").await;

    page.type_query("  wachs ");
    assert_eq!(page.submit_query().await, Some(SearchOutcome::Applied));
    assert_eq!(page.url(), "q=wachs");
}

#[tokio::test]
async fn test_back_restores_previous_filters() {
    let api = ScriptedApi::new();
    let mut page = mount(&api, "q=%C3%B6l").await;

    page.update(FilterPatch::new().category("Motoröle")).await;
    page.update(
        FilterPatch::new().price_range(PriceRange::new(10.0, Some(50.0)).unwrap()),
    )
    .await;
    page.go_to_page(2).await;
    assert_eq!(page.store().history().len(), 4);

    assert_eq!(page.back().await, Some(SearchOutcome::Applied));
    assert_eq!(page.page(), 1);
    assert!(page.state().price_range.is_some());

    page.back().await;
    assert_eq!(page.state().price_range, None);
    assert_eq!(page.state().category.as_deref(), Some("Motoröle"));

    page.forward().await;
    assert!(page.state().price_range.is_some());
    assert_eq!(api.calls("search").len(), 7);
}

#[tokio::test]
async fn test_failure_then_retry() {
    let api = ScriptedApi::new();
    let mut page = mount(&api, "").await;

    api.set_failing(true);
    assert_eq!(
        page.update(FilterPatch::new().add_brand("Sonax")).await,
        Some(SearchOutcome::Failed)
    );
    assert!(matches!(page.search_snapshot().state, LoadState::Failed(_)));
    assert!(matches!(page.model().body, ResultBody::Error(_)));

    api.set_failing(false);
    assert_eq!(page.retry().await, Some(SearchOutcome::Applied));
    let snapshot = page.search_snapshot();
    assert_eq!(snapshot.state, LoadState::Loaded);
    assert!(snapshot
        .result
        .unwrap()
        .products
        .iter()
        .all(|p| p.brand == "Sonax"));
}

#[tokio::test(start_paused = true)]
async fn test_stale_search_is_discarded() {
    let api = ScriptedApi::new();
    api.delay("öl", Duration::from_millis(500));
    let executor = Arc::new(SearchExecutor::new(api.clone(), 20));

    let mut slow = FilterState::default();
    slow.apply(FilterPatch::new().query("öl"));
    let mut fast = FilterState::default();
    fast.apply(FilterPatch::new().query("bosch"));

    let slow_task = {
        let executor = Arc::clone(&executor);
        tokio::spawn(async move { executor.search(&slow, 1).await })
    };
    yield_now().await;
    assert!(executor.is_loading());

    assert_eq!(executor.search(&fast, 1).await, SearchOutcome::Applied);
    assert_eq!(slow_task.await.unwrap(), SearchOutcome::Stale);

    let snapshot = executor.snapshot();
    assert_eq!(snapshot.state, LoadState::Loaded);
    assert_eq!(snapshot.last_request.unwrap().filter.query, "bosch");
    assert!(snapshot
        .result
        .unwrap()
        .products
        .iter()
        .all(|p| p.brand == "Bosch"));
}
