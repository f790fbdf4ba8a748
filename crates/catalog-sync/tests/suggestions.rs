mod common;

use std::time::Duration;

use catalog_sync::{InMemoryCatalog, SuggestionFetcher, SyncConfig};
use common::ScriptedApi;
use pretty_assertions::assert_eq;
use tokio::time::{sleep, Instant};

fn fetcher(api: &std::sync::Arc<ScriptedApi>) -> SuggestionFetcher {
    SuggestionFetcher::new(api.clone(), &SyncConfig::default())
}

#[tokio::test(start_paused = true)]
async fn test_keystrokes_collapse_into_one_request() {
    let api = ScriptedApi::new();
    let mut fetcher = fetcher(&api);

    let mut last_keystroke = Instant::now();
    for text in ["mo", "mot", "moto", "motor", "motorö"] {
        fetcher.input(text);
        last_keystroke = Instant::now();
        sleep(Duration::from_millis(50)).await;
    }
    sleep(Duration::from_millis(500)).await;

    let calls = api.calls("suggestions");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].query, "motorö");

    let waited = calls[0].at - last_keystroke;
    assert!(waited >= Duration::from_millis(300), "fired after {:?}", waited);
    assert!(waited < Duration::from_millis(310), "fired after {:?}", waited);
}

#[tokio::test(start_paused = true)]
async fn test_short_input_never_requests() {
    let api = ScriptedApi::new();
    let mut fetcher = fetcher(&api);

    for text in ["", "m", " m ", "ö"] {
        fetcher.input(text);
        sleep(Duration::from_millis(400)).await;
    }

    assert!(api.calls("suggestions").is_empty());
    let snapshot = fetcher.snapshot();
    assert!(snapshot.items.is_empty());
    assert!(!snapshot.visible);
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_does_not_overwrite_newer() {
    let api = ScriptedApi::new();
    api.delay("öl", Duration::from_millis(500));
    let mut fetcher = fetcher(&api);

    fetcher.input("öl");
    sleep(Duration::from_millis(310)).await;
    // "öl" is now in flight; the newer lookup answers first.
    fetcher.input("motor");
    sleep(Duration::from_millis(1_000)).await;

    assert_eq!(api.calls("suggestions").len(), 2);
    let expected = InMemoryCatalog::sample().suggest("motor");
    assert_eq!(fetcher.snapshot().items, expected);
}

#[tokio::test(start_paused = true)]
async fn test_clearing_input_drops_in_flight_response() {
    let api = ScriptedApi::new();
    api.delay("öl", Duration::from_millis(500));
    let mut fetcher = fetcher(&api);

    fetcher.input("öl");
    sleep(Duration::from_millis(310)).await;
    fetcher.input("");
    sleep(Duration::from_millis(1_000)).await;

    let snapshot = fetcher.snapshot();
    assert!(snapshot.items.is_empty());
    assert!(!snapshot.visible);
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_then_new_results_reopen() {
    let api = ScriptedApi::new();
    let mut fetcher = fetcher(&api);

    fetcher.input("bosch");
    sleep(Duration::from_millis(310)).await;
    assert!(fetcher.snapshot().visible);

    fetcher.dismiss();
    assert!(!fetcher.snapshot().visible);

    fetcher.input("bosch s4");
    sleep(Duration::from_millis(310)).await;
    assert!(fetcher.snapshot().visible);
}

#[tokio::test(start_paused = true)]
async fn test_short_keystroke_cancels_pending_lookup() {
    let api = ScriptedApi::new();
    let mut fetcher = fetcher(&api);

    fetcher.input("mo");
    sleep(Duration::from_millis(100)).await;
    fetcher.input("m");
    assert!(!fetcher.is_pending());
    sleep(Duration::from_millis(500)).await;

    assert!(api.calls("suggestions").is_empty());
    assert!(!fetcher.snapshot().visible);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_clearing_races_in_flight_response() {
    let api = ScriptedApi::new();
    api.delay("öl", Duration::from_millis(2));
    let config = SyncConfig {
        debounce_ms: 1,
        ..SyncConfig::default()
    };
    let mut fetcher = SuggestionFetcher::new(api.clone(), &config);

    for _ in 0..50 {
        fetcher.input("öl");
        sleep(Duration::from_millis(3)).await;
        fetcher.input("");
        sleep(Duration::from_millis(5)).await;

        let snapshot = fetcher.snapshot();
        assert!(snapshot.items.is_empty());
        assert!(!snapshot.visible);
    }
}
