//! Debounced type-ahead suggestions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::CatalogApi;
use crate::config::SyncConfig;

/// What the suggestion dropdown currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestions {
    /// Raw text last typed into the search box.
    pub input: String,
    pub items: Vec<String>,
    /// Whether the dropdown is open.
    pub visible: bool,
    /// Keyboard-highlighted entry.
    pub highlighted: Option<usize>,
}

impl Suggestions {
    pub fn highlighted_item(&self) -> Option<&str> {
        self.highlighted
            .and_then(|i| self.items.get(i))
            .map(String::as_str)
    }
}

/// Type-ahead fetcher.
///
/// Each keystroke restarts a trailing-edge timer. When the timer fires the
/// request runs in its own task, so later keystrokes never cancel a call in
/// flight; its response is applied only if no newer input arrived since.
/// Must be used inside a Tokio runtime.
pub struct SuggestionFetcher {
    api: Arc<dyn CatalogApi>,
    debounce: Duration,
    min_len: usize,
    state: Arc<Mutex<Suggestions>>,
    latest: Arc<AtomicU64>,
    /// Debounce timer; resolves to the spawned request task.
    timer: Option<JoinHandle<JoinHandle<()>>>,
}

impl SuggestionFetcher {
    pub fn new(api: Arc<dyn CatalogApi>, config: &SyncConfig) -> Self {
        Self {
            api,
            debounce: config.debounce(),
            min_len: config.min_query_len,
            state: Arc::new(Mutex::new(Suggestions::default())),
            latest: Arc::new(AtomicU64::new(0)),
            timer: None,
        }
    }

    /// Record new search-box text.
    ///
    /// Text shorter than the minimum length (after trimming) clears the
    /// dropdown immediately and issues nothing.
    pub fn input(&mut self, text: &str) {
        self.cancel_timer();

        let query = text.trim().to_string();
        let mut state = lock(&self.state);
        let seq = self.next_seq();
        state.input = text.to_string();

        if query.chars().count() < self.min_len {
            state.items.clear();
            state.visible = false;
            state.highlighted = None;
            return;
        }
        drop(state);

        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let latest = Arc::clone(&self.latest);
        let debounce = self.debounce;

        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            tokio::spawn(fetch(api, state, latest, seq, query))
        }));
    }

    /// Hide the dropdown (outside click or Escape).
    pub fn dismiss(&mut self) {
        let mut state = lock(&self.state);
        state.visible = false;
        state.highlighted = None;
    }

    /// Move the highlight down, wrapping to the top.
    pub fn highlight_next(&mut self) -> Option<usize> {
        self.move_highlight(|current, len| match current {
            Some(i) => (i + 1) % len,
            None => 0,
        })
    }

    /// Move the highlight up, wrapping to the bottom.
    pub fn highlight_prev(&mut self) -> Option<usize> {
        self.move_highlight(|current, len| match current {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        })
    }

    fn move_highlight(&mut self, step: impl Fn(Option<usize>, usize) -> usize) -> Option<usize> {
        let mut state = lock(&self.state);
        if !state.visible || state.items.is_empty() {
            return None;
        }
        let next = step(state.highlighted, state.items.len());
        state.highlighted = Some(next);
        Some(next)
    }

    /// Pick the entry at `index`. Sets it as the input and closes the
    /// dropdown; any pending lookup is cancelled.
    pub fn select(&mut self, index: usize) -> Option<String> {
        let mut state = lock(&self.state);
        let choice = state.items.get(index).cloned()?;
        state.input = choice.clone();
        state.visible = false;
        state.highlighted = None;
        self.next_seq();
        drop(state);

        self.cancel_timer();
        Some(choice)
    }

    /// Pick the highlighted entry (Enter).
    pub fn select_highlighted(&mut self) -> Option<String> {
        let index = lock(&self.state).highlighted?;
        self.select(index)
    }

    pub fn snapshot(&self) -> Suggestions {
        lock(&self.state).clone()
    }

    /// Wait until the pending lookup, if any, has been answered.
    pub async fn settle(&mut self) {
        let Some(timer) = self.timer.take() else {
            return;
        };
        if let Ok(request) = timer.await {
            if let Err(err) = request.await {
                warn!(error = %err, "suggestion task did not complete");
            }
        }
    }

    /// Whether a debounce timer is still waiting.
    pub fn is_pending(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    /// Bump the sequence. Callers hold the state lock, so a response can
    /// never land between the bump and the state change that goes with it.
    fn next_seq(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for SuggestionFetcher {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

async fn fetch(
    api: Arc<dyn CatalogApi>,
    state: Arc<Mutex<Suggestions>>,
    latest: Arc<AtomicU64>,
    seq: u64,
    query: String,
) {
    debug!(seq, query = %query, "fetching suggestions");
    let result = api.suggestions(&query).await;

    let mut state = lock(&state);
    if latest.load(Ordering::SeqCst) != seq {
        debug!(seq, query = %query, "discarding stale suggestions");
        return;
    }

    match result {
        Ok(items) => {
            state.items = items;
            state.highlighted = None;
        }
        Err(err) => {
            warn!(error = %err, query = %query, "suggestion lookup failed");
        }
    }
    state.visible = !state.items.is_empty();
}

fn lock(state: &Mutex<Suggestions>) -> MutexGuard<'_, Suggestions> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
