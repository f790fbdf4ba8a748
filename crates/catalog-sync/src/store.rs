//! Filter state store with URL history.

use catalog_core::search::{decode, encode, CatalogLocation, FilterPatch, FilterState};
use tracing::debug;

use crate::history::History;

/// Single source of truth for the active filters and page.
///
/// Every effective change is encoded and pushed as a new history entry,
/// so each filter combination can be reached with back/forward.
#[derive(Debug, Clone)]
pub struct FilterStore {
    state: FilterState,
    page: u32,
    history: History,
}

impl FilterStore {
    /// Hydrate from a query string. Unknown keys and malformed numbers are
    /// dropped; the history starts at the canonical encoding.
    pub fn initialize(query_string: &str) -> Self {
        let location = decode(query_string);
        let canonical = location.to_query_string();
        Self {
            state: location.filter,
            page: location.page,
            history: History::new(canonical),
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Current page (1-indexed).
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn location(&self) -> CatalogLocation {
        CatalogLocation::new(self.state.clone(), self.page)
    }

    /// Current URL query string.
    pub fn url(&self) -> &str {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Apply a patch. On change, resets to page 1 and pushes a history
    /// entry. Returns `false` when nothing changed.
    pub fn update(&mut self, patch: FilterPatch) -> bool {
        if !self.state.apply(patch) {
            return false;
        }
        self.page = 1;
        self.push();
        true
    }

    /// Change only the page.
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        if page == self.page {
            return false;
        }
        self.page = page;
        self.push();
        true
    }

    /// Navigate back and re-hydrate from that entry.
    pub fn back(&mut self) -> bool {
        match self.history.back() {
            Some(entry) => {
                let location = decode(entry);
                self.restore(location);
                true
            }
            None => false,
        }
    }

    /// Navigate forward and re-hydrate from that entry.
    pub fn forward(&mut self) -> bool {
        match self.history.forward() {
            Some(entry) => {
                let location = decode(entry);
                self.restore(location);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, location: CatalogLocation) {
        self.state = location.filter;
        self.page = location.page;
        debug!(url = self.history.current(), "restored filters from history");
    }

    fn push(&mut self) {
        let url = encode(&self.state, self.page);
        debug!(url = %url, "pushing history entry");
        self.history.push(url);
    }
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::initialize("")
    }
}
