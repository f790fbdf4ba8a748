//! Catalog filter synchronizer.
//!
//! Keeps the product-catalog filter state, the page URL and the displayed
//! results consistent:
//!
//! - [`FilterStore`]: filter state plus browser-style URL history
//! - [`SuggestionFetcher`]: debounced type-ahead, latest response wins
//! - [`SearchExecutor`]: search calls with load state and stale discard
//! - [`ViewModel`]: what the result area shows
//! - [`CatalogPage`]: the controller tying them together
//!
//! Backends implement [`CatalogApi`]. [`HttpCatalogApi`] talks to the REST
//! API; [`InMemoryCatalog`] serves a bundled sample catalog.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use catalog_sync::prelude::*;
//!
//! # async fn run() {
//! let api = Arc::new(InMemoryCatalog::sample());
//! let mut page = CatalogPage::mount(api, SyncConfig::default(), "?q=öl").await;
//!
//! page.update(FilterPatch::new().add_brand("Liqui Moly")).await;
//! assert_eq!(page.url(), "q=%C3%B6l&brand=Liqui+Moly");
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod executor;
pub mod history;
pub mod memory;
pub mod page;
pub mod store;
pub mod suggest;
pub mod view;

pub use api::{CatalogApi, HttpCatalogApi, SearchRequest};
pub use config::SyncConfig;
pub use error::SyncError;
pub use executor::{LoadState, SearchExecutor, SearchOutcome, SearchSnapshot};
pub use history::History;
pub use memory::{ApiCall, InMemoryCatalog};
pub use page::CatalogPage;
pub use store::FilterStore;
pub use suggest::{SuggestionFetcher, Suggestions};
pub use view::{Chip, PageControls, ProductCard, ResultBody, ViewMode, ViewModel};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::api::{CatalogApi, HttpCatalogApi, SearchRequest};
    pub use crate::config::SyncConfig;
    pub use crate::error::SyncError;
    pub use crate::executor::{LoadState, SearchOutcome};
    pub use crate::memory::InMemoryCatalog;
    pub use crate::page::CatalogPage;
    pub use crate::view::{ResultBody, ViewMode, ViewModel};

    pub use catalog_core::prelude::*;
}
