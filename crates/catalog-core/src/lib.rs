//! Catalog domain types for the AutoCare product catalog.
//!
//! This crate has no I/O. It provides:
//!
//! - **Search**: [`FilterState`], tagged [`FilterPatch`] updates, sort keys,
//!   the query-parameter minimization shared by URL and API requests
//! - **Codec**: lossless query-string encoding of filter state and page
//! - **Results**: products, facets, pagination with a sliding page window
//! - **Envelopes**: the `{ success, data }` API wrapper
//!
//! # Example
//!
//! ```rust
//! use catalog_core::prelude::*;
//!
//! let mut filter = FilterState::default();
//! filter.apply(FilterPatch::new().query("öl").category("Motoröle"));
//!
//! let qs = encode(&filter, 1);
//! assert_eq!(decode(&qs).filter, filter);
//! ```

pub mod catalog;
pub mod envelope;
pub mod error;
pub mod search;

pub use error::CatalogError;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CatalogError;

    pub use crate::catalog::{format_price, Category, Product};
    pub use crate::envelope::{ApiResponse, CategoriesData, SuggestionsData};
    pub use crate::search::{
        decode, encode, ActiveFilter, BrandPatch, CatalogLocation, Facet, FacetValue, Facets,
        FilterPatch, FilterState, Pagination, Patch, PriceBucket, PriceRange, SearchResult,
        SortKey,
    };
}
