//! Search module.
//!
//! Filter state, query-parameter construction, the URL codec, and result
//! types with facets and pagination.

pub mod codec;
mod filter;
mod query;
mod results;

pub use codec::{decode, encode, CatalogLocation};
pub use filter::{brand_name, ActiveFilter, BrandPatch, FilterPatch, FilterState, Patch, PriceRange};
pub use query::{format_amount, keys, SortKey, LIST_SEPARATOR};
pub use results::{Facet, FacetValue, Facets, Pagination, PriceBucket, SearchResult};
