//! Search results, facets and pagination.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::search::query::format_amount;
use crate::search::FilterState;

/// Pagination info as returned by the search endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Total number of matching items.
    pub total_count: u64,
    /// Total number of pages.
    pub total_pages: u32,
}

impl Pagination {
    /// Create pagination info.
    pub fn new(page: u32, page_size: u32, total_count: u64) -> Self {
        let page_size = page_size.max(1);
        let total_pages = if total_count == 0 {
            1
        } else {
            total_count.div_ceil(page_size as u64) as u32
        };

        Self {
            page: page.max(1),
            page_size,
            total_count,
            total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Sliding window of page numbers centered on the current page.
    ///
    /// The window is clamped to `[1, total_pages]` and shifted so it stays
    /// `max_visible` wide whenever there are enough pages.
    pub fn page_numbers(&self, max_visible: usize) -> Vec<u32> {
        if max_visible == 0 || self.total_pages == 0 {
            return Vec::new();
        }
        if self.total_pages as usize <= max_visible {
            return (1..=self.total_pages).collect();
        }

        let width = max_visible as i64;
        let total = self.total_pages as i64;
        let page = (self.page as i64).clamp(1, total);

        let start = (page - width / 2).max(1);
        let end = (start + width - 1).min(total);
        let start = (end - width + 1).max(1);

        (start as u32..=end as u32).collect()
    }

    /// Get start item number (1-indexed).
    pub fn start_item(&self) -> u64 {
        if self.total_count == 0 {
            0
        } else {
            (self.page as u64 - 1) * self.page_size as u64 + 1
        }
    }

    /// Get end item number.
    pub fn end_item(&self) -> u64 {
        (self.page as u64 * self.page_size as u64).min(self.total_count)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 20, 0)
    }
}

/// A price facet bucket. `max = None` is open-ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceBucket {
    pub min: f64,
    #[serde(default)]
    pub max: Option<f64>,
    pub count: u64,
}

impl PriceBucket {
    pub fn label(&self) -> String {
        match self.max {
            Some(max) if self.min <= 0.0 => format!("under {} €", format_amount(max)),
            Some(max) => format!("{} – {} €", format_amount(self.min), format_amount(max)),
            None => format!("over {} €", format_amount(self.min)),
        }
    }
}

/// Facet counts computed by the backend for the current result set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    #[serde(default)]
    pub brand_counts: BTreeMap<String, u64>,
    #[serde(default)]
    pub category_counts: BTreeMap<String, u64>,
    #[serde(default)]
    pub price_buckets: Vec<PriceBucket>,
    #[serde(default)]
    pub feature_counts: BTreeMap<String, u64>,
}

impl Facets {
    /// Brand facet with selection state taken from `filter`.
    pub fn brand_facet(&self, filter: &FilterState) -> Facet {
        Facet::from_counts("Brand", "brand", &self.brand_counts, |value| {
            filter.brands.contains(value)
        })
    }

    /// Category facet with selection state taken from `filter`.
    pub fn category_facet(&self, filter: &FilterState) -> Facet {
        Facet::from_counts("Category", "category", &self.category_counts, |value| {
            filter.category.as_deref() == Some(value)
        })
    }

    /// Feature facet. Features are informational and never selected.
    pub fn feature_facet(&self) -> Facet {
        Facet::from_counts("Features", "feature", &self.feature_counts, |_| false)
    }

    pub fn is_empty(&self) -> bool {
        self.brand_counts.is_empty()
            && self.category_counts.is_empty()
            && self.price_buckets.is_empty()
            && self.feature_counts.is_empty()
    }
}

/// A facet prepared for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    /// Facet name (e.g., "Brand").
    pub name: String,
    /// Query key this facet filters on.
    pub key: String,
    /// Values, highest count first.
    pub values: Vec<FacetValue>,
}

impl Facet {
    fn from_counts(
        name: &str,
        key: &str,
        counts: &BTreeMap<String, u64>,
        is_selected: impl Fn(&str) -> bool,
    ) -> Self {
        let mut values: Vec<FacetValue> = counts
            .iter()
            .map(|(value, count)| FacetValue {
                selected: is_selected(value),
                value: value.clone(),
                count: *count,
            })
            .collect();
        // Stable sort keeps alphabetical order among equal counts.
        values.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            name: name.to_string(),
            key: key.to_string(),
            values,
        }
    }
}

/// A single facet value.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetValue {
    pub value: String,
    pub count: u64,
    pub selected: bool,
}

/// One page of search results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub products: Vec<Product>,
    pub pagination: Pagination,
    #[serde(default)]
    pub facets: Facets,
    #[serde(default)]
    pub processing_time_ms: u64,
}

impl SearchResult {
    /// Create empty results.
    pub fn empty() -> Self {
        Self {
            products: Vec::new(),
            pagination: Pagination::default(),
            facets: Facets::default(),
            processing_time_ms: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }
}

impl Default for SearchResult {
    fn default() -> Self {
        Self::empty()
    }
}
