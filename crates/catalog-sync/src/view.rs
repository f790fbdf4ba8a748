//! Display model for the result area.
//!
//! The model is plain data; terminal or HTML rendering happens elsewhere.

use std::fmt;
use std::str::FromStr;

use catalog_core::catalog::{format_price, Product};
use catalog_core::search::{ActiveFilter, Facet, FilterState, Pagination, PriceBucket};
use serde::{Deserialize, Serialize};

use crate::executor::{LoadState, SearchSnapshot};

/// Number of placeholder cards shown while loading.
pub const SKELETON_CARDS: usize = 6;

/// Grid or list layout. Session-only, never part of the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn toggle(self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grid" => Ok(ViewMode::Grid),
            "list" => Ok(ViewMode::List),
            other => Err(format!("unknown view mode: {}", other)),
        }
    }
}

/// Pagination buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControls {
    pub pages: Vec<u32>,
    pub current: u32,
    pub total_pages: u32,
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

impl PageControls {
    /// `None` when everything fits on one page.
    pub fn from_pagination(pagination: &Pagination, window: usize) -> Option<Self> {
        if pagination.total_pages <= 1 {
            return None;
        }
        Some(Self {
            pages: pagination.page_numbers(window),
            current: pagination.page,
            total_pages: pagination.total_pages,
            prev: pagination.has_prev().then(|| pagination.page - 1),
            next: pagination.has_next().then(|| pagination.page + 1),
        })
    }
}

/// A product prepared for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub price: String,
    /// Struck-through price when discounted.
    pub original_price: Option<String>,
    pub discount_percent: Option<u32>,
    pub stars: String,
    pub rating: f64,
    pub review_count: u32,
    pub in_stock: bool,
    pub shop_url: String,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        let original_price = if product.is_discounted() {
            product.original_price.map(format_price)
        } else {
            None
        };
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            price: format_price(product.price),
            original_price,
            discount_percent: product.discount_percent(),
            stars: stars(product.rating),
            rating: product.rating,
            review_count: product.review_count,
            in_stock: product.in_stock,
            shop_url: product.partner_shop_url.clone(),
        }
    }
}

/// Five-star rating bar. Halves round up to a half star.
pub fn stars(rating: f64) -> String {
    let rating = rating.clamp(0.0, 5.0);
    let full = rating.floor() as usize;
    let half = usize::from(rating - rating.floor() >= 0.5);
    let empty = 5 - full - half;
    format!("{}{}{}", "★".repeat(full), "⯪".repeat(half), "☆".repeat(empty))
}

/// Main content of the result area.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultBody {
    /// Nothing requested yet.
    Idle,
    /// Placeholder cards while loading.
    Skeleton(usize),
    /// Zero matches.
    Empty,
    /// The last search failed.
    Error(String),
    Products(Vec<ProductCard>),
}

/// Removable filter chip.
#[derive(Debug, Clone, PartialEq)]
pub struct Chip {
    pub label: String,
    pub filter: ActiveFilter,
}

/// Everything needed to draw the result area.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub mode: ViewMode,
    pub body: ResultBody,
    pub chips: Vec<Chip>,
    pub facets: Vec<Facet>,
    pub price_buckets: Vec<PriceBucket>,
    pub pages: Option<PageControls>,
    /// "Showing 21–40 of 240", absent unless results are shown.
    pub summary: Option<String>,
}

impl ViewModel {
    pub fn build(
        filter: &FilterState,
        search: &SearchSnapshot,
        mode: ViewMode,
        window: usize,
    ) -> Self {
        let chips = filter
            .active_filters()
            .into_iter()
            .map(|filter| Chip {
                label: filter.label(),
                filter,
            })
            .collect();

        let mut model = Self {
            mode,
            body: ResultBody::Idle,
            chips,
            facets: Vec::new(),
            price_buckets: Vec::new(),
            pages: None,
            summary: None,
        };

        match (&search.state, &search.result) {
            (LoadState::Loading, _) => model.body = ResultBody::Skeleton(SKELETON_CARDS),
            (LoadState::Failed(message), _) => model.body = ResultBody::Error(message.clone()),
            (_, Some(result)) if result.is_empty() => model.body = ResultBody::Empty,
            (_, Some(result)) => {
                let pagination = &result.pagination;
                let cards = result.products.iter().map(ProductCard::from).collect();
                model.body = ResultBody::Products(cards);
                model.pages = PageControls::from_pagination(pagination, window);
                model.summary = Some(format!(
                    "Showing {}–{} of {}",
                    pagination.start_item(),
                    pagination.end_item(),
                    pagination.total_count
                ));
                model.facets = [
                    result.facets.category_facet(filter),
                    result.facets.brand_facet(filter),
                    result.facets.feature_facet(),
                ]
                .into_iter()
                .filter(|facet| !facet.values.is_empty())
                .collect();
                model.price_buckets = result.facets.price_buckets.clone();
            }
            (_, None) => {}
        }
        model
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.body, ResultBody::Skeleton(_))
    }
}
