//! Filter state and tagged partial updates.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::CatalogError;
use crate::search::query::{format_amount, keys, LIST_SEPARATOR};
use crate::search::SortKey;

/// Inclusive price range in euros. `max = None` is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    min: f64,
    max: Option<f64>,
}

impl PriceRange {
    /// Create a range, rejecting `min > max` and non-finite or negative bounds.
    pub fn new(min: f64, max: Option<f64>) -> Result<Self, CatalogError> {
        let invalid = || CatalogError::InvalidPriceRange {
            min: format_amount(min),
            max: max.map(format_amount).unwrap_or_else(|| "∞".to_string()),
        };

        if !is_valid_amount(min) {
            return Err(invalid());
        }
        if let Some(max) = max {
            if !is_valid_amount(max) || min > max {
                return Err(invalid());
            }
        }

        Ok(Self { min, max })
    }

    /// Build a range from optional URL bounds.
    ///
    /// A missing lower bound becomes 0; inverted bounds are swapped.
    pub fn from_bounds(min: Option<f64>, max: Option<f64>) -> Option<Self> {
        match (min, max) {
            (None, None) => None,
            (min, Some(max)) => {
                let min = min.unwrap_or(0.0);
                let (min, max) = if min > max { (max, min) } else { (min, max) };
                Some(Self { min, max: Some(max) })
            }
            (Some(min), None) => Some(Self { min, max: None }),
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Check whether a price falls inside the range.
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && self.max.map_or(true, |max| price <= max)
    }

    pub fn label(&self) -> String {
        match self.max {
            Some(max) => format!("{} – {} €", format_amount(self.min), format_amount(max)),
            None => format!("from {} €", format_amount(self.min)),
        }
    }
}

fn is_valid_amount(amount: f64) -> bool {
    amount.is_finite() && amount >= 0.0
}

/// Active search and filter criteria for the product catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Free-text query.
    pub query: String,
    /// Selected category.
    pub category: Option<String>,
    /// Selected brands (OR).
    pub brands: BTreeSet<String>,
    /// Price range.
    pub price_range: Option<PriceRange>,
    /// Minimum star rating. Values outside 1-5 are passed through unchecked.
    pub min_rating: Option<u8>,
    /// Only show items in stock.
    pub in_stock_only: bool,
    /// Sort order.
    pub sort_key: SortKey,
}

impl FilterState {
    /// Parse recognized query parameters into a filter state.
    ///
    /// Unknown keys are ignored and malformed numbers are dropped. A
    /// repeated `brand` key adds to the set; other keys take the last
    /// well-formed value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut state = FilterState::default();
        let mut price_min = None;
        let mut price_max = None;

        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                keys::QUERY => state.query = value.to_string(),
                keys::CATEGORY => state.category = non_empty(value),
                keys::BRAND => state.brands.extend(split_list(value)),
                keys::PRICE_MIN => {
                    if let Some(amount) = parse_amount(value) {
                        price_min = Some(amount);
                    }
                }
                keys::PRICE_MAX => {
                    if let Some(amount) = parse_amount(value) {
                        price_max = Some(amount);
                    }
                }
                keys::RATING => {
                    if let Ok(rating) = value.trim().parse::<u8>() {
                        state.min_rating = Some(rating);
                    }
                }
                keys::IN_STOCK => state.in_stock_only = parse_flag(value),
                keys::SORT => state.sort_key = value.parse().unwrap_or_default(),
                _ => {}
            }
        }

        state.price_range = PriceRange::from_bounds(price_min, price_max);
        state
    }

    /// Apply a patch. Returns `true` if anything changed.
    pub fn apply(&mut self, patch: FilterPatch) -> bool {
        let before = self.clone();

        match patch.query {
            Patch::Keep => {}
            Patch::Clear => self.query.clear(),
            Patch::Set(query) => self.query = query,
        }
        match patch.category {
            Patch::Keep => {}
            Patch::Clear => self.category = None,
            Patch::Set(category) => self.category = non_empty(&category),
        }
        // Brands that `brand_name` rejects are dropped, so every brand in
        // the set survives a trip through the URL.
        match patch.brands {
            BrandPatch::Keep => {}
            BrandPatch::Clear => self.brands.clear(),
            BrandPatch::Set(brands) => {
                self.brands = brands.iter().filter_map(|b| brand_name(b).ok()).collect()
            }
            BrandPatch::Add(brand) => {
                if let Ok(brand) = brand_name(&brand) {
                    self.brands.insert(brand);
                }
            }
            BrandPatch::Remove(brand) => {
                if let Ok(brand) = brand_name(&brand) {
                    self.brands.remove(&brand);
                }
            }
            BrandPatch::Toggle(brand) => {
                if let Ok(brand) = brand_name(&brand) {
                    if !self.brands.remove(&brand) {
                        self.brands.insert(brand);
                    }
                }
            }
        }
        match patch.price_range {
            Patch::Keep => {}
            Patch::Clear => self.price_range = None,
            Patch::Set(range) => self.price_range = Some(range),
        }
        match patch.min_rating {
            Patch::Keep => {}
            Patch::Clear => self.min_rating = None,
            Patch::Set(rating) => self.min_rating = Some(rating),
        }
        match patch.in_stock_only {
            Patch::Keep => {}
            Patch::Clear => self.in_stock_only = false,
            Patch::Set(flag) => self.in_stock_only = flag,
        }
        match patch.sort_key {
            Patch::Keep => {}
            Patch::Clear => self.sort_key = SortKey::default(),
            Patch::Set(sort) => self.sort_key = sort,
        }

        *self != before
    }

    /// Check if every field is at its default.
    pub fn is_default(&self) -> bool {
        *self == FilterState::default()
    }

    /// Populated filters, one entry per brand.
    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        let mut active = Vec::new();

        if !self.query.is_empty() {
            active.push(ActiveFilter::Query(self.query.clone()));
        }
        if let Some(category) = &self.category {
            active.push(ActiveFilter::Category(category.clone()));
        }
        active.extend(self.brands.iter().cloned().map(ActiveFilter::Brand));
        if let Some(range) = self.price_range {
            active.push(ActiveFilter::PriceRange(range));
        }
        if let Some(rating) = self.min_rating {
            active.push(ActiveFilter::MinRating(rating));
        }
        if self.in_stock_only {
            active.push(ActiveFilter::InStock);
        }

        active
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Normalize a brand name for the filter set.
///
/// Brands are trimmed. Empty names and names containing
/// [`LIST_SEPARATOR`] are rejected, since the URL joins brands with it.
pub fn brand_name(value: &str) -> Result<String, CatalogError> {
    let brand = value.trim();
    if brand.is_empty() || brand.contains(LIST_SEPARATOR) {
        return Err(CatalogError::InvalidParameter {
            key: keys::BRAND.to_string(),
            value: value.to_string(),
        });
    }
    Ok(brand.to_string())
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(LIST_SEPARATOR)
        .filter_map(|brand| brand_name(brand).ok())
}

fn parse_amount(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| is_valid_amount(*amount))
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "true" | "1")
}

/// A single-field update.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    /// Leave the field as it is.
    Keep,
    /// Reset the field to its default.
    Clear,
    /// Replace the field.
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

/// An update to the brand set.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BrandPatch {
    #[default]
    Keep,
    Clear,
    Set(BTreeSet<String>),
    Add(String),
    Remove(String),
    Toggle(String),
}

/// A tagged partial update to a [`FilterState`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterPatch {
    pub query: Patch<String>,
    pub category: Patch<String>,
    pub brands: BrandPatch,
    pub price_range: Patch<PriceRange>,
    pub min_rating: Patch<u8>,
    pub in_stock_only: Patch<bool>,
    pub sort_key: Patch<SortKey>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every filter but keep the text query.
    pub fn clear_filters() -> Self {
        Self {
            query: Patch::Keep,
            category: Patch::Clear,
            brands: BrandPatch::Clear,
            price_range: Patch::Clear,
            min_rating: Patch::Clear,
            in_stock_only: Patch::Clear,
            sort_key: Patch::Keep,
        }
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Patch::Set(query.into());
        self
    }

    pub fn clear_query(mut self) -> Self {
        self.query = Patch::Clear;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Patch::Set(category.into());
        self
    }

    pub fn clear_category(mut self) -> Self {
        self.category = Patch::Clear;
        self
    }

    pub fn brands<I, S>(mut self, brands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.brands = BrandPatch::Set(brands.into_iter().map(Into::into).collect());
        self
    }

    pub fn add_brand(mut self, brand: impl Into<String>) -> Self {
        self.brands = BrandPatch::Add(brand.into());
        self
    }

    pub fn remove_brand(mut self, brand: impl Into<String>) -> Self {
        self.brands = BrandPatch::Remove(brand.into());
        self
    }

    pub fn toggle_brand(mut self, brand: impl Into<String>) -> Self {
        self.brands = BrandPatch::Toggle(brand.into());
        self
    }

    pub fn clear_brands(mut self) -> Self {
        self.brands = BrandPatch::Clear;
        self
    }

    pub fn price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Patch::Set(range);
        self
    }

    pub fn clear_price_range(mut self) -> Self {
        self.price_range = Patch::Clear;
        self
    }

    pub fn min_rating(mut self, rating: u8) -> Self {
        self.min_rating = Patch::Set(rating);
        self
    }

    pub fn clear_min_rating(mut self) -> Self {
        self.min_rating = Patch::Clear;
        self
    }

    pub fn in_stock_only(mut self, flag: bool) -> Self {
        self.in_stock_only = Patch::Set(flag);
        self
    }

    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort_key = Patch::Set(sort);
        self
    }

    /// Check if the patch leaves every field untouched.
    pub fn is_empty(&self) -> bool {
        *self == FilterPatch::default()
    }
}

/// One removable filter chip.
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveFilter {
    Query(String),
    Category(String),
    Brand(String),
    PriceRange(PriceRange),
    MinRating(u8),
    InStock,
}

impl ActiveFilter {
    pub fn label(&self) -> String {
        match self {
            ActiveFilter::Query(q) => format!("search: {}", q),
            ActiveFilter::Category(c) => format!("category: {}", c),
            ActiveFilter::Brand(b) => format!("brand: {}", b),
            ActiveFilter::PriceRange(r) => format!("price: {}", r.label()),
            ActiveFilter::MinRating(r) => format!("rating: {}+ stars", r),
            ActiveFilter::InStock => "in stock only".to_string(),
        }
    }

    /// The patch that removes exactly this filter.
    pub fn removal_patch(&self) -> FilterPatch {
        let patch = FilterPatch::new();
        match self {
            ActiveFilter::Query(_) => patch.clear_query(),
            ActiveFilter::Category(_) => patch.clear_category(),
            ActiveFilter::Brand(b) => patch.remove_brand(b.clone()),
            ActiveFilter::PriceRange(_) => patch.clear_price_range(),
            ActiveFilter::MinRating(_) => patch.clear_min_rating(),
            ActiveFilter::InStock => FilterPatch {
                in_stock_only: Patch::Clear,
                ..patch
            },
        }
    }
}
