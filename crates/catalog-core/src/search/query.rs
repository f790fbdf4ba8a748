//! Sort keys and query-parameter construction.
//!
//! [`FilterState::to_params`] is the single place that decides which
//! fields are at their default and can be left out. Both the URL codec
//! and the search request builder go through it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::search::FilterState;

/// Query parameter keys, in the order they are emitted.
pub mod keys {
    pub const QUERY: &str = "q";
    pub const CATEGORY: &str = "category";
    pub const BRAND: &str = "brand";
    pub const PRICE_MIN: &str = "priceMin";
    pub const PRICE_MAX: &str = "priceMax";
    pub const RATING: &str = "rating";
    pub const IN_STOCK: &str = "inStock";
    pub const SORT: &str = "sortBy";
    pub const PAGE: &str = "page";
    pub const LIMIT: &str = "limit";
}

/// Separator for multi-valued parameters (`brand=Castrol,Liqui Moly`).
pub const LIST_SEPARATOR: char = ',';

/// Sort options for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Backend relevance ranking.
    #[default]
    Relevance,
    /// Price, low to high.
    Price,
    /// Highest rated first.
    Rating,
    /// Newest first.
    Newest,
    /// Name A-Z.
    Name,
}

impl SortKey {
    /// All sort keys in display order.
    pub const ALL: [SortKey; 5] = [
        SortKey::Relevance,
        SortKey::Price,
        SortKey::Rating,
        SortKey::Newest,
        SortKey::Name,
    ];

    /// Wire representation used in URLs and API requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Relevance => "relevance",
            SortKey::Price => "price",
            SortKey::Rating => "rating",
            SortKey::Newest => "newest",
            SortKey::Name => "name",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortKey::Relevance => "Relevance",
            SortKey::Price => "Price: Low to High",
            SortKey::Rating => "Highest Rated",
            SortKey::Newest => "Newest",
            SortKey::Name => "Name: A-Z",
        }
    }

    pub fn is_default(&self) -> bool {
        *self == SortKey::Relevance
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relevance" => Ok(SortKey::Relevance),
            "price" => Ok(SortKey::Price),
            "rating" => Ok(SortKey::Rating),
            "newest" => Ok(SortKey::Newest),
            "name" => Ok(SortKey::Name),
            _ => Err(CatalogError::InvalidSortKey(s.to_string())),
        }
    }
}

/// Format a price bound without a trailing `.0` (`10`, `12.5`).
pub fn format_amount(amount: f64) -> String {
    format!("{}", amount)
}

impl FilterState {
    /// Non-default fields as ordered `(key, value)` pairs.
    ///
    /// Empty query, empty brand set, unset optionals, `inStock=false` and
    /// `sortBy=relevance` are omitted.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if !self.query.is_empty() {
            params.push((keys::QUERY, self.query.clone()));
        }
        if let Some(category) = &self.category {
            params.push((keys::CATEGORY, category.clone()));
        }
        if !self.brands.is_empty() {
            let joined = self
                .brands
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(&LIST_SEPARATOR.to_string());
            params.push((keys::BRAND, joined));
        }
        if let Some(range) = &self.price_range {
            params.push((keys::PRICE_MIN, format_amount(range.min())));
            if let Some(max) = range.max() {
                params.push((keys::PRICE_MAX, format_amount(max)));
            }
        }
        if let Some(rating) = self.min_rating {
            params.push((keys::RATING, rating.to_string()));
        }
        if self.in_stock_only {
            params.push((keys::IN_STOCK, "true".to_string()));
        }
        if !self.sort_key.is_default() {
            params.push((keys::SORT, self.sort_key.as_str().to_string()));
        }

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::PriceRange;

    #[test]
    fn test_default_state_has_no_params() {
        assert!(FilterState::default().to_params().is_empty());
    }

    #[test]
    fn test_params_for_motor_oil_search() {
        let state = FilterState {
            query: "öl".to_string(),
            category: Some("Motoröle".to_string()),
            price_range: Some(PriceRange::new(10.0, Some(50.0)).unwrap()),
            ..Default::default()
        };

        let params = state.to_params();
        assert_eq!(
            params,
            vec![
                ("q", "öl".to_string()),
                ("category", "Motoröle".to_string()),
                ("priceMin", "10".to_string()),
                ("priceMax", "50".to_string()),
            ]
        );
        let keys: Vec<_> = params.iter().map(|(k, _)| *k).collect();
        assert!(!keys.contains(&"brand"));
        assert!(!keys.contains(&"rating"));
        assert!(!keys.contains(&"inStock"));
        assert!(!keys.contains(&"sortBy"));
    }

    #[test]
    fn test_brands_joined_sorted() {
        let mut state = FilterState::default();
        state.brands.insert("Mannol".to_string());
        state.brands.insert("Castrol".to_string());

        assert_eq!(
            state.to_params(),
            vec![("brand", "Castrol,Mannol".to_string())]
        );
    }

    #[test]
    fn test_non_default_sort_and_flags() {
        let state = FilterState {
            min_rating: Some(4),
            in_stock_only: true,
            sort_key: SortKey::Price,
            ..Default::default()
        };

        assert_eq!(
            state.to_params(),
            vec![
                ("rating", "4".to_string()),
                ("inStock", "true".to_string()),
                ("sortBy", "price".to_string()),
            ]
        );
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("rating".parse::<SortKey>().unwrap(), SortKey::Rating);
        assert_eq!(" NAME ".parse::<SortKey>().unwrap(), SortKey::Name);
        assert!("cheapest".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(10.0), "10");
        assert_eq!(format_amount(12.5), "12.5");
    }
}
