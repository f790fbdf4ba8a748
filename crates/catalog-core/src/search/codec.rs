//! URL query-string codec for the catalog page.
//!
//! Keeps the address bar in sync with the filter state so a result page
//! can be bookmarked, shared, and restored from history.

use url::form_urlencoded;

use crate::search::query::keys;
use crate::search::FilterState;

/// Everything the catalog URL carries: the filter state and the page.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogLocation {
    pub filter: FilterState,
    /// Current page (1-indexed). Not part of the filter state.
    pub page: u32,
}

impl CatalogLocation {
    pub fn new(filter: FilterState, page: u32) -> Self {
        Self {
            filter,
            page: page.max(1),
        }
    }

    /// Encode as a query string (without leading `?`).
    pub fn to_query_string(&self) -> String {
        encode(&self.filter, self.page)
    }
}

impl Default for CatalogLocation {
    fn default() -> Self {
        Self::new(FilterState::default(), 1)
    }
}

/// Encode a filter state and page as a minimal query string.
///
/// Default-valued fields and `page=1` are omitted.
pub fn encode(filter: &FilterState, page: u32) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in filter.to_params() {
        serializer.append_pair(key, &value);
    }
    if page > 1 {
        serializer.append_pair(keys::PAGE, &page.to_string());
    }
    serializer.finish()
}

/// Decode a query string. A leading `?` is accepted.
pub fn decode(query_string: &str) -> CatalogLocation {
    let input = query_string.strip_prefix('?').unwrap_or(query_string);
    let pairs: Vec<(String, String)> = form_urlencoded::parse(input.as_bytes())
        .into_owned()
        .collect();

    let page = pairs
        .iter()
        .rev()
        .find(|(key, _)| key == keys::PAGE)
        .and_then(|(_, value)| value.trim().parse::<u32>().ok())
        .unwrap_or(1);

    CatalogLocation::new(FilterState::from_pairs(pairs), page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{PriceRange, SortKey};
    use pretty_assertions::assert_eq;

    fn full_state() -> FilterState {
        FilterState {
            query: "öl 5w-30".to_string(),
            category: Some("Motoröle".to_string()),
            brands: ["Liqui Moly", "Castrol"].iter().map(|s| s.to_string()).collect(),
            price_range: Some(PriceRange::new(10.0, Some(49.99)).unwrap()),
            min_rating: Some(4),
            in_stock_only: true,
            sort_key: SortKey::Newest,
        }
    }

    #[test]
    fn test_encode_default_is_empty() {
        assert_eq!(encode(&FilterState::default(), 1), "");
    }

    #[test]
    fn test_encode_key_order_and_escaping() {
        let encoded = encode(&full_state(), 3);
        assert_eq!(
            encoded,
            "q=%C3%B6l+5w-30&category=Motor%C3%B6le&brand=Castrol%2CLiqui+Moly\
             &priceMin=10&priceMax=49.99&rating=4&inStock=true&sortBy=newest&page=3"
        );
    }

    #[test]
    fn test_round_trip_full_state() {
        let state = full_state();
        let location = decode(&encode(&state, 3));
        assert_eq!(location.filter, state);
        assert_eq!(location.page, 3);
    }

    #[test]
    fn test_round_trip_partial_states() {
        let states = vec![
            FilterState::default(),
            FilterState {
                query: "wischerblätter".to_string(),
                ..Default::default()
            },
            FilterState {
                price_range: Some(PriceRange::new(0.0, Some(20.0)).unwrap()),
                ..Default::default()
            },
            FilterState {
                price_range: Some(PriceRange::new(100.0, None).unwrap()),
                sort_key: SortKey::Name,
                ..Default::default()
            },
            FilterState {
                min_rating: Some(6),
                ..Default::default()
            },
        ];

        for state in states {
            assert_eq!(decode(&encode(&state, 1)).filter, state);
        }
    }

    #[test]
    fn test_decode_leading_question_mark_and_page() {
        let location = decode("?q=reifen&page=4");
        assert_eq!(location.filter.query, "reifen");
        assert_eq!(location.page, 4);
    }

    #[test]
    fn test_decode_invalid_page_defaults_to_first() {
        assert_eq!(decode("page=zero").page, 1);
        assert_eq!(decode("page=0").page, 1);
        assert_eq!(decode("").page, 1);
    }

    #[test]
    fn test_decode_ignores_unknown_keys() {
        let location = decode("ref=home&q=batterie&foo=bar");
        assert_eq!(location.filter.query, "batterie");
        assert_eq!(location.filter.category, None);
    }
}
