//! Catalog product as delivered by the search endpoint.

use serde::{Deserialize, Serialize};

/// A catalog item. Owned by the backend and never mutated client-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    /// Current price in euros.
    pub price: f64,
    /// Price before discount, if discounted.
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub in_stock: bool,
    /// Link to the partner shop selling this item.
    #[serde(default)]
    pub partner_shop_url: String,
}

impl Product {
    /// Check if the product is sold below its original price.
    pub fn is_discounted(&self) -> bool {
        self.original_price.is_some_and(|original| original > self.price)
    }

    /// Discount in whole percent, rounded.
    pub fn discount_percent(&self) -> Option<u32> {
        match self.original_price {
            Some(original) if original > self.price && original > 0.0 => {
                Some(((original - self.price) / original * 100.0).round() as u32)
            }
            _ => None,
        }
    }

    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Format a euro amount the German way (`24,99 €`).
pub fn format_price(amount: f64) -> String {
    format!("{:.2} €", amount).replace('.', ",")
}
