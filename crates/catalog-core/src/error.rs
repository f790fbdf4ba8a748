//! Catalog error types.

use thiserror::Error;

/// Errors that can occur while building or validating catalog state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Price range with `min > max` or a non-finite/negative bound.
    #[error("Invalid price range: {min} - {max}")]
    InvalidPriceRange { min: String, max: String },

    /// Unknown sort key.
    #[error("Invalid sort key: {0}")]
    InvalidSortKey(String),

    /// A query parameter value that could not be interpreted.
    #[error("Invalid value for parameter {key}: {value}")]
    InvalidParameter { key: String, value: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::SerializationError(e.to_string())
    }
}
