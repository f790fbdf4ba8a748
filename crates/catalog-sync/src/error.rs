//! Synchronizer error types.

use catalog_core::CatalogError;
use catalog_data::FetchError;
use thiserror::Error;

/// Errors surfaced by catalog API calls and page operations.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Transport or HTTP failure.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The API answered with `success: false` or without data.
    #[error("API call to {endpoint} failed: {message}")]
    Api { endpoint: String, message: String },

    /// The backend is not reachable.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    /// Invalid filter input.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl SyncError {
    pub fn api(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        SyncError::Api {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }
}
