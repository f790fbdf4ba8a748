//! Response envelopes of the catalog REST API.

use serde::{Deserialize, Serialize};

use crate::catalog::Category;

/// `{ success, data }` wrapper used by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    /// Error message sent alongside `success: false`.
    #[serde(default, alias = "error")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// The payload, if the call succeeded and carried one.
    pub fn into_data(self) -> Option<T> {
        if self.success {
            self.data
        } else {
            None
        }
    }
}

/// Payload of `GET /api/products/suggestions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SuggestionsData {
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Payload of `GET /api/categories`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoriesData {
    #[serde(default)]
    pub categories: Vec<Category>,
}
