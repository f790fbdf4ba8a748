//! Product catalog module.
//!
//! Read-only product and category types.

mod category;
mod product;

pub use category::Category;
pub use product::{format_price, Product};
