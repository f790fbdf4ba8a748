//! Category types for the category browser.

use serde::{Deserialize, Serialize};

/// A product category as returned by the categories endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    /// URL-friendly slug.
    #[serde(default)]
    pub slug: String,
    /// Number of products, when requested with `includeProductCount`.
    #[serde(default)]
    pub product_count: Option<u64>,
    /// Subcategories (empty when only main categories are requested).
    #[serde(default)]
    pub children: Vec<Category>,
}

impl Category {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Find a category by name in this subtree.
    pub fn find(&self, name: &str) -> Option<&Category> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    pub fn label(&self) -> String {
        match self.product_count {
            Some(count) => format!("{} ({})", self.name, count),
            None => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_children() {
        let json = r#"{
            "id": "1", "name": "Pflege", "slug": "pflege", "productCount": 42,
            "children": [{"id": "2", "name": "Wachse"}]
        }"#;
        let cat: Category = serde_json::from_str(json).unwrap();
        assert!(!cat.is_leaf());
        assert_eq!(cat.find("Wachse").map(|c| c.id.as_str()), Some("2"));
        assert_eq!(cat.find("Reifen"), None);
        assert_eq!(cat.label(), "Pflege (42)");
    }
}
