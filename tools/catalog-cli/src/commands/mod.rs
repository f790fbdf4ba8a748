//! CLI command implementations.

pub mod browse;
pub mod categories;
pub mod config;
pub mod search;
pub mod suggest;
pub mod url;

use anyhow::Result;
use catalog_core::search::{brand_name, decode, FilterPatch, FilterState, PriceRange, SortKey};
use clap::{Args, Subcommand};

/// Filter flags shared by `search` and `url encode`.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Start from this catalog query string (`?q=öl&brand=Castrol`).
    #[arg(long)]
    pub url: Option<String>,

    /// Free-text query.
    #[arg(short, long)]
    pub q: Option<String>,

    /// Category name.
    #[arg(long)]
    pub category: Option<String>,

    /// Brand filter (repeatable).
    #[arg(short, long)]
    pub brand: Vec<String>,

    /// Minimum price in euros.
    #[arg(long)]
    pub price_min: Option<f64>,

    /// Maximum price in euros.
    #[arg(long)]
    pub price_max: Option<f64>,

    /// Minimum star rating (1-5).
    #[arg(long)]
    pub rating: Option<u8>,

    /// Only products in stock.
    #[arg(long)]
    pub in_stock: bool,

    /// Sort order: relevance, price, rating, newest, name.
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Page number.
    #[arg(short, long)]
    pub page: Option<u32>,
}

impl FilterArgs {
    /// The flags as a patch over the `--url` state.
    pub fn to_patch(&self) -> Result<FilterPatch> {
        let mut patch = FilterPatch::new();

        if let Some(q) = &self.q {
            patch = patch.query(q.trim());
        }
        if let Some(category) = &self.category {
            patch = patch.category(category.clone());
        }
        if !self.brand.is_empty() {
            let brands = self
                .brand
                .iter()
                .map(|brand| brand_name(brand))
                .collect::<Result<Vec<_>, _>>()?;
            patch = patch.brands(brands);
        }
        if self.price_min.is_some() || self.price_max.is_some() {
            let range = PriceRange::new(self.price_min.unwrap_or(0.0), self.price_max)?;
            patch = patch.price_range(range);
        }
        if let Some(rating) = self.rating {
            patch = patch.min_rating(rating);
        }
        if self.in_stock {
            patch = patch.in_stock_only(true);
        }
        if let Some(sort) = &self.sort {
            patch = patch.sort(sort.parse::<SortKey>()?);
        }

        Ok(patch)
    }

    /// Resolve to a filter state and page.
    pub fn resolve(&self) -> Result<(FilterState, u32)> {
        let location = decode(self.url.as_deref().unwrap_or(""));
        let mut filter = location.filter;
        let changed = filter.apply(self.to_patch()?);

        let page = match self.page {
            Some(page) => page.max(1),
            None if changed => 1,
            None => location.page,
        };
        Ok((filter, page))
    }
}

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Show results as a list instead of a grid.
    #[arg(long)]
    pub list: bool,
}

/// Arguments for the suggest command.
#[derive(Args)]
pub struct SuggestArgs {
    /// Partial search text.
    pub text: String,
}

/// Arguments for the url command.
#[derive(Args)]
pub struct UrlArgs {
    #[command(subcommand)]
    pub command: UrlCommand,
}

#[derive(Subcommand)]
pub enum UrlCommand {
    /// Build a catalog query string from filter flags.
    Encode {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show the filters in a catalog query string.
    Decode {
        /// Query string, with or without the leading `?`.
        query: String,
    },
}

/// Arguments for the browse command.
#[derive(Args)]
pub struct BrowseArgs {
    /// Initial catalog query string.
    #[arg(long)]
    pub url: Option<String>,

    /// Start in list view.
    #[arg(long)]
    pub list: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flags_override_url() {
        let args = FilterArgs {
            url: Some("?q=%C3%B6l&brand=Castrol&page=4".to_string()),
            brand: vec!["Liqui Moly".to_string()],
            price_max: Some(50.0),
            ..Default::default()
        };
        let (filter, page) = args.resolve().unwrap();

        assert_eq!(filter.query, "öl");
        assert_eq!(filter.brands.iter().collect::<Vec<_>>(), vec!["Liqui Moly"]);
        assert_eq!(filter.price_range.unwrap().min(), 0.0);
        assert_eq!(page, 1);
    }

    #[test]
    fn test_url_page_kept_without_changes() {
        let args = FilterArgs {
            url: Some("category=Reifen&page=3".to_string()),
            ..Default::default()
        };
        assert_eq!(args.resolve().unwrap().1, 3);
    }

    #[test]
    fn test_invalid_flags() {
        let inverted = FilterArgs {
            price_min: Some(80.0),
            price_max: Some(20.0),
            ..Default::default()
        };
        assert!(inverted.to_patch().is_err());

        let sort = FilterArgs {
            sort: Some("cheapest".to_string()),
            ..Default::default()
        };
        assert!(sort.to_patch().is_err());

        let brand = FilterArgs {
            brand: vec!["Bosch,Valeo".to_string()],
            ..Default::default()
        };
        assert!(brand.to_patch().is_err());
    }

    #[test]
    fn test_brand_flags_trimmed() {
        let args = FilterArgs {
            brand: vec![" Bosch ".to_string()],
            ..Default::default()
        };
        let (filter, _) = args.resolve().unwrap();
        assert_eq!(filter.brands.iter().collect::<Vec<_>>(), vec!["Bosch"]);
    }
}
