//! Terminal rendering of the catalog view model.

use catalog_core::catalog::Category;
use catalog_core::search::{format_amount, FilterState};
use catalog_sync::{PageControls, ProductCard, ResultBody, Suggestions, ViewMode, ViewModel};
use console::style;

use crate::output::{truncate, Output};

/// Facet values shown per facet.
const FACET_VALUES: usize = 6;

/// Grid columns never get narrower than this.
const MIN_CELL_WIDTH: usize = 24;

/// Render the full result area.
pub fn render_page(output: &Output, model: &ViewModel) {
    if let Some(summary) = &model.summary {
        output.header(summary);
    }

    if !model.chips.is_empty() {
        let chips: Vec<String> = model
            .chips
            .iter()
            .map(|chip| format!("[{} ×]", chip.label))
            .collect();
        output.line(&format!("  {}", style(chips.join(" ")).cyan()));
    }

    match &model.body {
        ResultBody::Idle => output.info("No search yet"),
        ResultBody::Skeleton(cards) => render_skeleton(output, *cards),
        ResultBody::Empty => {
            output.line("");
            output.warn("No products match these filters. Try removing a filter.");
        }
        ResultBody::Error(message) => {
            output.line("");
            output.error(&format!("Search failed: {}", message));
            output.info("Choose \"Retry\" to run the search again.");
        }
        ResultBody::Products(cards) => match model.mode {
            ViewMode::Grid => render_grid(output, cards),
            ViewMode::List => render_list(output, cards),
        },
    }

    if let Some(pages) = &model.pages {
        output.line("");
        output.line(&format!("  {}", page_bar(pages)));
    }

    if output.is_verbose() {
        for facet in &model.facets {
            let values: Vec<String> = facet
                .values
                .iter()
                .take(FACET_VALUES)
                .map(|value| {
                    let text = format!("{} ({})", value.value, value.count);
                    if value.selected {
                        style(text).bold().to_string()
                    } else {
                        text
                    }
                })
                .collect();
            output.kv(&facet.name, &values.join(", "));
        }
        if !model.price_buckets.is_empty() {
            let buckets: Vec<String> = model
                .price_buckets
                .iter()
                .map(|bucket| format!("{} ({})", bucket.label(), bucket.count))
                .collect();
            output.kv("Price", &buckets.join(", "));
        }
    }
}

fn render_skeleton(output: &Output, cards: usize) {
    for _ in 0..cards {
        output.line(&format!("  {}", style("░░░░░░░░░░░░░░░░░░░░  ░░░░░░").dim()));
    }
}

fn render_list(output: &Output, cards: &[ProductCard]) {
    output.line("");
    for card in cards {
        output.line(&format!(
            "  {}  {}",
            style(&card.name).bold(),
            style(&card.brand).dim()
        ));
        output.line(&format!(
            "    {}  {} ({})  {}",
            price_label(card),
            style(&card.stars).yellow(),
            card.review_count,
            stock_label(card.in_stock)
        ));
    }
}

fn render_grid(output: &Output, cards: &[ProductCard]) {
    let width = output.term_width().max(MIN_CELL_WIDTH + 2);
    let columns = ((width - 2) / (MIN_CELL_WIDTH + 2)).clamp(1, 4);
    let cell = (width - 2) / columns - 2;
    let widths = vec![cell; columns];

    output.line("");
    for row in cards.chunks(columns) {
        let names: Vec<String> = row.iter().map(|c| truncate(&c.name, cell)).collect();
        let prices: Vec<String> = row.iter().map(price_label).collect();
        let ratings: Vec<String> = row
            .iter()
            .map(|c| format!("{} {}", style(&c.stars).yellow(), stock_label(c.in_stock)))
            .collect();

        for line in [&names, &prices, &ratings] {
            let cols: Vec<&str> = line.iter().map(String::as_str).collect();
            output.table_row(&cols, &widths);
        }
        output.line("");
    }
}

fn price_label(card: &ProductCard) -> String {
    match (&card.original_price, card.discount_percent) {
        (Some(original), Some(percent)) => format!(
            "{} {} {}",
            style(&card.price).green().bold(),
            style(original).dim().strikethrough(),
            style(format!("-{}%", percent)).red()
        ),
        _ => style(&card.price).bold().to_string(),
    }
}

fn stock_label(in_stock: bool) -> String {
    if in_stock {
        style("in stock").green().to_string()
    } else {
        style("sold out").red().to_string()
    }
}

/// `‹ 1 2 [3] 4 5 ›  page 3 of 12`
pub fn page_bar(pages: &PageControls) -> String {
    let mut parts = Vec::new();
    if pages.prev.is_some() {
        parts.push("‹".to_string());
    }
    for page in &pages.pages {
        if *page == pages.current {
            parts.push(format!("[{}]", page));
        } else {
            parts.push(page.to_string());
        }
    }
    if pages.next.is_some() {
        parts.push("›".to_string());
    }
    format!(
        "{}  page {} of {}",
        parts.join(" "),
        pages.current,
        pages.total_pages
    )
}

pub fn render_categories(output: &Output, categories: &[Category]) {
    output.header("Categories");
    if categories.is_empty() {
        output.warn("No categories available");
        return;
    }
    for category in categories {
        output.list_item(&category.label());
    }
}

pub fn render_suggestions(output: &Output, suggestions: &Suggestions) {
    if !suggestions.visible {
        output.info(&format!("No suggestions for \"{}\"", suggestions.input.trim()));
        return;
    }
    for (index, item) in suggestions.items.iter().enumerate() {
        if suggestions.highlighted == Some(index) {
            output.line(&format!("  {} {}", style("›").cyan(), style(item).bold()));
        } else {
            output.list_item(item);
        }
    }
}

/// Key/value dump of a decoded filter.
pub fn render_filter(output: &Output, filter: &FilterState, page: u32) {
    if !filter.query.is_empty() {
        output.kv("query", &filter.query);
    }
    if let Some(category) = &filter.category {
        output.kv("category", category);
    }
    if !filter.brands.is_empty() {
        let brands: Vec<&str> = filter.brands.iter().map(String::as_str).collect();
        output.kv("brands", &brands.join(", "));
    }
    if let Some(range) = filter.price_range {
        let max = range.max().map(format_amount).unwrap_or_else(|| "∞".to_string());
        output.kv("price", &format!("{} – {}", format_amount(range.min()), max));
    }
    if let Some(rating) = filter.min_rating {
        output.kv("min rating", &rating.to_string());
    }
    if filter.in_stock_only {
        output.kv("in stock only", "true");
    }
    output.kv("sort", filter.sort_key.display_name());
    output.kv("page", &page.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bar() {
        let pages = PageControls {
            pages: vec![5, 6, 7, 8, 9],
            current: 7,
            total_pages: 12,
            prev: Some(6),
            next: Some(8),
        };
        assert_eq!(page_bar(&pages), "‹ 5 6 [7] 8 9 ›  page 7 of 12");
    }

    #[test]
    fn test_page_bar_first_page() {
        let pages = PageControls {
            pages: vec![1, 2, 3],
            current: 1,
            total_pages: 3,
            prev: None,
            next: Some(2),
        };
        assert_eq!(page_bar(&pages), "[1] 2 3 ›  page 1 of 3");
    }
}
