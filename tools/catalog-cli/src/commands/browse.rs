//! Interactive catalog page.

use anyhow::Result;
use catalog_core::search::{ActiveFilter, FilterPatch, PriceRange, SortKey};
use catalog_sync::{CatalogPage, SearchOutcome, ViewMode};
use dialoguer::{Confirm, Input, Select};

use super::BrowseArgs;
use crate::context::Context;
use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    Brand,
    Category,
    Price,
    Rating,
    Stock,
    Sort,
    RemoveFilter,
    ClearFilters,
    NextPage,
    PrevPage,
    GoToPage,
    Back,
    Forward,
    ToggleView,
    Retry,
    Quit,
}

const ACTIONS: [(Action, &str); 17] = [
    (Action::Search, "Search text"),
    (Action::Brand, "Toggle brand"),
    (Action::Category, "Category"),
    (Action::Price, "Price range"),
    (Action::Rating, "Minimum rating"),
    (Action::Stock, "In stock only"),
    (Action::Sort, "Sort order"),
    (Action::RemoveFilter, "Remove a filter"),
    (Action::ClearFilters, "Clear filters"),
    (Action::NextPage, "Next page"),
    (Action::PrevPage, "Previous page"),
    (Action::GoToPage, "Go to page"),
    (Action::Back, "Back"),
    (Action::Forward, "Forward"),
    (Action::ToggleView, "Toggle grid/list"),
    (Action::Retry, "Retry"),
    (Action::Quit, "Quit"),
];

/// What to do with the page after prompting.
enum Step {
    Patch(FilterPatch),
    Remove(ActiveFilter),
    Page(u32),
    Back,
    Forward,
    Retry,
    SelectSuggestion(usize),
    Submit,
    Nothing,
    Quit,
}

/// Run the browse command.
pub async fn run(args: BrowseArgs, ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    let url = args.url.unwrap_or_default();

    let spinner = ctx.output.spinner("Loading catalog…");
    let mut page = CatalogPage::mount(api, ctx.config.sync.clone(), &url).await;
    spinner.finish_and_clear();

    page.set_view_mode(if args.list {
        ViewMode::List
    } else {
        ctx.config.display.view
    });

    let labels: Vec<&str> = ACTIONS.iter().map(|(_, label)| *label).collect();
    loop {
        render::render_page(&ctx.output, &page.model());
        ctx.output.kv("url", &format!("?{}", page.url()));
        ctx.output.line("");

        let choice = Select::new()
            .with_prompt("Action")
            .items(&labels)
            .default(0)
            .interact()?;

        let step = prompt(ACTIONS[choice].0, &mut page, ctx).await?;
        let outcome = match step {
            Step::Quit => return Ok(()),
            Step::Nothing => continue,
            step => {
                let spinner = ctx.output.spinner("Searching…");
                let outcome = apply(step, &mut page).await;
                spinner.finish_and_clear();
                outcome
            }
        };

        match outcome {
            None => ctx.output.info("Nothing changed"),
            Some(SearchOutcome::Failed) => ctx.output.warn("The search failed"),
            Some(_) => {}
        }
    }
}

async fn apply(step: Step, page: &mut CatalogPage) -> Option<SearchOutcome> {
    match step {
        Step::Patch(patch) => page.update(patch).await,
        Step::Remove(filter) => page.remove_filter(&filter).await,
        Step::Page(number) => page.go_to_page(number).await,
        Step::Back => page.back().await,
        Step::Forward => page.forward().await,
        Step::Retry => page.retry().await,
        Step::SelectSuggestion(index) => page.select_suggestion(index).await,
        Step::Submit => page.submit_query().await,
        Step::Nothing | Step::Quit => None,
    }
}

async fn prompt(action: Action, page: &mut CatalogPage, ctx: &Context) -> Result<Step> {
    let model = page.model();
    let state = page.state().clone();

    let step = match action {
        Action::Search => {
            let text: String = Input::new()
                .with_prompt("Search")
                .with_initial_text(state.query.clone())
                .allow_empty(true)
                .interact_text()?;

            page.type_query(&text);
            page.await_suggestions().await;

            let suggestions = page.suggestions();
            if !suggestions.visible {
                return Ok(Step::Submit);
            }

            let mut items = vec![format!("Search for \"{}\"", text.trim())];
            items.extend(suggestions.items.iter().cloned());
            let picked = Select::new()
                .with_prompt("Suggestions")
                .items(&items)
                .default(0)
                .interact()?;

            if picked == 0 {
                page.dismiss_suggestions();
                Step::Submit
            } else {
                Step::SelectSuggestion(picked - 1)
            }
        }
        Action::Brand => {
            let Some(facet) = model.facets.iter().find(|facet| facet.key == "brand") else {
                ctx.output.warn("No brands in the current results");
                return Ok(Step::Nothing);
            };
            let items: Vec<String> = facet
                .values
                .iter()
                .map(|value| {
                    let mark = if value.selected { "✓ " } else { "" };
                    format!("{}{} ({})", mark, value.value, value.count)
                })
                .collect();
            let picked = Select::new()
                .with_prompt("Brand")
                .items(&items)
                .default(0)
                .interact()?;
            Step::Patch(FilterPatch::new().toggle_brand(facet.values[picked].value.clone()))
        }
        Action::Category => {
            let mut items = vec!["(all categories)".to_string()];
            items.extend(page.categories().iter().map(|category| category.label()));
            let current = state
                .category
                .as_deref()
                .and_then(|name| page.categories().iter().position(|c| c.name == name))
                .map_or(0, |index| index + 1);

            let picked = Select::new()
                .with_prompt("Category")
                .items(&items)
                .default(current)
                .interact()?;
            match picked {
                0 => Step::Patch(FilterPatch::new().clear_category()),
                n => Step::Patch(FilterPatch::new().category(page.categories()[n - 1].name.clone())),
            }
        }
        Action::Price => {
            let min = prompt_amount("Minimum price (€, empty for none)")?;
            let max = prompt_amount("Maximum price (€, empty for none)")?;
            match (min, max) {
                (None, None) => Step::Patch(FilterPatch::new().clear_price_range()),
                (min, max) => match PriceRange::new(min.unwrap_or(0.0), max) {
                    Ok(range) => Step::Patch(FilterPatch::new().price_range(range)),
                    Err(err) => {
                        ctx.output.warn(&err.to_string());
                        Step::Nothing
                    }
                },
            }
        }
        Action::Rating => {
            let items = ["(any)", "1+ ★", "2+ ★", "3+ ★", "4+ ★", "5 ★"];
            let picked = Select::new()
                .with_prompt("Minimum rating")
                .items(&items)
                .default(state.min_rating.map_or(0, usize::from).min(5))
                .interact()?;
            match picked {
                0 => Step::Patch(FilterPatch::new().clear_min_rating()),
                n => Step::Patch(FilterPatch::new().min_rating(n as u8)),
            }
        }
        Action::Stock => {
            let only = Confirm::new()
                .with_prompt("Only show products in stock?")
                .default(state.in_stock_only)
                .interact()?;
            Step::Patch(FilterPatch::new().in_stock_only(only))
        }
        Action::Sort => {
            let items: Vec<&str> = SortKey::ALL.iter().map(SortKey::display_name).collect();
            let current = SortKey::ALL
                .iter()
                .position(|key| *key == state.sort_key)
                .unwrap_or(0);
            let picked = Select::new()
                .with_prompt("Sort by")
                .items(&items)
                .default(current)
                .interact()?;
            Step::Patch(FilterPatch::new().sort(SortKey::ALL[picked]))
        }
        Action::RemoveFilter => {
            if model.chips.is_empty() {
                ctx.output.info("No active filters");
                return Ok(Step::Nothing);
            }
            let items: Vec<&str> = model.chips.iter().map(|chip| chip.label.as_str()).collect();
            let picked = Select::new()
                .with_prompt("Remove")
                .items(&items)
                .default(0)
                .interact()?;
            Step::Remove(model.chips[picked].filter.clone())
        }
        Action::ClearFilters => Step::Patch(FilterPatch::clear_filters()),
        Action::NextPage => match model.pages.as_ref().and_then(|pages| pages.next) {
            Some(next) => Step::Page(next),
            None => {
                ctx.output.info("Already on the last page");
                Step::Nothing
            }
        },
        Action::PrevPage => match model.pages.as_ref().and_then(|pages| pages.prev) {
            Some(prev) => Step::Page(prev),
            None => {
                ctx.output.info("Already on the first page");
                Step::Nothing
            }
        },
        Action::GoToPage => {
            let number: u32 = Input::new()
                .with_prompt("Page")
                .default(page.page())
                .interact_text()?;
            Step::Page(number)
        }
        Action::Back => Step::Back,
        Action::Forward => Step::Forward,
        Action::ToggleView => {
            let mode = page.toggle_view_mode();
            ctx.output.info(&format!("Switched to {} view", mode));
            Step::Nothing
        }
        Action::Retry => Step::Retry,
        Action::Quit => Step::Quit,
    };

    Ok(step)
}

fn prompt_amount(prompt: &str) -> Result<Option<f64>> {
    let text: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), &str> {
            let input = input.trim();
            if input.is_empty() || input.replace(',', ".").parse::<f64>().is_ok() {
                Ok(())
            } else {
                Err("Enter an amount like 19.99")
            }
        })
        .interact_text()?;

    let text = text.trim().replace(',', ".");
    if text.is_empty() {
        return Ok(None);
    }
    Ok(text.parse().ok())
}
