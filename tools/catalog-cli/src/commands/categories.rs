//! Category listing.

use anyhow::{Context as _, Result};

use crate::context::Context;
use crate::render;

/// Run the categories command.
pub async fn run(ctx: &Context) -> Result<()> {
    let api = ctx.api()?;

    let spinner = ctx.output.spinner("Loading categories…");
    let categories = api.categories().await;
    spinner.finish_and_clear();

    let categories = categories.context("Failed to load categories")?;
    if ctx.output.is_json() {
        ctx.output.json(&categories);
    } else {
        render::render_categories(&ctx.output, &categories);
    }
    Ok(())
}
