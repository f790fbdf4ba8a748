//! Type-ahead lookup.

use anyhow::Result;
use catalog_sync::SuggestionFetcher;

use super::SuggestArgs;
use crate::context::Context;
use crate::render;

/// Run the suggest command.
pub async fn run(args: SuggestArgs, ctx: &Context) -> Result<()> {
    let mut fetcher = SuggestionFetcher::new(ctx.api()?, &ctx.config.sync);

    fetcher.input(&args.text);
    fetcher.settle().await;

    let suggestions = fetcher.snapshot();
    if ctx.output.is_json() {
        ctx.output.json(&suggestions.items);
    } else {
        render::render_suggestions(&ctx.output, &suggestions);
    }
    Ok(())
}
