//! One-shot search.

use anyhow::{bail, Result};
use catalog_sync::{LoadState, SearchExecutor, ViewMode, ViewModel};

use super::SearchArgs;
use crate::context::Context;
use crate::render;

/// Run the search command.
pub async fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let (filter, page) = args.filter.resolve()?;
    let api = ctx.api()?;
    let executor = SearchExecutor::new(api, ctx.config.sync.page_size);

    let spinner = ctx.output.spinner("Searching…");
    executor.search(&filter, page).await;
    spinner.finish_and_clear();

    let snapshot = executor.snapshot();
    if ctx.output.is_json() {
        if let Some(result) = &snapshot.result {
            ctx.output.json(result);
        }
    } else {
        let mode = if args.list {
            ViewMode::List
        } else {
            ctx.config.display.view
        };
        let model = ViewModel::build(&filter, &snapshot, mode, ctx.config.sync.page_window);
        render::render_page(&ctx.output, &model);
    }

    if let LoadState::Failed(message) = snapshot.state {
        bail!("Search failed: {}", message);
    }
    Ok(())
}
