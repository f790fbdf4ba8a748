//! Catalog URL encoding and decoding.

use anyhow::Result;
use catalog_core::search::{decode, encode};
use serde_json::json;

use super::{UrlArgs, UrlCommand};
use crate::context::Context;
use crate::render;

/// Run the url command.
pub async fn run(args: UrlArgs, ctx: &Context) -> Result<()> {
    match args.command {
        UrlCommand::Encode { filter } => {
            let (filter, page) = filter.resolve()?;
            let query = encode(&filter, page);
            if ctx.output.is_json() {
                ctx.output.json(&json!({ "query": query }));
            } else if query.is_empty() {
                ctx.output.info("All filters at their defaults; the query string is empty");
            } else {
                println!("?{}", query);
            }
        }
        UrlCommand::Decode { query } => {
            let location = decode(&query);
            let canonical = location.to_query_string();
            if ctx.output.is_json() {
                ctx.output.json(&json!({
                    "filter": &location.filter,
                    "page": location.page,
                    "canonical": canonical,
                }));
            } else {
                ctx.output.header("Decoded filters");
                render::render_filter(&ctx.output, &location.filter, location.page);
                ctx.output.kv("canonical", &format!("?{}", canonical));
            }
        }
    }
    Ok(())
}
