//! Catalog CLI - browse the AutoCare product catalog from the terminal.
//!
//! Commands:
//! - `catalog search` - Run one search and print the result page
//! - `catalog suggest` - Debounced type-ahead lookup
//! - `catalog categories` - List main categories
//! - `catalog url` - Encode or decode catalog query strings
//! - `catalog browse` - Interactive catalog page
//! - `catalog config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{BrowseArgs, ConfigArgs, SearchArgs, SuggestArgs, UrlArgs};

/// Catalog CLI - search, filter and browse the product catalog
#[derive(Parser)]
#[command(name = "catalog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Catalog API base URL (overrides the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Use the bundled sample catalog instead of the API
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Search(SearchArgs),

    /// Show suggestions for partial input
    Suggest(SuggestArgs),

    /// List main categories with product counts
    Categories,

    /// Encode or decode catalog URLs
    Url(UrlArgs),

    /// Browse the catalog interactively
    Browse(BrowseArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "catalog=debug" } else { "catalog=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = output::Output::new(cli.verbose, cli.json);

    let mut ctx = context::Context::load(cli.config.as_deref(), output)?;
    if let Some(url) = cli.api_url {
        ctx.config.api.base_url = Some(url);
    }
    ctx.offline = cli.offline;

    let result = match cli.command {
        Commands::Search(args) => commands::search::run(args, &ctx).await,
        Commands::Suggest(args) => commands::suggest::run(args, &ctx).await,
        Commands::Categories => commands::categories::run(&ctx).await,
        Commands::Url(args) => commands::url::run(args, &ctx).await,
        Commands::Browse(args) => commands::browse::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
