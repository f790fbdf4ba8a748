//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CONFIG_NAMES};
use crate::context::{find_config, Context};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match find_config(&ctx.cwd) {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let api = &ctx.config.api;
    ctx.output.line("");
    ctx.output.line("[api]");
    ctx.output.kv("base_url", api.base_url.as_deref().unwrap_or("(sample catalog)"));
    ctx.output.kv("timeout_ms", &api.timeout_ms.to_string());
    if let Some(agent) = &api.user_agent {
        ctx.output.kv("user_agent", agent);
    }

    let sync = &ctx.config.sync;
    ctx.output.line("");
    ctx.output.line("[sync]");
    ctx.output.kv("debounce_ms", &sync.debounce_ms.to_string());
    ctx.output.kv("min_query_len", &sync.min_query_len.to_string());
    ctx.output.kv("page_size", &sync.page_size.to_string());
    ctx.output.kv("select_delay_ms", &sync.select_delay_ms.to_string());
    ctx.output.kv("page_window", &sync.page_window.to_string());

    let display = &ctx.config.display;
    ctx.output.line("");
    ctx.output.line("[display]");
    ctx.output.kv("view", display.view.as_str());
    ctx.output.kv("color", &display.color.to_string());

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = ctx.config.validate();

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}
