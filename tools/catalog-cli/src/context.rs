//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use catalog_data::FetchClient;
use catalog_sync::{CatalogApi, HttpCatalogApi, InMemoryCatalog};

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Force the bundled sample catalog.
    pub offline: bool,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            find_config(&cwd)
                .map(|path| CliConfig::load(&path.to_string_lossy()))
                .transpose()?
                .unwrap_or_default()
        };

        if !config.display.color {
            console::set_colors_enabled(false);
        }

        Ok(Self {
            config,
            output,
            cwd,
            offline: false,
        })
    }

    /// The catalog backend: HTTP when a base URL is configured, otherwise
    /// the bundled sample catalog.
    pub fn api(&self) -> Result<Arc<dyn CatalogApi>> {
        match (&self.config.api.base_url, self.offline) {
            (Some(base_url), false) => {
                self.output.debug(&format!("Using catalog API at {}", base_url));
                let client = FetchClient::with_config(&self.config.api.client_config())
                    .context("Failed to create HTTP client")?
                    .with_base_url(base_url.clone());
                Ok(Arc::new(HttpCatalogApi::new(client)))
            }
            _ => {
                self.output.debug("Using the bundled sample catalog");
                Ok(Arc::new(InMemoryCatalog::sample()))
            }
        }
    }
}

/// Find a config file in the directory tree.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let candidate = current.join(name);
            if candidate.exists() {
                return Some(candidate);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}
