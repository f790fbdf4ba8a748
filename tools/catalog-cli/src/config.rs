//! CLI configuration.

use std::time::Duration;

use anyhow::{Context, Result};
use catalog_data::ClientConfig;
use catalog_sync::{SyncConfig, ViewMode};
use serde::{Deserialize, Serialize};

/// Config file names searched from the working directory upwards.
pub const CONFIG_NAMES: [&str; 3] = ["catalog.toml", ".catalog.toml", "catalog.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Catalog API connection.
    #[serde(default)]
    pub api: ApiConfig,

    /// Debounce, paging and suggestion timing.
    #[serde(default)]
    pub sync: SyncConfig,

    /// Terminal rendering.
    #[serde(default)]
    pub display: DisplayConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Check value ranges. Returns `(errors, warnings)`.
    pub fn validate(&self) -> (Vec<String>, Vec<String>) {
        let mut errors = self.sync.validate();
        let mut warnings = Vec::new();

        match &self.api.base_url {
            Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                errors.push(format!("api.base_url must be an http(s) URL, got '{}'", url));
            }
            None => warnings.push("api.base_url is not set; the sample catalog is used".to_string()),
            _ => {}
        }
        if self.api.timeout_ms == 0 {
            errors.push("api.timeout_ms must be greater than 0".to_string());
        } else if self.api.timeout_ms < 500 {
            warnings.push(format!("api.timeout_ms is very short: {}", self.api.timeout_ms));
        }

        (errors, warnings)
    }
}

/// API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the catalog API. Without one the sample catalog is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Custom User-Agent header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl ApiConfig {
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig {
            timeout: Duration::from_millis(self.timeout_ms),
            ..ClientConfig::default()
        };
        if let Some(agent) = &self.user_agent {
            config.user_agent = agent.clone();
        }
        config
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: default_timeout_ms(),
            user_agent: None,
        }
    }
}

/// Terminal rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Initial result layout.
    #[serde(default)]
    pub view: ViewMode,

    /// Colored output.
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            view: ViewMode::Grid,
            color: true,
        }
    }
}

/// Generate a default catalog.toml config file.
pub fn generate_default_config() -> String {
    r#"# Catalog CLI configuration

[api]
# base_url = "https://api.autocare.example"
timeout_ms = 10000
# user_agent = "autocare-catalog"

[sync]
debounce_ms = 300
min_query_len = 2
page_size = 20
select_delay_ms = 150
page_window = 5

[display]
view = "grid"
color = true
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generated_config_parses() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, None);
        assert_eq!(config.sync, SyncConfig::default());
        assert_eq!(config.display.view, ViewMode::Grid);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: CliConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://api.autocare.example"

            [display]
            view = "list"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.timeout_ms, 10_000);
        assert_eq!(config.sync.page_size, 20);
        assert_eq!(config.display.view, ViewMode::List);
        assert!(config.display.color);
    }

    #[test]
    fn test_validate() {
        let mut config = CliConfig::default();
        let (errors, warnings) = config.validate();
        assert!(errors.is_empty());
        assert_eq!(warnings.len(), 1);

        config.api.base_url = Some("ftp://catalog".to_string());
        config.api.timeout_ms = 0;
        let (errors, _) = config.validate();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_client_config() {
        let api = ApiConfig {
            timeout_ms: 2_500,
            user_agent: Some("werkstatt-bot".to_string()),
            ..ApiConfig::default()
        };
        let client = api.client_config();
        assert_eq!(client.timeout, Duration::from_millis(2_500));
        assert_eq!(client.user_agent, "werkstatt-bot");
    }
}
