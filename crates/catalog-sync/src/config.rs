//! Timing and paging settings for the synchronizer.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Synchronizer settings, loadable from the `[sync]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Quiet period before a suggestion request is issued.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Shortest input (in characters) that triggers suggestions.
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Products per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Delay between picking a suggestion and running the search.
    #[serde(default = "default_select_delay_ms")]
    pub select_delay_ms: u64,

    /// Number of page buttons in the pagination window.
    #[serde(default = "default_page_window")]
    pub page_window: usize,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_len() -> usize {
    2
}

fn default_page_size() -> u32 {
    20
}

fn default_select_delay_ms() -> u64 {
    150
}

fn default_page_window() -> usize {
    5
}

impl SyncConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn select_delay(&self) -> Duration {
        Duration::from_millis(self.select_delay_ms)
    }

    /// Check value ranges. Returns one message per problem.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.page_size == 0 || self.page_size > 100 {
            problems.push(format!("sync.page_size must be 1-100, got {}", self.page_size));
        }
        if self.page_window == 0 {
            problems.push("sync.page_window must be at least 1".to_string());
        }
        if self.min_query_len == 0 {
            problems.push("sync.min_query_len must be at least 1".to_string());
        }
        if self.debounce_ms > 5_000 {
            problems.push(format!("sync.debounce_ms is unusually large: {}", self.debounce_ms));
        }
        problems
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            page_size: default_page_size(),
            select_delay_ms: default_select_delay_ms(),
            page_window: default_page_window(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.min_query_len, 2);
        assert_eq!(config.page_window, 5);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_partial_deserialize_fills_defaults() {
        let config: SyncConfig = serde_json::from_str(r#"{"page_size": 48}"#).unwrap();
        assert_eq!(config.page_size, 48);
        assert_eq!(config.debounce_ms, 300);
    }

    #[test]
    fn test_validate_reports_problems() {
        let config = SyncConfig {
            page_size: 0,
            page_window: 0,
            ..Default::default()
        };
        assert_eq!(config.validate().len(), 2);
    }
}
