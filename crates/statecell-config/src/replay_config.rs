//! Replay configuration
//!
//! Configuration loaded from `.statecell.toml` (or the global config file).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration for statecell-replay
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReplayConfig {
    /// Log every dispatched action through the logging middleware
    #[serde(default = "default_log_actions")]
    pub log_actions: bool,

    /// Print the state after every dispatch, not only at the end
    #[serde(default)]
    pub print_each_state: bool,

    /// Pretty-print JSON output
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// State slices to register with the combined reducer
    #[serde(default = "default_slices")]
    pub slices: Vec<String>,
}

fn default_log_actions() -> bool {
    true
}

fn default_pretty() -> bool {
    true
}

fn default_slices() -> Vec<String> {
    vec!["counter".to_string(), "todos".to_string()]
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            log_actions: default_log_actions(),
            print_each_state: false,
            pretty: default_pretty(),
            slices: default_slices(),
        }
    }
}

impl ReplayConfig {
    /// Load config from CWD first, then the config directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match Self::from_toml(&content) {
                Ok(config) => {
                    log::info!("Loaded replay config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("{:#}", e);
                }
            }
        }

        log::debug!("Using default replay config");
        Self::default()
    }

    /// Load config from an explicit path, failing if it can't be read or parsed
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    pub fn slice_enabled(&self, slice: &str) -> bool {
        self.slices.iter().any(|s| s == slice)
    }
}
