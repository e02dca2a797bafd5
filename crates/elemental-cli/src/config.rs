//! CLI configuration file (`config.toml`)

use std::path::{Path, PathBuf};

use anyhow::Context;
use elemental_search::{SearchConfig, Strategy};
use elemental_server::ServerConfig;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "ELEMENTAL_CONFIG";

/// Location of the config file
pub fn config_file_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("elemental")
        .join("config.toml")
}

/// Configuration for the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Catalog JSON file used when `--catalog` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,

    /// Deadline for searches, in seconds
    #[serde(default = "default_deadline")]
    pub deadline: u64,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_deadline() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: None,
            deadline: default_deadline(),
            search: SearchConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it does not exist
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_file_path())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        tracing::debug!("Wrote config to {}", path.display());
        Ok(())
    }

    /// Keys understood by `get` and `set`
    pub fn keys() -> &'static [&'static str] {
        &[
            "catalog",
            "deadline",
            "search.strategy",
            "search.start_elements",
            "search.workers",
            "search.task_timeout_ms",
            "search.low_tier_peers",
            "search.repair_max_passes",
            "server.addr",
            "server.auth_token",
        ]
    }

    /// Every key paired with its current value, in `keys()` order
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        Self::keys()
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "catalog" => self
                .catalog
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(not set)".to_string()),
            "deadline" => self.deadline.to_string(),
            "search.strategy" => self.search.strategy.to_string(),
            "search.start_elements" => self.search.start_elements.join(","),
            "search.workers" => self.search.worker_count().to_string(),
            "search.task_timeout_ms" => self.search.task_timeout_ms.to_string(),
            "search.low_tier_peers" => self.search.tier_policy.low_tier_peers.to_string(),
            "search.repair_max_passes" => self.search.repair_max_passes.to_string(),
            "server.addr" => self.server.addr.clone(),
            "server.auth_token" => self
                .server
                .auth_token
                .as_ref()
                .map(|_| "(set)".to_string())
                .unwrap_or_else(|| "(not set)".to_string()),
            _ => return None,
        };
        Some(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "catalog" => self.catalog = Some(PathBuf::from(value)),
            "deadline" => self.deadline = parse(key, value)?,
            "search.strategy" => {
                self.search.strategy = value.parse::<Strategy>().map_err(anyhow::Error::msg)?
            }
            "search.start_elements" => {
                self.search.start_elements = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            }
            "search.workers" => self.search.workers = Some(parse::<usize>(key, value)?.max(1)),
            "search.task_timeout_ms" => self.search.task_timeout_ms = parse(key, value)?,
            "search.low_tier_peers" => {
                self.search.tier_policy.low_tier_peers = parse(key, value)?
            }
            "search.repair_max_passes" => self.search.repair_max_passes = parse(key, value)?,
            "server.addr" => self.server.addr = value.to_string(),
            "server.auth_token" => {
                self.server.auth_token = Some(value.to_string()).filter(|t| !t.is_empty())
            }
            _ => anyhow::bail!(
                "Unknown config key: {}. Available keys: {}",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid value '{}' for {}: {}", value, key, e))
}
