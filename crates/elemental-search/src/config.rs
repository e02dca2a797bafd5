//! Search configuration

use std::str::FromStr;
use std::time::Duration;

use elemental_core::{default_start_elements, TierPolicy};
use serde::{Deserialize, Serialize};

/// Exploration order of the single-path resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Breadth-first forward chaining over everything discovered so far
    #[default]
    Bfs,
    /// Depth-first descent carrying per-branch inventories
    Dfs,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bfs" => Ok(Self::Bfs),
            "dfs" => Ok(Self::Dfs),
            other => Err(format!("Unknown search method: {}", other)),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bfs => write!(f, "bfs"),
            Self::Dfs => write!(f, "dfs"),
        }
    }
}

/// Knobs for single and multi-path searches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Resolver used by every search
    #[serde(default)]
    pub strategy: Strategy,

    /// Elements available before the first step
    #[serde(default = "default_start_elements")]
    pub start_elements: Vec<String>,

    /// Tier gate applied to every step
    #[serde(default)]
    pub tier_policy: TierPolicy,

    /// Worker pool size (None = hardware parallelism)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,

    /// Budget for one diversification task
    #[serde(default = "default_task_timeout_ms")]
    pub task_timeout_ms: u64,

    /// How long to wait for the collector after workers stop
    #[serde(default = "default_collector_grace_ms")]
    pub collector_grace_ms: u64,

    /// Cap on dependency-repair passes
    #[serde(default = "default_repair_max_passes")]
    pub repair_max_passes: usize,

    /// Depth bound of the depth-first resolver
    #[serde(default = "default_dfs_max_depth")]
    pub dfs_max_depth: usize,

    /// Shuffled start orders issued before banning begins
    #[serde(default = "default_max_shuffle_tasks")]
    pub max_shuffle_tasks: usize,

    /// Extra start orders retried at each banning step
    #[serde(default = "default_permutations_per_ban")]
    pub permutations_per_ban: usize,

    /// Stop issuing tasks after `wanted * factor` failed attempts
    #[serde(default = "default_failure_budget_factor")]
    pub failure_budget_factor: usize,
}

fn default_task_timeout_ms() -> u64 {
    20_000
}

fn default_collector_grace_ms() -> u64 {
    5_000
}

fn default_repair_max_passes() -> usize {
    50
}

fn default_dfs_max_depth() -> usize {
    100
}

fn default_max_shuffle_tasks() -> usize {
    24
}

fn default_permutations_per_ban() -> usize {
    3
}

fn default_failure_budget_factor() -> usize {
    2
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            start_elements: default_start_elements(),
            tier_policy: TierPolicy::default(),
            workers: None,
            task_timeout_ms: default_task_timeout_ms(),
            collector_grace_ms: default_collector_grace_ms(),
            repair_max_passes: default_repair_max_passes(),
            dfs_max_depth: default_dfs_max_depth(),
            max_shuffle_tasks: default_max_shuffle_tasks(),
            permutations_per_ban: default_permutations_per_ban(),
            failure_budget_factor: default_failure_budget_factor(),
        }
    }
}

impl SearchConfig {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_start_elements(mut self, start: Vec<String>) -> Self {
        self.start_elements = start;
        self
    }

    pub fn with_tier_policy(mut self, policy: TierPolicy) -> Self {
        self.tier_policy = policy;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers.max(1));
        self
    }

    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        })
    }

    pub fn task_timeout(&self) -> Duration {
        Duration::from_millis(self.task_timeout_ms)
    }

    pub fn collector_grace(&self) -> Duration {
        Duration::from_millis(self.collector_grace_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("BFS".parse::<Strategy>(), Ok(Strategy::Bfs));
        assert_eq!("dfs".parse::<Strategy>(), Ok(Strategy::Dfs));
        assert!("bidir".parse::<Strategy>().is_err());
        assert_eq!(Strategy::Dfs.to_string(), "dfs");
    }

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.strategy, Strategy::Bfs);
        assert_eq!(config.start_elements, vec!["Air", "Water", "Fire", "Earth"]);
        assert_eq!(config.repair_max_passes, 50);
        assert_eq!(config.task_timeout(), Duration::from_secs(20));
        assert!(config.worker_count() >= 1);
    }

    #[test]
    fn test_partial_config_deserializes() {
        let config: SearchConfig =
            serde_json::from_str(r#"{ "strategy": "dfs", "workers": 2 }"#).unwrap();
        assert_eq!(config.strategy, Strategy::Dfs);
        assert_eq!(config.worker_count(), 2);
        assert_eq!(config.max_shuffle_tasks, 24);
        assert!(config.tier_policy.low_tier_peers);
    }
}
