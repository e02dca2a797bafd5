//! Terminal search results

use elemental_core::Path;
use serde::{Deserialize, Serialize};

/// Counters describing how a search went
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub tasks_run: usize,
    /// Tasks that timed out or found nothing usable
    pub failed_attempts: usize,
    pub duplicates_rejected: usize,
    /// Paths dropped because repair left an ingredient gap
    pub incomplete_repairs: usize,
}

/// Paths found for a target, handed back once the search is over
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchReport {
    pub target: String,
    pub paths: Vec<Path>,
    /// Frontier states visited across every resolver run
    pub visited: usize,
    pub elapsed_ms: u64,
    #[serde(default)]
    pub stats: SearchStats,
}

impl SearchReport {
    pub fn empty(target: impl Into<String>, visited: usize) -> Self {
        Self {
            target: target.into(),
            visited,
            ..Default::default()
        }
    }

    pub fn found(&self) -> bool {
        !self.paths.is_empty()
    }

    /// Fewer paths than requested
    pub fn is_partial(&self, wanted: usize) -> bool {
        self.paths.len() < wanted
    }
}
