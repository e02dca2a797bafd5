//! Request and response bodies

use elemental_core::{Element, Path};
use elemental_search::{SearchReport, SearchStats, Strategy};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Single path or several distinct ones
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Single,
    Multiple,
}

/// `POST /search` body; also the query string of `GET /search/stream`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub target: String,

    #[serde(default)]
    pub mode: SearchMode,

    /// Distinct paths wanted in multiple mode
    #[serde(default = "default_max_recipes", alias = "maxRecipe")]
    pub max_recipes: usize,

    /// Overrides the configured start elements
    #[serde(default)]
    pub start_elements: Option<Vec<String>>,

    /// `bfs` or `dfs`, case-insensitive
    #[serde(default)]
    pub method: Option<String>,

    #[serde(default)]
    pub deadline_seconds: Option<u64>,
}

fn default_max_recipes() -> usize {
    1
}

impl SearchRequest {
    pub fn strategy(&self) -> Result<Option<Strategy>, ApiError> {
        self.method
            .as_deref()
            .map(|m| m.parse::<Strategy>().map_err(ApiError::BadRequest))
            .transpose()
    }

    /// Paths wanted, honoring the mode
    pub fn wanted(&self) -> usize {
        match self.mode {
            SearchMode::Single => 1,
            SearchMode::Multiple => self.max_recipes,
        }
    }
}

/// `POST /search` response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub target: String,
    pub recipes: Vec<Path>,
    /// Milliseconds
    pub elapsed_time: u64,
    pub visited_nodes: usize,
    pub stats: SearchStats,
    /// Close element names when the target is unknown
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl SearchResponse {
    pub fn from_report(report: SearchReport, suggestions: Vec<String>) -> Self {
        Self {
            target: report.target,
            recipes: report.paths,
            elapsed_time: report.elapsed_ms,
            visited_nodes: report.visited,
            stats: report.stats,
            suggestions,
        }
    }
}

/// `GET /elements` query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ElementsQuery {
    /// Fuzzy name filter
    pub like: Option<String>,
    pub limit: Option<usize>,
}

/// One row of `GET /elements`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSummary {
    pub name: String,
    pub tier: String,
    pub is_basic: bool,
    pub recipes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl From<&Element> for ElementSummary {
    fn from(element: &Element) -> Self {
        Self {
            name: element.name.clone(),
            tier: element.tier.clone(),
            is_basic: element.is_basic,
            recipes: element.recipes.len(),
            icon: element.icon.clone(),
        }
    }
}
