//! Elemental Search - recipe path search engine
//!
//! Provides the single-path resolvers (breadth-first and depth-first), the
//! dependency-repair pass, and the multi-path orchestrator that fans
//! diversified tasks out over a worker pool.

pub mod api;
mod bfs;
pub mod config;
pub mod dedupe;
mod dfs;
pub mod error;
pub mod orchestrator;
pub mod plan;
pub mod query;
pub mod repair;
pub mod report;
pub mod resolver;

pub use api::{resolve_multiple, resolve_single, resolve_single_with, PathFinder};
pub use config::{SearchConfig, Strategy};
pub use dedupe::{is_duplicate, PathSet};
pub use error::{SearchError, SearchOutcome};
pub use orchestrator::MultiPathSearch;
pub use plan::{permutations, SearchTask, TaskPhase, TaskPlan};
pub use query::{BannedRecipes, ResolveQuery};
pub use repair::{Repaired, Repairer};
pub use report::{SearchReport, SearchStats};
pub use resolver::{Resolution, Resolver, SearchContext};
