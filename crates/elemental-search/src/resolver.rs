//! Single-path resolver entry point shared by both exploration orders

use std::collections::HashSet;

use elemental_core::{
    CancelToken, ElementId, ElementsDatabase, Path, ProgressSink, RecipeStep, SearchProgress,
};
use serde::{Deserialize, Serialize};

use crate::config::Strategy;
use crate::query::ResolveQuery;
use crate::{bfs, dfs};

/// Outcome of one resolver run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resolution {
    pub target: String,
    /// Raw paths in discovery order (may need repair)
    pub paths: Vec<Path>,
    /// Frontier states popped
    pub visited: usize,
    /// Whether the run stopped on cancellation or deadline
    pub cancelled: bool,
}

impl Resolution {
    fn trivial(target: &str, visited: usize) -> Self {
        Self {
            target: target.to_string(),
            visited,
            ..Default::default()
        }
    }

    pub fn found(&self) -> bool {
        !self.paths.is_empty()
    }
}

/// Cancellation and progress plumbing handed to a resolver
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    pub cancel: CancelToken,
    pub progress: ProgressSink,
}

impl SearchContext {
    pub fn new(cancel: CancelToken, progress: ProgressSink) -> Self {
        Self { cancel, progress }
    }

    /// Same cancellation, no progress events
    pub fn quiet(&self) -> Self {
        Self {
            cancel: self.cancel.clone(),
            progress: ProgressSink::disabled(),
        }
    }

    pub(crate) fn emit(
        &self,
        db: &ElementsDatabase,
        current: ElementId,
        visited: usize,
        paths_found: usize,
        discovered: &[ElementId],
    ) {
        self.progress.emit_with(|| SearchProgress {
            current_element: db.name(current).to_string(),
            visited,
            paths_found,
            discovered: discovered.iter().map(|&id| db.name(id).to_string()).collect(),
        });
    }
}

/// Single-path resolver
pub struct Resolver;

impl Resolver {
    /// Run a query against a catalog.
    ///
    /// Unknown targets yield nothing with `visited = 0`. Basic targets, and
    /// targets already in the start set, yield nothing with `visited = 1`.
    pub fn execute(db: &ElementsDatabase, query: &ResolveQuery, ctx: &SearchContext) -> Resolution {
        tracing::debug!(
            "Resolving {} with {} from {:?}, quota={}",
            query.target,
            query.strategy,
            query.start,
            query.max_paths
        );

        let Some(target) = db.id(&query.target) else {
            tracing::debug!("Target '{}' not in catalog", query.target);
            return Resolution::trivial(&query.target, 0);
        };
        if db.element(target).is_basic || query.start.iter().any(|s| s == &query.target) {
            return Resolution::trivial(&query.target, 1);
        }

        let start = start_ids(db, &query.start);
        let resolution = match query.strategy {
            Strategy::Bfs => bfs::run(db, query, &start, target, ctx),
            Strategy::Dfs => dfs::run(db, query, &start, target, ctx),
        };

        tracing::debug!(
            "Resolved {}: {} path(s), {} visited{}",
            query.target,
            resolution.paths.len(),
            resolution.visited,
            if resolution.cancelled { " (cancelled)" } else { "" }
        );
        resolution
    }
}

/// Known start elements in query order, without repeats
fn start_ids(db: &ElementsDatabase, start: &[String]) -> Vec<ElementId> {
    let mut seen = HashSet::new();
    start
        .iter()
        .filter_map(|name| {
            let id = db.id(name);
            if id.is_none() {
                tracing::debug!("Ignoring unknown start element '{}'", name);
            }
            id
        })
        .filter(|id| seen.insert(*id))
        .collect()
}

pub(crate) fn ordered(a: ElementId, b: ElementId) -> (ElementId, ElementId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

pub(crate) fn step(db: &ElementsDatabase, a: ElementId, b: ElementId, result: ElementId) -> RecipeStep {
    RecipeStep::new(db.name(a), db.name(b), db.name(result))
}
