//! Public entry points

use std::sync::Arc;
use std::time::{Duration, Instant};

use elemental_core::limits::{
    validate_deadline_secs, validate_element_name, validate_start_elements, validate_wanted_paths,
};
use elemental_core::{CancelToken, ElementsDatabase, ProgressSink};

use crate::config::SearchConfig;
use crate::error::SearchOutcome;
use crate::orchestrator::MultiPathSearch;
use crate::query::ResolveQuery;
use crate::repair::Repairer;
use crate::report::SearchReport;
use crate::resolver::{Resolver, SearchContext};

/// First path from `start` to `target`, repaired. Blocks the caller.
///
/// Unknown targets report `visited = 0`, basic ones `visited = 1`; neither
/// is an error.
pub fn resolve_single(db: &ElementsDatabase, start: &[String], target: &str) -> SearchReport {
    let config = SearchConfig::default().with_start_elements(start.to_vec());
    resolve_single_with(db, target, &config, &SearchContext::default())
}

/// [`resolve_single`] with explicit configuration, cancellation and progress
pub fn resolve_single_with(
    db: &ElementsDatabase,
    target: &str,
    config: &SearchConfig,
    ctx: &SearchContext,
) -> SearchReport {
    let started = Instant::now();
    let query = ResolveQuery::from_config(target, config).with_max_paths(1);
    let resolution = Resolver::execute(db, &query, ctx);

    let mut report = SearchReport::empty(target, resolution.visited);
    report.stats.tasks_run = 1;

    match resolution.paths.into_iter().next() {
        Some(raw) => {
            let repaired = Repairer::new(db, &config.start_elements)
                .with_policy(config.tier_policy)
                .with_max_passes(config.repair_max_passes)
                .run(raw, ctx);
            report.visited += repaired.visited;
            if repaired.is_complete() {
                report.paths.push(repaired.path);
            } else {
                tracing::warn!(
                    "Dropping path to {}: unresolved ingredients {:?}",
                    target,
                    repaired.unresolved
                );
                report.stats.incomplete_repairs = 1;
                report.stats.failed_attempts = 1;
            }
        }
        None if !is_trivial(db, target, &config.start_elements) => {
            report.stats.failed_attempts = 1;
        }
        None => {}
    }

    report.elapsed_ms = started.elapsed().as_millis() as u64;
    report
}

/// Unknown, basic and already-available targets need no steps
fn is_trivial(db: &ElementsDatabase, target: &str, start: &[String]) -> bool {
    db.get(target).map_or(true, |e| e.is_basic) || start.iter().any(|s| s == target)
}

/// Up to `wanted` distinct paths within `deadline_secs`, using every core
pub async fn resolve_multiple(
    db: Arc<ElementsDatabase>,
    target: &str,
    wanted: usize,
    deadline_secs: u64,
) -> SearchOutcome<SearchReport> {
    PathFinder::new(db)
        .find_many(target, wanted, deadline_secs)
        .await
}

/// Catalog handle plus search settings; the shape front-ends hold on to
#[derive(Clone)]
pub struct PathFinder {
    db: Arc<ElementsDatabase>,
    config: SearchConfig,
    progress: ProgressSink,
}

impl PathFinder {
    pub fn new(db: Arc<ElementsDatabase>) -> Self {
        Self::with_config(db, SearchConfig::default())
    }

    pub fn with_config(db: Arc<ElementsDatabase>, config: SearchConfig) -> Self {
        Self {
            db,
            config,
            progress: ProgressSink::disabled(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressSink) -> Self {
        self.progress = progress;
        self
    }

    pub fn database(&self) -> &ElementsDatabase {
        &self.db
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Single repaired path, run on the blocking pool
    pub async fn find_one(&self, target: &str, deadline_secs: u64) -> SearchOutcome<SearchReport> {
        self.validate(target, 1, deadline_secs)?;
        let db = self.db.clone();
        let config = self.config.clone();
        let target = target.to_string();
        let cancel = CancelToken::with_timeout(Duration::from_secs(deadline_secs));
        let _cancel_on_drop = cancel.drop_guard();
        let ctx = SearchContext::new(cancel, self.progress.clone());
        let report = tokio::task::spawn_blocking(move || {
            resolve_single_with(&db, &target, &config, &ctx)
        })
        .await?;
        Ok(report)
    }

    /// Distinct paths, fanned out over the worker pool
    pub async fn find_many(
        &self,
        target: &str,
        wanted: usize,
        deadline_secs: u64,
    ) -> SearchOutcome<SearchReport> {
        self.validate(target, wanted, deadline_secs)?;
        MultiPathSearch::new(self.db.clone(), self.config.clone())
            .with_progress(self.progress.clone())
            .run(target, wanted, Duration::from_secs(deadline_secs))
            .await
    }

    fn validate(&self, target: &str, wanted: usize, deadline_secs: u64) -> SearchOutcome<()> {
        validate_element_name(target)?;
        validate_wanted_paths(wanted)?;
        validate_deadline_secs(deadline_secs)?;
        validate_start_elements(&self.config.start_elements)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use elemental_core::{default_start_elements, Element, ValidationError};

    fn db() -> ElementsDatabase {
        ElementsDatabase::new(vec![
            Element::new("Air", "Starting elements"),
            Element::new("Water", "Starting elements"),
            Element::new("Fire", "Starting elements"),
            Element::new("Earth", "Starting elements"),
            Element::new("Steam", "Tier 1 elements").with_recipe("Water", "Fire"),
        ])
    }

    #[test]
    fn test_resolve_single_steam() {
        let report = resolve_single(&db(), &default_start_elements(), "Steam");
        assert_eq!(report.paths.len(), 1);
        assert_eq!(report.paths[0].len(), 1);
        assert!(report.visited >= 2);
        assert_eq!(report.stats.failed_attempts, 0);
    }

    #[test]
    fn test_resolve_single_trivial_outcomes() {
        let report = resolve_single(&db(), &default_start_elements(), "Nothing");
        assert!(report.paths.is_empty());
        assert_eq!(report.visited, 0);
        assert_eq!(report.stats.failed_attempts, 0);

        let report = resolve_single(&db(), &default_start_elements(), "Water");
        assert!(report.paths.is_empty());
        assert_eq!(report.visited, 1);
    }

    #[tokio::test]
    async fn test_invalid_requests_rejected() {
        let finder = PathFinder::new(Arc::new(db()));
        let err = finder.find_many("Steam", 0, 5).await.unwrap_err();
        assert!(matches!(
            err,
            SearchError::Validation(ValidationError::NoPathsRequested)
        ));
        assert!(finder.find_many("", 2, 5).await.is_err());
        assert!(finder.find_one("Steam", 0).await.is_err());
    }

    #[tokio::test]
    async fn test_find_one() {
        let finder = PathFinder::new(Arc::new(db()));
        let report = finder.find_one("Steam", 5).await.unwrap();
        assert_eq!(report.paths.len(), 1);
        assert_eq!(finder.database().len(), 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_find_one_stops_when_dropped() {
        let mut elements: Vec<Element> = default_start_elements()
            .into_iter()
            .map(|name| Element::new(name, "Starting elements"))
            .collect();
        elements.push(Element::new("Plasma", "Tier 5 elements").with_recipe("Energy", "Ghost"));
        elements.extend((0..2000).map(|i| {
            Element::new(format!("Spark {}", i), "Tier 1 elements").with_recipe("Water", "Fire")
        }));

        let (sink, mut rx) = ProgressSink::channel(1024);
        let finder = PathFinder::new(Arc::new(ElementsDatabase::new(elements))).with_progress(sink);
        let handle = tokio::spawn(async move { finder.find_one("Plasma", 60).await });

        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.abort();
        let _ = handle.await;

        tokio::time::sleep(Duration::from_millis(300)).await;
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
    }
}
