//! Multi-path orchestrator.
//!
//! A generator feeds [`SearchTask`]s to a fixed worker pool. Each worker
//! runs resolve + repair on a blocking thread under a per-task deadline and
//! hands complete paths to a single collector, which owns duplicate
//! suppression and cancels the run once the quota is met.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use elemental_core::{CancelToken, ElementsDatabase, Path, ProgressSink};
use futures::future::join_all;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::resolve_single_with;
use crate::config::SearchConfig;
use crate::dedupe::PathSet;
use crate::error::{SearchError, SearchOutcome};
use crate::plan::{SearchTask, TaskPlan};
use crate::query::ResolveQuery;
use crate::repair::Repairer;
use crate::report::{SearchReport, SearchStats};
use crate::resolver::{Resolver, SearchContext};

/// How often blocked tasks re-check cancellation
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How often the generator checks whether issued tasks have settled
const SETTLE_INTERVAL: Duration = Duration::from_millis(5);

/// State touched by workers, generator and collector
#[derive(Debug, Default)]
struct SharedState {
    paths: PathSet,
    visited: usize,
    stats: SearchStats,
    used_recipes: BTreeSet<usize>,
    /// Tasks whose outcome has been fully recorded
    settled: usize,
}

type Shared = Arc<Mutex<SharedState>>;

fn lock(state: &Shared) -> MutexGuard<'_, SharedState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Path handed from a worker to the collector
#[derive(Debug)]
struct Candidate {
    task_id: usize,
    path: Path,
    target_recipe: Option<usize>,
}

/// What one task produced
#[derive(Debug)]
enum TaskOutcome {
    Found {
        path: Path,
        target_recipe: Option<usize>,
        visited: usize,
    },
    Incomplete {
        unresolved: Vec<String>,
        visited: usize,
    },
    NotFound {
        visited: usize,
        cancelled: bool,
    },
}

/// Parallel search for several distinct paths to one target
#[derive(Clone)]
pub struct MultiPathSearch {
    db: Arc<ElementsDatabase>,
    config: SearchConfig,
    progress: ProgressSink,
}

impl MultiPathSearch {
    pub fn new(db: Arc<ElementsDatabase>, config: SearchConfig) -> Self {
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

    /// Collect up to `wanted` distinct paths before `deadline` elapses.
    ///
    /// Fewer paths than requested is a normal outcome. Errors are limited
    /// to worker panics.
    pub async fn run(
        &self,
        target: &str,
        wanted: usize,
        deadline: Duration,
    ) -> SearchOutcome<SearchReport> {
        let started = Instant::now();
        let wanted = wanted.max(1);

        let recipe_count = match self.db.get(target) {
            None => {
                tracing::debug!("Target '{}' not in catalog", target);
                return Ok(finish(SearchReport::empty(target, 0), started));
            }
            Some(element) if element.is_basic => {
                return Ok(finish(SearchReport::empty(target, 1), started));
            }
            Some(element) => element.recipes.len(),
        };

        let root = CancelToken::with_timeout(deadline);
        // Workers and blocking resolvers stop if this future is dropped
        let _cancel_on_drop = root.drop_guard();
        if wanted == 1 {
            return self.run_single(target, root, started).await;
        }

        let workers = self.config.worker_count();
        tracing::info!(
            "Searching {} path(s) to {} with {} workers, deadline {:?}",
            wanted,
            target,
            workers,
            deadline
        );

        let state: Shared = Arc::new(Mutex::new(SharedState::default()));
        let (task_tx, task_rx) = mpsc::channel::<SearchTask>(workers * 2);
        let task_rx = Arc::new(tokio::sync::Mutex::new(task_rx));
        let (path_tx, path_rx) = mpsc::channel::<Candidate>(workers * 2);

        let collector = tokio::spawn(collect(
            path_rx,
            state.clone(),
            root.clone(),
            wanted,
            self.progress.clone(),
            target.to_string(),
        ));

        let plan = TaskPlan::new(target, &self.config.start_elements, recipe_count, &self.config);
        let failure_budget = wanted.saturating_mul(self.config.failure_budget_factor.max(1));
        let generator = tokio::spawn(generate(
            plan,
            task_tx,
            state.clone(),
            root.clone(),
            wanted,
            failure_budget,
        ));

        let handles: Vec<JoinHandle<SearchOutcome<()>>> = (0..workers)
            .map(|worker_id| {
                tokio::spawn(self.clone().work(
                    worker_id,
                    target.to_string(),
                    task_rx.clone(),
                    path_tx.clone(),
                    state.clone(),
                    root.clone(),
                ))
            })
            .collect();
        drop(path_tx);

        let mut failure: Option<SearchError> = None;
        for joined in join_all(handles).await {
            let result = joined.map_err(SearchError::from).and_then(|r| r);
            if let Err(err) = result {
                tracing::error!("Search worker failed: {}", err);
                failure.get_or_insert(err);
            }
        }
        root.cancel();

        if let Err(err) = generator.await {
            tracing::error!("Task generator failed: {}", err);
            failure.get_or_insert(err.into());
        }
        match tokio::time::timeout(self.config.collector_grace(), collector).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                failure.get_or_insert(err.into());
            }
            Err(_) => tracing::warn!("Collector did not drain within the grace period"),
        }
        if let Some(err) = failure {
            return Err(err);
        }

        let shared = std::mem::take(&mut *lock(&state));
        let report = SearchReport {
            target: target.to_string(),
            paths: shared.paths.into_paths(),
            visited: shared.visited,
            elapsed_ms: 0,
            stats: shared.stats,
        };
        let report = finish(report, started);
        tracing::info!(
            "Found {}/{} path(s) to {} in {}ms ({} tasks, {} failed, {} duplicates)",
            report.paths.len(),
            wanted,
            target,
            report.elapsed_ms,
            report.stats.tasks_run,
            report.stats.failed_attempts,
            report.stats.duplicates_rejected
        );
        Ok(report)
    }

    /// One resolve + repair with the overall deadline
    async fn run_single(
        &self,
        target: &str,
        root: CancelToken,
        started: Instant,
    ) -> SearchOutcome<SearchReport> {
        let db = self.db.clone();
        let config = self.config.clone();
        let owned = target.to_string();
        let ctx = SearchContext::new(root, self.progress.clone());
        let report = tokio::task::spawn_blocking(move || {
            resolve_single_with(&db, &owned, &config, &ctx)
        })
        .await?;
        Ok(finish(report, started))
    }

    /// Resolve then repair; blocking
    fn attempt(&self, query: &ResolveQuery, start: &[String], ctx: &SearchContext) -> TaskOutcome {
        let resolution = Resolver::execute(&self.db, query, ctx);
        let mut visited = resolution.visited;
        let Some(raw) = resolution.paths.into_iter().next() else {
            return TaskOutcome::NotFound {
                visited,
                cancelled: resolution.cancelled,
            };
        };

        let repaired = Repairer::new(&self.db, start)
            .with_policy(query.tier_policy)
            .with_max_passes(self.config.repair_max_passes)
            .run(raw, ctx);
        visited += repaired.visited;

        if !repaired.is_complete() {
            return TaskOutcome::Incomplete {
                unresolved: repaired.unresolved,
                visited,
            };
        }
        let used = repaired.path.recipe_indices(&self.db);
        tracing::trace!("Recipes used for {}: {:?}", query.target, used);
        let target_recipe = used.get(&query.target).copied();
        TaskOutcome::Found {
            path: repaired.path,
            target_recipe,
            visited,
        }
    }

    async fn work(
        self,
        worker_id: usize,
        target: String,
        tasks: Arc<tokio::sync::Mutex<mpsc::Receiver<SearchTask>>>,
        paths: mpsc::Sender<Candidate>,
        state: Shared,
        root: CancelToken,
    ) -> SearchOutcome<()> {
        let task_timeout = self.config.task_timeout();

        loop {
            if root.is_cancelled() {
                break;
            }
            let next = {
                let mut rx = tasks.lock().await;
                tokio::time::timeout(POLL_INTERVAL, rx.recv()).await
            };
            let task = match next {
                Ok(Some(task)) => task,
                Ok(None) => break,
                Err(_) => continue,
            };

            tracing::debug!(
                "Worker {} running task {} ({:?}, start {:?})",
                worker_id,
                task.id,
                task.phase,
                task.start
            );
            let child = root.child_with_deadline(Instant::now() + task_timeout);
            let query = ResolveQuery::from_config(target.as_str(), &self.config)
                .from_elements(task.start.clone())
                .with_banned(task.banned.clone())
                .with_max_paths(1);
            let ctx = SearchContext::new(child.clone(), self.progress.clone());
            let search = self.clone();
            let start = task.start.clone();
            let handle =
                tokio::task::spawn_blocking(move || search.attempt(&query, &start, &ctx));

            let outcome = match tokio::time::timeout(task_timeout, handle).await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(err)) => {
                    root.cancel();
                    return Err(err.into());
                }
                Err(_) => {
                    child.cancel();
                    tracing::debug!("Task {} timed out", task.id);
                    let mut shared = lock(&state);
                    shared.stats.tasks_run += 1;
                    shared.stats.failed_attempts += 1;
                    shared.settled += 1;
                    continue;
                }
            };

            let candidate = {
                let mut shared = lock(&state);
                shared.stats.tasks_run += 1;
                match outcome {
                    TaskOutcome::Found {
                        path,
                        target_recipe,
                        visited,
                    } => {
                        shared.visited += visited;
                        Some(Candidate {
                            task_id: task.id,
                            path,
                            target_recipe,
                        })
                    }
                    TaskOutcome::Incomplete {
                        unresolved,
                        visited,
                    } => {
                        tracing::warn!(
                            "Task {} dropped a path with unresolved ingredients {:?}",
                            task.id,
                            unresolved
                        );
                        shared.visited += visited;
                        shared.stats.incomplete_repairs += 1;
                        shared.stats.failed_attempts += 1;
                        shared.settled += 1;
                        None
                    }
                    TaskOutcome::NotFound { visited, cancelled } => {
                        shared.visited += visited;
                        // Cancellation of the whole run is not a failed attempt
                        if !(cancelled && root.is_cancelled()) {
                            shared.stats.failed_attempts += 1;
                        }
                        shared.settled += 1;
                        None
                    }
                }
            };

            if let Some(candidate) = candidate {
                if paths.send(candidate).await.is_err() {
                    break;
                }
            }
        }

        tracing::debug!("Worker {} stopped", worker_id);
        Ok(())
    }
}

/// Issue tasks until the plan runs out, the quota is met, the failure
/// budget is spent or the run is cancelled.
///
/// Before the banned set grows, every issued task must settle so the
/// recipes used by accepted paths are known.
async fn generate(
    mut plan: TaskPlan,
    tasks: mpsc::Sender<SearchTask>,
    state: Shared,
    root: CancelToken,
    wanted: usize,
    failure_budget: usize,
) {
    loop {
        if plan.awaits_feedback() {
            loop {
                if root.is_cancelled() {
                    return;
                }
                if lock(&state).settled >= plan.issued() {
                    break;
                }
                tokio::time::sleep(SETTLE_INTERVAL).await;
            }
        }
        if root.is_cancelled() {
            break;
        }
        let used = {
            let shared = lock(&state);
            if shared.paths.len() >= wanted {
                break;
            }
            if shared.stats.failed_attempts > failure_budget {
                tracing::debug!(
                    "Failure budget spent after {} attempts",
                    shared.stats.failed_attempts
                );
                break;
            }
            shared.used_recipes.clone()
        };
        let Some(task) = plan.next_task(&used) else {
            tracing::debug!("Task plan exhausted");
            break;
        };

        let permit = loop {
            if root.is_cancelled() {
                return;
            }
            match tokio::time::timeout(POLL_INTERVAL, tasks.reserve()).await {
                Ok(Ok(permit)) => break permit,
                Ok(Err(_)) => return,
                Err(_) => continue,
            }
        };
        permit.send(task);
    }
}

/// Sole writer of the accepted path set
async fn collect(
    mut candidates: mpsc::Receiver<Candidate>,
    state: Shared,
    root: CancelToken,
    wanted: usize,
    progress: ProgressSink,
    target: String,
) {
    while let Some(candidate) = candidates.recv().await {
        let mut shared = lock(&state);
        shared.settled += 1;
        if shared.paths.len() >= wanted {
            continue;
        }
        let steps = candidate.path.len();
        if !shared.paths.try_insert(candidate.path) {
            shared.stats.duplicates_rejected += 1;
            tracing::debug!("Task {} returned a duplicate path", candidate.task_id);
            continue;
        }
        if let Some(index) = candidate.target_recipe {
            shared.used_recipes.insert(index);
        }
        tracing::debug!(
            "Accepted path {} from task {} ({} steps)",
            shared.paths.len(),
            candidate.task_id,
            steps
        );

        let found = shared.paths.len();
        let visited = shared.visited;
        drop(shared);
        progress.emit_with(|| elemental_core::SearchProgress {
            current_element: target.clone(),
            visited,
            paths_found: found,
            discovered: Vec::new(),
        });

        if found >= wanted {
            root.cancel();
        }
    }
}

fn finish(mut report: SearchReport, started: Instant) -> SearchReport {
    report.elapsed_ms = started.elapsed().as_millis() as u64;
    report
}
