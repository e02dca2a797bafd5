//! Dependency repair: splice in sub-paths for ingredients a raw path uses
//! before producing them.

use std::collections::HashSet;

use elemental_core::{ElementsDatabase, Path, RecipeStep, TierPolicy};
use serde::{Deserialize, Serialize};

use crate::config::Strategy;
use crate::query::ResolveQuery;
use crate::resolver::{Resolver, SearchContext};

/// Default cap on repair passes
pub const DEFAULT_MAX_PASSES: usize = 50;

/// A repaired path and how it got there
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Repaired {
    pub path: Path,
    /// Ingredients still used before they are available, in path order
    pub unresolved: Vec<String>,
    pub passes: usize,
    /// Sub-paths spliced in
    pub spliced: usize,
    /// States visited by the sub-searches
    pub visited: usize,
}

impl Repaired {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Restart-scan repair loop with a pass cap
pub struct Repairer<'a> {
    db: &'a ElementsDatabase,
    start: &'a [String],
    policy: TierPolicy,
    max_passes: usize,
}

impl<'a> Repairer<'a> {
    pub fn new(db: &'a ElementsDatabase, start: &'a [String]) -> Self {
        Self {
            db,
            start,
            policy: TierPolicy::default(),
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    pub fn with_policy(mut self, policy: TierPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Make `path` self-consistent against the start set.
    ///
    /// Each pass fixes the first gap whose ingredient has not already proven
    /// unresolvable, then rescans from the top. Gaps left when the loop
    /// stops are reported in [`Repaired::unresolved`].
    pub fn run(&self, path: Path, ctx: &SearchContext) -> Repaired {
        let quiet = ctx.quiet();
        let mut steps = path.into_steps();
        let mut unresolvable: HashSet<String> = HashSet::new();
        let mut repaired = Repaired::default();

        while repaired.passes < self.max_passes {
            if ctx.cancel.is_cancelled() {
                tracing::debug!("Repair cancelled after {} passes", repaired.passes);
                break;
            }
            let Some((index, ingredient, available)) = self.next_gap(&steps, &unresolvable)
            else {
                break;
            };
            repaired.passes += 1;

            let query = ResolveQuery::new(ingredient.as_str())
                .from_elements(available)
                .with_strategy(Strategy::Bfs)
                .with_tier_policy(self.policy)
                .with_max_paths(1);
            let resolution = Resolver::execute(self.db, &query, &quiet);
            repaired.visited += resolution.visited;

            match resolution.paths.into_iter().next() {
                Some(sub) if !sub.is_empty() => {
                    tracing::trace!(
                        "Splicing {} step(s) for {} before step {}",
                        sub.len(),
                        ingredient,
                        index
                    );
                    steps.splice(index..index, sub.into_steps());
                    repaired.spliced += 1;
                }
                _ => {
                    tracing::warn!("No producing path for missing ingredient '{}'", ingredient);
                    unresolvable.insert(ingredient);
                }
            }
        }

        repaired.unresolved = remaining_gaps(&steps, self.start);
        repaired.path = Path::from_steps(steps);
        repaired
    }

    /// First gap worth repairing, with the elements available at that point
    fn next_gap(
        &self,
        steps: &[RecipeStep],
        unresolvable: &HashSet<String>,
    ) -> Option<(usize, String, Vec<String>)> {
        let mut available: Vec<String> = self.start.to_vec();
        let mut known: HashSet<&str> = self.start.iter().map(String::as_str).collect();

        for (index, step) in steps.iter().enumerate() {
            for ingredient in step.ingredients() {
                if !known.contains(ingredient) && !unresolvable.contains(ingredient) {
                    return Some((index, ingredient.to_string(), available));
                }
            }
            if known.insert(step.result.as_str()) {
                available.push(step.result.clone());
            }
        }
        None
    }
}

/// Every ingredient used before it is available, once each
fn remaining_gaps(steps: &[RecipeStep], start: &[String]) -> Vec<String> {
    let mut known: HashSet<&str> = start.iter().map(String::as_str).collect();
    let mut gaps: Vec<String> = Vec::new();
    for step in steps {
        for ingredient in step.ingredients() {
            if !known.contains(ingredient) && !gaps.iter().any(|g| g == ingredient) {
                gaps.push(ingredient.to_string());
            }
        }
        known.insert(step.result.as_str());
    }
    gaps
}
