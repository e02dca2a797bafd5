//! Depth-first descent with per-branch inventories.
//!
//! A branch may only combine start elements and what it produced itself, so
//! every path found is valid without repair. Each `(pair, result)` move is
//! explored at most once per run.

use std::collections::HashSet;

use elemental_core::{ElementId, ElementsDatabase, Path};

use crate::query::ResolveQuery;
use crate::resolver::{ordered, step, Resolution, SearchContext};

type Move = (ElementId, ElementId, ElementId);

struct Descent<'a> {
    db: &'a ElementsDatabase,
    query: &'a ResolveQuery,
    ctx: &'a SearchContext,
    target: ElementId,
    banned: HashSet<(ElementId, usize)>,
    available: Vec<ElementId>,
    inventory: HashSet<ElementId>,
    branch: Vec<Move>,
    explored: HashSet<Move>,
    resolution: Resolution,
}

pub(crate) fn run(
    db: &ElementsDatabase,
    query: &ResolveQuery,
    start: &[ElementId],
    target: ElementId,
    ctx: &SearchContext,
) -> Resolution {
    let mut descent = Descent {
        db,
        query,
        ctx,
        target,
        banned: query.banned.resolve(db),
        available: start.to_vec(),
        inventory: start.iter().copied().collect(),
        branch: Vec::new(),
        explored: HashSet::new(),
        resolution: Resolution {
            target: query.target.clone(),
            ..Default::default()
        },
    };

    for &root in start {
        if descent.descend(root, 0) {
            break;
        }
    }
    descent.resolution
}

impl Descent<'_> {
    /// Returns true once the search should stop
    fn descend(&mut self, current: ElementId, depth: usize) -> bool {
        if self.ctx.cancel.is_cancelled() {
            self.resolution.cancelled = true;
            return true;
        }
        self.resolution.visited += 1;
        self.ctx.emit(
            self.db,
            current,
            self.resolution.visited,
            self.resolution.paths.len(),
            &self.available,
        );

        if current == self.target {
            let path = self.branch_path();
            self.resolution.paths.push(path);
            return self.query.quota_reached(self.resolution.paths.len());
        }
        if depth >= self.query.max_depth {
            return false;
        }

        for (a, b, result) in self.candidates(current) {
            let (x, y) = ordered(a, b);
            if !self.explored.insert((x, y, result)) {
                continue;
            }

            self.available.push(result);
            self.inventory.insert(result);
            self.branch.push((a, b, result));

            let stop = self.descend(result, depth + 1);

            self.branch.pop();
            self.inventory.remove(&result);
            self.available.pop();

            if stop {
                return true;
            }
        }
        false
    }

    /// Legal moves from this branch, pairs involving `current` first
    fn candidates(&self, current: ElementId) -> Vec<Move> {
        let mut pairs: Vec<(ElementId, ElementId)> =
            self.available.iter().map(|&other| (current, other)).collect();
        for (i, &a) in self.available.iter().enumerate() {
            if a == current {
                continue;
            }
            for &b in &self.available[i..] {
                if b != current {
                    pairs.push((a, b));
                }
            }
        }

        let mut moves = Vec::new();
        for (a, b) in pairs {
            for producer in self.db.producers(a, b) {
                let result = producer.result;
                if self.inventory.contains(&result)
                    || self.banned.contains(&(result, producer.recipe_index))
                    || !self.query.tier_policy.allows(
                        self.db.rank(a),
                        self.db.rank(b),
                        self.db.rank(result),
                    )
                {
                    continue;
                }
                moves.push((a, b, result));
            }
        }
        moves
    }

    fn branch_path(&self) -> Path {
        self.branch
            .iter()
            .map(|&(a, b, result)| step(self.db, a, b, result))
            .collect::<Vec<_>>()
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Strategy;
    use crate::query::BannedRecipes;
    use crate::resolver::Resolver;
    use elemental_core::{default_start_elements, Element, TierPolicy};

    fn db() -> ElementsDatabase {
        ElementsDatabase::new(vec![
            Element::new("Air", "Starting elements"),
            Element::new("Water", "Starting elements"),
            Element::new("Fire", "Starting elements"),
            Element::new("Earth", "Starting elements"),
            Element::new("Steam", "Tier 1 elements").with_recipe("Water", "Fire"),
            Element::new("Mud", "Tier 1 elements").with_recipe("Water", "Earth"),
            Element::new("Dust", "Tier 1 elements").with_recipe("Air", "Earth"),
            Element::new("Swamp", "Tier 2 elements").with_recipe("Mud", "Dust"),
            Element::new("Bog", "Tier 3 elements")
                .with_recipe("Swamp", "Steam")
                .with_recipe("Swamp", "Water"),
        ])
    }

    fn dfs(target: &str) -> ResolveQuery {
        ResolveQuery::new(target).with_strategy(Strategy::Dfs)
    }

    #[test]
    fn test_dfs_paths_are_self_consistent() {
        let db = db();
        let resolution = Resolver::execute(&db, &dfs("Bog"), &SearchContext::default());
        assert_eq!(resolution.paths.len(), 1);
        let path = &resolution.paths[0];
        assert_eq!(path.final_result(), Some("Bog"));
        assert!(path.is_self_consistent(&default_start_elements()));
        assert!(path.respects_tiers(&db, &TierPolicy::default()));
    }

    #[test]
    fn test_dfs_depth_bound() {
        let resolution =
            Resolver::execute(&db(), &dfs("Swamp").with_max_depth(1), &SearchContext::default());
        assert!(!resolution.found());
        assert!(!resolution.cancelled);
        assert!(resolution.visited > 1);
    }

    #[test]
    fn test_dfs_respects_bans() {
        let db = db();
        let query = dfs("Bog").with_banned(BannedRecipes::for_element("Bog", [0]));
        let resolution = Resolver::execute(&db, &query, &SearchContext::default());
        let last = resolution.paths[0].steps().last().unwrap();
        assert!(last.ingredients().contains(&"Water"));
    }

    #[test]
    fn test_dfs_multiple_paths() {
        let resolution =
            Resolver::execute(&db(), &dfs("Bog").with_max_paths(0), &SearchContext::default());
        assert!(resolution.paths.len() >= 2);
        let finals: HashSet<String> = resolution
            .paths
            .iter()
            .map(|p| p.steps().last().unwrap().to_string())
            .collect();
        assert!(finals.len() >= 2);
    }
}
