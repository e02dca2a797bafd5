//! Breadth-first forward chaining.
//!
//! Everything discovered stays in the inventory: each popped element is
//! combined with every element discovered so far, and each unordered pair
//! is tried once per run.

use std::collections::{HashSet, VecDeque};

use elemental_core::{ElementId, ElementsDatabase, Path};

use crate::query::ResolveQuery;
use crate::resolver::{ordered, step, Resolution, SearchContext};

/// Frontier node; the path to it is recovered through `parent`
struct Node {
    element: ElementId,
    parent: Option<usize>,
    via: Option<(ElementId, ElementId)>,
}

pub(crate) fn run(
    db: &ElementsDatabase,
    query: &ResolveQuery,
    start: &[ElementId],
    target: ElementId,
    ctx: &SearchContext,
) -> Resolution {
    let banned = query.banned.resolve(db);
    let mut arena: Vec<Node> = Vec::with_capacity(start.len());
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut discovered: Vec<ElementId> = Vec::with_capacity(start.len());
    let mut seen: HashSet<ElementId> = HashSet::new();
    let mut tried: HashSet<(ElementId, ElementId)> = HashSet::new();

    for &id in start {
        arena.push(Node {
            element: id,
            parent: None,
            via: None,
        });
        queue.push_back(arena.len() - 1);
        seen.insert(id);
        discovered.push(id);
    }

    let mut resolution = Resolution {
        target: query.target.clone(),
        ..Default::default()
    };

    while let Some(index) = queue.pop_front() {
        if ctx.cancel.is_cancelled() {
            resolution.cancelled = true;
            break;
        }
        resolution.visited += 1;

        let current = arena[index].element;
        ctx.emit(
            db,
            current,
            resolution.visited,
            resolution.paths.len(),
            &discovered,
        );

        if current == target {
            resolution.paths.push(reconstruct(db, &arena, index));
            if query.quota_reached(resolution.paths.len()) {
                break;
            }
            continue;
        }

        // Elements discovered while expanding this node are paired later,
        // when they are popped themselves.
        let known = discovered.len();
        for k in 0..known {
            let other = discovered[k];
            if !tried.insert(ordered(current, other)) {
                continue;
            }
            for producer in db.producers(current, other) {
                if banned.contains(&(producer.result, producer.recipe_index)) {
                    continue;
                }
                if !query.tier_policy.allows(
                    db.rank(current),
                    db.rank(other),
                    db.rank(producer.result),
                ) {
                    continue;
                }
                arena.push(Node {
                    element: producer.result,
                    parent: Some(index),
                    via: Some((current, other)),
                });
                queue.push_back(arena.len() - 1);
                if seen.insert(producer.result) {
                    discovered.push(producer.result);
                }
            }
        }
    }

    resolution
}

fn reconstruct(db: &ElementsDatabase, arena: &[Node], mut index: usize) -> Path {
    let mut steps = Vec::new();
    loop {
        let node = &arena[index];
        if let Some((a, b)) = node.via {
            steps.push(step(db, a, b, node.element));
        }
        match node.parent {
            Some(parent) => index = parent,
            None => break,
        }
    }
    steps.reverse();
    Path::from_steps(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::BannedRecipes;
    use crate::resolver::Resolver;
    use elemental_core::{CancelToken, Element, ProgressSink, TierPolicy};

    fn db() -> ElementsDatabase {
        ElementsDatabase::new(vec![
            Element::new("Air", "Starting elements"),
            Element::new("Water", "Starting elements"),
            Element::new("Fire", "Starting elements"),
            Element::new("Earth", "Starting elements"),
            Element::new("Steam", "Tier 1 elements").with_recipe("Water", "Fire"),
            Element::new("Mud", "Tier 1 elements").with_recipe("Water", "Earth"),
            Element::new("Dust", "Tier 1 elements").with_recipe("Air", "Earth"),
            Element::new("Cloud", "Tier 2 elements")
                .with_recipe("Steam", "Air")
                .with_recipe("Water", "Air"),
            Element::new("Rain", "Tier 3 elements").with_recipe("Cloud", "Water"),
            Element::new("Swamp", "Tier 2 elements").with_recipe("Mud", "Dust"),
        ])
    }

    fn resolve(query: ResolveQuery) -> Resolution {
        Resolver::execute(&db(), &query, &SearchContext::default())
    }

    #[test]
    fn test_steam_single_step() {
        let resolution = resolve(ResolveQuery::new("Steam"));
        assert_eq!(resolution.paths.len(), 1);
        let path = &resolution.paths[0];
        assert_eq!(path.len(), 1);
        assert_eq!(path.final_result(), Some("Steam"));
        assert!(resolution.visited >= 2);
    }

    #[test]
    fn test_multi_step_chain() {
        let resolution = resolve(ResolveQuery::new("Rain"));
        assert_eq!(resolution.paths.len(), 1);
        let path = &resolution.paths[0];
        assert_eq!(path.final_result(), Some("Rain"));
        assert!(path.respects_tiers(&db(), &TierPolicy::default()));
    }

    #[test]
    fn test_raw_path_may_skip_side_ingredients() {
        // Swamp needs Mud and Dust; the frontier chain only carries one of them
        let resolution = resolve(ResolveQuery::new("Swamp"));
        let path = &resolution.paths[0];
        assert_eq!(path.final_result(), Some("Swamp"));
        assert!(path.first_gap(&elemental_core::default_start_elements()).is_some());
    }

    #[test]
    fn test_quota_collects_several_occurrences() {
        let resolution = resolve(ResolveQuery::new("Cloud").with_max_paths(0));
        assert!(resolution.paths.len() >= 2);
        let first = &resolution.paths[0];
        assert!(resolution.paths.iter().all(|p| p.len() >= first.len()));
    }

    #[test]
    fn test_banned_recipe_steers_last_step() {
        let banned = BannedRecipes::for_element("Cloud", [1]);
        let resolution = resolve(ResolveQuery::new("Cloud").with_banned(banned));
        let path = &resolution.paths[0];
        let last = path.steps().last().unwrap();
        assert!(last.ingredients().contains(&"Steam"));
    }

    #[test]
    fn test_all_recipes_banned() {
        let banned = BannedRecipes::for_element("Steam", [0]);
        let resolution = resolve(ResolveQuery::new("Steam").with_banned(banned));
        assert!(!resolution.found());
        assert!(resolution.visited > 0);
    }

    #[test]
    fn test_cancelled_run_returns_nothing() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let ctx = SearchContext::new(cancel, ProgressSink::disabled());
        let resolution = Resolver::execute(&db(), &ResolveQuery::new("Rain"), &ctx);
        assert!(resolution.cancelled);
        assert!(!resolution.found());
        assert_eq!(resolution.visited, 0);
    }

    #[test]
    fn test_progress_events_emitted() {
        let (sink, mut rx) = ProgressSink::channel(1024);
        let ctx = SearchContext::new(CancelToken::new(), sink);
        let resolution = Resolver::execute(&db(), &ResolveQuery::new("Rain"), &ctx);
        let mut events = 0;
        while let Ok(event) = rx.try_recv() {
            assert!(event.visited >= 1);
            assert!(event.discovered.len() >= 4);
            events += 1;
        }
        assert_eq!(events, resolution.visited);
    }
}
