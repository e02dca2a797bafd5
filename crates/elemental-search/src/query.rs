//! Single-path resolve query builder

use std::collections::{BTreeMap, BTreeSet, HashSet};

use elemental_core::{default_start_elements, ElementId, ElementsDatabase, TierPolicy};
use serde::{Deserialize, Serialize};

use crate::config::{SearchConfig, Strategy};

/// Recipe indices a search must not use, per produced element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannedRecipes {
    banned: BTreeMap<String, BTreeSet<usize>>,
}

impl BannedRecipes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ban every index in `indices` for `element`
    pub fn for_element(element: impl Into<String>, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut banned = Self::new();
        let element = element.into();
        for index in indices {
            banned.ban(element.clone(), index);
        }
        banned
    }

    pub fn ban(&mut self, element: impl Into<String>, recipe_index: usize) {
        self.banned.entry(element.into()).or_default().insert(recipe_index);
    }

    pub fn is_banned(&self, element: &str, recipe_index: usize) -> bool {
        self.banned
            .get(element)
            .is_some_and(|indices| indices.contains(&recipe_index))
    }

    pub fn indices(&self, element: &str) -> Option<&BTreeSet<usize>> {
        self.banned.get(element)
    }

    pub fn is_empty(&self) -> bool {
        self.banned.values().all(BTreeSet::is_empty)
    }

    /// Resolve names against a catalog; unknown elements are dropped
    pub(crate) fn resolve(&self, db: &ElementsDatabase) -> HashSet<(ElementId, usize)> {
        self.banned
            .iter()
            .filter_map(|(name, indices)| db.id(name).map(|id| (id, indices)))
            .flat_map(|(id, indices)| indices.iter().map(move |&index| (id, index)))
            .collect()
    }
}

/// What a single resolver run should look for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveQuery {
    /// Target element name
    pub target: String,

    /// Elements available before the first step, in traversal order
    #[serde(default = "default_start_elements")]
    pub start: Vec<String>,

    /// Stop after this many paths (0 = drain the search space)
    #[serde(default = "default_max_paths")]
    pub max_paths: usize,

    /// Exploration order
    #[serde(default)]
    pub strategy: Strategy,

    /// Recipes the search may not use
    #[serde(default)]
    pub banned: BannedRecipes,

    /// Tier gate
    #[serde(default)]
    pub tier_policy: TierPolicy,

    /// Depth bound for depth-first exploration
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_paths() -> usize {
    1
}

fn default_max_depth() -> usize {
    100
}

impl ResolveQuery {
    /// Query for `target` starting from the seed elements
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            start: default_start_elements(),
            max_paths: default_max_paths(),
            strategy: Strategy::default(),
            banned: BannedRecipes::default(),
            tier_policy: TierPolicy::default(),
            max_depth: default_max_depth(),
        }
    }

    /// Query using the strategy, start set and limits of a config
    pub fn from_config(target: impl Into<String>, config: &SearchConfig) -> Self {
        Self::new(target)
            .from_elements(config.start_elements.clone())
            .with_strategy(config.strategy)
            .with_tier_policy(config.tier_policy)
            .with_max_depth(config.dfs_max_depth)
    }

    pub fn from_elements(mut self, start: Vec<String>) -> Self {
        self.start = start;
        self
    }

    pub fn with_max_paths(mut self, max_paths: usize) -> Self {
        self.max_paths = max_paths;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_banned(mut self, banned: BannedRecipes) -> Self {
        self.banned = banned;
        self
    }

    pub fn with_tier_policy(mut self, policy: TierPolicy) -> Self {
        self.tier_policy = policy;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Whether `found` paths satisfy the quota
    pub(crate) fn quota_reached(&self, found: usize) -> bool {
        self.max_paths > 0 && found >= self.max_paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elemental_core::Element;

    #[test]
    fn test_banned_recipes() {
        let mut banned = BannedRecipes::new();
        assert!(banned.is_empty());
        banned.ban("Mud", 0);
        banned.ban("Mud", 2);
        assert!(banned.is_banned("Mud", 2));
        assert!(!banned.is_banned("Mud", 1));
        assert!(!banned.is_banned("Steam", 0));
        assert_eq!(banned.indices("Mud").map(|s| s.len()), Some(2));
    }

    #[test]
    fn test_banned_resolution_drops_unknown_elements() {
        let db = ElementsDatabase::new(vec![Element::new("Mud", "Tier 1 elements")]);
        let mut banned = BannedRecipes::for_element("Mud", [0, 1]);
        banned.ban("Plasma", 0);
        let resolved = banned.resolve(&db);
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn test_query_builder() {
        let query = ResolveQuery::new("Steam")
            .from_elements(vec!["Water".into(), "Fire".into()])
            .with_max_paths(3)
            .with_strategy(Strategy::Dfs);
        assert_eq!(query.start.len(), 2);
        assert!(!query.quota_reached(2));
        assert!(query.quota_reached(3));
        assert!(!query.clone().with_max_paths(0).quota_reached(1000));
    }
}
