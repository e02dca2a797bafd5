//! Ordered recipe sequences and their validity checks

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::database::ElementsDatabase;
use crate::element::{RecipeStep, StepSignature};
use crate::tier::TierPolicy;

/// First ingredient in a path that is used before it is available
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gap {
    /// Index of the step that needs the ingredient
    pub step: usize,
    /// The missing ingredient
    pub ingredient: String,
}

/// Steps that build a target from a start set.
///
/// A path is valid when every ingredient of step `i` is a start element or
/// the result of some step `j < i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    steps: Vec<RecipeStep>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_steps(steps: Vec<RecipeStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[RecipeStep] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<RecipeStep> {
        self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn push(&mut self, step: RecipeStep) {
        self.steps.push(step);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RecipeStep> {
        self.steps.iter()
    }

    /// Element produced by the last step
    pub fn final_result(&self) -> Option<&str> {
        self.steps.last().map(|s| s.result.as_str())
    }

    /// Locate the first ingredient used before it is produced
    pub fn first_gap<S: AsRef<str>>(&self, start: &[S]) -> Option<Gap> {
        let mut available: HashSet<&str> = start.iter().map(AsRef::as_ref).collect();
        for (index, step) in self.steps.iter().enumerate() {
            for ingredient in step.ingredients() {
                if !available.contains(ingredient) {
                    return Some(Gap {
                        step: index,
                        ingredient: ingredient.to_string(),
                    });
                }
            }
            available.insert(step.result.as_str());
        }
        None
    }

    pub fn is_self_consistent<S: AsRef<str>>(&self, start: &[S]) -> bool {
        self.first_gap(start).is_none()
    }

    /// Whether every step passes the tier gate and names known elements
    pub fn respects_tiers(&self, db: &ElementsDatabase, policy: &TierPolicy) -> bool {
        self.steps.iter().all(|step| {
            match (db.get(&step.first), db.get(&step.second), db.get(&step.result)) {
                (Some(a), Some(b), Some(r)) => {
                    policy.allows(a.tier_rank(), b.tier_rank(), r.tier_rank())
                }
                _ => false,
            }
        })
    }

    /// Order-normalized `(a, b) -> result` set used for duplicate detection
    pub fn signatures(&self) -> HashSet<StepSignature> {
        self.steps.iter().map(RecipeStep::signature).collect()
    }

    /// Catalog recipe index used for each produced element
    pub fn recipe_indices(&self, db: &ElementsDatabase) -> BTreeMap<String, usize> {
        self.steps
            .iter()
            .filter_map(|step| {
                db.recipe_index(&step.result, &step.first, &step.second)
                    .map(|index| (step.result.clone(), index))
            })
            .collect()
    }
}

impl From<Vec<RecipeStep>> for Path {
    fn from(steps: Vec<RecipeStep>) -> Self {
        Self::from_steps(steps)
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a RecipeStep;
    type IntoIter = std::slice::Iter<'a, RecipeStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
