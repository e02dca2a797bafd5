//! Diversification tasks for multi-path search.
//!
//! Tasks are issued in two phases. The shuffle phase walks permutations of
//! the start elements in lexicographic order with nothing banned. The
//! banning phase then grows a set of banned target recipes one index at a
//! time, retrying the original start order and a few rotations of it at
//! every step. The banned set never covers every recipe of the target.

use std::collections::{BTreeSet, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::query::BannedRecipes;

/// Which generation phase produced a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPhase {
    Shuffle,
    Banning { step: usize },
}

/// One unit of work for a search worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTask {
    pub id: usize,
    /// Start elements in traversal order
    pub start: Vec<String>,
    pub banned: BannedRecipes,
    pub phase: TaskPhase,
}

/// Lexicographic permutations of `items`, identity first, at most `limit`
pub fn permutations<T: Clone>(items: &[T], limit: usize) -> Vec<Vec<T>> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    let mut result = Vec::new();
    while result.len() < limit {
        result.push(order.iter().map(|&i| items[i].clone()).collect());
        if !next_permutation(&mut order) {
            break;
        }
    }
    result
}

fn next_permutation(order: &mut [usize]) -> bool {
    let Some(pivot) = (1..order.len()).rev().find(|&i| order[i - 1] < order[i]) else {
        return false;
    };
    let pivot = pivot - 1;
    let Some(swap) = (pivot + 1..order.len()).rev().find(|&j| order[j] > order[pivot]) else {
        return false;
    };
    order.swap(pivot, swap);
    order[pivot + 1..].reverse();
    true
}

/// Task generator for one target
#[derive(Debug)]
pub struct TaskPlan {
    target: String,
    recipe_count: usize,
    original: Vec<String>,
    shuffles: Vec<Vec<String>>,
    cursor: usize,
    permutations_per_ban: usize,
    banned: BTreeSet<usize>,
    ban_step: usize,
    pending: VecDeque<SearchTask>,
    issued: HashSet<(Vec<String>, BTreeSet<usize>)>,
    next_id: usize,
}

impl TaskPlan {
    pub fn new(
        target: impl Into<String>,
        start: &[String],
        recipe_count: usize,
        config: &SearchConfig,
    ) -> Self {
        Self {
            target: target.into(),
            recipe_count,
            original: start.to_vec(),
            shuffles: permutations(start, config.max_shuffle_tasks),
            cursor: 0,
            permutations_per_ban: config.permutations_per_ban,
            banned: BTreeSet::new(),
            ban_step: 0,
            pending: VecDeque::new(),
            issued: HashSet::new(),
            next_id: 0,
        }
    }

    /// Target recipe indices banned so far
    pub fn banned(&self) -> &BTreeSet<usize> {
        &self.banned
    }

    /// Tasks issued so far
    pub fn issued(&self) -> usize {
        self.next_id
    }

    /// Whether the next task depends on the outcome of every task issued
    /// so far (the next call grows the banned set)
    pub fn awaits_feedback(&self) -> bool {
        self.cursor >= self.shuffles.len() && self.pending.is_empty()
    }

    /// Next task, or `None` once both phases are exhausted.
    ///
    /// `used` holds the target recipe indices used by accepted paths; the
    /// banning phase bans those first.
    pub fn next_task(&mut self, used: &BTreeSet<usize>) -> Option<SearchTask> {
        while self.cursor < self.shuffles.len() {
            let order = self.shuffles[self.cursor].clone();
            self.cursor += 1;
            if let Some(task) = self.issue(order, TaskPhase::Shuffle) {
                return Some(task);
            }
        }

        loop {
            if let Some(task) = self.pending.pop_front() {
                return Some(task);
            }
            if !self.grow_ban(used) {
                return None;
            }
        }
    }

    fn grow_ban(&mut self, used: &BTreeSet<usize>) -> bool {
        if self.banned.len() + 1 >= self.recipe_count {
            return false;
        }
        let next = used
            .iter()
            .copied()
            .find(|i| *i < self.recipe_count && !self.banned.contains(i))
            .or_else(|| (0..self.recipe_count).find(|i| !self.banned.contains(i)));
        let Some(index) = next else {
            return false;
        };

        self.banned.insert(index);
        self.ban_step += 1;
        tracing::debug!(
            "Banning step {} for {}: {:?}",
            self.ban_step,
            self.target,
            self.banned
        );

        let phase = TaskPhase::Banning {
            step: self.ban_step,
        };
        let rotations = self
            .permutations_per_ban
            .min(self.original.len().saturating_sub(1));
        for shift in 0..=rotations {
            let mut order = self.original.clone();
            order.rotate_left(shift);
            if let Some(task) = self.issue(order, phase) {
                self.pending.push_back(task);
            }
        }
        true
    }

    fn issue(&mut self, start: Vec<String>, phase: TaskPhase) -> Option<SearchTask> {
        if !self.issued.insert((start.clone(), self.banned.clone())) {
            return None;
        }
        let task = SearchTask {
            id: self.next_id,
            start,
            banned: BannedRecipes::for_element(self.target.clone(), self.banned.iter().copied()),
            phase,
        };
        self.next_id += 1;
        Some(task)
    }
}
