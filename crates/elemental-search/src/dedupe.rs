//! Duplicate suppression for accepted paths

use std::collections::HashSet;

use elemental_core::{Path, StepSignature};

/// Whether `candidate` repeats `existing`: same length, and every
/// order-normalized step of the candidate appears in `existing`
pub fn is_duplicate(candidate: &Path, existing: &Path) -> bool {
    candidate.len() == existing.len() && candidate.signatures().is_subset(&existing.signatures())
}

/// Accepted paths with their signatures cached
#[derive(Debug, Clone, Default)]
pub struct PathSet {
    entries: Vec<(Path, HashSet<StepSignature>)>,
}

impl PathSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_equivalent(&self, candidate: &Path) -> bool {
        let signatures = candidate.signatures();
        self.entries.iter().any(|(path, existing)| {
            path.len() == candidate.len() && signatures.is_subset(existing)
        })
    }

    /// Accept `candidate` unless it duplicates an accepted path
    pub fn try_insert(&mut self, candidate: Path) -> bool {
        if self.contains_equivalent(&candidate) {
            return false;
        }
        let signatures = candidate.signatures();
        self.entries.push((candidate, signatures));
        true
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|(path, _)| path)
    }

    pub fn into_paths(self) -> Vec<Path> {
        self.entries.into_iter().map(|(path, _)| path).collect()
    }
}
