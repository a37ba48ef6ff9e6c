use std::collections::{BTreeMap, BTreeSet};

/// Per-run bookkeeping of segment outcomes, keyed by segment index.
///
/// A plain value object: callers that want resumability persist it
/// themselves. Completed results come back out in index order, which is
/// exactly the order the recto/verso consolidation expects.
#[derive(Debug, Clone)]
pub struct ProcessingLedger<T> {
    total: usize,
    completed: BTreeMap<usize, T>,
    failed: BTreeSet<usize>,
}

impl<T> ProcessingLedger<T> {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: BTreeMap::new(),
            failed: BTreeSet::new(),
        }
    }

    pub fn is_complete(&self, index: usize) -> bool {
        self.completed.contains_key(&index)
    }

    /// A later success clears an earlier failure for the same index.
    pub fn mark_complete(&mut self, index: usize, result: T) {
        self.failed.remove(&index);
        self.completed.insert(index, result);
    }

    pub fn mark_failed(&mut self, index: usize) {
        if !self.completed.contains_key(&index) {
            self.failed.insert(index);
        }
    }

    /// Indices not yet completed, failed ones included: a rerun may still
    /// recover them.
    pub fn pending(&self) -> Vec<usize> {
        (0..self.total)
            .filter(|index| !self.completed.contains_key(index))
            .collect()
    }

    pub fn failed(&self) -> Vec<usize> {
        self.failed.iter().copied().collect()
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// "N of M segments succeeded" partial-success line.
    pub fn summary(&self) -> String {
        format!(
            "{} of {} segments succeeded",
            self.completed.len(),
            self.total
        )
    }

    /// Completed results in ascending index order.
    pub fn into_results(self) -> Vec<T> {
        self.completed.into_values().collect()
    }
}
