use dashmap::DashMap;

use crate::formulas::Formula;

/// Thread-safe cache from formulas to results, keyed by structural equality.
pub struct OperationCache<V> {
    cache: DashMap<Formula, V>,
}

impl<V> OperationCache<V> {
    pub fn new() -> Self {
        Self { cache: DashMap::new() }
    }

    pub fn insert(&self, formula: Formula, value: V) {
        self.cache.entry(formula).or_insert(value);
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear(&self) {
        self.cache.clear();
    }
}

impl<V: Clone> OperationCache<V> {
    pub fn get(&self, formula: &Formula) -> Option<V> {
        self.cache.get(formula).map(|v| v.clone())
    }
}

impl<V> Default for OperationCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
