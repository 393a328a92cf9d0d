/// Specifies which transformations are allowed to cache their results.
///
/// A [`FormulaContext`](super::FormulaContext) can make use of caches to store
/// already calculated normal forms. Whether to use caches depends on the
/// application and is a trade-off between memory and recalculating already
/// known results. With larger formulas that are converted repeatedly, it
/// becomes more likely that a cache improves the performance.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CacheConfig {
    /// Used by [`FormulaContext::nnf_of`](super::FormulaContext::nnf_of).
    pub nnf: bool,
    /// Used by [`FormulaContext::cnf_of`](super::FormulaContext::cnf_of).
    pub cnf: bool,
    /// Used by [`FormulaContext::dnf_of`](super::FormulaContext::dnf_of).
    pub dnf: bool,
}

impl CacheConfig {
    /// Creates a configuration with all caches disabled.
    ///
    /// # Example
    ///
    /// Basic usage:
    ///
    /// ```
    /// # use featlogic::formulas::CacheConfig;
    ///
    /// let config = CacheConfig::all_disabled();
    /// assert!(!config.cnf);
    /// ```
    pub const fn all_disabled() -> Self {
        Self { nnf: false, cnf: false, dnf: false }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { nnf: true, cnf: true, dnf: true }
    }
}
