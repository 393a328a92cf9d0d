use super::CacheConfig;

/// `FormulaContextConfig` is a configuration for a [`FormulaContext`].
///
/// It defines whether CNF and DNF results are brought into the strict
/// three-level shape and which results are cached.
///
/// [`FormulaContext`]: super::FormulaContext
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FormulaContextConfig {
    /// If set, [`cnf_of`] and [`dnf_of`] return the strict normal form, in
    /// which every clause is wrapped into its own connective even if it is a
    /// single atom.
    ///
    /// [`cnf_of`]: super::FormulaContext::cnf_of
    /// [`dnf_of`]: super::FormulaContext::dnf_of
    pub strict: bool,
    /// A `FormulaContext` is able to cache results of transformations. The
    /// `CacheConfig` allows you to enable or disable the cache for specific
    /// transformations.
    pub caches: CacheConfig,
}

impl FormulaContextConfig {
    /// Creates a new `FormulaContextConfig` with strict normal forms and all
    /// caches enabled.
    pub fn new() -> Self {
        Self { strict: true, caches: CacheConfig::default() }
    }

    /// Sets whether normal forms are strict.
    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the cache configuration.
    #[must_use]
    pub const fn caches(mut self, caches: CacheConfig) -> Self {
        self.caches = caches;
        self
    }
}

impl Default for FormulaContextConfig {
    fn default() -> Self {
        Self::new()
    }
}
