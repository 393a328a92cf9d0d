use log::trace;

use crate::datastructures::{Assignment, ClauseList};
use crate::errors::FormulaError;
use crate::handlers::FactorizationHandler;
use crate::operations::{functions, transformations};
use crate::parser;

use super::operation_cache::OperationCache;
use super::{Formula, FormulaContextConfig, Literal, SharedVariableMap};

/// Entry point bundling a variable registry with configuration and caches.
///
/// A `FormulaContext` owns a [`SharedVariableMap`]. Names used while parsing
/// or creating literals are resolved (and registered) there, so all formulas
/// created through one context share the same indices.
///
/// The context is `Sync`; it can be shared by reference or in an `Arc`
/// between threads. Transformations run concurrently, registry updates are
/// serialized by the map's lock and the caches are concurrent maps.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// # use featlogic::formulas::FormulaContext;
/// let ctx = FormulaContext::new();
///
/// let formula = ctx.parse("~(a & b) | c").unwrap();
/// let nnf = ctx.nnf_of(&formula);
///
/// assert_eq!(ctx.to_string(&nnf), "(~a | ~b) | c");
/// ```
pub struct FormulaContext {
    variables: SharedVariableMap,
    config: FormulaContextConfig,
    nnf_cache: OperationCache<Formula>,
    cnf_cache: OperationCache<Formula>,
    dnf_cache: OperationCache<Formula>,
}

impl Default for FormulaContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FormulaContext {
    /// Creates a new context with an empty registry and the default
    /// configuration.
    pub fn new() -> Self {
        Self::with_config(FormulaContextConfig::default())
    }

    /// Creates a new context with an empty registry and the given
    /// configuration.
    pub fn with_config(config: FormulaContextConfig) -> Self {
        Self::with_variables(SharedVariableMap::default(), config)
    }

    /// Creates a new context on top of an existing registry.
    pub fn with_variables(variables: SharedVariableMap, config: FormulaContextConfig) -> Self {
        Self {
            variables,
            config,
            nnf_cache: OperationCache::new(),
            cnf_cache: OperationCache::new(),
            dnf_cache: OperationCache::new(),
        }
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &FormulaContextConfig {
        &self.config
    }

    /// Returns the shared registry of this context.
    pub const fn variables(&self) -> &SharedVariableMap {
        &self.variables
    }

    /// Returns the positive literal of the boolean variable `name`,
    /// registering it if necessary.
    pub fn variable(&self, name: &str) -> Result<Formula, FormulaError> {
        self.literal(name, true)
    }

    /// Returns the literal of the boolean variable `name`, registering the
    /// variable if necessary.
    pub fn literal(&self, name: &str, positive: bool) -> Result<Formula, FormulaError> {
        self.lit(name, positive).map(Formula::Literal)
    }

    /// Like [`literal`](Self::literal), but returns the explicit type.
    pub fn lit(&self, name: &str, positive: bool) -> Result<Literal, FormulaError> {
        let index = self.variables.write().get_or_add_bool(name)?;
        Ok(Literal::new(index, positive))
    }

    /// Parses `input` in the syntax described in [`parser`](crate::parser).
    /// Unknown names are registered as boolean variables.
    pub fn parse(&self, input: &str) -> Result<Formula, FormulaError> {
        parser::parse(input, &mut self.variables.write())
    }

    /// Prints `formula` with the names of this context's registry.
    pub fn to_string(&self, formula: &Formula) -> String {
        formula.to_string(&self.variables.read())
    }

    /// Returns the strict NNF of `formula`, see
    /// [`transformations::nnf`].
    pub fn nnf_of(&self, formula: &Formula) -> Formula {
        if self.config.caches.nnf {
            if let Some(cached) = self.nnf_cache.get(formula) {
                trace!("nnf cache hit");
                return cached;
            }
        }
        let result = transformations::nnf(formula);
        if self.config.caches.nnf {
            self.nnf_cache.insert(formula.clone(), result.clone());
        }
        result
    }

    /// Returns a CNF of `formula`, strict if the configuration says so, see
    /// [`transformations::cnf`].
    pub fn cnf_of(&self, formula: &Formula) -> Result<Formula, FormulaError> {
        if self.config.caches.cnf {
            if let Some(cached) = self.cnf_cache.get(formula) {
                trace!("cnf cache hit");
                return Ok(cached);
            }
        }
        let result = transformations::cnf(formula, self.config.strict)?;
        if self.config.caches.cnf {
            self.cnf_cache.insert(formula.clone(), result.clone());
        }
        Ok(result)
    }

    /// Returns a CNF of `formula` under the control of `handler`. The result
    /// is not cached.
    pub fn cnf_with_handler(
        &self,
        formula: &Formula,
        handler: &mut dyn FactorizationHandler,
    ) -> Result<Formula, FormulaError> {
        transformations::cnf_with_handler(formula, self.config.strict, handler)
    }

    /// Returns a DNF of `formula`, strict if the configuration says so, see
    /// [`transformations::dnf`].
    pub fn dnf_of(&self, formula: &Formula) -> Result<Formula, FormulaError> {
        if self.config.caches.dnf {
            if let Some(cached) = self.dnf_cache.get(formula) {
                trace!("dnf cache hit");
                return Ok(cached);
            }
        }
        let result = transformations::dnf(formula, self.config.strict)?;
        if self.config.caches.dnf {
            self.dnf_cache.insert(formula.clone(), result.clone());
        }
        Ok(result)
    }

    /// Evaluates `formula` under `assignment`, see [`functions::evaluate`].
    pub fn evaluate(&self, formula: &Formula, assignment: &dyn Assignment) -> Result<Option<bool>, FormulaError> {
        functions::evaluate(formula, assignment, &self.variables.read())
    }

    /// Encodes a CNF as signed-integer clauses. The variable count is the
    /// largest index of the registry.
    pub fn clause_list(&self, cnf: &Formula) -> Result<ClauseList, FormulaError> {
        ClauseList::from_cnf(cnf, self.variables.read().max_variable_index())
    }

    /// Drops all cached results.
    ///
    /// The caches of [`nnf_of`](Self::nnf_of), [`cnf_of`](Self::cnf_of) and
    /// [`dnf_of`](Self::dnf_of) are unbounded and only grow: every miss
    /// stores an owned copy of the input next to the result. Long-running
    /// callers converting many distinct formulas clear them periodically or
    /// disable them in the [`CacheConfig`](crate::formulas::CacheConfig).
    pub fn clear_caches(&self) {
        self.nnf_cache.clear();
        self.cnf_cache.clear();
        self.dnf_cache.clear();
    }

    #[cfg(test)]
    pub(crate) fn cached_results(&self) -> (usize, usize, usize) {
        (self.nnf_cache.len(), self.cnf_cache.len(), self.dnf_cache.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulas::{CacheConfig, VariableMap};

    #[test]
    fn test_literals_share_registry() {
        let ctx = FormulaContext::new();
        let a = ctx.variable("a").unwrap();
        let na = ctx.literal("a", false).unwrap();
        assert_eq!(a.negated_atom(), Some(na));
        assert_eq!(ctx.variables().read().variable_count(), 1);
        assert_eq!(ctx.lit("b", true).unwrap().index(), 2);
    }

    #[test]
    fn test_caches() {
        let ctx = FormulaContext::new();
        let formula = ctx.parse("(a & b) | ~(c => d)").unwrap();
        let first = ctx.cnf_of(&formula).unwrap();
        let second = ctx.cnf_of(&formula).unwrap();
        assert_eq!(first, second);
        ctx.nnf_of(&formula);
        assert_eq!(ctx.cached_results(), (1, 1, 0));
        ctx.clear_caches();
        assert_eq!(ctx.cached_results(), (0, 0, 0));
    }

    #[test]
    fn test_disabled_caches() {
        let config = FormulaContextConfig::new().caches(CacheConfig::all_disabled());
        let ctx = FormulaContext::with_config(config);
        let formula = ctx.parse("a | b & c").unwrap();
        ctx.nnf_of(&formula);
        ctx.cnf_of(&formula).unwrap();
        ctx.dnf_of(&formula).unwrap();
        assert_eq!(ctx.cached_results(), (0, 0, 0));
    }

    #[test]
    fn test_non_strict_context() {
        let ctx = FormulaContext::with_config(FormulaContextConfig::new().strict(false));
        let a = ctx.variable("a").unwrap();
        assert_eq!(ctx.cnf_of(&a).unwrap(), a);
        let strict = FormulaContext::with_variables(ctx.variables().clone(), FormulaContextConfig::new());
        assert_eq!(
            strict.cnf_of(&a).unwrap(),
            Formula::and(vec![Formula::or(vec![a.clone()])])
        );
    }

    #[test]
    fn test_type_conflict() {
        let mut map = VariableMap::new();
        map.add_variable(Some("n"), None, crate::formulas::ValueType::Integer).unwrap();
        let ctx = FormulaContext::with_variables(
            crate::formulas::SharedVariableMap::new(map),
            FormulaContextConfig::default(),
        );
        assert!(matches!(ctx.variable("n"), Err(FormulaError::TypeMismatch { .. })));
        assert!(ctx.parse("n & a").is_err());
    }
}
