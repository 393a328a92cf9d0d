use fastrand::Rng;

use crate::errors::FormulaError;
use crate::formulas::{Comparator, Comparison, Formula, FormulaContext, Literal, Term, ValueType, VariableMap};

const COMPARATORS: [Comparator; 6] =
    [Comparator::Eq, Comparator::Ne, Comparator::Lt, Comparator::Le, Comparator::Gt, Comparator::Ge];

/// A configuration for randomizing formulas.
///
/// The following things can be configured:
/// - the seed -- equal seeds give equal sequences of formulas
/// - the boolean variables -- the probabilities of being chosen are the same
///   for all variables.
/// - the integer variables comparisons are built from; without them no
///   comparison is generated.
/// - weights for different formula types, defining how often a formula type is
///   generated compared to other types.
/// - maximum numbers of operands for conjunctions and disjunctions.
///
/// Note that the weights can only be applied for inner nodes of the generated
/// formula, since the 'leaves' of a formula are **always** atoms. So the
/// weight of atoms will effectively be higher and the weights of all other
/// formula types (especially conjunctions and disjunctions) will be lower.
#[derive(Clone, PartialEq, Debug)]
pub struct FormulaRandomizerConfig {
    pub(crate) seed: u64,
    pub(crate) variables: Vec<String>,
    pub(crate) comparison_variables: Vec<String>,
    pub(crate) weight_constant: f32,
    pub(crate) weight_variable: f32,
    pub(crate) weight_negative_literal: f32,
    pub(crate) weight_comparison: f32,
    pub(crate) weight_or: f32,
    pub(crate) weight_and: f32,
    pub(crate) weight_not: f32,
    pub(crate) weight_impl: f32,
    pub(crate) weight_equiv: f32,
    pub(crate) weight_quantifier: f32,
    pub(crate) maximum_operands_and: u32,
    pub(crate) maximum_operands_or: u32,
}

impl FormulaRandomizerConfig {
    /// Builds a basic configuration with the given variables and with default
    /// settings.
    ///
    /// # Example
    ///
    /// Basic usage:
    /// ```
    /// # use featlogic::util::formula_randomizer::FormulaRandomizerConfig;
    /// let variables = vec![String::from("A"), String::from("B")];
    /// let config = FormulaRandomizerConfig::default_with_variables(variables);
    /// ```
    pub fn default_with_variables(variables: Vec<String>) -> Self {
        Self {
            seed: 42_u64,
            variables,
            comparison_variables: Vec::new(),
            weight_constant: 0.1,
            weight_variable: 1.0,
            weight_negative_literal: 1.0,
            weight_comparison: 0.0,
            weight_or: 30.0,
            weight_and: 30.0,
            weight_not: 1.0,
            weight_impl: 1.0,
            weight_equiv: 1.0,
            weight_quantifier: 0.0,
            maximum_operands_and: 5,
            maximum_operands_or: 5,
        }
    }

    /// Builds a basic configuration with default settings. Additionally, it
    /// generates `num_vars` variables `v0`, `v1`, ... and adds them to the
    /// configuration.
    ///
    /// # Example
    ///
    /// Basic usage:
    /// ```
    /// # use featlogic::util::formula_randomizer::FormulaRandomizerConfig;
    /// let config = FormulaRandomizerConfig::default_with_num_vars(2);
    /// ```
    pub fn default_with_num_vars(num_vars: usize) -> Self {
        let width = num_vars.saturating_sub(1).to_string().len();
        Self::default_with_variables((0..num_vars).map(|n| format!("v{n:0width$}")).collect())
    }

    /// Updates the seed, which will be used to generate pseudo-random values.
    ///
    /// # Example
    ///
    /// Basic usage:
    /// ```
    /// # use featlogic::util::formula_randomizer::FormulaRandomizerConfig;
    /// # const NUMBER_OF_VARS: usize = 0;
    /// let config = FormulaRandomizerConfig::default_with_num_vars(NUMBER_OF_VARS)
    ///         // ...
    ///         .seed(24)
    ///         // ...
    ///         ;
    /// ```
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the integer variables of generated comparisons. They are
    /// registered as integer variables when the randomizer is created.
    ///
    /// # Example
    ///
    /// Basic usage:
    /// ```
    /// # use featlogic::util::formula_randomizer::FormulaRandomizerConfig;
    /// let config = FormulaRandomizerConfig::default_with_num_vars(3)
    ///         .comparison_variables(vec![String::from("size"), String::from("count")])
    ///         .weight_comparison(1.0);
    /// ```
    #[must_use]
    pub fn comparison_variables(mut self, comparison_variables: Vec<String>) -> Self {
        self.comparison_variables = comparison_variables;
        self
    }

    /// Sets the relative weight of a constant.
    #[must_use]
    pub const fn weight_constant(mut self, weight_constant: f32) -> Self {
        self.weight_constant = weight_constant;
        self
    }

    /// Sets the relative weight of a variable/positive literal.
    #[must_use]
    pub const fn weight_variable(mut self, weight_variable: f32) -> Self {
        self.weight_variable = weight_variable;
        self
    }

    /// Sets the relative weight of a negative literal.
    #[must_use]
    pub const fn weight_negative_literal(mut self, weight_negative_literal: f32) -> Self {
        self.weight_negative_literal = weight_negative_literal;
        self
    }

    /// Sets the relative weight of a comparison of two integer variables.
    /// Without [comparison variables](Self::comparison_variables) the weight
    /// is ignored.
    #[must_use]
    pub const fn weight_comparison(mut self, weight_comparison: f32) -> Self {
        self.weight_comparison = weight_comparison;
        self
    }

    /// Sets the relative weight of a disjunction.
    ///
    /// # Example
    ///
    /// Basic usage:
    /// ```
    /// # use featlogic::util::formula_randomizer::FormulaRandomizerConfig;
    /// # const NUMBER_OF_VARS: usize = 0;
    /// let config = FormulaRandomizerConfig::default_with_num_vars(NUMBER_OF_VARS)
    ///         // ...
    ///         .weight_or(25.0)
    ///         // ...
    ///         ;
    /// ```
    #[must_use]
    pub const fn weight_or(mut self, weight_or: f32) -> Self {
        self.weight_or = weight_or;
        self
    }

    /// Sets the relative weight of a conjunction.
    #[must_use]
    pub const fn weight_and(mut self, weight_and: f32) -> Self {
        self.weight_and = weight_and;
        self
    }

    /// Sets the relative weight of a negation.
    #[must_use]
    pub const fn weight_not(mut self, weight_not: f32) -> Self {
        self.weight_not = weight_not;
        self
    }

    /// Sets the relative weight of an implication.
    #[must_use]
    pub const fn weight_impl(mut self, weight_impl: f32) -> Self {
        self.weight_impl = weight_impl;
        self
    }

    /// Sets the relative weight of an equivalence.
    #[must_use]
    pub const fn weight_equiv(mut self, weight_equiv: f32) -> Self {
        self.weight_equiv = weight_equiv;
        self
    }

    /// Sets the relative weight of a quantified formula. Existential and
    /// universal quantifiers are equally likely.
    #[must_use]
    pub const fn weight_quantifier(mut self, weight_quantifier: f32) -> Self {
        self.weight_quantifier = weight_quantifier;
        self
    }

    /// Sets the maximum number of operands in a conjunction.
    ///
    /// # Example
    ///
    /// Basic usage:
    /// ```
    /// # use featlogic::util::formula_randomizer::FormulaRandomizerConfig;
    /// # const NUMBER_OF_VARS: usize = 0;
    /// let config = FormulaRandomizerConfig::default_with_num_vars(NUMBER_OF_VARS)
    ///         // ...
    ///         .maximum_operands_and(7)
    ///         // ...
    ///         ;
    /// ```
    #[must_use]
    pub const fn maximum_operands_and(mut self, maximum_operands_and: u32) -> Self {
        self.maximum_operands_and = maximum_operands_and;
        self
    }

    /// Sets the maximum number of operands in a disjunction.
    #[must_use]
    pub const fn maximum_operands_or(mut self, maximum_operands_or: u32) -> Self {
        self.maximum_operands_or = maximum_operands_or;
        self
    }

    fn compute_formula_type_probabilities(&self) -> FormulaTypeProbabilities {
        let weight_comparison = if self.comparison_variables.is_empty() { 0.0 } else { self.weight_comparison };
        let total = self.weight_constant
            + self.weight_variable
            + self.weight_negative_literal
            + weight_comparison
            + self.weight_or
            + self.weight_and
            + self.weight_not
            + self.weight_impl
            + self.weight_equiv
            + self.weight_quantifier;
        let constant = self.weight_constant / total;
        let literal = constant + (self.weight_variable + self.weight_negative_literal) / total;
        let comparison = literal + weight_comparison / total;
        let or = comparison + self.weight_or / total;
        let and = or + self.weight_and / total;
        let not = and + self.weight_not / total;
        let implication = not + self.weight_impl / total;
        let equivalence = implication + self.weight_equiv / total;
        let phase = self.weight_variable / (self.weight_variable + self.weight_negative_literal);
        FormulaTypeProbabilities { constant, literal, comparison, or, and, not, implication, equivalence, phase }
    }
}

struct FormulaTypeProbabilities {
    constant: f32,
    literal: f32,
    comparison: f32,
    or: f32,
    and: f32,
    not: f32,
    implication: f32,
    equivalence: f32,
    phase: f32,
}

/// A generator for random formulas.
///
/// The formula types included in the generated formulas can be configured with
/// a [`FormulaRandomizerConfig`]. The variables of the configuration are
/// registered in the context's registry when the randomizer is created, the
/// generated formulas refer to them by index.
pub struct FormulaRandomizer {
    config: FormulaRandomizerConfig,
    random: Rng,
    formula_probs: FormulaTypeProbabilities,
    variables: Vec<u32>,
    comparison_terms: Vec<Term>,
}

impl FormulaRandomizer {
    /// Builds a new `FormulaRandomizer` from a [`FormulaRandomizerConfig`].
    ///
    /// # Errors
    ///
    /// [`FormulaError::TypeMismatch`] if one of the configured names is
    /// already registered with another type.
    ///
    /// # Example
    ///
    /// Basic usage:
    /// ```
    /// # use featlogic::formulas::FormulaContext;
    /// # use featlogic::util::formula_randomizer::{FormulaRandomizerConfig, FormulaRandomizer};
    /// let ctx = FormulaContext::new();
    /// let config = FormulaRandomizerConfig::default_with_num_vars(5);
    /// let mut randomizer = FormulaRandomizer::new(config, &ctx).unwrap();
    ///
    /// let formula = randomizer.formula(3);
    /// ```
    pub fn new(config: FormulaRandomizerConfig, ctx: &FormulaContext) -> Result<Self, FormulaError> {
        let (variables, comparison_terms) = {
            let mut map = ctx.variables().write();
            let variables =
                config.variables.iter().map(|name| map.get_or_add_bool(name)).collect::<Result<Vec<_>, _>>()?;
            let terms = config
                .comparison_variables
                .iter()
                .map(|name| integer_variable(&mut map, name))
                .collect::<Result<Vec<_>, _>>()?;
            (variables, terms)
        };
        let formula_probs = config.compute_formula_type_probabilities();
        Ok(Self { random: Rng::with_seed(config.seed), config, formula_probs, variables, comparison_terms })
    }

    /// Returns a random constant.
    pub fn constant(&mut self) -> Formula {
        Formula::constant(self.random.bool())
    }

    /// Returns the index of a random variable.
    ///
    /// # Panics
    ///
    /// Panics if the configuration has no variables.
    pub fn variable_index(&mut self) -> u32 {
        self.variables[self.random.usize(0..self.variables.len())]
    }

    /// Returns a random variable, i.e. a positive literal.
    pub fn variable(&mut self) -> Formula {
        Formula::var(self.variable_index())
    }

    /// Returns a random literal.
    ///
    /// The probability of whether it is positive or negative depends on the
    /// configuration.
    pub fn literal(&mut self) -> Formula {
        let phase = self.random.f32() < self.formula_probs.phase;
        Formula::Literal(Literal::new(self.variable_index(), phase))
    }

    /// Returns a random comparison of two of the comparison variables, or a
    /// random literal if there are none.
    pub fn comparison(&mut self) -> Formula {
        if self.comparison_terms.is_empty() {
            return self.literal();
        }
        let left = self.comparison_terms[self.random.usize(0..self.comparison_terms.len())].clone();
        let right = self.comparison_terms[self.random.usize(0..self.comparison_terms.len())].clone();
        let comparator = COMPARATORS[self.random.usize(0..COMPARATORS.len())];
        match Comparison::new(comparator, left, right) {
            Ok(comparison) => Formula::compare(comparison),
            Err(_) => self.literal(),
        }
    }

    /// Returns a random atom: a constant, a literal or a comparison.
    ///
    /// # Example
    ///
    /// Basic usage:
    /// ```
    /// # use featlogic::formulas::FormulaContext;
    /// # use featlogic::util::formula_randomizer::{FormulaRandomizerConfig, FormulaRandomizer};
    /// # let ctx = FormulaContext::new();
    /// # let config = FormulaRandomizerConfig::default_with_num_vars(1);
    /// # let mut randomizer = FormulaRandomizer::new(config, &ctx).unwrap();
    /// let atom = randomizer.atom();
    ///
    /// assert!(atom.is_atomic());
    /// ```
    pub fn atom(&mut self) -> Formula {
        let n = self.random.f32() * self.formula_probs.comparison;
        if n < self.formula_probs.constant {
            self.constant()
        } else if n < self.formula_probs.literal {
            self.literal()
        } else {
            self.comparison()
        }
    }

    /// Returns a random negation with a given maximal depth.
    pub fn not(&mut self, max_depth: u32) -> Formula {
        if max_depth == 0 {
            self.atom()
        } else {
            Formula::not(self.formula(max_depth - 1))
        }
    }

    /// Returns a random implication with a given maximal depth.
    pub fn implication(&mut self, max_depth: u32) -> Formula {
        if max_depth == 0 {
            self.atom()
        } else {
            let left = self.formula(max_depth - 1);
            let right = self.formula(max_depth - 1);
            Formula::implies(left, right)
        }
    }

    /// Returns a random equivalence with a given maximal depth.
    pub fn equivalence(&mut self, max_depth: u32) -> Formula {
        if max_depth == 0 {
            self.atom()
        } else {
            let left = self.formula(max_depth - 1);
            let right = self.formula(max_depth - 1);
            Formula::biimplies(left, right)
        }
    }

    /// Returns a random conjunction with a given maximal depth.
    ///
    /// # Example
    ///
    /// Basic usage:
    /// ```
    /// # use featlogic::formulas::FormulaContext;
    /// # use featlogic::util::formula_randomizer::{FormulaRandomizerConfig, FormulaRandomizer};
    /// # let ctx = FormulaContext::new();
    /// # let config = FormulaRandomizerConfig::default_with_num_vars(10);
    /// # let mut randomizer = FormulaRandomizer::new(config, &ctx).unwrap();
    /// let conjunction = randomizer.and(2);
    ///
    /// assert!(conjunction.is_and());
    /// ```
    pub fn and(&mut self, max_depth: u32) -> Formula {
        if max_depth == 0 {
            self.atom()
        } else {
            let num_operands = self.random.u32(2..=self.config.maximum_operands_and.max(2));
            Formula::and((0..num_operands).map(|_| self.formula(max_depth - 1)).collect())
        }
    }

    /// Returns a random disjunction with a given maximal depth.
    pub fn or(&mut self, max_depth: u32) -> Formula {
        if max_depth == 0 {
            self.atom()
        } else {
            let num_operands = self.random.u32(2..=self.config.maximum_operands_or.max(2));
            Formula::or((0..num_operands).map(|_| self.formula(max_depth - 1)).collect())
        }
    }

    /// Returns a random quantified formula with a given maximal depth. The
    /// quantified variable is one of the boolean variables.
    pub fn quantifier(&mut self, max_depth: u32) -> Formula {
        if max_depth == 0 {
            self.atom()
        } else {
            let index = self.variable_index();
            let body = self.formula(max_depth - 1);
            if self.random.bool() {
                Formula::exists(index, body)
            } else {
                Formula::for_all(index, body)
            }
        }
    }

    /// Returns a random formula with a given maximal depth.
    ///
    /// # Example
    ///
    /// Basic usage:
    /// ```
    /// # use featlogic::formulas::FormulaContext;
    /// # use featlogic::operations::functions::formula_depth;
    /// # use featlogic::util::formula_randomizer::{FormulaRandomizerConfig, FormulaRandomizer};
    /// # let ctx = FormulaContext::new();
    /// # let config = FormulaRandomizerConfig::default_with_num_vars(10);
    /// # let mut randomizer = FormulaRandomizer::new(config, &ctx).unwrap();
    /// let formula = randomizer.formula(2);
    ///
    /// assert!(formula_depth(&formula) <= 2);
    /// ```
    pub fn formula(&mut self, max_depth: u32) -> Formula {
        if max_depth == 0 {
            self.atom()
        } else {
            let n = self.random.f32();
            if n < self.formula_probs.constant {
                self.constant()
            } else if n < self.formula_probs.literal {
                self.literal()
            } else if n < self.formula_probs.comparison {
                self.comparison()
            } else if n < self.formula_probs.or {
                self.or(max_depth)
            } else if n < self.formula_probs.and {
                self.and(max_depth)
            } else if n < self.formula_probs.not {
                self.not(max_depth)
            } else if n < self.formula_probs.implication {
                self.implication(max_depth)
            } else if n < self.formula_probs.equivalence {
                self.equivalence(max_depth)
            } else {
                self.quantifier(max_depth)
            }
        }
    }

    /// Returns a list of `num_constraints` random formulas with a given
    /// maximal depth.
    pub fn constraint_set(&mut self, num_constraints: u32, max_depth: u32) -> Vec<Formula> {
        (0..num_constraints).map(|_| self.formula(max_depth)).collect()
    }
}

fn integer_variable(map: &mut VariableMap, name: &str) -> Result<Term, FormulaError> {
    match map.variable_by_name(name) {
        Some(signature) if signature.value_type() == ValueType::Integer => Ok(signature.term()),
        Some(signature) => Err(FormulaError::TypeMismatch {
            context: format!("variable '{name}'"),
            expected: ValueType::Integer,
            found: signature.value_type(),
        }),
        None => {
            let index = map.add_variable(Some(name), None, ValueType::Integer)?;
            Ok(Term::Variable { index, value_type: ValueType::Integer })
        }
    }
}
