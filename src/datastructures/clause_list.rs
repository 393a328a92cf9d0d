use itertools::Itertools;

use crate::errors::FormulaError;
use crate::formulas::{Formula, Literal, NormalForm};
use crate::operations::predicates::is_cnf;

/// A CNF as signed-integer clauses, the format SAT backends consume.
///
/// Every clause is a list of non-zero literals: the sign is the phase and
/// the magnitude is the variable index. `variable_count` is the size of the
/// index range `1..=variable_count` the clauses may use.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ClauseList {
    clauses: Vec<Vec<i32>>,
    variable_count: u32,
}

impl ClauseList {
    /// Creates an empty clause list over `variable_count` variables.
    pub const fn new(variable_count: u32) -> Self {
        Self { clauses: Vec::new(), variable_count }
    }

    /// Encodes a formula in (strict or non-strict) CNF.
    ///
    /// A clause containing `True` is dropped, `False` atoms are dropped from
    /// their clause, so `True` yields no clause and `False` the empty clause.
    /// The variable count is raised to the largest index occurring in the
    /// formula if necessary.
    ///
    /// # Errors
    ///
    /// [`FormulaError::NormalFormViolation`] if `cnf` is not in CNF and
    /// [`FormulaError::UnsupportedAtom`] for error literals, comparisons and
    /// quantified formulas.
    ///
    /// # Examples
    ///
    /// Basic usage:
    ///
    /// ```
    /// # use featlogic::datastructures::ClauseList;
    /// # use featlogic::formulas::Formula;
    /// let cnf = Formula::and(vec![
    ///     Formula::or(vec![Formula::lit(1, true), Formula::lit(2, false)]),
    ///     Formula::lit(3, true),
    ///     Formula::or(vec![Formula::lit(1, true), Formula::True]),
    /// ]);
    ///
    /// let clauses = ClauseList::from_cnf(&cnf, 0).unwrap();
    ///
    /// assert_eq!(clauses.clauses(), &[vec![1, -2], vec![3]]);
    /// assert_eq!(clauses.variable_count(), 3);
    /// ```
    pub fn from_cnf(cnf: &Formula, variable_count: u32) -> Result<Self, FormulaError> {
        if !is_cnf(cnf, false) {
            return Err(FormulaError::violation(NormalForm::Cnf, "cannot encode clauses of a formula not in CNF"));
        }
        let mut list = Self::new(variable_count);
        let clauses: Vec<&Formula> = if cnf.is_and() { cnf.operands().collect() } else { vec![cnf] };
        for clause in clauses {
            let atoms: Vec<&Formula> = if clause.is_or() { clause.operands().collect() } else { vec![clause] };
            if let Some(encoded) = encode_clause(&atoms)? {
                list.push_clause(encoded);
            }
        }
        Ok(list)
    }

    /// Appends a clause and raises the variable count if necessary.
    ///
    /// # Panics
    ///
    /// Panics if the clause contains `0`.
    pub fn push_clause(&mut self, clause: Vec<i32>) {
        assert!(!clause.contains(&0), "0 is not a literal");
        let max = clause.iter().map(|lit| lit.unsigned_abs()).max().unwrap_or(0);
        self.variable_count = self.variable_count.max(max);
        self.clauses.push(clause);
    }

    /// The clauses.
    pub fn clauses(&self) -> &[Vec<i32>] {
        &self.clauses
    }

    /// The size of the index range the clauses refer to.
    pub const fn variable_count(&self) -> u32 {
        self.variable_count
    }

    /// Number of clauses.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Returns `true` if there are no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Decodes the clauses into a strict CNF formula.
    pub fn to_formula(&self) -> Formula {
        Formula::and(
            self.clauses
                .iter()
                .map(|clause| {
                    Formula::or(clause.iter().filter_map(|&lit| Literal::from_value(lit)).map(Formula::Literal).collect())
                })
                .collect(),
        )
    }
}

fn encode_clause(atoms: &[&Formula]) -> Result<Option<Vec<i32>>, FormulaError> {
    let mut encoded = Vec::with_capacity(atoms.len());
    for atom in atoms {
        match atom {
            Formula::True => return Ok(None),
            Formula::False => {}
            Formula::Literal(literal) => encoded.push(literal.value()),
            Formula::Not(operand) => match operand.as_ref() {
                Formula::True => {}
                Formula::False => return Ok(None),
                Formula::Literal(literal) => encoded.push(literal.negate().value()),
                other => return Err(unsupported(other)),
            },
            other => return Err(unsupported(other)),
        }
    }
    Ok(Some(encoded.into_iter().unique().collect()))
}

fn unsupported(atom: &Formula) -> FormulaError {
    FormulaError::UnsupportedAtom(format!("{:?} atom", atom.formula_type()))
}
