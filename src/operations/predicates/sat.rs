use std::time::Duration;

use crate::datastructures::ClauseList;
use crate::errors::FormulaError;
use crate::formulas::Formula;
use crate::operations::functions;
use crate::operations::transformations::cnf;
use crate::solver::{SatResult, SatSolver};

/// A predicate tests whether a formula is satisfiable. A formula is satisfiable
/// if there exists at least one assignment such that the formula evaluates to
/// `true` with this assignment. Such an assignment is called *satisfying
/// assignment* or *model*. For example `A & B | C` is satisfiable for the
/// assignment `{A, B, ~C}`.
///
/// The formula is converted into CNF and handed to `solver` as a
/// [`ClauseList`]. The answer is [`SatResult::Timeout`] if the solver did not
/// finish within `timeout`.
///
/// # Example
///
/// Basic usage:
///
/// ```
/// use featlogic::formulas::FormulaContext;
/// use featlogic::operations::predicates::is_sat;
/// use featlogic::solver::{BruteForceSolver, SatResult};
/// let ctx = FormulaContext::new();
///
/// let formula = ctx.parse("a & b | c").unwrap();
///
/// assert_eq!(is_sat(&formula, &mut BruteForceSolver::new(), None), Ok(SatResult::Satisfiable));
/// ```
pub fn is_sat(
    formula: &Formula,
    solver: &mut dyn SatSolver,
    timeout: Option<Duration>,
) -> Result<SatResult, FormulaError> {
    let cnf = cnf(formula, false)?;
    let variable_count = functions::variables(&cnf).last().copied().unwrap_or(0);
    let clauses = ClauseList::from_cnf(&cnf, variable_count)?;
    Ok(solver.solve(&clauses, timeout))
}

/// A predicate indicating whether a given formula is a tautology, that is,
/// always holds, regardless of the assignment. An example for a tautology is
/// `(A & B) | (~A & B) | (A & ~B) | (~A & ~B)`.
///
/// The answer is `Satisfiable` for a tautology, `Unsatisfiable` if there is
/// a falsifying assignment and `Timeout` if the solver gave up.
///
/// ```
/// use featlogic::formulas::FormulaContext;
/// use featlogic::operations::predicates::is_tautology;
/// use featlogic::solver::{BruteForceSolver, SatResult};
/// let ctx = FormulaContext::new();
///
/// let formula = ctx.parse("(a & b) | (~a & b) | (a & ~b) | (~a & ~b)").unwrap();
///
/// assert_eq!(is_tautology(&formula, &mut BruteForceSolver::new(), None), Ok(SatResult::Satisfiable));
/// ```
pub fn is_tautology(
    formula: &Formula,
    solver: &mut dyn SatSolver,
    timeout: Option<Duration>,
) -> Result<SatResult, FormulaError> {
    let negation = Formula::not(formula.clone());
    Ok(match is_sat(&negation, solver, timeout)? {
        SatResult::Satisfiable => SatResult::Unsatisfiable,
        SatResult::Unsatisfiable => SatResult::Satisfiable,
        SatResult::Timeout => SatResult::Timeout,
    })
}
