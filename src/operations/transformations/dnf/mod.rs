use crate::errors::FormulaError;
use crate::formulas::Formula;
use crate::handlers::{FactorizationHandler, NopFactorizationHandler};

use super::distributive_law::{convert, convert_nnf, ClauseKind};

/// Constructs a _DNF_ of `formula` by the distributive law.
///
/// This is the dual of [`cnf`](super::cnf): every conjunction with a
/// disjunction beneath it is multiplied out into minterms, contradictory
/// minterms are dropped and subsumed minterms are removed.
///
/// # Errors
///
/// [`FormulaError::NormalFormViolation`] if the strict result does not have
/// the clausal shape.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// # use featlogic::formulas::FormulaContext;
/// # use featlogic::operations::transformations::dnf;
/// let ctx = FormulaContext::new();
///
/// let formula = ctx.parse("(a | b) & c").unwrap();
///
/// assert_eq!(ctx.to_string(&dnf(&formula, false).unwrap()), "c & a | c & b");
/// ```
pub fn dnf(formula: &Formula, strict: bool) -> Result<Formula, FormulaError> {
    dnf_with_handler(formula, strict, &mut NopFactorizationHandler {})
}

/// Constructs a _DNF_ of `formula` like [`dnf`], reporting every
/// distribution and every created minterm to `handler`.
///
/// # Errors
///
/// [`FormulaError::Aborted`] if the handler aborted the conversion, and the
/// errors of [`dnf`].
pub fn dnf_with_handler(
    formula: &Formula,
    strict: bool,
    handler: &mut dyn FactorizationHandler,
) -> Result<Formula, FormulaError> {
    convert(formula, ClauseKind::Dnf, strict, handler)
}

/// Applies only the distributive pass to a formula already in NNF.
///
/// # Errors
///
/// [`FormulaError::NormalFormViolation`] if `nnf` is not in (non-strict)
/// NNF, and the errors of [`dnf`].
pub fn distribute_dnf(nnf: &Formula, strict: bool) -> Result<Formula, FormulaError> {
    convert_nnf(nnf, ClauseKind::Dnf, strict, &mut NopFactorizationHandler {})
}
