use crate::errors::FormulaError;
use crate::formulas::Formula;
use crate::handlers::{FactorizationHandler, NopFactorizationHandler};

use super::distributive_law::{convert, convert_nnf, ClauseKind};

/// Constructs a _CNF_ of `formula` by the distributive law.
///
/// The formula is converted into NNF and flattened. Every disjunction with a
/// conjunction beneath it is then multiplied out into clauses; clauses with
/// complementary literals are dropped on the fly and subsumed clauses are
/// removed. Subtrees which need no distribution are kept as they are.
///
/// Without `strict` the result is any formula accepted by
/// [`is_cnf(_, false)`](crate::operations::predicates::is_cnf), in particular
/// a single literal stays unchanged. With `strict` the result is always a
/// conjunction of disjunctions of atoms.
///
/// Error literals, comparisons and quantified formulas are opaque atoms.
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
/// # use featlogic::operations::transformations::cnf;
/// let ctx = FormulaContext::new();
///
/// let formula = ctx.parse("a | b & c").unwrap();
///
/// assert_eq!(ctx.to_string(&cnf(&formula, false).unwrap()), "(a | b) & (a | c)");
/// assert_eq!(ctx.to_string(&cnf(&ctx.parse("a").unwrap(), true).unwrap()), "(a)");
/// ```
pub fn cnf(formula: &Formula, strict: bool) -> Result<Formula, FormulaError> {
    cnf_with_handler(formula, strict, &mut NopFactorizationHandler {})
}

/// Constructs a _CNF_ of `formula` like [`cnf`], reporting every
/// distribution and every created clause to `handler`.
///
/// # Errors
///
/// [`FormulaError::Aborted`] if the handler aborted the conversion, and the
/// errors of [`cnf`].
pub fn cnf_with_handler(
    formula: &Formula,
    strict: bool,
    handler: &mut dyn FactorizationHandler,
) -> Result<Formula, FormulaError> {
    convert(formula, ClauseKind::Cnf, strict, handler)
}

/// Applies only the distributive pass to a formula already in NNF.
///
/// # Errors
///
/// [`FormulaError::NormalFormViolation`] if `nnf` is not in (non-strict)
/// NNF, and the errors of [`cnf`].
pub fn distribute_cnf(nnf: &Formula, strict: bool) -> Result<Formula, FormulaError> {
    convert_nnf(nnf, ClauseKind::Cnf, strict, &mut NopFactorizationHandler {})
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::formulas::{FormulaContext, NormalForm};
    use crate::handlers::{ClauseLimitFactorizationHandler, ComputationHandler, FactorizationError};
    use crate::util::test_util::{clause_sets, equivalent, F};

    fn test_cnf(F: &F, input: &str, expected: &str) {
        let formula = F.parse(input);
        let result = cnf(&formula, false).unwrap();
        assert!(result.is_cnf(false), "{input}");
        assert_eq!(clause_sets(&as_conjunction(result.clone())), clause_sets(&as_conjunction(F.parse(expected))), "{input}");
        assert!(equivalent(&formula, &result, &F.map()), "{input}");
        let strict = cnf(&formula, true).unwrap();
        assert!(strict.is_cnf(true), "{input}");
        assert_eq!(clause_sets(&strict), clause_sets(&as_conjunction(result)), "{input}");
    }

    fn as_conjunction(formula: Formula) -> Formula {
        if formula.is_and() { formula } else { Formula::and(vec![formula]) }
    }

    #[test]
    fn test_constants() {
        let F = F::new();
        assert_eq!(cnf(&F.TRUE, false).unwrap(), F.TRUE);
        assert_eq!(cnf(&F.FALSE, false).unwrap(), F.FALSE);
        assert_eq!(cnf(&F.TRUE, true).unwrap(), Formula::and(vec![Formula::or(vec![F.TRUE.clone()])]));
    }

    #[test]
    fn test_literals() {
        let F = F::new();
        assert_eq!(cnf(&F.A, false).unwrap(), F.A);
        assert_eq!(cnf(&F.NA, false).unwrap(), F.NA);
        assert_eq!(cnf(&F.A, true).unwrap(), Formula::and(vec![Formula::or(vec![F.A.clone()])]));
    }

    #[test]
    fn test_binary_operators() {
        let F = F::new();
        test_cnf(&F, "a => b", "~a | b");
        test_cnf(&F, "~a => ~b", "a | ~b");
        test_cnf(&F, "a & b => x | y", "~a | ~b | x | y");
        test_cnf(&F, "a <=> b", "(a | ~b) & (~a | b)");
        test_cnf(&F, "~a <=> ~b", "(~a | b) & (a | ~b)");
    }

    #[test]
    fn test_nary_operators() {
        let F = F::new();
        test_cnf(&F, "a & b", "a & b");
        test_cnf(&F, "x | y", "x | y");
        test_cnf(&F, "~(a | b) & c & ~(x & ~y) & (w => z)", "~a & ~b & c & (~x | y) & (~w | z)");
        test_cnf(&F, "~(a & b) | c | ~(x | ~y)", "(~a | ~b | c | ~x) & (~a  | ~b | c | y)");
        test_cnf(&F, "a | b | (~x & ~y)", "(a | b | ~x) & (a | b | ~y)");
    }

    #[test]
    fn test_not() {
        let F = F::new();
        test_cnf(&F, "~a2", "~a2");
        test_cnf(&F, "~~a2", "a2");
        test_cnf(&F, "~(a2 => b2)", "a2 & ~b2");
        test_cnf(&F, "~(~(a2 | b2) => ~(x2 | y2))", "~a2 & ~b2 & (x2 | y2)");
        test_cnf(&F, "~(a2 <=> b2)", "(~a2 | ~b2) & (a2 | b2)");
        test_cnf(
            &F,
            "~(~(a2 | b2) <=> ~(x2 | y2))",
            "(a2 | b2 | x2 | y2) & (~a2 | ~x2) & (~a2 | ~y2) & (~b2 | ~x2) & (~b2 | ~y2)",
        );
        test_cnf(&F, "~(a2 & b2 & ~x2 & ~y2)", "~a2 | ~b2 | x2 | y2");
        test_cnf(&F, "~(a2 | b2 | ~x2 | ~y2)", "~a2 & ~b2 & x2 & y2");
    }

    #[test]
    fn test_root_implications() {
        let F = F::new();
        let formula = F.parse("root & (a => root) & (b => root) & (root => a | b)");
        let result = cnf(&formula, false).unwrap();
        assert_eq!(result, F.parse("root & (~a | root) & (~b | root) & (~root | a | b)"));
        assert_eq!(F.f.clause_list(&cnf(&formula, true).unwrap()).unwrap().len(), 4);
    }

    #[test]
    fn test_tautological_clauses() {
        let F = F::new();
        test_cnf(&F, "(a & b) | ~a", "~a | b");
        test_cnf(&F, "(a & ~b) | (~a & b)", "(a | b) & (~a | ~b)");
        assert_eq!(cnf(&F.parse("(a & b) | ~a | ~b"), false).unwrap(), Formula::and(vec![]));
    }

    #[test]
    fn test_idempotence() {
        let F = F::new();
        for formula in [&F.IMP4, &F.EQ3, &F.EQ4, &F.OR3, &F.NOT1] {
            let once = cnf(formula, true).unwrap();
            assert_eq!(cnf(&once, true).unwrap(), once);
        }
    }

    #[test]
    fn test_opaque_atoms() {
        let F = F::new();
        let error = Formula::error("broken");
        let formula = Formula::or(vec![error.clone(), Formula::and(vec![F.CMP1.clone(), F.A.clone()])]);
        let result = cnf(&formula, true).unwrap();
        assert_eq!(
            result,
            Formula::and(vec![
                Formula::or(vec![error.clone(), F.CMP1.clone()]),
                Formula::or(vec![error, F.A.clone()])
            ])
        );
        let quantified = Formula::exists(F.index("x"), F.IMP1.clone());
        let result = cnf(&Formula::or(vec![quantified, F.AND1.clone()]), false).unwrap();
        assert!(result.is_cnf(false));
        assert_eq!(result.operand_count(), 2);
    }

    #[test]
    fn test_with_handler() {
        let F = F::new();

        let formula = F.parse("(~(~(a | b) => ~(x | y))) & ((a | x) => ~(b | y))");
        let mut handler = ClauseLimitFactorizationHandler::new(100, 2);
        let result = cnf_with_handler(&formula, false, &mut handler);
        assert_eq!(result, Err(FormulaError::Aborted(FactorizationError::ClauseLimitReached)));
        assert!(handler.aborted());

        let formula = F.parse("~(a | b)");
        let result = cnf_with_handler(&formula, false, &mut handler);
        assert!(result.is_ok());
        assert!(!handler.aborted());

        let mut handler = ClauseLimitFactorizationHandler::new(0, 100);
        let formula = F.parse("~(~(a2 | b2) <=> ~(x2 | y2))");
        let result = cnf_with_handler(&formula, false, &mut handler);
        assert_eq!(result, Err(FormulaError::Aborted(FactorizationError::DistributionLimitReached)));

        let mut handler = ClauseLimitFactorizationHandler::new(100, 100);
        let result = cnf_with_handler(&formula, false, &mut handler);
        assert!(result.is_ok());
        assert_eq!(handler.clauses, 4);
    }

    #[test]
    fn test_distribute_cnf() {
        let F = F::new();
        assert!(matches!(
            distribute_cnf(&F.IMP1, false),
            Err(FormulaError::NormalFormViolation { form: NormalForm::Nnf, .. })
        ));
        let nnf = Formula::or(vec![Formula::not(F.A.clone()), F.AND1.clone()]);
        assert_eq!(clause_sets(&distribute_cnf(&nnf, true).unwrap()), clause_sets(&as_conjunction(F.parse("~a | b"))));
    }

    #[test]
    fn test_deep_conjunction() {
        let ctx = FormulaContext::new();
        let a = ctx.variable("a").unwrap();
        let b = ctx.variable("b").unwrap();
        let mut formula = a.clone();
        for _ in 0..100_000 {
            formula = Formula::and(vec![Formula::or(vec![a.clone(), b.clone()]), formula]);
        }
        let result = cnf(&formula, true).unwrap();
        assert!(result.is_cnf(true));
        assert_eq!(result.operand_count(), 100_001);
    }
}
