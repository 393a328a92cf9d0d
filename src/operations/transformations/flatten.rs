use crate::formulas::traversal::{descend, rewrite, Builder, Slot};
use crate::formulas::Formula;

/// Merges nested conjunctions into their parent conjunction and nested
/// disjunctions into their parent disjunction, keeping the operand order.
///
/// A negation directly above an atom is absorbed into the atom, so the
/// flattening of a (non-strict) NNF is a strict NNF.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// # use featlogic::formulas::FormulaContext;
/// # use featlogic::operations::transformations::{flatten, nnf};
/// let ctx = FormulaContext::new();
///
/// let formula = nnf(&ctx.parse("~(a & b) | c").unwrap());
///
/// assert_eq!(ctx.to_string(&formula), "(~a | ~b) | c");
/// assert_eq!(ctx.to_string(&flatten(&formula)), "~a | ~b | c");
/// ```
pub fn flatten(formula: &Formula) -> Formula {
    rewrite(formula, (), |formula, ()| match formula {
        Formula::And(ops) | Formula::Or(ops) => {
            let builder = if formula.is_and() { Builder::And } else { Builder::Or };
            let mut operands = Vec::with_capacity(ops.len());
            let mut pending: Vec<&Formula> = ops.iter().rev().collect();
            while let Some(op) = pending.pop() {
                if op.formula_type() == formula.formula_type() {
                    pending.extend(op.operands().rev());
                } else {
                    operands.push(Slot::Visit(op, ()));
                }
            }
            Slot::Node(builder, operands)
        }
        Formula::Not(op) => match op.negated_atom() {
            Some(negated) => Slot::Done(negated),
            None => descend(formula, ()),
        },
        _ => descend(formula, ()),
    })
}
