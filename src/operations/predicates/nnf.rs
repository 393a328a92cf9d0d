use crate::formulas::Formula;

/// NNF predicate. Indicates whether a formula is in NNF or not.
///
/// A formula is in NNF if it only consists of atoms, conjunctions,
/// disjunctions and quantifiers. In the non-strict variant a negation
/// directly above an atom is accepted as well, the strict variant accepts no
/// negation at all (negated atoms are atoms with flipped polarity).
///
/// [`Formula`] also directly provides this function as method. So instead
/// of `is_nnf(&formula, strict)`, you can also call `formula.is_nnf(strict)`.
///
/// # Example
///
/// Basic usage:
///
/// ```
/// # use featlogic::formulas::FormulaContext;
/// # use featlogic::operations::predicates::is_nnf;
/// # let ctx = FormulaContext::new();
///
/// let formula1 = ctx.parse("a & ~b").unwrap();
/// let formula2 = ctx.parse("(a & (~b | c) & ~c) | d").unwrap();
/// let formula3 = ctx.parse("a => b").unwrap();
/// let formula4 = ctx.parse("~(a | b)").unwrap();
///
/// assert_eq!(is_nnf(&formula1, true), true);
/// assert_eq!(is_nnf(&formula2, true), true);
/// assert_eq!(is_nnf(&formula3, false), false);
/// assert_eq!(is_nnf(&formula4, false), false);
/// ```
pub fn is_nnf(formula: &Formula, strict: bool) -> bool {
    let mut pending = vec![formula];
    while let Some(current) = pending.pop() {
        match current {
            Formula::True | Formula::False | Formula::Literal(_) | Formula::Error(_) | Formula::Compare(_) => {}
            Formula::Not(operand) => {
                if strict || !operand.is_atomic() {
                    return false;
                }
            }
            Formula::And(ops) | Formula::Or(ops) => pending.extend(ops),
            Formula::Exists(_, body) | Formula::ForAll(_, body) => pending.push(body),
            Formula::Implies(_, _) | Formula::Biimplies(_, _) => return false,
        }
    }
    true
}
