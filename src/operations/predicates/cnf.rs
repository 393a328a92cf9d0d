use crate::formulas::{Formula, FormulaType};

/// CNF predicate. Indicates whether a formula is in CNF or not.
///
/// The strict variant accepts exactly a conjunction of disjunctions of
/// atoms, where both levels may be empty. The non-strict variant accepts a
/// single atom, a single disjunction of atoms, and conjunctions whose
/// operands are atoms or disjunctions of atoms. It also accepts a negation
/// directly above an atom in place of an atom.
///
/// A quantified formula counts as an atom if its body is in NNF.
///
/// [`Formula`] also directly provides this function as method. So instead
/// of `is_cnf(&formula, strict)`, you can also call `formula.is_cnf(strict)`.
///
/// # Example
///
/// Basic usage:
///
/// ```
/// # use featlogic::formulas::FormulaContext;
/// # use featlogic::operations::predicates::is_cnf;
/// # let ctx = FormulaContext::new();
///
/// let formula1 = ctx.parse("a").unwrap();
/// let formula2 = ctx.parse("a & ~b & (b | c)").unwrap();
/// let formula3 = ctx.parse("a | b | c").unwrap();
/// let formula4 = ctx.parse("a & ~b => (b | c)").unwrap();
///
/// assert_eq!(is_cnf(&formula1, false), true);
/// assert_eq!(is_cnf(&formula2, false), true);
/// assert_eq!(is_cnf(&formula3, false), true);
/// assert_eq!(is_cnf(&formula4, false), false);
/// assert_eq!(is_cnf(&formula2, true), false);
/// ```
pub fn is_cnf(formula: &Formula, strict: bool) -> bool {
    is_clausal(formula, FormulaType::And, FormulaType::Or, strict)
}

pub(super) fn is_clausal(formula: &Formula, outer: FormulaType, clause: FormulaType, strict: bool) -> bool {
    let atom = |f: &Formula| is_clause_atom(f, strict);
    let is_clause = |f: &Formula| f.formula_type() == clause && f.operands().all(atom);
    if strict {
        formula.formula_type() == outer && formula.operands().all(is_clause)
    } else if formula.formula_type() == outer {
        formula.operands().all(|op| atom(op) || is_clause(op))
    } else {
        atom(formula) || is_clause(formula)
    }
}

fn is_clause_atom(formula: &Formula, strict: bool) -> bool {
    match formula {
        Formula::Not(operand) => !strict && operand.is_atomic(),
        Formula::Exists(_, body) | Formula::ForAll(_, body) => body.is_nnf(strict),
        _ => formula.is_atomic(),
    }
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use crate::formulas::Formula;
    use crate::util::test_util::F;

    #[test]
    fn test() {
        let F = F::new();
        assert!(F.TRUE.is_cnf(false));
        assert!(F.FALSE.is_cnf(false));
        assert!(F.A.is_cnf(false));
        assert!(F.NA.is_cnf(false));
        assert!(F.CMP1.is_cnf(false));
        assert!(F.OR1.is_cnf(false));
        assert!(F.AND1.is_cnf(false));
        assert!(F.AND3.is_cnf(false));
        assert!(Formula::and(vec![F.OR1.clone(), F.OR2.clone(), F.A.clone(), F.NY.clone()]).is_cnf(false));
        assert!(!F.OR3.is_cnf(false));
        assert!(!F.IMP1.is_cnf(false));
        assert!(!F.EQ1.is_cnf(false));
        assert!(!F.NOT1.is_cnf(false));
        assert!(!F.NOT2.is_cnf(false));
        assert!(!Formula::and(vec![F.OR1.clone(), F.EQ1.clone()]).is_cnf(false));
        assert!(!Formula::and(vec![F.AND1.clone(), F.OR1.clone()]).is_cnf(false));
    }

    #[test]
    fn test_strict() {
        let F = F::new();
        assert!(Formula::and(vec![]).is_cnf(true));
        assert!(Formula::and(vec![Formula::or(vec![])]).is_cnf(true));
        assert!(F.AND3.is_cnf(true));
        assert!(Formula::and(vec![Formula::or(vec![F.A.clone()]), Formula::or(vec![F.CMP1.clone()])]).is_cnf(true));
        assert!(!F.A.is_cnf(true));
        assert!(!F.OR1.is_cnf(true));
        assert!(!F.AND1.is_cnf(true));
        assert!(!Formula::and(vec![Formula::or(vec![Formula::not(F.A.clone())])]).is_cnf(true));
        assert!(Formula::and(vec![Formula::or(vec![Formula::not(F.A.clone())])]).is_cnf(false));
    }

    #[test]
    fn test_quantified_atoms() {
        let F = F::new();
        let quantified = Formula::exists(1, F.OR3.clone());
        assert!(Formula::or(vec![quantified.clone(), F.B.clone()]).is_cnf(false));
        assert!(!Formula::or(vec![Formula::exists(1, F.IMP1.clone()), F.B.clone()]).is_cnf(false));
        assert!(Formula::and(vec![Formula::or(vec![quantified])]).is_cnf(true));
    }
}
