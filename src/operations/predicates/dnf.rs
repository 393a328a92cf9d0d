use crate::formulas::{Formula, FormulaType};

use super::cnf::is_clausal;

/// DNF predicate. Indicates whether a formula is in DNF or not.
///
/// This is the dual of [`is_cnf`](super::is_cnf): the strict variant accepts
/// exactly a disjunction of conjunctions of atoms, the non-strict variant
/// also accepts a single atom, a single conjunction of atoms, and atoms
/// directly below the disjunction.
///
/// # Example
///
/// Basic usage:
///
/// ```
/// # use featlogic::formulas::FormulaContext;
/// # use featlogic::operations::predicates::is_dnf;
/// # let ctx = FormulaContext::new();
///
/// let formula1 = ctx.parse("a").unwrap();
/// let formula2 = ctx.parse("a | ~b | (b & c)").unwrap();
/// let formula3 = ctx.parse("a & b & c").unwrap();
/// let formula4 = ctx.parse("a & (b | c)").unwrap();
///
/// assert_eq!(is_dnf(&formula1, false), true);
/// assert_eq!(is_dnf(&formula2, false), true);
/// assert_eq!(is_dnf(&formula3, false), true);
/// assert_eq!(is_dnf(&formula4, false), false);
/// ```
pub fn is_dnf(formula: &Formula, strict: bool) -> bool {
    is_clausal(formula, FormulaType::Or, FormulaType::And, strict)
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use crate::formulas::Formula;
    use crate::util::test_util::F;

    #[test]
    fn test() {
        let F = F::new();
        assert!(F.TRUE.is_dnf(false));
        assert!(F.FALSE.is_dnf(false));
        assert!(F.A.is_dnf(false));
        assert!(F.NA.is_dnf(false));
        assert!(F.OR1.is_dnf(false));
        assert!(F.AND1.is_dnf(false));
        assert!(F.OR3.is_dnf(false));
        assert!(Formula::or(vec![F.AND1.clone(), F.AND2.clone(), F.A.clone(), F.NY.clone()]).is_dnf(false));
        assert!(!F.AND3.is_dnf(false));
        assert!(!F.IMP1.is_dnf(false));
        assert!(!F.EQ1.is_dnf(false));
        assert!(!F.NOT1.is_dnf(false));
        assert!(!F.NOT2.is_dnf(false));
        assert!(!Formula::or(vec![F.AND1.clone(), F.EQ1.clone()]).is_dnf(false));
    }

    #[test]
    fn test_strict() {
        let F = F::new();
        assert!(Formula::or(vec![]).is_dnf(true));
        assert!(F.OR3.is_dnf(true));
        assert!(!F.OR1.is_dnf(true));
        assert!(Formula::or(vec![Formula::and(vec![F.X.clone()]), Formula::and(vec![F.Y.clone()])]).is_dnf(true));
        assert!(!Formula::or(vec![F.AND1.clone(), F.A.clone()]).is_dnf(true));
    }
}
