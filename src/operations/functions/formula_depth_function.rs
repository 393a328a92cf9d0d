use crate::formulas::traversal::{fold, Node};
use crate::formulas::Formula;

/// A function that returns the depth of a formula's abstract syntax tree. The
/// depth of a formula indicates how many levels of nested sub-formulas a
/// formula has. For example,
///
/// - `A` has depth zero,
/// - `A & B` has depth one,
/// - `(A & B) | C` has depth two,
/// - `(A & B) | C & (E | F)` has depth three.
///
/// Intuitively speaking, the formula depth is the maximal depth of a formula's
/// abstract syntax tree. Comparisons are atoms, their terms do not count.
/// An empty conjunction or disjunction has depth zero like the constant it
/// stands for.
///
/// # Example
///
/// Basic usage:
///
/// ```
/// # use featlogic::formulas::FormulaContext;
/// # use featlogic::operations::functions::formula_depth;
/// # let ctx = FormulaContext::new();
///
/// let formula1 = ctx.parse("a").unwrap();
/// let formula2 = ctx.parse("a & b").unwrap();
/// let formula3 = ctx.parse("(a & b) | c").unwrap();
/// let formula4 = ctx.parse("(a & b) | c & (e | f)").unwrap();
///
/// assert_eq!(formula_depth(&formula1), 0);
/// assert_eq!(formula_depth(&formula2), 1);
/// assert_eq!(formula_depth(&formula3), 2);
/// assert_eq!(formula_depth(&formula4), 3);
/// ```
pub fn formula_depth(formula: &Formula) -> usize {
    fold(formula, |node, children: Vec<usize>| match node {
        Node::Formula(f) if !f.is_atomic() => children.iter().max().map_or(0, |depth| depth + 1),
        _ => 0,
    })
}

/// Number of formula nodes of the tree, atoms included. The terms of a
/// comparison are not counted.
pub fn number_of_nodes(formula: &Formula) -> usize {
    fold(formula, |node, children: Vec<usize>| match node {
        Node::Formula(_) => 1 + children.iter().sum::<usize>(),
        Node::Term(_) => 0,
    })
}

#[cfg(test)]
mod test {
    use crate::formulas::Formula;
    use crate::operations::functions::{formula_depth, number_of_nodes};
    use crate::util::test_util::F;

    #[test]
    fn test_atoms() {
        let ff = F::new();
        assert_eq!(0, formula_depth(&ff.TRUE));
        assert_eq!(0, formula_depth(&ff.FALSE));
        assert_eq!(0, formula_depth(&ff.A));
        assert_eq!(0, formula_depth(&ff.NA));
        assert_eq!(0, formula_depth(&ff.CMP1));
        assert_eq!(0, formula_depth(&ff.CMP2));
        assert_eq!(0, formula_depth(&Formula::and(vec![])));
    }

    #[test]
    fn test_deep_formulas() {
        let ff = F::new();
        assert_eq!(1, formula_depth(&ff.AND1));
        assert_eq!(1, formula_depth(&ff.AND2));
        assert_eq!(2, formula_depth(&ff.AND3));
        assert_eq!(1, formula_depth(&ff.OR1));
        assert_eq!(1, formula_depth(&ff.OR2));
        assert_eq!(2, formula_depth(&ff.OR3));
        assert_eq!(2, formula_depth(&ff.NOT1));
        assert_eq!(2, formula_depth(&ff.NOT2));
        assert_eq!(1, formula_depth(&ff.IMP1));
        assert_eq!(1, formula_depth(&ff.IMP2));
        assert_eq!(2, formula_depth(&ff.IMP3));
        assert_eq!(2, formula_depth(&ff.IMP4));
        assert_eq!(1, formula_depth(&ff.EQ1));
        assert_eq!(1, formula_depth(&ff.EQ2));
        assert_eq!(2, formula_depth(&ff.EQ3));
        assert_eq!(2, formula_depth(&ff.EQ4));
    }

    #[test]
    fn test_deeper_formulas() {
        let ff = F::new();
        let mut formula = ff.CMP1.clone();
        for i in 0..10 {
            let var = ff.f.variable(&format!("X{i}")).unwrap();
            formula = if i % 2 == 0 { Formula::or(vec![formula, var]) } else { Formula::and(vec![formula, var]) }
        }
        assert_eq!(10, formula_depth(&formula));
    }

    #[test]
    fn test_number_of_nodes() {
        let ff = F::new();
        assert_eq!(1, number_of_nodes(&ff.A));
        assert_eq!(1, number_of_nodes(&ff.CMP2));
        assert_eq!(3, number_of_nodes(&ff.AND1));
        assert_eq!(4, number_of_nodes(&ff.NOT1));
        assert_eq!(7, number_of_nodes(&ff.IMP4));
    }
}
