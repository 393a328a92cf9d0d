use std::collections::BTreeSet;

use crate::formulas::traversal::{fold, Node};
use crate::formulas::{Formula, Literal, Term};

/// Returns the indices of all variables occurring in this formula: the
/// variables of its literals and the variables of the terms of its
/// comparisons. Constants are not included.
///
/// # Example
///
/// Basic usage:
///
/// ```
/// # use featlogic::formulas::FormulaContext;
/// # use featlogic::operations::functions::variables;
/// let ctx = FormulaContext::new();
///
/// let formula = ctx.parse("(a => b) & ~c & ~a").unwrap();
///
/// assert_eq!(variables(&formula).into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
/// ```
pub fn variables(formula: &Formula) -> BTreeSet<u32> {
    let mut result = BTreeSet::new();
    fold(formula, |node, _: Vec<()>| match node {
        Node::Formula(Formula::Literal(literal)) => {
            result.insert(literal.index());
        }
        Node::Term(Term::Variable { index, .. }) => {
            result.insert(*index);
        }
        _ => {}
    });
    result
}

/// Returns all literals of this formula, with the phase they occur in.
///
/// Negations are not resolved: in `~(a & ~b)` the literals are `a` and `~b`.
///
/// # Example
///
/// Basic usage:
///
/// ```
/// # use std::collections::BTreeSet;
/// # use featlogic::formulas::{FormulaContext, Literal};
/// # use featlogic::operations::functions::literals;
/// let ctx = FormulaContext::new();
///
/// let formula = ctx.parse("(a => b) & ~c & ~a").unwrap();
///
/// let expected = [Literal::new(1, true), Literal::new(2, true), Literal::new(3, false), Literal::new(1, false)];
/// assert_eq!(literals(&formula), BTreeSet::from(expected));
/// ```
pub fn literals(formula: &Formula) -> BTreeSet<Literal> {
    let mut result = BTreeSet::new();
    fold(formula, |node, _: Vec<()>| {
        if let Node::Formula(Formula::Literal(literal)) = node {
            result.insert(*literal);
        }
    });
    result
}
