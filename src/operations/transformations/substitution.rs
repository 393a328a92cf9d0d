use std::collections::HashMap;
use std::rc::Rc;

use crate::errors::FormulaError;
use crate::formulas::traversal::{descend, reduce, rewrite, Builder, Node, Slot};
use crate::formulas::{Formula, IndexMapping, Literal, Normalization, Term};

/// A `Substitution` maps boolean variable indices to formulas.
pub type Substitution = HashMap<u32, Formula>;

/// Substitutes variables of the given formula with specified formulas.
///
/// A positive literal of a substituted variable is replaced by the formula,
/// a negative one by its negation. Occurrences bound by a quantifier over
/// the same index are left untouched.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// # use featlogic::formulas::FormulaContext;
/// # use featlogic::operations::transformations::substitute;
/// # use std::collections::HashMap;
///
/// let ctx = FormulaContext::new();
///
/// let formula = ctx.parse("a & ~b").unwrap();
///
/// let mut substitutions = HashMap::new();
/// substitutions.insert(ctx.lit("a", true).unwrap().index(), ctx.parse("c => d").unwrap());
/// substitutions.insert(ctx.lit("b", true).unwrap().index(), ctx.parse("c").unwrap());
///
/// let substituted = substitute(&formula, &substitutions);
///
/// assert_eq!(ctx.to_string(&substituted), "(c => d) & ~c");
/// ```
pub fn substitute(formula: &Formula, substitution: &Substitution) -> Formula {
    if substitution.is_empty() {
        return formula.clone();
    }
    rewrite(formula, Rc::new(Vec::new()), |formula, bound: Rc<Vec<u32>>| match formula {
        Formula::Literal(literal) if !bound.contains(&literal.index()) => match substitution.get(&literal.index()) {
            Some(replacement) if literal.is_positive() => Slot::Done(replacement.clone()),
            Some(replacement) => Slot::Done(Formula::not(replacement.clone())),
            None => Slot::Done(formula.clone()),
        },
        Formula::Exists(index, body) | Formula::ForAll(index, body) if substitution.contains_key(index) => {
            let mut inner = (*bound).clone();
            inner.push(*index);
            let builder = if matches!(formula, Formula::Exists(_, _)) {
                Builder::Exists(*index)
            } else {
                Builder::ForAll(*index)
            };
            Slot::Node(builder, vec![Slot::Visit(body, Rc::new(inner))])
        }
        _ => descend(formula, bound),
    })
}

/// Rewrites all indices of `formula` with the mappings of a
/// [`VariableMap::normalize`](crate::formulas::VariableMap::normalize) call.
///
/// # Errors
///
/// [`FormulaError::UnknownVariable`] if the formula refers to an index which
/// is not part of the mapping. The formula is checked completely before
/// anything is rewritten.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// # use featlogic::formulas::{Formula, VariableMap};
/// # use featlogic::operations::transformations::reindex;
/// let mut map = VariableMap::from_names(["a", "b", "c"]).unwrap();
/// let formula = Formula::and(vec![Formula::lit(1, true), Formula::lit(3, false)]);
///
/// map.remove_variable(2);
/// let normalization = map.normalize();
///
/// let reindexed = reindex(&formula, &normalization).unwrap();
///
/// assert_eq!(reindexed, Formula::and(vec![Formula::lit(1, true), Formula::lit(2, false)]));
/// assert_eq!(reindexed.to_string(&map), "a & ~c");
/// ```
pub fn reindex(formula: &Formula, normalization: &Normalization) -> Result<Formula, FormulaError> {
    let Normalization { variables, constants } = normalization;
    reduce(Node::Formula(formula), |node, _: Vec<()>| match node {
        Node::Formula(Formula::Literal(literal)) => mapped(variables, literal.index(), "").map(|_| ()),
        Node::Formula(Formula::Exists(index, _) | Formula::ForAll(index, _)) => mapped(variables, *index, "").map(|_| ()),
        Node::Term(Term::Variable { index, .. }) => mapped(variables, *index, "").map(|_| ()),
        Node::Term(Term::Constant { index, .. }) => mapped(constants, *index, "constant ").map(|_| ()),
        _ => Ok(()),
    })?;

    let vars = |index: u32| variables.get(index).unwrap_or(index);
    let consts = |index: u32| constants.get(index).unwrap_or(index);
    Ok(rewrite(formula, (), |formula, ()| match formula {
        Formula::Literal(literal) => Slot::Done(Formula::Literal(Literal::new(vars(literal.index()), literal.is_positive()))),
        Formula::Compare(comparison) => Slot::Done(Formula::Compare(
            comparison.with_sides(comparison.left().map_indices(&vars, &consts), comparison.right().map_indices(&vars, &consts)),
        )),
        Formula::Exists(index, body) => Slot::Node(Builder::Exists(vars(*index)), vec![Slot::Visit(body, ())]),
        Formula::ForAll(index, body) => Slot::Node(Builder::ForAll(vars(*index)), vec![Slot::Visit(body, ())]),
        _ => descend(formula, ()),
    }))
}

fn mapped(mapping: &IndexMapping, index: u32, namespace: &str) -> Result<u32, FormulaError> {
    mapping.get(index).ok_or_else(|| FormulaError::UnknownVariable(format!("{namespace}@{index}")))
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::formulas::{Comparator, Comparison, Value, ValueType, VariableMap};
    use crate::util::test_util::F;

    #[test]
    fn test_substitute_literals() {
        let F = F::new();
        let mut substitution = Substitution::new();
        substitution.insert(F.index("a"), F.OR1.clone());
        substitution.insert(F.index("b"), F.TRUE.clone());
        assert_eq!(substitute(&F.A, &substitution), F.OR1);
        assert_eq!(substitute(&F.NA, &substitution), Formula::not(F.OR1.clone()));
        assert_eq!(substitute(&F.C, &substitution), F.C);
        assert_eq!(substitute(&F.IMP1, &substitution), Formula::implies(F.OR1.clone(), F.TRUE.clone()));
        assert_eq!(substitute(&F.AND2, &substitution), Formula::and(vec![Formula::not(F.OR1.clone()), Formula::not(F.TRUE.clone())]));
        assert_eq!(substitute(&F.CMP1, &substitution), F.CMP1);
        assert_eq!(substitute(&F.EQ4, &Substitution::new()), F.EQ4);
    }

    #[test]
    fn test_substitute_respects_binding() {
        let F = F::new();
        let a = F.index("a");
        let mut substitution = Substitution::new();
        substitution.insert(a, F.X.clone());
        let formula = Formula::and(vec![F.A.clone(), Formula::for_all(a, F.IMP1.clone())]);
        assert_eq!(substitute(&formula, &substitution), Formula::and(vec![F.X.clone(), Formula::for_all(a, F.IMP1.clone())]));
        let formula = Formula::exists(F.index("b"), F.AND1.clone());
        assert_eq!(substitute(&formula, &substitution), Formula::exists(F.index("b"), Formula::and(vec![F.X.clone(), F.B.clone()])));
    }

    #[test]
    fn test_reindex() {
        let mut map = VariableMap::from_names(["a", "b"]).unwrap();
        let n = map.add_variable(Some("n"), None, ValueType::Integer).unwrap();
        let k = map.add_constant(Some("k"), Some(4), Value::Integer(7)).unwrap();
        let n_term = map.variable(n).unwrap().term();
        let k_term = map.constant(k).unwrap().term();
        let comparison = Comparison::new(Comparator::Ge, n_term, k_term).unwrap();
        let formula = Formula::or(vec![Formula::lit(2, false), Formula::compare(comparison), Formula::exists(2, Formula::var(2))]);

        map.remove_variable(1);
        let normalization = map.normalize();
        let reindexed = reindex(&formula, &normalization).unwrap();

        assert_eq!(reindexed.to_string(&map), "~b | n >= 7 | (exists b. (b))");
        assert!(map.validate(&reindexed).is_ok());
    }

    #[test]
    fn test_reindex_unknown_index() {
        let mut map = VariableMap::from_names(["a", "b"]).unwrap();
        let formula = Formula::and(vec![Formula::var(2), Formula::var(1)]);
        map.remove_variable(1);
        let normalization = map.normalize();
        assert_eq!(reindex(&formula, &normalization), Err(FormulaError::UnknownVariable("@1".into())));
    }
}
