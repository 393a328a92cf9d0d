use crate::formulas::traversal::{rewrite, Builder, Slot};
use crate::formulas::Formula;

/// Constructs the strict _NNF_ of `formula`.
///
/// Negations are pushed down to the atoms with De Morgan's laws,
/// implications and equivalences are replaced by conjunctions and
/// disjunctions, and a negated quantifier becomes its dual. At an atom the
/// negation is absorbed: literals and error literals flip their polarity,
/// comparisons their comparator, and `True` and `False` swap. The result
/// therefore contains no [`Formula::Not`] at all.
///
/// Nested conjunctions and disjunctions are not merged, see
/// [`flatten`](super::flatten) for that.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// # use featlogic::formulas::FormulaContext;
/// # use featlogic::operations::transformations::nnf;
/// let ctx = FormulaContext::new();
///
/// let formula1 = ctx.parse("a => b").unwrap();
/// let nnf = nnf(&formula1);
///
/// assert_eq!(ctx.to_string(&nnf), "~a | b");
/// ```
pub fn nnf(formula: &Formula) -> Formula {
    rewrite(formula, true, |formula, polarity| match formula {
        Formula::Not(op) => Slot::Visit(op, !polarity),
        Formula::And(ops) | Formula::Or(ops) => {
            let builder = if formula.is_and() == polarity { Builder::And } else { Builder::Or };
            Slot::Node(builder, ops.iter().map(|op| Slot::Visit(op, polarity)).collect())
        }
        Formula::Implies(left, right) => {
            if polarity {
                Slot::Node(Builder::Or, vec![Slot::Visit(left, false), Slot::Visit(right, true)])
            } else {
                Slot::Node(Builder::And, vec![Slot::Visit(left, true), Slot::Visit(right, false)])
            }
        }
        Formula::Biimplies(left, right) => {
            let (first, second) = if polarity {
                ((false, true), (true, false))
            } else {
                ((false, false), (true, true))
            };
            Slot::Node(Builder::And, vec![
                Slot::Node(Builder::Or, vec![Slot::Visit(left, first.0), Slot::Visit(right, first.1)]),
                Slot::Node(Builder::Or, vec![Slot::Visit(left, second.0), Slot::Visit(right, second.1)]),
            ])
        }
        Formula::Exists(index, body) => {
            let builder = if polarity { Builder::Exists(*index) } else { Builder::ForAll(*index) };
            Slot::Node(builder, vec![Slot::Visit(body, polarity)])
        }
        Formula::ForAll(index, body) => {
            let builder = if polarity { Builder::ForAll(*index) } else { Builder::Exists(*index) };
            Slot::Node(builder, vec![Slot::Visit(body, polarity)])
        }
        atom => Slot::Done(match atom.negated_atom() {
            Some(negated) if !polarity => negated,
            _ => atom.clone(),
        }),
    })
}
