//! Explicit-stack traversal of formula and term trees.
//!
//! Formula trees can be arbitrarily deep, so none of the operations of this
//! crate recurse natively over them. Instead they are built on the two
//! engines of this module:
//!
//! - [`reduce`] folds a tree bottom-up: every node is visited after all of
//!   its children, together with the values computed for them.
//! - [`rewrite`] builds a new formula top-down: a step function decides per
//!   node whether it is done or which children to visit next, each with its
//!   own context value.

use std::convert::Infallible;

use crate::errors::FormulaError;

use super::{Formula, Term, ValueType};

/// A node of a formula tree: either a formula or a term below a comparison.
#[derive(Clone, Copy, Debug)]
pub enum Node<'a> {
    /// A formula node.
    Formula(&'a Formula),
    /// A term node.
    Term(&'a Term),
}

impl<'a> Node<'a> {
    /// Number of children of this node.
    pub fn child_count(self) -> usize {
        match self {
            Node::Formula(Formula::Compare(_)) => 2,
            Node::Formula(formula) => formula.operand_count(),
            Node::Term(Term::Function(function)) => function.arguments().len(),
            Node::Term(_) => 0,
        }
    }

    /// The child at position `index`. A comparison has its left and right
    /// term as children.
    pub fn child(self, index: usize) -> Option<Node<'a>> {
        match self {
            Node::Formula(Formula::Compare(comparison)) => match index {
                0 => Some(Node::Term(comparison.left())),
                1 => Some(Node::Term(comparison.right())),
                _ => None,
            },
            Node::Formula(formula) => formula.operand(index).map(Node::Formula),
            Node::Term(Term::Function(function)) => function.arguments().get(index).map(Node::Term),
            Node::Term(_) => None,
        }
    }
}

struct Frame<'a, V> {
    node: Node<'a>,
    next: usize,
    values: Vec<V>,
}

impl<'a, V> Frame<'a, V> {
    fn new(node: Node<'a>) -> Self {
        Self { node, next: 0, values: Vec::with_capacity(node.child_count()) }
    }
}

/// Folds the tree below `root` bottom-up.
///
/// `visit` is called exactly once per node, after all of its children, with
/// the values computed for the children in order. The first error aborts
/// the traversal.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// # use featlogic::formulas::{Formula, Literal};
/// # use featlogic::formulas::traversal::{reduce, Node};
/// let formula = Formula::and(vec![Formula::literal(Literal::new(1, true)), Formula::verum()]);
///
/// let nodes: Result<usize, ()> = reduce(Node::Formula(&formula), |_, children: Vec<usize>| {
///     Ok(1 + children.iter().sum::<usize>())
/// });
///
/// assert_eq!(nodes, Ok(3));
/// ```
pub fn reduce<'a, V, E>(root: Node<'a>, mut visit: impl FnMut(Node<'a>, Vec<V>) -> Result<V, E>) -> Result<V, E> {
    let mut path = vec![Frame::new(root)];
    while let Some(frame) = path.last_mut() {
        if let Some(child) = frame.node.child(frame.next) {
            frame.next += 1;
            path.push(Frame::new(child));
            continue;
        }
        let Some(Frame { node, values, .. }) = path.pop() else { break };
        let value = visit(node, values)?;
        match path.last_mut() {
            Some(parent) => parent.values.push(value),
            None => return Ok(value),
        }
    }
    unreachable!("the root frame always yields a value")
}

/// Infallible variant of [`reduce`] over a formula.
pub fn fold<'a, V>(root: &'a Formula, mut visit: impl FnMut(Node<'a>, Vec<V>) -> V) -> V {
    match reduce::<V, Infallible>(Node::Formula(root), |node, values| Ok(visit(node, values))) {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Constructor of a compound formula node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builder {
    /// `Not`, one operand.
    Not,
    /// `And`, any number of operands.
    And,
    /// `Or`, any number of operands.
    Or,
    /// `Implies`, two operands.
    Implies,
    /// `Biimplies`, two operands.
    Biimplies,
    /// `Exists` over the given index, one operand.
    Exists(u32),
    /// `ForAll` over the given index, one operand.
    ForAll(u32),
}

impl Builder {
    /// The builder reconstructing the root of `formula`, `None` for atoms.
    pub const fn of(formula: &Formula) -> Option<Self> {
        match formula {
            Formula::Not(_) => Some(Self::Not),
            Formula::And(_) => Some(Self::And),
            Formula::Or(_) => Some(Self::Or),
            Formula::Implies(_, _) => Some(Self::Implies),
            Formula::Biimplies(_, _) => Some(Self::Biimplies),
            Formula::Exists(index, _) => Some(Self::Exists(*index)),
            Formula::ForAll(index, _) => Some(Self::ForAll(*index)),
            _ => None,
        }
    }

    /// Builds the node from its operands.
    ///
    /// # Errors
    ///
    /// [`FormulaError::Arity`] if the number of operands does not match the
    /// arity of a unary or binary builder.
    pub fn build(self, operands: Vec<Formula>) -> Result<Formula, FormulaError> {
        let found = operands.len();
        let arity = |expected| FormulaError::Arity { builder: format!("{self:?}"), expected, found };
        Ok(match self {
            Self::And => Formula::And(operands),
            Self::Or => Formula::Or(operands),
            Self::Not | Self::Exists(_) | Self::ForAll(_) => {
                let [operand] = <[Formula; 1]>::try_from(operands).map_err(|_| arity(1))?;
                let operand = Box::new(operand);
                match self {
                    Self::Exists(index) => Formula::Exists(index, operand),
                    Self::ForAll(index) => Formula::ForAll(index, operand),
                    _ => Formula::Not(operand),
                }
            }
            Self::Implies | Self::Biimplies => {
                let [left, right] = <[Formula; 2]>::try_from(operands).map_err(|_| arity(2))?;
                let (left, right) = (Box::new(left), Box::new(right));
                if self == Self::Implies {
                    Formula::Implies(left, right)
                } else {
                    Formula::Biimplies(left, right)
                }
            }
        })
    }
}

/// Result of a [`rewrite`] step.
pub enum Slot<'a, C> {
    /// Rewrite this subformula of the input with its own context.
    Visit(&'a Formula, C),
    /// Build a node from the results of the given slots.
    Node(Builder, Vec<Slot<'a, C>>),
    /// A finished subtree.
    Done(Formula),
}

/// Rewrites `root` top-down into a new formula.
///
/// `step` is called for every [`Slot::Visit`], starting with `root` and
/// `context`. A step returning `Visit` for the very same formula and
/// context never terminates.
///
/// # Panics
///
/// Panics if `step` returns a [`Slot::Node`] whose slot count does not
/// match the arity of its [`Builder`].
///
/// # Examples
///
/// Replace every `True` by `False`:
///
/// ```
/// # use featlogic::formulas::Formula;
/// # use featlogic::formulas::traversal::{descend, rewrite, Slot};
/// let formula = Formula::not(Formula::or(vec![Formula::verum(), Formula::falsum()]));
///
/// let rewritten = rewrite(&formula, (), |f, ctx| match f {
///     Formula::True => Slot::Done(Formula::falsum()),
///     _ => descend(f, ctx),
/// });
///
/// assert_eq!(rewritten, Formula::not(Formula::or(vec![Formula::falsum(), Formula::falsum()])));
/// ```
pub fn rewrite<'a, C>(root: &'a Formula, context: C, mut step: impl FnMut(&'a Formula, C) -> Slot<'a, C>) -> Formula {
    enum Task<'a, C> {
        Slot(Slot<'a, C>),
        Assemble(Builder, usize),
    }
    let mut tasks = vec![Task::Slot(Slot::Visit(root, context))];
    let mut results: Vec<Formula> = Vec::new();
    while let Some(task) = tasks.pop() {
        match task {
            Task::Slot(Slot::Visit(formula, context)) => tasks.push(Task::Slot(step(formula, context))),
            Task::Slot(Slot::Done(formula)) => results.push(formula),
            Task::Slot(Slot::Node(builder, slots)) => {
                tasks.push(Task::Assemble(builder, slots.len()));
                tasks.extend(slots.into_iter().rev().map(Task::Slot));
            }
            Task::Assemble(builder, arity) => {
                let operands = results.split_off(results.len() - arity);
                results.push(builder.build(operands).unwrap_or_else(|error| panic!("{error}")));
            }
        }
    }
    results.pop().expect("rewrite always yields the root")
}

/// The identity step: atoms are copied, compound nodes are rebuilt with the
/// same context passed to all operands.
pub fn descend<C: Clone>(formula: &Formula, context: C) -> Slot<'_, C> {
    match Builder::of(formula) {
        Some(builder) => Slot::Node(builder, formula.operands().map(|op| Slot::Visit(op, context.clone())).collect()),
        None => Slot::Done(formula.clone()),
    }
}

/// Computes the [`ValueType`] of every node and fails if a child does not
/// have the type its parent requires.
///
/// Formula nodes are `Bool` and need `Bool` operands, comparisons need two
/// numeric sides of the same type and functions need arguments of their
/// argument type.
pub fn check_types(formula: &Formula) -> Result<(), FormulaError> {
    reduce(Node::Formula(formula), |node, children: Vec<ValueType>| match node {
        Node::Formula(Formula::Compare(comparison)) => {
            let left = comparison.left().value_type();
            match children.as_slice() {
                [l, r] if l == r && l.is_numeric() => Ok(ValueType::Bool),
                [l, r] if l == r => Err(FormulaError::TypeMismatch {
                    context: "comparison".into(),
                    expected: ValueType::Integer,
                    found: *l,
                }),
                [_, r] => Err(FormulaError::TypeMismatch { context: "comparison".into(), expected: left, found: *r }),
                _ => unreachable!("comparisons have two sides"),
            }
        }
        Node::Formula(parent) => {
            if let Some(found) = children.iter().find(|&&child| child != ValueType::Bool) {
                return Err(FormulaError::TypeMismatch {
                    context: format!("operand of {:?}", parent.formula_type()),
                    expected: ValueType::Bool,
                    found: *found,
                });
            }
            Ok(ValueType::Bool)
        }
        Node::Term(Term::Function(function)) => {
            let expected = function.kind().argument_type();
            if let Some(found) = children.iter().find(|&&child| child != expected) {
                return Err(FormulaError::TypeMismatch {
                    context: format!("argument of {:?}", function.kind()),
                    expected,
                    found: *found,
                });
            }
            Ok(function.kind().result_type())
        }
        Node::Term(term) => Ok(term.value_type()),
    })
    .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulas::{Comparator, Comparison, Literal};

    fn lit(index: u32) -> Formula {
        Formula::literal(Literal::new(index, true))
    }

    #[test]
    fn test_reduce_visits_in_post_order() {
        let formula = Formula::and(vec![lit(1), Formula::not(lit(2)), lit(3)]);
        let mut order = Vec::new();
        let _: Result<(), ()> = reduce(Node::Formula(&formula), |node, _: Vec<()>| {
            if let Node::Formula(f) = node {
                order.push(f.formula_type());
            }
            Ok(())
        });
        use crate::formulas::FormulaType::{And, Literal as Lit, Not};
        assert_eq!(order, vec![Lit, Lit, Not, Lit, And]);
    }

    #[test]
    fn test_reduce_stops_at_first_error() {
        let formula = Formula::or(vec![lit(1), lit(2), lit(3)]);
        let mut visited = 0;
        let result: Result<(), u32> = reduce(Node::Formula(&formula), |node, _: Vec<()>| {
            visited += 1;
            match node {
                Node::Formula(Formula::Literal(l)) if l.index() == 2 => Err(2),
                _ => Ok(()),
            }
        });
        assert_eq!(result, Err(2));
        assert_eq!(visited, 2);
    }

    #[test]
    fn test_reduce_visits_terms() {
        let x = Term::Variable { index: 1, value_type: ValueType::Integer };
        let y = Term::Variable { index: 2, value_type: ValueType::Integer };
        let sum = Term::integer_add(vec![x.clone(), y]).unwrap();
        let formula = Formula::compare(Comparison::new(Comparator::Le, sum, x).unwrap());
        let terms = fold(&formula, |node, children: Vec<usize>| {
            children.iter().sum::<usize>() + usize::from(matches!(node, Node::Term(_)))
        });
        assert_eq!(terms, 4);
    }

    #[test]
    fn test_rewrite_with_context() {
        let formula = Formula::not(Formula::and(vec![lit(1), Formula::not(lit(2))]));
        let depth_tagged = rewrite(&formula, 0_u32, |f, depth| match f {
            Formula::Literal(_) => Slot::Done(lit(depth)),
            _ => descend(f, depth + 1),
        });
        assert_eq!(depth_tagged, Formula::not(Formula::and(vec![lit(2), Formula::not(lit(3))])));
    }

    #[test]
    fn test_rewrite_nested_builders() {
        let formula = Formula::implies(lit(1), lit(2));
        let rewritten = rewrite(&formula, (), |f, ()| match f {
            Formula::Implies(l, r) => {
                Slot::Node(Builder::Or, vec![Slot::Node(Builder::Not, vec![Slot::Visit(l, ())]), Slot::Visit(r, ())])
            }
            _ => descend(f, ()),
        });
        assert_eq!(rewritten, Formula::or(vec![Formula::not(lit(1)), lit(2)]));
    }

    #[test]
    fn test_builder_arity() {
        assert_eq!(Builder::Not.build(vec![lit(1)]), Ok(Formula::not(lit(1))));
        assert_eq!(Builder::ForAll(3).build(vec![lit(1)]), Ok(Formula::ForAll(3, Box::new(lit(1)))));
        assert_eq!(Builder::Biimplies.build(vec![lit(1), lit(2)]), Ok(Formula::biimplies(lit(1), lit(2))));
        assert_eq!(Builder::And.build(vec![]), Ok(Formula::and(vec![])));
        assert_eq!(
            Builder::Not.build(vec![]),
            Err(FormulaError::Arity { builder: "Not".to_owned(), expected: 1, found: 0 })
        );
        assert_eq!(
            Builder::Implies.build(vec![lit(1), lit(2), lit(3)]),
            Err(FormulaError::Arity { builder: "Implies".to_owned(), expected: 2, found: 3 })
        );
    }

    #[test]
    fn test_check_types() {
        let x = Term::Variable { index: 1, value_type: ValueType::Real };
        let formula = Formula::and(vec![lit(1), Formula::compare(Comparison::new(Comparator::Eq, x.clone(), x).unwrap())]);
        assert!(check_types(&formula).is_ok());
    }
}
