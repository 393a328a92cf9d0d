use crate::datastructures::Assignment;
use crate::errors::FormulaError;
use crate::formulas::traversal::{reduce, Node};
use crate::formulas::{Formula, Term, Value, ValueType, VariableMap};

enum Evaluated {
    Truth(Option<bool>),
    Number(Option<Value>),
}

impl Evaluated {
    const fn truth(&self) -> Option<bool> {
        match self {
            Self::Truth(value) => *value,
            Self::Number(_) => None,
        }
    }

    const fn number(&self) -> Option<Value> {
        match self {
            Self::Number(value) => *value,
            Self::Truth(_) => None,
        }
    }
}

/// Evaluates `formula` under `assignment` in three-valued logic.
///
/// `None` means unknown. A literal is unknown if its variable is unassigned,
/// the connectives follow Kleene's strong logic: a conjunction is false as
/// soon as one operand is false, a disjunction true as soon as one operand is
/// true. Error literals and quantified formulas are always unknown.
///
/// Term variables read the assignment, constants read their value from
/// `map`. A sum is unknown if one of its arguments is, a comparison is
/// unknown if one of its sides is.
///
/// # Errors
///
/// [`FormulaError::TypeMismatch`] if the assignment holds a value of another
/// type than the one the formula expects for a variable, and
/// [`FormulaError::UnknownVariable`] if a constant is not registered in
/// `map`.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// # use featlogic::datastructures::IndexAssignment;
/// # use featlogic::formulas::{FormulaContext, Literal};
/// # use featlogic::operations::functions::evaluate;
/// let ctx = FormulaContext::new();
/// let formula = ctx.parse("a & (b | c)").unwrap();
///
/// let known = IndexAssignment::from_literals(&[Literal::new(1, true), Literal::new(3, true)]);
/// let partial = IndexAssignment::from_literals(&[Literal::new(1, true)]);
/// let refuting = IndexAssignment::from_literals(&[Literal::new(1, false)]);
///
/// let map = ctx.variables().read();
/// assert_eq!(evaluate(&formula, &known, &map), Ok(Some(true)));
/// assert_eq!(evaluate(&formula, &partial, &map), Ok(None));
/// assert_eq!(evaluate(&formula, &refuting, &map), Ok(Some(false)));
/// ```
pub fn evaluate<A>(formula: &Formula, assignment: &A, map: &VariableMap) -> Result<Option<bool>, FormulaError>
where A: Assignment + ?Sized {
    reduce(Node::Formula(formula), |node, children: Vec<Evaluated>| match node {
        Node::Formula(formula) => evaluate_formula(formula, &children, assignment).map(Evaluated::Truth),
        Node::Term(term) => evaluate_term(term, &children, assignment, map).map(Evaluated::Number),
    })
    .map(|result| result.truth())
}

fn evaluate_formula<A>(
    formula: &Formula,
    children: &[Evaluated],
    assignment: &A,
) -> Result<Option<bool>, FormulaError>
where A: Assignment + ?Sized {
    let truth = |index: usize| children.get(index).and_then(Evaluated::truth);
    let number = |index: usize| children.get(index).and_then(Evaluated::number);
    Ok(match formula {
        Formula::True => Some(true),
        Formula::False => Some(false),
        Formula::Literal(literal) => match assignment.value(literal.index()) {
            None => None,
            Some(Value::Bool(value)) => Some(value == literal.is_positive()),
            Some(other) => return Err(mismatch(literal.index(), ValueType::Bool, other)),
        },
        Formula::Error(_) | Formula::Exists(..) | Formula::ForAll(..) => None,
        Formula::Compare(comparison) => match (number(0), number(1)) {
            (Some(left), Some(right)) => left.compare(right).map(|ordering| comparison.comparator().test(ordering)),
            _ => None,
        },
        Formula::Not(_) => truth(0).map(|value| !value),
        Formula::And(_) => conjunction(children.iter().map(Evaluated::truth)),
        Formula::Or(_) => disjunction(children.iter().map(Evaluated::truth)),
        Formula::Implies(..) => disjunction([truth(0).map(|value| !value), truth(1)].into_iter()),
        Formula::Biimplies(..) => match (truth(0), truth(1)) {
            (Some(left), Some(right)) => Some(left == right),
            _ => None,
        },
    })
}

fn evaluate_term<A>(
    term: &Term,
    children: &[Evaluated],
    assignment: &A,
    map: &VariableMap,
) -> Result<Option<Value>, FormulaError>
where A: Assignment + ?Sized {
    match term {
        Term::Variable { index, value_type } => match assignment.value(*index) {
            Some(value) if value.value_type() != *value_type => Err(mismatch(*index, *value_type, value)),
            value => Ok(value),
        },
        Term::Constant { index, .. } => map
            .constant(*index)
            .map(|constant| Some(constant.value()))
            .ok_or_else(|| FormulaError::UnknownVariable(format!("constant @{index}"))),
        Term::Function(function) => {
            let arguments: Vec<Option<Value>> = children.iter().map(Evaluated::number).collect();
            Ok(function.kind().apply(&arguments))
        }
    }
}

fn conjunction(values: impl Iterator<Item = Option<bool>>) -> Option<bool> {
    let mut unknown = false;
    for value in values {
        match value {
            Some(false) => return Some(false),
            None => unknown = true,
            Some(true) => {}
        }
    }
    if unknown { None } else { Some(true) }
}

fn disjunction(values: impl Iterator<Item = Option<bool>>) -> Option<bool> {
    conjunction(values.map(|value| value.map(|v| !v))).map(|value| !value)
}

fn mismatch(index: u32, expected: ValueType, found: Value) -> FormulaError {
    FormulaError::TypeMismatch { context: format!("value of variable @{index}"), expected, found: found.value_type() }
}
