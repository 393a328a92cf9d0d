use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use crate::errors::FormulaError;

use super::VariableMap;

/// The type of a variable, constant or term.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum ValueType {
    /// Truth values.
    Bool,
    /// 64-bit integers.
    Integer,
    /// 64-bit floating point numbers.
    Real,
}

impl ValueType {
    /// Returns `true` for `Integer` and `Real`.
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Real)
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Real => "real",
        };
        f.write_str(name)
    }
}

/// A concrete value of one of the [`ValueType`]s.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Value {
    /// A truth value.
    Bool(bool),
    /// An integer.
    Integer(i64),
    /// A real number.
    Real(f64),
}

impl Value {
    /// Returns the type of this value.
    pub const fn value_type(self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Bool,
            Self::Integer(_) => ValueType::Integer,
            Self::Real(_) => ValueType::Real,
        }
    }

    /// Returns the truth value, if this is a boolean.
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(value),
            _ => None,
        }
    }

    /// Compares two numbers of the same type. `None` if the types differ, if
    /// one side is a boolean or if a real is not comparable (NaN).
    pub fn compare(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(l), Self::Integer(r)) => Some(l.cmp(&r)),
            (Self::Real(l), Self::Real(r)) => l.partial_cmp(&r),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Real(value) => write!(f, "{value}"),
        }
    }
}

/// The function symbols a [`Term`] can apply.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum FunctionKind {
    /// Sum of integer arguments.
    IntegerAdd,
    /// Sum of real arguments.
    RealAdd,
}

impl FunctionKind {
    /// The type every argument must have.
    pub const fn argument_type(self) -> ValueType {
        match self {
            Self::IntegerAdd => ValueType::Integer,
            Self::RealAdd => ValueType::Real,
        }
    }

    /// The type of the function's result.
    pub const fn result_type(self) -> ValueType {
        self.argument_type()
    }

    /// Folds the argument values left to right. Any unknown argument makes the
    /// result unknown.
    pub fn apply(self, arguments: &[Option<Value>]) -> Option<Value> {
        match self {
            Self::IntegerAdd => arguments
                .iter()
                .try_fold(0_i64, |sum, arg| match arg {
                    Some(Value::Integer(value)) => Some(sum.wrapping_add(*value)),
                    _ => None,
                })
                .map(Value::Integer),
            Self::RealAdd => arguments
                .iter()
                .try_fold(0.0_f64, |sum, arg| match arg {
                    Some(Value::Real(value)) => Some(sum + value),
                    _ => None,
                })
                .map(Value::Real),
        }
    }
}

/// Application of a [`FunctionKind`] to argument terms.
///
/// The arguments are type checked on construction, so a `Function` always
/// has arguments of its [`FunctionKind::argument_type`].
#[derive(Clone, Hash, Eq, PartialEq, Debug)]
pub struct Function {
    kind: FunctionKind,
    arguments: Vec<Term>,
}

impl Function {
    /// Creates a new function application, failing with
    /// [`FormulaError::TypeMismatch`] if an argument has the wrong type.
    pub fn new(kind: FunctionKind, arguments: Vec<Term>) -> Result<Self, FormulaError> {
        let expected = kind.argument_type();
        if let Some(wrong) = arguments.iter().find(|arg| arg.value_type() != expected) {
            return Err(FormulaError::TypeMismatch {
                context: format!("argument of {kind:?}"),
                expected,
                found: wrong.value_type(),
            });
        }
        Ok(Self { kind, arguments })
    }

    /// Returns the function symbol.
    pub const fn kind(&self) -> FunctionKind {
        self.kind
    }

    /// Returns the argument terms.
    pub fn arguments(&self) -> &[Term] {
        &self.arguments
    }
}

/// A typed term: a variable, a constant or a function application.
///
/// Variables and constants refer to the respective namespace of a
/// [`VariableMap`] by index.
#[derive(Clone, Hash, Eq, PartialEq, Debug)]
pub enum Term {
    /// A variable of the given type.
    Variable {
        /// Index in the variable namespace.
        index: u32,
        /// Declared type of the variable.
        value_type: ValueType,
    },
    /// A constant of the given type.
    Constant {
        /// Index in the constant namespace.
        index: u32,
        /// Type of the constant's value.
        value_type: ValueType,
    },
    /// A function application.
    Function(Function),
}

impl Term {
    /// Creates an integer sum of the given terms.
    pub fn integer_add(arguments: Vec<Self>) -> Result<Self, FormulaError> {
        Function::new(FunctionKind::IntegerAdd, arguments).map(Self::Function)
    }

    /// Creates a real sum of the given terms.
    pub fn real_add(arguments: Vec<Self>) -> Result<Self, FormulaError> {
        Function::new(FunctionKind::RealAdd, arguments).map(Self::Function)
    }

    /// Returns the type of this term.
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Variable { value_type, .. } | Self::Constant { value_type, .. } => *value_type,
            Self::Function(function) => function.kind.result_type(),
        }
    }

    /// Returns a copy of this term with every variable and constant index
    /// replaced by `vars` and `consts` respectively.
    ///
    /// The rebuild runs on an explicit stack.
    #[must_use]
    pub fn map_indices(&self, vars: &impl Fn(u32) -> u32, consts: &impl Fn(u32) -> u32) -> Self {
        enum Task<'a> {
            Visit(&'a Term),
            Apply(FunctionKind, usize),
        }
        let mut tasks = vec![Task::Visit(self)];
        let mut results: Vec<Self> = Vec::new();
        while let Some(task) = tasks.pop() {
            match task {
                Task::Visit(Self::Variable { index, value_type }) => {
                    results.push(Self::Variable { index: vars(*index), value_type: *value_type });
                }
                Task::Visit(Self::Constant { index, value_type }) => {
                    results.push(Self::Constant { index: consts(*index), value_type: *value_type });
                }
                Task::Visit(Self::Function(function)) => {
                    tasks.push(Task::Apply(function.kind, function.arguments.len()));
                    tasks.extend(function.arguments.iter().rev().map(Task::Visit));
                }
                Task::Apply(kind, arity) => {
                    let arguments = results.split_off(results.len() - arity);
                    results.push(Self::Function(Function { kind, arguments }));
                }
            }
        }
        results.pop().unwrap_or_else(|| self.clone())
    }

    /// Prints the term with the names registered in `map`.
    pub fn to_string(&self, map: &VariableMap) -> String {
        match self {
            Self::Variable { index, .. } => {
                map.variable_name(*index).map_or_else(|| format!("@{index}"), str::to_owned)
            }
            Self::Constant { index, .. } => {
                map.constant(*index).map_or_else(|| format!("@c{index}"), |c| c.value().to_string())
            }
            Self::Function(function) => {
                let args: Vec<String> = function.arguments.iter().map(|arg| arg.to_string(map)).collect();
                format!("({})", args.join(" + "))
            }
        }
    }
}

/// The relation of a [`Comparison`].
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum Comparator {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl Comparator {
    /// Returns the comparator of the negated comparison.
    #[must_use]
    pub const fn negate(self) -> Self {
        match self {
            Self::Eq => Self::Ne,
            Self::Ne => Self::Eq,
            Self::Lt => Self::Ge,
            Self::Le => Self::Gt,
            Self::Gt => Self::Le,
            Self::Ge => Self::Lt,
        }
    }

    /// Returns `true` if `ordering` of the left side to the right side
    /// satisfies this comparator.
    pub const fn test(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => matches!(ordering, Ordering::Equal),
            Self::Ne => !matches!(ordering, Ordering::Equal),
            Self::Lt => matches!(ordering, Ordering::Less),
            Self::Le => !matches!(ordering, Ordering::Greater),
            Self::Gt => matches!(ordering, Ordering::Greater),
            Self::Ge => !matches!(ordering, Ordering::Less),
        }
    }

    /// Returns the textual symbol.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// A comparison between two numeric terms of the same type. It is an atom of
/// a [`Formula`](super::Formula).
#[derive(Clone, Hash, Eq, PartialEq, Debug)]
pub struct Comparison {
    comparator: Comparator,
    left: Term,
    right: Term,
}

impl Comparison {
    /// Creates a new comparison. Both sides must have the same numeric type.
    pub fn new(comparator: Comparator, left: Term, right: Term) -> Result<Self, FormulaError> {
        let expected = left.value_type();
        if !expected.is_numeric() {
            return Err(FormulaError::TypeMismatch {
                context: "left side of comparison".into(),
                expected: ValueType::Integer,
                found: expected,
            });
        }
        if right.value_type() != expected {
            return Err(FormulaError::TypeMismatch {
                context: "right side of comparison".into(),
                expected,
                found: right.value_type(),
            });
        }
        Ok(Self { comparator, left, right })
    }

    /// Returns the relation.
    pub const fn comparator(&self) -> Comparator {
        self.comparator
    }

    /// Returns the left side.
    pub const fn left(&self) -> &Term {
        &self.left
    }

    /// Returns the right side.
    pub const fn right(&self) -> &Term {
        &self.right
    }

    /// Returns the negated comparison, which has the flipped comparator.
    #[must_use]
    pub fn negate(&self) -> Self {
        Self { comparator: self.comparator.negate(), left: self.left.clone(), right: self.right.clone() }
    }

    /// Returns `true` if `other` is the negation of this comparison.
    pub fn is_complement_of(&self, other: &Self) -> bool {
        self.comparator == other.comparator.negate() && self.left == other.left && self.right == other.right
    }

    #[must_use]
    pub(crate) fn with_sides(&self, left: Term, right: Term) -> Self {
        Self { comparator: self.comparator, left, right }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_var(index: u32) -> Term {
        Term::Variable { index, value_type: ValueType::Integer }
    }

    #[test]
    fn test_function_type_check() {
        let real = Term::Variable { index: 3, value_type: ValueType::Real };
        assert!(Term::integer_add(vec![int_var(1), int_var(2)]).is_ok());
        let err = Term::integer_add(vec![int_var(1), real]).unwrap_err();
        assert!(matches!(err, FormulaError::TypeMismatch { expected: ValueType::Integer, found: ValueType::Real, .. }));
    }

    #[test]
    fn test_comparison_type_check() {
        let b = Term::Variable { index: 1, value_type: ValueType::Bool };
        assert!(Comparison::new(Comparator::Lt, b.clone(), b).is_err());
        let real = Term::Variable { index: 3, value_type: ValueType::Real };
        assert!(Comparison::new(Comparator::Lt, int_var(1), real).is_err());
        assert!(Comparison::new(Comparator::Lt, int_var(1), int_var(2)).is_ok());
    }

    #[test]
    fn test_comparator_negation() {
        for cmp in [Comparator::Eq, Comparator::Ne, Comparator::Lt, Comparator::Le, Comparator::Gt, Comparator::Ge] {
            assert_eq!(cmp.negate().negate(), cmp);
            for ordering in [Ordering::Less, Ordering::Equal, Ordering::Greater] {
                assert_ne!(cmp.test(ordering), cmp.negate().test(ordering));
            }
        }
    }

    #[test]
    fn test_apply() {
        let sum = FunctionKind::IntegerAdd.apply(&[Some(Value::Integer(2)), Some(Value::Integer(5))]);
        assert_eq!(sum, Some(Value::Integer(7)));
        assert_eq!(FunctionKind::IntegerAdd.apply(&[Some(Value::Integer(2)), None]), None);
        assert_eq!(FunctionKind::RealAdd.apply(&[]), Some(Value::Real(0.0)));
    }

    #[test]
    fn test_map_indices() {
        let term = Term::integer_add(vec![int_var(4), Term::Constant { index: 2, value_type: ValueType::Integer }]).unwrap();
        let mapped = term.map_indices(&|i| i - 3, &|i| i + 10);
        let expected =
            Term::integer_add(vec![int_var(1), Term::Constant { index: 12, value_type: ValueType::Integer }]).unwrap();
        assert_eq!(mapped, expected);
    }
}
