use std::collections::BTreeMap;

use crate::errors::FormulaError;
use crate::formulas::{Literal, Value, ValueType, VariableMap};

/// Read access to values of variables by index, as needed by
/// [`functions::evaluate`](crate::operations::functions::evaluate).
///
/// A variable without a value is unknown.
pub trait Assignment {
    /// The value of the variable at `index`, `None` if it is unassigned.
    fn value(&self, index: u32) -> Option<Value>;
}

/// An unchecked assignment from variable indices to values.
///
/// `IndexAssignment` does not know any registry, so it accepts every index
/// and every value. Type errors surface when a formula is evaluated against
/// it. Use [`VariableAssignment`] to have values checked when they are set.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// # use featlogic::datastructures::{Assignment, IndexAssignment};
/// # use featlogic::formulas::{Literal, Value};
/// let assignment = IndexAssignment::from_literals(&[Literal::new(1, true), Literal::new(2, false)]);
///
/// assert_eq!(assignment.value(2), Some(Value::Bool(false)));
/// assert_eq!(assignment.value(3), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexAssignment {
    values: BTreeMap<u32, Value>,
}

impl IndexAssignment {
    /// Creates an empty assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an assignment setting every literal's variable to its phase.
    pub fn from_literals(literals: &[Literal]) -> Self {
        let mut assignment = Self::new();
        for literal in literals {
            assignment.set_bool(literal.index(), literal.is_positive());
        }
        assignment
    }

    /// Sets or, with `None`, clears the value of the variable at `index`.
    pub fn set(&mut self, index: u32, value: Option<Value>) {
        match value {
            Some(value) => self.values.insert(index, value),
            None => self.values.remove(&index),
        };
    }

    /// Sets the variable at `index` to a truth value.
    pub fn set_bool(&mut self, index: u32, value: bool) {
        self.values.insert(index, Value::Bool(value));
    }

    /// Returns the value of the variable at `index`.
    pub fn get(&self, index: u32) -> Option<Value> {
        self.values.get(&index).copied()
    }

    /// Number of assigned variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no variable is assigned.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the assigned variables in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, Value)> + '_ {
        self.values.iter().map(|(&index, &value)| (index, value))
    }

    /// The boolean part of this assignment as literals, in ascending index
    /// order.
    pub fn literals(&self) -> Vec<Literal> {
        self.values
            .iter()
            .filter_map(|(&index, value)| value.as_bool().and_then(|phase| Literal::try_new(index, phase)))
            .collect()
    }
}

impl Assignment for IndexAssignment {
    fn value(&self, index: u32) -> Option<Value> {
        self.get(index)
    }
}

/// An assignment whose values are checked against a [`VariableMap`].
///
/// Setting a variable that is not registered fails with
/// [`FormulaError::UnknownVariable`], setting a value of a different type
/// than the declared one fails with [`FormulaError::TypeMismatch`].
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// # use featlogic::datastructures::{Assignment, VariableAssignment};
/// # use featlogic::formulas::{Value, ValueType, VariableMap};
/// let mut map = VariableMap::new();
/// map.add_variable(Some("size"), None, ValueType::Integer).unwrap();
///
/// let mut assignment = VariableAssignment::new(&map);
/// assignment.set_by_name("size", Some(Value::Integer(3))).unwrap();
///
/// assert!(assignment.set_by_name("size", Some(Value::Bool(true))).is_err());
/// assert!(assignment.set_by_name("color", Some(Value::Integer(1))).is_err());
/// assert_eq!(assignment.get_by_name("size"), Ok(Some(Value::Integer(3))));
/// ```
#[derive(Clone, Debug)]
pub struct VariableAssignment<'m> {
    map: &'m VariableMap,
    values: IndexAssignment,
}

impl<'m> VariableAssignment<'m> {
    /// Creates an empty assignment over the variables of `map`.
    pub fn new(map: &'m VariableMap) -> Self {
        Self { map, values: IndexAssignment::new() }
    }

    /// Sets or clears the value of the variable at `index`.
    pub fn set(&mut self, index: u32, value: Option<Value>) -> Result<(), FormulaError> {
        let signature = self.map.variable(index).ok_or_else(|| FormulaError::UnknownVariable(format!("@{index}")))?;
        if let Some(value) = value {
            check_type(signature.name(), signature.value_type(), value)?;
        }
        self.values.set(index, value);
        Ok(())
    }

    /// Sets or clears the value of the variable named `name`.
    pub fn set_by_name(&mut self, name: &str, value: Option<Value>) -> Result<(), FormulaError> {
        let index = self.index_of(name)?;
        self.set(index, value)
    }

    /// Returns the value of the variable at `index`.
    pub fn get(&self, index: u32) -> Result<Option<Value>, FormulaError> {
        if self.map.has_variable(index) {
            Ok(self.values.get(index))
        } else {
            Err(FormulaError::UnknownVariable(format!("@{index}")))
        }
    }

    /// Returns the value of the variable named `name`.
    pub fn get_by_name(&self, name: &str) -> Result<Option<Value>, FormulaError> {
        self.index_of(name).map(|index| self.values.get(index))
    }

    /// The unchecked assignment holding the values.
    pub const fn values(&self) -> &IndexAssignment {
        &self.values
    }

    fn index_of(&self, name: &str) -> Result<u32, FormulaError> {
        self.map.variable_index(name).ok_or_else(|| FormulaError::UnknownVariable(name.to_owned()))
    }
}

impl Assignment for VariableAssignment<'_> {
    fn value(&self, index: u32) -> Option<Value> {
        self.values.get(index)
    }
}

fn check_type(name: &str, declared: ValueType, value: Value) -> Result<(), FormulaError> {
    if value.value_type() == declared {
        Ok(())
    } else {
        Err(FormulaError::TypeMismatch {
            context: format!("value of '{name}'"),
            expected: declared,
            found: value.value_type(),
        })
    }
}
