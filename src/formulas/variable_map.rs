use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use log::trace;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::FormulaError;
use crate::formulas::traversal::{reduce, Node};
use crate::formulas::{Formula, Literal, Term, Value, ValueType};

/// Registry entry of a variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableSignature {
    name: String,
    index: u32,
    value_type: ValueType,
}

impl VariableSignature {
    /// Returns the unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unique index.
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Returns the declared type.
    pub const fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Returns a term referring to this variable.
    pub const fn term(&self) -> Term {
        Term::Variable { index: self.index, value_type: self.value_type }
    }
}

/// Registry entry of a constant.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstantSignature {
    name: String,
    index: u32,
    value: Value,
}

impl ConstantSignature {
    /// Returns the unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unique index.
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Returns the fixed value.
    pub const fn value(&self) -> Value {
        self.value
    }

    /// Returns a term referring to this constant.
    pub const fn term(&self) -> Term {
        Term::Constant { index: self.index, value_type: self.value.value_type() }
    }
}

trait Signature {
    fn name(&self) -> &str;
    fn set_name(&mut self, name: String);
    fn set_index(&mut self, index: u32);
}

impl Signature for VariableSignature {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn set_index(&mut self, index: u32) {
        self.index = index;
    }
}

impl Signature for ConstantSignature {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn set_index(&mut self, index: u32) {
        self.index = index;
    }
}

/// Unused indices below the largest one in use, as disjoint `start..end`
/// ranges keyed by `start`. Adjacent ranges are always merged.
#[derive(Clone, Debug, Default)]
struct Holes {
    ranges: BTreeMap<u32, u32>,
}

impl Holes {
    fn first(&self) -> Option<u32> {
        self.ranges.keys().next().copied()
    }

    fn add(&mut self, mut start: u32, mut end: u32) {
        if start >= end {
            return;
        }
        if let Some((&before, &before_end)) = self.ranges.range(..start).next_back() {
            if before_end == start {
                self.ranges.remove(&before);
                start = before;
            }
        }
        if let Some(after_end) = self.ranges.remove(&end) {
            end = after_end;
        }
        self.ranges.insert(start, end);
    }

    fn take(&mut self, index: u32) {
        let Some((&start, &end)) = self.ranges.range(..=index).next_back() else { return };
        if index >= end {
            return;
        }
        self.ranges.remove(&start);
        self.add(start, index);
        self.add(index + 1, end);
    }

    /// Drops every hole at or above `limit`.
    fn truncate(&mut self, limit: u32) {
        self.ranges.split_off(&limit);
        if let Some(end) = self.ranges.values_mut().next_back() {
            *end = (*end).min(limit);
        }
    }

    fn clear(&mut self) {
        self.ranges.clear();
    }
}

/// One namespace of the registry.
///
/// `holes` contains exactly the unused indices in `1..max_index()`.
#[derive(Clone, Debug)]
struct Namespace<S> {
    entries: BTreeMap<u32, S>,
    names: HashMap<String, u32>,
    holes: Holes,
}

impl<S: Signature> Namespace<S> {
    fn new() -> Self {
        Self { entries: BTreeMap::new(), names: HashMap::new(), holes: Holes::default() }
    }

    fn get(&self, index: u32) -> Option<&S> {
        self.entries.get(&index)
    }

    fn index_of(&self, name: &str) -> Option<u32> {
        self.names.get(name).copied()
    }

    fn len(&self) -> usize {
        self.names.len()
    }

    fn max_index(&self) -> u32 {
        self.entries.keys().next_back().copied().unwrap_or(0)
    }

    fn next_free(&self) -> u32 {
        self.holes.first().unwrap_or_else(|| self.max_index() + 1)
    }

    /// The decimal index, suffixed with `_1`, `_2`, ... while that name is
    /// taken.
    fn generated_name(&self, index: u32) -> String {
        let base = index.to_string();
        if !self.names.contains_key(&base) {
            return base;
        }
        (1_u32..).map(|n| format!("{base}_{n}")).find(|name| !self.names.contains_key(name)).unwrap_or(base)
    }

    fn insert(
        &mut self,
        name: Option<&str>,
        index: Option<u32>,
        make: impl FnOnce(String, u32) -> S,
    ) -> Result<u32, FormulaError> {
        let index = match index {
            Some(index) => {
                if index == 0 || i32::try_from(index).is_err() {
                    return Err(FormulaError::InvalidIndex(index));
                }
                if let Some(existing) = self.get(index) {
                    return Err(FormulaError::DuplicateIndex { index, name: existing.name().to_owned() });
                }
                index
            }
            None => {
                let index = self.next_free();
                if i32::try_from(index).is_err() {
                    return Err(FormulaError::InvalidIndex(index));
                }
                index
            }
        };
        let name = name.map_or_else(|| self.generated_name(index), str::to_owned);
        if self.names.contains_key(&name) {
            return Err(FormulaError::DuplicateName(name));
        }
        let max = self.max_index();
        if index > max {
            self.holes.add(max + 1, index);
        } else {
            self.holes.take(index);
        }
        self.names.insert(name.clone(), index);
        self.entries.insert(index, make(name, index));
        Ok(index)
    }

    fn remove(&mut self, index: u32) -> Option<S> {
        let removed = self.entries.remove(&index)?;
        self.names.remove(removed.name());
        self.holes.add(index, index + 1);
        self.holes.truncate(self.max_index());
        Some(removed)
    }

    fn rename(&mut self, index: u32, new_name: &str) -> Result<(), FormulaError> {
        if self.get(index).is_none() {
            return Err(FormulaError::UnknownVariable(format!("@{index}")));
        }
        match self.names.get(new_name) {
            Some(&owner) if owner == index => return Ok(()),
            Some(_) => return Err(FormulaError::DuplicateName(new_name.to_owned())),
            None => {}
        }
        if let Some(entry) = self.entries.get_mut(&index) {
            self.names.remove(entry.name());
            entry.set_name(new_name.to_owned());
            self.names.insert(new_name.to_owned(), index);
        }
        Ok(())
    }

    fn normalize(&mut self) -> IndexMapping {
        let mut mapping = BTreeMap::new();
        let mut compacted = BTreeMap::new();
        for (new, (old, mut entry)) in (1_u32..).zip(std::mem::take(&mut self.entries)) {
            entry.set_index(new);
            self.names.insert(entry.name().to_owned(), new);
            mapping.insert(old, new);
            compacted.insert(new, entry);
        }
        self.entries = compacted;
        self.holes.clear();
        IndexMapping { mapping }
    }

    fn iter(&self) -> impl Iterator<Item = &S> {
        self.entries.values()
    }
}

/// Old-to-new index mapping produced by [`VariableMap::normalize`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexMapping {
    mapping: BTreeMap<u32, u32>,
}

impl IndexMapping {
    /// Returns the new index of `old`, or `None` if `old` was not registered.
    pub fn get(&self, old: u32) -> Option<u32> {
        self.mapping.get(&old).copied()
    }

    /// Returns `true` if no index changed.
    pub fn is_identity(&self) -> bool {
        self.mapping.iter().all(|(old, new)| old == new)
    }

    /// Iterates over `(old, new)` pairs in ascending order of `old`.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.mapping.iter().map(|(&old, &new)| (old, new))
    }

    /// Number of mapped indices.
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    /// Returns `true` if nothing was mapped.
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}

/// The mappings of both namespaces after a [`VariableMap::normalize`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Normalization {
    /// Mapping of the variable namespace.
    pub variables: IndexMapping,
    /// Mapping of the constant namespace.
    pub constants: IndexMapping,
}

/// Bidirectional registry between names and indices.
///
/// A `VariableMap` has two separate namespaces: typed *variables* and
/// *constants* carrying a fixed [`Value`]. In each namespace names and
/// indices are unique, and index `0` is reserved. New entries without an
/// explicit index get the smallest unused index, so indices stay dense as
/// long as nothing is removed. [`normalize()`] compacts them again.
///
/// Literals and terms refer to entries by index only. Removing or
/// normalizing therefore invalidates indices held elsewhere; callers
/// re-resolve them, e.g. with
/// [`transformations::reindex`](crate::operations::transformations::reindex).
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// # use featlogic::formulas::{ValueType, VariableMap};
/// let mut map = VariableMap::new();
/// let a = map.add_variable(Some("a"), None, ValueType::Bool).unwrap();
/// let b = map.add_variable(Some("b"), None, ValueType::Bool).unwrap();
///
/// assert_eq!((a, b), (1, 2));
/// assert_eq!(map.variable_index("b"), Some(2));
/// assert_eq!(map.variable_name(1), Some("a"));
/// ```
///
/// [`normalize()`]: VariableMap::normalize
#[derive(Clone, Debug)]
pub struct VariableMap {
    variables: Namespace<VariableSignature>,
    constants: Namespace<ConstantSignature>,
}

impl Default for VariableMap {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableMap {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self { variables: Namespace::new(), constants: Namespace::new() }
    }

    /// Creates a registry with boolean variables of the given names at the
    /// indices `1..=n`.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Self, FormulaError> {
        let mut map = Self::new();
        for name in names {
            map.add_bool_variable(name)?;
        }
        Ok(map)
    }

    /// Adds a variable.
    ///
    /// Without an explicit `index` the smallest unused index is chosen;
    /// without a `name`, the decimal index is used as name.
    ///
    /// # Errors
    ///
    /// [`FormulaError::DuplicateIndex`] if `index` is occupied,
    /// [`FormulaError::DuplicateName`] if `name` is already registered and
    /// [`FormulaError::InvalidIndex`] for `0` or indices beyond `i32::MAX`.
    pub fn add_variable(
        &mut self,
        name: Option<&str>,
        index: Option<u32>,
        value_type: ValueType,
    ) -> Result<u32, FormulaError> {
        let index = self.variables.insert(name, index, |name, index| VariableSignature { name, index, value_type })?;
        trace!("registered {value_type} variable {index}");
        Ok(index)
    }

    /// Adds a boolean variable with the next free index.
    pub fn add_bool_variable(&mut self, name: &str) -> Result<u32, FormulaError> {
        self.add_variable(Some(name), None, ValueType::Bool)
    }

    /// Returns the index of the boolean variable `name`, adding it if it is
    /// not registered yet.
    ///
    /// # Errors
    ///
    /// [`FormulaError::TypeMismatch`] if `name` is registered with another
    /// type.
    pub fn get_or_add_bool(&mut self, name: &str) -> Result<u32, FormulaError> {
        match self.variable_by_name(name) {
            Some(signature) if signature.value_type == ValueType::Bool => Ok(signature.index),
            Some(signature) => Err(FormulaError::TypeMismatch {
                context: format!("variable '{name}'"),
                expected: ValueType::Bool,
                found: signature.value_type,
            }),
            None => self.add_bool_variable(name),
        }
    }

    /// Adds a constant with the same index and name rules as
    /// [`add_variable`](Self::add_variable).
    pub fn add_constant(&mut self, name: Option<&str>, index: Option<u32>, value: Value) -> Result<u32, FormulaError> {
        let index = self.constants.insert(name, index, |name, index| ConstantSignature { name, index, value })?;
        trace!("registered constant {index} = {value}");
        Ok(index)
    }

    /// Removes the variable at `index`. Returns `false` if there was none.
    pub fn remove_variable(&mut self, index: u32) -> bool {
        let removed = self.variables.remove(index);
        if let Some(signature) = &removed {
            trace!("removed variable {} ('{}')", index, signature.name);
        }
        removed.is_some()
    }

    /// Removes the variable named `name`. Returns `false` if there was none.
    pub fn remove_variable_by_name(&mut self, name: &str) -> bool {
        self.variables.index_of(name).is_some_and(|index| self.remove_variable(index))
    }

    /// Removes the constant at `index`. Returns `false` if there was none.
    pub fn remove_constant(&mut self, index: u32) -> bool {
        self.constants.remove(index).is_some()
    }

    /// Removes the constant named `name`. Returns `false` if there was none.
    pub fn remove_constant_by_name(&mut self, name: &str) -> bool {
        self.constants.index_of(name).is_some_and(|index| self.remove_constant(index))
    }

    /// Returns the variable at `index`.
    pub fn variable(&self, index: u32) -> Option<&VariableSignature> {
        self.variables.get(index)
    }

    /// Returns the variable named `name`.
    pub fn variable_by_name(&self, name: &str) -> Option<&VariableSignature> {
        self.variables.index_of(name).and_then(|index| self.variables.get(index))
    }

    /// Returns the index of the variable named `name`.
    pub fn variable_index(&self, name: &str) -> Option<u32> {
        self.variables.index_of(name)
    }

    /// Returns the name of the variable at `index`.
    pub fn variable_name(&self, index: u32) -> Option<&str> {
        self.variables.get(index).map(VariableSignature::name)
    }

    /// Returns `true` if a variable is registered at `index`.
    pub fn has_variable(&self, index: u32) -> bool {
        self.variables.get(index).is_some()
    }

    /// Returns the constant at `index`.
    pub fn constant(&self, index: u32) -> Option<&ConstantSignature> {
        self.constants.get(index)
    }

    /// Returns the constant named `name`.
    pub fn constant_by_name(&self, name: &str) -> Option<&ConstantSignature> {
        self.constants.index_of(name).and_then(|index| self.constants.get(index))
    }

    /// Returns the index of the constant named `name`.
    pub fn constant_index(&self, name: &str) -> Option<u32> {
        self.constants.index_of(name)
    }

    /// Renames the variable `old` to `new`.
    ///
    /// # Errors
    ///
    /// [`FormulaError::UnknownVariable`] if `old` is not registered and
    /// [`FormulaError::DuplicateName`] if `new` belongs to another variable.
    pub fn rename_variable(&mut self, old: &str, new: &str) -> Result<(), FormulaError> {
        let index = self.variables.index_of(old).ok_or_else(|| FormulaError::UnknownVariable(old.to_owned()))?;
        self.rename_variable_at(index, new)
    }

    /// Renames the variable at `index` to `new`.
    pub fn rename_variable_at(&mut self, index: u32, new: &str) -> Result<(), FormulaError> {
        self.variables.rename(index, new)?;
        trace!("renamed variable {index} to '{new}'");
        Ok(())
    }

    /// Renames the constant at `index` to `new`.
    pub fn rename_constant_at(&mut self, index: u32, new: &str) -> Result<(), FormulaError> {
        self.constants.rename(index, new)
    }

    /// Compacts the indices of both namespaces to `1..=count`, keeping their
    /// relative order, and returns the old-to-new mappings.
    ///
    /// # Examples
    ///
    /// Basic usage:
    ///
    /// ```
    /// # use featlogic::formulas::VariableMap;
    /// let mut map = VariableMap::from_names(["a", "b", "c"]).unwrap();
    /// map.remove_variable_by_name("a");
    ///
    /// let normalization = map.normalize();
    ///
    /// assert_eq!(normalization.variables.get(3), Some(2));
    /// assert_eq!(map.variable_index("c"), Some(2));
    /// assert_eq!(map.max_variable_index(), 2);
    /// ```
    pub fn normalize(&mut self) -> Normalization {
        let variables = self.variables.normalize();
        let constants = self.constants.normalize();
        trace!("normalized registry to {} variables and {} constants", self.variable_count(), self.constant_count());
        Normalization { variables, constants }
    }

    /// Number of registered variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Number of registered constants.
    pub fn constant_count(&self) -> usize {
        self.constants.len()
    }

    /// The largest index of a registered variable, `0` for an empty registry.
    pub fn max_variable_index(&self) -> u32 {
        self.variables.max_index()
    }

    /// The largest index of a registered constant, `0` if there is none.
    pub fn max_constant_index(&self) -> u32 {
        self.constants.max_index()
    }

    /// Iterates over all variables in ascending index order.
    pub fn variables(&self) -> impl Iterator<Item = &VariableSignature> {
        self.variables.iter()
    }

    /// Iterates over all constants in ascending index order.
    pub fn constants(&self) -> impl Iterator<Item = &ConstantSignature> {
        self.constants.iter()
    }

    /// Returns all variable names in ascending index order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(VariableSignature::name).collect()
    }

    /// Returns the literal of the boolean variable `name`.
    pub fn literal(&self, name: &str, positive: bool) -> Result<Literal, FormulaError> {
        let signature = self.variable_by_name(name).ok_or_else(|| FormulaError::UnknownVariable(name.to_owned()))?;
        if signature.value_type != ValueType::Bool {
            return Err(FormulaError::TypeMismatch {
                context: format!("literal '{name}'"),
                expected: ValueType::Bool,
                found: signature.value_type,
            });
        }
        Ok(Literal::new(signature.index, positive))
    }

    /// Checks that every literal, term variable and constant of `formula` is
    /// registered with a matching type.
    pub fn validate(&self, formula: &Formula) -> Result<(), FormulaError> {
        reduce(Node::Formula(formula), |node, _: Vec<()>| match node {
            Node::Formula(Formula::Literal(literal)) => self.expect_variable(literal.index(), ValueType::Bool),
            Node::Term(Term::Variable { index, value_type }) => self.expect_variable(*index, *value_type),
            Node::Term(Term::Constant { index, value_type }) => match self.constant(*index) {
                Some(constant) if constant.value.value_type() == *value_type => Ok(()),
                Some(constant) => Err(FormulaError::TypeMismatch {
                    context: format!("constant '{}'", constant.name),
                    expected: *value_type,
                    found: constant.value.value_type(),
                }),
                None => Err(FormulaError::UnknownVariable(format!("constant @{index}"))),
            },
            _ => Ok(()),
        })
    }

    fn expect_variable(&self, index: u32, value_type: ValueType) -> Result<(), FormulaError> {
        match self.variable(index) {
            Some(signature) if signature.value_type == value_type => Ok(()),
            Some(signature) => Err(FormulaError::TypeMismatch {
                context: format!("variable '{}'", signature.name),
                expected: value_type,
                found: signature.value_type,
            }),
            None => Err(FormulaError::UnknownVariable(format!("@{index}"))),
        }
    }
}

/// A [`VariableMap`] shared between threads: many readers or one writer.
#[derive(Clone, Debug, Default)]
pub struct SharedVariableMap(Arc<RwLock<VariableMap>>);

impl SharedVariableMap {
    /// Wraps `map` for shared use.
    pub fn new(map: VariableMap) -> Self {
        Self(Arc::new(RwLock::new(map)))
    }

    /// Acquires shared read access.
    pub fn read(&self) -> RwLockReadGuard<'_, VariableMap> {
        self.0.read()
    }

    /// Acquires exclusive write access.
    pub fn write(&self) -> RwLockWriteGuard<'_, VariableMap> {
        self.0.write()
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> VariableMap {
        self.0.read().clone()
    }
}
