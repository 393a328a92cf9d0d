use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::mem;

use crate::datastructures::Assignment;
use crate::errors::FormulaError;
use crate::operations::{functions, predicates, transformations};

use super::traversal::{descend, rewrite};
use super::{Comparison, ErrorLiteral, Literal, VariableMap};

/// Specifies all types a [`Formula`] node can have.
///
/// You can get the type of a formula by calling [`Formula::formula_type()`].
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum FormulaType {
    /// Constant true
    True,
    /// Constant false
    False,
    /// Boolean literal
    Literal,
    /// Error literal
    Error,
    /// Comparison of terms
    Compare,
    /// Negation
    Not,
    /// Conjunction
    And,
    /// Disjunction
    Or,
    /// Implication
    Implies,
    /// Equivalence
    Biimplies,
    /// Existential quantification
    Exists,
    /// Universal quantification
    ForAll,
}

/// The normal forms this crate converts into.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum NormalForm {
    /// Negation normal form
    Nnf,
    /// Conjunctive normal form
    Cnf,
    /// Disjunctive normal form
    Dnf,
}

impl Display for NormalForm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Nnf => "NNF",
            Self::Cnf => "CNF",
            Self::Dnf => "DNF",
        };
        f.write_str(name)
    }
}

/// A propositional or first-order formula.
///
/// A `Formula` is an owned tree: every node owns its operands and has exactly
/// one parent. Variables and constants are referenced by their index in a
/// [`VariableMap`], so a formula is only meaningful together with the
/// registry it was built against.
///
/// The atoms of a formula are `True`, `False`, literals, error literals and
/// comparisons. The constructors [`Formula::and`] and [`Formula::or`] do not
/// flatten or simplify their operands; `And(vec![])` is a valid formula
/// equivalent to `True` and `Or(vec![])` is equivalent to `False`.
///
/// Cloning, comparing, hashing, printing and dropping walk the tree on an
/// explicit stack, so formulas of any depth can be handled.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// # use featlogic::formulas::{Formula, Literal, VariableMap};
/// let mut map = VariableMap::new();
/// let a = Formula::var(map.add_bool_variable("a").unwrap());
/// let b = Formula::var(map.add_bool_variable("b").unwrap());
///
/// let formula = Formula::implies(a.clone(), Formula::or(vec![b, Formula::not(a)]));
///
/// assert_eq!(formula.to_string(&map), "a => b | ~a");
/// ```
pub enum Formula {
    /// Constant true
    True,
    /// Constant false
    False,
    /// Boolean literal
    Literal(Literal),
    /// Opaque atom for an uninterpretable sub-expression
    Error(ErrorLiteral),
    /// Comparison of two numeric terms
    Compare(Comparison),
    /// Negation
    Not(Box<Formula>),
    /// Conjunction
    And(Vec<Formula>),
    /// Disjunction
    Or(Vec<Formula>),
    /// Implication, left to right
    Implies(Box<Formula>, Box<Formula>),
    /// Equivalence
    Biimplies(Box<Formula>, Box<Formula>),
    /// Existential quantification over the variable index
    Exists(u32, Box<Formula>),
    /// Universal quantification over the variable index
    ForAll(u32, Box<Formula>),
}

impl Formula {
    /// Returns the constant `True`.
    pub const fn verum() -> Self {
        Self::True
    }

    /// Returns the constant `False`.
    pub const fn falsum() -> Self {
        Self::False
    }

    /// Returns the constant for `value`.
    pub const fn constant(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }

    /// Returns the formula of a literal.
    pub const fn literal(literal: Literal) -> Self {
        Self::Literal(literal)
    }

    /// Returns the positive literal of the variable at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a valid literal index, see [`Literal::new`].
    pub fn var(index: u32) -> Self {
        Self::Literal(Literal::new(index, true))
    }

    /// Returns the literal of the variable at `index` with the given phase.
    pub fn lit(index: u32, positive: bool) -> Self {
        Self::Literal(Literal::new(index, positive))
    }

    /// Returns a positive error literal with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(ErrorLiteral::new(message))
    }

    /// Returns the formula of a comparison.
    pub const fn compare(comparison: Comparison) -> Self {
        Self::Compare(comparison)
    }

    /// Returns the negation of `operand`.
    pub fn not(operand: Self) -> Self {
        Self::Not(Box::new(operand))
    }

    /// Returns the conjunction of `operands`.
    pub const fn and(operands: Vec<Self>) -> Self {
        Self::And(operands)
    }

    /// Returns the disjunction of `operands`.
    pub const fn or(operands: Vec<Self>) -> Self {
        Self::Or(operands)
    }

    /// Returns the implication `left => right`.
    pub fn implies(left: Self, right: Self) -> Self {
        Self::Implies(Box::new(left), Box::new(right))
    }

    /// Returns the equivalence `left <=> right`.
    pub fn biimplies(left: Self, right: Self) -> Self {
        Self::Biimplies(Box::new(left), Box::new(right))
    }

    /// Returns `exists x. body` for the variable at `index`.
    pub fn exists(index: u32, body: Self) -> Self {
        Self::Exists(index, Box::new(body))
    }

    /// Returns `forall x. body` for the variable at `index`.
    pub fn for_all(index: u32, body: Self) -> Self {
        Self::ForAll(index, Box::new(body))
    }

    /// Returns the type of the root node.
    pub const fn formula_type(&self) -> FormulaType {
        match self {
            Self::True => FormulaType::True,
            Self::False => FormulaType::False,
            Self::Literal(_) => FormulaType::Literal,
            Self::Error(_) => FormulaType::Error,
            Self::Compare(_) => FormulaType::Compare,
            Self::Not(_) => FormulaType::Not,
            Self::And(_) => FormulaType::And,
            Self::Or(_) => FormulaType::Or,
            Self::Implies(_, _) => FormulaType::Implies,
            Self::Biimplies(_, _) => FormulaType::Biimplies,
            Self::Exists(_, _) => FormulaType::Exists,
            Self::ForAll(_, _) => FormulaType::ForAll,
        }
    }

    /// Returns `true` for `True` and `False`.
    pub const fn is_constant(&self) -> bool {
        matches!(self, Self::True | Self::False)
    }

    /// Returns `true` for boolean literals.
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Returns `true` for atoms: constants, literals, error literals and
    /// comparisons.
    pub const fn is_atomic(&self) -> bool {
        matches!(self, Self::True | Self::False | Self::Literal(_) | Self::Error(_) | Self::Compare(_))
    }

    /// Returns `true` for quantified formulas.
    pub const fn is_quantifier(&self) -> bool {
        matches!(self, Self::Exists(_, _) | Self::ForAll(_, _))
    }

    /// Returns `true` for conjunctions.
    pub const fn is_and(&self) -> bool {
        matches!(self, Self::And(_))
    }

    /// Returns `true` for disjunctions.
    pub const fn is_or(&self) -> bool {
        matches!(self, Self::Or(_))
    }

    /// Returns the literal, if this formula is one.
    pub const fn as_literal(&self) -> Option<Literal> {
        match self {
            Self::Literal(literal) => Some(*literal),
            _ => None,
        }
    }

    /// Number of direct operands. Atoms have none; the terms of a
    /// comparison are not operands.
    pub fn operand_count(&self) -> usize {
        match self {
            Self::Not(_) | Self::Exists(_, _) | Self::ForAll(_, _) => 1,
            Self::Implies(_, _) | Self::Biimplies(_, _) => 2,
            Self::And(ops) | Self::Or(ops) => ops.len(),
            _ => 0,
        }
    }

    /// The direct operand at position `index`.
    pub fn operand(&self, index: usize) -> Option<&Self> {
        match (self, index) {
            (Self::Not(op) | Self::Exists(_, op) | Self::ForAll(_, op), 0) => Some(op.as_ref()),
            (Self::Implies(left, _) | Self::Biimplies(left, _), 0) => Some(left.as_ref()),
            (Self::Implies(_, right) | Self::Biimplies(_, right), 1) => Some(right.as_ref()),
            (Self::And(ops) | Self::Or(ops), _) => ops.get(index),
            _ => None,
        }
    }

    /// Iterates over the direct operands in order.
    pub fn operands(&self) -> Operands<'_> {
        Operands { formula: self, front: 0, back: self.operand_count() }
    }

    /// The negation of an atom as an atom: `True` and `False` swap, literals
    /// and error literals flip their polarity and comparisons flip their
    /// comparator. `None` for non-atomic formulas.
    pub fn negated_atom(&self) -> Option<Self> {
        match self {
            Self::True => Some(Self::False),
            Self::False => Some(Self::True),
            Self::Literal(literal) => Some(Self::Literal(literal.negate())),
            Self::Error(error) => Some(Self::Error(error.negate())),
            Self::Compare(comparison) => Some(Self::Compare(comparison.negate())),
            _ => None,
        }
    }

    /// Returns `true` if both formulas are atoms and one is the negation of
    /// the other.
    pub fn is_complement_of(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::True, Self::False) | (Self::False, Self::True) => true,
            (Self::Literal(l), Self::Literal(r)) => l.is_complement_of(*r),
            (Self::Error(l), Self::Error(r)) => l.is_complement_of(r),
            (Self::Compare(l), Self::Compare(r)) => l.is_complement_of(r),
            _ => false,
        }
    }

    /// Returns `true` if this formula is in negation normal form, see
    /// [`predicates::is_nnf`].
    pub fn is_nnf(&self, strict: bool) -> bool {
        predicates::is_nnf(self, strict)
    }

    /// Returns `true` if this formula is in conjunctive normal form, see
    /// [`predicates::is_cnf`].
    pub fn is_cnf(&self, strict: bool) -> bool {
        predicates::is_cnf(self, strict)
    }

    /// Returns `true` if this formula is in disjunctive normal form, see
    /// [`predicates::is_dnf`].
    pub fn is_dnf(&self, strict: bool) -> bool {
        predicates::is_dnf(self, strict)
    }

    /// Returns the strict negation normal form, see [`transformations::nnf`].
    #[must_use]
    pub fn to_nnf(&self) -> Self {
        transformations::nnf(self)
    }

    /// Returns an equivalent conjunctive normal form, see
    /// [`transformations::cnf`].
    pub fn to_cnf(&self, strict: bool) -> Result<Self, FormulaError> {
        transformations::cnf(self, strict)
    }

    /// Returns an equivalent disjunctive normal form, see
    /// [`transformations::dnf`].
    pub fn to_dnf(&self, strict: bool) -> Result<Self, FormulaError> {
        transformations::dnf(self, strict)
    }

    /// Evaluates this formula, see [`functions::evaluate`].
    pub fn evaluate(&self, assignment: &impl Assignment, map: &VariableMap) -> Result<Option<bool>, FormulaError> {
        functions::evaluate(self, assignment, map)
    }

    /// Number of formula nodes of the tree.
    pub fn number_of_nodes(&self) -> usize {
        functions::number_of_nodes(self)
    }

    /// Prints the formula with the names registered in `map`.
    ///
    /// The syntax is the one accepted by
    /// [`FormulaContext::parse`](super::FormulaContext::parse) for the
    /// propositional fragment. Quantifiers print as `exists x. (..)` and
    /// `forall x. (..)`, error literals as `?"message"`.
    pub fn to_string(&self, map: &VariableMap) -> String {
        enum Token<'a> {
            Formula(&'a Formula, bool),
            Text(&'static str),
        }
        let mut out = String::new();
        let mut stack = vec![Token::Formula(self, false)];
        while let Some(token) = stack.pop() {
            let (formula, wrap) = match token {
                Token::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                Token::Formula(formula, wrap) => (formula, wrap),
            };
            if wrap {
                out.push('(');
                stack.push(Token::Text(")"));
            }
            let precedence = formula.precedence();
            match formula {
                Self::True => out.push_str("$true"),
                Self::False => out.push_str("$false"),
                Self::Literal(literal) => out.push_str(&literal.to_string(map)),
                Self::Error(error) => {
                    if !error.is_positive() {
                        out.push('~');
                    }
                    out.push_str(&format!("?{:?}", error.message()));
                }
                Self::Compare(comparison) => {
                    out.push_str(&comparison.left().to_string(map));
                    out.push(' ');
                    out.push_str(comparison.comparator().symbol());
                    out.push(' ');
                    out.push_str(&comparison.right().to_string(map));
                }
                Self::Not(op) => {
                    out.push('~');
                    stack.push(Token::Formula(op, op.precedence() < precedence));
                }
                Self::And(ops) | Self::Or(ops) if ops.is_empty() => {
                    out.push_str(if formula.is_and() { "$true" } else { "$false" });
                }
                Self::And(ops) | Self::Or(ops) => {
                    let separator = if formula.is_and() { " & " } else { " | " };
                    for (i, op) in ops.iter().enumerate().rev() {
                        stack.push(Token::Formula(op, op.precedence() <= precedence));
                        if i > 0 {
                            stack.push(Token::Text(separator));
                        }
                    }
                }
                Self::Implies(left, right) | Self::Biimplies(left, right) => {
                    let separator = if matches!(formula, Self::Implies(_, _)) { " => " } else { " <=> " };
                    stack.push(Token::Formula(right, right.precedence() <= precedence));
                    stack.push(Token::Text(separator));
                    stack.push(Token::Formula(left, left.precedence() <= precedence));
                }
                Self::Exists(index, body) | Self::ForAll(index, body) => {
                    out.push_str(if matches!(formula, Self::Exists(_, _)) { "exists " } else { "forall " });
                    out.push_str(&Literal::new(*index, true).to_string(map));
                    out.push_str(". ");
                    stack.push(Token::Formula(body, true));
                }
            }
        }
        out
    }

    const fn precedence(&self) -> u8 {
        match self {
            Self::Exists(_, _) | Self::ForAll(_, _) => 0,
            Self::Biimplies(_, _) => 1,
            Self::Implies(_, _) => 2,
            Self::Or(_) => 3,
            Self::And(_) => 4,
            Self::Not(_) => 5,
            _ => 6,
        }
    }

    fn detach_operands(&mut self, into: &mut Vec<Self>) {
        match self {
            Self::Not(op) | Self::Exists(_, op) | Self::ForAll(_, op) => {
                if !op.is_atomic() {
                    into.push(mem::replace(&mut **op, Self::True));
                }
            }
            Self::Implies(left, right) | Self::Biimplies(left, right) => {
                for side in [left, right] {
                    if !side.is_atomic() {
                        into.push(mem::replace(&mut **side, Self::True));
                    }
                }
            }
            Self::And(ops) | Self::Or(ops) => into.append(ops),
            _ => {}
        }
    }
}

/// Iterator over the direct operands of a [`Formula`].
#[derive(Clone, Debug)]
pub struct Operands<'a> {
    formula: &'a Formula,
    front: usize,
    back: usize,
}

impl<'a> Iterator for Operands<'a> {
    type Item = &'a Formula;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.front += 1;
        self.formula.operand(self.front - 1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl DoubleEndedIterator for Operands<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.formula.operand(self.back)
    }
}

impl ExactSizeIterator for Operands<'_> {}

impl FusedIterator for Operands<'_> {}

impl Clone for Formula {
    fn clone(&self) -> Self {
        match self {
            Self::True => Self::True,
            Self::False => Self::False,
            Self::Literal(literal) => Self::Literal(*literal),
            Self::Error(error) => Self::Error(error.clone()),
            Self::Compare(comparison) => Self::Compare(comparison.clone()),
            _ => rewrite(self, (), descend),
        }
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some(pair) = pending.pop() {
            match pair {
                (Self::True, Self::True) | (Self::False, Self::False) => {}
                (Self::Literal(l), Self::Literal(r)) if l == r => {}
                (Self::Error(l), Self::Error(r)) if l == r => {}
                (Self::Compare(l), Self::Compare(r)) if l == r => {}
                (Self::Not(l), Self::Not(r)) => pending.push((l.as_ref(), r.as_ref())),
                (Self::And(l), Self::And(r)) | (Self::Or(l), Self::Or(r)) if l.len() == r.len() => {
                    pending.extend(l.iter().zip(r));
                }
                (Self::Implies(l1, l2), Self::Implies(r1, r2)) | (Self::Biimplies(l1, l2), Self::Biimplies(r1, r2)) => {
                    pending.push((l2.as_ref(), r2.as_ref()));
                    pending.push((l1.as_ref(), r1.as_ref()));
                }
                (Self::Exists(l, lb), Self::Exists(r, rb)) | (Self::ForAll(l, lb), Self::ForAll(r, rb)) if l == r => {
                    pending.push((lb.as_ref(), rb.as_ref()));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for Formula {}

impl Hash for Formula {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut pending = vec![self];
        while let Some(formula) = pending.pop() {
            mem::discriminant(formula).hash(state);
            match formula {
                Self::Literal(literal) => literal.hash(state),
                Self::Error(error) => error.hash(state),
                Self::Compare(comparison) => comparison.hash(state),
                Self::And(ops) | Self::Or(ops) => ops.len().hash(state),
                Self::Exists(index, _) | Self::ForAll(index, _) => index.hash(state),
                _ => {}
            }
            pending.extend(formula.operands().rev());
        }
    }
}

impl Drop for Formula {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_operands(&mut pending);
        while let Some(mut formula) = pending.pop() {
            formula.detach_operands(&mut pending);
        }
    }
}

impl Debug for Formula {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_string(&VariableMap::new()))
    }
}
