use thiserror::Error;

use crate::formulas::{NormalForm, ValueType};
use crate::handlers::FactorizationError;

/// Errors raised by registry lookups, type checks and normal-form
/// conversions.
///
/// Malformed sub-expressions are not errors: they are represented in the
/// tree as [`ErrorLiteral`](crate::formulas::ErrorLiteral)s.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    /// A name or index is not present in the registry.
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    /// An explicit index is already occupied.
    #[error("index {index} is already occupied by '{name}'")]
    DuplicateIndex {
        /// The requested index.
        index: u32,
        /// The name registered at that index.
        name: String,
    },

    /// A name is already registered.
    #[error("name '{0}' is already registered")]
    DuplicateName(String),

    /// Index 0 or an index beyond the literal range was requested.
    #[error("invalid index {0}")]
    InvalidIndex(u32),

    /// A value or child does not have the type its context requires.
    #[error("type mismatch in {context}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Where the mismatch occurred.
        context: String,
        /// The required type.
        expected: ValueType,
        /// The type actually found.
        found: ValueType,
    },

    /// A formula does not have the shape an operation requires or promises.
    #[error("formula is not in {form}: {reason}")]
    NormalFormViolation {
        /// The normal form that was expected.
        form: NormalForm,
        /// What exactly is wrong.
        reason: String,
    },

    /// An atom that cannot be written as a signed clause literal.
    #[error("atom cannot be encoded as a clause literal: {0}")]
    UnsupportedAtom(String),

    /// A node builder received the wrong number of operands.
    #[error("{builder} needs {expected} operands, found {found}")]
    Arity {
        /// The node kind.
        builder: String,
        /// The operand count the node kind requires.
        expected: usize,
        /// The operand count supplied.
        found: usize,
    },

    /// Input text that does not match the formula grammar.
    #[error("parse error: {0}")]
    Parse(String),

    /// A bounded conversion was aborted by its handler.
    #[error("conversion aborted: {0}")]
    Aborted(#[from] FactorizationError),
}

impl FormulaError {
    pub(crate) fn violation(form: NormalForm, reason: impl Into<String>) -> Self {
        Self::NormalFormViolation { form, reason: reason.into() }
    }
}
