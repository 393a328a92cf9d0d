use std::num::NonZeroI32;

use super::VariableMap;

/// Boolean literal.
///
/// A literal is a single signed, non-zero 32-bit integer. Its sign is the
/// polarity (phase) of the literal, its magnitude is the index of a boolean
/// variable in a [`VariableMap`]. This is exactly the representation SAT
/// backends consume, so clause lists can be produced without any lookup.
///
/// Two literals are complementary iff they refer to the same index with a
/// different sign.
///
/// `Literal` does not store a name. To print it, the registry that owns the
/// index is needed, see [`Literal::to_string`].
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// # use featlogic::formulas::Literal;
/// let a = Literal::new(1, true);
/// let na = a.negate();
///
/// assert_eq!(na.value(), -1);
/// assert!(a.is_complement_of(na));
/// assert_eq!(na.negate(), a);
/// ```
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Literal(NonZeroI32);

impl Literal {
    /// Creates a new `Literal` for the variable at `index`. `positive`
    /// describes the phase, so `true` yields a positive literal and `false` a
    /// negated one.
    ///
    /// # Panics
    ///
    /// Panics if `index` is `0` or greater than `i32::MAX`. Indices handed out
    /// by a [`VariableMap`] are always valid.
    pub fn new(index: u32, positive: bool) -> Self {
        Self::try_new(index, positive).expect("literal index must be in 1..=i32::MAX")
    }

    /// Creates a new `Literal`, or `None` if `index` is not a valid literal
    /// index.
    ///
    /// # Examples
    ///
    /// Basic usage:
    ///
    /// ```
    /// # use featlogic::formulas::Literal;
    /// assert!(Literal::try_new(0, true).is_none());
    /// assert_eq!(Literal::try_new(7, false).map(|l| l.value()), Some(-7));
    /// ```
    pub fn try_new(index: u32, positive: bool) -> Option<Self> {
        let magnitude = i32::try_from(index).ok()?;
        let value = if positive { magnitude } else { -magnitude };
        NonZeroI32::new(value).map(Self)
    }

    /// Creates a `Literal` from its signed integer representation, or `None`
    /// for `0`.
    pub fn from_value(value: i32) -> Option<Self> {
        if value == i32::MIN {
            return None;
        }
        NonZeroI32::new(value).map(Self)
    }

    /// Returns the signed integer representation of this literal.
    pub const fn value(self) -> i32 {
        self.0.get()
    }

    /// Returns the index of the variable of this literal.
    pub const fn index(self) -> u32 {
        self.0.get().unsigned_abs()
    }

    /// Returns `true` if this is a positive literal.
    pub const fn is_positive(self) -> bool {
        self.0.get() > 0
    }

    /// Returns the literal with the same index and the opposite phase.
    #[must_use]
    pub const fn negate(self) -> Self {
        // i32::MIN is never stored, so the negation is always representable
        match NonZeroI32::new(-self.0.get()) {
            Some(value) => Self(value),
            None => self,
        }
    }

    /// Returns `true` if both literals refer to the same index with a
    /// different phase.
    pub const fn is_complement_of(self, other: Self) -> bool {
        self.0.get() == -other.0.get()
    }

    /// Returns the positive literal of the same index.
    #[must_use]
    pub const fn positive(self) -> Self {
        if self.is_positive() {
            self
        } else {
            self.negate()
        }
    }

    /// Prints the literal with the name registered in `map`, e.g. `~a`.
    /// Unregistered indices are printed as `@<index>`.
    ///
    /// # Examples
    ///
    /// Basic usage:
    ///
    /// ```
    /// # use featlogic::formulas::{Literal, VariableMap};
    /// let mut map = VariableMap::new();
    /// let a = map.add_bool_variable("a").unwrap();
    ///
    /// assert_eq!(Literal::new(a, false).to_string(&map), "~a");
    /// assert_eq!(Literal::new(9, true).to_string(&map), "@9");
    /// ```
    pub fn to_string(self, map: &VariableMap) -> String {
        let name = map.variable_name(self.index()).map_or_else(|| format!("@{}", self.index()), str::to_owned);
        if self.is_positive() {
            name
        } else {
            format!("~{name}")
        }
    }
}

impl From<Literal> for i32 {
    fn from(literal: Literal) -> Self {
        literal.value()
    }
}

/// An opaque atom standing in for a sub-expression that could not be
/// interpreted.
///
/// Error literals are never expanded by any transformation. Like a literal
/// they carry a polarity, which negation flips.
#[derive(Hash, Eq, PartialEq, Clone, Debug, Ord, PartialOrd)]
pub struct ErrorLiteral {
    message: String,
    positive: bool,
}

impl ErrorLiteral {
    /// Creates a positive error literal with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), positive: true }
    }

    /// Returns the message describing the uninterpretable sub-expression.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `true` if this error literal is not negated.
    pub const fn is_positive(&self) -> bool {
        self.positive
    }

    /// Returns the same error literal with the opposite polarity.
    #[must_use]
    pub fn negate(&self) -> Self {
        Self { message: self.message.clone(), positive: !self.positive }
    }

    /// Returns `true` if both refer to the same message with a different
    /// polarity.
    pub fn is_complement_of(&self, other: &Self) -> bool {
        self.positive != other.positive && self.message == other.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_representation() {
        let lit = Literal::new(3, false);
        assert_eq!(lit.value(), -3);
        assert_eq!(lit.index(), 3);
        assert!(!lit.is_positive());
        assert_eq!(lit.positive(), Literal::new(3, true));
        assert_eq!(i32::from(lit.negate()), 3);
    }

    #[test]
    fn test_invalid_indices() {
        assert!(Literal::try_new(0, true).is_none());
        assert!(Literal::try_new(u32::MAX, true).is_none());
        assert!(Literal::try_new(i32::MAX as u32, false).is_some());
        assert!(Literal::from_value(0).is_none());
        assert!(Literal::from_value(i32::MIN).is_none());
    }

    #[test]
    fn test_complements() {
        let a = Literal::new(1, true);
        let b = Literal::new(2, false);
        assert!(a.is_complement_of(a.negate()));
        assert!(!a.is_complement_of(a));
        assert!(!a.is_complement_of(b));
        assert_eq!(b.negate().negate(), b);
    }

    #[test]
    fn test_error_literal() {
        let e = ErrorLiteral::new("a + ");
        assert!(e.is_positive());
        assert!(e.is_complement_of(&e.negate()));
        assert_eq!(e.negate().negate(), e);
        assert!(!e.is_complement_of(&ErrorLiteral::new("b").negate()));
        assert_eq!(e.message(), "a + ");
    }
}
