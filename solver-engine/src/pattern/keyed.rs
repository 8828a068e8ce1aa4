//! Patterns that match one of several shapes and bind them under a single key.

use rug::Integer;
use super::{
    divide_by_of,
    fraction_of,
    keyed,
    neg_of,
    one_of,
    root_of,
    square_root_of,
    unsigned_integer,
    unsigned_number,
    Match,
    Pattern,
};

macro_rules! keyed_pattern {
    ($name:ident) => {
        impl $name {
            /// The underlying pattern.
            pub fn pattern(&self) -> Pattern {
                self.pattern.clone()
            }
        }

        impl AsRef<Pattern> for $name {
            fn as_ref(&self) -> &Pattern {
                &self.pattern
            }
        }

        impl From<&$name> for Pattern {
            fn from(keyed: &$name) -> Self {
                keyed.pattern()
            }
        }

        impl From<$name> for Pattern {
            fn from(keyed: $name) -> Self {
                keyed.pattern
            }
        }
    };
}

/// Matches `x` or `-x`.
#[derive(Debug, Clone)]
pub struct OptionalNeg {
    pattern: Pattern,
    neg: Pattern,

    /// The pattern for `x` itself.
    pub unsigned: Pattern,
}

keyed_pattern!(OptionalNeg);

impl OptionalNeg {
    /// Returns true if the negated form matched.
    pub fn is_neg(&self, m: &Match) -> bool {
        m.is_bound(&self.neg)
    }
}

/// Matches `x` or `-x`, preferring `-x`.
pub fn optional_neg_of(unsigned: impl Into<Pattern>) -> OptionalNeg {
    let unsigned = unsigned.into();
    let neg = neg_of(&unsigned);
    OptionalNeg {
        pattern: keyed(one_of(vec![neg.clone(), unsigned.clone()])),
        neg,
        unsigned,
    }
}

/// Matches an integer or the negation of an integer.
pub fn signed_integer() -> OptionalNeg {
    optional_neg_of(unsigned_integer())
}

/// Matches an integer or decimal, or the negation of one.
pub fn signed_number() -> OptionalNeg {
    optional_neg_of(unsigned_number())
}

/// Matches `x` or `: x`.
#[derive(Debug, Clone)]
pub struct OptionalDivideBy {
    pattern: Pattern,
    divided: Pattern,

    /// The pattern for `x` itself.
    pub inner: Pattern,
}

keyed_pattern!(OptionalDivideBy);

impl OptionalDivideBy {
    /// Returns true if the `: x` form matched.
    pub fn is_divide_by(&self, m: &Match) -> bool {
        m.is_bound(&self.divided)
    }
}

/// Matches `x` or `: x`, preferring `: x`.
pub fn optional_divide_by(inner: impl Into<Pattern>) -> OptionalDivideBy {
    let inner = inner.into();
    let divided = divide_by_of(&inner);
    OptionalDivideBy {
        pattern: keyed(one_of(vec![divided.clone(), inner.clone()])),
        divided,
        inner,
    }
}

/// Matches a fraction of two integers.
#[derive(Debug, Clone)]
pub struct IntegerFraction {
    pattern: Pattern,
    pub numerator: Pattern,
    pub denominator: Pattern,
}

keyed_pattern!(IntegerFraction);

impl IntegerFraction {
    /// The numerator and denominator of the matched fraction.
    pub fn values(&self, m: &Match) -> Option<(Integer, Integer)> {
        Some((m.integer_value(&self.numerator)?, m.integer_value(&self.denominator)?))
    }
}

/// Matches `[a / b]` where `a` and `b` are integer literals.
pub fn integer_fraction() -> IntegerFraction {
    let numerator = unsigned_integer();
    let denominator = unsigned_integer();
    IntegerFraction {
        pattern: keyed(fraction_of(&numerator, &denominator)),
        numerator,
        denominator,
    }
}

/// Matches a root with an integer order, including square roots.
#[derive(Debug, Clone)]
pub struct IntegerOrderRoot {
    pattern: Pattern,
    pub radicand: Pattern,
    pub order: Pattern,
}

keyed_pattern!(IntegerOrderRoot);

impl IntegerOrderRoot {
    /// The order of the matched root: 2 for square roots.
    pub fn order(&self, m: &Match) -> Integer {
        m.integer_value(&self.order).unwrap_or_else(|| Integer::from(2))
    }
}

/// Matches `root[x, n]` where `n` is an integer literal, or `sqrt[x]`.
pub fn integer_order_root_of(radicand: impl Into<Pattern>) -> IntegerOrderRoot {
    let radicand = radicand.into();
    let order = unsigned_integer();
    IntegerOrderRoot {
        pattern: keyed(one_of(vec![root_of(&radicand, &order), square_root_of(&radicand)])),
        radicand,
        order,
    }
}
