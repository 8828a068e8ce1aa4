//! The abstract syntax tree produced by the parser.

use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A comparison sign between the two sides of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Relation {
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

/// A sign written in front of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Sign {
    /// `-x`
    Minus,

    /// `+x`, only as the first term of a sum or on its own.
    Plus,

    /// `+/-x`
    PlusMinus,
}

/// The kind of explicit bracket written around an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Bracket {
    /// `(x)`
    Round,

    /// `[.x.]`
    Square,

    /// `{.x.}`
    Curly,

    /// `<.x.>`, an invisible grouping.
    Partial,
}

/// The different kinds of expressions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExprKind {
    /// An unsigned integer, as written.
    Integer(String),

    /// An unsigned terminating decimal, as written.
    Decimal(String),

    /// A recurring decimal such as `0.1[6]`.
    RecurringDecimal {
        integer: String,
        decimals: String,
        repeating: String,
    },

    /// A single-letter variable.
    Variable(String),

    /// `/undefined/`
    Undefined,

    /// `/infinity/`
    Infinity,

    /// `/reals/`, the set of all real numbers.
    Reals,

    /// A signed term.
    Signed(Sign, Box<Expr>),

    /// `:x`, a division term inside a product.
    DivideBy(Box<Expr>),

    /// Terms of a sum; subtractions are [`ExprKind::Signed`] terms.
    Sum(Vec<Expr>),

    /// Factors of an explicit or implicit product.
    Product(Vec<Expr>),

    /// `[a / b]`
    Fraction(Box<Expr>, Box<Expr>),

    /// `[a ^ b]`
    Power(Box<Expr>, Box<Expr>),

    /// `sqrt[x]`
    SquareRoot(Box<Expr>),

    /// `root[x, n]`
    Root(Box<Expr>, Box<Expr>),

    /// An expression wrapped in a bracket.
    Bracketed(Bracket, Box<Expr>),

    /// `a = b`, `a < b`, ...
    Statement(Relation, Box<Expr>, Box<Expr>),

    /// `{a, b}`
    Set(Vec<Expr>),

    /// `(a, b)`
    Tuple(Vec<Expr>),

    /// `SetSolution[x, y : {..}]`
    SetSolution(Vec<Expr>, Box<Expr>),
}

/// An expression along with the region of source code it was parsed from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Expr {
    /// The kind of expression.
    pub kind: ExprKind,

    /// The region of the source code that this expression was parsed from.
    pub span: Range<usize>,
}

impl Expr {
    /// Creates a new expression.
    pub fn new(kind: ExprKind, span: Range<usize>) -> Self {
        Self { kind, span }
    }

    /// Returns the direct sub-expressions of this expression, in order.
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::Integer(_)
            | ExprKind::Decimal(_)
            | ExprKind::RecurringDecimal { .. }
            | ExprKind::Variable(_)
            | ExprKind::Undefined
            | ExprKind::Infinity
            | ExprKind::Reals => Vec::new(),
            ExprKind::Signed(_, inner)
            | ExprKind::DivideBy(inner)
            | ExprKind::SquareRoot(inner)
            | ExprKind::Bracketed(_, inner) => vec![inner],
            ExprKind::Fraction(a, b)
            | ExprKind::Power(a, b)
            | ExprKind::Root(a, b)
            | ExprKind::Statement(_, a, b) => vec![a, b],
            ExprKind::Sum(items)
            | ExprKind::Product(items)
            | ExprKind::Set(items)
            | ExprKind::Tuple(items) => items.iter().collect(),
            ExprKind::SetSolution(variables, set) => {
                variables.iter().chain(std::iter::once(&**set)).collect()
            },
        }
    }
}
