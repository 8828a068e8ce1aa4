//! Immutable expression trees.
//!
//! An [`Expression`] is a node with an [`Operator`], an ordered list of children and a list of
//! [`Decorator`]s. Nodes are reference counted, so cloning an expression is cheap and rewriting a
//! tree shares every untouched subtree with the original.
//!
//! # Equality and equivalence
//!
//! The [`PartialEq`] implementation compares decorators too, so `(x)` and `x` are not equal.
//! [`Expression::equiv`] ignores decorators at every level and is the relation used by pattern
//! matching.

pub mod build;
mod convert;
mod iter;
pub mod number;
pub mod operator;
mod render;

use crate::error::{Error, InvalidArity, InvalidChild, InvalidLiteral};
pub use iter::ExprIter;
pub use number::{Decimal, RecurringDecimal};
pub use operator::{Arity, Comparator, Operator, OperatorKind};
pub use render::product_sign_required;
use rug::{Integer, Rational};
use std::{collections::BTreeSet, fmt, sync::Arc};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Presentational wrapping of an expression that carries no mathematical meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Decorator {
    /// `(x)`
    RoundBracket,

    /// `[.x.]`
    SquareBracket,

    /// `{.x.}`
    CurlyBracket,

    /// `<.x.>`, an invisible grouping of part of a sum or product.
    PartialBracket,
}

impl Decorator {
    /// Returns true if the decorator is a visible bracket.
    pub fn is_bracket(self) -> bool {
        self != Decorator::PartialBracket
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
struct Node {
    operator: Operator,
    children: Vec<Expression>,

    /// Innermost first.
    decorators: Vec<Decorator>,
}

/// An immutable expression tree.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct Expression(Arc<Node>);

impl Expression {
    /// Creates a new expression, checking that the children are allowed by the operator.
    ///
    /// A child with a decorator is allowed wherever its kind is, since the bracket removes any
    /// ambiguity.
    pub fn new(operator: Operator, children: Vec<Expression>) -> Result<Self, Error> {
        check_literal(&operator)?;

        let arity = operator.arity();
        if !arity.accepts(children.len()) {
            return Err(Error::unspanned(InvalidArity {
                operator: operator.name(),
                expected: arity.to_string(),
                found: children.len(),
            }));
        }

        for (position, child) in children.iter().enumerate() {
            let kind_allowed = operator.nth_child_kind_allowed(position, child.operator().kind());
            let allowed = operator.nth_child_allowed(position, child.operator())
                || (kind_allowed && !child.decorators().is_empty());
            if !allowed {
                return Err(Error::unspanned(InvalidChild {
                    operator: operator.name(),
                    position,
                    child: child.operator().name(),
                    bracket_helps: kind_allowed,
                }));
            }
        }

        Ok(Self::from_parts(operator, children, Vec::new()))
    }

    /// Creates a node without checking it. Callers must uphold the legality rules of
    /// [`Expression::new`].
    pub(crate) fn from_parts(
        operator: Operator,
        children: Vec<Expression>,
        decorators: Vec<Decorator>,
    ) -> Self {
        Self(Arc::new(Node { operator, children, decorators }))
    }

    /// Creates a leaf expression. Returns an error if the operator has children or is an
    /// invalid literal.
    pub fn leaf(operator: Operator) -> Result<Self, Error> {
        Self::new(operator, Vec::new())
    }

    /// The operator of the root node.
    pub fn operator(&self) -> &Operator {
        &self.0.operator
    }

    /// The children of the root node, in order.
    pub fn children(&self) -> &[Expression] {
        &self.0.children
    }

    /// The `n`th child of the root node.
    pub fn nth_child(&self, n: usize) -> Option<&Expression> {
        self.0.children.get(n)
    }

    /// The first child of the root node.
    pub fn first_child(&self) -> Option<&Expression> {
        self.nth_child(0)
    }

    /// The second child of the root node.
    pub fn second_child(&self) -> Option<&Expression> {
        self.nth_child(1)
    }

    /// The number of children of the root node.
    pub fn child_count(&self) -> usize {
        self.0.children.len()
    }

    /// The decorators of the root node, innermost first.
    pub fn decorators(&self) -> &[Decorator] {
        &self.0.decorators
    }

    /// Returns true if the root node is wrapped in a visible bracket.
    pub fn has_bracket(&self) -> bool {
        self.0.decorators.iter().any(|d| d.is_bracket())
    }

    /// Returns true if the root node is a partial sum or product, such as the `<.2 3.>` in
    /// `4 <.2 3.>`.
    pub fn is_partial(&self) -> bool {
        self.0.decorators.last() == Some(&Decorator::PartialBracket)
    }

    /// Returns a copy of this expression wrapped in the given decorator.
    pub fn decorate(&self, decorator: Decorator) -> Self {
        let mut decorators = self.0.decorators.clone();
        decorators.push(decorator);
        Self::from_parts(self.0.operator.clone(), self.0.children.clone(), decorators)
    }

    /// Returns a copy of this expression wrapped in a round bracket.
    pub fn bracketed(&self) -> Self {
        self.decorate(Decorator::RoundBracket)
    }

    /// Returns this expression with its decorators at the root removed.
    pub fn without_decorators(&self) -> Self {
        if self.0.decorators.is_empty() {
            return self.clone();
        }
        Self::from_parts(self.0.operator.clone(), self.0.children.clone(), Vec::new())
    }

    /// Returns this expression with its outermost decorator removed.
    pub fn without_outer_decorator(&self) -> Self {
        let mut decorators = self.0.decorators.clone();
        decorators.pop();
        Self::from_parts(self.0.operator.clone(), self.0.children.clone(), decorators)
    }

    /// Returns true if both expressions have the same structure, ignoring decorators.
    pub fn equiv(&self, other: &Expression) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.operator == other.0.operator
                && self.0.children.len() == other.0.children.len()
                && self
                    .0
                    .children
                    .iter()
                    .zip(other.0.children.iter())
                    .all(|(a, b)| a.equiv(b)))
    }

    /// Returns an iterator that traverses the tree in left-to-right post-order.
    pub fn post_order_iter(&self) -> ExprIter<'_> {
        ExprIter::new(self)
    }

    /// Returns the set of variable names in the expression.
    pub fn variables(&self) -> BTreeSet<&str> {
        self.post_order_iter()
            .filter_map(|expr| match expr.operator() {
                Operator::Variable(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Returns true if the expression contains no variables.
    pub fn is_constant(&self) -> bool {
        self.post_order_iter()
            .all(|expr| !matches!(expr.operator(), Operator::Variable(_)))
    }

    /// Returns true if the expression is [`Operator::Undefined`].
    pub fn is_undefined(&self) -> bool {
        *self.operator() == Operator::Undefined
    }

    /// Returns the value of an integer, or of the negation of an integer.
    pub fn integer_value(&self) -> Option<Integer> {
        match self.operator() {
            Operator::Integer(n) => Some(n.clone()),
            Operator::Minus => match self.first_child()?.operator() {
                Operator::Integer(n) => Some(Integer::from(-n)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Returns the exact value of a numeral, a signed numeral, or a fraction of those.
    pub fn rational_value(&self) -> Option<Rational> {
        match self.operator() {
            Operator::Integer(n) => Some(Rational::from(n)),
            Operator::Decimal(d) => Some(d.to_rational()),
            Operator::RecurringDecimal(d) => Some(d.to_rational()),
            Operator::Minus => Some(-self.first_child()?.rational_value()?),
            Operator::Plus => self.first_child()?.rational_value(),
            Operator::Fraction => {
                let denominator = self.second_child()?.rational_value()?;
                if denominator == 0 {
                    return None;
                }
                Some(self.first_child()?.rational_value()? / denominator)
            },
            _ => None,
        }
    }

    /// Returns a copy of this expression with the `n`th child replaced. The new child is wrapped
    /// in a round bracket if it would otherwise not be allowed at that position.
    ///
    /// # Panics
    ///
    /// Panics if `n` is out of range, or if the new child's kind is not allowed at that
    /// position.
    pub fn replace_nth_child(&self, n: usize, child: Expression) -> Self {
        assert!(n < self.child_count(), "child {} of `{}` does not exist", n, self);
        let mut children = self.0.children.clone();
        children[n] = build::adjust_child(self.operator(), n, child);
        Self::from_parts(self.0.operator.clone(), children, self.0.decorators.clone())
    }

    /// Returns the descendant at the given child indices, relative to this expression.
    pub fn descendant(&self, indices: &[usize]) -> Option<&Expression> {
        indices
            .iter()
            .try_fold(self, |expr, &index| expr.nth_child(index))
    }

    /// Returns a copy of this expression with the descendant at the given child indices
    /// replaced, or [`None`] if there is no such descendant.
    pub fn replace_descendant(&self, indices: &[usize], new: Expression) -> Option<Self> {
        match indices.split_first() {
            None => Some(new),
            Some((&first, rest)) => {
                let replaced = self.nth_child(first)?.replace_descendant(rest, new)?;
                Some(self.replace_nth_child(first, replaced))
            },
        }
    }
}

/// Rejects literals that cannot be written in solver text.
fn check_literal(operator: &Operator) -> Result<(), Error> {
    let reason = match operator {
        Operator::Integer(n) if *n < 0 => "integer literals are non-negative; use `Minus` instead",
        Operator::Variable(name) if name.chars().count() != 1 || !name.chars().all(char::is_alphabetic) => {
            "variables are single letters"
        },
        _ => return Ok(()),
    };
    Err(Error::unspanned(InvalidLiteral {
        literal: operator.to_string(),
        reason,
    }))
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expression({})", self)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use super::build::*;

    #[test]
    fn invalid_arity() {
        let err = Expression::new(Operator::Sum, vec![xp(1)]).unwrap_err();
        assert_eq!(err.to_string(), "`Sum` expects between 2 and 1000 children, but 1 were given");
    }

    #[test]
    fn invalid_child_precedence() {
        let sum = sum_of(vec![xp(1), xp(2)]);
        let err = Expression::new(Operator::Power, vec![sum.clone(), xp(2)]).unwrap_err();
        assert_eq!(err.to_string(), "`Sum` is not allowed as child 0 of `Power` (wrap it in a bracket)");

        let power = Expression::new(Operator::Power, vec![sum.bracketed(), xp(2)]).unwrap();
        assert_eq!(power.to_string(), "[(1 + 2) ^ 2]");
    }

    #[test]
    fn invalid_child_kind() {
        let equation = equation_of(var("x"), xp(1));
        let err = Expression::new(Operator::Sum, vec![equation.bracketed(), xp(1)]).unwrap_err();
        assert!(err.to_string().contains("cannot appear here"));
    }

    #[test]
    fn negative_literal() {
        assert!(Expression::leaf(Operator::Integer(Integer::from(-1))).is_err());
        assert!(Expression::leaf(Operator::Variable("xy".to_string())).is_err());
    }

    #[test]
    fn equivalence_ignores_decorators() {
        let a = sum_of(vec![var("x"), xp(1)]);
        let b = sum_of(vec![var("x"), xp(1).bracketed()]);
        assert_ne!(a, b);
        assert!(a.equiv(&b));
        assert!(!a.equiv(&sum_of(vec![xp(1), var("x")])));
    }

    #[test]
    fn replacing_brackets_when_needed() {
        let product = product_of(vec![xp(2), var("x")]);
        let replaced = product.replace_nth_child(1, sum_of(vec![var("x"), xp(1)]));
        assert_eq!(replaced.to_string(), "2 (x + 1)");
        assert!(replaced.nth_child(1).unwrap().has_bracket());
    }

    #[test]
    fn replacing_descendants() {
        let expr = sum_of(vec![xp(1), product_of(vec![xp(2), var("x")])]);
        let replaced = expr.replace_descendant(&[1, 1], var("y")).unwrap();
        assert_eq!(replaced.to_string(), "1 + 2 y");
        assert_eq!(expr.replace_descendant(&[3], var("y")), None);
        // unchanged subtrees are shared
        assert!(Arc::ptr_eq(&expr.children()[0].0, &replaced.children()[0].0));
    }

    #[test]
    fn values() {
        assert_eq!(xp(-3).integer_value(), Some(Integer::from(-3)));
        assert_eq!(
            fraction_of(xp(-1), xp(4)).rational_value(),
            Some(Rational::from((-1, 4))),
        );
        assert_eq!(fraction_of(xp(1), xp(0)).rational_value(), None);
        assert!(sum_of(vec![xp(1), xp(2)]).is_constant());
        assert!(!sum_of(vec![xp(1), var("y")]).is_constant());
    }
}
