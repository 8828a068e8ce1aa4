//! Builders for expressions that are correct by construction.
//!
//! Unlike [`Expression::new`], these functions insert round brackets around children that would
//! otherwise not be allowed at their position, flatten nested sums and products, and turn sums
//! and products with fewer than two terms into their neutral element or their only term.
//!
//! They panic when handed a child whose *kind* cannot appear at its position, such as an
//! equation inside a sum. That is always a bug in the code building the expression.

use rug::Integer;
use super::{Comparator, Expression, Operator};

/// Wraps `child` in a round bracket if it is not allowed at position `n` of `operator` as is.
///
/// # Panics
///
/// Panics if the kind of the child is not allowed at that position.
pub fn adjust_child(operator: &Operator, n: usize, child: Expression) -> Expression {
    if !operator.nth_child_kind_allowed(n, child.operator().kind()) {
        panic!("`{}` cannot be child {} of `{}`", child, n, operator.name());
    }
    if operator.nth_child_allowed(n, child.operator()) || !child.decorators().is_empty() {
        child
    } else {
        child.bracketed()
    }
}

/// Creates a node from the given operator and children, bracketing children where needed.
///
/// # Panics
///
/// Panics if the number of children does not fit the operator, or if a child's kind is not
/// allowed at its position.
pub fn node(operator: Operator, children: Vec<Expression>) -> Expression {
    assert!(
        operator.arity().accepts(children.len()),
        "`{}` cannot have {} children",
        operator.name(),
        children.len(),
    );
    let children = children
        .into_iter()
        .enumerate()
        .map(|(n, child)| adjust_child(&operator, n, child))
        .collect();
    Expression::from_parts(operator, children, Vec::new())
}

/// A signed integer: negative values are the negation of their absolute value.
pub fn int(n: Integer) -> Expression {
    if n < 0 {
        neg_of(int(-n))
    } else {
        Expression::from_parts(Operator::Integer(n), Vec::new(), Vec::new())
    }
}

/// A signed integer from a primitive value.
pub fn xp(n: i64) -> Expression {
    int(Integer::from(n))
}

/// A variable.
///
/// # Panics
///
/// Panics if the name is not a single letter.
pub fn var(name: &str) -> Expression {
    match Expression::leaf(Operator::Variable(name.to_string())) {
        Ok(variable) => variable,
        Err(err) => panic!("{}", err),
    }
}

/// The [`Operator::Undefined`] value.
pub fn undefined() -> Expression {
    Expression::from_parts(Operator::Undefined, Vec::new(), Vec::new())
}

/// `(x)`
pub fn bracket(expr: Expression) -> Expression {
    expr.bracketed()
}

/// Flattens children with the given operator and no decorators into the list of children.
fn flatten(operator: &Operator, children: Vec<Expression>) -> Vec<Expression> {
    let mut flat = Vec::with_capacity(children.len());
    for child in children {
        if child.operator() == operator && child.decorators().is_empty() {
            flat.extend(child.children().iter().cloned());
        } else {
            flat.push(child);
        }
    }
    flat
}

/// The sum of the given terms. No terms is `0`, a single term is returned as is.
pub fn sum_of(terms: Vec<Expression>) -> Expression {
    let mut terms = flatten(&Operator::Sum, terms);
    match terms.len() {
        0 => xp(0),
        1 => terms.remove(0),
        _ => node(Operator::Sum, terms),
    }
}

/// The product of the given factors. No factors is `1`, a single factor is returned as is.
pub fn product_of(factors: Vec<Expression>) -> Expression {
    let mut factors = flatten(&Operator::Product, factors);
    match factors.len() {
        0 => xp(1),
        1 => factors.remove(0),
        _ => node(Operator::Product, factors),
    }
}

/// `-x`
pub fn neg_of(expr: Expression) -> Expression {
    node(Operator::Minus, vec![expr])
}

/// `+x`
pub fn plus_of(expr: Expression) -> Expression {
    node(Operator::Plus, vec![expr])
}

/// `+/-x`
pub fn plus_minus_of(expr: Expression) -> Expression {
    node(Operator::PlusMinus, vec![expr])
}

/// `:x`
pub fn divide_by(expr: Expression) -> Expression {
    node(Operator::DivideBy, vec![expr])
}

/// `[numerator / denominator]`
pub fn fraction_of(numerator: Expression, denominator: Expression) -> Expression {
    node(Operator::Fraction, vec![numerator, denominator])
}

/// `[base ^ exponent]`
pub fn power_of(base: Expression, exponent: Expression) -> Expression {
    node(Operator::Power, vec![base, exponent])
}

/// `sqrt[radicand]`
pub fn square_root_of(radicand: Expression) -> Expression {
    node(Operator::SquareRoot, vec![radicand])
}

/// `root[radicand, order]`
pub fn root_of(radicand: Expression, order: Expression) -> Expression {
    node(Operator::Root, vec![radicand, order])
}

/// `lhs = rhs`
pub fn equation_of(lhs: Expression, rhs: Expression) -> Expression {
    node(Operator::Equation, vec![lhs, rhs])
}

/// `lhs < rhs`, `lhs >= rhs`, ...
pub fn inequality_of(lhs: Expression, comparator: Comparator, rhs: Expression) -> Expression {
    node(Operator::Inequality(comparator), vec![lhs, rhs])
}

/// `{a, b, ...}`
pub fn set_of(elements: Vec<Expression>) -> Expression {
    node(Operator::FiniteSet, elements)
}

/// `(a, b, ...)`
pub fn tuple_of(elements: Vec<Expression>) -> Expression {
    node(Operator::Tuple, elements)
}

/// `/infinity/`
pub fn infinity() -> Expression {
    Expression::from_parts(Operator::Infinity, Vec::new(), Vec::new())
}

/// `/reals/`
pub fn reals() -> Expression {
    Expression::from_parts(Operator::Reals, Vec::new(), Vec::new())
}

/// The interval from `left` to `right`, such as `[1, /infinity/)`.
pub fn interval_of(left: Expression, left_closed: bool, right: Expression, right_closed: bool) -> Expression {
    node(Operator::Interval { left_closed, right_closed }, vec![left, right])
}

/// `A \ B`
pub fn set_difference_of(left: Expression, right: Expression) -> Expression {
    node(Operator::SetDifference, vec![left, right])
}

/// `SetSolution[x, ... : set]`
pub fn set_solution_of(variables: Vec<Expression>, set: Expression) -> Expression {
    node(Operator::SetSolution, vec![node(Operator::VariableList, variables), set])
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn sums_flatten_and_downgrade() {
        let inner = sum_of(vec![xp(1), xp(2)]);
        assert_eq!(sum_of(vec![inner.clone(), xp(3)]).to_string(), "1 + 2 + 3");
        assert_eq!(sum_of(vec![inner.bracketed(), xp(3)]).to_string(), "(1 + 2) + 3");
        assert_eq!(sum_of(Vec::new()), xp(0));
        assert_eq!(sum_of(vec![var("x")]), var("x"));
        assert_eq!(product_of(Vec::new()), xp(1));
    }

    #[test]
    fn brackets_are_inserted() {
        let expr = neg_of(sum_of(vec![var("x"), xp(1)]));
        assert_eq!(expr.to_string(), "-(x + 1)");

        let expr = power_of(neg_of(xp(2)), xp(3));
        assert_eq!(expr.to_string(), "[(-2) ^ 3]");

        let expr = product_of(vec![xp(3), neg_of(var("x"))]);
        assert_eq!(expr.to_string(), "3 (-x)");
    }

    #[test]
    fn negative_integers() {
        assert_eq!(xp(-5).to_string(), "-5");
        assert_eq!(xp(-5).operator(), &Operator::Minus);
    }

    #[test]
    #[should_panic(expected = "cannot be child 0 of `Sum`")]
    fn wrong_kind_panics() {
        sum_of(vec![equation_of(var("x"), xp(1)), xp(1)]);
    }
}
