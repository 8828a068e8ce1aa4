//! Expressions that carry the path mappings describing where their parts came from.
//!
//! The builders in this module mirror those in [`expr::build`](crate::expr::build), but take
//! [`MappedExpression`]s and keep the mappings of every child, re-rooted at the child's new
//! place. Flattening a sum into a sum moves the mappings of its terms along with them.

use crate::{
    expr::{build, Comparator, Expression, Operator},
    mapping::{PathMapping, PathMappingType},
    path::Path,
};
use std::iter;

#[cfg(feature = "serde")]
use serde::Serialize;

/// An expression together with path mappings whose `to` paths are relative to it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MappedExpression {
    pub expr: Expression,
    pub mappings: Vec<PathMapping>,
}

impl MappedExpression {
    /// Creates a mapped expression.
    pub fn new(expr: Expression, mappings: Vec<PathMapping>) -> Self {
        Self { expr, mappings }
    }

    /// A child kept by a rewrite, mapped from its old place.
    pub(crate) fn shifted(expr: Expression, from: Path) -> Self {
        Self::new(expr, vec![PathMapping::new(vec![from], PathMappingType::Shift, vec![Path::root()])])
    }

    /// Drops shift mappings whose source and target are the same place.
    pub(crate) fn without_identity_shifts(mut self) -> Self {
        self.mappings.retain(|mapping| {
            mapping.kind != PathMappingType::Shift || mapping.from_paths != mapping.to_paths
        });
        self
    }

    /// Wraps the expression in a round bracket.
    pub fn bracketed(self) -> Self {
        Self::new(self.expr.bracketed(), self.mappings)
    }
}

impl From<Expression> for MappedExpression {
    fn from(expr: Expression) -> Self {
        Self::new(expr, Vec::new())
    }
}

/// Moves a mapping of a child at `offset` whose children were spliced into the parent. A
/// mapping to the child itself becomes a mapping to each of the spliced children.
fn spread(mapping: PathMapping, offset: usize, width: usize) -> PathMapping {
    let to_paths = mapping
        .to_paths
        .iter()
        .flat_map(|path| match path.indices().split_first() {
            None => (offset..offset + width).map(|i| Path::root().child(i)).collect(),
            Some((first, rest)) => {
                let indices = iter::once(offset + first).chain(rest.iter().copied()).collect();
                let moved = Path::from_indices(indices);
                vec![match path.marker() {
                    Some(marker) => moved.with_marker(marker),
                    None => moved,
                }]
            },
        })
        .collect();
    PathMapping::new(mapping.from_paths, mapping.kind, to_paths)
}

/// Puts the children under one node after splicing in undecorated children with the same
/// operator, if `flatten` is set.
fn assemble(operator: Operator, children: Vec<MappedExpression>, flatten: bool) -> (Vec<Expression>, Vec<PathMapping>) {
    let mut exprs = Vec::with_capacity(children.len());
    let mut mappings = Vec::new();
    for child in children {
        let offset = exprs.len();
        if flatten && *child.expr.operator() == operator && child.expr.decorators().is_empty() {
            let width = child.expr.child_count();
            exprs.extend(child.expr.children().iter().cloned());
            mappings.extend(child.mappings.into_iter().map(|mapping| spread(mapping, offset, width)));
        } else {
            let prefix = Path::root().child(offset);
            exprs.push(child.expr);
            mappings.extend(
                child
                    .mappings
                    .into_iter()
                    .map(|mapping| mapping.relativize(&Path::root(), &prefix)),
            );
        }
    }
    (exprs, mappings)
}

/// A node with the given operator and children, bracketing children where needed.
///
/// # Panics
///
/// Panics under the same conditions as [`build::node`].
pub fn node(operator: Operator, children: Vec<MappedExpression>) -> MappedExpression {
    let (exprs, mappings) = assemble(operator.clone(), children, false);
    MappedExpression::new(build::node(operator, exprs), mappings)
}

fn variadic(operator: Operator, neutral: i64, children: Vec<MappedExpression>) -> MappedExpression {
    let (mut exprs, mappings) = assemble(operator.clone(), children, true);
    match exprs.len() {
        0 => MappedExpression::from(build::xp(neutral)),
        1 => {
            let only = Path::root().child(0);
            let mappings = mappings
                .into_iter()
                .map(|mapping| mapping.localize(&Path::root(), &only))
                .collect();
            MappedExpression::new(exprs.remove(0), mappings)
        },
        _ => MappedExpression::new(build::node(operator, exprs), mappings),
    }
}

/// The sum of the given terms, flattening nested sums.
pub fn sum_of(terms: Vec<MappedExpression>) -> MappedExpression {
    variadic(Operator::Sum, 0, terms)
}

/// The product of the given factors, flattening nested products.
pub fn product_of(factors: Vec<MappedExpression>) -> MappedExpression {
    variadic(Operator::Product, 1, factors)
}

/// `-x`
pub fn neg_of(expr: MappedExpression) -> MappedExpression {
    node(Operator::Minus, vec![expr])
}

/// `+x`
pub fn plus_of(expr: MappedExpression) -> MappedExpression {
    node(Operator::Plus, vec![expr])
}

/// `+/-x`
pub fn plus_minus_of(expr: MappedExpression) -> MappedExpression {
    node(Operator::PlusMinus, vec![expr])
}

/// `: x`
pub fn divide_by(expr: MappedExpression) -> MappedExpression {
    node(Operator::DivideBy, vec![expr])
}

/// `[a / b]`
pub fn fraction_of(numerator: MappedExpression, denominator: MappedExpression) -> MappedExpression {
    node(Operator::Fraction, vec![numerator, denominator])
}

/// `[b ^ e]`
pub fn power_of(base: MappedExpression, exponent: MappedExpression) -> MappedExpression {
    node(Operator::Power, vec![base, exponent])
}

/// `sqrt[x]`
pub fn square_root_of(radicand: MappedExpression) -> MappedExpression {
    node(Operator::SquareRoot, vec![radicand])
}

/// `root[x, n]`
pub fn root_of(radicand: MappedExpression, order: MappedExpression) -> MappedExpression {
    node(Operator::Root, vec![radicand, order])
}

/// `a = b`
pub fn equation_of(lhs: MappedExpression, rhs: MappedExpression) -> MappedExpression {
    node(Operator::Equation, vec![lhs, rhs])
}

/// `a < b` and friends.
pub fn inequality_of(lhs: MappedExpression, comparator: Comparator, rhs: MappedExpression) -> MappedExpression {
    node(Operator::Inequality(comparator), vec![lhs, rhs])
}

/// `{a, b, c}`
pub fn set_of(elements: Vec<MappedExpression>) -> MappedExpression {
    node(Operator::FiniteSet, elements)
}

/// An interval between two bounds, either of which may be closed.
pub fn interval_of(
    left: MappedExpression,
    left_closed: bool,
    right: MappedExpression,
    right_closed: bool,
) -> MappedExpression {
    node(Operator::Interval { left_closed, right_closed }, vec![left, right])
}

/// `A \ B`
pub fn set_difference_of(left: MappedExpression, right: MappedExpression) -> MappedExpression {
    node(Operator::SetDifference, vec![left, right])
}

/// `SetSolution[x, y : S]`
pub fn set_solution_of(variables: Vec<MappedExpression>, set: MappedExpression) -> MappedExpression {
    node(Operator::SetSolution, vec![node(Operator::VariableList, variables), set])
}

#[cfg(test)]
mod tests {
    use crate::expr::build::{var, xp};
    use pretty_assertions::assert_eq;
    use super::*;

    fn path(s: &str) -> Path {
        s.parse().unwrap()
    }

    fn moved(expr: Expression, from: &str) -> MappedExpression {
        MappedExpression::new(expr, vec![PathMapping::new(vec![path(from)], PathMappingType::Move, vec![Path::root()])])
    }

    #[test]
    fn children_are_rerooted() {
        let fraction = fraction_of(moved(var("x"), "./1"), moved(xp(2), "./0"));
        assert_eq!(fraction.expr.to_string(), "[x / 2]");
        assert_eq!(fraction.mappings, vec![
            PathMapping::new(vec![path("./1")], PathMappingType::Move, vec![path("./0")]),
            PathMapping::new(vec![path("./0")], PathMappingType::Move, vec![path("./1")]),
        ]);
    }

    #[test]
    fn flattening_spreads_mappings() {
        let inner = MappedExpression::new(
            build::sum_of(vec![var("a"), var("b")]),
            vec![PathMapping::new(vec![path("./3")], PathMappingType::Combine, vec![Path::root()])],
        );
        let sum = sum_of(vec![moved(var("x"), "./0"), inner]);
        assert_eq!(sum.expr.to_string(), "x + a + b");
        assert_eq!(sum.mappings[1], PathMapping::new(
            vec![path("./3")],
            PathMappingType::Combine,
            vec![path("./1"), path("./2")],
        ));
    }

    #[test]
    fn single_term_keeps_its_mappings() {
        let term = moved(var("x"), "./2");
        assert_eq!(sum_of(vec![term.clone()]), term);
        assert_eq!(product_of(vec![]).expr, xp(1));
    }

    #[test]
    fn solution_mappings_point_into_the_set() {
        let interval = interval_of(MappedExpression::from(build::infinity()), false, moved(xp(3), "./1"), true);
        let solution = set_solution_of(vec![moved(var("x"), "./0")], interval);
        assert_eq!(solution.expr.to_string(), "SetSolution[x : (/infinity/, 3]]");
        assert_eq!(solution.mappings, vec![
            PathMapping::new(vec![path("./0")], PathMappingType::Move, vec![path("./0/0")]),
            PathMapping::new(vec![path("./1")], PathMappingType::Move, vec![path("./1/1")]),
        ]);
    }

    #[test]
    fn brackets_do_not_change_paths() {
        let sum = moved(build::sum_of(vec![var("a"), var("b")]), "./1");
        let product = product_of(vec![MappedExpression::from(xp(2)), sum]);
        assert_eq!(product.expr.to_string(), "2 (a + b)");
        assert_eq!(product.mappings[0].to_paths, vec![path("./1")]);
    }
}
