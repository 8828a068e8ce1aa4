//! Declarative structural patterns over expressions.
//!
//! A [`Pattern`] describes a family of expressions. Matching a pattern against a
//! [`Subexpression`] lazily produces every [`Match`] of the pattern, where a match binds each
//! sub-pattern to the subexpression it matched.
//!
//! Patterns have identity: every constructor call creates a new pattern, and using the *same*
//! pattern twice in a larger pattern requires both occurrences to match equivalent expressions.
//! For example, `sum_of([x.clone(), x])` matches `a + a` but not `a + b`.
//!
//! ```
//! use solver_engine::{context::Context, path::Subexpression, pattern::*};
//!
//! let x = any();
//! let twice = sum_of(vec![x.clone(), x]);
//!
//! let ctx = Context::default();
//! let matches = |src: &str| twice.matches(&ctx, &Subexpression::root(src.parse().unwrap()));
//! assert!(matches("[1 / 2] + [1 / 2]"));
//! assert!(!matches("[1 / 2] + [1 / 3]"));
//! ```

mod keyed;
mod matching;
mod nary;

use crate::{
    context::Context,
    expr::{Comparator, Expression, Operator},
    path::Subexpression,
};
use rug::Integer;
use std::{
    fmt,
    sync::{atomic::{AtomicU64, Ordering}, Arc},
};

pub use keyed::*;
pub use matching::Match;
pub use nary::{NaryPattern, NarySpec};
use nary::NaryMatches;

/// A lazily produced stream of matches.
pub type Matches<'a> = Box<dyn Iterator<Item = Match> + 'a>;

/// A predicate over a matched expression.
pub type ExprPredicate = Arc<dyn Fn(&Expression) -> bool + Send + Sync>;

/// A predicate over the bindings made so far.
pub type MatchPredicate = Arc<dyn Fn(&Context, &Match) -> bool + Send + Sync>;

/// The identity of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternId(pub(crate) u64);

impl PatternId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// The kinds of pattern.
pub enum PatternKind {
    /// Matches any expression.
    Any,

    /// Matches expressions equivalent to the given one.
    Fixed(Expression),

    /// Matches integer literals.
    UnsignedInteger,

    /// Matches integer and decimal literals.
    UnsignedNumber,

    /// Matches recurring decimal literals.
    RecurringDecimal,

    /// Matches any variable.
    Variable,

    /// Matches the variable being solved for.
    SolutionVariable,

    /// Matches expressions with the given operator whose children match the operands in order.
    Operator {
        operator: Operator,
        operands: Vec<Pattern>,
    },

    /// Matches an expression whose outermost decorator is a bracket, and whose content matches
    /// the inner pattern.
    Bracket(Pattern),

    /// Matches some of the terms of a sum, or factors of a product.
    Nary(Arc<NarySpec>),

    /// Matches if any of the options match, trying them in order.
    OneOf(Vec<Pattern>),

    /// Matches if the inner pattern matches and the predicate holds for the expression.
    Condition {
        inner: Pattern,
        predicate: ExprPredicate,
    },

    /// Matches if the inner pattern matches and the predicate holds for the resulting match.
    MatchCondition {
        inner: Pattern,
        predicate: MatchPredicate,
    },

    /// Matches exactly like the key, and shares its bindings.
    Keyed(Pattern),

    /// Matches the inner pattern anywhere inside the expression, in prefix order.
    Find(Pattern),
}

impl fmt::Debug for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "Any"),
            Self::Fixed(expr) => write!(f, "Fixed({})", expr),
            Self::UnsignedInteger => write!(f, "UnsignedInteger"),
            Self::UnsignedNumber => write!(f, "UnsignedNumber"),
            Self::RecurringDecimal => write!(f, "RecurringDecimal"),
            Self::Variable => write!(f, "Variable"),
            Self::SolutionVariable => write!(f, "SolutionVariable"),
            Self::Operator { operator, operands } => f
                .debug_struct("Operator")
                .field("operator", &operator.name())
                .field("operands", operands)
                .finish(),
            Self::Bracket(inner) => f.debug_tuple("Bracket").field(inner).finish(),
            Self::Nary(spec) => write!(f, "{:?}", spec),
            Self::OneOf(options) => f.debug_tuple("OneOf").field(options).finish(),
            Self::Condition { inner, .. } => f.debug_tuple("Condition").field(inner).finish(),
            Self::MatchCondition { inner, .. } => f.debug_tuple("MatchCondition").field(inner).finish(),
            Self::Keyed(key) => f.debug_tuple("Keyed").field(key).finish(),
            Self::Find(inner) => f.debug_tuple("Find").field(inner).finish(),
        }
    }
}

#[derive(Debug)]
struct PatternNode {
    id: PatternId,
    kind: PatternKind,
}

/// A structural pattern with identity. Cloning a pattern keeps its identity.
#[derive(Clone)]
pub struct Pattern(Arc<PatternNode>);

impl Pattern {
    /// Creates a new pattern with a fresh identity.
    pub fn new(kind: PatternKind) -> Self {
        Self(Arc::new(PatternNode { id: PatternId::next(), kind }))
    }

    /// The identity of this pattern.
    pub fn id(&self) -> PatternId {
        self.0.id
    }

    /// The identity this pattern binds under. Keyed patterns bind under their key.
    pub fn key_id(&self) -> PatternId {
        match &self.0.kind {
            PatternKind::Keyed(key) => key.key_id(),
            _ => self.0.id,
        }
    }

    /// The kind of this pattern.
    pub fn kind(&self) -> &PatternKind {
        &self.0.kind
    }

    /// Returns every match of this pattern against `sub` that extends `m`.
    pub fn find_matches<'a>(&self, ctx: &'a Context, m: &Match, sub: &Subexpression) -> Matches<'a> {
        match &self.0.kind {
            PatternKind::Keyed(key) => return key.find_matches(ctx, m, sub),
            PatternKind::Find(inner) => return find_anywhere(inner.clone(), ctx, m.clone(), sub),
            _ => {},
        }

        if let Some(previous) = m.last_binding_of(self.0.id) {
            if !previous.expr.equiv(&sub.expr) {
                return Box::new(std::iter::empty());
            }
        }

        let id = self.0.id;
        let bound = sub.clone();
        Box::new(
            self.structural_matches(ctx, m, sub)
                .map(move |m| m.bind(id, bound.clone())),
        )
    }

    /// Matches the structure of the expression, without binding this pattern.
    fn structural_matches<'a>(&self, ctx: &'a Context, m: &Match, sub: &Subexpression) -> Matches<'a> {
        let expr = &sub.expr;
        let only_if = |cond: bool| -> Matches<'a> {
            if cond {
                Box::new(std::iter::once(m.clone()))
            } else {
                Box::new(std::iter::empty())
            }
        };

        match &self.0.kind {
            PatternKind::Any => only_if(true),
            PatternKind::Fixed(fixed) => only_if(expr.equiv(fixed)),
            PatternKind::UnsignedInteger => only_if(matches!(expr.operator(), Operator::Integer(_))),
            PatternKind::UnsignedNumber => only_if(matches!(
                expr.operator(),
                Operator::Integer(_) | Operator::Decimal(_)
            )),
            PatternKind::RecurringDecimal => only_if(matches!(expr.operator(), Operator::RecurringDecimal(_))),
            PatternKind::Variable => only_if(matches!(expr.operator(), Operator::Variable(_))),
            PatternKind::SolutionVariable => only_if(match expr.operator() {
                Operator::Variable(name) => ctx.solution_variable.as_ref() == Some(name),
                _ => false,
            }),
            PatternKind::Operator { operator, operands } => {
                if expr.operator() != operator || expr.child_count() != operands.len() {
                    return only_if(false);
                }
                let children = sub.children();
                operands
                    .iter()
                    .zip(children)
                    .fold(only_if(true), |matches, (operand, child)| {
                        let operand = operand.clone();
                        Box::new(matches.flat_map(move |m| operand.find_matches(ctx, &m, &child)))
                    })
            },
            PatternKind::Bracket(inner) => {
                let bracketed = expr
                    .decorators()
                    .last()
                    .map_or(false, |decorator| decorator.is_bracket());
                if !bracketed {
                    return only_if(false);
                }
                let content = Subexpression::new(expr.without_outer_decorator(), sub.path.clone());
                inner.find_matches(ctx, m, &content)
            },
            PatternKind::Nary(spec) => Box::new(NaryMatches::new(spec.clone(), ctx, m.clone(), sub)),
            PatternKind::OneOf(options) => {
                let m = m.clone();
                let sub = sub.clone();
                Box::new(
                    options
                        .clone()
                        .into_iter()
                        .flat_map(move |option| option.find_matches(ctx, &m, &sub)),
                )
            },
            PatternKind::Condition { inner, predicate } => {
                if predicate(expr) {
                    inner.find_matches(ctx, m, sub)
                } else {
                    only_if(false)
                }
            },
            PatternKind::MatchCondition { inner, predicate } => {
                let predicate = predicate.clone();
                Box::new(inner.find_matches(ctx, m, sub).filter(move |m| predicate(ctx, m)))
            },
            PatternKind::Keyed(_) | PatternKind::Find(_) => unreachable!("handled by find_matches"),
        }
    }

    /// Returns true if the pattern matches `sub` with no prior bindings.
    pub fn matches(&self, ctx: &Context, sub: &Subexpression) -> bool {
        self.first_match(ctx, sub).is_some()
    }

    /// Returns the first match of the pattern against `sub` with no prior bindings.
    pub fn first_match(&self, ctx: &Context, sub: &Subexpression) -> Option<Match> {
        self.find_matches(ctx, &Match::empty(), sub).next()
    }

    /// A quick check that rules out expressions this pattern can never match, whatever the
    /// bindings. A `true` result means nothing.
    pub(crate) fn could_match(&self, expr: &Expression) -> bool {
        match &self.0.kind {
            PatternKind::Any | PatternKind::Find(_) => true,
            PatternKind::Fixed(fixed) => expr.equiv(fixed),
            PatternKind::UnsignedInteger => matches!(expr.operator(), Operator::Integer(_)),
            PatternKind::UnsignedNumber => matches!(expr.operator(), Operator::Integer(_) | Operator::Decimal(_)),
            PatternKind::RecurringDecimal => matches!(expr.operator(), Operator::RecurringDecimal(_)),
            PatternKind::Variable | PatternKind::SolutionVariable => {
                matches!(expr.operator(), Operator::Variable(_))
            },
            PatternKind::Operator { operator, operands } => {
                expr.operator() == operator
                    && expr.child_count() == operands.len()
                    && operands
                        .iter()
                        .zip(expr.children())
                        .all(|(operand, child)| operand.could_match(child))
            },
            PatternKind::Bracket(inner) => {
                expr.decorators().last().map_or(false, |decorator| decorator.is_bracket())
                    && inner.could_match(&expr.without_outer_decorator())
            },
            PatternKind::Nary(spec) => spec.could_match(expr),
            PatternKind::OneOf(options) => options.iter().any(|option| option.could_match(expr)),
            PatternKind::Condition { inner, predicate } => predicate(expr) && inner.could_match(expr),
            PatternKind::MatchCondition { inner, .. } | PatternKind::Keyed(inner) => inner.could_match(expr),
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {:?}", self.0.id.0, self.0.kind)
    }
}

impl AsRef<Pattern> for Pattern {
    fn as_ref(&self) -> &Pattern {
        self
    }
}

impl From<&Pattern> for Pattern {
    fn from(pattern: &Pattern) -> Self {
        pattern.clone()
    }
}

/// Matches `pattern` at `sub` and every descendant of it, in prefix order.
fn find_anywhere<'a>(pattern: Pattern, ctx: &'a Context, m: Match, sub: &Subexpression) -> Matches<'a> {
    let mut stack = vec![sub.clone()];
    let positions = std::iter::from_fn(move || {
        let next = stack.pop()?;
        stack.extend(next.children().into_iter().rev());
        Some(next)
    });
    Box::new(positions.flat_map(move |position| pattern.find_matches(ctx, &m, &position)))
}

/// Matches any expression.
pub fn any() -> Pattern {
    Pattern::new(PatternKind::Any)
}

/// Matches expressions equivalent to the given one.
pub fn fixed(expr: Expression) -> Pattern {
    Pattern::new(PatternKind::Fixed(expr))
}

/// Matches integer literals.
pub fn unsigned_integer() -> Pattern {
    Pattern::new(PatternKind::UnsignedInteger)
}

/// Matches integer and decimal literals.
pub fn unsigned_number() -> Pattern {
    Pattern::new(PatternKind::UnsignedNumber)
}

/// Matches recurring decimal literals.
pub fn recurring_decimal() -> Pattern {
    Pattern::new(PatternKind::RecurringDecimal)
}

/// Matches any variable.
pub fn variable() -> Pattern {
    Pattern::new(PatternKind::Variable)
}

/// Matches the variable being solved for.
pub fn solution_variable() -> Pattern {
    Pattern::new(PatternKind::SolutionVariable)
}

/// Matches expressions with the given operator whose children match `operands` in order.
pub fn operator(operator: Operator, operands: Vec<Pattern>) -> Pattern {
    Pattern::new(PatternKind::Operator { operator, operands })
}

/// Matches a bracketed expression whose content matches `inner`.
pub fn bracket_of(inner: impl Into<Pattern>) -> Pattern {
    Pattern::new(PatternKind::Bracket(inner.into()))
}

/// Matches if any of the options match.
pub fn one_of(options: Vec<Pattern>) -> Pattern {
    Pattern::new(PatternKind::OneOf(options))
}

/// Matches if `inner` matches and the predicate holds for the expression.
pub fn condition(
    inner: impl Into<Pattern>,
    predicate: impl Fn(&Expression) -> bool + Send + Sync + 'static,
) -> Pattern {
    Pattern::new(PatternKind::Condition { inner: inner.into(), predicate: Arc::new(predicate) })
}

/// Matches if `inner` matches and the predicate holds for the resulting bindings.
pub fn match_condition(
    inner: impl Into<Pattern>,
    predicate: impl Fn(&Context, &Match) -> bool + Send + Sync + 'static,
) -> Pattern {
    Pattern::new(PatternKind::MatchCondition { inner: inner.into(), predicate: Arc::new(predicate) })
}

/// Matches if `inner` matches an integer for which the predicate holds.
pub fn integer_condition(
    inner: impl Into<Pattern>,
    predicate: impl Fn(&Integer) -> bool + Send + Sync + 'static,
) -> Pattern {
    let inner = inner.into();
    let bound = inner.clone();
    match_condition(inner, move |_, m| m.integer_value(&bound).map_or(false, |n| predicate(&n)))
}

/// Matches if `inner` matches and the predicate holds for the integers bound to `a` and `b`.
pub fn integer_condition2(
    inner: impl Into<Pattern>,
    a: impl Into<Pattern>,
    b: impl Into<Pattern>,
    predicate: impl Fn(&Integer, &Integer) -> bool + Send + Sync + 'static,
) -> Pattern {
    let (a, b) = (a.into(), b.into());
    match_condition(inner, move |_, m| match (m.integer_value(&a), m.integer_value(&b)) {
        (Some(a), Some(b)) => predicate(&a, &b),
        _ => false,
    })
}

/// Matches exactly like `key`, binding under the key's identity.
pub fn keyed(key: impl Into<Pattern>) -> Pattern {
    Pattern::new(PatternKind::Keyed(key.into()))
}

/// Matches `inner` anywhere inside the expression.
pub fn find(inner: impl Into<Pattern>) -> Pattern {
    Pattern::new(PatternKind::Find(inner.into()))
}

/// Matches constant expressions.
pub fn constant() -> Pattern {
    condition(any(), Expression::is_constant)
}

/// Matches `inner` when the context has a solution variable and no other variable occurs.
pub fn in_solution_variable(inner: impl Into<Pattern>) -> Pattern {
    let inner = inner.into();
    let bound = inner.clone();
    match_condition(inner, move |ctx, m| {
        let Some(variable) = ctx.solution_variable.as_deref() else {
            return false;
        };
        m.get_bound_expr(&bound)
            .map_or(false, |expr| expr.variables().into_iter().all(|name| name == variable))
    })
}

/// `-x`
pub fn neg_of(operand: impl Into<Pattern>) -> Pattern {
    operator(Operator::Minus, vec![operand.into()])
}

/// `+x`
pub fn plus_of(operand: impl Into<Pattern>) -> Pattern {
    operator(Operator::Plus, vec![operand.into()])
}

/// `+/-x`
pub fn plus_minus_of(operand: impl Into<Pattern>) -> Pattern {
    operator(Operator::PlusMinus, vec![operand.into()])
}

/// `: x`
pub fn divide_by_of(operand: impl Into<Pattern>) -> Pattern {
    operator(Operator::DivideBy, vec![operand.into()])
}

/// `[a / b]`
pub fn fraction_of(numerator: impl Into<Pattern>, denominator: impl Into<Pattern>) -> Pattern {
    operator(Operator::Fraction, vec![numerator.into(), denominator.into()])
}

/// `[b ^ e]`
pub fn power_of(base: impl Into<Pattern>, exponent: impl Into<Pattern>) -> Pattern {
    operator(Operator::Power, vec![base.into(), exponent.into()])
}

/// `sqrt[x]`
pub fn square_root_of(radicand: impl Into<Pattern>) -> Pattern {
    operator(Operator::SquareRoot, vec![radicand.into()])
}

/// `root[x, n]`
pub fn root_of(radicand: impl Into<Pattern>, order: impl Into<Pattern>) -> Pattern {
    operator(Operator::Root, vec![radicand.into(), order.into()])
}

/// `a = b`
pub fn equation_of(lhs: impl Into<Pattern>, rhs: impl Into<Pattern>) -> Pattern {
    operator(Operator::Equation, vec![lhs.into(), rhs.into()])
}

/// `a < b`, `a <= b`, `a > b` or `a >= b`
pub fn inequality_of(lhs: impl Into<Pattern>, rhs: impl Into<Pattern>) -> Pattern {
    let (lhs, rhs) = (lhs.into(), rhs.into());
    let options = [Comparator::Less, Comparator::LessEq, Comparator::Greater, Comparator::GreaterEq]
        .into_iter()
        .map(|comparator| operator(Operator::Inequality(comparator), vec![lhs.clone(), rhs.clone()]))
        .collect();
    one_of(options)
}

/// `a != b`
pub fn inequation_of(lhs: impl Into<Pattern>, rhs: impl Into<Pattern>) -> Pattern {
    operator(Operator::Inequality(Comparator::NotEq), vec![lhs.into(), rhs.into()])
}

/// An inequality of either kind.
pub fn comparison_of(lhs: impl Into<Pattern>, rhs: impl Into<Pattern>) -> Pattern {
    let (lhs, rhs) = (lhs.into(), rhs.into());
    one_of(vec![inequality_of(&lhs, &rhs), inequation_of(&lhs, &rhs)])
}

/// A sum whose terms match the operands exactly, in order.
pub fn sum_of(terms: Vec<Pattern>) -> Pattern {
    operator(Operator::Sum, terms)
}

/// A product whose factors match the operands exactly, in order.
pub fn product_of(factors: Vec<Pattern>) -> Pattern {
    operator(Operator::Product, factors)
}

/// A sum containing terms matching the operands, in order but not necessarily adjacent.
pub fn sum_containing(terms: Vec<Pattern>) -> NaryPattern {
    NaryPattern::new(Operator::Sum, terms, true, true)
}

/// A product containing factors matching the operands, in order but not necessarily adjacent.
pub fn product_containing(factors: Vec<Pattern>) -> NaryPattern {
    NaryPattern::new(Operator::Product, factors, true, true)
}

/// A sum whose terms match the operands in any order.
pub fn commutative_sum_of(terms: Vec<Pattern>) -> NaryPattern {
    NaryPattern::new(Operator::Sum, terms, false, false)
}

/// A product whose factors match the operands in any order.
pub fn commutative_product_of(factors: Vec<Pattern>) -> NaryPattern {
    NaryPattern::new(Operator::Product, factors, false, false)
}

#[cfg(test)]
mod tests {
    use crate::expr::build::xp;
    use pretty_assertions::assert_eq;
    use super::*;

    fn sub(src: &str) -> Subexpression {
        Subexpression::root(src.parse().unwrap())
    }

    #[test]
    fn same_pattern_same_binding() {
        let ctx = Context::default();
        let x = any();
        let pattern = fraction_of(x.clone(), x);
        assert!(pattern.matches(&ctx, &sub("[2 / 2]")));
        assert!(pattern.matches(&ctx, &sub("[(x + 1) / x + 1]")));
        assert!(!pattern.matches(&ctx, &sub("[2 / 3]")));
    }

    #[test]
    fn literal_patterns() {
        let ctx = Context::default().with_solution_variable("x");
        assert!(unsigned_integer().matches(&ctx, &sub("12")));
        assert!(!unsigned_integer().matches(&ctx, &sub("-12")));
        assert!(unsigned_number().matches(&ctx, &sub("1.5")));
        assert!(recurring_decimal().matches(&ctx, &sub("0.1[3]")));
        assert!(solution_variable().matches(&ctx, &sub("x")));
        assert!(!solution_variable().matches(&ctx, &sub("y")));
        assert!(fixed(xp(3)).matches(&ctx, &sub("(3)")));
    }

    #[test]
    fn bracket_pattern() {
        let ctx = Context::default();
        let pattern = bracket_of(sum_of(vec![any(), any()]));
        assert!(pattern.matches(&ctx, &sub("(1 + 2)")));
        assert!(!pattern.matches(&ctx, &sub("1 + 2")));
    }

    #[test]
    fn bound_paths() {
        let ctx = Context::default();
        let x = any();
        let pattern = sum_of(vec![x.clone(), any(), x.clone()]);
        let m = pattern.first_match(&ctx, &sub("a + b + a")).unwrap();
        assert_eq!(
            m.get_bound_paths(&x).iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["./0", "./2"],
        );
        assert_eq!(m.get_bound_expr(&pattern).unwrap().to_string(), "a + b + a");
    }

    #[test]
    fn one_of_tries_in_order() {
        let ctx = Context::default();
        let n = unsigned_integer();
        let signed = one_of(vec![neg_of(&n), n.clone()]);
        let m = signed.first_match(&ctx, &sub("-4")).unwrap();
        assert_eq!(m.integer_value(&n), Some(Integer::from(4)));
        assert_eq!(m.integer_value(&signed), Some(Integer::from(-4)));
    }

    #[test]
    fn find_in_prefix_order() {
        let ctx = Context::default();
        let a = unsigned_integer();
        let b = unsigned_integer();
        let product = product_containing(vec![a.clone(), b.clone()]);
        let pattern = find(product.pattern());

        let matches = pattern
            .find_matches(&ctx, &Match::empty(), &sub("2 + 3 * 5 + [5 / 3 * x * 3]"))
            .collect::<Vec<_>>();
        assert_eq!(matches.len(), 2);

        let values = matches
            .iter()
            .map(|m| m.integer_value(&a).unwrap() * m.integer_value(&b).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(values, vec![Integer::from(15), Integer::from(9)]);
    }

    #[test]
    fn inequality_patterns() {
        let ctx = Context::default();
        let (lhs, rhs) = (any(), unsigned_integer());
        let ordering = inequality_of(&lhs, &rhs);
        assert!(ordering.matches(&ctx, &sub("x < 3")));
        assert!(ordering.matches(&ctx, &sub("x >= 3")));
        assert!(!ordering.matches(&ctx, &sub("x != 3")));
        assert!(!ordering.matches(&ctx, &sub("x = 3")));

        let m = ordering.first_match(&ctx, &sub("2 x > 4")).unwrap();
        assert_eq!(m.get_bound_expr(&ordering).unwrap().to_string(), "2 x > 4");
        assert_eq!(m.integer_value(&rhs), Some(Integer::from(4)));

        assert!(inequation_of(any(), any()).matches(&ctx, &sub("x != 3")));
        let either = comparison_of(any(), any());
        assert!(either.matches(&ctx, &sub("x != 3")));
        assert!(either.matches(&ctx, &sub("x <= 3")));
        assert!(!either.matches(&ctx, &sub("x = 3")));

        let in_x = in_solution_variable(comparison_of(any(), any()));
        assert!(!in_x.matches(&ctx, &sub("x < 3")));
        let ctx = ctx.with_solution_variable("x");
        assert!(in_x.matches(&ctx, &sub("2 x + 1 < 3")));
        assert!(in_x.matches(&ctx, &sub("1 < 3")));
        assert!(!in_x.matches(&ctx, &sub("x < y")));
    }

    #[test]
    fn integer_conditions() {
        let ctx = Context::default();
        let n = unsigned_integer();
        let even = integer_condition(&n, |n| n.is_even());
        assert!(even.matches(&ctx, &sub("4")));
        assert!(!even.matches(&ctx, &sub("5")));

        let a = unsigned_integer();
        let b = unsigned_integer();
        let divides = integer_condition2(fraction_of(&a, &b), &a, &b, |a, b| a.is_divisible(b));
        assert!(divides.matches(&ctx, &sub("[6 / 3]")));
        assert!(!divides.matches(&ctx, &sub("[6 / 4]")));
    }
}
