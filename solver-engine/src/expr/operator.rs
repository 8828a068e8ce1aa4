//! The closed set of node kinds an [`Expression`](super::Expression) can have, together with
//! their arity, precedence and legality rules.

use rug::Integer;
use std::fmt::{self, Display, Formatter};
use super::number::{Decimal, RecurringDecimal};

#[cfg(feature = "serde")]
use serde::Serialize;

/// The largest number of children a variadic operator accepts.
pub const MAX_CHILD_COUNT: usize = 1000;

/// The precedence of operators that delimit their own operands, such as `[a / b]` or `sqrt[x]`,
/// and of leaves.
pub const MAX_PRECEDENCE: u8 = u8::MAX;

/// The broad category of an operator, which determines where it may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum OperatorKind {
    /// A mathematical (sub)formula, such as a number, a sum or a root.
    Expression,

    /// A set of values.
    Set,

    /// An equation, inequality or solution.
    Statement,

    /// Something that can only appear as an element of a set, such as a tuple.
    SetElement,

    /// Auxiliary nodes that only appear inside other nodes, such as a list of variables.
    Structural,
}

/// The number of children an operator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Exactly this many children.
    Fixed(usize),

    /// At least two children.
    Variable,

    /// Any number of children, including none.
    VariableFromZero,
}

impl Arity {
    /// Returns true if the given number of children is accepted.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Fixed(n) => count == n,
            Arity::Variable => (2..=MAX_CHILD_COUNT).contains(&count),
            Arity::VariableFromZero => count <= MAX_CHILD_COUNT,
        }
    }

    /// Returns true if a child can be placed at position `n`.
    pub fn has_position(self, n: usize) -> bool {
        match self {
            Arity::Fixed(count) => n < count,
            Arity::Variable | Arity::VariableFromZero => n < MAX_CHILD_COUNT,
        }
    }
}

impl Display for Arity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Fixed(n) => write!(f, "exactly {}", n),
            Arity::Variable => write!(f, "between 2 and {}", MAX_CHILD_COUNT),
            Arity::VariableFromZero => write!(f, "at most {}", MAX_CHILD_COUNT),
        }
    }
}

/// The sign of an inequality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Comparator {
    Less,
    LessEq,
    Greater,
    GreaterEq,
    NotEq,
}

impl Comparator {
    /// The symbol used in solver text.
    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Less => "<",
            Comparator::LessEq => "<=",
            Comparator::Greater => ">",
            Comparator::GreaterEq => ">=",
            Comparator::NotEq => "!=",
        }
    }

    /// The symbol used in LaTeX.
    pub fn latex(self) -> &'static str {
        match self {
            Comparator::Less => "<",
            Comparator::LessEq => "\\leq",
            Comparator::Greater => ">",
            Comparator::GreaterEq => "\\geq",
            Comparator::NotEq => "\\neq",
        }
    }

    /// The comparator obtained by swapping both sides of the inequality.
    pub fn reversed(self) -> Self {
        match self {
            Comparator::Less => Comparator::Greater,
            Comparator::LessEq => Comparator::GreaterEq,
            Comparator::Greater => Comparator::Less,
            Comparator::GreaterEq => Comparator::LessEq,
            Comparator::NotEq => Comparator::NotEq,
        }
    }
}

/// The kind of an expression node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Operator {
    /// A non-negative integer. Negative integers are [`Operator::Minus`] of an integer.
    Integer(Integer),

    /// A non-negative terminating decimal, such as `3.25`.
    Decimal(Decimal),

    /// A non-negative recurring decimal, such as `0.1[6]`.
    RecurringDecimal(RecurringDecimal),

    /// A variable, such as `x`.
    Variable(String),

    /// The result of an undefined operation, such as dividing by zero.
    Undefined,

    /// `/infinity/`, only found at the ends of intervals.
    Infinity,

    /// `/reals/`, the set of all real numbers.
    Reals,

    /// `-x`
    Minus,

    /// `+x`
    Plus,

    /// `+/-x`
    PlusMinus,

    /// `:x`, dividing the preceding factors of a product by `x`.
    DivideBy,

    /// `sqrt[x]`
    SquareRoot,

    /// `[numerator / denominator]`
    Fraction,

    /// `[base ^ exponent]`
    Power,

    /// `root[radicand, order]`
    Root,

    /// `a + b + ...`
    Sum,

    /// `a b ...`
    Product,

    /// `lhs = rhs`
    Equation,

    /// `lhs < rhs`, `lhs >= rhs`, ...
    Inequality(Comparator),

    /// `{a, b, ...}`
    FiniteSet,

    /// `(a, b, ...)`, an element of a set of solutions with several variables.
    Tuple,

    /// `x, y, ...`, the variables of a solution.
    VariableList,

    /// `SetSolution[x : {..}]`, a list of variables together with their set of values.
    SetSolution,

    /// The real numbers between `a` and `b`, with each end included if it is closed.
    Interval { left_closed: bool, right_closed: bool },

    /// `A \ B`, the elements of the first set that are not in the second.
    SetDifference,
}

impl Operator {
    /// A short name for the operator, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Integer(_) => "Integer",
            Operator::Decimal(_) => "Decimal",
            Operator::RecurringDecimal(_) => "RecurringDecimal",
            Operator::Variable(_) => "Variable",
            Operator::Undefined => "Undefined",
            Operator::Infinity => "Infinity",
            Operator::Reals => "Reals",
            Operator::Minus => "Minus",
            Operator::Plus => "Plus",
            Operator::PlusMinus => "PlusMinus",
            Operator::DivideBy => "DivideBy",
            Operator::SquareRoot => "SquareRoot",
            Operator::Fraction => "Fraction",
            Operator::Power => "Power",
            Operator::Root => "Root",
            Operator::Sum => "Sum",
            Operator::Product => "Product",
            Operator::Equation => "Equation",
            Operator::Inequality(_) => "Inequality",
            Operator::FiniteSet => "FiniteSet",
            Operator::Tuple => "Tuple",
            Operator::VariableList => "VariableList",
            Operator::SetSolution => "SetSolution",
            Operator::Interval { .. } => "Interval",
            Operator::SetDifference => "SetDifference",
        }
    }

    /// The category of the operator.
    pub fn kind(&self) -> OperatorKind {
        match self {
            Operator::Equation | Operator::Inequality(_) | Operator::SetSolution => {
                OperatorKind::Statement
            },
            Operator::FiniteSet | Operator::Reals | Operator::Interval { .. } | Operator::SetDifference => {
                OperatorKind::Set
            },
            Operator::Tuple => OperatorKind::SetElement,
            Operator::VariableList => OperatorKind::Structural,
            _ => OperatorKind::Expression,
        }
    }

    /// The number of children the operator accepts.
    pub fn arity(&self) -> Arity {
        match self {
            Operator::Integer(_)
            | Operator::Decimal(_)
            | Operator::RecurringDecimal(_)
            | Operator::Variable(_)
            | Operator::Undefined
            | Operator::Infinity
            | Operator::Reals => Arity::Fixed(0),
            Operator::Minus
            | Operator::Plus
            | Operator::PlusMinus
            | Operator::DivideBy
            | Operator::SquareRoot => Arity::Fixed(1),
            Operator::Fraction
            | Operator::Power
            | Operator::Root
            | Operator::Equation
            | Operator::Inequality(_)
            | Operator::SetSolution
            | Operator::Interval { .. }
            | Operator::SetDifference => Arity::Fixed(2),
            Operator::Sum | Operator::Product | Operator::Tuple => Arity::Variable,
            Operator::FiniteSet | Operator::VariableList => Arity::VariableFromZero,
        }
    }

    /// Returns true if the operator has no children.
    pub fn is_leaf(&self) -> bool {
        self.arity() == Arity::Fixed(0)
    }

    /// Returns true for integers, decimals and recurring decimals.
    pub fn is_numeral(&self) -> bool {
        matches!(
            self,
            Operator::Integer(_) | Operator::Decimal(_) | Operator::RecurringDecimal(_)
        )
    }

    /// The binding strength of the operator. A child whose precedence is not greater than what
    /// its position requires must be bracketed.
    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Equation | Operator::Inequality(_) => 0,
            Operator::Sum => 10,
            Operator::Minus | Operator::Plus | Operator::PlusMinus => 15,
            Operator::Product => 20,
            Operator::DivideBy => 25,
            Operator::Power => 30,
            _ => MAX_PRECEDENCE,
        }
    }

    /// Returns true if a child of the given kind may appear at position `n`, if it is written in
    /// a bracket when needed.
    pub fn nth_child_kind_allowed(&self, n: usize, kind: OperatorKind) -> bool {
        match self {
            Operator::FiniteSet => matches!(kind, OperatorKind::Expression | OperatorKind::SetElement),
            Operator::VariableList => kind == OperatorKind::Expression,
            Operator::SetSolution => match n {
                0 => kind == OperatorKind::Structural,
                _ => kind == OperatorKind::Set,
            },
            Operator::SetDifference => kind == OperatorKind::Set,
            _ => kind == OperatorKind::Expression,
        }
    }

    /// Returns true if a child with the given operator may appear, without a bracket, at
    /// position `n` of a node with this operator.
    ///
    /// Rendering uses the same predicate to decide where brackets are needed.
    pub fn nth_child_allowed(&self, n: usize, child: &Operator) -> bool {
        if !self.arity().has_position(n) {
            return false;
        }
        if !self.nth_child_kind_allowed(n, child.kind()) {
            return false;
        }

        match self {
            Operator::Integer(_)
            | Operator::Decimal(_)
            | Operator::RecurringDecimal(_)
            | Operator::Variable(_)
            | Operator::Undefined
            | Operator::Infinity
            | Operator::Reals => false,
            Operator::Minus | Operator::Plus | Operator::PlusMinus | Operator::DivideBy => {
                child.precedence() > self.precedence()
            },
            Operator::Sum => child.precedence() > self.precedence(),
            Operator::Product => {
                child.precedence() > self.precedence() && !(n == 0 && *child == Operator::DivideBy)
            },
            // any expression can be the exponent
            Operator::Power => n == 1 || child.precedence() > self.precedence(),
            Operator::SetSolution => n == 1 || *child == Operator::VariableList,
            Operator::VariableList => matches!(child, Operator::Variable(_)),
            Operator::SquareRoot
            | Operator::Fraction
            | Operator::Root
            | Operator::Equation
            | Operator::Inequality(_)
            | Operator::FiniteSet
            | Operator::Tuple
            | Operator::Interval { .. }
            | Operator::SetDifference => true,
        }
    }

    /// Returns true if the given operators are acceptable children of this operator, in order.
    pub fn children_allowed(&self, children: &[&Operator]) -> bool {
        self.arity().accepts(children.len())
            && children
                .iter()
                .enumerate()
                .all(|(n, child)| self.nth_child_allowed(n, child))
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Integer(n) => write!(f, "{}", n),
            Operator::Decimal(d) => write!(f, "{}", d),
            Operator::RecurringDecimal(d) => write!(f, "{}", d),
            Operator::Variable(name) => write!(f, "{}", name),
            Operator::Inequality(comparator) => write!(f, "Inequality({})", comparator.symbol()),
            other => write!(f, "{}", other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: u32) -> Operator {
        Operator::Integer(Integer::from(n))
    }

    #[test]
    fn sum_accepts_signed_terms_but_not_sums() {
        assert!(Operator::Sum.nth_child_allowed(1, &Operator::Minus));
        assert!(Operator::Sum.nth_child_allowed(0, &Operator::Product));
        assert!(!Operator::Sum.nth_child_allowed(0, &Operator::Sum));
        assert!(!Operator::Sum.nth_child_allowed(0, &Operator::Equation));
    }

    #[test]
    fn product_rejects_leading_divide_by() {
        assert!(Operator::Product.nth_child_allowed(1, &Operator::DivideBy));
        assert!(!Operator::Product.nth_child_allowed(0, &Operator::DivideBy));
        assert!(!Operator::Product.nth_child_allowed(1, &Operator::Minus));
    }

    #[test]
    fn power_base_must_bind_tighter() {
        assert!(Operator::Power.nth_child_allowed(0, &Operator::Fraction));
        assert!(!Operator::Power.nth_child_allowed(0, &Operator::Power));
        assert!(!Operator::Power.nth_child_allowed(0, &Operator::Minus));
        assert!(Operator::Power.nth_child_allowed(1, &Operator::Sum));
    }

    #[test]
    fn fixed_arity_rejects_extra_positions() {
        assert!(!Operator::Fraction.nth_child_allowed(2, &int(1)));
        assert!(!Operator::Minus.nth_child_allowed(1, &int(1)));
        assert!(!int(1).nth_child_allowed(0, &int(1)));
    }

    #[test]
    fn children_allowed_checks_arity() {
        assert!(Operator::Sum.children_allowed(&[&int(1), &int(2)]));
        assert!(!Operator::Sum.children_allowed(&[&int(1)]));
        assert!(Operator::FiniteSet.children_allowed(&[]));
        assert!(Operator::FiniteSet.children_allowed(&[&Operator::Tuple]));
        assert!(!Operator::Tuple.children_allowed(&[&Operator::FiniteSet, &int(1)]));
    }

    #[test]
    fn solution_structure() {
        assert!(Operator::SetSolution.children_allowed(&[&Operator::VariableList, &Operator::FiniteSet]));
        assert!(!Operator::SetSolution.children_allowed(&[&Operator::FiniteSet, &Operator::FiniteSet]));
        assert!(Operator::VariableList.nth_child_allowed(0, &Operator::Variable("x".to_string())));
        assert!(!Operator::VariableList.nth_child_allowed(0, &int(1)));
    }

    #[test]
    fn solution_sets() {
        let open = Operator::Interval { left_closed: false, right_closed: false };
        assert_eq!(open.kind(), OperatorKind::Set);
        assert!(open.children_allowed(&[&Operator::Minus, &Operator::Infinity]));
        assert!(!open.children_allowed(&[&Operator::Reals, &int(1)]));

        assert!(Operator::SetSolution.children_allowed(&[&Operator::VariableList, &Operator::Reals]));
        assert!(Operator::SetSolution.children_allowed(&[&Operator::VariableList, &open]));
        assert!(Operator::SetDifference.children_allowed(&[&Operator::Reals, &Operator::FiniteSet]));
        assert!(!Operator::SetDifference.children_allowed(&[&Operator::Reals, &int(1)]));
        assert!(!Operator::Sum.nth_child_allowed(0, &Operator::Reals));
        assert!(Operator::Infinity.is_leaf());
    }
}
