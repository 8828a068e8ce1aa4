//! Conversion from the parser's syntax tree into [`Expression`]s.

use crate::error::{Error, InvalidLiteral};
use rug::Integer;
use solver_parser::parser::{
    ast::{Bracket, Expr as AstExpr, ExprKind, Relation, Sign},
    parse,
};
use std::str::FromStr;
use super::{Comparator, Decimal, Decorator, Expression, Operator, RecurringDecimal};

fn literal_error(expr: &AstExpr, literal: &str, reason: &'static str) -> Error {
    Error::new(vec![expr.span.clone()], InvalidLiteral {
        literal: literal.to_string(),
        reason,
    })
}

fn parse_integer(expr: &AstExpr, digits: &str) -> Result<Integer, Error> {
    Integer::from_str_radix(digits, 10).map_err(|_| literal_error(expr, digits, "expected an integer"))
}

fn convert_all(exprs: &[AstExpr]) -> Result<Vec<Expression>, Error> {
    exprs.iter().map(Expression::try_from).collect()
}

impl TryFrom<&AstExpr> for Expression {
    type Error = Error;

    fn try_from(expr: &AstExpr) -> Result<Self, Self::Error> {
        let (operator, children) = match &expr.kind {
            ExprKind::Integer(digits) => (Operator::Integer(parse_integer(expr, digits)?), Vec::new()),
            ExprKind::Decimal(text) => {
                let decimal = Decimal::parse(text)
                    .ok_or_else(|| literal_error(expr, text, "expected a decimal"))?;
                (Operator::Decimal(decimal), Vec::new())
            },
            ExprKind::RecurringDecimal { integer, decimals, repeating } => {
                let decimal = RecurringDecimal::new(parse_integer(expr, integer)?, decimals, repeating)
                    .ok_or_else(|| literal_error(expr, repeating, "expected repeating digits"))?;
                (Operator::RecurringDecimal(decimal), Vec::new())
            },
            ExprKind::Variable(name) => (Operator::Variable(name.clone()), Vec::new()),
            ExprKind::Undefined => (Operator::Undefined, Vec::new()),
            ExprKind::Infinity => (Operator::Infinity, Vec::new()),
            ExprKind::Reals => (Operator::Reals, Vec::new()),
            ExprKind::Signed(sign, operand) => {
                let operator = match sign {
                    Sign::Minus => Operator::Minus,
                    Sign::Plus => Operator::Plus,
                    Sign::PlusMinus => Operator::PlusMinus,
                };
                (operator, vec![Expression::try_from(&**operand)?])
            },
            ExprKind::DivideBy(divisor) => (Operator::DivideBy, vec![Expression::try_from(&**divisor)?]),
            ExprKind::Sum(terms) => (Operator::Sum, convert_all(terms)?),
            ExprKind::Product(factors) => (Operator::Product, convert_all(factors)?),
            ExprKind::Fraction(numerator, denominator) => (
                Operator::Fraction,
                vec![Expression::try_from(&**numerator)?, Expression::try_from(&**denominator)?],
            ),
            ExprKind::Power(base, exponent) => (
                Operator::Power,
                vec![Expression::try_from(&**base)?, Expression::try_from(&**exponent)?],
            ),
            ExprKind::SquareRoot(radicand) => {
                (Operator::SquareRoot, vec![Expression::try_from(&**radicand)?])
            },
            ExprKind::Root(radicand, order) => (
                Operator::Root,
                vec![Expression::try_from(&**radicand)?, Expression::try_from(&**order)?],
            ),
            ExprKind::Bracketed(bracket, inner) => {
                let decorator = match bracket {
                    Bracket::Round => Decorator::RoundBracket,
                    Bracket::Square => Decorator::SquareBracket,
                    Bracket::Curly => Decorator::CurlyBracket,
                    Bracket::Partial => Decorator::PartialBracket,
                };
                return Ok(Expression::try_from(&**inner)?.decorate(decorator));
            },
            ExprKind::Statement(relation, lhs, rhs) => {
                let operator = match relation {
                    Relation::Eq => Operator::Equation,
                    Relation::NotEq => Operator::Inequality(Comparator::NotEq),
                    Relation::Less => Operator::Inequality(Comparator::Less),
                    Relation::LessEq => Operator::Inequality(Comparator::LessEq),
                    Relation::Greater => Operator::Inequality(Comparator::Greater),
                    Relation::GreaterEq => Operator::Inequality(Comparator::GreaterEq),
                };
                (operator, vec![Expression::try_from(&**lhs)?, Expression::try_from(&**rhs)?])
            },
            ExprKind::Set(elements) => (Operator::FiniteSet, convert_all(elements)?),
            ExprKind::Tuple(elements) => (Operator::Tuple, convert_all(elements)?),
            ExprKind::SetSolution(variables, set) => {
                let variables = Expression::new(Operator::VariableList, convert_all(variables)?)
                    .map_err(|err| Error { spans: vec![expr.span.clone()], ..err })?;
                (Operator::SetSolution, vec![variables, Expression::try_from(&**set)?])
            },
        };

        Expression::new(operator, children)
            .map_err(|err| Error { spans: vec![expr.span.clone()], ..err })
    }
}

impl FromStr for Expression {
    type Err = Vec<Error>;

    /// Parses solver text into an expression.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ast = parse(s)?;
        Expression::try_from(&ast).map_err(|err| vec![err])
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use solver_error::ErrorKind;
    use super::*;

    fn round_trip(input: &str, expected: &str) {
        let expr: Expression = input.parse().unwrap();
        assert_eq!(expr.to_string(), expected);
        let reparsed: Expression = expr.to_string().parse().unwrap();
        assert!(reparsed.equiv(&expr), "`{}` did not round-trip", expected);
    }

    #[test]
    fn renders_canonical_solver_text() {
        round_trip("1+1", "1 + 1");
        round_trip("x-y", "x - y");
        round_trip("[3/5]", "[3 / 5]");
        round_trip("[x^1+n]", "[x ^ 1 + n]");
        round_trip("xyz", "x y z");
        round_trip("(3 + 2)*4:25", "(3 + 2) * 4 : 25");
        round_trip("sqrt[[b^2] - 4ac]", "sqrt[[b ^ 2] - 4 a c]");
    }

    #[test]
    fn round_trips() {
        round_trip("{.2 + [.3 + (4 + 5).].}", "{.2 + [.3 + (4 + 5).].}");
        round_trip("4 * <.2 * 3.>", "4 * <.2 * 3.>");
        round_trip("3.1[45] + 0.25", "3.1[45] + 0.25");
        round_trip("x = +/-sqrt[2]", "x = +/-sqrt[2]");
        round_trip("root[x, 3] >= /undefined/", "root[x, 3] >= /undefined/");
        round_trip("SetSolution[x, y : {(1, 2)}]", "SetSolution[x, y : {(1, 2)}]");
        round_trip("[(-2) ^ 4]", "[(-2) ^ 4]");
        round_trip("2 * 3 * 4", "2 * 3 * 4");
        round_trip("1 + +2", "1 + +2");
    }

    #[test]
    fn invalid_trees_report_spans() {
        let errors = "[x ^ 2] ^ 3".parse::<Expression>().unwrap_err();
        assert_eq!(errors[0].kind.message(), "expected end of input");

        let errors = "1 + (x = 2)".parse::<Expression>().unwrap_err();
        assert_eq!(errors[0].spans, vec![0..11]);
        assert_eq!(errors[0].kind.message(), "`Equation` is not allowed as child 1 of `Sum`");

        let errors = "--x".parse::<Expression>().unwrap_err();
        assert_eq!(errors[0].spans, vec![0..3]);
    }
}
