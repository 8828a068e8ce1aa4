use super::{
    ast::{Bracket, Expr, ExprKind, Relation, Sign},
    error::{Error, InvalidVariableName, UnclosedBracket, UnexpectedEof, UnexpectedToken},
    Parse,
    Parser,
};
use crate::tokenizer::{Token, TokenKind};
use std::ops::Range;

fn span_of(first: &Expr, last: &Expr) -> Range<usize> {
    first.span.start..last.span.end
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        statement(input)
    }
}

/// `lhs (= | != | < | <= | > | >=) rhs`, or a plain expression.
fn statement(input: &mut Parser) -> Result<Expr, Error> {
    let lhs = sum(input)?;
    let relation = match input.peek() {
        Some(TokenKind::Eq) => Relation::Eq,
        Some(TokenKind::NotEq) => Relation::NotEq,
        Some(TokenKind::Less) => Relation::Less,
        Some(TokenKind::LessEq) => Relation::LessEq,
        Some(TokenKind::Greater) => Relation::Greater,
        Some(TokenKind::GreaterEq) => Relation::GreaterEq,
        _ => return Ok(lhs),
    };
    input.next_token()?;
    let rhs = sum(input)?;
    let span = span_of(&lhs, &rhs);
    Ok(Expr::new(ExprKind::Statement(relation, Box::new(lhs), Box::new(rhs)), span))
}

/// Reads a sign token, if there is one, returning the sign and the start of its span.
fn sign(input: &mut Parser) -> Option<(Sign, usize)> {
    let sign = match input.peek()? {
        TokenKind::Sub => Sign::Minus,
        TokenKind::Add => Sign::Plus,
        TokenKind::PlusMinus => Sign::PlusMinus,
        _ => return None,
    };
    let token = input.next_token().ok()?;
    Some((sign, token.span.start))
}

/// A product with an optional leading sign.
fn signed_term(input: &mut Parser) -> Result<Expr, Error> {
    match sign(input) {
        Some((sign, start)) => {
            let operand = signed_term(input)?;
            let span = start..operand.span.end;
            Ok(Expr::new(ExprKind::Signed(sign, Box::new(operand)), span))
        },
        None => product(input),
    }
}

/// Terms separated by `+`, `-` and `+/-`. A term after `+` may carry a sign of its own, as in
/// `1 + +2`.
pub(super) fn sum(input: &mut Parser) -> Result<Expr, Error> {
    let mut terms = vec![signed_term(input)?];

    loop {
        let term = match input.peek() {
            Some(TokenKind::Add) => {
                input.next_token()?;
                signed_term(input)?
            },
            Some(TokenKind::Sub) | Some(TokenKind::PlusMinus) => {
                let sign_start = input.span().start;
                let sign = if input.next_token()?.kind == TokenKind::Sub {
                    Sign::Minus
                } else {
                    Sign::PlusMinus
                };
                let operand = product(input)?;
                let span = sign_start..operand.span.end;
                Expr::new(ExprKind::Signed(sign, Box::new(operand)), span)
            },
            _ => break,
        };
        terms.push(term);
    }

    if terms.len() == 1 {
        Ok(terms.remove(0))
    } else {
        let span = span_of(&terms[0], &terms[terms.len() - 1]);
        Ok(Expr::new(ExprKind::Sum(terms), span))
    }
}

/// Factors separated by `*`, `:` or nothing at all.
fn product(input: &mut Parser) -> Result<Expr, Error> {
    let mut factors = Vec::new();
    push_factor(&mut factors, atom(input)?);

    loop {
        match input.peek() {
            Some(TokenKind::Mul) => {
                input.next_token()?;
                push_factor(&mut factors, atom(input)?);
            },
            Some(TokenKind::Colon) => {
                let colon = input.next_token()?;
                let divisor = atom(input)?;
                let span = colon.span.start..divisor.span.end;
                factors.push(Expr::new(ExprKind::DivideBy(Box::new(divisor)), span));
            },
            Some(kind) if kind.starts_implicit_factor() => {
                push_factor(&mut factors, atom(input)?);
            },
            _ => break,
        }
    }

    if factors.len() == 1 {
        Ok(factors.remove(0))
    } else {
        let span = span_of(&factors[0], &factors[factors.len() - 1]);
        Ok(Expr::new(ExprKind::Product(factors), span))
    }
}

/// Multi-letter names are parsed as products of variables, which are flattened into the
/// surrounding product.
fn push_factor(factors: &mut Vec<Expr>, factor: Expr) {
    match factor.kind {
        ExprKind::Product(inner) => factors.extend(inner),
        kind => factors.push(Expr::new(kind, factor.span)),
    }
}

/// Parses the contents of a bracket and the closing token.
fn close_bracket(
    input: &mut Parser,
    open: &Token,
    close: TokenKind,
    close_text: &'static str,
) -> Result<Range<usize>, Error> {
    match input.peek() {
        Some(kind) if kind == close => Ok(open.span.start..input.next_token()?.span.end),
        Some(found) if found != TokenKind::Comma => Err(input.error(UnexpectedToken {
            expected: close_text,
            found,
        })),
        _ => Err(Error::new(
            vec![open.span.clone(), input.span()],
            UnclosedBracket { close: close_text },
        )),
    }
}

/// Comma separated statements or expressions, up to (but not including) the closing token.
fn delimited(input: &mut Parser, close: TokenKind) -> Result<Vec<Expr>, Error> {
    let mut items = Vec::new();
    if input.peek() == Some(close) {
        return Ok(items);
    }
    loop {
        items.push(statement(input)?);
        if input.eat(TokenKind::Comma).is_none() {
            return Ok(items);
        }
    }
}

fn variables(name: &Token) -> Expr {
    let mut letters = name
        .lexeme
        .char_indices()
        .map(|(i, c)| {
            let start = name.span.start + i;
            Expr::new(ExprKind::Variable(c.to_string()), start..start + c.len_utf8())
        })
        .collect::<Vec<_>>();
    if letters.len() == 1 {
        letters.remove(0)
    } else {
        Expr::new(ExprKind::Product(letters), name.span.clone())
    }
}

fn recurring_decimal(token: &Token) -> ExprKind {
    let (integer, rest) = token.lexeme.split_once('.').unwrap_or((token.lexeme, ""));
    let (decimals, repeating) = rest.split_once('[').unwrap_or((rest, ""));
    ExprKind::RecurringDecimal {
        integer: integer.to_string(),
        decimals: decimals.to_string(),
        repeating: repeating.trim_end_matches(']').to_string(),
    }
}

/// A single operand: a number, variables, a bracketed expression, or a bracket-delimited
/// construct such as `[a / b]`.
fn atom(input: &mut Parser) -> Result<Expr, Error> {
    let Some(kind) = input.peek() else {
        return Err(input.error(UnexpectedEof));
    };
    let token = input.next_token()?;

    let expr = match kind {
        TokenKind::Int => Expr::new(ExprKind::Integer(token.lexeme.to_string()), token.span),
        TokenKind::Decimal => Expr::new(ExprKind::Decimal(token.lexeme.to_string()), token.span),
        TokenKind::RecurringDecimal => Expr::new(recurring_decimal(&token), token.span),
        TokenKind::Name => variables(&token),
        TokenKind::Undefined => Expr::new(ExprKind::Undefined, token.span),
        TokenKind::Infinity => Expr::new(ExprKind::Infinity, token.span),
        TokenKind::Reals => Expr::new(ExprKind::Reals, token.span),
        TokenKind::Sqrt => {
            let open = input.expect(TokenKind::OpenSquare, "`[`")?;
            let radicand = sum(input)?;
            let span = close_bracket(input, &open, TokenKind::CloseSquare, "]")?;
            Expr::new(ExprKind::SquareRoot(Box::new(radicand)), token.span.start..span.end)
        },
        TokenKind::Root => {
            let open = input.expect(TokenKind::OpenSquare, "`[`")?;
            let radicand = sum(input)?;
            input.expect(TokenKind::Comma, "`,` followed by the order of the root")?;
            let order = sum(input)?;
            let span = close_bracket(input, &open, TokenKind::CloseSquare, "]")?;
            Expr::new(
                ExprKind::Root(Box::new(radicand), Box::new(order)),
                token.span.start..span.end,
            )
        },
        TokenKind::OpenSquare => {
            let first = sum(input)?;
            let is_fraction = match input.peek() {
                Some(TokenKind::Div) => true,
                Some(TokenKind::Exp) => false,
                Some(found) => return Err(input.error(UnexpectedToken {
                    expected: "`/` or `^`",
                    found,
                })),
                None => return Err(input.error(UnexpectedEof)),
            };
            input.next_token()?;
            let second = sum(input)?;
            let span = close_bracket(input, &token, TokenKind::CloseSquare, "]")?;
            let (first, second) = (Box::new(first), Box::new(second));
            if is_fraction {
                Expr::new(ExprKind::Fraction(first, second), span)
            } else {
                Expr::new(ExprKind::Power(first, second), span)
            }
        },
        TokenKind::OpenParen => {
            let mut items = delimited(input, TokenKind::CloseParen)?;
            let span = close_bracket(input, &token, TokenKind::CloseParen, ")")?;
            match items.len() {
                0 => return Err(Error::new(vec![span], UnexpectedToken {
                    expected: "an expression",
                    found: TokenKind::CloseParen,
                })),
                1 => Expr::new(ExprKind::Bracketed(Bracket::Round, Box::new(items.remove(0))), span),
                _ => Expr::new(ExprKind::Tuple(items), span),
            }
        },
        TokenKind::OpenSquareDot | TokenKind::OpenCurlyDot | TokenKind::OpenPartial => {
            let (bracket, close, close_text) = match kind {
                TokenKind::OpenSquareDot => (Bracket::Square, TokenKind::CloseSquareDot, ".]"),
                TokenKind::OpenCurlyDot => (Bracket::Curly, TokenKind::CloseCurlyDot, ".}"),
                _ => (Bracket::Partial, TokenKind::ClosePartial, ".>"),
            };
            let inner = sum(input)?;
            let span = close_bracket(input, &token, close, close_text)?;
            Expr::new(ExprKind::Bracketed(bracket, Box::new(inner)), span)
        },
        TokenKind::OpenCurly => {
            let items = delimited(input, TokenKind::CloseCurly)?;
            let span = close_bracket(input, &token, TokenKind::CloseCurly, "}")?;
            Expr::new(ExprKind::Set(items), span)
        },
        TokenKind::SetSolution => set_solution(input, &token)?,
        found => {
            return Err(Error::new(vec![token.span], UnexpectedToken {
                expected: "an expression",
                found,
            }));
        },
    };

    Ok(expr)
}

/// `SetSolution[x, y : {..}]`, after the keyword.
fn set_solution(input: &mut Parser, keyword: &Token) -> Result<Expr, Error> {
    let open = input.expect(TokenKind::OpenSquare, "`[`")?;
    let mut variables = Vec::new();
    if input.peek() != Some(TokenKind::Colon) {
        loop {
            let name = input.expect(TokenKind::Name, "a variable")?;
            if name.lexeme.chars().count() != 1 {
                return Err(Error::new(vec![name.span], InvalidVariableName {
                    name: name.lexeme.to_string(),
                }));
            }
            variables.push(Expr::new(ExprKind::Variable(name.lexeme.to_string()), name.span));
            if input.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
    }
    input.expect(TokenKind::Colon, "`:`")?;
    let set = sum(input)?;
    let span = close_bracket(input, &open, TokenKind::CloseSquare, "]")?;
    Ok(Expr::new(
        ExprKind::SetSolution(variables, Box::new(set)),
        keyword.span.start..span.end,
    ))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use solver_error::ErrorKind;
    use super::*;
    use crate::parser::parse;

    fn int(n: &str, span: Range<usize>) -> Expr {
        Expr::new(ExprKind::Integer(n.to_string()), span)
    }

    fn var(name: &str, span: Range<usize>) -> Expr {
        Expr::new(ExprKind::Variable(name.to_string()), span)
    }

    #[test]
    fn difference() {
        let expr = parse("1 - x").unwrap();
        assert_eq!(expr, Expr::new(ExprKind::Sum(vec![
            int("1", 0..1),
            Expr::new(ExprKind::Signed(Sign::Minus, Box::new(var("x", 4..5))), 2..5),
        ]), 0..5));
    }

    #[test]
    fn implicit_product_of_letters() {
        let expr = parse("2xy").unwrap();
        assert_eq!(expr, Expr::new(ExprKind::Product(vec![
            int("2", 0..1),
            var("x", 1..2),
            var("y", 2..3),
        ]), 0..3));
    }

    #[test]
    fn divide_by_in_product() {
        let expr = parse("4 : 25").unwrap();
        assert_eq!(expr, Expr::new(ExprKind::Product(vec![
            int("4", 0..1),
            Expr::new(ExprKind::DivideBy(Box::new(int("25", 4..6))), 2..6),
        ]), 0..6));
    }

    #[test]
    fn power_exponent_is_a_sum() {
        let expr = parse("[x ^ 1 + n]").unwrap();
        let ExprKind::Power(base, exponent) = expr.kind else {
            panic!("expected a power, got {:?}", expr.kind);
        };
        assert_eq!(*base, var("x", 1..2));
        assert!(matches!(exponent.kind, ExprKind::Sum(ref terms) if terms.len() == 2));
    }

    #[test]
    fn nested_brackets() {
        let expr = parse("{.2 + [.3 + (4 + 5).].}").unwrap();
        let ExprKind::Bracketed(Bracket::Curly, inner) = expr.kind else {
            panic!("expected a curly bracket");
        };
        let ExprKind::Sum(terms) = inner.kind else {
            panic!("expected a sum");
        };
        assert!(matches!(terms[1].kind, ExprKind::Bracketed(Bracket::Square, _)));
    }

    #[test]
    fn recurring_decimal_parts() {
        let expr = parse("3.1[45]").unwrap();
        assert_eq!(expr.kind, ExprKind::RecurringDecimal {
            integer: "3".to_string(),
            decimals: "1".to_string(),
            repeating: "45".to_string(),
        });
    }

    #[test]
    fn equation_with_plus_minus() {
        let expr = parse("x = +/-2").unwrap();
        let ExprKind::Statement(Relation::Eq, _, rhs) = expr.kind else {
            panic!("expected an equation");
        };
        assert_eq!(rhs.kind, ExprKind::Signed(Sign::PlusMinus, Box::new(int("2", 7..8))));
    }

    #[test]
    fn sets_tuples_and_solutions() {
        let expr = parse("SetSolution[x, y : {(1, 2), (3, 4)}]").unwrap();
        let ExprKind::SetSolution(variables, set) = expr.kind else {
            panic!("expected a set solution");
        };
        assert_eq!(variables, vec![var("x", 12..13), var("y", 15..16)]);
        let ExprKind::Set(elements) = set.kind else {
            panic!("expected a set");
        };
        assert_eq!(elements.len(), 2);
        assert!(matches!(elements[0].kind, ExprKind::Tuple(_)));

        let empty = parse("{}").unwrap();
        assert_eq!(empty.kind, ExprKind::Set(Vec::new()));
    }

    #[test]
    fn unclosed_bracket() {
        let errors = parse("(1 + 2").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].spans, vec![0..1, 6..6]);
        assert_eq!(errors[0].kind.message(), "unclosed bracket");
    }

    #[test]
    fn trailing_input() {
        let errors = parse("1 + 2 )").unwrap_err();
        assert_eq!(errors[0].kind.message(), "expected end of input");
        assert_eq!(errors[0].spans, vec![6..7]);
    }

    #[test]
    fn missing_operand() {
        let errors = parse("1 +").unwrap_err();
        assert_eq!(errors[0].kind.message(), "unexpected end of input");
    }
}
