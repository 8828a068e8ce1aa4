pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer, with
/// whitespace removed. Input the tokenizer cannot recognize becomes a [`TokenKind::Symbol`]
/// token, which the parser reports as unexpected.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let kind = result.unwrap_or(TokenKind::Symbol);
        if kind.is_whitespace() {
            continue;
        }
        tokens.push(Token {
            span: lexer.span(),
            kind,
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<const N: usize>(input: &str, expected: [(TokenKind, &str); N]) {
        let tokens = tokenize_complete(input);
        let actual = tokens.iter().map(|token| (token.kind, token.lexeme)).collect::<Vec<_>>();
        assert_eq!(actual, expected.to_vec());
    }

    #[test]
    fn sum_and_difference() {
        compare_tokens(
            "1 + x - 2",
            [
                (TokenKind::Int, "1"),
                (TokenKind::Add, "+"),
                (TokenKind::Name, "x"),
                (TokenKind::Sub, "-"),
                (TokenKind::Int, "2"),
            ],
        );
    }

    #[test]
    fn numbers() {
        compare_tokens(
            "12 3.25 0.1[6] 3.[3]",
            [
                (TokenKind::Int, "12"),
                (TokenKind::Decimal, "3.25"),
                (TokenKind::RecurringDecimal, "0.1[6]"),
                (TokenKind::RecurringDecimal, "3.[3]"),
            ],
        );
    }

    #[test]
    fn brackets_and_markers() {
        compare_tokens(
            "{.[.(<.x.>).].} +/- /undefined/ /infinity/ /reals/",
            [
                (TokenKind::OpenCurlyDot, "{."),
                (TokenKind::OpenSquareDot, "[."),
                (TokenKind::OpenParen, "("),
                (TokenKind::OpenPartial, "<."),
                (TokenKind::Name, "x"),
                (TokenKind::ClosePartial, ".>"),
                (TokenKind::CloseParen, ")"),
                (TokenKind::CloseSquareDot, ".]"),
                (TokenKind::CloseCurlyDot, ".}"),
                (TokenKind::PlusMinus, "+/-"),
                (TokenKind::Undefined, "/undefined/"),
                (TokenKind::Infinity, "/infinity/"),
                (TokenKind::Reals, "/reals/"),
            ],
        );
    }

    #[test]
    fn keywords_and_comparisons() {
        compare_tokens(
            "sqrt[x] <= root[y, 3] != SetSolution",
            [
                (TokenKind::Sqrt, "sqrt"),
                (TokenKind::OpenSquare, "["),
                (TokenKind::Name, "x"),
                (TokenKind::CloseSquare, "]"),
                (TokenKind::LessEq, "<="),
                (TokenKind::Root, "root"),
                (TokenKind::OpenSquare, "["),
                (TokenKind::Name, "y"),
                (TokenKind::Comma, ","),
                (TokenKind::Int, "3"),
                (TokenKind::CloseSquare, "]"),
                (TokenKind::NotEq, "!="),
                (TokenKind::SetSolution, "SetSolution"),
            ],
        );
    }
}
