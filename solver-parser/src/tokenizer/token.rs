use logos::Logos;
use std::ops::Range;

/// The different kinds of tokens that can be produced by the tokenizer.
#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    #[regex(r"[\n\r]+")]
    NewLine,

    #[regex(r"[ \t]+")]
    Whitespace,

    #[token("=")]
    Eq,

    #[token("!=")]
    NotEq,

    #[token("<")]
    Less,

    #[token("<=")]
    LessEq,

    #[token(">")]
    Greater,

    #[token(">=")]
    GreaterEq,

    #[token("+")]
    Add,

    #[token("-")]
    Sub,

    #[token("+/-")]
    PlusMinus,

    #[token("*")]
    Mul,

    #[token(":")]
    Colon,

    #[token("/")]
    Div,

    #[token("^")]
    Exp,

    #[token(",")]
    Comma,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token("[")]
    OpenSquare,

    #[token("]")]
    CloseSquare,

    #[token("{")]
    OpenCurly,

    #[token("}")]
    CloseCurly,

    #[token("[.")]
    OpenSquareDot,

    #[token(".]")]
    CloseSquareDot,

    #[token("{.")]
    OpenCurlyDot,

    #[token(".}")]
    CloseCurlyDot,

    #[token("<.")]
    OpenPartial,

    #[token(".>")]
    ClosePartial,

    #[token("/undefined/")]
    Undefined,

    #[token("/infinity/")]
    Infinity,

    #[token("/reals/")]
    Reals,

    #[token("sqrt")]
    Sqrt,

    #[token("root")]
    Root,

    #[token("SetSolution")]
    SetSolution,

    #[regex(r"[a-zA-Z]+")]
    Name,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"[0-9]+\.[0-9]+")]
    Decimal,

    #[regex(r"[0-9]+\.[0-9]*\[[0-9]+\]")]
    RecurringDecimal,

    #[regex(r".", priority = 0)]
    Symbol,
}

impl TokenKind {
    /// Returns true if the token represents whitespace.
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::NewLine)
    }

    /// Returns true if the token can start an operand of an implicit product, such as the `x` in
    /// `2x` or the `sqrt` in `2 sqrt[3]`.
    pub fn starts_implicit_factor(self) -> bool {
        matches!(
            self,
            TokenKind::Name
                | TokenKind::Int
                | TokenKind::Decimal
                | TokenKind::RecurringDecimal
                | TokenKind::OpenParen
                | TokenKind::OpenSquare
                | TokenKind::OpenSquareDot
                | TokenKind::OpenCurlyDot
                | TokenKind::OpenPartial
                | TokenKind::Sqrt
                | TokenKind::Root
        )
    }
}

/// A token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'source> {
    /// The region of the source code that this token originated from.
    pub span: Range<usize>,

    /// The kind of token.
    pub kind: TokenKind,

    /// The raw lexeme that was parsed into this token.
    pub lexeme: &'source str,
}

impl Token<'_> {
    /// Returns true if the token represents whitespace.
    pub fn is_whitespace(&self) -> bool {
        self.kind.is_whitespace()
    }
}
