pub mod ast;
pub mod error;
mod expr;

use ast::Expr;
use error::{Error, ExpectedEof, UnexpectedEof, UnexpectedToken};
use solver_error::ErrorKind;
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// Any type that can be parsed from a stream of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

/// A high-level parser for solver text. This is the type to use to parse an arbitrary piece of
/// input into an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing, without whitespace.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the current token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the end of the stream.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Returns the kind of the current token without moving the cursor.
    pub fn peek(&self) -> Option<TokenKind> {
        self.current_token().map(|token| token.kind)
    }

    /// Returns the next token to be parsed, then advances the cursor.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        match self.tokens.get(self.cursor) {
            Some(token) => {
                self.cursor += 1;
                // cloning is cheap: only Range<_> is cloned
                Ok(token.clone())
            },
            None => Err(self.error(UnexpectedEof)),
        }
    }

    /// Consumes the current token if it is of the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> Option<Token<'source>> {
        if self.peek() == Some(kind) {
            self.next_token().ok()
        } else {
            None
        }
    }

    /// Consumes a token of the given kind, or returns an error describing what was expected.
    pub fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token<'source>, Error> {
        match self.peek() {
            Some(found) if found == kind => self.next_token(),
            Some(found) => Err(self.error(UnexpectedToken { expected, found })),
            None => Err(self.error(UnexpectedEof)),
        }
    }

    /// Speculatively parses a value from the given stream of tokens. The cursor is moved back to
    /// where it was if parsing fails.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        let start = self.cursor;
        T::parse(self).map_err(|err| {
            self.cursor = start;
            err
        })
    }

    /// Parses the entire input as one statement or expression. Returns the list of errors if
    /// the input is malformed.
    pub fn try_parse_full(&mut self) -> Result<Expr, Vec<Error>> {
        let expr = self.try_parse::<Expr>().map_err(|err| vec![err])?;
        if self.cursor < self.tokens.len() {
            let start = self.span().start;
            let end = self.eof_span().end;
            return Err(vec![Error::new(vec![start..end], ExpectedEof)]);
        }
        Ok(expr)
    }
}

/// Parses the given solver text into an abstract syntax tree.
pub fn parse(source: &str) -> Result<Expr, Vec<Error>> {
    Parser::new(source).try_parse_full()
}
