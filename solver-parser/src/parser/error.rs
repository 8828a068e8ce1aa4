use ariadne::Fmt;
use solver_attrs::ErrorKind;
use solver_error::EXPR;
use crate::tokenizer::TokenKind;

pub use solver_error::Error;

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of input",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of input",
    labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
)]
pub struct ExpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected token",
    labels = [format!("expected {}", expected)],
    help = format!("found {:?}", found),
)]
pub struct UnexpectedToken {
    /// A description of what was expected.
    pub expected: &'static str,

    /// The token that was found.
    pub found: TokenKind,
}

/// A bracket was opened but never closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed bracket",
    labels = ["this bracket is never closed", "expected it to be closed here"],
    help = format!("close it with `{}`", close),
)]
pub struct UnclosedBracket {
    /// The text that closes the bracket.
    pub close: &'static str,
}

/// A variable name longer than one letter was used where a name was required.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "invalid variable name",
    labels = ["expected a single letter"],
    help = format!("`{}` is read as a product of variables, which is not allowed here", name),
)]
pub struct InvalidVariableName {
    /// The name that was found.
    pub name: String,
}
