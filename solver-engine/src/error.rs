//! Errors raised when building malformed expressions or paths.

use solver_attrs::ErrorKind;

pub use solver_error::Error;

/// An operator was given the wrong number of children.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` expects {} children, but {} were given", operator, expected, found),
    labels = ["this expression"],
)]
pub struct InvalidArity {
    /// The name of the operator.
    pub operator: &'static str,

    /// A description of the accepted number of children.
    pub expected: String,

    /// The number of children that were given.
    pub found: usize,
}

/// A child is not allowed at its position, either because of its kind or because it binds less
/// tightly than the position requires.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not allowed as child {} of `{}`", child, position, operator),
    labels = ["this expression"],
    help = if *bracket_helps {
        "wrap it in a bracket"
    } else {
        "expressions of this kind cannot appear here"
    },
)]
pub struct InvalidChild {
    /// The name of the parent operator.
    pub operator: &'static str,

    /// The position of the child.
    pub position: usize,

    /// The name of the child's operator.
    pub child: &'static str,

    /// Whether a bracket around the child would make it allowed.
    pub bracket_helps: bool,
}

/// A numeric literal or variable is malformed, such as a negative integer literal.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid literal `{}`", literal),
    labels = ["this literal"],
    help = reason,
)]
pub struct InvalidLiteral {
    /// The literal as written.
    pub literal: String,

    /// Why the literal is invalid.
    pub reason: &'static str,
}

/// A path could not be parsed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid path `{}`", path),
    help = "paths look like `.`, `./0/1` or `./1:op`",
)]
pub struct InvalidPath {
    /// The path as written.
    pub path: String,
}
