//! Errors raised when looking up or applying methods by name.

use ariadne::Fmt;
use solver_attrs::ErrorKind;
use solver_error::EXPR;

/// No method is registered under the given id.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("there is no method named `{}`", name),
    labels = ["this method"],
    help = if suggestions.is_empty() {
        "type `:methods` to list the available methods".to_string()
    } else if suggestions.len() == 1 {
        format!("did you mean `{}`?", (&*suggestions[0]).fg(EXPR))
    } else {
        format!(
            "did you mean one of these methods? {}",
            suggestions
                .iter()
                .map(|s| format!("`{}`", s.fg(EXPR)))
                .collect::<Vec<_>>()
                .join(", ")
        )
    },
)]
pub struct UnknownMethod {
    /// The id that was looked up.
    pub name: String,

    /// Registered ids close to the one that was looked up.
    pub suggestions: Vec<String>,
}

/// The method exists, but does not apply to the expression.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` cannot be applied to this expression", name),
    labels = ["this expression"],
    help = "type `:auto` to try all public methods",
)]
pub struct MethodNotApplicable {
    /// The id of the method.
    pub name: String,
}
