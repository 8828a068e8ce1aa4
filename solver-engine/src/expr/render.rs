//! Rendering of expressions as solver text (the [`Display`] implementation) and as LaTeX.

use std::fmt::{self, Display, Formatter, Write};
use super::{Decorator, Expression, Operator};

/// Returns true if the expression reads as a number: a numeral, a signed numeral, a fraction,
/// or a power of one of those.
fn is_numbery(expr: &Expression) -> bool {
    match expr.operator() {
        Operator::Integer(_) | Operator::Decimal(_) | Operator::RecurringDecimal(_) => true,
        Operator::Fraction => true,
        Operator::Power => expr.first_child().map_or(false, is_numbery),
        Operator::Minus | Operator::Plus | Operator::PlusMinus => {
            expr.first_child().map_or(false, |child| child.operator().is_numeral())
        },
        _ => false,
    }
}

/// The base of an unbracketed power, or the expression itself.
fn base_of(expr: &Expression) -> &Expression {
    match (expr.operator(), expr.has_bracket()) {
        (Operator::Power, false) => expr.first_child().unwrap_or(expr),
        _ => expr,
    }
}

fn is_root(expr: &Expression) -> bool {
    matches!(expr.operator(), Operator::SquareRoot | Operator::Root)
}

/// Returns true if an explicit multiplication sign must be written between two adjacent
/// factors of a product.
///
/// Writing two factors next to each other is only unambiguous when the left factor is a number
/// followed by a variable or root (`2 x`, `2 sqrt[3]`), a variable followed by a root
/// (`x sqrt[2]`), two different variables (`x y`), or when either has a bracket. A number on the
/// right always needs a sign (`x * 2`), and so does a division term.
pub fn product_sign_required(left: &Expression, right: &Expression) -> bool {
    if left.is_partial() && *left.operator() == Operator::Product {
        if let Some(last) = left.children().last() {
            return product_sign_required(last, right);
        }
    }
    if right.is_partial() && *right.operator() == Operator::Product {
        if let Some(first) = right.first_child() {
            return product_sign_required(left, first);
        }
    }

    if *left.operator() == Operator::DivideBy || *right.operator() == Operator::DivideBy {
        return true;
    }
    if is_numbery(right) {
        return true;
    }
    if left.has_bracket() || right.has_bracket() {
        return false;
    }

    let (left_base, right_base) = (base_of(left), base_of(right));
    let juxtaposable = match (left_base.operator(), right_base.operator()) {
        (_, Operator::Variable(_)) if is_numbery(left) => true,
        (_, _) if is_numbery(left) && is_root(right_base) => true,
        (Operator::Variable(_), _) if is_root(right_base) => true,
        (Operator::Variable(a), Operator::Variable(b)) => a != b,
        _ => false,
    };
    !juxtaposable
}

fn open_bracket(decorator: Decorator, latex: bool) -> &'static str {
    match (decorator, latex) {
        (Decorator::RoundBracket, false) => "(",
        (Decorator::SquareBracket, false) => "[.",
        (Decorator::CurlyBracket, false) => "{.",
        (Decorator::PartialBracket, false) => "<.",
        (Decorator::RoundBracket, true) => "\\left(",
        (Decorator::SquareBracket, true) => "\\left[",
        (Decorator::CurlyBracket, true) => "\\left\\{",
        (Decorator::PartialBracket, true) => "",
    }
}

fn close_bracket(decorator: Decorator, latex: bool) -> &'static str {
    match (decorator, latex) {
        (Decorator::RoundBracket, false) => ")",
        (Decorator::SquareBracket, false) => ".]",
        (Decorator::CurlyBracket, false) => ".}",
        (Decorator::PartialBracket, false) => ".>",
        (Decorator::RoundBracket, true) => "\\right)",
        (Decorator::SquareBracket, true) => "\\right]",
        (Decorator::CurlyBracket, true) => "\\right\\}",
        (Decorator::PartialBracket, true) => "",
    }
}

/// Writes the children separated by `separator`.
fn join(f: &mut impl Write, children: &[Expression], separator: &str, latex: bool) -> fmt::Result {
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write_expr(f, child, latex)?;
    }
    Ok(())
}

/// Writes the term of a sum or factor of a product that follows another one, including the
/// sign between them.
fn write_following(f: &mut impl Write, prev: &Expression, expr: &Expression, sum: bool, latex: bool) -> fmt::Result {
    let undecorated = expr.decorators().is_empty();
    match (sum, expr.operator(), expr.first_child()) {
        (true, Operator::Minus, Some(inner)) if undecorated => {
            f.write_str(" - ")?;
            write_expr(f, inner, latex)
        },
        (true, Operator::PlusMinus, Some(inner)) if undecorated => {
            f.write_str(if latex { " \\pm " } else { " +/- " })?;
            write_expr(f, inner, latex)
        },
        (true, _, _) => {
            f.write_str(" + ")?;
            write_expr(f, expr, latex)
        },
        (false, Operator::DivideBy, Some(inner)) if undecorated => {
            f.write_str(if latex { " \\div " } else { " : " })?;
            write_expr(f, inner, latex)
        },
        (false, _, _) => {
            if product_sign_required(prev, expr) {
                f.write_str(if latex { " \\cdot " } else { " * " })?;
            } else {
                f.write_str(" ")?;
            }
            write_expr(f, expr, latex)
        },
    }
}

/// Writes the expression in solver text or LaTeX.
fn write_expr(f: &mut impl Write, expr: &Expression, latex: bool) -> fmt::Result {
    for decorator in expr.decorators().iter().rev() {
        f.write_str(open_bracket(*decorator, latex))?;
    }

    let children = expr.children();
    match (expr.operator(), latex) {
        (Operator::Integer(n), _) => write!(f, "{}", n)?,
        (Operator::Decimal(d), _) => write!(f, "{}", d)?,
        (Operator::RecurringDecimal(d), false) => write!(f, "{}", d)?,
        (Operator::RecurringDecimal(d), true) => {
            write!(f, "{}.{}\\overline{{{}}}", d.integer(), d.decimals(), d.repeating())?
        },
        (Operator::Variable(name), _) => f.write_str(name)?,
        (Operator::Undefined, false) => f.write_str("/undefined/")?,
        (Operator::Undefined, true) => f.write_str("\\text{undefined}")?,
        (Operator::Infinity, false) => f.write_str("/infinity/")?,
        (Operator::Infinity, true) => f.write_str("\\infty")?,
        (Operator::Reals, false) => f.write_str("/reals/")?,
        (Operator::Reals, true) => f.write_str("\\mathbb{R}")?,
        (Operator::Minus, _) => {
            f.write_str("-")?;
            join(f, children, "", latex)?;
        },
        (Operator::Plus, _) => {
            f.write_str("+")?;
            join(f, children, "", latex)?;
        },
        (Operator::PlusMinus, _) => {
            f.write_str(if latex { "\\pm " } else { "+/-" })?;
            join(f, children, "", latex)?;
        },
        (Operator::DivideBy, _) => {
            f.write_str(if latex { "\\div " } else { ":" })?;
            join(f, children, "", latex)?;
        },
        (Operator::SquareRoot, false) => {
            f.write_str("sqrt[")?;
            join(f, children, "", latex)?;
            f.write_str("]")?;
        },
        (Operator::SquareRoot, true) => {
            f.write_str("\\sqrt{")?;
            join(f, children, "", latex)?;
            f.write_str("}")?;
        },
        (Operator::Root, false) => {
            f.write_str("root[")?;
            join(f, children, ", ", latex)?;
            f.write_str("]")?;
        },
        (Operator::Root, true) => {
            f.write_str("\\sqrt[")?;
            join(f, &children[1..], "", latex)?;
            f.write_str("]{")?;
            join(f, &children[..1], "", latex)?;
            f.write_str("}")?;
        },
        (Operator::Fraction, false) => {
            f.write_str("[")?;
            join(f, children, " / ", latex)?;
            f.write_str("]")?;
        },
        (Operator::Fraction, true) => {
            f.write_str("\\frac{")?;
            join(f, children, "}{", latex)?;
            f.write_str("}")?;
        },
        (Operator::Power, false) => {
            f.write_str("[")?;
            join(f, children, " ^ ", latex)?;
            f.write_str("]")?;
        },
        (Operator::Power, true) => {
            f.write_str("{")?;
            join(f, children, "}^{", latex)?;
            f.write_str("}")?;
        },
        (Operator::Sum, _) | (Operator::Product, _) => {
            let sum = *expr.operator() == Operator::Sum;
            if let Some((first, rest)) = children.split_first() {
                write_expr(f, first, latex)?;
                let mut prev = first;
                for child in rest {
                    write_following(f, prev, child, sum, latex)?;
                    prev = child;
                }
            }
        },
        (Operator::Equation, _) => join(f, children, " = ", latex)?,
        (Operator::Inequality(comparator), _) => {
            let separator = if latex { comparator.latex() } else { comparator.symbol() };
            join(f, children, &format!(" {} ", separator), latex)?;
        },
        (Operator::FiniteSet, false) => {
            f.write_str("{")?;
            join(f, children, ", ", latex)?;
            f.write_str("}")?;
        },
        (Operator::FiniteSet, true) if children.is_empty() => f.write_str("\\emptyset")?,
        (Operator::FiniteSet, true) => {
            f.write_str("\\left\\{")?;
            join(f, children, ", ", latex)?;
            f.write_str("\\right\\}")?;
        },
        (Operator::Tuple, _) => {
            f.write_str(if latex { "\\left(" } else { "(" })?;
            join(f, children, ", ", latex)?;
            f.write_str(if latex { "\\right)" } else { ")" })?;
        },
        (Operator::VariableList, _) => join(f, children, ", ", latex)?,
        (Operator::SetSolution, false) => {
            f.write_str("SetSolution[")?;
            join(f, children, " : ", latex)?;
            f.write_str("]")?;
        },
        (Operator::SetSolution, true) => {
            let variables = &children[0];
            if variables.child_count() == 1 {
                write_expr(f, variables, latex)?;
            } else {
                f.write_str("\\left(")?;
                write_expr(f, variables, latex)?;
                f.write_str("\\right)")?;
            }
            f.write_str(" \\in ")?;
            write_expr(f, &children[1], latex)?;
        },
        (Operator::Interval { left_closed, right_closed }, _) => {
            let open = match (*left_closed, latex) {
                (true, false) => "[",
                (false, false) => "(",
                (true, true) => "\\left[",
                (false, true) => "\\left(",
            };
            let close = match (*right_closed, latex) {
                (true, false) => "]",
                (false, false) => ")",
                (true, true) => "\\right]",
                (false, true) => "\\right)",
            };
            f.write_str(open)?;
            join(f, children, ", ", latex)?;
            f.write_str(close)?;
        },
        (Operator::SetDifference, _) => join(f, children, if latex { " \\setminus " } else { " \\ " }, latex)?,
    }

    for decorator in expr.decorators() {
        f.write_str(close_bracket(*decorator, latex))?;
    }
    Ok(())
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_expr(f, self, false)
    }
}

impl Expression {
    /// Renders the expression as LaTeX. The output is meant for display and does not parse back
    /// into the same expression.
    pub fn to_latex(&self) -> String {
        let mut out = String::new();
        // writing into a `String` cannot fail
        let _ = write_expr(&mut out, self, true);
        out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use super::super::build::*;

    #[test]
    fn sign_between_numbers() {
        assert!(product_sign_required(&xp(2), &xp(3)));
        assert!(product_sign_required(&var("x"), &xp(3)));
        assert!(product_sign_required(&var("x"), &fraction_of(xp(1), xp(2))));
        assert!(product_sign_required(&var("x"), &power_of(xp(2), xp(3))));
    }

    #[test]
    fn juxtaposition() {
        assert!(!product_sign_required(&xp(2), &var("x")));
        assert!(!product_sign_required(&xp(2), &square_root_of(xp(3))));
        assert!(!product_sign_required(&var("x"), &square_root_of(xp(3))));
        assert!(!product_sign_required(&var("x"), &var("y")));
        assert!(!product_sign_required(&xp(2), &power_of(var("x"), xp(2))));
        assert!(!product_sign_required(&fraction_of(xp(1), xp(2)), &var("x")));
    }

    #[test]
    fn ambiguous_neighbours() {
        assert!(product_sign_required(&var("x"), &var("x")));
        assert!(product_sign_required(&square_root_of(xp(2)), &var("x")));
        assert!(product_sign_required(&square_root_of(xp(2)), &square_root_of(xp(3))));
        assert!(product_sign_required(&var("x"), &divide_by(var("y"))));
    }

    #[test]
    fn brackets_remove_the_need_for_a_sign() {
        let bracket = sum_of(vec![var("x"), xp(1)]).bracketed();
        assert!(!product_sign_required(&bracket, &var("y")));
        assert!(!product_sign_required(&xp(2), &bracket));
        assert!(product_sign_required(&bracket, &xp(2)));
    }

    #[test]
    fn partial_products_look_at_their_edges() {
        let partial = product_of(vec![var("a"), xp(2)]).decorate(Decorator::PartialBracket);
        assert!(!product_sign_required(&partial, &var("b")));
        assert!(product_sign_required(&var("a"), &partial));
    }

    #[test]
    fn solver_text() {
        let expr = product_of(vec![
            sum_of(vec![xp(3), xp(2)]).bracketed(),
            xp(4),
            divide_by(xp(25)),
        ]);
        assert_eq!(expr.to_string(), "(3 + 2) * 4 : 25");

        let expr = sum_of(vec![var("x"), neg_of(var("y")), plus_minus_of(xp(1))]);
        assert_eq!(expr.to_string(), "x - y +/- 1");

        let expr = square_root_of(sum_of(vec![
            power_of(var("b"), xp(2)),
            neg_of(product_of(vec![xp(4), var("a"), var("c")])),
        ]));
        assert_eq!(expr.to_string(), "sqrt[[b ^ 2] - 4 a c]");

        let expr = set_solution_of(vec![var("x")], set_of(vec![xp(1), xp(-2)]));
        assert_eq!(expr.to_string(), "SetSolution[x : {1, -2}]");
    }

    #[test]
    fn nested_decorators() {
        let expr = xp(1).decorate(Decorator::SquareBracket).decorate(Decorator::CurlyBracket);
        assert_eq!(expr.to_string(), "{.[.1.].}");
    }

    #[test]
    fn latex() {
        let expr = sum_of(vec![
            fraction_of(xp(3), xp(5)),
            neg_of(root_of(var("x"), xp(3))),
        ]);
        assert_eq!(expr.to_latex(), "\\frac{3}{5} - \\sqrt[3]{x}");

        let expr = product_of(vec![xp(2), xp(3), divide_by(var("x"))]);
        assert_eq!(expr.to_latex(), "2 \\cdot 3 \\div x");

        let expr = power_of(sum_of(vec![var("x"), xp(1)]), xp(2));
        assert_eq!(expr.to_latex(), "{\\left(x + 1\\right)}^{2}");
    }

    #[test]
    fn solution_sets() {
        let below = interval_of(neg_of(infinity()), false, xp(3), true);
        assert_eq!(below.to_string(), "(-/infinity/, 3]");
        assert_eq!(below.to_latex(), "\\left(-\\infty, 3\\right]");

        let solution = set_solution_of(vec![var("x")], set_difference_of(reals(), set_of(vec![xp(2)])));
        assert_eq!(solution.to_string(), "SetSolution[x : /reals/ \\ {2}]");
        assert_eq!(solution.to_latex(), "x \\in \\mathbb{R} \\setminus \\left\\{2\\right\\}");
        assert_eq!(set_solution_of(vec![var("x")], set_of(Vec::new())).to_latex(), "x \\in \\emptyset");
    }
}
