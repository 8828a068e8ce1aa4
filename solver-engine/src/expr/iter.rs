use super::Expression;

/// An iterator that iteratively traverses the tree of expressions in left-to-right post-order
/// (i.e. depth-first).
///
/// This iterator is created by [`Expression::post_order_iter`].
pub struct ExprIter<'a> {
    /// Nodes whose children have not been pushed yet are paired with `false`.
    stack: Vec<(&'a Expression, bool)>,
}

impl<'a> ExprIter<'a> {
    /// Creates a new iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn new(expr: &'a Expression) -> Self {
        Self {
            stack: vec![(expr, false)],
        }
    }
}

impl<'a> Iterator for ExprIter<'a> {
    type Item = &'a Expression;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (expr, expanded) = self.stack.pop()?;
            if expanded || expr.children().is_empty() {
                return Some(expr);
            }
            self.stack.push((expr, true));
            for child in expr.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::super::build::*;

    #[test]
    fn post_order() {
        let expr = sum_of(vec![xp(1), product_of(vec![xp(2), var("x")]), fraction_of(xp(3), xp(4))]);
        let visited = expr.post_order_iter().map(|e| e.to_string()).collect::<Vec<_>>();
        assert_eq!(visited, vec![
            "1", "2", "x", "2 x", "3", "4", "[3 / 4]", "1 + 2 x + [3 / 4]",
        ]);
    }
}
