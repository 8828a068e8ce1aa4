//! The environment rule and plan bodies use to build their results from a match.

use crate::{
    context::Context,
    expr::{build, Comparator, Expression, Operator},
    mapped::{self, MappedExpression},
    mapping::{PathMapping, PathMappingType},
    metadata::{Metadata, MetadataKey},
    pattern::{Match, NaryPattern, OptionalDivideBy, OptionalNeg, Pattern},
    path::{Path, Subexpression},
};
use rug::Integer;

/// Gives access to the bindings of a match, and builds [`MappedExpression`]s that record how
/// each part of the result relates to the matched expression.
///
/// All `from` paths produced by the builder are relative to the matched subexpression.
#[derive(Debug, Clone, Copy)]
pub struct ExpressionBuilder<'a> {
    ctx: &'a Context,
    sub: &'a Subexpression,
    m: &'a Match,
}

impl<'a> ExpressionBuilder<'a> {
    pub fn new(ctx: &'a Context, sub: &'a Subexpression, m: &'a Match) -> Self {
        Self { ctx, sub, m }
    }

    /// The context of the request.
    pub fn ctx(&self) -> &'a Context {
        self.ctx
    }

    /// The subexpression being rewritten.
    pub fn expression(&self) -> &'a Subexpression {
        self.sub
    }

    /// The match being built from.
    pub fn matched(&self) -> &'a Match {
        self.m
    }

    fn local(&self, path: &Path) -> Path {
        path.strip_prefix(&self.sub.path).unwrap_or_else(|| path.clone())
    }

    /// Every place the pattern was bound, relative to the matched subexpression.
    pub fn paths_of(&self, pattern: &impl AsRef<Pattern>) -> Vec<Path> {
        self.m
            .get_bound_paths(pattern)
            .iter()
            .map(|path| self.local(path))
            .collect()
    }

    fn paths_of_all(&self, patterns: &[&Pattern]) -> Vec<Path> {
        patterns.iter().flat_map(|pattern| self.paths_of(pattern)).collect()
    }

    fn mapped_from(&self, from_paths: Vec<Path>, kind: PathMappingType, expr: Expression) -> MappedExpression {
        MappedExpression::new(expr, vec![PathMapping::new(from_paths, kind, vec![Path::root()])])
    }

    /// The last place the pattern was bound, with a mapping of the given type.
    fn take(&self, pattern: &impl AsRef<Pattern>, kind: PathMappingType) -> Option<MappedExpression> {
        let bound = self.m.get_last_binding(pattern)?;
        Some(self.mapped_from(vec![self.local(&bound.path)], kind, bound.expr.clone()))
    }

    /// The value bound to the pattern, as it is.
    pub fn get_expr(&self, pattern: &impl AsRef<Pattern>) -> Option<Expression> {
        self.m.get_bound_expr(pattern).cloned()
    }

    /// Returns true if the pattern is bound.
    pub fn is_bound(&self, pattern: &impl AsRef<Pattern>) -> bool {
        self.m.is_bound(pattern)
    }

    /// The integer value bound to the pattern.
    pub fn integer_value(&self, pattern: &impl AsRef<Pattern>) -> Option<Integer> {
        self.m.integer_value(pattern)
    }

    /// Returns true if the negated form of the pattern matched.
    pub fn is_neg(&self, pattern: &OptionalNeg) -> bool {
        pattern.is_neg(self.m)
    }

    /// The bound value, kept in place or shifted along with its siblings.
    pub fn get(&self, pattern: &impl AsRef<Pattern>) -> Option<MappedExpression> {
        self.take(pattern, PathMappingType::Shift)
    }

    /// The bound value, moved to a new place.
    pub fn move_(&self, pattern: &impl AsRef<Pattern>) -> Option<MappedExpression> {
        self.take(pattern, PathMappingType::Move)
    }

    /// The bound value, factored out of every place it was bound.
    pub fn factor(&self, pattern: &impl AsRef<Pattern>) -> Option<MappedExpression> {
        let expr = self.get_expr(pattern)?;
        Some(self.mapped_from(self.paths_of(pattern), PathMappingType::Factor, expr))
    }

    /// The bound value, copied into one of several places.
    pub fn distribute(&self, pattern: &impl AsRef<Pattern>) -> Option<MappedExpression> {
        let expr = self.get_expr(pattern)?;
        Some(self.mapped_from(self.paths_of(pattern), PathMappingType::Distribute, expr))
    }

    /// A new expression, not derived from any part of the source.
    pub fn introduce(&self, expr: Expression) -> MappedExpression {
        self.mapped_from(Vec::new(), PathMappingType::Introduce, expr)
    }

    /// A new expression derived from the bound values of the patterns.
    pub fn introduce_from(&self, from: &[&Pattern], expr: Expression) -> MappedExpression {
        self.mapped_from(self.paths_of_all(from), PathMappingType::Introduce, expr)
    }

    /// Records that the bound values of the patterns were removed, and returns `kept`.
    pub fn cancel(&self, cancelled: &[&Pattern], kept: MappedExpression) -> MappedExpression {
        let mut kept = kept;
        kept.mappings.push(PathMapping::new(
            self.paths_of_all(cancelled),
            PathMappingType::Cancel,
            Vec::new(),
        ));
        kept
    }

    /// A new expression that the bound value of the pattern was rewritten into.
    pub fn transform(&self, pattern: &impl AsRef<Pattern>, expr: Expression) -> MappedExpression {
        self.mapped_from(self.paths_of(pattern), PathMappingType::Transform, expr)
    }

    /// A rewrite of the bound value of the pattern into an expression built from other parts
    /// of the match. The mappings of `to` are replaced by one mapping from the pattern.
    pub fn transform_to(&self, pattern: &impl AsRef<Pattern>, to: MappedExpression) -> MappedExpression {
        self.transform(pattern, to.expr)
    }

    /// A new expression that the bound values of the patterns were combined into.
    pub fn combine(&self, from: &[&Pattern], expr: Expression) -> MappedExpression {
        self.mapped_from(self.paths_of_all(from), PathMappingType::Combine, expr)
    }

    /// Combines two bound integers into the result of `op`.
    pub fn integer_op(
        &self,
        a: &impl AsRef<Pattern>,
        b: &impl AsRef<Pattern>,
        op: impl FnOnce(&Integer, &Integer) -> Integer,
    ) -> Option<MappedExpression> {
        let (x, y) = (self.integer_value(a)?, self.integer_value(b)?);
        Some(self.combine(&[a.as_ref(), b.as_ref()], build::int(op(&x, &y))))
    }

    /// Rewrites a bound integer into the result of `op`.
    pub fn integer_op1(
        &self,
        a: &impl AsRef<Pattern>,
        op: impl FnOnce(&Integer) -> Integer,
    ) -> Option<MappedExpression> {
        let x = self.integer_value(a)?;
        Some(self.transform(a, build::int(op(&x))))
    }

    /// Negates `to` if the negated form of `from` matched.
    pub fn copy_sign(&self, from: &OptionalNeg, to: MappedExpression) -> MappedExpression {
        if self.is_neg(from) {
            mapped::neg_of(to)
        } else {
            to
        }
    }

    /// Turns `to` into a divide-by term if the divide-by form of `from` matched.
    pub fn copy_divide_by(&self, from: &OptionalDivideBy, to: MappedExpression) -> MappedExpression {
        if from.is_divide_by(self.m) {
            mapped::divide_by(to)
        } else {
            to
        }
    }

    /// The comparator of the inequality bound to the pattern.
    pub fn comparator(&self, pattern: &impl AsRef<Pattern>) -> Option<Comparator> {
        match self.m.get_bound_expr(pattern)?.operator() {
            Operator::Inequality(comparator) => Some(*comparator),
            _ => None,
        }
    }

    /// The matched sum or product without the children its operands matched.
    pub fn rest_of(&self, nary: &NaryPattern) -> Option<MappedExpression> {
        nary.rest(self.m, &self.sub.path)
    }

    /// The matched sum or product with the children its operands matched replaced.
    pub fn substitute(&self, nary: &NaryPattern, replacements: Vec<MappedExpression>) -> Option<MappedExpression> {
        nary.substitute(self.m, &self.sub.path, replacements)
    }

    /// An explanation or skill whose parameters are the bound values of the patterns.
    pub fn metadata(&self, key: impl Into<MetadataKey>, params: &[&Pattern]) -> Option<Metadata> {
        let params = params
            .iter()
            .map(|pattern| self.get(pattern))
            .collect::<Option<Vec<_>>>()?;
        Some(Metadata::new(key, params))
    }
}
