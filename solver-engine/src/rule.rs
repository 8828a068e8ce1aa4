//! Single-step, pattern-gated rewrites.

use crate::{
    builder::ExpressionBuilder,
    context::Context,
    mapped::MappedExpression,
    mapping::merge_path_mappings,
    metadata::Metadata,
    path::Subexpression,
    pattern::Pattern,
    steps::{Method, StepsProducer},
    transformation::{Tag, Transformation},
};
use std::{collections::BTreeSet, fmt};
use tracing::{debug, trace};

/// What a rule body returns: the result, with its explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleResult {
    pub to_expr: MappedExpression,
    pub explanation: Metadata,
    pub skills: Vec<Metadata>,
    pub tags: BTreeSet<Tag>,
}

impl RuleResult {
    pub fn new(to_expr: MappedExpression, explanation: Metadata) -> Self {
        Self { to_expr, explanation, skills: Vec::new(), tags: BTreeSet::new() }
    }

    /// Adds a skill exercised by the step.
    pub fn with_skill(mut self, skill: Metadata) -> Self {
        self.skills.push(skill);
        self
    }

    /// Adds a tag.
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.insert(tag);
        self
    }
}

type RuleFn = dyn Fn(&ExpressionBuilder<'_>) -> Option<RuleResult> + Send + Sync;

/// A rewrite of the expressions matching a pattern.
///
/// Only the first match of the pattern is used. The body may still decline to apply by
/// returning [`None`].
pub struct Rule {
    pattern: Pattern,
    result_pattern: Option<Pattern>,
    body: Box<RuleFn>,
}

impl Rule {
    /// Creates a rule applying `body` to the first match of `pattern`.
    pub fn new(
        pattern: impl Into<Pattern>,
        body: impl Fn(&ExpressionBuilder<'_>) -> Option<RuleResult> + Send + Sync + 'static,
    ) -> Self {
        Self { pattern: pattern.into(), result_pattern: None, body: Box::new(body) }
    }

    /// Requires the result of the rule to match `pattern`.
    pub fn with_result_pattern(mut self, pattern: impl Into<Pattern>) -> Self {
        self.result_pattern = Some(pattern.into());
        self
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("pattern", &self.pattern)
            .field("result_pattern", &self.result_pattern)
            .finish_non_exhaustive()
    }
}

impl Method for Rule {
    fn try_execute(&self, ctx: &Context, sub: &Subexpression) -> Option<Transformation> {
        let m = self.pattern.first_match(ctx, sub)?;
        let builder = ExpressionBuilder::new(ctx, sub, &m);
        let result = (self.body)(&builder)?;

        if let Some(result_pattern) = &self.result_pattern {
            let to = Subexpression::new(result.to_expr.expr.clone(), sub.path.clone());
            if !result_pattern.matches(ctx, &to) {
                trace!(target: "rule", explanation = %result.explanation.key, result = %to.expr, "result pattern rejected");
                return None;
            }
        }

        let to_expr = MappedExpression::new(
            result.to_expr.expr,
            merge_path_mappings(result.to_expr.mappings),
        )
        .without_identity_shifts();
        debug!(
            target: "rule",
            explanation = %result.explanation.key,
            path = %sub.path,
            from = %sub.expr,
            to = %to_expr.expr,
            "rule applied",
        );

        let mut step = Transformation::rule(sub.clone(), to_expr, result.explanation);
        step.skills = result.skills;
        step.tags = result.tags;
        Some(step)
    }
}

impl StepsProducer for Rule {
    fn produce_steps(&self, ctx: &Context, sub: &Subexpression) -> Option<Vec<Transformation>> {
        self.try_execute(ctx, sub).map(|step| vec![step])
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        expr::build::*,
        mapping::{PathMapping, PathMappingType},
        path::Path,
        pattern::*,
        transformation::TransformationKind,
    };
    use pretty_assertions::assert_eq;
    use super::*;

    fn path(s: &str) -> Path {
        s.parse().unwrap()
    }

    /// `a + b` to `b + a`
    fn swap() -> Rule {
        let a = any();
        let b = any();
        let pattern = sum_of(vec![a.clone(), b.clone()]);
        Rule::new(pattern, move |builder: &ExpressionBuilder<'_>| {
            let to_expr = crate::mapped::sum_of(vec![builder.move_(&b)?, builder.move_(&a)?]);
            Some(RuleResult::new(to_expr, Metadata::key("Test.Swap")).with_tag(Tag::Rearrangement))
        })
    }

    #[test]
    fn rule_records_moves() {
        let ctx = Context::default();
        let sub = Subexpression::root("x + 1".parse().unwrap());
        let step = swap().try_execute(&ctx, &sub).unwrap();

        assert_eq!(step.kind, TransformationKind::Rule);
        assert_eq!(step.result().to_string(), "1 + x");
        assert_eq!(step.path_mappings(), &[
            PathMapping::new(vec![path("./1")], PathMappingType::Move, vec![path("./0")]),
            PathMapping::new(vec![path("./0")], PathMappingType::Move, vec![path("./1")]),
        ]);
        assert!(step.tags.contains(&Tag::Rearrangement));
        assert_eq!(step.explanation.unwrap().key.as_str(), "Test.Swap");
    }

    #[test]
    fn mappings_are_local_to_the_rewritten_subexpression() {
        let ctx = Context::default();
        let whole = Subexpression::root("[(x + 1) / 2]".parse().unwrap());
        let sub = whole.nth_child(0).unwrap();
        let step = swap().try_execute(&ctx, &sub).unwrap();
        assert_eq!(step.from_expr.path, path("./0"));
        assert_eq!(step.path_mappings()[0].from_paths, vec![path("./1")]);
        assert_eq!(step.global_path_mappings()[0].from_paths, vec![path("./0/1")]);
    }

    #[test]
    fn result_pattern_rejects() {
        let ctx = Context::default();
        let sub = Subexpression::root("x + 1".parse().unwrap());
        let rule = swap().with_result_pattern(sum_of(vec![variable(), any()]));
        assert!(rule.try_execute(&ctx, &sub).is_none());
    }

    #[test]
    fn no_match_is_none() {
        let ctx = Context::default();
        let sub = Subexpression::root(xp(3));
        assert!(swap().try_execute(&ctx, &sub).is_none());
        assert!(swap().produce_steps(&ctx, &sub).is_none());
    }
}
