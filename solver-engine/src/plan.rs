//! Pattern-gated, multi-step strategies.

use crate::{
    builder::ExpressionBuilder,
    context::Context,
    metadata::{Metadata, MetadataKey},
    path::Subexpression,
    pattern::{Match, Pattern},
    steps::{Method, Producer, StepsProducer},
    transformation::{Transformation, TransformationKind},
};
use std::{fmt, sync::Arc};
use tracing::debug;

/// Builds an explanation or skill from the match of a plan's pattern.
pub type MetadataFn = Arc<dyn Fn(&ExpressionBuilder<'_>) -> Option<Metadata> + Send + Sync>;

/// Wraps a function building metadata.
pub fn metadata_fn(
    f: impl Fn(&ExpressionBuilder<'_>) -> Option<Metadata> + Send + Sync + 'static,
) -> MetadataFn {
    Arc::new(f)
}

/// An explanation with no parameters.
pub fn explanation(key: impl Into<MetadataKey>) -> MetadataFn {
    let key = key.into();
    metadata_fn(move |_| Some(Metadata::key(key.clone())))
}

/// The configuration of a [`Plan`].
pub struct PlanSpec {
    /// The shape the whole subexpression must have for the plan to apply. Any expression if
    /// [`None`].
    pub pattern: Option<Pattern>,

    /// The shape the result must have, unless it is undefined.
    pub result_pattern: Option<Pattern>,

    pub explanation: Option<MetadataFn>,
    pub skills: Vec<MetadataFn>,
    pub steps: Producer,
}

impl PlanSpec {
    /// A plan running `steps` on any expression.
    pub fn new(steps: Producer) -> Self {
        Self { pattern: None, result_pattern: None, explanation: None, skills: Vec::new(), steps }
    }

    pub fn pattern(mut self, pattern: impl Into<Pattern>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn result_pattern(mut self, pattern: impl Into<Pattern>) -> Self {
        self.result_pattern = Some(pattern.into());
        self
    }

    pub fn explanation(mut self, explanation: MetadataFn) -> Self {
        self.explanation = Some(explanation);
        self
    }

    pub fn skill(mut self, skill: MetadataFn) -> Self {
        self.skills.push(skill);
        self
    }
}

/// A strategy that applies to the expressions matching a pattern, and succeeds if its steps
/// lead to an expression matching its result pattern.
///
/// The transformation of a plan is composite: its steps are the steps produced by its
/// strategy, and its result is the result of the last step. A plan whose steps lead to an
/// undefined expression succeeds whatever its result pattern.
pub struct Plan {
    spec: PlanSpec,
}

impl Plan {
    pub fn new(spec: PlanSpec) -> Self {
        Self { spec }
    }
}

impl fmt::Debug for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan")
            .field("pattern", &self.spec.pattern)
            .field("result_pattern", &self.spec.result_pattern)
            .finish_non_exhaustive()
    }
}

impl Method for Plan {
    fn try_execute(&self, ctx: &Context, sub: &Subexpression) -> Option<Transformation> {
        let m = match &self.spec.pattern {
            Some(pattern) => match pattern.first_match(ctx, sub) {
                Some(m) => m,
                None => {
                    debug!(target: "plan", expr = %sub.expr, "pattern rejected");
                    return None;
                },
            },
            None => Match::empty(),
        };

        let steps = self.spec.steps.produce_steps(ctx, sub)?;
        let step = Transformation::composite(TransformationKind::Plan, sub.clone(), steps)?;

        let result = step.result();
        if !result.is_undefined() {
            if let Some(result_pattern) = &self.spec.result_pattern {
                let to = Subexpression::new(result.clone(), sub.path.clone());
                if !result_pattern.matches(ctx, &to) {
                    debug!(target: "plan", from = %sub.expr, to = %result, "result pattern rejected");
                    return None;
                }
            }
        }

        let builder = ExpressionBuilder::new(ctx, sub, &m);
        let explanation = self.spec.explanation.as_ref().and_then(|f| f(&builder));
        let skills = self.spec.skills.iter().filter_map(|f| f(&builder)).collect();
        debug!(
            target: "plan",
            explanation = explanation.as_ref().map(|e| e.key.as_str()).unwrap_or("-"),
            from = %sub.expr,
            to = %step.result(),
            "plan applied",
        );
        Some(step.with_explanation(explanation).with_skills(skills))
    }
}

impl StepsProducer for Plan {
    fn produce_steps(&self, ctx: &Context, sub: &Subexpression) -> Option<Vec<Transformation>> {
        self.try_execute(ctx, sub).map(|step| vec![step])
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        pattern::*,
        steps::{deeply, fixtures::*, while_possible},
    };
    use pretty_assertions::assert_eq;
    use super::*;

    fn sub(src: &str) -> Subexpression {
        Subexpression::root(src.parse().unwrap())
    }

    fn evaluate_sums() -> Plan {
        Plan::new(
            PlanSpec::new(while_possible(deeply(add_integers(), false)))
                .explanation(explanation("Test.EvaluateSums"))
                .result_pattern(constant()),
        )
    }

    #[test]
    fn composite_result_is_last_step() {
        let ctx = Context::default();
        let step = evaluate_sums().try_execute(&ctx, &sub("1 + 2 + 3")).unwrap();
        let steps = step.steps.as_ref().unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].result().to_string(), "3 + 3");
        assert_eq!(step.result().to_string(), "6");
        assert_eq!(step.result(), steps[1].result());
        assert_eq!(step.explanation.as_ref().unwrap().key.as_str(), "Test.EvaluateSums");
    }

    #[test]
    fn result_pattern_is_a_post_condition() {
        let ctx = Context::default();
        assert!(evaluate_sums().try_execute(&ctx, &sub("1 + 2 + x")).is_none());
    }

    #[test]
    fn pattern_gates_the_plan() {
        let ctx = Context::default();
        let plan = Plan::new(
            PlanSpec::new(while_possible(add_integers())).pattern(sum_of(vec![any(), any()])),
        );
        assert!(plan.try_execute(&ctx, &sub("1 + 2 + 3")).is_none());
        assert!(plan.try_execute(&ctx, &sub("1 + 2")).is_some());
    }

    #[test]
    fn undefined_passes_the_result_pattern() {
        let ctx = Context::default();
        let plan = Plan::new(PlanSpec::new(deeply(zero_denominator(), false)).result_pattern(unsigned_integer()));
        let step = plan.try_execute(&ctx, &sub("1 + [1 / 0]")).unwrap();
        assert!(step.result().is_undefined());
    }
}
