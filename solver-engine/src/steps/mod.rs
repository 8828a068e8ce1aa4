//! Composable strategies that produce steps.
//!
//! A [`StepsProducer`] takes a subexpression and returns the steps that rewrite it, or
//! [`None`] if it does not apply. An empty list of steps is never returned: a producer that
//! applies always does something.
//!
//! Strategies are built from [`Method`]s (rules, plans and task sets) with the combinators of
//! this module: [`pipeline`], [`first_of`], [`while_possible`], [`deeply`],
//! [`apply_to_children_in_step`], [`select_by_context`] and [`apply_to`].

mod apply_to;
mod deeply;
mod first_of;
mod in_step;
mod pipeline;
mod selector;
mod while_possible;

use crate::{
    context::Context,
    mapped::MappedExpression,
    path::Subexpression,
    transformation::Transformation,
};
use std::sync::Arc;
use tracing::trace;

pub use apply_to::{apply_to, child, ApplyTo, Extractor};
pub use deeply::{deeply, Deeply};
pub use first_of::{first_of, FirstOf};
pub use in_step::{apply_to_children_in_step, ApplyToChildrenInStep, InStepItem};
pub use pipeline::{optional, pipeline, step, Pipeline, PipelineItem};
pub use selector::{select_by_context, Alternative, ContextSensitiveSelector};
pub use while_possible::{while_possible, WhilePossible};

/// A strategy producing the steps that rewrite a subexpression.
pub trait StepsProducer: Send + Sync {
    /// Returns the steps rewriting `sub`, or [`None`] if the strategy does not apply. The
    /// returned list is never empty.
    fn produce_steps(&self, ctx: &Context, sub: &Subexpression) -> Option<Vec<Transformation>>;
}

/// A shared strategy.
pub type Producer = Arc<dyn StepsProducer>;

/// Something that rewrites a subexpression in a single transformation.
pub trait Method: Send + Sync {
    /// Returns the transformation rewriting `sub`, or [`None`] if the method does not apply.
    fn try_execute(&self, ctx: &Context, sub: &Subexpression) -> Option<Transformation>;
}

/// Accumulates the steps of a composite strategy.
///
/// Steps may rewrite any subexpression below the root of the builder. Such steps are lifted to
/// the root: they are wrapped in a transformation of the whole expression, whose mappings are
/// those of the step moved below the step's relative path. This keeps every step a rewrite of
/// the whole expression, so the result of the last step is the result of the strategy.
///
/// Once the expression becomes [`Operator::Undefined`](crate::expr::Operator::Undefined), no
/// further steps are accepted.
#[derive(Debug)]
pub struct StepsBuilder {
    current: Subexpression,
    steps: Vec<Transformation>,
}

impl StepsBuilder {
    pub fn new(sub: &Subexpression) -> Self {
        Self { current: sub.clone(), steps: Vec::new() }
    }

    /// The expression as rewritten by the steps added so far.
    pub fn last_sub(&self) -> &Subexpression {
        &self.current
    }

    /// Returns true if the expression became undefined.
    pub fn is_undefined(&self) -> bool {
        self.current.expr.is_undefined()
    }

    /// Adds a step rewriting the current expression or one of its descendants.
    pub fn add_step(&mut self, step: Transformation) {
        if self.is_undefined() {
            return;
        }
        let step = self.lift(step);
        self.current = Subexpression::new(step.to_expr.expr.clone(), self.current.path.clone());
        self.steps.push(step);
    }

    /// Adds a sequence of steps, in order.
    pub fn add_steps(&mut self, steps: impl IntoIterator<Item = Transformation>) {
        for step in steps {
            self.add_step(step);
        }
    }

    /// The steps, or [`None`] if there are none.
    pub fn finish(self) -> Option<Vec<Transformation>> {
        (!self.steps.is_empty()).then_some(self.steps)
    }

    fn lift(&self, step: Transformation) -> Transformation {
        let root = &self.current.path;
        if step.from_expr.path == *root {
            return step;
        }
        let Some(relative) = step.from_expr.path.strip_prefix(root) else {
            trace!(target: "steps", path = %step.from_expr.path, root = %root, "step outside of its strategy's root");
            return step;
        };

        let result = if step.to_expr.expr.is_undefined() {
            step.to_expr.expr.clone()
        } else {
            self.current
                .substitute(&step.from_expr.path, step.to_expr.expr.clone())
                .unwrap_or_else(|| self.current.expr.clone())
        };
        let mappings = step
            .to_expr
            .mappings
            .iter()
            .map(|mapping| mapping.relativize(&relative, &relative))
            .collect();

        Transformation {
            kind: step.kind,
            from_expr: self.current.clone(),
            to_expr: MappedExpression::new(result, mappings),
            steps: None,
            tasks: None,
            explanation: step.explanation.clone(),
            skills: step.skills.clone(),
            tags: step.tags.clone(),
        }
        .wrapping(step)
    }
}

impl Transformation {
    /// Sets the only substep of a lifted step.
    fn wrapping(mut self, inner: Transformation) -> Self {
        self.steps = Some(vec![inner]);
        self
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Producers used by the tests of the combinators.

    use crate::{
        builder::ExpressionBuilder,
        expr::build::{int, xp},
        metadata::Metadata,
        pattern::*,
        rule::{Rule, RuleResult},
    };
    use std::sync::Arc;

    /// Adds the first two integers of a sum.
    pub fn add_integers() -> Arc<Rule> {
        let a = unsigned_integer();
        let b = unsigned_integer();
        let sum = sum_containing(vec![a.clone(), b.clone()]);
        Arc::new(Rule::new(sum.pattern(), move |builder: &ExpressionBuilder<'_>| {
            let total = builder.integer_op(&a, &b, |a, b| a.clone() + b)?;
            let to_expr = builder.substitute(&sum, vec![total])?;
            Some(RuleResult::new(to_expr, Metadata::key("Test.AddIntegers")))
        }))
    }

    /// Multiplies the first two integers of a product.
    pub fn multiply_integers() -> Arc<Rule> {
        let a = unsigned_integer();
        let b = unsigned_integer();
        let product = product_containing(vec![a.clone(), b.clone()]);
        Arc::new(Rule::new(product.pattern(), move |builder: &ExpressionBuilder<'_>| {
            let total = builder.integer_op(&a, &b, |a, b| a.clone() * b)?;
            let to_expr = builder.substitute(&product, vec![total])?;
            Some(RuleResult::new(to_expr, Metadata::key("Test.MultiplyIntegers")))
        }))
    }

    /// Rewrites a fraction with a zero denominator to undefined.
    pub fn zero_denominator() -> Arc<Rule> {
        let pattern = fraction_of(any(), fixed(xp(0)));
        Arc::new(Rule::new(pattern, |builder: &ExpressionBuilder<'_>| {
            let undefined = builder.introduce(crate::expr::build::undefined());
            Some(RuleResult::new(undefined, Metadata::key("Test.ZeroDenominator")))
        }))
    }

    /// Rewrites any integer to its successor.
    pub fn increment() -> Arc<Rule> {
        let n = unsigned_integer();
        Arc::new(Rule::new(n.clone(), move |builder: &ExpressionBuilder<'_>| {
            let value = builder.integer_value(&n)?;
            let next = builder.transform(&n, int(value + 1));
            Some(RuleResult::new(next, Metadata::key("Test.Increment")))
        }))
    }
}
