use crate::{
    context::Context,
    mapped::MappedExpression,
    mapping::merge_path_mappings,
    metadata::Metadata,
    path::Subexpression,
    transformation::{Transformation, TransformationKind},
};
use std::{collections::BTreeSet, sync::Arc};
use super::{Producer, StepsBuilder, StepsProducer};

/// A strategy run on every child by [`ApplyToChildrenInStep`], with the explanation of the
/// step grouping its results.
#[derive(Clone)]
pub struct InStepItem {
    pub producer: Producer,
    pub explanation: Metadata,
    pub optional: bool,
}

impl InStepItem {
    pub fn new(producer: Producer, explanation: Metadata) -> Self {
        Self { producer, explanation, optional: false }
    }

    /// Makes the item optional: it may apply to no child at all.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Runs each item on every child of the expression, grouping the results of one item in a
/// single step.
///
/// An item that applies to no child fails the whole strategy, unless it is optional.
pub struct ApplyToChildrenInStep {
    pub items: Vec<InStepItem>,
}

/// Creates an [`ApplyToChildrenInStep`].
pub fn apply_to_children_in_step(items: Vec<InStepItem>) -> Producer {
    Arc::new(ApplyToChildrenInStep { items })
}

impl ApplyToChildrenInStep {
    /// Runs `item` on each child of `sub`, returning the step that groups the per-child
    /// results.
    fn apply_item(&self, ctx: &Context, item: &InStepItem, sub: &Subexpression) -> Option<Transformation> {
        let mut expr = sub.expr.clone();
        let mut child_steps = Vec::new();
        for child in sub.children() {
            let Some(steps) = item.producer.produce_steps(ctx, &child) else {
                continue;
            };
            let mut builder = StepsBuilder::new(&child);
            builder.add_steps(steps);
            let Some(mut steps) = builder.finish() else {
                continue;
            };
            let step = if steps.len() == 1 {
                steps.remove(0)
            } else {
                Transformation::composite(TransformationKind::Plan, child.clone(), steps)?
            };

            if step.result().is_undefined() {
                expr = step.result().clone();
            } else if !expr.is_undefined() {
                let current = Subexpression::new(expr, sub.path.clone());
                expr = current.substitute(&child.path, step.result().clone())?;
            }
            child_steps.push(step);
        }
        if child_steps.is_empty() {
            return None;
        }

        let mappings = merge_path_mappings(child_steps.iter().flat_map(|step| {
            let relative = step.from_expr.path.strip_prefix(&sub.path).unwrap_or_default();
            step.path_mappings()
                .iter()
                .map(|mapping| mapping.relativize(&relative, &relative))
                .collect::<Vec<_>>()
        }));

        Some(Transformation {
            kind: TransformationKind::Plan,
            from_expr: sub.clone(),
            to_expr: MappedExpression::new(expr, mappings),
            steps: Some(child_steps),
            tasks: None,
            explanation: Some(item.explanation.clone()),
            skills: Vec::new(),
            tags: BTreeSet::new(),
        })
    }
}

impl StepsProducer for ApplyToChildrenInStep {
    fn produce_steps(&self, ctx: &Context, sub: &Subexpression) -> Option<Vec<Transformation>> {
        let mut builder = StepsBuilder::new(sub);
        for item in &self.items {
            if builder.is_undefined() {
                break;
            }
            match self.apply_item(ctx, item, builder.last_sub()) {
                Some(step) => builder.add_step(step),
                None if item.optional => {},
                None => return None,
            }
        }
        builder.finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{path::Path, steps::{deeply, fixtures::*}};
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn groups_per_child_results() {
        let ctx = Context::default();
        let producer = apply_to_children_in_step(vec![
            InStepItem::new(deeply(multiply_integers(), false), Metadata::key("Test.MultiplyEach")),
            InStepItem::new(deeply(zero_denominator(), false), Metadata::key("Test.Never")).optional(),
            InStepItem::new(add_integers(), Metadata::key("Test.AddEach")),
        ]);
        let sub = Subexpression::root("[2 * 3 + 1 / 2 * 5 + 4]".parse().unwrap());
        let steps = producer.produce_steps(&ctx, &sub).unwrap();

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].explanation.as_ref().unwrap().key.as_str(), "Test.MultiplyEach");
        assert_eq!(steps[0].result().to_string(), "[6 + 1 / 10 + 4]");
        let children = steps[0].steps.as_ref().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].from_expr.path, "./0".parse::<Path>().unwrap());
        assert_eq!(children[1].from_expr.path, "./1".parse::<Path>().unwrap());

        assert_eq!(steps[1].result().to_string(), "[7 / 14]");
    }

    #[test]
    fn required_item_that_applies_nowhere_fails() {
        let ctx = Context::default();
        let producer = apply_to_children_in_step(vec![
            InStepItem::new(add_integers(), Metadata::key("Test.AddEach")),
        ]);
        let sub = Subexpression::root("[x / y]".parse().unwrap());
        assert!(producer.produce_steps(&ctx, &sub).is_none());
    }
}
