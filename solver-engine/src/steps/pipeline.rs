use crate::{context::Context, path::Subexpression, transformation::Transformation};
use std::sync::Arc;
use super::{Producer, StepsBuilder, StepsProducer};

/// One stage of a [`Pipeline`].
#[derive(Clone)]
pub struct PipelineItem {
    pub producer: Producer,

    /// Whether the pipeline goes on when this stage does not apply.
    pub optional: bool,
}

/// A required stage.
pub fn step(producer: Producer) -> PipelineItem {
    PipelineItem { producer, optional: false }
}

/// A stage that is skipped when it does not apply.
pub fn optional(producer: Producer) -> PipelineItem {
    PipelineItem { producer, optional: true }
}

/// Runs its stages in order, each on the result of the previous ones. Fails if a required
/// stage does not apply, or if no stage applied at all.
pub struct Pipeline {
    pub items: Vec<PipelineItem>,
}

/// Creates a [`Pipeline`].
pub fn pipeline(items: Vec<PipelineItem>) -> Producer {
    Arc::new(Pipeline { items })
}

impl StepsProducer for Pipeline {
    fn produce_steps(&self, ctx: &Context, sub: &Subexpression) -> Option<Vec<Transformation>> {
        let mut builder = StepsBuilder::new(sub);
        for item in &self.items {
            if builder.is_undefined() {
                break;
            }
            match item.producer.produce_steps(ctx, builder.last_sub()) {
                Some(steps) => builder.add_steps(steps),
                None if item.optional => {},
                None => return None,
            }
        }
        builder.finish()
    }
}
