use crate::{
    context::{Context, ResourceData},
    path::Subexpression,
    transformation::Transformation,
};
use std::sync::Arc;
use tracing::debug;
use super::{Producer, StepsProducer};

/// A strategy meant for the contexts described by its resource data.
#[derive(Clone)]
pub struct Alternative {
    pub producer: Producer,
    pub resource: ResourceData,
}

/// Runs the alternative whose resource data best fits the context, or the default strategy
/// if no alternative scores better than it.
pub struct ContextSensitiveSelector {
    pub default: Producer,
    pub alternatives: Vec<Alternative>,
}

/// Creates a [`ContextSensitiveSelector`].
pub fn select_by_context(default: Producer, alternatives: Vec<Alternative>) -> Producer {
    Arc::new(ContextSensitiveSelector { default, alternatives })
}

impl ContextSensitiveSelector {
    /// The index of the selected alternative, or [`None`] for the default.
    fn select(&self, ctx: &Context) -> Option<usize> {
        let mut best = (0, None);
        for (index, alternative) in self.alternatives.iter().enumerate() {
            if let Some(score) = alternative.resource.score(ctx) {
                if score > best.0 {
                    best = (score, Some(index));
                }
            }
        }
        best.1
    }
}

impl StepsProducer for ContextSensitiveSelector {
    fn produce_steps(&self, ctx: &Context, sub: &Subexpression) -> Option<Vec<Transformation>> {
        let selected = self.select(ctx);
        debug!(target: "steps", alternative = ?selected, "context selected strategy");
        match selected {
            Some(index) => self.alternatives[index].producer.produce_steps(ctx, sub),
            None => self.default.produce_steps(ctx, sub),
        }
    }
}
