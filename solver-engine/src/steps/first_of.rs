use crate::{context::Context, path::Subexpression, transformation::Transformation};
use std::sync::Arc;
use super::{Producer, StepsProducer};

/// Runs the first option that applies.
pub struct FirstOf {
    pub options: Vec<Producer>,
}

/// Creates a [`FirstOf`].
pub fn first_of(options: Vec<Producer>) -> Producer {
    Arc::new(FirstOf { options })
}

impl StepsProducer for FirstOf {
    fn produce_steps(&self, ctx: &Context, sub: &Subexpression) -> Option<Vec<Transformation>> {
        self.options
            .iter()
            .find_map(|option| option.produce_steps(ctx, sub))
    }
}
