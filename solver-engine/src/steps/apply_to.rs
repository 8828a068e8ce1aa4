use crate::{context::Context, path::Subexpression, transformation::Transformation};
use std::sync::Arc;
use super::{Producer, StepsBuilder, StepsProducer};

/// Picks the subexpression a strategy runs on.
pub type Extractor = Arc<dyn Fn(&Subexpression) -> Option<Subexpression> + Send + Sync>;

/// Extracts the `n`th child, such as the numerator of a fraction.
pub fn child(n: usize) -> Extractor {
    Arc::new(move |sub| sub.nth_child(n))
}

/// Runs a strategy on the subexpression picked by an extractor.
pub struct ApplyTo {
    pub extractor: Extractor,
    pub producer: Producer,
}

/// Creates an [`ApplyTo`].
pub fn apply_to(extractor: Extractor, producer: Producer) -> Producer {
    Arc::new(ApplyTo { extractor, producer })
}

impl StepsProducer for ApplyTo {
    fn produce_steps(&self, ctx: &Context, sub: &Subexpression) -> Option<Vec<Transformation>> {
        let target = (self.extractor)(sub)?;
        let mut builder = StepsBuilder::new(sub);
        builder.add_steps(self.producer.produce_steps(ctx, &target)?);
        builder.finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::steps::fixtures::*;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn runs_on_the_extracted_child() {
        let ctx = Context::default();
        let sub = Subexpression::root("[1 + 2 / 3 + 4]".parse().unwrap());
        let steps = apply_to(child(1), add_integers()).produce_steps(&ctx, &sub).unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].result().to_string(), "[1 + 2 / 7]");
        assert!(apply_to(child(2), add_integers()).produce_steps(&ctx, &sub).is_none());
    }
}
