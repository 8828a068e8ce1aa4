use crate::{context::Context, path::Subexpression, transformation::Transformation};
use std::sync::Arc;
use tracing::debug;
use super::{Producer, StepsBuilder, StepsProducer};

/// Runs a strategy on its own result until it no longer applies.
///
/// There is no limit on the number of iterations: the strategy must eventually stop
/// applying.
pub struct WhilePossible {
    pub producer: Producer,
}

/// Creates a [`WhilePossible`].
pub fn while_possible(producer: Producer) -> Producer {
    Arc::new(WhilePossible { producer })
}

impl StepsProducer for WhilePossible {
    fn produce_steps(&self, ctx: &Context, sub: &Subexpression) -> Option<Vec<Transformation>> {
        let mut builder = StepsBuilder::new(sub);
        let mut iterations = 0usize;
        while !builder.is_undefined() {
            let Some(steps) = self.producer.produce_steps(ctx, builder.last_sub()) else {
                break;
            };
            builder.add_steps(steps);
            iterations += 1;
        }
        debug!(target: "steps", iterations, "while possible done");
        builder.finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::steps::{deeply, fixtures::*};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use super::*;

    /// Fails the test if the wrapped producer runs more often than allowed.
    struct Capped {
        producer: Producer,
        runs: AtomicUsize,
        cap: usize,
    }

    impl StepsProducer for Capped {
        fn produce_steps(&self, ctx: &Context, sub: &Subexpression) -> Option<Vec<Transformation>> {
            let runs = self.runs.fetch_add(1, Ordering::Relaxed);
            assert!(runs < self.cap, "strategy did not terminate after {} iterations", self.cap);
            self.producer.produce_steps(ctx, sub)
        }
    }

    fn capped(producer: Producer, cap: usize) -> Producer {
        Arc::new(Capped { producer, runs: AtomicUsize::new(0), cap })
    }

    #[test]
    fn repeats_until_done() {
        let ctx = Context::default();
        let producer = while_possible(capped(deeply(add_integers(), false), 10));
        let sub = Subexpression::root("1 + 2 + 3 + 4".parse().unwrap());
        let steps = producer.produce_steps(&ctx, &sub).unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[2].result().to_string(), "10");
    }

    #[test]
    #[should_panic(expected = "did not terminate")]
    fn non_terminating_strategy_hits_the_cap() {
        let ctx = Context::default();
        let producer = while_possible(capped(increment(), 50));
        let _ = producer.produce_steps(&ctx, &Subexpression::root("1".parse().unwrap()));
    }

    #[test]
    fn never_applicable_is_none() {
        let ctx = Context::default();
        let producer = while_possible(add_integers());
        assert!(producer.produce_steps(&ctx, &Subexpression::root("x".parse().unwrap())).is_none());
    }
}
