use crate::{context::Context, path::Subexpression, transformation::Transformation};
use std::sync::Arc;
use super::{Producer, StepsBuilder, StepsProducer};

/// Runs a strategy at the first place in the tree where it applies.
///
/// The tree is visited in prefix order (the root before its children), or in postfix order
/// if `deep_first` is set. Only the first successful application is kept.
pub struct Deeply {
    pub producer: Producer,
    pub deep_first: bool,
}

/// Creates a [`Deeply`].
pub fn deeply(producer: Producer, deep_first: bool) -> Producer {
    Arc::new(Deeply { producer, deep_first })
}

impl Deeply {
    fn visit(&self, ctx: &Context, sub: &Subexpression) -> Option<Vec<Transformation>> {
        if self.deep_first {
            sub.children()
                .iter()
                .find_map(|child| self.visit(ctx, child))
                .or_else(|| self.producer.produce_steps(ctx, sub))
        } else {
            self.producer
                .produce_steps(ctx, sub)
                .or_else(|| sub.children().iter().find_map(|child| self.visit(ctx, child)))
        }
    }
}

impl StepsProducer for Deeply {
    fn produce_steps(&self, ctx: &Context, sub: &Subexpression) -> Option<Vec<Transformation>> {
        let mut builder = StepsBuilder::new(sub);
        builder.add_steps(self.visit(ctx, sub)?);
        builder.finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{path::Path, steps::fixtures::*};
    use pretty_assertions::assert_eq;
    use super::*;

    fn sub(src: &str) -> Subexpression {
        Subexpression::root(src.parse().unwrap())
    }

    #[test]
    fn prefix_order_fires_on_the_parent() {
        let ctx = Context::default();
        let steps = deeply(add_integers(), false)
            .produce_steps(&ctx, &sub("1 + 2 + (3 + 4)"))
            .unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].leaves()[0].from_expr.path, Path::root());
        assert_eq!(steps[0].result().to_string(), "3 + (3 + 4)");
    }

    #[test]
    fn deep_first_fires_on_the_child_only() {
        let ctx = Context::default();
        let steps = deeply(add_integers(), true)
            .produce_steps(&ctx, &sub("1 + 2 + (3 + 4)"))
            .unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].from_expr.path, Path::root());
        assert_eq!(steps[0].leaves()[0].from_expr.path, "./2".parse::<Path>().unwrap());
        assert_eq!(steps[0].result().to_string(), "1 + 2 + 7");
    }
}
