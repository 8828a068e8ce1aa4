use crate::{general, integer_arithmetic::plans as integer_plans};
use once_cell::sync::Lazy;
use solver_engine::{
    pattern::*,
    plan::{self, metadata_fn, Plan, PlanSpec},
    steps::{deeply, first_of, optional, pipeline, step, while_possible},
};
use std::sync::Arc;
use super::{explanation, rules};

/// Adds two fractions of a sum, or a fraction and an integer, bringing them to a common
/// denominator first if needed. The resulting fraction is simplified.
pub static ADD_FRACTIONS: Lazy<Arc<Plan>> = Lazy::new(|| {
    let sum = sum_containing(Vec::new());
    Arc::new(Plan::new(
        PlanSpec::new(pipeline(vec![
            optional(first_of(vec![
                rules::BRING_TO_COMMON_DENOMINATOR.clone(),
                rules::TURN_SUM_OF_FRACTION_AND_INTEGER_TO_FRACTION_SUM.clone(),
            ])),
            optional(while_possible(deeply(integer_plans::EVALUATE_PRODUCT_OF_INTEGERS.clone(), false))),
            step(rules::ADD_LIKE_FRACTIONS.clone()),
            optional(deeply(integer_plans::EVALUATE_SUM_OF_INTEGERS.clone(), false)),
            optional(deeply(SIMPLIFY_FRACTION.clone(), false)),
        ]))
        .pattern(&sum)
        .explanation(metadata_fn(move |b| b.metadata(explanation::AddFractions, &[sum.as_ref()]))),
    ))
});

/// Reduces a fraction of integers to lowest terms, or to an integer.
pub static SIMPLIFY_FRACTION: Lazy<Arc<Plan>> = Lazy::new(|| {
    Arc::new(Plan::new(
        PlanSpec::new(first_of(vec![
            rules::SIMPLIFY_FRACTION_TO_INTEGER.clone(),
            pipeline(vec![
                step(rules::FIND_COMMON_FACTOR_IN_FRACTION.clone()),
                step(general::CANCEL_COMMON_TERMS.clone()),
                optional(general::SIMPLIFY_FRACTION_WITH_ONE_DENOMINATOR.clone()),
            ]),
        ]))
        .pattern(fraction_of(any(), any()))
        .explanation(plan::explanation(explanation::SimplifyFraction)),
    ))
});

#[cfg(test)]
mod tests {
    use crate::test_util::run;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn add_fractions_with_different_denominators() {
        let step = run(&**ADD_FRACTIONS, "[1 / 4] + [1 / 6]").unwrap();
        let results = step.steps.iter().flatten().map(|s| s.result().to_string()).collect::<Vec<_>>();
        assert_eq!(results, vec![
            "[1 * 3 / 4 * 3] + [1 * 2 / 6 * 2]",
            "[3 / 4 * 3] + [1 * 2 / 6 * 2]",
            "[3 / 12] + [1 * 2 / 6 * 2]",
            "[3 / 12] + [2 / 6 * 2]",
            "[3 / 12] + [2 / 12]",
            "[3 + 2 / 12]",
            "[5 / 12]",
        ]);
    }

    #[test]
    fn sum_is_simplified() {
        let step = run(&**ADD_FRACTIONS, "[1 / 6] + [1 / 6]").unwrap();
        assert_eq!(step.result().to_string(), "[1 / 3]");

        let step = run(&**ADD_FRACTIONS, "[1 / 2] + [1 / 2]").unwrap();
        assert_eq!(step.result().to_string(), "1");
    }

    #[test]
    fn fraction_and_integer() {
        let step = run(&**ADD_FRACTIONS, "2 + [1 / 3]").unwrap();
        let results = step.steps.iter().flatten().map(|s| s.result().to_string()).collect::<Vec<_>>();
        assert_eq!(results, vec!["[2 * 3 / 3] + [1 / 3]", "[6 / 3] + [1 / 3]", "[6 + 1 / 3]", "[7 / 3]"]);
    }

    #[test]
    fn no_fractions() {
        assert!(run(&**ADD_FRACTIONS, "1 + 2").is_none());
    }

    #[test]
    fn simplify_fraction() {
        let step = run(&**SIMPLIFY_FRACTION, "[6 / 9]").unwrap();
        assert_eq!(step.result().to_string(), "[2 / 3]");
        assert_eq!(step.steps.as_ref().unwrap().len(), 2);

        assert_eq!(run(&**SIMPLIFY_FRACTION, "[8 / 4]").unwrap().result().to_string(), "2");
        assert!(run(&**SIMPLIFY_FRACTION, "[2 / 3]").is_none());
    }
}
