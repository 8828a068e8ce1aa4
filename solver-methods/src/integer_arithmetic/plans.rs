use crate::general;
use once_cell::sync::Lazy;
use solver_engine::{
    expr::{build::undefined, Expression, Operator},
    pattern::*,
    plan::{self, metadata_fn, Plan, PlanSpec},
    steps::{deeply, first_of, optional, pipeline, step, while_possible, Producer},
};
use std::sync::Arc;
use super::{explanation, rules};

pub static EVALUATE_PRODUCT_OF_INTEGERS: Lazy<Arc<Plan>> = Lazy::new(|| {
    let product = product_containing(Vec::new());
    Arc::new(Plan::new(
        PlanSpec::new(while_possible(first_of(vec![
            general::EVALUATE_PRODUCT_DIVIDED_BY_ZERO_AS_UNDEFINED.clone(),
            rules::EVALUATE_INTEGER_PRODUCT_AND_DIVISION.clone(),
        ])))
        .pattern(&product)
        .explanation(metadata_fn(move |b| {
            b.metadata(explanation::EvaluateProductOfIntegers, &[product.as_ref()])
        })),
    ))
});

pub static EVALUATE_SUM_OF_INTEGERS: Lazy<Arc<Plan>> = Lazy::new(|| {
    let sum = sum_containing(Vec::new());
    Arc::new(Plan::new(
        PlanSpec::new(while_possible(rules::EVALUATE_SIGNED_INTEGER_ADDITION.clone()))
            .pattern(&sum)
            .explanation(metadata_fn(move |b| {
                b.metadata(explanation::EvaluateSumOfIntegers, &[sum.as_ref()])
            })),
    ))
});

/// Small powers are written out as a product first, so `[2 ^ 4]` becomes `2 * 2 * 2 * 2` and
/// then `16`. Larger ones are evaluated in one step.
pub static EVALUATE_SIGNED_INTEGER_POWER: Lazy<Arc<Plan>> = Lazy::new(|| {
    let base = signed_integer();
    let exponent = signed_integer();
    let power = power_of(&base, &exponent);
    Arc::new(Plan::new(
        PlanSpec::new(first_of(vec![
            general::EVALUATE_ZERO_TO_THE_POWER_OF_ZERO.clone(),
            pipeline(vec![
                step(general::REWRITE_POWER_AS_PRODUCT.clone()),
                step(EVALUATE_PRODUCT_OF_INTEGERS.clone()),
            ]),
            pipeline(vec![
                optional(rules::SIMPLIFY_EVEN_POWER_OF_NEGATIVE.clone()),
                optional(rules::SIMPLIFY_ODD_POWER_OF_NEGATIVE.clone()),
                step(deeply(rules::EVALUATE_INTEGER_POWER_DIRECTLY.clone(), false)),
            ]),
        ]))
        .pattern(power)
        .explanation(metadata_fn(move |b| {
            b.metadata(explanation::EvaluateIntegerPower, &[base.as_ref(), exponent.as_ref()])
        })),
    ))
});

pub static SIMPLIFY_INTEGERS_IN_PRODUCT: Lazy<Arc<Plan>> = Lazy::new(|| {
    let product = product_containing(Vec::new());
    Arc::new(Plan::new(
        PlanSpec::new(while_possible(first_of(vec![
            general::EVALUATE_PRODUCT_DIVIDED_BY_ZERO_AS_UNDEFINED.clone(),
            general::EVALUATE_PRODUCT_CONTAINING_ZERO.clone(),
            rules::EVALUATE_INTEGER_PRODUCT_AND_DIVISION.clone(),
            general::ELIMINATE_ONE_IN_PRODUCT.clone(),
        ])))
        .pattern(&product)
        .explanation(metadata_fn(move |b| {
            b.metadata(explanation::SimplifyIntegersInProduct, &[product.as_ref()])
        })),
    ))
});

pub static SIMPLIFY_INTEGERS_IN_SUM: Lazy<Arc<Plan>> = Lazy::new(|| {
    let sum = sum_containing(Vec::new());
    Arc::new(Plan::new(
        PlanSpec::new(while_possible(first_of(vec![
            rules::EVALUATE_SIGNED_INTEGER_ADDITION.clone(),
            general::ELIMINATE_ZERO_IN_SUM.clone(),
        ])))
        .pattern(&sum)
        .explanation(metadata_fn(move |b| {
            b.metadata(explanation::SimplifyIntegersInSum, &[sum.as_ref()])
        })),
    ))
});

/// One round of evaluation, innermost first.
static EVALUATION_STEPS: Lazy<Producer> = Lazy::new(|| {
    first_of(vec![
        deeply(general::REMOVE_REDUNDANT_BRACKET.clone(), true),
        deeply(general::SIMPLIFY_DOUBLE_MINUS.clone(), true),
        deeply(EVALUATE_SIGNED_INTEGER_POWER.clone(), true),
        deeply(EVALUATE_PRODUCT_OF_INTEGERS.clone(), true),
        deeply(EVALUATE_SUM_OF_INTEGERS.clone(), true),
    ])
});

pub static EVALUATE_ARITHMETIC_SUBEXPRESSION: Lazy<Arc<Plan>> = Lazy::new(|| {
    Arc::new(Plan::new(
        PlanSpec::new(while_possible(EVALUATION_STEPS.clone()))
            .pattern(condition(any(), Expression::has_bracket))
            .explanation(plan::explanation(explanation::SimplifyExpressionInBrackets)),
    ))
});

/// Returns true if the expression is built from integers with signs, sums, products,
/// divisions and powers only.
pub fn is_arithmetic(expr: &Expression) -> bool {
    matches!(
        expr.operator(),
        Operator::Integer(_)
            | Operator::Minus
            | Operator::Plus
            | Operator::DivideBy
            | Operator::Power
            | Operator::Sum
            | Operator::Product
    ) && expr.children().iter().all(is_arithmetic)
}

/// Evaluates an integer expression, brackets first. The result is an integer, or undefined
/// after a division by zero.
pub static EVALUATE_ARITHMETIC_EXPRESSION: Lazy<Arc<Plan>> = Lazy::new(|| {
    let expression = condition(any(), is_arithmetic);
    Arc::new(Plan::new(
        PlanSpec::new(while_possible(first_of(vec![
            deeply(EVALUATE_ARITHMETIC_SUBEXPRESSION.clone(), true),
            EVALUATION_STEPS.clone(),
        ])))
        .pattern(&expression)
        .result_pattern(one_of(vec![signed_integer().into(), fixed(undefined())]))
        .explanation(metadata_fn(move |b| {
            b.metadata(explanation::EvaluateArithmeticExpression, &[&expression])
        })),
    ))
});
