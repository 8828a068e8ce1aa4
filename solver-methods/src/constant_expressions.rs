//! Simplification of expressions without variables, to a fraction or a decimal.

use crate::{
    explanation::keys,
    fraction_arithmetic::{plans as fraction_plans, rules as fraction_rules},
    general,
    integer_arithmetic::plans as integer_plans,
};
use once_cell::sync::Lazy;
use rug::{ops::Pow, Integer};
use solver_engine::{
    context::ResourceData,
    expr::{build::int, number::Decimal, Expression, Operator},
    pattern::*,
    plan::{self, Plan, PlanSpec},
    rule::{Rule, RuleResult},
    steps::{deeply, first_of, optional, pipeline, select_by_context, while_possible, Alternative, Producer},
};
use std::sync::Arc;

pub mod explanation {
    super::keys!("ConstantExpressions";
        /// `[3 / 4]` to `0.75`
        ConvertFractionToDecimal,

        SimplifyConstantExpression,
    );
}

/// The digits and scale of the decimal equal to `numerator / denominator`, if it terminates.
fn terminating_decimal(numerator: &Integer, denominator: &Integer) -> Option<(Integer, usize)> {
    if *denominator <= 0 {
        return None;
    }
    let mut rest = denominator.clone();
    let (mut twos, mut fives) = (0usize, 0usize);
    while rest.is_divisible_u(2) {
        rest /= 2;
        twos += 1;
    }
    while rest.is_divisible_u(5) {
        rest /= 5;
        fives += 1;
    }
    if rest != 1 {
        return None;
    }

    let scale = twos.max(fives);
    let shift = Integer::from(10).pow(u32::try_from(scale).ok()?);
    Some((Integer::from(numerator * shift) / denominator, scale))
}

/// `[a / b]` to the decimal it is equal to, when the decimal terminates.
pub static CONVERT_FRACTION_TO_DECIMAL: Lazy<Arc<Rule>> = Lazy::new(|| {
    let fraction = integer_fraction();
    let pattern = integer_condition2(&fraction, &fraction.numerator, &fraction.denominator, |n, d| {
        terminating_decimal(n, d).is_some()
    });

    Arc::new(Rule::new(pattern, move |b| {
        let (numerator, denominator) = fraction.values(b.matched())?;
        let (digits, scale) = terminating_decimal(&numerator, &denominator)?;
        let decimal = if scale == 0 {
            int(digits)
        } else {
            Expression::leaf(Operator::Decimal(Decimal::new(digits, scale)?)).ok()?
        };
        Some(RuleResult::new(
            b.transform(&fraction, decimal),
            b.metadata(explanation::ConvertFractionToDecimal, &[fraction.as_ref()])?,
        ))
    }))
});

/// Rewrites that tidy up zeros, ones, signs and undefined parts anywhere in the expression.
static SIMPLE_TIDY_UP_STEPS: Lazy<Producer> = Lazy::new(|| {
    deeply(
        first_of(vec![
            general::SIMPLIFY_ZERO_DENOMINATOR_FRACTION_TO_UNDEFINED.clone(),
            general::EVALUATE_ZERO_TO_THE_POWER_OF_ZERO.clone(),
            general::EVALUATE_PRODUCT_DIVIDED_BY_ZERO_AS_UNDEFINED.clone(),
            // zeros
            general::EVALUATE_PRODUCT_CONTAINING_ZERO.clone(),
            general::EVALUATE_ZERO_DIVIDED_BY_ANY_VALUE.clone(),
            general::ELIMINATE_ZERO_IN_SUM.clone(),
            general::SIMPLIFY_ZERO_NUMERATOR_FRACTION_TO_ZERO.clone(),
            general::EVALUATE_ZERO_TO_A_POSITIVE_POWER.clone(),
            general::EVALUATE_EXPRESSION_TO_THE_POWER_OF_ZERO.clone(),
            // ones
            general::SIMPLIFY_FRACTION_WITH_ONE_DENOMINATOR.clone(),
            general::EVALUATE_ONE_TO_ANY_POWER.clone(),
            general::SIMPLIFY_EXPRESSION_TO_THE_POWER_OF_ONE.clone(),
            general::SIMPLIFY_DOUBLE_MINUS.clone(),
            general::CANCEL_ADDITIVE_INVERSE_ELEMENTS.clone(),
            general::REMOVE_REDUNDANT_BRACKET.clone(),
        ]),
        false,
    )
});

/// One round of constant simplification.
pub static CONSTANT_SIMPLIFICATION_STEPS: Lazy<Producer> = Lazy::new(|| {
    first_of(vec![
        SIMPLE_TIDY_UP_STEPS.clone(),
        deeply(
            first_of(vec![
                general::REMOVE_BRACKET_SUM_IN_SUM.clone(),
                general::REMOVE_BRACKET_PRODUCT_IN_PRODUCT.clone(),
            ]),
            false,
        ),
        deeply(fraction_plans::ADD_FRACTIONS.clone(), false),
        deeply(
            first_of(vec![
                fraction_rules::SIMPLIFY_NEGATIVE_NUMERATOR_AND_DENOMINATOR.clone(),
                fraction_rules::SIMPLIFY_NEGATIVE_IN_NUMERATOR.clone(),
                fraction_rules::SIMPLIFY_NEGATIVE_IN_DENOMINATOR.clone(),
                fraction_rules::SIMPLIFY_FRACTION_WITH_FRACTION_NUMERATOR.clone(),
                fraction_rules::SIMPLIFY_FRACTION_WITH_FRACTION_DENOMINATOR.clone(),
            ]),
            false,
        ),
        deeply(fraction_plans::SIMPLIFY_FRACTION.clone(), false),
        deeply(integer_plans::EVALUATE_SIGNED_INTEGER_POWER.clone(), false),
        deeply(integer_plans::SIMPLIFY_INTEGERS_IN_PRODUCT.clone(), false),
        deeply(integer_plans::SIMPLIFY_INTEGERS_IN_SUM.clone(), false),
        deeply(general::SIMPLIFY_PRODUCT_WITH_TWO_NEGATIVE_FACTORS.clone(), false),
        deeply(general::MOVE_SIGN_OF_NEGATIVE_FACTOR_OUT_OF_PRODUCT.clone(), false),
        // after the integer steps, so that exact divisions are evaluated instead
        deeply(general::REWRITE_DIVISION_AS_FRACTION.clone(), false),
    ])
});

static FRACTION_STRATEGY: Lazy<Producer> = Lazy::new(|| while_possible(CONSTANT_SIMPLIFICATION_STEPS.clone()));

/// The fraction strategy, followed by the conversion of the remaining fractions to decimals.
static DECIMAL_STRATEGY: Lazy<Producer> = Lazy::new(|| {
    pipeline(vec![
        optional(FRACTION_STRATEGY.clone()),
        optional(while_possible(deeply(CONVERT_FRACTION_TO_DECIMAL.clone(), false))),
    ])
});

/// Simplifies an expression without variables. The result is a fraction in lowest terms, or a
/// decimal if the context prefers decimals and the decimal terminates.
pub static SIMPLIFY_CONSTANT_EXPRESSION: Lazy<Arc<Plan>> = Lazy::new(|| {
    let decimals = Alternative {
        producer: DECIMAL_STRATEGY.clone(),
        resource: ResourceData { prefer_decimals: Some(true), ..Default::default() },
    };
    Arc::new(Plan::new(
        PlanSpec::new(select_by_context(FRACTION_STRATEGY.clone(), vec![decimals]))
            .pattern(constant())
            .result_pattern(constant())
            .explanation(plan::explanation(explanation::SimplifyConstantExpression)),
    ))
});
