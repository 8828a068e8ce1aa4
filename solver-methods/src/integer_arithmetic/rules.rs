use once_cell::sync::Lazy;
use rug::{ops::Pow, Integer};
use solver_engine::{
    mapped,
    pattern::*,
    rule::{Rule, RuleResult},
};
use std::sync::Arc;
use super::explanation;

/// The largest exponent evaluated in a single step.
pub const MAX_POWER: u32 = 64;

/// Adds the first two signed integers of a sum.
pub static EVALUATE_SIGNED_INTEGER_ADDITION: Lazy<Arc<Rule>> = Lazy::new(|| {
    let term1 = signed_integer();
    let term2 = signed_integer();
    let sum = sum_containing(vec![term1.pattern(), term2.pattern()]);
    Arc::new(Rule::new(sum.pattern(), move |b| {
        let (v1, v2) = (b.integer_value(&term1)?, b.integer_value(&term2)?);
        let explanation = if v1 > 0 && v2 < 0 {
            b.metadata(explanation::EvaluateIntegerSubtraction, &[term1.as_ref(), &term2.unsigned])?
        } else {
            b.metadata(explanation::EvaluateIntegerAddition, &[term1.as_ref(), term2.as_ref()])?
        };
        let total = b.integer_op(&term1, &term2, |a, b| Integer::from(a + b))?;
        Some(RuleResult::new(b.substitute(&sum, vec![total])?, explanation))
    }))
});

/// Multiplies a signed integer with the next one in the product, or divides it by the next
/// divide-by term when the division is exact.
pub static EVALUATE_INTEGER_PRODUCT_AND_DIVISION: Lazy<Arc<Rule>> = Lazy::new(|| {
    let base = signed_integer();
    let multiplier = signed_integer();
    let divisor = signed_integer();
    let division = integer_condition2(divide_by_of(&divisor), &base, &divisor, |n, d| {
        *d != 0 && n.is_divisible(d)
    });
    let product = product_containing(vec![base.pattern(), one_of(vec![multiplier.pattern(), division])]);

    Arc::new(Rule::new(product.pattern(), move |b| {
        let (result, explanation) = if b.is_bound(&multiplier) {
            (
                b.integer_op(&base, &multiplier, |n, m| Integer::from(n * m))?,
                b.metadata(explanation::EvaluateIntegerProduct, &[base.as_ref(), multiplier.as_ref()])?,
            )
        } else {
            (
                b.integer_op(&base, &divisor, |n, d| Integer::from(n / d))?,
                b.metadata(explanation::EvaluateIntegerDivision, &[base.as_ref(), divisor.as_ref()])?,
            )
        };
        Some(RuleResult::new(b.substitute(&product, vec![result])?, explanation))
    }))
});

pub static EVALUATE_INTEGER_POWER_DIRECTLY: Lazy<Arc<Rule>> = Lazy::new(|| {
    let base = signed_integer();
    let exponent = integer_condition(unsigned_integer(), |n| *n <= MAX_POWER);
    let power = power_of(&base, &exponent);
    Arc::new(Rule::new(power, move |b| {
        let e = b.integer_value(&exponent)?.to_u32()?;
        let result = b.integer_op(&base, &exponent, |n, _| Integer::from(n.pow(e)))?;
        Some(RuleResult::new(
            result,
            b.metadata(explanation::EvaluateIntegerPowerDirectly, &[base.as_ref(), &exponent])?,
        ))
    }))
});

pub static SIMPLIFY_EVEN_POWER_OF_NEGATIVE: Lazy<Arc<Rule>> = Lazy::new(|| {
    let positive_base = any();
    let exponent = integer_condition(signed_integer(), |n| n.is_even());
    let power = power_of(neg_of(&positive_base), &exponent);
    Arc::new(Rule::new(power, move |b| {
        let to_expr = mapped::power_of(b.move_(&positive_base)?, b.move_(&exponent)?);
        Some(RuleResult::new(to_expr, b.metadata(explanation::SimplifyEvenPowerOfNegative, &[])?))
    }))
});

pub static SIMPLIFY_ODD_POWER_OF_NEGATIVE: Lazy<Arc<Rule>> = Lazy::new(|| {
    let positive_base = any();
    let exponent = integer_condition(signed_integer(), |n| n.is_odd());
    let power = power_of(neg_of(&positive_base), &exponent);
    Arc::new(Rule::new(power, move |b| {
        let to_expr = mapped::neg_of(mapped::power_of(b.move_(&positive_base)?, b.move_(&exponent)?));
        Some(RuleResult::new(to_expr, b.metadata(explanation::SimplifyOddPowerOfNegative, &[])?))
    }))
});
