//! Rules that apply to expressions of any kind.

use crate::explanation::keys;
use once_cell::sync::Lazy;
use solver_engine::{
    expr::{
        build::{undefined, xp},
        Expression,
        Operator,
    },
    mapped::{self, MappedExpression},
    mapping::{PathMapping, PathMappingType},
    path::Path,
    pattern::*,
    rule::{Rule, RuleResult},
    transformation::Tag,
};
use std::sync::Arc;

pub mod explanation {
    super::keys!("General";
        /// `1 * x` to `x`
        EliminateOneInProduct,

        /// `0 + x` to `x`
        EliminateZeroInSum,

        /// `x * 0 * y` to `0`
        EvaluateProductContainingZero,

        /// `x : 0` to undefined
        EvaluateProductDividedByZeroAsUndefined,

        /// `-(-x)` to `x`
        SimplifyDoubleMinus,

        /// `(-x) * (-y)` to `x * y`
        SimplifyProductWithTwoNegativeFactors,

        /// `x * (-y)` to `-(x * y)`
        MoveSignOfNegativeFactorOutOfProduct,

        /// `[x / 0]` to undefined
        SimplifyZeroDenominatorFractionToUndefined,

        /// `[x / x]` to `1`
        SimplifyUnitFractionToOne,

        /// `[x / 1]` to `x`
        SimplifyFractionWithOneDenominator,

        /// `a + (b + c)` to `a + b + c`
        RemoveBracketSumInSum,

        /// `a * (b * c)` to `a * b * c`
        RemoveBracketProductInProduct,

        /// `(3)` to `3`
        RemoveRedundantBracket,

        /// `[x ^ 3]` to `x * x * x`
        RewritePowerAsProduct,

        /// `[x * y / x * z]` to `[y / z]`
        CancelCommonTerms,

        /// `[0 ^ 0]` to undefined
        EvaluateZeroToThePowerOfZero,

        /// `0 : 5` to `0`
        EvaluateZeroDividedByAnyValue,

        /// `[0 / 5]` to `0`
        SimplifyZeroNumeratorFractionToZero,

        /// `[x ^ 0]` to `1`
        EvaluateExpressionToThePowerOfZero,

        /// `[0 ^ 3]` to `0`
        EvaluateZeroToAPositivePower,

        /// `[1 ^ x]` to `1`
        EvaluateOneToAnyPower,

        /// `[x ^ 1]` to `x`
        SimplifyExpressionToThePowerOfOne,

        /// `[x * y / x]` to `y`
        CancelDenominator,

        /// `-2 - x - 4` to `-(2 + x + 4)`
        FactorMinusFromSum,

        /// `x + 2 - x` to `2`
        CancelAdditiveInverseElements,

        /// `3 : 4` to `[3 / 4]`
        RewriteDivisionAsFraction,
    );
}

/// Powers with a larger exponent are not rewritten as products.
pub const MAX_POWER_AS_PRODUCT: u32 = 5;

fn is_zero(expr: &Expression) -> bool {
    expr.rational_value().map_or(false, |value| value == 0)
}

fn is_not_zero(expr: &Expression) -> bool {
    expr.rational_value().map_or(false, |value| value != 0)
}

fn is_positive(expr: &Expression) -> bool {
    expr.rational_value().map_or(false, |value| value > 0)
}

pub static ELIMINATE_ONE_IN_PRODUCT: Lazy<Arc<Rule>> = Lazy::new(|| {
    let one = fixed(xp(1));
    let product = product_containing(vec![one.clone()]);
    Arc::new(Rule::new(product.pattern(), move |b| {
        let to_expr = b.cancel(&[&one], b.rest_of(&product)?);
        Some(RuleResult::new(to_expr, b.metadata(explanation::EliminateOneInProduct, &[&one])?))
    }))
});

pub static ELIMINATE_ZERO_IN_SUM: Lazy<Arc<Rule>> = Lazy::new(|| {
    let zero = fixed(xp(0));
    let sum = sum_containing(vec![zero.clone()]);
    Arc::new(Rule::new(sum.pattern(), move |b| {
        let to_expr = b.cancel(&[&zero], b.rest_of(&sum)?);
        Some(RuleResult::new(to_expr, b.metadata(explanation::EliminateZeroInSum, &[&zero])?))
    }))
});

/// Only applies to products without a division, since `0 : 0` is undefined.
pub static EVALUATE_PRODUCT_CONTAINING_ZERO: Lazy<Arc<Rule>> = Lazy::new(|| {
    let zero = fixed(xp(0));
    let product = product_containing(vec![zero.clone()]);
    let pattern = condition(&product, |expr| {
        expr.children()
            .iter()
            .all(|child| *child.operator() != Operator::DivideBy && !child.is_undefined())
    });
    Arc::new(Rule::new(pattern, move |b| {
        let to_expr = b.transform(&zero, xp(0));
        Some(RuleResult::new(to_expr, b.metadata(explanation::EvaluateProductContainingZero, &[&zero])?))
    }))
});

pub static EVALUATE_PRODUCT_DIVIDED_BY_ZERO_AS_UNDEFINED: Lazy<Arc<Rule>> = Lazy::new(|| {
    let zero = condition(signed_number(), is_zero);
    let product = product_containing(vec![divide_by_of(&zero)]);
    Arc::new(Rule::new(product.pattern(), move |b| {
        let to_expr = b.transform(&product, undefined());
        Some(RuleResult::new(
            to_expr,
            b.metadata(explanation::EvaluateProductDividedByZeroAsUndefined, &[&zero])?,
        ))
    }))
});

pub static SIMPLIFY_DOUBLE_MINUS: Lazy<Arc<Rule>> = Lazy::new(|| {
    let value = any();
    let pattern = neg_of(neg_of(&value));
    Arc::new(Rule::new(pattern, move |b| {
        Some(RuleResult::new(b.move_(&value)?, b.metadata(explanation::SimplifyDoubleMinus, &[&value])?))
    }))
});

pub static SIMPLIFY_PRODUCT_WITH_TWO_NEGATIVE_FACTORS: Lazy<Arc<Rule>> = Lazy::new(|| {
    let f1 = any();
    let f2 = any();
    let fd1 = optional_divide_by(neg_of(&f1));
    let fd2 = optional_divide_by(neg_of(&f2));
    let product = product_containing(vec![fd1.pattern(), fd2.pattern()]);
    Arc::new(Rule::new(product.pattern(), move |b| {
        let positive1 = b.copy_divide_by(&fd1, b.move_(&f1)?);
        let positive2 = b.copy_divide_by(&fd2, b.move_(&f2)?);
        let to_expr = b.substitute(&product, vec![positive1, positive2])?;
        Some(RuleResult::new(
            to_expr,
            b.metadata(explanation::SimplifyProductWithTwoNegativeFactors, &[&f1, &f2])?,
        ))
    }))
});

/// Skipped in interactive editors, where the sign is kept next to its factor.
pub static MOVE_SIGN_OF_NEGATIVE_FACTOR_OUT_OF_PRODUCT: Lazy<Arc<Rule>> = Lazy::new(|| {
    let factor = any();
    let negative = optional_divide_by(neg_of(&factor));
    let product = product_containing(vec![negative.pattern()]);
    Arc::new(Rule::new(product.pattern(), move |b| {
        if b.ctx().gm_friendly {
            return None;
        }
        let positive = b.copy_divide_by(&negative, b.move_(&factor)?);
        let to_expr = mapped::neg_of(b.substitute(&product, vec![positive])?);
        Some(RuleResult::new(
            to_expr,
            b.metadata(explanation::MoveSignOfNegativeFactorOutOfProduct, &[&factor])?,
        ))
    }))
});

pub static SIMPLIFY_ZERO_DENOMINATOR_FRACTION_TO_UNDEFINED: Lazy<Arc<Rule>> = Lazy::new(|| {
    let numerator = any();
    let denominator = condition(signed_number(), is_zero);
    let fraction = fraction_of(&numerator, &denominator);
    Arc::new(Rule::new(fraction.clone(), move |b| {
        let to_expr = b.transform(&fraction, undefined());
        Some(RuleResult::new(
            to_expr,
            b.metadata(explanation::SimplifyZeroDenominatorFractionToUndefined, &[&numerator])?,
        ))
    }))
});

/// Only applies to numerals, since `[x / x]` is undefined when `x` is zero.
pub static SIMPLIFY_UNIT_FRACTION_TO_ONE: Lazy<Arc<Rule>> = Lazy::new(|| {
    let common = condition(any(), is_not_zero);
    let pattern = fraction_of(&common, &common);
    Arc::new(Rule::new(pattern, move |b| {
        let to_expr = b.cancel(&[&common], b.introduce(xp(1)));
        Some(RuleResult::new(to_expr, b.metadata(explanation::SimplifyUnitFractionToOne, &[&common])?))
    }))
});

pub static SIMPLIFY_FRACTION_WITH_ONE_DENOMINATOR: Lazy<Arc<Rule>> = Lazy::new(|| {
    let numerator = any();
    let one = fixed(xp(1));
    let pattern = fraction_of(&numerator, &one);
    Arc::new(Rule::new(pattern, move |b| {
        let to_expr = b.cancel(&[&one], b.move_(&numerator)?);
        Some(RuleResult::new(
            to_expr,
            b.metadata(explanation::SimplifyFractionWithOneDenominator, &[&numerator])?,
        ))
    }))
});

pub static REMOVE_BRACKET_SUM_IN_SUM: Lazy<Arc<Rule>> = Lazy::new(|| {
    let inner = condition(any(), |expr| *expr.operator() == Operator::Sum);
    let sum = sum_containing(vec![bracket_of(&inner)]);
    Arc::new(Rule::new(sum.pattern(), move |b| {
        let to_expr = b.substitute(&sum, vec![b.get(&inner)?])?;
        Some(
            RuleResult::new(to_expr, b.metadata(explanation::RemoveBracketSumInSum, &[&inner])?)
                .with_tag(Tag::Cosmetic),
        )
    }))
});

pub static REMOVE_BRACKET_PRODUCT_IN_PRODUCT: Lazy<Arc<Rule>> = Lazy::new(|| {
    let inner = condition(any(), |expr| *expr.operator() == Operator::Product);
    let product = product_containing(vec![bracket_of(&inner)]);
    Arc::new(Rule::new(product.pattern(), move |b| {
        let to_expr = b.substitute(&product, vec![b.get(&inner)?])?;
        Some(
            RuleResult::new(to_expr, b.metadata(explanation::RemoveBracketProductInProduct, &[&inner])?)
                .with_tag(Tag::Cosmetic),
        )
    }))
});

/// A bracket around a single numeral or variable.
pub static REMOVE_REDUNDANT_BRACKET: Lazy<Arc<Rule>> = Lazy::new(|| {
    let inner = condition(any(), |expr| expr.operator().is_leaf());
    let pattern = bracket_of(&inner);
    Arc::new(Rule::new(pattern, move |b| {
        Some(
            RuleResult::new(b.get(&inner)?, b.metadata(explanation::RemoveRedundantBracket, &[&inner])?)
                .with_tag(Tag::Cosmetic),
        )
    }))
});

pub static REWRITE_POWER_AS_PRODUCT: Lazy<Arc<Rule>> = Lazy::new(|| {
    let base = any();
    let exponent = integer_condition(unsigned_integer(), |n| *n >= 2 && *n <= MAX_POWER_AS_PRODUCT);
    let pattern = power_of(&base, &exponent);
    Arc::new(Rule::new(pattern, move |b| {
        if b.ctx().gm_friendly {
            return None;
        }
        let n = b.integer_value(&exponent)?.to_usize()?;
        let factors = (0..n).map(|_| b.move_(&base)).collect::<Option<Vec<_>>>()?;
        Some(RuleResult::new(
            mapped::product_of(factors),
            b.metadata(explanation::RewritePowerAsProduct, &[&base, &exponent])?,
        ))
    }))
});

pub static CANCEL_COMMON_TERMS: Lazy<Arc<Rule>> = Lazy::new(|| {
    let common = condition(any(), |expr| *expr != xp(1));
    let numerator = product_containing(vec![common.clone()]);
    let denominator = product_containing(vec![common.clone()]);
    let pattern = fraction_of(&numerator, &denominator);
    Arc::new(Rule::new(pattern, move |b| {
        let to_expr = mapped::fraction_of(b.rest_of(&numerator)?, b.rest_of(&denominator)?);
        Some(RuleResult::new(
            b.cancel(&[&common], to_expr),
            b.metadata(explanation::CancelCommonTerms, &[&common])?,
        ))
    }))
});

pub static EVALUATE_ZERO_TO_THE_POWER_OF_ZERO: Lazy<Arc<Rule>> = Lazy::new(|| {
    let zero = condition(any(), is_zero);
    let pattern = power_of(&zero, &zero);
    Arc::new(Rule::new(pattern.clone(), move |b| {
        Some(RuleResult::new(
            b.transform(&pattern, undefined()),
            b.metadata(explanation::EvaluateZeroToThePowerOfZero, &[])?,
        ))
    }))
});

pub static EVALUATE_ZERO_DIVIDED_BY_ANY_VALUE: Lazy<Arc<Rule>> = Lazy::new(|| {
    let zero = fixed(xp(0));
    let divisor = condition(signed_number(), is_not_zero);
    let product = product_containing(vec![zero.clone(), divide_by_of(&divisor)]);
    let pattern = condition(&product, |expr| {
        expr.children().iter().all(|child| match child.operator() {
            Operator::DivideBy => child.children().iter().all(is_not_zero),
            _ => !child.is_undefined(),
        })
    });
    Arc::new(Rule::new(pattern, move |b| {
        let to_expr = b.transform(&product, xp(0));
        Some(RuleResult::new(to_expr, b.metadata(explanation::EvaluateZeroDividedByAnyValue, &[&zero])?))
    }))
});

/// Only applies to numeral denominators, which are known not to be zero.
pub static SIMPLIFY_ZERO_NUMERATOR_FRACTION_TO_ZERO: Lazy<Arc<Rule>> = Lazy::new(|| {
    let zero = fixed(xp(0));
    let denominator = condition(any(), is_not_zero);
    let fraction = fraction_of(&zero, &denominator);
    Arc::new(Rule::new(fraction.clone(), move |b| {
        let to_expr = b.transform(&fraction, xp(0));
        Some(RuleResult::new(
            to_expr,
            b.metadata(explanation::SimplifyZeroNumeratorFractionToZero, &[&denominator])?,
        ))
    }))
});

pub static EVALUATE_EXPRESSION_TO_THE_POWER_OF_ZERO: Lazy<Arc<Rule>> = Lazy::new(|| {
    let base = condition(any(), is_not_zero);
    let power = power_of(&base, fixed(xp(0)));
    Arc::new(Rule::new(power.clone(), move |b| {
        Some(RuleResult::new(
            b.transform(&power, xp(1)),
            b.metadata(explanation::EvaluateExpressionToThePowerOfZero, &[&base])?,
        ))
    }))
});

pub static EVALUATE_ZERO_TO_A_POSITIVE_POWER: Lazy<Arc<Rule>> = Lazy::new(|| {
    let exponent = condition(any(), is_positive);
    let power = power_of(fixed(xp(0)), &exponent);
    Arc::new(Rule::new(power.clone(), move |b| {
        Some(RuleResult::new(
            b.transform(&power, xp(0)),
            b.metadata(explanation::EvaluateZeroToAPositivePower, &[&exponent])?,
        ))
    }))
});

pub static EVALUATE_ONE_TO_ANY_POWER: Lazy<Arc<Rule>> = Lazy::new(|| {
    let one = fixed(xp(1));
    let exponent = condition(any(), |expr| !expr.is_undefined());
    let pattern = power_of(&one, &exponent);
    Arc::new(Rule::new(pattern, move |b| {
        Some(RuleResult::new(
            b.cancel(&[&exponent], b.move_(&one)?),
            b.metadata(explanation::EvaluateOneToAnyPower, &[&exponent])?,
        ))
    }))
});

pub static SIMPLIFY_EXPRESSION_TO_THE_POWER_OF_ONE: Lazy<Arc<Rule>> = Lazy::new(|| {
    let base = any();
    let one = fixed(xp(1));
    let pattern = power_of(&base, &one);
    Arc::new(Rule::new(pattern, move |b| {
        Some(RuleResult::new(
            b.cancel(&[&one], b.get(&base)?),
            b.metadata(explanation::SimplifyExpressionToThePowerOfOne, &[&base])?,
        ))
    }))
});

pub static CANCEL_DENOMINATOR: Lazy<Arc<Rule>> = Lazy::new(|| {
    let common = any();
    let numerator = product_containing(vec![common.clone()]);
    let pattern = fraction_of(&numerator, &common);
    Arc::new(Rule::new(pattern, move |b| {
        Some(RuleResult::new(
            b.cancel(&[&common], b.rest_of(&numerator)?),
            b.metadata(explanation::CancelDenominator, &[&common])?,
        ))
    }))
});

/// Applies to sums whose terms are all negated.
pub static FACTOR_MINUS_FROM_SUM: Lazy<Arc<Rule>> = Lazy::new(|| {
    let sum = condition(any(), |expr| {
        *expr.operator() == Operator::Sum
            && expr.children().iter().all(|term| *term.operator() == Operator::Minus)
    });
    Arc::new(Rule::new(sum.clone(), move |b| {
        let terms = b.get_expr(&sum)?;
        let positive = terms
            .children()
            .iter()
            .enumerate()
            .map(|(i, term)| {
                let inner = term.children().first()?.clone();
                let from = Path::root().child(i).child(0);
                Some(MappedExpression::new(inner, vec![PathMapping::new(
                    vec![from],
                    PathMappingType::Move,
                    vec![Path::root()],
                )]))
            })
            .collect::<Option<Vec<_>>>()?;
        Some(RuleResult::new(
            mapped::neg_of(mapped::sum_of(positive)),
            b.metadata(explanation::FactorMinusFromSum, &[])?,
        ))
    }))
});

pub static CANCEL_ADDITIVE_INVERSE_ELEMENTS: Lazy<Arc<Rule>> = Lazy::new(|| {
    let term = any();
    let inverse = neg_of(&term);
    let term_first = sum_containing(vec![term.clone(), inverse.clone()]);
    let inverse_first = sum_containing(vec![inverse.clone(), term.clone()]);
    let pattern = one_of(vec![term_first.pattern(), inverse_first.pattern()]);
    Arc::new(Rule::new(pattern, move |b| {
        let sum = if b.is_bound(&term_first) { &term_first } else { &inverse_first };
        Some(RuleResult::new(
            b.cancel(&[&term, &inverse], b.rest_of(sum)?),
            b.metadata(explanation::CancelAdditiveInverseElements, &[&term])?,
        ))
    }))
});

/// Rewrites the first division of a product, together with the factor before it, as a
/// fraction.
pub static REWRITE_DIVISION_AS_FRACTION: Lazy<Arc<Rule>> = Lazy::new(|| {
    let numerator = condition(any(), |expr| *expr.operator() != Operator::DivideBy);
    let denominator = any();
    let product = product_containing(vec![numerator.clone(), divide_by_of(&denominator)]);
    let adjacent = product.clone();
    let pattern = match_condition(&product, move |_, m| {
        let indices = adjacent.matched_indices(m);
        matches!(indices[..], [a, b] if b == a + 1)
    });
    Arc::new(Rule::new(pattern, move |b| {
        let fraction = mapped::fraction_of(b.move_(&numerator)?, b.move_(&denominator)?);
        Some(RuleResult::new(
            b.substitute(&product, vec![fraction])?,
            b.metadata(explanation::RewriteDivisionAsFraction, &[&numerator, &denominator])?,
        ))
    }))
});
