use crate::explanation::skill;
use once_cell::sync::Lazy;
use rug::Integer;
use solver_engine::{
    expr::build::xp,
    mapped::{self, MappedExpression},
    pattern::*,
    rule::{Rule, RuleResult},
};
use std::sync::Arc;
use super::explanation;

fn gcd(a: &Integer, b: &Integer) -> Integer {
    Integer::from(a.gcd_ref(b))
}

/// The product of the factors that are not `1`.
fn product_without_ones(factors: Vec<MappedExpression>) -> MappedExpression {
    mapped::product_of(factors.into_iter().filter(|factor| factor.expr != xp(1)).collect())
}

/// `[a / c] + [b / c]` to `[a + b / c]`, keeping the sign of each numerator.
pub static ADD_LIKE_FRACTIONS: Lazy<Arc<Rule>> = Lazy::new(|| {
    let num1 = unsigned_integer();
    let num2 = unsigned_integer();
    let denom = unsigned_integer();
    let f1 = fraction_of(&num1, &denom);
    let f2 = fraction_of(&num2, &denom);
    let nf1 = optional_neg_of(&f1);
    let nf2 = optional_neg_of(&f2);
    let sum = sum_containing(vec![nf1.pattern(), nf2.pattern()]);

    Arc::new(Rule::new(sum.pattern(), move |b| {
        let numerator = mapped::sum_of(vec![
            b.copy_sign(&nf1, b.move_(&num1)?),
            b.copy_sign(&nf2, b.move_(&num2)?),
        ]);
        let to_expr = b.substitute(&sum, vec![mapped::fraction_of(numerator, b.factor(&denom)?)])?;
        let explanation = if !b.is_neg(&nf1) && b.is_neg(&nf2) {
            b.metadata(explanation::SubtractLikeFractions, &[&f1, &f2])?
        } else {
            b.metadata(explanation::AddLikeFractions, &[nf1.as_ref(), nf2.as_ref()])?
        };
        Some(RuleResult::new(to_expr, explanation))
    }))
});

/// `n + [a / b]` to `[n / 1] + [a / b]`
pub static CONVERT_INTEGER_TO_FRACTION: Lazy<Arc<Rule>> = Lazy::new(|| {
    let integer = unsigned_integer();
    let fraction = integer_fraction();
    let sum = commutative_sum_of(vec![integer.clone(), fraction.pattern()]);

    Arc::new(Rule::new(sum.pattern(), move |b| {
        let converted = mapped::fraction_of(b.move_(&integer)?, b.introduce(xp(1)));
        let kept = b.move_(&fraction)?;
        let terms = if b.paths_of(&integer) < b.paths_of(&fraction) {
            vec![converted, kept]
        } else {
            vec![kept, converted]
        };
        Some(RuleResult::new(
            b.substitute(&sum, terms)?,
            b.metadata(explanation::ConvertIntegerToFraction, &[&integer])?,
        ))
    }))
});

/// Rewrites two fractions with different denominators to fractions over their least common
/// multiple.
pub static BRING_TO_COMMON_DENOMINATOR: Lazy<Arc<Rule>> = Lazy::new(|| {
    let f1 = integer_fraction();
    let f2 = integer_fraction();
    let nf1 = optional_neg_of(&f1);
    let nf2 = optional_neg_of(&f2);
    let sum = sum_containing(vec![nf1.pattern(), nf2.pattern()]);
    let pattern = integer_condition2(&sum, &f1.denominator, &f2.denominator, |d1, d2| d1 != d2);

    Arc::new(Rule::new(pattern, move |b| {
        let factor1 = b.integer_op(&f1.denominator, &f2.denominator, |d1, d2| Integer::from(d2 / &gcd(d1, d2)))?;
        let factor2 = b.integer_op(&f1.denominator, &f2.denominator, |d1, d2| Integer::from(d1 / &gcd(d1, d2)))?;

        let scaled1 = mapped::fraction_of(
            mapped::product_of(vec![b.move_(&f1.numerator)?, factor1.clone()]),
            mapped::product_of(vec![b.move_(&f1.denominator)?, factor1]),
        );
        let scaled2 = mapped::fraction_of(
            mapped::product_of(vec![b.move_(&f2.numerator)?, factor2.clone()]),
            mapped::product_of(vec![b.move_(&f2.denominator)?, factor2]),
        );
        let to_expr = b.substitute(&sum, vec![b.copy_sign(&nf1, scaled1), b.copy_sign(&nf2, scaled2)])?;

        Some(
            RuleResult::new(to_expr, b.metadata(explanation::BringToCommonDenominator, &[f1.as_ref(), f2.as_ref()])?)
                .with_skill(b.metadata(skill::NumericLcm, &[&f1.denominator, &f2.denominator])?),
        )
    }))
});

/// `[a / b] + n` to `[a / b] + [n * b / b]`
pub static TURN_SUM_OF_FRACTION_AND_INTEGER_TO_FRACTION_SUM: Lazy<Arc<Rule>> = Lazy::new(|| {
    let f = integer_fraction();
    let nf = optional_neg_of(&f);
    let integer_term = signed_integer();
    let sum = commutative_sum_of(vec![nf.pattern(), integer_term.pattern()]);

    Arc::new(Rule::new(sum.pattern(), move |b| {
        let converted = b.copy_sign(
            &integer_term,
            mapped::fraction_of(
                mapped::product_of(vec![b.move_(&integer_term.unsigned)?, b.move_(&f.denominator)?]),
                b.move_(&f.denominator)?,
            ),
        );
        let kept = b.move_(&nf)?;
        let terms = if b.paths_of(&nf) < b.paths_of(&integer_term) {
            vec![kept, converted]
        } else {
            vec![converted, kept]
        };
        Some(RuleResult::new(
            b.substitute(&sum, terms)?,
            b.metadata(explanation::BringToCommonDenominator, &[f.as_ref(), integer_term.as_ref()])?,
        ))
    }))
});

pub static SIMPLIFY_NEGATIVE_IN_NUMERATOR: Lazy<Arc<Rule>> = Lazy::new(|| {
    let numerator = any();
    let denominator = any();
    let pattern = fraction_of(neg_of(&numerator), &denominator);
    Arc::new(Rule::new(pattern.clone(), move |b| {
        let to_expr = mapped::neg_of(mapped::fraction_of(b.move_(&numerator)?, b.move_(&denominator)?));
        Some(RuleResult::new(to_expr, b.metadata(explanation::SimplifyNegativeInNumerator, &[&pattern])?))
    }))
});

pub static SIMPLIFY_NEGATIVE_IN_DENOMINATOR: Lazy<Arc<Rule>> = Lazy::new(|| {
    let numerator = any();
    let denominator = any();
    let pattern = fraction_of(&numerator, neg_of(&denominator));
    Arc::new(Rule::new(pattern.clone(), move |b| {
        let to_expr = mapped::neg_of(mapped::fraction_of(b.move_(&numerator)?, b.move_(&denominator)?));
        Some(RuleResult::new(to_expr, b.metadata(explanation::SimplifyNegativeInDenominator, &[&pattern])?))
    }))
});

pub static SIMPLIFY_NEGATIVE_NUMERATOR_AND_DENOMINATOR: Lazy<Arc<Rule>> = Lazy::new(|| {
    let numerator = any();
    let denominator = any();
    let pattern = fraction_of(neg_of(&numerator), neg_of(&denominator));
    Arc::new(Rule::new(pattern.clone(), move |b| {
        let to_expr = mapped::fraction_of(b.move_(&numerator)?, b.move_(&denominator)?);
        Some(RuleResult::new(
            to_expr,
            b.metadata(explanation::SimplifyNegativeInNumeratorAndDenominator, &[&pattern])?,
        ))
    }))
});

pub static SIMPLIFY_FRACTION_TO_INTEGER: Lazy<Arc<Rule>> = Lazy::new(|| {
    let numerator = unsigned_integer();
    let denominator = unsigned_integer();
    let fraction = fraction_of(&numerator, &denominator);
    let pattern = integer_condition2(fraction, &numerator, &denominator, |n, d| *d != 0 && n.is_divisible(d));
    Arc::new(Rule::new(pattern, move |b| {
        let quotient = b.integer_op(&numerator, &denominator, |n, d| Integer::from(n / d))?;
        Some(RuleResult::new(quotient, b.metadata(explanation::SimplifyFractionToInteger, &[])?))
    }))
});

/// Splits the greatest common divisor out of an integer factor of the numerator and one of the
/// denominator, so that it can be cancelled.
pub static FIND_COMMON_FACTOR_IN_FRACTION: Lazy<Arc<Rule>> = Lazy::new(|| {
    let factor_numerator = unsigned_integer();
    let factor_denominator = unsigned_integer();
    let product_numerator = product_containing(vec![factor_numerator.clone()]);
    let product_denominator = product_containing(vec![factor_denominator.clone()]);
    let numerator = one_of(vec![factor_numerator.clone(), product_numerator.pattern()]);
    let denominator = one_of(vec![factor_denominator.clone(), product_denominator.pattern()]);
    let pattern = integer_condition2(
        fraction_of(&numerator, &denominator),
        &factor_numerator,
        &factor_denominator,
        |n, d| *n != 0 && *d != 0 && gcd(n, d) != 1,
    );

    Arc::new(Rule::new(pattern, move |b| {
        let common = b.integer_op(&factor_numerator, &factor_denominator, gcd)?;
        let numerator_rest =
            b.integer_op(&factor_numerator, &factor_denominator, |n, d| Integer::from(n / &gcd(n, d)))?;
        let denominator_rest =
            b.integer_op(&factor_numerator, &factor_denominator, |n, d| Integer::from(d / &gcd(n, d)))?;

        let split = |product: &NaryPattern, rest: MappedExpression| {
            if b.is_bound(product) {
                b.substitute(product, vec![product_without_ones(vec![common.clone(), rest])])
            } else {
                Some(mapped::product_of(vec![common.clone(), rest]))
            }
        };
        let to_expr = mapped::fraction_of(
            split(&product_numerator, numerator_rest)?,
            split(&product_denominator, denominator_rest)?,
        );
        Some(RuleResult::new(to_expr, b.metadata(explanation::FindCommonFactorInFraction, &[])?))
    }))
});

pub static SIMPLIFY_FRACTION_WITH_FRACTION_NUMERATOR: Lazy<Arc<Rule>> = Lazy::new(|| {
    let numerator = any();
    let inner_denominator = any();
    let denominator = any();
    let inner = fraction_of(&numerator, &inner_denominator);
    let pattern = fraction_of(&inner, &denominator);
    Arc::new(Rule::new(pattern, move |b| {
        let to_expr = mapped::fraction_of(
            b.move_(&numerator)?,
            mapped::product_of(vec![b.move_(&inner_denominator)?, b.move_(&denominator)?]),
        );
        Some(RuleResult::new(
            to_expr,
            b.metadata(explanation::SimplifyFractionWithFractionNumerator, &[&inner, &denominator])?,
        ))
    }))
});

pub static SIMPLIFY_FRACTION_WITH_FRACTION_DENOMINATOR: Lazy<Arc<Rule>> = Lazy::new(|| {
    let numerator = any();
    let inner_numerator = any();
    let inner_denominator = any();
    let inner = fraction_of(&inner_numerator, &inner_denominator);
    let pattern = fraction_of(&numerator, &inner);
    Arc::new(Rule::new(pattern, move |b| {
        let to_expr = mapped::fraction_of(
            mapped::product_of(vec![b.move_(&numerator)?, b.move_(&inner_denominator)?]),
            b.move_(&inner_numerator)?,
        );
        Some(RuleResult::new(
            to_expr,
            b.metadata(explanation::SimplifyFractionWithFractionDenominator, &[&numerator, &inner])?,
        ))
    }))
});

#[cfg(test)]
mod tests {
    use crate::test_util::{assert_no_step, assert_step, run};
    use pretty_assertions::assert_eq;
    use solver_engine::{
        mapping::{PathMapping, PathMappingType},
        Path,
    };
    use super::*;

    fn path(s: &str) -> Path {
        s.parse().unwrap()
    }

    #[test]
    fn subtract_like_fractions() {
        let step = run(&**ADD_LIKE_FRACTIONS, "[3 / 10] - [2 / 10]").unwrap();
        assert_eq!(step.result().to_string(), "[3 - 2 / 10]");
        assert_eq!(step.explanation.as_ref().unwrap().key, explanation::SubtractLikeFractions);

        let factor = step
            .path_mappings()
            .iter()
            .find(|mapping| mapping.kind == PathMappingType::Factor)
            .cloned();
        assert_eq!(factor, Some(PathMapping::new(
            vec![path("./0/1"), path("./1/0/1")],
            PathMappingType::Factor,
            vec![path("./1")],
        )));
    }

    #[test]
    fn add_like_fractions() {
        let step = run(&**ADD_LIKE_FRACTIONS, "-[1 / 5] + x + [3 / 5]").unwrap();
        assert_eq!(step.result().to_string(), "[-1 + 3 / 5] + x");
        assert_eq!(step.explanation.unwrap().key, explanation::AddLikeFractions);
        assert_no_step(&**ADD_LIKE_FRACTIONS, "[1 / 5] + [1 / 6]");
    }

    #[test]
    fn integers_become_fractions_in_place() {
        assert_step(&**CONVERT_INTEGER_TO_FRACTION, "3 + [1 / 2]", "[3 / 1] + [1 / 2]");
        assert_step(&**CONVERT_INTEGER_TO_FRACTION, "[1 / 2] + 3", "[1 / 2] + [3 / 1]");
        assert_step(
            &**TURN_SUM_OF_FRACTION_AND_INTEGER_TO_FRACTION_SUM,
            "[1 / 2] - 3",
            "[1 / 2] - [3 * 2 / 2]",
        );
    }

    #[test]
    fn common_denominator() {
        let step = run(&**BRING_TO_COMMON_DENOMINATOR, "[1 / 4] + [1 / 6]").unwrap();
        assert_eq!(step.result().to_string(), "[1 * 3 / 4 * 3] + [1 * 2 / 6 * 2]");
        assert_eq!(step.skills[0].key, skill::NumericLcm);
        assert_no_step(&**BRING_TO_COMMON_DENOMINATOR, "[1 / 4] + [3 / 4]");
    }

    #[test]
    fn negative_signs() {
        assert_step(&**SIMPLIFY_NEGATIVE_IN_NUMERATOR, "[-1 / 4]", "-[1 / 4]");
        assert_step(&**SIMPLIFY_NEGATIVE_IN_DENOMINATOR, "[1 / -4]", "-[1 / 4]");
        assert_step(&**SIMPLIFY_NEGATIVE_NUMERATOR_AND_DENOMINATOR, "[-1 / -4]", "[1 / 4]");
    }

    #[test]
    fn fraction_to_integer() {
        assert_step(&**SIMPLIFY_FRACTION_TO_INTEGER, "[12 / 4]", "3");
        assert_no_step(&**SIMPLIFY_FRACTION_TO_INTEGER, "[12 / 5]");
        assert_no_step(&**SIMPLIFY_FRACTION_TO_INTEGER, "[12 / 0]");
    }

    #[test]
    fn common_factor() {
        assert_step(&**FIND_COMMON_FACTOR_IN_FRACTION, "[6 / 9]", "[3 * 2 / 3 * 3]");
        assert_step(&**FIND_COMMON_FACTOR_IN_FRACTION, "[6 * 5 / 4]", "[2 * 3 * 5 / 2 * 2]");
        assert_no_step(&**FIND_COMMON_FACTOR_IN_FRACTION, "[5 / 9]");
    }

    #[test]
    fn nested_fractions() {
        assert_step(&**SIMPLIFY_FRACTION_WITH_FRACTION_NUMERATOR, "[[3 / 4] / 2]", "[3 / 4 * 2]");
        assert_step(&**SIMPLIFY_FRACTION_WITH_FRACTION_DENOMINATOR, "[2 / [3 / 4]]", "[2 * 4 / 3]");
        assert_no_step(&**SIMPLIFY_FRACTION_WITH_FRACTION_NUMERATOR, "[3 / [1 / 2]]");
    }
}
