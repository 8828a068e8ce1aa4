//! Linear inequalities in the solution variable, solved to an interval.

use crate::{constant_expressions::SIMPLIFY_CONSTANT_EXPRESSION, explanation::keys, general};
use once_cell::sync::Lazy;
use rug::Rational;
use solver_engine::{
    context::ResourceData,
    expr::{build, Comparator, Expression, Operator},
    mapped::{self, MappedExpression},
    mapping::{PathMapping, PathMappingType},
    metadata::MetadataKey,
    path::Path,
    pattern::*,
    plan::{self, Plan, PlanSpec},
    rule::{Rule, RuleResult},
    steps::{
        apply_to,
        child,
        deeply,
        first_of,
        optional,
        pipeline,
        select_by_context,
        step,
        while_possible,
        Alternative,
        Producer,
    },
};
use std::{iter, sync::Arc};

pub mod explanation {
    super::keys!("Inequalities";
        /// `1 < 2` to all real numbers
        ExtractSolutionFromTrueInequality,

        /// `2 < 1` to the empty set
        ExtractSolutionFromFalseInequality,

        /// `x < a` to the interval `(-infinity, a)`
        ExtractSolutionFromInequalityInSolvedForm,

        /// `a < b` to `b > a`
        FlipInequality,

        /// `-x < a` to `x > -a`
        NegateBothSidesAndFlipTheSign,

        /// `-x != a` to `x != -a`
        NegateBothSides,

        /// `x + a < b` to `x + a - a < b - a`
        MoveConstantsToTheRight,

        /// `a < x + b` to `a - b < x + b - b`
        MoveConstantsToTheLeft,

        MoveConstantsToTheRightAndSimplify,
        MoveConstantsToTheLeftAndSimplify,

        /// `a < b x + c` to `b x < a - c`, moving the constants first
        MoveConstantsToTheLeftAndFlip,

        /// `a < b x + c` to `b x < a - c`, flipping first
        FlipAndMoveConstantsToTheRight,

        /// `a x < b` to `[a x / a] < [b / a]` for a positive `a`
        DivideByCoefficientOfVariable,

        /// `a x < b` to `[a x / a] > [b / a]` for a negative `a`
        DivideByCoefficientOfVariableAndFlipTheSign,

        DivideByCoefficientOfVariableAndSimplify,

        SolveLinearInequality,
    );
}

/// Whether `lhs` compares to `rhs` as the comparator says.
pub(crate) fn holds(comparator: Comparator, lhs: &Rational, rhs: &Rational) -> bool {
    match comparator {
        Comparator::Less => lhs < rhs,
        Comparator::LessEq => lhs <= rhs,
        Comparator::Greater => lhs > rhs,
        Comparator::GreaterEq => lhs >= rhs,
        Comparator::NotEq => lhs != rhs,
    }
}

/// Matches numerals, signed numerals and fractions of those.
pub(crate) fn rational() -> Pattern {
    condition(constant(), |expr| expr.rational_value().is_some())
}

fn not_constant() -> Pattern {
    condition(any(), |expr| !expr.is_constant())
}

/// `SetSolution[x : S]` for the solution variable of the context.
pub(crate) fn solution_set(variable: &str, set: Expression) -> Expression {
    build::set_solution_of(vec![build::var(variable)], set)
}

/// Matches the solution set a solving plan ends with.
pub(crate) fn set_solution() -> Pattern {
    operator(Operator::SetSolution, vec![any(), any()])
}

/// Sums that have both constant terms and terms that are not constant.
fn has_constant_terms(expr: &Expression) -> bool {
    *expr.operator() == Operator::Sum && !expr.is_constant() && expr.children().iter().any(Expression::is_constant)
}

fn introduced(expr: Expression, from: Path) -> MappedExpression {
    MappedExpression::new(expr, vec![PathMapping::new(vec![from], PathMappingType::Introduce, vec![Path::root()])])
}

/// The opposites of the constant terms of the sum on the given side, without double minus
/// signs.
fn opposite_constants(sum: &Expression, side: usize) -> Vec<MappedExpression> {
    sum.children()
        .iter()
        .enumerate()
        .filter(|(_, term)| term.is_constant())
        .map(|(i, term)| {
            let from = Path::root().child(side).child(i);
            match (term.operator(), term.first_child()) {
                (Operator::Minus, Some(inner)) => introduced(inner.clone(), from.child(0)),
                _ => mapped::neg_of(introduced(term.clone(), from)),
            }
        })
        .collect()
}

/// `a < b` to whether it holds, as a solution set for the solution variable.
pub static EXTRACT_SOLUTION_FROM_CONSTANT_INEQUALITY: Lazy<Arc<Rule>> = Lazy::new(|| {
    let lhs = rational();
    let rhs = rational();
    let inequality = inequality_of(&lhs, &rhs);

    Arc::new(Rule::new(inequality.clone(), move |b| {
        let variable = b.ctx().solution_variable.as_deref()?;
        let comparator = b.comparator(&inequality)?;
        let (left, right) = (b.get_expr(&lhs)?.rational_value()?, b.get_expr(&rhs)?.rational_value()?);
        let (set, key) = if holds(comparator, &left, &right) {
            (build::reals(), explanation::ExtractSolutionFromTrueInequality)
        } else {
            (build::set_of(Vec::new()), explanation::ExtractSolutionFromFalseInequality)
        };
        Some(RuleResult::new(b.transform(&inequality, solution_set(variable, set)), b.metadata(key, &[])?))
    }))
});

pub static EXTRACT_SOLUTION_FROM_INEQUALITY_IN_SOLVED_FORM: Lazy<Arc<Rule>> = Lazy::new(|| {
    let variable = solution_variable();
    let value = constant();
    let inequality = inequality_of(&variable, &value);

    Arc::new(Rule::new(inequality.clone(), move |b| {
        let bound = b.move_(&value)?;
        let minus_infinity = || b.introduce(build::neg_of(build::infinity()));
        let infinity = || b.introduce(build::infinity());
        let interval = match b.comparator(&inequality)? {
            Comparator::Less => mapped::interval_of(minus_infinity(), false, bound, false),
            Comparator::LessEq => mapped::interval_of(minus_infinity(), false, bound, true),
            Comparator::Greater => mapped::interval_of(bound, false, infinity(), false),
            Comparator::GreaterEq => mapped::interval_of(bound, true, infinity(), false),
            Comparator::NotEq => return None,
        };
        Some(RuleResult::new(
            mapped::set_solution_of(vec![b.move_(&variable)?], interval),
            b.metadata(explanation::ExtractSolutionFromInequalityInSolvedForm, &[])?,
        ))
    }))
});

/// Swaps the sides of an inequality.
pub static FLIP_INEQUALITY: Lazy<Arc<Rule>> = Lazy::new(|| {
    let lhs = any();
    let rhs = any();
    let inequality = comparison_of(&lhs, &rhs);

    Arc::new(Rule::new(inequality.clone(), move |b| {
        let comparator = b.comparator(&inequality)?.reversed();
        Some(RuleResult::new(
            mapped::inequality_of(b.move_(&rhs)?, comparator, b.move_(&lhs)?),
            b.metadata(explanation::FlipInequality, &[])?,
        ))
    }))
});

pub static NEGATE_BOTH_SIDES: Lazy<Arc<Rule>> = Lazy::new(|| {
    let unsigned = not_constant();
    let rhs = optional_neg_of(any());
    let inequality = comparison_of(neg_of(&unsigned), &rhs);

    Arc::new(Rule::new(inequality.clone(), move |b| {
        let comparator = b.comparator(&inequality)?;
        let negated = if b.is_neg(&rhs) {
            b.move_(&rhs.unsigned)?
        } else {
            mapped::neg_of(b.move_(&rhs)?)
        };
        let key = if comparator == Comparator::NotEq {
            explanation::NegateBothSides
        } else {
            explanation::NegateBothSidesAndFlipTheSign
        };
        Some(RuleResult::new(
            mapped::inequality_of(b.move_(&unsigned)?, comparator.reversed(), negated),
            b.metadata(key, &[])?,
        ))
    }))
});

pub static MOVE_CONSTANTS_TO_THE_RIGHT: Lazy<Arc<Rule>> = Lazy::new(|| {
    let lhs = condition(any(), has_constant_terms);
    let rhs = any();
    let inequality = comparison_of(&lhs, &rhs);

    Arc::new(Rule::new(inequality.clone(), move |b| {
        let opposites = opposite_constants(&b.get_expr(&lhs)?, 0);
        let left = mapped::sum_of(iter::once(b.get(&lhs)?).chain(opposites.clone()).collect());
        let right = mapped::sum_of(iter::once(b.get(&rhs)?).chain(opposites).collect());
        Some(RuleResult::new(
            mapped::inequality_of(left, b.comparator(&inequality)?, right),
            b.metadata(explanation::MoveConstantsToTheRight, &[])?,
        ))
    }))
});

pub static MOVE_CONSTANTS_TO_THE_LEFT: Lazy<Arc<Rule>> = Lazy::new(|| {
    let lhs = any();
    let rhs = condition(any(), has_constant_terms);
    let inequality = comparison_of(&lhs, &rhs);

    Arc::new(Rule::new(inequality.clone(), move |b| {
        let opposites = opposite_constants(&b.get_expr(&rhs)?, 1);
        let left = mapped::sum_of(iter::once(b.get(&lhs)?).chain(opposites.clone()).collect());
        let right = mapped::sum_of(iter::once(b.get(&rhs)?).chain(opposites).collect());
        Some(RuleResult::new(
            mapped::inequality_of(left, b.comparator(&inequality)?, right),
            b.metadata(explanation::MoveConstantsToTheLeft, &[])?,
        ))
    }))
});

/// Divides both sides by the constant coefficient of the solution variable, flipping the sign
/// if the coefficient is negative.
pub static DIVIDE_BY_COEFFICIENT_OF_VARIABLE: Lazy<Arc<Rule>> = Lazy::new(|| {
    let coefficient = condition(rational(), |expr| {
        expr.rational_value().map_or(false, |value| value != 0 && value != 1)
    });
    let lhs = product_of(vec![coefficient.clone(), solution_variable()]);
    let rhs = any();
    let inequality = comparison_of(&lhs, &rhs);

    Arc::new(Rule::new(inequality.clone(), move |b| {
        let value = b.get_expr(&coefficient)?;
        let comparator = b.comparator(&inequality)?;
        let (comparator, key) = if value.rational_value()? > 0 {
            (comparator, explanation::DivideByCoefficientOfVariable)
        } else {
            (comparator.reversed(), explanation::DivideByCoefficientOfVariableAndFlipTheSign)
        };
        let divisor = || b.introduce_from(&[&coefficient], value.clone());
        Some(RuleResult::new(
            mapped::inequality_of(
                mapped::fraction_of(b.get(&lhs)?, divisor()),
                comparator,
                mapped::fraction_of(b.get(&rhs)?, divisor()),
            ),
            b.metadata(key, &[&coefficient])?,
        ))
    }))
});

/// Tidies up one side: simplified fully if constant, otherwise rid of the terms and factors
/// that cancel.
static SIMPLIFY_SIDE: Lazy<Producer> = Lazy::new(|| {
    first_of(vec![
        SIMPLIFY_CONSTANT_EXPRESSION.clone(),
        while_possible(deeply(
            first_of(vec![
                general::CANCEL_ADDITIVE_INVERSE_ELEMENTS.clone(),
                general::CANCEL_DENOMINATOR.clone(),
                general::SIMPLIFY_DOUBLE_MINUS.clone(),
                general::ELIMINATE_ZERO_IN_SUM.clone(),
                general::ELIMINATE_ONE_IN_PRODUCT.clone(),
                general::SIMPLIFY_FRACTION_WITH_ONE_DENOMINATOR.clone(),
                general::REMOVE_REDUNDANT_BRACKET.clone(),
            ]),
            false,
        )),
    ])
});

/// Simplifies each side of an inequality or equation.
pub static SIMPLIFY_BOTH_SIDES: Lazy<Producer> = Lazy::new(|| {
    pipeline(vec![
        optional(apply_to(child(0), SIMPLIFY_SIDE.clone())),
        optional(apply_to(child(1), SIMPLIFY_SIDE.clone())),
    ])
});

/// Applies the rule, then simplifies both sides.
fn and_simplify(rule: Producer, key: MetadataKey) -> Arc<Plan> {
    Arc::new(Plan::new(
        PlanSpec::new(pipeline(vec![step(rule), optional(SIMPLIFY_BOTH_SIDES.clone())]))
            .explanation(plan::explanation(key)),
    ))
}

pub static MOVE_CONSTANTS_TO_THE_RIGHT_AND_SIMPLIFY: Lazy<Arc<Plan>> = Lazy::new(|| {
    and_simplify(MOVE_CONSTANTS_TO_THE_RIGHT.clone(), explanation::MoveConstantsToTheRightAndSimplify)
});

pub static MOVE_CONSTANTS_TO_THE_LEFT_AND_SIMPLIFY: Lazy<Arc<Plan>> = Lazy::new(|| {
    and_simplify(MOVE_CONSTANTS_TO_THE_LEFT.clone(), explanation::MoveConstantsToTheLeftAndSimplify)
});

pub static DIVIDE_BY_COEFFICIENT_OF_VARIABLE_AND_SIMPLIFY: Lazy<Arc<Plan>> = Lazy::new(|| {
    and_simplify(DIVIDE_BY_COEFFICIENT_OF_VARIABLE.clone(), explanation::DivideByCoefficientOfVariableAndSimplify)
});

/// `a < b x + c` where `a` is constant: gather the constants on the left, then swap sides.
pub static MOVE_CONSTANTS_TO_THE_LEFT_AND_FLIP: Lazy<Arc<Plan>> = Lazy::new(|| {
    Arc::new(Plan::new(
        PlanSpec::new(pipeline(vec![
            optional(MOVE_CONSTANTS_TO_THE_LEFT_AND_SIMPLIFY.clone()),
            step(FLIP_INEQUALITY.clone()),
        ]))
        .pattern(comparison_of(constant(), not_constant()))
        .explanation(plan::explanation(explanation::MoveConstantsToTheLeftAndFlip)),
    ))
});

/// `a < b x + c` where `a` is constant: swap sides, then gather the constants on the right.
pub static FLIP_AND_MOVE_CONSTANTS_TO_THE_RIGHT: Lazy<Arc<Plan>> = Lazy::new(|| {
    Arc::new(Plan::new(
        PlanSpec::new(pipeline(vec![
            step(FLIP_INEQUALITY.clone()),
            optional(MOVE_CONSTANTS_TO_THE_RIGHT_AND_SIMPLIFY.clone()),
        ]))
        .pattern(comparison_of(constant(), not_constant()))
        .explanation(plan::explanation(explanation::FlipAndMoveConstantsToTheRight)),
    ))
});

/// Brings the inequality to the form `a x < b`.
static COLLECT_VARIABLE_ON_THE_LEFT: Lazy<Producer> = Lazy::new(|| {
    let flip_first = Alternative {
        producer: FLIP_AND_MOVE_CONSTANTS_TO_THE_RIGHT.clone(),
        resource: ResourceData { curriculum: Some("US".to_string()), ..Default::default() },
    };
    first_of(vec![
        select_by_context(MOVE_CONSTANTS_TO_THE_LEFT_AND_FLIP.clone(), vec![flip_first]),
        MOVE_CONSTANTS_TO_THE_RIGHT_AND_SIMPLIFY.clone(),
    ])
});

/// Rewrites an inequality or inequation that is linear in the solution variable until the
/// variable stands alone on the left.
pub static ISOLATE_VARIABLE: Lazy<Producer> = Lazy::new(|| {
    pipeline(vec![
        optional(SIMPLIFY_BOTH_SIDES.clone()),
        optional(COLLECT_VARIABLE_ON_THE_LEFT.clone()),
        optional(NEGATE_BOTH_SIDES.clone()),
        optional(DIVIDE_BY_COEFFICIENT_OF_VARIABLE_AND_SIMPLIFY.clone()),
    ])
});

/// Solves an inequality in which the solution variable occurs on one side only, to all real
/// numbers, the empty set or an interval.
pub static SOLVE_LINEAR_INEQUALITY: Lazy<Arc<Plan>> = Lazy::new(|| {
    Arc::new(Plan::new(
        PlanSpec::new(pipeline(vec![
            optional(ISOLATE_VARIABLE.clone()),
            step(first_of(vec![
                EXTRACT_SOLUTION_FROM_INEQUALITY_IN_SOLVED_FORM.clone(),
                EXTRACT_SOLUTION_FROM_CONSTANT_INEQUALITY.clone(),
            ])),
        ]))
        .pattern(in_solution_variable(inequality_of(any(), any())))
        .result_pattern(set_solution())
        .explanation(plan::explanation(explanation::SolveLinearInequality)),
    ))
});
