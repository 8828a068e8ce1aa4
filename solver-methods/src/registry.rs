//! The flat namespace of runnable methods, looked up by `Category.Name` id.

use crate::{
    constant_expressions,
    equations,
    error::{MethodNotApplicable, UnknownMethod},
    fraction_arithmetic,
    general,
    inequalities,
    inequations,
    integer_arithmetic,
};
use levenshtein::levenshtein;
use once_cell::sync::Lazy;
use solver_engine::{steps::Method, Context, Error, Expression, Subexpression, Transformation};
use std::{collections::BTreeMap, fmt, sync::Arc};
use tracing::debug;

/// A method registered under an id.
#[derive(Clone)]
pub struct MethodEntry {
    pub id: &'static str,

    /// Whether the method is offered when selecting plans for an expression.
    pub public: bool,
    pub description: &'static str,
    pub method: Arc<dyn Method>,
}

impl fmt::Debug for MethodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodEntry")
            .field("id", &self.id)
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

fn entry(id: &'static str, public: bool, description: &'static str, method: Arc<dyn Method>) -> MethodEntry {
    MethodEntry { id, public, description, method }
}

static REGISTRY: Lazy<BTreeMap<&'static str, MethodEntry>> = Lazy::new(|| {
    let entries = vec![
        entry(
            "IntegerArithmetic.EvaluateArithmeticExpression",
            true,
            "Evaluate an expression of integers",
            integer_arithmetic::plans::EVALUATE_ARITHMETIC_EXPRESSION.clone(),
        ),
        entry(
            "ConstantExpressions.SimplifyConstantExpression",
            true,
            "Simplify an expression without variables",
            constant_expressions::SIMPLIFY_CONSTANT_EXPRESSION.clone(),
        ),
        entry(
            "Equations.SeparatePlusMinusEquation",
            true,
            "Solve an equation of the form x = +/-a",
            equations::SEPARATE_PLUS_MINUS_EQUATION.clone(),
        ),
        entry(
            "Inequalities.SolveLinearInequality",
            true,
            "Solve an inequality that is linear in the solution variable",
            inequalities::SOLVE_LINEAR_INEQUALITY.clone(),
        ),
        entry(
            "Inequations.SolveInequationInOneVariable",
            true,
            "Solve an inequation that is linear in the solution variable",
            inequations::SOLVE_INEQUATION_IN_ONE_VARIABLE.clone(),
        ),
        entry(
            "IntegerArithmetic.EvaluateProductOfIntegers",
            false,
            "Multiply and divide the integers of a product",
            integer_arithmetic::plans::EVALUATE_PRODUCT_OF_INTEGERS.clone(),
        ),
        entry(
            "IntegerArithmetic.EvaluateSumOfIntegers",
            false,
            "Add the integers of a sum",
            integer_arithmetic::plans::EVALUATE_SUM_OF_INTEGERS.clone(),
        ),
        entry(
            "IntegerArithmetic.EvaluateSignedIntegerPower",
            false,
            "Evaluate a power of integers",
            integer_arithmetic::plans::EVALUATE_SIGNED_INTEGER_POWER.clone(),
        ),
        entry(
            "IntegerArithmetic.SimplifyIntegersInProduct",
            false,
            "Simplify the integers of a product",
            integer_arithmetic::plans::SIMPLIFY_INTEGERS_IN_PRODUCT.clone(),
        ),
        entry(
            "IntegerArithmetic.SimplifyIntegersInSum",
            false,
            "Simplify the integers of a sum",
            integer_arithmetic::plans::SIMPLIFY_INTEGERS_IN_SUM.clone(),
        ),
        entry(
            "IntegerArithmetic.EvaluateSignedIntegerAddition",
            false,
            "Add two integers of a sum",
            integer_arithmetic::rules::EVALUATE_SIGNED_INTEGER_ADDITION.clone(),
        ),
        entry(
            "IntegerArithmetic.EvaluateIntegerProductAndDivision",
            false,
            "Multiply or divide two integers of a product",
            integer_arithmetic::rules::EVALUATE_INTEGER_PRODUCT_AND_DIVISION.clone(),
        ),
        entry(
            "FractionArithmetic.AddFractions",
            false,
            "Add two fractions of a sum",
            fraction_arithmetic::plans::ADD_FRACTIONS.clone(),
        ),
        entry(
            "FractionArithmetic.SimplifyFraction",
            false,
            "Reduce a fraction to lowest terms",
            fraction_arithmetic::plans::SIMPLIFY_FRACTION.clone(),
        ),
        entry(
            "FractionArithmetic.AddLikeFractions",
            false,
            "Add two fractions with the same denominator",
            fraction_arithmetic::rules::ADD_LIKE_FRACTIONS.clone(),
        ),
        entry(
            "FractionArithmetic.BringToCommonDenominator",
            false,
            "Rewrite two fractions over their least common denominator",
            fraction_arithmetic::rules::BRING_TO_COMMON_DENOMINATOR.clone(),
        ),
        entry(
            "FractionArithmetic.ConvertIntegerToFraction",
            false,
            "Write an integer next to a fraction as a fraction",
            fraction_arithmetic::rules::CONVERT_INTEGER_TO_FRACTION.clone(),
        ),
        entry(
            "ConstantExpressions.ConvertFractionToDecimal",
            false,
            "Write a fraction as a terminating decimal",
            constant_expressions::CONVERT_FRACTION_TO_DECIMAL.clone(),
        ),
        entry(
            "General.SimplifyDoubleMinus",
            false,
            "Remove a double minus sign",
            general::SIMPLIFY_DOUBLE_MINUS.clone(),
        ),
        entry(
            "General.RewritePowerAsProduct",
            false,
            "Write a small power out as a product",
            general::REWRITE_POWER_AS_PRODUCT.clone(),
        ),
        entry(
            "General.SimplifyUnitFractionToOne",
            false,
            "Replace a fraction with equal numerator and denominator by one",
            general::SIMPLIFY_UNIT_FRACTION_TO_ONE.clone(),
        ),
        entry(
            "General.CancelCommonTerms",
            false,
            "Cancel the common factors of a fraction",
            general::CANCEL_COMMON_TERMS.clone(),
        ),
        entry(
            "General.RewriteDivisionAsFraction",
            false,
            "Write a division as a fraction",
            general::REWRITE_DIVISION_AS_FRACTION.clone(),
        ),
        entry(
            "General.CancelDenominator",
            false,
            "Cancel a denominator against a factor of the numerator",
            general::CANCEL_DENOMINATOR.clone(),
        ),
        entry(
            "General.CancelAdditiveInverseElements",
            false,
            "Cancel a term against its opposite",
            general::CANCEL_ADDITIVE_INVERSE_ELEMENTS.clone(),
        ),
        entry(
            "General.EvaluateExpressionToThePowerOfZero",
            false,
            "Replace a power with exponent zero by one",
            general::EVALUATE_EXPRESSION_TO_THE_POWER_OF_ZERO.clone(),
        ),
        entry(
            "FractionArithmetic.SimplifyFractionWithFractionDenominator",
            false,
            "Multiply by the reciprocal of a fraction in the denominator",
            fraction_arithmetic::rules::SIMPLIFY_FRACTION_WITH_FRACTION_DENOMINATOR.clone(),
        ),
        entry(
            "Inequalities.FlipInequality",
            false,
            "Swap the sides of an inequality",
            inequalities::FLIP_INEQUALITY.clone(),
        ),
        entry(
            "Inequalities.ExtractSolutionFromConstantInequality",
            false,
            "Decide an inequality between two numbers",
            inequalities::EXTRACT_SOLUTION_FROM_CONSTANT_INEQUALITY.clone(),
        ),
        entry(
            "Inequalities.ExtractSolutionFromInequalityInSolvedForm",
            false,
            "Write x < a and the like as an interval",
            inequalities::EXTRACT_SOLUTION_FROM_INEQUALITY_IN_SOLVED_FORM.clone(),
        ),
        entry(
            "Inequalities.DivideByCoefficientOfVariableAndSimplify",
            false,
            "Divide both sides by the coefficient of the variable",
            inequalities::DIVIDE_BY_COEFFICIENT_OF_VARIABLE_AND_SIMPLIFY.clone(),
        ),
        entry(
            "Inequations.ExtractSolutionFromInequationInSolvedForm",
            false,
            "Write x != a as the reals without a",
            inequations::EXTRACT_SOLUTION_FROM_INEQUATION_IN_SOLVED_FORM.clone(),
        ),
    ];

    entries.into_iter().map(|entry| (entry.id, entry)).collect()
});

/// All registered methods, ordered by id.
pub fn methods() -> impl Iterator<Item = &'static MethodEntry> {
    REGISTRY.values()
}

/// Returns the ids of the registered methods with an id similar to the given one.
fn similar_ids(id: &str) -> Vec<String> {
    REGISTRY
        .keys()
        .filter(|candidate| levenshtein(candidate, id) < 3)
        .map(|candidate| candidate.to_string())
        .collect()
}

/// Looks up a method by id.
pub fn get_method(id: &str) -> Result<&'static MethodEntry, Error> {
    debug!(target: "registry", id, "looking up method");
    REGISTRY.get(id).ok_or_else(|| {
        Error::unspanned(UnknownMethod { name: id.to_string(), suggestions: similar_ids(id) })
    })
}

/// Runs every public method on the expression, returning the ones that apply.
pub fn select_plans(ctx: &Context, expr: &Expression) -> Vec<(&'static str, Transformation)> {
    let sub = Subexpression::root(expr.clone());
    let selected = REGISTRY
        .values()
        .filter(|entry| entry.public)
        .filter_map(|entry| entry.method.try_execute(ctx, &sub).map(|step| (entry.id, step)))
        .collect::<Vec<_>>();
    debug!(target: "registry", %expr, selected = selected.len(), "selected plans");
    selected
}

/// Runs the method with the given id on the whole expression.
pub fn apply_method(id: &str, ctx: &Context, expr: &Expression) -> Result<Transformation, Error> {
    let entry = get_method(id)?;
    entry
        .method
        .try_execute(ctx, &Subexpression::root(expr.clone()))
        .ok_or_else(|| Error::unspanned(MethodNotApplicable { name: id.to_string() }))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn ids_match_their_category() {
        for entry in methods() {
            let (category, name) = entry.id.split_once('.').unwrap();
            assert!(!category.is_empty() && !name.is_empty(), "{}", entry.id);
        }
        assert_eq!(methods().filter(|entry| entry.public).count(), 5);
    }

    #[test]
    fn close_ids_are_suggested() {
        let err = get_method("General.SimplifyDoubleMinsu").unwrap_err();
        assert_eq!(err.kind.message(), "there is no method named `General.SimplifyDoubleMinsu`");
        assert_eq!(similar_ids("General.SimplifyDoubleMinsu"), vec!["General.SimplifyDoubleMinus".to_string()]);
        assert!(similar_ids("Nothing").is_empty());
    }

    #[test]
    fn select_public_plans() {
        let ctx = Context::default();
        let selected = select_plans(&ctx, &"1 + 2 * 3".parse().unwrap());
        let ids = selected.iter().map(|(id, _)| *id).collect::<Vec<_>>();
        assert_eq!(ids, vec![
            "ConstantExpressions.SimplifyConstantExpression",
            "IntegerArithmetic.EvaluateArithmeticExpression",
        ]);
        for (_, step) in &selected {
            assert_eq!(step.result().to_string(), "7");
        }
    }

    #[test]
    fn inapplicable_method() {
        let ctx = Context::default();
        let expr = "x + 1".parse().unwrap();
        assert!(apply_method("IntegerArithmetic.EvaluateArithmeticExpression", &ctx, &expr).is_err());
        assert!(apply_method("General.Nothing", &ctx, &expr).is_err());

        let step = apply_method("General.SimplifyDoubleMinus", &ctx, &"-(-5)".parse().unwrap()).unwrap();
        assert_eq!(step.result().to_string(), "5");
    }

    #[test]
    fn inequalities_need_a_solution_variable() {
        let expr = "2 x + 1 < 7".parse().unwrap();
        assert!(select_plans(&Context::default(), &expr).is_empty());

        let ctx = Context::default().with_solution_variable("x");
        let selected = select_plans(&ctx, &expr);
        let ids = selected.iter().map(|(id, _)| *id).collect::<Vec<_>>();
        assert_eq!(ids, vec!["Inequalities.SolveLinearInequality"]);
        assert_eq!(selected[0].1.result().to_string(), "SetSolution[x : (-/infinity/, 3)]");

        let step = apply_method("Inequations.SolveInequationInOneVariable", &ctx, &"x + 1 != 4".parse().unwrap()).unwrap();
        assert_eq!(step.result().to_string(), "SetSolution[x : /reals/ \\ {3}]");
    }
}
