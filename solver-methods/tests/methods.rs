use pretty_assertions::assert_eq;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use solver_engine::{
    expr::build,
    pattern::constant,
    plan::{Plan, PlanSpec},
    steps::{deeply, while_possible, Method, StepsProducer},
    Context,
    Expression,
    Subexpression,
    Transformation,
};
use solver_methods::{
    apply_method,
    constant_expressions::SIMPLIFY_CONSTANT_EXPRESSION,
    general,
    get_method,
    integer_arithmetic::plans::EVALUATE_SIGNED_INTEGER_POWER,
    select_plans,
};

fn parse(src: &str) -> Expression {
    src.parse().unwrap()
}

fn simplify(ctx: &Context, expr: Expression) -> Option<Transformation> {
    SIMPLIFY_CONSTANT_EXPRESSION.try_execute(ctx, &Subexpression::root(expr))
}

#[test]
fn power_is_written_out_then_evaluated() {
    let step = EVALUATE_SIGNED_INTEGER_POWER
        .try_execute(&Context::default(), &Subexpression::root(parse("[2 ^ 4]")))
        .unwrap();
    let steps = step.steps.as_ref().unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].result().to_string(), "2 * 2 * 2 * 2");
    assert_eq!(steps[1].result().to_string(), "16");
    assert_eq!(step.result(), steps[1].result());
}

#[test]
fn composite_result_is_the_last_step() {
    let step = simplify(&Context::default(), parse("[1 / 4] + [1 / 6] - [1 / 3]")).unwrap();
    assert_eq!(step.result().to_string(), "[1 / 12]");
    assert_eq!(step.result(), step.steps.as_ref().unwrap().last().unwrap().result());
}

#[test]
fn result_pattern_rejects_successful_steps() {
    let steps = while_possible(deeply(general::SIMPLIFY_DOUBLE_MINUS.clone(), false));
    let sub = Subexpression::root(parse("3 - (-x)"));
    assert!(steps.produce_steps(&Context::default(), &sub).is_some());

    let plan = Plan::new(PlanSpec::new(steps).result_pattern(constant()));
    assert!(plan.try_execute(&Context::default(), &sub).is_none());
}

#[test]
fn selects_applicable_public_methods() {
    let ctx = Context::default();
    let ids = select_plans(&ctx, &parse("x = +/-[2 / 4]"))
        .into_iter()
        .map(|(id, step)| (id, step.result().to_string()))
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![(
        "Equations.SeparatePlusMinusEquation",
        "SetSolution[x : {[1 / 2], -[1 / 2]}]".to_string(),
    )]);
}

#[test]
fn unknown_methods_suggest_close_ids() {
    let err = get_method("ConstantExpressions.SimplifyConstantExpresion").unwrap_err();
    assert_eq!(
        err.kind.help().as_deref().map(|help| String::from_utf8(strip_ansi_escapes::strip(help)).unwrap()),
        Some("did you mean `ConstantExpressions.SimplifyConstantExpression`?".to_string()),
    );

    let err = apply_method("Equations.SeparatePlusMinusEquation", &Context::default(), &parse("x = 1")).unwrap_err();
    assert_eq!(err.kind.message(), "`Equations.SeparatePlusMinusEquation` cannot be applied to this expression");
}

#[test]
fn decimals_depend_on_the_context() {
    let expr = parse("[3 / 4] - [1 / 2]");
    let fraction = simplify(&Context::default(), expr.clone()).unwrap();
    let decimal = simplify(&Context::default().with_prefer_decimals(true), expr).unwrap();
    assert_eq!(fraction.result().to_string(), "[1 / 4]");
    assert_eq!(decimal.result().to_string(), "0.25");
}

#[test]
fn term_order_does_not_change_the_result() {
    let mut rng = rand::thread_rng();
    let mut terms = vec![parse("[1 / 2]"), parse("[1 / 3]"), build::xp(2), build::xp(5)];
    for _ in 0..8 {
        terms.shuffle(&mut rng);
        let expr = build::sum_of(terms.clone());
        let step = simplify(&Context::default(), expr.clone())
            .unwrap_or_else(|| panic!("`{}` was not simplified", expr));
        assert_eq!(step.result().to_string(), "[47 / 6]", "simplifying `{}`", expr);
    }
}

#[test]
fn requests_run_in_parallel() {
    let inputs = [
        "[1 / 4] + [1 / 6]",
        "2 * (3 + 4) - [2 ^ 3]",
        "[6 / 9] + 1",
        "(-2) * (-3) : 6",
        "[(-2) ^ 3] + 10",
        "1 + [1 / 0]",
    ];
    let sequential = inputs
        .iter()
        .map(|src| simplify(&Context::default(), parse(src)).map(|step| step.result().to_string()))
        .collect::<Vec<_>>();
    let parallel = inputs
        .par_iter()
        .map(|src| simplify(&Context::default(), parse(src)).map(|step| step.result().to_string()))
        .collect::<Vec<_>>();

    assert_eq!(parallel, sequential);
    assert_eq!(parallel[0].as_deref(), Some("[5 / 12]"));
    assert_eq!(parallel[1].as_deref(), Some("6"));
    assert_eq!(parallel[2].as_deref(), Some("[5 / 3]"));
    assert_eq!(parallel[3].as_deref(), Some("1"));
    assert_eq!(parallel[4].as_deref(), Some("2"));
    assert_eq!(parallel[5].as_deref(), Some("/undefined/"));
}

#[test]
fn inequalities_follow_the_curriculum() {
    let expr = parse("7 > 2 x + 1");
    let ctx = Context::default().with_solution_variable("x");
    let default = apply_method("Inequalities.SolveLinearInequality", &ctx, &expr).unwrap();
    let us = apply_method("Inequalities.SolveLinearInequality", &ctx.clone().with_curriculum("US"), &expr).unwrap();
    assert_eq!(default.result().to_string(), "SetSolution[x : (-/infinity/, 3)]");
    assert_eq!(us.result(), default.result());
    assert_ne!(us.steps, default.steps);

    let eu = apply_method("Inequalities.SolveLinearInequality", &ctx.with_curriculum("EU"), &expr).unwrap();
    assert_eq!(eu.steps, default.steps);
}
