//! Inequations `a != b` in the solution variable.

use crate::{
    explanation::keys,
    inequalities::{holds, rational, set_solution, solution_set, ISOLATE_VARIABLE},
};
use once_cell::sync::Lazy;
use solver_engine::{
    expr::{build, Comparator, Operator},
    mapped,
    pattern::*,
    plan::{self, Plan, PlanSpec},
    rule::{Rule, RuleResult},
    steps::{first_of, optional, pipeline, step},
    transformation::Tag,
};
use std::sync::Arc;

pub mod explanation {
    super::keys!("Inequations";
        /// `x != a` to all real numbers except `a`
        ExtractSolutionFromInequationInSolvedForm,

        /// `1 != 2` to all real numbers
        ExtractSolutionFromTrueInequation,

        /// `2 != 2` to the empty set
        ExtractSolutionFromFalseInequation,

        SolveInequationInOneVariable,
    );
}

pub static EXTRACT_SOLUTION_FROM_INEQUATION_IN_SOLVED_FORM: Lazy<Arc<Rule>> = Lazy::new(|| {
    let variable = solution_variable();
    // `+/-` would stand for two values
    let value = condition(constant(), |expr| {
        expr.post_order_iter().all(|part| *part.operator() != Operator::PlusMinus)
    });
    let inequation = inequation_of(&variable, &value);

    Arc::new(Rule::new(inequation, move |b| {
        let excluded = mapped::set_of(vec![b.move_(&value)?]);
        let set = mapped::set_difference_of(b.introduce(build::reals()), excluded);
        Some(
            RuleResult::new(
                mapped::set_solution_of(vec![b.move_(&variable)?], set),
                b.metadata(explanation::ExtractSolutionFromInequationInSolvedForm, &[])?,
            )
            .with_tag(Tag::Pedantic),
        )
    }))
});

pub static EXTRACT_SOLUTION_FROM_CONSTANT_INEQUATION: Lazy<Arc<Rule>> = Lazy::new(|| {
    let lhs = rational();
    let rhs = rational();
    let inequation = inequation_of(&lhs, &rhs);

    Arc::new(Rule::new(inequation.clone(), move |b| {
        let variable = b.ctx().solution_variable.as_deref()?;
        let (left, right) = (b.get_expr(&lhs)?.rational_value()?, b.get_expr(&rhs)?.rational_value()?);
        let (set, key) = if holds(Comparator::NotEq, &left, &right) {
            (build::reals(), explanation::ExtractSolutionFromTrueInequation)
        } else {
            (build::set_of(Vec::new()), explanation::ExtractSolutionFromFalseInequation)
        };
        Some(RuleResult::new(b.transform(&inequation, solution_set(variable, set)), b.metadata(key, &[])?))
    }))
});

/// Solves an inequation that is linear in the solution variable, to all real numbers except
/// one value.
pub static SOLVE_INEQUATION_IN_ONE_VARIABLE: Lazy<Arc<Plan>> = Lazy::new(|| {
    Arc::new(Plan::new(
        PlanSpec::new(pipeline(vec![
            optional(ISOLATE_VARIABLE.clone()),
            step(first_of(vec![
                EXTRACT_SOLUTION_FROM_INEQUATION_IN_SOLVED_FORM.clone(),
                EXTRACT_SOLUTION_FROM_CONSTANT_INEQUATION.clone(),
            ])),
        ]))
        .pattern(in_solution_variable(inequation_of(any(), any())))
        .result_pattern(set_solution())
        .explanation(plan::explanation(explanation::SolveInequationInOneVariable)),
    ))
});

#[cfg(test)]
mod tests {
    use crate::{inequalities, test_util::run_in};
    use pretty_assertions::assert_eq;
    use solver_engine::Context;
    use super::*;

    fn in_x() -> Context {
        Context::default().with_solution_variable("x")
    }

    fn solve(src: &str) -> Option<String> {
        run_in(&in_x(), &**SOLVE_INEQUATION_IN_ONE_VARIABLE, src).map(|step| step.result().to_string())
    }

    #[test]
    fn solved_form() {
        let step = run_in(&in_x(), &**EXTRACT_SOLUTION_FROM_INEQUATION_IN_SOLVED_FORM, "x != 3").unwrap();
        assert_eq!(step.result().to_string(), "SetSolution[x : /reals/ \\ {3}]");
        assert!(step.tags.contains(&Tag::Pedantic));

        assert!(run_in(&in_x(), &**EXTRACT_SOLUTION_FROM_INEQUATION_IN_SOLVED_FORM, "x != +/-3").is_none());
        assert!(run_in(&in_x(), &**EXTRACT_SOLUTION_FROM_INEQUATION_IN_SOLVED_FORM, "x < 3").is_none());
        assert!(run_in(&Context::default(), &**EXTRACT_SOLUTION_FROM_INEQUATION_IN_SOLVED_FORM, "x != 3").is_none());
    }

    #[test]
    fn constant_inequations() {
        let step = run_in(&in_x(), &**EXTRACT_SOLUTION_FROM_CONSTANT_INEQUATION, "[2 / 4] != 0.5").unwrap();
        assert_eq!(step.result().to_string(), "SetSolution[x : {}]");
        assert_eq!(step.explanation.unwrap().key, explanation::ExtractSolutionFromFalseInequation);

        let step = run_in(&in_x(), &**EXTRACT_SOLUTION_FROM_CONSTANT_INEQUATION, "1 != 2").unwrap();
        assert_eq!(step.result().to_string(), "SetSolution[x : /reals/]");
    }

    #[test]
    fn linear_inequations() {
        assert_eq!(solve("x != 3").as_deref(), Some("SetSolution[x : /reals/ \\ {3}]"));
        assert_eq!(solve("x + 2 != 5").as_deref(), Some("SetSolution[x : /reals/ \\ {3}]"));
        assert_eq!(solve("4 != 2 x").as_deref(), Some("SetSolution[x : /reals/ \\ {2}]"));
        assert_eq!(solve("3 - x != 1").as_deref(), Some("SetSolution[x : /reals/ \\ {2}]"));
        assert_eq!(solve("1 + 1 != 2").as_deref(), Some("SetSolution[x : {}]"));
        assert_eq!(solve("x < 3"), None);
        assert_eq!(solve("x != x + 1"), None);
    }

    #[test]
    fn the_sign_is_kept_when_dividing() {
        let step = run_in(&in_x(), &**inequalities::DIVIDE_BY_COEFFICIENT_OF_VARIABLE, "(-3) x != 6").unwrap();
        assert_eq!(*step.result().operator(), Operator::Inequality(Comparator::NotEq));
    }
}
