//! Equations whose solutions can be read off directly.

use crate::{constant_expressions::SIMPLIFY_CONSTANT_EXPRESSION, explanation::keys};
use once_cell::sync::Lazy;
use solver_engine::{
    expr::{build, Expression},
    metadata::Metadata,
    pattern::*,
    plan,
    steps::{apply_to, child, Producer},
    tasks::{TaskSet, TasksBuilder},
    transformation::Task,
};
use std::sync::Arc;

pub mod explanation {
    super::keys!("Equations";
        /// `x = +/-a` to the equations `x = a` and `x = -a`
        SeparatePlusMinusEquation,

        PlusSolution,
        MinusSolution,

        /// Gathers the solutions of the separate equations into a solution set.
        CollectSolutions,
    );
}

/// Simplifies the right hand side of an equation.
static SIMPLIFY_SOLUTION: Lazy<Producer> =
    Lazy::new(|| apply_to(child(1), SIMPLIFY_CONSTANT_EXPRESSION.clone()));

/// Adds a task for `equation`, simplifying its right hand side if possible.
fn solution_task(tasks: &mut TasksBuilder<'_>, equation: Expression, explanation: Metadata) -> Option<Task> {
    tasks
        .task(equation.clone(), Some(explanation.clone()), Some(SIMPLIFY_SOLUTION.as_ref()), Vec::new())
        .or_else(|| tasks.task(equation, Some(explanation), None, Vec::new()))
}

/// Solves `x = +/-a` for a constant `a` by solving `x = a` and `x = -a` separately.
pub static SEPARATE_PLUS_MINUS_EQUATION: Lazy<Arc<TaskSet>> = Lazy::new(|| {
    let variable = variable();
    let value = constant();
    let pattern = equation_of(&variable, plus_minus_of(&value));

    Arc::new(
        TaskSet::new(pattern, move |tasks| {
            let variable = tasks.expr().get_expr(&variable)?;
            let value = tasks.expr().get_expr(&value)?;

            let plus = solution_task(
                tasks,
                build::equation_of(variable.clone(), value.clone()),
                Metadata::key(explanation::PlusSolution),
            )?;
            let minus = solution_task(
                tasks,
                build::equation_of(variable.clone(), build::neg_of(value)),
                Metadata::key(explanation::MinusSolution),
            )?;

            let solutions = vec![plus.result().second_child()?.clone(), minus.result().second_child()?.clone()];
            tasks.task(
                build::set_solution_of(vec![variable], build::set_of(solutions)),
                Some(Metadata::key(explanation::CollectSolutions)),
                None,
                vec![plus.task_id, minus.task_id],
            )?;
            Some(())
        })
        .with_explanation(plan::explanation(explanation::SeparatePlusMinusEquation)),
    )
});

#[cfg(test)]
mod tests {
    use crate::test_util::run;
    use pretty_assertions::assert_eq;
    use solver_engine::transformation::TransformationKind;
    use super::*;

    #[test]
    fn separates_the_signs() {
        let step = run(&**SEPARATE_PLUS_MINUS_EQUATION, "x = +/-2").unwrap();
        assert_eq!(step.kind, TransformationKind::TaskSet);
        assert_eq!(step.result().to_string(), "SetSolution[x : {2, -2}]");

        let tasks = step.tasks.as_ref().unwrap();
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].start_expr.to_string(), "x = 2");
        assert!(tasks[0].steps.is_empty());
        assert_eq!(tasks[1].start_expr.to_string(), "x = -2");
        assert_eq!(tasks[2].depends_on, vec!["#1".to_string(), "#2".to_string()]);
        assert_eq!(tasks[2].explanation.as_ref().unwrap().key, explanation::CollectSolutions);
    }

    #[test]
    fn solutions_are_simplified() {
        let step = run(&**SEPARATE_PLUS_MINUS_EQUATION, "x = +/-[4 / 6]").unwrap();
        let tasks = step.tasks.as_ref().unwrap();
        assert_eq!(tasks[0].result().to_string(), "x = [2 / 3]");
        assert!(!tasks[0].steps.is_empty());
        assert_eq!(tasks[1].result().to_string(), "x = -[2 / 3]");
        assert_eq!(step.result().to_string(), "SetSolution[x : {[2 / 3], -[2 / 3]}]");
    }

    #[test]
    fn only_constant_values() {
        assert!(run(&**SEPARATE_PLUS_MINUS_EQUATION, "x = +/-y").is_none());
        assert!(run(&**SEPARATE_PLUS_MINUS_EQUATION, "x = 2").is_none());
    }
}
