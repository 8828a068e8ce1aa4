//! Methods whose result is a set of independent, explained derivations.

use crate::{
    builder::ExpressionBuilder,
    context::Context,
    expr::Expression,
    mapped::MappedExpression,
    mapping::{PathMapping, PathMappingType},
    metadata::Metadata,
    path::{Path, Subexpression},
    plan::MetadataFn,
    steps::{Method, StepsProducer},
    transformation::{Tag, Task, Transformation, TransformationKind},
    pattern::Pattern,
};
use std::{collections::BTreeSet, fmt};
use tracing::debug;

/// Collects the tasks of one [`TaskSet`] execution.
///
/// Tasks are numbered `#1`, `#2`, ... in the order they are added. A task whose steps cannot be
/// produced is not added and does not use up a number.
pub struct TasksBuilder<'a> {
    builder: ExpressionBuilder<'a>,
    tasks: Vec<Task>,
}

impl<'a> TasksBuilder<'a> {
    pub fn new(builder: ExpressionBuilder<'a>) -> Self {
        Self { builder, tasks: Vec::new() }
    }

    /// The bindings of the match that triggered the task set.
    pub fn expr(&self) -> &ExpressionBuilder<'a> {
        &self.builder
    }

    pub fn ctx(&self) -> &'a Context {
        self.builder.ctx()
    }

    /// The tasks added so far.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Adds a task starting at `start_expr`. If `steps` is given, it must apply to the starting
    /// expression, and the task is the derivation it produces; otherwise the task just states
    /// its starting expression.
    ///
    /// Returns the added task, or [`None`] if the steps did not apply.
    pub fn task(
        &mut self,
        start_expr: Expression,
        explanation: Option<Metadata>,
        steps: Option<&dyn StepsProducer>,
        depends_on: Vec<String>,
    ) -> Option<Task> {
        let steps = match steps {
            Some(producer) => producer.produce_steps(self.ctx(), &Subexpression::root(start_expr.clone()))?,
            None => Vec::new(),
        };
        let task = Task {
            task_id: format!("#{}", self.tasks.len() + 1),
            start_expr,
            explanation,
            steps,
            depends_on,
        };
        self.tasks.push(task.clone());
        Some(task)
    }

    /// The tasks, or [`None`] if none were added.
    pub fn all_tasks(self) -> Option<Vec<Task>> {
        (!self.tasks.is_empty()).then_some(self.tasks)
    }
}

type TasksFn = dyn Fn(&mut TasksBuilder<'_>) -> Option<()> + Send + Sync;

/// A method splitting the work on an expression into several tasks.
///
/// The result of a task set is the result of its last task.
pub struct TaskSet {
    pattern: Pattern,
    explanation: Option<MetadataFn>,
    skills: Vec<MetadataFn>,
    tags: BTreeSet<Tag>,
    tasks: Box<TasksFn>,
}

impl TaskSet {
    /// Creates a task set applying to the expressions matching `pattern`. The body adds tasks
    /// to the builder, and may give up by returning [`None`].
    pub fn new(
        pattern: impl Into<Pattern>,
        tasks: impl Fn(&mut TasksBuilder<'_>) -> Option<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            explanation: None,
            skills: Vec::new(),
            tags: BTreeSet::new(),
            tasks: Box::new(tasks),
        }
    }

    pub fn with_explanation(mut self, explanation: MetadataFn) -> Self {
        self.explanation = Some(explanation);
        self
    }

    /// Adds a skill, evaluated against the match that triggered the task set.
    pub fn with_skill(mut self, skill: MetadataFn) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.insert(tag);
        self
    }
}

impl fmt::Debug for TaskSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSet").field("pattern", &self.pattern).finish_non_exhaustive()
    }
}

impl Method for TaskSet {
    fn try_execute(&self, ctx: &Context, sub: &Subexpression) -> Option<Transformation> {
        let m = self.pattern.first_match(ctx, sub)?;
        let builder = ExpressionBuilder::new(ctx, sub, &m);

        let mut tasks = TasksBuilder::new(builder);
        (self.tasks)(&mut tasks)?;
        let tasks = tasks.all_tasks()?;
        let result = tasks.last()?.result().clone();

        let explanation = self.explanation.as_ref().and_then(|f| f(&builder));
        let skills = self.skills.iter().filter_map(|f| f(&builder)).collect();
        // the whole expression is replaced by the collected result
        let mapping = PathMapping::new(vec![Path::root()], PathMappingType::Transform, vec![Path::root()]);
        debug!(target: "plan", from = %sub.expr, to = %result, tasks = tasks.len(), "task set applied");
        Some(Transformation {
            kind: TransformationKind::TaskSet,
            from_expr: sub.clone(),
            to_expr: MappedExpression::new(result, vec![mapping]),
            steps: None,
            tasks: Some(tasks),
            explanation,
            skills,
            tags: self.tags.clone(),
        })
    }
}

impl StepsProducer for TaskSet {
    fn produce_steps(&self, ctx: &Context, sub: &Subexpression) -> Option<Vec<Transformation>> {
        self.try_execute(ctx, sub).map(|step| vec![step])
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        expr::build,
        pattern::*,
        plan::explanation,
        steps::{fixtures::*, while_possible},
    };
    use pretty_assertions::assert_eq;
    use super::*;

    /// Splits `a = +/-b` into `a = b` and `a = -b`, then collects both.
    fn split() -> TaskSet {
        let lhs = any();
        let rhs = any();
        TaskSet::new(equation_of(&lhs, plus_minus_of(&rhs)), move |tasks| {
            let lhs = tasks.expr().get_expr(&lhs)?;
            let rhs = tasks.expr().get_expr(&rhs)?;
            let plus = tasks.task(build::equation_of(lhs.clone(), rhs.clone()), None, None, Vec::new())?;
            let minus = tasks.task(build::equation_of(lhs.clone(), build::neg_of(rhs.clone())), None, None, Vec::new())?;
            tasks.task(
                build::set_of(vec![rhs.clone(), build::neg_of(rhs)]),
                Some(Metadata::key("Test.CollectSolutions")),
                None,
                vec![plus.task_id, minus.task_id],
            )?;
            Some(())
        })
        .with_explanation(explanation("Test.SplitPlusMinus"))
        .with_skill(explanation("Test.SolvePlusMinus"))
    }

    #[test]
    fn tasks_are_numbered_in_order() {
        let ctx = Context::default();
        let sub = Subexpression::root("x = +/-2".parse().unwrap());
        let step = split().try_execute(&ctx, &sub).unwrap();
        assert_eq!(step.kind, TransformationKind::TaskSet);

        let tasks = step.tasks.as_ref().unwrap();
        let ids = tasks.iter().map(|task| task.task_id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["#1", "#2", "#3"]);
        assert_eq!(tasks[0].start_expr.to_string(), "x = 2");
        assert_eq!(tasks[1].start_expr.to_string(), "x = -2");
        assert_eq!(tasks[2].depends_on, vec!["#1".to_string(), "#2".to_string()]);
        assert_eq!(step.result(), tasks[2].result());
        assert_eq!(step.explanation.unwrap().key.as_str(), "Test.SplitPlusMinus");
    }

    #[test]
    fn task_set_maps_the_whole_expression() {
        let ctx = Context::default();
        let sub = Subexpression::root("x = +/-2".parse().unwrap());
        let step = split().with_tag(Tag::Pedantic).try_execute(&ctx, &sub).unwrap();

        let mappings = step.path_mappings();
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].kind, PathMappingType::Transform);
        assert_eq!(mappings[0].from_paths, vec![Path::root()]);
        assert_eq!(mappings[0].to_paths, vec![Path::root()]);

        let skills = step.skills.iter().map(|skill| skill.key.as_str()).collect::<Vec<_>>();
        assert_eq!(skills, vec!["Test.SolvePlusMinus"]);
        assert!(step.tags.contains(&Tag::Pedantic));
    }

    #[test]
    fn failed_tasks_are_not_numbered() {
        let ctx = Context::default();
        let sub = Subexpression::root(build::xp(1));
        let m = Match::empty();
        let mut tasks = TasksBuilder::new(ExpressionBuilder::new(&ctx, &sub, &m));

        let sums = while_possible(add_integers());
        assert!(tasks.task(build::var("x"), None, Some(sums.as_ref()), Vec::new()).is_none());
        let task = tasks.task("1 + 2 + 3".parse().unwrap(), None, Some(sums.as_ref()), Vec::new()).unwrap();
        assert_eq!(task.task_id, "#1");
        assert_eq!(task.steps.len(), 2);
        assert_eq!(task.result(), &build::xp(6));
    }

    #[test]
    fn no_tasks_is_none() {
        let ctx = Context::default();
        let empty = TaskSet::new(any(), |_| Some(()));
        assert!(empty.try_execute(&ctx, &Subexpression::root(build::xp(1))).is_none());
    }
}
