//! The derivation tree produced by methods.

use crate::{
    expr::Expression,
    mapped::MappedExpression,
    mapping::{merge_path_mappings, PathMapping},
    metadata::Metadata,
    path::Subexpression,
};
use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::Serialize;

/// What produced a transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum TransformationKind {
    Rule,
    Plan,
    TaskSet,
}

/// Labels describing the nature of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Tag {
    /// The step only reorders terms or factors.
    Rearrangement,

    /// The step only changes how the expression looks, such as removing a bracket.
    Cosmetic,

    /// The step is too obvious to show to most users.
    Pedantic,

    /// The step does not change the rendered expression.
    InvisibleChange,
}

/// An independent piece of work in a [`TaskSet`](crate::tasks::TaskSet).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Task {
    /// The identifier of the task within its task set, such as `"#1"`.
    pub task_id: String,
    pub start_expr: Expression,
    pub explanation: Option<Metadata>,

    /// The steps taking `start_expr` to the result of the task. Empty if the task just states
    /// its starting expression.
    pub steps: Vec<Transformation>,

    /// The identifiers of the tasks whose results this task uses.
    pub depends_on: Vec<String>,
}

impl Task {
    /// The result of the task.
    pub fn result(&self) -> &Expression {
        self.steps
            .last()
            .map_or(&self.start_expr, |step| &step.to_expr.expr)
    }
}

/// A rewrite of a subexpression, with its explanation and provenance.
///
/// A transformation produced by a rule is a leaf. Plans and task sets produce composite
/// transformations whose `steps` (or `tasks`) lead from `from_expr` to `to_expr`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Transformation {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: TransformationKind,

    /// The subexpression that was rewritten, and where it is.
    pub from_expr: Subexpression,

    /// The result, with mappings relative to `from_expr` and to the result itself.
    pub to_expr: MappedExpression,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub steps: Option<Vec<Transformation>>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub tasks: Option<Vec<Task>>,

    pub explanation: Option<Metadata>,
    pub skills: Vec<Metadata>,
    pub tags: BTreeSet<Tag>,
}

impl Transformation {
    /// A leaf transformation.
    pub fn rule(from_expr: Subexpression, to_expr: MappedExpression, explanation: Metadata) -> Self {
        Self {
            kind: TransformationKind::Rule,
            from_expr,
            to_expr,
            steps: None,
            tasks: None,
            explanation: Some(explanation),
            skills: Vec::new(),
            tags: BTreeSet::new(),
        }
    }

    /// A composite transformation made of the given steps, each of which rewrites a
    /// subexpression at or below `from_expr`. The result is the result of the last step.
    /// Returns [`None`] if there are no steps.
    pub fn composite(kind: TransformationKind, from_expr: Subexpression, steps: Vec<Transformation>) -> Option<Self> {
        let last = steps.last()?;
        let to_expr = if last.from_expr.path == from_expr.path {
            last.to_expr.expr.clone()
        } else {
            from_expr
                .substitute(&last.from_expr.path, last.to_expr.expr.clone())
                .unwrap_or_else(|| last.to_expr.expr.clone())
        };

        let mappings = merge_path_mappings(steps.iter().flat_map(|step| {
            let prefix = step
                .from_expr
                .path
                .strip_prefix(&from_expr.path)
                .unwrap_or_default();
            step.to_expr
                .mappings
                .iter()
                .map(move |mapping| mapping.relativize(&prefix, &prefix))
                .collect::<Vec<_>>()
        }));

        Some(Self {
            kind,
            from_expr,
            to_expr: MappedExpression::new(to_expr, mappings),
            steps: Some(steps),
            tasks: None,
            explanation: None,
            skills: Vec::new(),
            tags: BTreeSet::new(),
        })
    }

    /// Sets the explanation.
    pub fn with_explanation(mut self, explanation: Option<Metadata>) -> Self {
        self.explanation = explanation;
        self
    }

    /// Sets the skills.
    pub fn with_skills(mut self, skills: Vec<Metadata>) -> Self {
        self.skills = skills;
        self
    }

    /// The resulting expression.
    pub fn result(&self) -> &Expression {
        &self.to_expr.expr
    }

    /// The path mappings, relative to `from_expr` on one side and the result on the other.
    pub fn path_mappings(&self) -> &[PathMapping] {
        &self.to_expr.mappings
    }

    /// The path mappings, relative to the root of the tree `from_expr` is part of. The result
    /// replaces `from_expr` in place, so both sides are moved below the same path.
    pub fn global_path_mappings(&self) -> Vec<PathMapping> {
        let path = &self.from_expr.path;
        self.to_expr
            .mappings
            .iter()
            .map(|mapping| mapping.relativize(path, path))
            .collect()
    }

    /// The number of leaf transformations in this derivation.
    pub fn leaf_count(&self) -> usize {
        match (&self.steps, &self.tasks) {
            (Some(steps), _) => steps.iter().map(Transformation::leaf_count).sum(),
            (None, Some(tasks)) => tasks
                .iter()
                .flat_map(|task| task.steps.iter())
                .map(Transformation::leaf_count)
                .sum(),
            (None, None) => 1,
        }
    }

    /// The leaf transformations of this derivation, in order.
    pub fn leaves(&self) -> Vec<&Transformation> {
        match &self.steps {
            Some(steps) => steps.iter().flat_map(Transformation::leaves).collect(),
            None => vec![self],
        }
    }
}
