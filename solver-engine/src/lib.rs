//! A rule-based rewriting engine for mathematical expressions.
//!
//! Given an [`Expression`], the engine applies [`Method`]s (single-step [`Rule`]s, multi-step
//! [`Plan`]s and [`TaskSet`]s) and records every rewrite as a [`Transformation`]: where it
//! happened, what it produced, why, and how each part of the result relates to the source
//! through [`PathMapping`]s.
//!
//! ```
//! use solver_engine::{
//!     builder::ExpressionBuilder,
//!     context::Context,
//!     mapped,
//!     metadata::Metadata,
//!     path::Subexpression,
//!     pattern::*,
//!     rule::{Rule, RuleResult},
//!     steps::Method,
//! };
//!
//! // `a + b` to `b + a`
//! let a = any();
//! let b = any();
//! let swap = Rule::new(sum_of(vec![a.clone(), b.clone()]), move |builder: &ExpressionBuilder<'_>| {
//!     let to_expr = mapped::sum_of(vec![builder.move_(&b)?, builder.move_(&a)?]);
//!     Some(RuleResult::new(to_expr, Metadata::key("Swap")))
//! });
//!
//! let sub = Subexpression::root("x + 1".parse().unwrap());
//! let step = swap.try_execute(&Context::default(), &sub).unwrap();
//! assert_eq!(step.result().to_string(), "1 + x");
//! ```
//!
//! [`Method`]: steps::Method
//! [`Rule`]: rule::Rule
//! [`Plan`]: plan::Plan
//! [`TaskSet`]: tasks::TaskSet
//! [`Transformation`]: transformation::Transformation
//! [`PathMapping`]: mapping::PathMapping

pub mod builder;
pub mod context;
pub mod error;
pub mod expr;
pub mod mapped;
pub mod mapping;
pub mod metadata;
pub mod path;
pub mod pattern;
pub mod plan;
pub mod rule;
pub mod steps;
pub mod tasks;
pub mod transformation;

pub use context::Context;
pub use error::Error;
pub use expr::{Expression, Operator};
pub use path::{Path, Subexpression};
pub use transformation::Transformation;

/// Parses solver text into an expression.
pub fn parse_expression(src: &str) -> Result<Expression, Vec<Error>> {
    src.parse()
}
