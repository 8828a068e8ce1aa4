//! The methods of the expression solver: rules and plans grouped by category, and the
//! [`registry`] exposing them by `Category.Name` id.
//!
//! Every method is a lazily built, shared static, so the same method can serve any number of
//! requests at once.
//!
//! ```
//! use solver_engine::Context;
//! use solver_methods::registry::apply_method;
//!
//! let expr = "[1 / 4] + [1 / 6]".parse().unwrap();
//! let step = apply_method("ConstantExpressions.SimplifyConstantExpression", &Context::default(), &expr).unwrap();
//! assert_eq!(step.result().to_string(), "[5 / 12]");
//! ```

pub mod constant_expressions;
pub mod equations;
pub mod error;
pub mod explanation;
pub mod fraction_arithmetic;
pub mod general;
pub mod inequalities;
pub mod inequations;
pub mod integer_arithmetic;
pub mod registry;

pub use registry::{apply_method, get_method, methods, select_plans, MethodEntry};
