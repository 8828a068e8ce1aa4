//! Tokenizer and parser for the solver's plain-text expression syntax.
//!
//! The syntax is the one produced by rendering expressions as solver text: `[3 / 5]` is a
//! fraction, `[x ^ 2]` a power, `sqrt[x]` a square root, `(x)` an explicit bracket and `xyz` the
//! implicit product of three variables.
//!
//! ```
//! use solver_parser::parser::Parser;
//!
//! let expr = Parser::new("1 + [2 / 3]").try_parse_full().unwrap();
//! assert_eq!(expr.span, 0..11);
//! ```

pub mod parser;
pub mod tokenizer;
