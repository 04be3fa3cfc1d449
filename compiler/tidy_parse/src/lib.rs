//! Tidy Parse - source text to deferred expressions.
//!
//! The grammar is R-like:
//! - infix operators with R precedence (`^` binds tightest and is
//!   right-associative; `-2^2` is `-(2^2)`)
//! - `function(x, y = 1) body`, `{ a; b }`, `if (c) a else b`
//! - `x <- value`, `a$b`, `a[[i]]`, named call arguments `f(x, by = g)`
//! - `!!x` and `!!!xs` for quasiquotation
//! - plain numerals are doubles; `5L` is an integer
//!
//! Every construct becomes an ordinary call node, so the output is the same
//! tree shape the evaluator builds by hand.

mod error;
mod lexer;
mod parser;

pub use error::{ParseError, Span};
pub use lexer::{lex, Token};
pub use parser::{parse_expr, parse_program};
