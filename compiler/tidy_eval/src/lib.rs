//! Tidy evaluation: a layered evaluator for deferred expressions.
//!
//! This crate provides:
//! - `Evaluator`: bare and layered (data-masked) evaluation
//! - Quasiquotation: resolving `!!` and `!!!` in captured expressions
//! - `base_env()`: a prelude of operators, vector helpers and quoting functions
//! - `EvalConfig` / `EvaluatorBuilder`: depth limits and other knobs
//!
//! The free functions below are thin conveniences over a default
//! `Evaluator`; hosts that evaluate repeatedly should keep one around.
//!
//! ```text
//! let global = base_env().child();
//! global.define("x", Value::double(100.0));
//! let thunk = make_thunk(parse_expr("x * y")?, &global);
//! let table = Table::new([(Symbol::new("y"), Value::doubles(vec![1.0, 2.0, 3.0]))])?;
//! let result = eval_layered(&thunk, Some(&table.to_mask()))?;   // c(100, 200, 300)
//! ```

mod base;
mod config;
mod evaluator;
mod interpolate;
pub mod operators;
mod pronoun;

use std::sync::Once;

pub use base::{base_env, register_base};
pub use config::{EvalConfig, EvaluatorBuilder, MAX_DEPTH_VAR};
pub use evaluator::Evaluator;

use tidy_ir::{DataMask, Env, EvalError, EvalResult, Expr, Layers, Promise, Quosure, Table};

/// Evaluate `expr` against `env` with plain lexical lookup.
pub fn eval_bare(expr: &Expr, env: &Env) -> EvalResult {
    Evaluator::new().eval_bare(expr, env)
}

/// Evaluate a quosure in its own scope, with `mask` searched first.
pub fn eval_layered(quosure: &Quosure, mask: Option<&DataMask>) -> EvalResult {
    Evaluator::new().eval_layered(quosure, mask)
}

/// Resolve `!!` and `!!!` in `expr`, evaluating their operands in `env`.
pub fn interpolate(expr: &Expr, env: &Env) -> Result<Expr, EvalError> {
    Evaluator::new().quasiquote(expr, env, &Layers::Bare)
}

/// The unevaluated expression behind an argument. Nothing is evaluated.
pub fn capture(argument: &Promise) -> Expr {
    argument.capture()
}

/// The unevaluated expression behind an argument, bound to the scope the
/// caller wrote it in.
pub fn capture_argument(argument: &Promise) -> Quosure {
    argument.capture_argument()
}

/// Pair an expression with the scope it should be evaluated in.
pub fn make_thunk(expr: Expr, env: &Env) -> Quosure {
    Quosure::new(expr, env.clone())
}

pub fn get_expr(quosure: &Quosure) -> &Expr {
    quosure.expr()
}

pub fn get_scope(quosure: &Quosure) -> &Env {
    quosure.env()
}

/// A copy of `quosure` bound to `env`; the original is unchanged.
pub fn set_scope(quosure: &Quosure, env: &Env) -> Quosure {
    quosure.with_env(env.clone())
}

/// A scope holding one binding per column of `table`, child of `parent`.
pub fn as_scope(table: &Table, parent: &Env) -> Env {
    table.as_scope(parent)
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing if `RUST_LOG` is set.
///
/// Safe to call more than once; only the first call has any effect.
///
/// ```bash
/// RUST_LOG=tidy_eval=trace cargo test
/// RUST_LOG=debug cargo test    # splices and data mask activation
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
