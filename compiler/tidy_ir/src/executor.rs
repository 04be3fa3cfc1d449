//! The seam between lazy callables and the evaluator.
//!
//! Builtins, specials and promises live in this crate but need to evaluate
//! expressions. They do so through `Executor`, which the evaluator
//! implements; this crate never depends on the evaluator itself.

use crate::env::Env;
use crate::errors::{EvalError, EvalResult};
use crate::expr::Expr;
use crate::mask::{DataMask, Layers};
use crate::quosure::Quosure;

/// Evaluation services available to functions and promises.
pub trait Executor {
    /// Evaluate `expr` in `env` under the given layers.
    fn eval_in(&mut self, expr: &Expr, env: &Env, layers: &Layers) -> EvalResult;

    /// Evaluate a quosure in its own scope, optionally under a data mask.
    fn eval_quosure(&mut self, quosure: &Quosure, mask: Option<&DataMask>) -> EvalResult;

    /// Resolve `!!` and `!!!` inside `expr`, evaluating their operands in `env`.
    fn interpolate(&mut self, expr: &Expr, env: &Env, layers: &Layers)
        -> Result<Expr, EvalError>;
}
