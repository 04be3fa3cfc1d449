//! Quasiquotation: resolving `!!` and `!!!` inside a captured expression.

use tidy_ir::stack::ensure_sufficient_stack;
use tidy_ir::{splice_many_at_scalar, Env, EvalError, Expr, Layers, Named, Splice};

use crate::evaluator::Evaluator;

impl Evaluator {
    /// A copy of `expr` with every unquotation replaced by its value.
    ///
    /// - `!!x` evaluates `x` in `env` and splices the result as one node
    /// - `!!!xs` in argument position evaluates `xs` and splices each element
    ///   as a sibling argument, keeping list names as argument names
    /// - `!!!xs` anywhere else is an error
    ///
    /// Quosure leaves are opaque and are not searched.
    pub fn quasiquote(&mut self, expr: &Expr, env: &Env, layers: &Layers) -> Result<Expr, EvalError> {
        ensure_sufficient_stack(|| self.quasiquote_node(expr, env, layers))
    }

    fn quasiquote_node(&mut self, expr: &Expr, env: &Env, layers: &Layers) -> Result<Expr, EvalError> {
        let Expr::Call(call) = expr else {
            return Ok(expr.clone());
        };
        if let Some(operand) = expr.unquote_operand() {
            let value = self.eval_expr(operand, env, layers)?;
            return Splice::one_from_value(&value);
        }
        if expr.unquote_splice_operand().is_some() {
            return Err(splice_many_at_scalar());
        }

        let head = self.quasiquote(&call.head, env, layers)?;
        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            if let Some(operand) = arg.value.unquote_splice_operand() {
                let value = self.eval_expr(operand, env, layers)?;
                args.extend(Splice::many_from_value(&value)?);
            } else {
                args.push(Named {
                    name: arg.name.clone(),
                    value: self.quasiquote(&arg.value, env, layers)?,
                });
            }
        }
        Ok(Expr::call(head, args))
    }
}
