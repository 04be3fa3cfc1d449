//! The layered evaluator.
//!
//! A plain recursive tree walk. Symbols resolve through the active `Layers`:
//! under `Layers::Tidy` the data mask (if any) is searched first, then the
//! lexical chain, and `.data$x` / `.env$x` are pinned to a single layer.
//! Literals evaluate to themselves. A call evaluates its head, which must
//! produce a function, and hands the arguments over according to the
//! function's kind:
//! - builtins get evaluated arguments (`!!!` splices dynamic dots)
//! - specials get the argument expressions with the caller's scope and layers
//! - closures get a fresh frame binding each parameter to a promise
//!
//! The evaluator knows nothing about arithmetic or comparison; those are
//! ordinary functions found by name, so a narrower scope can rebind them.

mod closure;

use tracing::debug;

use tidy_ir::stack::ensure_sufficient_stack;
use tidy_ir::{
    missing_argument, misused_pronoun, not_a_sequence, not_callable, recursion_limit_exceeded,
    undefined_variable, unquote_outside_quasiquotation, Arg, Args, Binding, Call, DataMask, Env,
    EvalError, EvalResult, Executor, Expr, Function, Layers, Named, Quosure, SpecialArgs, Symbol,
    Value,
};

use crate::config::{EvalConfig, EvaluatorBuilder};
use crate::pronoun::PronounAccess;

/// Evaluates deferred expressions and quosures.
///
/// Holds only configuration and the current nesting depth; all scopes are
/// passed in explicitly.
#[derive(Debug)]
pub struct Evaluator {
    config: EvalConfig,
    depth: usize,
}

impl Evaluator {
    /// An evaluator with the default configuration.
    pub fn new() -> Self {
        EvaluatorBuilder::new().build()
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Evaluator { config, depth: 0 }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Number of evaluations currently in progress.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Evaluate `expr` against `env` with plain lexical lookup.
    ///
    /// No data mask is consulted and `.data` / `.env` are ordinary names.
    #[tracing::instrument(level = "trace", skip_all, fields(expr = %expr))]
    pub fn eval_bare(&mut self, expr: &Expr, env: &Env) -> EvalResult {
        self.eval_expr(expr, env, &Layers::Bare)
    }

    /// Evaluate a quosure in its own scope, with `mask` searched first.
    ///
    /// Quosure leaves nested in the expression are evaluated in their own
    /// scopes under the same mask.
    #[tracing::instrument(level = "trace", skip_all, fields(quosure = %quosure))]
    pub fn eval_layered(&mut self, quosure: &Quosure, mask: Option<&DataMask>) -> EvalResult {
        if let Some(mask) = mask {
            debug!(columns = ?mask.names(), "activating data mask");
        }
        let layers = Layers::Tidy(mask.cloned());
        self.eval_expr(quosure.expr(), quosure.env(), &layers)
    }

    /// Evaluate `expr` in `env` under explicit layers.
    pub fn eval_expr(&mut self, expr: &Expr, env: &Env, layers: &Layers) -> EvalResult {
        self.check_recursion_limit()?;
        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.eval_node(expr, env, layers));
        self.depth -= 1;
        result
    }

    fn check_recursion_limit(&self) -> Result<(), EvalError> {
        if let Some(max_depth) = self.config.max_depth {
            if self.depth >= max_depth {
                return Err(recursion_limit_exceeded(max_depth));
            }
        }
        Ok(())
    }

    fn eval_node(&mut self, expr: &Expr, env: &Env, layers: &Layers) -> EvalResult {
        match expr {
            Expr::Literal(literal) => Ok(literal.to_value()),
            Expr::Symbol(symbol) => self.eval_symbol(symbol, env, layers),
            // A spliced quosure keeps its own scope but shares the mask.
            Expr::Quosure(quosure) => self.eval_expr(quosure.expr(), quosure.env(), layers),
            Expr::Call(call) => self.eval_call(call, env, layers),
        }
    }

    fn eval_symbol(&mut self, symbol: &Symbol, env: &Env, layers: &Layers) -> EvalResult {
        if symbol.is_missing() {
            return Err(missing_argument(symbol.as_str()));
        }
        if layers.honours_pronouns() {
            if let Some(pronoun) = symbol.pronoun() {
                return Err(misused_pronoun(pronoun));
            }
        }
        if let Some(value) = layers.mask().and_then(|mask| mask.get(symbol.as_str())) {
            return Ok(value);
        }
        match env.lookup(symbol.as_str()) {
            Some(binding) => self.resolve_binding(symbol.as_str(), binding),
            None => Err(undefined_variable(symbol.as_str())),
        }
    }

    /// The value behind a binding, forcing it if it is a promise.
    pub(crate) fn resolve_binding(&mut self, name: &str, binding: Binding) -> EvalResult {
        match binding {
            Binding::Value(value) => Ok(value),
            Binding::Promise(promise) => promise.force(self),
            Binding::Missing => Err(missing_argument(name)),
        }
    }

    fn eval_call(&mut self, call: &Call, env: &Env, layers: &Layers) -> EvalResult {
        if layers.honours_pronouns() {
            if let Some(access) = PronounAccess::recognise(call) {
                return self.eval_pronoun(&access, env, layers);
            }
        }
        if let Some(operator) = call.unquote_operator() {
            return Err(unquote_outside_quasiquotation(operator));
        }
        let function = match self.eval_expr(&call.head, env, layers)? {
            Value::Function(function) => function,
            other => return Err(not_callable(&call.head.to_string(), other.type_name())),
        };
        self.apply(&call.head, &function, &call.args, env, layers)
    }

    /// Call `function`, written as `head`, with argument expressions
    /// written in `env`.
    pub fn apply(
        &mut self,
        head: &Expr,
        function: &Function,
        args: &[Arg],
        env: &Env,
        layers: &Layers,
    ) -> EvalResult {
        match function {
            Function::Builtin(builtin) => {
                let values = self.eval_args(args, env, layers)?;
                builtin.call(self, &Args::new(values, env.clone()))
            }
            Function::Special(special) => special.call(
                self,
                &SpecialArgs::new(args.to_vec(), env.clone(), layers.clone()),
            ),
            Function::Closure(closure) => self.apply_closure(closure, head, args, env, layers),
        }
    }

    /// Evaluate arguments in order; `!!!xs` contributes one argument per
    /// element of `xs`.
    fn eval_args(
        &mut self,
        args: &[Arg],
        env: &Env,
        layers: &Layers,
    ) -> Result<Vec<Named<Value>>, EvalError> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            if let Some(operand) = arg.value.unquote_splice_operand() {
                let spliced = self.eval_expr(operand, env, layers)?;
                values.extend(dots_from_value(&spliced)?);
                continue;
            }
            let value = self.eval_expr(&arg.value, env, layers)?;
            values.push(Named {
                name: arg.name.clone(),
                value,
            });
        }
        Ok(values)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// A value spliced into a builtin's arguments.
fn dots_from_value(value: &Value) -> Result<Vec<Named<Value>>, EvalError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::List(entries) => Ok(entries.to_vec()),
        other => other
            .elements()
            .map(|items| items.into_iter().map(Named::positional).collect())
            .ok_or_else(|| not_a_sequence(other.type_name())),
    }
}

impl Executor for Evaluator {
    fn eval_in(&mut self, expr: &Expr, env: &Env, layers: &Layers) -> EvalResult {
        self.eval_expr(expr, env, layers)
    }

    fn eval_quosure(&mut self, quosure: &Quosure, mask: Option<&DataMask>) -> EvalResult {
        self.eval_layered(quosure, mask)
    }

    fn interpolate(&mut self, expr: &Expr, env: &Env, layers: &Layers) -> Result<Expr, EvalError> {
        self.quasiquote(expr, env, layers)
    }
}

#[cfg(test)]
mod tests;
