//! The base prelude: operators, vector helpers, quoting and control flow.
//!
//! Everything here is an ordinary binding in a scope. The evaluator has no
//! built-in knowledge of any of these names, so user code can shadow them.

mod control;
mod eval;
mod quoting;
mod vectors;

use tidy_ir::{
    arity_mismatch, type_mismatch, Args, Env, EvalError, EvalResult, Executor, Function,
    SpecialArgs, Value,
};

use crate::operators::{evaluate_binary, evaluate_unary, ArithOp, BinaryOp, UnaryOp};

/// A fresh root scope holding the prelude.
///
/// Callers normally evaluate in a child of this scope so their own bindings
/// stay separate from the prelude.
pub fn base_env() -> Env {
    let env = Env::new();
    register_base(&env);
    env
}

/// Define every prelude binding in `env`.
pub fn register_base(env: &Env) {
    register_operators(env);
    vectors::register(env);
    quoting::register(env);
    eval::register(env);
    control::register(env);
    env.define("Inf", Value::double(f64::INFINITY));
    env.define("NaN", Value::double(f64::NAN));
}

fn register_operators(env: &Env) {
    for op in BinaryOp::ALL {
        let name = op.symbol();
        let function = match op {
            // `-x` and `+x` share a name with their binary forms.
            BinaryOp::Arith(arith @ (ArithOp::Add | ArithOp::Sub)) => {
                let unary = if arith == ArithOp::Sub {
                    UnaryOp::Neg
                } else {
                    UnaryOp::Plus
                };
                Function::builtin(name, move |_, args| match args.len() {
                    1 => evaluate_unary(unary, value_at(args, 0)?),
                    _ => {
                        args.expect_count(name, 2)?;
                        evaluate_binary(op, value_at(args, 0)?, value_at(args, 1)?)
                    }
                })
            }
            _ => Function::builtin(name, move |_, args| {
                args.expect_count(name, 2)?;
                evaluate_binary(op, value_at(args, 0)?, value_at(args, 1)?)
            }),
        };
        env.define(name, Value::function(function));
    }
    define_builtin(env, "!", |_, args| {
        args.expect_count("!", 1)?;
        evaluate_unary(UnaryOp::Not, value_at(args, 0)?)
    });
}

fn define_builtin(
    env: &Env,
    name: &str,
    func: impl Fn(&mut dyn Executor, &Args) -> EvalResult + 'static,
) {
    env.define(name, Value::function(Function::builtin(name, func)));
}

fn define_special(
    env: &Env,
    name: &str,
    func: impl Fn(&mut dyn Executor, &SpecialArgs) -> EvalResult + 'static,
) {
    env.define(name, Value::function(Function::special(name, func)));
}

/// The `index`-th argument regardless of its name.
fn value_at(args: &Args, index: usize) -> Result<&Value, EvalError> {
    args.values()
        .get(index)
        .map(|arg| &arg.value)
        .ok_or_else(|| arity_mismatch("", index + 1, args.len()))
}

/// The argument for formal `name`, or the environment the call was made from.
fn env_arg(args: &Args, formals: &[&str], name: &str) -> Result<Env, EvalError> {
    match args.get(formals, name) {
        None => Ok(args.env().clone()),
        Some(Value::Env(env)) => Ok(env.clone()),
        Some(other) => Err(type_mismatch("environment", other.type_name())),
    }
}
