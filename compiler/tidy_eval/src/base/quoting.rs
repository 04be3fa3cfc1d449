//! Quoting: capturing expressions and building quosures.

use tidy_ir::{
    type_mismatch, Binding, Env, EvalError, Executor, Expr, Layers, Quosure,
    SpecialArgs, Value,
};

use super::{define_builtin, define_special, env_arg, value_at};

pub(super) fn register(env: &Env) {
    define_special(env, "quote", |_, args| {
        args.expect_count("quote", 1)?;
        Ok(expr_value(args.expr("quote", 0)?.clone()))
    });
    define_special(env, "expr", |exec, args| {
        args.expect_count("expr", 1)?;
        let expr = exec.interpolate(args.expr("expr", 0)?, args.env(), args.layers())?;
        Ok(expr_value(expr))
    });
    define_special(env, "quo", |exec, args| {
        args.expect_count("quo", 1)?;
        let expr = exec.interpolate(args.expr("quo", 0)?, args.env(), args.layers())?;
        Ok(Value::quosure(into_quosure(expr, args.env())))
    });
    define_special(env, "enexpr", |exec, args| {
        let quosure = capture_parameter(exec, args, "enexpr")?;
        Ok(expr_value(quosure.expr().clone()))
    });
    define_special(env, "enquo", |exec, args| {
        capture_parameter(exec, args, "enquo").map(Value::quosure)
    });

    define_builtin(env, "new_quosure", |_, args| {
        const FORMALS: &[&str] = &["expr", "env"];
        let expr = match args.required(FORMALS, "expr")? {
            Value::Language(expr) => (**expr).clone(),
            Value::Quosure(quosure) => quosure.expr().clone(),
            other => other
                .to_literal()
                .map(Expr::Literal)
                .ok_or_else(|| type_mismatch("expression", other.type_name()))?,
        };
        Ok(Value::quosure(Quosure::new(expr, env_arg(args, FORMALS, "env")?)))
    });
    define_builtin(env, "quo_get_expr", |_, args| {
        args.expect_count("quo_get_expr", 1)?;
        Ok(expr_value(quosure_at(value_at(args, 0)?)?.expr().clone()))
    });
    define_builtin(env, "quo_get_env", |_, args| {
        args.expect_count("quo_get_env", 1)?;
        Ok(Value::env(quosure_at(value_at(args, 0)?)?.env().clone()))
    });
    define_builtin(env, "quo_set_env", |_, args| {
        args.expect_count("quo_set_env", 2)?;
        let quosure = quosure_at(value_at(args, 0)?)?;
        match value_at(args, 1)? {
            Value::Env(env) => Ok(Value::quosure(quosure.with_env(env.clone()))),
            other => Err(type_mismatch("environment", other.type_name())),
        }
    });
    define_builtin(env, "is_quosure", |_, args| {
        args.expect_count("is_quosure", 1)?;
        Ok(Value::bool(value_at(args, 0)?.is_quosure()))
    });
}

/// An expression as a value: literals evaluate to themselves and quosure
/// leaves come back as quosures.
pub(crate) fn expr_value(expr: Expr) -> Value {
    match expr {
        Expr::Literal(literal) => literal.to_value(),
        Expr::Quosure(quosure) => Value::quosure(quosure),
        other => Value::language(other),
    }
}

/// Wrap `expr` with `env`, unless it already is a quosure.
fn into_quosure(expr: Expr, env: &Env) -> Quosure {
    match expr {
        Expr::Quosure(quosure) => quosure,
        other => Quosure::new(other, env.clone()),
    }
}

fn quosure_at(value: &Value) -> Result<&Quosure, EvalError> {
    value
        .as_quosure()
        .ok_or_else(|| type_mismatch("quosure", value.type_name()))
}

/// `enquo(x)` inside a closure: the caller's expression for parameter `x`,
/// bound to the caller's scope, with its `!!` resolved there.
fn capture_parameter(
    exec: &mut dyn Executor,
    args: &SpecialArgs,
    fn_name: &str,
) -> Result<Quosure, EvalError> {
    args.expect_count(fn_name, 1)?;
    let Some(name) = args.expr(fn_name, 0)?.as_symbol() else {
        return Err(type_mismatch("argument name", "expression"));
    };
    let captured = args.env().capture_argument(name)?;
    let layers = match args.env().lookup(name.as_str()) {
        Some(Binding::Promise(promise)) => promise.layers().clone(),
        _ => Layers::Bare,
    };
    let expr = exec.interpolate(captured.expr(), captured.env(), &layers)?;
    Ok(into_quosure(expr, captured.env()))
}
