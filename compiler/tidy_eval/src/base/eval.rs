//! Evaluating captured expressions from within the language.

use tidy_ir::{type_mismatch, DataMask, Env, Expr, Layers, Value};

use super::{define_builtin, env_arg};

pub(super) fn register(env: &Env) {
    // eval_tidy(expr, data = NULL, env = caller)
    define_builtin(env, "eval_tidy", |exec, args| {
        const FORMALS: &[&str] = &["expr", "data", "env"];
        let target = args.required(FORMALS, "expr")?;
        let mask = match args.get(FORMALS, "data") {
            Some(data) => DataMask::from_value(data)?,
            None => None,
        };
        match target {
            Value::Quosure(quosure) => exec.eval_quosure(quosure, mask.as_ref()),
            Value::Language(expr) => {
                let env = env_arg(args, FORMALS, "env")?;
                exec.eval_in(expr, &env, &Layers::Tidy(mask))
            }
            other => Ok(other.clone()),
        }
    });

    // eval(expr, env = caller), where env may also be a data frame.
    define_builtin(env, "eval", |exec, args| {
        const FORMALS: &[&str] = &["expr", "env"];
        let target = args.required(FORMALS, "expr")?;
        let env = match args.get(FORMALS, "env") {
            None => args.env().clone(),
            Some(Value::Env(env)) => env.clone(),
            Some(Value::Table(table)) => table.as_scope(args.env()),
            Some(other) => return Err(type_mismatch("environment", other.type_name())),
        };
        match target {
            Value::Language(expr) => exec.eval_in(expr, &env, &Layers::Bare),
            Value::Quosure(quosure) => {
                exec.eval_in(&Expr::Quosure(quosure.clone()), &env, &Layers::Bare)
            }
            other => Ok(other.clone()),
        }
    });

    // as_scope(data, parent = caller)
    define_builtin(env, "as_scope", |_, args| {
        const FORMALS: &[&str] = &["data", "parent"];
        let parent = env_arg(args, FORMALS, "parent")?;
        match args.required(FORMALS, "data")? {
            Value::Table(table) => Ok(Value::env(table.as_scope(&parent))),
            other => Err(type_mismatch("data frame", other.type_name())),
        }
    });

    define_builtin(env, "current_env", |_, args| {
        args.expect_count("current_env", 0)?;
        Ok(Value::env(args.env().clone()))
    });
}
