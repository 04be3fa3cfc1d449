//! Control flow, functions, assignment and member access.

use tidy_ir::{
    arity_mismatch, missing_argument, type_mismatch, Binding, Env, EvalError, EvalResult,
    Executor, Expr, Function, Literal, Param, SpecialArgs, Symbol, Value,
};

use super::{define_builtin, define_special, value_at};

pub(super) fn register(env: &Env) {
    define_special(env, "function", make_function);
    define_special(env, "{", |exec, args| {
        let mut last = Value::Null;
        for stmt in args.args() {
            last = exec.eval_in(&stmt.value, args.env(), args.layers())?;
        }
        Ok(last)
    });
    define_special(env, "if", |exec, args| {
        let cond = exec.eval_in(args.expr("if", 0)?, args.env(), args.layers())?;
        let branch = if condition(&cond)? {
            Some(args.expr("if", 1)?)
        } else {
            args.args().get(2).map(|arg| &arg.value)
        };
        match branch {
            Some(expr) => exec.eval_in(expr, args.env(), args.layers()),
            None => Ok(Value::Null),
        }
    });
    for op in ["<-", "="] {
        define_special(env, op, move |exec, args| assign(exec, args, op));
    }
    for (op, short_circuit_on) in [("&&", false), ("||", true)] {
        define_special(env, op, move |exec, args| {
            args.expect_count(op, 2)?;
            let left = exec.eval_in(args.expr(op, 0)?, args.env(), args.layers())?;
            let left = condition(&left)?;
            if left == short_circuit_on {
                return Ok(Value::bool(left));
            }
            let right = exec.eval_in(args.expr(op, 1)?, args.env(), args.layers())?;
            Ok(Value::bool(condition(&right)?))
        });
    }
    define_special(env, "$", |exec, args| {
        args.expect_count("$", 2)?;
        let target = exec.eval_in(args.expr("$", 0)?, args.env(), args.layers())?;
        let field = match args.expr("$", 1)? {
            Expr::Symbol(name) if !name.is_missing() => name.as_str().to_string(),
            Expr::Literal(Literal::Str(name)) => name.to_string(),
            _ => return Err(type_mismatch("field name", "expression")),
        };
        member(exec, &target, &field)
    });
    define_builtin(env, "[[", |exec, args| {
        args.expect_count("[[", 2)?;
        index(exec, value_at(args, 0)?, value_at(args, 1)?)
    });
    define_builtin(env, "stop", |_, args| {
        let message: String = args
            .iter()
            .map(|arg| match arg.value.as_scalar_str() {
                Some(text) => text.to_string(),
                None => arg.value.to_string(),
            })
            .collect();
        Err(EvalError::new(message))
    });
}

/// `function(x, y = 1) body`: parameters are the named arguments, the body
/// is the last one.
fn make_function(_: &mut dyn Executor, args: &SpecialArgs) -> EvalResult {
    let Some((body, params)) = args.args().split_last() else {
        return Err(arity_mismatch("function", 1, 0));
    };
    let params = params
        .iter()
        .map(|param| {
            let Some(name) = &param.name else {
                return Err(type_mismatch("parameter name", "expression"));
            };
            Ok(Param {
                name: name.clone(),
                default: (!param.value.is_missing()).then(|| param.value.clone()),
            })
        })
        .collect::<Result<Vec<_>, EvalError>>()?;
    Ok(Value::function(Function::closure(
        params,
        body.value.clone(),
        args.env().clone(),
    )))
}

/// `name <- value`: bind in the caller's scope and return the value.
///
/// Under a data mask the binding still goes to the lexical scope; masks
/// are read-only.
fn assign(exec: &mut dyn Executor, args: &SpecialArgs, op: &str) -> EvalResult {
    args.expect_count(op, 2)?;
    let name = match args.expr(op, 0)? {
        Expr::Symbol(name) if !name.is_missing() => name.clone(),
        Expr::Literal(Literal::Str(name)) => Symbol::new(name),
        _ => return Err(type_mismatch("assignment target", "expression")),
    };
    let value = exec.eval_in(args.expr(op, 1)?, args.env(), args.layers())?;
    args.env().define(name, value.clone());
    Ok(value)
}

fn condition(value: &Value) -> Result<bool, EvalError> {
    value
        .as_scalar_bool()
        .ok_or_else(|| type_mismatch("TRUE or FALSE", value.type_name()))
}

/// `target$name`: a list entry, table column or scope binding, else `NULL`.
fn member(exec: &mut dyn Executor, target: &Value, name: &str) -> EvalResult {
    match target {
        Value::List(entries) => Ok(entries
            .iter()
            .find(|entry| entry.has_name(name))
            .map_or(Value::Null, |entry| entry.value.clone())),
        Value::Table(table) => Ok(table.column(name).cloned().unwrap_or(Value::Null)),
        Value::Env(env) => match env.lookup_local(name) {
            Some(Binding::Value(value)) => Ok(value),
            Some(Binding::Promise(promise)) => promise.force(exec),
            Some(Binding::Missing) => Err(missing_argument(name)),
            None => Ok(Value::Null),
        },
        other => Err(type_mismatch(
            "list, data frame or environment",
            other.type_name(),
        )),
    }
}

/// `target[[i]]`: by name like `$`, or by one-based position.
fn index(exec: &mut dyn Executor, target: &Value, index: &Value) -> EvalResult {
    if let Some(name) = index.as_scalar_str() {
        return member(exec, target, name);
    }
    let Some(position) = index.as_scalar_int() else {
        return Err(type_mismatch("a single string or number", index.type_name()));
    };
    let offset = usize::try_from(position)
        .ok()
        .and_then(|p| p.checked_sub(1));
    let item = match target {
        Value::List(entries) => offset.and_then(|i| entries.get(i)).map(|e| e.value.clone()),
        Value::Table(table) => offset
            .and_then(|i| table.columns().get(i))
            .map(|(_, column)| column.clone()),
        other if other.is_atomic() => {
            offset.and_then(|i| other.elements().and_then(|items| items.into_iter().nth(i)))
        }
        other => {
            return Err(type_mismatch(
                "list, data frame or vector",
                other.type_name(),
            ))
        }
    };
    item.ok_or_else(|| EvalError::new(format!("subscript out of bounds: {position}")))
}
