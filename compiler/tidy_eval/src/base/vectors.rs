//! Vector and table constructors and summaries.

use tidy_ir::{
    integer_overflow, type_mismatch, Args, Env, EvalError, EvalResult, Named, Table, Value,
};

use super::{define_builtin, value_at};
use crate::operators::{logicals, numbers, strings, Numbers};

pub(super) fn register(env: &Env) {
    define_builtin(env, "c", |_, args| combine(args));
    define_builtin(env, "list", |_, args| Ok(Value::list(args.values().to_vec())));
    define_builtin(env, "length", |_, args| {
        args.expect_count("length", 1)?;
        let len = value_at(args, 0)?.len();
        Ok(Value::int(i64::try_from(len).unwrap_or(i64::MAX)))
    });
    define_builtin(env, "sum", |_, args| sum(args));
    define_builtin(env, "mean", |_, args| {
        args.expect_count("mean", 1)?;
        mean(value_at(args, 0)?)
    });
    define_builtin(env, "identity", |_, args| {
        args.expect_count("identity", 1)?;
        value_at(args, 0).cloned()
    });
    define_builtin(env, "names", |_, args| {
        args.expect_count("names", 1)?;
        Ok(names(value_at(args, 0)?))
    });
    define_builtin(env, "data_frame", |_, args| data_frame(args));
}

/// Atomic storage modes, weakest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Mode {
    Logical,
    Integer,
    Double,
    Character,
}

fn mode(value: &Value) -> Option<Mode> {
    match value {
        Value::Logical(_) => Some(Mode::Logical),
        Value::Integer(_) => Some(Mode::Integer),
        Value::Double(_) => Some(Mode::Double),
        Value::Character(_) => Some(Mode::Character),
        _ => None,
    }
}

/// `c(...)`: concatenate, coercing to the strongest mode present.
///
/// Any non-atomic argument turns the result into a list; lists contribute
/// their entries rather than nesting.
fn combine(args: &Args) -> EvalResult {
    let parts: Vec<&Value> = args
        .iter()
        .map(|arg| &arg.value)
        .filter(|value| !value.is_null())
        .collect();
    if parts.iter().any(|value| !value.is_atomic()) {
        let mut entries = Vec::new();
        for arg in args {
            match &arg.value {
                Value::Null => {}
                Value::List(items) => entries.extend(items.iter().cloned()),
                other => entries.push(Named {
                    name: arg.name.clone(),
                    value: other.clone(),
                }),
            }
        }
        return Ok(Value::list(entries));
    }

    let Some(target) = parts.iter().filter_map(|value| mode(value)).max() else {
        return Ok(Value::Null);
    };
    Ok(match target {
        Mode::Logical => {
            let mut out = Vec::new();
            for part in &parts {
                out.extend_from_slice(&logicals(part)?);
            }
            Value::logicals(out)
        }
        Mode::Integer => {
            let mut out = Vec::new();
            for part in &parts {
                if let Numbers::Int(values) = numbers(part)? {
                    out.extend_from_slice(&values);
                }
            }
            Value::ints(out)
        }
        Mode::Double => {
            let mut out = Vec::new();
            for part in &parts {
                out.extend_from_slice(&numbers(part)?.to_doubles());
            }
            Value::doubles(out)
        }
        Mode::Character => {
            let mut out = Vec::new();
            for part in &parts {
                out.extend(strings(part)?.iter().cloned());
            }
            Value::strings(out)
        }
    })
}

/// `sum(...)`: integer unless any argument is double.
fn sum(args: &Args) -> EvalResult {
    let mut ints: i64 = 0;
    let mut doubles: Option<f64> = None;
    for arg in args {
        match numbers(&arg.value)? {
            Numbers::Int(values) => {
                for &n in values.iter() {
                    ints = ints.checked_add(n).ok_or_else(|| integer_overflow("sum"))?;
                }
            }
            Numbers::Double(values) => {
                *doubles.get_or_insert(0.0) += values.iter().sum::<f64>();
            }
        }
    }
    Ok(match doubles {
        Some(total) => Value::double(total + ints_as_double(ints)),
        None => Value::int(ints),
    })
}

#[expect(
    clippy::cast_precision_loss,
    reason = "a mixed sum is a double like any other int-to-double coercion"
)]
fn ints_as_double(n: i64) -> f64 {
    n as f64
}

/// `mean(x)`: the arithmetic mean as a double; `NaN` for an empty vector.
#[expect(
    clippy::cast_precision_loss,
    reason = "element counts stay far below 2^53"
)]
fn mean(value: &Value) -> EvalResult {
    let values = numbers(value)?;
    let values = values.to_doubles();
    if values.is_empty() {
        return Ok(Value::double(f64::NAN));
    }
    Ok(Value::double(values.iter().sum::<f64>() / values.len() as f64))
}

fn names(value: &Value) -> Value {
    let names: Vec<String> = match value {
        Value::List(entries) => entries
            .iter()
            .map(|e| e.name.as_ref().map_or_else(String::new, ToString::to_string))
            .collect(),
        Value::Table(table) => table.names().map(ToString::to_string).collect(),
        Value::Env(env) => env.names().iter().map(ToString::to_string).collect(),
        _ => return Value::Null,
    };
    Value::strings(names)
}

/// `data_frame(name = column, ...)`: length-one columns are recycled.
fn data_frame(args: &Args) -> EvalResult {
    let nrow = args.iter().map(|arg| arg.value.len()).max().unwrap_or(0);
    let mut columns = Vec::with_capacity(args.len());
    for arg in args {
        let Some(name) = &arg.name else {
            return Err(type_mismatch("named column", "unnamed argument"));
        };
        let column = if arg.value.len() == 1 && nrow > 1 {
            repeat(&arg.value, nrow)?
        } else {
            arg.value.clone()
        };
        columns.push((name.clone(), column));
    }
    Table::new(columns).map(Value::table)
}

/// A length-one vector repeated `n` times.
fn repeat(value: &Value, n: usize) -> Result<Value, EvalError> {
    Ok(match value {
        Value::Logical(v) => Value::logicals(vec![v[0]; n]),
        Value::Integer(v) => Value::ints(vec![v[0]; n]),
        Value::Double(v) => Value::doubles(vec![v[0]; n]),
        Value::Character(v) => Value::strings(vec![v[0].clone(); n]),
        other => return Err(type_mismatch("atomic column", other.type_name())),
    })
}
