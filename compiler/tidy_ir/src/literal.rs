//! Atomic constants carried verbatim in expression trees.

use std::fmt;
use std::rc::Rc;

use crate::value::Value;

/// An atomic value embedded in a deferred expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(Rc<str>),
}

impl Literal {
    /// Create a string literal.
    pub fn string(text: &str) -> Self {
        Literal::Str(Rc::from(text))
    }

    /// Type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Null => "NULL",
            Literal::Bool(_) => "logical",
            Literal::Int(_) => "integer",
            Literal::Double(_) => "double",
            Literal::Str(_) => "character",
        }
    }

    /// The runtime value a literal evaluates to.
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::bool(*b),
            Literal::Int(n) => Value::int(*n),
            Literal::Double(d) => Value::double(*d),
            Literal::Str(s) => Value::string(&**s),
        }
    }
}

/// Format a double the way it is written in source.
///
/// Plain numerals are doubles, so `1.0` prints as `1`. Non-finite values
/// print as the names `NaN` and `Inf`.
pub(crate) fn fmt_double(value: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if value.is_nan() {
        f.write_str("NaN")
    } else if value.is_infinite() {
        f.write_str(if value > 0.0 { "Inf" } else { "-Inf" })
    } else {
        write!(f, "{value}")
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("NULL"),
            Literal::Bool(true) => f.write_str("TRUE"),
            Literal::Bool(false) => f.write_str("FALSE"),
            Literal::Int(n) => write!(f, "{n}L"),
            Literal::Double(d) => fmt_double(*d, f),
            Literal::Str(s) => write!(f, "{:?}", &**s),
        }
    }
}
