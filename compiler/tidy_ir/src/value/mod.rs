//! Runtime values.
//!
//! Atomic values are vectors: a scalar is a vector of length one. Heap data
//! goes through the factory methods below, which own the `Heap` allocation.

use std::fmt::{self, Write};

use crate::env::Env;
use crate::expr::Expr;
use crate::function::Function;
use crate::heap::Heap;
use crate::literal::{fmt_double, Literal};
use crate::named::Named;
use crate::quosure::Quosure;
use crate::table::Table;

/// A runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Logical(Heap<Vec<bool>>),
    Integer(Heap<Vec<i64>>),
    Double(Heap<Vec<f64>>),
    Character(Heap<Vec<String>>),
    /// Optionally named, heterogeneous entries.
    List(Heap<Vec<Named<Value>>>),
    /// A deferred expression held as data.
    Language(Heap<Expr>),
    Quosure(Quosure),
    Function(Function),
    /// A scope held as data.
    Env(Env),
    Table(Heap<Table>),
}

impl Value {
    /// Create a length-one integer vector.
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Integer(Heap::new(vec![n]))
    }

    pub fn ints(values: Vec<i64>) -> Self {
        Value::Integer(Heap::new(values))
    }

    /// Create a length-one double vector.
    #[inline]
    pub fn double(d: f64) -> Self {
        Value::Double(Heap::new(vec![d]))
    }

    pub fn doubles(values: Vec<f64>) -> Self {
        Value::Double(Heap::new(values))
    }

    /// Create a length-one logical vector.
    #[inline]
    pub fn bool(b: bool) -> Self {
        Value::Logical(Heap::new(vec![b]))
    }

    pub fn logicals(values: Vec<bool>) -> Self {
        Value::Logical(Heap::new(values))
    }

    /// Create a length-one character vector.
    ///
    /// ```text
    /// let s = Value::string("hello");
    /// let s2 = Value::string(format!("value: {x}"));
    /// ```
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Character(Heap::new(vec![s.into()]))
    }

    pub fn strings(values: Vec<String>) -> Self {
        Value::Character(Heap::new(values))
    }

    /// Create a list value.
    ///
    /// ```text
    /// let empty = Value::list(vec![]);
    /// let pair = Value::list(vec![Named::named("a", Value::int(1)), Named::positional(Value::Null)]);
    /// ```
    pub fn list(entries: Vec<Named<Value>>) -> Self {
        Value::List(Heap::new(entries))
    }

    /// Wrap an expression as data.
    pub fn language(expr: Expr) -> Self {
        Value::Language(Heap::new(expr))
    }

    pub fn quosure(quosure: Quosure) -> Self {
        Value::Quosure(quosure)
    }

    pub fn function(function: Function) -> Self {
        Value::Function(function)
    }

    pub fn env(env: Env) -> Self {
        Value::Env(env)
    }

    pub fn table(table: Table) -> Self {
        Value::Table(Heap::new(table))
    }

    /// Type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Logical(_) => "logical",
            Value::Integer(_) => "integer",
            Value::Double(_) => "double",
            Value::Character(_) => "character",
            Value::List(_) => "list",
            Value::Language(expr) => match &**expr {
                Expr::Symbol(_) => "symbol",
                _ => "language",
            },
            Value::Quosure(_) => "quosure",
            Value::Function(_) => "function",
            Value::Env(_) => "environment",
            Value::Table(_) => "data frame",
        }
    }

    /// Number of elements. Non-vector values count as one.
    pub fn len(&self) -> usize {
        match self {
            Value::Null => 0,
            Value::Logical(v) => v.len(),
            Value::Integer(v) => v.len(),
            Value::Double(v) => v.len(),
            Value::Character(v) => v.len(),
            Value::List(v) => v.len(),
            Value::Table(t) => t.ncol(),
            Value::Language(_) | Value::Quosure(_) | Value::Function(_) | Value::Env(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Logical, integer, double or character.
    pub fn is_atomic(&self) -> bool {
        matches!(
            self,
            Value::Logical(_) | Value::Integer(_) | Value::Double(_) | Value::Character(_)
        )
    }

    /// A single logical, or a single number compared against zero.
    pub fn as_scalar_bool(&self) -> Option<bool> {
        match self {
            Value::Logical(v) if v.len() == 1 => Some(v[0]),
            Value::Integer(v) if v.len() == 1 => Some(v[0] != 0),
            Value::Double(v) if v.len() == 1 && !v[0].is_nan() => Some(v[0] != 0.0),
            _ => None,
        }
    }

    pub fn as_scalar_str(&self) -> Option<&str> {
        match self {
            Value::Character(v) if v.len() == 1 => Some(&v[0]),
            _ => None,
        }
    }

    /// A single integer, or a single double with no fractional part.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "fract() == 0.0 and the range check make the cast exact"
    )]
    pub fn as_scalar_int(&self) -> Option<i64> {
        match self {
            Value::Integer(v) if v.len() == 1 => Some(v[0]),
            Value::Double(v)
                if v.len() == 1
                    && v[0].fract() == 0.0
                    && v[0].abs() < 9_007_199_254_740_992.0 =>
            {
                Some(v[0] as i64)
            }
            _ => None,
        }
    }

    pub fn is_quosure(&self) -> bool {
        matches!(self, Value::Quosure(_))
    }

    pub fn as_quosure(&self) -> Option<&Quosure> {
        match self {
            Value::Quosure(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_language(&self) -> Option<&Expr> {
        match self {
            Value::Language(expr) => Some(expr),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_env(&self) -> Option<&Env> {
        match self {
            Value::Env(env) => Some(env),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Named<Value>]> {
        match self {
            Value::List(entries) => Some(entries),
            _ => None,
        }
    }

    /// `NULL` or a length-one atomic vector, as a literal.
    pub fn to_literal(&self) -> Option<Literal> {
        match self {
            Value::Null => Some(Literal::Null),
            Value::Logical(v) if v.len() == 1 => Some(Literal::Bool(v[0])),
            Value::Integer(v) if v.len() == 1 => Some(Literal::Int(v[0])),
            Value::Double(v) if v.len() == 1 => Some(Literal::Double(v[0])),
            Value::Character(v) if v.len() == 1 => Some(Literal::string(&v[0])),
            _ => None,
        }
    }

    /// The elements of an atomic vector, each as a length-one vector.
    pub fn elements(&self) -> Option<Vec<Value>> {
        Some(match self {
            Value::Logical(v) => v.iter().map(|&b| Value::bool(b)).collect(),
            Value::Integer(v) => v.iter().map(|&n| Value::int(n)).collect(),
            Value::Double(v) => v.iter().map(|&d| Value::double(d)).collect(),
            Value::Character(v) => v.iter().map(|s| Value::string(s.as_str())).collect(),
            _ => return None,
        })
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        literal.to_value()
    }
}

impl From<Expr> for Value {
    fn from(expr: Expr) -> Self {
        Value::language(expr)
    }
}

impl From<Quosure> for Value {
    fn from(quosure: Quosure) -> Self {
        Value::Quosure(quosure)
    }
}

/// Structural for data; identity for functions and scopes.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Logical(a), Value::Logical(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Character(a), Value::Character(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Language(a), Value::Language(b)) => a == b,
            (Value::Quosure(a), Value::Quosure(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Env(a), Value::Env(b)) => a.ptr_eq(b),
            (Value::Table(a), Value::Table(b)) => a == b,
            _ => false,
        }
    }
}

fn write_vector<T>(
    f: &mut fmt::Formatter<'_>,
    type_name: &str,
    items: &[T],
    mut write_item: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    match items {
        [] => write!(f, "{type_name}(0)"),
        [item] => write_item(f, item),
        _ => {
            f.write_str("c(")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_item(f, item)?;
            }
            f.write_char(')')
        }
    }
}

fn write_entries<'a>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    entries: impl Iterator<Item = (Option<&'a str>, &'a Value)>,
) -> fmt::Result {
    f.write_str(open)?;
    f.write_char('(')?;
    for (i, (name, value)) in entries.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        if let Some(name) = name {
            write!(f, "{name} = ")?;
        }
        write!(f, "{value}")?;
    }
    f.write_char(')')
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Logical(v) => write_vector(f, "logical", v, |f, b| {
                f.write_str(if *b { "TRUE" } else { "FALSE" })
            }),
            Value::Integer(v) => write_vector(f, "integer", v, |f, n| write!(f, "{n}")),
            Value::Double(v) => write_vector(f, "double", v, |f, d| fmt_double(*d, f)),
            Value::Character(v) => write_vector(f, "character", v, |f, s| write!(f, "{s:?}")),
            Value::List(entries) => write_entries(
                f,
                "list",
                entries
                    .iter()
                    .map(|e| (e.name.as_ref().map(|n| n.as_str()), &e.value)),
            ),
            Value::Language(expr) => write!(f, "{expr}"),
            Value::Quosure(q) => write!(f, "{q}"),
            Value::Function(func) => write!(f, "{func}"),
            Value::Env(_) => f.write_str("<environment>"),
            Value::Table(table) => write_entries(
                f,
                "data_frame",
                table
                    .columns()
                    .iter()
                    .map(|(name, col)| (Some(name.as_str()), col)),
            ),
        }
    }
}
