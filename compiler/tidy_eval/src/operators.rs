//! Vectorised operator implementations used by the base prelude.
//!
//! Operands are atomic vectors. The shorter operand is recycled to the
//! length of the longer one; an empty operand gives an empty result.
//! Logicals count as integers in arithmetic and numbers count as logicals
//! (non-zero is `TRUE`) in `&` and `|`.

use std::borrow::Cow;
use std::cmp::Ordering;

use tidy_ir::{integer_overflow, type_mismatch, EvalError, EvalResult, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    /// Always produces doubles.
    Div,
    /// Always produces doubles.
    Pow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Arith(ArithOp),
    Compare(CompareOp),
    Logic(LogicOp),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

impl ArithOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Pow => "^",
        }
    }

    fn op_name(self) -> &'static str {
        match self {
            ArithOp::Add => "addition",
            ArithOp::Sub => "subtraction",
            ArithOp::Mul => "multiplication",
            ArithOp::Div => "division",
            ArithOp::Pow => "exponentiation",
        }
    }

    /// The checked integer operation, if the result stays integer.
    fn int_op(self) -> Option<fn(i64, i64) -> Option<i64>> {
        match self {
            ArithOp::Add => Some(i64::checked_add),
            ArithOp::Sub => Some(i64::checked_sub),
            ArithOp::Mul => Some(i64::checked_mul),
            ArithOp::Div | ArithOp::Pow => None,
        }
    }

    fn apply_double(self, a: f64, b: f64) -> f64 {
        match self {
            ArithOp::Add => a + b,
            ArithOp::Sub => a - b,
            ArithOp::Mul => a * b,
            ArithOp::Div => a / b,
            ArithOp::Pow => a.powf(b),
        }
    }
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
        }
    }

    /// Unordered operands (NaN) only satisfy `!=`.
    fn test(self, ordering: Option<Ordering>) -> bool {
        let Some(ordering) = ordering else {
            return self == CompareOp::NotEq;
        };
        match self {
            CompareOp::Eq => ordering.is_eq(),
            CompareOp::NotEq => ordering.is_ne(),
            CompareOp::Lt => ordering.is_lt(),
            CompareOp::LtEq => ordering.is_le(),
            CompareOp::Gt => ordering.is_gt(),
            CompareOp::GtEq => ordering.is_ge(),
        }
    }
}

impl LogicOp {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicOp::And => "&",
            LogicOp::Or => "|",
        }
    }
}

impl BinaryOp {
    /// Every binary operator, for registering the prelude.
    pub const ALL: [BinaryOp; 13] = [
        BinaryOp::Arith(ArithOp::Add),
        BinaryOp::Arith(ArithOp::Sub),
        BinaryOp::Arith(ArithOp::Mul),
        BinaryOp::Arith(ArithOp::Div),
        BinaryOp::Arith(ArithOp::Pow),
        BinaryOp::Compare(CompareOp::Eq),
        BinaryOp::Compare(CompareOp::NotEq),
        BinaryOp::Compare(CompareOp::Lt),
        BinaryOp::Compare(CompareOp::LtEq),
        BinaryOp::Compare(CompareOp::Gt),
        BinaryOp::Compare(CompareOp::GtEq),
        BinaryOp::Logic(LogicOp::And),
        BinaryOp::Logic(LogicOp::Or),
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Arith(op) => op.symbol(),
            BinaryOp::Compare(op) => op.symbol(),
            BinaryOp::Logic(op) => op.symbol(),
        }
    }
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
        }
    }
}

// Operand coercion

pub(crate) enum Numbers<'a> {
    Int(Cow<'a, [i64]>),
    Double(Cow<'a, [f64]>),
}

impl Numbers<'_> {
    #[expect(
        clippy::cast_precision_loss,
        reason = "integers beyond 2^53 round like any other int-to-double coercion"
    )]
    pub(crate) fn to_doubles(&self) -> Cow<'_, [f64]> {
        match self {
            Numbers::Int(v) => Cow::Owned(v.iter().map(|&n| n as f64).collect()),
            Numbers::Double(v) => Cow::Borrowed(v),
        }
    }
}

pub(crate) fn numbers(value: &Value) -> Result<Numbers<'_>, EvalError> {
    match value {
        Value::Integer(v) => Ok(Numbers::Int(Cow::Borrowed(v.as_slice()))),
        Value::Double(v) => Ok(Numbers::Double(Cow::Borrowed(v.as_slice()))),
        Value::Logical(v) => Ok(Numbers::Int(Cow::Owned(
            v.iter().map(|&b| i64::from(b)).collect(),
        ))),
        Value::Null => Ok(Numbers::Int(Cow::Owned(Vec::new()))),
        other => Err(type_mismatch("numeric", other.type_name())),
    }
}

pub(crate) fn logicals(value: &Value) -> Result<Cow<'_, [bool]>, EvalError> {
    match value {
        Value::Logical(v) => Ok(Cow::Borrowed(v.as_slice())),
        Value::Integer(v) => Ok(Cow::Owned(v.iter().map(|&n| n != 0).collect())),
        Value::Double(v) => Ok(Cow::Owned(v.iter().map(|&d| d != 0.0).collect())),
        Value::Null => Ok(Cow::Owned(Vec::new())),
        other => Err(type_mismatch("logical", other.type_name())),
    }
}

/// Character operands as they are; other atomic operands as their printed form.
pub(crate) fn strings(value: &Value) -> Result<Cow<'_, [String]>, EvalError> {
    match value {
        Value::Character(v) => Ok(Cow::Borrowed(v.as_slice())),
        Value::Null => Ok(Cow::Owned(Vec::new())),
        other => other
            .elements()
            .map(|items| Cow::Owned(items.iter().map(ToString::to_string).collect()))
            .ok_or_else(|| type_mismatch("character", other.type_name())),
    }
}

/// Apply `f` pairwise, recycling the shorter side.
fn recycle<A, B, T>(a: &[A], b: &[B], mut f: impl FnMut(&A, &B) -> T) -> Vec<T> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| f(&a[i % a.len()], &b[i % b.len()]))
        .collect()
}

/// Checked arithmetic with overflow handling, element by element.
fn checked_recycle(
    a: &[i64],
    b: &[i64],
    op: fn(i64, i64) -> Option<i64>,
    op_name: &'static str,
) -> Result<Vec<i64>, EvalError> {
    recycle(a, b, |&x, &y| op(x, y).ok_or_else(|| integer_overflow(op_name)))
        .into_iter()
        .collect()
}

// Direct dispatch

/// Evaluate a binary operator over two atomic vectors.
pub fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    match op {
        BinaryOp::Arith(op) => eval_arith(op, left, right),
        BinaryOp::Compare(op) => eval_compare(op, left, right),
        BinaryOp::Logic(op) => eval_logic(op, left, right),
    }
}

fn eval_arith(op: ArithOp, left: &Value, right: &Value) -> EvalResult {
    let (a, b) = (numbers(left)?, numbers(right)?);
    if let (Numbers::Int(a), Numbers::Int(b), Some(int_op)) = (&a, &b, op.int_op()) {
        return checked_recycle(a, b, int_op, op.op_name()).map(Value::ints);
    }
    let (a, b) = (a.to_doubles(), b.to_doubles());
    Ok(Value::doubles(recycle(&a, &b, |&x, &y| op.apply_double(x, y))))
}

fn eval_compare(op: CompareOp, left: &Value, right: &Value) -> EvalResult {
    if matches!(left, Value::Character(_)) || matches!(right, Value::Character(_)) {
        let (a, b) = (strings(left)?, strings(right)?);
        return Ok(Value::logicals(recycle(&a, &b, |x, y| op.test(Some(x.cmp(y))))));
    }
    let (a, b) = (numbers(left)?, numbers(right)?);
    let (a, b) = (a.to_doubles(), b.to_doubles());
    Ok(Value::logicals(recycle(&a, &b, |x, y| op.test(x.partial_cmp(y)))))
}

fn eval_logic(op: LogicOp, left: &Value, right: &Value) -> EvalResult {
    let (a, b) = (logicals(left)?, logicals(right)?);
    Ok(Value::logicals(recycle(&a, &b, |&x, &y| match op {
        LogicOp::And => x && y,
        LogicOp::Or => x || y,
    })))
}

/// Evaluate a prefix operator over an atomic vector.
pub fn evaluate_unary(op: UnaryOp, operand: &Value) -> EvalResult {
    match op {
        UnaryOp::Not => {
            let v = logicals(operand)?;
            Ok(Value::logicals(v.iter().map(|b| !b).collect()))
        }
        UnaryOp::Plus => Ok(match numbers(operand)? {
            Numbers::Int(v) => Value::ints(v.into_owned()),
            Numbers::Double(v) => Value::doubles(v.into_owned()),
        }),
        UnaryOp::Neg => match numbers(operand)? {
            Numbers::Int(v) => v
                .iter()
                .map(|n| n.checked_neg().ok_or_else(|| integer_overflow("negation")))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::ints),
            Numbers::Double(v) => Ok(Value::doubles(v.iter().map(|d| -d).collect())),
        },
    }
}
