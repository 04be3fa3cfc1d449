//! Deparsing: rendering an expression tree back to source text.
//!
//! Infix and prefix calls print in operator form, with parentheses inserted
//! only where precedence requires them. Quosure leaves print as `^expr`.

use std::fmt::{self, Display, Formatter, Write};

use super::{Call, Expr};
use crate::literal::Literal;
use crate::named::Arg;
use crate::symbol::Symbol;

// Binding strength, loosest first.
const PREC_FORM: u8 = 0;
const PREC_ASSIGN: u8 = 1;
const PREC_OR: u8 = 2;
const PREC_AND: u8 = 3;
const PREC_NOT: u8 = 4;
const PREC_COMPARE: u8 = 5;
const PREC_ADD: u8 = 6;
const PREC_MUL: u8 = 7;
const PREC_NEG: u8 = 8;
const PREC_POW: u8 = 9;
const PREC_UNQUOTE: u8 = 10;
const PREC_POSTFIX: u8 = 11;
const PREC_ATOM: u8 = 12;

/// How a call node is rendered.
enum Form<'a> {
    Binary {
        op: &'a str,
        prec: u8,
        right_assoc: bool,
        lhs: &'a Expr,
        rhs: &'a Expr,
    },
    Prefix {
        op: &'a str,
        prec: u8,
        operand: &'a Expr,
    },
    Dollar {
        target: &'a Expr,
        field: &'a Expr,
    },
    Index {
        target: &'a Expr,
        index: &'a Expr,
    },
    Block(&'a [Arg]),
    If {
        cond: &'a Expr,
        then: &'a Expr,
        otherwise: Option<&'a Expr>,
    },
    Function {
        params: &'a [Arg],
        body: &'a Expr,
    },
    Plain,
}

fn binary_op(op: &str) -> Option<(u8, bool)> {
    Some(match op {
        "<-" | "=" => (PREC_ASSIGN, true),
        "|" | "||" => (PREC_OR, false),
        "&" | "&&" => (PREC_AND, false),
        "==" | "!=" | "<" | "<=" | ">" | ">=" => (PREC_COMPARE, false),
        "+" | "-" => (PREC_ADD, false),
        "*" | "/" => (PREC_MUL, false),
        "^" => (PREC_POW, true),
        _ => return None,
    })
}

fn prefix_op(op: &str) -> Option<u8> {
    Some(match op {
        "!" => PREC_NOT,
        "-" | "+" => PREC_NEG,
        "!!" | "!!!" => PREC_UNQUOTE,
        _ => return None,
    })
}

fn positional(args: &[Arg]) -> Option<Vec<&Expr>> {
    args.iter()
        .map(|a| a.name.is_none().then_some(&a.value))
        .collect()
}

fn classify(call: &Call) -> Form<'_> {
    let Some(op) = call.head_name().map(Symbol::as_str) else {
        return Form::Plain;
    };
    match op {
        "{" => return Form::Block(&call.args),
        "function" => {
            if let Some((body, params)) = call.args.split_last() {
                if body.name.is_none() && params.iter().all(|p| p.name.is_some()) {
                    return Form::Function {
                        params,
                        body: &body.value,
                    };
                }
            }
            return Form::Plain;
        }
        _ => {}
    }
    let Some(args) = positional(&call.args) else {
        return Form::Plain;
    };
    match (op, args.as_slice()) {
        ("$", [target, field]) if is_field_name(field) => Form::Dollar { target, field },
        ("[[", [target, index]) => Form::Index { target, index },
        ("if", [cond, then]) => Form::If {
            cond,
            then,
            otherwise: None,
        },
        ("if", [cond, then, otherwise]) => Form::If {
            cond,
            then,
            otherwise: Some(otherwise),
        },
        (_, [lhs, rhs]) => match binary_op(op) {
            Some((prec, right_assoc)) => Form::Binary {
                op,
                prec,
                right_assoc,
                lhs,
                rhs,
            },
            None => Form::Plain,
        },
        (_, [operand]) => match prefix_op(op) {
            Some(prec) => Form::Prefix { op, prec, operand },
            None => Form::Plain,
        },
        _ => Form::Plain,
    }
}

fn is_field_name(expr: &Expr) -> bool {
    matches!(expr, Expr::Symbol(s) if !s.is_missing())
        || matches!(expr, Expr::Literal(Literal::Str(_)))
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Literal(Literal::Int(n)) if *n < 0 => PREC_NEG,
        Expr::Literal(Literal::Double(d)) if d.is_sign_negative() => PREC_NEG,
        Expr::Symbol(_) | Expr::Literal(_) => PREC_ATOM,
        Expr::Quosure(_) => PREC_UNQUOTE,
        Expr::Call(call) => match classify(call) {
            Form::Binary { prec, .. } | Form::Prefix { prec, .. } => prec,
            Form::Dollar { .. } | Form::Index { .. } | Form::Plain => PREC_POSTFIX,
            Form::Block(_) => PREC_ATOM,
            Form::If { .. } | Form::Function { .. } => PREC_FORM,
        },
    }
}

/// Write `expr`, parenthesised if it binds more loosely than `min_prec`.
fn write_operand(f: &mut Formatter<'_>, expr: &Expr, min_prec: u8) -> fmt::Result {
    if precedence(expr) < min_prec {
        f.write_char('(')?;
        write_expr(f, expr)?;
        f.write_char(')')
    } else {
        write_expr(f, expr)
    }
}

fn write_symbol(f: &mut Formatter<'_>, symbol: &Symbol) -> fmt::Result {
    if symbol.is_missing() || symbol.is_syntactic() {
        f.write_str(symbol.as_str())
    } else {
        write!(f, "`{symbol}`")
    }
}

fn write_args(f: &mut Formatter<'_>, args: &[Arg]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        if let Some(name) = &arg.name {
            write_symbol(f, name)?;
            if arg.value.is_missing() {
                continue;
            }
            f.write_str(" = ")?;
        }
        write_operand(f, &arg.value, PREC_FORM)?;
    }
    Ok(())
}

pub(crate) fn write_expr(f: &mut Formatter<'_>, expr: &Expr) -> fmt::Result {
    match expr {
        Expr::Symbol(s) => write_symbol(f, s),
        Expr::Literal(lit) => lit.fmt(f),
        Expr::Quosure(q) => {
            f.write_char('^')?;
            write_operand(f, q.expr(), PREC_UNQUOTE)
        }
        Expr::Call(call) => write_call(f, call),
    }
}

fn write_call(f: &mut Formatter<'_>, call: &Call) -> fmt::Result {
    match classify(call) {
        Form::Binary {
            op,
            prec,
            right_assoc,
            lhs,
            rhs,
        } => {
            let (lhs_min, rhs_min) = if right_assoc {
                (prec + 1, prec)
            } else {
                (prec, prec + 1)
            };
            // `-2^2` reads as `-(2^2)`, so the exponent side accepts prefix minus.
            let rhs_min = if op == "^" { PREC_NEG } else { rhs_min };
            write_operand(f, lhs, lhs_min)?;
            if op == "^" {
                f.write_str(op)?;
            } else {
                write!(f, " {op} ")?;
            }
            write_operand(f, rhs, rhs_min)
        }
        Form::Prefix { op, prec, operand } => {
            f.write_str(op)?;
            write_operand(f, operand, prec)
        }
        Form::Dollar { target, field } => {
            write_operand(f, target, PREC_POSTFIX)?;
            f.write_char('$')?;
            write_expr(f, field)
        }
        Form::Index { target, index } => {
            write_operand(f, target, PREC_POSTFIX)?;
            f.write_str("[[")?;
            write_expr(f, index)?;
            f.write_str("]]")
        }
        Form::Block(stmts) => {
            if stmts.is_empty() {
                return f.write_str("{}");
            }
            f.write_str("{ ")?;
            for (i, stmt) in stmts.iter().enumerate() {
                if i > 0 {
                    f.write_str("; ")?;
                }
                write_expr(f, &stmt.value)?;
            }
            f.write_str(" }")
        }
        Form::If {
            cond,
            then,
            otherwise,
        } => {
            f.write_str("if (")?;
            write_expr(f, cond)?;
            f.write_str(") ")?;
            write_expr(f, then)?;
            if let Some(otherwise) = otherwise {
                f.write_str(" else ")?;
                write_expr(f, otherwise)?;
            }
            Ok(())
        }
        Form::Function { params, body } => {
            f.write_str("function(")?;
            write_args(f, params)?;
            f.write_str(") ")?;
            write_expr(f, body)
        }
        Form::Plain => {
            write_operand(f, &call.head, PREC_POSTFIX)?;
            f.write_char('(')?;
            write_args(f, &call.args)?;
            f.write_char(')')
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_expr(f, self)
    }
}

/// Write a quosure's expression with the same parenthesisation as a leaf.
pub(crate) fn write_quosure_body(f: &mut Formatter<'_>, expr: &Expr) -> fmt::Result {
    write_operand(f, expr, PREC_UNQUOTE)
}
