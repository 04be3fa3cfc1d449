//! Deferred expressions: unevaluated syntax trees.
//!
//! An `Expr` is a Symbol, a Literal, a Call, or a nested `Quosure` leaf left
//! behind by splicing. Every syntactic form is a call: `x + y` is a call to
//! `+`, `{ a; b }` a call to `{`, `!!x` a call to `!!`. Trees are immutable
//! and share structure, so cloning is cheap and splicing copies only the path
//! it rewrites.

mod display;

pub(crate) use display::write_quosure_body;

use crate::heap::Heap;
use crate::literal::Literal;
use crate::named::{Arg, Named};
use crate::quosure::Quosure;
use crate::symbol::Symbol;

/// Operator for single-node unquotation.
pub const UNQUOTE: &str = "!!";
/// Operator for splicing a sequence as sibling arguments.
pub const UNQUOTE_SPLICE: &str = "!!!";

/// An unevaluated expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// A name reference.
    Symbol(Symbol),
    /// An atomic constant.
    Literal(Literal),
    /// A call: head first, then arguments.
    Call(Heap<Call>),
    /// A spliced quosure, evaluated in its own scope.
    Quosure(Quosure),
}

/// A call node.
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    /// The callee: usually a symbol, but any expression is allowed.
    pub head: Expr,
    /// Positional or named arguments, in source order.
    pub args: Vec<Arg>,
}

impl Expr {
    /// A symbol reference.
    pub fn symbol(name: impl Into<Symbol>) -> Self {
        Expr::Symbol(name.into())
    }

    /// The missing-argument marker.
    pub fn missing() -> Self {
        Expr::Symbol(Symbol::missing())
    }

    pub fn int(n: i64) -> Self {
        Expr::Literal(Literal::Int(n))
    }

    pub fn double(d: f64) -> Self {
        Expr::Literal(Literal::Double(d))
    }

    pub fn bool(b: bool) -> Self {
        Expr::Literal(Literal::Bool(b))
    }

    pub fn string(text: &str) -> Self {
        Expr::Literal(Literal::string(text))
    }

    pub fn null() -> Self {
        Expr::Literal(Literal::Null)
    }

    /// A call with an arbitrary head and (possibly named) arguments.
    pub fn call(head: impl Into<Expr>, args: Vec<Arg>) -> Self {
        Expr::Call(Heap::new(Call {
            head: head.into(),
            args,
        }))
    }

    /// A call to a named function with positional arguments.
    ///
    /// ```text
    /// Expr::call2("+", vec![Expr::symbol("x"), Expr::int(1)])  // x + 1
    /// ```
    pub fn call2(name: &str, args: Vec<Expr>) -> Self {
        Expr::call(
            Expr::symbol(name),
            args.into_iter().map(Named::positional).collect(),
        )
    }

    /// A quosure leaf.
    pub fn quosure(quosure: Quosure) -> Self {
        Expr::Quosure(quosure)
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Expr::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Expr::Literal(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&Call> {
        match self {
            Expr::Call(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_quosure(&self) -> Option<&Quosure> {
        match self {
            Expr::Quosure(q) => Some(q),
            _ => None,
        }
    }

    /// Returns `true` for the missing-argument marker.
    pub fn is_missing(&self) -> bool {
        matches!(self, Expr::Symbol(s) if s.is_missing())
    }

    /// Whether this is a call whose head is the symbol `name`.
    pub fn is_call_to(&self, name: &str) -> bool {
        self.as_call().is_some_and(|c| c.is_call_to(name))
    }

    /// The operand of `!!x`, if this is one.
    pub fn unquote_operand(&self) -> Option<&Expr> {
        self.as_call().and_then(|c| c.unary_operand(UNQUOTE))
    }

    /// The operand of `!!!x`, if this is one.
    pub fn unquote_splice_operand(&self) -> Option<&Expr> {
        self.as_call().and_then(|c| c.unary_operand(UNQUOTE_SPLICE))
    }

    /// Whether any symbol occurs in the tree, including inside quosure leaves.
    pub fn contains_symbols(&self) -> bool {
        match self {
            Expr::Symbol(_) => true,
            Expr::Literal(_) => false,
            Expr::Quosure(q) => q.expr().contains_symbols(),
            Expr::Call(c) => {
                c.head.contains_symbols() || c.args.iter().any(|a| a.value.contains_symbols())
            }
        }
    }
}

impl Call {
    /// The head symbol, if the head is a plain name.
    pub fn head_name(&self) -> Option<&Symbol> {
        self.head.as_symbol()
    }

    /// Whether the head is the symbol `name`.
    pub fn is_call_to(&self, name: &str) -> bool {
        self.head_name().is_some_and(|s| s.as_str() == name)
    }

    /// The single positional operand of a call to `op`.
    fn unary_operand(&self, op: &str) -> Option<&Expr> {
        match self.args.as_slice() {
            [arg] if arg.name.is_none() && self.is_call_to(op) => Some(&arg.value),
            _ => None,
        }
    }

    /// `Some("!!")` or `Some("!!!")` when the call is an unquote operator.
    pub fn unquote_operator(&self) -> Option<&'static str> {
        if self.is_call_to(UNQUOTE) {
            Some(UNQUOTE)
        } else if self.is_call_to(UNQUOTE_SPLICE) {
            Some(UNQUOTE_SPLICE)
        } else {
            None
        }
    }
}

impl From<Symbol> for Expr {
    fn from(symbol: Symbol) -> Self {
        Expr::Symbol(symbol)
    }
}

impl From<Literal> for Expr {
    fn from(literal: Literal) -> Self {
        Expr::Literal(literal)
    }
}

impl From<Quosure> for Expr {
    fn from(quosure: Quosure) -> Self {
        Expr::Quosure(quosure)
    }
}

#[cfg(test)]
mod tests;
