//! Copy-on-write splicing into expression trees.
//!
//! A `Position` is a path of slots from the root: `Slot::Head` steps into a
//! call's head, `Slot::Arg(i)` into its `i`-th argument. Splicing rebuilds
//! only the calls along that path; every other subtree is shared with the
//! input, which is never modified.

use std::fmt;

use tracing::debug;

use crate::errors::{
    invalid_splice, invalid_splice_position, not_a_sequence, splice_many_at_scalar, EvalError,
};
use crate::expr::{Call, Expr};
use crate::heap::Heap;
use crate::literal::Literal;
use crate::named::{Arg, Named};
use crate::quosure::Quosure;
use crate::symbol::Symbol;
use crate::value::Value;

/// One step in a path through an expression tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Head,
    Arg(usize),
}

/// A path from the root of an expression tree to one node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Position(Vec<Slot>);

impl Position {
    /// The root itself.
    pub fn root() -> Self {
        Position(Vec::new())
    }

    /// The `index`-th argument of the root call.
    pub fn arg(index: usize) -> Self {
        Position(vec![Slot::Arg(index)])
    }

    /// The head of the root call.
    pub fn head() -> Self {
        Position(vec![Slot::Head])
    }

    /// This path extended by one step.
    #[must_use]
    pub fn then(mut self, slot: Slot) -> Self {
        self.0.push(slot);
        self
    }

    pub fn slots(&self) -> &[Slot] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Slot>> for Position {
    fn from(slots: Vec<Slot>) -> Self {
        Position(slots)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for slot in &self.0 {
            match slot {
                Slot::Head => f.write_str("[head]")?,
                Slot::Arg(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

/// What to put at a position.
#[derive(Clone, Debug, PartialEq)]
pub enum Splice {
    /// Replace the node with one expression.
    One(Expr),
    /// Replace one argument with zero or more sibling arguments.
    Many(Vec<Arg>),
}

impl From<Expr> for Splice {
    fn from(expr: Expr) -> Self {
        Splice::One(expr)
    }
}

impl From<Quosure> for Splice {
    fn from(quosure: Quosure) -> Self {
        Splice::One(Expr::Quosure(quosure))
    }
}

impl From<Symbol> for Splice {
    fn from(symbol: Symbol) -> Self {
        Splice::One(Expr::Symbol(symbol))
    }
}

impl From<Literal> for Splice {
    fn from(literal: Literal) -> Self {
        Splice::One(Expr::Literal(literal))
    }
}

impl From<Vec<Arg>> for Splice {
    fn from(args: Vec<Arg>) -> Self {
        Splice::Many(args)
    }
}

impl From<Vec<Expr>> for Splice {
    fn from(exprs: Vec<Expr>) -> Self {
        Splice::Many(exprs.into_iter().map(Named::positional).collect())
    }
}

impl From<Vec<Quosure>> for Splice {
    fn from(quosures: Vec<Quosure>) -> Self {
        Splice::Many(
            quosures
                .into_iter()
                .map(|q| Named::positional(Expr::Quosure(q)))
                .collect(),
        )
    }
}

impl Splice {
    /// A runtime value as a single expression node.
    ///
    /// Expressions and quosures splice as themselves (a quosure stays a
    /// quosure leaf); `NULL` and length-one atomic vectors become literals.
    pub fn one_from_value(value: &Value) -> Result<Expr, EvalError> {
        match value {
            Value::Language(expr) => Ok((**expr).clone()),
            Value::Quosure(q) => Ok(Expr::Quosure(q.clone())),
            Value::List(_) => Err(splice_many_at_scalar()),
            other => other
                .to_literal()
                .map(Expr::Literal)
                .ok_or_else(|| invalid_splice(other.type_name())),
        }
    }

    /// A runtime value as a sequence of sibling arguments.
    ///
    /// List entries keep their names; atomic vectors splice one literal per
    /// element; `NULL` splices nothing.
    pub fn many_from_value(value: &Value) -> Result<Vec<Arg>, EvalError> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::List(entries) => entries
                .iter()
                .map(|entry| {
                    Ok(Named {
                        name: entry.name.clone(),
                        value: Splice::one_from_value(&entry.value)?,
                    })
                })
                .collect(),
            other => match other.elements() {
                Some(items) => items
                    .iter()
                    .map(|item| Splice::one_from_value(item).map(Named::positional))
                    .collect(),
                None => Err(not_a_sequence(other.type_name())),
            },
        }
    }
}

/// A copy of `tree` with the node at `position` replaced.
///
/// `Splice::Many` must target an argument slot; its arguments take the place
/// of that one argument, in order. `tree` itself is never modified.
pub fn splice(
    tree: &Expr,
    position: &Position,
    replacement: impl Into<Splice>,
) -> Result<Expr, EvalError> {
    let replacement = replacement.into();
    debug!(%tree, %position, "splicing");
    splice_at(tree, position.slots(), replacement, position)
}

fn splice_at(
    tree: &Expr,
    slots: &[Slot],
    replacement: Splice,
    position: &Position,
) -> Result<Expr, EvalError> {
    let Some((&slot, rest)) = slots.split_first() else {
        return match replacement {
            Splice::One(expr) => Ok(expr),
            Splice::Many(_) => Err(splice_many_at_scalar()),
        };
    };
    let Expr::Call(call) = tree else {
        return Err(invalid_splice_position(&position.to_string()));
    };
    match slot {
        Slot::Head => {
            let head = splice_at(&call.head, rest, replacement, position)?;
            Ok(Expr::Call(Heap::new(Call {
                head,
                args: call.args.clone(),
            })))
        }
        Slot::Arg(index) => {
            let Some(arg) = call.args.get(index) else {
                return Err(invalid_splice_position(&position.to_string()));
            };
            let mut args = Vec::with_capacity(call.args.len());
            args.extend_from_slice(&call.args[..index]);
            match (rest.is_empty(), replacement) {
                (true, Splice::Many(many)) => args.extend(many),
                (_, replacement) => args.push(Named {
                    name: arg.name.clone(),
                    value: splice_at(&arg.value, rest, replacement, position)?,
                }),
            }
            args.extend_from_slice(&call.args[index + 1..]);
            Ok(Expr::Call(Heap::new(Call {
                head: call.head.clone(),
                args,
            })))
        }
    }
}

#[cfg(test)]
mod tests;
