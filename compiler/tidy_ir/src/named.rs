//! Optionally named entries: call arguments and list elements.

use crate::expr::Expr;
use crate::symbol::Symbol;

/// A value with an optional name, as in `f(x, by = y)` or `list(a = 1, 2)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Named<T> {
    pub name: Option<Symbol>,
    pub value: T,
}

/// A call argument.
pub type Arg = Named<Expr>;

impl<T> Named<T> {
    /// An unnamed entry.
    pub fn positional(value: T) -> Self {
        Named { name: None, value }
    }

    /// A named entry.
    pub fn named(name: impl Into<Symbol>, value: T) -> Self {
        Named {
            name: Some(name.into()),
            value,
        }
    }

    /// Whether the entry carries the given name.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.as_ref().is_some_and(|n| n.as_str() == name)
    }

    /// Transform the value, keeping the name.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Named<U> {
        Named {
            name: self.name,
            value: f(self.value),
        }
    }
}
