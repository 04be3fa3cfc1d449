//! Quosures: an expression paired with the scope it belongs to.

use std::fmt;

use crate::env::Env;
use crate::expr::Expr;
use crate::heap::Heap;

/// A deferred expression bound to the scope it must be evaluated in.
///
/// The scope is fixed at construction. `with_env` returns a new quosure and
/// leaves the original untouched. A quosure holds its scope alive.
///
/// Quosures are their own tagged type, distinct from a bare `Expr`, so code
/// can always tell "deferred with scope" from "deferred only".
#[derive(Clone)]
pub struct Quosure {
    expr: Heap<Expr>,
    env: Env,
}

impl Quosure {
    /// Bind `expr` to `env`. Nothing is evaluated.
    pub fn new(expr: Expr, env: Env) -> Self {
        Quosure {
            expr: Heap::new(expr),
            env,
        }
    }

    /// The wrapped expression.
    #[inline]
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// The scope the expression resolves its symbols in.
    #[inline]
    pub fn env(&self) -> &Env {
        &self.env
    }

    /// A copy of this quosure bound to a different scope.
    #[must_use]
    pub fn with_env(&self, env: Env) -> Self {
        Quosure {
            expr: self.expr.clone(),
            env,
        }
    }
}

/// Same expression tree and the very same scope.
impl PartialEq for Quosure {
    fn eq(&self, other: &Self) -> bool {
        *self.expr == *other.expr && self.env.ptr_eq(&other.env)
    }
}

impl fmt::Debug for Quosure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quosure")
            .field("expr", &format_args!("{}", self.expr))
            .field("env", &self.env)
            .finish()
    }
}

impl fmt::Display for Quosure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("^")?;
        crate::expr::write_quosure_body(f, &self.expr)
    }
}
