//! Promises: arguments captured at a call site and forced on first use.

use std::cell::RefCell;
use std::fmt;

use tracing::trace;

use super::Env;
use crate::errors::{promise_cycle, EvalResult};
use crate::executor::Executor;
use crate::expr::Expr;
use crate::heap::Heap;
use crate::mask::Layers;
use crate::quosure::Quosure;
use crate::value::Value;

enum State {
    Pending,
    Forcing,
    Forced(Value),
}

struct PromiseCell {
    expr: Expr,
    env: Env,
    layers: Layers,
    state: RefCell<State>,
}

/// An argument expression, the scope it was written in, and its cached value.
///
/// The promise also remembers the evaluation layers active at the call site,
/// so an argument written under a data mask sees the same mask when forced.
/// A promise is evaluated at most once; a failed evaluation leaves it pending.
#[derive(Clone)]
pub struct Promise(Heap<PromiseCell>);

impl Promise {
    pub fn new(expr: Expr, env: Env, layers: Layers) -> Self {
        Promise(Heap::new(PromiseCell {
            expr,
            env,
            layers,
            state: RefCell::new(State::Pending),
        }))
    }

    /// The unevaluated argument expression.
    pub fn expr(&self) -> &Expr {
        &self.0.expr
    }

    /// The caller's scope.
    pub fn env(&self) -> &Env {
        &self.0.env
    }

    pub fn layers(&self) -> &Layers {
        &self.0.layers
    }

    /// The cached value, if the promise has been forced.
    pub fn value(&self) -> Option<Value> {
        match &*self.0.state.borrow() {
            State::Forced(value) => Some(value.clone()),
            State::Pending | State::Forcing => None,
        }
    }

    /// The argument expression, unevaluated.
    pub fn capture(&self) -> Expr {
        self.0.expr.clone()
    }

    /// The argument expression bound to the caller's scope.
    ///
    /// An argument that is already a quosure leaf is returned as is rather
    /// than wrapped a second time.
    pub fn capture_argument(&self) -> Quosure {
        match &self.0.expr {
            Expr::Quosure(quosure) => quosure.clone(),
            expr => Quosure::new(expr.clone(), self.0.env.clone()),
        }
    }

    /// Evaluate the argument, or return the cached value.
    pub fn force(&self, exec: &mut dyn Executor) -> EvalResult {
        {
            let mut state = self.0.state.borrow_mut();
            if let State::Forced(value) = &*state {
                return Ok(value.clone());
            }
            if matches!(*state, State::Forcing) {
                return Err(promise_cycle(&self.0.expr.to_string()));
            }
            *state = State::Forcing;
        }
        trace!(expr = %self.0.expr, "forcing promise");
        let result = exec.eval_in(&self.0.expr, &self.0.env, &self.0.layers);
        *self.0.state.borrow_mut() = match &result {
            Ok(value) => State::Forced(value.clone()),
            Err(_) => State::Pending,
        };
        result
    }
}

/// Identity: the same captured argument.
impl PartialEq for Promise {
    fn eq(&self, other: &Self) -> bool {
        Heap::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("expr", &format_args!("{}", self.0.expr))
            .field("forced", &self.value().is_some())
            .finish()
    }
}
