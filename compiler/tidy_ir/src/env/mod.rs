//! Scopes: chains of name-to-binding maps.
//!
//! An `Env` is a shared handle to one scope. Each scope has at most one
//! parent and lookup walks outward until the name is found or the chain ends.
//! Handles are cheap to clone and compare by identity: two `Env`s are the
//! same scope only if they point at the same allocation.

mod promise;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

pub use promise::Promise;

use crate::errors::{type_mismatch, undefined_variable, EvalError};
use crate::expr::Expr;
use crate::quosure::Quosure;
use crate::symbol::Symbol;
use crate::value::Value;

/// A single-threaded scope wrapper for reference-counted interior mutability.
///
/// All scope allocations go through `LocalScope::new()`. The wrapper is not
/// thread-safe; scopes are only ever touched from the evaluating thread.
#[repr(transparent)]
struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }

    #[inline]
    fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

/// A single scope containing variable bindings.
struct Scope {
    /// Bindings in this scope (`FxHashMap` for faster hashing with `Symbol` keys).
    bindings: FxHashMap<Symbol, Binding>,
    /// Enclosing scope (for lexical scoping).
    parent: Option<Env>,
}

/// What a name is bound to.
#[derive(Clone, Debug)]
pub enum Binding {
    /// An evaluated value.
    Value(Value),
    /// A lazily evaluated argument.
    Promise(Promise),
    /// A parameter the caller left empty and that has no default.
    Missing,
}

impl Binding {
    /// The value, if it is available without evaluating anything.
    pub fn value(&self) -> Option<Value> {
        match self {
            Binding::Value(v) => Some(v.clone()),
            Binding::Promise(p) => p.value(),
            Binding::Missing => None,
        }
    }
}

/// A handle to a scope.
#[derive(Clone)]
pub struct Env(LocalScope<Scope>);

impl Env {
    /// A new empty scope with no parent.
    pub fn new() -> Self {
        Env(LocalScope::new(Scope {
            bindings: FxHashMap::default(),
            parent: None,
        }))
    }

    /// A new empty scope whose parent is `self`.
    #[must_use]
    pub fn child(&self) -> Self {
        Env(LocalScope::new(Scope {
            bindings: FxHashMap::default(),
            parent: Some(self.clone()),
        }))
    }

    /// The enclosing scope, if any.
    pub fn parent(&self) -> Option<Env> {
        self.0.borrow().parent.clone()
    }

    /// Bind `name` to a value in this scope, replacing any earlier binding.
    #[inline]
    pub fn define(&self, name: impl Into<Symbol>, value: Value) {
        self.bind(name, Binding::Value(value));
    }

    /// Bind `name` in this scope.
    pub fn bind(&self, name: impl Into<Symbol>, binding: Binding) {
        self.0.borrow_mut().bindings.insert(name.into(), binding);
    }

    /// Bind `name` to an unevaluated argument in this scope.
    pub fn define_promise(&self, name: impl Into<Symbol>, promise: Promise) {
        self.bind(name, Binding::Promise(promise));
    }

    /// Overwrite the nearest existing binding of `name`, or define it here
    /// if no scope on the chain binds it.
    pub fn assign(&self, name: impl Into<Symbol>, value: Value) {
        let name = name.into();
        let mut scope = self.clone();
        loop {
            if scope.0.borrow().bindings.contains_key(&name) {
                scope.define(name, value);
                return;
            }
            match scope.parent() {
                Some(parent) => scope = parent,
                None => break,
            }
        }
        self.define(name, value);
    }

    /// Look `name` up in this scope, then each ancestor in turn.
    pub fn lookup(&self, name: &str) -> Option<Binding> {
        let mut scope = self.0.clone();
        loop {
            let parent = {
                let current = scope.borrow();
                if let Some(binding) = current.bindings.get(name) {
                    return Some(binding.clone());
                }
                current.parent.clone()?
            };
            scope = parent.0;
        }
    }

    /// Look `name` up in this scope only.
    pub fn lookup_local(&self, name: &str) -> Option<Binding> {
        self.0.borrow().bindings.get(name).cloned()
    }

    /// The value bound to `name`, if it can be read without evaluation.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.lookup(name).and_then(|b| b.value())
    }

    /// Whether `name` is bound anywhere on the chain.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Names bound in this scope, sorted.
    pub fn names(&self) -> Vec<Symbol> {
        let mut names: Vec<Symbol> = self.0.borrow().bindings.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of ancestors.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(env) = current {
            depth += 1;
            current = env.parent();
        }
        depth
    }

    /// Whether two handles refer to the same scope.
    #[inline]
    pub fn ptr_eq(&self, other: &Env) -> bool {
        self.0.ptr_eq(&other.0)
    }

    /// The quosure behind the argument bound to `name`.
    ///
    /// Called from inside a callee's scope: returns the caller's expression
    /// bound to the caller's scope, without evaluating it. A parameter the
    /// caller left empty yields a quosure of the missing marker.
    pub fn capture_argument(&self, name: &Symbol) -> Result<Quosure, EvalError> {
        match self.lookup(name.as_str()) {
            Some(Binding::Promise(promise)) => Ok(promise.capture_argument()),
            Some(Binding::Missing) => Ok(Quosure::new(Expr::missing(), self.clone())),
            Some(Binding::Value(value)) => Err(type_mismatch(
                &format!("lazy argument for '{name}'"),
                value.type_name(),
            )),
            None => Err(undefined_variable(name.as_str())),
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints local names and depth only; bindings may refer back to this scope.
impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Env")
            .field("names", &self.names())
            .field("depth", &self.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests;
