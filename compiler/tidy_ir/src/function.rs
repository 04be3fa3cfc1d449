//! Callable values.
//!
//! Three kinds of function exist:
//! - **Builtin**: native code receiving evaluated arguments
//! - **Special**: native code receiving the unevaluated argument expressions,
//!   the caller's scope and the caller's layers (`quote`, `if`, `function`, ...)
//! - **Closure**: a parameter list and body written in the language, closed
//!   over the scope it was created in

use std::fmt;

use crate::env::{Env, Promise};
use crate::errors::{arity_mismatch, missing_argument, EvalError, EvalResult};
use crate::executor::Executor;
use crate::expr::Expr;
use crate::heap::Heap;
use crate::mask::Layers;
use crate::named::{Arg, Named};
use crate::symbol::Symbol;
use crate::value::Value;

/// Native function over evaluated arguments.
pub type BuiltinFn = dyn Fn(&mut dyn Executor, &Args) -> EvalResult;

/// Native function over unevaluated arguments.
pub type SpecialFn = dyn Fn(&mut dyn Executor, &SpecialArgs) -> EvalResult;

/// A callable value.
#[derive(Clone)]
pub enum Function {
    Builtin(Heap<Builtin>),
    Special(Heap<Special>),
    Closure(Heap<Closure>),
}

pub struct Builtin {
    pub name: Symbol,
    func: Box<BuiltinFn>,
}

impl Builtin {
    pub fn call(&self, exec: &mut dyn Executor, args: &Args) -> EvalResult {
        (self.func)(exec, args)
    }
}

pub struct Special {
    pub name: Symbol,
    func: Box<SpecialFn>,
}

impl Special {
    pub fn call(&self, exec: &mut dyn Executor, args: &SpecialArgs) -> EvalResult {
        (self.func)(exec, args)
    }
}

/// A function defined in the language.
#[derive(Debug)]
pub struct Closure {
    pub params: Vec<Param>,
    pub body: Expr,
    /// The scope the function was created in; calls get a child of it.
    pub env: Env,
}

/// A formal parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Symbol,
    pub default: Option<Expr>,
}

impl Function {
    pub fn builtin(
        name: &str,
        func: impl Fn(&mut dyn Executor, &Args) -> EvalResult + 'static,
    ) -> Self {
        Function::Builtin(Heap::new(Builtin {
            name: Symbol::new(name),
            func: Box::new(func),
        }))
    }

    pub fn special(
        name: &str,
        func: impl Fn(&mut dyn Executor, &SpecialArgs) -> EvalResult + 'static,
    ) -> Self {
        Function::Special(Heap::new(Special {
            name: Symbol::new(name),
            func: Box::new(func),
        }))
    }

    pub fn closure(params: Vec<Param>, body: Expr, env: Env) -> Self {
        Function::Closure(Heap::new(Closure { params, body, env }))
    }

    /// The registered name of a native function.
    pub fn name(&self) -> Option<&Symbol> {
        match self {
            Function::Builtin(b) => Some(&b.name),
            Function::Special(s) => Some(&s.name),
            Function::Closure(_) => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Function::Builtin(_) => "builtin",
            Function::Special(_) => "special",
            Function::Closure(_) => "closure",
        }
    }

    /// Whether both handles are the same function object.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        match (self, other) {
            (Function::Builtin(a), Function::Builtin(b)) => Heap::ptr_eq(a, b),
            (Function::Special(a), Function::Special(b)) => Heap::ptr_eq(a, b),
            (Function::Closure(a), Function::Closure(b)) => Heap::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Builtin(b) => write!(f, "Builtin({})", b.name),
            Function::Special(s) => write!(f, "Special({})", s.name),
            Function::Closure(c) => f
                .debug_struct("Closure")
                .field("params", &c.params)
                .field("body", &format_args!("{}", c.body))
                .finish_non_exhaustive(),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Builtin(b) => write!(f, "<builtin {}>", b.name),
            Function::Special(s) => write!(f, "<special {}>", s.name),
            Function::Closure(c) => {
                let mut args: Vec<Arg> = c
                    .params
                    .iter()
                    .map(|p| {
                        let default = p.default.clone().unwrap_or_else(Expr::missing);
                        Named::named(p.name.clone(), default)
                    })
                    .collect();
                args.push(Named::positional(c.body.clone()));
                write!(f, "{}", Expr::call(Expr::symbol("function"), args))
            }
        }
    }
}

/// Evaluated arguments passed to a builtin.
#[derive(Debug)]
pub struct Args {
    values: Vec<Named<Value>>,
    env: Env,
}

impl Args {
    pub fn new(values: Vec<Named<Value>>, env: Env) -> Self {
        Args { values, env }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Named<Value>> {
        self.values.iter()
    }

    pub fn values(&self) -> &[Named<Value>] {
        &self.values
    }

    /// The caller's scope.
    pub fn env(&self) -> &Env {
        &self.env
    }

    /// The `index`-th unnamed argument.
    pub fn positional(&self, index: usize) -> Option<&Value> {
        self.values
            .iter()
            .filter(|a| a.name.is_none())
            .nth(index)
            .map(|a| &a.value)
    }

    pub fn named(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|a| a.has_name(name))
            .map(|a| &a.value)
    }

    /// The argument for formal `name` of a function taking `formals`.
    ///
    /// Named arguments claim their formals first; the formals left over
    /// take the unnamed arguments in order.
    ///
    /// ```text
    /// // eval_tidy(expr = q, df)
    /// args.get(&["expr", "data", "env"], "data")   // df
    /// ```
    pub fn get(&self, formals: &[&str], name: &str) -> Option<&Value> {
        if let Some(value) = self.named(name) {
            return Some(value);
        }
        let index = unclaimed_position(formals, name, |formal| self.named(formal).is_some())?;
        self.positional(index)
    }

    /// Like `get`, but an absent argument is an error.
    pub fn required(&self, formals: &[&str], name: &str) -> Result<&Value, EvalError> {
        self.get(formals, name).ok_or_else(|| missing_argument(name))
    }

    pub fn expect_count(&self, fn_name: &str, expected: usize) -> Result<(), EvalError> {
        if self.values.len() == expected {
            Ok(())
        } else {
            Err(arity_mismatch(fn_name, expected, self.values.len()))
        }
    }
}

impl<'a> IntoIterator for &'a Args {
    type Item = &'a Named<Value>;
    type IntoIter = std::slice::Iter<'a, Named<Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Where `name` falls among the formals not already matched by name.
fn unclaimed_position(
    formals: &[&str],
    name: &str,
    claimed: impl Fn(&str) -> bool,
) -> Option<usize> {
    formals
        .iter()
        .filter(|formal| !claimed(**formal))
        .position(|formal| *formal == name)
}

/// Unevaluated arguments passed to a special, with the caller's context.
#[derive(Debug)]
pub struct SpecialArgs {
    args: Vec<Arg>,
    env: Env,
    layers: Layers,
}

impl SpecialArgs {
    pub fn new(args: Vec<Arg>, env: Env, layers: Layers) -> Self {
        SpecialArgs { args, env, layers }
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// The caller's scope.
    pub fn env(&self) -> &Env {
        &self.env
    }

    /// The layers active at the call site.
    pub fn layers(&self) -> &Layers {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// The argument for formal `name`, matched like `Args::get`.
    pub fn get(&self, formals: &[&str], name: &str) -> Option<&Expr> {
        let named = |formal: &str| self.args.iter().find(|a| a.has_name(formal));
        if let Some(arg) = named(name) {
            return Some(&arg.value);
        }
        let index = unclaimed_position(formals, name, |formal| named(formal).is_some())?;
        self.args
            .iter()
            .filter(|a| a.name.is_none())
            .nth(index)
            .map(|a| &a.value)
    }

    /// The `index`-th argument, required.
    pub fn expr(&self, fn_name: &str, index: usize) -> Result<&Expr, EvalError> {
        self.args
            .get(index)
            .map(|a| &a.value)
            .ok_or_else(|| arity_mismatch(fn_name, index + 1, self.args.len()))
    }

    /// The `index`-th argument as an unforced promise in the caller's context.
    pub fn promise(&self, index: usize) -> Option<Promise> {
        self.args.get(index).map(|a| {
            Promise::new(a.value.clone(), self.env.clone(), self.layers.clone())
        })
    }

    pub fn expect_count(&self, fn_name: &str, expected: usize) -> Result<(), EvalError> {
        if self.args.len() == expected {
            Ok(())
        } else {
            Err(arity_mismatch(fn_name, expected, self.args.len()))
        }
    }
}
