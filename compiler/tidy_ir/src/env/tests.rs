use pretty_assertions::assert_eq;

use super::*;
use crate::errors::{EvalErrorKind, EvalResult};
use crate::executor::Executor;
use crate::mask::{DataMask, Layers};

/// Evaluates literals and plain symbols only, counting evaluations.
#[derive(Default)]
struct Literals {
    evaluations: usize,
}

impl Executor for Literals {
    fn eval_in(&mut self, expr: &Expr, env: &Env, _layers: &Layers) -> EvalResult {
        self.evaluations += 1;
        match expr {
            Expr::Literal(lit) => Ok(lit.to_value()),
            Expr::Symbol(s) => env
                .get(s.as_str())
                .ok_or_else(|| undefined_variable(s.as_str())),
            _ => Err(EvalError::new("unsupported")),
        }
    }

    fn eval_quosure(&mut self, quosure: &Quosure, _mask: Option<&DataMask>) -> EvalResult {
        self.eval_in(quosure.expr(), quosure.env(), &Layers::Bare)
    }

    fn interpolate(
        &mut self,
        expr: &Expr,
        _env: &Env,
        _layers: &Layers,
    ) -> Result<Expr, EvalError> {
        Ok(expr.clone())
    }
}

#[test]
fn test_define_and_lookup() {
    let env = Env::new();
    env.define("x", Value::int(1));
    assert_eq!(env.get("x"), Some(Value::int(1)));
    assert_eq!(env.get("y"), None);
}

#[test]
fn test_lookup_walks_parents() {
    let global = Env::new();
    global.define("x", Value::int(1));
    let child = global.child();
    assert_eq!(child.get("x"), Some(Value::int(1)));
    assert!(child.lookup_local("x").is_none());
    assert_eq!(child.depth(), 1);
}

#[test]
fn test_child_shadows_parent() {
    let global = Env::new();
    global.define("x", Value::int(1));
    let child = global.child();
    child.define("x", Value::int(2));
    assert_eq!(child.get("x"), Some(Value::int(2)));
    assert_eq!(global.get("x"), Some(Value::int(1)));
}

#[test]
fn test_parent_mutation_visible_to_child() {
    let global = Env::new();
    let child = global.child();
    global.define("late", Value::bool(true));
    assert_eq!(child.get("late"), Some(Value::bool(true)));
}

#[test]
fn test_assign_updates_nearest_binding() {
    let global = Env::new();
    global.define("x", Value::int(1));
    let child = global.child();
    child.assign("x", Value::int(2));
    assert_eq!(global.get("x"), Some(Value::int(2)));
    assert!(child.lookup_local("x").is_none());

    child.assign("fresh", Value::int(3));
    assert!(child.lookup_local("fresh").is_some());
    assert!(!global.contains("fresh"));
}

#[test]
fn test_identity() {
    let a = Env::new();
    let b = a.clone();
    assert!(a.ptr_eq(&b));
    assert!(!a.ptr_eq(&Env::new()));
    assert!(a.child().parent().is_some_and(|p| p.ptr_eq(&a)));
}

#[test]
fn test_names_are_sorted() {
    let env = Env::new();
    env.define("b", Value::Null);
    env.define("a", Value::Null);
    assert_eq!(env.names(), vec![Symbol::new("a"), Symbol::new("b")]);
}

#[test]
fn test_promise_forces_once() {
    let caller = Env::new();
    caller.define("x", Value::int(5));
    let promise = Promise::new(Expr::symbol("x"), caller, Layers::Bare);
    let mut exec = Literals::default();
    assert_eq!(promise.value(), None);
    assert_eq!(promise.force(&mut exec), Ok(Value::int(5)));
    assert_eq!(promise.force(&mut exec), Ok(Value::int(5)));
    assert_eq!(exec.evaluations, 1);
    assert_eq!(promise.value(), Some(Value::int(5)));
}

#[test]
fn test_failed_promise_stays_pending() {
    let caller = Env::new();
    let promise = Promise::new(Expr::symbol("nope"), caller.clone(), Layers::Bare);
    let mut exec = Literals::default();
    assert!(promise.force(&mut exec).is_err());
    caller.define("nope", Value::int(1));
    assert_eq!(promise.force(&mut exec), Ok(Value::int(1)));
}

#[test]
fn test_capture_argument_from_promise() {
    let caller = Env::new();
    let expr = Expr::call2("+", vec![Expr::symbol("a"), Expr::int(1)]);
    let callee = Env::new();
    callee.bind(
        "arg",
        Binding::Promise(Promise::new(expr.clone(), caller.clone(), Layers::Bare)),
    );
    let quosure = callee.capture_argument(&Symbol::new("arg"));
    let quosure = quosure.unwrap();
    assert_eq!(quosure.expr(), &expr);
    assert!(quosure.env().ptr_eq(&caller));
}

#[test]
fn test_capture_argument_does_not_rewrap_quosures() {
    let inner = Quosure::new(Expr::symbol("z"), Env::new());
    let callee = Env::new();
    callee.bind(
        "arg",
        Binding::Promise(Promise::new(
            Expr::Quosure(inner.clone()),
            Env::new(),
            Layers::Bare,
        )),
    );
    assert_eq!(callee.capture_argument(&Symbol::new("arg")), Ok(inner));
}

#[test]
fn test_capture_argument_missing_and_errors() {
    let callee = Env::new();
    callee.bind("empty", Binding::Missing);
    callee.define("forced", Value::int(1));
    let missing = callee.capture_argument(&Symbol::new("empty")).unwrap();
    assert!(missing.expr().is_missing());

    let err = callee.capture_argument(&Symbol::new("forced")).unwrap_err();
    assert!(err.is_type_error());
    let err = callee.capture_argument(&Symbol::new("absent")).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::UndefinedVariable { .. }));
}
