use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use tidy_ir::{
    splice, DataMask, Env, EvalErrorKind, EvalResult, Expr, Function, Position, Quosure, Symbol,
    Table, Value,
};
use tidy_parse::{parse_expr, parse_program};

use super::Evaluator;
use crate::base_env;
use crate::config::EvaluatorBuilder;

fn run_in(eval: &mut Evaluator, env: &Env, src: &str) -> EvalResult {
    let mut last = Value::Null;
    for expr in parse_program(src).unwrap() {
        last = eval.eval_bare(&expr, env)?;
    }
    Ok(last)
}

fn run(src: &str) -> EvalResult {
    run_in(&mut Evaluator::new(), &base_env().child(), src)
}

fn layered(src: &str, env: &Env, mask: Option<&DataMask>) -> EvalResult {
    let thunk = Quosure::new(parse_expr(src).unwrap(), env.clone());
    Evaluator::new().eval_layered(&thunk, mask)
}

fn mask(columns: Vec<(&str, Value)>) -> DataMask {
    Table::new(columns.into_iter().map(|(name, col)| (Symbol::new(name), col)))
        .unwrap()
        .to_mask()
}

// Bare evaluation

#[test]
fn test_literals_evaluate_to_themselves() {
    let env = Env::new();
    let mut eval = Evaluator::new();
    assert_eq!(eval.eval_bare(&Expr::int(3), &env).unwrap(), Value::int(3));
    assert_eq!(eval.eval_bare(&Expr::string("a"), &env).unwrap(), Value::string("a"));
    assert_eq!(eval.eval_bare(&Expr::null(), &env).unwrap(), Value::Null);
}

#[test]
fn test_symbol_lookup_walks_the_chain() {
    let parent = Env::new();
    parent.define("x", Value::int(1));
    let child = parent.child();
    let mut eval = Evaluator::new();
    assert_eq!(eval.eval_bare(&Expr::symbol("x"), &child).unwrap(), Value::int(1));
}

#[test]
fn test_undefined_symbol_is_name_error() {
    let err = run("nope + 1").unwrap_err();
    assert!(err.is_name_error());
    assert_eq!(err.message, "object 'nope' not found");
}

#[test]
fn test_calling_a_non_function() {
    let err = run("x <- 1\nx(2)").unwrap_err();
    assert!(err.is_type_error());
    assert_eq!(err.message, "attempt to apply non-function: `x` is double");
}

#[test]
fn test_operators_are_looked_up_by_name() {
    let result = run(
        "f <- function() {
            `+` <- function(a, b) a * b
            3 + 4
        }
        f()",
    )
    .unwrap();
    assert_eq!(result, Value::double(12.0));
    // The prelude's `+` is untouched outside `f`.
    assert_eq!(run("3 + 4").unwrap(), Value::double(7.0));
}

#[test]
fn test_bare_mode_has_no_pronouns() {
    let err = run(".data$x").unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedVariable {
            name: ".data".into()
        }
    );
}

#[test]
fn test_unquote_outside_quasiquotation() {
    let err = run("x <- 1\n!!x").unwrap_err();
    assert!(err.is_type_error());
    assert_eq!(
        err.message,
        "`!!` can only be used within a quasiquoted argument"
    );
}

#[test]
fn test_dynamic_dots_in_builtins() {
    assert_eq!(
        run("xs <- list(1, 2)\nc(0, !!!xs, 3)").unwrap(),
        Value::doubles(vec![0.0, 1.0, 2.0, 3.0])
    );
    assert_eq!(run("sum(!!!c(1L, 2L, 3L))").unwrap(), Value::int(6));
    assert_eq!(run("c(!!!NULL)").unwrap(), Value::Null);
}

// Closures

#[test]
fn test_arguments_are_lazy() {
    let result = run("f <- function(x, y) x\nf(1, stop(\"never forced\"))").unwrap();
    assert_eq!(result, Value::double(1.0));
}

#[test]
fn test_defaults_see_other_parameters() {
    assert_eq!(
        run("f <- function(x, y = x * 2) y\nf(5)").unwrap(),
        Value::double(10.0)
    );
    assert_eq!(
        run("f <- function(x, y = x * 2) y\nf(5, y = 1)").unwrap(),
        Value::double(1.0)
    );
}

#[test]
fn test_missing_parameter() {
    let err = run("f <- function(x) x\nf()").unwrap_err();
    assert!(err.is_name_error());
    assert_eq!(err.message, "argument 'x' is missing, with no default");
}

#[test]
fn test_closures_capture_their_defining_scope() {
    let result = run(
        "make_adder <- function(n) function(x) x + n
        add2 <- make_adder(2)
        n <- 100
        add2(1)",
    )
    .unwrap();
    assert_eq!(result, Value::double(3.0));
}

#[test]
fn test_arguments_are_forced_once() {
    let count = Rc::new(Cell::new(0));
    let env = base_env().child();
    let counter = Rc::clone(&count);
    env.define(
        "tick",
        Value::function(Function::builtin("tick", move |_, _| {
            counter.set(counter.get() + 1);
            Ok(Value::int(counter.get()))
        })),
    );
    let result = run_in(
        &mut Evaluator::new(),
        &env,
        "twice <- function(x) c(x, x)\ntwice(tick())",
    )
    .unwrap();
    assert_eq!(result, Value::ints(vec![1, 1]));
    assert_eq!(count.get(), 1);
}

#[test]
fn test_self_referential_default_is_a_promise_cycle() {
    let err = run("f <- function(x = x) x\nf()").unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::PromiseCycle { expr: "x".into() });
}

#[test]
fn test_closure_arity_error_names_the_call() {
    let err = run("add <- function(a, b) a + b\nadd(1, 2, 3)").unwrap_err();
    assert_eq!(err.message, "add expects 2 arguments, got 3");
}

#[test]
fn test_errors_from_callables_propagate_unchanged() {
    let err = run("f <- function() stop(\"bad input: \", 3L)\nf()").unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::Custom {
            message: "bad input: 3".into()
        }
    );
}

#[test]
fn test_recursion_limit() {
    let mut eval = EvaluatorBuilder::new().max_depth(200).build();
    let env = base_env().child();
    let err = run_in(&mut eval, &env, "f <- function(n) f(n + 1)\nf(0)").unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::RecursionLimit { depth: 200 });
    assert_eq!(eval.depth(), 0);
}

#[test]
fn test_deep_recursion_within_limit() {
    let result = run("f <- function(n) if (n == 0) \"done\" else f(n - 1)\nf(500)").unwrap();
    assert_eq!(result, Value::string("done"));
}

// Layered evaluation

#[test]
fn test_mask_is_searched_before_scope() {
    let env = base_env().child();
    env.define("x", Value::double(100.0));
    let mask = mask(vec![("y", Value::doubles(vec![1.0, 2.0, 3.0]))]);
    assert_eq!(
        layered("x * y", &env, Some(&mask)).unwrap(),
        Value::doubles(vec![100.0, 200.0, 300.0])
    );
}

#[test]
fn test_mask_shadows_scope() {
    let env = base_env().child();
    env.define("x", Value::int(2));
    let mask = mask(vec![("x", Value::int(1))]);
    assert_eq!(layered("x", &env, Some(&mask)).unwrap(), Value::int(1));
    assert_eq!(layered(".env$x", &env, Some(&mask)).unwrap(), Value::int(2));
    assert_eq!(layered(".data$x", &env, Some(&mask)).unwrap(), Value::int(1));
}

#[test]
fn test_data_pronoun_does_not_fall_through() {
    let env = base_env().child();
    env.define("k", Value::int(1));
    let mask = mask(vec![("y", Value::int(1))]);
    let err = layered(".data$k", &env, Some(&mask)).unwrap_err();
    assert!(err.is_name_error());
    assert_eq!(err.message, "'k' not found in the data mask (.data)");

    let err = layered(".data$k", &env, None).unwrap_err();
    assert!(err.is_name_error());
}

#[test]
fn test_env_pronoun_does_not_see_the_mask() {
    let env = base_env().child();
    let mask = mask(vec![("y", Value::int(1))]);
    let err = layered(".env$y", &env, Some(&mask)).unwrap_err();
    assert_eq!(err.message, "'y' not found in the environment (.env)");
}

#[test]
fn test_pronoun_index_is_evaluated() {
    let env = base_env().child();
    env.define("col", Value::string("y"));
    let mask = mask(vec![("y", Value::ints(vec![4, 5]))]);
    assert_eq!(
        layered(".data[[col]]", &env, Some(&mask)).unwrap(),
        Value::ints(vec![4, 5])
    );
    let err = layered(".data[[1]]", &env, Some(&mask)).unwrap_err();
    assert!(err.is_type_error());
}

#[test]
fn test_bare_pronoun_is_misused() {
    let env = base_env().child();
    let err = layered("length(.data)", &env, None).unwrap_err();
    assert!(err.is_type_error());
    assert_eq!(err.message, "`.data` can only be used with `$` or `[[`");
}

#[test]
fn test_call_heads_resolve_through_the_mask() {
    let env = base_env().child();
    let mask = mask(vec![("sum", Value::int(1))]);
    let err = layered("sum(1, 2)", &env, Some(&mask)).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::NotCallable {
            callee: "sum".into(),
            type_name: "integer".into()
        }
    );
}

#[test]
fn test_spliced_quosure_keeps_its_scope_and_sees_the_mask() {
    let inner_env = base_env().child();
    inner_env.define("x", Value::int(1));
    let inner = Quosure::new(parse_expr("x + z").unwrap(), inner_env);

    let outer_env = base_env().child();
    outer_env.define("x", Value::int(1000));
    let template = parse_expr("PLACEHOLDER * 2L").unwrap();
    let tree = splice(&template, &Position::arg(0), inner).unwrap();
    let thunk = Quosure::new(tree, outer_env);

    let mask = mask(vec![("z", Value::int(10))]);
    assert_eq!(
        Evaluator::new().eval_layered(&thunk, Some(&mask)).unwrap(),
        Value::int(22)
    );
}

#[test]
fn test_closure_bodies_ignore_the_mask() {
    let env = base_env().child();
    run_in(&mut Evaluator::new(), &env, "get_y <- function() y\ny <- 0L").unwrap();
    let mask = mask(vec![("y", Value::int(5))]);
    assert_eq!(layered("get_y()", &env, Some(&mask)).unwrap(), Value::int(0));
    // Arguments, however, are written at the call site under the mask.
    run_in(&mut Evaluator::new(), &env, "id <- function(v) v").unwrap();
    assert_eq!(layered("id(y)", &env, Some(&mask)).unwrap(), Value::int(5));
}

#[test]
fn test_evaluation_does_not_mutate_the_thunk() {
    let env = base_env().child();
    env.define("x", Value::int(4));
    let thunk = Quosure::new(parse_expr("x * 2L").unwrap(), env.clone());
    let before = thunk.clone();
    let mut eval = Evaluator::new();
    let first = eval.eval_layered(&thunk, None).unwrap();
    let second = eval.eval_layered(&thunk, None).unwrap();
    assert_eq!(first, second);
    assert_eq!(thunk, before);
    assert_eq!(env.names(), vec![Symbol::new("x")]);
}
