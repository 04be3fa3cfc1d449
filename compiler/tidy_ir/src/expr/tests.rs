use pretty_assertions::assert_eq;

use super::*;
use crate::env::Env;

fn sym(name: &str) -> Expr {
    Expr::symbol(name)
}

fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::call2(name, args)
}

#[test]
fn test_deparse_infix() {
    assert_eq!(call("+", vec![sym("x"), sym("y")]).to_string(), "x + y");
    assert_eq!(
        call("*", vec![call("+", vec![sym("a"), sym("b")]), sym("c")]).to_string(),
        "(a + b) * c"
    );
    assert_eq!(
        call("-", vec![sym("a"), call("-", vec![sym("b"), sym("c")])]).to_string(),
        "a - (b - c)"
    );
    assert_eq!(
        call("-", vec![call("-", vec![sym("a"), sym("b")]), sym("c")]).to_string(),
        "a - b - c"
    );
}

#[test]
fn test_deparse_power_and_negation() {
    let two = || Expr::double(2.0);
    let neg_pow = call("-", vec![call("^", vec![two(), two()])]);
    assert_eq!(neg_pow.to_string(), "-2^2");
    let pow_neg = call("^", vec![call("-", vec![two()]), two()]);
    assert_eq!(pow_neg.to_string(), "(-2)^2");
    let right = call("^", vec![sym("a"), call("^", vec![sym("b"), sym("c")])]);
    assert_eq!(right.to_string(), "a^b^c");
}

#[test]
fn test_deparse_plain_call_with_named_args() {
    let expr = Expr::call(
        sym("f"),
        vec![
            Named::positional(sym("x")),
            Named::named("by", Expr::string("g")),
        ],
    );
    assert_eq!(expr.to_string(), r#"f(x, by = "g")"#);
}

#[test]
fn test_deparse_unquote_and_pronouns() {
    let bang = call("!!", vec![sym("x")]);
    assert_eq!(call("+", vec![bang, Expr::double(1.0)]).to_string(), "!!x + 1");
    let dollar = call("$", vec![sym(".data"), sym("x")]);
    assert_eq!(dollar.to_string(), ".data$x");
    let index = call("[[", vec![sym(".env"), Expr::string("x")]);
    assert_eq!(index.to_string(), r#".env[["x"]]"#);
}

#[test]
fn test_deparse_forms() {
    let block = call("{", vec![sym("a"), sym("b")]);
    assert_eq!(block.to_string(), "{ a; b }");
    let branch = call("if", vec![sym("c"), sym("a"), sym("b")]);
    assert_eq!(branch.to_string(), "if (c) a else b");
    let function = Expr::call(
        sym("function"),
        vec![
            Named::named("x", Expr::missing()),
            Named::named("y", Expr::double(1.0)),
            Named::positional(call("+", vec![sym("x"), sym("y")])),
        ],
    );
    assert_eq!(function.to_string(), "function(x, y = 1) x + y");
}

#[test]
fn test_deparse_backticks_non_syntactic_names() {
    assert_eq!(sym("my var").to_string(), "`my var`");
    assert_eq!(
        Expr::call(sym("+"), vec![Named::positional(sym("x"))]).to_string(),
        "+x"
    );
    assert_eq!(call("foo", vec![]).to_string(), "foo()");
}

#[test]
fn test_deparse_literals() {
    assert_eq!(Expr::double(1.0).to_string(), "1");
    assert_eq!(Expr::double(0.25).to_string(), "0.25");
    assert_eq!(Expr::int(-3).to_string(), "-3L");
    assert_eq!(Expr::bool(true).to_string(), "TRUE");
    assert_eq!(Expr::null().to_string(), "NULL");
    assert_eq!(Expr::string("a\"b").to_string(), r#""a\"b""#);
}

#[test]
fn test_deparse_quosure_leaf() {
    let q = Quosure::new(call("+", vec![sym("x"), sym("y")]), Env::new());
    let expr = call("*", vec![Expr::quosure(q), Expr::int(2)]);
    assert_eq!(expr.to_string(), "^(x + y) * 2L");
}

#[test]
fn test_structural_equality() {
    let a = call("+", vec![sym("x"), Expr::int(1)]);
    let b = call("+", vec![sym("x"), Expr::int(1)]);
    assert_eq!(a, b);
    assert_ne!(a, call("+", vec![sym("x"), Expr::int(2)]));
    assert_ne!(Expr::int(1), Expr::double(1.0));
}

#[test]
fn test_unquote_recognition() {
    let bang = call("!!", vec![sym("x")]);
    assert_eq!(bang.unquote_operand(), Some(&sym("x")));
    assert_eq!(bang.unquote_splice_operand(), None);
    let splat = call("!!!", vec![sym("xs")]);
    assert_eq!(splat.unquote_splice_operand(), Some(&sym("xs")));
    assert_eq!(splat.as_call().and_then(Call::unquote_operator), Some("!!!"));
    assert_eq!(sym("x").unquote_operand(), None);
}

#[test]
fn test_contains_symbols() {
    assert!(!Expr::int(1).contains_symbols());
    assert!(call("f", vec![]).contains_symbols());
    let q = Quosure::new(Expr::int(1), Env::new());
    assert!(!Expr::quosure(q).contains_symbols());
}
