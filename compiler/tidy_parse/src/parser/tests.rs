use pretty_assertions::assert_eq;

use super::*;

fn sym(name: &str) -> Expr {
    Expr::symbol(name)
}

/// Parse, then print back.
fn roundtrip(source: &str) -> String {
    parse_expr(source).unwrap().to_string()
}

#[test]
fn test_arithmetic_tree() {
    assert_eq!(
        parse_expr("x + y * 2").unwrap(),
        Expr::call2(
            "+",
            vec![
                sym("x"),
                Expr::call2("*", vec![sym("y"), Expr::double(2.0)])
            ]
        )
    );
}

#[test]
fn test_precedence() {
    assert_eq!(roundtrip("(a + b) * c"), "(a + b) * c");
    assert_eq!(roundtrip("a - b - c"), "a - b - c");
    assert_eq!(roundtrip("a - (b - c)"), "a - (b - c)");
    assert_eq!(roundtrip("-2^2"), "-2^2");
    assert_eq!(roundtrip("(-2)^2"), "(-2)^2");
    assert_eq!(roundtrip("2^-1"), "2^-1");
    assert_eq!(roundtrip("a^b^c"), "a^b^c");
    assert_eq!(roundtrip("!a == b"), "!a == b");
    assert_eq!(roundtrip("a < b & c | d"), "a < b & c | d");
}

#[test]
fn test_not_binds_looser_than_comparison() {
    assert_eq!(
        parse_expr("!a == b").unwrap(),
        Expr::call2("!", vec![Expr::call2("==", vec![sym("a"), sym("b")])])
    );
}

#[test]
fn test_power_is_right_associative() {
    assert_eq!(
        parse_expr("a^b^c").unwrap(),
        Expr::call2("^", vec![sym("a"), Expr::call2("^", vec![sym("b"), sym("c")])])
    );
}

#[test]
fn test_calls_with_named_and_missing_args() {
    let expr = parse_expr(r#"f(x, by = "g", )"#).unwrap();
    assert_eq!(
        expr,
        Expr::call(
            sym("f"),
            vec![
                Named::positional(sym("x")),
                Named::named("by", Expr::string("g")),
                Named::positional(Expr::missing()),
            ]
        )
    );
    assert_eq!(roundtrip("f()"), "f()");
    assert_eq!(roundtrip("f(g(1))(2)"), "f(g(1))(2)");
}

#[test]
fn test_literals() {
    assert_eq!(parse_expr("5L").unwrap(), Expr::int(5));
    assert_eq!(parse_expr("5").unwrap(), Expr::double(5.0));
    assert_eq!(parse_expr("TRUE").unwrap(), Expr::bool(true));
    assert_eq!(parse_expr("NULL").unwrap(), Expr::null());
    assert_eq!(parse_expr("'hi'").unwrap(), Expr::string("hi"));
}

#[test]
fn test_pronouns_and_accessors() {
    assert_eq!(
        parse_expr(".data$x").unwrap(),
        Expr::call2("$", vec![sym(".data"), sym("x")])
    );
    assert_eq!(roundtrip(r#".env[["x"]]"#), r#".env[["x"]]"#);
    assert_eq!(roundtrip("a$b$c"), "a$b$c");
    assert_eq!(roundtrip("`my var` + 1"), "`my var` + 1");
}

#[test]
fn test_unquote_operators() {
    assert_eq!(
        parse_expr("!!x + 1").unwrap(),
        Expr::call2(
            "+",
            vec![Expr::call2("!!", vec![sym("x")]), Expr::double(1.0)]
        )
    );
    assert_eq!(
        parse_expr("f(!!!args)").unwrap(),
        Expr::call2("f", vec![Expr::call2("!!!", vec![sym("args")])])
    );
    assert_eq!(roundtrip("!!f(x)"), "!!f(x)");
}

#[test]
fn test_assignment() {
    assert_eq!(
        parse_expr("x <- y <- 1").unwrap(),
        Expr::call2(
            "<-",
            vec![sym("x"), Expr::call2("<-", vec![sym("y"), Expr::double(1.0)])]
        )
    );
    assert_eq!(roundtrip("x = 2"), "x = 2");
    let err = parse_expr("1 <- x").unwrap_err();
    assert!(matches!(err, ParseError::InvalidAssignTarget { .. }));
}

#[test]
fn test_function_definition() {
    let expr = parse_expr("function(x, y = 1) x + y").unwrap();
    assert_eq!(
        expr,
        Expr::call(
            sym("function"),
            vec![
                Named::named("x", Expr::missing()),
                Named::named("y", Expr::double(1.0)),
                Named::positional(Expr::call2("+", vec![sym("x"), sym("y")])),
            ]
        )
    );
    assert_eq!(expr.to_string(), "function(x, y = 1) x + y");
    assert_eq!(roundtrip("function() NULL"), "function() NULL");
}

#[test]
fn test_invalid_parameter() {
    let err = parse_expr("function(1) x").unwrap_err();
    assert_eq!(err, ParseError::InvalidParameter { span: Span::new(9, 10) });
}

#[test]
fn test_block_and_if() {
    assert_eq!(roundtrip("{ a; b }"), "{ a; b }");
    assert_eq!(roundtrip("{\n  a\n\n  b\n}"), "{ a; b }");
    assert_eq!(roundtrip("{}"), "{}");
    assert_eq!(roundtrip("if (c) a else b"), "if (c) a else b");
    assert_eq!(roundtrip("if (c) a"), "if (c) a");
}

#[test]
fn test_newlines_inside_parentheses_are_whitespace() {
    assert_eq!(roundtrip("f(\n  x,\n  y\n)"), "f(x, y)");
    assert_eq!(roundtrip("(a\n+ b)"), "a + b");
    assert_eq!(roundtrip("a +\n b"), "a + b");
}

#[test]
fn test_else_on_next_line_inside_block() {
    assert_eq!(
        roundtrip("{\n  if (c) a\n  else b\n}"),
        "{ if (c) a else b }"
    );
}

#[test]
fn test_program_statements() {
    let program = parse_program("x <- 1\ny <- 2; x + y\n# done\n").unwrap();
    assert_eq!(program.len(), 3);
    assert_eq!(program[2].to_string(), "x + y");
    assert_eq!(parse_program("").unwrap(), Vec::<Expr>::new());
}

#[test]
fn test_newline_ends_statement() {
    let program = parse_program("a\n-b").unwrap();
    assert_eq!(program, vec![sym("a"), Expr::call2("-", vec![sym("b")])]);
}

#[test]
fn test_errors() {
    assert_eq!(
        parse_expr("x +").unwrap_err(),
        ParseError::UnexpectedEof {
            expected: "an expression"
        }
    );
    assert!(matches!(
        parse_expr("f(x").unwrap_err(),
        ParseError::UnexpectedEof { .. }
    ));
    assert!(matches!(
        parse_expr("a b").unwrap_err(),
        ParseError::Unexpected { .. }
    ));
    assert!(matches!(
        parse_expr("{ a b }").unwrap_err(),
        ParseError::Unexpected { .. }
    ));
    assert!(parse_expr("").is_err());
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let depth = 5_000;
    let source = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(parse_expr(&source).unwrap(), sym("x"));
}
