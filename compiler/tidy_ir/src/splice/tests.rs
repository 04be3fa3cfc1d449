use pretty_assertions::assert_eq;

use super::*;
use crate::env::Env;
use crate::errors::EvalErrorKind;

fn plus(lhs: Expr, rhs: Expr) -> Expr {
    Expr::call2("+", vec![lhs, rhs])
}

#[test]
fn test_splice_one_at_argument() {
    let tree = plus(Expr::symbol("a"), Expr::symbol("b"));
    let out = splice(&tree, &Position::arg(1), Expr::int(2)).unwrap();
    assert_eq!(out, plus(Expr::symbol("a"), Expr::int(2)));
    // input untouched
    assert_eq!(tree, plus(Expr::symbol("a"), Expr::symbol("b")));
}

#[test]
fn test_splice_at_root_replaces_tree() {
    let tree = Expr::symbol("a");
    let out = splice(&tree, &Position::root(), Expr::int(1)).unwrap();
    assert_eq!(out, Expr::int(1));
}

#[test]
fn test_splice_head() {
    let tree = plus(Expr::int(1), Expr::int(2));
    let out = splice(&tree, &Position::head(), Symbol::new("*")).unwrap();
    assert_eq!(out, Expr::call2("*", vec![Expr::int(1), Expr::int(2)]));
}

#[test]
fn test_splice_nested_path_shares_siblings() {
    let left = Expr::call2("f", vec![Expr::symbol("x")]);
    let tree = plus(left.clone(), Expr::symbol("y"));
    let position = Position::arg(1).then(Slot::Arg(0));
    let err = splice(&tree, &position, Expr::int(0)).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::InvalidSplicePosition { .. }));

    let position = Position::arg(0).then(Slot::Arg(0));
    let out = splice(&tree, &position, Expr::int(0)).unwrap();
    assert_eq!(
        out,
        plus(Expr::call2("f", vec![Expr::int(0)]), Expr::symbol("y"))
    );
}

#[test]
fn test_splice_quosures_keep_their_scopes() {
    let e1 = Env::new();
    let e2 = Env::new();
    let t1 = Quosure::new(Expr::symbol("x"), e1.clone());
    let t2 = Quosure::new(Expr::symbol("x"), e2.clone());
    let template = plus(Expr::missing(), Expr::missing());
    let step = splice(&template, &Position::arg(0), t1).unwrap();
    let tree = splice(&step, &Position::arg(1), t2).unwrap();

    let call = tree.as_call().unwrap();
    let lhs = call.args[0].value.as_quosure().unwrap();
    let rhs = call.args[1].value.as_quosure().unwrap();
    assert!(lhs.env().ptr_eq(&e1));
    assert!(rhs.env().ptr_eq(&e2));
}

#[test]
fn test_splice_many_replaces_one_argument() {
    let tree = Expr::call2("f", vec![Expr::int(0), Expr::missing(), Expr::int(9)]);
    let out = splice(
        &tree,
        &Position::arg(1),
        vec![Expr::int(1), Expr::int(2), Expr::int(3)],
    )
    .unwrap();
    assert_eq!(
        out,
        Expr::call2(
            "f",
            vec![
                Expr::int(0),
                Expr::int(1),
                Expr::int(2),
                Expr::int(3),
                Expr::int(9)
            ]
        )
    );
}

#[test]
fn test_splice_many_empty_removes_argument() {
    let tree = Expr::call2("f", vec![Expr::int(0), Expr::missing()]);
    let out = splice(&tree, &Position::arg(1), Vec::<Expr>::new()).unwrap();
    assert_eq!(out, Expr::call2("f", vec![Expr::int(0)]));
}

#[test]
fn test_splice_many_at_scalar_position_fails() {
    let tree = plus(Expr::int(1), Expr::int(2));
    let err = splice(&tree, &Position::root(), vec![Expr::int(1)]).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::SpliceManyAtScalar);
    let err = splice(&tree, &Position::head(), vec![Expr::int(1)]).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::SpliceManyAtScalar);
}

#[test]
fn test_out_of_range_position() {
    let tree = plus(Expr::int(1), Expr::int(2));
    let err = splice(&tree, &Position::arg(5), Expr::int(0)).unwrap_err();
    assert!(err.is_type_error());
    let err = splice(&Expr::int(1), &Position::arg(0), Expr::int(0)).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::InvalidSplicePosition { .. }));
}

#[test]
fn test_named_argument_keeps_name() {
    let tree = Expr::call(
        Expr::symbol("f"),
        vec![Named::named("by", Expr::missing())],
    );
    let out = splice(&tree, &Position::arg(0), Expr::string("g")).unwrap();
    assert_eq!(out.to_string(), r#"f(by = "g")"#);
}

#[test]
fn test_one_from_value() {
    assert_eq!(
        Splice::one_from_value(&Value::language(Expr::symbol("x"))),
        Ok(Expr::symbol("x"))
    );
    assert_eq!(Splice::one_from_value(&Value::int(2)), Ok(Expr::int(2)));
    assert_eq!(Splice::one_from_value(&Value::Null), Ok(Expr::null()));
    let err = Splice::one_from_value(&Value::ints(vec![1, 2])).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::InvalidSplice { .. }));
    let err = Splice::one_from_value(&Value::list(vec![])).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::SpliceManyAtScalar);
}

#[test]
fn test_many_from_value() {
    let list = Value::list(vec![
        Named::named("a", Value::language(Expr::symbol("x"))),
        Named::positional(Value::int(1)),
    ]);
    assert_eq!(
        Splice::many_from_value(&list),
        Ok(vec![
            Named::named("a", Expr::symbol("x")),
            Named::positional(Expr::int(1)),
        ])
    );
    assert_eq!(
        Splice::many_from_value(&Value::ints(vec![1, 2])),
        Ok(vec![Named::positional(Expr::int(1)), Named::positional(Expr::int(2))])
    );
    assert_eq!(Splice::many_from_value(&Value::Null), Ok(vec![]));
    let err = Splice::many_from_value(&Value::env(Env::new())).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::NotASequence { .. }));
}

#[test]
fn test_position_display() {
    assert_eq!(Position::root().to_string(), "<root>");
    assert_eq!(Position::arg(1).then(Slot::Head).to_string(), "[1][head]");
}
