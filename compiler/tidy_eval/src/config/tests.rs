use pretty_assertions::assert_eq;

use super::{EvalConfig, EvaluatorBuilder, MAX_DEPTH_VAR};

fn lookup(value: &'static str) -> impl Fn(&str) -> Option<String> {
    move |key| (key == MAX_DEPTH_VAR).then(|| value.to_string())
}

#[test]
fn test_default_has_depth_limit() {
    assert_eq!(
        EvalConfig::default().max_depth,
        Some(EvalConfig::DEFAULT_MAX_DEPTH)
    );
}

#[test]
fn test_from_lookup_without_variable_is_default() {
    assert_eq!(EvalConfig::from_lookup(|_| None), EvalConfig::default());
}

#[test]
fn test_from_lookup_number() {
    assert_eq!(EvalConfig::from_lookup(lookup("250")).max_depth, Some(250));
    assert_eq!(EvalConfig::from_lookup(lookup(" 42 ")).max_depth, Some(42));
}

#[test]
fn test_from_lookup_unlimited() {
    assert_eq!(EvalConfig::from_lookup(lookup("unlimited")), EvalConfig::unlimited());
    assert_eq!(EvalConfig::from_lookup(lookup("UNLIMITED")).max_depth, None);
}

#[test]
fn test_from_lookup_ignores_garbage() {
    assert_eq!(EvalConfig::from_lookup(lookup("lots")), EvalConfig::default());
    assert_eq!(EvalConfig::from_lookup(lookup("0")), EvalConfig::default());
    assert_eq!(EvalConfig::from_lookup(lookup("-5")), EvalConfig::default());
}

#[test]
fn test_builder_setters() {
    let eval = EvaluatorBuilder::new().max_depth(7).build();
    assert_eq!(eval.config().max_depth, Some(7));

    let eval = EvaluatorBuilder::new().max_depth(7).unlimited_depth().build();
    assert_eq!(eval.config().max_depth, None);

    let eval = EvaluatorBuilder::new()
        .config(EvalConfig { max_depth: Some(3) })
        .build();
    assert_eq!(eval.config(), &EvalConfig { max_depth: Some(3) });
}
