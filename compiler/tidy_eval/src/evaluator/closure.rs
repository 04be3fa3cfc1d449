//! Calling closures: argument matching and promise binding.

use tidy_ir::{
    arity_mismatch, duplicate_name, unused_argument, Arg, Binding, Closure, Env, EvalError,
    EvalResult, Expr, Layers, Param, Promise,
};

use super::Evaluator;

impl Evaluator {
    /// Bind the arguments in a fresh frame and evaluate the body there.
    ///
    /// Arguments become promises over the caller's scope and layers, so a
    /// parameter is only evaluated if the body uses it. Defaults become
    /// promises over the frame itself. The body runs with plain lexical
    /// lookup whatever the caller's layers were.
    pub(super) fn apply_closure(
        &mut self,
        closure: &Closure,
        head: &Expr,
        args: &[Arg],
        env: &Env,
        layers: &Layers,
    ) -> EvalResult {
        let matched = match_args(head, &closure.params, args)?;
        let frame = closure.env.child();
        for (param, arg) in closure.params.iter().zip(matched) {
            let binding = match (arg, &param.default) {
                (Some(expr), _) => {
                    Binding::Promise(Promise::new(expr.clone(), env.clone(), layers.clone()))
                }
                (None, Some(default)) => {
                    Binding::Promise(Promise::new(default.clone(), frame.clone(), Layers::Bare))
                }
                (None, None) => Binding::Missing,
            };
            frame.bind(param.name.clone(), binding);
        }
        self.eval_expr(&closure.body, &frame, &Layers::Bare)
    }
}

/// Pair each parameter with the argument supplied for it.
///
/// Named arguments are matched exactly first; the remaining parameters take
/// the positional arguments in order. An empty argument (`f(, 2)`) counts
/// as not supplied. `head` names the call in arity errors.
fn match_args<'a>(
    head: &Expr,
    params: &[Param],
    args: &'a [Arg],
) -> Result<Vec<Option<&'a Expr>>, EvalError> {
    let mut slots: Vec<Option<&Expr>> = vec![None; params.len()];
    let mut filled = vec![false; params.len()];
    let mut positional = Vec::new();
    for arg in args {
        match &arg.name {
            Some(name) => {
                let Some(index) = params.iter().position(|p| p.name == *name) else {
                    return Err(unused_argument(name.as_str()));
                };
                if filled[index] {
                    return Err(duplicate_name(name.as_str()));
                }
                filled[index] = true;
                slots[index] = Some(&arg.value);
            }
            None => positional.push(&arg.value),
        }
    }

    let mut positional = positional.into_iter();
    for (slot, filled) in slots.iter_mut().zip(&mut filled) {
        if *filled {
            continue;
        }
        let Some(expr) = positional.next() else {
            break;
        };
        *filled = true;
        *slot = Some(expr);
    }
    if positional.next().is_some() {
        return Err(arity_mismatch(&head.to_string(), params.len(), args.len()));
    }

    Ok(slots
        .into_iter()
        .map(|slot| slot.filter(|expr| !expr.is_missing()))
        .collect())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tidy_ir::{Expr, Named, Param};

    use super::match_args;

    fn head() -> Expr {
        Expr::symbol("f")
    }

    fn params(names: &[&str]) -> Vec<Param> {
        names
            .iter()
            .map(|name| Param {
                name: (*name).into(),
                default: None,
            })
            .collect()
    }

    #[test]
    fn test_named_then_positional() {
        let params = params(&["x", "y", "z"]);
        let args = vec![
            Named::positional(Expr::int(1)),
            Named::named("z", Expr::int(3)),
            Named::positional(Expr::int(2)),
        ];
        let matched = match_args(&head(), &params, &args).unwrap();
        assert_eq!(
            matched,
            vec![Some(&Expr::int(1)), Some(&Expr::int(2)), Some(&Expr::int(3))]
        );
    }

    #[test]
    fn test_unsupplied_and_empty_arguments() {
        let params = params(&["x", "y"]);
        let args = vec![Named::positional(Expr::missing())];
        assert_eq!(match_args(&head(), &params, &args).unwrap(), vec![None, None]);
    }

    #[test]
    fn test_unknown_name_is_unused_argument() {
        let args = [Named::named("w", Expr::int(1))];
        let err = match_args(&head(), &params(&["x"]), &args).unwrap_err();
        assert_eq!(err.message, "unused argument: w");
    }

    #[test]
    fn test_too_many_positional() {
        let args = vec![Named::positional(Expr::int(1)), Named::positional(Expr::int(2))];
        let err = match_args(&head(), &params(&["x"]), &args).unwrap_err();
        assert_eq!(err.message, "f expects 1 argument, got 2");
    }

    #[test]
    fn test_same_name_twice() {
        let args = vec![Named::named("x", Expr::int(1)), Named::named("x", Expr::int(2))];
        let err = match_args(&head(), &params(&["x"]), &args).unwrap_err();
        assert_eq!(err.message, "duplicate name: x");
    }
}
