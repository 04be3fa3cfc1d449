//! `.data` and `.env`: lookups pinned to a single layer.

use tidy_ir::{
    missing_from_layer, type_mismatch, Call, Env, EvalResult, Expr, Layers, Literal, Pronoun,
};

use crate::evaluator::Evaluator;

/// A recognised `.data$x`, `.env$x`, `.data[[i]]` or `.env[[i]]`.
pub(crate) struct PronounAccess<'a> {
    pronoun: Pronoun,
    field: Field<'a>,
}

enum Field<'a> {
    /// `$name` or `$"name"`.
    Name(&'a str),
    /// `[[expr]]`, evaluated to find the name.
    Index(&'a Expr),
}

impl<'a> PronounAccess<'a> {
    /// Match `call` against the pronoun access shapes.
    pub(crate) fn recognise(call: &'a Call) -> Option<Self> {
        let dollar = call.is_call_to("$");
        if !dollar && !call.is_call_to("[[") {
            return None;
        }
        let [target, field] = call.args.as_slice() else {
            return None;
        };
        if target.name.is_some() || field.name.is_some() {
            return None;
        }
        let pronoun = target.value.as_symbol()?.pronoun()?;
        let field = match &field.value {
            Expr::Symbol(name) if dollar && !name.is_missing() => Field::Name(name.as_str()),
            Expr::Literal(Literal::Str(name)) if dollar => Field::Name(name),
            _ if dollar => return None,
            index => Field::Index(index),
        };
        Some(PronounAccess { pronoun, field })
    }
}

impl Evaluator {
    /// Resolve a pronoun access in exactly one layer.
    ///
    /// `.data` reads the data mask and `.env` walks the lexical chain.
    /// Absence is an error; neither falls through to the other layer.
    pub(crate) fn eval_pronoun(
        &mut self,
        access: &PronounAccess<'_>,
        env: &Env,
        layers: &Layers,
    ) -> EvalResult {
        let name = match access.field {
            Field::Name(name) => name.to_string(),
            Field::Index(index) => {
                let value = self.eval_expr(index, env, layers)?;
                match value.as_scalar_str() {
                    Some(name) => name.to_string(),
                    None => return Err(type_mismatch("a single string", value.type_name())),
                }
            }
        };
        match access.pronoun {
            Pronoun::Data => layers
                .mask()
                .and_then(|mask| mask.get(&name))
                .ok_or_else(|| missing_from_layer(Pronoun::Data, &name)),
            Pronoun::Env => match env.lookup(&name) {
                Some(binding) => self.resolve_binding(&name, binding),
                None => Err(missing_from_layer(Pronoun::Env, &name)),
            },
        }
    }
}
