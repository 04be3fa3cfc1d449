//! Tidy IR - deferred expressions and the scopes they are evaluated against.
//!
//! This crate provides:
//! - `Symbol`, `Literal` and the `Expr` tree (the unevaluated "deferred expression")
//! - `Env`: a chain of mutable scopes, each with at most one parent
//! - `Promise`: an argument captured before evaluation, forced at most once
//! - `Quosure`: an expression bound to the `Env` it must be evaluated in
//! - Runtime `Value`s, `Table`s and read-only `DataMask`s
//! - Evaluation error types (`EvalError`, `EvalResult`)
//! - Copy-on-splice tree surgery (`splice`, `Position`, `Splice`)
//! - The `Executor` trait, the seam between lazy callables and the evaluator
//!
//! # Ownership
//!
//! Everything here is single-threaded. Scopes are shared through `Rc`, so a
//! quosure keeps its scope alive for as long as the quosure exists. Values and
//! expression nodes are immutable once built; only scopes can be mutated.

mod env;
mod errors;
mod executor;
mod expr;
mod function;
mod heap;
mod literal;
mod mask;
mod named;
mod quosure;
mod splice;
pub mod stack;
mod symbol;
mod table;
mod value;

pub use env::{Binding, Env, Promise};
pub use errors::{ErrorCategory, EvalError, EvalErrorKind, EvalResult};
pub use executor::Executor;
pub use expr::{Call, Expr};
pub use function::{Args, Builtin, Closure, Function, Param, Special, SpecialArgs};
pub use heap::Heap;
pub use literal::Literal;
pub use mask::{DataMask, Layers};
pub use named::{Arg, Named};
pub use quosure::Quosure;
pub use splice::{splice, Position, Slot, Splice};
pub use symbol::{Pronoun, Symbol};
pub use table::Table;
pub use value::Value;

// Re-export error constructors for use by other crates
pub use errors::{
    // Name resolution errors
    missing_argument,
    missing_from_layer,
    undefined_variable,
    // Type errors
    invalid_splice,
    invalid_splice_position,
    misused_pronoun,
    not_a_sequence,
    not_callable,
    splice_many_at_scalar,
    type_mismatch,
    unquote_outside_quasiquotation,
    // Runtime errors
    arity_mismatch,
    duplicate_name,
    integer_overflow,
    promise_cycle,
    recursion_limit_exceeded,
    unequal_columns,
    unused_argument,
};
