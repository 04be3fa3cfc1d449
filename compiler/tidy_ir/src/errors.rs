//! Error types for evaluation.
//!
//! `EvalErrorKind` carries the structured data for each failure; factory
//! functions (e.g. `undefined_variable()`) are the public way to build one
//! and fill in both `kind` and `message`.
//!
//! # Categories
//!
//! Every kind belongs to one `ErrorCategory`:
//! - **Name**: a symbol could not be resolved in the layers that were searched
//! - **Type**: a value was the wrong shape for what was asked of it
//!   (calling a non-function, splicing a non-expression, and so on)
//! - **Runtime**: everything else (arity, recursion limit, overflow, ...)

use std::fmt;

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Coarse classification of an `EvalError`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Name,
    Type,
    Runtime,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorCategory::Name => "name error",
            ErrorCategory::Type => "type error",
            ErrorCategory::Runtime => "runtime error",
        })
    }
}

/// Typed error kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Name resolution
    UndefinedVariable {
        name: String,
    },
    /// `.data$x` or `.env$x` did not find `x` in that layer.
    MissingFromLayer {
        layer: &'static str,
        pronoun: &'static str,
        name: String,
    },
    /// A parameter was looked up but the caller supplied nothing for it.
    MissingArgument {
        name: String,
    },

    // Type
    NotCallable {
        callee: String,
        type_name: String,
    },
    InvalidSplice {
        type_name: String,
    },
    SpliceManyAtScalar,
    InvalidSplicePosition {
        position: String,
    },
    NotASequence {
        type_name: String,
    },
    TypeMismatch {
        expected: String,
        got: String,
    },
    UnquoteOutsideQuasiquotation {
        operator: &'static str,
    },
    /// A pronoun used outside `$` or `[[`.
    MisusedPronoun {
        pronoun: &'static str,
    },

    // Runtime
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    UnusedArgument {
        name: String,
    },
    UnequalColumns {
        name: String,
        expected: usize,
        got: usize,
    },
    DuplicateName {
        name: String,
    },
    PromiseCycle {
        expr: String,
    },
    RecursionLimit {
        depth: usize,
    },
    IntegerOverflow {
        operation: String,
    },

    /// Catch-all for errors raised by builtins with no dedicated kind.
    Custom {
        message: String,
    },
}

impl EvalErrorKind {
    /// The category this kind belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UndefinedVariable { .. }
            | Self::MissingFromLayer { .. }
            | Self::MissingArgument { .. } => ErrorCategory::Name,
            Self::NotCallable { .. }
            | Self::InvalidSplice { .. }
            | Self::SpliceManyAtScalar
            | Self::InvalidSplicePosition { .. }
            | Self::NotASequence { .. }
            | Self::TypeMismatch { .. }
            | Self::UnquoteOutsideQuasiquotation { .. }
            | Self::MisusedPronoun { .. } => ErrorCategory::Type,
            Self::ArityMismatch { .. }
            | Self::UnusedArgument { .. }
            | Self::UnequalColumns { .. }
            | Self::DuplicateName { .. }
            | Self::PromiseCycle { .. }
            | Self::RecursionLimit { .. }
            | Self::IntegerOverflow { .. }
            | Self::Custom { .. } => ErrorCategory::Runtime,
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Name resolution
            Self::UndefinedVariable { name } => write!(f, "object '{name}' not found"),
            Self::MissingFromLayer {
                layer,
                pronoun,
                name,
            } => write!(f, "'{name}' not found in the {layer} ({pronoun})"),
            Self::MissingArgument { name } => {
                write!(f, "argument '{name}' is missing, with no default")
            }

            // Type
            Self::NotCallable { callee, type_name } => {
                write!(f, "attempt to apply non-function: `{callee}` is {type_name}")
            }
            Self::InvalidSplice { type_name } => {
                write!(f, "cannot splice {type_name} into an expression")
            }
            Self::SpliceManyAtScalar => {
                write!(f, "can't splice a sequence where a single expression is expected")
            }
            Self::InvalidSplicePosition { position } => {
                write!(f, "no argument at splice position {position}")
            }
            Self::NotASequence { type_name } => {
                write!(f, "`!!!` expects a list or vector, got {type_name}")
            }
            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            Self::UnquoteOutsideQuasiquotation { operator } => {
                write!(f, "`{operator}` can only be used within a quasiquoted argument")
            }
            Self::MisusedPronoun { pronoun } => {
                write!(f, "`{pronoun}` can only be used with `$` or `[[`")
            }

            // Runtime
            Self::ArityMismatch {
                name,
                expected,
                got,
            } => {
                let arg_word = if *expected == 1 {
                    "argument"
                } else {
                    "arguments"
                };
                if name.is_empty() {
                    write!(f, "expected {expected} {arg_word}, got {got}")
                } else {
                    write!(f, "{name} expects {expected} {arg_word}, got {got}")
                }
            }
            Self::UnusedArgument { name } => write!(f, "unused argument: {name}"),
            Self::UnequalColumns {
                name,
                expected,
                got,
            } => write!(
                f,
                "column '{name}' has {got} rows, expected {expected}"
            ),
            Self::DuplicateName { name } => write!(f, "duplicate name: {name}"),
            Self::PromiseCycle { expr } => write!(
                f,
                "promise already under evaluation: recursive reference to `{expr}`"
            ),
            Self::RecursionLimit { depth } => {
                write!(f, "maximum evaluation depth exceeded (limit: {depth})")
            }
            Self::IntegerOverflow { operation } => {
                write!(f, "integer overflow in {operation}")
            }

            // Custom
            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    /// Structured error kind.
    pub kind: EvalErrorKind,
    /// Human-readable error message.
    ///
    /// For factory-created errors, this equals `kind.to_string()`.
    pub message: String,
}

impl EvalError {
    /// Create an error with just a message.
    ///
    /// Uses `Custom` kind. Prefer a specific factory function when one exists.
    pub fn new(message: impl Into<String>) -> Self {
        let msg = message.into();
        Self {
            kind: EvalErrorKind::Custom {
                message: msg.clone(),
            },
            message: msg,
        }
    }

    /// Create an error from a structured kind.
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }

    #[inline]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Returns `true` if a name could not be resolved.
    pub fn is_name_error(&self) -> bool {
        self.category() == ErrorCategory::Name
    }

    /// Returns `true` for type errors, `NotCallable` included.
    pub fn is_type_error(&self) -> bool {
        self.category() == ErrorCategory::Type
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category(), self.message)
    }
}

impl std::error::Error for EvalError {}

// Name Resolution Errors

/// Undefined variable.
#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

/// A pronoun lookup that found nothing in its layer.
#[cold]
pub fn missing_from_layer(pronoun: crate::Pronoun, name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MissingFromLayer {
        layer: pronoun.layer(),
        pronoun: pronoun.name(),
        name: name.to_string(),
    })
}

/// A parameter bound to nothing.
#[cold]
pub fn missing_argument(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MissingArgument {
        name: name.to_string(),
    })
}

// Type Errors

/// The head of a call did not evaluate to a function.
#[cold]
pub fn not_callable(callee: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        callee: callee.to_string(),
        type_name: type_name.to_string(),
    })
}

/// A value that cannot stand in for an expression node.
#[cold]
pub fn invalid_splice(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidSplice {
        type_name: type_name.to_string(),
    })
}

/// Splice-many targeted a position that holds exactly one node.
#[cold]
pub fn splice_many_at_scalar() -> EvalError {
    EvalError::from_kind(EvalErrorKind::SpliceManyAtScalar)
}

#[cold]
pub fn invalid_splice_position(position: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidSplicePosition {
        position: position.to_string(),
    })
}

#[cold]
pub fn not_a_sequence(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotASequence {
        type_name: type_name.to_string(),
    })
}

/// Type mismatch.
#[cold]
pub fn type_mismatch(expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

/// `!!` or `!!!` reached ordinary evaluation.
#[cold]
pub fn unquote_outside_quasiquotation(operator: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnquoteOutsideQuasiquotation { operator })
}

/// A pronoun evaluated on its own rather than through `$` or `[[`.
#[cold]
pub fn misused_pronoun(pronoun: crate::Pronoun) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MisusedPronoun {
        pronoun: pronoun.name(),
    })
}

// Runtime Errors

/// Wrong number of arguments in a call.
#[cold]
pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    })
}

/// A named argument matched no parameter.
#[cold]
pub fn unused_argument(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnusedArgument {
        name: name.to_string(),
    })
}

#[cold]
pub fn unequal_columns(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnequalColumns {
        name: name.to_string(),
        expected,
        got,
    })
}

#[cold]
pub fn duplicate_name(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateName {
        name: name.to_string(),
    })
}

/// A promise was forced while it was already being forced.
#[cold]
pub fn promise_cycle(expr: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::PromiseCycle {
        expr: expr.to_string(),
    })
}

/// Maximum evaluation depth exceeded.
#[cold]
pub fn recursion_limit_exceeded(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RecursionLimit { depth: limit })
}

/// Integer overflow error.
#[cold]
pub fn integer_overflow(operation: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow {
        operation: operation.to_string(),
    })
}
