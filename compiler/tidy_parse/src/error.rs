//! Parse errors.

use std::fmt;

/// A byte range in the source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// An empty span at `offset`.
    pub fn point(offset: usize) -> Self {
        Span {
            start: offset,
            end: offset,
        }
    }

    /// The smallest span covering both.
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Why source text could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid token `{text}` at {span}")]
    InvalidToken { text: String, span: Span },

    #[error("unexpected {found} at {span}, expected {expected}")]
    Unexpected {
        found: String,
        expected: &'static str,
        span: Span,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },

    #[error("invalid parameter at {span}: parameters must be names")]
    InvalidParameter { span: Span },

    #[error("invalid assignment target `{target}` at {span}")]
    InvalidAssignTarget { target: String, span: Span },
}

impl ParseError {
    /// Where the error occurred, if it points at a token.
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::InvalidToken { span, .. }
            | ParseError::Unexpected { span, .. }
            | ParseError::InvalidParameter { span }
            | ParseError::InvalidAssignTarget { span, .. } => Some(*span),
            ParseError::UnexpectedEof { .. } => None,
        }
    }
}
