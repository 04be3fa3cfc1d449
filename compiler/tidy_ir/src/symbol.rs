//! Symbols and the two reserved pronouns.

use std::borrow::Borrow;
use std::fmt;
use std::rc::Rc;

/// A name reference inside a deferred expression.
///
/// Symbols are identified by their text alone. Cloning shares the underlying
/// string. The empty symbol stands for a missing argument (an unfilled
/// parameter slot or a parameter without a default).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Rc<str>);

/// Words that cannot be read back as plain identifiers.
const RESERVED: &[&str] = &["function", "if", "else", "TRUE", "FALSE", "NULL"];

impl Symbol {
    /// Create a symbol from its text.
    pub fn new(text: &str) -> Self {
        Symbol(Rc::from(text))
    }

    /// The empty symbol, used as the marker for a missing argument.
    pub fn missing() -> Self {
        Symbol(Rc::from(""))
    }

    /// The symbol's text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the missing-argument marker.
    #[inline]
    pub fn is_missing(&self) -> bool {
        self.0.is_empty()
    }

    /// The pronoun this symbol names, if any.
    #[inline]
    pub fn pronoun(&self) -> Option<Pronoun> {
        Pronoun::from_name(&self.0)
    }

    /// Whether the name can be written without backticks.
    pub fn is_syntactic(&self) -> bool {
        let mut chars = self.0.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        if !(first.is_ascii_alphabetic() || first == '.') {
            return false;
        }
        let rest = &self.0[first.len_utf8()..];
        if first == '.' && rest.starts_with(|c: char| c.is_ascii_digit()) {
            return false;
        }
        rest.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
            && !RESERVED.contains(&&*self.0)
    }
}

impl From<&str> for Symbol {
    fn from(text: &str) -> Self {
        Symbol::new(text)
    }
}

impl From<String> for Symbol {
    fn from(text: String) -> Self {
        Symbol(Rc::from(text))
    }
}

impl From<&Symbol> for Symbol {
    fn from(symbol: &Symbol) -> Self {
        symbol.clone()
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", &*self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A reserved identifier that pins resolution to a single layer.
///
/// `.data$x` looks `x` up in the data mask only; `.env$x` looks it up in the
/// lexical scope chain only. Neither falls through to the other layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pronoun {
    /// `.data`: the auxiliary scope (data mask).
    Data,
    /// `.env`: the quosure's own scope chain.
    Env,
}

impl Pronoun {
    /// Recognise a pronoun by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            ".data" => Some(Pronoun::Data),
            ".env" => Some(Pronoun::Env),
            _ => None,
        }
    }

    /// The reserved identifier for this pronoun.
    pub fn name(self) -> &'static str {
        match self {
            Pronoun::Data => ".data",
            Pronoun::Env => ".env",
        }
    }

    /// Human-readable name of the layer the pronoun resolves in.
    pub fn layer(self) -> &'static str {
        match self {
            Pronoun::Data => "data mask",
            Pronoun::Env => "environment",
        }
    }
}

impl fmt::Display for Pronoun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
