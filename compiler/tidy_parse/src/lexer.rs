//! Lexer built on logos.
//!
//! Horizontal whitespace and `#` comments are skipped. Newlines are kept as
//! tokens because they end statements outside of parentheses.

use std::fmt;

use logos::Logos;

use crate::error::{ParseError, Span};

/// A lexical token.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    #[token("\n")]
    Newline,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[[")]
    LIndex,
    #[token("]]")]
    RIndex,

    // === Operators ===
    #[token("<-")]
    LeftAssign,
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
    #[token("&")]
    Amp,
    #[token("&&")]
    AmpAmp,
    #[token("|")]
    Pipe,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,
    #[token("!!")]
    BangBang,
    #[token("!!!")]
    BangBangBang,
    #[token("$")]
    Dollar,

    // === Keywords ===
    #[token("function")]
    Function,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("TRUE")]
    True,
    #[token("FALSE")]
    False,
    #[token("NULL")]
    Null,

    // === Literals ===
    #[regex(r"[0-9]+L", |lex| {
        let s = lex.slice();
        s[..s.len() - 1].parse::<i64>().ok()
    })]
    Int(i64),

    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Double(f64),

    #[regex(r#""([^"\\]|\\.)*""#, quoted)]
    #[regex(r"'([^'\\]|\\.)*'", quoted)]
    Str(String),

    #[regex(r"[a-zA-Z][a-zA-Z0-9._]*", |lex| lex.slice().to_string())]
    #[regex(r"\.([a-zA-Z._][a-zA-Z0-9._]*)?", |lex| lex.slice().to_string())]
    Ident(String),

    /// A backtick-quoted name such as `` `my var` `` or `` `+` ``.
    #[regex(r"`[^`]*`", quoted)]
    Backtick(String),
}

/// Strip the surrounding quotes and process escapes.
fn quoted(lex: &mut logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    unescape(&slice[1..slice.len() - 1])
}

/// Process escape sequences. Unknown escapes are kept as written.
fn unescape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('0') => result.push('\0'),
                Some(c @ ('\\' | '"' | '\'' | '`')) => result.push(c),
                Some(c) => {
                    result.push('\\');
                    result.push(c);
                }
                None => result.push('\\'),
            }
        } else {
            result.push(c);
        }
    }

    result
}

impl Token {
    /// The name a token stands for when it appears as an identifier.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Token::Ident(name) | Token::Backtick(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::Newline => return f.write_str("newline"),
            Token::Int(n) => return write!(f, "number `{n}L`"),
            Token::Double(d) => return write!(f, "number `{d}`"),
            Token::Str(s) => return write!(f, "string {s:?}"),
            Token::Ident(name) => return write!(f, "name `{name}`"),
            Token::Backtick(name) => return write!(f, "name `{name}`"),
            Token::Semi => ";",
            Token::Comma => ",",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::LIndex => "[[",
            Token::RIndex => "]]",
            Token::LeftAssign => "<-",
            Token::Eq => "=",
            Token::EqEq => "==",
            Token::NotEq => "!=",
            Token::Lt => "<",
            Token::LtEq => "<=",
            Token::Gt => ">",
            Token::GtEq => ">=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Caret => "^",
            Token::Amp => "&",
            Token::AmpAmp => "&&",
            Token::Pipe => "|",
            Token::PipePipe => "||",
            Token::Bang => "!",
            Token::BangBang => "!!",
            Token::BangBangBang => "!!!",
            Token::Dollar => "$",
            Token::Function => "function",
            Token::If => "if",
            Token::Else => "else",
            Token::True => "TRUE",
            Token::False => "FALSE",
            Token::Null => "NULL",
        };
        write!(f, "`{text}`")
    }
}

/// Split `source` into tokens with their spans.
pub fn lex(source: &str) -> Result<Vec<(Token, Span)>, ParseError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = Span::from(lexer.span());
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                return Err(ParseError::InvalidToken {
                    text: lexer.slice().to_string(),
                    span,
                })
            }
        }
    }
    Ok(tokens)
}
