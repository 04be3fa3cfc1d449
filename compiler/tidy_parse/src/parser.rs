//! Recursive descent parser with one method per precedence level.
//!
//! Precedence, loosest first:
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | assign | `<-` `=` | right |
//! | or | `\|` `\|\|` | left |
//! | and | `&` `&&` | left |
//! | not | prefix `!` | - |
//! | comparison | `==` `!=` `<` `<=` `>` `>=` | left |
//! | additive | `+` `-` | left |
//! | multiplicative | `*` `/` | left |
//! | unary | prefix `-` `+` | - |
//! | power | `^` | right |
//! | unquote | prefix `!!` `!!!` | - |
//! | postfix | call, `$`, `[[ ]]` | left |

use tidy_ir::stack::ensure_sufficient_stack;
use tidy_ir::{Arg, Expr, Literal, Named, Symbol};
use tracing::trace;

use crate::error::{ParseError, Span};
use crate::lexer::{lex, Token};

/// How newlines are treated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Top level and `{ }`: a newline ends the statement.
    Statements,
    /// Inside `( )`, `[[ ]]` and argument lists: newlines are whitespace.
    Grouped,
}

type ParseResult = Result<Expr, ParseError>;

struct Parser {
    tokens: Vec<(Token, Span)>,
    pos: usize,
    modes: Vec<Mode>,
    /// End of input, for errors at EOF.
    end: Span,
}

/// Parse exactly one expression.
pub fn parse_expr(source: &str) -> ParseResult {
    let mut parser = Parser::new(source)?;
    parser.skip_separators();
    let expr = parser.parse_expr()?;
    parser.skip_separators();
    if !parser.at_end() {
        return Err(parser.unexpected("end of input"));
    }
    Ok(expr)
}

/// Parse a sequence of statements separated by newlines or `;`.
pub fn parse_program(source: &str) -> Result<Vec<Expr>, ParseError> {
    let mut parser = Parser::new(source)?;
    let exprs = parser.parse_statements()?;
    trace!(statements = exprs.len(), "parsed program");
    Ok(exprs)
}

fn or_op(token: &Token) -> Option<&'static str> {
    match token {
        Token::Pipe => Some("|"),
        Token::PipePipe => Some("||"),
        _ => None,
    }
}

fn and_op(token: &Token) -> Option<&'static str> {
    match token {
        Token::Amp => Some("&"),
        Token::AmpAmp => Some("&&"),
        _ => None,
    }
}

fn comparison_op(token: &Token) -> Option<&'static str> {
    match token {
        Token::EqEq => Some("=="),
        Token::NotEq => Some("!="),
        Token::Lt => Some("<"),
        Token::LtEq => Some("<="),
        Token::Gt => Some(">"),
        Token::GtEq => Some(">="),
        _ => None,
    }
}

fn additive_op(token: &Token) -> Option<&'static str> {
    match token {
        Token::Plus => Some("+"),
        Token::Minus => Some("-"),
        _ => None,
    }
}

fn multiplicative_op(token: &Token) -> Option<&'static str> {
    match token {
        Token::Star => Some("*"),
        Token::Slash => Some("/"),
        _ => None,
    }
}

/// Only names (or strings naming them) can be assigned to.
fn is_assignable(target: &Expr) -> bool {
    match target {
        Expr::Symbol(s) => !s.is_missing(),
        Expr::Literal(Literal::Str(_)) => true,
        _ => false,
    }
}

impl Parser {
    fn new(source: &str) -> Result<Self, ParseError> {
        Ok(Parser {
            tokens: lex(source)?,
            pos: 0,
            modes: vec![Mode::Statements],
            end: Span::point(source.len()),
        })
    }

    // Token cursor

    fn grouped(&self) -> bool {
        self.modes.last() == Some(&Mode::Grouped)
    }

    /// Index of the next significant token at or after `from`.
    fn significant(&self, from: usize) -> usize {
        let mut i = from;
        if self.grouped() {
            while matches!(self.tokens.get(i), Some((Token::Newline, _))) {
                i += 1;
            }
        }
        i
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.significant(self.pos)).map(|(t, _)| t)
    }

    fn peek_second(&self) -> Option<&Token> {
        let first = self.significant(self.pos);
        self.tokens
            .get(self.significant(first + 1))
            .map(|(t, _)| t)
    }

    fn at_end(&self) -> bool {
        self.peek().is_none()
    }

    #[inline]
    fn check(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    fn advance(&mut self) -> Option<(Token, Span)> {
        let i = self.significant(self.pos);
        let item = self.tokens.get(i).cloned();
        if item.is_some() {
            self.pos = i + 1;
        }
        item
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, expected: &'static str) -> Result<Span, ParseError> {
        if self.check(token) {
            Ok(self.advance().map_or(self.end, |(_, span)| span))
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        match self.tokens.get(self.significant(self.pos)) {
            Some((token, span)) => ParseError::Unexpected {
                found: token.to_string(),
                expected,
                span: *span,
            },
            None => ParseError::UnexpectedEof { expected },
        }
    }

    fn span_here(&self) -> Span {
        self.tokens
            .get(self.significant(self.pos))
            .map_or(self.end, |(_, span)| *span)
    }

    fn skip_newlines(&mut self) {
        while matches!(self.tokens.get(self.pos), Some((Token::Newline, _))) {
            self.pos += 1;
        }
    }

    /// Skip newlines and `;`. Returns whether anything was skipped.
    fn skip_separators(&mut self) -> bool {
        let start = self.pos;
        while matches!(
            self.tokens.get(self.pos),
            Some((Token::Newline | Token::Semi, _))
        ) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn with_mode<T>(
        &mut self,
        mode: Mode,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.modes.push(mode);
        let result = f(self);
        self.modes.pop();
        result
    }

    // Statements

    fn parse_statements(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = Vec::new();
        self.skip_separators();
        while !self.at_end() {
            exprs.push(self.parse_expr()?);
            if !self.at_end() && !self.skip_separators() {
                return Err(self.unexpected("`;` or newline"));
            }
        }
        Ok(exprs)
    }

    // Expressions

    /// Parse an expression.
    ///
    /// Uses `ensure_sufficient_stack` to prevent stack overflow
    /// on deeply nested expressions.
    fn parse_expr(&mut self) -> ParseResult {
        ensure_sufficient_stack(|| self.parse_assign())
    }

    /// Parse `target <- value` or `target = value` (right-associative).
    fn parse_assign(&mut self) -> ParseResult {
        let start = self.span_here();
        let target = self.parse_or()?;
        let op = match self.peek() {
            Some(Token::LeftAssign) => "<-",
            Some(Token::Eq) => "=",
            _ => return Ok(target),
        };
        if !is_assignable(&target) {
            return Err(ParseError::InvalidAssignTarget {
                target: target.to_string(),
                span: start.merge(self.span_here()),
            });
        }
        self.advance();
        self.skip_newlines();
        let value = self.parse_expr()?;
        Ok(Expr::call2(op, vec![target, value]))
    }

    /// One left-associative binary level.
    fn parse_left_assoc(
        &mut self,
        op_for: fn(&Token) -> Option<&'static str>,
        operand: fn(&mut Self) -> ParseResult,
    ) -> ParseResult {
        let mut left = operand(self)?;
        while let Some(op) = self.peek().and_then(op_for) {
            self.advance();
            self.skip_newlines();
            let right = operand(self)?;
            left = Expr::call2(op, vec![left, right]);
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> ParseResult {
        self.parse_left_assoc(or_op, Self::parse_and)
    }

    fn parse_and(&mut self) -> ParseResult {
        self.parse_left_assoc(and_op, Self::parse_not)
    }

    /// Parse prefix `!`, which binds looser than comparison: `!a == b` is `!(a == b)`.
    fn parse_not(&mut self) -> ParseResult {
        if self.eat(&Token::Bang) {
            self.skip_newlines();
            let operand = ensure_sufficient_stack(|| self.parse_not())?;
            return Ok(Expr::call2("!", vec![operand]));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> ParseResult {
        self.parse_left_assoc(comparison_op, Self::parse_additive)
    }

    fn parse_additive(&mut self) -> ParseResult {
        self.parse_left_assoc(additive_op, Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> ParseResult {
        self.parse_left_assoc(multiplicative_op, Self::parse_unary)
    }

    /// Parse prefix `-` and `+`.
    fn parse_unary(&mut self) -> ParseResult {
        let op = match self.peek() {
            Some(Token::Minus) => "-",
            Some(Token::Plus) => "+",
            _ => return self.parse_power(),
        };
        self.advance();
        let operand = ensure_sufficient_stack(|| self.parse_unary())?;
        Ok(Expr::call2(op, vec![operand]))
    }

    /// Parse `^`. The exponent may carry a sign: `2^-1`.
    fn parse_power(&mut self) -> ParseResult {
        let base = self.parse_unquote()?;
        if !self.eat(&Token::Caret) {
            return Ok(base);
        }
        self.skip_newlines();
        let exponent = self.parse_unary()?;
        Ok(Expr::call2("^", vec![base, exponent]))
    }

    /// Parse `!!x` and `!!!x`.
    fn parse_unquote(&mut self) -> ParseResult {
        let op = match self.peek() {
            Some(Token::BangBang) => "!!",
            Some(Token::BangBangBang) => "!!!",
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = ensure_sufficient_stack(|| self.parse_unquote())?;
        Ok(Expr::call2(op, vec![operand]))
    }

    /// Parse calls, `$` field access and `[[ ]]` indexing.
    fn parse_postfix(&mut self) -> ParseResult {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek() {
                Some(Token::LParen) => {
                    self.advance();
                    let args = self.parse_args()?;
                    expr = Expr::call(expr, args);
                }
                Some(Token::Dollar) => {
                    self.advance();
                    let field = self.parse_field()?;
                    expr = Expr::call2("$", vec![expr, field]);
                }
                Some(Token::LIndex) => {
                    self.advance();
                    let index = self.with_mode(Mode::Grouped, |p| {
                        let index = p.parse_expr()?;
                        p.expect(&Token::RIndex, "`]]`")?;
                        Ok(index)
                    })?;
                    expr = Expr::call2("[[", vec![expr, index]);
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_field(&mut self) -> ParseResult {
        match self.advance() {
            Some((Token::Ident(name) | Token::Backtick(name), _)) => Ok(Expr::symbol(name)),
            Some((Token::Str(text), _)) => Ok(Expr::string(&text)),
            Some((token, span)) => Err(ParseError::Unexpected {
                found: token.to_string(),
                expected: "a field name",
                span,
            }),
            None => Err(ParseError::UnexpectedEof {
                expected: "a field name",
            }),
        }
    }

    /// Parse call arguments after `(`, through the closing `)`.
    fn parse_args(&mut self) -> Result<Vec<Arg>, ParseError> {
        self.with_mode(Mode::Grouped, |p| {
            let mut args = Vec::new();
            if p.eat(&Token::RParen) {
                return Ok(args);
            }
            loop {
                args.push(p.parse_arg()?);
                if p.eat(&Token::Comma) {
                    continue;
                }
                p.expect(&Token::RParen, "`,` or `)`")?;
                return Ok(args);
            }
        })
    }

    fn at_arg_end(&self) -> bool {
        matches!(self.peek(), Some(Token::Comma | Token::RParen))
    }

    /// Parse `value`, `name = value`, or an empty (missing) argument.
    fn parse_arg(&mut self) -> Result<Arg, ParseError> {
        let name = match (self.peek(), self.peek_second()) {
            (
                Some(Token::Ident(name) | Token::Backtick(name) | Token::Str(name)),
                Some(Token::Eq),
            ) => Some(Symbol::new(name)),
            _ => None,
        };
        if name.is_some() {
            self.advance();
            self.advance();
        }
        let value = if self.at_arg_end() {
            Expr::missing()
        } else {
            self.parse_expr()?
        };
        Ok(match name {
            Some(name) => Named::named(name, value),
            None => Named::positional(value),
        })
    }

    fn parse_primary(&mut self) -> ParseResult {
        let Some((token, span)) = self.advance() else {
            return Err(ParseError::UnexpectedEof {
                expected: "an expression",
            });
        };
        match token {
            Token::Int(n) => Ok(Expr::int(n)),
            Token::Double(d) => Ok(Expr::double(d)),
            Token::Str(text) => Ok(Expr::string(&text)),
            Token::True => Ok(Expr::bool(true)),
            Token::False => Ok(Expr::bool(false)),
            Token::Null => Ok(Expr::null()),
            Token::Ident(name) | Token::Backtick(name) => Ok(Expr::symbol(name)),
            Token::LParen => self.with_mode(Mode::Grouped, |p| {
                let inner = p.parse_expr()?;
                p.expect(&Token::RParen, "`)`")?;
                Ok(inner)
            }),
            Token::LBrace => self.parse_block(),
            Token::Function => self.parse_function(),
            Token::If => self.parse_if(),
            other => Err(ParseError::Unexpected {
                found: other.to_string(),
                expected: "an expression",
                span,
            }),
        }
    }

    /// Parse the statements of a `{ }` block, after the `{`.
    fn parse_block(&mut self) -> ParseResult {
        let statements = self.with_mode(Mode::Statements, |p| {
            let mut statements = Vec::new();
            p.skip_separators();
            while !p.eat(&Token::RBrace) {
                if p.at_end() {
                    return Err(ParseError::UnexpectedEof { expected: "`}`" });
                }
                statements.push(Named::positional(p.parse_expr()?));
                if !p.check(&Token::RBrace) && !p.skip_separators() {
                    return Err(p.unexpected("`;`, newline or `}`"));
                }
            }
            Ok(statements)
        })?;
        Ok(Expr::call(Expr::symbol("{"), statements))
    }

    /// Parse `function(params) body`, after the `function` keyword.
    ///
    /// Parameters become named arguments of a call to `function` (the
    /// missing marker when there is no default); the body is the final,
    /// unnamed argument.
    fn parse_function(&mut self) -> ParseResult {
        self.expect(&Token::LParen, "`(`")?;
        let mut args = self.with_mode(Mode::Grouped, |p| {
            let mut params = Vec::new();
            if p.eat(&Token::RParen) {
                return Ok(params);
            }
            loop {
                let (token, span) = p.advance().ok_or(ParseError::UnexpectedEof {
                    expected: "a parameter name",
                })?;
                let Some(name) = token.as_name().map(Symbol::new) else {
                    return Err(ParseError::InvalidParameter { span });
                };
                let default = if p.eat(&Token::Eq) {
                    p.parse_expr()?
                } else {
                    Expr::missing()
                };
                params.push(Named::named(name, default));
                if p.eat(&Token::Comma) {
                    continue;
                }
                p.expect(&Token::RParen, "`,` or `)`")?;
                return Ok(params);
            }
        })?;
        self.skip_newlines();
        let body = self.parse_expr()?;
        args.push(Named::positional(body));
        Ok(Expr::call(Expr::symbol("function"), args))
    }

    /// Parse `if (cond) then [else otherwise]`, after the `if` keyword.
    fn parse_if(&mut self) -> ParseResult {
        self.expect(&Token::LParen, "`(`")?;
        let cond = self.with_mode(Mode::Grouped, |p| {
            let cond = p.parse_expr()?;
            p.expect(&Token::RParen, "`)`")?;
            Ok(cond)
        })?;
        self.skip_newlines();
        let then = self.parse_expr()?;
        let mut args = vec![cond, then];

        let before_else = self.pos;
        self.skip_newlines();
        if self.eat(&Token::Else) {
            self.skip_newlines();
            args.push(self.parse_expr()?);
        } else {
            self.pos = before_else;
        }
        Ok(Expr::call2("if", args))
    }
}

#[cfg(test)]
mod tests;
