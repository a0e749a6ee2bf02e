//! Lexical tokens.
//!
//! The lexer produces a finite, flat `Vec<Token>` terminated by an `Eof`
//! token; the parser never reads past it.

use std::fmt;

use crate::span::Span;

/// A lexical token: kind plus source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Token kinds of the Mica language.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Int(i64),
    Float(f64),
    Ident(String),

    // Keywords
    Module,
    Fn,
    Let,
    Return,
    Priv,
    True,
    False,
    As,

    // Type keywords
    IntType,
    FloatType,
    BoolType,
    VoidType,

    // The `@use` directive marker
    AtUse,

    // Punctuation
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Arrow,
    Assign,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    /// Byte sequence the lexer could not tokenize.
    Error,

    /// End of input. Always the last token in a stream.
    Eof,
}

impl TokenKind {
    /// Keyword or punctuation spelling for diagnostics; `None` for
    /// value-carrying kinds.
    #[must_use]
    pub fn spelling(&self) -> Option<&'static str> {
        match self {
            TokenKind::Module => Some("module"),
            TokenKind::Fn => Some("fn"),
            TokenKind::Let => Some("let"),
            TokenKind::Return => Some("return"),
            TokenKind::Priv => Some("priv"),
            TokenKind::True => Some("true"),
            TokenKind::False => Some("false"),
            TokenKind::As => Some("as"),
            TokenKind::IntType => Some("int"),
            TokenKind::FloatType => Some("float"),
            TokenKind::BoolType => Some("bool"),
            TokenKind::VoidType => Some("void"),
            TokenKind::AtUse => Some("@use"),
            TokenKind::LBrace => Some("{"),
            TokenKind::RBrace => Some("}"),
            TokenKind::LParen => Some("("),
            TokenKind::RParen => Some(")"),
            TokenKind::Comma => Some(","),
            TokenKind::Semicolon => Some(";"),
            TokenKind::Colon => Some(":"),
            TokenKind::Dot => Some("."),
            TokenKind::Arrow => Some("->"),
            TokenKind::Assign => Some("="),
            TokenKind::Plus => Some("+"),
            TokenKind::Minus => Some("-"),
            TokenKind::Star => Some("*"),
            TokenKind::Slash => Some("/"),
            TokenKind::Percent => Some("%"),
            TokenKind::EqEq => Some("=="),
            TokenKind::NotEq => Some("!="),
            TokenKind::Lt => Some("<"),
            TokenKind::LtEq => Some("<="),
            TokenKind::Gt => Some(">"),
            TokenKind::GtEq => Some(">="),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(v) => write!(f, "{v}"),
            TokenKind::Float(v) => write!(f, "{v}"),
            TokenKind::Ident(name) => write!(f, "{name}"),
            TokenKind::Error => write!(f, "<error>"),
            TokenKind::Eof => write!(f, "<eof>"),
            other => match other.spelling() {
                Some(s) => write!(f, "{s}"),
                None => write!(f, "{other:?}"),
            },
        }
    }
}
