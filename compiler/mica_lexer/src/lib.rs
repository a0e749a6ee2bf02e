//! Lexer for Mica using logos.
//!
//! Produces a flat `Vec<Token>` terminated by a single `Eof` token. Bytes
//! logos cannot match become `TokenKind::Error` tokens with their span; the
//! parser reports them, the lexer never fails.

mod raw_token;

use logos::Logos;

use mica_ir::{Span, Token, TokenKind};

use crate::raw_token::RawToken;

/// Tokenize a source string.
///
/// The returned stream is finite and always ends with `TokenKind::Eof`.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::from_range(lexer.span());
        let kind = match result {
            Ok(raw) => convert_token(raw, lexer.slice()),
            Err(()) => TokenKind::Error,
        };
        tokens.push(Token::new(kind, span));
    }

    let end = u32::try_from(source.len()).unwrap_or(u32::MAX);
    tokens.push(Token::new(TokenKind::Eof, Span::new(end, end)));
    tokens
}

/// Convert a raw logos token to a `TokenKind`.
fn convert_token(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        RawToken::Int => slice
            .parse::<i64>()
            .map_or(TokenKind::Error, TokenKind::Int),
        RawToken::Float => slice
            .parse::<f64>()
            .map_or(TokenKind::Error, TokenKind::Float),
        RawToken::Ident => TokenKind::Ident(slice.to_owned()),

        RawToken::Module => TokenKind::Module,
        RawToken::Fn => TokenKind::Fn,
        RawToken::Let => TokenKind::Let,
        RawToken::Return => TokenKind::Return,
        RawToken::Priv => TokenKind::Priv,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::As => TokenKind::As,

        RawToken::IntType => TokenKind::IntType,
        RawToken::FloatType => TokenKind::FloatType,
        RawToken::BoolType => TokenKind::BoolType,
        RawToken::VoidType => TokenKind::VoidType,

        RawToken::AtUse => TokenKind::AtUse,

        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Arrow => TokenKind::Arrow,

        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Assign => TokenKind::Assign,

        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
    }
}
