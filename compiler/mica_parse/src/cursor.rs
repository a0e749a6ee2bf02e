//! Token cursor.
//!
//! Navigation over the lexer's flat token stream. The stream always ends
//! with `Eof`, so `current()` is total.

use mica_ir::{Span, Token, TokenKind};

/// Read position in a token stream.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor. The token list must be `Eof`-terminated.
    #[must_use]
    pub fn new(tokens: &'a [Token]) -> Self {
        debug_assert!(
            matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)),
            "token stream must end with Eof"
        );
        Cursor { tokens, pos: 0 }
    }

    /// The token at the cursor. Sticks at `Eof` once reached.
    #[must_use]
    pub fn current(&self) -> &'a Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    #[must_use]
    pub fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    #[must_use]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// The token after the current one.
    #[must_use]
    pub fn peek(&self) -> &'a Token {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    #[must_use]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Whether the current token has exactly this kind.
    #[must_use]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Advance past the current token, returning it.
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    /// Advance if the current token matches, returning whether it did.
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }
}
