//! Parse errors.

use mica_ir::Span;
use thiserror::Error;

/// Error produced when the token stream does not match the grammar.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected token `{found}` at {span}, expected {expected}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("unrecognized character at {span}")]
    InvalidToken { span: Span },
}
