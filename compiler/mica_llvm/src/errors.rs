//! Fatal code generation errors.
//!
//! Recoverable problems (unknown `@use` targets, unresolved members) go
//! through the diagnostic queue instead and leave compilation running; the
//! variants here abort it.

use std::fmt;

/// Error during multi-module code generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    /// Two modules share a name (pass 1).
    DuplicateModule { name: String },
    /// More than one module defines `fn main`.
    DuplicateMain { first: String, second: String },
    /// A function and a variable collide under one imported name.
    DuplicateImport { name: String },
    /// LLVM rejected a unit's IR during finalization.
    Verify { module: String, message: String },
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateModule { name } => {
                write!(f, "module '{name}' is declared more than once")
            }
            Self::DuplicateMain { first, second } => {
                write!(
                    f,
                    "both module '{first}' and module '{second}' define 'main'"
                )
            }
            Self::DuplicateImport { name } => {
                write!(
                    f,
                    "duplicate import '{name}': a function and a variable collide under one imported name"
                )
            }
            Self::Verify { module, message } => {
                write!(f, "IR verification failed for module '{module}': {message}")
            }
        }
    }
}

impl std::error::Error for CodegenError {}
