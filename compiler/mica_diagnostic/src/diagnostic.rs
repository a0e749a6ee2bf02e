//! Diagnostic records and constructor helpers.

use std::fmt;

/// How bad a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

// Constructor helpers for the diagnostics the code generator raises.

/// `@use` names a module that was never declared.
#[must_use]
pub fn unknown_module(module: &str) -> Diagnostic {
    Diagnostic::error(format!("Module '{module}' not found (in @use directive)"))
}

/// `alias.symbol` did not resolve in the current unit.
#[must_use]
pub fn unresolved_member(module: &str, symbol: &str) -> Diagnostic {
    Diagnostic::error(format!(
        "unresolved member '{symbol}' of module '{module}' (in member access)"
    ))
}

/// One imported name would cover both a function and a variable.
#[must_use]
pub fn duplicate_import(name: &str) -> Diagnostic {
    Diagnostic::error(format!(
        "duplicate import '{name}': a function and a variable collide under one imported name"
    ))
}

/// An identifier did not resolve during expression lowering.
#[must_use]
pub fn unknown_identifier(name: &str) -> Diagnostic {
    Diagnostic::error(format!("unknown identifier '{name}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_module_names_the_module() {
        let d = unknown_module("nope");
        assert_eq!(d.severity, Severity::Error);
        assert!(d.message.contains("'nope'"));
        assert!(d.message.contains("@use"));
    }

    #[test]
    fn display_prefixes_severity() {
        let d = Diagnostic::warning("something");
        assert_eq!(d.to_string(), "warning: something");
    }
}
