//! Diagnostic system for the Mica compiler.
//!
//! Diagnostics name the offending module or symbol and the syntactic
//! context they were raised in. Non-fatal diagnostics accumulate in a
//! [`DiagnosticQueue`] so one run can report several problems; the driver
//! turns a non-empty error count into a non-zero exit status.
//!
//! Source positions exist on AST nodes but are not plumbed through here yet.

mod diagnostic;
mod queue;

pub use diagnostic::{
    duplicate_import, unknown_identifier, unknown_module, unresolved_member, Diagnostic, Severity,
};
pub use queue::DiagnosticQueue;
