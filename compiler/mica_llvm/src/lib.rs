//! LLVM backend for Mica.
//!
//! Multi-module code generation: one compilation unit (and one LLVM
//! module) per `module` declaration, cross-module imports through `@use`,
//! and qualified `alias.symbol` resolution through per-unit symbol tables.
//!
//! # Architecture
//!
//! ```text
//! Program AST
//!     ↓
//! Pass 1 ─── create_unit per module, flag the main unit
//!     ↓
//! Pass 2 ─── lower bodies in source order; @use materializes external
//!            declarations for the target's public symbols
//!     ↓
//! finalize ─ per-unit IR verification
//!     ↓
//! aot ────── object emission, cc link
//! ```
//!
//! Imports declare, they never define: an imported function becomes an
//! external declaration whose IR name is the unqualified base name, filed
//! in the importing unit's table under `alias.base`. The linker resolves
//! the base name against the defining unit's object file.
//!
//! # Key Types
//!
//! - [`CodegenCx`](context::CodegenCx): per-program state, unit registry,
//!   phase machine
//! - [`ModuleUnit`](unit::ModuleUnit): per-module IR module + symbol table
//! - [`aot`]: target config, object emission, linking, object inspection
//!
//! # Debugging
//!
//! - `RUST_LOG=mica_llvm=debug` traces unit creation and imports
//! - `--debug-objects` on the CLI prints [`aot::ObjectReport`] dumps

// Codegen threads many context values through; LLVM uses u32 indices.
#![allow(
    clippy::cast_possible_truncation,
    clippy::too_many_arguments,
    // Lowering returns Option to propagate "no value produced" paths.
    clippy::unnecessary_wraps
)]

pub mod aot;
mod builder;
mod context;
mod declare;
mod errors;
mod expr;
mod imports;
mod lower;
mod unit;

#[cfg(test)]
mod tests;

pub use builder::Locals;
pub use context::{CodegenCx, Phase};
pub use errors::CodegenError;
pub use unit::{ModuleUnit, Symbol, SymbolValue, UnitId};

// The LLVM context type callers need to own before building a CodegenCx.
pub use inkwell::context::Context;
