//! AOT compilation: object emission and linking.
//!
//! The pipeline after lowering and verification:
//!
//! ```text
//! ┌─────────┐    ┌──────────────┐    ┌─────────────┐    ┌────────────┐
//! │ Units   │───▶│ TargetMachine│───▶│ .o per unit │───▶│ executable │
//! │ (IR)    │    │  + FileType  │    │ (+ .ll)     │    │ (cc link)  │
//! └─────────┘    └──────────────┘    └─────────────┘    └────────────┘
//! ```
//!
//! # Key Components
//!
//! - [`TargetConfig`]: native target detection and machine creation
//! - [`ObjectEmitter`]: emit LLVM modules as object files or textual IR
//! - [`LinkerDriver`]: produce an executable through the system cc driver
//! - [`inspect_object`]: object-file inspection for `--debug-objects`

mod inspect;
mod link;
mod object;
mod target;

pub use inspect::{inspect_object, InspectError, ObjectReport};
pub use link::{LinkInput, LinkerDriver, LinkerError};
pub use object::{EmitError, ObjectEmitter};
pub use target::{TargetConfig, TargetError};
