//! Mica compiler driver.
//!
//! The `mica` binary: flag parsing, the build pipeline, artifact cleanup.
//!
//! The LLVM backend is behind the `llvm` cargo feature since it needs
//! LLVM 17 installed; without it the driver still lexes, parses and
//! reports front-end errors.

pub mod commands;

pub use commands::{clean_artifacts, run_build, BuildOptions};
