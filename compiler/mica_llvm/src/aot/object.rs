//! Object file and textual IR emission.

use std::fmt;
use std::path::Path;

use inkwell::module::Module;
use inkwell::targets::{FileType, TargetMachine};

use super::target::{TargetConfig, TargetError};

/// Error type for emission operations.
#[derive(Debug, Clone)]
pub enum EmitError {
    /// Failed to create the target machine.
    TargetMachine(TargetError),
    /// Failed to emit an object file.
    ObjectEmission { path: String, message: String },
    /// Failed to emit textual LLVM IR.
    LlvmIrEmission { path: String, message: String },
    /// Output path is not usable.
    InvalidPath { path: String, reason: String },
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetMachine(err) => {
                write!(f, "failed to create target machine: {err}")
            }
            Self::ObjectEmission { path, message } => {
                write!(f, "failed to emit object file '{path}': {message}")
            }
            Self::LlvmIrEmission { path, message } => {
                write!(f, "failed to emit LLVM IR file '{path}': {message}")
            }
            Self::InvalidPath { path, reason } => {
                write!(f, "invalid output path '{path}': {reason}")
            }
        }
    }
}

impl std::error::Error for EmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TargetMachine(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TargetError> for EmitError {
    fn from(err: TargetError) -> Self {
        Self::TargetMachine(err)
    }
}

/// Validate that the parent directory exists for an output path.
fn validate_parent_exists(path: &Path) -> Result<(), EmitError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(EmitError::InvalidPath {
                path: path.to_string_lossy().into_owned(),
                reason: "parent directory does not exist".to_string(),
            });
        }
    }
    Ok(())
}

/// Emits configured LLVM modules as per-unit artifacts.
pub struct ObjectEmitter {
    machine: TargetMachine,
    config: TargetConfig,
}

impl ObjectEmitter {
    /// Create an emitter for the given target.
    pub fn new(config: &TargetConfig) -> Result<Self, EmitError> {
        let machine = config.create_target_machine()?;
        Ok(ObjectEmitter {
            machine,
            config: config.clone(),
        })
    }

    /// Create an emitter for the native target.
    pub fn native() -> Result<Self, EmitError> {
        let config = TargetConfig::native().map_err(EmitError::TargetMachine)?;
        Self::new(&config)
    }

    #[must_use]
    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    /// Stamp a module with the target triple and data layout.
    pub fn configure_module(&self, module: &Module<'_>) -> Result<(), EmitError> {
        self.config.configure_module(module)?;
        Ok(())
    }

    /// Emit a module as a native object file.
    pub fn emit_object(&self, module: &Module<'_>, path: &Path) -> Result<(), EmitError> {
        validate_parent_exists(path)?;
        self.machine
            .write_to_file(module, FileType::Object, path)
            .map_err(|e| EmitError::ObjectEmission {
                path: path.to_string_lossy().into_owned(),
                message: e.to_string(),
            })
    }

    /// Emit a module as human-readable LLVM IR (`--save`).
    pub fn emit_llvm_ir(&self, module: &Module<'_>, path: &Path) -> Result<(), EmitError> {
        validate_parent_exists(path)?;
        module
            .print_to_file(path)
            .map_err(|e| EmitError::LlvmIrEmission {
                path: path.to_string_lossy().into_owned(),
                message: e.to_string(),
            })
    }
}

impl fmt::Debug for ObjectEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // TargetMachine has no Debug; show the config instead.
        f.debug_struct("ObjectEmitter")
            .field("target", &self.config.triple())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell::context::Context;

    #[test]
    fn emit_llvm_ir_writes_the_module() {
        let Ok(emitter) = ObjectEmitter::native() else {
            return;
        };
        let context = Context::create();
        let module = context.create_module("emit_ir");
        let i64_type = context.i64_type();
        let function = module.add_function("answer", i64_type.fn_type(&[], false), None);
        let entry = context.append_basic_block(function, "entry");
        let builder = context.create_builder();
        builder.position_at_end(entry);
        builder
            .build_return(Some(&i64_type.const_int(42, false)))
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emit_ir.ll");
        emitter.emit_llvm_ir(&module, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("answer"));
        assert!(content.contains("ret i64 42"));
    }

    #[test]
    fn emit_object_writes_bytes() {
        let Ok(emitter) = ObjectEmitter::native() else {
            return;
        };
        let context = Context::create();
        let module = context.create_module("emit_obj");
        emitter.configure_module(&module).unwrap();
        let i64_type = context.i64_type();
        let function = module.add_function("f", i64_type.fn_type(&[], false), None);
        let entry = context.append_basic_block(function, "entry");
        let builder = context.create_builder();
        builder.position_at_end(entry);
        builder
            .build_return(Some(&i64_type.const_int(7, false)))
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emit_obj.o");
        emitter.emit_object(&module, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn missing_parent_is_invalid_path() {
        let Ok(emitter) = ObjectEmitter::native() else {
            return;
        };
        let context = Context::create();
        let module = context.create_module("bad_path");
        let result = emitter.emit_object(&module, Path::new("/nonexistent_dir_91427/x.o"));
        assert!(matches!(result, Err(EmitError::InvalidPath { .. })));
    }
}
