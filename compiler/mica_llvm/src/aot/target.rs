//! Native target configuration.
//!
//! Mica compiles for the host only; cross-compilation would start here.

use std::fmt;
use std::sync::OnceLock;

use inkwell::module::Module;
use inkwell::targets::{
    CodeModel, InitializationConfig, RelocMode, Target, TargetMachine, TargetTriple,
};
use inkwell::OptimizationLevel;

/// Error type for target configuration operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    /// Failed to initialize LLVM's native target.
    InitializationFailed(String),
    /// LLVM has no target for the host triple.
    UnknownTriple { triple: String, message: String },
    /// Failed to create the target machine.
    TargetMachineCreationFailed { triple: String },
}

impl fmt::Display for TargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitializationFailed(msg) => {
                write!(f, "failed to initialize LLVM native target: {msg}")
            }
            Self::UnknownTriple { triple, message } => {
                write!(f, "no LLVM target for '{triple}': {message}")
            }
            Self::TargetMachineCreationFailed { triple } => {
                write!(f, "failed to create target machine for '{triple}'")
            }
        }
    }
}

impl std::error::Error for TargetError {}

static NATIVE_INIT: OnceLock<Result<(), String>> = OnceLock::new();

/// Initialize LLVM's native target exactly once per process.
fn initialize_native() -> Result<(), TargetError> {
    NATIVE_INIT
        .get_or_init(|| Target::initialize_native(&InitializationConfig::default()))
        .clone()
        .map_err(TargetError::InitializationFailed)
}

/// Target configuration for the host machine.
#[derive(Debug, Clone)]
pub struct TargetConfig {
    triple: String,
    cpu: String,
    features: String,
}

impl TargetConfig {
    /// Detect the native target.
    pub fn native() -> Result<Self, TargetError> {
        initialize_native()?;
        let triple = TargetMachine::get_default_triple();
        Ok(TargetConfig {
            triple: triple.as_str().to_string_lossy().into_owned(),
            cpu: TargetMachine::get_host_cpu_name().to_string(),
            features: TargetMachine::get_host_cpu_features().to_string(),
        })
    }

    /// The target triple string.
    #[must_use]
    pub fn triple(&self) -> &str {
        &self.triple
    }

    /// Create a target machine for object emission.
    pub fn create_target_machine(&self) -> Result<TargetMachine, TargetError> {
        initialize_native()?;
        let triple = TargetTriple::create(&self.triple);
        let target = Target::from_triple(&triple).map_err(|e| TargetError::UnknownTriple {
            triple: self.triple.clone(),
            message: e.to_string(),
        })?;
        target
            .create_target_machine(
                &triple,
                &self.cpu,
                &self.features,
                OptimizationLevel::Default,
                RelocMode::PIC,
                CodeModel::Default,
            )
            .ok_or_else(|| TargetError::TargetMachineCreationFailed {
                triple: self.triple.clone(),
            })
    }

    /// Stamp a module with the target triple and data layout.
    ///
    /// Must run before emission so LLVM lays out types for the right
    /// machine.
    pub fn configure_module(&self, module: &Module<'_>) -> Result<(), TargetError> {
        let machine = self.create_target_machine()?;
        module.set_triple(&machine.get_triple());
        module.set_data_layout(&machine.get_target_data().get_data_layout());
        Ok(())
    }
}
