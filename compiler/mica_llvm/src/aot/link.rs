//! Linking through the system cc driver.
//!
//! The cc driver (gcc or clang) supplies the platform's startup objects
//! and default library paths, so Mica does not reimplement linker
//! scripting. Arguments are passed as a vector; no shell ever sees the
//! paths.

use std::fmt;
use std::path::PathBuf;
use std::process::Command;

/// Error type for linker operations.
#[derive(Debug, Clone)]
pub enum LinkerError {
    /// No cc driver was found on PATH.
    LinkerNotFound { tried: Vec<String> },
    /// Linker invocation failed.
    LinkFailed {
        linker: String,
        exit_code: Option<i32>,
        stderr: String,
    },
    /// I/O error spawning the linker.
    IoError { message: String },
}

impl fmt::Display for LinkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinkerNotFound { tried } => {
                write!(f, "no C compiler driver found (tried: {})", tried.join(", "))
            }
            Self::LinkFailed {
                linker,
                exit_code,
                stderr,
            } => {
                write!(f, "linking with '{linker}' failed")?;
                if let Some(code) = exit_code {
                    write!(f, " (exit code {code})")?;
                }
                if !stderr.is_empty() {
                    write!(f, "\n\nLinker stderr:\n{stderr}")?;
                }
                Ok(())
            }
            Self::IoError { message } => {
                write!(f, "I/O error during linking: {message}")
            }
        }
    }
}

impl std::error::Error for LinkerError {}

/// Inputs of one link step.
#[derive(Debug, Clone, Default)]
pub struct LinkInput {
    /// Object files, one per compilation unit.
    pub objects: Vec<PathBuf>,
    /// Output executable path.
    pub output: PathBuf,
}

/// Drives the platform cc to produce an executable.
#[derive(Debug, Clone)]
pub struct LinkerDriver {
    cc: String,
}

/// Drivers probed in order.
const CC_CANDIDATES: &[&str] = &["cc", "gcc", "clang"];

impl LinkerDriver {
    /// Locate a cc driver on PATH.
    pub fn detect() -> Result<Self, LinkerError> {
        for candidate in CC_CANDIDATES {
            let found = Command::new(candidate)
                .arg("--version")
                .output()
                .is_ok_and(|out| out.status.success());
            if found {
                return Ok(LinkerDriver {
                    cc: (*candidate).to_string(),
                });
            }
        }
        Err(LinkerError::LinkerNotFound {
            tried: CC_CANDIDATES.iter().map(|s| (*s).to_string()).collect(),
        })
    }

    /// Use a specific driver binary.
    #[must_use]
    pub fn with_cc(cc: impl Into<String>) -> Self {
        LinkerDriver { cc: cc.into() }
    }

    /// The driver binary this linker invokes.
    #[must_use]
    pub fn cc(&self) -> &str {
        &self.cc
    }

    /// Link objects into an executable.
    pub fn link(&self, input: &LinkInput) -> Result<(), LinkerError> {
        tracing::debug!(
            cc = %self.cc,
            objects = input.objects.len(),
            output = %input.output.display(),
            "linking"
        );
        let output = Command::new(&self.cc)
            .args(&input.objects)
            .arg("-o")
            .arg(&input.output)
            .output()
            .map_err(|e| LinkerError::IoError {
                message: e.to_string(),
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(LinkerError::LinkFailed {
                linker: self.cc.clone(),
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_failed_display_includes_stderr() {
        let err = LinkerError::LinkFailed {
            linker: "cc".to_string(),
            exit_code: Some(1),
            stderr: "undefined reference to `missing'".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("undefined reference"));
    }

    #[test]
    fn missing_driver_reports_candidates() {
        let err = LinkerError::LinkerNotFound {
            tried: vec!["cc".to_string(), "gcc".to_string()],
        };
        assert!(err.to_string().contains("cc, gcc"));
    }

    #[test]
    fn link_with_bogus_driver_is_io_error() {
        let driver = LinkerDriver::with_cc("definitely-not-a-compiler-1427");
        let input = LinkInput {
            objects: vec![PathBuf::from("a.o")],
            output: PathBuf::from("a.out"),
        };
        assert!(matches!(
            driver.link(&input),
            Err(LinkerError::IoError { .. })
        ));
    }
}
