//! Object-file inspection for the `--debug-objects` dump.
//!
//! Reads emitted objects directly with the `object` crate instead of
//! shelling out to `ls`/`file`/`nm`; output paths never reach a shell.

use std::fmt;
use std::path::Path;

use object::{Object, ObjectSymbol};

/// How many symbols the report lists at most.
const MAX_SYMBOLS: usize = 16;

/// Error type for object inspection.
#[derive(Debug)]
pub enum InspectError {
    Io {
        path: String,
        message: String,
    },
    /// The file is not a recognized object format.
    Parse {
        path: String,
        message: String,
    },
}

impl fmt::Display for InspectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => {
                write!(f, "failed to read object file '{path}': {message}")
            }
            Self::Parse { path, message } => {
                write!(f, "failed to parse object file '{path}': {message}")
            }
        }
    }
}

impl std::error::Error for InspectError {}

/// Inspection summary of one object file.
#[derive(Debug, Clone)]
pub struct ObjectReport {
    pub path: String,
    pub size_bytes: u64,
    pub format: String,
    /// First [`MAX_SYMBOLS`] symbol names, definition order.
    pub symbols: Vec<String>,
    /// Total symbol count, including those not listed.
    pub symbol_count: usize,
}

impl fmt::Display for ObjectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({} bytes, {})",
            self.path, self.size_bytes, self.format
        )?;
        for name in &self.symbols {
            writeln!(f, "  {name}")?;
        }
        if self.symbol_count > self.symbols.len() {
            writeln!(f, "  ... {} more", self.symbol_count - self.symbols.len())?;
        }
        Ok(())
    }
}

/// Inspect an emitted object file.
pub fn inspect_object(path: &Path) -> Result<ObjectReport, InspectError> {
    let display = path.to_string_lossy().into_owned();
    let bytes = std::fs::read(path).map_err(|e| InspectError::Io {
        path: display.clone(),
        message: e.to_string(),
    })?;
    let file = object::File::parse(&*bytes).map_err(|e| InspectError::Parse {
        path: display.clone(),
        message: e.to_string(),
    })?;

    let mut symbols = Vec::new();
    let mut symbol_count = 0;
    for symbol in file.symbols() {
        symbol_count += 1;
        if symbols.len() < MAX_SYMBOLS {
            if let Ok(name) = symbol.name() {
                if !name.is_empty() {
                    symbols.push(name.to_string());
                }
            }
        }
    }

    Ok(ObjectReport {
        path: display,
        size_bytes: bytes.len() as u64,
        format: format!("{:?}", file.format()),
        symbols,
        symbol_count,
    })
}
