//! Build pipeline and artifact management.

use std::path::{Path, PathBuf};

/// Options accumulated from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Positional source path.
    pub source: Option<PathBuf>,
    /// `--name`: executable name override; defaults to the main module's.
    pub name: Option<String>,
    /// `--save`: persist per-unit `.ll` files.
    pub save: bool,
    /// `--debug-objects`: print an inspection dump of each emitted object.
    pub debug_objects: bool,
    /// `-v`: chattier progress output.
    pub verbose: bool,
}

impl BuildOptions {
    /// Output directory for artifacts: `MICA_BUILD_DIR` or `build/`.
    #[must_use]
    pub fn out_dir() -> PathBuf {
        std::env::var_os("MICA_BUILD_DIR")
            .map_or_else(|| PathBuf::from("build"), PathBuf::from)
    }
}

/// Remove the build artifact directory (`--clean`).
///
/// A missing directory is a successful clean.
pub fn clean_artifacts(out_dir: &Path) -> Result<(), std::io::Error> {
    match std::fs::remove_dir_all(out_dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Run the build. Returns the process exit code.
#[must_use]
pub fn run_build(options: &BuildOptions) -> i32 {
    let Some(source_path) = options.source.as_deref() else {
        eprintln!("error: missing source file");
        return 1;
    };

    let source = match std::fs::read_to_string(source_path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: cannot read '{}': {e}", source_path.display());
            return 1;
        }
    };

    let program = match mica_parse::parse_source(&source) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };

    tracing::debug!(
        modules = program.modules.len(),
        source = %source_path.display(),
        "parsed program"
    );
    if options.verbose {
        eprintln!(
            "parsed {} module(s) from '{}'",
            program.modules.len(),
            source_path.display()
        );
    }

    backend::compile(&program, options)
}

#[cfg(feature = "llvm")]
mod backend {
    use mica_diagnostic::DiagnosticQueue;
    use mica_ir::ast::Program;
    use mica_llvm::aot::{inspect_object, LinkInput, LinkerDriver, ObjectEmitter};
    use mica_llvm::{CodegenCx, Context};

    use super::BuildOptions;

    /// Lower, verify, emit and link. Returns the process exit code.
    pub(super) fn compile(program: &Program, options: &BuildOptions) -> i32 {
        let llcx = Context::create();
        let mut cx = CodegenCx::new(&llcx, DiagnosticQueue::new());

        if let Err(e) = cx.lower_program(program) {
            eprintln!("error: {e}");
            return 1;
        }
        if cx.diagnostics.has_errors() {
            eprintln!(
                "error: {} diagnostic(s) emitted; artifacts not written",
                cx.diagnostics.error_count()
            );
            return 1;
        }
        if options.verbose {
            eprint!("{}", cx.dump_units());
        }
        if let Err(e) = cx.finalize() {
            eprintln!("error: {e}");
            return 1;
        }

        let out_dir = BuildOptions::out_dir();
        if let Err(e) = std::fs::create_dir_all(&out_dir) {
            eprintln!("error: cannot create '{}': {e}", out_dir.display());
            return 1;
        }

        let emitter = match ObjectEmitter::native() {
            Ok(emitter) => emitter,
            Err(e) => {
                eprintln!("error: {e}");
                return 1;
            }
        };

        let mut objects = Vec::new();
        for (_, unit) in cx.units() {
            if let Err(e) = emitter.configure_module(&unit.llmod) {
                eprintln!("error: {e}");
                return 1;
            }
            if options.save {
                let ll_path = out_dir.join(format!("{}.ll", unit.name));
                if let Err(e) = emitter.emit_llvm_ir(&unit.llmod, &ll_path) {
                    eprintln!("error: {e}");
                    return 1;
                }
            }
            let obj_path = out_dir.join(format!("{}.o", unit.name));
            if let Err(e) = emitter.emit_object(&unit.llmod, &obj_path) {
                eprintln!("error: {e}");
                return 1;
            }
            objects.push(obj_path);
        }

        if options.debug_objects {
            for path in &objects {
                match inspect_object(path) {
                    Ok(report) => eprint!("{report}"),
                    Err(e) => eprintln!("warning: {e}"),
                }
            }
        }

        // Executable name defaults to the main unit's module name.
        let exe_name = match (&options.name, cx.main_unit()) {
            (Some(name), _) => name.clone(),
            (None, Some(main)) => main.name.clone(),
            (None, None) => {
                eprintln!("error: no module defines 'main'; use --name to link a library-style program");
                return 1;
            }
        };
        let output = out_dir.join(exe_name);

        let driver = match LinkerDriver::detect() {
            Ok(driver) => driver,
            Err(e) => {
                eprintln!("error: {e}");
                return 1;
            }
        };
        let input = LinkInput {
            objects,
            output: output.clone(),
        };
        if let Err(e) = driver.link(&input) {
            eprintln!("error: {e}");
            return 1;
        }

        if options.verbose {
            eprintln!("linked '{}'", output.display());
        }
        0
    }
}

#[cfg(not(feature = "llvm"))]
mod backend {
    use mica_ir::ast::Program;

    use super::BuildOptions;

    /// Front-end only: report and stop before code generation.
    pub(super) fn compile(_program: &Program, _options: &BuildOptions) -> i32 {
        eprintln!(
            "error: this build of mica has no LLVM backend; rebuild with `--features llvm`"
        );
        2
    }
}
