//! Backend test suite.
//!
//! Tests drive the full pipeline: source text through the lexer and parser
//! into `lower_program`, then assert on symbol tables, linkage and IR.

mod driver_tests;
mod import_tests;
mod lookup_tests;

use inkwell::context::Context;

use mica_diagnostic::DiagnosticQueue;

use crate::{CodegenCx, CodegenError};

/// Lower `source` into a fresh context borrowing `llcx`.
///
/// Diagnostics are recorded quietly; tests inspect the queue.
pub(crate) fn lower<'ll>(
    llcx: &'ll Context,
    source: &str,
) -> (CodegenCx<'ll>, Result<(), CodegenError>) {
    let program = mica_parse::parse_source(source).expect("test source parses");
    let mut cx = CodegenCx::new(llcx, DiagnosticQueue::quiet());
    let result = cx.lower_program(&program);
    (cx, result)
}

/// Symbol table of a unit as `(name, is_function)` pairs, insertion order.
pub(crate) fn symbol_names(cx: &CodegenCx<'_>, module: &str) -> Vec<(String, bool)> {
    let id = cx.find_unit(module).expect("unit exists");
    cx.unit(id)
        .symbols()
        .iter()
        .map(|s| (s.name.clone(), s.is_function()))
        .collect()
}
