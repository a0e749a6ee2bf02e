//! Two-pass driver behavior: unit creation, main designation, phases.

use inkwell::context::Context;
use inkwell::module::Linkage;
use pretty_assertions::assert_eq;

use crate::tests::{lower, symbol_names};
use crate::{CodegenError, Phase};

#[test]
fn empty_program_is_a_no_op() {
    let llcx = Context::create();
    let (cx, result) = lower(&llcx, "");
    result.expect("lowering succeeds");
    assert_eq!(cx.units().count(), 0);
    assert!(!cx.diagnostics.has_errors());
    assert_eq!(cx.phase(), Phase::BodiesLowered);
}

#[test]
fn single_module_single_function() {
    let llcx = Context::create();
    let (cx, result) = lower(&llcx, "module m { fn f() {} }");
    result.expect("lowering succeeds");

    let registered: Vec<_> = cx.units().map(|(_, u)| u.name.clone()).collect();
    assert_eq!(registered, vec!["m".to_string()]);
    assert_eq!(symbol_names(&cx, "m"), vec![("f".to_string(), true)]);

    let unit = cx.unit(cx.find_unit("m").unwrap());
    let f = unit.llmod.get_function("f").expect("f exists in IR");
    assert_eq!(f.get_linkage(), Linkage::External);
}

#[test]
fn registry_matches_declared_modules_in_order() {
    let llcx = Context::create();
    let source = "module alpha {} module beta {} module gamma {}";
    let (cx, result) = lower(&llcx, source);
    result.expect("lowering succeeds");

    let registered: Vec<_> = cx.units().map(|(_, u)| u.name.clone()).collect();
    assert_eq!(registered, vec!["alpha", "beta", "gamma"]);
}

#[test]
fn duplicate_module_name_is_fatal() {
    let llcx = Context::create();
    let (_cx, result) = lower(&llcx, "module m {} module m {}");
    assert_eq!(
        result,
        Err(CodegenError::DuplicateModule {
            name: "m".to_string()
        })
    );
}

#[test]
fn forward_reference_resolves() {
    // `b` imports `a` although `a` is declared later; pass 1 creates both
    // units before pass 2 imports.
    let llcx = Context::create();
    let source = "module b { @use a as x; } module a { fn f() {} }";
    let (cx, result) = lower(&llcx, source);
    result.expect("lowering succeeds");
    assert!(!cx.diagnostics.has_errors());
    assert_eq!(symbol_names(&cx, "b"), vec![("x.f".to_string(), true)]);
}

#[test]
fn main_module_is_flagged() {
    let llcx = Context::create();
    let source = "module util { fn helper() {} } module app { fn main() {} }";
    let (cx, result) = lower(&llcx, source);
    result.expect("lowering succeeds");

    let main = cx.main_unit().expect("a main unit exists");
    assert_eq!(main.name, "app");
    let flagged = cx.units().filter(|(_, u)| u.is_main).count();
    assert_eq!(flagged, 1);
}

#[test]
fn two_mains_are_fatal() {
    let llcx = Context::create();
    let source = "module a { fn main() {} } module b { fn main() {} }";
    let (_cx, result) = lower(&llcx, source);
    assert_eq!(
        result,
        Err(CodegenError::DuplicateMain {
            first: "a".to_string(),
            second: "b".to_string()
        })
    );
}

#[test]
fn finalize_verifies_and_advances_phase() {
    let llcx = Context::create();
    let (mut cx, result) = lower(&llcx, "module m { fn f() -> int { return 41 + 1; } }");
    result.expect("lowering succeeds");
    assert_eq!(cx.phase(), Phase::BodiesLowered);
    cx.finalize().expect("well-formed IR verifies");
    assert_eq!(cx.phase(), Phase::Finalized);
}

#[test]
fn dump_lists_units_and_symbols() {
    let llcx = Context::create();
    let (cx, result) = lower(
        &llcx,
        "module app { fn main() {} let version: int = 3; }",
    );
    result.expect("lowering succeeds");

    let dump = cx.dump_units();
    assert!(dump.contains("module app (main)"));
    assert!(dump.contains("main (function)"));
    assert!(dump.contains("version (variable)"));
}
