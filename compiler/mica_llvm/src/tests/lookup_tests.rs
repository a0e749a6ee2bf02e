//! Unified symbol lookup across units.

use inkwell::context::Context;
use pretty_assertions::assert_eq;

use crate::tests::lower;

#[test]
fn current_unit_wins() {
    let llcx = Context::create();
    let source = "module a { fn f() {} } module b { fn f() {} }";
    let (mut cx, result) = lower(&llcx, source);
    result.expect("lowering succeeds");

    let b = cx.find_unit("b").unwrap();
    cx.set_current(b);
    let (unit_id, _) = cx
        .find_symbol_with_module_support("f")
        .expect("f resolves");
    assert_eq!(unit_id, b);
}

#[test]
fn falls_back_to_public_functions_in_other_units() {
    let llcx = Context::create();
    let source = "module a { fn helper() {} } module b { fn local() {} }";
    let (mut cx, result) = lower(&llcx, source);
    result.expect("lowering succeeds");

    let a = cx.find_unit("a").unwrap();
    let b = cx.find_unit("b").unwrap();
    cx.set_current(b);
    let (unit_id, symbol) = cx
        .find_symbol_with_module_support("helper")
        .expect("helper is visible for analysis");
    assert_eq!(unit_id, a);
    assert!(symbol.is_function());
}

#[test]
fn private_functions_do_not_cross_units() {
    let llcx = Context::create();
    let source = "module a { priv fn secret() {} } module b { fn local() {} }";
    let (mut cx, result) = lower(&llcx, source);
    result.expect("lowering succeeds");

    let b = cx.find_unit("b").unwrap();
    cx.set_current(b);
    assert!(cx.find_symbol_with_module_support("secret").is_none());
}

#[test]
fn variables_do_not_cross_units() {
    // The fallback scan matches functions only; globals need an import.
    let llcx = Context::create();
    let source = "module a { let counter: int = 0; } module b { fn local() {} }";
    let (mut cx, result) = lower(&llcx, source);
    result.expect("lowering succeeds");

    let b = cx.find_unit("b").unwrap();
    cx.set_current(b);
    assert!(cx.find_symbol_with_module_support("counter").is_none());
}

#[test]
fn cross_unit_hit_is_not_emitted_without_use() {
    // A call to a function that only exists in another unit is diagnosed;
    // lookup never materializes the reference implicitly.
    let llcx = Context::create();
    let source = "module a { fn helper() {} } module b { fn g() { helper(); } }";
    let (cx, result) = lower(&llcx, source);
    result.expect("lowering continues");

    assert_eq!(cx.diagnostics.error_count(), 1);
    let message = &cx.diagnostics.diagnostics()[0].message;
    assert!(message.contains("helper"), "got: {message}");

    // No external declaration leaked into b.
    let b = cx.unit(cx.find_unit("b").unwrap());
    assert!(b.llmod.get_function("helper").is_none());
}
