//! Import resolution: materialization, idempotence, visibility, ordering.

use inkwell::context::Context;
use inkwell::module::Linkage;
use pretty_assertions::assert_eq;

use crate::tests::{lower, symbol_names};

#[test]
fn import_with_alias_files_qualified_symbols() {
    let llcx = Context::create();
    let source = "module a { fn hello() {} } module b { @use a as x; fn g() { x.hello(); } }";
    let (cx, result) = lower(&llcx, source);
    result.expect("lowering succeeds");
    assert!(!cx.diagnostics.has_errors());

    assert_eq!(
        symbol_names(&cx, "b"),
        vec![("x.hello".to_string(), true), ("g".to_string(), true)]
    );

    // The external declaration's IR name is the unqualified base.
    let b = cx.unit(cx.find_unit("b").unwrap());
    let decl = b.llmod.get_function("hello").expect("declaration exists");
    assert_eq!(decl.get_linkage(), Linkage::External);
    assert_eq!(decl.count_basic_blocks(), 0, "declaration, not definition");

    // The call lowers to a direct call of that declaration.
    let ir = b.llmod.print_to_string().to_string();
    assert!(ir.contains("call"), "call missing from IR:\n{ir}");
    assert!(ir.contains("@hello"), "callee missing from IR:\n{ir}");
}

#[test]
fn import_without_alias_uses_base_names() {
    let llcx = Context::create();
    let source = "module a { fn f() {} } module b { @use a; }";
    let (cx, result) = lower(&llcx, source);
    result.expect("lowering succeeds");
    assert_eq!(symbol_names(&cx, "b"), vec![("f".to_string(), true)]);

    // A later reference in `b` resolves to the external declaration.
    let source2 = "module a { fn f() {} } module b { @use a; fn g() { f(); } }";
    let llcx2 = Context::create();
    let (cx2, result2) = lower(&llcx2, source2);
    result2.expect("lowering succeeds");
    assert!(!cx2.diagnostics.has_errors());
}

#[test]
fn reimport_is_idempotent() {
    let llcx = Context::create();
    let source = "module a { fn f() {} } module b { @use a as x; @use a as x; @use a as x; }";
    let (cx, result) = lower(&llcx, source);
    result.expect("lowering succeeds");
    assert!(!cx.diagnostics.has_errors());
    assert_eq!(symbol_names(&cx, "b"), vec![("x.f".to_string(), true)]);
}

#[test]
fn reimport_without_alias_is_idempotent() {
    let llcx = Context::create();
    let source = "module a { fn f() {} } module b { @use a; @use a; }";
    let (cx, result) = lower(&llcx, source);
    result.expect("lowering succeeds");
    assert_eq!(symbol_names(&cx, "b"), vec![("f".to_string(), true)]);
}

#[test]
fn private_symbols_are_skipped() {
    let llcx = Context::create();
    let source = "module a { fn f() {} priv fn g() {} } module b { @use a as x; }";
    let (cx, result) = lower(&llcx, source);
    result.expect("lowering succeeds");

    // Only the public symbol crosses the module boundary.
    assert_eq!(symbol_names(&cx, "b"), vec![("x.f".to_string(), true)]);
    let b = cx.unit(cx.find_unit("b").unwrap());
    assert!(b.find_symbol("x.g").is_none());
    assert!(b.llmod.get_function("g").is_none());
}

#[test]
fn private_globals_are_skipped_too() {
    let llcx = Context::create();
    let source =
        "module a { let shared: int = 1; priv let hidden: int = 2; } module b { @use a as x; }";
    let (cx, result) = lower(&llcx, source);
    result.expect("lowering succeeds");
    assert_eq!(symbol_names(&cx, "b"), vec![("x.shared".to_string(), false)]);
}

#[test]
fn unknown_module_is_diagnosed_and_skipped() {
    let llcx = Context::create();
    let source = "module b { @use nope as x; }";
    let (cx, result) = lower(&llcx, source);
    result.expect("lowering continues past the diagnostic");

    assert_eq!(cx.diagnostics.error_count(), 1);
    let message = &cx.diagnostics.diagnostics()[0].message;
    assert!(message.contains("'nope'"), "got: {message}");

    // The unit itself exists and stays empty.
    assert_eq!(symbol_names(&cx, "b"), vec![]);
}

#[test]
fn later_directives_survive_an_unknown_module() {
    let llcx = Context::create();
    let source = "module a { fn f() {} } module b { @use nope; @use a as x; }";
    let (cx, result) = lower(&llcx, source);
    result.expect("lowering continues");
    assert_eq!(cx.diagnostics.error_count(), 1);
    assert_eq!(symbol_names(&cx, "b"), vec![("x.f".to_string(), true)]);
}

#[test]
fn two_aliases_share_one_declaration() {
    let llcx = Context::create();
    let source = "module a { fn s() {} } module b { @use a as p; @use a as q; }";
    let (cx, result) = lower(&llcx, source);
    result.expect("lowering succeeds");

    assert_eq!(
        symbol_names(&cx, "b"),
        vec![("p.s".to_string(), true), ("q.s".to_string(), true)]
    );

    // Both table entries point at a single external declaration named `s`.
    let b = cx.unit(cx.find_unit("b").unwrap());
    let p = b.find_symbol("p.s").unwrap().function().unwrap();
    let q = b.find_symbol("q.s").unwrap().function().unwrap();
    assert_eq!(p, q);
    let ir = b.llmod.print_to_string().to_string();
    assert_eq!(ir.matches("declare").count(), 1, "one declaration:\n{ir}");
}

#[test]
fn imported_order_mirrors_source_symbol_order() {
    let llcx = Context::create();
    let source = "module a { fn one() {} fn two() {} let three: int = 3; } \
                  module b { @use a as x; }";
    let (cx, result) = lower(&llcx, source);
    result.expect("lowering succeeds");
    assert_eq!(
        symbol_names(&cx, "b"),
        vec![
            ("x.one".to_string(), true),
            ("x.two".to_string(), true),
            ("x.three".to_string(), false)
        ]
    );
}

#[test]
fn imports_interleave_with_definitions_at_the_use_site() {
    let llcx = Context::create();
    let source = "module a { fn f() {} } \
                  module b { fn before() {} @use a as x; fn after() {} }";
    let (cx, result) = lower(&llcx, source);
    result.expect("lowering succeeds");
    assert_eq!(
        symbol_names(&cx, "b"),
        vec![
            ("before".to_string(), true),
            ("x.f".to_string(), true),
            ("after".to_string(), true)
        ]
    );
}

#[test]
fn function_variable_collision_is_rejected() {
    // `a` exports function `f`, `c` exports variable `f`; both imported
    // under alias `x` would collide on `x.f` with different kinds.
    let llcx = Context::create();
    let source = "module a { fn f() {} } module c { let f: int = 1; } \
                  module b { @use a as x; @use c as x; }";
    let (cx, result) = lower(&llcx, source);
    result.expect("lowering continues past the diagnostic");

    assert_eq!(cx.diagnostics.error_count(), 1);
    let message = &cx.diagnostics.diagnostics()[0].message;
    assert!(message.contains("x.f"), "got: {message}");

    // The function import stands; the colliding variable was rejected.
    assert_eq!(symbol_names(&cx, "b"), vec![("x.f".to_string(), true)]);
}

#[test]
fn import_cycles_are_safe() {
    let llcx = Context::create();
    let source = "module a { @use b as other; fn fa() {} } \
                  module b { @use a as other; fn fb() {} }";
    let (cx, result) = lower(&llcx, source);
    result.expect("lowering succeeds");
    assert!(!cx.diagnostics.has_errors());

    // `a` imported `b`'s symbol before `b`'s body was lowered, so the
    // import set reflects `b`'s state at that point: empty. `b` imports
    // `a`'s already-lowered body.
    assert_eq!(symbol_names(&cx, "a"), vec![("fa".to_string(), true)]);
    assert_eq!(
        symbol_names(&cx, "b"),
        vec![("other.fa".to_string(), true), ("fb".to_string(), true)]
    );
}

#[test]
fn symbol_order_is_stable_across_runs() {
    let source = "module a { fn f() {} let g: int = 1; fn h() {} } \
                  module b { @use a as x; fn local() {} }";

    let llcx1 = Context::create();
    let (cx1, r1) = lower(&llcx1, source);
    r1.expect("first run succeeds");
    let llcx2 = Context::create();
    let (cx2, r2) = lower(&llcx2, source);
    r2.expect("second run succeeds");

    assert_eq!(symbol_names(&cx1, "a"), symbol_names(&cx2, "a"));
    assert_eq!(symbol_names(&cx1, "b"), symbol_names(&cx2, "b"));
}
