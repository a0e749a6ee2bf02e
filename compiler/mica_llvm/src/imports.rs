//! Cross-module import resolution and symbol lookup.
//!
//! `@use` introduces external declarations in the referencing unit for
//! every public symbol of the referenced unit. Imports declare, they never
//! define: at link time symbols resolve by their IR name, which stays the
//! unqualified base name. The qualified `alias.base` key exists only inside
//! the compiler's symbol tables, so several aliases can point at one
//! external declaration without clashing.

use inkwell::module::Linkage;
use inkwell::types::{BasicTypeEnum, FunctionType};

use crate::context::CodegenCx;
use crate::errors::CodegenError;
use crate::unit::{Symbol, SymbolValue, UnitId};

/// What an exported symbol materializes as in the importing unit.
enum ExportKind<'ll> {
    Function(FunctionType<'ll>),
    Global,
}

/// A public symbol of the source unit, snapshot before mutation of the
/// destination starts.
struct Export<'ll> {
    base: String,
    kind: ExportKind<'ll>,
    ty: BasicTypeEnum<'ll>,
}

impl<'ll> CodegenCx<'ll> {
    /// Materialize external declarations in `dest` for every public symbol
    /// of `src`, filing each under `alias.base` (or plain `base` without an
    /// alias).
    ///
    /// Re-running the same import is a no-op. A function and a variable
    /// colliding under one imported name is rejected with
    /// [`CodegenError::DuplicateImport`]; the directive's remaining symbols
    /// are not processed.
    pub fn import_module_symbols(
        &mut self,
        dest: UnitId,
        src: UnitId,
        alias: Option<&str>,
    ) -> Result<(), CodegenError> {
        let exports = self.collect_exports(src);
        tracing::debug!(
            from = %self.unit(src).name,
            into = %self.unit(dest).name,
            alias,
            count = exports.len(),
            "importing module symbols"
        );

        for export in exports {
            let imported = match alias {
                Some(alias) => format!("{alias}.{}", export.base),
                None => export.base.clone(),
            };

            // Idempotence: an identical import is already filed.
            if let Some(existing) = self.unit(dest).find_symbol(&imported) {
                let same_kind = existing.is_function()
                    == matches!(export.kind, ExportKind::Function(_));
                if same_kind {
                    continue;
                }
                return Err(CodegenError::DuplicateImport { name: imported });
            }

            match export.kind {
                ExportKind::Function(fn_type) => {
                    // A local definition already owns the imported name in
                    // the IR module; nothing to materialize.
                    if self.unit(dest).llmod.get_function(&imported).is_some() {
                        continue;
                    }
                    // The declaration's IR name is the unqualified base, so
                    // two aliases of one target share one declaration.
                    let decl =
                        self.declare_fn(dest, &export.base, fn_type, Linkage::External);
                    self.unit_mut(dest).add_symbol(
                        imported,
                        SymbolValue::Function(decl),
                        export.ty,
                    );
                }
                ExportKind::Global => {
                    if self.unit(dest).llmod.get_global(&imported).is_some() {
                        continue;
                    }
                    let decl =
                        self.declare_global(dest, &export.base, export.ty, Linkage::External);
                    self.unit_mut(dest)
                        .add_symbol(imported, SymbolValue::Global(decl), export.ty);
                }
            }
        }
        Ok(())
    }

    /// Snapshot the publicly exported symbols of `src` in insertion order.
    ///
    /// Public means: the source IR module holds a function (respectively
    /// global) under the symbol's name whose linkage is external. Private
    /// symbols are skipped silently; so are aliased import records, whose
    /// qualified names never match an IR value.
    fn collect_exports(&self, src: UnitId) -> Vec<Export<'ll>> {
        let unit = self.unit(src);
        let mut exports = Vec::new();
        for symbol in unit.symbols() {
            if symbol.is_function() {
                let Some(f) = unit.llmod.get_function(&symbol.name) else {
                    continue;
                };
                if f.get_linkage() != Linkage::External {
                    continue;
                }
                exports.push(Export {
                    base: symbol.name.clone(),
                    kind: ExportKind::Function(f.get_type()),
                    ty: symbol.ty,
                });
            } else {
                let Some(g) = unit.llmod.get_global(&symbol.name) else {
                    continue;
                };
                if g.get_linkage() != Linkage::External {
                    continue;
                }
                exports.push(Export {
                    base: symbol.name.clone(),
                    kind: ExportKind::Global,
                    ty: symbol.ty,
                });
            }
        }
        exports
    }

    /// Unified name resolution across units.
    ///
    /// The current unit's table is searched first by the literal name. On a
    /// miss, other units are scanned in creation order, matching only
    /// function symbols whose backing IR function has external linkage
    /// there. The fallback supports whole-program analyses and diagnostics;
    /// it never materializes a cross-unit reference; emission in the
    /// current unit still requires an explicit `@use`.
    #[must_use]
    pub fn find_symbol_with_module_support(
        &self,
        name: &str,
    ) -> Option<(UnitId, &Symbol<'ll>)> {
        let current = self.current();
        if let Some(id) = current {
            if let Some(symbol) = self.unit(id).find_symbol(name) {
                return Some((id, symbol));
            }
        }
        for (id, unit) in self.units() {
            if Some(id) == current {
                continue;
            }
            if let Some(symbol) = unit.find_symbol(name) {
                let public_fn = symbol
                    .function()
                    .is_some_and(|f| f.get_linkage() == Linkage::External);
                if public_fn {
                    return Some((id, symbol));
                }
            }
        }
        None
    }
}
