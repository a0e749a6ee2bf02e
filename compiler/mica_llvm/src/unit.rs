//! Module compilation units and their symbol tables.
//!
//! A [`ModuleUnit`] is the per-module state of code generation: the backing
//! LLVM module, an insertion-ordered symbol table, and the main-module flag.
//! Units are identified by [`UnitId`], an index into the context's unit
//! list; the list itself preserves creation order, which equals the source
//! order of module declarations.

use std::fmt::Write as _;

use inkwell::module::{Linkage, Module};
use inkwell::types::BasicTypeEnum;
use inkwell::values::{FunctionValue, GlobalValue};

/// Identity of a unit within one code generation context.
///
/// Stable for the lifetime of the context; units are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitId(pub(crate) usize);

impl UnitId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// The IR value a symbol names.
///
/// The function-vs-variable tag of the symbol record is carried by the
/// variant, not a separate flag.
#[derive(Debug, Clone, Copy)]
pub enum SymbolValue<'ll> {
    Function(FunctionValue<'ll>),
    Global(GlobalValue<'ll>),
}

/// A named, typed IR value visible inside a unit's symbol table.
///
/// `name` is the in-compiler key: a bare local name for definitions, or a
/// qualified `alias.base` for aliased imports. The IR-level link name stays
/// unqualified either way. Visibility is encoded only on the IR value's
/// linkage; the record carries no flag.
#[derive(Debug, Clone)]
pub struct Symbol<'ll> {
    pub name: String,
    pub value: SymbolValue<'ll>,
    pub ty: BasicTypeEnum<'ll>,
}

impl<'ll> Symbol<'ll> {
    #[must_use]
    pub fn is_function(&self) -> bool {
        matches!(self.value, SymbolValue::Function(_))
    }

    /// The backing function, if this symbol names one.
    #[must_use]
    pub fn function(&self) -> Option<FunctionValue<'ll>> {
        match self.value {
            SymbolValue::Function(f) => Some(f),
            SymbolValue::Global(_) => None,
        }
    }

    /// The backing global, if this symbol names a variable.
    #[must_use]
    pub fn global(&self) -> Option<GlobalValue<'ll>> {
        match self.value {
            SymbolValue::Global(g) => Some(g),
            SymbolValue::Function(_) => None,
        }
    }

    /// Whether the backing IR value has external linkage.
    #[must_use]
    pub fn is_public(&self) -> bool {
        let linkage = match self.value {
            SymbolValue::Function(f) => f.get_linkage(),
            SymbolValue::Global(g) => g.get_linkage(),
        };
        linkage == Linkage::External
    }
}

/// Per-module compilation state.
pub struct ModuleUnit<'ll> {
    /// Declared module name; globally unique across the program.
    pub name: String,
    /// Backing LLVM module.
    pub llmod: Module<'ll>,
    /// Symbol records in insertion order.
    symbols: Vec<Symbol<'ll>>,
    /// Exactly one unit per program has this set.
    pub is_main: bool,
}

impl<'ll> ModuleUnit<'ll> {
    pub(crate) fn new(name: String, llmod: Module<'ll>) -> Self {
        ModuleUnit {
            name,
            llmod,
            symbols: Vec::new(),
            is_main: false,
        }
    }

    /// Append a symbol. No duplicate check at this layer; callers pre-check
    /// with [`ModuleUnit::find_symbol`].
    pub fn add_symbol(
        &mut self,
        name: impl Into<String>,
        value: SymbolValue<'ll>,
        ty: BasicTypeEnum<'ll>,
    ) {
        self.symbols.push(Symbol {
            name: name.into(),
            value,
            ty,
        });
    }

    /// Look up a symbol by its exact in-compiler name.
    #[must_use]
    pub fn find_symbol(&self, name: &str) -> Option<&Symbol<'ll>> {
        self.symbols.iter().find(|s| s.name == name)
    }

    /// Symbols in insertion order.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol<'ll>] {
        &self.symbols
    }

    /// Human-readable dump: name, main-ness, symbol name + kind list.
    ///
    /// Diagnostic only; not part of the compilation contract.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "module {}{}",
            self.name,
            if self.is_main { " (main)" } else { "" }
        );
        for symbol in &self.symbols {
            let kind = if symbol.is_function() {
                "function"
            } else {
                "variable"
            };
            let _ = writeln!(out, "  {} ({kind})", symbol.name);
        }
        out
    }
}
