//! Code generation context.
//!
//! [`CodegenCx`] owns every per-program piece of backend state: the unit
//! registry, the current-unit cursor, the shared instruction builder, the
//! diagnostic queue, and the compilation phase. It is single-threaded and
//! lives from the start of lowering until artifacts are emitted.

use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum, FunctionType};
use inkwell::values::BasicValueEnum;

use mica_diagnostic::{Diagnostic, DiagnosticQueue};
use mica_ir::ast::TypeName;

use crate::errors::CodegenError;
use crate::unit::{ModuleUnit, UnitId};

/// Compilation phase of one program.
///
/// Pass 2 never creates units; the phase field turns that rule into a
/// checked invariant instead of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Context constructed, nothing lowered.
    Fresh,
    /// Pass 1 complete: every module has a unit.
    UnitsCreated,
    /// Pass 2 complete: bodies lowered, imports materialized.
    BodiesLowered,
    /// Units verified; ready for object emission and linking.
    Finalized,
}

/// Per-program code generation state.
pub struct CodegenCx<'ll> {
    /// The LLVM context owning all types and values.
    pub llcx: &'ll Context,
    /// Shared instruction builder, repositioned per function body.
    pub builder: Builder<'ll>,
    /// Diagnostic sink for recoverable errors.
    pub diagnostics: DiagnosticQueue,
    units: Vec<ModuleUnit<'ll>>,
    current: Option<UnitId>,
    phase: Phase,
}

impl<'ll> CodegenCx<'ll> {
    /// Create a fresh context.
    #[must_use]
    pub fn new(llcx: &'ll Context, diagnostics: DiagnosticQueue) -> Self {
        CodegenCx {
            llcx,
            builder: llcx.create_builder(),
            diagnostics,
            units: Vec::new(),
            current: None,
            phase: Phase::Fresh,
        }
    }

    // -- Unit registry (insertion-ordered) --

    /// Append a new unit named `name`.
    ///
    /// Fails if a unit with this name already exists; module names are
    /// unique within a program.
    pub fn create_unit(&mut self, name: &str) -> Result<UnitId, CodegenError> {
        assert!(
            self.phase == Phase::Fresh,
            "units may only be created during pass 1"
        );
        if self.find_unit(name).is_some() {
            return Err(CodegenError::DuplicateModule {
                name: name.to_owned(),
            });
        }
        let llmod = self.llcx.create_module(name);
        self.units.push(ModuleUnit::new(name.to_owned(), llmod));
        let id = UnitId(self.units.len() - 1);
        tracing::debug!(module = name, ?id, "created compilation unit");
        Ok(id)
    }

    /// Find a unit by module name. Linear scan; the registry is small.
    #[must_use]
    pub fn find_unit(&self, name: &str) -> Option<UnitId> {
        self.units.iter().position(|u| u.name == name).map(UnitId)
    }

    /// Units in creation order.
    pub fn units(&self) -> impl Iterator<Item = (UnitId, &ModuleUnit<'ll>)> {
        self.units.iter().enumerate().map(|(i, u)| (UnitId(i), u))
    }

    #[must_use]
    pub fn unit(&self, id: UnitId) -> &ModuleUnit<'ll> {
        &self.units[id.0]
    }

    pub(crate) fn unit_mut(&mut self, id: UnitId) -> &mut ModuleUnit<'ll> {
        &mut self.units[id.0]
    }

    /// Set the active unit for subsequent lowering.
    pub fn set_current(&mut self, id: UnitId) {
        self.current = Some(id);
    }

    /// The active unit, if any.
    #[must_use]
    pub fn current(&self) -> Option<UnitId> {
        self.current
    }

    /// The active unit's state. Panics if no unit is current; lowering
    /// always sets one before touching bodies.
    #[must_use]
    pub fn current_unit(&self) -> &ModuleUnit<'ll> {
        let id = self.current.expect("no current unit set");
        &self.units[id.0]
    }

    /// The unit flagged as the program's entry, if any.
    #[must_use]
    pub fn main_unit(&self) -> Option<&ModuleUnit<'ll>> {
        self.units.iter().find(|u| u.is_main)
    }

    // -- Phase machine --

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn advance_phase(&mut self, next: Phase) {
        let ok = matches!(
            (self.phase, next),
            (Phase::Fresh, Phase::UnitsCreated)
                | (Phase::UnitsCreated, Phase::BodiesLowered)
                | (Phase::BodiesLowered, Phase::Finalized)
        );
        assert!(ok, "invalid phase transition {:?} -> {next:?}", self.phase);
        self.phase = next;
    }

    /// Verify every unit's IR and move to the `Finalized` phase.
    ///
    /// Object emission and linking consume the context afterwards.
    pub fn finalize(&mut self) -> Result<(), CodegenError> {
        for unit in &self.units {
            unit.llmod.verify().map_err(|e| CodegenError::Verify {
                module: unit.name.clone(),
                message: e.to_string(),
            })?;
        }
        self.advance_phase(Phase::Finalized);
        Ok(())
    }

    // -- Diagnostics --

    pub(crate) fn diag(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.emit(diagnostic);
    }

    // -- Type helpers --

    /// LLVM representation of a surface type. `void` has no value
    /// representation and is handled at function-type level.
    #[must_use]
    pub fn llvm_type(&self, ty: TypeName) -> BasicTypeEnum<'ll> {
        match ty {
            TypeName::Int => self.llcx.i64_type().into(),
            TypeName::Float => self.llcx.f64_type().into(),
            TypeName::Bool => self.llcx.bool_type().into(),
            // Void values cannot exist; i64 keeps defensive paths total.
            TypeName::Void => self.llcx.i64_type().into(),
        }
    }

    /// Function type from surface parameter and return types.
    #[must_use]
    pub fn fn_type(&self, params: &[TypeName], ret: TypeName) -> FunctionType<'ll> {
        let param_types: Vec<BasicMetadataTypeEnum<'ll>> = params
            .iter()
            .map(|&ty| self.llvm_type(ty).into())
            .collect();
        match ret {
            TypeName::Void => self.llcx.void_type().fn_type(&param_types, false),
            other => self.llvm_type(other).fn_type(&param_types, false),
        }
    }

    /// Zero value of a type, used when a non-void function body falls off
    /// its end without a `return`.
    #[must_use]
    pub fn default_value(&self, ty: BasicTypeEnum<'ll>) -> BasicValueEnum<'ll> {
        match ty {
            BasicTypeEnum::IntType(t) => t.const_int(0, false).into(),
            BasicTypeEnum::FloatType(t) => t.const_float(0.0).into(),
            BasicTypeEnum::PointerType(t) => t.const_null().into(),
            BasicTypeEnum::StructType(t) => t.get_undef().into(),
            BasicTypeEnum::ArrayType(t) => t.get_undef().into(),
            BasicTypeEnum::VectorType(t) => t.get_undef().into(),
            BasicTypeEnum::ScalableVectorType(t) => t.get_undef().into(),
        }
    }

    /// Debug dump of every unit: name, main-ness, symbols in order.
    #[must_use]
    pub fn dump_units(&self) -> String {
        self.units.iter().map(ModuleUnit::dump).collect()
    }
}
