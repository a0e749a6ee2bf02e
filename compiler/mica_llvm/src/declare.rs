//! Function and global declaration helpers.
//!
//! Declarations create symbols without bodies; definitions fill them in
//! during body lowering. Both short-circuit when the IR module already has
//! a value under the requested name, so repeated declaration is safe.

use inkwell::module::Linkage;
use inkwell::types::{BasicTypeEnum, FunctionType};
use inkwell::values::{FunctionValue, GlobalValue};

use crate::context::CodegenCx;
use crate::unit::UnitId;

impl<'ll> CodegenCx<'ll> {
    /// Declare a function in `unit`'s IR module.
    ///
    /// Returns the existing declaration if one with this name is already
    /// present; the requested linkage is only applied to a fresh one.
    pub fn declare_fn(
        &self,
        unit: UnitId,
        name: &str,
        fn_type: FunctionType<'ll>,
        linkage: Linkage,
    ) -> FunctionValue<'ll> {
        let llmod = &self.unit(unit).llmod;
        if let Some(existing) = llmod.get_function(name) {
            return existing;
        }
        llmod.add_function(name, fn_type, Some(linkage))
    }

    /// Declare a global in `unit`'s IR module.
    ///
    /// Same short-circuit behavior as [`CodegenCx::declare_fn`]. The
    /// returned global has no initializer; definition sites set one,
    /// import sites leave it as an external declaration.
    pub fn declare_global(
        &self,
        unit: UnitId,
        name: &str,
        ty: BasicTypeEnum<'ll>,
        linkage: Linkage,
    ) -> GlobalValue<'ll> {
        let llmod = &self.unit(unit).llmod;
        if let Some(existing) = llmod.get_global(name) {
            return existing;
        }
        let global = llmod.add_global(ty, None, name);
        global.set_linkage(linkage);
        global
    }
}
