//! Program lowering driver.
//!
//! Two passes over the program AST:
//!
//! 1. **Pass 1** creates one compilation unit per module declaration, in
//!    source order, and flags the main module.
//! 2. **Pass 2** re-selects each unit and lowers its body items in textual
//!    order, routing `@use` directives to the import resolver.
//!
//! The split lets a `@use` reference a module declared textually later,
//! and keeps import cycles safe: both units exist before either imports.

use inkwell::module::Linkage;

use mica_diagnostic::{unknown_module, Diagnostic};
use mica_ir::ast::{FunctionDecl, GlobalDecl, Item, ModuleDecl, Program, Stmt, TypeName, UseDecl};

use crate::builder::Locals;
use crate::context::{CodegenCx, Phase};
use crate::errors::CodegenError;
use crate::unit::SymbolValue;

impl<'ll> CodegenCx<'ll> {
    /// Lower a whole program.
    ///
    /// Fatal errors (duplicate module names, duplicate mains) abort and
    /// propagate; recoverable problems land in the diagnostic queue and
    /// lowering continues so one run reports as much as possible.
    pub fn lower_program(&mut self, program: &Program) -> Result<(), CodegenError> {
        // Pass 1: create every unit before any body is looked at.
        for module in &program.modules {
            let id = self.create_unit(&module.name)?;
            if module.defines_main() {
                if let Some(main) = self.main_unit() {
                    return Err(CodegenError::DuplicateMain {
                        first: main.name.clone(),
                        second: module.name.clone(),
                    });
                }
                self.unit_mut(id).is_main = true;
            }
            self.set_current(id);
        }
        self.advance_phase(Phase::UnitsCreated);

        // Pass 2: lower bodies in source order.
        for module in &program.modules {
            self.lower_module_body(module);
        }
        self.advance_phase(Phase::BodiesLowered);
        Ok(())
    }

    /// Lower one module's body under its unit.
    ///
    /// Units are never created here; an unregistered module name means the
    /// AST changed between passes, which the defensive check below treats
    /// as a skipped node rather than corrupting registry order.
    pub fn lower_module_body(&mut self, module: &ModuleDecl) {
        let Some(id) = self.find_unit(&module.name) else {
            tracing::debug!(module = %module.name, "module body without a unit; skipping");
            return;
        };
        self.set_current(id);
        for item in &module.body {
            match item {
                Item::Use(use_decl) => self.lower_use(use_decl),
                Item::Function(decl) => self.lower_function(decl),
                Item::Global(decl) => self.lower_global(decl),
            }
        }
    }

    /// Lower a `@use` directive in the current unit.
    ///
    /// Unknown targets are diagnosed and skipped; compilation continues
    /// with the module's remaining items.
    pub fn lower_use(&mut self, use_decl: &UseDecl) {
        let Some(current) = self.current() else {
            tracing::debug!("@use outside a module body; skipping");
            return;
        };
        match self.find_unit(&use_decl.module) {
            Some(src) => {
                if let Err(err) =
                    self.import_module_symbols(current, src, use_decl.alias.as_deref())
                {
                    self.diag(Diagnostic::error(err.to_string()));
                }
            }
            None => self.diag(unknown_module(&use_decl.module)),
        }
    }

    /// Lower a function definition: declare it, file its symbol, build its
    /// body.
    fn lower_function(&mut self, decl: &FunctionDecl) {
        let Some(unit_id) = self.current() else {
            tracing::debug!(function = %decl.name, "function outside a module body; skipping");
            return;
        };
        if self.current_unit().find_symbol(&decl.name).is_some() {
            self.diag(Diagnostic::error(format!(
                "'{}' is defined more than once in module '{}'",
                decl.name,
                self.unit(unit_id).name
            )));
            return;
        }

        let param_types: Vec<TypeName> = decl.params.iter().map(|p| p.ty).collect();
        let fn_type = self.fn_type(&param_types, decl.ret);
        let linkage = if decl.is_private {
            Linkage::Internal
        } else {
            Linkage::External
        };
        let function = self.declare_fn(unit_id, &decl.name, fn_type, linkage);
        let fn_ptr_ty = self
            .llcx
            .ptr_type(inkwell::AddressSpace::default())
            .into();
        self.unit_mut(unit_id)
            .add_symbol(&decl.name, SymbolValue::Function(function), fn_ptr_ty);

        // Body
        let entry = self.llcx.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);

        let mut locals = Locals::new();
        for (i, param) in decl.params.iter().enumerate() {
            let value = function
                .get_nth_param(u32::try_from(i).unwrap())
                .expect("declared parameter exists");
            locals.bind(param.name.clone(), value);
        }

        let mut terminated = false;
        for stmt in &decl.body {
            terminated = self.lower_stmt(&mut locals, stmt);
            if terminated {
                // Anything after an unconditional return is unreachable.
                break;
            }
        }
        if !terminated {
            match decl.ret {
                TypeName::Void => {
                    self.builder.build_return(None).unwrap();
                }
                other => {
                    // Falling off the end of a non-void body yields the
                    // type's zero value.
                    let value = self.default_value(self.llvm_type(other));
                    self.builder.build_return(Some(&value)).unwrap();
                }
            }
        }
    }

    /// Lower one statement. Returns whether it terminated the block.
    fn lower_stmt(&mut self, locals: &mut Locals<'ll>, stmt: &Stmt) -> bool {
        match stmt {
            Stmt::Let { name, init, .. } => {
                if let Some(value) = self.lower_expr(locals, init) {
                    locals.bind(name.clone(), value);
                }
                false
            }
            Stmt::Return { value, .. } => match value {
                Some(expr) => match self.lower_expr(locals, expr) {
                    Some(value) => {
                        self.builder.build_return(Some(&value)).unwrap();
                        true
                    }
                    // The expression was diagnosed; let the fallthrough
                    // return terminate the block so the IR stays sane.
                    None => false,
                },
                None => {
                    self.builder.build_return(None).unwrap();
                    true
                }
            },
            Stmt::Expr(expr) => {
                let _ = self.lower_expr(locals, expr);
                false
            }
        }
    }

    /// Lower a module-level binding to an IR global.
    fn lower_global(&mut self, decl: &GlobalDecl) {
        let Some(unit_id) = self.current() else {
            tracing::debug!(global = %decl.name, "global outside a module body; skipping");
            return;
        };
        if self.current_unit().find_symbol(&decl.name).is_some() {
            self.diag(Diagnostic::error(format!(
                "'{}' is defined more than once in module '{}'",
                decl.name,
                self.unit(unit_id).name
            )));
            return;
        }

        let Some((value, inferred)) = self.const_value(&decl.init) else {
            return;
        };
        let ty = decl.ty.unwrap_or(inferred);
        if ty != inferred {
            self.diag(Diagnostic::error(format!(
                "initializer of '{}' has type {inferred}, annotation says {ty}",
                decl.name
            )));
            return;
        }

        let llty = self.llvm_type(ty);
        let linkage = if decl.is_private {
            Linkage::Internal
        } else {
            Linkage::External
        };
        let global = self.declare_global(unit_id, &decl.name, llty, linkage);
        global.set_initializer(&value);
        self.unit_mut(unit_id)
            .add_symbol(&decl.name, SymbolValue::Global(global), llty);
    }
}
