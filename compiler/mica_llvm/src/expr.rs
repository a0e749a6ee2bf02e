//! Expression lowering.
//!
//! Every lowering function returns `Option`: `None` means the expression
//! produced no value, either because a diagnostic was raised here or
//! because a subexpression already failed. The containing statement keeps
//! going; downstream verification catches what this leaves behind.

use inkwell::values::{BasicMetadataValueEnum, BasicValueEnum, FunctionValue};

use mica_diagnostic::{unknown_identifier, unresolved_member, Diagnostic};
use mica_ir::ast::{Expr, TypeName};

use crate::builder::{build_binary, Locals};
use crate::context::CodegenCx;
use crate::unit::SymbolValue;

impl<'ll> CodegenCx<'ll> {
    /// Lower an expression in the current unit.
    pub(crate) fn lower_expr(
        &mut self,
        locals: &mut Locals<'ll>,
        expr: &Expr,
    ) -> Option<BasicValueEnum<'ll>> {
        match expr {
            Expr::Int(v, _) => {
                #[allow(clippy::cast_sign_loss)]
                let value = self.llcx.i64_type().const_int(*v as u64, true);
                Some(value.into())
            }
            Expr::Float(v, _) => Some(self.llcx.f64_type().const_float(*v).into()),
            Expr::Bool(v, _) => Some(self.llcx.bool_type().const_int(u64::from(*v), false).into()),

            Expr::Ident(name, _) => self.lower_ident(locals, name),

            Expr::Member { object, member, .. } => self.lower_member_access(object, member),

            Expr::Call { callee, args, .. } => {
                let function = self.resolve_callee(callee)?;
                if args.len() != function.count_params() as usize {
                    self.diag(Diagnostic::error(format!(
                        "call passes {} argument(s), callee takes {}",
                        args.len(),
                        function.count_params()
                    )));
                    return None;
                }
                let mut lowered = Vec::with_capacity(args.len());
                for arg in args {
                    lowered.push(self.lower_expr(locals, arg)?);
                }
                let meta: Vec<BasicMetadataValueEnum<'ll>> =
                    lowered.into_iter().map(Into::into).collect();
                let call = self.builder.build_call(function, &meta, "call").unwrap();
                // Void calls legitimately produce no value.
                call.try_as_basic_value().left()
            }

            Expr::Binary { op, lhs, rhs, .. } => {
                let lhs = self.lower_expr(locals, lhs)?;
                let rhs = self.lower_expr(locals, rhs)?;
                match build_binary(&self.builder, *op, lhs, rhs) {
                    Some(value) => Some(value),
                    None => {
                        self.diag(Diagnostic::error(format!(
                            "operands of '{op}' have mismatched types"
                        )));
                        None
                    }
                }
            }
        }
    }

    /// Lower a bare identifier: local binding first, then the unified
    /// symbol lookup.
    ///
    /// A hit in another unit is not emitted (cross-unit references require
    /// an explicit `@use`) but it makes for a better diagnostic.
    fn lower_ident(
        &mut self,
        locals: &Locals<'ll>,
        name: &str,
    ) -> Option<BasicValueEnum<'ll>> {
        if let Some(value) = locals.get(name) {
            return Some(value);
        }
        match self.find_symbol_with_module_support(name) {
            Some((unit_id, symbol)) if Some(unit_id) == self.current() => match symbol.value {
                SymbolValue::Function(f) => {
                    Some(f.as_global_value().as_pointer_value().into())
                }
                SymbolValue::Global(g) => {
                    let value = self
                        .builder
                        .build_load(symbol.ty, g.as_pointer_value(), name)
                        .unwrap();
                    Some(value)
                }
            },
            Some((unit_id, _)) => {
                let module = self.unit(unit_id).name.clone();
                self.diag(Diagnostic::error(format!(
                    "unknown identifier '{name}' (a public '{name}' exists in module '{module}'; import it with @use)"
                )));
                None
            }
            None => {
                self.diag(unknown_identifier(name));
                None
            }
        }
    }

    /// Lower `object.member` where `object` names an imported module alias.
    ///
    /// The qualified `alias.member` key is searched in the current unit's
    /// table: a function yields its declaration handle (usable as a
    /// callee), a variable loads through the external global. Mica has no
    /// struct field access, so a miss here is the final answer.
    pub fn lower_member_access(
        &mut self,
        object: &Expr,
        member: &str,
    ) -> Option<BasicValueEnum<'ll>> {
        let Expr::Ident(alias, _) = object else {
            tracing::debug!(member, "member access on a non-identifier object");
            self.diag(Diagnostic::error(format!(
                "member '{member}' accessed on an expression that is not a module alias"
            )));
            return None;
        };
        let qualified = format!("{alias}.{member}");
        match self.current_unit().find_symbol(&qualified) {
            Some(symbol) => match symbol.value {
                SymbolValue::Function(f) => {
                    Some(f.as_global_value().as_pointer_value().into())
                }
                SymbolValue::Global(g) => {
                    let value = self
                        .builder
                        .build_load(symbol.ty, g.as_pointer_value(), &qualified)
                        .unwrap();
                    Some(value)
                }
            },
            None => {
                self.diag(unresolved_member(alias, member));
                None
            }
        }
    }

    /// Resolve a call's callee to a function value.
    fn resolve_callee(&mut self, callee: &Expr) -> Option<FunctionValue<'ll>> {
        match callee {
            Expr::Ident(name, _) => match self.find_symbol_with_module_support(name) {
                Some((unit_id, symbol)) if Some(unit_id) == self.current() => {
                    match symbol.value {
                        SymbolValue::Function(f) => Some(f),
                        SymbolValue::Global(_) => {
                            self.diag(Diagnostic::error(format!(
                                "'{name}' is a variable, not a function"
                            )));
                            None
                        }
                    }
                }
                Some((unit_id, _)) => {
                    let module = self.unit(unit_id).name.clone();
                    self.diag(Diagnostic::error(format!(
                        "unknown function '{name}' (a public '{name}' exists in module '{module}'; import it with @use)"
                    )));
                    None
                }
                None => {
                    self.diag(unknown_identifier(name));
                    None
                }
            },
            Expr::Member { object, member, .. } => {
                let Expr::Ident(alias, _) = object.as_ref() else {
                    self.diag(Diagnostic::error(format!(
                        "member '{member}' accessed on an expression that is not a module alias"
                    )));
                    return None;
                };
                let qualified = format!("{alias}.{member}");
                match self.current_unit().find_symbol(&qualified) {
                    Some(symbol) => match symbol.value {
                        SymbolValue::Function(f) => Some(f),
                        SymbolValue::Global(_) => {
                            self.diag(Diagnostic::error(format!(
                                "'{qualified}' is a variable, not a function"
                            )));
                            None
                        }
                    },
                    None => {
                        self.diag(unresolved_member(alias, member));
                        None
                    }
                }
            }
            other => {
                tracing::debug!(?other, "call on a non-callable expression");
                self.diag(Diagnostic::error(
                    "expression is not callable".to_string(),
                ));
                None
            }
        }
    }

    /// Constant-fold a global initializer.
    ///
    /// Globals accept literal initializers only; anything else is
    /// diagnosed.
    pub(crate) fn const_value(
        &mut self,
        expr: &Expr,
    ) -> Option<(BasicValueEnum<'ll>, TypeName)> {
        match expr {
            Expr::Int(v, _) => {
                #[allow(clippy::cast_sign_loss)]
                let value = self.llcx.i64_type().const_int(*v as u64, true);
                Some((value.into(), TypeName::Int))
            }
            Expr::Float(v, _) => {
                Some((self.llcx.f64_type().const_float(*v).into(), TypeName::Float))
            }
            Expr::Bool(v, _) => Some((
                self.llcx.bool_type().const_int(u64::from(*v), false).into(),
                TypeName::Bool,
            )),
            other => {
                self.diag(Diagnostic::error(format!(
                    "global initializer must be a literal constant, found '{other:?}'"
                )));
                None
            }
        }
    }
}
