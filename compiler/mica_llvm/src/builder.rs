//! Function-body helpers: local bindings and arithmetic emission.

use inkwell::builder::Builder;
use inkwell::values::BasicValueEnum;
use inkwell::{FloatPredicate, IntPredicate};
use rustc_hash::FxHashMap;

use mica_ir::ast::BinaryOp;

/// Local variable bindings of one function body.
///
/// Mica locals are immutable, so every binding is a plain SSA value; no
/// alloca/load/store round-trip is needed.
#[derive(Debug, Default)]
pub struct Locals<'ll> {
    bindings: FxHashMap<String, BasicValueEnum<'ll>>,
}

impl<'ll> Locals<'ll> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a name. A `let` shadowing an earlier binding rebinds it.
    pub fn bind(&mut self, name: String, value: BasicValueEnum<'ll>) {
        self.bindings.insert(name, value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<BasicValueEnum<'ll>> {
        self.bindings.get(name).copied()
    }
}

/// Emit a binary operation on two lowered operands.
///
/// Returns `None` when the operand types do not agree; the caller turns
/// that into a diagnostic.
pub(crate) fn build_binary<'ll>(
    builder: &Builder<'ll>,
    op: BinaryOp,
    lhs: BasicValueEnum<'ll>,
    rhs: BasicValueEnum<'ll>,
) -> Option<BasicValueEnum<'ll>> {
    match (lhs, rhs) {
        (BasicValueEnum::IntValue(a), BasicValueEnum::IntValue(b)) => {
            // i64 arithmetic and i1 comparisons both land here; mixing the
            // two widths is a type error surfaced by LLVM's verifier.
            if a.get_type() != b.get_type() {
                return None;
            }
            let value = match op {
                BinaryOp::Add => builder.build_int_add(a, b, "add").unwrap().into(),
                BinaryOp::Sub => builder.build_int_sub(a, b, "sub").unwrap().into(),
                BinaryOp::Mul => builder.build_int_mul(a, b, "mul").unwrap().into(),
                BinaryOp::Div => builder.build_int_signed_div(a, b, "div").unwrap().into(),
                BinaryOp::Rem => builder.build_int_signed_rem(a, b, "rem").unwrap().into(),
                BinaryOp::Eq => int_cmp(builder, IntPredicate::EQ, a, b),
                BinaryOp::NotEq => int_cmp(builder, IntPredicate::NE, a, b),
                BinaryOp::Lt => int_cmp(builder, IntPredicate::SLT, a, b),
                BinaryOp::LtEq => int_cmp(builder, IntPredicate::SLE, a, b),
                BinaryOp::Gt => int_cmp(builder, IntPredicate::SGT, a, b),
                BinaryOp::GtEq => int_cmp(builder, IntPredicate::SGE, a, b),
            };
            Some(value)
        }
        (BasicValueEnum::FloatValue(a), BasicValueEnum::FloatValue(b)) => {
            let value = match op {
                BinaryOp::Add => builder.build_float_add(a, b, "fadd").unwrap().into(),
                BinaryOp::Sub => builder.build_float_sub(a, b, "fsub").unwrap().into(),
                BinaryOp::Mul => builder.build_float_mul(a, b, "fmul").unwrap().into(),
                BinaryOp::Div => builder.build_float_div(a, b, "fdiv").unwrap().into(),
                BinaryOp::Rem => builder.build_float_rem(a, b, "frem").unwrap().into(),
                BinaryOp::Eq => float_cmp(builder, FloatPredicate::OEQ, a, b),
                BinaryOp::NotEq => float_cmp(builder, FloatPredicate::ONE, a, b),
                BinaryOp::Lt => float_cmp(builder, FloatPredicate::OLT, a, b),
                BinaryOp::LtEq => float_cmp(builder, FloatPredicate::OLE, a, b),
                BinaryOp::Gt => float_cmp(builder, FloatPredicate::OGT, a, b),
                BinaryOp::GtEq => float_cmp(builder, FloatPredicate::OGE, a, b),
            };
            Some(value)
        }
        _ => None,
    }
}

fn int_cmp<'ll>(
    builder: &Builder<'ll>,
    pred: IntPredicate,
    a: inkwell::values::IntValue<'ll>,
    b: inkwell::values::IntValue<'ll>,
) -> BasicValueEnum<'ll> {
    builder.build_int_compare(pred, a, b, "cmp").unwrap().into()
}

fn float_cmp<'ll>(
    builder: &Builder<'ll>,
    pred: FloatPredicate,
    a: inkwell::values::FloatValue<'ll>,
    b: inkwell::values::FloatValue<'ll>,
) -> BasicValueEnum<'ll> {
    builder
        .build_float_compare(pred, a, b, "fcmp")
        .unwrap()
        .into()
}
