use crate::core::il::{Command, ILCode, ILValue};
use crate::core::types::CType;
use crate::error::{Diagnostic, DiagnosticKind, Reporter};
use crate::frontend::lexer::token::Token;
use crate::middle::error::{LResult, LowerError};

/// check that `value` may be implicitly converted 2 `target`
pub fn check_cast(
    value: &ILValue,
    target: &CType,
    anchor: &Token,
    reporter: &mut Reporter,
) -> LResult<()> {
    let from = &value.ctype;

    if from.is_arith() && target.is_arith() {
        return Ok(());
    }
    if target.is_bool() && from.is_scalar() {
        return Ok(());
    }
    if target.is_pointer() && from.is_integral() && value.null_ptr_const {
        return Ok(());
    }

    if let (Some(src), Some(dst)) = (from.pointee(), target.pointee()) {
        if !(src.weak_compatible(dst) || src.is_void() || dst.is_void()) {
            reporter.add_diagnostic(Diagnostic::warning(
                DiagnosticKind::TypeError,
                Some(anchor.position),
                "conversion from incompatible pointer type",
            ));
        }
        return Ok(());
    }

    Err(LowerError::type_error(anchor, "invalid conversion between types"))
}

/// `value` as `ctype`, emitting a `Set` only when the types differ
pub fn set_type(value: &ILValue, ctype: &CType, il: &mut ILCode) -> ILValue {
    if value.ctype.weak_compatible(ctype) {
        return value.clone();
    }
    let out = il.new_value(ctype.clone());
    il.add(Command::Set {
        output: out.id,
        arg: value.id,
    });
    out
}
