use crate::core::ast::*;
use crate::core::types::{CType, IntegerType};
use crate::error::DiagnosticKind;
use crate::frontend::lexer::token::{Token, TokenKind};
use crate::middle::error::{LResult, LowerError};
use crate::middle::lower::IlLowerer;
use crate::middle::lvalue::LValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Auto,
    Static,
    Extern,
}

impl IlLowerer<'_> {
    /// each declarator is lowered on its own so one bad one does not hide the rest
    pub(super) fn lower_declaration(&mut self, decl: &Declaration, global: bool) -> LResult<()> {
        for init_decl in &decl.declarators {
            let result = self.lower_init_declarator(&decl.specifiers, init_decl, global);
            self.recover(result)?;
        }
        Ok(())
    }

    fn lower_init_declarator(
        &mut self,
        specifiers: &[Token],
        init_decl: &InitDeclarator,
        global: bool,
    ) -> LResult<()> {
        let (ctype, storage) = make_specs_ctype(specifiers)?;
        let ctype = make_ctype(&init_decl.declarator, ctype)?;
        let first_spec = &specifiers[0];

        let Some(ident) = init_decl.declarator.identifier() else {
            return Err(LowerError::semantic(
                first_spec,
                "missing identifier name in declaration",
            ));
        };
        if ctype.is_void() {
            return Err(LowerError::semantic(ident, "variable of void type declared"));
        }

        let name = ident.content.as_str();
        let is_extern = storage == StorageClass::Extern || ctype.is_function();

        if storage == StorageClass::Static {
            return Err(LowerError::unsupported("static variables", ident));
        }
        if global && !is_extern {
            return Err(LowerError::unsupported("non-extern global variables", ident));
        }
        if !is_extern && ctype.is_incomplete() {
            return Err(LowerError::semantic(ident, "variable of incomplete type declared"));
        }

        let var = if is_extern {
            self.il.register_extern(name, ctype)
        } else {
            self.il.register_local(name, ctype)
        };
        if self.symbols.add(name, var.clone()).is_err() {
            return Err(LowerError::error(
                DiagnosticKind::NameResolutionError,
                ident,
                format!("redefinition of '{}'", name),
            ));
        }

        let Some(init) = &init_decl.init else {
            return Ok(());
        };
        if is_extern {
            return Err(LowerError::semantic(ident, "extern variable has initializer"));
        }

        let value = self.lower_expr(init)?;
        let lvalue = LValue::Direct(var);
        if !lvalue.initializable() {
            return Err(LowerError::semantic(
                ident,
                "declared variable is not of assignable type",
            ));
        }
        self.set_to(&lvalue, value, ident)?;
        Ok(())
    }
}

/// wrap `base` in the declarator's pointer, array and function layers
pub fn make_ctype(declarator: &Declarator, base: CType) -> LResult<CType> {
    match declarator {
        Declarator::Identifier(_) => Ok(base),
        Declarator::Pointer(inner) => make_ctype(inner, CType::pointer_to(base)),
        Declarator::Array { length, inner } => make_ctype(inner, CType::array_of(base, Some(*length))),
        Declarator::Function { params, inner } => {
            let params = match params {
                Some(params) => Some(
                    params
                        .iter()
                        .map(|p| {
                            let (base, _) = make_specs_ctype(&p.specifiers)?;
                            make_ctype(&p.declarator, base)
                        })
                        .collect::<LResult<Vec<_>>>()?,
                ),
                None => None,
            };
            make_ctype(inner, CType::function(params, base))
        }
    }
}

/// base type and storage class from declaration specifiers
pub fn make_specs_ctype(specifiers: &[Token]) -> LResult<(CType, StorageClass)> {
    let Some(first) = specifiers.first() else {
        return Ok((CType::int(), StorageClass::Auto));
    };
    let count = |kind: TokenKind| specifiers.iter().filter(|s| s.is(kind)).count();

    let mut base_kinds: Vec<TokenKind> = specifiers
        .iter()
        .map(|s| s.kind)
        .filter(|k| {
            matches!(
                k,
                TokenKind::Void
                    | TokenKind::Bool
                    | TokenKind::Char
                    | TokenKind::Short
                    | TokenKind::Int
                    | TokenKind::Long
            )
        })
        .collect();
    base_kinds.sort_by_key(|k| *k as u8);

    use TokenKind::*;
    let mut ctype = match base_kinds.as_slice() {
        [] | [Int] => CType::int(),
        [Void] => CType::void(),
        [Bool] => CType::bool(),
        [Char] => CType::char(),
        [Short] | [Short, Int] => CType::integer(IntegerType::Short),
        [Int, Long] | [Long] => CType::long(),
        [Long, Long] | [Int, Long, Long] => CType::integer(IntegerType::LongLong),
        _ => {
            return Err(LowerError::type_error(
                first,
                "two or more data types in declaration specifiers",
            ))
        }
    };

    match (count(Signed) > 0, count(Unsigned) > 0) {
        (true, true) => {
            return Err(LowerError::type_error(
                first,
                "both signed and unsigned in declaration specifiers",
            ))
        }
        (false, true) => {
            if !ctype.is_integral() || ctype.is_bool() {
                return Err(LowerError::type_error(
                    first,
                    "'unsigned' used with a non integer type",
                ));
            }
            ctype = ctype.to_unsigned();
        }
        _ => {}
    }

    let storage_kinds: Vec<TokenKind> = [Auto, Static, Extern]
        .into_iter()
        .filter(|k| count(*k) > 0)
        .collect();
    let storage = match storage_kinds.as_slice() {
        [] | [Auto] => StorageClass::Auto,
        [Static] => StorageClass::Static,
        [Extern] => StorageClass::Extern,
        _ => {
            return Err(LowerError::semantic(
                first,
                "two or more storage classes in declaration specifiers",
            ))
        }
    };

    if count(Const) > 0 {
        ctype = ctype.make_const();
    }
    Ok((ctype, storage))
}
