use crate::core::ast::*;
use crate::core::il::{Command, ILValue, Literal};
use crate::core::types::{promo_type, CType, IntegerType};
use crate::error::{Diagnostic, DiagnosticKind};
use crate::frontend::lexer::token::Token;
use crate::middle::cast::{check_cast, set_type};
use crate::middle::error::{LResult, LowerError};
use crate::middle::lower::IlLowerer;
use crate::middle::lvalue::LValue;

impl IlLowerer<'_> {
    /// lower an expression 2 its decayed value
    pub(super) fn lower_expr(&mut self, expr: &Expr) -> LResult<ILValue> {
        if let Some(lvalue) = self.lvalue(expr)? {
            let ctype = lvalue.ctype();
            if let Some(element) = ctype.element() {
                let addr = lvalue.addr(&mut self.il);
                return Ok(set_type(&addr, &CType::pointer_to(element.clone()), &mut self.il));
            }
            if ctype.is_function() {
                return Ok(lvalue.addr(&mut self.il));
            }
            return Ok(lvalue.read(&mut self.il));
        }

        match expr {
            Expr::Number(number) => self.lower_number(&number.token),
            Expr::Char(ch) => Ok(self
                .il
                .new_literal(CType::int(), Literal::new(i64::from(ch.value)))),
            Expr::Paren(paren) => self.lower_expr(&paren.inner),
            Expr::Binary(binary) => self.lower_binary(binary),
            Expr::Unary(unary) => self.lower_unary(unary),
            // always lvalues, handled above
            Expr::Identifier(_) | Expr::String(_) | Expr::ArraySubscript(_) => Err(
                LowerError::semantic(expr.anchor(), "expression has no value"),
            ),
        }
    }

    /// lvalue view of an expression, none if it has none. emits no code 4 non lvalues
    pub(super) fn lvalue(&mut self, expr: &Expr) -> LResult<Option<LValue>> {
        match expr {
            Expr::Identifier(ident) => self.lookup(&ident.token).map(|v| Some(LValue::Direct(v))),
            Expr::String(string) => {
                let value = self.il.register_string_literal(string.bytes());
                Ok(Some(LValue::Direct(value)))
            }
            Expr::Paren(paren) => self.lvalue(&paren.inner),
            Expr::Unary(UnaryExpr {
                op: UnaryOp::Deref,
                op_token,
                operand,
            }) => {
                let addr = self.lower_expr(operand)?;
                if !addr.ctype.is_pointer() {
                    return Err(LowerError::type_error(
                        op_token,
                        "operand of unary '*' must have pointer type",
                    ));
                }
                Ok(Some(LValue::Indirect(addr)))
            }
            Expr::ArraySubscript(subscript) => self.subscript_lvalue(subscript).map(Some),
            _ => Ok(None),
        }
    }

    fn lookup(&mut self, token: &Token) -> LResult<ILValue> {
        self.symbols.lookup(&token.content).cloned().ok_or_else(|| {
            LowerError::error(
                DiagnosticKind::NameResolutionError,
                token,
                format!("use of undeclared identifier '{}'", token.content),
            )
        })
    }

    fn lower_number(&mut self, token: &Token) -> LResult<ILValue> {
        let too_large =
            || LowerError::semantic(token, "integer literal too large to be represented by any integer type");
        let (value, binary) = parse_int_literal(&token.content).ok_or_else(too_large)?;

        let int_type = IntegerType::for_literal(value).ok_or_else(too_large)?;
        let value = i64::try_from(value).map_err(|_| too_large())?;
        let literal = if binary {
            Literal::binary(value)
        } else {
            Literal::new(value)
        };
        Ok(self.il.new_literal(CType::integer(int_type), literal))
    }

    fn lower_binary(&mut self, expr: &BinaryExpr) -> LResult<ILValue> {
        match expr.op {
            BinaryOp::Assign => return self.lower_assign(expr),
            BinaryOp::And => return self.lower_bool_and_or(expr, true),
            BinaryOp::Or => return self.lower_bool_and_or(expr, false),
            _ => {}
        }

        let left = self.lower_expr(&expr.left)?;
        let right = self.lower_expr(&expr.right)?;

        if left.ctype.is_arith() && right.ctype.is_arith() {
            return self.lower_arith(expr, left, right);
        }

        let tok = &expr.op_token;
        match expr.op {
            BinaryOp::Eq | BinaryOp::Ne => self.lower_pointer_equality(expr, left, right),
            BinaryOp::Add => self.lower_pointer_offset(tok, left, right, false),
            BinaryOp::BitAnd => self.lower_pointer_offset(tok, left, right, true),
            BinaryOp::Sub => self.lower_minus(tok, left, right),
            BinaryOp::Mul => Err(LowerError::type_error(
                tok,
                "invalid operand types for binary multiplication",
            )),
            BinaryOp::Div => Err(LowerError::type_error(
                tok,
                "invalid operand types for binary division",
            )),
            BinaryOp::Assign | BinaryOp::And | BinaryOp::Or => Err(LowerError::type_error(
                tok,
                format!("invalid operand types for binary '{}'", expr.op.symbol()),
            )),
        }
    }

    fn lower_arith(&mut self, expr: &BinaryExpr, left: ILValue, right: ILValue) -> LResult<ILValue> {
        let promo = promo_type(&left.ctype, &right.ctype)
            .ok_or_else(|| LowerError::type_error(&expr.op_token, "invalid operand types"))?;
        let left = set_type(&left, &promo, &mut self.il);
        let right = set_type(&right, &promo, &mut self.il);

        let output = match expr.op {
            BinaryOp::Eq | BinaryOp::Ne => self.il.new_value(CType::int()),
            _ => self.il.new_value(promo),
        };
        let (output_id, left, right) = (output.id, left.id, right.id);
        let command = match expr.op {
            BinaryOp::Add => Command::Add { output: output_id, left, right },
            BinaryOp::Sub => Command::Sub { output: output_id, left, right },
            BinaryOp::Mul => Command::Mult { output: output_id, left, right },
            BinaryOp::Div => Command::Div { output: output_id, left, right },
            BinaryOp::BitAnd => Command::BitwiseAnd { output: output_id, left, right },
            BinaryOp::Eq => Command::EqualCmp { output: output_id, left, right },
            BinaryOp::Ne => Command::NotEqualCmp { output: output_id, left, right },
            BinaryOp::Assign | BinaryOp::And | BinaryOp::Or => {
                return Err(LowerError::type_error(&expr.op_token, "invalid operand types"))
            }
        };
        self.il.add(command);
        Ok(output)
    }

    fn lower_assign(&mut self, expr: &BinaryExpr) -> LResult<ILValue> {
        let right = self.lower_expr(&expr.right)?;
        match self.lvalue(&expr.left)? {
            Some(lvalue) if lvalue.modable() => self.set_to(&lvalue, right, &expr.op_token),
            _ => Err(LowerError::semantic(
                &expr.op_token,
                "expression on left of '=' is not assignable",
            )),
        }
    }

    /// convert and store `value` through `lvalue`
    pub(super) fn set_to(&mut self, lvalue: &LValue, value: ILValue, anchor: &Token) -> LResult<ILValue> {
        let target = lvalue.ctype();
        check_cast(&value, &target, anchor, self.reporter)?;
        let value = set_type(&value, &target, &mut self.il);
        Ok(lvalue.store(&value, &mut self.il))
    }

    fn lower_bool_and_or(&mut self, expr: &BinaryExpr, and: bool) -> LResult<ILValue> {
        let out = self.il.new_value(CType::int());
        let zero = self.il.new_literal(CType::int(), Literal::new(0));
        let one = self.il.new_literal(CType::int(), Literal::new(1));

        // set_out precedes the line that flips out, end skips it
        let set_out = self.il.get_label();
        let end = self.il.get_label();

        let (initial, flipped) = if and { (one.id, zero.id) } else { (zero.id, one.id) };
        let jump = |cond, label| {
            if and {
                Command::JumpZero { cond, label }
            } else {
                Command::JumpNotZero { cond, label }
            }
        };

        let left = self.lower_expr(&expr.left)?;
        self.il.add(Command::Set { output: out.id, arg: initial });
        self.il.add(jump(left.id, set_out));
        let right = self.lower_expr(&expr.right)?;
        self.il.add(jump(right.id, set_out));
        self.il.add(Command::Jump { label: end });
        self.il.add(Command::Label { label: set_out });
        self.il.add(Command::Set { output: out.id, arg: flipped });
        self.il.add(Command::Label { label: end });
        Ok(out)
    }

    /// `ptr + int`, `int + ptr` and the `&` variant, int scaled by pointee size
    fn lower_pointer_offset(
        &mut self,
        tok: &Token,
        left: ILValue,
        right: ILValue,
        bitwise: bool,
    ) -> LResult<ILValue> {
        let (arith, pointer) = if left.ctype.is_pointer() && right.ctype.is_integral() {
            (right, left)
        } else if right.ctype.is_pointer() && left.ctype.is_integral() {
            (left, right)
        } else {
            let descr = if bitwise {
                "invalid operand types for binary '&'"
            } else {
                "invalid operand types for binary addition"
            };
            return Err(LowerError::type_error(tok, descr));
        };
        if !pointer.ctype.is_object_pointer() {
            return Err(LowerError::type_error(
                tok,
                "arithmetic on pointer to incomplete type",
            ));
        }

        let ulong = CType::ulong();
        let shift = self.scaled(&arith, &pointer.ctype, &ulong);
        let out = self.il.new_value(pointer.ctype.clone());
        let command = if bitwise {
            Command::BitwiseAnd { output: out.id, left: pointer.id, right: shift.id }
        } else {
            Command::Add { output: out.id, left: pointer.id, right: shift.id }
        };
        self.il.add(command);
        Ok(out)
    }

    /// `arith * sizeof(*pointer)` computed in `ctype`
    fn scaled(&mut self, arith: &ILValue, pointer: &CType, ctype: &CType) -> ILValue {
        let size = pointer.pointee().map_or(1, |p| p.size());
        let arith = set_type(arith, ctype, &mut self.il);
        let size = self.il.new_literal(ctype.clone(), Literal::new(size as i64));
        let shift = self.il.new_value(ctype.clone());
        self.il.add(Command::Mult {
            output: shift.id,
            left: arith.id,
            right: size.id,
        });
        shift
    }

    fn lower_minus(&mut self, tok: &Token, left: ILValue, right: ILValue) -> LResult<ILValue> {
        let long = CType::long();

        if left.ctype.is_pointer() && right.ctype.is_pointer() {
            if !left.ctype.weak_compatible(&right.ctype) {
                return Err(LowerError::type_error(
                    tok,
                    "invalid operand types for binary subtraction",
                ));
            }
            // byte difference over the object size
            let raw = self.il.new_value(long.clone());
            self.il.add(Command::Sub {
                output: raw.id,
                left: left.id,
                right: right.id,
            });
            let size = left.ctype.pointee().map_or(1, |p| p.size());
            let size = self.il.new_literal(long.clone(), Literal::new(size as i64));
            let out = self.il.new_value(long);
            self.il.add(Command::Div {
                output: out.id,
                left: raw.id,
                right: size.id,
            });
            return Ok(out);
        }

        if left.ctype.is_object_pointer() && right.ctype.is_integral() {
            let shift = self.scaled(&right, &left.ctype, &long);
            let out = self.il.new_value(left.ctype.clone());
            self.il.add(Command::Sub {
                output: out.id,
                left: left.id,
                right: shift.id,
            });
            return Ok(out);
        }

        Err(LowerError::type_error(
            tok,
            "invalid operand types for binary subtraction",
        ))
    }

    /// `==`/`!=` with at least one pointer operand, mismatches only warn
    fn lower_pointer_equality(
        &mut self,
        expr: &BinaryExpr,
        mut left: ILValue,
        mut right: ILValue,
    ) -> LResult<ILValue> {
        let tok = &expr.op_token;

        // null pointer constants take the other side's type
        if left.ctype.is_pointer() && right.null_ptr_const && right.ctype.is_integral() {
            right = set_type(&right, &left.ctype, &mut self.il);
        } else if right.ctype.is_pointer() && left.null_ptr_const && left.ctype.is_integral() {
            left = set_type(&left, &right.ctype, &mut self.il);
        }

        match (left.ctype.pointee().cloned(), right.ctype.pointee().cloned()) {
            (Some(_), None) => {
                self.warn(tok, "comparison between incomparable types");
                right = set_type(&right, &left.ctype, &mut self.il);
            }
            (None, Some(_)) => {
                self.warn(tok, "comparison between incomparable types");
                left = set_type(&left, &right.ctype, &mut self.il);
            }
            (Some(lp), Some(rp)) => {
                if lp.is_void() {
                    right = set_type(&right, &left.ctype, &mut self.il);
                } else if rp.is_void() {
                    left = set_type(&left, &right.ctype, &mut self.il);
                } else if !lp.weak_compatible(&rp) {
                    self.warn(tok, "comparison between distinct pointer types");
                    right = set_type(&right, &left.ctype, &mut self.il);
                }
            }
            (None, None) => {
                return Err(LowerError::type_error(tok, "invalid operand types for comparison"))
            }
        }

        let output = self.il.new_value(CType::int());
        let command = if expr.op == BinaryOp::Eq {
            Command::EqualCmp { output: output.id, left: left.id, right: right.id }
        } else {
            Command::NotEqualCmp { output: output.id, left: left.id, right: right.id }
        };
        self.il.add(command);
        Ok(output)
    }

    pub(super) fn warn(&mut self, anchor: &Token, message: &str) {
        self.reporter.add_diagnostic(Diagnostic::warning(
            DiagnosticKind::TypeError,
            Some(anchor.position),
            message,
        ));
    }

    fn lower_unary(&mut self, expr: &UnaryExpr) -> LResult<ILValue> {
        match expr.op {
            UnaryOp::AddrOf => match self.lvalue(&expr.operand)? {
                Some(lvalue) => Ok(lvalue.addr(&mut self.il)),
                None => Err(LowerError::semantic(
                    &expr.op_token,
                    "lvalue required as unary '&' operand",
                )),
            },
            UnaryOp::PreIncr => self.lower_incr_decr(expr, true, true),
            UnaryOp::PreDecr => self.lower_incr_decr(expr, false, true),
            UnaryOp::PostIncr => self.lower_incr_decr(expr, true, false),
            UnaryOp::PostDecr => self.lower_incr_decr(expr, false, false),
            UnaryOp::BoolNot => self.lower_bool_not(expr),
            // an lvalue, read through it in lower_expr
            UnaryOp::Deref => Err(LowerError::semantic(&expr.op_token, "expression has no value")),
        }
    }

    fn lower_incr_decr(&mut self, expr: &UnaryExpr, incr: bool, prefix: bool) -> LResult<ILValue> {
        let tok = &expr.op_token;
        let lvalue = match self.lvalue(&expr.operand)? {
            Some(lvalue) if lvalue.modable() => lvalue,
            _ => {
                let descr = if incr {
                    "operand of increment operator not a modifiable lvalue"
                } else {
                    "operand of decrement operator not a modifiable lvalue"
                };
                return Err(LowerError::semantic(tok, descr));
            }
        };

        let val = lvalue.read(&mut self.il);
        let step = if val.ctype.is_arith() {
            1
        } else if val.ctype.is_object_pointer() {
            val.ctype.pointee().map_or(1, |p| p.size())
        } else {
            return Err(LowerError::type_error(
                tok,
                "invalid operand type for increment or decrement",
            ));
        };
        let one = self.il.new_literal(val.ctype.make_unqual(), Literal::new(step as i64));

        let new_val = self.il.new_value(val.ctype.make_unqual());
        let old_val = if prefix {
            None
        } else {
            let old = self.il.new_value(val.ctype.make_unqual());
            self.il.add(Command::Set { output: old.id, arg: val.id });
            Some(old)
        };

        self.il.add(if incr {
            Command::Add { output: new_val.id, left: val.id, right: one.id }
        } else {
            Command::Sub { output: new_val.id, left: val.id, right: one.id }
        });
        self.set_to(&lvalue, new_val.clone(), tok)?;
        Ok(old_val.unwrap_or(new_val))
    }

    fn lower_bool_not(&mut self, expr: &UnaryExpr) -> LResult<ILValue> {
        let out = self.il.new_value(CType::int());
        let zero = self.il.new_literal(CType::int(), Literal::new(0));
        let one = self.il.new_literal(CType::int(), Literal::new(1));
        let end = self.il.get_label();

        let operand = self.lower_expr(&expr.operand)?;
        if !operand.ctype.is_scalar() {
            return Err(LowerError::type_error(
                &expr.op_token,
                "invalid operand type for logical not",
            ));
        }
        self.il.add(Command::Set { output: out.id, arg: one.id });
        self.il.add(Command::JumpZero { cond: operand.id, label: end });
        self.il.add(Command::Set { output: out.id, arg: zero.id });
        self.il.add(Command::Label { label: end });
        Ok(out)
    }

    fn subscript_lvalue(&mut self, expr: &ArraySubscriptExpr) -> LResult<LValue> {
        let head = self.lower_expr(&expr.head)?;
        let index = self.lower_expr(&expr.index)?;

        let (arith, pointer) = if head.ctype.is_pointer() && index.ctype.is_integral() {
            (index, head)
        } else if head.ctype.is_integral() && index.ctype.is_pointer() {
            (head, index)
        } else {
            return Err(LowerError::type_error(
                &expr.bracket,
                "invalid operand types for array subscripting",
            ));
        };
        if !pointer.ctype.is_object_pointer() {
            return Err(LowerError::type_error(
                &expr.bracket,
                "subscript of pointer to incomplete type",
            ));
        }

        let shift = self.scaled(&arith, &pointer.ctype, &CType::ulong());
        let out = self.il.new_value(pointer.ctype.clone());
        self.il.add(Command::Add {
            output: out.id,
            left: pointer.id,
            right: shift.id,
        });
        Ok(LValue::Indirect(out))
    }
}

/// value of an integer literal and whether it was written in binary
pub fn parse_int_literal(text: &str) -> Option<(i128, bool)> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let binary = digits
        .strip_prefix("0b")
        .or_else(|| digits.strip_prefix("0B"))
        .or_else(|| digits.strip_suffix('b'))
        .or_else(|| digits.strip_suffix('B'));

    let magnitude = match binary {
        Some(bits) if !bits.is_empty() && bits.bytes().all(|b| b == b'0' || b == b'1') => {
            i128::from_str_radix(bits, 2).ok()?
        }
        Some(_) => return None,
        None => digits.parse::<i128>().ok()?,
    };
    Some((if negative { -magnitude } else { magnitude }, binary.is_some()))
}
