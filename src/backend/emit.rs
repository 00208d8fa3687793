use crate::backend::allocator::SpotMap;
use crate::backend::asm::AsmCode;
use crate::backend::dialect::{Dialect, Program};
use crate::backend::error::CodegenError;
use crate::backend::register::Reg;
use crate::backend::spot::{MemBase, Spot};
use crate::core::il::{Command, ILCode, LabelId, Literal, Radix, ValueId, ValueKind};
use tracing::debug;

type EResult<T> = Result<T, CodegenError>;

/// Turn allocated il into a complete assembly file in one dialect
pub fn generate(il: &ILCode, spots: &SpotMap, dialect: &dyn Dialect) -> EResult<String> {
    let mut emitter = Emitter::new(il, spots, dialect);
    emitter.prologue();
    for command in &il.commands {
        emitter.emit(command)?;
    }
    debug!(
        dialect = ?dialect.kind(),
        commands = il.commands.len(),
        lines = emitter.asm.raw_lines().len(),
        "emitted assembly"
    );

    let strings = il
        .string_literals()
        .iter()
        .filter_map(|(id, bytes)| match il.value(*id).map(|v| &v.kind) {
            Some(ValueKind::StringLiteral(n)) => Some((format!("__strlit{}", n), bytes.as_slice())),
            _ => None,
        })
        .collect();
    let program = Program {
        body: &emitter.asm,
        externs: il.extern_names(),
        strings,
    };
    Ok(dialect.full_code(&program))
}

/// per command instruction templates
pub struct Emitter<'a> {
    il: &'a ILCode,
    spots: &'a SpotMap,
    dialect: &'a dyn Dialect,
    pub asm: AsmCode,
}

impl<'a> Emitter<'a> {
    pub fn new(il: &'a ILCode, spots: &'a SpotMap, dialect: &'a dyn Dialect) -> Self {
        Self {
            il,
            spots,
            dialect,
            asm: AsmCode::new(),
        }
    }

    pub fn prologue(&mut self) {
        self.asm.add_command("push", &["rbp"]);
        self.asm.add_command("mov", &["rbp", "rsp"]);
        let frame = self.spots.frame_size();
        if frame > 0 {
            self.asm.add_command("sub", &["rsp", &frame.to_string()]);
        }
    }

    pub fn emit(&mut self, command: &Command) -> EResult<()> {
        match *command {
            Command::Add { output, left, right } => self.arith(command, "add", output, left, right),
            Command::Sub { output, left, right } => self.arith(command, "sub", output, left, right),
            Command::BitwiseAnd { output, left, right } => {
                self.arith(command, "and", output, left, right)
            }
            Command::Mult { output, left, right } => {
                if self.size(output) == 1 {
                    return Err(CodegenError::unsupported(command.name(), "1 byte multiplication"));
                }
                self.arith(command, "imul", output, left, right)
            }
            Command::Div { output, left, right } => self.div(command, output, left, right),
            Command::EqualCmp { output, left, right } => {
                self.compare(command, "sete", output, left, right)
            }
            Command::NotEqualCmp { output, left, right } => {
                self.compare(command, "setne", output, left, right)
            }
            Command::Set { output, arg } => self.set(command, output, arg),
            Command::Return { arg } => self.ret(command, arg),
            Command::Label { label } => {
                self.asm.add_label(label.to_string());
                Ok(())
            }
            Command::Jump { label } => {
                self.asm.add_command("jmp", &[&label.to_string()]);
                Ok(())
            }
            Command::JumpZero { cond, label } => self.cond_jump(cond, label, true),
            Command::JumpNotZero { cond, label } => self.cond_jump(cond, label, false),
            Command::AddrOf { output, var } => self.addr_of(command, output, var),
            Command::ReadAt { output, addr } => self.read_at(command, output, addr),
            Command::SetAt { addr, val } => self.set_at(command, addr, val),
        }
    }

    fn spot(&self, id: ValueId) -> EResult<&'a Spot> {
        self.spots.get(id).ok_or(CodegenError::MissingSpot(id))
    }

    fn size(&self, id: ValueId) -> u64 {
        self.il.ctype(id).map_or(8, |c| c.size())
    }

    fn signed(&self, id: ValueId) -> bool {
        self.il.ctype(id).map_or(false, |c| c.is_signed())
    }

    fn operand(&self, id: ValueId, size: u64) -> EResult<String> {
        let spot = self.spot(id)?;
        self.dialect.operand(spot, size)
    }

    fn scratch(&self, reg: Reg, size: u64, command: &Command) -> EResult<&'static str> {
        reg.sized(size)
            .ok_or_else(|| CodegenError::unsupported(command.name(), format!("{} byte operands", size)))
    }

    /// right hand operand, 64 bit immediates that do not sign extend go via rdx
    fn source(&mut self, id: ValueId, size: u64) -> EResult<String> {
        if let Spot::Literal(lit) = self.spot(id)? {
            if size == 8 && !lit.fits_imm32() {
                let lit = self.dialect.literal(lit);
                self.asm.add_command("mov", &["rdx", &lit]);
                return Ok("rdx".to_string());
            }
        }
        self.operand(id, size)
    }

    /// move a scratch register into an output value
    fn store(&mut self, output: ValueId, from: &str, command: &Command) -> EResult<()> {
        let spot = self.spot(output)?;
        if spot.literal().is_some() {
            return Err(CodegenError::unsupported(command.name(), "literal output"));
        }
        let dest = self.operand(output, self.size(output))?;
        if dest != from {
            self.asm.add_command("mov", &[&dest, from]);
        }
        Ok(())
    }

    fn arith(
        &mut self,
        command: &Command,
        op: &str,
        output: ValueId,
        left: ValueId,
        right: ValueId,
    ) -> EResult<()> {
        let size = self.size(output);
        let rax = self.scratch(Reg::Rax, size, command)?;
        let lhs = self.operand(left, size)?;
        self.asm.add_command("mov", &[rax, &lhs]);
        let rhs = self.source(right, size)?;
        self.asm.add_command(op, &[rax, &rhs]);
        self.store(output, rax, command)
    }

    fn div(&mut self, command: &Command, output: ValueId, left: ValueId, right: ValueId) -> EResult<()> {
        let size = self.size(output);
        let signed = self.signed(output);
        let rax = self.scratch(Reg::Rax, size, command)?;

        // div has no immediate form
        let divisor = match self.spot(right)? {
            Spot::Literal(lit) => {
                let rsi = self.scratch(Reg::Rsi, size, command)?;
                let lit = self.dialect.literal(lit);
                self.asm.add_command("mov", &[rsi, &lit]);
                rsi.to_string()
            }
            _ => self.operand(right, size)?,
        };

        let lhs = self.operand(left, size)?;
        self.asm.add_command("mov", &[rax, &lhs]);
        if signed {
            let extend = match size {
                8 => "cqo",
                4 => "cdq",
                2 => "cwd",
                _ => return Err(CodegenError::unsupported(command.name(), "1 byte signed division")),
            };
            self.asm.add_command(extend, &[]);
            self.asm.add_command("idiv", &[&divisor]);
        } else {
            if size == 1 {
                self.asm.add_command("movzx", &["eax", "al"]);
            } else {
                self.asm.add_command("xor", &["edx", "edx"]);
            }
            self.asm.add_command("div", &[&divisor]);
        }
        self.store(output, rax, command)
    }

    fn compare(
        &mut self,
        command: &Command,
        setcc: &str,
        output: ValueId,
        left: ValueId,
        right: ValueId,
    ) -> EResult<()> {
        let size = self.size(left);
        let rax = self.scratch(Reg::Rax, size, command)?;
        let lhs = self.operand(left, size)?;
        self.asm.add_command("mov", &[rax, &lhs]);
        let rhs = self.source(right, size)?;
        self.asm.add_command("cmp", &[rax, &rhs]);
        self.asm.add_command(setcc, &["al"]);

        let out_size = self.size(output);
        if out_size == 1 {
            return self.store(output, "al", command);
        }
        self.asm.add_command("movzx", &["eax", "al"]);
        let out = self.scratch(Reg::Rax, out_size, command)?;
        self.store(output, out, command)
    }

    fn set(&mut self, command: &Command, output: ValueId, arg: ValueId) -> EResult<()> {
        let out_size = self.size(output);
        let arg_size = self.size(arg);
        let to_bool = self.il.ctype(output).map_or(false, |c| c.is_bool());

        if let Spot::Literal(lit) = self.spot(arg)? {
            let lit = if to_bool {
                Literal::new((lit.value != 0) as i64)
            } else {
                truncate(*lit, out_size, self.signed(output))
            };
            let text = self.dialect.literal(&lit);
            if self.spot(output)?.is_memory() && out_size == 8 && !lit.fits_imm32() {
                self.asm.add_command("mov", &["rax", &text]);
                return self.store(output, "rax", command);
            }
            let dest = self.operand(output, out_size)?;
            self.asm.add_command("mov", &[&dest, &text]);
            return Ok(());
        }

        if to_bool {
            let src = self.operand(arg, arg_size)?;
            self.asm.add_command("cmp", &[&src, "0"]);
            self.asm.add_command("setne", &["al"]);
            return self.store(output, "al", command);
        }

        if out_size <= arg_size {
            // low bytes sit at the same address on x86
            let src = self.operand(arg, out_size)?;
            let dest = self.operand(output, out_size)?;
            if src == dest {
                return Ok(());
            }
            if self.spot(arg)?.is_memory() && self.spot(output)?.is_memory() {
                let rax = self.scratch(Reg::Rax, out_size, command)?;
                self.asm.add_command("mov", &[rax, &src]);
                return self.store(output, rax, command);
            }
            self.asm.add_command("mov", &[&dest, &src]);
            return Ok(());
        }

        let src = self.operand(arg, arg_size)?;
        let signed = self.signed(arg);
        match (arg_size, signed) {
            (4, true) => self.asm.add_command("movsxd", &["rax", &src]),
            // 32 bit writes clear the upper half
            (4, false) => self.asm.add_command("mov", &["eax", &src]),
            (1 | 2, true) => {
                let rax = self.scratch(Reg::Rax, out_size, command)?;
                self.asm.add_command("movsx", &[rax, &src]);
            }
            (1 | 2, false) => {
                let rax = self.scratch(Reg::Rax, out_size, command)?;
                self.asm.add_command("movzx", &[rax, &src]);
            }
            _ => {
                return Err(CodegenError::unsupported(
                    command.name(),
                    format!("widening {} to {} bytes", arg_size, out_size),
                ))
            }
        }
        let rax = self.scratch(Reg::Rax, out_size, command)?;
        self.store(output, rax, command)
    }

    fn ret(&mut self, command: &Command, arg: ValueId) -> EResult<()> {
        let size = self.size(arg);
        let rax = self.scratch(Reg::Rax, size.max(4), command)?;
        match self.spot(arg)? {
            Spot::Literal(lit) if lit.is_negative() || lit.radix != Radix::Decimal => {
                let magnitude = i64::try_from(lit.value.unsigned_abs()).map_err(|_| {
                    CodegenError::unsupported(command.name(), format!("literal {}", lit))
                })?;
                let magnitude = Literal {
                    value: magnitude,
                    radix: lit.radix,
                };
                let text = self.dialect.literal(&magnitude);
                self.asm.add_command("mov", &[rax, &text]);
                if lit.is_negative() {
                    self.asm.add_command("neg", &[rax]);
                }
            }
            Spot::Literal(lit) => {
                let text = self.dialect.literal(lit);
                self.asm.add_command("mov", &[rax, &text]);
            }
            _ if size < 4 => {
                let src = self.operand(arg, size)?;
                let op = if self.signed(arg) { "movsx" } else { "movzx" };
                self.asm.add_command(op, &["eax", &src]);
            }
            _ => {
                let src = self.operand(arg, size)?;
                self.asm.add_command("mov", &[rax, &src]);
            }
        }
        self.asm.add_command("mov", &["rsp", "rbp"]);
        self.asm.add_command("pop", &["rbp"]);
        self.asm.add_command("ret", &[]);
        Ok(())
    }

    fn cond_jump(&mut self, cond: ValueId, label: LabelId, on_zero: bool) -> EResult<()> {
        let target = label.to_string();
        if let Spot::Literal(lit) = self.spot(cond)? {
            if (lit.value == 0) == on_zero {
                self.asm.add_command("jmp", &[&target]);
            }
            return Ok(());
        }
        let size = self.size(cond);
        let src = self.operand(cond, size)?;
        self.asm.add_command("cmp", &[&src, "0"]);
        self.asm.add_command(if on_zero { "je" } else { "jne" }, &[&target]);
        Ok(())
    }

    fn address_of(&self, command: &Command, var: ValueId) -> EResult<String> {
        match self.spot(var)? {
            Spot::Memory { base, offset } => Ok(self.dialect.address(base, *offset)),
            spot => Err(CodegenError::unsupported(
                command.name(),
                format!("address of {}", spot),
            )),
        }
    }

    fn addr_of(&mut self, command: &Command, output: ValueId, var: ValueId) -> EResult<()> {
        let addr = self.address_of(command, var)?;
        self.asm.add_command("lea", &["r11", &addr]);
        self.store(output, "r11", command)
    }

    fn read_at(&mut self, command: &Command, output: ValueId, addr: ValueId) -> EResult<()> {
        let ptr = self.operand(addr, 8)?;
        self.asm.add_command("mov", &["r11", &ptr]);
        let size = self.size(output);
        let rax = self.scratch(Reg::Rax, size, command)?;
        let pointee = self.dialect.operand(&r11_target(), size)?;
        self.asm.add_command("mov", &[rax, &pointee]);
        self.store(output, rax, command)
    }

    fn set_at(&mut self, command: &Command, addr: ValueId, val: ValueId) -> EResult<()> {
        let ptr = self.operand(addr, 8)?;
        self.asm.add_command("mov", &["r11", &ptr]);
        let size = self.size(val);
        let rax = self.scratch(Reg::Rax, size, command)?;
        let src = self.operand(val, size)?;
        self.asm.add_command("mov", &[rax, &src]);
        let pointee = self.dialect.operand(&r11_target(), size)?;
        self.asm.add_command("mov", &[&pointee, rax]);
        Ok(())
    }
}

fn r11_target() -> Spot {
    Spot::Memory {
        base: MemBase::Reg(Reg::R11),
        offset: 0,
    }
}

/// wrap a literal 2 the width of its destination
fn truncate(lit: Literal, size: u64, signed: bool) -> Literal {
    if size >= 8 {
        return lit;
    }
    let bits = size * 8;
    let mask = (1i64 << bits) - 1;
    let low = lit.value & mask;
    let value = if signed && low >> (bits - 1) == 1 {
        low - (1i64 << bits)
    } else {
        low
    };
    Literal {
        value,
        radix: lit.radix,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_literal() {
        assert_eq!(truncate(Literal::new(300), 1, false).value, 44);
        assert_eq!(truncate(Literal::new(255), 1, true).value, -1);
        assert_eq!(truncate(Literal::new(-1), 4, true).value, -1);
        assert_eq!(truncate(Literal::new(-1), 2, false).value, 0xffff);
        assert_eq!(truncate(Literal::new(1 << 40), 8, true).value, 1 << 40);
    }
}
