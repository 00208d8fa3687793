use crate::backend::asm::AsmCode;
use crate::backend::error::CodegenError;
use crate::backend::spot::{MemBase, Spot};
use crate::core::il::{Literal, Radix};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectKind {
    Nasm,
    Masm,
}

impl DialectKind {
    pub fn create(self) -> Box<dyn Dialect> {
        match self {
            DialectKind::Nasm => Box::new(Nasm),
            DialectKind::Masm => Box::new(Masm),
        }
    }
}

/// everything that differs between the assembler syntaxes
pub struct Program<'a> {
    pub body: &'a AsmCode,
    pub externs: Vec<&'a str>,
    pub strings: Vec<(String, &'a [u8])>,
}

/// textual syntax of one assembler
pub trait Dialect {
    fn kind(&self) -> DialectKind;

    /// size prefix of a memory operand, like `DWORD`
    fn size_keyword(&self, size: u64) -> Option<&'static str>;

    fn binary_literal(&self, magnitude: u64) -> String;

    /// wrap the body of main into a complete source file
    fn full_code(&self, program: &Program<'_>) -> String;

    fn literal(&self, lit: &Literal) -> String {
        match lit.radix {
            Radix::Decimal => lit.value.to_string(),
            Radix::Binary if lit.value < 0 => {
                format!("-{}", self.binary_literal(lit.value.unsigned_abs()))
            }
            Radix::Binary => self.binary_literal(lit.value.unsigned_abs()),
        }
    }

    /// unsized address, 4 lea and sized operands
    fn address(&self, base: &MemBase, offset: i64) -> String {
        let base = match base {
            MemBase::Reg(reg) => reg.full().to_string(),
            MemBase::Symbol(name) => name.clone(),
        };
        match offset {
            0 => format!("[{}]", base),
            o if o > 0 => format!("[{}+{}]", base, o),
            o => format!("[{}-{}]", base, o.unsigned_abs()),
        }
    }

    fn operand(&self, spot: &Spot, size: u64) -> Result<String, CodegenError> {
        let bad_size = || CodegenError::unsupported("operand", format!("{} byte access of {}", size, spot));
        match spot {
            Spot::Register(reg) => reg.sized(size).map(str::to_string).ok_or_else(bad_size),
            Spot::Memory { base, offset } => {
                let keyword = self.size_keyword(size).ok_or_else(bad_size)?;
                Ok(format!("{} {}", keyword, self.address(base, *offset)))
            }
            Spot::Literal(lit) => Ok(self.literal(lit)),
        }
    }
}

pub struct Nasm;

impl Dialect for Nasm {
    fn kind(&self) -> DialectKind {
        DialectKind::Nasm
    }

    fn size_keyword(&self, size: u64) -> Option<&'static str> {
        match size {
            1 => Some("BYTE"),
            2 => Some("WORD"),
            4 => Some("DWORD"),
            8 => Some("QWORD"),
            _ => None,
        }
    }

    fn binary_literal(&self, magnitude: u64) -> String {
        format!("0b{:b}", magnitude)
    }

    fn full_code(&self, program: &Program<'_>) -> String {
        let mut out = vec!["global _start".to_string()];
        for name in &program.externs {
            out.push(format!("extern {}", name));
        }
        if !program.strings.is_empty() {
            out.push(String::new());
            out.push("section .data".to_string());
            for (label, bytes) in &program.strings {
                out.push(format!("{}: db {}", label, byte_list(bytes)));
            }
        }
        out.push(String::new());
        out.push("section .text".to_string());
        out.push("_start:".to_string());
        out.push(AsmCode::format_command("call", &["main"]));
        out.push(AsmCode::format_command("mov", &["rdi", "rax"]));
        out.push(AsmCode::format_command("mov", &["rax", "60"]));
        out.push(AsmCode::format_command("syscall", &[]));
        out.push("main:".to_string());
        out.extend(program.body.lines());
        let mut text = out.join("\n");
        text.push('\n');
        text
    }
}

pub struct Masm;

impl Dialect for Masm {
    fn kind(&self) -> DialectKind {
        DialectKind::Masm
    }

    fn size_keyword(&self, size: u64) -> Option<&'static str> {
        match size {
            1 => Some("BYTE PTR"),
            2 => Some("WORD PTR"),
            4 => Some("DWORD PTR"),
            8 => Some("QWORD PTR"),
            _ => None,
        }
    }

    fn binary_literal(&self, magnitude: u64) -> String {
        format!("{:b}b", magnitude)
    }

    fn full_code(&self, program: &Program<'_>) -> String {
        let mut out = vec!["EXTERN ExitProcess:PROC".to_string()];
        for name in &program.externs {
            out.push(format!("EXTERN {}:BYTE", name));
        }
        if !program.strings.is_empty() {
            out.push(String::new());
            out.push(".data".to_string());
            for (label, bytes) in &program.strings {
                out.push(format!("{} BYTE {}", label, byte_list(bytes)));
            }
        }
        out.push(String::new());
        out.push(".code".to_string());
        out.push("_start PROC".to_string());
        out.push(AsmCode::format_command("call", &["main"]));
        // win64 wants shadow space before the call
        out.push(AsmCode::format_command("sub", &["rsp", "40"]));
        out.push(AsmCode::format_command("mov", &["ecx", "eax"]));
        out.push(AsmCode::format_command("call", &["ExitProcess"]));
        out.push("_start ENDP".to_string());
        out.push("main PROC".to_string());
        out.extend(program.body.lines());
        out.push("main ENDP".to_string());
        out.push("END".to_string());
        let mut text = out.join("\n");
        text.push('\n');
        text
    }
}

fn byte_list(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
