use crate::backend::register::Reg;
use crate::core::il::Literal;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemBase {
    Reg(Reg),
    Symbol(String),
}

/// where an il value lives at run time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Spot {
    Register(Reg),
    Memory { base: MemBase, offset: i64 },
    Literal(Literal),
}

impl Spot {
    pub fn stack(offset: i64) -> Self {
        Spot::Memory {
            base: MemBase::Reg(Reg::Rbp),
            offset,
        }
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Spot::Memory {
            base: MemBase::Symbol(name.into()),
            offset: 0,
        }
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, Spot::Memory { .. })
    }

    pub fn literal(&self) -> Option<Literal> {
        match self {
            Spot::Literal(lit) => Some(*lit),
            _ => None,
        }
    }
}

impl fmt::Display for Spot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spot::Register(reg) => write!(f, "{}", reg),
            Spot::Memory { base, offset } => {
                let base = match base {
                    MemBase::Reg(reg) => reg.full().to_string(),
                    MemBase::Symbol(name) => name.clone(),
                };
                match offset {
                    0 => write!(f, "[{}]", base),
                    o if *o > 0 => write!(f, "[{}+{}]", base, o),
                    o => write!(f, "[{}-{}]", base, o.unsigned_abs()),
                }
            }
            Spot::Literal(lit) => write!(f, "{}", lit),
        }
    }
}
