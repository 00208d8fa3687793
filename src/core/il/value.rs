use crate::core::types::CType;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(pub usize);

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// storage independent value with its c type
#[derive(Debug, Clone, PartialEq)]
pub struct ILValue {
    pub id: ValueId,
    pub ctype: CType,
    pub null_ptr_const: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    Decimal,
    Binary,
}

/// compile time constant, keeps the radix it was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal {
    pub value: i64,
    pub radix: Radix,
}

impl Literal {
    pub fn new(value: i64) -> Self {
        Self {
            value,
            radix: Radix::Decimal,
        }
    }

    pub fn binary(value: i64) -> Self {
        Self {
            value,
            radix: Radix::Binary,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.value < 0
    }

    /// does this literal fit a sign extended imm32
    pub fn fits_imm32(&self) -> bool {
        i32::try_from(self.value).is_ok()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.radix {
            Radix::Decimal => write!(f, "{}", self.value),
            Radix::Binary if self.value < 0 => write!(f, "-0b{:b}", self.value.unsigned_abs()),
            Radix::Binary => write!(f, "0b{:b}", self.value),
        }
    }
}

/// what a value id stands 4
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    Temp,
    Literal(Literal),
    StringLiteral(usize),
    Extern(String),
    Local(String),
}
