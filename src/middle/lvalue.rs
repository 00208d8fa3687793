use crate::core::il::{Command, ILCode, ILValue};
use crate::core::types::CType;

/// addressable view of a value
#[derive(Debug, Clone)]
pub enum LValue {
    /// the value is the storage
    Direct(ILValue),
    /// the value is a pointer 2 the storage
    Indirect(ILValue),
}

impl LValue {
    pub fn ctype(&self) -> CType {
        match self {
            LValue::Direct(value) => value.ctype.clone(),
            LValue::Indirect(addr) => addr.ctype.pointee().cloned().unwrap_or_else(CType::void),
        }
    }

    /// can be the target of an assignment
    pub fn modable(&self) -> bool {
        !self.ctype().is_const && self.initializable()
    }

    /// like `modable` but const objects may still get their initial value
    pub fn initializable(&self) -> bool {
        let ctype = self.ctype();
        !ctype.is_array() && !ctype.is_function() && !ctype.is_incomplete()
    }

    pub fn addr(&self, il: &mut ILCode) -> ILValue {
        match self {
            LValue::Direct(value) => {
                let out = il.new_value(CType::pointer_to(value.ctype.clone()));
                il.add(Command::AddrOf {
                    output: out.id,
                    var: value.id,
                });
                out
            }
            LValue::Indirect(addr) => addr.clone(),
        }
    }

    /// current value of the storage
    pub fn read(&self, il: &mut ILCode) -> ILValue {
        match self {
            LValue::Direct(value) => value.clone(),
            LValue::Indirect(addr) => {
                let out = il.new_value(self.ctype());
                il.add(Command::ReadAt {
                    output: out.id,
                    addr: addr.id,
                });
                out
            }
        }
    }

    /// store an already converted value, returns what was stored
    pub fn store(&self, value: &ILValue, il: &mut ILCode) -> ILValue {
        match self {
            LValue::Direct(var) => {
                il.add(Command::Set {
                    output: var.id,
                    arg: value.id,
                });
                var.clone()
            }
            LValue::Indirect(addr) => {
                il.add(Command::SetAt {
                    addr: addr.id,
                    val: value.id,
                });
                value.clone()
            }
        }
    }
}
