use crate::core::il::value::ValueId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(pub usize);

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__L{}", self.0)
    }
}

/// one flat three address instruction
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // arithmetic, all operands share the output type
    Add { output: ValueId, left: ValueId, right: ValueId },
    Sub { output: ValueId, left: ValueId, right: ValueId },
    Mult { output: ValueId, left: ValueId, right: ValueId },
    Div { output: ValueId, left: ValueId, right: ValueId },
    BitwiseAnd { output: ValueId, left: ValueId, right: ValueId },

    // comparison, output is int
    EqualCmp { output: ValueId, left: ValueId, right: ValueId },
    NotEqualCmp { output: ValueId, left: ValueId, right: ValueId },

    // cast or copy
    Set { output: ValueId, arg: ValueId },

    Return { arg: ValueId },

    // control flow
    Label { label: LabelId },
    Jump { label: LabelId },
    JumpZero { cond: ValueId, label: LabelId },
    JumpNotZero { cond: ValueId, label: LabelId },

    // memory
    AddrOf { output: ValueId, var: ValueId },
    ReadAt { output: ValueId, addr: ValueId },
    SetAt { addr: ValueId, val: ValueId },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Add { .. } => "Add",
            Command::Sub { .. } => "Sub",
            Command::Mult { .. } => "Mult",
            Command::Div { .. } => "Div",
            Command::BitwiseAnd { .. } => "BitwiseAnd",
            Command::EqualCmp { .. } => "EqualCmp",
            Command::NotEqualCmp { .. } => "NotEqualCmp",
            Command::Set { .. } => "Set",
            Command::Return { .. } => "Return",
            Command::Label { .. } => "Label",
            Command::Jump { .. } => "Jump",
            Command::JumpZero { .. } => "JumpZero",
            Command::JumpNotZero { .. } => "JumpNotZero",
            Command::AddrOf { .. } => "AddrOf",
            Command::ReadAt { .. } => "ReadAt",
            Command::SetAt { .. } => "SetAt",
        }
    }

    pub fn inputs(&self) -> Vec<ValueId> {
        match *self {
            Command::Add { left, right, .. }
            | Command::Sub { left, right, .. }
            | Command::Mult { left, right, .. }
            | Command::Div { left, right, .. }
            | Command::BitwiseAnd { left, right, .. }
            | Command::EqualCmp { left, right, .. }
            | Command::NotEqualCmp { left, right, .. } => vec![left, right],
            Command::Set { arg, .. } | Command::Return { arg } => vec![arg],
            Command::Label { .. } | Command::Jump { .. } => Vec::new(),
            Command::JumpZero { cond, .. } | Command::JumpNotZero { cond, .. } => vec![cond],
            Command::AddrOf { var, .. } => vec![var],
            Command::ReadAt { addr, .. } => vec![addr],
            Command::SetAt { addr, val } => vec![addr, val],
        }
    }

    pub fn outputs(&self) -> Vec<ValueId> {
        match *self {
            Command::Add { output, .. }
            | Command::Sub { output, .. }
            | Command::Mult { output, .. }
            | Command::Div { output, .. }
            | Command::BitwiseAnd { output, .. }
            | Command::EqualCmp { output, .. }
            | Command::NotEqualCmp { output, .. }
            | Command::Set { output, .. }
            | Command::AddrOf { output, .. }
            | Command::ReadAt { output, .. } => vec![output],
            _ => Vec::new(),
        }
    }

    /// values whose address escapes and so must live in memory
    pub fn references(&self) -> Vec<ValueId> {
        match *self {
            Command::AddrOf { var, .. } => vec![var],
            _ => Vec::new(),
        }
    }
}

impl Command {
    /// write the command using `name` 4 every value
    pub fn render<W: fmt::Write>(&self, w: &mut W, name: &dyn Fn(ValueId) -> String) -> fmt::Result {
        let binary = |w: &mut W, output: &ValueId, left: &ValueId, op: &str, right: &ValueId| {
            write!(w, "{} = {} {} {}", name(*output), name(*left), op, name(*right))
        };
        match self {
            Command::Add { output, left, right } => binary(w, output, left, "+", right),
            Command::Sub { output, left, right } => binary(w, output, left, "-", right),
            Command::Mult { output, left, right } => binary(w, output, left, "*", right),
            Command::Div { output, left, right } => binary(w, output, left, "/", right),
            Command::BitwiseAnd { output, left, right } => binary(w, output, left, "&", right),
            Command::EqualCmp { output, left, right } => binary(w, output, left, "==", right),
            Command::NotEqualCmp { output, left, right } => binary(w, output, left, "!=", right),
            Command::Set { output, arg } => write!(w, "{} = {}", name(*output), name(*arg)),
            Command::Return { arg } => write!(w, "return {}", name(*arg)),
            Command::Label { label } => write!(w, "{}:", label),
            Command::Jump { label } => write!(w, "jmp {}", label),
            Command::JumpZero { cond, label } => write!(w, "jz {}, {}", name(*cond), label),
            Command::JumpNotZero { cond, label } => write!(w, "jnz {}, {}", name(*cond), label),
            Command::AddrOf { output, var } => write!(w, "{} = &{}", name(*output), name(*var)),
            Command::ReadAt { output, addr } => write!(w, "{} = *{}", name(*output), name(*addr)),
            Command::SetAt { addr, val } => write!(w, "*{} = {}", name(*addr), name(*val)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, &|id| id.to_string())
    }
}
