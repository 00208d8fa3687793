use std::fmt;

/// x86-64 general purpose registers used by the templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Reg {
    Rax,
    Rbx,
    Rcx,
    Rdx,
    Rsi,
    Rdi,
    R8,
    R9,
    R10,
    R11,
    Rbp,
    Rsp,
}

/// handed out by the allocator
pub const ALLOCATABLE: [Reg; 6] = [Reg::Rbx, Reg::Rcx, Reg::Rdi, Reg::R8, Reg::R9, Reg::R10];

/// reserved 4 instruction templates, never allocated
pub const SCRATCH: [Reg; 4] = [Reg::Rax, Reg::Rdx, Reg::Rsi, Reg::R11];

impl Reg {
    /// names indexed by 8, 4, 2, 1 byte width
    fn names(self) -> [&'static str; 4] {
        match self {
            Reg::Rax => ["rax", "eax", "ax", "al"],
            Reg::Rbx => ["rbx", "ebx", "bx", "bl"],
            Reg::Rcx => ["rcx", "ecx", "cx", "cl"],
            Reg::Rdx => ["rdx", "edx", "dx", "dl"],
            Reg::Rsi => ["rsi", "esi", "si", "sil"],
            Reg::Rdi => ["rdi", "edi", "di", "dil"],
            Reg::R8 => ["r8", "r8d", "r8w", "r8b"],
            Reg::R9 => ["r9", "r9d", "r9w", "r9b"],
            Reg::R10 => ["r10", "r10d", "r10w", "r10b"],
            Reg::R11 => ["r11", "r11d", "r11w", "r11b"],
            Reg::Rbp => ["rbp", "ebp", "bp", "bpl"],
            Reg::Rsp => ["rsp", "esp", "sp", "spl"],
        }
    }

    /// name at a width in bytes, none 4 widths other than 1, 2, 4 and 8
    pub fn sized(self, size: u64) -> Option<&'static str> {
        let names = self.names();
        match size {
            8 => Some(names[0]),
            4 => Some(names[1]),
            2 => Some(names[2]),
            1 => Some(names[3]),
            _ => None,
        }
    }

    pub fn full(self) -> &'static str {
        self.names()[0]
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sized_names() {
        assert_eq!(Reg::Rax.sized(4), Some("eax"));
        assert_eq!(Reg::R9.sized(1), Some("r9b"));
        assert_eq!(Reg::Rsi.sized(1), Some("sil"));
        assert_eq!(Reg::Rdi.sized(3), None);
    }

    #[test]
    fn test_scratch_never_allocated() {
        for reg in SCRATCH {
            assert!(!ALLOCATABLE.contains(&reg));
        }
    }
}
