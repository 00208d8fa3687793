use std::fmt;

pub const INT_MIN: i128 = i32::MIN as i128;
pub const INT_MAX: i128 = i32::MAX as i128;
pub const LONG_MIN: i128 = i64::MIN as i128;
pub const LONG_MAX: i128 = i64::MAX as i128;

/// the closed set of integer types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegerType {
    Bool,
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
}

impl IntegerType {
    pub fn size_in_bytes(&self) -> u64 {
        match self {
            IntegerType::Bool | IntegerType::Char | IntegerType::UChar => 1,
            IntegerType::Short | IntegerType::UShort => 2,
            IntegerType::Int | IntegerType::UInt => 4,
            IntegerType::Long
            | IntegerType::ULong
            | IntegerType::LongLong
            | IntegerType::ULongLong => 8,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            IntegerType::Char
                | IntegerType::Short
                | IntegerType::Int
                | IntegerType::Long
                | IntegerType::LongLong
        )
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, IntegerType::Bool)
    }

    /// integer conversion rank
    pub fn rank(&self) -> u8 {
        match self {
            IntegerType::Bool => 0,
            IntegerType::Char | IntegerType::UChar => 1,
            IntegerType::Short | IntegerType::UShort => 2,
            IntegerType::Int | IntegerType::UInt => 3,
            IntegerType::Long | IntegerType::ULong => 4,
            IntegerType::LongLong | IntegerType::ULongLong => 5,
        }
    }

    pub fn to_unsigned(self) -> Self {
        match self {
            IntegerType::Char => IntegerType::UChar,
            IntegerType::Short => IntegerType::UShort,
            IntegerType::Int => IntegerType::UInt,
            IntegerType::Long => IntegerType::ULong,
            IntegerType::LongLong => IntegerType::ULongLong,
            other => other,
        }
    }

    /// smallest integer type a decimal literal fits in
    pub fn for_literal(value: i128) -> Option<Self> {
        if (INT_MIN..=INT_MAX).contains(&value) {
            Some(IntegerType::Int)
        } else if (LONG_MIN..=LONG_MAX).contains(&value) {
            Some(IntegerType::Long)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IntegerType::Bool => "_Bool",
            IntegerType::Char => "char",
            IntegerType::UChar => "unsigned char",
            IntegerType::Short => "short",
            IntegerType::UShort => "unsigned short",
            IntegerType::Int => "int",
            IntegerType::UInt => "unsigned int",
            IntegerType::Long => "long",
            IntegerType::ULong => "unsigned long",
            IntegerType::LongLong => "long long",
            IntegerType::ULongLong => "unsigned long long",
        }
    }

    pub const ALL: [IntegerType; 11] = [
        IntegerType::Bool,
        IntegerType::Char,
        IntegerType::UChar,
        IntegerType::Short,
        IntegerType::UShort,
        IntegerType::Int,
        IntegerType::UInt,
        IntegerType::Long,
        IntegerType::ULong,
        IntegerType::LongLong,
        IntegerType::ULongLong,
    ];
}

impl fmt::Display for IntegerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_boundaries() {
        assert_eq!(IntegerType::for_literal(INT_MAX), Some(IntegerType::Int));
        assert_eq!(IntegerType::for_literal(INT_MIN), Some(IntegerType::Int));
        assert_eq!(IntegerType::for_literal(INT_MAX + 1), Some(IntegerType::Long));
        assert_eq!(IntegerType::for_literal(LONG_MIN), Some(IntegerType::Long));
        assert_eq!(IntegerType::for_literal(LONG_MAX + 1), None);
    }

    #[test]
    fn test_to_unsigned_keeps_size() {
        for t in IntegerType::ALL {
            assert_eq!(t.size_in_bytes(), t.to_unsigned().size_in_bytes());
            assert!(!t.to_unsigned().is_signed());
        }
    }
}
