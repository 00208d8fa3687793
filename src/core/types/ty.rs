use crate::core::types::composite::{ArrayType, FunctionType, StructType};
use crate::core::types::primitive::IntegerType;
use std::fmt;

pub const POINTER_SIZE: u64 = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Void,
    Integer(IntegerType),
    Pointer(Box<CType>),
    Array(ArrayType),
    Function(FunctionType),
    Struct(StructType),
}

/// a c type plus its top level const qualifier
#[derive(Debug, Clone, PartialEq)]
pub struct CType {
    pub kind: TypeKind,
    pub is_const: bool,
}

impl CType {
    pub fn new(kind: TypeKind) -> Self {
        Self { kind, is_const: false }
    }

    pub fn void() -> Self {
        Self::new(TypeKind::Void)
    }

    pub fn integer(int: IntegerType) -> Self {
        Self::new(TypeKind::Integer(int))
    }

    pub fn bool() -> Self {
        Self::integer(IntegerType::Bool)
    }

    pub fn char() -> Self {
        Self::integer(IntegerType::Char)
    }

    pub fn int() -> Self {
        Self::integer(IntegerType::Int)
    }

    pub fn uint() -> Self {
        Self::integer(IntegerType::UInt)
    }

    pub fn long() -> Self {
        Self::integer(IntegerType::Long)
    }

    pub fn ulong() -> Self {
        Self::integer(IntegerType::ULong)
    }

    pub fn pointer_to(pointee: CType) -> Self {
        Self::new(TypeKind::Pointer(Box::new(pointee)))
    }

    pub fn array_of(element: CType, length: Option<u64>) -> Self {
        Self::new(TypeKind::Array(ArrayType {
            element: Box::new(element),
            length,
        }))
    }

    pub fn function(params: Option<Vec<CType>>, return_type: CType) -> Self {
        Self::new(TypeKind::Function(FunctionType {
            params,
            return_type: Box::new(return_type),
        }))
    }

    pub fn structure(st: StructType) -> Self {
        Self::new(TypeKind::Struct(st))
    }

    /// byte size used 4 layout and pointer arithmetic
    pub fn size(&self) -> u64 {
        match &self.kind {
            TypeKind::Void => 1,
            TypeKind::Integer(i) => i.size_in_bytes(),
            TypeKind::Pointer(_) => POINTER_SIZE,
            TypeKind::Array(a) => a.length.unwrap_or(0) * a.element.size(),
            TypeKind::Function(_) => 1,
            TypeKind::Struct(s) => s.size(),
        }
    }

    /// compatibility ignoring top level qualifiers
    pub fn weak_compatible(&self, other: &CType) -> bool {
        match (&self.kind, &other.kind) {
            (TypeKind::Void, TypeKind::Void) => true,
            (TypeKind::Integer(a), TypeKind::Integer(b)) => a == b,
            (TypeKind::Pointer(a), TypeKind::Pointer(b)) => a.compatible(b),
            (TypeKind::Array(a), TypeKind::Array(b)) => {
                a.element.compatible(&b.element)
                    && match (a.length, b.length) {
                        (Some(n), Some(m)) => n == m,
                        _ => true,
                    }
            }
            (TypeKind::Function(a), TypeKind::Function(b)) => {
                if !a.return_type.compatible(&b.return_type) {
                    return false;
                }
                match (&a.params, &b.params) {
                    (Some(pa), Some(pb)) => {
                        pa.len() == pb.len() && pa.iter().zip(pb).all(|(x, y)| x.compatible(y))
                    }
                    _ => true,
                }
            }
            (TypeKind::Struct(a), TypeKind::Struct(b)) => a.same_decl(b),
            _ => false,
        }
    }

    pub fn compatible(&self, other: &CType) -> bool {
        self.weak_compatible(other) && self.is_const == other.is_const
    }

    pub fn make_const(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            is_const: true,
        }
    }

    pub fn make_unqual(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            is_const: false,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeKind::Void)
    }

    pub fn is_integral(&self) -> bool {
        matches!(self.kind, TypeKind::Integer(_))
    }

    pub fn is_arith(&self) -> bool {
        self.is_integral()
    }

    pub fn is_bool(&self) -> bool {
        matches!(self.kind, TypeKind::Integer(IntegerType::Bool))
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self.kind, TypeKind::Pointer(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, TypeKind::Function(_))
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct(_))
    }

    pub fn is_scalar(&self) -> bool {
        self.is_arith() || self.is_pointer()
    }

    pub fn is_complete(&self) -> bool {
        match &self.kind {
            TypeKind::Void | TypeKind::Function(_) => false,
            TypeKind::Integer(_) | TypeKind::Pointer(_) => true,
            TypeKind::Array(a) => a.length.is_some(),
            TypeKind::Struct(s) => s.is_complete(),
        }
    }

    pub fn is_incomplete(&self) -> bool {
        match &self.kind {
            TypeKind::Void => true,
            TypeKind::Array(a) => a.length.is_none(),
            TypeKind::Struct(s) => !s.is_complete(),
            _ => false,
        }
    }

    /// every type that is not a function type
    pub fn is_object(&self) -> bool {
        !self.is_function()
    }

    pub fn is_signed(&self) -> bool {
        match self.kind {
            TypeKind::Integer(i) => i.is_signed(),
            _ => false,
        }
    }

    pub fn integer_type(&self) -> Option<IntegerType> {
        match self.kind {
            TypeKind::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn pointee(&self) -> Option<&CType> {
        match &self.kind {
            TypeKind::Pointer(p) => Some(p),
            _ => None,
        }
    }

    pub fn element(&self) -> Option<&CType> {
        match &self.kind {
            TypeKind::Array(a) => Some(&a.element),
            _ => None,
        }
    }

    /// pointer to complete object type
    pub fn is_object_pointer(&self) -> bool {
        self.pointee()
            .map(|p| p.is_object() && p.is_complete())
            .unwrap_or(false)
    }

    pub fn to_unsigned(&self) -> Self {
        match self.kind {
            TypeKind::Integer(i) => Self {
                kind: TypeKind::Integer(i.to_unsigned()),
                is_const: self.is_const,
            },
            _ => self.clone(),
        }
    }
}

impl fmt::Display for CType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const {
            write!(f, "const ")?;
        }
        match &self.kind {
            TypeKind::Void => write!(f, "void"),
            TypeKind::Integer(i) => write!(f, "{}", i),
            TypeKind::Pointer(p) => write!(f, "{} *", p),
            TypeKind::Array(a) => match a.length {
                Some(n) => write!(f, "{}[{}]", a.element, n),
                None => write!(f, "{}[]", a.element),
            },
            TypeKind::Function(func) => {
                write!(f, "{}(", func.return_type)?;
                match &func.params {
                    None => {}
                    Some(params) if params.is_empty() => write!(f, "void")?,
                    Some(params) => {
                        for (i, p) in params.iter().enumerate() {
                            if i > 0 {
                                write!(f, ", ")?;
                            }
                            write!(f, "{}", p)?;
                        }
                    }
                }
                write!(f, ")")
            }
            TypeKind::Struct(s) => write!(f, "struct {}", s.tag().unwrap_or("<anonymous>")),
        }
    }
}
