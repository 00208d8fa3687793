use crate::core::types::ty::CType;
use std::cell::OnceCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    pub element: Box<CType>,
    pub length: Option<u64>, // none when incomplete
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub params: Option<Vec<CType>>, // none for `f()`
    pub return_type: Box<CType>,
}

impl FunctionType {
    pub fn no_info(&self) -> bool {
        self.params.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    pub offset: u64,
    pub ctype: CType,
}

#[derive(Debug)]
pub struct StructDecl {
    pub tag: Option<String>,
    members: OnceCell<Vec<Member>>,
}

/// struct type, identified by its declaration
#[derive(Debug, Clone)]
pub struct StructType {
    decl: Rc<StructDecl>,
}

impl StructType {
    /// declare a new, incomplete struct
    pub fn declare(tag: Option<String>) -> Self {
        Self {
            decl: Rc::new(StructDecl {
                tag,
                members: OnceCell::new(),
            }),
        }
    }

    pub fn tag(&self) -> Option<&str> {
        self.decl.tag.as_deref()
    }

    /// complete the struct, laying members out back to back
    pub fn set_members(&self, members: Vec<(String, CType)>) -> Result<(), String> {
        let mut offset = 0;
        let mut laid_out = Vec::with_capacity(members.len());
        for (name, ctype) in members {
            if laid_out.iter().any(|m: &Member| m.name == name) {
                return Err(format!("duplicate member '{}'", name));
            }
            let size = ctype.size();
            laid_out.push(Member { name, offset, ctype });
            offset += size;
        }
        self.decl
            .members
            .set(laid_out)
            .map_err(|_| format!("redefinition of 'struct {}'", self.tag().unwrap_or("<anonymous>")))
    }

    pub fn members(&self) -> Option<&[Member]> {
        self.decl.members.get().map(Vec::as_slice)
    }

    pub fn is_complete(&self) -> bool {
        self.decl.members.get().is_some()
    }

    pub fn size(&self) -> u64 {
        match self.members() {
            Some(members) => members.iter().map(|m| m.ctype.size()).sum(),
            None => 1,
        }
    }

    pub fn same_decl(&self, other: &StructType) -> bool {
        Rc::ptr_eq(&self.decl, &other.decl)
    }
}

impl PartialEq for StructType {
    fn eq(&self, other: &Self) -> bool {
        self.same_decl(other)
    }
}
