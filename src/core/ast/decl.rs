use crate::core::ast::expr::Expr;
use crate::frontend::lexer::token::Token;

/// `specifiers declarator [= init], ...;`
#[derive(Debug, Clone)]
pub struct Declaration {
    pub specifiers: Vec<Token>,
    pub declarators: Vec<InitDeclarator>,
}

#[derive(Debug, Clone)]
pub struct InitDeclarator {
    pub declarator: Declarator,
    pub init: Option<Expr>,
}

/// declarator tree, outermost type constructor first
#[derive(Debug, Clone)]
pub enum Declarator {
    Identifier(Option<Token>), // none 4 abstract declarators
    Pointer(Box<Declarator>),
    Array {
        length: u64,
        inner: Box<Declarator>,
    },
    Function {
        params: Option<Vec<ParamDecl>>, // none 4 `f()`
        inner: Box<Declarator>,
    },
}

#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub specifiers: Vec<Token>,
    pub declarator: Declarator,
}

impl Declarator {
    /// the identifier at the leaf, if any
    pub fn identifier(&self) -> Option<&Token> {
        match self {
            Declarator::Identifier(tok) => tok.as_ref(),
            Declarator::Pointer(inner) => inner.identifier(),
            Declarator::Array { inner, .. } => inner.identifier(),
            Declarator::Function { inner, .. } => inner.identifier(),
        }
    }
}
