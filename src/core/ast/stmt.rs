use crate::core::ast::decl::Declaration;
use crate::core::ast::expr::Expr;
use crate::frontend::lexer::token::Token;

#[derive(Debug, Clone)]
pub enum Stmt {
    Compound(CompoundStmt),
    Return(ReturnStmt),
    If(IfStmt),
    Expr(ExprStmt),
}

#[derive(Debug, Clone)]
pub enum BlockItem {
    Stmt(Stmt),
    Declaration(Declaration),
}

#[derive(Debug, Clone)]
pub struct CompoundStmt {
    pub items: Vec<BlockItem>,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Expr,
    pub return_kw: Token,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
}

#[derive(Debug, Clone)]
pub struct ExprStmt {
    pub expr: Expr,
}
