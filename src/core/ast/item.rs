use crate::core::ast::decl::Declaration;
use crate::core::ast::stmt::CompoundStmt;

/// a whole translation unit
#[derive(Debug, Clone, Default)]
pub struct Root {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone)]
pub enum Item {
    Main(MainFunction),
    Declaration(Declaration),
}

/// `int main() { ... }`
#[derive(Debug, Clone)]
pub struct MainFunction {
    pub body: CompoundStmt,
}
