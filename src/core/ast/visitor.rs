use crate::core::ast::decl::Declaration;
use crate::core::ast::expr::Expr;
use crate::core::ast::item::{Item, MainFunction, Root};
use crate::core::ast::stmt::*;

/// read only traversal, override what u need and call the walk_* fns 2 recurse
pub trait AstVisitor {
    fn visit_root(&mut self, root: &Root) {
        walk_root(self, root);
    }

    fn visit_main(&mut self, main: &MainFunction) {
        self.visit_compound(&main.body);
    }

    fn visit_declaration(&mut self, decl: &Declaration) {
        walk_declaration(self, decl);
    }

    fn visit_compound(&mut self, compound: &CompoundStmt) {
        walk_compound(self, compound);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_return(&mut self, stmt: &ReturnStmt) {
        self.visit_expr(&stmt.value);
    }

    fn visit_if(&mut self, stmt: &IfStmt) {
        walk_if(self, stmt);
    }

    fn visit_expr_stmt(&mut self, stmt: &ExprStmt) {
        self.visit_expr(&stmt.expr);
    }

    fn visit_expr(&mut self, _expr: &Expr) {}
}

pub fn walk_root<V: AstVisitor + ?Sized>(v: &mut V, root: &Root) {
    for item in &root.items {
        match item {
            Item::Main(main) => v.visit_main(main),
            Item::Declaration(decl) => v.visit_declaration(decl),
        }
    }
}

pub fn walk_declaration<V: AstVisitor + ?Sized>(v: &mut V, decl: &Declaration) {
    for init in decl.declarators.iter().filter_map(|d| d.init.as_ref()) {
        v.visit_expr(init);
    }
}

pub fn walk_compound<V: AstVisitor + ?Sized>(v: &mut V, compound: &CompoundStmt) {
    for item in &compound.items {
        match item {
            BlockItem::Stmt(stmt) => v.visit_stmt(stmt),
            BlockItem::Declaration(decl) => v.visit_declaration(decl),
        }
    }
}

pub fn walk_stmt<V: AstVisitor + ?Sized>(v: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::Compound(s) => v.visit_compound(s),
        Stmt::Return(s) => v.visit_return(s),
        Stmt::If(s) => v.visit_if(s),
        Stmt::Expr(s) => v.visit_expr_stmt(s),
    }
}

pub fn walk_if<V: AstVisitor + ?Sized>(v: &mut V, stmt: &IfStmt) {
    v.visit_expr(&stmt.condition);
    v.visit_stmt(&stmt.then_branch);
    if let Some(else_branch) = &stmt.else_branch {
        v.visit_stmt(else_branch);
    }
}
