use crate::core::ast::decl::{Declaration, Declarator, ParamDecl};
use crate::core::ast::item::{MainFunction, Root};
use crate::core::ast::stmt::*;
use crate::core::ast::visitor::{walk_compound, AstVisitor};
use std::fmt;

/// indented dump of an ast 4 --show-tree
pub struct TreePrinter {
    out: String,
    depth: usize,
}

impl TreePrinter {
    pub fn print(root: &Root) -> String {
        let mut printer = Self {
            out: String::new(),
            depth: 0,
        };
        printer.line("Root");
        printer.depth += 1;
        printer.visit_root(root);
        printer.out
    }

    fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }
}

impl AstVisitor for TreePrinter {
    fn visit_main(&mut self, main: &MainFunction) {
        self.line("Main");
        self.nested(|p| p.visit_compound(&main.body));
    }

    fn visit_declaration(&mut self, decl: &Declaration) {
        let specs = decl
            .specifiers
            .iter()
            .map(|t| t.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        if decl.declarators.is_empty() {
            self.line(format!("Declaration {}", specs));
        }
        for init in &decl.declarators {
            match &init.init {
                Some(expr) => self.line(format!("Declaration {} {} = {}", specs, init.declarator, expr)),
                None => self.line(format!("Declaration {} {}", specs, init.declarator)),
            }
        }
    }

    fn visit_compound(&mut self, compound: &CompoundStmt) {
        self.line("Compound");
        self.nested(|p| walk_compound(p, compound));
    }

    fn visit_return(&mut self, stmt: &ReturnStmt) {
        self.line(format!("Return {}", stmt.value));
    }

    fn visit_if(&mut self, stmt: &IfStmt) {
        self.line(format!("If {}", stmt.condition));
        self.nested(|p| p.visit_stmt(&stmt.then_branch));
        if let Some(else_branch) = &stmt.else_branch {
            self.line("Else");
            self.nested(|p| p.visit_stmt(else_branch));
        }
    }

    fn visit_expr_stmt(&mut self, stmt: &ExprStmt) {
        self.line(format!("Expr {}", stmt.expr));
    }
}

impl fmt::Display for Declarator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declarator::Identifier(Some(tok)) => write!(f, "{}", tok),
            Declarator::Identifier(None) => Ok(()),
            Declarator::Pointer(inner) => write!(f, "*{}", inner),
            Declarator::Array { length, inner } => match **inner {
                Declarator::Pointer(_) => write!(f, "({})[{}]", inner, length),
                _ => write!(f, "{}[{}]", inner, length),
            },
            Declarator::Function { params, inner } => {
                match **inner {
                    Declarator::Pointer(_) => write!(f, "({})(", inner)?,
                    _ => write!(f, "{}(", inner)?,
                }
                match params {
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
        }
    }
}

impl fmt::Display for ParamDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let specs = self
            .specifiers
            .iter()
            .map(|t| t.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        match self.declarator {
            Declarator::Identifier(None) => write!(f, "{}", specs),
            _ => write!(f, "{} {}", specs, self.declarator),
        }
    }
}
