use crate::core::ast::*;
use crate::core::il::{Command, ILCode, Literal, ScopeGuard, Scoped, SymbolTable};
use crate::core::types::CType;
use crate::error::Reporter;
use crate::middle::cast::{check_cast, set_type};
use crate::middle::error::{LResult, LowerError};
use tracing::debug;

/// turns an ast into flat il.
///
/// semantic errors are recorded per statement or declarator and lowering moves
/// on 2 the next sibling; unsupported features abort the whole unit
pub struct IlLowerer<'r> {
    pub(super) il: ILCode,
    pub(super) symbols: SymbolTable,
    pub(super) reporter: &'r mut Reporter,
}

impl Scoped for IlLowerer<'_> {
    fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }
}

impl<'r> IlLowerer<'r> {
    pub fn new(reporter: &'r mut Reporter) -> Self {
        Self {
            il: ILCode::new(),
            symbols: SymbolTable::new(),
            reporter,
        }
    }

    pub fn lower(mut self, root: &Root) -> Result<ILCode, LowerError> {
        for item in &root.items {
            let result = match item {
                Item::Main(main) => self.lower_main(main),
                Item::Declaration(decl) => self.lower_declaration(decl, true),
            };
            self.recover(result)?;
        }
        debug!(
            commands = self.il.commands.len(),
            values = self.il.value_count(),
            "lowered to il"
        );
        Ok(self.il)
    }

    /// record a semantic error, pass anything fatal up
    pub(super) fn recover(&mut self, result: LResult<()>) -> LResult<()> {
        match result {
            Ok(()) => Ok(()),
            Err(LowerError::Semantic(diag)) => {
                self.reporter.add_diagnostic(diag);
                Ok(())
            }
            Err(fatal) => Err(fatal),
        }
    }

    fn lower_main(&mut self, main: &MainFunction) -> LResult<()> {
        self.lower_compound(&main.body)?;

        // falling off the end returns 0
        let zero = self.il.new_literal(CType::int(), Literal::new(0));
        self.il.add(Command::Return { arg: zero.id });
        Ok(())
    }

    fn lower_compound(&mut self, compound: &CompoundStmt) -> LResult<()> {
        let mut scope = ScopeGuard::enter(self);
        for item in &compound.items {
            let result = match item {
                BlockItem::Stmt(stmt) => scope.lower_stmt(stmt),
                BlockItem::Declaration(decl) => scope.lower_declaration(decl, false),
            };
            scope.recover(result)?;
        }
        Ok(())
    }

    fn lower_stmt(&mut self, stmt: &Stmt) -> LResult<()> {
        match stmt {
            Stmt::Compound(compound) => self.lower_compound(compound),
            Stmt::Return(ret) => self.lower_return(ret),
            Stmt::If(if_stmt) => {
                let result = self.lower_if(if_stmt);
                self.recover(result)
            }
            Stmt::Expr(expr_stmt) => self.lower_expr(&expr_stmt.expr).map(|_| ()),
        }
    }

    fn lower_return(&mut self, ret: &ReturnStmt) -> LResult<()> {
        let value = self.lower_expr(&ret.value)?;
        let int = CType::int();
        check_cast(&value, &int, &ret.return_kw, self.reporter)?;
        let value = set_type(&value, &int, &mut self.il);
        self.il.add(Command::Return { arg: value.id });
        Ok(())
    }

    fn lower_if(&mut self, stmt: &IfStmt) -> LResult<()> {
        let else_label = self.il.get_label();
        let condition = self.lower_expr(&stmt.condition)?;
        self.il.add(Command::JumpZero {
            cond: condition.id,
            label: else_label,
        });
        self.lower_stmt(&stmt.then_branch)?;

        match &stmt.else_branch {
            Some(else_branch) => {
                let end_label = self.il.get_label();
                self.il.add(Command::Jump { label: end_label });
                self.il.add(Command::Label { label: else_label });
                self.lower_stmt(else_branch)?;
                self.il.add(Command::Label { label: end_label });
            }
            None => self.il.add(Command::Label { label: else_label }),
        }
        Ok(())
    }
}

/// lower a parsed unit, semantic errors go 2 `reporter`
pub fn lower(root: &Root, reporter: &mut Reporter) -> Result<ILCode, LowerError> {
    IlLowerer::new(reporter).lower(root)
}
