use crate::core::ast::decl::*;
use crate::core::ast::expr::Expr;
use crate::core::ast::item::*;
use crate::core::ast::stmt::*;
use crate::error::{Diagnostic, Reporter};
use crate::frontend::lexer::token::{Token, TokenKind};
use crate::frontend::parser::error::{MessageType, ParserError};
use crate::frontend::parser::expr::ExpressionParser;
use tracing::debug;

pub type PResult<T> = Result<T, ParserError>;

/// recursive descent parser 4 statements and declarations.
///
/// every `parse_*` fn tries one grammar rule at `index` and returns the node
/// plus the index after its last token. when a rule has alternatives the
/// failures are logged and the one that got furthest is reported
pub struct Parser<'a> {
    tokens: Vec<Token>,
    reporter: &'a mut Reporter,
    best_error: Option<ParserError>,
    literal_diagnostics: Vec<Diagnostic>,
}

const DECL_SPECIFIERS: &[TokenKind] = &[
    TokenKind::Void,
    TokenKind::Bool,
    TokenKind::Char,
    TokenKind::Short,
    TokenKind::Int,
    TokenKind::Long,
    TokenKind::Signed,
    TokenKind::Unsigned,
    TokenKind::Auto,
    TokenKind::Static,
    TokenKind::Extern,
    TokenKind::Const,
];

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, reporter: &'a mut Reporter) -> Self {
        Self {
            tokens,
            reporter,
            best_error: None,
            literal_diagnostics: Vec::new(),
        }
    }

    /// parse the whole token list, none if a syntax error was reported
    pub fn parse(&mut self) -> Option<Root> {
        let root = match self.parse_root(0) {
            Ok((root, _)) => Some(root),
            Err(e) => {
                self.log_error(e);
                if let Some(best) = self.best_error.take() {
                    debug!(amount_parsed = best.amount_parsed, "parse failed");
                    self.reporter.add_diagnostic(best.to_diagnostic());
                }
                None
            }
        };

        // alternatives may reparse the same literal, report each once
        let mut seen: Vec<(Option<codespan::Span>, String)> = Vec::new();
        for diag in std::mem::take(&mut self.literal_diagnostics) {
            let key = (diag.position.map(|p| p.span), diag.message.clone());
            if !seen.contains(&key) {
                seen.push(key);
                self.reporter.add_diagnostic(diag);
            }
        }

        if let Some(root) = &root {
            debug!(items = root.items.len(), "parsed translation unit");
        }
        root
    }

    fn parse_root(&mut self, mut index: usize) -> PResult<(Root, usize)> {
        let mut items = Vec::new();
        loop {
            match self.parse_main(index) {
                Ok((main, next)) => {
                    items.push(Item::Main(main));
                    index = next;
                    continue;
                }
                Err(e) => self.log_error(e),
            }

            match self.parse_declaration(index) {
                Ok((decl, next)) => {
                    items.push(Item::Declaration(decl));
                    index = next;
                    continue;
                }
                Err(e) => self.log_error(e),
            }

            break;
        }

        if index < self.tokens.len() {
            return Err(self.error("unexpected token", index, MessageType::At));
        }
        Ok((Root { items }, index))
    }

    fn parse_main(&mut self, index: usize) -> PResult<(MainFunction, usize)> {
        let err = "expected main function starting";
        let index = self.match_token(index, TokenKind::Int, err, MessageType::At)?;
        if !self
            .tokens
            .get(index)
            .map_or(false, |t| t.is(TokenKind::Identifier) && t.content == "main")
        {
            return Err(self.error(err, index, MessageType::At));
        }
        let index = self.match_token(index + 1, TokenKind::OpenParen, err, MessageType::At)?;
        let index = self.match_token(index, TokenKind::CloseParen, err, MessageType::At)?;

        let (body, index) = self.parse_compound_statement(index)?;
        Ok((MainFunction { body }, index))
    }

    fn parse_statement(&mut self, index: usize) -> PResult<(Stmt, usize)> {
        match self.parse_compound_statement(index) {
            Ok((stmt, next)) => return Ok((Stmt::Compound(stmt), next)),
            Err(e) => self.log_error(e),
        }

        match self.parse_return(index) {
            Ok(res) => return Ok(res),
            Err(e) => self.log_error(e),
        }

        match self.parse_if_statement(index) {
            Ok(res) => return Ok(res),
            Err(e) => self.log_error(e),
        }

        self.parse_expr_statement(index)
    }

    fn parse_compound_statement(&mut self, index: usize) -> PResult<(CompoundStmt, usize)> {
        let mut index = self.match_token(index, TokenKind::OpenBrace, "expected '{'", MessageType::Got)?;

        let mut items = Vec::new();
        loop {
            match self.parse_statement(index) {
                Ok((stmt, next)) => {
                    items.push(BlockItem::Stmt(stmt));
                    index = next;
                    continue;
                }
                Err(e) => self.log_error(e),
            }

            match self.parse_declaration(index) {
                Ok((decl, next)) => {
                    items.push(BlockItem::Declaration(decl));
                    index = next;
                }
                Err(e) => {
                    self.log_error(e);
                    break;
                }
            }
        }

        let index = self.match_token(index, TokenKind::CloseBrace, "expected '}'", MessageType::Got)?;
        Ok((CompoundStmt { items }, index))
    }

    fn parse_return(&mut self, index: usize) -> PResult<(Stmt, usize)> {
        let index = self.match_token(
            index,
            TokenKind::Return,
            "expected keyword 'return'",
            MessageType::Got,
        )?;
        let return_kw = self.tokens[index - 1].clone();
        let (value, index) = self.parse_expression(index)?;
        let index = self.expect_semicolon(index)?;
        Ok((Stmt::Return(ReturnStmt { value, return_kw }), index))
    }

    fn parse_if_statement(&mut self, index: usize) -> PResult<(Stmt, usize)> {
        let index = self.match_token(index, TokenKind::If, "expected keyword 'if'", MessageType::Got)?;
        let index = self.match_token(index, TokenKind::OpenParen, "expected '('", MessageType::After)?;
        let (condition, index) = self.parse_expression(index)?;
        let index = self.match_token(index, TokenKind::CloseParen, "expected ')'", MessageType::After)?;
        let (then_branch, mut index) = self.parse_statement(index)?;

        let mut else_branch = None;
        if self.next_token_is(index, TokenKind::Else) {
            let (stmt, next) = self.parse_statement(index + 1)?;
            else_branch = Some(Box::new(stmt));
            index = next;
        }

        Ok((
            Stmt::If(IfStmt {
                condition,
                then_branch: Box::new(then_branch),
                else_branch,
            }),
            index,
        ))
    }

    fn parse_expr_statement(&mut self, index: usize) -> PResult<(Stmt, usize)> {
        let (expr, index) = self.parse_expression(index)?;
        // a stray token here is more often a broken expression than a missing `;`
        let index = self.match_token(
            index,
            TokenKind::Semicolon,
            "missing semicolon or malformed expression",
            MessageType::After,
        )?;
        Ok((Stmt::Expr(ExprStmt { expr }), index))
    }

    fn parse_expression(&mut self, index: usize) -> PResult<(Expr, usize)> {
        ExpressionParser::new(&self.tokens, &mut self.literal_diagnostics).parse(index)
    }

    fn parse_declaration(&mut self, index: usize) -> PResult<(Declaration, usize)> {
        let (specifiers, mut index) = self.parse_decl_specifiers(index)?;

        if self.next_token_is(index, TokenKind::Semicolon) {
            return Ok((
                Declaration {
                    specifiers,
                    declarators: Vec::new(),
                },
                index + 1,
            ));
        }

        let mut declarators = Vec::new();
        loop {
            let end = self.find_decl_end(index)?;
            let declarator = self.parse_declarator(index, end)?;
            index = end;

            let init = if self.next_token_is(index, TokenKind::Equals) {
                let (expr, next) = self.parse_expression(index + 1)?;
                index = next;
                Some(expr)
            } else {
                None
            };
            declarators.push(InitDeclarator { declarator, init });

            if self.next_token_is(index, TokenKind::Comma) {
                index += 1;
            } else {
                break;
            }
        }

        let index = self.expect_semicolon(index)?;
        Ok((
            Declaration {
                specifiers,
                declarators,
            },
            index,
        ))
    }

    fn parse_decl_specifiers(&mut self, mut index: usize) -> PResult<(Vec<Token>, usize)> {
        let mut specs = Vec::new();
        while let Some(tok) = self.tokens.get(index) {
            if !DECL_SPECIFIERS.contains(&tok.kind) {
                break;
            }
            specs.push(tok.clone());
            index += 1;
        }

        if specs.is_empty() {
            return Err(self.error("expected declaration specifier", index, MessageType::At));
        }
        Ok((specs, index))
    }

    fn find_pair_forward(
        &self,
        index: usize,
        open: TokenKind,
        close: TokenKind,
        message: &str,
    ) -> PResult<usize> {
        let mut depth = 0i32;
        for i in index..self.tokens.len() {
            if self.tokens[i].is(open) {
                depth += 1;
            } else if self.tokens[i].is(close) {
                depth -= 1;
            }
            if depth == 0 {
                return Ok(i);
            }
        }
        Err(self.error(message, index, MessageType::At))
    }

    fn find_pair_backward(
        &self,
        index: usize,
        open: TokenKind,
        close: TokenKind,
        message: &str,
    ) -> PResult<usize> {
        let mut depth = 0i32;
        for i in (0..=index).rev() {
            if self.tokens[i].is(close) {
                depth += 1;
            } else if self.tokens[i].is(open) {
                depth -= 1;
            }
            if depth == 0 {
                return Ok(i);
            }
        }
        Err(self.error(message, index, MessageType::At))
    }

    /// index one past the declarator starting at `index`
    fn find_decl_end(&self, index: usize) -> PResult<usize> {
        match self.tokens.get(index).map(|t| t.kind) {
            Some(TokenKind::Star) | Some(TokenKind::Identifier) => self.find_decl_end(index + 1),
            Some(TokenKind::OpenParen) => {
                let close = self.find_pair_forward(
                    index,
                    TokenKind::OpenParen,
                    TokenKind::CloseParen,
                    "mismatched parentheses in declaration",
                )?;
                self.find_decl_end(close + 1)
            }
            Some(TokenKind::OpenBracket) => {
                let close = self.find_pair_forward(
                    index,
                    TokenKind::OpenBracket,
                    TokenKind::CloseBracket,
                    "mismatched square brackets in declaration",
                )?;
                self.find_decl_end(close + 1)
            }
            _ => Ok(index),
        }
    }

    /// declarator over tokens `start..end`, abstract if it names nothing
    fn parse_declarator(&mut self, start: usize, end: usize) -> PResult<Declarator> {
        if start >= end {
            return Ok(Declarator::Identifier(None));
        }
        if start + 1 == end && self.tokens[start].is(TokenKind::Identifier) {
            return Ok(Declarator::Identifier(Some(self.tokens[start].clone())));
        }

        if self.tokens[start].is(TokenKind::OpenParen)
            && self.find_pair_forward(
                start,
                TokenKind::OpenParen,
                TokenKind::CloseParen,
                "mismatched parentheses in declaration",
            )? == end - 1
        {
            return self.parse_declarator(start + 1, end - 1);
        }

        if self.tokens[start].is(TokenKind::Star) {
            let inner = self.parse_declarator(start + 1, end)?;
            return Ok(Declarator::Pointer(Box::new(inner)));
        }

        let last = &self.tokens[end - 1];
        if last.is(TokenKind::CloseBracket) && end >= start + 3 {
            let open = self.tokens[end - 3].is(TokenKind::OpenBracket);
            let length = &self.tokens[end - 2];
            if open && length.is(TokenKind::Number) {
                if let Some(length) = parse_array_length(&length.content) {
                    let inner = self.parse_declarator(start, end - 3)?;
                    return Ok(Declarator::Array {
                        length,
                        inner: Box::new(inner),
                    });
                }
            }
        } else if last.is(TokenKind::CloseParen) {
            let open = self.find_pair_backward(
                end - 1,
                TokenKind::OpenParen,
                TokenKind::CloseParen,
                "mismatched parentheses in declaration",
            )?;
            if open > start {
                let params = self.parse_parameter_list(open + 1, end - 1)?;
                let inner = self.parse_declarator(start, open)?;
                return Ok(Declarator::Function {
                    params,
                    inner: Box::new(inner),
                });
            }
        }

        Err(self.error("faulty declaration syntax", start, MessageType::At))
    }

    /// parameters between a function declarator's parentheses
    fn parse_parameter_list(&mut self, start: usize, end: usize) -> PResult<Option<Vec<ParamDecl>>> {
        if start == end {
            return Ok(None);
        }
        if start + 1 == end && self.tokens[start].is(TokenKind::Void) {
            return Ok(Some(Vec::new()));
        }

        let mut params = Vec::new();
        let mut seg_start = start;
        let mut depth = 0i32;
        for i in start..=end {
            if i < end {
                match self.tokens[i].kind {
                    TokenKind::OpenParen | TokenKind::OpenBracket => depth += 1,
                    TokenKind::CloseParen | TokenKind::CloseBracket => depth -= 1,
                    _ => {}
                }
            }
            if i == end || (depth == 0 && self.tokens[i].is(TokenKind::Comma)) {
                params.push(self.parse_parameter(seg_start, i)?);
                seg_start = i + 1;
            }
        }
        Ok(Some(params))
    }

    fn parse_parameter(&mut self, start: usize, end: usize) -> PResult<ParamDecl> {
        let (specifiers, index) = self.parse_decl_specifiers(start)?;
        if index > end {
            return Err(self.error("faulty declaration syntax", start, MessageType::At));
        }
        let declarator = self.parse_declarator(index, end)?;
        Ok(ParamDecl {
            specifiers,
            declarator,
        })
    }

    fn expect_semicolon(&self, index: usize) -> PResult<usize> {
        self.match_token(index, TokenKind::Semicolon, "expected semicolon", MessageType::After)
    }

    fn match_token(
        &self,
        index: usize,
        kind: TokenKind,
        message: &str,
        message_type: MessageType,
    ) -> PResult<usize> {
        if self.next_token_is(index, kind) {
            Ok(index + 1)
        } else {
            Err(self.error(message, index, message_type))
        }
    }

    fn next_token_is(&self, index: usize, kind: TokenKind) -> bool {
        self.tokens.get(index).map_or(false, |t| t.is(kind))
    }

    fn error(&self, message: &str, index: usize, message_type: MessageType) -> ParserError {
        ParserError::new(message, index, &self.tokens, message_type)
    }

    /// keep the error that got furthest, later ones win ties
    fn log_error(&mut self, error: ParserError) {
        let better = self
            .best_error
            .as_ref()
            .map_or(true, |best| error.amount_parsed >= best.amount_parsed);
        if better {
            self.best_error = Some(error);
        }
    }
}

fn parse_array_length(text: &str) -> Option<u64> {
    let digits = text
        .strip_prefix("0b")
        .or_else(|| text.strip_prefix("0B"))
        .map(|d| (d, 2))
        .or_else(|| {
            text.strip_suffix('b')
                .or_else(|| text.strip_suffix('B'))
                .map(|d| (d, 2))
        });
    match digits {
        Some((d, radix)) => u64::from_str_radix(d, radix).ok(),
        None => text.parse().ok(),
    }
}
