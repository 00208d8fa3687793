use crate::core::ast::expr::*;
use crate::error::{Diagnostic, DiagnosticKind};
use crate::frontend::lexer::token::{Token, TokenKind};
use crate::frontend::parser::error::{MessageType, ParserError};
use crate::frontend::parser::precedence::{is_postfix_trigger, Precedence};

/// one slot of the shift reduce stack
#[derive(Debug)]
enum Entry {
    Node(Expr),
    Token(Token),
}

#[derive(Debug)]
struct StackItem {
    entry: Entry,
    length: usize, // tokens covered
}

/// operator precedence shift reduce parser 4 a single expression
pub struct ExpressionParser<'t, 'd> {
    tokens: &'t [Token],
    stack: Vec<StackItem>,
    diagnostics: &'d mut Vec<Diagnostic>,
}

impl<'t, 'd> ExpressionParser<'t, 'd> {
    pub fn new(tokens: &'t [Token], diagnostics: &'d mut Vec<Diagnostic>) -> Self {
        Self {
            tokens,
            stack: Vec::new(),
            diagnostics,
        }
    }

    /// parse the longest expression starting at `index`
    pub fn parse(mut self, index: usize) -> Result<(Expr, usize), ParserError> {
        let tokens = self.tokens;
        let mut i = index;

        loop {
            let rest = &tokens[i.min(tokens.len())..];
            if self.try_match_number()
                || self.try_match_literal()
                || self.try_match_identifier()
                || self.try_match_bin_op(rest)
                || self.try_match_unary_prefix(rest)
                || self.try_match_unary_postfix()
                || self.try_match_array_subscript()
                || self.try_match_paren_expr()
            {
                continue;
            }

            let Some(next) = rest.first() else { break };
            if !Self::can_shift(next.kind) {
                break;
            }
            self.stack.push(StackItem {
                entry: Entry::Token(next.clone()),
                length: 1,
            });
            i += 1;
        }

        match self.stack.into_iter().next() {
            Some(StackItem {
                entry: Entry::Node(expr),
                length,
            }) => Ok((expr, index + length)),
            _ => Err(ParserError::new(
                "expected expression",
                index,
                tokens,
                MessageType::Got,
            )),
        }
    }

    fn can_shift(kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Number
                | TokenKind::Identifier
                | TokenKind::StringLiteral
                | TokenKind::CharConstant
                | TokenKind::OpenParen
                | TokenKind::CloseParen
                | TokenKind::OpenBracket
                | TokenKind::CloseBracket
                | TokenKind::Comma
        ) || BinaryOp::from_token(kind).is_some()
            || UnaryOp::prefix_from_token(kind).is_some()
            || UnaryOp::postfix_from_token(kind).is_some()
    }

    // n counts from the top, 1 is the top of stack
    fn at(&self, n: usize) -> Option<&StackItem> {
        self.stack.len().checked_sub(n).map(|i| &self.stack[i])
    }

    fn is_node(&self, n: usize) -> bool {
        matches!(self.at(n), Some(StackItem { entry: Entry::Node(_), .. }))
    }

    fn token_kind(&self, n: usize) -> Option<TokenKind> {
        match self.at(n) {
            Some(StackItem {
                entry: Entry::Token(tok),
                ..
            }) => Some(tok.kind),
            _ => None,
        }
    }

    /// pop the top `n` entries, bottom first, with their total length
    fn pop(&mut self, n: usize) -> (Vec<Entry>, usize) {
        let items = self.stack.split_off(self.stack.len() - n);
        let length = items.iter().map(|item| item.length).sum();
        (items.into_iter().map(|item| item.entry).collect(), length)
    }

    fn push_node(&mut self, expr: Expr, length: usize) {
        self.stack.push(StackItem {
            entry: Entry::Node(expr),
            length,
        });
    }

    fn try_match_number(&mut self) -> bool {
        if self.token_kind(1) != Some(TokenKind::Number) {
            return false;
        }
        let (entries, length) = self.pop(1);
        if let Some(Entry::Token(token)) = entries.into_iter().next() {
            self.push_node(Expr::Number(NumberExpr { token }), length);
        }
        true
    }

    fn try_match_literal(&mut self) -> bool {
        let kind = self.token_kind(1);
        if kind != Some(TokenKind::StringLiteral) && kind != Some(TokenKind::CharConstant) {
            return false;
        }
        let (entries, length) = self.pop(1);
        let Some(Entry::Token(token)) = entries.into_iter().next() else {
            return true;
        };
        let expr = if token.is(TokenKind::StringLiteral) {
            Expr::String(StringExpr { token })
        } else {
            let value = self.char_value(&token);
            Expr::Char(CharExpr { value, token })
        };
        self.push_node(expr, length);
        true
    }

    // bad constants are reported but parse on as 0
    fn char_value(&mut self, token: &Token) -> u8 {
        match token.content.as_bytes() {
            [byte] => *byte,
            [] => {
                self.char_error(token, "empty character constant");
                0
            }
            _ => {
                self.char_error(token, "multiple characters in character constant");
                0
            }
        }
    }

    fn char_error(&mut self, token: &Token, message: &str) {
        self.diagnostics.push(Diagnostic::error(
            DiagnosticKind::SemanticError,
            Some(token.position),
            message,
        ));
    }

    fn try_match_identifier(&mut self) -> bool {
        if self.token_kind(1) != Some(TokenKind::Identifier) {
            return false;
        }
        let (entries, length) = self.pop(1);
        if let Some(Entry::Token(token)) = entries.into_iter().next() {
            self.push_node(Expr::Identifier(IdentifierExpr { token }), length);
        }
        true
    }

    fn try_match_bin_op(&mut self, rest: &[Token]) -> bool {
        if !(self.is_node(1) && self.is_node(3)) {
            return false;
        }
        let Some(op_kind) = self.token_kind(2) else {
            return false;
        };
        let Some(op) = BinaryOp::from_token(op_kind) else {
            return false;
        };

        if let Some(next) = rest.first() {
            let higher = match (Precedence::of(next.kind), Precedence::of(op_kind)) {
                (Some(next_prec), Some(prec)) => next_prec > prec,
                _ => false,
            };
            let chained_assign =
                Precedence::is_right_assoc(op_kind) && Precedence::is_right_assoc(next.kind);
            if higher || is_postfix_trigger(next.kind) || chained_assign {
                return false;
            }
        }

        let (entries, length) = self.pop(3);
        if let Ok([Entry::Node(left), Entry::Token(op_token), Entry::Node(right)]) =
            <[Entry; 3]>::try_from(entries)
        {
            let expr = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                op_token,
                right: Box::new(right),
            });
            self.push_node(expr, length);
        }
        true
    }

    fn try_match_unary_prefix(&mut self, rest: &[Token]) -> bool {
        if !self.is_node(1) || self.is_node(3) {
            return false;
        }
        let Some(op) = self.token_kind(2).and_then(UnaryOp::prefix_from_token) else {
            return false;
        };
        if rest.first().map_or(false, |next| is_postfix_trigger(next.kind)) {
            return false;
        }

        let (entries, length) = self.pop(2);
        if let Ok([Entry::Token(op_token), Entry::Node(operand)]) = <[Entry; 2]>::try_from(entries)
        {
            let expr = Expr::Unary(UnaryExpr {
                op,
                op_token,
                operand: Box::new(operand),
            });
            self.push_node(expr, length);
        }
        true
    }

    fn try_match_unary_postfix(&mut self) -> bool {
        if !self.is_node(2) {
            return false;
        }
        let Some(op) = self.token_kind(1).and_then(UnaryOp::postfix_from_token) else {
            return false;
        };

        let (entries, length) = self.pop(2);
        if let Ok([Entry::Node(operand), Entry::Token(op_token)]) = <[Entry; 2]>::try_from(entries)
        {
            let expr = Expr::Unary(UnaryExpr {
                op,
                op_token,
                operand: Box::new(operand),
            });
            self.push_node(expr, length);
        }
        true
    }

    fn try_match_array_subscript(&mut self) -> bool {
        let shape = self.is_node(4)
            && self.token_kind(3) == Some(TokenKind::OpenBracket)
            && self.is_node(2)
            && self.token_kind(1) == Some(TokenKind::CloseBracket);
        if !shape {
            return false;
        }

        let (entries, length) = self.pop(4);
        if let Ok([Entry::Node(head), Entry::Token(bracket), Entry::Node(index), Entry::Token(_)]) =
            <[Entry; 4]>::try_from(entries)
        {
            let expr = Expr::ArraySubscript(ArraySubscriptExpr {
                head: Box::new(head),
                index: Box::new(index),
                bracket,
            });
            self.push_node(expr, length);
        }
        true
    }

    fn try_match_paren_expr(&mut self) -> bool {
        let shape = self.token_kind(3) == Some(TokenKind::OpenParen)
            && self.is_node(2)
            && self.token_kind(1) == Some(TokenKind::CloseParen);
        if !shape {
            return false;
        }

        let (entries, length) = self.pop(3);
        if let Ok([Entry::Token(_), Entry::Node(inner), Entry::Token(_)]) =
            <[Entry; 3]>::try_from(entries)
        {
            self.push_node(
                Expr::Paren(ParenExpr {
                    inner: Box::new(inner),
                }),
                length,
            );
        }
        true
    }
}
