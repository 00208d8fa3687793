use crate::frontend::lexer::token::{Token, TokenKind};
use std::fmt;

#[derive(Debug, Clone)]
pub enum Expr {
    Number(NumberExpr),
    Char(CharExpr),
    String(StringExpr),
    Identifier(IdentifierExpr),
    Paren(ParenExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    ArraySubscript(ArraySubscriptExpr),
}

#[derive(Debug, Clone)]
pub struct NumberExpr {
    pub token: Token,
}

/// char constant, already reduced to its byte value
#[derive(Debug, Clone)]
pub struct CharExpr {
    pub value: u8,
    pub token: Token,
}

#[derive(Debug, Clone)]
pub struct StringExpr {
    pub token: Token,
}

impl StringExpr {
    /// bytes plus the terminating nul
    pub fn bytes(&self) -> Vec<u8> {
        let mut bytes = self.token.content.as_bytes().to_vec();
        bytes.push(0);
        bytes
    }
}

#[derive(Debug, Clone)]
pub struct IdentifierExpr {
    pub token: Token,
}

impl IdentifierExpr {
    pub fn name(&self) -> &str {
        &self.token.content
    }
}

#[derive(Debug, Clone)]
pub struct ParenExpr {
    pub inner: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub op: BinaryOp,
    pub op_token: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,    // +
    Sub,    // -
    Mul,    // *
    Div,    // /
    BitAnd, // &
    Eq,     // ==
    Ne,     // !=
    And,    // &&
    Or,     // ||
    Assign, // =
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::Amp => Some(BinaryOp::BitAnd),
            TokenKind::EqualEqual => Some(BinaryOp::Eq),
            TokenKind::BangEqual => Some(BinaryOp::Ne),
            TokenKind::AmpAmp => Some(BinaryOp::And),
            TokenKind::PipePipe => Some(BinaryOp::Or),
            TokenKind::Equals => Some(BinaryOp::Assign),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::BitAnd => "&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Assign => "=",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub op_token: Token,
    pub operand: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    AddrOf,   // &
    Deref,    // *
    PreIncr,  // ++a
    PreDecr,  // --a
    PostIncr, // a++
    PostDecr, // a--
    BoolNot,  // !
}

impl UnaryOp {
    pub fn prefix_from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Amp => Some(UnaryOp::AddrOf),
            TokenKind::Star => Some(UnaryOp::Deref),
            TokenKind::PlusPlus => Some(UnaryOp::PreIncr),
            TokenKind::MinusMinus => Some(UnaryOp::PreDecr),
            TokenKind::Bang => Some(UnaryOp::BoolNot),
            _ => None,
        }
    }

    pub fn postfix_from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::PlusPlus => Some(UnaryOp::PostIncr),
            TokenKind::MinusMinus => Some(UnaryOp::PostDecr),
            _ => None,
        }
    }

    pub fn is_postfix(&self) -> bool {
        matches!(self, UnaryOp::PostIncr | UnaryOp::PostDecr)
    }
}

#[derive(Debug, Clone)]
pub struct ArraySubscriptExpr {
    pub head: Box<Expr>,
    pub index: Box<Expr>,
    pub bracket: Token,
}

impl Expr {
    /// token used to anchor diagnostics about this expression
    pub fn anchor(&self) -> &Token {
        match self {
            Expr::Number(e) => &e.token,
            Expr::Char(e) => &e.token,
            Expr::String(e) => &e.token,
            Expr::Identifier(e) => &e.token,
            Expr::Paren(e) => e.inner.anchor(),
            Expr::Binary(e) => &e.op_token,
            Expr::Unary(e) => &e.op_token,
            Expr::ArraySubscript(e) => &e.bracket,
        }
    }
}

// fully parenthesized form, used by --show-tree and tests
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(e) => write!(f, "{}", e.token),
            Expr::Char(e) => write!(f, "'{}'", e.token),
            Expr::String(e) => write!(f, "\"{}\"", e.token.content.escape_default()),
            Expr::Identifier(e) => write!(f, "{}", e.token),
            Expr::Paren(e) => write!(f, "{}", e.inner),
            Expr::Binary(e) => write!(f, "({} {} {})", e.left, e.op.symbol(), e.right),
            Expr::Unary(e) if e.op.is_postfix() => write!(f, "({}{})", e.operand, e.op_token),
            Expr::Unary(e) => write!(f, "({}{})", e.op_token, e.operand),
            Expr::ArraySubscript(e) => write!(f, "{}[{}]", e.head, e.index),
        }
    }
}
