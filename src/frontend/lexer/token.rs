use crate::error::Position;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // literals
    Identifier,
    Number,
    CharConstant,
    StringLiteral,

    // keywords
    Void,
    Bool,
    Char,
    Short,
    Int,
    Long,
    Signed,
    Unsigned,
    Auto,
    Static,
    Extern,
    Const,
    Return,
    If,
    Else,

    // symbols
    Semicolon,
    Comma,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Amp,        // &
    AmpAmp,     // &&
    PipePipe,   // ||
    Equals,     // =
    EqualEqual, // ==
    BangEqual,  // !=
    Bang,       // !
    PlusPlus,   // ++
    MinusMinus, // --
}

impl TokenKind {
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        match s {
            "void" => Some(TokenKind::Void),
            "_Bool" => Some(TokenKind::Bool),
            "char" => Some(TokenKind::Char),
            "short" => Some(TokenKind::Short),
            "int" => Some(TokenKind::Int),
            "long" => Some(TokenKind::Long),
            "signed" => Some(TokenKind::Signed),
            "unsigned" => Some(TokenKind::Unsigned),
            "auto" => Some(TokenKind::Auto),
            "static" => Some(TokenKind::Static),
            "extern" => Some(TokenKind::Extern),
            "const" => Some(TokenKind::Const),
            "return" => Some(TokenKind::Return),
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            _ => None,
        }
    }

    /// fixed spelling, empty 4 literal classes
    pub fn text(&self) -> &'static str {
        match self {
            TokenKind::Identifier
            | TokenKind::Number
            | TokenKind::CharConstant
            | TokenKind::StringLiteral => "",
            TokenKind::Void => "void",
            TokenKind::Bool => "_Bool",
            TokenKind::Char => "char",
            TokenKind::Short => "short",
            TokenKind::Int => "int",
            TokenKind::Long => "long",
            TokenKind::Signed => "signed",
            TokenKind::Unsigned => "unsigned",
            TokenKind::Auto => "auto",
            TokenKind::Static => "static",
            TokenKind::Extern => "extern",
            TokenKind::Const => "const",
            TokenKind::Return => "return",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenBrace => "{",
            TokenKind::CloseBrace => "}",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Amp => "&",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::Equals => "=",
            TokenKind::EqualEqual => "==",
            TokenKind::BangEqual => "!=",
            TokenKind::Bang => "!",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
        }
    }

    /// can a token of this kind end an operand
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Number
                | TokenKind::CharConstant
                | TokenKind::StringLiteral
                | TokenKind::CloseParen
                | TokenKind::CloseBracket
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub content: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, content: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            content: content.into(),
            position,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}
