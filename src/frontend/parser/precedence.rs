use crate::frontend::lexer::token::TokenKind;

/// binary operator binding strength, higher binds tighter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Assignment = 1,      // =
    LogicalOr = 3,       // ||
    LogicalAnd = 4,      // &&
    BitAnd = 7,          // &
    Equality = 8,        // == !=
    Additive = 11,       // + -
    Multiplicative = 12, // * /
}

impl Precedence {
    pub fn of(kind: TokenKind) -> Option<Precedence> {
        match kind {
            TokenKind::Equals => Some(Precedence::Assignment),
            TokenKind::PipePipe => Some(Precedence::LogicalOr),
            TokenKind::AmpAmp => Some(Precedence::LogicalAnd),
            TokenKind::Amp => Some(Precedence::BitAnd),
            TokenKind::EqualEqual | TokenKind::BangEqual => Some(Precedence::Equality),
            TokenKind::Plus | TokenKind::Minus => Some(Precedence::Additive),
            TokenKind::Star | TokenKind::Slash => Some(Precedence::Multiplicative),
            _ => None,
        }
    }

    pub fn is_right_assoc(kind: TokenKind) -> bool {
        kind == TokenKind::Equals
    }
}

/// tokens that start a postfix operator and so bind tighter than any binary op
pub fn is_postfix_trigger(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::OpenParen | TokenKind::OpenBracket | TokenKind::PlusPlus | TokenKind::MinusMinus
    )
}
