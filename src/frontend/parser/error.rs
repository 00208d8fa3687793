use crate::error::{Diagnostic, DiagnosticKind, Position};
use crate::frontend::lexer::token::Token;
use thiserror::Error;

/// how a parse error message refers 2 the token stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    At,    // at 'tok'
    Got,   // , got 'tok'
    After, // after 'prev'
}

/// recoverable parse failure; `amount_parsed` picks the best error among alternatives
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ParserError {
    pub message: String,
    pub amount_parsed: usize,
    pub position: Option<Position>,
}

impl ParserError {
    pub fn new(description: &str, index: usize, tokens: &[Token], kind: MessageType) -> Self {
        if tokens.is_empty() {
            return Self {
                message: format!("{} at beginning of source", description),
                amount_parsed: index,
                position: None,
            };
        }

        // past the end always reads as "after the last token"
        let (at, kind) = if index >= tokens.len() {
            (tokens.len(), MessageType::After)
        } else if index == 0 && kind == MessageType::After {
            (0, MessageType::Got)
        } else {
            (index, kind)
        };

        let (message, position) = match kind {
            MessageType::At => (
                format!("{} at '{}'", description, tokens[at]),
                tokens[at].position,
            ),
            MessageType::Got => (
                format!("{}, got '{}'", description, tokens[at]),
                tokens[at].position,
            ),
            MessageType::After => (
                format!("{} after '{}'", description, tokens[at - 1]),
                tokens[at - 1].position.after(),
            ),
        };

        Self {
            message,
            amount_parsed: index,
            position: Some(position),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(DiagnosticKind::SyntaxError, self.position, self.message.clone())
    }
}
