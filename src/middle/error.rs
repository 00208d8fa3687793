use crate::error::{Diagnostic, DiagnosticKind, Position};
use crate::frontend::lexer::token::Token;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum LowerError {
    /// recorded by the enclosing statement, lowering goes on
    #[error("{0}")]
    Semantic(Diagnostic),

    /// construct the grammar accepts but lowering cannot handle, stops the pipeline
    #[error("{feature} are not yet supported")]
    Unsupported {
        feature: String,
        position: Option<Position>,
    },
}

pub type LResult<T> = Result<T, LowerError>;

impl LowerError {
    pub fn error(kind: DiagnosticKind, anchor: &Token, message: impl Into<String>) -> Self {
        LowerError::Semantic(Diagnostic::error(kind, Some(anchor.position), message))
    }

    pub fn type_error(anchor: &Token, message: impl Into<String>) -> Self {
        Self::error(DiagnosticKind::TypeError, anchor, message)
    }

    pub fn semantic(anchor: &Token, message: impl Into<String>) -> Self {
        Self::error(DiagnosticKind::SemanticError, anchor, message)
    }

    pub fn unsupported(feature: &str, anchor: &Token) -> Self {
        LowerError::Unsupported {
            feature: feature.to_string(),
            position: Some(anchor.position),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            LowerError::Semantic(diag) => diag.clone(),
            LowerError::Unsupported { position, .. } => {
                Diagnostic::error(DiagnosticKind::UnsupportedFeature, *position, self.to_string())
            }
        }
    }
}
