use codespan::{FileId, Span};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

/// where a token or diagnostic came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub file_id: FileId,
    pub line: usize,
    pub span: Span,
}

impl Position {
    pub fn new(file_id: FileId, line: usize, span: Span) -> Self {
        Self { file_id, line, span }
    }

    /// zero width position right after this one
    pub fn after(&self) -> Self {
        Self {
            file_id: self.file_id,
            line: self.line,
            span: Span::new(self.span.end(), self.span.end()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub position: Option<Position>,
    pub file_name: Option<String>,
    pub message: String,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DiagnosticKind {
    #[error("lexical error")]
    LexicalError,
    #[error("syntax error")]
    SyntaxError,
    #[error("type error")]
    TypeError,
    #[error("name resolution error")]
    NameResolutionError,
    #[error("semantic error")]
    SemanticError,
    #[error("unsupported feature")]
    UnsupportedFeature,
    #[error("toolchain error")]
    ToolchainError,
    #[error("io error")]
    IoError,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        kind: DiagnosticKind,
        position: Option<Position>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            kind,
            position,
            file_name: None,
            message: message.into(),
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// attach a file name 4 diagnostics that have no span
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn error(kind: DiagnosticKind, position: Option<Position>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, kind, position, message)
    }

    pub fn warning(kind: DiagnosticKind, position: Option<Position>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, kind, position, message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        };
        match (&self.file_name, self.position) {
            (Some(name), Some(pos)) => write!(f, "{}:{}: {}: {}", name, pos.line, label, self.message),
            (Some(name), None) => write!(f, "{}: {}: {}", name, label, self.message),
            (None, _) => write!(f, "subc: {}: {}", label, self.message),
        }
    }
}
