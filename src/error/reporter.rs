use crate::error::{Diagnostic, Severity};
use codespan::{FileId, Files};

/// collects diagnostics 4 one compilation
#[derive(Debug)]
pub struct Reporter {
    files: Files<String>,
    diagnostics: Vec<Diagnostic>,
}

impl Reporter {
    pub fn new() -> Self {
        Self {
            files: Files::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn add_file(&mut self, name: String, source: String) -> FileId {
        self.files.add(name, source)
    }

    /// record a diagnostic, filling in the file name from its position
    pub fn add_diagnostic(&mut self, mut diagnostic: Diagnostic) {
        if diagnostic.file_name.is_none() {
            if let Some(pos) = diagnostic.position {
                diagnostic.file_name = Some(self.files.name(pos.file_id).to_string_lossy().into_owned());
            }
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d.severity, Severity::Error))
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn files(&self) -> &Files<String> {
        &self.files
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}
