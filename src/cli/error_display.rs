use crate::error::{Diagnostic, DiagnosticKind, Reporter, Severity};
use codespan_reporting::diagnostic::{Diagnostic as CodespanDiagnostic, Label, Severity as CodespanSeverity};
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use codespan_reporting::term::{self, Config};
use owo_colors::OwoColorize;

use codespan::FileId;

/// stable code per diagnostic kind
pub fn diagnostic_code(kind: DiagnosticKind) -> &'static str {
    match kind {
        DiagnosticKind::LexicalError => "E0001",
        DiagnosticKind::SyntaxError => "E0002",
        DiagnosticKind::TypeError => "E0003",
        DiagnosticKind::NameResolutionError => "E0004",
        DiagnosticKind::SemanticError => "E0005",
        DiagnosticKind::UnsupportedFeature => "E0006",
        DiagnosticKind::ToolchainError => "E0007",
        DiagnosticKind::IoError => "E0008",
    }
}

/// convert a subc diagnostic 2 codespan rprtng dgnstc, none without a position
pub fn convert_diagnostic(diag: &Diagnostic) -> Option<CodespanDiagnostic<FileId>> {
    let position = diag.position?;
    let severity = match diag.severity {
        Severity::Error => CodespanSeverity::Error,
        Severity::Warning => CodespanSeverity::Warning,
        Severity::Note => CodespanSeverity::Note,
    };

    let mut codespan_diag = CodespanDiagnostic::new(severity)
        .with_code(diagnostic_code(diag.kind))
        .with_message(&diag.message)
        .with_labels(vec![Label::primary(
            position.file_id,
            usize::from(position.span.start())..usize::from(position.span.end()),
        )
        .with_message(get_label_message(&diag.kind))]);

    // add notes if prsnt
    if !diag.notes.is_empty() {
        codespan_diag = codespan_diag.with_notes(diag.notes.clone());
    }

    Some(codespan_diag)
}

fn get_label_message(kind: &DiagnosticKind) -> String {
    match kind {
        DiagnosticKind::LexicalError => "lexical error occurred here",
        DiagnosticKind::SyntaxError => "syntax error occurred here",
        DiagnosticKind::TypeError => "type error occurred here",
        DiagnosticKind::NameResolutionError => "name resolution error occurred here",
        DiagnosticKind::SemanticError => "semantic error occurred here",
        DiagnosticKind::UnsupportedFeature => "unsupported construct here",
        DiagnosticKind::ToolchainError => "toolchain error",
        DiagnosticKind::IoError => "io error",
    }
    .to_string()
}

/// display all dgnstcs from a reporter
pub fn display_diagnostics(reporter: &Reporter, color_choice: ColorChoice) {
    let files = reporter.files();
    let diagnostics = reporter.diagnostics();

    if diagnostics.is_empty() {
        return;
    }

    let writer = StandardStream::stderr(color_choice);
    let config = Config::default();

    for diag in diagnostics {
        let emitted = match convert_diagnostic(diag) {
            Some(codespan_diag) => term::emit(&mut writer.lock(), &config, files, &codespan_diag).is_ok(),
            None => false,
        };
        // positionless or unrenderable, fall back 2 the plain form
        if !emitted {
            display_plain(diag, color_choice != ColorChoice::Never);
        }
    }
}

fn display_plain(diag: &Diagnostic, color: bool) {
    if color && diag.is_error() {
        eprintln!("{}", diag.to_string().red());
    } else if color && diag.severity == Severity::Warning {
        eprintln!("{}", diag.to_string().yellow());
    } else {
        eprintln!("{}", diag);
    }
    for note in &diag.notes {
        eprintln!("  = note: {}", note);
    }
}

/// count errors and wrnngs in diagnostics
pub fn count_diagnostics(reporter: &Reporter) -> (usize, usize) {
    let mut errors = 0;
    let mut warnings = 0;

    for diag in reporter.diagnostics() {
        match diag.severity {
            Severity::Error => errors += 1,
            Severity::Warning => warnings += 1,
            Severity::Note => {}
        }
    }

    (errors, warnings)
}
