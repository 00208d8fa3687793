pub mod diagnostic;
pub mod reporter;

pub use diagnostic::{Diagnostic, DiagnosticKind, Position, Severity};
pub use reporter::Reporter;
