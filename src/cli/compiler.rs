use crate::backend::{allocate, generate, AllocationStats, CodegenError, DialectKind};
use crate::cli::args::{ColorWhen, CompileConfig};
use crate::cli::error_display::{count_diagnostics, display_diagnostics};
use crate::cli::output::Output;
use crate::cli::progress::{CompilePhase, ProgressTracker};
use crate::cli::toolchain::{Toolchain, ToolchainError};
use crate::core::ast::TreePrinter;
use crate::core::il::ILCode;
use crate::error::{Diagnostic, DiagnosticKind, Reporter};
use crate::frontend::lexer::Lexer;
use crate::frontend::parser::Parser;
use crate::middle::{lower, LowerError};
use codespan::FileId;
use codespan_reporting::term::termcolor::ColorChoice;
use std::fs;
use std::time::Instant;
use tracing::debug;

/// what a successful translation produced
#[derive(Debug)]
pub struct Artifacts {
    pub il: ILCode,
    pub stats: AllocationStats,
    pub assembly: Vec<(DialectKind, String)>,
}

impl Artifacts {
    pub fn assembly_for(&self, dialect: DialectKind) -> Option<&str> {
        self.assembly
            .iter()
            .find(|(kind, _)| *kind == dialect)
            .map(|(_, text)| text.as_str())
    }
}

/// cmpltn result
#[derive(Debug)]
pub struct CompileResult {
    pub artifacts: Option<Artifacts>,
    pub reporter: Reporter,
    pub success: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// diagnostics already explain why
    #[error("compilation stopped during {}", .0.as_str())]
    StageFailed(CompilePhase),

    #[error(transparent)]
    Unsupported(LowerError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error(transparent)]
    Toolchain(#[from] ToolchainError),
}

impl CompileError {
    /// diagnostic 4 this error, none when the stage already reported
    pub fn to_diagnostic(&self) -> Option<Diagnostic> {
        match self {
            CompileError::StageFailed(_) => None,
            CompileError::Io { message, .. } => {
                Some(Diagnostic::error(DiagnosticKind::IoError, None, message.clone()))
            }
            CompileError::Unsupported(err) => Some(err.to_diagnostic()),
            CompileError::Codegen(err) => Some(Diagnostic::error(
                DiagnosticKind::UnsupportedFeature,
                None,
                err.to_string(),
            )),
            CompileError::Toolchain(err) => {
                let diag = Diagnostic::error(DiagnosticKind::ToolchainError, None, err.to_string());
                Some(match err.stderr() {
                    Some(stderr) => diag.with_note(stderr.trim_end().to_string()),
                    None => diag,
                })
            }
        }
    }
}

/// compiler orchestrator
pub struct Compiler {
    config: CompileConfig,
    progress: ProgressTracker,
}

impl Compiler {
    pub fn new(config: CompileConfig) -> Self {
        let verbose = config.verbose;
        Self {
            config,
            progress: ProgressTracker::new(verbose),
        }
    }

    /// read, translate, write and optionally link the input file
    pub fn compile(&mut self) -> CompileResult {
        let start_time = Instant::now();
        let mut reporter = Reporter::new();
        let outcome = self.run(&mut reporter);
        let result = self.finish(outcome, reporter);
        debug!(
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            success = result.success,
            "compilation finished"
        );
        result
    }

    /// translate in memory only, nothing is written or linked
    pub fn compile_str(&mut self, name: &str, source: &str) -> CompileResult {
        let mut reporter = Reporter::new();
        let file_id = reporter.add_file(name.to_string(), source.to_string());
        let outcome = self.translate(source, file_id, &mut reporter);
        self.finish(outcome, reporter)
    }

    fn finish(&mut self, outcome: Result<Artifacts, CompileError>, mut reporter: Reporter) -> CompileResult {
        let artifacts = match outcome {
            Ok(artifacts) => Some(artifacts),
            Err(err) => {
                if let Some(diag) = err.to_diagnostic() {
                    reporter.add_diagnostic(diag);
                }
                None
            }
        };
        let success = artifacts.is_some() && !reporter.has_errors();
        if success {
            self.progress.set_phase(CompilePhase::Complete);
            if self.config.verbose {
                Output::timings(self.progress.timings());
            }
        }
        CompileResult {
            artifacts,
            reporter,
            success,
        }
    }

    fn run(&mut self, reporter: &mut Reporter) -> Result<Artifacts, CompileError> {
        self.progress.set_phase(CompilePhase::Loading);
        let source = self.load_source()?;
        let name = self.config.input.to_string_lossy().to_string();
        if self.config.verbose {
            Output::processing_file(&name);
        }
        let file_id = reporter.add_file(name, source.clone());

        let artifacts = self.translate(&source, file_id, reporter)?;

        self.progress.set_phase(CompilePhase::Writing);
        for (dialect, text) in &artifacts.assembly {
            let path = self.config.output_for(*dialect);
            fs::write(path, text).map_err(|source| CompileError::Io {
                message: format!("could not write output file '{}'", path.display()),
                source,
            })?;
        }

        if self.config.link {
            let toolchain = Toolchain::new(&self.config.assembler, &self.config.linker);
            let object = Toolchain::object_path(&self.config.output);
            self.progress.set_phase(CompilePhase::Assembling);
            toolchain.assemble(&self.config.asm_output, &object)?;
            self.progress.set_phase(CompilePhase::Linking);
            toolchain.link(&object, &self.config.output)?;
        }
        Ok(artifacts)
    }

    /// source text 2 assembly, each stage gated on the error count
    pub fn translate(
        &mut self,
        source: &str,
        file_id: FileId,
        reporter: &mut Reporter,
    ) -> Result<Artifacts, CompileError> {
        self.progress.set_phase(CompilePhase::Lexing);
        let tokens = Lexer::new(source, file_id, reporter).tokenize();
        self.gate(reporter, CompilePhase::Lexing)?;
        if self.config.show_tokens {
            let listing: String = tokens
                .iter()
                .map(|t| format!("{:?} '{}'\n", t.kind, t.content))
                .collect();
            Output::dump("tokens", &listing);
        }

        self.progress.set_phase(CompilePhase::Parsing);
        let root = Parser::new(tokens, reporter).parse();
        self.gate(reporter, CompilePhase::Parsing)?;
        let root = root.ok_or(CompileError::StageFailed(CompilePhase::Parsing))?;
        if self.config.show_tree {
            Output::dump("tree", &TreePrinter::print(&root));
        }

        self.progress.set_phase(CompilePhase::IlGeneration);
        let il = lower(&root, reporter).map_err(CompileError::Unsupported)?;
        self.gate(reporter, CompilePhase::IlGeneration)?;
        if self.config.show_il {
            Output::dump("il", &il.to_string());
        }

        self.progress.set_phase(CompilePhase::Allocation);
        let (spots, stats) = allocate(&il, &self.config.allocator);
        if self.config.show_reg_alloc_perf {
            Output::dump("register allocation", &stats.to_string());
        }

        self.progress.set_phase(CompilePhase::CodeGeneration);
        let mut assembly = Vec::new();
        for kind in &self.config.dialects {
            let dialect = kind.create();
            assembly.push((*kind, generate(&il, &spots, dialect.as_ref())?));
        }

        Ok(Artifacts {
            il,
            stats,
            assembly,
        })
    }

    fn gate(&self, reporter: &Reporter, phase: CompilePhase) -> Result<(), CompileError> {
        if reporter.has_errors() {
            return Err(CompileError::StageFailed(phase));
        }
        Ok(())
    }

    /// load source file rfom disk
    fn load_source(&self) -> Result<String, CompileError> {
        fs::read_to_string(&self.config.input).map_err(|source| CompileError::Io {
            message: format!("could not read file: '{}'", self.config.input.display()),
            source,
        })
    }

    /// get the compilation configuration
    pub fn config(&self) -> &CompileConfig {
        &self.config
    }
}

/// display compilation rslts
pub fn display_results(result: &CompileResult, config: &CompileConfig) {
    let color_choice = match config.color {
        ColorWhen::Always => ColorChoice::Always,
        ColorWhen::Never => ColorChoice::Never,
        ColorWhen::Auto if config.color.should_color() => ColorChoice::Auto,
        ColorWhen::Auto => ColorChoice::Never,
    };

    if !result.reporter.diagnostics().is_empty() {
        display_diagnostics(&result.reporter, color_choice);
    }

    if !config.quiet {
        let (errors, warnings) = count_diagnostics(&result.reporter);
        if result.success {
            let output = if config.link {
                config.output.to_string_lossy().to_string()
            } else {
                config
                    .dialects
                    .iter()
                    .map(|d| config.output_for(*d).to_string_lossy().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            Output::build_success(&output);
            if warnings > 0 {
                Output::warning(&format!("{} warning(s) emitted", warnings));
            }
        } else {
            Output::build_failure(errors, warnings);
        }
    }
}
