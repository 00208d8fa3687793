use crate::cli::output::Output;
use std::time::{Duration, Instant};
use tracing::debug;

/// pipeline stages in run order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilePhase {
    Loading,
    Lexing,
    Parsing,
    IlGeneration,
    Allocation,
    CodeGeneration,
    Writing,
    Assembling,
    Linking,
    Complete,
}

impl CompilePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompilePhase::Loading => "loading source",
            CompilePhase::Lexing => "lexing",
            CompilePhase::Parsing => "parsing",
            CompilePhase::IlGeneration => "il generation",
            CompilePhase::Allocation => "spot allocation",
            CompilePhase::CodeGeneration => "code generation",
            CompilePhase::Writing => "writing assembly",
            CompilePhase::Assembling => "assembling",
            CompilePhase::Linking => "linking",
            CompilePhase::Complete => "complete",
        }
    }
}

/// tracks the running phase and how long each finished one took
pub struct ProgressTracker {
    current: Option<(CompilePhase, Instant)>,
    finished: Vec<(CompilePhase, Duration)>,
    verbose: bool,
}

impl ProgressTracker {
    pub fn new(verbose: bool) -> Self {
        Self {
            current: None,
            finished: Vec::new(),
            verbose,
        }
    }

    /// close the running phase and start `phase`
    pub fn set_phase(&mut self, phase: CompilePhase) {
        self.close();
        if self.verbose && phase != CompilePhase::Complete {
            Output::phase(phase);
        }
        self.current = Some((phase, Instant::now()));
    }

    fn close(&mut self) {
        if let Some((phase, start)) = self.current.take() {
            let elapsed = start.elapsed();
            debug!(phase = phase.as_str(), elapsed_us = elapsed.as_micros() as u64, "phase done");
            self.finished.push((phase, elapsed));
        }
    }

    pub fn current_phase(&self) -> Option<CompilePhase> {
        self.current.map(|(phase, _)| phase)
    }

    /// finished phases, complete is never timed
    pub fn timings(&self) -> &[(CompilePhase, Duration)] {
        &self.finished
    }
}
