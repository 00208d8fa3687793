use crate::cli::progress::CompilePhase;
use owo_colors::OwoColorize;
use std::time::Duration;

/// clr coded terminal output 4 the driver
pub struct Output;

impl Output {
    pub fn error(msg: &str) {
        eprintln!("{} {}", "error:".red().bold(), msg);
    }

    pub fn warning(msg: &str) {
        eprintln!("{} {}", "warning:".yellow().bold(), msg);
    }

    /// phase banner, verbose only
    pub fn phase(phase: CompilePhase) {
        println!("{} {}", "→".bright_blue(), phase.as_str().bright_white());
    }

    pub fn processing_file(file: &str) {
        println!("{} {}", "Processing:".bright_cyan(), file.bright_white());
    }

    /// titled block 4 the --show-* dumps
    pub fn dump(title: &str, body: &str) {
        println!("{}", format!("== {} ==", title).bold());
        print!("{}", body);
        if !body.ends_with('\n') {
            println!();
        }
    }

    /// time spent per phase, verbose only
    pub fn timings(timings: &[(CompilePhase, Duration)]) {
        for (phase, elapsed) in timings {
            println!(
                "  {:<20} {}",
                phase.as_str().bright_white(),
                format!("{:.2}ms", elapsed.as_secs_f64() * 1000.0).bright_green()
            );
        }
    }

    pub fn build_success(outputs: &str) {
        println!("{} {}", "✓".green().bold(), "Build successful!".green().bold());
        println!("  {}", format!("Output: {}", outputs).bright_white());
    }

    pub fn build_failure(errors: usize, warnings: usize) {
        eprintln!(
            "{} {} ({} error(s), {} warning(s))",
            "✗".red().bold(),
            "Build failed!".red().bold(),
            errors,
            warnings
        );
    }
}
