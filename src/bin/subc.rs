use clap::Parser;
use std::process;
use subc::cli::args::{Cli, CompileConfig};
use subc::cli::compiler::{display_results, Compiler};
use subc::cli::output::Output;

fn main() {
    let cli = Cli::parse();

    let config = match CompileConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            Output::error(&e);
            process::exit(1);
        }
    };

    let mut compiler = Compiler::new(config.clone());
    let result = compiler.compile();
    display_results(&result, &config);
    if !result.success {
        process::exit(1);
    }
}
