use crate::backend::{AllocatorConfig, DialectKind};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "subc")]
#[command(about = "subc - compiler for a small subset of C targeting x86-64", long_about = None)]
#[command(version)]
pub struct Cli {
    /// input source file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// name of the linked binary
    #[arg(short, long, value_name = "FILE", default_value = "out")]
    pub output: PathBuf,

    /// nasm assembly output
    #[arg(long, value_name = "FILE", default_value = "out.s")]
    pub asm_output: PathBuf,

    /// masm assembly output
    #[arg(long, value_name = "FILE", default_value = "out.asm")]
    pub masm_output: PathBuf,

    /// which assembly texts 2 write
    #[arg(long, value_enum, default_value = "both")]
    pub dialect: DialectChoice,

    /// print the token stream
    #[arg(long)]
    pub show_tokens: bool,

    /// print the ast
    #[arg(long)]
    pub show_tree: bool,

    /// print the il
    #[arg(long)]
    pub show_il: bool,

    /// print register allocator stats
    #[arg(long)]
    pub show_reg_alloc_perf: bool,

    /// keep every value on the stack
    #[arg(long)]
    pub variables_on_stack: bool,

    /// stop after writing assembly
    #[arg(short = 'S', long)]
    pub no_link: bool,

    /// assembler cmd
    #[arg(long, value_name = "CMD", default_value = "nasm")]
    pub assembler: String,

    /// linker cmd
    #[arg(long, value_name = "CMD", default_value = "ld")]
    pub linker: String,

    /// verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// quiet mode
    #[arg(short, long)]
    pub quiet: bool,

    /// when 2 use clrs
    #[arg(long, value_enum, default_value = "auto")]
    pub color: ColorWhen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectChoice {
    Nasm,
    Masm,
    Both,
}

impl DialectChoice {
    pub fn kinds(&self) -> Vec<DialectKind> {
        match self {
            DialectChoice::Nasm => vec![DialectKind::Nasm],
            DialectChoice::Masm => vec![DialectKind::Masm],
            DialectChoice::Both => vec![DialectKind::Nasm, DialectKind::Masm],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

impl ColorWhen {
    pub fn should_color(&self) -> bool {
        match self {
            ColorWhen::Always => true,
            ColorWhen::Never => false,
            ColorWhen::Auto => atty::is(atty::Stream::Stderr),
        }
    }
}

/// compilation configuration drvd from cli arguments
#[derive(Debug, Clone)]
pub struct CompileConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub asm_output: PathBuf,
    pub masm_output: PathBuf,
    pub dialects: Vec<DialectKind>,
    pub show_tokens: bool,
    pub show_tree: bool,
    pub show_il: bool,
    pub show_reg_alloc_perf: bool,
    pub allocator: AllocatorConfig,
    pub link: bool,
    pub assembler: String,
    pub linker: String,
    pub verbose: bool,
    pub quiet: bool,
    pub color: ColorWhen,
}

impl CompileConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, String> {
        if cli.input.as_os_str().is_empty() {
            return Err("no input file specified".to_string());
        }
        if cli.verbose && cli.quiet {
            return Err("'--verbose' and '--quiet' cannot be used together".to_string());
        }
        let dialects = cli.dialect.kinds();
        // linking needs the nasm text
        if !cli.no_link && !dialects.contains(&DialectKind::Nasm) {
            return Err("linking needs nasm output, pass '--dialect nasm' or '-S'".to_string());
        }
        if cli.asm_output == cli.masm_output && dialects.len() > 1 {
            return Err("nasm and masm outputs must be different files".to_string());
        }

        Ok(CompileConfig {
            input: cli.input.clone(),
            output: cli.output.clone(),
            asm_output: cli.asm_output.clone(),
            masm_output: cli.masm_output.clone(),
            dialects,
            show_tokens: cli.show_tokens,
            show_tree: cli.show_tree,
            show_il: cli.show_il,
            show_reg_alloc_perf: cli.show_reg_alloc_perf,
            allocator: AllocatorConfig {
                variables_on_stack: cli.variables_on_stack,
            },
            link: !cli.no_link,
            assembler: cli.assembler.clone(),
            linker: cli.linker.clone(),
            verbose: cli.verbose,
            quiet: cli.quiet,
            color: cli.color,
        })
    }

    /// minimal config 4 a source file, used by tests and embedders
    pub fn for_input(input: impl Into<PathBuf>) -> Self {
        CompileConfig {
            input: input.into(),
            output: PathBuf::from("out"),
            asm_output: PathBuf::from("out.s"),
            masm_output: PathBuf::from("out.asm"),
            dialects: vec![DialectKind::Nasm, DialectKind::Masm],
            show_tokens: false,
            show_tree: false,
            show_il: false,
            show_reg_alloc_perf: false,
            allocator: AllocatorConfig::default(),
            link: true,
            assembler: "nasm".to_string(),
            linker: "ld".to_string(),
            verbose: false,
            quiet: true,
            color: ColorWhen::Never,
        }
    }

    pub fn output_for(&self, dialect: DialectKind) -> &PathBuf {
        match dialect {
            DialectKind::Nasm => &self.asm_output,
            DialectKind::Masm => &self.masm_output,
        }
    }
}
