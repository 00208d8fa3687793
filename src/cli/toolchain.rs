use std::path::{Path, PathBuf};
use std::process::{Command, Output as ProcessOutput};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("could not run '{command}'")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("assembler returned non-zero status")]
    AssemblerFailed { status: Option<i32>, stderr: String },

    #[error("linker returned non-zero status")]
    LinkerFailed { status: Option<i32>, stderr: String },
}

impl ToolchainError {
    /// captured tool stderr, if any
    pub fn stderr(&self) -> Option<&str> {
        match self {
            ToolchainError::AssemblerFailed { stderr, .. }
            | ToolchainError::LinkerFailed { stderr, .. } => {
                Some(stderr.as_str()).filter(|s| !s.trim().is_empty())
            }
            ToolchainError::Spawn { .. } => None,
        }
    }
}

/// external assembler and linker, run one after the other
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub assembler: String,
    pub linker: String,
}

impl Toolchain {
    pub fn new(assembler: impl Into<String>, linker: impl Into<String>) -> Self {
        Self {
            assembler: assembler.into(),
            linker: linker.into(),
        }
    }

    /// object file next 2 the binary, `out` -> `out.o`
    pub fn object_path(binary: &Path) -> PathBuf {
        let mut name = binary.as_os_str().to_owned();
        name.push(".o");
        PathBuf::from(name)
    }

    pub fn assemble(&self, asm: &Path, object: &Path) -> Result<(), ToolchainError> {
        let mut cmd = Command::new(&self.assembler);
        cmd.arg("-f").arg("elf64").arg("-o").arg(object).arg(asm);
        let output = run(&self.assembler, cmd)?;
        if !output.status.success() {
            return Err(ToolchainError::AssemblerFailed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }

    pub fn link(&self, object: &Path, binary: &Path) -> Result<(), ToolchainError> {
        let mut cmd = Command::new(&self.linker);
        cmd.arg("-o").arg(binary).arg(object);
        let output = run(&self.linker, cmd)?;
        if !output.status.success() {
            return Err(ToolchainError::LinkerFailed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }

    /// is `program` runnable from PATH
    pub fn available(program: &str) -> bool {
        Command::new(program).arg("-v").output().is_ok()
    }
}

fn run(program: &str, mut cmd: Command) -> Result<ProcessOutput, ToolchainError> {
    debug!(command = ?cmd, "running toolchain");
    cmd.output().map_err(|source| ToolchainError::Spawn {
        command: program.to_string(),
        source,
    })
}
