/// one line of generated assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmLine {
    Command { mnemonic: String, operands: Vec<String> },
    Label(String),
}

/// assembly lines 4 the body of main, dialect neutral layout
#[derive(Debug, Clone, Default)]
pub struct AsmCode {
    lines: Vec<AsmLine>,
}

impl AsmCode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, mnemonic: &str, operands: &[&str]) {
        self.lines.push(AsmLine::Command {
            mnemonic: mnemonic.to_string(),
            operands: operands.iter().map(|o| o.to_string()).collect(),
        });
    }

    pub fn add_label(&mut self, label: impl Into<String>) {
        self.lines.push(AsmLine::Label(label.into()));
    }

    pub fn raw_lines(&self) -> &[AsmLine] {
        &self.lines
    }

    /// commands indented five spaces, labels flush left
    pub fn format_command(mnemonic: &str, operands: &[&str]) -> String {
        if operands.is_empty() {
            format!("     {}", mnemonic)
        } else {
            format!("     {} {}", mnemonic, operands.join(", "))
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| match line {
                AsmLine::Label(label) => format!("{}:", label),
                AsmLine::Command { mnemonic, operands } => {
                    let operands: Vec<&str> = operands.iter().map(String::as_str).collect();
                    Self::format_command(mnemonic, &operands)
                }
            })
            .collect()
    }
}
