use crate::core::il::ValueId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("cannot encode {command}: {detail}")]
    UnsupportedCombination { command: String, detail: String },

    #[error("no spot allocated for value {0}")]
    MissingSpot(ValueId),
}

impl CodegenError {
    pub fn unsupported(command: &str, detail: impl Into<String>) -> Self {
        CodegenError::UnsupportedCombination {
            command: command.to_string(),
            detail: detail.into(),
        }
    }
}
