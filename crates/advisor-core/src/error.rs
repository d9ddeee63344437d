// ── Error Types ──

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("unknown category '{0}' (expected pattern, solution, example or note)")]
    UnknownCategory(String),
}

impl AdvisorError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AdvisorError>;
