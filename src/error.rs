use crate::types::Registry;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwardError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{registry} request failed: {message}")]
    Transport { registry: Registry, message: String },

    #[error("{registry} returned HTTP {status}")]
    Http { registry: Registry, status: u16 },

    #[error("{registry} response could not be parsed: {message}")]
    Parse { registry: Registry, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AwardError {
    /// Registry the error came from, if it came from one.
    pub fn registry(&self) -> Option<Registry> {
        match self {
            AwardError::Transport { registry, .. }
            | AwardError::Http { registry, .. }
            | AwardError::Parse { registry, .. } => Some(*registry),
            _ => None,
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, AwardError::Parse { .. })
    }
}

pub type Result<T> = std::result::Result<T, AwardError>;
