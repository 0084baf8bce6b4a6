use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Transcoder failed on startup, log at {}", log_path.display())]
    LaunchFailure { log_path: PathBuf },

    #[error("Transcoder produced no playable output before the deadline, log at {}", log_path.display())]
    ReadinessTimeout { log_path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Diagnostic log path for failures that carry one.
    #[must_use]
    pub fn log_path(&self) -> Option<&PathBuf> {
        match self {
            Self::LaunchFailure { log_path } | Self::ReadinessTimeout { log_path } => {
                Some(log_path)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
