//! Error types for claimdiff operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClaimdiffError>;

#[derive(Error, Debug)]
pub enum ClaimdiffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workspace error: {0}")]
    Workspace(String),

    #[error("Version not found: {name}")]
    VersionNotFound { name: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl ClaimdiffError {
    pub fn workspace(msg: impl Into<String>) -> Self {
        Self::Workspace(msg.into())
    }

    pub fn version_not_found(name: impl Into<String>) -> Self {
        Self::VersionNotFound { name: name.into() }
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }
}
