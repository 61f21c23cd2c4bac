// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Ingestion error: {0}")]
    Ingestion(String),

    #[error("Failed to read PDF {path}: {message}")]
    Pdf { path: PathBuf, message: String },

    #[error("No index found in {path}; build one before querying")]
    IndexNotFound { path: PathBuf },

    #[error("Model '{model}' unavailable: {message}")]
    ModelUnavailable { model: String, message: String },

    #[error("Invalid batch file {path}: {message}")]
    InvalidBatchFile { path: PathBuf, message: String },

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn model_unavailable(model: &str, message: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            model: model.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_batch_file(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidBatchFile {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Errors after which the menu loop keeps running.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        Self::Report(err.to_string())
    }
}
