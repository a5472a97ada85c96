//! Error types for the cc-app service layer.

use std::path::PathBuf;

/// Unified error for the CLI: wraps failures from configuration loading,
/// runtime construction, and the running session.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Project(String),

    #[error("Failed to read config file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config validation failed: {0}")]
    Validation(String),

    #[error("Runtime compilation failed: {0}")]
    Compile(String),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cc-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<cc_project::ProjectError> for AppError {
    fn from(err: cc_project::ProjectError) -> Self {
        match err {
            cc_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<cc_project::ValidationError> for AppError {
    fn from(err: cc_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<cc_controls::ControlError> for AppError {
    fn from(err: cc_controls::ControlError) -> Self {
        AppError::Compile(err.to_string())
    }
}

impl From<cc_runtime::RuntimeError> for AppError {
    fn from(err: cc_runtime::RuntimeError) -> Self {
        AppError::Runtime(err.to_string())
    }
}
