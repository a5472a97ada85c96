//! Error types for runtime operations.

use cc_controls::ControlError;
use thiserror::Error;

/// Errors encountered while running controls.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Control(#[from] ControlError),

    #[error("Failed to spawn thread '{name}': {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Thread '{name}' panicked")]
    Join { name: String },

    #[error("Output sink error: {0}")]
    Sink(#[from] std::io::Error),

    #[error("Snapshot encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
