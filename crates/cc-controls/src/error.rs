//! Error types for control operations.

use cc_core::CoreError;
use thiserror::Error;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur in control operations.
///
/// Out-of-range values are never an error; they are clamped.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A control (or task) with this name already exists.
    #[error("Duplicate name: {name}")]
    DuplicateName { name: String },

    /// A name was referenced that is not registered.
    #[error("Unknown control '{name}' referenced by {context}")]
    UnknownControl { name: String, context: String },

    /// A scheduled action reported a failure for one tick.
    #[error("Action failed: {what}")]
    ActionFailed { what: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}
