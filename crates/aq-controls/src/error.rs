//! Error types for control configuration.

use thiserror::Error;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur while configuring controllers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Unknown control algorithm name.
    #[error("Unknown control algorithm: {name}")]
    UnknownAlgorithm { name: String },

    /// Unknown design paradigm id.
    #[error("Unknown design paradigm: {id}")]
    UnknownParadigm { id: String },
}

impl From<aq_core::CoreError> for ControlError {
    fn from(e: aq_core::CoreError) -> Self {
        match e {
            aq_core::CoreError::NonFinite { what, .. } => ControlError::InvalidArg { what },
            aq_core::CoreError::InvalidArg { what } => ControlError::InvalidArg { what },
            aq_core::CoreError::Invariant { what } => ControlError::InvalidArg { what },
        }
    }
}
