//! Error types for signal configuration.

use thiserror::Error;

/// Result type for signal operations.
pub type SignalResult<T> = Result<T, SignalError>;

/// Errors raised while building or parsing disturbance configurations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SignalError {
    /// Invalid argument provided to a signal constructor.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Unknown waveform name.
    #[error("Unknown disturbance kind: {name}")]
    UnknownKind { name: String },
}

impl From<aq_core::CoreError> for SignalError {
    fn from(e: aq_core::CoreError) -> Self {
        match e {
            aq_core::CoreError::NonFinite { what, .. } => SignalError::InvalidArg { what },
            aq_core::CoreError::InvalidArg { what } => SignalError::InvalidArg { what },
            aq_core::CoreError::Invariant { what } => SignalError::InvalidArg { what },
        }
    }
}
