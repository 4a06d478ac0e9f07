//! Error types for plant configuration.

use aq_core::CoreError;
use thiserror::Error;

/// Errors raised when a plant parameter is out of physical bounds.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlantError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unknown fault: {name}")]
    UnknownFault { name: String },
}

pub type PlantResult<T> = Result<T, PlantError>;

impl From<CoreError> for PlantError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NonFinite { what, .. } => PlantError::NonPhysical { what },
            CoreError::InvalidArg { what } => PlantError::InvalidArg { what },
            CoreError::Invariant { what } => PlantError::InvalidArg { what },
        }
    }
}
