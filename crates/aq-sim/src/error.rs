//! Error types for simulation configuration.

use thiserror::Error;

/// Errors raised at the simulation's configuration boundary.
///
/// The tick itself never fails; these only come from constructors and
/// inbound configuration changes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Duplicate plan id: {id}")]
    DuplicatePlan { id: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<aq_core::CoreError> for SimError {
    fn from(e: aq_core::CoreError) -> Self {
        SimError::InvalidConfig {
            message: e.to_string(),
        }
    }
}

impl From<aq_signals::SignalError> for SimError {
    fn from(e: aq_signals::SignalError) -> Self {
        SimError::InvalidConfig {
            message: e.to_string(),
        }
    }
}

impl From<aq_plant::PlantError> for SimError {
    fn from(e: aq_plant::PlantError) -> Self {
        SimError::InvalidConfig {
            message: e.to_string(),
        }
    }
}

impl From<aq_controls::ControlError> for SimError {
    fn from(e: aq_controls::ControlError) -> Self {
        SimError::InvalidConfig {
            message: e.to_string(),
        }
    }
}
