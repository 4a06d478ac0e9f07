//! Error types for the aq-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// gives front ends a single error surface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Failed to write scenario file: {path}")]
    ScenarioFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scenario already exists: {0}")]
    ScenarioExists(PathBuf),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Paradigm not found: {0}")]
    ParadigmNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Session closed")]
    SessionClosed,

    #[error("Assistant error: {0}")]
    Assistant(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for aq-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<aq_project::ProjectError> for AppError {
    fn from(err: aq_project::ProjectError) -> Self {
        AppError::Scenario(err.to_string())
    }
}

impl From<aq_sim::SimError> for AppError {
    fn from(err: aq_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<aq_controls::ControlError> for AppError {
    fn from(err: aq_controls::ControlError) -> Self {
        match err {
            aq_controls::ControlError::UnknownParadigm { id } => AppError::ParadigmNotFound(id),
            other => AppError::Simulation(other.to_string()),
        }
    }
}
