//! Shared application service layer for aqueduct.
//!
//! Front ends (the CLI today) go through this crate for scenario handling,
//! batch runs, interactive sessions, paradigm comparison and assistant
//! context capture.

pub mod assistant;
pub mod compare;
pub mod error;
pub mod progress;
pub mod run_service;
pub mod scenario_service;
pub mod session;

// Re-export key types for convenience
pub use assistant::{
    Assistant, AssistantContext, AssistantError, BriefingAssistant, narrate_detached,
};
pub use compare::{ComparisonRow, compare_paradigms, ranking};
pub use error::{AppError, AppResult};
pub use progress::{RunProgressEvent, RunStage};
pub use run_service::{RunMetrics, RunReport, run_headless, run_headless_with_progress};
pub use scenario_service::{
    build_simulation, compile_scenario, init_scenario, load_scenario, save_scenario,
    validate_scenario,
};
pub use session::{Session, SessionCommand, SessionOptions};
