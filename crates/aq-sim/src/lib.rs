//! Fixed-step simulation of the pump → pipe → tank → demand chain.
//!
//! Provides:
//! - Time-triggered plan scheduling (pattern and setpoint changes)
//! - The per-tick step orchestrator over plant, sensor and controller bank
//! - Bounded telemetry history and read-only state snapshots
//! - A [`Simulation`] facade owning configuration, state and randomness
//!
//! The core is headless: [`step`] advances one tick with no timer involved.
//! Real-time pacing lives in the application layer.

pub mod config;
pub mod error;
pub mod plan;
pub mod sim;
pub mod state;
pub mod step;
pub mod telemetry;

pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use plan::{PlanAction, PlanQueue, PlanStatus, PlanStep, SetpointChange, TIME_EPSILON};
pub use sim::Simulation;
pub use state::SimulationState;
pub use step::step;
pub use telemetry::{StateSnapshot, TelemetryHistory, TelemetrySample};
