//! Pump control laws for aqueduct.
//!
//! One control law is active at a time, chosen by the deployed
//! [`DesignParadigm`]. The [`ControllerBank`] owns the controller memory
//! (integral, last error, internal model, last command) and resets it
//! whenever the paradigm is replaced.
//!
//! # Laws
//!
//! - **PID**: feedback on the measured level with a feedforward bias
//! - **Smith predictor**: proportional law on an undelayed internal model
//! - **MPC**: open-loop lookahead over the pipe delay, single-shot correction
//!
//! All laws clamp to `[0, max_flow]`, where `max_flow` already includes the
//! pump-efficiency fault.

pub mod bank;
pub mod error;
pub mod input;
pub mod mpc;
pub mod paradigm;
pub mod pid;
pub mod smith;

pub use bank::ControllerBank;
pub use error::{ControlError, ControlResult};
pub use input::{ControllerInput, ControllerState, FEEDFORWARD_BIAS};
pub use mpc::MpcLaw;
pub use paradigm::{Algorithm, DesignParadigm, ParadigmMetadata};
pub use pid::PidLaw;
pub use smith::SmithLaw;
