//! Plant models for the pump → pipe → tank → demand chain.
//!
//! Provides:
//! - Fault channels (leakage, pump efficiency loss, sensor drift)
//! - Transport delay line for the long supply pipe
//! - First-order tank level integrator
//! - Level sensor with drift and measurement noise
//! - Pump capacity limits

pub mod delay;
pub mod error;
pub mod fault;
pub mod pump;
pub mod sensor;
pub mod tank;

pub use delay::DelayLine;
pub use error::{PlantError, PlantResult};
pub use fault::{FaultConfig, FaultFlags, FaultKind, FaultSet, leak_flow};
pub use pump::{MAX_PUMP_FLOW, max_pump_flow, pump_capacity_factor};
pub use sensor::{SENSOR_NOISE_AMPLITUDE, sense_level};
pub use tank::{Tank, TankStep, integrate_level};
