//! Disturbance signal generation for aqueduct.
//!
//! Two independent signals drive every simulation: the consumer demand
//! (tank outflow) and the level setpoint. Both are described by a
//! [`DisturbanceConfig`] and sampled once per tick with [`evaluate`].
//!
//! Evaluation is a pure function of time and configuration, except for the
//! stochastic kinds (`Noise`, `RandomWalk`) which draw from a caller-supplied
//! generator. [`expected`] is the deterministic forecast of the same signal,
//! used by predictive controllers that look ahead in time.

pub mod config;
pub mod error;
pub mod waveform;

pub use config::{DisturbanceConfig, DisturbanceKind, MIN_FREQUENCY_HZ};
pub use error::{SignalError, SignalResult};
pub use waveform::{evaluate, expected};
