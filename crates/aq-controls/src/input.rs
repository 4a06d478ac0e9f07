//! Controller inputs and memory.

use aq_plant::DelayLine;
use aq_signals::{DisturbanceConfig, expected};
use serde::{Deserialize, Serialize};

/// Constant added to every law's output: the nominal steady demand (m³/s).
pub const FEEDFORWARD_BIAS: f64 = 50.0;

/// Everything a control law may look at during one tick.
#[derive(Debug, Clone, Copy)]
pub struct ControllerInput<'a> {
    /// Simulated time of the tick (s).
    pub time: f64,
    /// Tick duration (s).
    pub dt: f64,
    /// Level setpoint (m).
    pub target: f64,
    /// Measured level (m), including sensor drift and noise.
    pub sensed_level: f64,
    /// Demand outflow this tick (m³/s).
    pub demand: f64,
    /// Maximum pump output after faults (m³/s).
    pub max_flow: f64,
    /// Active demand waveform, for forecasting.
    pub demand_pattern: &'a DisturbanceConfig,
    /// Consumer valve state; a closed valve draws nothing.
    pub valve_open: bool,
    /// Pump outputs already travelling down the pipe.
    pub pipeline: &'a DelayLine,
}

impl ControllerInput<'_> {
    /// Tracking error on the measured level.
    pub fn error(&self) -> f64 {
        self.target - self.sensed_level
    }

    /// Forecast of demand at time `t` from the configured waveform.
    pub fn forecast_demand(&self, t: f64) -> f64 {
        if self.valve_open {
            expected(t, self.demand_pattern)
        } else {
            0.0
        }
    }
}

/// Controller memory, shared by all laws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    /// PID integral accumulator.
    pub integral: f64,
    /// Tracking error of the previous tick.
    pub last_error: f64,
    /// Smith predictor internal model level (m).
    pub model_level: f64,
    /// Last clamped pump command (m³/s).
    pub last_output: f64,
}

impl ControllerState {
    /// Fresh memory with the internal model seeded at `level`.
    pub fn seeded(level: f64) -> Self {
        Self {
            integral: 0.0,
            last_error: 0.0,
            model_level: level,
            last_output: FEEDFORWARD_BIAS,
        }
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::seeded(0.0)
    }
}
