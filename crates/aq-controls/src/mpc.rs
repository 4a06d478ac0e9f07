//! Simplified model predictive control.
//!
//! Projects the tank level over a fixed horizon, using the pump outputs
//! already in the pipe where they exist and holding the last command
//! beyond that, against the forecast demand waveform. The command is then
//! corrected once toward the horizon-end error:
//!
//! ```text
//! output = last_output + gain·(target − level[horizon])
//! ```
//!
//! This is a single-shot correction, not an optimisation over a control
//! sequence. Demand is forecast from the configured waveform; faults are
//! not part of the internal model.

use crate::input::{ControllerInput, ControllerState};
use aq_plant::integrate_level;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MpcLaw {
    /// Lookahead in ticks (5 s at 0.1 s ticks).
    pub horizon: usize,
    /// Correction gain on the horizon-end error.
    pub gain: f64,
}

impl Default for MpcLaw {
    fn default() -> Self {
        Self {
            horizon: 50,
            gain: 2.0,
        }
    }
}

impl MpcLaw {
    /// Projected level after each tick of the horizon, starting from the
    /// measured level.
    pub fn predict(
        &self,
        state: &ControllerState,
        input: &ControllerInput<'_>,
        area_m2: f64,
    ) -> Vec<f64> {
        let mut level = input.sensed_level;
        let mut trajectory = Vec::with_capacity(self.horizon);
        for k in 0..self.horizon {
            let inflow = input.pipeline.in_flight(k).unwrap_or(state.last_output);
            let t = input.time + k as f64 * input.dt;
            let demand = input.forecast_demand(t);
            level = integrate_level(level, inflow - demand, input.dt, area_m2);
            trajectory.push(level);
        }
        trajectory
    }

    /// Raw (unclamped) output. MPC keeps no memory beyond the bank's.
    pub fn update(
        &self,
        state: &ControllerState,
        input: &ControllerInput<'_>,
        area_m2: f64,
    ) -> (ControllerState, f64) {
        let end_level = self
            .predict(state, input, area_m2)
            .last()
            .copied()
            .unwrap_or(input.sensed_level);
        let future_error = input.target - end_level;
        (*state, state.last_output + future_error * self.gain)
    }
}
