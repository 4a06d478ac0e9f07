//! Smith predictor.
//!
//! Keeps an undelayed internal model of the tank, driven by the previous
//! pump command and the current demand:
//!
//! ```text
//! model    += (last_output − demand)·dt / area
//! pred_err  = target − model
//! mismatch  = sensed − model
//! output    = Kp·(pred_err − mismatch) + bias
//! ```
//!
//! `mismatch` trends to zero while the model tracks the plant; a large
//! sustained value means model and plant have diverged.

use crate::input::{ControllerInput, ControllerState, FEEDFORWARD_BIAS};
use aq_core::{EPSILON, clamp_non_negative, floor_positive};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmithLaw {
    pub kp: f64,
    /// Declared integral gain. The law is proportional-only on the
    /// corrected error; `ki` is carried for a future integral correction
    /// and does not enter the output.
    pub ki: f64,
    pub bias: f64,
}

impl Default for SmithLaw {
    fn default() -> Self {
        Self {
            kp: 4.0,
            ki: 0.8,
            bias: FEEDFORWARD_BIAS,
        }
    }
}

impl SmithLaw {
    /// Raw (unclamped) output and updated memory.
    pub fn update(
        &self,
        state: &ControllerState,
        input: &ControllerInput<'_>,
        area_m2: f64,
    ) -> (ControllerState, f64) {
        let model_level = clamp_non_negative(
            state.model_level
                + (state.last_output - input.demand) * input.dt / floor_positive(area_m2, EPSILON),
        );

        let pred_error = input.target - model_level;
        let mismatch = input.sensed_level - model_level;
        let output = self.kp * (pred_error - mismatch) + self.bias;

        let new_state = ControllerState {
            model_level,
            ..*state
        };
        (new_state, output)
    }

    /// Sensed-minus-model divergence for a given state and reading.
    pub fn mismatch(state: &ControllerState, sensed_level: f64) -> f64 {
        sensed_level - state.model_level
    }
}
