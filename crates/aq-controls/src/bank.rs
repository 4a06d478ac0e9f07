//! The controller bank: one active law plus shared controller memory.

use crate::input::{ControllerInput, ControllerState};
use crate::mpc::MpcLaw;
use crate::paradigm::{Algorithm, DesignParadigm};
use crate::pid::PidLaw;
use crate::smith::SmithLaw;

/// Active control law and its memory.
///
/// Switching algorithm is a replace-and-reset: [`ControllerBank::select`]
/// discards integral, last error, predictor model and last command, so
/// nothing tuned for one plant area leaks into another.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerBank {
    algorithm: Algorithm,
    tank_area_m2: f64,
    pid: PidLaw,
    smith: SmithLaw,
    mpc: MpcLaw,
    state: ControllerState,
}

impl ControllerBank {
    /// Bank for `paradigm`, with the Smith model seeded at `level`.
    pub fn new(paradigm: &DesignParadigm, level: f64) -> Self {
        Self {
            algorithm: paradigm.algorithm,
            tank_area_m2: paradigm.tank_area_m2,
            pid: PidLaw::for_tank_area(paradigm.tank_area_m2),
            smith: SmithLaw::default(),
            mpc: MpcLaw::default(),
            state: ControllerState::seeded(level),
        }
    }

    /// Deploy a new paradigm and reset all controller memory.
    pub fn select(&mut self, paradigm: &DesignParadigm, level: f64) {
        *self = Self::new(paradigm, level);
    }

    /// Reset memory, keeping the active law.
    pub fn reset(&mut self, level: f64) {
        self.state = ControllerState::seeded(level);
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn tank_area_m2(&self) -> f64 {
        self.tank_area_m2
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn pid(&self) -> &PidLaw {
        &self.pid
    }

    /// Compute the pump command for this tick.
    ///
    /// The result is clamped to `[0, max_flow]` and becomes the new
    /// `last_output`. `last_error` is refreshed whatever law is active.
    pub fn compute(&mut self, input: &ControllerInput<'_>) -> f64 {
        let (mut next, raw) = match self.algorithm {
            Algorithm::Pid => self.pid.update(&self.state, input),
            Algorithm::Smith => self.smith.update(&self.state, input, self.tank_area_m2),
            Algorithm::Mpc => self.mpc.update(&self.state, input, self.tank_area_m2),
        };

        let max_flow = input.max_flow.max(0.0);
        let output = if raw.is_finite() {
            raw.clamp(0.0, max_flow)
        } else {
            0.0
        };

        next.last_output = output;
        next.last_error = input.error();
        self.state = next;
        output
    }
}
