//! Mutable simulation state, owned by the step orchestrator.

use crate::config::SimConfig;
use crate::error::SimResult;
use crate::telemetry::{StateSnapshot, TelemetryHistory};
use aq_controls::{Algorithm, ControllerBank, SmithLaw};
use aq_plant::{DelayLine, Tank};
use aq_signals::expected;

/// All state that evolves from tick to tick.
///
/// `water_level` is authoritative and only written by the tank integrator.
/// `sensed_level` is the reading taken during the last tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub tick: u64,
    pub time: f64,
    pub water_level: f64,
    pub sensed_level: f64,
    pub target_level: f64,
    /// Pump command this tick (m³/s).
    pub inflow_at_pump: f64,
    /// Delayed inflow reaching the tank (m³/s).
    pub inflow_at_tank: f64,
    /// Demand outflow (m³/s).
    pub outflow: f64,
    pub leak_flow: f64,
    pub tank: Tank,
    pub pipeline: DelayLine,
    pub controller: ControllerBank,
    pub history: TelemetryHistory,
}

impl SimulationState {
    /// Fresh state at t = 0 for `config`.
    pub fn new(config: &SimConfig) -> SimResult<Self> {
        let tank = Tank::new(config.paradigm.tank_area_m2)?;
        let pipeline = DelayLine::from_seconds(config.pipe_delay_s, config.dt)?;
        let level = config.initial_level;
        Ok(Self {
            tick: 0,
            time: 0.0,
            water_level: level,
            sensed_level: level,
            target_level: expected(0.0, &config.setpoint),
            inflow_at_pump: 0.0,
            inflow_at_tank: 0.0,
            outflow: 0.0,
            leak_flow: 0.0,
            tank,
            pipeline,
            controller: ControllerBank::new(&config.paradigm, level),
            history: TelemetryHistory::new(config.history_len),
        })
    }

    pub fn snapshot(&self, config: &SimConfig) -> StateSnapshot {
        StateSnapshot {
            tick: self.tick,
            time: self.time,
            true_level: self.water_level,
            sensed_level: self.sensed_level,
            target_level: self.target_level,
            pump_outflow: self.inflow_at_pump,
            tank_inflow: self.inflow_at_tank,
            demand_outflow: self.outflow,
            leak_flow: self.leak_flow,
            valve_open: config.valve_open,
            algorithm: self.controller.algorithm(),
            faults: config.faults.flags(),
            model_mismatch: (self.controller.algorithm() == Algorithm::Smith)
                .then(|| SmithLaw::mismatch(self.controller.state(), self.sensed_level)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_from_config() {
        let cfg = SimConfig::default();
        let state = SimulationState::new(&cfg).unwrap();
        assert_eq!(state.water_level, 50.0);
        assert_eq!(state.target_level, 50.0);
        assert_eq!(state.pipeline.delay_samples(), 50);
        assert_eq!(state.history.retention(), 600);
        assert!(state.history.is_empty());
    }
}
