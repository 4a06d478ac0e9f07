//! Complete simulation configuration.

use crate::error::{SimError, SimResult};
use crate::plan::PlanQueue;
use aq_controls::DesignParadigm;
use aq_core::ensure_finite;
use aq_plant::FaultSet;
use aq_signals::{DisturbanceConfig, DisturbanceKind};
use serde::{Deserialize, Serialize};

/// Everything needed to reproduce a run: with a fixed `seed`, two
/// simulations built from equal configurations produce identical telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Tick duration (s). Also the real-time pacing period.
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Pipe transport delay (s).
    #[serde(default = "default_pipe_delay")]
    pub pipe_delay_s: f64,
    /// True tank level at start and after reset (m).
    #[serde(default = "default_initial_level")]
    pub initial_level: f64,
    /// Telemetry samples retained.
    #[serde(default = "default_history_len")]
    pub history_len: usize,
    pub paradigm: DesignParadigm,
    pub demand: DisturbanceConfig,
    pub setpoint: DisturbanceConfig,
    #[serde(default)]
    pub faults: FaultSet,
    #[serde(default)]
    pub plans: PlanQueue,
    #[serde(default = "default_valve_open")]
    pub valve_open: bool,
    /// `None` seeds from system entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_dt() -> f64 {
    0.1
}

fn default_pipe_delay() -> f64 {
    5.0
}

fn default_initial_level() -> f64 {
    50.0
}

fn default_history_len() -> usize {
    600
}

fn default_valve_open() -> bool {
    true
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: default_dt(),
            pipe_delay_s: default_pipe_delay(),
            initial_level: default_initial_level(),
            history_len: default_history_len(),
            paradigm: DesignParadigm::default(),
            demand: DisturbanceConfig::new(DisturbanceKind::Sine, 50.0, 20.0, 0.05),
            setpoint: DisturbanceConfig::constant(50.0),
            faults: FaultSet::default(),
            plans: PlanQueue::default(),
            valve_open: true,
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject anything that must not reach the integrator.
    pub fn validate(&self) -> SimResult<()> {
        let dt = ensure_finite(self.dt, "dt must be finite")?;
        if dt <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        let delay = ensure_finite(self.pipe_delay_s, "pipe delay must be finite")?;
        if delay < 0.0 {
            return Err(SimError::InvalidArg {
                what: "pipe delay must be non-negative",
            });
        }
        let level = ensure_finite(self.initial_level, "initial level must be finite")?;
        if level < 0.0 {
            return Err(SimError::InvalidArg {
                what: "initial level must be non-negative",
            });
        }
        if self.history_len == 0 {
            return Err(SimError::InvalidArg {
                what: "history_len must be positive",
            });
        }
        self.paradigm.validate()?;
        self.demand.validate()?;
        self.setpoint.validate()?;
        self.faults.validate()?;
        self.plans.validate()?;
        Ok(())
    }

    /// Ticks covering `seconds` of simulated time.
    pub fn ticks_for(&self, seconds: f64) -> u64 {
        if seconds <= 0.0 || !seconds.is_finite() {
            return 0;
        }
        (seconds / self.dt).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = SimConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.dt, 0.1);
        assert_eq!(cfg.ticks_for(10.0), 100);
    }

    #[test]
    fn invalid_values_rejected() {
        let bad_dt = SimConfig {
            dt: 0.0,
            ..SimConfig::default()
        };
        assert!(bad_dt.validate().is_err());

        let bad_delay = SimConfig {
            pipe_delay_s: -1.0,
            ..SimConfig::default()
        };
        assert!(bad_delay.validate().is_err());

        let mut bad_area = SimConfig::default();
        bad_area.paradigm.tank_area_m2 = -3.0;
        assert!(bad_area.validate().is_err());

        let bad_history = SimConfig {
            history_len: 0,
            ..SimConfig::default()
        };
        assert!(bad_history.validate().is_err());
    }

    #[test]
    fn json_round_trip() {
        let cfg = SimConfig::default().with_seed(11);
        let text = serde_json::to_string(&cfg).unwrap();
        let back: SimConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(cfg, back);
    }
}
