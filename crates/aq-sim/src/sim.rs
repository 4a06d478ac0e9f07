//! `Simulation`: config + state + RNG behind one handle.
//!
//! All mutators are meant to be called between ticks. Nothing here blocks
//! or paces; real-time pacing belongs to the session layer.

use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::plan::PlanStep;
use crate::state::SimulationState;
use crate::step::step;
use crate::telemetry::{StateSnapshot, TelemetryHistory, TelemetrySample};
use aq_controls::DesignParadigm;
use aq_core::{PlanId, SimRng};
use aq_plant::{FaultConfig, FaultKind, Tank, delay::samples_for};
use aq_signals::DisturbanceConfig;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    /// Demand, setpoint and plans as first validated; restored on reset.
    initial: SimConfig,
    state: SimulationState,
    rng: SimRng,
}

impl Simulation {
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let state = SimulationState::new(&config)?;
        let rng = SimRng::from_optional_seed(config.seed);
        info!(
            paradigm = %config.paradigm.id,
            algorithm = %config.paradigm.algorithm,
            dt = config.dt,
            seed = ?config.seed,
            "simulation created"
        );
        Ok(Self {
            initial: config.clone(),
            config,
            state,
            rng,
        })
    }

    /// Advance one tick.
    pub fn step(&mut self) -> TelemetrySample {
        step(&mut self.state, &mut self.config, &mut self.rng)
    }

    pub fn run_ticks(&mut self, ticks: u64) -> Option<TelemetrySample> {
        let mut last = None;
        for _ in 0..ticks {
            last = Some(self.step());
        }
        last
    }

    /// Advance by `seconds` of simulated time, rounded to whole ticks.
    pub fn run_for(&mut self, seconds: f64) -> Option<TelemetrySample> {
        let ticks = self.config.ticks_for(seconds);
        self.run_ticks(ticks)
    }

    /// Swap the design paradigm. Tank geometry changes with it and
    /// controller memory restarts from the current level.
    pub fn select_paradigm(&mut self, paradigm: DesignParadigm) -> SimResult<()> {
        paradigm.validate()?;
        let tank = Tank::new(paradigm.tank_area_m2)?;
        info!(
            from = %self.config.paradigm.id,
            to = %paradigm.id,
            algorithm = %paradigm.algorithm,
            t = self.state.time,
            "paradigm selected"
        );
        self.state.tank = tank;
        self.state
            .controller
            .select(&paradigm, self.state.water_level);
        self.config.paradigm = paradigm;
        Ok(())
    }

    pub fn set_demand(&mut self, demand: DisturbanceConfig) -> SimResult<()> {
        demand.validate()?;
        info!(kind = %demand.kind, base = demand.base, amplitude = demand.amplitude, "demand changed");
        self.config.demand = demand;
        Ok(())
    }

    pub fn set_setpoint(&mut self, setpoint: DisturbanceConfig) -> SimResult<()> {
        setpoint.validate()?;
        info!(kind = %setpoint.kind, base = setpoint.base, "setpoint changed");
        self.config.setpoint = setpoint;
        Ok(())
    }

    /// Shorthand for a constant setpoint.
    pub fn set_setpoint_level(&mut self, level: f64) -> SimResult<()> {
        self.set_setpoint(DisturbanceConfig::constant(level))
    }

    pub fn enqueue_plan(&mut self, plan: PlanStep) -> SimResult<PlanId> {
        let trigger = plan.trigger_time;
        let description = plan.action.describe();
        let id = self.config.plans.enqueue(plan)?;
        info!(plan = %id, trigger, "plan enqueued: {description}");
        Ok(id)
    }

    pub fn cancel_plan(&mut self, id: PlanId) -> bool {
        let cancelled = self.config.plans.cancel(id);
        if cancelled {
            info!(plan = %id, "plan cancelled");
        }
        cancelled
    }

    pub fn set_fault(&mut self, kind: FaultKind, value: f64) -> SimResult<()> {
        self.config.faults.set(kind, FaultConfig::active(value))?;
        info!(fault = kind.label(), value, "fault injected");
        Ok(())
    }

    pub fn clear_fault(&mut self, kind: FaultKind) {
        self.config.faults.clear(kind);
        info!(fault = kind.label(), "fault cleared");
    }

    pub fn clear_faults(&mut self) {
        self.config.faults.clear_all();
        info!("all faults cleared");
    }

    pub fn set_valve(&mut self, open: bool) {
        self.config.valve_open = open;
        info!(open, "consumer valve");
    }

    /// Change the transport delay. Only the lookup offset moves; the
    /// pipe keeps the depth it was built with until the next reset.
    pub fn set_pipe_delay(&mut self, delay_s: f64) -> SimResult<()> {
        let samples = samples_for(delay_s, self.config.dt)?;
        self.config.pipe_delay_s = delay_s;
        self.state.pipeline.set_delay_samples(samples);
        info!(delay_s, samples, "pipe delay changed");
        Ok(())
    }

    /// Back to t = 0: initial level, empty pipe, fresh controller memory,
    /// empty history, RNG reseeded from the config. Demand, setpoint and the
    /// plan schedule return to what the simulation was created with, every
    /// plan pending again. Paradigm, faults, valve and pipe delay keep their
    /// current values.
    pub fn reset(&mut self) -> SimResult<()> {
        self.config.demand = self.initial.demand.clone();
        self.config.setpoint = self.initial.setpoint.clone();
        self.config.plans = self.initial.plans.clone();
        self.config.plans.rearm();
        self.state = SimulationState::new(&self.config)?;
        self.rng = SimRng::from_optional_seed(self.config.seed);
        info!(level = self.config.initial_level, "simulation reset");
        Ok(())
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.state.snapshot(&self.config)
    }

    pub fn history(&self) -> &TelemetryHistory {
        &self.state.history
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn time(&self) -> f64 {
        self.state.time
    }
}

impl TryFrom<SimConfig> for Simulation {
    type Error = SimError;

    fn try_from(config: SimConfig) -> SimResult<Self> {
        Self::new(config)
    }
}
