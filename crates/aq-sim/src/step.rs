//! One simulation tick.
//!
//! Fixed order:
//! 1. fire due plans
//! 2. evaluate demand and setpoint
//! 3. read the level sensor
//! 4. compute the pump command
//! 5. push into the pipe, integrate the tank
//! 6. append telemetry
//!
//! Plans therefore affect the same tick's signals, and the tank always
//! integrates the command computed in this tick.

use crate::config::SimConfig;
use crate::plan::{PlanAction, SetpointChange};
use crate::state::SimulationState;
use crate::telemetry::TelemetrySample;
use aq_controls::ControllerInput;
use aq_plant::{max_pump_flow, sense_level};
use aq_signals::{DisturbanceConfig, evaluate};
use rand::Rng;
use tracing::{info, trace};

/// Advance `state` by one tick of `config.dt`.
pub fn step<R: Rng + ?Sized>(
    state: &mut SimulationState,
    config: &mut SimConfig,
    rng: &mut R,
) -> TelemetrySample {
    let dt = config.dt;
    let tick = state.tick + 1;
    // Multiplying avoids drift from repeated addition.
    let t = tick as f64 * dt;

    for plan in config.plans.fire_due(t) {
        info!(plan = %plan.id, t, trigger = plan.trigger_time, "plan fired: {}", plan.action.describe());
        apply_plan(config, &plan.action);
    }

    let demand = if config.valve_open {
        evaluate(t, &config.demand, rng).max(0.0)
    } else {
        0.0
    };
    let target = evaluate(t, &config.setpoint, rng);

    let sensed = sense_level(state.water_level, &config.faults, rng);

    let input = ControllerInput {
        time: t,
        dt,
        target,
        sensed_level: sensed,
        demand,
        max_flow: max_pump_flow(&config.faults),
        demand_pattern: &config.demand,
        valve_open: config.valve_open,
        pipeline: &state.pipeline,
    };
    let pump = state.controller.compute(&input);

    state.pipeline.push(pump);
    let inflow = state.pipeline.delayed();
    let tank = state
        .tank
        .step(state.water_level, inflow, demand, &config.faults, dt);

    state.tick = tick;
    state.time = t;
    state.water_level = tank.level;
    state.sensed_level = sensed;
    state.target_level = target;
    state.inflow_at_pump = pump;
    state.inflow_at_tank = inflow;
    state.outflow = demand;
    state.leak_flow = tank.leak;

    let sample = TelemetrySample {
        t,
        level: tank.level,
        target,
        flow_in: inflow,
        flow_out: demand,
    };
    state.history.push(sample);

    trace!(
        t,
        level = tank.level,
        sensed,
        target,
        pump,
        inflow,
        demand,
        leak = tank.leak,
        "tick"
    );
    sample
}

/// Replace the demand or setpoint pattern wholesale.
pub(crate) fn apply_plan(config: &mut SimConfig, action: &PlanAction) {
    match action {
        PlanAction::ChangeDisturbance(pattern) => config.demand = pattern.clone(),
        PlanAction::ChangeSetpoint(SetpointChange::Pattern(pattern)) => {
            config.setpoint = pattern.clone()
        }
        PlanAction::ChangeSetpoint(SetpointChange::Level(level)) => {
            config.setpoint = DisturbanceConfig::constant(*level)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aq_core::SimRng;

    #[test]
    fn time_advances_by_dt() {
        let mut cfg = SimConfig::default().with_seed(1);
        let mut state = SimulationState::new(&cfg).unwrap();
        let mut rng = SimRng::from_seed_u64(1);
        for i in 1..=25 {
            let sample = step(&mut state, &mut cfg, &mut rng);
            assert_eq!(sample.t, i as f64 * 0.1);
        }
        assert_eq!(state.tick, 25);
        assert_eq!(state.history.len(), 25);
    }

    #[test]
    fn physics_consumes_this_ticks_command() {
        // Without pipe delay the tank sees exactly what the controller sent.
        let mut cfg = SimConfig {
            pipe_delay_s: 0.0,
            ..SimConfig::default()
        };
        let mut state = SimulationState::new(&cfg).unwrap();
        let mut rng = SimRng::from_seed_u64(2);
        for _ in 0..10 {
            let sample = step(&mut state, &mut cfg, &mut rng);
            assert_eq!(sample.flow_in, state.inflow_at_pump);
        }
    }

    #[test]
    fn closed_valve_stops_demand() {
        let mut cfg = SimConfig {
            valve_open: false,
            ..SimConfig::default()
        };
        let mut state = SimulationState::new(&cfg).unwrap();
        let mut rng = SimRng::from_seed_u64(3);
        let sample = step(&mut state, &mut cfg, &mut rng);
        assert_eq!(sample.flow_out, 0.0);
    }
}
