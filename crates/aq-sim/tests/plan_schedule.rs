//! Integration test: time-triggered plans against a running simulation.
//!
//! - A demand change scheduled at t = 10 s is first visible at tick 100
//! - Plans sharing a trigger time apply in insertion order
//! - Fired plans are completed and never fire again

use aq_core::PlanId;
use aq_signals::DisturbanceConfig;
use aq_sim::{PlanAction, PlanStatus, PlanStep, SetpointChange, SimConfig, Simulation};

fn constant_demand_config() -> SimConfig {
    SimConfig {
        demand: DisturbanceConfig::constant(20.0),
        ..SimConfig::default().with_seed(11)
    }
}

#[test]
fn demand_change_fires_at_trigger_tick() {
    let mut sim = Simulation::new(constant_demand_config()).unwrap();
    let id = sim
        .enqueue_plan(PlanStep::new(
            10.0,
            PlanAction::ChangeDisturbance(DisturbanceConfig::constant(80.0)),
        ))
        .unwrap();

    let before = sim.run_ticks(99).unwrap();
    assert_eq!(before.flow_out, 20.0);
    assert_eq!(
        sim.config().plans.get(id).map(|p| p.status),
        Some(PlanStatus::Pending)
    );

    let at = sim.step();
    assert!((at.t - 10.0).abs() < 1e-9);
    assert_eq!(at.flow_out, 80.0);
    assert_eq!(
        sim.config().plans.get(id).map(|p| p.status),
        Some(PlanStatus::Completed)
    );
    assert_eq!(sim.config().demand, DisturbanceConfig::constant(80.0));
}

#[test]
fn equal_trigger_times_apply_in_insertion_order() {
    let mut sim = Simulation::new(constant_demand_config()).unwrap();
    sim.enqueue_plan(PlanStep::new(
        1.0,
        PlanAction::ChangeSetpoint(SetpointChange::Level(60.0)),
    ))
    .unwrap();
    sim.enqueue_plan(PlanStep::new(
        1.0,
        PlanAction::ChangeSetpoint(SetpointChange::Level(70.0)),
    ))
    .unwrap();

    let sample = sim.run_for(1.0).unwrap();
    assert_eq!(sample.target, 70.0);
    assert_eq!(sim.config().plans.pending().count(), 0);
}

#[test]
fn past_trigger_fires_on_next_tick() {
    let mut sim = Simulation::new(constant_demand_config()).unwrap();
    sim.run_for(5.0);
    sim.enqueue_plan(PlanStep::new(
        2.0,
        PlanAction::ChangeSetpoint(SetpointChange::Level(42.0)),
    ))
    .unwrap();
    let sample = sim.step();
    assert_eq!(sample.target, 42.0);
}

#[test]
fn cancelled_plan_never_fires() {
    let mut sim = Simulation::new(constant_demand_config()).unwrap();
    let id = sim
        .enqueue_plan(PlanStep::new(
            0.5,
            PlanAction::ChangeSetpoint(SetpointChange::Level(99.0)),
        ))
        .unwrap();
    assert!(sim.cancel_plan(id));
    assert!(!sim.cancel_plan(id));
    let sample = sim.run_for(1.0).unwrap();
    assert_eq!(sample.target, 50.0);
}

#[test]
fn duplicate_plan_id_rejected() {
    let mut sim = Simulation::new(constant_demand_config()).unwrap();
    let id = PlanId::from_u128(7);
    let plan = PlanStep::new(3.0, PlanAction::ChangeSetpoint(SetpointChange::Level(1.0)))
        .with_id(id);
    sim.enqueue_plan(plan.clone()).unwrap();
    assert!(sim.enqueue_plan(plan).is_err());
}
