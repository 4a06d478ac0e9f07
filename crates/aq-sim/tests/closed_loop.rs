//! Integration test: closed-loop behaviour of the full tick pipeline.
//!
//! - Same seed, same configuration: identical telemetry
//! - Tank level never goes negative, whatever the faults
//! - Reset replays the schedule, fired plans included
//! - Paradigm switch resets controller memory
//! - Pipe delay: nothing reaches the tank before the delay elapses

use aq_controls::{Algorithm, DesignParadigm};
use aq_plant::FaultKind;
use aq_signals::{DisturbanceConfig, DisturbanceKind};
use aq_sim::{PlanAction, PlanStep, SimConfig, Simulation, TelemetrySample};
use proptest::prelude::*;

fn run(config: SimConfig, seconds: f64) -> Vec<TelemetrySample> {
    let mut sim = Simulation::new(config).unwrap();
    sim.run_for(seconds);
    sim.history().to_vec()
}

#[test]
fn fixed_seed_is_reproducible() {
    let config = SimConfig {
        demand: DisturbanceConfig::new(DisturbanceKind::Noise, 40.0, 30.0, 0.1),
        ..SimConfig::default().with_seed(1234)
    };
    let a = run(config.clone(), 30.0);
    let b = run(config, 30.0);
    assert_eq!(a, b);
}

#[test]
fn reset_replays_identically() {
    let config = SimConfig {
        demand: DisturbanceConfig::new(DisturbanceKind::RandomWalk, 50.0, 10.0, 0.1),
        ..SimConfig::default().with_seed(5)
    };
    let mut sim = Simulation::new(config).unwrap();
    sim.run_for(20.0);
    let first = sim.history().to_vec();
    sim.reset().unwrap();
    sim.run_for(20.0);
    assert_eq!(first, sim.history().to_vec());
}

#[test]
fn reset_replays_fired_plans() {
    let mut config = SimConfig {
        demand: DisturbanceConfig::constant(20.0),
        ..SimConfig::default().with_seed(11)
    };
    config
        .plans
        .enqueue(PlanStep::new(
            2.0,
            PlanAction::ChangeDisturbance(DisturbanceConfig::constant(80.0)),
        ))
        .unwrap();
    let mut sim = Simulation::new(config).unwrap();
    sim.run_for(5.0);
    let first = sim.history().to_vec();
    assert_eq!(first[0].flow_out, 20.0);
    assert_eq!(first.last().unwrap().flow_out, 80.0);

    sim.reset().unwrap();
    assert_eq!(sim.config().demand.base, 20.0);
    sim.run_for(5.0);
    assert_eq!(first, sim.history().to_vec());
}

#[test]
fn sensor_drift_shows_up_as_model_mismatch() {
    let mut config = SimConfig {
        paradigm: DesignParadigm::preset("predictor").unwrap(),
        ..SimConfig::default().with_seed(8)
    };
    config
        .faults
        .set(FaultKind::SensorDrift, aq_plant::FaultConfig::active(2.0))
        .unwrap();
    let mut sim = Simulation::new(config).unwrap();
    sim.step();
    let mismatch = sim.snapshot().model_mismatch.unwrap();
    assert!((mismatch - 2.0).abs() < 0.2, "mismatch {mismatch}");

    let pid = Simulation::new(SimConfig::default().with_seed(8)).unwrap();
    assert_eq!(pid.snapshot().model_mismatch, None);
}

#[test]
fn pipe_delay_holds_back_inflow() {
    let mut sim = Simulation::new(SimConfig::default().with_seed(3)).unwrap();
    let first = sim.step();
    assert_eq!(first.flow_in, 0.0);
    let first_command = sim.state().inflow_at_pump;
    for _ in 1..50 {
        assert_eq!(sim.step().flow_in, 0.0);
    }
    // 5 s at 0.1 s per tick: the first command lands on tick 51.
    let arrived = sim.step();
    assert!(first_command > 0.0);
    assert_eq!(arrived.flow_in, first_command);
}

#[test]
fn paradigm_switch_zeroes_integral() {
    let config = SimConfig {
        setpoint: DisturbanceConfig::constant(80.0),
        ..SimConfig::default().with_seed(9)
    };
    let mut sim = Simulation::new(config).unwrap();
    sim.run_for(20.0);
    assert!(sim.state().controller.state().integral > 0.0);

    sim.select_paradigm(DesignParadigm::preset("predictor").unwrap())
        .unwrap();
    let state = sim.state().controller.state();
    assert_eq!(state.integral, 0.0);
    assert_eq!(state.last_error, 0.0);
    assert_eq!(sim.snapshot().algorithm, Algorithm::Smith);
}

#[test]
fn every_paradigm_stays_bounded() {
    for paradigm in DesignParadigm::presets() {
        let config = SimConfig {
            paradigm,
            ..SimConfig::default().with_seed(21)
        };
        for sample in run(config, 60.0) {
            assert!(sample.level.is_finite());
            assert!(sample.level >= 0.0);
            assert!((0.0..=250.0).contains(&sample.flow_in));
        }
    }
}

#[test]
fn pump_fault_caps_command() {
    let mut sim = Simulation::new(SimConfig {
        setpoint: DisturbanceConfig::constant(500.0),
        ..SimConfig::default().with_seed(4)
    })
    .unwrap();
    sim.set_fault(FaultKind::PumpEfficiency, 60.0).unwrap();
    sim.run_for(10.0);
    for _ in 0..20 {
        sim.step();
        assert!(sim.state().inflow_at_pump <= 100.0 + 1e-9);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn level_never_negative(
        seed in any::<u64>(),
        leak in 0.0f64..50.0,
        efficiency in 0.0f64..=100.0,
        drift in -20.0f64..20.0,
        base in 0.0f64..300.0,
        kind_ix in 0usize..DisturbanceKind::ALL.len(),
        paradigm_ix in 0usize..3,
    ) {
        let paradigm = DesignParadigm::presets().swap_remove(paradigm_ix);
        let mut sim = Simulation::new(SimConfig {
            paradigm,
            demand: DisturbanceConfig::new(DisturbanceKind::ALL[kind_ix], base, 80.0, 0.2),
            initial_level: 5.0,
            ..SimConfig::default().with_seed(seed)
        }).unwrap();
        sim.set_fault(FaultKind::Leakage, leak).unwrap();
        sim.set_fault(FaultKind::PumpEfficiency, efficiency).unwrap();
        sim.set_fault(FaultKind::SensorDrift, drift).unwrap();
        for _ in 0..300 {
            let sample = sim.step();
            prop_assert!(sample.level >= 0.0);
            prop_assert!(sample.level.is_finite());
        }
    }
}
