//! Headless batch execution: no pacing, full telemetry, summary metrics.

use std::time::Instant;

use aq_controls::Algorithm;
use aq_sim::{SimConfig, Simulation, StateSnapshot, TelemetrySample};
use serde::Serialize;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::progress::{RunProgressEvent, RunStage};

/// Level at or below which the tank counts as drained (m).
pub const DRAINED_LEVEL_M: f64 = 0.5;

/// Tracking and effort summary of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunMetrics {
    /// Integral of |target - level| over time (m·s).
    pub iae: f64,
    pub max_abs_error: f64,
    pub rms_error: f64,
    pub min_level: f64,
    pub max_level: f64,
    pub mean_level: f64,
    /// Seconds spent at or below [`DRAINED_LEVEL_M`].
    pub time_drained_s: f64,
    /// Volume commanded at the pump (m³), a proxy for pumping energy.
    pub pumped_volume: f64,
}

#[derive(Debug, Default)]
struct MetricsAccumulator {
    ticks: u64,
    dt: f64,
    iae: f64,
    max_abs_error: f64,
    sq_error: f64,
    min_level: f64,
    max_level: f64,
    level_sum: f64,
    time_drained_s: f64,
    pumped_volume: f64,
}

impl MetricsAccumulator {
    fn new(dt: f64) -> Self {
        Self {
            dt,
            min_level: f64::INFINITY,
            max_level: f64::NEG_INFINITY,
            ..Self::default()
        }
    }

    fn record(&mut self, sample: &TelemetrySample, pump_command: f64) {
        let error = (sample.target - sample.level).abs();
        self.ticks += 1;
        self.iae += error * self.dt;
        self.max_abs_error = self.max_abs_error.max(error);
        self.sq_error += error * error;
        self.min_level = self.min_level.min(sample.level);
        self.max_level = self.max_level.max(sample.level);
        self.level_sum += sample.level;
        if sample.level <= DRAINED_LEVEL_M {
            self.time_drained_s += self.dt;
        }
        self.pumped_volume += pump_command * self.dt;
    }

    fn finish(self) -> RunMetrics {
        if self.ticks == 0 {
            return RunMetrics::default();
        }
        let n = self.ticks as f64;
        RunMetrics {
            iae: self.iae,
            max_abs_error: self.max_abs_error,
            rms_error: (self.sq_error / n).sqrt(),
            min_level: self.min_level,
            max_level: self.max_level,
            mean_level: self.level_sum / n,
            time_drained_s: self.time_drained_s,
            pumped_volume: self.pumped_volume,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub paradigm_id: String,
    pub paradigm_name: String,
    pub algorithm: Algorithm,
    pub duration_s: f64,
    pub ticks: u64,
    pub seed: Option<u64>,
    pub metrics: RunMetrics,
    pub final_snapshot: StateSnapshot,
    /// Every tick, independent of the in-simulation history retention.
    pub samples: Vec<TelemetrySample>,
    #[serde(skip)]
    pub wall_time_s: f64,
}

pub fn run_headless(config: SimConfig, duration_s: f64) -> AppResult<RunReport> {
    run_headless_with_progress(config, duration_s, None)
}

/// Run for `duration_s` of simulated time as fast as possible.
///
/// Progress is reported about once per simulated second.
pub fn run_headless_with_progress(
    config: SimConfig,
    duration_s: f64,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunReport> {
    if !duration_s.is_finite() || duration_s < 0.0 {
        return Err(AppError::InvalidInput(format!(
            "duration must be a non-negative number of seconds, got {duration_s}"
        )));
    }
    let started = Instant::now();
    let mut emit = |event: RunProgressEvent| {
        if let Some(cb) = progress_cb.as_deref_mut() {
            cb(event);
        }
    };
    emit(RunProgressEvent::stage(RunStage::Compiling, duration_s, 0.0, None));

    let mut sim = Simulation::new(config)?;
    let dt = sim.config().dt;
    let ticks = sim.config().ticks_for(duration_s);
    let report_every = ((1.0 / dt).round() as u64).max(1);

    let mut metrics = MetricsAccumulator::new(dt);
    let mut samples = Vec::with_capacity(ticks as usize);
    for tick in 1..=ticks {
        let sample = sim.step();
        metrics.record(&sample, sim.state().inflow_at_pump);
        samples.push(sample);
        if tick % report_every == 0 {
            emit(RunProgressEvent {
                stage: RunStage::Running,
                sim_time_s: sample.t,
                t_end_s: duration_s,
                fraction_complete: tick as f64 / ticks as f64,
                tick,
                elapsed_wall_s: started.elapsed().as_secs_f64(),
                message: None,
            });
        }
    }

    let wall_time_s = started.elapsed().as_secs_f64();
    emit(RunProgressEvent::stage(
        RunStage::Completed,
        duration_s,
        wall_time_s,
        None,
    ));

    let config = sim.config();
    let report = RunReport {
        paradigm_id: config.paradigm.id.clone(),
        paradigm_name: config.paradigm.name.clone(),
        algorithm: config.paradigm.algorithm,
        duration_s,
        ticks,
        seed: config.seed,
        metrics: metrics.finish(),
        final_snapshot: sim.snapshot(),
        samples,
        wall_time_s,
    };
    info!(
        paradigm = %report.paradigm_id,
        ticks,
        iae = report.metrics.iae,
        max_abs_error = report.metrics.max_abs_error,
        wall_time_s,
        "headless run finished"
    );
    Ok(report)
}
