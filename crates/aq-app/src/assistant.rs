//! Context hand-off to an external diagnostic assistant.
//!
//! The simulation never waits on the assistant. A context is captured on
//! demand, the assistant runs on its own thread, and its text flows back
//! over a channel. Failures are logged and otherwise ignored.

use std::fmt::Write as _;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use aq_controls::DesignParadigm;
use aq_plant::{FaultKind, FaultSet};
use aq_sim::{PlanStep, Simulation, StateSnapshot, TelemetrySample};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

/// Point-in-time picture of the plant for the assistant.
#[derive(Debug, Clone, Serialize)]
pub struct AssistantContext {
    pub captured_at: DateTime<Utc>,
    pub paradigm: DesignParadigm,
    pub snapshot: StateSnapshot,
    pub faults: FaultSet,
    pub pending_plans: Vec<PlanStep>,
    pub recent: Vec<TelemetrySample>,
}

impl AssistantContext {
    /// Capture from a live simulation with the last `recent` samples.
    pub fn capture(sim: &Simulation, recent: usize) -> Self {
        let config = sim.config();
        Self {
            captured_at: Utc::now(),
            paradigm: config.paradigm.clone(),
            snapshot: sim.snapshot(),
            faults: config.faults,
            pending_plans: config.plans.pending().cloned().collect(),
            recent: sim.history().recent(recent),
        }
    }

    /// Plain-text briefing suitable as a language-model prompt.
    pub fn to_prompt(&self) -> String {
        let s = &self.snapshot;
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Water network status at t = {:.1} s (captured {}).",
            s.time,
            self.captured_at.to_rfc3339()
        );
        let _ = writeln!(
            out,
            "Design: {} ({} control, tank area {} m2).",
            self.paradigm.name, self.paradigm.algorithm, self.paradigm.tank_area_m2
        );
        let _ = writeln!(
            out,
            "Level: true {:.2} m, sensed {:.2} m, target {:.2} m (error {:+.2} m).",
            s.true_level,
            s.sensed_level,
            s.target_level,
            s.tracking_error()
        );
        let _ = writeln!(
            out,
            "Flows: pump {:.1}, tank inlet {:.1}, demand {:.1}, leak {:.2} m3/s. Consumer valve {}.",
            s.pump_outflow,
            s.tank_inflow,
            s.demand_outflow,
            s.leak_flow,
            if s.valve_open { "open" } else { "closed" }
        );
        if let Some(mismatch) = s.model_mismatch {
            let _ = writeln!(out, "Predictor model mismatch: {mismatch:+.2} m.");
        }

        let active: Vec<String> = FaultKind::ALL
            .iter()
            .filter_map(|&kind| {
                let fault = self.faults.get(kind);
                fault
                    .active
                    .then(|| format!("{kind} = {}", fault.value))
            })
            .collect();
        if active.is_empty() {
            let _ = writeln!(out, "Faults: none.");
        } else {
            let _ = writeln!(out, "Faults: {}.", active.join(", "));
        }

        for plan in &self.pending_plans {
            let _ = writeln!(
                out,
                "Scheduled at t = {:.1} s: {}.",
                plan.trigger_time,
                plan.action.describe()
            );
        }

        if let (Some(first), Some(last)) = (self.recent.first(), self.recent.last()) {
            let _ = writeln!(
                out,
                "Trend over {:.1} s: level {:.2} -> {:.2} m.",
                last.t - first.t,
                first.level,
                last.level
            );
        }
        out
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("assistant unavailable: {0}")]
    Unavailable(String),
    #[error("assistant failed: {0}")]
    Failed(String),
}

/// One-way consumer of a context. Emits narrative text in chunks; nothing
/// it returns is fed back into the simulation.
pub trait Assistant: Send + 'static {
    fn narrate(
        &mut self,
        context: &AssistantContext,
        emit: &mut dyn FnMut(String),
    ) -> Result<(), AssistantError>;
}

/// Local narrator that reads the context back as short status lines.
#[derive(Debug, Default, Clone)]
pub struct BriefingAssistant {
    /// Tracking error (m) beyond which the briefing raises a concern.
    pub error_threshold: f64,
}

impl BriefingAssistant {
    pub fn new(error_threshold: f64) -> Self {
        Self { error_threshold }
    }
}

impl Assistant for BriefingAssistant {
    fn narrate(
        &mut self,
        context: &AssistantContext,
        emit: &mut dyn FnMut(String),
    ) -> Result<(), AssistantError> {
        let s = &context.snapshot;
        emit(format!(
            "{} is running {} control.",
            context.paradigm.name, context.paradigm.algorithm
        ));
        let error = s.tracking_error();
        if error.abs() > self.error_threshold {
            let direction = if error > 0.0 { "below" } else { "above" };
            emit(format!(
                "Level is {:.2} m {direction} target.",
                error.abs()
            ));
        } else {
            emit("Level is tracking the target.".to_string());
        }
        if s.faults.leakage {
            emit(format!("Tank is leaking {:.2} m3/s.", s.leak_flow));
        }
        if s.faults.pump_efficiency {
            emit("Pump capacity is degraded.".to_string());
        }
        if s.faults.sensor_drift {
            emit(format!(
                "Sensor reads {:+.2} m off the true level.",
                s.sensed_level - s.true_level
            ));
        }
        if !s.valve_open {
            emit("Consumer valve is closed.".to_string());
        }
        Ok(())
    }
}

/// Run `assistant` on its own thread. Chunks arrive on the returned
/// receiver; the channel closes when narration ends or fails.
pub fn narrate_detached<A: Assistant>(
    mut assistant: A,
    context: AssistantContext,
) -> (Receiver<String>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        let mut emit = |chunk: String| {
            let _ = tx.send(chunk);
        };
        match assistant.narrate(&context, &mut emit) {
            Ok(()) => debug!(t = context.snapshot.time, "assistant narration finished"),
            Err(e) => warn!(error = %e, "assistant narration failed"),
        }
    });
    (rx, handle)
}
