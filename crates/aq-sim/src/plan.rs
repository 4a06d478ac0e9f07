//! Time-triggered configuration changes.
//!
//! Plans are kept sorted by trigger time; plans with equal trigger times
//! keep their insertion order. Each plan fires once: it moves from
//! `Pending` to `Completed` on the first tick whose time reaches its
//! trigger, and its action is applied within that same tick.

use crate::error::{SimError, SimResult};
use aq_core::{PlanId, ensure_finite};
use aq_signals::DisturbanceConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Slack on the due test, absorbing `tick·dt` rounding.
pub const TIME_EPSILON: f64 = 1e-9;

/// New setpoint: a fixed level or a whole waveform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SetpointChange {
    Level(f64),
    Pattern(DisturbanceConfig),
}

/// What a plan does when it fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "snake_case")]
pub enum PlanAction {
    /// Replace the demand waveform.
    ChangeDisturbance(DisturbanceConfig),
    /// Replace the setpoint, as a constant level or a waveform.
    ChangeSetpoint(SetpointChange),
}

impl PlanAction {
    pub fn validate(&self) -> SimResult<()> {
        match self {
            PlanAction::ChangeDisturbance(cfg)
            | PlanAction::ChangeSetpoint(SetpointChange::Pattern(cfg)) => cfg.validate()?,
            PlanAction::ChangeSetpoint(SetpointChange::Level(level)) => {
                ensure_finite(*level, "setpoint level must be finite")?;
            }
        }
        Ok(())
    }

    pub fn describe(&self) -> String {
        match self {
            PlanAction::ChangeDisturbance(cfg) => format!(
                "demand -> {} (base {}, amplitude {})",
                cfg.kind, cfg.base, cfg.amplitude
            ),
            PlanAction::ChangeSetpoint(SetpointChange::Level(level)) => {
                format!("setpoint -> {level}")
            }
            PlanAction::ChangeSetpoint(SetpointChange::Pattern(cfg)) => format!(
                "setpoint -> {} (base {}, amplitude {})",
                cfg.kind, cfg.base, cfg.amplitude
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    #[default]
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    #[serde(default)]
    pub id: PlanId,
    /// Simulated time at which the plan fires (s).
    pub trigger_time: f64,
    #[serde(flatten)]
    pub action: PlanAction,
    #[serde(default)]
    pub status: PlanStatus,
}

impl PlanStep {
    pub fn new(trigger_time: f64, action: PlanAction) -> Self {
        Self {
            id: PlanId::new(),
            trigger_time,
            action,
            status: PlanStatus::Pending,
        }
    }

    pub fn with_id(mut self, id: PlanId) -> Self {
        self.id = id;
        self
    }

    pub fn is_pending(&self) -> bool {
        self.status == PlanStatus::Pending
    }

    pub fn is_due(&self, time: f64) -> bool {
        self.is_pending() && self.trigger_time <= time + TIME_EPSILON
    }

    pub fn validate_trigger(&self) -> SimResult<()> {
        let t = ensure_finite(self.trigger_time, "plan trigger time must be finite")?;
        if t < 0.0 {
            return Err(SimError::InvalidArg {
                what: "plan trigger time must be non-negative",
            });
        }
        Ok(())
    }

    pub fn validate(&self) -> SimResult<()> {
        self.validate_trigger()?;
        self.action.validate()
    }
}

/// Ordered plan queue.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<PlanStep>", into = "Vec<PlanStep>")]
pub struct PlanQueue {
    steps: Vec<PlanStep>,
}

impl From<Vec<PlanStep>> for PlanQueue {
    fn from(mut steps: Vec<PlanStep>) -> Self {
        // Stable: equal trigger times keep file order.
        steps.sort_by(|a, b| a.trigger_time.total_cmp(&b.trigger_time));
        Self { steps }
    }
}

impl From<PlanQueue> for Vec<PlanStep> {
    fn from(queue: PlanQueue) -> Self {
        queue.steps
    }
}

impl PlanQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert after every plan with a trigger time at or before this one.
    pub fn enqueue(&mut self, step: PlanStep) -> SimResult<PlanId> {
        step.validate()?;
        if self.steps.iter().any(|s| s.id == step.id) {
            return Err(SimError::DuplicatePlan {
                id: step.id.to_string(),
            });
        }
        let id = step.id;
        let at = self
            .steps
            .partition_point(|s| s.trigger_time <= step.trigger_time);
        self.steps.insert(at, step);
        Ok(id)
    }

    /// Mark every due pending plan completed and return them in firing order.
    pub fn fire_due(&mut self, time: f64) -> Vec<PlanStep> {
        let mut fired = Vec::new();
        for step in self.steps.iter_mut() {
            if step.trigger_time > time + TIME_EPSILON {
                break;
            }
            if step.is_due(time) {
                step.status = PlanStatus::Completed;
                fired.push(step.clone());
            }
        }
        fired
    }

    /// Remove a plan that has not fired yet.
    pub fn cancel(&mut self, id: PlanId) -> bool {
        let before = self.steps.len();
        self.steps.retain(|s| !(s.id == id && s.is_pending()));
        self.steps.len() != before
    }

    pub fn get(&self, id: PlanId) -> Option<&PlanStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    pub fn pending(&self) -> impl Iterator<Item = &PlanStep> {
        self.steps.iter().filter(|s| s.is_pending())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// Put every plan back to `Pending` so the schedule replays from t = 0.
    pub fn rearm(&mut self) {
        for step in &mut self.steps {
            step.status = PlanStatus::Pending;
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        let mut ids = HashSet::new();
        for step in &self.steps {
            if !ids.insert(step.id) {
                return Err(SimError::DuplicatePlan {
                    id: step.id.to_string(),
                });
            }
            step.validate()?;
        }
        Ok(())
    }
}
