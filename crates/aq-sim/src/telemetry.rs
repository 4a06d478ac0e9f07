//! Telemetry samples, bounded history and state snapshots.

use aq_controls::Algorithm;
use aq_plant::FaultFlags;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One telemetry record per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Simulated time (s).
    pub t: f64,
    /// True tank level after the tick (m).
    pub level: f64,
    /// Setpoint (m).
    pub target: f64,
    /// Pipe inflow reaching the tank (m³/s).
    pub flow_in: f64,
    /// Demand outflow (m³/s).
    pub flow_out: f64,
}

/// Fixed retention window; the oldest samples are dropped first.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryHistory {
    samples: VecDeque<TelemetrySample>,
    retention: usize,
}

impl TelemetryHistory {
    pub fn new(retention: usize) -> Self {
        let retention = retention.max(1);
        Self {
            samples: VecDeque::with_capacity(retention),
            retention,
        }
    }

    pub fn push(&mut self, sample: TelemetrySample) {
        if self.samples.len() == self.retention {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn latest(&self) -> Option<&TelemetrySample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TelemetrySample> {
        self.samples.iter()
    }

    /// The most recent `n` samples, oldest first.
    pub fn recent(&self, n: usize) -> Vec<TelemetrySample> {
        let skip = self.samples.len().saturating_sub(n);
        self.samples.iter().skip(skip).copied().collect()
    }

    pub fn to_vec(&self) -> Vec<TelemetrySample> {
        self.samples.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Read-only view of the plant after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub tick: u64,
    pub time: f64,
    pub true_level: f64,
    pub sensed_level: f64,
    pub target_level: f64,
    pub pump_outflow: f64,
    pub tank_inflow: f64,
    pub demand_outflow: f64,
    pub leak_flow: f64,
    pub valve_open: bool,
    pub algorithm: Algorithm,
    pub faults: FaultFlags,
    /// Sensed level minus the Smith internal model; `None` for other
    /// algorithms. A large sustained value means model and plant diverged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_mismatch: Option<f64>,
}

impl StateSnapshot {
    /// Setpoint minus true level.
    pub fn tracking_error(&self) -> f64 {
        self.target_level - self.true_level
    }
}
