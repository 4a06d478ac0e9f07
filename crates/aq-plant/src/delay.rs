//! Transport delay of the long supply pipe.
//!
//! The pipe is a pure delay line: every tick the pump output is pushed at
//! the tail, and the tank receives the value pushed `delay_samples` ticks
//! earlier. Offset 0 means no delay (the value just pushed).
//!
//! Capacity is fixed when the line is built. Changing the delay at runtime
//! moves the lookup offset only; history that was never recorded (start of
//! a run, or an offset beyond the physical depth) reads as zero inflow.

use crate::error::{PlantError, PlantResult};
use aq_core::ensure_finite;
use std::collections::VecDeque;

#[derive(Clone, Debug, PartialEq)]
pub struct DelayLine {
    samples: VecDeque<f64>,
    capacity: usize,
    delay_samples: usize,
}

impl DelayLine {
    /// Line with room for exactly `delay_samples` of history behind the tail.
    pub fn new(delay_samples: usize) -> Self {
        let capacity = delay_samples + 1;
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            delay_samples,
        }
    }

    /// Build from a delay in seconds: `round(delay_s / dt)` samples.
    pub fn from_seconds(delay_s: f64, dt: f64) -> PlantResult<Self> {
        Ok(Self::new(samples_for(delay_s, dt)?))
    }

    pub fn delay_samples(&self) -> usize {
        self.delay_samples
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Change the lookup offset. The physical depth stays as built.
    pub fn set_delay_samples(&mut self, delay_samples: usize) {
        self.delay_samples = delay_samples;
    }

    /// Append the latest pump output, dropping the oldest once full.
    pub fn push(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Value `offset` positions behind the tail, if recorded.
    pub fn peek_back(&self, offset: usize) -> Option<f64> {
        let len = self.samples.len();
        if offset >= len {
            return None;
        }
        self.samples.get(len - 1 - offset).copied()
    }

    /// Current pipe outflow into the tank.
    pub fn delayed(&self) -> f64 {
        self.peek_back(self.delay_samples).unwrap_or(0.0)
    }

    /// Inflow that will reach the tank `k` ticks from now (k = 0 is the
    /// coming tick, before its push), if already travelling in the pipe.
    ///
    /// Returns `None` once `k` reaches the delay: that water has not been
    /// pumped yet.
    pub fn in_flight(&self, k: usize) -> Option<f64> {
        if k >= self.delay_samples {
            return None;
        }
        Some(self.peek_back(self.delay_samples - 1 - k).unwrap_or(0.0))
    }

    /// Forget all history.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Number of samples for a delay in seconds at the given tick.
pub fn samples_for(delay_s: f64, dt: f64) -> PlantResult<usize> {
    let delay_s = ensure_finite(delay_s, "pipe delay must be finite")?;
    let dt = ensure_finite(dt, "tick duration must be finite")?;
    if delay_s < 0.0 {
        return Err(PlantError::InvalidArg {
            what: "pipe delay must be non-negative",
        });
    }
    if dt <= 0.0 {
        return Err(PlantError::InvalidArg {
            what: "tick duration must be positive",
        });
    }
    Ok((delay_s / dt).round() as usize)
}
