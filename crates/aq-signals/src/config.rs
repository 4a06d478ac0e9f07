//! Disturbance waveform configuration.

use crate::error::{SignalError, SignalResult};
use aq_core::{ensure_finite, floor_positive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Frequencies below this are floored before computing a period.
pub const MIN_FREQUENCY_HZ: f64 = 1e-6;

/// Waveform family of a disturbance signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisturbanceKind {
    Constant,
    Step,
    Ramp,
    Sine,
    Square,
    Triangle,
    Sawtooth,
    Pulse,
    Noise,
    RandomWalk,
    Burst,
}

impl DisturbanceKind {
    pub const ALL: [DisturbanceKind; 11] = [
        DisturbanceKind::Constant,
        DisturbanceKind::Step,
        DisturbanceKind::Ramp,
        DisturbanceKind::Sine,
        DisturbanceKind::Square,
        DisturbanceKind::Triangle,
        DisturbanceKind::Sawtooth,
        DisturbanceKind::Pulse,
        DisturbanceKind::Noise,
        DisturbanceKind::RandomWalk,
        DisturbanceKind::Burst,
    ];

    /// Stable lowercase name, as written in scenario files.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Step => "step",
            Self::Ramp => "ramp",
            Self::Sine => "sine",
            Self::Square => "square",
            Self::Triangle => "triangle",
            Self::Sawtooth => "sawtooth",
            Self::Pulse => "pulse",
            Self::Noise => "noise",
            Self::RandomWalk => "random_walk",
            Self::Burst => "burst",
        }
    }

    /// Whether evaluation draws from the random source.
    pub fn is_stochastic(&self) -> bool {
        matches!(self, Self::Noise | Self::RandomWalk)
    }
}

impl fmt::Display for DisturbanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DisturbanceKind {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.label() == normalized)
            .ok_or_else(|| SignalError::UnknownKind {
                name: s.to_string(),
            })
    }
}

/// A complete waveform description.
///
/// Configurations are replaced wholesale when a pattern changes; the
/// simulation never edits one field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisturbanceConfig {
    #[serde(rename = "type")]
    pub kind: DisturbanceKind,
    pub base: f64,
    #[serde(default)]
    pub amplitude: f64,
    /// Hz. Floored at [`MIN_FREQUENCY_HZ`] wherever it is used.
    #[serde(default = "default_frequency")]
    pub frequency: f64,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_frequency() -> f64 {
    0.1
}

fn default_active() -> bool {
    true
}

impl DisturbanceConfig {
    pub fn new(kind: DisturbanceKind, base: f64, amplitude: f64, frequency: f64) -> Self {
        Self {
            kind,
            base,
            amplitude,
            frequency,
            active: true,
        }
    }

    /// Flat signal at `base`.
    pub fn constant(base: f64) -> Self {
        Self::new(DisturbanceKind::Constant, base, 0.0, default_frequency())
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Frequency after flooring.
    pub fn effective_frequency(&self) -> f64 {
        floor_positive(self.frequency, MIN_FREQUENCY_HZ)
    }

    /// Waveform period in seconds.
    pub fn period(&self) -> f64 {
        1.0 / self.effective_frequency()
    }

    /// Reject non-finite fields.
    pub fn validate(&self) -> SignalResult<()> {
        ensure_finite(self.base, "disturbance base must be finite")?;
        ensure_finite(self.amplitude, "disturbance amplitude must be finite")?;
        ensure_finite(self.frequency, "disturbance frequency must be finite")?;
        Ok(())
    }
}

impl Default for DisturbanceConfig {
    fn default() -> Self {
        Self::constant(0.0)
    }
}
