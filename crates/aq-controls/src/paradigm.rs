//! Design paradigms: a tank size bundled with a control algorithm.

use crate::error::{ControlError, ControlResult};
use aq_core::units::{Area, area_m2};
use aq_core::ensure_positive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Control algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Pid,
    Smith,
    Mpc,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Pid, Algorithm::Smith, Algorithm::Mpc];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pid => "pid",
            Self::Smith => "smith",
            Self::Mpc => "mpc",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Algorithm {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pid" => Ok(Self::Pid),
            "smith" | "smith_predictor" => Ok(Self::Smith),
            "mpc" => Ok(Self::Mpc),
            _ => Err(ControlError::UnknownAlgorithm {
                name: s.to_string(),
            }),
        }
    }
}

/// Cost and resilience figures. Display only; the simulation ignores them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParadigmMetadata {
    #[serde(default)]
    pub description: String,
    /// Relative civil-works cost, 0–10.
    #[serde(default)]
    pub infrastructure_cost: f64,
    /// Relative computing/instrumentation cost, 0–10.
    #[serde(default)]
    pub compute_cost: f64,
    /// Relative tolerance to faults and demand shocks, 0–10.
    #[serde(default)]
    pub resilience: f64,
}

/// A deployable design. Immutable once built; switching designs replaces
/// the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignParadigm {
    pub id: String,
    pub name: String,
    pub tank_area_m2: f64,
    pub algorithm: Algorithm,
    #[serde(default)]
    pub metadata: ParadigmMetadata,
}

impl DesignParadigm {
    /// Build a paradigm, rejecting non-positive or non-finite tank areas.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        tank_area: Area,
        algorithm: Algorithm,
    ) -> ControlResult<Self> {
        let tank_area_m2 = ensure_positive(area_m2(tank_area), "tank area must be positive")?;
        Ok(Self {
            id: id.into(),
            name: name.into(),
            tank_area_m2,
            algorithm,
            metadata: ParadigmMetadata::default(),
        })
    }

    pub fn with_metadata(mut self, metadata: ParadigmMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Check a paradigm that arrived through deserialization.
    pub fn validate(&self) -> ControlResult<()> {
        ensure_positive(self.tank_area_m2, "tank area must be positive")?;
        Ok(())
    }

    /// The three reference designs along the infrastructure/compute curve.
    pub fn presets() -> Vec<DesignParadigm> {
        vec![
            DesignParadigm {
                id: "reservoir".to_string(),
                name: "Large Reservoir + PID".to_string(),
                tank_area_m2: 400.0,
                algorithm: Algorithm::Pid,
                metadata: ParadigmMetadata {
                    description: "Oversized storage absorbs the pipe delay; simple feedback."
                        .to_string(),
                    infrastructure_cost: 9.0,
                    compute_cost: 1.0,
                    resilience: 8.0,
                },
            },
            DesignParadigm {
                id: "predictor".to_string(),
                name: "Medium Tank + Smith Predictor".to_string(),
                tank_area_m2: 150.0,
                algorithm: Algorithm::Smith,
                metadata: ParadigmMetadata {
                    description: "Internal plant model compensates the known transport delay."
                        .to_string(),
                    infrastructure_cost: 5.0,
                    compute_cost: 4.0,
                    resilience: 6.0,
                },
            },
            DesignParadigm {
                id: "predictive".to_string(),
                name: "Compact Tank + MPC".to_string(),
                tank_area_m2: 60.0,
                algorithm: Algorithm::Mpc,
                metadata: ParadigmMetadata {
                    description: "Small buffer, demand forecast drives pump scheduling."
                        .to_string(),
                    infrastructure_cost: 2.0,
                    compute_cost: 8.0,
                    resilience: 4.0,
                },
            },
        ]
    }

    /// Look up a preset by id.
    pub fn preset(id: &str) -> ControlResult<DesignParadigm> {
        Self::presets()
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ControlError::UnknownParadigm { id: id.to_string() })
    }
}

impl Default for DesignParadigm {
    fn default() -> Self {
        Self::presets().swap_remove(0)
    }
}
