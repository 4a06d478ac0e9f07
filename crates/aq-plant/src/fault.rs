//! Injected physical faults.
//!
//! Three independent channels, each an `active` flag plus an intensity:
//! - **Leakage**: pressure-driven outflow `(value/10)·sqrt(level)` (m³/s)
//! - **Pump efficiency**: percentage of pump capacity lost
//! - **Sensor drift**: constant offset added to the measured level (m)

use crate::error::{PlantError, PlantResult};
use aq_core::{clamp_non_negative, ensure_finite};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fault channel selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    Leakage,
    PumpEfficiency,
    SensorDrift,
}

impl FaultKind {
    pub const ALL: [FaultKind; 3] = [
        FaultKind::Leakage,
        FaultKind::PumpEfficiency,
        FaultKind::SensorDrift,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Leakage => "leakage",
            Self::PumpEfficiency => "pump_efficiency",
            Self::SensorDrift => "sensor_drift",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FaultKind {
    type Err = PlantError;

    /// Accepts labels plus the short forms `leak`, `pump` and `drift`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "leakage" | "leak" => Ok(Self::Leakage),
            "pump_efficiency" | "pump" => Ok(Self::PumpEfficiency),
            "sensor_drift" | "drift" => Ok(Self::SensorDrift),
            _ => Err(PlantError::UnknownFault {
                name: s.to_string(),
            }),
        }
    }
}

/// One fault channel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FaultConfig {
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub value: f64,
}

impl FaultConfig {
    pub fn active(value: f64) -> Self {
        Self {
            active: true,
            value,
        }
    }

    /// Intensity if active, zero otherwise.
    pub fn intensity(&self) -> f64 {
        if self.active { self.value } else { 0.0 }
    }
}

/// All fault channels of the plant.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FaultSet {
    #[serde(default)]
    pub leakage: FaultConfig,
    #[serde(default)]
    pub pump_efficiency: FaultConfig,
    #[serde(default)]
    pub sensor_drift: FaultConfig,
}

impl FaultSet {
    pub fn get(&self, kind: FaultKind) -> FaultConfig {
        match kind {
            FaultKind::Leakage => self.leakage,
            FaultKind::PumpEfficiency => self.pump_efficiency,
            FaultKind::SensorDrift => self.sensor_drift,
        }
    }

    fn slot(&mut self, kind: FaultKind) -> &mut FaultConfig {
        match kind {
            FaultKind::Leakage => &mut self.leakage,
            FaultKind::PumpEfficiency => &mut self.pump_efficiency,
            FaultKind::SensorDrift => &mut self.sensor_drift,
        }
    }

    /// Replace one channel after validating its intensity.
    pub fn set(&mut self, kind: FaultKind, config: FaultConfig) -> PlantResult<()> {
        validate_channel(kind, config)?;
        *self.slot(kind) = config;
        Ok(())
    }

    /// Deactivate one channel, keeping its last intensity.
    pub fn clear(&mut self, kind: FaultKind) {
        self.slot(kind).active = false;
    }

    pub fn clear_all(&mut self) {
        for kind in FaultKind::ALL {
            self.clear(kind);
        }
    }

    pub fn validate(&self) -> PlantResult<()> {
        for kind in FaultKind::ALL {
            self.validate_kind(kind)?;
        }
        Ok(())
    }

    /// Check one channel's intensity against its physical range.
    pub fn validate_kind(&self, kind: FaultKind) -> PlantResult<()> {
        validate_channel(kind, self.get(kind))
    }

    pub fn flags(&self) -> FaultFlags {
        FaultFlags {
            leakage: self.leakage.active,
            pump_efficiency: self.pump_efficiency.active,
            sensor_drift: self.sensor_drift.active,
        }
    }
}

fn validate_channel(kind: FaultKind, config: FaultConfig) -> PlantResult<()> {
    ensure_finite(config.value, "fault intensity must be finite")?;
    match kind {
        FaultKind::Leakage if config.value < 0.0 => Err(PlantError::InvalidArg {
            what: "leakage intensity must be non-negative",
        }),
        FaultKind::PumpEfficiency if !(0.0..=100.0).contains(&config.value) => {
            Err(PlantError::InvalidArg {
                what: "pump efficiency loss must be within [0, 100] percent",
            })
        }
        _ => Ok(()),
    }
}

/// Which fault channels are active, for telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FaultFlags {
    pub leakage: bool,
    pub pump_efficiency: bool,
    pub sensor_drift: bool,
}

impl FaultFlags {
    pub fn any(&self) -> bool {
        self.leakage || self.pump_efficiency || self.sensor_drift
    }
}

/// Leak outflow for the given true tank level.
pub fn leak_flow(faults: &FaultSet, level: f64) -> f64 {
    if !faults.leakage.active {
        return 0.0;
    }
    (faults.leakage.value / 10.0) * clamp_non_negative(level).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_labels_and_short_forms() {
        for kind in FaultKind::ALL {
            assert_eq!(kind.label().parse::<FaultKind>().unwrap(), kind);
        }
        assert_eq!("Pump".parse::<FaultKind>().unwrap(), FaultKind::PumpEfficiency);
        assert_eq!("sensor-drift".parse::<FaultKind>().unwrap(), FaultKind::SensorDrift);
        assert!("corrosion".parse::<FaultKind>().is_err());
    }

    #[test]
    fn leak_flow_scenario() {
        let mut faults = FaultSet::default();
        faults
            .set(FaultKind::Leakage, FaultConfig::active(20.0))
            .unwrap();
        assert_eq!(leak_flow(&faults, 100.0), 20.0);
    }

    #[test]
    fn leak_flow_inactive_or_empty_tank() {
        let mut faults = FaultSet::default();
        assert_eq!(leak_flow(&faults, 100.0), 0.0);
        faults
            .set(FaultKind::Leakage, FaultConfig::active(20.0))
            .unwrap();
        assert_eq!(leak_flow(&faults, 0.0), 0.0);
        assert_eq!(leak_flow(&faults, -4.0), 0.0);
    }

    #[test]
    fn leak_is_pressure_driven() {
        let faults = FaultSet {
            leakage: FaultConfig::active(10.0),
            ..FaultSet::default()
        };
        assert!(leak_flow(&faults, 64.0) > leak_flow(&faults, 16.0));
        assert_eq!(leak_flow(&faults, 64.0), 8.0);
    }

    #[test]
    fn clear_keeps_value() {
        let mut faults = FaultSet::default();
        faults
            .set(FaultKind::SensorDrift, FaultConfig::active(1.5))
            .unwrap();
        assert!(faults.flags().sensor_drift);
        faults.clear(FaultKind::SensorDrift);
        assert!(!faults.flags().any());
        assert_eq!(faults.sensor_drift.value, 1.5);
        assert_eq!(faults.sensor_drift.intensity(), 0.0);
    }

    #[test]
    fn invalid_intensities_rejected() {
        let mut faults = FaultSet::default();
        assert!(
            faults
                .set(FaultKind::PumpEfficiency, FaultConfig::active(120.0))
                .is_err()
        );
        assert!(
            faults
                .set(FaultKind::Leakage, FaultConfig::active(-1.0))
                .is_err()
        );
        assert!(
            faults
                .set(FaultKind::SensorDrift, FaultConfig::active(f64::NAN))
                .is_err()
        );
        assert!(
            faults
                .set(FaultKind::SensorDrift, FaultConfig::active(-2.0))
                .is_ok()
        );
    }
}
