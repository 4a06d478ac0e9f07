//! Storage tank level dynamics.
//!
//! First-order tank, forward Euler:
//!
//! ```text
//! net   = inflow − demand − leak
//! level = max(0, level + net·dt / area)
//! ```

use crate::error::PlantResult;
use crate::fault::{FaultSet, leak_flow};
use aq_core::{EPSILON, clamp_non_negative, ensure_positive, floor_positive};

/// Advance the level by one tick. The area is floored at [`EPSILON`].
pub fn integrate_level(level: f64, net_flow: f64, dt: f64, area_m2: f64) -> f64 {
    clamp_non_negative(level + net_flow * dt / floor_positive(area_m2, EPSILON))
}

/// Flow breakdown and resulting level for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TankStep {
    pub level: f64,
    pub inflow: f64,
    pub demand: f64,
    pub leak: f64,
    pub net_flow: f64,
}

/// Storage tank with a fixed cross-section.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tank {
    area_m2: f64,
}

impl Tank {
    pub fn new(area_m2: f64) -> PlantResult<Self> {
        let area_m2 = ensure_positive(area_m2, "tank area must be positive")?;
        Ok(Self { area_m2 })
    }

    pub fn area_m2(&self) -> f64 {
        self.area_m2
    }

    /// Integrate one tick. Leakage is evaluated at the pre-step level.
    pub fn step(
        &self,
        level: f64,
        inflow: f64,
        demand: f64,
        faults: &FaultSet,
        dt: f64,
    ) -> TankStep {
        let leak = leak_flow(faults, level);
        let net_flow = inflow - demand - leak;
        TankStep {
            level: integrate_level(level, net_flow, dt, self.area_m2),
            inflow,
            demand,
            leak,
            net_flow,
        }
    }
}
