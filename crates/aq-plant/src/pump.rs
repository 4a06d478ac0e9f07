//! Pump capacity.

use crate::fault::FaultSet;

/// Nominal maximum pump output (m³/s).
pub const MAX_PUMP_FLOW: f64 = 250.0;

/// Fraction of nominal capacity left after the efficiency fault, in `[0, 1]`.
pub fn pump_capacity_factor(faults: &FaultSet) -> f64 {
    if !faults.pump_efficiency.active {
        return 1.0;
    }
    (1.0 - faults.pump_efficiency.value / 100.0).clamp(0.0, 1.0)
}

/// Maximum achievable pump output under the current faults.
pub fn max_pump_flow(faults: &FaultSet) -> f64 {
    MAX_PUMP_FLOW * pump_capacity_factor(faults)
}
