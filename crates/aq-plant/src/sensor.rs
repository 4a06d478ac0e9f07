//! Level sensor.

use crate::fault::FaultSet;
use aq_core::rng::uniform;
use rand::Rng;

/// Half-width of the per-tick measurement noise (m).
pub const SENSOR_NOISE_AMPLITUDE: f64 = 0.05;

/// Measured level: true level, plus drift when that fault is active, plus
/// zero-mean measurement noise on every reading.
pub fn sense_level<R: Rng + ?Sized>(true_level: f64, faults: &FaultSet, rng: &mut R) -> f64 {
    let noise = uniform(rng, -SENSOR_NOISE_AMPLITUDE, SENSOR_NOISE_AMPLITUDE);
    true_level + faults.sensor_drift.intensity() + noise
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::FaultConfig;
    use aq_core::SimRng;

    #[test]
    fn noise_only_without_drift() {
        let mut rng = SimRng::from_seed_u64(5);
        let faults = FaultSet::default();
        for _ in 0..1000 {
            let v = sense_level(10.0, &faults, &mut rng);
            assert!((v - 10.0).abs() <= SENSOR_NOISE_AMPLITUDE);
        }
    }

    #[test]
    fn drift_offsets_reading() {
        let mut rng = SimRng::from_seed_u64(5);
        let faults = FaultSet {
            sensor_drift: FaultConfig::active(2.0),
            ..FaultSet::default()
        };
        for _ in 0..100 {
            let v = sense_level(10.0, &faults, &mut rng);
            assert!((v - 12.0).abs() <= SENSOR_NOISE_AMPLITUDE);
        }
    }
}
