//! Waveform evaluation.
//!
//! With `f` the floored frequency, `period = 1/f`, `ω = 2πf` and
//! `local_t = t mod period`:
//!
//! ```text
//! constant     base
//! step         base, or base + A once local_t >= period/2
//! ramp         base + A·(local_t/period)
//! sine         base + A·sin(ωt)
//! square       base + A·sign(sin(ωt))
//! triangle     base + A·(2·|2·(local_t/period) − 1| − 1)
//! sawtooth     base + A·(2·(local_t/period) − 1)
//! pulse        base + A while local_t < 0.1·period, else base
//! noise        base + A·U(−0.5, 0.5)
//! random_walk  base + A·sin(0.1t) + U(−2.5, 2.5)
//! burst        base + 2A while (t mod 20) > 18, else base
//! ```

use crate::config::{DisturbanceConfig, DisturbanceKind};
use aq_core::rng::uniform;
use rand::Rng;
use std::f64::consts::PI;

const PULSE_DUTY: f64 = 0.1;
const WALK_DRIFT_RATE: f64 = 0.1;
const WALK_JITTER: f64 = 2.5;
const BURST_CYCLE_S: f64 = 20.0;
const BURST_START_S: f64 = 18.0;

/// Sample the signal at time `t` (seconds).
///
/// Inactive configurations hold at `base`.
pub fn evaluate<R: Rng + ?Sized>(t: f64, config: &DisturbanceConfig, rng: &mut R) -> f64 {
    if !config.active {
        return config.base;
    }
    let base = config.base;
    let amp = config.amplitude;
    match config.kind {
        DisturbanceKind::Noise => base + amp * uniform(rng, -0.5, 0.5),
        DisturbanceKind::RandomWalk => {
            base + amp * (WALK_DRIFT_RATE * t).sin() + uniform(rng, -WALK_JITTER, WALK_JITTER)
        }
        _ => deterministic(t, config),
    }
}

/// Deterministic forecast of the signal at time `t`.
///
/// Identical to [`evaluate`] for the deterministic kinds; the stochastic
/// kinds lose their zero-mean random term.
pub fn expected(t: f64, config: &DisturbanceConfig) -> f64 {
    if !config.active {
        return config.base;
    }
    match config.kind {
        DisturbanceKind::Noise => config.base,
        DisturbanceKind::RandomWalk => {
            config.base + config.amplitude * (WALK_DRIFT_RATE * t).sin()
        }
        _ => deterministic(t, config),
    }
}

fn deterministic(t: f64, config: &DisturbanceConfig) -> f64 {
    let base = config.base;
    let amp = config.amplitude;
    let period = config.period();
    let omega = 2.0 * PI * config.effective_frequency();
    let local_t = t.rem_euclid(period);
    let phase = local_t / period;

    match config.kind {
        DisturbanceKind::Constant => base,
        DisturbanceKind::Step => {
            if local_t < period / 2.0 {
                base
            } else {
                base + amp
            }
        }
        DisturbanceKind::Ramp => base + amp * phase,
        DisturbanceKind::Sine => base + amp * (omega * t).sin(),
        DisturbanceKind::Square => base + amp * sign((omega * t).sin()),
        DisturbanceKind::Triangle => base + amp * (2.0 * (2.0 * phase - 1.0).abs() - 1.0),
        DisturbanceKind::Sawtooth => base + amp * (2.0 * phase - 1.0),
        DisturbanceKind::Pulse => {
            if local_t < PULSE_DUTY * period {
                base + amp
            } else {
                base
            }
        }
        DisturbanceKind::Burst => {
            if t.rem_euclid(BURST_CYCLE_S) > BURST_START_S {
                base + 2.0 * amp
            } else {
                base
            }
        }
        // Expectations of the stochastic kinds are handled by the callers.
        DisturbanceKind::Noise | DisturbanceKind::RandomWalk => base,
    }
}

/// Sign with `sign(0) = 0`.
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aq_core::SimRng;

    fn cfg(kind: DisturbanceKind, base: f64, amp: f64, freq: f64) -> DisturbanceConfig {
        DisturbanceConfig::new(kind, base, amp, freq)
    }

    #[test]
    fn constant_returns_base_exactly() {
        let mut rng = SimRng::default();
        let c = cfg(DisturbanceKind::Constant, 42.5, 99.0, 3.0);
        for i in 0..200 {
            let t = i as f64 * 0.37;
            assert_eq!(evaluate(t, &c, &mut rng), 42.5);
        }
    }

    #[test]
    fn step_switches_at_half_period() {
        let mut rng = SimRng::default();
        let c = cfg(DisturbanceKind::Step, 50.0, 100.0, 0.1);
        assert_eq!(evaluate(3.0, &c, &mut rng), 50.0);
        assert_eq!(evaluate(7.0, &c, &mut rng), 150.0);
        // Next period starts low again.
        assert_eq!(evaluate(12.0, &c, &mut rng), 50.0);
    }

    #[test]
    fn ramp_sawtooth_triangle_shapes() {
        let mut rng = SimRng::default();
        let ramp = cfg(DisturbanceKind::Ramp, 10.0, 20.0, 0.1);
        assert!((evaluate(5.0, &ramp, &mut rng) - 20.0).abs() < 1e-12);

        let saw = cfg(DisturbanceKind::Sawtooth, 0.0, 1.0, 0.1);
        assert!((evaluate(0.0, &saw, &mut rng) + 1.0).abs() < 1e-12);
        assert!((evaluate(5.0, &saw, &mut rng)).abs() < 1e-12);

        let tri = cfg(DisturbanceKind::Triangle, 0.0, 1.0, 0.1);
        assert!((evaluate(0.0, &tri, &mut rng) - 1.0).abs() < 1e-12);
        assert!((evaluate(5.0, &tri, &mut rng) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn sine_and_square() {
        let mut rng = SimRng::default();
        let sine = cfg(DisturbanceKind::Sine, 5.0, 2.0, 0.25);
        // Quarter period of a 0.25 Hz sine is 1 s.
        assert!((evaluate(1.0, &sine, &mut rng) - 7.0).abs() < 1e-9);

        let square = cfg(DisturbanceKind::Square, 5.0, 2.0, 0.25);
        assert_eq!(evaluate(1.0, &square, &mut rng), 7.0);
        assert_eq!(evaluate(3.0, &square, &mut rng), 3.0);
        assert_eq!(evaluate(0.0, &square, &mut rng), 5.0);
    }

    #[test]
    fn pulse_duty_cycle() {
        let mut rng = SimRng::default();
        let pulse = cfg(DisturbanceKind::Pulse, 1.0, 4.0, 0.1);
        assert_eq!(evaluate(0.5, &pulse, &mut rng), 5.0);
        assert_eq!(evaluate(1.5, &pulse, &mut rng), 1.0);
        assert_eq!(evaluate(10.5, &pulse, &mut rng), 5.0);
    }

    #[test]
    fn burst_window() {
        let mut rng = SimRng::default();
        let burst = cfg(DisturbanceKind::Burst, 50.0, 10.0, 0.1);
        assert_eq!(evaluate(17.0, &burst, &mut rng), 50.0);
        assert_eq!(evaluate(18.5, &burst, &mut rng), 70.0);
        assert_eq!(evaluate(38.5, &burst, &mut rng), 70.0);
        assert_eq!(evaluate(40.0, &burst, &mut rng), 50.0);
    }

    #[test]
    fn noise_is_bounded_and_seeded() {
        let c = cfg(DisturbanceKind::Noise, 10.0, 4.0, 0.1);
        let mut a = SimRng::from_seed_u64(9);
        let mut b = SimRng::from_seed_u64(9);
        for i in 0..500 {
            let t = i as f64 * 0.1;
            let va = evaluate(t, &c, &mut a);
            assert!((8.0..12.0).contains(&va));
            assert_eq!(va, evaluate(t, &c, &mut b));
        }
    }

    #[test]
    fn random_walk_jitter_bounds() {
        let c = cfg(DisturbanceKind::RandomWalk, 0.0, 1.0, 0.1);
        let mut rng = SimRng::from_seed_u64(3);
        for i in 0..500 {
            let t = i as f64 * 0.1;
            let v = evaluate(t, &c, &mut rng);
            let centre = (0.1 * t).sin();
            assert!((v - centre).abs() <= 2.5);
        }
    }

    #[test]
    fn zero_frequency_never_produces_nan() {
        let mut rng = SimRng::default();
        for kind in DisturbanceKind::ALL {
            let c = cfg(kind, 1.0, 1.0, 0.0);
            for t in [0.0, 0.1, 5.0, 1e4] {
                assert!(evaluate(t, &c, &mut rng).is_finite(), "{kind} at {t}");
            }
        }
    }

    #[test]
    fn inactive_holds_base() {
        let mut rng = SimRng::default();
        let c = cfg(DisturbanceKind::Square, 3.0, 10.0, 1.0).with_active(false);
        assert_eq!(evaluate(0.3, &c, &mut rng), 3.0);
        assert_eq!(expected(0.3, &c), 3.0);
    }

    #[test]
    fn expectation_matches_deterministic_kinds() {
        let mut rng = SimRng::default();
        for kind in DisturbanceKind::ALL.iter().filter(|k| !k.is_stochastic()) {
            let c = cfg(*kind, 2.0, 3.0, 0.2);
            for i in 0..50 {
                let t = i as f64 * 0.7;
                assert_eq!(expected(t, &c), evaluate(t, &c, &mut rng));
            }
        }
        let noise = cfg(DisturbanceKind::Noise, 2.0, 3.0, 0.2);
        assert_eq!(expected(4.0, &noise), 2.0);
    }
}
