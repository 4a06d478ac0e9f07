use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

/// Smallest positive value a physical divisor may take (tank area, period).
pub const EPSILON: Real = 1e-9;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Floor a divisor at `eps`. NaN also maps to `eps`.
#[inline]
pub fn floor_positive(v: Real, eps: Real) -> Real {
    if v > eps { v } else { eps }
}

/// Clamp a physical quantity that cannot go negative.
#[inline]
pub fn clamp_non_negative(v: Real) -> Real {
    if v > 0.0 { v } else { 0.0 }
}

/// Require a strictly positive, finite value.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v <= 0.0 {
        return Err(CoreError::InvalidArg { what });
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn floor_positive_handles_zero_negative_and_nan() {
        assert_eq!(floor_positive(0.0, 1e-6), 1e-6);
        assert_eq!(floor_positive(-3.0, 1e-6), 1e-6);
        assert_eq!(floor_positive(Real::NAN, 1e-6), 1e-6);
        assert_eq!(floor_positive(2.5, 1e-6), 2.5);
    }

    #[test]
    fn clamp_non_negative_basic() {
        assert_eq!(clamp_non_negative(-0.1), 0.0);
        assert_eq!(clamp_non_negative(4.0), 4.0);
    }

    #[test]
    fn ensure_positive_rejects_zero() {
        assert!(ensure_positive(0.0, "area").is_err());
        assert!(ensure_positive(-1.0, "area").is_err());
        assert!(ensure_positive(Real::INFINITY, "area").is_err());
        assert_eq!(ensure_positive(3.0, "area").unwrap(), 3.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn floored_divisor_is_positive(v in prop::num::f64::ANY, eps in 1e-12f64..1.0) {
            let floored = floor_positive(v, eps);
            prop_assert!(floored >= eps);
            prop_assert!(!floored.is_nan());
        }

        #[test]
        fn clamp_never_negative(v in prop::num::f64::ANY) {
            prop_assert!(clamp_non_negative(v) >= 0.0);
        }
    }
}
