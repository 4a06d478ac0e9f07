// aq-core/src/units.rs

use uom::si::f64::Area as UomArea;

// Public canonical unit types (SI, f64)
pub type Area = UomArea;

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

/// Raw SI value, for the plain-`f64` simulation core.
#[inline]
pub fn area_m2(a: Area) -> f64 {
    use uom::si::area::square_meter;
    a.get::<square_meter>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uom::si::area::square_centimeter;

    #[test]
    fn raw_value_round_trips() {
        assert_eq!(area_m2(m2(150.0)), 150.0);
    }

    #[test]
    fn other_units_convert_to_si() {
        let a = Area::new::<square_centimeter>(10_000.0);
        assert!((area_m2(a) - 1.0).abs() < 1e-12);
    }
}
