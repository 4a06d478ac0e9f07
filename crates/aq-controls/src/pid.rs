//! PID law with integral clamping and feedforward bias.

use crate::input::{ControllerInput, ControllerState, FEEDFORWARD_BIAS};
use aq_core::{EPSILON, floor_positive};
use serde::{Deserialize, Serialize};

/// Tank area above which the aggressive proportional gain is used (m²).
pub const LARGE_TANK_AREA_M2: f64 = 100.0;

/// PID gains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PidLaw {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Anti-windup bound on the integral accumulator.
    pub integral_limit: f64,
    pub bias: f64,
}

impl PidLaw {
    /// Gains for a tank of the given area: large buffers tolerate the
    /// aggressive `Kp = 5`, tight ones get `Kp = 2`.
    pub fn for_tank_area(area_m2: f64) -> Self {
        Self {
            kp: if area_m2 > LARGE_TANK_AREA_M2 { 5.0 } else { 2.0 },
            ki: 0.5,
            kd: 0.1,
            integral_limit: 500.0,
            bias: FEEDFORWARD_BIAS,
        }
    }

    /// Raw (unclamped) output and updated memory.
    pub fn update(
        &self,
        state: &ControllerState,
        input: &ControllerInput<'_>,
    ) -> (ControllerState, f64) {
        let error = input.error();

        let integral = (state.integral + error * input.dt)
            .clamp(-self.integral_limit, self.integral_limit);
        let derivative = (error - state.last_error) / floor_positive(input.dt, EPSILON);

        let output = self.kp * error + self.ki * integral + self.kd * derivative + self.bias;

        let new_state = ControllerState {
            integral,
            ..*state
        };
        (new_state, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aq_plant::DelayLine;
    use aq_signals::DisturbanceConfig;

    fn input<'a>(
        target: f64,
        sensed: f64,
        pattern: &'a DisturbanceConfig,
        line: &'a DelayLine,
    ) -> ControllerInput<'a> {
        ControllerInput {
            time: 0.1,
            dt: 0.1,
            target,
            sensed_level: sensed,
            demand: 50.0,
            max_flow: 250.0,
            demand_pattern: pattern,
            valve_open: true,
            pipeline: line,
        }
    }

    #[test]
    fn gain_schedule_by_area() {
        assert_eq!(PidLaw::for_tank_area(200.0).kp, 5.0);
        assert_eq!(PidLaw::for_tank_area(100.0).kp, 2.0);
        assert_eq!(PidLaw::for_tank_area(60.0).kp, 2.0);
    }

    #[test]
    fn proportional_plus_bias() {
        let pattern = DisturbanceConfig::constant(50.0);
        let line = DelayLine::new(0);
        let law = PidLaw::for_tank_area(200.0);
        // Last error equal to current error → zero derivative; integral
        // starts at -error·dt so that it lands on zero.
        let state = ControllerState {
            integral: -1.0,
            last_error: 10.0,
            ..ControllerState::default()
        };
        let (next, out) = law.update(&state, &input(60.0, 50.0, &pattern, &line));
        assert_eq!(next.integral, 0.0);
        assert!((out - 100.0).abs() < 1e-12);
    }

    #[test]
    fn integral_clamped_at_limit() {
        let pattern = DisturbanceConfig::constant(50.0);
        let line = DelayLine::new(0);
        let law = PidLaw::for_tank_area(200.0);
        let mut state = ControllerState::default();
        for _ in 0..10_000 {
            let (next, _) = law.update(&state, &input(1000.0, 0.0, &pattern, &line));
            state = next;
            assert!(state.integral <= 500.0);
        }
        assert_eq!(state.integral, 500.0);
    }
}
