//! Kick power model, after section 4.5.3 of the soccer server manual.

use crate::math::{abs, clamp, min};
use crate::world::params::ServerParameters;
use crate::world::percept::Polar;

/// How far a full-power kick travels with the stock parameters.
pub const MAX_KICK_DISTANCE: f32 = 45.0;

/// Fraction of the kick the ball actually receives, given where it lies
/// relative to the body.
pub fn effective_kick_factor(params: &ServerParameters, ball: &Polar) -> Option<f32> {
    let distance = ball.distance?;
    let direction = ball.direction.unwrap_or(0.0);

    let off_center = 0.25 * (abs(direction) / 180.0);
    let off_body = 0.25 * (distance / params.kickable_margin);
    Some(1.0 - off_center - off_body)
}

/// Acceleration given to the ball by a kick of `power`.
pub fn effective_kick_power(params: &ServerParameters, ball: &Polar, power: f32) -> Option<f32> {
    let factor = effective_kick_factor(params, ball)?;
    let kick_power = clamp(power, params.minpower, params.maxpower);
    Some(kick_power * params.kick_power_rate * factor)
}

/// Power needed to send the ball `distance` units, scaled by `1 + extra_power`.
///
/// `extra_power == 0` aims to have the ball come to rest at the target.
pub fn required_kick_power(params: &ServerParameters, ball: &Polar, distance: f32, extra_power: f32) -> Option<f32> {
    let factor = effective_kick_factor(params, ball)?;
    if factor <= 0.0 {
        return None;
    }

    let ideal = (distance / MAX_KICK_DISTANCE) * params.maxpower;
    let compensated = ideal / factor;
    let power = compensated * (1.0 + extra_power);
    Some(clamp(power, params.minpower, params.maxpower))
}

/// Total distance the ball rolls after a kick of `power` under the server's
/// velocity decay.
pub fn ball_travel_distance(params: &ServerParameters, ball: &Polar, power: f32) -> Option<f32> {
    let speed = min(effective_kick_power(params, ball, power)?, params.ball_speed_max);
    Some(speed / (1.0 - params.ball_decay))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_power_kick_travels_max_distance() {
        let params = ServerParameters::default();
        let ball = Polar::new(0.0, 0.0);
        let travel = ball_travel_distance(&params, &ball, params.maxpower).unwrap();
        assert!((travel - MAX_KICK_DISTANCE).abs() < 0.01, "travel was {}", travel);
    }

    #[test]
    fn required_power_round_trips_through_decay_model() {
        let params = ServerParameters::default();
        let ball = Polar::new(0.3, 10.0);
        for target in [5.0, 12.5, 20.0, 30.0] {
            let power = required_kick_power(&params, &ball, target, 0.0).unwrap();
            let travel = ball_travel_distance(&params, &ball, power).unwrap();
            assert!((travel - target).abs() < 0.1, "target {} travelled {}", target, travel);
        }
    }

    #[test]
    fn off_center_ball_needs_more_power() {
        let params = ServerParameters::default();
        let centered = required_kick_power(&params, &Polar::new(0.1, 0.0), 20.0, 0.0).unwrap();
        let offset = required_kick_power(&params, &Polar::new(0.6, 90.0), 20.0, 0.0).unwrap();
        assert!(offset > centered);
    }

    #[test]
    fn power_is_clamped_to_server_limits() {
        let params = ServerParameters::default();
        let ball = Polar::new(0.5, 45.0);
        let power = required_kick_power(&params, &ball, 40.0, 1.0).unwrap();
        assert_eq!(power, params.maxpower);

        // requested power beyond maxpower does not add acceleration
        let capped = effective_kick_power(&params, &ball, 250.0).unwrap();
        let full = effective_kick_power(&params, &ball, params.maxpower).unwrap();
        assert_eq!(capped, full);
    }

    #[test]
    fn unknown_ball_distance_gives_no_estimate() {
        let params = ServerParameters::default();
        assert_eq!(effective_kick_factor(&params, &Polar::direction_only(3.0)), None);
        assert_eq!(required_kick_power(&params, &Polar::default(), 10.0, 0.0), None);
    }
}
