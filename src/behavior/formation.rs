use crate::error::ConfigError;
use crate::math::Vec2;
use crate::world::Side;

/// Kick-off slots for the left side, indexed by uniform number - 1.
const LEFT_FORMATION: [(f32, f32); 11] = [
    (-5.0, 30.0),
    (-40.0, 15.0),
    (-40.0, 0.0),
    (-40.0, -15.0),
    (-5.0, -30.0),
    (-20.0, 20.0),
    (-20.0, 0.0),
    (-20.0, -20.0),
    (-10.0, 0.0),
    (-10.0, 20.0),
    (-10.0, -20.0),
];

pub const DEFAULT_KICKER: u8 = 9;

/// Where `uniform_number` lines up before kick-off. The right side mirrors
/// the left side across the halfway line.
pub fn kick_off_position(uniform_number: u8, side: Side) -> Result<Vec2, ConfigError> {
    let index = usize::from(uniform_number)
        .checked_sub(1)
        .filter(|index| *index < LEFT_FORMATION.len())
        .ok_or(ConfigError::UnknownUniform(uniform_number))?;

    let (x, y) = LEFT_FORMATION[index];
    Ok(Vec2::new(x * side.x_sign(), y))
}
