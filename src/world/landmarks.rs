//! Surveyed landmark coordinates of the standard field.
//!
//! Goal post flags ("glt", "grb", ...) assume the default `goal_width` of
//! 14.02; the server may be configured otherwise.

use crate::math::Vec2;

pub const FIELD_MIN_X: f32 = -60.0;
pub const FIELD_MAX_X: f32 = 60.0;
pub const FIELD_MIN_Y: f32 = -40.0;
pub const FIELD_MAX_Y: f32 = 40.0;

pub fn in_field(point: Vec2) -> bool {
    (FIELD_MIN_X..=FIELD_MAX_X).contains(&point.x) && (FIELD_MIN_Y..=FIELD_MAX_Y).contains(&point.y)
}

/// Absolute coordinate of the flag with the given id, if it is a known landmark.
pub fn flag_coords(flag_id: &str) -> Option<Vec2> {
    let (x, y) = match flag_id {
        // perimeter flags
        "tl50" => (-50.0, 40.0),
        "tl40" => (-40.0, 40.0),
        "tl30" => (-30.0, 40.0),
        "tl20" => (-20.0, 40.0),
        "tl10" => (-10.0, 40.0),
        "t0" => (0.0, 40.0),
        "tr10" => (10.0, 40.0),
        "tr20" => (20.0, 40.0),
        "tr30" => (30.0, 40.0),
        "tr40" => (40.0, 40.0),
        "tr50" => (50.0, 40.0),

        "rt30" => (60.0, 30.0),
        "rt20" => (60.0, 20.0),
        "rt10" => (60.0, 10.0),
        "r0" => (60.0, 0.0),
        "rb10" => (60.0, -10.0),
        "rb20" => (60.0, -20.0),
        "rb30" => (60.0, -30.0),

        "bl50" => (-50.0, -40.0),
        "bl40" => (-40.0, -40.0),
        "bl30" => (-30.0, -40.0),
        "bl20" => (-20.0, -40.0),
        "bl10" => (-10.0, -40.0),
        "b0" => (0.0, -40.0),
        "br10" => (10.0, -40.0),
        "br20" => (20.0, -40.0),
        "br30" => (30.0, -40.0),
        "br40" => (40.0, -40.0),
        "br50" => (50.0, -40.0),

        "lt30" => (-60.0, 30.0),
        "lt20" => (-60.0, 20.0),
        "lt10" => (-60.0, 10.0),
        "l0" => (-60.0, 0.0),
        "lb10" => (-60.0, -10.0),
        "lb20" => (-60.0, -20.0),
        "lb30" => (-60.0, -30.0),

        // goal posts
        "glt" => (-55.0, 7.01),
        "gl" => (-55.0, 0.0),
        "glb" => (-55.0, -7.01),
        "grt" => (55.0, 7.01),
        "gr" => (55.0, 0.0),
        "grb" => (55.0, -7.01),

        // penalty area
        "plt" => (-35.0, 20.0),
        "plc" => (-35.0, 0.0),
        "plb" => (-32.0, -20.0),
        "prt" => (35.0, 20.0),
        "prc" => (35.0, 0.0),
        "prb" => (32.0, -20.0),

        // on the boundary lines
        "lt" => (-55.0, 35.0),
        "ct" => (0.0, 35.0),
        "rt" => (55.0, 35.0),
        "lb" => (-55.0, -35.0),
        "cb" => (0.0, -35.0),
        "rb" => (55.0, -35.0),

        "c" => (0.0, 0.0),
        _ => return None,
    };

    Some(Vec2::new(x, y))
}
