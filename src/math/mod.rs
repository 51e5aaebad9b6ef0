pub mod vec2;

pub use vec2::Vec2;

pub fn min(a: f32, b: f32) -> f32 {
    if a < b {
        a
    } else {
        b
    }
}

pub fn max(a: f32, b: f32) -> f32 {
    if a > b {
        a
    } else {
        b
    }
}

pub fn clamp(value: f32, _min: f32, _max: f32) -> f32 {
    min(max(value, _min), _max)
}

pub fn abs(value: f32) -> f32 {
    if value < 0.0 {
        -value
    } else {
        value
    }
}

pub fn euclidean_distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(&b)
}

/// Angle from `from` to `to`, positive x-axis is 0 and positive y-axis is 90.
/// Always in [0, 360).
pub fn angle_between_points(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    normalize_absolute(delta.y.atan2(delta.x).to_degrees())
}

/// Wraps any angle into [0, 360).
pub fn normalize_absolute(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wraps any angle into (-180, 180].
pub fn normalize_relative(degrees: f32) -> f32 {
    let wrapped = normalize_absolute(degrees);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Circular mean of a set of absolute angles, or None for an empty set.
pub fn mean_angle(angles: &[f32]) -> Option<f32> {
    if angles.is_empty() {
        return None;
    }

    let (sin, cos) = angles.iter().fold((0.0f32, 0.0f32), |(s, c), a| {
        let r = a.to_radians();
        (s + r.sin(), c + r.cos())
    });

    Some(normalize_absolute(sin.atan2(cos).to_degrees()))
}
