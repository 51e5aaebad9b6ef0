use std::ops::{Add, Div, Mul, Sub};

/// A point or offset on the field, in field units.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Vec2 {
        Vec2 { x, y }
    }

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: &Vec2) -> f32 {
        (*self - *other).magnitude()
    }

    /// Unit vector pointing `degrees` counter-clockwise from the positive x-axis.
    pub fn from_angle(degrees: f32) -> Vec2 {
        let radians = degrees.to_radians();
        Vec2 {
            x: radians.cos(),
            y: radians.sin(),
        }
    }

    /// Polar offset (distance, absolute angle in degrees) added to this point.
    pub fn project(&self, distance: f32, degrees: f32) -> Vec2 {
        *self + Vec2::from_angle(degrees) * distance
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2 {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;

    fn div(self, rhs: f32) -> Vec2 {
        Vec2 {
            x: self.x / rhs,
            y: self.y / rhs,
        }
    }
}
