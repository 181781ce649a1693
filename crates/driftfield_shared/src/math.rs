//! Mathematical types shared by every crate.
//!
//! World-space values are `f64` so that dumps carry doubles and large sector
//! coordinates keep their precision.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 2D Vector - positions, velocities, offsets
///
/// Serialized as `{ "x": .., "y": .. }`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
}

impl Vec2 {
    /// Creates a new Vec2
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Unit vector pointing along `angle` (radians, counter-clockwise from +X)
    #[must_use]
    pub fn from_angle(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, sin)
    }

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Returns true if both components are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_operations() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 6.0);

        let sum = a + b;
        assert_eq!(sum, Vec2::new(5.0, 8.0));
        assert_eq!(a.dot(b), 16.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(-a, Vec2::new(-1.0, -2.0));
    }

    #[test]
    fn test_from_angle_is_unit() {
        for i in 0..16 {
            let v = Vec2::from_angle(f64::from(i) * 0.4);
            assert!((v.length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_vec2_bytemuck() {
        let v = Vec2::new(1.0, 2.0);
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 16); // 2 * 8 bytes
    }

    #[test]
    fn test_vec2_serializes_as_xy_pair() {
        let json = serde_json::to_string(&Vec2::new(1.5, -2.0)).unwrap();
        assert_eq!(json, r#"{"x":1.5,"y":-2.0}"#);
    }
}
