//! 2D vector, used for cursor targets and pixel dimensions.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
}

impl Vector2 {
    /// Zero vector (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    /// One vector (1, 1).
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Get the length of the vector.
    #[inline]
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Clamp both components between per-axis bounds.
    pub fn clamp(&self, min: Vector2, max: Vector2) -> Self {
        Self {
            x: self.x.clamp(min.x, max.x),
            y: self.y.clamp(min.y, max.y),
        }
    }

    /// Convert to an array.
    #[inline]
    pub const fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl Add for Vector2 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        let v = Vector2::new(1.5, -0.3);
        let clamped = v.clamp(Vector2::new(0.2, 0.18), Vector2::new(0.8, 0.75));
        assert_eq!(clamped, Vector2::new(0.8, 0.18));
    }
}
