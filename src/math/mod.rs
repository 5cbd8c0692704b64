//! # Math Module
//!
//! Minimal 3D math for the overlay engine: vectors, a 4x4 matrix for the
//! two camera projections, and an RGB color type with a Three.js-like API.

mod vector2;
mod vector3;
mod matrix4;
mod color;

pub use vector2::Vector2;
pub use vector3::Vector3;
pub use matrix4::Matrix4;
pub use color::Color;

/// Clamp a value between min and max.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Linear interpolation between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
