//! Point light.

use crate::math::Color;

/// An omnidirectional light emitted from the node's position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// Light color.
    pub color: Color,
    /// Light intensity.
    pub intensity: f32,
    /// Maximum range; 0 means unbounded.
    pub distance: f32,
    /// Falloff exponent.
    pub decay: f32,
}

impl PointLight {
    /// Create a new point light.
    pub fn new(color: Color, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            distance: 0.0,
            decay: 2.0,
        }
    }
}
