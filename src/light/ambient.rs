//! Ambient light.

use crate::math::Color;

/// Uniform light applied to every surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    /// Light color.
    pub color: Color,
    /// Light intensity.
    pub intensity: f32,
}

impl AmbientLight {
    /// Create a new ambient light.
    pub fn new(color: Color, intensity: f32) -> Self {
        Self { color, intensity }
    }
}
