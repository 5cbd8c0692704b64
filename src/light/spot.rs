//! Spot light.

use crate::math::{Color, Vector3};

/// A cone of light aimed at a world-space target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    /// Light color.
    pub color: Color,
    /// Light intensity.
    pub intensity: f32,
    /// Cone half-angle in radians.
    pub angle: f32,
    /// Softness of the cone edge, 0..1.
    pub penumbra: f32,
    /// Maximum range; 0 means unbounded.
    pub distance: f32,
    /// World-space aim target.
    pub target: Vector3,
}

impl SpotLight {
    /// Create a new spot light aimed at the origin.
    pub fn new(color: Color, intensity: f32, angle: f32) -> Self {
        Self {
            color,
            intensity,
            angle,
            penumbra: 0.0,
            distance: 0.0,
            target: Vector3::ZERO,
        }
    }

    /// Set the aim target.
    pub fn with_target(mut self, target: Vector3) -> Self {
        self.target = target;
        self
    }

    /// Set the penumbra.
    pub fn with_penumbra(mut self, penumbra: f32) -> Self {
        self.penumbra = penumbra;
        self
    }
}
