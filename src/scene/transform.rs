//! Local node transform.

use crate::math::{Matrix4, Vector3};

/// Position, Euler rotation (XYZ order, radians), and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation.
    pub position: Vector3,
    /// Euler rotation in radians, applied in XYZ order.
    pub rotation: Vector3,
    /// Per-axis scale.
    pub scale: Vector3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::ZERO,
            rotation: Vector3::ZERO,
            scale: Vector3::ONE,
        }
    }
}

impl Transform {
    /// Create a transform at a position with default rotation and scale.
    pub fn from_position(position: Vector3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Compose into a local matrix.
    pub fn matrix(&self) -> Matrix4 {
        Matrix4::compose(&self.position, &self.rotation, &self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_transform() {
        let t = Transform::default();
        assert_eq!(t.matrix(), Matrix4::IDENTITY);
    }
}
