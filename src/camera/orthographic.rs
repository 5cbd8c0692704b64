//! Orthographic camera for the flat video quad.

use crate::math::{Matrix4, Vector3};

/// An orthographic projection camera.
///
/// The video quad is drawn with a symmetric frustum whose half-extents
/// track the active aspect profile.
pub struct OrthographicCamera {
    /// Left frustum plane.
    pub left: f32,
    /// Right frustum plane.
    pub right: f32,
    /// Top frustum plane.
    pub top: f32,
    /// Bottom frustum plane.
    pub bottom: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Camera position.
    pub position: Vector3,
    /// Look-at target.
    pub target: Vector3,
    /// Set when any frustum parameter changed since the last matrix fetch.
    pub needs_update: bool,
    projection_matrix: Matrix4,
    view_matrix: Matrix4,
}

impl OrthographicCamera {
    /// Create a new orthographic camera.
    pub fn new(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            left,
            right,
            top,
            bottom,
            near,
            far,
            position: Vector3::new(0.0, 0.0, 1.0),
            target: Vector3::ZERO,
            needs_update: false,
            projection_matrix: Matrix4::IDENTITY,
            view_matrix: Matrix4::IDENTITY,
        };
        camera.update_matrices();
        camera
    }

    /// Resize the frustum to symmetric half-extents.
    pub fn set_extents(&mut self, half_width: f32, half_height: f32) {
        self.left = -half_width;
        self.right = half_width;
        self.top = half_height;
        self.bottom = -half_height;
        self.needs_update = true;
    }

    /// Recompute projection and view matrices.
    pub fn update_matrices(&mut self) {
        self.projection_matrix = Matrix4::orthographic(
            self.left,
            self.right,
            self.top,
            self.bottom,
            self.near,
            self.far,
        );
        self.view_matrix = Matrix4::look_at(&self.position, &self.target, &Vector3::UP);
        self.needs_update = false;
    }

    /// Combined view-projection matrix.
    pub fn view_projection(&mut self) -> Matrix4 {
        if self.needs_update {
            self.update_matrices();
        }
        self.projection_matrix.multiply(&self.view_matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_extents() {
        let mut camera = OrthographicCamera::new(-8.0, 8.0, 4.5, -4.5, 0.0, 100.0);
        camera.set_extents(10.5, 5.0);
        assert_eq!(camera.left, -10.5);
        assert_eq!(camera.top, 5.0);
        assert!(camera.needs_update);
        camera.view_projection();
        assert!(!camera.needs_update);
    }
}
