//! Perspective camera for the 3D effect scenes.

use crate::math::{Matrix4, Vector3};

/// A perspective projection camera.
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Camera position.
    pub position: Vector3,
    /// Look-at target.
    pub target: Vector3,
    /// Set when any parameter changed since the last matrix fetch.
    pub needs_update: bool,
    projection_matrix: Matrix4,
    view_matrix: Matrix4,
}

impl PerspectiveCamera {
    /// Create a new perspective camera.
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov,
            aspect,
            near,
            far,
            position: Vector3::new(0.0, 0.0, 5.0),
            target: Vector3::ZERO,
            needs_update: false,
            projection_matrix: Matrix4::IDENTITY,
            view_matrix: Matrix4::IDENTITY,
        };
        camera.update_matrices();
        camera
    }

    /// Point the camera at a target.
    pub fn look_at(&mut self, target: Vector3) {
        self.target = target;
        self.needs_update = true;
    }

    /// Aim along a yaw angle (radians) from the -Z axis.
    ///
    /// Matches a scene-graph Y rotation applied to a forward-facing
    /// camera.
    pub fn set_yaw(&mut self, yaw: f32) {
        let dir = Vector3::new(-yaw.sin(), 0.0, -yaw.cos());
        self.target = self.position + dir;
        self.needs_update = true;
    }

    /// Update the aspect ratio.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.needs_update = true;
    }

    /// Recompute projection and view matrices.
    pub fn update_matrices(&mut self) {
        self.projection_matrix =
            Matrix4::perspective(self.fov.to_radians(), self.aspect, self.near, self.far);
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
    fn test_yaw_aims_forward() {
        let mut camera = PerspectiveCamera::new(45.0, 16.0 / 9.0, 0.1, 30.0);
        camera.position = Vector3::new(3.4884, 0.1, 10.0);
        camera.set_yaw(-0.08);
        let dir = camera.target - camera.position;
        assert!(dir.x > 0.0);
        assert!(dir.z < 0.0);
    }
}
