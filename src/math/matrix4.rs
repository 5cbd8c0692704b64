//! 4x4 matrix, column-major, for camera and model transforms.

use super::Vector3;

/// A 4x4 column-major matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4 {
    /// Matrix elements in column-major order.
    pub elements: [f32; 16],
}

impl Matrix4 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        elements: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Create a view matrix looking from `eye` towards `target`.
    pub fn look_at(eye: &Vector3, target: &Vector3, up: &Vector3) -> Self {
        let mut z = (*eye - *target).normalized();
        if z.length() == 0.0 {
            z = Vector3::new(0.0, 0.0, 1.0);
        }
        let x = up.cross(&z).normalized();
        let y = z.cross(&x);

        Self {
            elements: [
                x.x, y.x, z.x, 0.0,
                x.y, y.y, z.y, 0.0,
                x.z, y.z, z.z, 0.0,
                -x.dot(eye), -y.dot(eye), -z.dot(eye), 1.0,
            ],
        }
    }

    /// Create an orthographic projection matrix.
    pub fn orthographic(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Self {
        let w = 1.0 / (right - left);
        let h = 1.0 / (top - bottom);
        let p = 1.0 / (far - near);

        Self {
            elements: [
                2.0 * w, 0.0, 0.0, 0.0,
                0.0, 2.0 * h, 0.0, 0.0,
                0.0, 0.0, -p, 0.0,
                -(right + left) * w, -(top + bottom) * h, -near * p, 1.0,
            ],
        }
    }

    /// Create a perspective projection matrix (fov in radians).
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov / 2.0).tan();
        let range = 1.0 / (near - far);

        Self {
            elements: [
                f / aspect, 0.0, 0.0, 0.0,
                0.0, f, 0.0, 0.0,
                0.0, 0.0, far * range, -1.0,
                0.0, 0.0, near * far * range, 0.0,
            ],
        }
    }

    /// Compose a transform from translation, Y-up Euler rotation (radians), and scale.
    pub fn compose(position: &Vector3, rotation: &Vector3, scale: &Vector3) -> Self {
        let (sx, cx) = rotation.x.sin_cos();
        let (sy, cy) = rotation.y.sin_cos();
        let (sz, cz) = rotation.z.sin_cos();

        // Rotation order XYZ, matching the source scene graph.
        let r00 = cy * cz;
        let r01 = -cy * sz;
        let r02 = sy;
        let r10 = cx * sz + sx * sy * cz;
        let r11 = cx * cz - sx * sy * sz;
        let r12 = -sx * cy;
        let r20 = sx * sz - cx * sy * cz;
        let r21 = sx * cz + cx * sy * sz;
        let r22 = cx * cy;

        Self {
            elements: [
                r00 * scale.x, r10 * scale.x, r20 * scale.x, 0.0,
                r01 * scale.y, r11 * scale.y, r21 * scale.y, 0.0,
                r02 * scale.z, r12 * scale.z, r22 * scale.z, 0.0,
                position.x, position.y, position.z, 1.0,
            ],
        }
    }

    /// Multiply by another matrix (self * other).
    pub fn multiply(&self, other: &Self) -> Self {
        let a = &self.elements;
        let b = &other.elements;
        let mut out = [0.0f32; 16];

        for col in 0..4 {
            for row in 0..4 {
                out[col * 4 + row] = a[row] * b[col * 4]
                    + a[4 + row] * b[col * 4 + 1]
                    + a[8 + row] * b[col * 4 + 2]
                    + a[12 + row] * b[col * 4 + 3];
            }
        }

        Self { elements: out }
    }

    /// Convert to a 4x4 nested array for GPU upload.
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        let e = &self.elements;
        [
            [e[0], e[1], e[2], e[3]],
            [e[4], e[5], e[6], e[7]],
            [e[8], e[9], e[10], e[11]],
            [e[12], e[13], e[14], e[15]],
        ]
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_multiply() {
        let m = Matrix4::perspective(1.0, 1.78, 0.1, 30.0);
        let r = Matrix4::IDENTITY.multiply(&m);
        assert_eq!(m, r);
    }

    #[test]
    fn test_compose_translation() {
        let m = Matrix4::compose(
            &Vector3::new(5.0, 0.0, 0.0),
            &Vector3::ZERO,
            &Vector3::ONE,
        );
        assert_eq!(m.elements[12], 5.0);
        assert_eq!(m.elements[0], 1.0);
    }
}
