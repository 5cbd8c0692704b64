//! Plane geometry for the video quad and screen surfaces.

use super::{Geometry, Vertex};

/// Build a plane in the XY plane, centered at the origin, facing +Z.
///
/// UVs run 0..1 left-to-right and bottom-to-top, matching the
/// orientation of a video frame drawn without flipping.
pub fn plane(width: f32, height: f32) -> Geometry {
    let hw = width / 2.0;
    let hh = height / 2.0;

    let vertices = vec![
        Vertex {
            position: [-hw, -hh, 0.0],
            normal: [0.0, 0.0, 1.0],
            uv: [0.0, 0.0],
        },
        Vertex {
            position: [hw, -hh, 0.0],
            normal: [0.0, 0.0, 1.0],
            uv: [1.0, 0.0],
        },
        Vertex {
            position: [hw, hh, 0.0],
            normal: [0.0, 0.0, 1.0],
            uv: [1.0, 1.0],
        },
        Vertex {
            position: [-hw, hh, 0.0],
            normal: [0.0, 0.0, 1.0],
            uv: [0.0, 1.0],
        },
    ];

    let indices = vec![0, 1, 2, 0, 2, 3];

    Geometry::new(vertices, indices)
}
