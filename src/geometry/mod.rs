//! # Geometry Module
//!
//! CPU-side mesh data with lazy GPU buffer upload.

mod plane;
mod vertex;

pub use plane::plane;
pub use vertex::Vertex;

use crate::core::Context;
use wgpu::util::DeviceExt;

/// GPU buffers for an uploaded geometry.
pub struct GpuGeometry {
    /// Vertex buffer.
    pub vertex_buffer: wgpu::Buffer,
    /// Index buffer (u32 indices).
    pub index_buffer: wgpu::Buffer,
    /// Number of indices to draw.
    pub index_count: u32,
}

/// Indexed triangle mesh data.
///
/// Geometry is plain CPU data until [`Geometry::upload`] is called;
/// all effect logic can therefore run without a GPU device.
pub struct Geometry {
    /// Vertex data.
    pub vertices: Vec<Vertex>,
    /// Triangle indices.
    pub indices: Vec<u32>,
    /// Uploaded GPU buffers, if any.
    pub gpu: Option<GpuGeometry>,
}

impl Geometry {
    /// Create a new geometry from vertex and index data.
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            gpu: None,
        }
    }

    /// Remap UVs in place.
    ///
    /// Used by the billboard to give each prism clone its own slice of
    /// the shared video texture.
    pub fn remap_uvs<F>(&mut self, mut f: F)
    where
        F: FnMut(f32, f32) -> (f32, f32),
    {
        for v in &mut self.vertices {
            let (u, w) = f(v.uv[0], v.uv[1]);
            v.uv = [u, w];
        }
        // CPU data changed; GPU copy is stale.
        self.gpu = None;
    }

    /// Upload vertex/index buffers if not already resident.
    pub fn upload(&mut self, context: &Context) {
        if self.gpu.is_some() {
            return;
        }

        let vertex_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Geometry Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Geometry Index Buffer"),
                contents: bytemuck::cast_slice(&self.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        self.gpu = Some(GpuGeometry {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        });
    }
}

impl Clone for Geometry {
    fn clone(&self) -> Self {
        // GPU buffers are not cloned; the clone uploads its own.
        Self::new(self.vertices.clone(), self.indices.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remap_invalidates_gpu() {
        let mut geo = plane(1.0, 1.0);
        geo.remap_uvs(|u, v| (u * 0.5, v));
        assert_eq!(geo.vertices[1].uv[0], 0.5);
        assert!(geo.gpu.is_none());
    }
}
