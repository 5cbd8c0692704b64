//! # Material Module
//!
//! Materials are parameter blocks attached to meshes; compiled
//! pipelines live in the renderer and are shared across draws.

mod standard;
mod video;

pub use standard::{
    LightRaw, LightsRaw, StandardMaterial, StandardModelRaw, StandardPipeline, MAX_LIGHTS,
};
pub use video::{VideoMaterial, VideoModelRaw, VideoPipeline};

use crate::core::Context;

/// Any material a mesh can carry.
pub enum Material {
    /// Surface showing the (effect-filtered) video stream.
    Video(VideoMaterial),
    /// Lit model surface.
    Standard(StandardMaterial),
}

/// Bind group layouts shared by all pipelines.
///
/// Bind groups are created against these shared layouts so a single
/// per-node group works regardless of which pipeline draws it.
pub struct RenderLayouts {
    /// Group 0: camera view-projection.
    pub camera: wgpu::BindGroupLayout,
    /// Group 1: per-draw model data.
    pub model: wgpu::BindGroupLayout,
    /// Group 2: texture and sampler.
    pub texture: wgpu::BindGroupLayout,
    /// Group 3: effect uniforms or light rig.
    pub uniform: wgpu::BindGroupLayout,
}

impl RenderLayouts {
    /// Create the shared layouts.
    pub fn new(context: &Context) -> Self {
        Self {
            camera: uniform_layout(context, "Camera Layout"),
            model: uniform_layout(context, "Model Layout"),
            texture: texture_layout(context, "Texture Layout"),
            uniform: uniform_layout(context, "Shared Uniform Layout"),
        }
    }
}

fn uniform_layout(context: &Context, label: &str) -> wgpu::BindGroupLayout {
    context
        .device
        .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
}

fn texture_layout(context: &Context, label: &str) -> wgpu::BindGroupLayout {
    context
        .device
        .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
}
