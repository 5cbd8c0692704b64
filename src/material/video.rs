//! Injected video material and its pipeline.

use crate::core::Context;
use crate::geometry::Vertex;
use crate::math::Color;
use crate::shader::{build_video_shader, EffectUniforms, ShaderError};
use bytemuck::{Pod, Zeroable};

/// Parameters of a surface showing the video stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoMaterial {
    /// Multiplicative tint (the RGB filter writes here).
    pub tint: Color,
    /// Additive glow on top of the sampled frame; the TV screen raises
    /// this at night.
    pub emissive_intensity: f32,
    /// Flip the V coordinate when sampling.
    pub flip_y: bool,
    /// Sample the frozen snapshot texture instead of the live stream.
    pub frozen: bool,
}

impl Default for VideoMaterial {
    fn default() -> Self {
        Self {
            tint: Color::WHITE,
            emissive_intensity: 0.0,
            flip_y: true,
            frozen: false,
        }
    }
}

/// Per-draw uniform data for the video pipeline.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct VideoModelRaw {
    /// Model matrix.
    pub model: [[f32; 4]; 4],
    /// rgb tint, a = emissive intensity.
    pub tint: [f32; 4],
    /// x = flip_y, yzw unused.
    pub params: [f32; 4],
}

impl VideoModelRaw {
    /// Build from a world matrix and material parameters.
    pub fn new(model: [[f32; 4]; 4], material: &VideoMaterial) -> Self {
        Self {
            model,
            tint: [
                material.tint.r,
                material.tint.g,
                material.tint.b,
                material.emissive_intensity,
            ],
            params: [if material.flip_y { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }
}

/// Compiled video pipeline.
pub struct VideoPipeline {
    /// The render pipeline.
    pub pipeline: wgpu::RenderPipeline,
}

impl VideoPipeline {
    /// Compile the injected video shader and build the pipeline.
    pub fn new(
        context: &Context,
        uniforms: &EffectUniforms,
        layouts: &super::RenderLayouts,
    ) -> Result<Self, ShaderError> {
        let source = build_video_shader(uniforms)?;

        let module = context
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Video Shader"),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });

        let pipeline_layout =
            context
                .device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("Video Pipeline Layout"),
                    bind_group_layouts: &[
                        &layouts.camera,
                        &layouts.model,
                        &layouts.texture,
                        &layouts.uniform,
                    ],
                    push_constant_ranges: &[],
                });

        let pipeline = context
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Video Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[Vertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: context.surface_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: context.depth_format,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        Ok(Self { pipeline })
    }
}
