//! Lit material for loaded effect-scene models.

use crate::core::Context;
use crate::geometry::Vertex;
use crate::light::Light;
use crate::math::Color;
use crate::scene::Scene;
use crate::shader::STANDARD_SHADER;
use crate::texture::Texture2D;
use bytemuck::{Pod, Zeroable};

/// Parameters of a lit model surface.
pub struct StandardMaterial {
    /// Base color multiplier.
    pub color: Color,
    /// Emissive color.
    pub emissive: Color,
    /// Emissive intensity.
    pub emissive_intensity: f32,
    /// Base color texture; a 1x1 white texture when absent.
    pub map: Option<Texture2D>,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            emissive: Color::BLACK,
            emissive_intensity: 0.0,
            map: None,
        }
    }
}

/// Per-draw uniform data for the standard pipeline.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct StandardModelRaw {
    /// Model matrix.
    pub model: [[f32; 4]; 4],
    /// rgb base color, a unused.
    pub color: [f32; 4],
    /// rgb emissive color, a = intensity.
    pub emissive: [f32; 4],
}

impl StandardModelRaw {
    /// Build from a world matrix and material parameters.
    pub fn new(model: [[f32; 4]; 4], material: &StandardMaterial) -> Self {
        Self {
            model,
            color: [material.color.r, material.color.g, material.color.b, 0.0],
            emissive: [
                material.emissive.r,
                material.emissive.g,
                material.emissive.b,
                material.emissive_intensity,
            ],
        }
    }
}

/// Maximum lights sent to the shader.
pub const MAX_LIGHTS: usize = 8;

/// One packed light.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct LightRaw {
    /// xyz position, w kind (0 ambient, 1 spot, 2 point).
    pub position: [f32; 4],
    /// rgb color, a intensity.
    pub color: [f32; 4],
    /// xyz spot direction, w cos(angle).
    pub direction: [f32; 4],
}

/// Packed light rig for a scene.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LightsRaw {
    /// x = light count, yzw unused.
    pub count: [f32; 4],
    /// Light table.
    pub lights: [LightRaw; MAX_LIGHTS],
}

impl LightsRaw {
    /// Collect the visible lights of a scene into the packed table.
    ///
    /// World matrices must be current.
    pub fn collect(scene: &Scene) -> Self {
        let mut lights = [LightRaw::default(); MAX_LIGHTS];
        let mut count = 0usize;

        for id in scene.ids() {
            if count == MAX_LIGHTS {
                break;
            }
            let node = scene.node(id);
            if !node.world_visible {
                continue;
            }
            let Some(light) = &node.light else {
                continue;
            };
            let e = &node.world_matrix.elements;
            let pos = [e[12], e[13], e[14]];
            lights[count] = match light {
                Light::Ambient(l) => LightRaw {
                    position: [pos[0], pos[1], pos[2], 0.0],
                    color: [l.color.r, l.color.g, l.color.b, l.intensity],
                    direction: [0.0; 4],
                },
                Light::Spot(l) => {
                    let dir = [
                        l.target.x - pos[0],
                        l.target.y - pos[1],
                        l.target.z - pos[2],
                    ];
                    LightRaw {
                        position: [pos[0], pos[1], pos[2], 1.0],
                        color: [l.color.r, l.color.g, l.color.b, l.intensity],
                        direction: [dir[0], dir[1], dir[2], l.angle.cos()],
                    }
                }
                Light::Point(l) => LightRaw {
                    position: [pos[0], pos[1], pos[2], 2.0],
                    color: [l.color.r, l.color.g, l.color.b, l.intensity],
                    direction: [0.0; 4],
                },
            };
            count += 1;
        }

        Self {
            count: [count as f32, 0.0, 0.0, 0.0],
            lights,
        }
    }
}

/// Compiled standard pipeline.
pub struct StandardPipeline {
    /// The render pipeline.
    pub pipeline: wgpu::RenderPipeline,
}

impl StandardPipeline {
    /// Build the pipeline.
    pub fn new(context: &Context, layouts: &super::RenderLayouts) -> Self {
        let module = context
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Standard Shader"),
                source: wgpu::ShaderSource::Wgsl(STANDARD_SHADER.into()),
            });

        let pipeline_layout =
            context
                .device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("Standard Pipeline Layout"),
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
                label: Some("Standard Pipeline"),
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
                    cull_mode: Some(wgpu::Face::Back),
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

        Self { pipeline }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::{AmbientLight, SpotLight};
    use crate::math::Vector3;
    use crate::scene::{Node, Transform};

    #[test]
    fn test_collect_lights() {
        let mut scene = Scene::new();
        scene.add(Node::new("ambient").with_light(Light::Ambient(AmbientLight::new(
            Color::WHITE,
            0.5,
        ))));
        scene.add(
            Node::new("spot")
                .with_transform(Transform::from_position(Vector3::new(0.0, 10.0, 0.0)))
                .with_light(Light::Spot(SpotLight::new(Color::WHITE, 0.8, 0.35))),
        );
        scene.update_world_matrices();

        let raw = LightsRaw::collect(&scene);
        assert_eq!(raw.count[0], 2.0);
        assert_eq!(raw.lights[0].position[3], 0.0);
        assert_eq!(raw.lights[1].position[3], 1.0);
        assert_eq!(raw.lights[1].position[1], 10.0);
    }

    #[test]
    fn test_hidden_lights_skipped() {
        let mut scene = Scene::new();
        let id = scene.add(Node::new("spot").with_light(Light::Spot(SpotLight::new(
            Color::WHITE,
            0.8,
            0.35,
        ))));
        scene.node_mut(id).visible = false;
        scene.update_world_matrices();
        assert_eq!(LightsRaw::collect(&scene).count[0], 0.0);
    }
}
