//! Frame rendering.

use super::Context;
use crate::material::{
    LightsRaw, Material, RenderLayouts, StandardModelRaw, StandardPipeline, VideoModelRaw,
    VideoPipeline,
};
use crate::math::Matrix4;
use crate::scene::Scene;
use crate::shader::{EffectUniforms, ShaderError};
use crate::texture::{Texture2D, VideoTexture};
use std::collections::HashMap;
use wgpu::util::DeviceExt;

struct NodeGpu {
    model_buffer: wgpu::Buffer,
    model_group: wgpu::BindGroup,
}

/// Draws a scene with the active camera.
///
/// Owns the compiled pipelines, the shared uniform buffers, and the
/// per-node GPU state cache. One renderer serves all effect scenes.
pub struct Renderer {
    layouts: RenderLayouts,
    video_pipeline: VideoPipeline,
    standard_pipeline: StandardPipeline,
    camera_buffer: wgpu::Buffer,
    camera_group: wgpu::BindGroup,
    effects_buffer: wgpu::Buffer,
    effects_group: wgpu::BindGroup,
    lights_buffer: wgpu::Buffer,
    lights_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
    white: Texture2D,
    node_state: HashMap<u64, NodeGpu>,
    clear_color: wgpu::Color,
}

impl Renderer {
    /// Build pipelines and shared buffers.
    ///
    /// Fails when the injected video shader cannot be assembled.
    pub fn new(
        context: &Context,
        uniforms: &EffectUniforms,
        clear_color: wgpu::Color,
    ) -> Result<Self, ShaderError> {
        let layouts = RenderLayouts::new(context);
        let video_pipeline = VideoPipeline::new(context, uniforms, &layouts)?;
        let standard_pipeline = StandardPipeline::new(context, &layouts);

        let camera_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&Matrix4::IDENTITY.to_cols_array_2d()),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_group = Self::bind_uniform(context, &layouts.camera, &camera_buffer, "Camera");

        let effects_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Effects Buffer"),
                contents: bytemuck::cast_slice(&uniforms.pack()),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let effects_group =
            Self::bind_uniform(context, &layouts.uniform, &effects_buffer, "Effects");

        let lights_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Lights Buffer"),
                contents: bytemuck::bytes_of(&LightsRaw::collect(&Scene::new())),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let lights_group = Self::bind_uniform(context, &layouts.uniform, &lights_buffer, "Lights");

        let depth = context.create_depth_texture();
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

        let mut white = Texture2D::white();
        white.upload(context);

        Ok(Self {
            layouts,
            video_pipeline,
            standard_pipeline,
            camera_buffer,
            camera_group,
            effects_buffer,
            effects_group,
            lights_buffer,
            lights_group,
            depth_view,
            depth_size: (context.width, context.height),
            white,
            node_state: HashMap::new(),
            clear_color,
        })
    }

    fn bind_uniform(
        context: &Context,
        layout: &wgpu::BindGroupLayout,
        buffer: &wgpu::Buffer,
        label: &str,
    ) -> wgpu::BindGroup {
        context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            })
    }

    /// Recreate size-dependent resources after a surface resize.
    pub fn resize(&mut self, context: &Context) {
        if self.depth_size != (context.width, context.height) {
            let depth = context.create_depth_texture();
            self.depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());
            self.depth_size = (context.width, context.height);
        }
    }

    /// Draw one frame of `scene` through `view_proj`.
    ///
    /// `video` feeds live-video surfaces; `frozen` (when present) feeds
    /// surfaces whose material asked for the snapshot texture.
    pub fn render(
        &mut self,
        context: &Context,
        scene: &mut Scene,
        view_proj: &Matrix4,
        uniforms: &EffectUniforms,
        video: &mut VideoTexture,
        frozen: Option<&mut VideoTexture>,
    ) -> Result<(), wgpu::SurfaceError> {
        self.resize(context);

        context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&view_proj.to_cols_array_2d()),
        );
        context
            .queue
            .write_buffer(&self.effects_buffer, 0, bytemuck::cast_slice(&uniforms.pack()));

        scene.update_world_matrices();
        context.queue.write_buffer(
            &self.lights_buffer,
            0,
            bytemuck::bytes_of(&LightsRaw::collect(scene)),
        );

        video.upload(context);
        let frozen_group = match frozen {
            Some(tex) => {
                tex.upload(context);
                tex.gpu_mut()
                    .map(|gpu| gpu.bind_group(&context.device, &self.layouts.texture).clone())
            }
            None => None,
        };
        let video_group = video
            .gpu_mut()
            .map(|gpu| gpu.bind_group(&context.device, &self.layouts.texture).clone());

        let frame = context.get_current_texture()?;
        let surface_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = context.create_command_encoder();

        // Upload pass: geometry, maps, per-node model data.
        for id in scene.ids() {
            let node_id = {
                let node = scene.node(id);
                if node.mesh.is_none() || !node.world_visible {
                    continue;
                }
                node.id.value()
            };

            let world = scene.node(id).world_matrix.to_cols_array_2d();
            let node = scene.node_mut(id);
            let Some(mesh) = node.mesh.as_mut() else {
                continue;
            };
            mesh.geometry.upload(context);

            let raw: [u8; 96] = match &mut mesh.material {
                Material::Video(m) => bytemuck::cast(VideoModelRaw::new(world, m)),
                Material::Standard(m) => {
                    if let Some(map) = m.map.as_mut() {
                        map.upload(context);
                    }
                    bytemuck::cast(StandardModelRaw::new(world, m))
                }
            };

            match self.node_state.get(&node_id) {
                Some(state) => {
                    context.queue.write_buffer(&state.model_buffer, 0, &raw);
                }
                None => {
                    let model_buffer =
                        context
                            .device
                            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                                label: Some("Model Buffer"),
                                contents: &raw,
                                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                            });
                    let model_group =
                        Self::bind_uniform(context, &self.layouts.model, &model_buffer, "Model");
                    self.node_state.insert(
                        node_id,
                        NodeGpu {
                            model_buffer,
                            model_group,
                        },
                    );
                }
            }
        }

        let clear = match scene.background {
            Some(c) => wgpu::Color {
                r: c.r as f64,
                g: c.g as f64,
                b: c.b as f64,
                a: 1.0,
            },
            None => self.clear_color,
        };

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.camera_group, &[]);

            for id in scene.ids() {
                let node = scene.node_mut(id);
                if !node.world_visible {
                    continue;
                }
                let node_key = node.id.value();
                let Some(mesh) = node.mesh.as_mut() else {
                    continue;
                };
                let Some(gpu) = mesh.geometry.gpu.as_ref() else {
                    continue;
                };
                let Some(state) = self.node_state.get(&node_key) else {
                    continue;
                };

                match &mut mesh.material {
                    Material::Video(m) => {
                        let Some(texture_group) = (if m.frozen {
                            frozen_group.as_ref().or(video_group.as_ref())
                        } else {
                            video_group.as_ref()
                        }) else {
                            continue;
                        };
                        pass.set_pipeline(&self.video_pipeline.pipeline);
                        pass.set_bind_group(1, &state.model_group, &[]);
                        pass.set_bind_group(2, texture_group, &[]);
                        pass.set_bind_group(3, &self.effects_group, &[]);
                    }
                    Material::Standard(m) => {
                        pass.set_pipeline(&self.standard_pipeline.pipeline);
                        pass.set_bind_group(1, &state.model_group, &[]);
                        let texture_group = match m.map.as_mut().and_then(|t| t.gpu.as_mut()) {
                            Some(map) => map.bind_group(&context.device, &self.layouts.texture),
                            None => match self.white.gpu.as_mut() {
                                Some(white) => {
                                    white.bind_group(&context.device, &self.layouts.texture)
                                }
                                None => continue,
                            },
                        };
                        pass.set_bind_group(2, &*texture_group, &[]);
                        pass.set_bind_group(3, &self.lights_group, &[]);
                    }
                }

                pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
                pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..gpu.index_count, 0, 0..1);
            }
        }

        context.submit(Some(encoder.finish()));
        frame.present();

        Ok(())
    }

    /// Drop all cached per-node GPU state.
    pub fn release(&mut self) {
        self.node_state.clear();
    }
}
