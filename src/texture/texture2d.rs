//! Static 2D textures decoded from image data.

use crate::core::Context;
use thiserror::Error;

/// Errors that can occur when decoding texture data.
#[derive(Error, Debug)]
pub enum TextureError {
    /// Image decoding failed.
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// A static RGBA texture, kept on the CPU until uploaded.
pub struct Texture2D {
    /// RGBA8 pixel data.
    pub pixels: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Uploaded GPU texture, if any.
    pub gpu: Option<GpuTexture>,
}

/// GPU resources for an uploaded texture.
pub struct GpuTexture {
    /// The texture.
    pub texture: wgpu::Texture,
    /// Default view over the whole texture.
    pub view: wgpu::TextureView,
    /// Linear-filtering sampler.
    pub sampler: wgpu::Sampler,
    /// Cached texture/sampler bind group.
    bind_group: Option<wgpu::BindGroup>,
}

impl GpuTexture {
    /// Get or create the texture/sampler bind group for `layout`.
    pub fn bind_group(
        &mut self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
    ) -> &wgpu::BindGroup {
        let view = &self.view;
        let sampler = &self.sampler;
        self.bind_group.get_or_insert_with(|| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Texture Bind Group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            })
        })
    }
}

impl Texture2D {
    /// Decode an encoded image (PNG, JPEG, ...) into an RGBA texture.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TextureError> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            pixels: img.into_raw(),
            width,
            height,
            gpu: None,
        })
    }

    /// Wrap raw RGBA8 pixel data.
    pub fn from_rgba(pixels: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            pixels,
            width,
            height,
            gpu: None,
        }
    }

    /// A 1x1 opaque white texture, used when a material has no map.
    pub fn white() -> Self {
        Self::from_rgba(vec![255, 255, 255, 255], 1, 1)
    }

    /// Upload to the GPU if not already resident.
    pub fn upload(&mut self, context: &Context) {
        if self.gpu.is_some() {
            return;
        }

        let texture = context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Texture2D"),
            size: wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        context.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &self.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.width),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = context.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Texture2D Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        self.gpu = Some(GpuTexture {
            texture,
            view,
            sampler,
            bind_group: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_texture() {
        let t = Texture2D::white();
        assert_eq!(t.pixels, vec![255, 255, 255, 255]);
        assert_eq!((t.width, t.height), (1, 1));
    }
}
