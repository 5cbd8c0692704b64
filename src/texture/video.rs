//! Live video texture with a freeze-frame snapshot.

use crate::core::Context;

/// Supplies RGBA frames from the host's video surface.
///
/// The host owns decoding; the engine only pulls pixels. Cross-origin
/// video must be readable by the host before frames are handed over.
pub trait VideoFrameSource {
    /// Intrinsic size of the video, or `None` before metadata loads.
    fn size(&self) -> Option<(u32, u32)>;

    /// Copy the current frame into `buffer` (RGBA8, row-major), resizing
    /// it as needed. Returns `false` when no new frame is available.
    fn copy_frame(&mut self, buffer: &mut Vec<u8>) -> bool;
}

/// A texture fed from the live video stream.
///
/// Calling [`VideoTexture::freeze`] snapshots the current pixels; while
/// frozen, live updates are ignored so a surface keeps showing the
/// captured frame (used by the billboard during prism spins).
pub struct VideoTexture {
    /// Current pixel data (live or frozen).
    pub pixels: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Whether sampling should flip the V coordinate.
    pub flip_y: bool,
    frozen: bool,
    dirty: bool,
    gpu: Option<super::GpuTexture>,
}

impl VideoTexture {
    /// Create an empty video texture.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; (width * height * 4) as usize],
            width,
            height,
            flip_y: true,
            frozen: false,
            dirty: true,
            gpu: None,
        }
    }

    /// Pull the next frame from the source unless frozen.
    pub fn update(&mut self, source: &mut dyn VideoFrameSource) {
        if self.frozen {
            return;
        }
        if let Some((w, h)) = source.size() {
            if (w, h) != (self.width, self.height) {
                self.width = w;
                self.height = h;
                self.gpu = None;
            }
        }
        if source.copy_frame(&mut self.pixels) {
            self.dirty = true;
        }
    }

    /// Hold the current frame; live updates are dropped until
    /// [`VideoTexture::unfreeze`].
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Resume live updates.
    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    /// Whether the texture is holding a frozen frame.
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Upload the current pixels if they changed since the last upload.
    pub fn upload(&mut self, context: &Context) {
        if self.gpu.is_none() {
            let mut backing = super::Texture2D::from_rgba(
                std::mem::take(&mut self.pixels),
                self.width,
                self.height,
            );
            backing.upload(context);
            self.pixels = backing.pixels;
            self.gpu = backing.gpu;
            self.dirty = false;
            return;
        }

        if !self.dirty {
            return;
        }
        if let Some(gpu) = &self.gpu {
            context.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &gpu.texture,
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
            self.dirty = false;
        }
    }

    /// Borrow the GPU resources, if uploaded.
    #[inline]
    pub fn gpu(&self) -> Option<&super::GpuTexture> {
        self.gpu.as_ref()
    }

    /// Mutably borrow the GPU resources, if uploaded.
    #[inline]
    pub fn gpu_mut(&mut self) -> Option<&mut super::GpuTexture> {
        self.gpu.as_mut()
    }
}
