//! # Texture Module
//!
//! Static image textures and the live video texture with its
//! freeze-frame snapshot.

mod texture2d;
mod video;

pub use texture2d::{GpuTexture, Texture2D, TextureError};
pub use video::{VideoFrameSource, VideoTexture};
