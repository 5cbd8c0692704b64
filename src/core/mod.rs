//! # Core Module
//!
//! Core engine plumbing: wgpu context management, frame rendering,
//! timing, and object identity.

mod context;
mod renderer;
mod clock;
mod id;

pub use context::{Context, ContextError};
pub use renderer::Renderer;
pub use clock::Clock;
pub use id::Id;

/// Render configuration options.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Enable anti-aliasing.
    pub antialias: bool,
    /// Enable alpha blending on the surface.
    pub alpha: bool,
    /// Power preference for GPU selection.
    pub power_preference: wgpu::PowerPreference,
    /// Present mode (vsync).
    pub present_mode: wgpu::PresentMode,
    /// Clear color.
    pub clear_color: wgpu::Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            antialias: true,
            alpha: false,
            power_preference: wgpu::PowerPreference::HighPerformance,
            present_mode: wgpu::PresentMode::AutoVsync,
            clear_color: wgpu::Color {
                r: 1.0,
                g: 1.0,
                b: 1.0,
                a: 1.0,
            },
        }
    }
}
