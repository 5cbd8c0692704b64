//! # Frostfx - Real-Time Video Effect Overlay Engine
//!
//! Frostfx renders visual-effect overlays on top of a host video
//! player: saturation and toon filters, RGB tints, a flashlight
//! spotlight, and full 3D scenes (a prism billboard, a retro TV) that
//! show the video stream on their surfaces. Effects share one injected
//! shader pipeline and one scene graph; at most one scene is active at
//! a time, and the user's selections persist between sessions.
//!
//! The host stays in charge of playback, DOM/window plumbing, and
//! audio: it hands the engine a [`player::MediaPlayer`], an
//! [`loaders::AssetSource`], and a [`prefs::PreferenceStorage`], and
//! forwards player events plus one tick per frame.
//!
//! ## Example
//!
//! ```ignore
//! use frostfx::prelude::*;
//!
//! let mut controller = OverlayController::new(Config::default(), storage);
//! controller.handle_event(PlayerEvent::Playing, &mut player, &mut assets);
//!
//! // per frame:
//! controller.advance(&mut player, &mut assets, &mut cues);
//! controller.render_frame(&context, &mut renderer, &mut frames)?;
//! ```

#![warn(missing_docs)]
#![allow(dead_code)]

pub mod math;
pub mod core;
pub mod scene;
pub mod geometry;
pub mod material;
pub mod camera;
pub mod texture;
pub mod light;
pub mod shader;
pub mod animation;
pub mod loaders;
pub mod player;
pub mod prefs;
pub mod effects;
pub mod compositor;
pub mod config;

// Re-export commonly used types
pub mod prelude {
    //! Convenient re-exports of commonly used types.

    pub use crate::math::*;
    pub use crate::core::*;
    pub use crate::scene::*;
    pub use crate::geometry::*;
    pub use crate::material::*;
    pub use crate::camera::*;
    pub use crate::texture::*;
    pub use crate::light::*;
    pub use crate::shader::*;
    pub use crate::animation::*;
    pub use crate::loaders::*;
    pub use crate::player::*;
    pub use crate::prefs::*;
    pub use crate::effects::*;
    pub use crate::compositor::*;
    pub use crate::config::*;
}

/// Engine version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const NAME: &str = "Frostfx";
