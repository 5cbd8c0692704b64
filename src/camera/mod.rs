//! # Camera Module
//!
//! Orthographic camera for the flat video quad, perspective camera for
//! the billboard and TV scenes.

mod orthographic;
mod perspective;

pub use orthographic::OrthographicCamera;
pub use perspective::PerspectiveCamera;
