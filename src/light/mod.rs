//! # Light Module
//!
//! Lights attach to scene nodes as payloads; the node's transform
//! supplies the light position.

mod ambient;
mod point;
mod spot;

pub use ambient::AmbientLight;
pub use point::PointLight;
pub use spot::SpotLight;

/// Any light payload a node can carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Uniform scene light.
    Ambient(AmbientLight),
    /// Aimed cone light.
    Spot(SpotLight),
    /// Omnidirectional light.
    Point(PointLight),
}
