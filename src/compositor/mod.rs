//! # Compositor Module
//!
//! Ties the engine together: the [`OverlayController`] owns the shared
//! scene, both cameras, the effect modules, and the preference store,
//! and drives them from host player events and frame ticks. Rendering
//! proper stays in [`crate::core::Renderer`]; everything in here runs
//! without a GPU so the state machine is testable headless.

mod controller;
mod sizing;

pub use controller::OverlayController;
pub use sizing::{canvas_dimensions, CanvasDimensions, RESIZE_INTERVAL, RESIZE_LIMIT};
