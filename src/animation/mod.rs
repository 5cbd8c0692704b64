//! # Animation Module
//!
//! Keyframed rotation clips, single-shot actions with start-delay
//! staggering, and a mixer that writes sampled poses into the scene.

mod action;
mod clip;
mod mixer;

pub use action::AnimationAction;
pub use clip::{AnimationClip, RotationTrack};
pub use mixer::AnimationMixer;
