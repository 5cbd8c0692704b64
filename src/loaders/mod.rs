//! # Loaders Module
//!
//! Asset loading is a collaborator concern: the host hands the engine
//! an [`AssetSource`] and the engine polls it from frame ticks. Loads
//! are fire-and-forget; there is no cancellation and no timeout, and a
//! failed load leaves the requesting module "not loaded" forever.

mod model;
mod source;

pub use model::{LoadedGeometry, LoadedMaterial, LoadedMesh, LoadedModel};
pub use source::{AssetSource, LoadRequest, ModelPoll, StaticAssetSource, TexturePoll};

use thiserror::Error;

/// Errors surfaced by an asset source.
#[derive(Error, Debug, Clone)]
pub enum LoadError {
    /// The source had no asset for the URL.
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// The asset bytes could not be decoded.
    #[error("Failed to decode asset {url}: {reason}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Decoder message.
        reason: String,
    },
}

/// Lifecycle of a lazily loaded scene module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No load requested yet.
    #[default]
    Idle,
    /// Request in flight.
    Loading,
    /// Assets resident; the module can activate.
    Loaded,
    /// Load failed; activation stays deferred forever.
    Failed,
}
