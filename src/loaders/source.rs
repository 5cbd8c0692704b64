//! Asset source collaborator trait and a ready-made in-memory source.

use super::{LoadError, LoadedModel};
use crate::texture::Texture2D;
use std::collections::HashMap;

/// Token identifying an in-flight load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadRequest(pub u64);

/// Poll result for a model load.
pub enum ModelPoll {
    /// Still loading; poll again next tick.
    Pending,
    /// Finished; the model is handed over exactly once.
    Ready(Box<LoadedModel>),
    /// Failed; the request stays failed.
    Failed(LoadError),
}

/// Poll result for a texture load.
pub enum TexturePoll {
    /// Still loading; poll again next tick.
    Pending,
    /// Finished; the texture is handed over exactly once.
    Ready(Box<Texture2D>),
    /// Failed; the request stays failed.
    Failed(LoadError),
}

/// Supplies models and textures to the engine.
///
/// Implementations resolve URLs however the host likes (network,
/// bundle, disk). Polling a completed request after its payload was
/// taken reports failure; callers consume `Ready` immediately.
pub trait AssetSource {
    /// Begin loading a model.
    fn load_model(&mut self, url: &str) -> LoadRequest;

    /// Poll a model load.
    fn poll_model(&mut self, request: LoadRequest) -> ModelPoll;

    /// Begin loading a texture.
    fn load_texture(&mut self, url: &str) -> LoadRequest;

    /// Poll a texture load.
    fn poll_texture(&mut self, request: LoadRequest) -> TexturePoll;
}

enum Slot {
    Waiting { url: String, polls_left: u32 },
    Taken,
}

/// An asset source backed by pre-registered assets.
///
/// Useful for bundled deployments and for tests; `delay` makes every
/// request stay pending for a number of polls to exercise the deferred
/// activation paths.
#[derive(Default)]
pub struct StaticAssetSource {
    models: HashMap<String, LoadedModel>,
    textures: HashMap<String, Texture2D>,
    delay: u32,
    next_request: u64,
    model_slots: HashMap<LoadRequest, Slot>,
    texture_slots: HashMap<LoadRequest, Slot>,
}

impl StaticAssetSource {
    /// Create an empty source that resolves immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every request stay pending for `polls` polls.
    pub fn with_delay(mut self, polls: u32) -> Self {
        self.delay = polls;
        self
    }

    /// Register a model under a URL.
    pub fn insert_model(&mut self, url: impl Into<String>, model: LoadedModel) {
        self.models.insert(url.into(), model);
    }

    /// Register a texture under a URL.
    pub fn insert_texture(&mut self, url: impl Into<String>, texture: Texture2D) {
        self.textures.insert(url.into(), texture);
    }

    fn next(&mut self) -> LoadRequest {
        self.next_request += 1;
        LoadRequest(self.next_request)
    }
}

impl AssetSource for StaticAssetSource {
    fn load_model(&mut self, url: &str) -> LoadRequest {
        let request = self.next();
        self.model_slots.insert(
            request,
            Slot::Waiting {
                url: url.to_string(),
                polls_left: self.delay,
            },
        );
        request
    }

    fn poll_model(&mut self, request: LoadRequest) -> ModelPoll {
        let Some(slot) = self.model_slots.get_mut(&request) else {
            return ModelPoll::Failed(LoadError::NotFound(format!("request {}", request.0)));
        };
        match slot {
            Slot::Waiting { url, polls_left } => {
                if *polls_left > 0 {
                    *polls_left -= 1;
                    return ModelPoll::Pending;
                }
                let url = url.clone();
                match self.models.remove(&url) {
                    Some(model) => {
                        *slot = Slot::Taken;
                        ModelPoll::Ready(Box::new(model))
                    }
                    None => {
                        *slot = Slot::Taken;
                        ModelPoll::Failed(LoadError::NotFound(url))
                    }
                }
            }
            Slot::Taken => ModelPoll::Failed(LoadError::NotFound(format!(
                "request {} already consumed",
                request.0
            ))),
        }
    }

    fn load_texture(&mut self, url: &str) -> LoadRequest {
        let request = self.next();
        self.texture_slots.insert(
            request,
            Slot::Waiting {
                url: url.to_string(),
                polls_left: self.delay,
            },
        );
        request
    }

    fn poll_texture(&mut self, request: LoadRequest) -> TexturePoll {
        let Some(slot) = self.texture_slots.get_mut(&request) else {
            return TexturePoll::Failed(LoadError::NotFound(format!("request {}", request.0)));
        };
        match slot {
            Slot::Waiting { url, polls_left } => {
                if *polls_left > 0 {
                    *polls_left -= 1;
                    return TexturePoll::Pending;
                }
                let url = url.clone();
                match self.textures.remove(&url) {
                    Some(texture) => {
                        *slot = Slot::Taken;
                        TexturePoll::Ready(Box::new(texture))
                    }
                    None => {
                        *slot = Slot::Taken;
                        TexturePoll::Failed(LoadError::NotFound(url))
                    }
                }
            }
            Slot::Taken => TexturePoll::Failed(LoadError::NotFound(format!(
                "request {} already consumed",
                request.0
            ))),
        }
    }
}
