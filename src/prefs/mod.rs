//! # Preferences Module
//!
//! Persists the user's effect selections between sessions. The snapshot
//! is one JSON blob saved after every user action; loading merges the
//! stored fields over defaults so older blobs with missing fields keep
//! working. Storage failures are never surfaced to the user, a broken
//! backend just means fresh defaults.

use crate::effects::{RgbMode, SceneMode, ToonMode};
use crate::math::Vector2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Default storage key.
pub const STORAGE_KEY: &str = "frostfx_user_data";

/// A storage backend failed.
#[derive(Error, Debug, Clone)]
#[error("storage backend: {0}")]
pub struct StorageError(pub String);

/// Key-value blob storage supplied by the host.
///
/// The store treats every error as "no data"; backends do not need to
/// distinguish absence from failure.
pub trait PreferenceStorage {
    /// Fetch the blob stored under `key`, if any.
    fn load(&mut self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Store a blob under `key`.
    fn save(&mut self, key: &str, data: &[u8]) -> Result<(), StorageError>;
}

/// Dragged panel position in host pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UiPosition {
    /// Offset from the top of the player.
    pub top: f32,
    /// Offset from the left of the player.
    pub left: f32,
}

/// Everything the overlay remembers about a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreferenceSnapshot {
    /// Effect audio cues muted.
    pub is_muted: bool,
    /// Control panel collapsed.
    pub is_minimized: bool,
    /// Active scene at the time of the save.
    pub current_scene: SceneMode,
    /// Billboard day/night lighting.
    pub billboard_is_day_light: bool,
    /// Billboard speed profile index.
    pub billboard_speed_mode: usize,
    /// Billboard prism count index.
    pub billboard_prism_count: usize,
    /// TV day/night lighting.
    pub tv_is_daylight: bool,
    /// TV camera viewpoint in world space.
    pub tv_go_to_position: Option<Vector2>,
    /// TV cursor position in controller space.
    pub tv_cursor_position: Option<Vector2>,
    /// Flashlight cone size.
    pub flashlight_is_large: bool,
    /// Flashlight aim target in world space.
    pub flashlight_target: Option<Vector2>,
    /// Flashlight cursor position in controller space.
    pub flashlight_position: Option<Vector2>,
    /// Desaturation level index.
    pub desat_index: usize,
    /// Last selected toon sub-mode.
    pub toon_mode: ToonMode,
    /// Last selected RGB preset.
    pub rgb_mode: RgbMode,
    /// Dragged panel position, if the user moved it.
    pub ui_position: Option<UiPosition>,
}

impl Default for PreferenceSnapshot {
    fn default() -> Self {
        Self {
            is_muted: false,
            is_minimized: false,
            current_scene: SceneMode::Default,
            billboard_is_day_light: true,
            billboard_speed_mode: 1,
            billboard_prism_count: 1,
            tv_is_daylight: true,
            tv_go_to_position: None,
            tv_cursor_position: None,
            flashlight_is_large: true,
            flashlight_target: None,
            flashlight_position: None,
            desat_index: 3,
            toon_mode: ToonMode::Color,
            rgb_mode: RgbMode::Default,
            ui_position: None,
        }
    }
}

/// Envelope older deployments wrapped around the snapshot.
#[derive(Deserialize)]
struct LegacyEnvelope {
    setupdata: PreferenceSnapshot,
}

/// Snapshot store bound to one storage backend and key.
pub struct PreferenceStore {
    storage: Box<dyn PreferenceStorage>,
    key: String,
}

impl PreferenceStore {
    /// Create a store over a backend with the default key.
    pub fn new(storage: Box<dyn PreferenceStorage>) -> Self {
        Self {
            storage,
            key: STORAGE_KEY.to_string(),
        }
    }

    /// Use a custom storage key, e.g. one suffixed per client.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Load the stored snapshot, falling back to defaults on absence,
    /// backend failure, or an unreadable blob.
    pub fn load(&mut self) -> PreferenceSnapshot {
        let data = match self.storage.load(&self.key) {
            Ok(Some(data)) => data,
            Ok(None) => return PreferenceSnapshot::default(),
            Err(err) => {
                log::warn!("preference load failed: {err}");
                return PreferenceSnapshot::default();
            }
        };
        if let Ok(envelope) = serde_json::from_slice::<LegacyEnvelope>(&data) {
            return envelope.setupdata;
        }
        match serde_json::from_slice(&data) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::warn!("preference blob unreadable: {err}");
                PreferenceSnapshot::default()
            }
        }
    }

    /// Persist a snapshot. Backend failures are logged and swallowed.
    pub fn save(&mut self, snapshot: &PreferenceSnapshot) {
        let data = match serde_json::to_vec(snapshot) {
            Ok(data) => data,
            Err(err) => {
                log::warn!("preference serialize failed: {err}");
                return;
            }
        };
        if let Err(err) = self.storage.save(&self.key, &data) {
            log::warn!("preference save failed: {err}");
        }
    }
}

/// In-memory storage backend.
#[derive(Default)]
pub struct MemoryStorage {
    blobs: HashMap<String, Vec<u8>>,
}

impl MemoryStorage {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStorage for MemoryStorage {
    fn load(&mut self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn save(&mut self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.blobs.insert(key.to_string(), data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStorage;

    impl PreferenceStorage for BrokenStorage {
        fn load(&mut self, _key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            Err(StorageError("quota exceeded".into()))
        }

        fn save(&mut self, _key: &str, _data: &[u8]) -> Result<(), StorageError> {
            Err(StorageError("quota exceeded".into()))
        }
    }

    #[test]
    fn test_round_trip() {
        let mut store = PreferenceStore::new(Box::new(MemoryStorage::new()));
        let mut snapshot = PreferenceSnapshot::default();
        snapshot.current_scene = SceneMode::Billboard;
        snapshot.desat_index = 0;
        snapshot.flashlight_target = Some(Vector2::new(-3.9, 2.25));

        store.save(&snapshot);
        assert_eq!(store.load(), snapshot);
    }

    #[test]
    fn test_partial_blob_merges_defaults() {
        let mut storage = MemoryStorage::new();
        storage
            .save(STORAGE_KEY, br#"{"currentScene":6,"isMinimized":true}"#)
            .unwrap();
        let mut store = PreferenceStore::new(Box::new(storage));

        let snapshot = store.load();
        assert_eq!(snapshot.current_scene, SceneMode::Tv);
        assert!(snapshot.is_minimized);
        assert_eq!(snapshot.desat_index, 3);
        assert_eq!(snapshot.toon_mode, ToonMode::Color);
        assert!(snapshot.billboard_is_day_light);
    }

    #[test]
    fn test_legacy_envelope() {
        let mut storage = MemoryStorage::new();
        storage
            .save(
                STORAGE_KEY,
                br#"{"setupdata":{"currentScene":3,"desatIndex":1},"uuid":"abc","timestamp":1}"#,
            )
            .unwrap();
        let mut store = PreferenceStore::new(Box::new(storage));

        let snapshot = store.load();
        assert_eq!(snapshot.current_scene, SceneMode::Desat);
        assert_eq!(snapshot.desat_index, 1);
    }

    #[test]
    fn test_failures_fall_back_to_defaults() {
        let mut store = PreferenceStore::new(Box::new(BrokenStorage));
        assert_eq!(store.load(), PreferenceSnapshot::default());
        // Saving over a broken backend must not panic.
        store.save(&PreferenceSnapshot::default());

        let mut storage = MemoryStorage::new();
        storage.save(STORAGE_KEY, b"not json").unwrap();
        let mut store = PreferenceStore::new(Box::new(storage));
        assert_eq!(store.load(), PreferenceSnapshot::default());
    }
}
