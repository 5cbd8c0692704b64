//! Plugin construction configuration.

use serde::{Deserialize, Serialize};

/// Where the host should dock the control panel.
///
/// Purely advisory: the engine persists it with the preference snapshot
/// but the panel itself is host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FloatPosition {
    /// Bottom center of the player.
    BottomCenter,
    /// Bottom right corner.
    #[default]
    BottomRight,
    /// Bottom left corner.
    BottomLeft,
    /// Top right corner.
    TopRight,
    /// Top left corner.
    TopLeft,
}

/// Options the host passes when constructing the overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial panel docking position.
    pub float: FloatPosition,
    /// UI language tag, e.g. "en".
    pub lang: String,
    /// Host element the overlay mounts into.
    pub target_id: Option<String>,
    /// Start muted regardless of the stored snapshot.
    pub is_muted: bool,
    /// Verbose diagnostics requested by the host.
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            float: FloatPosition::default(),
            lang: "en".to_string(),
            target_id: None,
            is_muted: false,
            debug: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_position_wire_names() {
        let json = serde_json::to_string(&FloatPosition::BottomCenter).unwrap();
        assert_eq!(json, "\"bottom-center\"");
        let back: FloatPosition = serde_json::from_str("\"top-left\"").unwrap();
        assert_eq!(back, FloatPosition::TopLeft);
    }

    #[test]
    fn test_partial_config_merges_defaults() {
        let config: Config = serde_json::from_str(r#"{"debug":true}"#).unwrap();
        assert!(config.debug);
        assert_eq!(config.lang, "en");
        assert_eq!(config.float, FloatPosition::BottomRight);
    }
}
