//! # Effects Module
//!
//! The six overlay effects. Each effect is a self-contained module that
//! writes into the shared uniform table, the scene graph, or the video
//! plane's material; the compositor enforces that at most one of them
//! is active at a time.
//!
//! The picture effects (desaturation, toon, RGB tint) are pure uniform
//! writers. The scene effects (flashlight, billboard, TV) own nodes in
//! the shared scene graph and load their models lazily through an
//! [`AssetSource`](crate::loaders::AssetSource).

mod billboard;
mod desat;
mod flashlight;
mod rgb;
mod toon;
mod tv;

pub use billboard::{
    BillboardSpinner, SpinEvents, BILLBOARD_MODEL_URL, DAY_BACKGROUND_URL, NIGHT_BACKGROUND_URL,
    PRISM_EDGE_NAME, PRISM_MODEL_URL,
};
pub use desat::DesatFilter;
pub use flashlight::Flashlight;
pub use rgb::RgbFilter;
pub use toon::ToonFilter;
pub use tv::{TvScene, TV_MODEL_URL, TV_SCREEN_NAME};

use crate::material::{Material, VideoMaterial};
use crate::math::Color;
use crate::scene::{NodeId, Scene};
use serde::{Deserialize, Serialize};

/// The mutually exclusive overlay scenes.
///
/// Persisted by discriminant, so the numbering is part of the stored
/// preference format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum SceneMode {
    /// No effect; the plain video shows through.
    #[default]
    Default,
    /// Spotlight cone over a darkened picture.
    Flashlight,
    /// 3D billboard with spinning prisms.
    Billboard,
    /// Desaturation slider.
    Desat,
    /// Cartoon shading.
    Toon,
    /// RGB tint presets.
    Rgb,
    /// Retro TV bezel with a draggable viewpoint.
    Tv,
}

impl From<SceneMode> for u8 {
    fn from(mode: SceneMode) -> u8 {
        mode as u8
    }
}

impl TryFrom<u8> for SceneMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Default),
            1 => Ok(Self::Flashlight),
            2 => Ok(Self::Billboard),
            3 => Ok(Self::Desat),
            4 => Ok(Self::Toon),
            5 => Ok(Self::Rgb),
            6 => Ok(Self::Tv),
            _ => Err(format!("unknown scene mode {value}")),
        }
    }
}

/// Toon shading sub-modes. Persisted by discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ToonMode {
    /// Toon shading off.
    Default,
    /// Posterized colors with black contours.
    #[default]
    Color,
    /// Contour lines only.
    Contours,
    /// Inverted picture with contours.
    Inverse,
}

impl From<ToonMode> for u8 {
    fn from(mode: ToonMode) -> u8 {
        mode as u8
    }
}

impl TryFrom<u8> for ToonMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Default),
            1 => Ok(Self::Color),
            2 => Ok(Self::Contours),
            3 => Ok(Self::Inverse),
            _ => Err(format!("unknown toon mode {value}")),
        }
    }
}

/// RGB tint presets.
///
/// Each preset is a multiplicative tint on the video plane; `Blue`
/// additionally rotates the hue so the magenta tint lands on blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum RgbMode {
    /// No tint.
    #[default]
    Default,
    /// Red channel only.
    Red,
    /// Magenta tint rotated onto blue.
    Blue,
    /// Green channel only.
    Green,
    /// Red and blue channels.
    RedBlue,
    /// Red and green channels.
    RedGreen,
    /// Green and blue channels.
    GreenBlue,
}

impl From<RgbMode> for u8 {
    fn from(mode: RgbMode) -> u8 {
        mode as u8
    }
}

impl TryFrom<u8> for RgbMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Default),
            1 => Ok(Self::Red),
            2 => Ok(Self::Blue),
            3 => Ok(Self::Green),
            4 => Ok(Self::RedBlue),
            5 => Ok(Self::RedGreen),
            6 => Ok(Self::GreenBlue),
            _ => Err(format!("unknown rgb mode {value}")),
        }
    }
}

impl RgbMode {
    /// The preset's tint color.
    pub fn tint(self) -> Color {
        Color::from_hex(self.hex())
    }

    /// The preset's tint as a packed hex value.
    pub fn hex(self) -> u32 {
        match self {
            Self::Default => 0xffffff,
            Self::Red => 0xff0000,
            Self::Blue => 0xff00ff,
            Self::Green => 0x00ff00,
            Self::RedBlue => 0xff00ff,
            Self::RedGreen => 0xffff00,
            Self::GreenBlue => 0x00ffff,
        }
    }

    /// Hue rotation in degrees, or `-1.0` for pure tints.
    pub fn hue(self) -> f32 {
        match self {
            Self::Blue => 230.0,
            _ => -1.0,
        }
    }
}

/// Billboard spin stagger order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Left to right.
    Forwards,
    /// Right to left.
    Backwards,
    /// Alternate every cycle.
    PingPong,
}

/// One billboard speed profile. Times are in seconds.
#[derive(Debug, Clone, Copy)]
pub struct SpeedMode {
    /// Stagger order.
    pub direction: Direction,
    /// Time between spin cycles.
    pub interval: f32,
    /// Duration of one prism's rotation.
    pub duration: f32,
    /// Stagger delay between neighbouring prisms.
    pub delay: f32,
}

/// The three selectable speed profiles, slow to fast.
pub const SPEED_MODES: [SpeedMode; 3] = [
    SpeedMode {
        direction: Direction::Forwards,
        interval: 15.0,
        duration: 3.0,
        delay: 0.3,
    },
    SpeedMode {
        direction: Direction::Forwards,
        interval: 10.0,
        duration: 2.0,
        delay: 0.13,
    },
    SpeedMode {
        direction: Direction::PingPong,
        interval: 6.0,
        duration: 1.0,
        delay: 0.08,
    },
];

/// The three selectable prism counts.
pub const PRISM_COUNTS: [usize; 3] = [8, 12, 15];

/// Saturation steps; index 3 is the unfiltered picture.
pub const DESAT_LEVELS: [f32; 4] = [0.0, 0.25, 0.6, 1.0];

/// Toon exposure boost.
pub const TOON_EXPOSURE: f32 = 0.3;
/// Toon contrast boost.
pub const TOON_CONTRAST: f32 = 0.5;
/// Toon brightness offset.
pub const TOON_BRIGHTNESS: f32 = 0.0;

/// Supported video aspect profiles.
///
/// Anything that is not recognizably 4:3 or 21:10 falls back to 16:9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    /// Classic 4:3.
    FourThree,
    /// Widescreen 16:9.
    #[default]
    SixteenNine,
    /// Cinematic 21:10.
    TwentyOneTen,
}

impl AspectRatio {
    /// Classify a width/height ratio.
    pub fn from_ratio(ratio: f32) -> Self {
        if ratio > 2.38 && ratio < 2.39 {
            Self::TwentyOneTen
        } else if ratio > 1.3 && ratio < 1.4 {
            Self::FourThree
        } else {
            Self::SixteenNine
        }
    }

    /// Half-extents of the orthographic frustum for this profile.
    pub fn half_extents(self) -> (f32, f32) {
        match self {
            Self::FourThree => (2.0, 1.5),
            Self::SixteenNine => (8.0, 4.5),
            Self::TwentyOneTen => (10.5, 5.0),
        }
    }
}

/// The video plane's material, if the node still carries one.
pub(crate) fn video_material_mut(scene: &mut Scene, plane: NodeId) -> Option<&mut VideoMaterial> {
    match scene.node_mut(plane).mesh.as_mut().map(|m| &mut m.material) {
        Some(Material::Video(material)) => Some(material),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_classification() {
        assert_eq!(AspectRatio::from_ratio(4.0 / 3.0), AspectRatio::FourThree);
        assert_eq!(AspectRatio::from_ratio(16.0 / 9.0), AspectRatio::SixteenNine);
        assert_eq!(AspectRatio::from_ratio(2.385), AspectRatio::TwentyOneTen);
        // Unrecognized ratios fall back to widescreen.
        assert_eq!(AspectRatio::from_ratio(1.0), AspectRatio::SixteenNine);
        assert_eq!(AspectRatio::from_ratio(3.0), AspectRatio::SixteenNine);
    }

    #[test]
    fn test_rgb_preset_table() {
        assert_eq!(RgbMode::Default.hex(), 0xffffff);
        assert_eq!(RgbMode::Blue.hue(), 230.0);
        assert_eq!(RgbMode::Red.hue(), -1.0);
        let tint = RgbMode::RedGreen.tint();
        assert_eq!((tint.r, tint.g, tint.b), (1.0, 1.0, 0.0));
    }

    #[test]
    fn test_scene_mode_serde_round_trip() {
        let json = serde_json::to_string(&SceneMode::Billboard).unwrap();
        assert_eq!(json, "2");
        let back: SceneMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SceneMode::Billboard);
        assert!(serde_json::from_str::<SceneMode>("7").is_err());
    }
}
