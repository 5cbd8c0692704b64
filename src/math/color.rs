//! RGB color with hex conversion, Three.js-style.

use serde::{Deserialize, Serialize};

/// RGB color with values in 0.0-1.0 range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    /// Red component (0.0 to 1.0).
    pub r: f32,
    /// Green component (0.0 to 1.0).
    pub g: f32,
    /// Blue component (0.0 to 1.0).
    pub b: f32,
}

impl Color {
    /// Black (0, 0, 0).
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0 };
    /// White (1, 1, 1).
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };

    /// Create a new color from RGB values (0.0-1.0).
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create from a 24-bit hex value, e.g. `0xff00ff`.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Convert to a 24-bit hex value.
    pub fn to_hex(self) -> u32 {
        let r = (self.r.clamp(0.0, 1.0) * 255.0).round() as u32;
        let g = (self.g.clamp(0.0, 1.0) * 255.0).round() as u32;
        let b = (self.b.clamp(0.0, 1.0) * 255.0).round() as u32;
        (r << 16) | (g << 8) | b
    }

    /// Convert to an array.
    #[inline]
    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Relative luminance (Rec. 709 weights).
    pub fn luminance(&self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let c = Color::from_hex(0xffe5d3);
        assert_eq!(c.to_hex(), 0xffe5d3);
    }

    #[test]
    fn test_from_hex_channels() {
        let c = Color::from_hex(0xff0000);
        assert_eq!(c, Color::new(1.0, 0.0, 0.0));
    }
}
