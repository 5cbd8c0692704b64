//! Cartoon shading effect.

use super::{AspectRatio, ToonMode, TOON_BRIGHTNESS, TOON_CONTRAST, TOON_EXPOSURE};
use crate::math::Color;
use crate::shader::{EffectUniforms, UniformHandle};

/// Drives the toon branch of the injected shader.
///
/// Selecting the mode that is already active falls back to `Default`,
/// turning the effect off. The contour threshold depends on the video
/// aspect profile; 4:3 sources get thicker edges.
pub struct ToonFilter {
    is_toon: UniformHandle,
    is_colors: UniformHandle,
    is_inverse: UniformHandle,
    is_contours: UniformHandle,
    contour_color: UniformHandle,
    toon_exposure: UniformHandle,
    toon_contrast: UniformHandle,
    toon_brightness: UniformHandle,
    contour_strength: UniformHandle,

    mode: ToonMode,
    last_mode: Option<ToonMode>,
    active: bool,
    colors: bool,
    contours: bool,
    inverse: bool,
    contour: Color,
    strength: f32,
}

impl ToonFilter {
    /// Create the filter, inactive.
    pub fn new(uniforms: &EffectUniforms, aspect: AspectRatio) -> Self {
        let mut filter = Self {
            is_toon: uniforms.is_toon.clone(),
            is_colors: uniforms.is_colors.clone(),
            is_inverse: uniforms.is_inverse.clone(),
            is_contours: uniforms.is_contours.clone(),
            contour_color: uniforms.contour_color.clone(),
            toon_exposure: uniforms.toon_exposure.clone(),
            toon_contrast: uniforms.toon_contrast.clone(),
            toon_brightness: uniforms.toon_brightness.clone(),
            contour_strength: uniforms.contour_strength.clone(),

            mode: ToonMode::Default,
            last_mode: None,
            active: false,
            colors: true,
            contours: true,
            inverse: false,
            contour: Color::new(0.0, 0.15, 0.0),
            strength: 0.75,
        };
        filter.set_aspect_ratio(aspect);
        filter.toon_exposure.set_scalar(TOON_EXPOSURE);
        filter.toon_contrast.set_scalar(TOON_CONTRAST);
        filter.toon_brightness.set_scalar(TOON_BRIGHTNESS);
        filter.apply();
        filter
    }

    /// Select a mode; re-selecting the active one turns the effect off.
    ///
    /// Returns the resulting mode for persistence.
    pub fn set_mode(&mut self, mode: ToonMode) -> ToonMode {
        if mode != ToonMode::Default {
            self.last_mode = Some(mode);
        }
        self.mode = if self.mode == mode {
            ToonMode::Default
        } else {
            mode
        };
        match self.mode {
            ToonMode::Default => {
                self.active = false;
            }
            ToonMode::Color => {
                self.contour = Color::BLACK;
                self.inverse = false;
                self.colors = true;
                self.active = true;
            }
            ToonMode::Contours => {
                self.contour = Color::new(0.0, 0.15, 0.0);
                self.inverse = false;
                self.colors = false;
                self.active = true;
            }
            ToonMode::Inverse => {
                self.contour = Color::new(0.15, 0.15, 0.33);
                self.inverse = true;
                self.colors = false;
                self.active = true;
            }
        }
        self.apply();
        log::info!("TOON {:?}", self.mode);
        self.mode
    }

    /// Force the active flag without changing the selected mode.
    pub fn toggle(&mut self, active: bool) {
        self.active = active;
        self.apply();
    }

    /// Activate with the last selected mode, or `Color`.
    pub fn enable(&mut self) -> ToonMode {
        let mode = self.last_mode.unwrap_or(ToonMode::Color);
        self.set_mode(mode)
    }

    /// Remember a persisted mode so the next activation re-applies it.
    pub fn restore(&mut self, mode: ToonMode) {
        if mode != ToonMode::Default {
            self.last_mode = Some(mode);
        }
    }

    /// Update the contour threshold for a new aspect profile.
    pub fn set_aspect_ratio(&mut self, aspect: AspectRatio) {
        self.strength = match aspect {
            AspectRatio::FourThree => 0.4,
            _ => 0.75,
        };
        self.apply();
    }

    /// The currently selected mode.
    #[inline]
    pub fn mode(&self) -> ToonMode {
        self.mode
    }

    /// Whether the effect is shading the picture.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    fn apply(&self) {
        // The shader compares the edge magnitude against the inverted
        // strength, so stronger settings lower the threshold.
        self.contour_strength.set_scalar(1.0 - self.strength);
        self.toon_brightness.set_scalar(TOON_BRIGHTNESS);
        self.contour_color.set_color(self.contour);
        self.is_contours.set_flag(self.contours);
        self.is_inverse.set_flag(self.inverse);
        self.is_colors.set_flag(self.colors);
        self.is_toon.set_flag(self.active);
    }
}
