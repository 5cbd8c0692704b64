//! RGB tint effect.

use super::{video_material_mut, RgbMode};
use crate::math::Color;
use crate::scene::{NodeId, Scene};
use crate::shader::{EffectUniforms, UniformHandle};

/// Tints the video plane with one of the [`RgbMode`] presets.
///
/// The tint is a multiplicative color on the plane's material; the
/// `Blue` preset also enables the shader's hue rotation so the magenta
/// tint reads as blue. Re-selecting the active preset clears the tint.
pub struct RgbFilter {
    hue_uniform: UniformHandle,
    hue_active_uniform: UniformHandle,
    mode: RgbMode,
    last_mode: Option<RgbMode>,
    tint: Color,
    hue: f32,
    hue_active: bool,
}

impl RgbFilter {
    /// Create the filter with no tint applied.
    pub fn new(uniforms: &EffectUniforms) -> Self {
        let filter = Self {
            hue_uniform: uniforms.hue.clone(),
            hue_active_uniform: uniforms.hue_active.clone(),
            mode: RgbMode::Default,
            last_mode: None,
            tint: Color::WHITE,
            hue: 0.0,
            hue_active: false,
        };
        filter.hue_active_uniform.set_flag(false);
        filter.hue_uniform.set_scalar(0.0);
        filter
    }

    /// Select a preset; re-selecting the active one clears the tint.
    ///
    /// Returns the resulting mode for persistence.
    pub fn set_mode(&mut self, mode: RgbMode, scene: &mut Scene, plane: NodeId) -> RgbMode {
        if mode != RgbMode::Default {
            self.last_mode = Some(mode);
        }
        self.mode = if self.mode == mode {
            RgbMode::Default
        } else {
            mode
        };
        // Hue rotation only kicks in when the clicked preset carries a
        // hue and it is not the rotation already applied.
        self.hue_active = mode.hue() != -1.0 && mode.hue() != self.hue;
        self.tint = self.mode.tint();
        self.hue = self.mode.hue();
        self.update(scene, plane);
        log::info!("RGB {:?}", self.mode);
        self.mode
    }

    /// Activate with the last selected preset, or `Green`.
    pub fn enable(&mut self, scene: &mut Scene, plane: NodeId) -> RgbMode {
        let mode = self.last_mode.unwrap_or(RgbMode::Green);
        self.set_mode(mode, scene, plane)
    }

    /// Clear the tint.
    pub fn disable(&mut self, scene: &mut Scene, plane: NodeId) {
        self.mode = RgbMode::Default;
        self.tint = Color::WHITE;
        self.hue = RgbMode::Default.hue();
        self.hue_active = false;
        self.update(scene, plane);
    }

    /// Remember a persisted preset so the next activation re-applies it.
    pub fn restore(&mut self, mode: RgbMode) {
        if mode != RgbMode::Default {
            self.last_mode = Some(mode);
        }
    }

    /// The currently applied preset.
    #[inline]
    pub fn mode(&self) -> RgbMode {
        self.mode
    }

    fn update(&self, scene: &mut Scene, plane: NodeId) {
        if let Some(material) = video_material_mut(scene, plane) {
            material.tint = self.tint;
        }
        self.hue_active_uniform.set_flag(self.hue_active);
        self.hue_uniform.set_scalar(self.hue / 360.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Material, VideoMaterial};
    use crate::scene::{Mesh, Node};

    fn stage() -> (EffectUniforms, Scene, NodeId) {
        let uniforms = EffectUniforms::new();
        let mut scene = Scene::new();
        let plane = scene.add(Node::new("plane").with_mesh(Mesh {
            geometry: crate::geometry::plane(1.0, 1.0),
            material: Material::Video(VideoMaterial::default()),
        }));
        (uniforms, scene, plane)
    }

    fn plane_tint(scene: &mut Scene, plane: NodeId) -> Color {
        video_material_mut(scene, plane).unwrap().tint
    }

    #[test]
    fn test_preset_tints_plane() {
        let (uniforms, mut scene, plane) = stage();
        let mut rgb = RgbFilter::new(&uniforms);

        rgb.set_mode(RgbMode::Red, &mut scene, plane);
        assert_eq!(plane_tint(&mut scene, plane), Color::from_hex(0xff0000));
        assert_eq!(uniforms.hue_active.flag(), Some(false));
    }

    #[test]
    fn test_double_select_clears_tint() {
        let (uniforms, mut scene, plane) = stage();
        let mut rgb = RgbFilter::new(&uniforms);

        rgb.set_mode(RgbMode::Green, &mut scene, plane);
        assert_eq!(rgb.set_mode(RgbMode::Green, &mut scene, plane), RgbMode::Default);
        assert_eq!(plane_tint(&mut scene, plane), Color::WHITE);
    }

    #[test]
    fn test_blue_enables_hue_rotation() {
        let (uniforms, mut scene, plane) = stage();
        let mut rgb = RgbFilter::new(&uniforms);

        rgb.set_mode(RgbMode::Blue, &mut scene, plane);
        assert_eq!(uniforms.hue_active.flag(), Some(true));
        let hue = uniforms.hue.scalar().unwrap();
        assert!((hue - 230.0 / 360.0).abs() < 1e-6);
    }

    #[test]
    fn test_enable_recalls_last_preset() {
        let (uniforms, mut scene, plane) = stage();
        let mut rgb = RgbFilter::new(&uniforms);

        rgb.set_mode(RgbMode::RedBlue, &mut scene, plane);
        rgb.disable(&mut scene, plane);
        assert_eq!(rgb.enable(&mut scene, plane), RgbMode::RedBlue);
    }

    #[test]
    fn test_enable_defaults_to_green() {
        let (uniforms, mut scene, plane) = stage();
        let mut rgb = RgbFilter::new(&uniforms);
        assert_eq!(rgb.enable(&mut scene, plane), RgbMode::Green);
    }
}
