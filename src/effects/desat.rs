//! Desaturation effect.

use super::DESAT_LEVELS;
use crate::shader::{EffectUniforms, UniformHandle};

/// Steps the picture's saturation through [`DESAT_LEVELS`].
///
/// Selecting the level that is already applied snaps back to full
/// saturation, so repeated clicks on one step toggle it.
pub struct DesatFilter {
    uniform: UniformHandle,
    saturation: f32,
    last_index: Option<usize>,
}

impl DesatFilter {
    /// Create the filter at full saturation.
    pub fn new(uniforms: &EffectUniforms) -> Self {
        let uniform = uniforms.saturation.clone();
        uniform.set_scalar(DESAT_LEVELS[3]);
        Self {
            uniform,
            saturation: DESAT_LEVELS[3],
            last_index: None,
        }
    }

    /// Select a saturation step.
    ///
    /// Returns the selected index for persistence.
    pub fn set_level(&mut self, index: usize) -> usize {
        let index = index.min(DESAT_LEVELS.len() - 1);
        self.last_index = Some(index);
        let level = DESAT_LEVELS[index];
        self.saturation = if self.saturation == level {
            DESAT_LEVELS[3]
        } else {
            level
        };
        self.uniform.set_scalar(self.saturation);
        log::info!("DESAT {}", self.saturation);
        index
    }

    /// Activate with the last used step, or the first dimmed one.
    ///
    /// Returns the applied index for persistence. Index 0 (full
    /// desaturation) is never re-applied on activation.
    pub fn enable(&mut self) -> usize {
        let index = match self.last_index {
            Some(i) if i != 0 => i,
            _ => 1,
        };
        self.saturation = DESAT_LEVELS[index];
        self.uniform.set_scalar(self.saturation);
        index
    }

    /// Restore full saturation.
    pub fn disable(&mut self) {
        self.saturation = DESAT_LEVELS[3];
        self.uniform.set_scalar(self.saturation);
    }

    /// Apply a persisted step directly, without toggle semantics.
    pub fn restore(&mut self, index: usize) {
        let index = index.min(DESAT_LEVELS.len() - 1);
        self.saturation = DESAT_LEVELS[index];
        self.last_index = Some(index);
        self.uniform.set_scalar(self.saturation);
    }

    /// The currently applied saturation.
    #[inline]
    pub fn saturation(&self) -> f32 {
        self.saturation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_level_toggles_back_to_full() {
        let uniforms = EffectUniforms::new();
        let mut desat = DesatFilter::new(&uniforms);

        desat.set_level(1);
        assert_eq!(desat.saturation(), DESAT_LEVELS[1]);
        desat.set_level(1);
        assert_eq!(desat.saturation(), DESAT_LEVELS[3]);
        desat.set_level(1);
        assert_eq!(desat.saturation(), DESAT_LEVELS[1]);
    }

    #[test]
    fn test_enable_recalls_last_step() {
        let uniforms = EffectUniforms::new();
        let mut desat = DesatFilter::new(&uniforms);

        assert_eq!(desat.enable(), 1);
        desat.set_level(2);
        desat.disable();
        assert_eq!(desat.saturation(), DESAT_LEVELS[3]);
        assert_eq!(desat.enable(), 2);
        assert_eq!(desat.saturation(), DESAT_LEVELS[2]);
    }

    #[test]
    fn test_enable_skips_fully_desaturated_step() {
        let uniforms = EffectUniforms::new();
        let mut desat = DesatFilter::new(&uniforms);

        desat.set_level(0);
        desat.disable();
        assert_eq!(desat.enable(), 1);
    }

    #[test]
    fn test_writes_shared_uniform() {
        let uniforms = EffectUniforms::new();
        let mut desat = DesatFilter::new(&uniforms);

        desat.set_level(2);
        assert_eq!(uniforms.saturation.scalar(), Some(DESAT_LEVELS[2]));
    }
}
