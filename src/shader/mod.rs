//! # Shader Module
//!
//! Uniform registry shared between effect modules and the video
//! material, and the textual injector that splices the effect chain
//! into the base shader.

mod injector;
mod uniforms;

pub use injector::{inject, ShaderError, DECLARATION_ANCHOR, OUTPUT_ANCHOR};
pub use uniforms::{EffectUniforms, UniformHandle, UniformRegistry, UniformValue};

/// Base shader for the video quad and video-mapped surfaces.
pub const VIDEO_SHADER: &str = include_str!("../shaders/video.wgsl");

/// Shader for loaded effect-scene models.
pub const STANDARD_SHADER: &str = include_str!("../shaders/standard.wgsl");

const EFFECT_FUNCTIONS: &str = include_str!("../shaders/effects_declare.wgsl");
const EFFECT_OUTPUT: &str = include_str!("../shaders/effects_output.wgsl");

/// Bind group index of the injected effect uniforms.
pub const EFFECT_UNIFORM_GROUP: u32 = 3;

/// Assemble the full video shader: generated uniform declaration,
/// helper functions, and the output chain, spliced into the base
/// source.
pub fn build_video_shader(uniforms: &EffectUniforms) -> Result<String, ShaderError> {
    let mut declarations = uniforms.registry().wgsl_declaration(EFFECT_UNIFORM_GROUP, 0);
    declarations.push('\n');
    declarations.push_str(EFFECT_FUNCTIONS);
    inject(VIDEO_SHADER, &declarations, EFFECT_OUTPUT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_video_shader() {
        let uniforms = EffectUniforms::new();
        let shader = build_video_shader(&uniforms).unwrap();
        assert!(shader.contains("struct EffectUniforms"));
        assert!(shader.contains("fx_toon"));
        assert!(!shader.contains(DECLARATION_ANCHOR));
        assert!(!shader.contains(OUTPUT_ANCHOR));
    }
}
