//! Textual shader injection.
//!
//! The base video shader carries two anchor comments; the effect chain
//! is spliced in at those points before the module is compiled. A
//! missing anchor means the base material contract is broken, so
//! injection fails loudly instead of silently producing an
//! effect-less shader.

use thiserror::Error;

/// Anchor for uniform and helper-function declarations.
pub const DECLARATION_ANCHOR: &str = "//<frostfx_declarations>";

/// Anchor for the final color transformation.
pub const OUTPUT_ANCHOR: &str = "//<frostfx_output>";

/// Errors raised during shader assembly.
#[derive(Error, Debug)]
pub enum ShaderError {
    /// An injection anchor was not found in the base shader.
    #[error("Shader injection anchor not found: {anchor}")]
    AnchorMissing {
        /// The anchor that was expected.
        anchor: &'static str,
    },
}

/// Splice `declarations` and `output` into `source` at the two anchors.
pub fn inject(
    source: &str,
    declarations: &str,
    output: &str,
) -> Result<String, ShaderError> {
    if !source.contains(DECLARATION_ANCHOR) {
        return Err(ShaderError::AnchorMissing {
            anchor: DECLARATION_ANCHOR,
        });
    }
    if !source.contains(OUTPUT_ANCHOR) {
        return Err(ShaderError::AnchorMissing {
            anchor: OUTPUT_ANCHOR,
        });
    }

    Ok(source
        .replacen(DECLARATION_ANCHOR, declarations, 1)
        .replacen(OUTPUT_ANCHOR, output, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injects_both_anchors() {
        let source = "//<frostfx_declarations>\nfn main() {\n//<frostfx_output>\n}";
        let result = inject(source, "DECL", "OUT").unwrap();
        assert!(result.contains("DECL"));
        assert!(result.contains("OUT"));
        assert!(!result.contains("frostfx_declarations"));
    }

    #[test]
    fn test_missing_output_anchor_fails() {
        let source = "//<frostfx_declarations>\nfn main() {}";
        let err = inject(source, "", "").unwrap_err();
        match err {
            ShaderError::AnchorMissing { anchor } => assert_eq!(anchor, OUTPUT_ANCHOR),
        }
    }

    #[test]
    fn test_missing_declaration_anchor_fails() {
        let err = inject("fn main() {}", "", "").unwrap_err();
        match err {
            ShaderError::AnchorMissing { anchor } => assert_eq!(anchor, DECLARATION_ANCHOR),
        }
    }
}
