//! Shared uniform registry.
//!
//! Effect modules and the video material communicate through shared
//! uniform boxes: a module writes a value, and the next packed upload
//! makes it visible to the shader without a pipeline rebuild. The
//! registry declares the full fixed set at construction, and the WGSL
//! declaration block injected into the base shader is generated from
//! the same table, so uniform presence and shader expectations can
//! never drift apart.

use crate::math::{Color, Vector3};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A value held in a uniform box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// A single float.
    Scalar(f32),
    /// A boolean, packed as 0.0 / 1.0.
    Flag(bool),
    /// An RGB color, packed as vec3.
    Color(Color),
    /// A 3D vector.
    Vec3(Vector3),
}

/// Shared handle to a uniform box.
///
/// Handles are cheap to clone; every clone refers to the same box.
#[derive(Clone)]
pub struct UniformHandle(Arc<RwLock<UniformValue>>);

impl UniformHandle {
    fn new(value: UniformValue) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    /// Read the current value.
    pub fn value(&self) -> UniformValue {
        *self.0.read().expect("uniform lock poisoned")
    }

    /// Overwrite with a scalar.
    pub fn set_scalar(&self, v: f32) {
        *self.0.write().expect("uniform lock poisoned") = UniformValue::Scalar(v);
    }

    /// Overwrite with a flag.
    pub fn set_flag(&self, v: bool) {
        *self.0.write().expect("uniform lock poisoned") = UniformValue::Flag(v);
    }

    /// Overwrite with a color.
    pub fn set_color(&self, v: Color) {
        *self.0.write().expect("uniform lock poisoned") = UniformValue::Color(v);
    }

    /// Overwrite with a vector.
    pub fn set_vec3(&self, v: Vector3) {
        *self.0.write().expect("uniform lock poisoned") = UniformValue::Vec3(v);
    }

    /// Current value as a scalar, if it is one.
    pub fn scalar(&self) -> Option<f32> {
        match self.value() {
            UniformValue::Scalar(v) => Some(v),
            _ => None,
        }
    }

    /// Current value as a flag, if it is one.
    pub fn flag(&self) -> Option<bool> {
        match self.value() {
            UniformValue::Flag(v) => Some(v),
            _ => None,
        }
    }

    /// Current value as a color, if it is one.
    pub fn color(&self) -> Option<Color> {
        match self.value() {
            UniformValue::Color(v) => Some(v),
            _ => None,
        }
    }
}

/// An ordered table of named uniform boxes.
///
/// Declaration order fixes both the WGSL struct layout and the packed
/// buffer layout; both follow std140-like rules (vec3 aligned to 16
/// bytes, scalars packing into the trailing slot).
pub struct UniformRegistry {
    entries: Vec<(String, UniformHandle)>,
    index: HashMap<String, usize>,
}

impl Default for UniformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Declare a uniform and return its handle.
    pub fn declare(&mut self, name: &str, value: UniformValue) -> UniformHandle {
        debug_assert!(
            !self.index.contains_key(name),
            "uniform declared twice: {name}"
        );
        let handle = UniformHandle::new(value);
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push((name.to_string(), handle.clone()));
        handle
    }

    /// Look up a declared uniform.
    pub fn get(&self, name: &str) -> Option<&UniformHandle> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// Generate the WGSL uniform struct and binding declaration.
    pub fn wgsl_declaration(&self, group: u32, binding: u32) -> String {
        let mut out = String::from("struct EffectUniforms {\n");
        for (name, handle) in &self.entries {
            let ty = match handle.value() {
                UniformValue::Scalar(_) | UniformValue::Flag(_) => "f32",
                UniformValue::Color(_) | UniformValue::Vec3(_) => "vec3<f32>",
            };
            out.push_str(&format!("    {name}: {ty},\n"));
        }
        out.push_str("}\n");
        out.push_str(&format!(
            "@group({group}) @binding({binding}) var<uniform> effects: EffectUniforms;\n"
        ));
        out
    }

    /// Pack the current values into a float buffer matching the WGSL
    /// struct layout.
    pub fn pack(&self) -> Vec<f32> {
        let mut out: Vec<f32> = Vec::new();
        for (_, handle) in &self.entries {
            match handle.value() {
                UniformValue::Scalar(v) => out.push(v),
                UniformValue::Flag(v) => out.push(if v { 1.0 } else { 0.0 }),
                UniformValue::Color(c) => {
                    while out.len() % 4 != 0 {
                        out.push(0.0);
                    }
                    out.extend_from_slice(&c.to_array());
                }
                UniformValue::Vec3(v) => {
                    while out.len() % 4 != 0 {
                        out.push(0.0);
                    }
                    out.extend_from_slice(&v.to_array());
                }
            }
        }
        while out.len() % 4 != 0 {
            out.push(0.0);
        }
        out
    }

    /// Size in bytes of the packed buffer.
    pub fn byte_len(&self) -> usize {
        self.pack().len() * 4
    }
}

/// The fixed uniform set driving the injected effect chain.
///
/// Field names match the injected WGSL one-to-one.
pub struct EffectUniforms {
    registry: UniformRegistry,
    /// Render target resolution (width, height, 1).
    pub i_resolution: UniformHandle,
    /// Saturation multiplier; 1.0 is the unfiltered picture.
    pub saturation: UniformHandle,
    /// Hue rotation, normalized 0..1.
    pub hue: UniformHandle,
    /// Whether hue rotation applies.
    pub hue_active: UniformHandle,
    /// Master toon toggle.
    pub is_toon: UniformHandle,
    /// Toon: posterize colors.
    pub is_colors: UniformHandle,
    /// Toon: invert the picture.
    pub is_inverse: UniformHandle,
    /// Toon: draw contour lines only.
    pub is_contours: UniformHandle,
    /// Toon contour line color.
    pub contour_color: UniformHandle,
    /// Toon exposure.
    pub toon_exposure: UniformHandle,
    /// Toon contrast.
    pub toon_contrast: UniformHandle,
    /// Toon brightness offset.
    pub toon_brightness: UniformHandle,
    /// Contour edge threshold (stored pre-inverted as 1 - strength).
    pub contour_strength: UniformHandle,
}

impl Default for EffectUniforms {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectUniforms {
    /// Declare the full uniform table with neutral defaults.
    pub fn new() -> Self {
        let mut registry = UniformRegistry::new();
        let i_resolution =
            registry.declare("i_resolution", UniformValue::Vec3(Vector3::new(1.0, 1.0, 1.0)));
        let saturation = registry.declare("saturation", UniformValue::Scalar(1.0));
        let hue = registry.declare("hue", UniformValue::Scalar(0.0));
        let hue_active = registry.declare("hue_active", UniformValue::Flag(false));
        let is_toon = registry.declare("is_toon", UniformValue::Flag(false));
        let is_colors = registry.declare("is_colors", UniformValue::Flag(false));
        let is_inverse = registry.declare("is_inverse", UniformValue::Flag(false));
        let is_contours = registry.declare("is_contours", UniformValue::Flag(false));
        let toon_exposure = registry.declare("toon_exposure", UniformValue::Scalar(0.0));
        let toon_contrast = registry.declare("toon_contrast", UniformValue::Scalar(0.0));
        let toon_brightness = registry.declare("toon_brightness", UniformValue::Scalar(0.0));
        let contour_strength = registry.declare("contour_strength", UniformValue::Scalar(1.0));
        let contour_color = registry.declare("contour_color", UniformValue::Color(Color::BLACK));

        Self {
            registry,
            i_resolution,
            saturation,
            hue,
            hue_active,
            is_toon,
            is_colors,
            is_inverse,
            is_contours,
            contour_color,
            toon_exposure,
            toon_contrast,
            toon_brightness,
            contour_strength,
        }
    }

    /// The underlying registry.
    #[inline]
    pub fn registry(&self) -> &UniformRegistry {
        &self.registry
    }

    /// Pack the current values for GPU upload.
    pub fn pack(&self) -> Vec<f32> {
        self.registry.pack()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_share_state() {
        let uniforms = EffectUniforms::new();
        let alias = uniforms.saturation.clone();
        alias.set_scalar(0.25);
        assert_eq!(uniforms.saturation.scalar(), Some(0.25));
    }

    #[test]
    fn test_pack_alignment() {
        let uniforms = EffectUniforms::new();
        let packed = uniforms.pack();
        // vec3 + 12 scalars + aligned trailing vec3, padded to 16 bytes.
        assert_eq!(packed.len() % 4, 0);
        // i_resolution occupies the first three floats.
        assert_eq!(&packed[0..3], &[1.0, 1.0, 1.0]);
        // saturation packs into the vec3's trailing slot.
        assert_eq!(packed[3], 1.0);
    }

    #[test]
    fn test_wgsl_declaration_lists_all_fields() {
        let uniforms = EffectUniforms::new();
        let decl = uniforms.registry().wgsl_declaration(3, 0);
        for field in [
            "i_resolution",
            "saturation",
            "hue",
            "hue_active",
            "is_toon",
            "is_colors",
            "is_inverse",
            "is_contours",
            "toon_exposure",
            "toon_contrast",
            "toon_brightness",
            "contour_strength",
            "contour_color",
        ] {
            assert!(decl.contains(field), "missing field {field}");
        }
        assert!(decl.contains("@group(3) @binding(0)"));
    }
}
