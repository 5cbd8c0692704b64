//! Loaded model data and scene instantiation.

use crate::animation::AnimationClip;
use crate::geometry::{Geometry, Vertex};
use crate::material::{Material, StandardMaterial};
use crate::math::{Color, Vector3};
use crate::scene::{Mesh, Node, NodeId, Scene, Transform};
use crate::texture::Texture2D;

/// Raw geometry arrays from a loaded model.
#[derive(Debug, Clone, Default)]
pub struct LoadedGeometry {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals.
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates.
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices.
    pub indices: Vec<u32>,
}

impl LoadedGeometry {
    /// Interleave into engine geometry.
    pub fn to_geometry(&self) -> Geometry {
        let vertices = self
            .positions
            .iter()
            .enumerate()
            .map(|(i, &position)| Vertex {
                position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 0.0, 1.0]),
                uv: self.uvs.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect();
        Geometry::new(vertices, self.indices.clone())
    }
}

/// Material parameters from a loaded model.
pub struct LoadedMaterial {
    /// Base color.
    pub color: Color,
    /// Emissive color.
    pub emissive: Color,
    /// Emissive intensity.
    pub emissive_intensity: f32,
    /// Base color texture.
    pub map: Option<Texture2D>,
}

impl Default for LoadedMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            emissive: Color::BLACK,
            emissive_intensity: 0.0,
            map: None,
        }
    }
}

/// One named mesh of a loaded model.
pub struct LoadedMesh {
    /// Node name; effect modules look meshes up by these.
    pub name: String,
    /// Local position.
    pub position: Vector3,
    /// Local Euler rotation.
    pub rotation: Vector3,
    /// Local scale.
    pub scale: Vector3,
    /// Geometry arrays.
    pub geometry: LoadedGeometry,
    /// Material parameters.
    pub material: LoadedMaterial,
}

/// A complete loaded model with its animations.
pub struct LoadedModel {
    /// Meshes.
    pub meshes: Vec<LoadedMesh>,
    /// Animation clips shipped with the model.
    pub animations: Vec<AnimationClip>,
}

impl LoadedModel {
    /// Instantiate every mesh as a child of `parent`.
    pub fn instantiate(self, scene: &mut Scene, parent: NodeId) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(self.meshes.len());
        for mesh in self.meshes {
            let material = StandardMaterial {
                color: mesh.material.color,
                emissive: mesh.material.emissive,
                emissive_intensity: mesh.material.emissive_intensity,
                map: mesh.material.map,
            };
            let node = Node::new(mesh.name)
                .with_transform(Transform {
                    position: mesh.position,
                    rotation: mesh.rotation,
                    scale: mesh.scale,
                })
                .with_mesh(Mesh {
                    geometry: mesh.geometry.to_geometry(),
                    material: Material::Standard(material),
                });
            ids.push(scene.add_child(parent, node));
        }
        ids
    }
}
