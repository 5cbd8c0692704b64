//! Scene graph nodes.

use super::Transform;
use crate::core::Id;
use crate::geometry::Geometry;
use crate::light::Light;
use crate::material::Material;
use crate::math::Matrix4;

/// Handle to a node in a [`Scene`](super::Scene) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Raw arena index.
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A renderable mesh: geometry plus material parameters.
pub struct Mesh {
    /// Triangle data.
    pub geometry: Geometry,
    /// Material parameters; pipelines live in the renderer.
    pub material: Material,
}

/// A node in the scene arena.
///
/// Nodes never hold references to each other; relationships go through
/// [`NodeId`] handles owned by the scene.
pub struct Node {
    /// Unique object id.
    pub id: Id,
    /// Node name, used for lookups into loaded models.
    pub name: String,
    /// Local transform.
    pub transform: Transform,
    /// Local visibility flag.
    pub visible: bool,
    /// Parent handle; `None` only for the root.
    pub(crate) parent: Option<NodeId>,
    /// Child handles.
    pub(crate) children: Vec<NodeId>,
    /// Attached mesh, if any.
    pub mesh: Option<Mesh>,
    /// Attached light, if any.
    pub light: Option<Light>,
    /// World matrix, valid after `Scene::update_world_matrices`.
    pub world_matrix: Matrix4,
    /// Effective visibility (self and all ancestors), same validity.
    pub world_visible: bool,
}

impl Node {
    /// Create an empty named node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Id::new(),
            name: name.into(),
            transform: Transform::default(),
            visible: true,
            parent: None,
            children: Vec::new(),
            mesh: None,
            light: None,
            world_matrix: Matrix4::IDENTITY,
            world_visible: true,
        }
    }

    /// Attach a mesh.
    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// Attach a light.
    pub fn with_light(mut self, light: Light) -> Self {
        self.light = Some(light);
        self
    }

    /// Set the local transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Parent handle.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child handles.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
