//! # Scene Module
//!
//! Flat arena scene graph. Nodes are stored in a `Vec` owned by the
//! scene and addressed by [`NodeId`] handles, so parent/child links are
//! plain indices rather than shared-ownership back-references.

mod node;
mod transform;

pub use node::{Mesh, Node, NodeId};
pub use transform::Transform;

use crate::math::Color;

/// A scene graph arena.
pub struct Scene {
    nodes: Vec<Node>,
    root: NodeId,
    /// Background clear color override.
    pub background: Option<Color>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a scene containing only a root node.
    pub fn new() -> Self {
        let root = Node::new("root");
        Self {
            nodes: vec![root],
            root: NodeId(0),
            background: None,
        }
    }

    /// Root node handle.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Add a node as a child of the root.
    pub fn add(&mut self, node: Node) -> NodeId {
        self.add_child(self.root, node)
    }

    /// Add a node as a child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Borrow a node.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Mutably borrow a node.
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Find the first node with the given name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .map(NodeId)
    }

    /// Iterate all node handles in arena order (parents before children).
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Recompute world matrices and effective visibility.
    ///
    /// Arena order guarantees parents precede children, so a single
    /// forward pass suffices.
    pub fn update_world_matrices(&mut self) {
        for i in 0..self.nodes.len() {
            let local = self.nodes[i].transform.matrix();
            let (world, visible) = match self.nodes[i].parent {
                Some(p) => {
                    let parent = &self.nodes[p.0];
                    (
                        parent.world_matrix.multiply(&local),
                        parent.world_visible && self.nodes[i].visible,
                    )
                }
                None => (local, self.nodes[i].visible),
            };
            self.nodes[i].world_matrix = world;
            self.nodes[i].world_visible = visible;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3;

    #[test]
    fn test_add_and_find() {
        let mut scene = Scene::new();
        let id = scene.add(Node::new("Screen"));
        assert_eq!(scene.find("Screen"), Some(id));
        assert_eq!(scene.find("missing"), None);
    }

    #[test]
    fn test_world_matrix_composition() {
        let mut scene = Scene::new();
        let parent = scene.add(
            Node::new("parent")
                .with_transform(Transform::from_position(Vector3::new(5.0, 0.0, 0.0))),
        );
        let child = scene.add_child(
            parent,
            Node::new("child")
                .with_transform(Transform::from_position(Vector3::new(1.0, 2.0, 0.0))),
        );
        scene.update_world_matrices();
        let m = scene.node(child).world_matrix;
        assert_eq!(m.elements[12], 6.0);
        assert_eq!(m.elements[13], 2.0);
    }

    #[test]
    fn test_hidden_parent_hides_children() {
        let mut scene = Scene::new();
        let parent = scene.add(Node::new("group"));
        let child = scene.add_child(parent, Node::new("leaf"));
        scene.node_mut(parent).visible = false;
        scene.update_world_matrices();
        assert!(!scene.node(child).world_visible);
    }
}
