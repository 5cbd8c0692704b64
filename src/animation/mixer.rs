//! Drives a set of actions against a scene.

use super::AnimationAction;
use crate::scene::{NodeId, Scene};
use std::collections::HashMap;

/// Advances actions and writes sampled rotations into scene nodes.
#[derive(Default)]
pub struct AnimationMixer {
    actions: Vec<AnimationAction>,
    bindings: HashMap<String, NodeId>,
}

impl AnimationMixer {
    /// Create an empty mixer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action and return its index.
    pub fn add_action(&mut self, action: AnimationAction) -> usize {
        self.actions.push(action);
        self.actions.len() - 1
    }

    /// Resolve every track target against the scene by node name.
    ///
    /// Unresolved targets are skipped during update; loaded models own
    /// their node names, so a miss means the model changed shape.
    pub fn bind(&mut self, scene: &Scene) {
        self.bindings.clear();
        for action in &self.actions {
            for track in &action.clip.tracks {
                if let Some(id) = scene.find(&track.target) {
                    self.bindings.insert(track.target.clone(), id);
                } else {
                    log::warn!("animation target not found: {}", track.target);
                }
            }
        }
    }

    /// Borrow the actions.
    pub fn actions(&self) -> &[AnimationAction] {
        &self.actions
    }

    /// Mutably borrow the actions.
    pub fn actions_mut(&mut self) -> &mut [AnimationAction] {
        &mut self.actions
    }

    /// Whether any action still has keyframes ahead.
    pub fn any_running(&self) -> bool {
        self.actions.iter().any(|a| a.is_running())
    }

    /// Advance all actions and apply sampled poses to the scene.
    pub fn update(&mut self, delta: f32, scene: &mut Scene) {
        for action in &mut self.actions {
            action.update(delta);
        }
        for action in &self.actions {
            for (target, rotation) in action.sample() {
                if let Some(&id) = self.bindings.get(target) {
                    scene.node_mut(id).transform.rotation = rotation;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationClip;
    use crate::scene::Node;
    use std::sync::Arc;

    #[test]
    fn test_mixer_applies_rotation() {
        let mut scene = Scene::new();
        scene.add(Node::new("prism_0"));

        let mut mixer = AnimationMixer::new();
        let clip = Arc::new(AnimationClip::spin("spin", "prism_0", 2.0, 1.0));
        let index = mixer.add_action(AnimationAction::new(clip));
        mixer.bind(&scene);

        mixer.actions_mut()[index].play(0.0, 2.0);
        mixer.update(1.0, &mut scene);

        let id = scene.find("prism_0").unwrap();
        let y = scene.node(id).transform.rotation.y;
        assert!((y - std::f32::consts::PI).abs() < 1e-4);
    }

    #[test]
    fn test_stagger_ordering() {
        let mut scene = Scene::new();
        scene.add(Node::new("a"));
        scene.add(Node::new("b"));

        let mut mixer = AnimationMixer::new();
        let clip_a = Arc::new(AnimationClip::spin("spin_a", "a", 1.0, 1.0));
        let clip_b = Arc::new(AnimationClip::spin("spin_b", "b", 1.0, 1.0));
        let a = mixer.add_action(AnimationAction::new(clip_a));
        let b = mixer.add_action(AnimationAction::new(clip_b));
        mixer.bind(&scene);

        mixer.actions_mut()[a].play(0.0, 1.0);
        mixer.actions_mut()[b].play(0.3, 1.0);
        mixer.update(0.2, &mut scene);

        let ya = scene.node(scene.find("a").unwrap()).transform.rotation.y;
        let yb = scene.node(scene.find("b").unwrap()).transform.rotation.y;
        assert!(ya > 0.0);
        assert_eq!(yb, 0.0);
    }
}
