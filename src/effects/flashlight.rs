//! Flashlight effect.

use super::AspectRatio;
use crate::light::{AmbientLight, Light, SpotLight};
use crate::math::{Color, Vector2, Vector3};
use crate::scene::{Node, NodeId, Scene, Transform};

/// Cone parameters for one aspect profile.
#[derive(Debug, Clone, Copy)]
struct LightParams {
    large: f32,
    small: f32,
    x: f32,
    y: f32,
}

impl LightParams {
    fn for_aspect(aspect: AspectRatio) -> Self {
        match aspect {
            AspectRatio::FourThree => Self {
                large: 0.12,
                small: 0.08,
                x: -6.5,
                y: -5.0,
            },
            AspectRatio::SixteenNine => Self {
                large: 0.35,
                small: 0.22,
                x: -26.0,
                y: -18.0,
            },
            AspectRatio::TwentyOneTen => Self {
                large: 0.4,
                small: 0.3,
                x: -40.0,
                y: -20.0,
            },
        }
    }
}

/// A draggable spotlight over a darkened picture.
///
/// The spotlight owns one node in the shared scene; activation dims the
/// shared ambient light so the cone stands out. Cursor positions come
/// in normalized 0..1 controller coordinates and map onto the video
/// plane through per-aspect factors.
pub struct Flashlight {
    spot: NodeId,
    params: LightParams,
    is_large: bool,
    active: bool,
}

impl Flashlight {
    /// Create the flashlight, inactive, with its node in the scene.
    pub fn new(scene: &mut Scene, ambient: NodeId, aspect: AspectRatio) -> Self {
        let spot = scene.add(
            Node::new("flashlight")
                .with_light(Light::Spot(
                    SpotLight::new(Color::WHITE, 0.8, 0.22).with_penumbra(0.15),
                ))
                .with_transform(Transform::from_position(Vector3::new(0.0, 0.0, 10.0))),
        );
        let mut flashlight = Self {
            spot,
            params: LightParams::for_aspect(aspect),
            is_large: true,
            active: false,
        };
        flashlight.toggle(false, scene, ambient);
        flashlight
    }

    /// Activate or deactivate the spotlight.
    pub fn toggle(&mut self, active: bool, scene: &mut Scene, ambient: NodeId) {
        self.active = active;
        if active {
            set_ambient_intensity(scene, ambient, 0.2);
            scene.node_mut(self.spot).visible = true;
            log::info!("FLASHLIGHT");
        } else {
            set_ambient_intensity(scene, ambient, 1.0);
            scene.node_mut(self.spot).visible = false;
        }
        self.apply_angle(scene);
    }

    /// Switch between the large and small cone.
    pub fn set_large(&mut self, is_large: bool, scene: &mut Scene) {
        self.is_large = is_large;
        self.apply_angle(scene);
        log::info!("FLASHLIGHT_SIZE {is_large}");
    }

    /// Aim the cone from a normalized cursor position.
    ///
    /// Returns the world-space target for persistence.
    pub fn set_cursor(&mut self, cursor: Vector2, scene: &mut Scene) -> Vector2 {
        let x = cursor.x.clamp(0.2, 0.8);
        let y = cursor.y.clamp(0.18, 0.75);
        let target = Vector2::new((0.5 - x) * self.params.x, (y - 0.5) * self.params.y);
        self.aim(target, scene);
        target
    }

    /// Re-apply a persisted world-space target.
    pub fn restore(&mut self, target: Vector2, scene: &mut Scene) {
        self.aim(target, scene);
    }

    /// Update the cone parameters for a new aspect profile.
    pub fn set_aspect_ratio(&mut self, aspect: AspectRatio) {
        self.params = LightParams::for_aspect(aspect);
    }

    /// Whether the spotlight is on.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the large cone is selected.
    #[inline]
    pub fn is_large(&self) -> bool {
        self.is_large
    }

    /// The spotlight's scene node.
    #[inline]
    pub fn node(&self) -> NodeId {
        self.spot
    }

    fn aim(&self, target: Vector2, scene: &mut Scene) {
        if let Some(Light::Spot(spot)) = scene.node_mut(self.spot).light.as_mut() {
            spot.target = Vector3::new(target.x, target.y, 0.0);
        }
    }

    fn apply_angle(&self, scene: &mut Scene) {
        let angle = if self.is_large {
            self.params.large
        } else {
            self.params.small
        };
        if let Some(Light::Spot(spot)) = scene.node_mut(self.spot).light.as_mut() {
            spot.angle = angle;
        }
    }
}

fn set_ambient_intensity(scene: &mut Scene, ambient: NodeId, intensity: f32) {
    if let Some(Light::Ambient(light)) = scene.node_mut(ambient).light.as_mut() {
        light.intensity = intensity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage() -> (Scene, NodeId) {
        let mut scene = Scene::new();
        let ambient = scene.add(
            Node::new("ambient").with_light(Light::Ambient(AmbientLight::new(Color::WHITE, 1.0))),
        );
        (scene, ambient)
    }

    fn ambient_intensity(scene: &Scene, ambient: NodeId) -> f32 {
        match scene.node(ambient).light {
            Some(Light::Ambient(light)) => light.intensity,
            _ => panic!("not an ambient light"),
        }
    }

    fn spot(scene: &Scene, id: NodeId) -> SpotLight {
        match scene.node(id).light {
            Some(Light::Spot(light)) => light,
            _ => panic!("not a spot light"),
        }
    }

    #[test]
    fn test_toggle_dims_ambient() {
        let (mut scene, ambient) = stage();
        let mut flashlight = Flashlight::new(&mut scene, ambient, AspectRatio::SixteenNine);

        flashlight.toggle(true, &mut scene, ambient);
        assert_eq!(ambient_intensity(&scene, ambient), 0.2);
        assert!(scene.node(flashlight.node()).visible);

        flashlight.toggle(false, &mut scene, ambient);
        assert_eq!(ambient_intensity(&scene, ambient), 1.0);
        assert!(!scene.node(flashlight.node()).visible);
    }

    #[test]
    fn test_cone_size_per_aspect() {
        let (mut scene, ambient) = stage();
        let mut flashlight = Flashlight::new(&mut scene, ambient, AspectRatio::SixteenNine);

        flashlight.toggle(true, &mut scene, ambient);
        assert_eq!(spot(&scene, flashlight.node()).angle, 0.35);

        flashlight.set_large(false, &mut scene);
        assert_eq!(spot(&scene, flashlight.node()).angle, 0.22);

        flashlight.set_aspect_ratio(AspectRatio::FourThree);
        flashlight.set_large(true, &mut scene);
        assert_eq!(spot(&scene, flashlight.node()).angle, 0.12);
    }

    #[test]
    fn test_cursor_clamp_and_mapping() {
        let (mut scene, ambient) = stage();
        let mut flashlight = Flashlight::new(&mut scene, ambient, AspectRatio::SixteenNine);

        // Center of the controller aims at the origin.
        let target = flashlight.set_cursor(Vector2::new(0.5, 0.5), &mut scene);
        assert_eq!(target, Vector2::new(0.0, 0.0));

        // Positions outside the usable band clamp before mapping.
        let target = flashlight.set_cursor(Vector2::new(0.0, 1.0), &mut scene);
        assert!((target.x - (0.5 - 0.2) * -26.0).abs() < 1e-5);
        assert!((target.y - (0.75 - 0.5) * -18.0).abs() < 1e-5);
        assert_eq!(spot(&scene, flashlight.node()).target.x, target.x);
    }
}
