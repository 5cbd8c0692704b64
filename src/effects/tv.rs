//! TV effect: the video plays on the screen of a retro TV model and a
//! draggable cursor steers the viewpoint.

use super::video_material_mut;
use crate::camera::PerspectiveCamera;
use crate::light::{AmbientLight, Light, PointLight};
use crate::loaders::{AssetSource, LoadRequest, LoadState, ModelPoll};
use crate::material::{Material, VideoMaterial};
use crate::math::{Color, Vector2, Vector3};
use crate::scene::{Node, NodeId, Scene};
use keyframe::functions::{EaseInOutCubic, EaseOutQuad};
use keyframe::ease;

/// TV model URL.
pub const TV_MODEL_URL: &str = "tv/tv.glb";
/// Mesh name of the screen surface inside the TV model.
pub const TV_SCREEN_NAME: &str = "Screen";

const SLOW_ANIMATION: f32 = 2.4;
const FAST_ANIMATION: f32 = 0.6;

enum Easing {
    CubicInOut,
    QuadOut,
}

struct Tween {
    from: Vector3,
    to: Vector3,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl Tween {
    fn sample(&self) -> Vector3 {
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        let k = match self.easing {
            Easing::CubicInOut => ease(EaseInOutCubic, 0.0f32, 1.0, t),
            Easing::QuadOut => ease(EaseOutQuad, 0.0f32, 1.0, t),
        };
        self.from.lerp(&self.to, k)
    }

    fn done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// The TV scene module.
///
/// The camera glides between viewpoints with an eased tween: a fresh
/// drag gets a quick cubic glide, while a drag that interrupts a
/// running glide restarts it slower with a quadratic ease-out so the
/// motion never snaps.
pub struct TvScene {
    plane: NodeId,
    project_ambient: NodeId,

    state: LoadState,
    request: Option<LoadRequest>,
    pending_active: bool,

    model_root: Option<NodeId>,
    screen: Option<NodeId>,
    tv_ambient: Option<NodeId>,
    point_light: Option<NodeId>,

    initial_position: Vector3,
    look_at: Vector3,
    goto_position: Vector3,
    tween: Option<Tween>,

    is_daylight: bool,
    active: bool,
}

impl TvScene {
    /// Create the module; no assets are requested yet.
    pub fn new(plane: NodeId, project_ambient: NodeId) -> Self {
        Self {
            plane,
            project_ambient,
            state: LoadState::Idle,
            request: None,
            pending_active: false,
            model_root: None,
            screen: None,
            tv_ambient: None,
            point_light: None,
            initial_position: Vector3::new(0.0, 0.2, 1.5),
            look_at: Vector3::new(0.0, 0.15, 0.0),
            goto_position: Vector3::new(0.0, 0.0, 1.5),
            tween: None,
            is_daylight: true,
            active: false,
        }
    }

    /// Kick off the model load. Safe to call more than once.
    pub fn begin_loading(&mut self, source: &mut dyn AssetSource) {
        if self.state != LoadState::Idle {
            return;
        }
        self.state = LoadState::Loading;
        self.request = Some(source.load_model(TV_MODEL_URL));
    }

    /// Poll the in-flight load and build the scene pieces when done.
    pub fn poll_assets(&mut self, source: &mut dyn AssetSource, scene: &mut Scene) {
        if self.state != LoadState::Loading {
            return;
        }
        let Some(request) = self.request else {
            return;
        };
        match source.poll_model(request) {
            ModelPoll::Pending => {}
            ModelPoll::Ready(model) => {
                self.request = None;
                self.build_scene(*model, scene);
                self.state = LoadState::Loaded;
            }
            ModelPoll::Failed(err) => {
                log::error!("tv model load failed: {err}");
                self.request = None;
                self.state = LoadState::Failed;
            }
        }
    }

    /// True exactly once when a deferred activation can be applied.
    pub fn ready_to_activate(&mut self) -> bool {
        if self.state == LoadState::Loaded && self.pending_active {
            self.pending_active = false;
            true
        } else {
            false
        }
    }

    /// Activate or deactivate the TV scene.
    ///
    /// Activating before the model arrives defers until it does.
    pub fn toggle(&mut self, active: bool, scene: &mut Scene, camera: &mut PerspectiveCamera) {
        if self.state != LoadState::Loaded {
            self.pending_active = active;
            return;
        }

        self.active = active;
        if active {
            camera.position = self.initial_position;
            camera.look_at(self.look_at);
            if let Some(material) = video_material_mut(scene, self.plane) {
                material.flip_y = false;
            }
            if let Some(root) = self.model_root {
                scene.node_mut(root).visible = true;
            }
            scene.node_mut(self.plane).visible = false;
            log::info!("TV");
        } else {
            if let Some(material) = video_material_mut(scene, self.plane) {
                material.flip_y = true;
            }
            if let Some(root) = self.model_root {
                scene.node_mut(root).visible = false;
            }
            scene.node_mut(self.plane).visible = true;
            self.tween = None;
        }
        self.toggle_lights(scene);
    }

    /// Advance the camera glide by one frame.
    pub fn update(&mut self, delta: f32, camera: &mut PerspectiveCamera) {
        if !self.active {
            return;
        }
        if let Some(tween) = self.tween.as_mut() {
            tween.elapsed += delta;
            camera.position = tween.sample();
            if tween.done() {
                self.tween = None;
            }
        }
        camera.look_at(self.look_at);
    }

    /// Steer the viewpoint from a normalized cursor position.
    ///
    /// Returns the world-space viewpoint for persistence.
    pub fn go_to(&mut self, cursor: Vector2, camera: &PerspectiveCamera) -> Vector2 {
        let x = cursor.x.clamp(0.0, 1.0);
        let y = cursor.y.clamp(-0.05, 0.9);
        let pos_x = (0.5 - x) * -2.45;
        let pos_y = (y - 0.6) * -0.95;

        self.goto_position.x = pos_x;
        self.goto_position.y = pos_y;
        self.initial_position = self.goto_position;
        self.play_animation(camera);
        Vector2::new(pos_x, pos_y)
    }

    /// Switch between day and night lighting.
    pub fn set_daylight(&mut self, daylight: bool, scene: &mut Scene) {
        self.is_daylight = daylight;
        if self.active {
            self.toggle_lights(scene);
        }
        log::info!("TV_LIGHTS {daylight}");
    }

    /// Apply persisted settings without touching the scene.
    pub fn restore(&mut self, viewpoint: Option<Vector2>, daylight: bool) {
        if let Some(p) = viewpoint {
            self.initial_position = Vector3::new(p.x, p.y, self.initial_position.z);
        }
        self.is_daylight = daylight;
    }

    /// Loading lifecycle.
    #[inline]
    pub fn load_state(&self) -> LoadState {
        self.state
    }

    /// Whether the scene graph pieces exist.
    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    /// Whether the TV scene is showing.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether daylight lighting is selected.
    #[inline]
    pub fn is_daylight(&self) -> bool {
        self.is_daylight
    }

    /// Whether a camera glide is in progress.
    #[inline]
    pub fn is_gliding(&self) -> bool {
        self.tween.is_some()
    }

    fn play_animation(&mut self, camera: &PerspectiveCamera) {
        // An interrupted glide restarts slower so the motion stays soft.
        let (easing, duration) = if self.tween.is_some() {
            (Easing::QuadOut, SLOW_ANIMATION)
        } else {
            (Easing::CubicInOut, FAST_ANIMATION)
        };
        self.tween = Some(Tween {
            from: camera.position,
            to: self.goto_position,
            duration,
            elapsed: 0.0,
            easing,
        });
    }

    fn build_scene(&mut self, model: crate::loaders::LoadedModel, scene: &mut Scene) {
        let root = scene.add(Node::new("tv"));
        scene.node_mut(root).visible = false;
        let meshes = model.instantiate(scene, root);

        // The screen mesh shows the filtered video stream instead of
        // its authored material.
        for id in meshes {
            if scene.node(id).name == TV_SCREEN_NAME {
                if let Some(mesh) = scene.node_mut(id).mesh.as_mut() {
                    mesh.material = Material::Video(VideoMaterial {
                        flip_y: false,
                        ..Default::default()
                    });
                }
                self.screen = Some(id);
            }
        }
        if self.screen.is_none() {
            log::warn!("tv model has no {TV_SCREEN_NAME} mesh");
        }

        let tv_ambient = scene.add(
            Node::new("tv_ambient")
                .with_light(Light::Ambient(AmbientLight::new(Color::WHITE, 1.0))),
        );
        let point_light = scene.add(
            Node::new("tv_point").with_light(Light::Point(PointLight::new(
                Color::from_hex(0xfbf2c3),
                1.0,
            ))),
        );
        scene.node_mut(tv_ambient).visible = false;
        scene.node_mut(point_light).visible = false;

        self.model_root = Some(root);
        self.tv_ambient = Some(tv_ambient);
        self.point_light = Some(point_light);
    }

    fn toggle_lights(&mut self, scene: &mut Scene) {
        let (Some(tv_ambient), Some(point_light)) = (self.tv_ambient, self.point_light) else {
            return;
        };

        if self.active {
            if self.is_daylight {
                self.set_screen_glow(scene, 0.0);
                scene.node_mut(point_light).transform.position = Vector3::new(-1.2, 24.8, 1.7);
                set_point_intensity(scene, point_light, 5.0);
                set_ambient_intensity(scene, tv_ambient, 0.9);
            } else {
                self.set_screen_glow(scene, 0.804);
                scene.node_mut(point_light).transform.position = Vector3::new(-1.2, 7.5, -0.9);
                set_point_intensity(scene, point_light, 0.86);
                set_ambient_intensity(scene, tv_ambient, 0.4);
            }
            scene.node_mut(self.project_ambient).visible = false;
            scene.node_mut(point_light).visible = true;
            scene.node_mut(tv_ambient).visible = true;
        } else {
            self.set_screen_glow(scene, 0.0);
            set_ambient_intensity(scene, tv_ambient, 1.0);
            scene.node_mut(self.project_ambient).visible = true;
            scene.node_mut(point_light).visible = false;
            scene.node_mut(tv_ambient).visible = false;
        }
    }

    fn set_screen_glow(&self, scene: &mut Scene, intensity: f32) {
        if let Some(screen) = self.screen {
            if let Some(material) = video_material_mut(scene, screen) {
                material.emissive_intensity = intensity;
            }
        }
    }
}

fn set_ambient_intensity(scene: &mut Scene, id: NodeId, intensity: f32) {
    if let Some(Light::Ambient(light)) = scene.node_mut(id).light.as_mut() {
        light.intensity = intensity;
    }
}

fn set_point_intensity(scene: &mut Scene, id: NodeId, intensity: f32) {
    if let Some(Light::Point(light)) = scene.node_mut(id).light.as_mut() {
        light.intensity = intensity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::{LoadedGeometry, LoadedMaterial, LoadedMesh, LoadedModel, StaticAssetSource};
    use crate::scene::Mesh;

    fn tv_model() -> LoadedModel {
        LoadedModel {
            meshes: vec![
                LoadedMesh {
                    name: "Body".into(),
                    position: Vector3::ZERO,
                    rotation: Vector3::ZERO,
                    scale: Vector3::ONE,
                    geometry: LoadedGeometry::default(),
                    material: LoadedMaterial::default(),
                },
                LoadedMesh {
                    name: TV_SCREEN_NAME.into(),
                    position: Vector3::ZERO,
                    rotation: Vector3::ZERO,
                    scale: Vector3::ONE,
                    geometry: LoadedGeometry::default(),
                    material: LoadedMaterial::default(),
                },
            ],
            animations: Vec::new(),
        }
    }

    fn stage() -> (Scene, NodeId, NodeId, PerspectiveCamera) {
        let mut scene = Scene::new();
        let plane = scene.add(Node::new("plane").with_mesh(Mesh {
            geometry: crate::geometry::plane(1.0, 1.0),
            material: Material::Video(VideoMaterial::default()),
        }));
        let ambient = scene.add(
            Node::new("ambient").with_light(Light::Ambient(AmbientLight::new(Color::WHITE, 1.0))),
        );
        let camera = PerspectiveCamera::new(45.0, 16.0 / 9.0, 0.1, 30.0);
        (scene, plane, ambient, camera)
    }

    fn loaded_tv(scene: &mut Scene, plane: NodeId, ambient: NodeId) -> TvScene {
        let mut source = StaticAssetSource::new();
        source.insert_model(TV_MODEL_URL, tv_model());
        let mut tv = TvScene::new(plane, ambient);
        tv.begin_loading(&mut source);
        tv.poll_assets(&mut source, scene);
        assert!(tv.is_loaded());
        tv
    }

    #[test]
    fn test_screen_gets_video_material() {
        let (mut scene, plane, ambient, _camera) = stage();
        let tv = loaded_tv(&mut scene, plane, ambient);

        let screen = tv.screen.unwrap();
        match &scene.node(screen).mesh.as_ref().unwrap().material {
            Material::Video(material) => assert!(!material.flip_y),
            _ => panic!("screen is not a video material"),
        }
    }

    #[test]
    fn test_deferred_activation() {
        let (mut scene, plane, ambient, mut camera) = stage();
        let mut source = StaticAssetSource::new().with_delay(1);
        source.insert_model(TV_MODEL_URL, tv_model());

        let mut tv = TvScene::new(plane, ambient);
        tv.begin_loading(&mut source);
        tv.toggle(true, &mut scene, &mut camera);
        assert!(!tv.is_active());

        tv.poll_assets(&mut source, &mut scene);
        tv.poll_assets(&mut source, &mut scene);
        assert!(tv.ready_to_activate());
        tv.toggle(true, &mut scene, &mut camera);
        assert!(tv.is_active());
        assert_eq!(camera.position, Vector3::new(0.0, 0.2, 1.5));
    }

    #[test]
    fn test_glide_reaches_target() {
        let (mut scene, plane, ambient, mut camera) = stage();
        let mut tv = loaded_tv(&mut scene, plane, ambient);
        tv.toggle(true, &mut scene, &mut camera);

        let target = tv.go_to(Vector2::new(1.0, 0.9), &camera);
        assert!((target.x - (0.5 - 1.0) * -2.45).abs() < 1e-5);
        assert!(tv.is_gliding());

        for _ in 0..20 {
            tv.update(0.05, &mut camera);
        }
        assert!(!tv.is_gliding());
        assert!((camera.position.x - target.x).abs() < 1e-4);
        assert!((camera.position.y - target.y).abs() < 1e-4);
    }

    #[test]
    fn test_interrupted_glide_slows_down() {
        let (mut scene, plane, ambient, mut camera) = stage();
        let mut tv = loaded_tv(&mut scene, plane, ambient);
        tv.toggle(true, &mut scene, &mut camera);

        tv.go_to(Vector2::new(0.8, 0.5), &camera);
        let fast = tv.tween.as_ref().unwrap().duration;
        tv.update(0.1, &mut camera);
        tv.go_to(Vector2::new(0.2, 0.5), &camera);
        let slow = tv.tween.as_ref().unwrap().duration;
        assert!(slow > fast);
    }

    #[test]
    fn test_night_mode_screen_glow() {
        let (mut scene, plane, ambient, mut camera) = stage();
        let mut tv = loaded_tv(&mut scene, plane, ambient);
        tv.toggle(true, &mut scene, &mut camera);

        tv.set_daylight(false, &mut scene);
        let screen = tv.screen.unwrap();
        match &scene.node(screen).mesh.as_ref().unwrap().material {
            Material::Video(material) => assert_eq!(material.emissive_intensity, 0.804),
            _ => panic!("screen is not a video material"),
        }
    }
}
