//! Billboard effect: a 3D billboard whose face is a ring of spinning
//! triangular prisms showing the video.

use super::{video_material_mut, Direction, SpeedMode, PRISM_COUNTS, SPEED_MODES};
use crate::animation::{AnimationAction, AnimationClip, AnimationMixer};
use crate::camera::PerspectiveCamera;
use crate::light::{AmbientLight, Light, SpotLight};
use crate::loaders::{
    AssetSource, LoadRequest, LoadState, LoadedModel, ModelPoll, TexturePoll,
};
use crate::material::{Material, StandardMaterial, VideoMaterial};
use crate::math::{Color, Vector3};
use crate::scene::{Mesh, Node, NodeId, Scene, Transform};
use crate::texture::Texture2D;
use std::sync::Arc;

/// Billboard model URL.
pub const BILLBOARD_MODEL_URL: &str = "billboard/billboard.glb";
/// Prism model URL.
pub const PRISM_MODEL_URL: &str = "billboard/prism.glb";
/// Daylight backdrop URL.
pub const DAY_BACKGROUND_URL: &str = "images/day-billboard.jpeg";
/// Night backdrop URL.
pub const NIGHT_BACKGROUND_URL: &str = "images/night-billboard.jpeg";

/// Mesh name of the prism's static edge piece.
pub const PRISM_EDGE_NAME: &str = "Cylinder011";

const RIGHT_LIGHT: &str = "Right_Light";
const LEFT_LIGHT: &str = "Left_Light";
const BILLBOARD_WIDTH: f32 = 10.0;

/// Frame events the compositor acts on: freezing captures the current
/// video frame into the snapshot texture, unfreezing releases it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpinEvents {
    /// Capture the live frame into the frozen snapshot now.
    pub freeze: bool,
    /// The spin finished; the snapshot can be released.
    pub unfreeze: bool,
}

struct Prism {
    root: NodeId,
    sides: [NodeId; 3],
}

struct Ring {
    prisms: Vec<Prism>,
    mixer: AnimationMixer,
}

struct LightRig {
    ambient: NodeId,
    spot: NodeId,
    night_1: NodeId,
    night_2: NodeId,
}

struct SpinState {
    elapsed: f32,
    freeze_at: f32,
    stop_at: f32,
    frozen: bool,
}

#[derive(Default)]
struct PendingLoads {
    billboard: Option<LoadRequest>,
    prism: Option<LoadRequest>,
    day: Option<LoadRequest>,
    night: Option<LoadRequest>,
}

/// The billboard scene module.
///
/// Assets load lazily; until they arrive the module stays dormant and
/// an activation request is remembered and applied when loading
/// completes. All three prism rings are built up front and switched by
/// visibility, so changing the prism count never grows the scene.
pub struct BillboardSpinner {
    plane: NodeId,
    project_ambient: NodeId,

    state: LoadState,
    loads: PendingLoads,
    billboard_model: Option<LoadedModel>,
    prism_model: Option<LoadedModel>,
    day_texture: Option<Texture2D>,
    night_texture: Option<Texture2D>,
    pending_active: bool,

    billboard_root: Option<NodeId>,
    billboard_meshes: Vec<NodeId>,
    lights: Option<LightRig>,
    backdrop_day: Option<NodeId>,
    backdrop_night: Option<NodeId>,
    rings: Vec<Ring>,

    speed: SpeedMode,
    speed_index: usize,
    prism_index: usize,
    animation_index: u32,
    is_daylight: bool,
    active: bool,
    is_spinning: bool,
    interval_elapsed: f32,
    spin: Option<SpinState>,
    emissive_intensity: f32,
}

impl BillboardSpinner {
    /// Create the module; no assets are requested yet.
    pub fn new(plane: NodeId, project_ambient: NodeId) -> Self {
        Self {
            plane,
            project_ambient,
            state: LoadState::Idle,
            loads: PendingLoads::default(),
            billboard_model: None,
            prism_model: None,
            day_texture: None,
            night_texture: None,
            pending_active: false,
            billboard_root: None,
            billboard_meshes: Vec::new(),
            lights: None,
            backdrop_day: None,
            backdrop_night: None,
            rings: Vec::new(),
            speed: SPEED_MODES[1],
            speed_index: 1,
            prism_index: 1,
            animation_index: 0,
            is_daylight: true,
            active: false,
            is_spinning: false,
            interval_elapsed: 0.0,
            spin: None,
            emissive_intensity: 1.0,
        }
    }

    /// Kick off asset loading. Safe to call more than once.
    pub fn begin_loading(&mut self, source: &mut dyn AssetSource) {
        if self.state != LoadState::Idle {
            return;
        }
        self.state = LoadState::Loading;
        self.loads.billboard = Some(source.load_model(BILLBOARD_MODEL_URL));
        self.loads.prism = Some(source.load_model(PRISM_MODEL_URL));
        self.loads.day = Some(source.load_texture(DAY_BACKGROUND_URL));
        self.loads.night = Some(source.load_texture(NIGHT_BACKGROUND_URL));
    }

    /// Poll in-flight loads and build the scene once everything landed.
    pub fn poll_assets(&mut self, source: &mut dyn AssetSource, scene: &mut Scene) {
        if self.state != LoadState::Loading {
            return;
        }

        if let Some(request) = self.loads.billboard {
            match source.poll_model(request) {
                ModelPoll::Pending => {}
                ModelPoll::Ready(model) => {
                    self.billboard_model = Some(*model);
                    self.loads.billboard = None;
                }
                ModelPoll::Failed(err) => {
                    log::error!("billboard model load failed: {err}");
                    self.state = LoadState::Failed;
                    return;
                }
            }
        }
        if let Some(request) = self.loads.prism {
            match source.poll_model(request) {
                ModelPoll::Pending => {}
                ModelPoll::Ready(model) => {
                    self.prism_model = Some(*model);
                    self.loads.prism = None;
                }
                ModelPoll::Failed(err) => {
                    log::error!("prism model load failed: {err}");
                    self.state = LoadState::Failed;
                    return;
                }
            }
        }
        if let Some(request) = self.loads.day {
            match source.poll_texture(request) {
                TexturePoll::Pending => {}
                TexturePoll::Ready(texture) => {
                    self.day_texture = Some(*texture);
                    self.loads.day = None;
                }
                TexturePoll::Failed(err) => {
                    log::error!("billboard day backdrop load failed: {err}");
                    self.state = LoadState::Failed;
                    return;
                }
            }
        }
        if let Some(request) = self.loads.night {
            match source.poll_texture(request) {
                TexturePoll::Pending => {}
                TexturePoll::Ready(texture) => {
                    self.night_texture = Some(*texture);
                    self.loads.night = None;
                }
                TexturePoll::Failed(err) => {
                    log::error!("billboard night backdrop load failed: {err}");
                    self.state = LoadState::Failed;
                    return;
                }
            }
        }

        let ready = self.billboard_model.is_some()
            && self.prism_model.is_some()
            && self.day_texture.is_some()
            && self.night_texture.is_some();
        if ready {
            self.build_scene(scene);
            self.state = LoadState::Loaded;
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

    /// Activate or deactivate the billboard scene.
    ///
    /// Activating before the assets arrive defers until they do.
    pub fn toggle(&mut self, active: bool, scene: &mut Scene, camera: &mut PerspectiveCamera) {
        if self.state != LoadState::Loaded {
            self.pending_active = active;
            return;
        }

        self.active = active;
        if active {
            camera.position = Vector3::new(3.4884, 0.1, 10.0);
            camera.set_yaw(-0.08);
            if let Some(material) = video_material_mut(scene, self.plane) {
                material.flip_y = false;
            }
            if let Some(root) = self.billboard_root {
                scene.node_mut(root).visible = true;
            }
            scene.node_mut(self.plane).visible = false;
            self.interval_elapsed = 0.0;
            self.set_ring_visible(scene, true);
            log::info!("BILLBOARD");
        } else {
            if let Some(material) = video_material_mut(scene, self.plane) {
                material.flip_y = true;
            }
            if let Some(root) = self.billboard_root {
                scene.node_mut(root).visible = false;
            }
            scene.node_mut(self.plane).visible = true;
            self.set_ring_visible(scene, false);
            self.finish_spin(scene);
        }
        self.toggle_lights(scene);
    }

    /// Advance spin timers and animations by one frame.
    ///
    /// Only the compositor calls this, and only while the scene is
    /// active and the video is playing; a paused video freezes the
    /// billboard mid-spin.
    pub fn update(&mut self, delta: f32, scene: &mut Scene) -> SpinEvents {
        let mut events = SpinEvents::default();
        if !self.active || self.state != LoadState::Loaded {
            return events;
        }

        self.interval_elapsed += delta;
        if self.interval_elapsed >= self.speed.interval {
            self.interval_elapsed = 0.0;
            self.play_animation();
        }

        self.rings[self.prism_index].mixer.update(delta, scene);

        if let Some(spin) = self.spin.as_mut() {
            spin.elapsed += delta;
            if !spin.frozen && spin.elapsed >= spin.freeze_at {
                spin.frozen = true;
                events.freeze = true;
                freeze_faces(&self.rings[self.prism_index], scene, true);
            }
            if spin.elapsed >= spin.stop_at {
                events.unfreeze = true;
                self.finish_spin(scene);
            }
        }

        events
    }

    /// Start one spin cycle. Ignored while a cycle is running.
    pub fn play_animation(&mut self) {
        if self.is_spinning || self.state != LoadState::Loaded {
            return;
        }
        self.is_spinning = true;

        let ring = &mut self.rings[self.prism_index];
        let count = ring.prisms.len();
        let mut order: Vec<usize> = (0..count).collect();
        match self.speed.direction {
            Direction::Forwards => {}
            Direction::Backwards => order.reverse(),
            Direction::PingPong => {
                self.animation_index += 1;
                if self.animation_index % 2 == 0 {
                    order.reverse();
                }
            }
        }

        for (position, prism) in order.into_iter().enumerate() {
            ring.mixer.actions_mut()[prism]
                .play(position as f32 * self.speed.delay, self.speed.duration);
        }

        self.spin = Some(SpinState {
            elapsed: 0.0,
            freeze_at: self.speed.delay * 2.0,
            stop_at: count as f32 * self.speed.delay + self.speed.duration,
            frozen: false,
        });
    }

    /// Select a speed profile; an active billboard spins immediately.
    pub fn set_speed(&mut self, index: usize) -> usize {
        let index = index.min(SPEED_MODES.len() - 1);
        self.speed_index = index;
        self.speed = SPEED_MODES[index];
        if self.active {
            self.play_animation();
        }
        self.interval_elapsed = 0.0;
        log::info!("BILLBOARD_SPEED_MODE {index}");
        index
    }

    /// Select a prism count; an active billboard switches rings at once.
    pub fn set_prism_count(&mut self, index: usize, scene: &mut Scene) -> usize {
        let index = index.min(PRISM_COUNTS.len() - 1);
        self.finish_spin(scene);
        self.set_ring_visible(scene, false);
        self.prism_index = index;
        if self.active {
            self.set_ring_visible(scene, true);
        }
        log::info!("BILLBOARD_PRISM_COUNT {}", PRISM_COUNTS[index]);
        index
    }

    /// Switch between day and night lighting.
    pub fn set_daylight(&mut self, daylight: bool, scene: &mut Scene) {
        self.is_daylight = daylight;
        if self.active {
            self.toggle_lights(scene);
        }
        log::info!("BILLBOARD_LIGHTS {daylight}");
    }

    /// Apply persisted settings without touching the scene.
    pub fn restore(&mut self, daylight: bool, speed_index: usize, prism_index: usize) {
        self.is_daylight = daylight;
        self.speed_index = speed_index.min(SPEED_MODES.len() - 1);
        self.speed = SPEED_MODES[self.speed_index];
        self.prism_index = prism_index.min(PRISM_COUNTS.len() - 1);
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

    /// Whether the billboard scene is showing.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a spin cycle is running.
    #[inline]
    pub fn is_spinning(&self) -> bool {
        self.is_spinning
    }

    /// Selected speed profile index.
    #[inline]
    pub fn speed_index(&self) -> usize {
        self.speed_index
    }

    /// Selected prism count index.
    #[inline]
    pub fn prism_index(&self) -> usize {
        self.prism_index
    }

    /// Whether daylight lighting is selected.
    #[inline]
    pub fn is_daylight(&self) -> bool {
        self.is_daylight
    }

    fn build_scene(&mut self, scene: &mut Scene) {
        if let Some(model) = self.billboard_model.take() {
            let root = scene.add(
                Node::new("billboard")
                    .with_transform(Transform::from_position(Vector3::new(5.0, 0.0, 0.0))),
            );
            scene.node_mut(root).visible = false;
            self.billboard_meshes = model.instantiate(scene, root);
            self.billboard_root = Some(root);
        }

        self.lights = Some(self.build_lights(scene));

        if let Some(texture) = self.day_texture.take() {
            self.backdrop_day = Some(build_backdrop(scene, "billboard_day_backdrop", texture));
        }
        if let Some(texture) = self.night_texture.take() {
            self.backdrop_night = Some(build_backdrop(scene, "billboard_night_backdrop", texture));
        }

        if let Some(prism) = self.prism_model.take() {
            self.rings = PRISM_COUNTS
                .iter()
                .map(|&count| build_ring(scene, &prism, count))
                .collect();
        }
    }

    fn build_lights(&self, scene: &mut Scene) -> LightRig {
        let ambient = scene.add(
            Node::new("billboard_ambient")
                .with_light(Light::Ambient(AmbientLight::new(Color::WHITE, 1.0))),
        );
        let spot = scene.add(
            Node::new("billboard_spot")
                .with_light(Light::Spot(
                    SpotLight::new(Color::WHITE, 1.5, 1.0)
                        .with_target(Vector3::new(5.0, 0.0, 0.0)),
                ))
                .with_transform(Transform::from_position(Vector3::new(100.0, 50.0, 160.0))),
        );
        let night_1 = scene.add(
            Node::new("billboard_night_1")
                .with_light(Light::Spot(
                    SpotLight::new(Color::from_hex(0xfae0b6), 1.5, 1.0)
                        .with_penumbra(0.85)
                        .with_target(Vector3::new(1.55, 1.0, 0.0)),
                ))
                .with_transform(Transform::from_position(Vector3::new(1.5, 3.2, 2.4))),
        );
        let night_2 = scene.add(
            Node::new("billboard_night_2")
                .with_light(Light::Spot(
                    SpotLight::new(Color::from_hex(0xfae0b6), 1.5, 1.0)
                        .with_penumbra(0.85)
                        .with_target(Vector3::new(7.25, 1.0, 0.0)),
                ))
                .with_transform(Transform::from_position(Vector3::new(7.5, 3.3, 2.2))),
        );
        for id in [ambient, spot, night_1, night_2] {
            scene.node_mut(id).visible = false;
        }
        LightRig {
            ambient,
            spot,
            night_1,
            night_2,
        }
    }

    fn toggle_lights(&mut self, scene: &mut Scene) {
        let Some(rig) = self.lights.as_ref() else {
            return;
        };

        if self.active {
            scene.node_mut(rig.ambient).visible = true;
            scene.node_mut(self.project_ambient).visible = false;
            scene.node_mut(rig.spot).visible = true;
            if self.is_daylight {
                set_backdrop(scene, self.backdrop_day, self.backdrop_night);
                set_spot_color(scene, rig.spot, Color::from_hex(0xffe5d3), 1.0);
                set_ambient(scene, rig.ambient, Color::from_hex(0xffe6e6), 0.5);
                scene.node_mut(rig.night_1).visible = false;
                scene.node_mut(rig.night_2).visible = false;
                self.emissive_intensity = 1.0;
            } else {
                set_backdrop(scene, self.backdrop_night, self.backdrop_day);
                set_spot_color(scene, rig.spot, Color::from_hex(0x7d93ff), 0.4);
                set_ambient(scene, rig.ambient, Color::from_hex(0x8d8dff), 0.0);
                scene.node_mut(rig.night_1).visible = true;
                scene.node_mut(rig.night_2).visible = true;
                self.emissive_intensity = 0.0;
            }
            self.set_emissive(scene);
        } else {
            scene.node_mut(rig.ambient).visible = false;
            scene.node_mut(self.project_ambient).visible = true;
            scene.node_mut(rig.spot).visible = false;
            scene.node_mut(rig.night_1).visible = false;
            scene.node_mut(rig.night_2).visible = false;
            if let Some(day) = self.backdrop_day {
                scene.node_mut(day).visible = false;
            }
            if let Some(night) = self.backdrop_night {
                scene.node_mut(night).visible = false;
            }
        }
    }

    fn set_emissive(&mut self, scene: &mut Scene) {
        for &id in &self.billboard_meshes {
            let is_lamp = {
                let name = scene.node(id).name.as_str();
                name == RIGHT_LIGHT || name == LEFT_LIGHT
            };
            if let Some(Material::Standard(material)) =
                scene.node_mut(id).mesh.as_mut().map(|m| &mut m.material)
            {
                if is_lamp {
                    material.emissive = if self.is_daylight {
                        Color::BLACK
                    } else {
                        Color::WHITE
                    };
                } else {
                    material.emissive_intensity = self.emissive_intensity;
                }
            }
        }
    }

    fn set_ring_visible(&mut self, scene: &mut Scene, visible: bool) {
        if let Some(ring) = self.rings.get(self.prism_index) {
            for prism in &ring.prisms {
                scene.node_mut(prism.root).visible = visible;
            }
        }
    }

    fn finish_spin(&mut self, scene: &mut Scene) {
        if self.spin.take().is_some() || self.is_spinning {
            let ring = &mut self.rings[self.prism_index];
            freeze_faces(ring, scene, false);
            for action in ring.mixer.actions_mut() {
                action.stop();
            }
            for prism in &ring.prisms {
                scene.node_mut(prism.root).transform.rotation = Vector3::ZERO;
            }
        }
        self.is_spinning = false;
        self.spin = None;
    }
}

/// Freeze or unfreeze the forward-facing side of every prism.
fn freeze_faces(ring: &Ring, scene: &mut Scene, frozen: bool) {
    for prism in &ring.prisms {
        // sides[0] is the face showing when the prisms are at rest.
        if let Some(material) = video_material_mut(scene, prism.sides[0]) {
            material.frozen = frozen;
        }
    }
}

fn build_ring(scene: &mut Scene, model: &LoadedModel, count: usize) -> Ring {
    let scale = BILLBOARD_WIDTH / count as f32;
    let (x_pos, z_pos) = ring_offsets(count);

    let mut prisms = Vec::with_capacity(count);
    let mut mixer = AnimationMixer::new();

    for i in 0..count {
        let name = format!("prism_{count}_{i}");
        let root = scene.add(Node::new(name.clone()).with_transform(Transform {
            position: Vector3::new(i as f32 * scale + x_pos, 0.0, z_pos),
            rotation: Vector3::ZERO,
            scale: Vector3::new(scale, 1.0, scale),
        }));
        scene.node_mut(root).visible = false;

        let mut sides = Vec::with_capacity(3);
        let mut side = 0usize;
        for mesh in &model.meshes {
            let mut geometry = mesh.geometry.to_geometry();
            let material;
            if mesh.name == PRISM_EDGE_NAME {
                material = Material::Standard(StandardMaterial {
                    color: Color::from_hex(0xbbbbbb),
                    ..Default::default()
                });
            } else {
                side += 1;
                let offset = i as f32 / 3.0 - (side as f32 / 3.0).fract();
                geometry.remap_uvs(|u, v| {
                    (((u + offset) * 3.0) / count as f32, (v * 2.5).min(1.0))
                });
                material = Material::Video(VideoMaterial {
                    flip_y: false,
                    ..Default::default()
                });
            }
            let id = scene.add_child(
                root,
                Node::new(mesh.name.clone()).with_mesh(Mesh { geometry, material }),
            );
            if mesh.name != PRISM_EDGE_NAME {
                sides.push(id);
            }
        }

        let clip = Arc::new(AnimationClip::spin(format!("spin_{name}"), &name, 1.0, 1.0));
        mixer.add_action(AnimationAction::new(clip));

        // Prism models always carry the edge plus three faces; anything
        // else means the asset changed shape.
        let sides: [NodeId; 3] = match sides.try_into() {
            Ok(sides) => sides,
            Err(_) => {
                log::warn!("prism model does not have three faces");
                [root, root, root]
            }
        };
        prisms.push(Prism { root, sides });
    }

    mixer.bind(scene);
    Ring { prisms, mixer }
}

fn ring_offsets(count: usize) -> (f32, f32) {
    match count {
        8 => (0.1, -0.05),
        12 => (-0.1, 0.05),
        _ => (-0.2, 0.05),
    }
}

fn build_backdrop(scene: &mut Scene, name: &str, texture: Texture2D) -> NodeId {
    let id = scene.add(
        Node::new(name)
            .with_transform(Transform {
                position: Vector3::new(5.0, 0.0, -15.0),
                rotation: Vector3::ZERO,
                scale: Vector3::new(60.0, 30.0, 1.0),
            })
            .with_mesh(Mesh {
                geometry: crate::geometry::plane(1.0, 1.0),
                material: Material::Standard(StandardMaterial {
                    map: Some(texture),
                    ..Default::default()
                }),
            }),
    );
    scene.node_mut(id).visible = false;
    id
}

fn set_backdrop(scene: &mut Scene, show: Option<NodeId>, hide: Option<NodeId>) {
    if let Some(id) = hide {
        scene.node_mut(id).visible = false;
    }
    if let Some(id) = show {
        scene.node_mut(id).visible = true;
    }
}

fn set_spot_color(scene: &mut Scene, id: NodeId, color: Color, intensity: f32) {
    if let Some(Light::Spot(light)) = scene.node_mut(id).light.as_mut() {
        light.color = color;
        light.intensity = intensity;
    }
}

fn set_ambient(scene: &mut Scene, id: NodeId, color: Color, intensity: f32) {
    if let Some(Light::Ambient(light)) = scene.node_mut(id).light.as_mut() {
        light.color = color;
        light.intensity = intensity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::{LoadedGeometry, LoadedMaterial, LoadedMesh, StaticAssetSource};

    fn prism_mesh(name: &str) -> LoadedMesh {
        LoadedMesh {
            name: name.into(),
            position: Vector3::ZERO,
            rotation: Vector3::ZERO,
            scale: Vector3::ONE,
            geometry: LoadedGeometry {
                positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                normals: vec![[0.0, 0.0, 1.0]; 3],
                uvs: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
                indices: vec![0, 1, 2],
            },
            material: LoadedMaterial::default(),
        }
    }

    fn prism_model() -> LoadedModel {
        LoadedModel {
            meshes: vec![
                prism_mesh(PRISM_EDGE_NAME),
                prism_mesh("side_1"),
                prism_mesh("side_2"),
                prism_mesh("side_3"),
            ],
            animations: Vec::new(),
        }
    }

    fn billboard_model() -> LoadedModel {
        LoadedModel {
            meshes: vec![
                prism_mesh("frame"),
                prism_mesh(RIGHT_LIGHT),
                prism_mesh(LEFT_LIGHT),
            ],
            animations: Vec::new(),
        }
    }

    fn source() -> StaticAssetSource {
        let mut source = StaticAssetSource::new();
        source.insert_model(BILLBOARD_MODEL_URL, billboard_model());
        source.insert_model(PRISM_MODEL_URL, prism_model());
        source.insert_texture(DAY_BACKGROUND_URL, Texture2D::white());
        source.insert_texture(NIGHT_BACKGROUND_URL, Texture2D::white());
        source
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

    fn loaded_spinner(scene: &mut Scene, plane: NodeId, ambient: NodeId) -> BillboardSpinner {
        let mut source = source();
        let mut billboard = BillboardSpinner::new(plane, ambient);
        billboard.begin_loading(&mut source);
        billboard.poll_assets(&mut source, scene);
        assert!(billboard.is_loaded());
        billboard
    }

    #[test]
    fn test_deferred_activation() {
        let (mut scene, plane, ambient, mut camera) = stage();
        let mut source = source().with_delay(2);

        let mut billboard = BillboardSpinner::new(plane, ambient);
        billboard.begin_loading(&mut source);
        billboard.toggle(true, &mut scene, &mut camera);
        assert!(!billboard.is_active());
        assert!(!billboard.ready_to_activate());

        billboard.poll_assets(&mut source, &mut scene);
        assert!(!billboard.is_loaded());
        billboard.poll_assets(&mut source, &mut scene);
        billboard.poll_assets(&mut source, &mut scene);
        assert!(billboard.is_loaded());

        assert!(billboard.ready_to_activate());
        billboard.toggle(true, &mut scene, &mut camera);
        assert!(billboard.is_active());
        assert!(!scene.node(plane).visible);
    }

    #[test]
    fn test_ring_switch_keeps_scene_size() {
        let (mut scene, plane, ambient, mut camera) = stage();
        let mut billboard = loaded_spinner(&mut scene, plane, ambient);
        billboard.toggle(true, &mut scene, &mut camera);

        let before = scene.len();
        billboard.set_prism_count(2, &mut scene);
        assert_eq!(scene.len(), before);

        // Only the 15-prism ring's roots are visible now.
        let visible_roots = scene
            .ids()
            .filter(|&id| scene.node(id).name.starts_with("prism_") && scene.node(id).visible)
            .count();
        assert_eq!(visible_roots, 15);
    }

    #[test]
    fn test_spin_freezes_then_stops() {
        let (mut scene, plane, ambient, mut camera) = stage();
        let mut billboard = loaded_spinner(&mut scene, plane, ambient);
        billboard.toggle(true, &mut scene, &mut camera);

        billboard.play_animation();
        assert!(billboard.is_spinning());

        // Freeze fires at twice the stagger delay.
        let mut froze = false;
        let mut stopped = false;
        for _ in 0..500 {
            let events = billboard.update(0.05, &mut scene);
            froze |= events.freeze;
            if events.unfreeze {
                stopped = true;
                break;
            }
        }
        assert!(froze);
        assert!(stopped);
        assert!(!billboard.is_spinning());
    }

    #[test]
    fn test_ping_pong_reverses_every_other_cycle() {
        let (mut scene, plane, ambient, mut camera) = stage();
        let mut billboard = loaded_spinner(&mut scene, plane, ambient);
        billboard.toggle(true, &mut scene, &mut camera);
        billboard.set_speed(2);
        assert_eq!(billboard.speed_index(), 2);

        // set_speed on an active billboard starts a cycle immediately.
        assert!(billboard.is_spinning());

        // First cycle staggers forwards: prism 0 leads.
        billboard.update(0.2, &mut scene);
        let first = scene.find("prism_12_0").unwrap();
        let last = scene.find("prism_12_11").unwrap();
        assert!(scene.node(first).transform.rotation.y > 0.0);
        assert_eq!(scene.node(last).transform.rotation.y, 0.0);

        // Run the cycle out, then start the next one.
        for _ in 0..200 {
            if billboard.update(0.05, &mut scene).unfreeze {
                break;
            }
        }
        assert!(!billboard.is_spinning());
        billboard.play_animation();
        billboard.update(0.2, &mut scene);

        // Second cycle staggers backwards: the last prism leads.
        assert!(scene.node(last).transform.rotation.y > 0.0);
        assert_eq!(scene.node(first).transform.rotation.y, 0.0);
    }

    #[test]
    fn test_night_mode_lighting() {
        let (mut scene, plane, ambient, mut camera) = stage();
        let mut billboard = loaded_spinner(&mut scene, plane, ambient);
        billboard.toggle(true, &mut scene, &mut camera);

        billboard.set_daylight(false, &mut scene);
        let night = scene.find("billboard_night_1").unwrap();
        assert!(scene.node(night).visible);

        let lamp = scene.find(RIGHT_LIGHT).unwrap();
        match &scene.node(lamp).mesh.as_ref().unwrap().material {
            Material::Standard(material) => assert_eq!(material.emissive, Color::WHITE),
            _ => panic!("lamp is not a standard material"),
        }
    }
}
