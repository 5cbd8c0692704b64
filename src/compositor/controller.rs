//! Scene state machine and host-event plumbing.

use super::sizing::{canvas_dimensions, CanvasDimensions, RESIZE_INTERVAL, RESIZE_LIMIT};
use crate::camera::{OrthographicCamera, PerspectiveCamera};
use crate::config::Config;
use crate::core::{Clock, Context, Renderer};
use crate::effects::{
    AspectRatio, BillboardSpinner, DesatFilter, Flashlight, RgbFilter, RgbMode, SceneMode,
    ToonFilter, ToonMode, TvScene,
};
use crate::light::{AmbientLight, Light};
use crate::loaders::{AssetSource, LoadState};
use crate::material::{Material, VideoMaterial};
use crate::math::{Color, Vector2, Vector3};
use crate::player::{AudioCue, AudioCues, MediaPlayer, PlayerEvent};
use crate::prefs::{PreferenceSnapshot, PreferenceStorage, PreferenceStore, UiPosition};
use crate::scene::{Mesh, Node, NodeId, Scene};
use crate::shader::EffectUniforms;
use crate::texture::{VideoFrameSource, VideoTexture};

/// Everything that exists only after the first successful size
/// computation: the scene graph, both cameras, and the six effects.
struct Stage {
    scene: Scene,
    ortho: OrthographicCamera,
    persp: PerspectiveCamera,
    plane: NodeId,
    ambient: NodeId,
    uniforms: EffectUniforms,
    video: VideoTexture,
    frozen: Option<VideoTexture>,
    aspect: AspectRatio,
    canvas: Option<CanvasDimensions>,
    desat: DesatFilter,
    toon: ToonFilter,
    rgb: RgbFilter,
    flashlight: Flashlight,
    billboard: BillboardSpinner,
    tv: TvScene,
}

impl Stage {
    /// Deactivate everything but `target`, then activate `target`.
    ///
    /// The deactivation order is fixed per case so the shared plane and
    /// lights always pass through a known state regardless of which
    /// scene was showing before.
    fn apply_scene(&mut self, target: SceneMode, snapshot: &mut PreferenceSnapshot) {
        match target {
            SceneMode::Default => {
                self.toon.set_mode(ToonMode::Default);
                self.flashlight.toggle(false, &mut self.scene, self.ambient);
                self.billboard.toggle(false, &mut self.scene, &mut self.persp);
                self.tv.toggle(false, &mut self.scene, &mut self.persp);
                self.desat.disable();
                self.rgb.disable(&mut self.scene, self.plane);
            }
            SceneMode::Rgb => {
                self.toon.set_mode(ToonMode::Default);
                self.flashlight.toggle(false, &mut self.scene, self.ambient);
                self.billboard.toggle(false, &mut self.scene, &mut self.persp);
                self.toon.toggle(false);
                self.tv.toggle(false, &mut self.scene, &mut self.persp);
                self.desat.disable();
                let mode = self.rgb.enable(&mut self.scene, self.plane);
                if mode != RgbMode::Default {
                    snapshot.rgb_mode = mode;
                }
            }
            SceneMode::Desat => {
                self.toon.set_mode(ToonMode::Default);
                self.flashlight.toggle(false, &mut self.scene, self.ambient);
                self.billboard.toggle(false, &mut self.scene, &mut self.persp);
                self.rgb.disable(&mut self.scene, self.plane);
                self.tv.toggle(false, &mut self.scene, &mut self.persp);
                snapshot.desat_index = self.desat.enable();
            }
            SceneMode::Toon => {
                self.flashlight.toggle(false, &mut self.scene, self.ambient);
                self.billboard.toggle(false, &mut self.scene, &mut self.persp);
                self.desat.disable();
                self.rgb.disable(&mut self.scene, self.plane);
                self.tv.toggle(false, &mut self.scene, &mut self.persp);
                snapshot.toon_mode = self.toon.enable();
            }
            SceneMode::Billboard => {
                self.toon.set_mode(ToonMode::Default);
                self.flashlight.toggle(false, &mut self.scene, self.ambient);
                self.desat.disable();
                self.rgb.disable(&mut self.scene, self.plane);
                self.tv.toggle(false, &mut self.scene, &mut self.persp);
                self.billboard.toggle(true, &mut self.scene, &mut self.persp);
            }
            SceneMode::Flashlight => {
                self.toon.set_mode(ToonMode::Default);
                self.flashlight.toggle(false, &mut self.scene, self.ambient);
                self.billboard.toggle(false, &mut self.scene, &mut self.persp);
                self.desat.disable();
                self.rgb.disable(&mut self.scene, self.plane);
                self.tv.toggle(false, &mut self.scene, &mut self.persp);
                self.flashlight.toggle(true, &mut self.scene, self.ambient);
            }
            SceneMode::Tv => {
                self.toon.set_mode(ToonMode::Default);
                self.flashlight.toggle(false, &mut self.scene, self.ambient);
                self.billboard.toggle(false, &mut self.scene, &mut self.persp);
                self.desat.disable();
                self.rgb.disable(&mut self.scene, self.plane);
                self.tv.toggle(true, &mut self.scene, &mut self.persp);
            }
        }
    }
}

#[derive(Default)]
struct SizePoll {
    elapsed: f32,
    attempts: u32,
}

#[derive(Default)]
struct RestorePoll {
    elapsed: f32,
}

/// Owns the overlay's state machine.
///
/// The controller is GPU-free: it reacts to host player events, drives
/// the effect modules from frame ticks, and persists preferences. The
/// GPU enters only through [`OverlayController::render_frame`].
pub struct OverlayController {
    config: Config,
    store: PreferenceStore,
    snapshot: PreferenceSnapshot,
    pending_restore: Option<PreferenceSnapshot>,
    stage: Option<Stage>,
    is_powered: bool,
    previous_scene: SceneMode,
    is_playing: bool,
    size_poll: Option<SizePoll>,
    restore_poll: Option<RestorePoll>,
    cue_mute: f32,
    clock: Clock,
}

impl OverlayController {
    /// Create the controller; the stored snapshot is fetched now but
    /// applied only once the scene-driven modules finish loading.
    pub fn new(config: Config, storage: Box<dyn PreferenceStorage>) -> Self {
        let mut store = PreferenceStore::new(storage);
        let pending_restore = Some(store.load());
        Self {
            config,
            store,
            snapshot: PreferenceSnapshot::default(),
            pending_restore,
            stage: None,
            is_powered: false,
            previous_scene: SceneMode::Default,
            is_playing: false,
            size_poll: None,
            restore_poll: None,
            cue_mute: 0.0,
            clock: Clock::start_new(),
        }
    }

    /// React to a host player event.
    pub fn handle_event(
        &mut self,
        event: PlayerEvent,
        player: &mut dyn MediaPlayer,
        assets: &mut dyn AssetSource,
    ) {
        match event {
            PlayerEvent::Play => log::info!("PLAY"),
            PlayerEvent::Playing => {
                self.is_playing = true;
                self.update_canvas_size(player, assets);
            }
            PlayerEvent::Pause => {
                log::info!("PAUSE");
                self.is_playing = false;
            }
            PlayerEvent::Ended => {
                log::info!("ENDED");
                self.is_playing = false;
            }
            PlayerEvent::Resize | PlayerEvent::FullscreenChange => {
                if self.stage.is_some() {
                    self.update_canvas_size(player, assets);
                }
            }
            PlayerEvent::LoadedMetadata => {
                // Metadata can complete a pending sizing attempt, but the
                // stage itself still waits for the first `Playing`.
                if self.stage.is_some() || self.size_poll.is_some() {
                    self.update_canvas_size(player, assets);
                }
            }
            PlayerEvent::VolumeChange => {
                self.snapshot.is_muted = player.is_muted();
            }
            PlayerEvent::Seeked | PlayerEvent::RateChange | PlayerEvent::Error => {}
        }
    }

    /// Advance everything by `delta` seconds.
    ///
    /// The host calls this once per frame; it runs the size and restore
    /// polls, asset loading, and the active scene's animation.
    pub fn tick(
        &mut self,
        delta: f32,
        player: &mut dyn MediaPlayer,
        assets: &mut dyn AssetSource,
        cues: &mut dyn AudioCues,
    ) {
        if self.cue_mute > 0.0 {
            self.cue_mute = (self.cue_mute - delta).max(0.0);
        }

        if let Some(mut poll) = self.size_poll.take() {
            poll.elapsed += delta;
            let mut resolved = false;
            while poll.elapsed >= RESIZE_INTERVAL && !resolved {
                poll.elapsed -= RESIZE_INTERVAL;
                poll.attempts += 1;
                let dims = canvas_dimensions(
                    player.video_size().unwrap_or((0, 0)),
                    player.view_size(),
                );
                if let Some(dims) = dims {
                    log::info!("RESIZE {}x{}", dims.width, dims.height);
                    self.ensure_stage(assets);
                    self.set_renderer_size(dims);
                    resolved = true;
                } else if poll.attempts >= RESIZE_LIMIT {
                    log::error!("the video size is unavailable. cannot set the canvas size.");
                    resolved = true;
                }
            }
            if !resolved {
                self.size_poll = Some(poll);
            }
        }

        if let Some(stage) = self.stage.as_mut() {
            stage.billboard.poll_assets(assets, &mut stage.scene);
            stage.tv.poll_assets(assets, &mut stage.scene);
            if stage.billboard.ready_to_activate() {
                stage.billboard.toggle(true, &mut stage.scene, &mut stage.persp);
            }
            if stage.tv.ready_to_activate() {
                stage.tv.toggle(true, &mut stage.scene, &mut stage.persp);
            }
        }

        if let Some(mut poll) = self.restore_poll.take() {
            poll.elapsed += delta;
            if poll.elapsed >= RESIZE_INTERVAL {
                poll.elapsed = 0.0;
                match self.restore_readiness() {
                    Readiness::Ready => self.apply_restore(cues),
                    Readiness::Failed => {
                        log::warn!("scene assets failed to load; skipping preference restore");
                        self.pending_restore = None;
                    }
                    Readiness::Pending => self.restore_poll = Some(poll),
                }
            } else {
                self.restore_poll = Some(poll);
            }
        }

        if let Some(stage) = self.stage.as_mut() {
            if stage.billboard.is_active() && self.is_playing {
                let events = stage.billboard.update(delta, &mut stage.scene);
                if events.freeze {
                    stage.frozen = Some(snapshot_texture(&stage.video));
                }
                if events.unfreeze {
                    stage.frozen = None;
                }
            } else if stage.tv.is_active() {
                stage.tv.update(delta, &mut stage.persp);
            }
        }
    }

    /// Tick with the wall-clock delta since the previous frame.
    ///
    /// The clock belongs to the controller, not the stage, so the size
    /// retry poll keeps moving while the stage does not exist yet.
    pub fn advance(
        &mut self,
        player: &mut dyn MediaPlayer,
        assets: &mut dyn AssetSource,
        cues: &mut dyn AudioCues,
    ) {
        let delta = self.clock.get_delta() as f32;
        self.tick(delta, player, assets, cues);
    }

    /// Select a scene; selecting the active scene powers off.
    pub fn select_scene(&mut self, mode: SceneMode, cues: &mut dyn AudioCues) {
        if self.stage.is_none() {
            log::warn!("scene selected before initialization");
            return;
        }

        self.previous_scene = self.snapshot.current_scene;
        self.is_powered = true;
        let target = if mode == self.snapshot.current_scene {
            SceneMode::Default
        } else {
            mode
        };
        self.snapshot.current_scene = target;
        if target == SceneMode::Default {
            self.is_powered = false;
        }

        if let Some(stage) = self.stage.as_mut() {
            stage.apply_scene(target, &mut self.snapshot);
        }

        self.store.save(&self.snapshot);
        self.cue(cues, scene_cue(target));
    }

    /// Toggle power: off re-selects the active scene, on re-selects the
    /// one showing before power-off.
    pub fn power(&mut self, cues: &mut dyn AudioCues) {
        let selected = if self.is_powered {
            self.snapshot.current_scene
        } else {
            self.previous_scene
        };
        // The power jingle covers the scene switch.
        if !self.snapshot.is_muted {
            self.cue_mute = 0.15;
        }
        if selected != SceneMode::Default {
            self.select_scene(selected, cues);
        }
    }

    /// Mute or unmute, in sync with the host player.
    pub fn set_muted(&mut self, muted: bool, player: &mut dyn MediaPlayer) {
        self.snapshot.is_muted = muted;
        player.set_muted(muted);
        self.store.save(&self.snapshot);
    }

    /// Collapse or expand the panel; `None` flips the current state.
    pub fn toggle_minimized(&mut self, minimize: Option<bool>) {
        self.snapshot.is_minimized = minimize.unwrap_or(!self.snapshot.is_minimized);
        log::info!("MINIMIZE {}", self.snapshot.is_minimized);
        self.store.save(&self.snapshot);
    }

    /// Remember where the user dragged the panel.
    pub fn move_panel(&mut self, top: f32, left: f32) {
        self.snapshot.ui_position = Some(UiPosition { top, left });
        self.store.save(&self.snapshot);
    }

    /// Select a desaturation step.
    pub fn set_desat_level(&mut self, index: usize, cues: &mut dyn AudioCues) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        self.snapshot.desat_index = stage.desat.set_level(index);
        self.store.save(&self.snapshot);
        self.cue(cues, AudioCue::Slide);
    }

    /// Select a toon sub-mode.
    pub fn set_toon_mode(&mut self, mode: ToonMode) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let applied = stage.toon.set_mode(mode);
        if applied != ToonMode::Default {
            self.snapshot.toon_mode = applied;
        }
        self.store.save(&self.snapshot);
    }

    /// Select an RGB tint preset.
    pub fn set_rgb_mode(&mut self, mode: RgbMode) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let applied = stage.rgb.set_mode(mode, &mut stage.scene, stage.plane);
        if applied != RgbMode::Default {
            self.snapshot.rgb_mode = applied;
        }
        self.store.save(&self.snapshot);
    }

    /// Switch the flashlight cone size.
    pub fn set_flashlight_size(&mut self, is_large: bool) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        stage.flashlight.set_large(is_large, &mut stage.scene);
        self.snapshot.flashlight_is_large = is_large;
        self.store.save(&self.snapshot);
    }

    /// Aim the flashlight from a normalized cursor position.
    pub fn drag_flashlight(&mut self, cursor: Vector2) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let target = stage.flashlight.set_cursor(cursor, &mut stage.scene);
        self.snapshot.flashlight_position = Some(cursor);
        self.snapshot.flashlight_target = Some(target);
        self.store.save(&self.snapshot);
    }

    /// Select a billboard speed profile.
    pub fn set_billboard_speed(&mut self, index: usize) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        self.snapshot.billboard_speed_mode = stage.billboard.set_speed(index);
        self.store.save(&self.snapshot);
    }

    /// Select a billboard prism count.
    pub fn set_billboard_prisms(&mut self, index: usize) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        self.snapshot.billboard_prism_count =
            stage.billboard.set_prism_count(index, &mut stage.scene);
        self.store.save(&self.snapshot);
    }

    /// Switch billboard day/night lighting.
    pub fn set_billboard_daylight(&mut self, daylight: bool) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        stage.billboard.set_daylight(daylight, &mut stage.scene);
        self.snapshot.billboard_is_day_light = daylight;
        self.store.save(&self.snapshot);
    }

    /// Switch TV day/night lighting.
    pub fn set_tv_daylight(&mut self, daylight: bool) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        stage.tv.set_daylight(daylight, &mut stage.scene);
        self.snapshot.tv_is_daylight = daylight;
        self.store.save(&self.snapshot);
    }

    /// Steer the TV viewpoint from a normalized cursor position.
    pub fn drag_tv(&mut self, cursor: Vector2) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let viewpoint = stage.tv.go_to(cursor, &stage.persp);
        self.snapshot.tv_cursor_position = Some(cursor);
        self.snapshot.tv_go_to_position = Some(viewpoint);
        self.store.save(&self.snapshot);
    }

    /// Draw the current frame.
    pub fn render_frame(
        &mut self,
        context: &Context,
        renderer: &mut Renderer,
        source: &mut dyn VideoFrameSource,
    ) -> Result<(), wgpu::SurfaceError> {
        let Some(stage) = self.stage.as_mut() else {
            return Ok(());
        };
        stage.video.update(source);
        let view_proj = if stage.billboard.is_active() || stage.tv.is_active() {
            stage.persp.view_projection()
        } else {
            stage.ortho.view_projection()
        };
        renderer.render(
            context,
            &mut stage.scene,
            &view_proj,
            &stage.uniforms,
            &mut stage.video,
            stage.frozen.as_mut(),
        )
    }

    /// Drop the stage and every in-flight poll.
    pub fn release(&mut self) {
        self.stage = None;
        self.size_poll = None;
        self.restore_poll = None;
        self.pending_restore = None;
        self.is_playing = false;
    }

    /// Whether the stage was built.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.stage.is_some()
    }

    /// The active scene.
    #[inline]
    pub fn current_scene(&self) -> SceneMode {
        self.snapshot.current_scene
    }

    /// Whether any scene is active.
    #[inline]
    pub fn is_powered(&self) -> bool {
        self.is_powered
    }

    /// Whether playback is running.
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// The live preference state.
    #[inline]
    pub fn snapshot(&self) -> &PreferenceSnapshot {
        &self.snapshot
    }

    /// Construction options.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The overlay canvas size, once known.
    pub fn canvas_size(&self) -> Option<CanvasDimensions> {
        self.stage.as_ref().and_then(|stage| stage.canvas)
    }

    /// The classified picture aspect profile.
    pub fn aspect_ratio(&self) -> Option<AspectRatio> {
        self.stage.as_ref().map(|stage| stage.aspect)
    }

    /// Whether `mode`'s effect is actually showing.
    pub fn is_scene_active(&self, mode: SceneMode) -> bool {
        let Some(stage) = self.stage.as_ref() else {
            return false;
        };
        match mode {
            SceneMode::Default => !self.is_powered,
            SceneMode::Flashlight => stage.flashlight.is_active(),
            SceneMode::Billboard => stage.billboard.is_active(),
            SceneMode::Tv => stage.tv.is_active(),
            SceneMode::Toon => stage.toon.is_active(),
            SceneMode::Desat | SceneMode::Rgb => self.snapshot.current_scene == mode,
        }
    }

    fn update_canvas_size(&mut self, player: &mut dyn MediaPlayer, assets: &mut dyn AssetSource) {
        let dims = canvas_dimensions(player.video_size().unwrap_or((0, 0)), player.view_size());
        match dims {
            Some(dims) => {
                log::info!("RESIZE {}x{}", dims.width, dims.height);
                self.ensure_stage(assets);
                self.set_renderer_size(dims);
                self.size_poll = None;
            }
            None => {
                self.size_poll = Some(SizePoll::default());
            }
        }
    }

    fn ensure_stage(&mut self, assets: &mut dyn AssetSource) {
        if self.stage.is_some() {
            return;
        }

        let uniforms = EffectUniforms::new();
        let mut scene = Scene::new();
        let plane = scene.add(Node::new("plane").with_mesh(Mesh {
            geometry: crate::geometry::plane(1.0, 1.0),
            material: Material::Video(VideoMaterial::default()),
        }));
        let ambient = scene.add(
            Node::new("ambient").with_light(Light::Ambient(AmbientLight::new(Color::WHITE, 1.0))),
        );

        let desat = DesatFilter::new(&uniforms);
        let toon = ToonFilter::new(&uniforms, AspectRatio::default());
        let rgb = RgbFilter::new(&uniforms);
        let flashlight = Flashlight::new(&mut scene, ambient, AspectRatio::default());
        let mut billboard = BillboardSpinner::new(plane, ambient);
        let mut tv = TvScene::new(plane, ambient);
        billboard.begin_loading(assets);
        tv.begin_loading(assets);

        self.stage = Some(Stage {
            scene,
            ortho: OrthographicCamera::new(-8.0, 8.0, 4.5, -4.5, 0.0, 100.0),
            persp: PerspectiveCamera::new(50.0, 1.0, 0.1, 30.0),
            plane,
            ambient,
            uniforms,
            video: VideoTexture::new(2, 2),
            frozen: None,
            aspect: AspectRatio::default(),
            canvas: None,
            desat,
            toon,
            rgb,
            flashlight,
            billboard,
            tv,
        });
        self.restore_poll = Some(RestorePoll::default());
    }

    fn set_renderer_size(&mut self, dims: CanvasDimensions) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let aspect = AspectRatio::from_ratio(dims.aspect_ratio);
        let (half_w, half_h) = aspect.half_extents();

        stage.ortho.set_extents(half_w, half_h);
        stage.persp.set_aspect(dims.aspect_ratio);
        let plane = stage.scene.node_mut(stage.plane);
        plane.transform.scale.x = half_w * 2.0;
        plane.transform.scale.y = half_h * 2.0;
        stage
            .uniforms
            .i_resolution
            .set_vec3(Vector3::new(dims.width, dims.height, 1.0));
        stage.toon.set_aspect_ratio(aspect);
        stage.flashlight.set_aspect_ratio(aspect);
        stage.aspect = aspect;
        stage.canvas = Some(dims);
    }

    fn restore_readiness(&self) -> Readiness {
        let Some(stage) = self.stage.as_ref() else {
            return Readiness::Pending;
        };
        if stage.billboard.load_state() == LoadState::Failed
            || stage.tv.load_state() == LoadState::Failed
        {
            return Readiness::Failed;
        }
        if stage.billboard.is_loaded() && stage.tv.is_loaded() {
            Readiness::Ready
        } else {
            Readiness::Pending
        }
    }

    fn apply_restore(&mut self, cues: &mut dyn AudioCues) {
        let Some(stored) = self.pending_restore.take() else {
            return;
        };

        self.previous_scene = stored.current_scene;
        let desat_index = stored.desat_index;
        let is_muted = self.config.is_muted || stored.is_muted;
        self.snapshot = stored;
        self.snapshot.current_scene = SceneMode::Default;
        self.snapshot.is_muted = is_muted;
        // Stay silent while the restored scene re-activates.
        self.cue_mute = 0.2;

        if let Some(stage) = self.stage.as_mut() {
            if let Some(target) = self.snapshot.flashlight_target {
                stage.flashlight.restore(target, &mut stage.scene);
            }
            stage
                .flashlight
                .set_large(self.snapshot.flashlight_is_large, &mut stage.scene);
            stage.billboard.restore(
                self.snapshot.billboard_is_day_light,
                self.snapshot.billboard_speed_mode,
                self.snapshot.billboard_prism_count,
            );
            stage.toon.restore(self.snapshot.toon_mode);
            stage.rgb.restore(self.snapshot.rgb_mode);
            stage
                .tv
                .restore(self.snapshot.tv_go_to_position, self.snapshot.tv_is_daylight);
        }

        match self.previous_scene {
            SceneMode::Default => {}
            SceneMode::Desat => {
                self.select_scene(SceneMode::Desat, cues);
                if let Some(stage) = self.stage.as_mut() {
                    stage.desat.restore(desat_index);
                }
                self.snapshot.desat_index = desat_index;
                self.store.save(&self.snapshot);
            }
            scene => self.select_scene(scene, cues),
        }
        log::info!("RESTORE");
    }

    fn cue(&self, cues: &mut dyn AudioCues, cue: AudioCue) {
        if !self.snapshot.is_muted && self.cue_mute <= 0.0 {
            cues.trigger(cue);
        }
    }
}

enum Readiness {
    Pending,
    Ready,
    Failed,
}

fn scene_cue(mode: SceneMode) -> AudioCue {
    match mode {
        SceneMode::Default => AudioCue::Click,
        SceneMode::Flashlight => AudioCue::FlashlightMode,
        SceneMode::Billboard => AudioCue::BillboardMode,
        SceneMode::Desat => AudioCue::DesatMode,
        SceneMode::Toon => AudioCue::ToonMode,
        SceneMode::Rgb => AudioCue::RgbMode,
        SceneMode::Tv => AudioCue::TvMode,
    }
}

/// Capture the live pixels into a texture that ignores further updates.
fn snapshot_texture(video: &VideoTexture) -> VideoTexture {
    let mut snapshot = VideoTexture::new(video.width, video.height);
    snapshot.pixels = video.pixels.clone();
    snapshot.flip_y = video.flip_y;
    snapshot.freeze();
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{
        BILLBOARD_MODEL_URL, DAY_BACKGROUND_URL, NIGHT_BACKGROUND_URL, PRISM_EDGE_NAME,
        PRISM_MODEL_URL, TV_MODEL_URL, TV_SCREEN_NAME,
    };
    use crate::loaders::{
        LoadedGeometry, LoadedMaterial, LoadedMesh, LoadedModel, StaticAssetSource,
    };
    use crate::prefs::MemoryStorage;
    use crate::texture::Texture2D;

    struct FakePlayer {
        video: Option<(u32, u32)>,
        view: (u32, u32),
        muted: bool,
        paused: bool,
    }

    impl FakePlayer {
        fn new() -> Self {
            Self {
                video: Some((1920, 1080)),
                view: (1280, 720),
                muted: false,
                paused: false,
            }
        }
    }

    impl MediaPlayer for FakePlayer {
        fn play(&mut self) {
            self.paused = false;
        }
        fn pause(&mut self) {
            self.paused = true;
        }
        fn is_paused(&self) -> bool {
            self.paused
        }
        fn current_time(&self) -> f64 {
            0.0
        }
        fn duration(&self) -> f64 {
            0.0
        }
        fn is_muted(&self) -> bool {
            self.muted
        }
        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }
        fn video_size(&self) -> Option<(u32, u32)> {
            self.video
        }
        fn view_size(&self) -> (u32, u32) {
            self.view
        }
    }

    #[derive(Default)]
    struct CueRecorder {
        cues: Vec<AudioCue>,
    }

    impl AudioCues for CueRecorder {
        fn trigger(&mut self, cue: AudioCue) {
            self.cues.push(cue);
        }
    }

    fn mesh(name: &str) -> LoadedMesh {
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

    fn assets() -> StaticAssetSource {
        let mut source = StaticAssetSource::new();
        source.insert_model(
            BILLBOARD_MODEL_URL,
            LoadedModel {
                meshes: vec![mesh("frame")],
                animations: Vec::new(),
            },
        );
        source.insert_model(
            PRISM_MODEL_URL,
            LoadedModel {
                meshes: vec![
                    mesh(PRISM_EDGE_NAME),
                    mesh("side_1"),
                    mesh("side_2"),
                    mesh("side_3"),
                ],
                animations: Vec::new(),
            },
        );
        source.insert_texture(DAY_BACKGROUND_URL, Texture2D::white());
        source.insert_texture(NIGHT_BACKGROUND_URL, Texture2D::white());
        source.insert_model(
            TV_MODEL_URL,
            LoadedModel {
                meshes: vec![mesh("Body"), mesh(TV_SCREEN_NAME)],
                animations: Vec::new(),
            },
        );
        source
    }

    fn controller() -> OverlayController {
        OverlayController::new(Config::default(), Box::new(MemoryStorage::new()))
    }

    /// Play and tick until the scene-driven modules finished loading.
    fn started(
        controller: &mut OverlayController,
        player: &mut FakePlayer,
        source: &mut StaticAssetSource,
    ) {
        let mut cues = CueRecorder::default();
        controller.handle_event(PlayerEvent::Playing, player, source);
        for _ in 0..3 {
            controller.tick(0.1, player, source, &mut cues);
        }
    }

    #[test]
    fn test_first_playing_initializes_once() {
        let mut controller = controller();
        let mut player = FakePlayer::new();
        let mut source = assets();

        assert!(!controller.is_initialized());
        controller.handle_event(PlayerEvent::Playing, &mut player, &mut source);
        assert!(controller.is_initialized());
        assert_eq!(
            controller.aspect_ratio(),
            Some(AspectRatio::SixteenNine)
        );

        controller.handle_event(PlayerEvent::Playing, &mut player, &mut source);
        assert!(controller.is_initialized());
    }

    #[test]
    fn test_size_poll_retries_until_metadata() {
        let mut controller = controller();
        let mut player = FakePlayer::new();
        player.video = None;
        let mut source = assets();
        let mut cues = CueRecorder::default();

        controller.handle_event(PlayerEvent::Playing, &mut player, &mut source);
        assert!(!controller.is_initialized());

        controller.tick(0.3, &mut player, &mut source, &mut cues);
        assert!(!controller.is_initialized());

        player.video = Some((640, 480));
        controller.tick(0.1, &mut player, &mut source, &mut cues);
        assert!(controller.is_initialized());
        assert_eq!(controller.aspect_ratio(), Some(AspectRatio::FourThree));
    }

    #[test]
    fn test_advance_drives_size_poll_before_stage_exists() {
        let mut controller = controller();
        let mut player = FakePlayer::new();
        player.video = None;
        let mut source = assets();
        let mut cues = CueRecorder::default();

        controller.handle_event(PlayerEvent::Playing, &mut player, &mut source);
        controller.advance(&mut player, &mut source, &mut cues);
        assert!(!controller.is_initialized());

        // Metadata arrives late; the wall-clock ticks alone must let the
        // retry poll pick it up, with no stage to supply the delta.
        player.video = Some((1920, 1080));
        for _ in 0..20 {
            std::thread::sleep(std::time::Duration::from_millis(30));
            controller.advance(&mut player, &mut source, &mut cues);
            if controller.is_initialized() {
                break;
            }
        }
        assert!(controller.is_initialized());
        assert_eq!(controller.aspect_ratio(), Some(AspectRatio::SixteenNine));
    }

    #[test]
    fn test_metadata_event_completes_pending_sizing() {
        let mut controller = controller();
        let mut player = FakePlayer::new();
        player.video = None;
        let mut source = assets();

        controller.handle_event(PlayerEvent::Playing, &mut player, &mut source);
        assert!(!controller.is_initialized());

        player.video = Some((640, 480));
        controller.handle_event(PlayerEvent::LoadedMetadata, &mut player, &mut source);
        assert!(controller.is_initialized());
        assert_eq!(controller.aspect_ratio(), Some(AspectRatio::FourThree));
    }

    #[test]
    fn test_metadata_event_before_playing_is_ignored() {
        let mut controller = controller();
        let mut player = FakePlayer::new();
        let mut source = assets();

        controller.handle_event(PlayerEvent::LoadedMetadata, &mut player, &mut source);
        assert!(!controller.is_initialized());
    }

    #[test]
    fn test_size_poll_gives_up_after_limit() {
        let mut controller = controller();
        let mut player = FakePlayer::new();
        player.video = None;
        let mut source = assets();
        let mut cues = CueRecorder::default();

        controller.handle_event(PlayerEvent::Playing, &mut player, &mut source);
        for _ in 0..((RESIZE_LIMIT + 10) as usize) {
            controller.tick(RESIZE_INTERVAL, &mut player, &mut source, &mut cues);
        }
        assert!(!controller.is_initialized());
        assert!(controller.size_poll.is_none());
    }

    #[test]
    fn test_scene_selection_is_exclusive() {
        let mut controller = controller();
        let mut player = FakePlayer::new();
        let mut source = assets();
        let mut cues = CueRecorder::default();
        started(&mut controller, &mut player, &mut source);

        controller.select_scene(SceneMode::Flashlight, &mut cues);
        assert!(controller.is_scene_active(SceneMode::Flashlight));
        assert!(controller.is_powered());

        controller.select_scene(SceneMode::Billboard, &mut cues);
        assert!(controller.is_scene_active(SceneMode::Billboard));
        assert!(!controller.is_scene_active(SceneMode::Flashlight));
        assert_eq!(cues.cues.last(), Some(&AudioCue::BillboardMode));
    }

    #[test]
    fn test_selecting_active_scene_powers_off() {
        let mut controller = controller();
        let mut player = FakePlayer::new();
        let mut source = assets();
        let mut cues = CueRecorder::default();
        started(&mut controller, &mut player, &mut source);

        controller.select_scene(SceneMode::Desat, &mut cues);
        assert_eq!(controller.current_scene(), SceneMode::Desat);

        controller.select_scene(SceneMode::Desat, &mut cues);
        assert_eq!(controller.current_scene(), SceneMode::Default);
        assert!(!controller.is_powered());
    }

    #[test]
    fn test_power_reselects_previous_scene() {
        let mut controller = controller();
        let mut player = FakePlayer::new();
        let mut source = assets();
        let mut cues = CueRecorder::default();
        started(&mut controller, &mut player, &mut source);

        controller.select_scene(SceneMode::Toon, &mut cues);
        controller.power(&mut cues);
        assert_eq!(controller.current_scene(), SceneMode::Default);
        assert!(!controller.is_powered());

        controller.power(&mut cues);
        assert_eq!(controller.current_scene(), SceneMode::Toon);
        assert!(controller.is_powered());
    }

    #[test]
    fn test_mute_suppresses_cues() {
        let mut controller = controller();
        let mut player = FakePlayer::new();
        let mut source = assets();
        let mut cues = CueRecorder::default();
        started(&mut controller, &mut player, &mut source);

        controller.set_muted(true, &mut player);
        assert!(player.is_muted());

        controller.select_scene(SceneMode::Rgb, &mut cues);
        assert!(cues.cues.is_empty());
    }

    #[test]
    fn test_restore_reapplies_stored_scene() {
        let mut snapshot = PreferenceSnapshot::default();
        snapshot.current_scene = SceneMode::Flashlight;
        snapshot.flashlight_is_large = false;
        snapshot.flashlight_target = Some(Vector2::new(-3.9, 2.25));
        let mut storage = MemoryStorage::new();
        storage
            .save(
                crate::prefs::STORAGE_KEY,
                &serde_json::to_vec(&snapshot).unwrap(),
            )
            .unwrap();

        let mut controller =
            OverlayController::new(Config::default(), Box::new(storage));
        let mut player = FakePlayer::new();
        let mut source = assets();
        started(&mut controller, &mut player, &mut source);

        assert!(controller.is_scene_active(SceneMode::Flashlight));
        assert_eq!(controller.current_scene(), SceneMode::Flashlight);
        assert!(controller.is_powered());
        assert!(!controller.snapshot().flashlight_is_large);
        // The re-activation happened behind the restore mute.
        assert_eq!(
            controller.snapshot().flashlight_target,
            Some(Vector2::new(-3.9, 2.25))
        );
    }

    #[test]
    fn test_restore_reapplies_desat_step() {
        let mut snapshot = PreferenceSnapshot::default();
        snapshot.current_scene = SceneMode::Desat;
        snapshot.desat_index = 0;
        let mut storage = MemoryStorage::new();
        storage
            .save(
                crate::prefs::STORAGE_KEY,
                &serde_json::to_vec(&snapshot).unwrap(),
            )
            .unwrap();

        let mut controller =
            OverlayController::new(Config::default(), Box::new(storage));
        let mut player = FakePlayer::new();
        let mut source = assets();
        started(&mut controller, &mut player, &mut source);

        assert_eq!(controller.current_scene(), SceneMode::Desat);
        // The stored step overrides the enable() default, including the
        // fully desaturated step that enable() itself skips.
        assert_eq!(controller.snapshot().desat_index, 0);
    }

    #[test]
    fn test_restore_waits_for_scene_assets() {
        let mut snapshot = PreferenceSnapshot::default();
        snapshot.current_scene = SceneMode::Billboard;
        let mut storage = MemoryStorage::new();
        storage
            .save(
                crate::prefs::STORAGE_KEY,
                &serde_json::to_vec(&snapshot).unwrap(),
            )
            .unwrap();

        let mut controller =
            OverlayController::new(Config::default(), Box::new(storage));
        let mut player = FakePlayer::new();
        let mut source = assets().with_delay(5);
        let mut cues = CueRecorder::default();

        controller.handle_event(PlayerEvent::Playing, &mut player, &mut source);
        controller.tick(0.1, &mut player, &mut source, &mut cues);
        assert!(!controller.is_scene_active(SceneMode::Billboard));

        for _ in 0..8 {
            controller.tick(0.1, &mut player, &mut source, &mut cues);
        }
        assert!(controller.is_scene_active(SceneMode::Billboard));
    }

    #[test]
    fn test_billboard_spin_freezes_video_snapshot() {
        let mut controller = controller();
        let mut player = FakePlayer::new();
        let mut source = assets();
        let mut cues = CueRecorder::default();
        started(&mut controller, &mut player, &mut source);

        controller.select_scene(SceneMode::Billboard, &mut cues);
        controller.set_billboard_speed(2);

        let mut froze = false;
        for _ in 0..500 {
            controller.tick(0.05, &mut player, &mut source, &mut cues);
            if controller.stage.as_ref().is_some_and(|s| s.frozen.is_some()) {
                froze = true;
            }
            if froze && controller.stage.as_ref().is_some_and(|s| s.frozen.is_none()) {
                break;
            }
        }
        assert!(froze);
        assert!(controller
            .stage
            .as_ref()
            .is_some_and(|s| s.frozen.is_none()));
    }

    #[test]
    fn test_preferences_saved_on_user_actions() {
        let mut controller = controller();
        let mut player = FakePlayer::new();
        let mut source = assets();
        let mut cues = CueRecorder::default();
        started(&mut controller, &mut player, &mut source);

        controller.select_scene(SceneMode::Desat, &mut cues);
        controller.set_desat_level(2, &mut cues);
        controller.toggle_minimized(Some(true));

        let saved = controller.store.load();
        assert_eq!(saved.current_scene, SceneMode::Desat);
        assert_eq!(saved.desat_index, 2);
        assert!(saved.is_minimized);
        assert_eq!(cues.cues.last(), Some(&AudioCue::Slide));
    }
}
