//! # Player Module
//!
//! Collaborator traits for the host video player and audio cues, plus
//! a small event emitter for hosts and tests.

/// Lifecycle events delivered by the host player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// Playback was requested.
    Play,
    /// Playback actually started; first occurrence triggers lazy
    /// renderer initialization.
    Playing,
    /// Playback paused.
    Pause,
    /// Playback reached the end.
    Ended,
    /// The player element changed size.
    Resize,
    /// Intrinsic video dimensions became known.
    LoadedMetadata,
    /// Volume or mute state changed.
    VolumeChange,
    /// Fullscreen was entered or left.
    FullscreenChange,
    /// A seek completed.
    Seeked,
    /// Playback rate changed.
    RateChange,
    /// The player reported an error.
    Error,
}

/// The host video player.
///
/// The engine never owns playback; it reads sizes and playback state
/// and asks for play/pause/mute transitions. Cross-origin texture
/// access must be configured by the host on the media element.
pub trait MediaPlayer {
    /// Start playback.
    fn play(&mut self);

    /// Pause playback.
    fn pause(&mut self);

    /// Whether playback is paused.
    fn is_paused(&self) -> bool;

    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    /// Media duration in seconds.
    fn duration(&self) -> f64;

    /// Whether the player is muted.
    fn is_muted(&self) -> bool;

    /// Mute or unmute.
    fn set_muted(&mut self, muted: bool);

    /// Intrinsic video dimensions, or `None` before metadata loads.
    fn video_size(&self) -> Option<(u32, u32)>;

    /// Player viewport dimensions in pixels.
    fn view_size(&self) -> (u32, u32);
}

/// Audio feedback cues; playback itself is the host's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Generic button click.
    Click,
    /// Slider drag.
    Slide,
    /// "Flashlight mode" announcement.
    FlashlightMode,
    /// "Billboard mode" announcement.
    BillboardMode,
    /// "Desaturation mode" announcement.
    DesatMode,
    /// "Cartoon mode" announcement.
    ToonMode,
    /// "Color filter mode" announcement.
    RgbMode,
    /// "TV mode" announcement.
    TvMode,
}

/// Plays audio cues. The engine suppresses cues while muted.
pub trait AudioCues {
    /// Play a cue.
    fn trigger(&mut self, cue: AudioCue);
}

/// An [`AudioCues`] sink that drops every cue.
#[derive(Default)]
pub struct SilentCues;

impl AudioCues for SilentCues {
    fn trigger(&mut self, _cue: AudioCue) {}
}

/// Handle returned by [`EventEmitter::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerId(u64);

type Handler = Box<dyn FnMut(PlayerEvent)>;

/// Fans player events out to subscribed handlers.
#[derive(Default)]
pub struct EventEmitter {
    handlers: Vec<(HandlerId, Handler)>,
    next_id: u64,
}

impl EventEmitter {
    /// Create an emitter with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a handler.
    pub fn on<F>(&mut self, handler: F) -> HandlerId
    where
        F: FnMut(PlayerEvent) + 'static,
    {
        self.next_id += 1;
        let id = HandlerId(self.next_id);
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Remove a handler.
    pub fn off(&mut self, id: HandlerId) {
        self.handlers.retain(|(h, _)| *h != id);
    }

    /// Remove every handler.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Deliver an event to every handler in subscription order.
    pub fn emit(&mut self, event: PlayerEvent) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }
}
