//! Playback state for one clip instance.

use super::AnimationClip;
use crate::math::Vector3;
use std::sync::Arc;

/// A scheduled playback of a clip.
///
/// Actions play once and clamp to the final pose, the way the
/// billboard's spin clips are driven. A start delay shifts the whole
/// playback, which is how per-prism staggering works.
pub struct AnimationAction {
    /// The clip to play.
    pub clip: Arc<AnimationClip>,
    /// Delay before the first keyframe applies, in seconds.
    pub start_delay: f32,
    /// Playback-speed divisor: the clip is stretched to this duration.
    pub duration: f32,
    time: f32,
    playing: bool,
}

impl AnimationAction {
    /// Create a stopped action.
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let duration = clip.duration;
        Self {
            clip,
            start_delay: 0.0,
            duration,
            time: 0.0,
            playing: false,
        }
    }

    /// Start playback from the beginning, stretched to `duration`
    /// seconds and delayed by `start_delay`.
    pub fn play(&mut self, start_delay: f32, duration: f32) {
        self.start_delay = start_delay;
        self.duration = duration;
        self.time = 0.0;
        self.playing = true;
    }

    /// Stop playback. The next sample returns the base pose.
    pub fn stop(&mut self) {
        self.playing = false;
        self.time = 0.0;
    }

    /// Whether playback was started and not stopped.
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether the action still has keyframes ahead of it.
    pub fn is_running(&self) -> bool {
        self.playing && self.time < self.start_delay + self.duration
    }

    /// Advance by `delta` seconds.
    pub fn update(&mut self, delta: f32) {
        if self.playing {
            self.time += delta;
        }
    }

    /// Sample every track at the current time.
    ///
    /// Before the start delay elapses the first keyframe holds; after
    /// the clip ends the final pose holds. A stopped action samples
    /// the base pose.
    pub fn sample(&self) -> impl Iterator<Item = (&str, Vector3)> {
        let local = (self.time - self.start_delay).clamp(0.0, self.duration);
        let scale = if self.duration > 0.0 {
            self.clip.duration / self.duration
        } else {
            0.0
        };
        let t = local * scale;
        self.clip
            .tracks
            .iter()
            .map(move |track| (track.target.as_str(), track.sample(t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spin_clip() -> Arc<AnimationClip> {
        Arc::new(AnimationClip::spin("spin", "prism", 2.0, 1.0))
    }

    #[test]
    fn test_start_delay_holds_first_pose() {
        let mut action = AnimationAction::new(spin_clip());
        action.play(1.0, 2.0);
        action.update(0.5);
        let (_, rot) = action.sample().next().unwrap();
        assert_eq!(rot.y, 0.0);
        assert!(action.is_running());
    }

    #[test]
    fn test_finishes_and_clamps() {
        let mut action = AnimationAction::new(spin_clip());
        action.play(0.0, 2.0);
        action.update(5.0);
        assert!(!action.is_running());
        let (_, rot) = action.sample().next().unwrap();
        assert!((rot.y - std::f32::consts::TAU).abs() < 1e-5);
    }

    #[test]
    fn test_duration_stretch() {
        let mut action = AnimationAction::new(spin_clip());
        // Clip lasts 2 s, stretched to 4 s: half a turn after 2 s.
        action.play(0.0, 4.0);
        action.update(2.0);
        let (_, rot) = action.sample().next().unwrap();
        assert!((rot.y - std::f32::consts::PI).abs() < 1e-4);
    }

    #[test]
    fn test_stop_returns_base_pose() {
        let mut action = AnimationAction::new(spin_clip());
        action.play(0.0, 2.0);
        action.update(1.0);
        action.stop();
        let (_, rot) = action.sample().next().unwrap();
        assert_eq!(rot.y, 0.0);
    }
}
