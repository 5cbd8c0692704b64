//! Animation clips and rotation tracks.

use crate::math::Vector3;

/// A keyframed Euler-rotation track targeting a named node.
#[derive(Debug, Clone)]
pub struct RotationTrack {
    /// Target node name.
    pub target: String,
    /// Keyframe times in seconds, ascending.
    pub times: Vec<f32>,
    /// Euler rotations (radians) per keyframe.
    pub values: Vec<Vector3>,
}

impl RotationTrack {
    /// Sample the track at `time`, clamping to the ends.
    pub fn sample(&self, time: f32) -> Vector3 {
        if self.times.is_empty() {
            return Vector3::ZERO;
        }
        if time <= self.times[0] {
            return self.values[0];
        }
        let last = self.times.len() - 1;
        if time >= self.times[last] {
            return self.values[last];
        }
        let mut i = 0;
        while self.times[i + 1] < time {
            i += 1;
        }
        let span = self.times[i + 1] - self.times[i];
        let t = if span > 0.0 {
            (time - self.times[i]) / span
        } else {
            0.0
        };
        self.values[i].lerp(&self.values[i + 1], t)
    }
}

/// A named set of tracks with a fixed duration.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    /// Clip name.
    pub name: String,
    /// Duration in seconds.
    pub duration: f32,
    /// Rotation tracks.
    pub tracks: Vec<RotationTrack>,
}

impl AnimationClip {
    /// Create a clip; duration is the latest keyframe time across tracks.
    pub fn new(name: impl Into<String>, tracks: Vec<RotationTrack>) -> Self {
        let duration = tracks
            .iter()
            .filter_map(|t| t.times.last().copied())
            .fold(0.0f32, f32::max);
        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    /// A single-track spin around the Y axis.
    pub fn spin(name: impl Into<String>, target: impl Into<String>, duration: f32, turns: f32) -> Self {
        let track = RotationTrack {
            target: target.into(),
            times: vec![0.0, duration],
            values: vec![
                Vector3::ZERO,
                Vector3::new(0.0, std::f32::consts::TAU * turns, 0.0),
            ],
        };
        Self::new(name, vec![track])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_interpolates() {
        let track = RotationTrack {
            target: "prism".into(),
            times: vec![0.0, 2.0],
            values: vec![Vector3::ZERO, Vector3::new(0.0, 2.0, 0.0)],
        };
        assert_eq!(track.sample(1.0).y, 1.0);
        assert_eq!(track.sample(5.0).y, 2.0);
        assert_eq!(track.sample(-1.0).y, 0.0);
    }

    #[test]
    fn test_clip_duration() {
        let clip = AnimationClip::spin("spin", "prism", 3.0, 1.0);
        assert_eq!(clip.duration, 3.0);
    }
}
