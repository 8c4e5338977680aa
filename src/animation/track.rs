//! Per-node keyframe tracks: timed pose samples with interpolation

use glam::{Quat, Vec3};

use crate::scene::NodeId;

/// A single local-space pose sample at a specific time.
#[derive(Clone, Copy, Debug)]
pub struct Keyframe {
    pub time: f32,
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Keyframe {
    /// Create a new keyframe.
    pub fn new(time: f32, translation: Vec3, rotation: Quat) -> Self {
        Self {
            time,
            translation,
            rotation,
        }
    }

    /// An identity pose keyframe at the given time.
    pub fn identity(time: f32) -> Self {
        Self {
            time,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Animation track for a single scene node.
///
/// Keys are kept ascending by time. Duplicate times are allowed; both
/// keys persist and sampling resolves to the earlier one in sequence
/// order.
#[derive(Clone, Debug)]
pub struct NodeTrack {
    pub node: NodeId,
    pub name: String,
    keys: Vec<Keyframe>,
}

impl NodeTrack {
    /// Create a new empty track for a node.
    pub fn new(node: NodeId, name: impl Into<String>) -> Self {
        Self {
            node,
            name: name.into(),
            keys: Vec::new(),
        }
    }

    /// The recorded keys, ascending by time.
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Number of recorded keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the track has no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Discard every recorded key.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Record a pose at the given time and restore ascending order.
    ///
    /// Key times are always ≥ 0; a negative time is clamped to zero so
    /// nothing before the loop start can reach the export document. The
    /// sort is stable, so keys recorded at the same time keep their
    /// relative insertion order.
    pub fn record(&mut self, time: f32, translation: Vec3, rotation: Quat) {
        let time = if time < 0.0 {
            log::warn!("clamping negative keyframe time {time} to 0");
            0.0
        } else {
            time
        };
        self.keys.push(Keyframe::new(time, translation, rotation));
        self.keys
            .sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(std::cmp::Ordering::Equal));
    }

    /// Time of the last key (0 when empty).
    pub fn duration(&self) -> f32 {
        self.keys.last().map(|k| k.time).unwrap_or(0.0)
    }

    /// Sample the rotation channel at a time. Clamps to the first and
    /// last keys outside the recorded range; slerps inside it.
    pub fn sample_rotation(&self, time: f32) -> Quat {
        match self.segment_at(time) {
            Segment::Empty => Quat::IDENTITY,
            Segment::At(k) => k.rotation,
            Segment::Between(a, b, t) => a.rotation.slerp(b.rotation, t),
        }
    }

    /// Sample the translation channel at a time. Same interval rules as
    /// rotation, with linear interpolation instead of slerp.
    pub fn sample_translation(&self, time: f32) -> Vec3 {
        match self.segment_at(time) {
            Segment::Empty => Vec3::ZERO,
            Segment::At(k) => k.translation,
            Segment::Between(a, b, t) => a.translation.lerp(b.translation, t),
        }
    }

    /// Locate the key pair enclosing `time` and the interpolation factor.
    fn segment_at(&self, time: f32) -> Segment<'_> {
        let Some(first) = self.keys.first() else {
            return Segment::Empty;
        };
        if time <= first.time {
            return Segment::At(first);
        }
        let last = &self.keys[self.keys.len() - 1];
        if time >= last.time {
            return Segment::At(last);
        }

        // First enclosing interval wins
        for pair in self.keys.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if time >= a.time && time <= b.time {
                // Zero-width interval: take the earlier key outright
                if b.time <= a.time {
                    return Segment::At(a);
                }
                let t = (time - a.time) / (b.time - a.time);
                return Segment::Between(a, b, t);
            }
        }

        Segment::At(last)
    }
}

enum Segment<'a> {
    Empty,
    At(&'a Keyframe),
    Between(&'a Keyframe, &'a Keyframe, f32),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quat_close(a: Quat, b: Quat) -> bool {
        a.dot(b).abs() > 1.0 - 1e-5
    }

    #[test]
    fn test_record_reorders_by_time() {
        let mut track = NodeTrack::new(NodeId(0), "root");
        track.record(2.0, Vec3::ZERO, Quat::IDENTITY);
        track.record(1.0, Vec3::ZERO, Quat::IDENTITY);

        assert_eq!(track.keys()[0].time, 1.0);
        assert_eq!(track.keys()[1].time, 2.0);
    }

    #[test]
    fn test_record_same_time_keeps_insertion_order() {
        let mut track = NodeTrack::new(NodeId(0), "root");
        track.record(1.0, Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY);
        track.record(1.0, Vec3::new(2.0, 0.0, 0.0), Quat::IDENTITY);

        assert_eq!(track.len(), 2);
        assert_eq!(track.keys()[0].translation.x, 1.0);
        assert_eq!(track.keys()[1].translation.x, 2.0);
    }

    #[test]
    fn test_record_clamps_negative_time_to_zero() {
        let mut track = NodeTrack::new(NodeId(0), "root");
        track.record(-1.0, Vec3::X, Quat::IDENTITY);

        assert_eq!(track.keys()[0].time, 0.0);
        assert_eq!(track.duration(), 0.0);
    }

    #[test]
    fn test_sample_empty_track() {
        let track = NodeTrack::new(NodeId(0), "root");
        assert_eq!(track.sample_rotation(1.0), Quat::IDENTITY);
        assert_eq!(track.sample_translation(1.0), Vec3::ZERO);
    }

    #[test]
    fn test_sample_clamps_to_boundary_keys() {
        let mut track = NodeTrack::new(NodeId(0), "root");
        let q0 = Quat::from_rotation_y(0.3);
        let q1 = Quat::from_rotation_y(1.2);
        track.record(1.0, Vec3::X, q0);
        track.record(3.0, Vec3::Y, q1);

        // At and before the first key
        assert!(quat_close(track.sample_rotation(1.0), q0));
        assert!(quat_close(track.sample_rotation(-5.0), q0));
        assert_eq!(track.sample_translation(0.0), Vec3::X);

        // At and beyond the last key
        assert!(quat_close(track.sample_rotation(3.0), q1));
        assert!(quat_close(track.sample_rotation(100.0), q1));
        assert_eq!(track.sample_translation(100.0), Vec3::Y);
    }

    #[test]
    fn test_sample_rotation_midpoint_is_slerp_midpoint() {
        let mut track = NodeTrack::new(NodeId(0), "root");
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        track.record(0.0, Vec3::ZERO, a);
        track.record(2.0, Vec3::ZERO, b);

        let mid = track.sample_rotation(1.0);
        let expected = a.slerp(b, 0.5);
        assert!(quat_close(mid, expected));

        // 90° about Y sampled halfway is 45° about Y
        let quarter = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4);
        assert!(quat_close(mid, quarter));
    }

    #[test]
    fn test_sample_translation_lerp() {
        let mut track = NodeTrack::new(NodeId(0), "root");
        track.record(0.0, Vec3::ZERO, Quat::IDENTITY);
        track.record(1.0, Vec3::new(10.0, 0.0, 0.0), Quat::IDENTITY);

        let p = track.sample_translation(0.25);
        assert!((p - Vec3::new(2.5, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_sample_uses_first_enclosing_interval() {
        let mut track = NodeTrack::new(NodeId(0), "root");
        track.record(0.0, Vec3::ZERO, Quat::IDENTITY);
        track.record(1.0, Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY);
        track.record(1.0, Vec3::new(9.0, 0.0, 0.0), Quat::IDENTITY);
        track.record(2.0, Vec3::new(2.0, 0.0, 0.0), Quat::IDENTITY);

        // The zero-width [1.0, 1.0] interval must not divide by zero, and
        // sampling exactly at the shared time resolves to the earlier key.
        let p = track.sample_translation(1.0);
        assert!((p.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_duration() {
        let mut track = NodeTrack::new(NodeId(0), "root");
        assert_eq!(track.duration(), 0.0);
        track.record(2.5, Vec3::ZERO, Quat::IDENTITY);
        track.record(1.0, Vec3::ZERO, Quat::IDENTITY);
        assert_eq!(track.duration(), 2.5);
    }

    #[test]
    fn test_clear() {
        let mut track = NodeTrack::new(NodeId(0), "root");
        track.record(1.0, Vec3::ZERO, Quat::IDENTITY);
        track.clear();
        assert!(track.is_empty());
        assert_eq!(track.sample_rotation(1.0), Quat::IDENTITY);
    }
}
