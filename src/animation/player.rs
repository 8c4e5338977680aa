//! Playback state: time cursor and the edit/playback mode machine

use crate::scene::NodeId;

/// Fixed loop length in seconds. The cursor wraps back to zero past this
/// point during playback.
pub const LOOP_DURATION: f32 = 10.0;

/// What currently owns the per-frame write to node local transforms.
///
/// Exactly one writer per node per frame: the manipulation widget while
/// `Editing`, the sampled tracks while `Playing`. Widget edits are
/// rejected while `Playing` instead of relying on UI discipline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayMode {
    #[default]
    Idle,
    Editing(NodeId),
    Playing,
}

/// Time cursor and mode for one authoring session.
#[derive(Clone, Debug, Default)]
pub struct Player {
    time: f32,
    mode: PlayMode,
}

impl Player {
    /// Create a stopped player at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cursor position in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Current mode.
    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    /// Whether playback is active.
    pub fn is_playing(&self) -> bool {
        self.mode == PlayMode::Playing
    }

    /// Scrub the cursor, clamped to the loop range.
    pub fn set_time(&mut self, time: f32) {
        self.time = time.clamp(0.0, LOOP_DURATION);
    }

    /// Switch into or out of playback. Leaving playback restores
    /// `Editing` when a selection is given, `Idle` otherwise.
    pub fn set_playing(&mut self, playing: bool, selected: Option<NodeId>) {
        self.mode = if playing {
            PlayMode::Playing
        } else {
            match selected {
                Some(id) => PlayMode::Editing(id),
                None => PlayMode::Idle,
            }
        };
    }

    /// Enter editing mode for a node, or drop back to idle.
    pub fn set_editing(&mut self, selected: Option<NodeId>) {
        if self.mode != PlayMode::Playing {
            self.mode = match selected {
                Some(id) => PlayMode::Editing(id),
                None => PlayMode::Idle,
            };
        }
    }

    /// Advance the cursor while playing, wrapping past the loop point.
    /// Returns true when time moved.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.mode != PlayMode::Playing {
            return false;
        }
        self.time += dt;
        if self.time > LOOP_DURATION {
            self.time = 0.0;
        }
        true
    }

    /// Reset to time zero, idle, no selection.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.mode = PlayMode::Idle;
    }
}
