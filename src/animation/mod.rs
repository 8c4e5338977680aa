//! Keyframe tracks, playback, and animation export

pub mod export;
pub mod player;
pub mod track;

pub use export::{write_animation, write_animation_file, AnimationDoc};
pub use player::{PlayMode, Player, LOOP_DURATION};
pub use track::{Keyframe, NodeTrack};
