//! Rigkit - A skeletal pose authoring and playback engine

pub mod core;
pub mod math;
pub mod scene;
pub mod animation;
pub mod editor;
