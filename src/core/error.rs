//! Error types for the Rigkit engine

use thiserror::Error;

use crate::scene::NodeId;

/// Main error type for the engine
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load scene: {0}")]
    Load(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("node {0:?} is not part of the current scene")]
    InvalidNode(NodeId),

    #[error("widget edits are rejected while playback is active")]
    PlaybackActive,
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
