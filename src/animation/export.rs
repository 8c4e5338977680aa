//! Animation export: the downstream `.anim` JSON document
//!
//! Write-only format consumed by external tooling. Field names, array
//! component order (`r` is x,y,z,w) and the empty-track omission rule are
//! fixed for compatibility and must not change.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::core::Result;

use super::track::NodeTrack;

/// Top-level export document: `{"animation": [...]}`.
#[derive(Debug, Serialize)]
pub struct AnimationDoc {
    pub animation: Vec<TrackEntry>,
}

/// One exported track: the node's arena index and its keys in
/// ascending time order.
#[derive(Debug, Serialize)]
pub struct TrackEntry {
    pub bone_idx: usize,
    pub keys: Vec<KeyEntry>,
}

/// One exported key: time, translation, rotation quaternion.
#[derive(Debug, Serialize)]
pub struct KeyEntry {
    pub t: f32,
    pub p: [f32; 3],
    pub r: [f32; 4],
}

impl AnimationDoc {
    /// Build the export document from a track set. Tracks with zero keys
    /// are omitted.
    pub fn from_tracks<'a>(tracks: impl IntoIterator<Item = &'a NodeTrack>) -> Self {
        let animation = tracks
            .into_iter()
            .filter(|track| !track.is_empty())
            .map(|track| TrackEntry {
                bone_idx: track.node.0,
                keys: track
                    .keys()
                    .iter()
                    .map(|k| KeyEntry {
                        t: k.time,
                        p: [k.translation.x, k.translation.y, k.translation.z],
                        r: [k.rotation.x, k.rotation.y, k.rotation.z, k.rotation.w],
                    })
                    .collect(),
            })
            .collect();
        Self { animation }
    }
}

/// Serialize the export document for a track set into a writer.
pub fn write_animation<'a, W: Write>(
    writer: W,
    tracks: impl IntoIterator<Item = &'a NodeTrack>,
) -> Result<()> {
    let doc = AnimationDoc::from_tracks(tracks);
    serde_json::to_writer_pretty(writer, &doc)?;
    Ok(())
}

/// Serialize the export document for a track set to a file.
pub fn write_animation_file<'a>(
    path: impl AsRef<Path>,
    tracks: impl IntoIterator<Item = &'a NodeTrack>,
) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_animation(&mut writer, tracks)?;
    writer.flush()?;
    log::info!("wrote animation export to {}", path.as_ref().display());
    Ok(())
}
