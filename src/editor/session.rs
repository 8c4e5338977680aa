//! Authoring session: the single owned context tying graph, tracks, and
//! playback together.
//!
//! All interactive state lives here rather than in process-wide globals,
//! so independent sessions can coexist. The expected per-frame order for
//! a driving loop is: `tick` (advance + pose write-back), then traversal
//! via `world_transforms` for the widget and renderer, then
//! `apply_widget_edit` if the widget reported a change.

use std::path::Path;

use glam::Mat4;

use crate::animation::{export, NodeTrack, Player};
use crate::core::{Error, Result};
use crate::scene::{NodeId, SceneDesc, SceneGraph, SceneNode};

use super::world_edit::apply_world_edit;

/// One scene authoring session: graph, per-node tracks, playback state,
/// and the current selection.
#[derive(Clone, Debug, Default)]
pub struct Session {
    graph: SceneGraph,
    tracks: Vec<NodeTrack>,
    player: Player,
    selected: Option<NodeId>,
}

impl Session {
    /// Create an empty session with no scene loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current scene with one built from `desc`.
    ///
    /// Destructive: tracks are recreated one per node and every
    /// previously recorded keyframe is discarded. On failure the
    /// existing graph, tracks, and selection are left untouched.
    pub fn load_scene(&mut self, desc: &SceneDesc) -> Result<()> {
        let graph = SceneGraph::from_desc(desc)?;
        let tracks = graph
            .nodes()
            .map(|node| NodeTrack::new(node.id, node.name.clone()))
            .collect();

        self.graph = graph;
        self.tracks = tracks;
        self.selected = None;
        self.player.reset();

        log::info!(
            "loaded scene: {} nodes, {} roots",
            self.graph.node_count(),
            self.graph.roots().len()
        );
        Ok(())
    }

    /// Load a scene description from a JSON file and replace the current
    /// scene with it.
    pub fn load_scene_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let desc = SceneDesc::from_json_file(path)?;
        self.load_scene(&desc)
    }

    /// The current scene graph.
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// All per-node tracks, in arena order.
    pub fn tracks(&self) -> &[NodeTrack] {
        &self.tracks
    }

    /// The track animating a node, if the id is in range.
    pub fn track(&self, id: NodeId) -> Option<&NodeTrack> {
        self.tracks.get(id.0)
    }

    /// Currently selected node, if any.
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Select a node (or clear the selection with `None`). An id outside
    /// the current graph clears the selection rather than leaving a
    /// stale one behind.
    pub fn select_node(&mut self, id: Option<NodeId>) {
        self.selected = match id {
            Some(id) if self.graph.contains(id) => Some(id),
            Some(id) => {
                log::warn!("selection cleared: node {:?} is not in the scene", id);
                None
            }
            None => None,
        };
        self.player.set_editing(self.selected);
    }

    /// Current cursor position in seconds.
    pub fn time(&self) -> f32 {
        self.player.time()
    }

    /// Whether playback is active.
    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    /// Start or stop playback.
    pub fn set_playing(&mut self, playing: bool) {
        self.player.set_playing(playing, self.selected);
    }

    /// Scrub the timeline. When not playing, the sampled pose is applied
    /// immediately so scrubbing previews the animation.
    pub fn set_time(&mut self, time: f32) {
        self.player.set_time(time);
        if !self.player.is_playing() {
            self.apply_pose_at(self.player.time());
        }
    }

    /// Advance playback by `dt` seconds. While playing, this samples
    /// every non-empty track at the new cursor and overwrites the
    /// corresponding node's local translation and rotation; it is the
    /// sole writer to those fields for the frame.
    pub fn tick(&mut self, dt: f32) {
        if self.player.tick(dt) {
            self.apply_pose_at(self.player.time());
        }
    }

    /// Record the node's current local translation and rotation as a
    /// keyframe at `time` on its track.
    pub fn record_keyframe(&mut self, id: NodeId, time: f32) -> Result<()> {
        let node = self.graph.get(id).ok_or(Error::InvalidNode(id))?;
        let (translation, rotation) = (node.local.translation, node.local.rotation);

        // Track set is rebuilt 1:1 with the arena on load
        let track = &mut self.tracks[id.0];
        track.record(time, translation, rotation);
        log::debug!(
            "recorded key on {:?} at t={:.3} ({} keys)",
            id,
            time,
            track.len()
        );
        Ok(())
    }

    /// Apply a world-space transform proposed by the manipulation widget
    /// to a node, overwriting its local translation, rotation, and scale.
    ///
    /// Rejected while playback is active: the sampled tracks own the
    /// node transforms for those frames.
    pub fn apply_widget_edit(&mut self, id: NodeId, proposed_world: Mat4) -> Result<()> {
        if self.player.is_playing() {
            return Err(Error::PlaybackActive);
        }
        let parent_world = self.graph.parent_world(id).ok_or(Error::InvalidNode(id))?;
        let new_local = apply_world_edit(parent_world, proposed_world);
        self.graph.set_local(id, new_local);
        Ok(())
    }

    /// Pre-order traversal of the scene with fresh world transforms, for
    /// the renderer and the widget.
    pub fn world_transforms(&self) -> impl Iterator<Item = (&SceneNode, Mat4)> {
        self.graph.walk()
    }

    /// World transform of a single node.
    pub fn world_transform(&self, id: NodeId) -> Option<Mat4> {
        self.graph.world_transform(id)
    }

    /// Export every non-empty track to the downstream animation format.
    pub fn save_animation(&self, path: impl AsRef<Path>) -> Result<()> {
        export::write_animation_file(path, self.tracks.iter())
    }

    fn apply_pose_at(&mut self, time: f32) {
        for track in &self.tracks {
            if track.is_empty() {
                continue;
            }
            if let Some(node) = self.graph.get_mut(track.node) {
                node.local.translation = track.sample_translation(time);
                node.local.rotation = track.sample_rotation(time);
                // Scale is untouched: keys carry no scale channel
            }
        }
    }
}
