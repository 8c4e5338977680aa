//! Scene description: the interchange contract with the external loader
//!
//! The on-disk 3D container parser is a collaborator, not part of this
//! engine. Whatever it parses, it hands over a `SceneDesc`: a flat node
//! list with optional TRS components, child index lists, and a root index
//! list. A JSON form of the same structure is accepted directly for tools
//! and tests.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::core::Result;

/// One node as delivered by the loader. Absent TRS components mean
/// identity values.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NodeDesc {
    #[serde(default)]
    pub name: Option<String>,
    /// Translation as [x, y, z].
    #[serde(default)]
    pub translation: Option<[f32; 3]>,
    /// Rotation quaternion as [x, y, z, w].
    #[serde(default)]
    pub rotation: Option<[f32; 4]>,
    /// Scale as [x, y, z].
    #[serde(default)]
    pub scale: Option<[f32; 3]>,
    /// Arena indices of child nodes, in graph order.
    #[serde(default)]
    pub children: Vec<usize>,
}

/// A complete scene as delivered by the loader.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SceneDesc {
    pub nodes: Vec<NodeDesc>,
    /// Arena indices of the scene roots.
    pub roots: Vec<usize>,
}

impl SceneDesc {
    /// Read a scene description from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let desc = serde_json::from_reader(BufReader::new(file))?;
        Ok(desc)
    }
}
