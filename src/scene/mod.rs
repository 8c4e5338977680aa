//! Scene graph: node arena, hierarchical transforms, load-time description

pub mod desc;
pub mod graph;
pub mod node;

pub use desc::{NodeDesc, SceneDesc};
pub use graph::SceneGraph;
pub use node::{LocalTransform, NodeId, SceneNode};
