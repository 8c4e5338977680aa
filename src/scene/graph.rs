//! Scene graph — arena of nodes with hierarchical transforms.
//!
//! Local transforms are the single source of truth. World transforms are
//! recomputed on demand by composing down the tree (or up the ancestor
//! chain), never cached, so a mutated local can never leave a stale world
//! behind. Node counts are small (hundreds), which makes the O(depth)
//! recomputation per query a non-issue.

use glam::Mat4;

use crate::core::{Error, Result};

use super::desc::SceneDesc;
use super::node::{LocalTransform, NodeId, SceneNode};

/// Arena-backed scene graph. Tree-shaped by contract with the loader;
/// topology never changes after construction.
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    /// Create an empty graph (no nodes, no roots).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a loader-supplied description.
    ///
    /// Missing names are synthesized as `Node_<id>`, missing TRS
    /// components resolve to identity, and parent links are derived from
    /// the child lists. Out-of-range child or root indices, nodes
    /// claimed as a child by more than one parent, parent cycles, and
    /// roots that are themselves children are load errors, so every
    /// ancestor chain in a constructed graph is finite.
    pub fn from_desc(desc: &SceneDesc) -> Result<Self> {
        let count = desc.nodes.len();

        let mut nodes: Vec<SceneNode> = desc
            .nodes
            .iter()
            .enumerate()
            .map(|(i, nd)| {
                let name = match &nd.name {
                    Some(n) if !n.is_empty() => n.clone(),
                    _ => format!("Node_{i}"),
                };
                let mut node = SceneNode::new(NodeId(i), name);
                if let Some([x, y, z]) = nd.translation {
                    node.local.translation = glam::Vec3::new(x, y, z);
                }
                if let Some([x, y, z, w]) = nd.rotation {
                    node.local.rotation = glam::Quat::from_xyzw(x, y, z, w).normalize();
                }
                if let Some([x, y, z]) = nd.scale {
                    node.local.scale = glam::Vec3::new(x, y, z);
                }
                node
            })
            .collect();

        // Wire children and derive parent links
        for (i, nd) in desc.nodes.iter().enumerate() {
            for &child in &nd.children {
                if child >= count {
                    return Err(Error::Load(format!(
                        "node {i} references out-of-range child {child}"
                    )));
                }
                if let Some(prev) = nodes[child].parent {
                    return Err(Error::Load(format!(
                        "node {child} has two parents ({} and {i})",
                        prev.0
                    )));
                }
                nodes[child].parent = Some(NodeId(i));
                nodes[i].children.push(NodeId(child));
            }
        }

        // Single-parent is already guaranteed, so a parent cycle is exactly
        // an ancestor chain that never terminates. Walking up more steps
        // than there are nodes means the chain re-entered itself.
        for node in &nodes {
            let mut steps = 0;
            let mut current = node.parent;
            while let Some(id) = current {
                steps += 1;
                if steps > count {
                    return Err(Error::Load(format!(
                        "node {} is part of a parent cycle",
                        node.id.0
                    )));
                }
                current = nodes[id.0].parent;
            }
        }

        let mut roots = Vec::with_capacity(desc.roots.len());
        for &root in &desc.roots {
            if root >= count {
                return Err(Error::Load(format!("out-of-range root index {root}")));
            }
            if let Some(parent) = nodes[root].parent {
                return Err(Error::Load(format!(
                    "root {root} is also a child of node {}",
                    parent.0
                )));
            }
            roots.push(NodeId(root));
        }

        Ok(Self { nodes, roots })
    }

    /// The scene root ids, in graph order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Get an immutable reference to a node.
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    /// Whether `id` refers to a node in the current graph.
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over all nodes in arena order.
    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter()
    }

    /// Set the local transform of a node.
    pub fn set_local(&mut self, id: NodeId, local: LocalTransform) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.local = local;
        }
    }

    /// World transform of a node: the product of every local transform on
    /// the path from its root down to the node itself.
    pub fn world_transform(&self, id: NodeId) -> Option<Mat4> {
        let node = self.get(id)?;
        Some(self.parent_world_of(node) * node.local.to_mat4())
    }

    /// World transform of a node's parent; identity for roots.
    pub fn parent_world(&self, id: NodeId) -> Option<Mat4> {
        self.get(id).map(|node| self.parent_world_of(node))
    }

    fn parent_world_of(&self, node: &SceneNode) -> Mat4 {
        // Walk up the hierarchy, then apply locals from the root down
        let mut chain = Vec::new();
        let mut current = node.parent;
        while let Some(id) = current {
            chain.push(id);
            current = self.get(id).and_then(|n| n.parent);
        }

        let mut world = Mat4::IDENTITY;
        for &id in chain.iter().rev() {
            if let Some(n) = self.get(id) {
                world *= n.local.to_mat4();
            }
        }
        world
    }

    /// Lazy pre-order traversal over every root, yielding each node with
    /// its freshly composed world transform. Parents are always yielded
    /// before their children.
    pub fn walk(&self) -> WorldIter<'_> {
        let mut stack = Vec::with_capacity(self.roots.len());
        for &root in self.roots.iter().rev() {
            stack.push((root, Mat4::IDENTITY));
        }
        WorldIter { graph: self, stack }
    }
}

/// Iterator over `(node, world_transform)` pairs in pre-order.
///
/// Explicit worklist of `(node, parent_world)` pairs rather than
/// recursion, so arbitrarily deep chains cannot overflow the stack.
pub struct WorldIter<'a> {
    graph: &'a SceneGraph,
    stack: Vec<(NodeId, Mat4)>,
}

impl<'a> Iterator for WorldIter<'a> {
    type Item = (&'a SceneNode, Mat4);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, parent_world)) = self.stack.pop() {
            let Some(node) = self.graph.get(id) else {
                continue;
            };
            let world = parent_world * node.local.to_mat4();
            for &child in node.children.iter().rev() {
                self.stack.push((child, world));
            }
            return Some((node, world));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::desc::NodeDesc;
    use glam::{Quat, Vec3};

    fn chain_desc() -> SceneDesc {
        // root -> mid -> tip, each offset (0, 1, 0)
        SceneDesc {
            nodes: vec![
                NodeDesc {
                    name: Some("root".into()),
                    children: vec![1],
                    ..Default::default()
                },
                NodeDesc {
                    name: Some("mid".into()),
                    translation: Some([0.0, 1.0, 0.0]),
                    children: vec![2],
                    ..Default::default()
                },
                NodeDesc {
                    name: Some("tip".into()),
                    translation: Some([0.0, 1.0, 0.0]),
                    ..Default::default()
                },
            ],
            roots: vec![0],
        }
    }

    #[test]
    fn test_from_desc_basic() {
        let graph = SceneGraph::from_desc(&chain_desc()).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.roots(), &[NodeId(0)]);
        assert_eq!(graph.get(NodeId(1)).unwrap().parent, Some(NodeId(0)));
        assert_eq!(graph.get(NodeId(0)).unwrap().children, vec![NodeId(1)]);
    }

    #[test]
    fn test_from_desc_synthesizes_names() {
        let desc = SceneDesc {
            nodes: vec![NodeDesc::default(), NodeDesc {
                name: Some(String::new()),
                ..Default::default()
            }],
            roots: vec![0, 1],
        };
        let graph = SceneGraph::from_desc(&desc).unwrap();
        assert_eq!(graph.get(NodeId(0)).unwrap().name, "Node_0");
        assert_eq!(graph.get(NodeId(1)).unwrap().name, "Node_1");
    }

    #[test]
    fn test_from_desc_rejects_bad_child_index() {
        let desc = SceneDesc {
            nodes: vec![NodeDesc {
                children: vec![7],
                ..Default::default()
            }],
            roots: vec![0],
        };
        assert!(SceneGraph::from_desc(&desc).is_err());
    }

    #[test]
    fn test_from_desc_rejects_bad_root_index() {
        let desc = SceneDesc {
            nodes: vec![NodeDesc::default()],
            roots: vec![3],
        };
        assert!(SceneGraph::from_desc(&desc).is_err());
    }

    #[test]
    fn test_from_desc_rejects_parent_cycle() {
        // 1 and 2 parent each other; each has exactly one parent, so only
        // the cycle check can catch this. Accepting it would make
        // world_transform on either node loop forever.
        let desc = SceneDesc {
            nodes: vec![
                NodeDesc::default(),
                NodeDesc { children: vec![2], ..Default::default() },
                NodeDesc { children: vec![1], ..Default::default() },
            ],
            roots: vec![0],
        };
        assert!(SceneGraph::from_desc(&desc).is_err());
    }

    #[test]
    fn test_from_desc_rejects_self_parenting_node() {
        let desc = SceneDesc {
            nodes: vec![NodeDesc { children: vec![0], ..Default::default() }],
            roots: vec![0],
        };
        assert!(SceneGraph::from_desc(&desc).is_err());
    }

    #[test]
    fn test_from_desc_rejects_root_with_parent() {
        let desc = SceneDesc {
            nodes: vec![
                NodeDesc { children: vec![1], ..Default::default() },
                NodeDesc::default(),
            ],
            roots: vec![0, 1],
        };
        assert!(SceneGraph::from_desc(&desc).is_err());
    }

    #[test]
    fn test_from_desc_rejects_duplicate_parent() {
        let desc = SceneDesc {
            nodes: vec![
                NodeDesc { children: vec![2], ..Default::default() },
                NodeDesc { children: vec![2], ..Default::default() },
                NodeDesc::default(),
            ],
            roots: vec![0, 1],
        };
        assert!(SceneGraph::from_desc(&desc).is_err());
    }

    #[test]
    fn test_identity_local_inherits_parent_world() {
        // A node with no TRS fields has exactly its parent's world transform
        let mut desc = chain_desc();
        desc.nodes[2].translation = None;
        let graph = SceneGraph::from_desc(&desc).unwrap();

        let parent_world = graph.world_transform(NodeId(1)).unwrap();
        let child_world = graph.world_transform(NodeId(2)).unwrap();
        assert_eq!(parent_world, child_world);
    }

    #[test]
    fn test_world_transform_chain() {
        let graph = SceneGraph::from_desc(&chain_desc()).unwrap();
        let world = graph.world_transform(NodeId(2)).unwrap();
        let (_, _, translation) = world.to_scale_rotation_translation();
        assert!((translation - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_world_transform_applies_parent_rotation() {
        let mut desc = chain_desc();
        // Rotate root 90° about Z: child offset (0,1,0) lands at (-1,0,0)
        let q = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        desc.nodes[0].rotation = Some([q.x, q.y, q.z, q.w]);
        let graph = SceneGraph::from_desc(&desc).unwrap();

        let world = graph.world_transform(NodeId(1)).unwrap();
        let (_, _, translation) = world.to_scale_rotation_translation();
        assert!((translation - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_parent_world_of_root_is_identity() {
        let graph = SceneGraph::from_desc(&chain_desc()).unwrap();
        assert_eq!(graph.parent_world(NodeId(0)).unwrap(), Mat4::IDENTITY);
    }

    #[test]
    fn test_walk_pre_order() {
        let desc = SceneDesc {
            nodes: vec![
                NodeDesc { children: vec![1, 2], ..Default::default() },
                NodeDesc::default(),
                NodeDesc { children: vec![3], ..Default::default() },
                NodeDesc::default(),
            ],
            roots: vec![0],
        };
        let graph = SceneGraph::from_desc(&desc).unwrap();

        let order: Vec<usize> = graph.walk().map(|(n, _)| n.id.0).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_walk_matches_world_transform() {
        let graph = SceneGraph::from_desc(&chain_desc()).unwrap();
        for (node, world) in graph.walk() {
            let direct = graph.world_transform(node.id).unwrap();
            assert!((world.w_axis - direct.w_axis).length() < 1e-5);
        }
    }

    #[test]
    fn test_walk_sees_fresh_locals() {
        // No caching: a mutation is visible on the very next traversal
        let mut graph = SceneGraph::from_desc(&chain_desc()).unwrap();
        graph.set_local(
            NodeId(0),
            LocalTransform::from_translation(Vec3::new(5.0, 0.0, 0.0)),
        );

        let (_, world) = graph.walk().find(|(n, _)| n.id == NodeId(2)).unwrap();
        let (_, _, translation) = world.to_scale_rotation_translation();
        assert!((translation - Vec3::new(5.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_walk_multiple_roots() {
        let desc = SceneDesc {
            nodes: vec![NodeDesc::default(), NodeDesc::default()],
            roots: vec![0, 1],
        };
        let graph = SceneGraph::from_desc(&desc).unwrap();
        assert_eq!(graph.walk().count(), 2);
    }

    #[test]
    fn test_empty_graph() {
        let graph = SceneGraph::new();
        assert_eq!(graph.node_count(), 0);
        assert!(graph.walk().next().is_none());
        assert!(graph.world_transform(NodeId(0)).is_none());
    }
}
