use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::node::PartNode;
use crate::error::{ViewerError, ViewerResult};
use crate::geometry::{FilterFlags, FilterPipeline, TriangleMesh};
use crate::math::Rgb;

/// Stable handle to a node in a [`PartTree`]; never reused after removal
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Arena owning the part hierarchy.
///
/// Parents own their children through the arena; each child keeps a
/// non-owning `NodeId` back-reference. Removing a node drops its whole subtree.
#[derive(Debug)]
pub struct PartTree {
    nodes: Vec<Option<PartNode>>,
    root: NodeId,
    pipeline: FilterPipeline,
    default_color: Rgb,
}

impl Default for PartTree {
    fn default() -> Self {
        Self::new(Rgb::SENTINEL)
    }
}

impl PartTree {
    pub fn new(default_color: Rgb) -> Self {
        let root = PartNode::new("Part", false, default_color);
        Self {
            nodes: vec![Some(root)],
            root: NodeId(0),
            pipeline: FilterPipeline::default(),
            default_color,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn pipeline(&self) -> &FilterPipeline {
        &self.pipeline
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: NodeId) -> Option<&PartNode> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut PartNode> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn node(&self, id: NodeId) -> ViewerResult<&PartNode> {
        self.get(id)
            .ok_or_else(|| ViewerError::InvalidNode(format!("no node {}", id)))
    }

    fn node_mut(&mut self, id: NodeId) -> ViewerResult<&mut PartNode> {
        self.get_mut(id)
            .ok_or_else(|| ViewerError::InvalidNode(format!("no node {}", id)))
    }

    /// Allocate a detached node; attach it with [`PartTree::append_child`]
    pub fn create_node(&mut self, name: impl Into<String>, top_level: bool) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(Some(PartNode::new(name, top_level, self.default_color)));
        id
    }

    /// Insert `child` at the end of `parent`'s children
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> ViewerResult<()> {
        self.node(parent)?;
        let child_node = self.node(child)?;
        if child == self.root {
            return Err(ViewerError::InvalidNode("the root cannot be a child".into()));
        }
        if let Some(existing) = child_node.parent {
            return Err(ViewerError::InvalidNode(format!(
                "node {} already has parent {}",
                child, existing
            )));
        }
        if self.is_ancestor(child, parent) {
            return Err(ViewerError::InvalidNode(format!(
                "appending {} under {} would create a cycle",
                child, parent
            )));
        }

        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Create a node and append it in one step
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        top_level: bool,
    ) -> ViewerResult<NodeId> {
        self.node(parent)?;
        let child = self.create_node(name, top_level);
        self.append_child(parent, child)?;
        Ok(child)
    }

    /// True when `ancestor` is `node` or lies on its parent chain
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.get(id).and_then(|n| n.parent);
        }
        false
    }

    pub fn parent_item(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Child at ordinal `row`, `None` when out of range
    pub fn child(&self, parent: NodeId, row: usize) -> Option<NodeId> {
        self.get(parent).and_then(|n| n.children.get(row).copied())
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.get(id).map_or(0, |n| n.children.len())
    }

    /// Index within the parent's children; 0 for the root and detached nodes
    pub fn row(&self, id: NodeId) -> usize {
        self.parent_item(id)
            .and_then(|p| self.get(p))
            .and_then(|p| p.children.iter().position(|&c| c == id))
            .unwrap_or(0)
    }

    /// Depth-first pre-order walk from `start`, children in insertion order.
    /// An invisible node is skipped together with its whole subtree.
    pub fn traverse<F>(&self, start: NodeId, mut visitor: F)
    where
        F: FnMut(NodeId, &PartNode),
    {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            if !node.is_visible() {
                continue;
            }
            visitor(id, node);
            stack.extend(node.children.iter().rev());
        }
    }

    /// Ids reachable from `start` under the visibility rule, in traversal order
    pub fn visible_nodes(&self, start: NodeId) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.traverse(start, |id, _| ids.push(id));
        ids
    }

    /// `id` and every descendant, ignoring visibility
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut ids = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.get(current) {
                ids.push(current);
                stack.extend(node.children.iter().rev());
            }
        }
        ids
    }

    /// Nodes a cascading edit on `id` touches
    fn cascade_targets(&self, id: NodeId, changed: bool) -> ViewerResult<Vec<NodeId>> {
        let node = self.node(id)?;
        if node.is_top_level() && changed {
            Ok(self.subtree(id))
        } else {
            Ok(vec![id])
        }
    }

    /// Set the colour; on a top-level node a new value cascades to every descendant
    pub fn set_color(&mut self, id: NodeId, color: Rgb) -> ViewerResult<()> {
        let changed = self.node(id)?.color() != color;
        for target in self.cascade_targets(id, changed)? {
            self.node_mut(target)?.set_color_local(color);
        }
        Ok(())
    }

    pub fn set_shrink(&mut self, id: NodeId, enabled: bool) -> ViewerResult<()> {
        let changed = self.node(id)?.shrink_enabled() != enabled;
        self.update_flags(id, changed, |flags| flags.shrink = enabled)
    }

    pub fn set_clip(&mut self, id: NodeId, enabled: bool) -> ViewerResult<()> {
        let changed = self.node(id)?.clip_enabled() != enabled;
        self.update_flags(id, changed, |flags| flags.clip = enabled)
    }

    fn update_flags<F>(&mut self, id: NodeId, changed: bool, edit: F) -> ViewerResult<()>
    where
        F: Fn(&mut FilterFlags),
    {
        let pipeline = self.pipeline;
        let targets = self.cascade_targets(id, changed)?;
        debug!("filter edit on {} touches {} node(s)", id, targets.len());
        for target in targets {
            let node = self.node_mut(target)?;
            let mut flags = node.flags();
            edit(&mut flags);
            node.set_flags_local(flags, &pipeline);
        }
        Ok(())
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> ViewerResult<()> {
        self.node_mut(id)?.set_visible(visible);
        Ok(())
    }

    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> ViewerResult<()> {
        self.node_mut(id)?.set_name(name);
        Ok(())
    }

    pub fn set_position(&mut self, id: NodeId, position: Vec3) -> ViewerResult<()> {
        self.node_mut(id)?.set_position(position);
        Ok(())
    }

    /// Returns `Ok(false)` when the node never loaded geometry
    pub fn reset_to_original_position(&mut self, id: NodeId) -> ViewerResult<bool> {
        Ok(self.node_mut(id)?.reset_to_original_position())
    }

    /// Attach loaded geometry and run the filter pipeline for it
    pub fn load_geometry(&mut self, id: NodeId, mesh: TriangleMesh) -> ViewerResult<()> {
        let pipeline = self.pipeline;
        self.node_mut(id)?.attach_geometry(mesh, &pipeline);
        Ok(())
    }

    /// Re-run the filter pipeline for one node; true when new content reached the mapper
    pub fn refilter(&mut self, id: NodeId) -> ViewerResult<bool> {
        let pipeline = self.pipeline;
        Ok(self.node_mut(id)?.refilter(&pipeline))
    }

    /// Detach `id` from its parent and drop it with all descendants
    pub fn remove(&mut self, id: NodeId) -> ViewerResult<usize> {
        if id == self.root {
            return Err(ViewerError::InvalidNode("the root cannot be removed".into()));
        }
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            self.node_mut(parent)?.children.retain(|&c| c != id);
        }

        let doomed = self.subtree(id);
        // children go before their parents
        for target in doomed.iter().rev() {
            self.nodes[target.0] = None;
        }
        Ok(doomed.len())
    }
}
