//! Thin adapter between the strongly typed tree and a tree-view widget.
//!
//! Widgets see two string columns per row: the part name and its visibility.

use serde::Serialize;

use super::tree::{NodeId, PartTree};
use crate::error::ViewerResult;
use crate::geometry::FilterFlags;
use crate::math::Rgb;

pub const NAME_COLUMN: usize = 0;
pub const VISIBLE_COLUMN: usize = 1;
pub const COLUMN_COUNT: usize = 2;

/// Header labels reported for the root row
pub const HEADERS: [&str; COLUMN_COUNT] = ["Part", "Visible?"];

impl PartTree {
    pub fn column_count(&self, _id: NodeId) -> usize {
        COLUMN_COUNT
    }

    /// Display string for a column; `None` for unknown nodes or columns
    pub fn data(&self, id: NodeId, column: usize) -> Option<String> {
        if id == self.root() {
            return HEADERS.get(column).map(|h| h.to_string());
        }
        let node = self.get(id)?;
        match column {
            NAME_COLUMN => Some(node.name().to_string()),
            VISIBLE_COLUMN => Some(node.is_visible().to_string()),
            _ => None,
        }
    }

    /// Write a column from the widget; returns false when nothing was applied
    pub fn set(&mut self, id: NodeId, column: usize, value: &str) -> bool {
        if id == self.root() {
            return false;
        }
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        match column {
            NAME_COLUMN => {
                node.set_name(value);
                true
            }
            VISIBLE_COLUMN => match value.trim().parse::<bool>() {
                Ok(visible) => {
                    node.set_visible(visible);
                    true
                }
                Err(_) => false,
            },
            _ => false,
        }
    }
}

/// Values edited by the part options dialog
#[derive(Clone, Debug, PartialEq)]
pub struct PartSettings {
    pub name: String,
    pub color: Rgb,
    pub visible: bool,
}

impl PartSettings {
    pub fn load(tree: &PartTree, id: NodeId) -> ViewerResult<Self> {
        let node = tree.node(id)?;
        Ok(Self {
            name: node.name().to_string(),
            color: node.color(),
            visible: node.is_visible(),
        })
    }

    /// Colour goes through the cascading setter like any other colour edit
    pub fn apply(&self, tree: &mut PartTree, id: NodeId) -> ViewerResult<()> {
        tree.set_color(id, self.color)?;
        tree.set_visible(id, self.visible)?;
        tree.set_name(id, self.name.clone())
    }
}

/// Serialisable snapshot of a subtree for inspection
#[derive(Clone, Debug, Serialize)]
pub struct PartOutline {
    pub id: NodeId,
    pub name: String,
    pub visible: bool,
    pub color: Rgb,
    pub top_level: bool,
    pub shrink: bool,
    pub clip: bool,
    pub has_geometry: bool,
    pub triangles: Option<usize>,
    pub position: [f32; 3],
    pub children: Vec<PartOutline>,
}

impl PartOutline {
    pub fn build(tree: &PartTree, id: NodeId) -> ViewerResult<Self> {
        let node = tree.node(id)?;
        let FilterFlags { shrink, clip } = node.flags();
        let children = node
            .children()
            .iter()
            .map(|&child| PartOutline::build(tree, child))
            .collect::<ViewerResult<Vec<_>>>()?;
        Ok(Self {
            id,
            name: node.name().to_string(),
            visible: node.is_visible(),
            color: node.color(),
            top_level: node.is_top_level(),
            shrink,
            clip,
            has_geometry: node.has_geometry(),
            triangles: node.derived_geometry().map(|s| s.triangle_count()),
            position: node.position().to_array(),
            children,
        })
    }
}
