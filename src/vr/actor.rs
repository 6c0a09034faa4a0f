use crate::geometry::Surface;
use crate::part::{NodeId, PartNode};
use crate::render::ActorProperty;

/// Actor owned by the VR worker, built from a deep copy of derived geometry
#[derive(Clone, Debug)]
pub struct VrActor {
    pub source: NodeId,
    pub name: String,
    surface: Surface,
    pub property: ActorProperty,
}

impl VrActor {
    /// Snapshot a node; `None` for nodes without derived geometry.
    ///
    /// Only visual properties are copied from the primary handle. The node
    /// position is not carried over, so VR actors sit at their model origin.
    pub fn snapshot(id: NodeId, node: &PartNode) -> Option<Self> {
        let derived = node.derived_geometry()?;
        let mut property = *node.render_handle().property();
        property.color = node.color();
        Some(Self {
            source: id,
            name: node.name().to_string(),
            surface: Surface::clone(derived),
            property,
        })
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}
