use log::debug;

use super::actor::VrActor;
use crate::part::PartTree;

/// One VR actor per visible geometry-bearing node, in traversal order.
///
/// Nodes without geometry contribute nothing but their children are still
/// visited; an invisible node hides its whole subtree.
pub fn build_snapshot(tree: &PartTree) -> Vec<VrActor> {
    let mut actors = Vec::new();
    tree.traverse(tree.root(), |id, node| {
        if let Some(actor) = VrActor::snapshot(id, node) {
            actors.push(actor);
        }
    });
    debug!("built {} VR actor snapshot(s)", actors.len());
    actors
}
