use log::debug;

use crate::math::Aabb;
use crate::part::{NodeId, PartTree};
use crate::traits::RenderService;

/// What the last primary sync put on screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    pub actors: Vec<NodeId>,
    pub bounds: Option<Aabb>,
}

/// Keeps the on-screen actor set equal to the render handles reachable
/// from the tree root under the visibility rule.
///
/// Every sync is a full rebuild: clear, traverse, add, render, reset camera.
#[derive(Debug, Default)]
pub struct PrimaryRenderSync {
    syncs: u64,
    last: SyncReport,
}

impl PrimaryRenderSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync<R: RenderService + ?Sized>(
        &mut self,
        tree: &mut PartTree,
        renderer: &mut R,
    ) -> anyhow::Result<&SyncReport> {
        renderer.remove_all_actors();

        let reachable = tree.visible_nodes(tree.root());
        let mut bounds: Option<Aabb> = None;
        for &id in &reachable {
            let Some(node) = tree.get_mut(id) else {
                continue;
            };
            node.push_color();
            let actor = node.render_handle().actor(id);
            if let Some(b) = actor.bounds() {
                bounds = Some(bounds.map_or(b, |acc| acc.union(&b)));
            }
            renderer.add_actor(actor);
        }

        self.syncs += 1;
        self.last = SyncReport {
            actors: reachable,
            bounds,
        };
        debug!(
            "primary sync #{}: {} actor(s)",
            self.syncs,
            self.last.actors.len()
        );

        renderer.render()?;
        renderer.reset_camera(bounds);
        Ok(&self.last)
    }

    pub fn sync_count(&self) -> u64 {
        self.syncs
    }

    pub fn last_report(&self) -> &SyncReport {
        &self.last
    }
}
