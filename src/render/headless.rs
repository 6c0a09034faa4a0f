use crate::math::{Aabb, Rgb};
use crate::part::NodeId;
use crate::traits::RenderService;

use super::handle::PrimaryActor;

/// Renderer that keeps its actor set in memory; used by the CLI and tests
#[derive(Debug, Clone)]
pub struct HeadlessRenderer {
    actors: Vec<PrimaryActor>,
    background: Rgb,
    camera_bounds: Option<Aabb>,
    frames: u64,
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self {
            actors: Vec::new(),
            background: Rgb::WHITE,
            camera_bounds: None,
            frames: 0,
        }
    }
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actors(&self) -> &[PrimaryActor] {
        &self.actors
    }

    pub fn actor(&self, node: NodeId) -> Option<&PrimaryActor> {
        self.actors.iter().find(|a| a.node == node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.actor(node).is_some()
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn camera_bounds(&self) -> Option<Aabb> {
        self.camera_bounds
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Triangles currently submitted across all actors
    pub fn triangle_count(&self) -> usize {
        self.actors
            .iter()
            .filter_map(|a| a.surface.as_ref())
            .map(|s| s.triangle_count())
            .sum()
    }
}

impl RenderService for HeadlessRenderer {
    fn add_actor(&mut self, actor: PrimaryActor) {
        self.actors.push(actor);
    }

    fn remove_all_actors(&mut self) {
        self.actors.clear();
    }

    fn set_background(&mut self, color: Rgb) {
        self.background = color;
    }

    fn reset_camera(&mut self, bounds: Option<Aabb>) {
        self.camera_bounds = bounds;
    }

    fn render(&mut self) -> anyhow::Result<()> {
        self.frames += 1;
        Ok(())
    }
}
