use glam::Vec3;
use std::sync::Arc;

use super::tree::NodeId;
use crate::geometry::{FilterFlags, FilterPipeline, Surface, TriangleMesh};
use crate::math::Rgb;
use crate::render::RenderHandle;

/// One entry in the scene hierarchy: a container or a geometry-bearing part
#[derive(Debug)]
pub struct PartNode {
    name: String,
    visible: bool,
    color: Rgb,
    top_level: bool,
    flags: FilterFlags,
    original_position: Option<Vec3>,
    source: Option<TriangleMesh>,
    derived: Option<Arc<Surface>>,
    render: RenderHandle,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl PartNode {
    pub fn new(name: impl Into<String>, top_level: bool, color: Rgb) -> Self {
        let mut render = RenderHandle::default();
        render.property_mut().color = color;
        Self {
            name: name.into(),
            visible: true,
            color,
            top_level,
            flags: FilterFlags::default(),
            original_position: None,
            source: None,
            derived: None,
            render,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn is_top_level(&self) -> bool {
        self.top_level
    }

    pub fn flags(&self) -> FilterFlags {
        self.flags
    }

    pub fn shrink_enabled(&self) -> bool {
        self.flags.shrink
    }

    pub fn clip_enabled(&self) -> bool {
        self.flags.clip
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_geometry(&self) -> bool {
        self.source.is_some()
    }

    pub fn source_geometry(&self) -> Option<&TriangleMesh> {
        self.source.as_ref()
    }

    pub fn derived_geometry(&self) -> Option<&Arc<Surface>> {
        self.derived.as_ref()
    }

    pub fn render_handle(&self) -> &RenderHandle {
        &self.render
    }

    /// Captured once, at the first successful geometry load
    pub fn original_position(&self) -> Option<Vec3> {
        self.original_position
    }

    pub fn position(&self) -> Vec3 {
        self.render.position()
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.render.set_position(position);
    }

    /// Returns false when no geometry was ever loaded
    pub fn reset_to_original_position(&mut self) -> bool {
        match self.original_position {
            Some(original) => {
                self.render.set_position(original);
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_color_local(&mut self, color: Rgb) {
        self.color = color;
    }

    /// Push the node colour onto its actor
    pub(crate) fn push_color(&mut self) {
        self.render.property_mut().color = self.color;
    }

    pub(crate) fn set_flags_local(&mut self, flags: FilterFlags, pipeline: &FilterPipeline) {
        if self.flags != flags {
            self.flags = flags;
            self.refilter(pipeline);
        }
    }

    pub(crate) fn attach_geometry(&mut self, mesh: TriangleMesh, pipeline: &FilterPipeline) {
        if self.original_position.is_none() {
            self.original_position = Some(self.render.position());
        }
        self.source = Some(mesh);
        self.refilter(pipeline);
    }

    /// Recompute derived geometry; returns true when the mapper received new content
    pub(crate) fn refilter(&mut self, pipeline: &FilterPipeline) -> bool {
        let Some(source) = self.source.as_ref() else {
            return false;
        };
        let surface = Arc::new(pipeline.apply(source, self.flags));
        let changed = self.render.mapper_mut().set_input(Some(Arc::clone(&surface)));
        if changed {
            self.derived = Some(surface);
        }
        changed
    }
}
