use glam::Vec3;
use std::sync::Arc;

use crate::geometry::Surface;
use crate::math::{Aabb, Rgb};
use crate::part::NodeId;

/// Visual attributes shared by primary and VR actors
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ActorProperty {
    pub color: Rgb,
    pub opacity: f32,
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub specular_power: f32,
}

impl Default for ActorProperty {
    fn default() -> Self {
        Self {
            color: Rgb::SENTINEL,
            opacity: 1.0,
            ambient: 0.0,
            diffuse: 1.0,
            specular: 0.0,
            specular_power: 1.0,
        }
    }
}

/// Feeds a surface to a renderer, skipping re-uploads of identical content
#[derive(Clone, Debug, Default)]
pub struct Mapper {
    input: Option<Arc<Surface>>,
    fingerprint: Option<u64>,
    uploads: u64,
}

impl Mapper {
    /// Replace the mapper input; returns false when the content is unchanged
    pub fn set_input(&mut self, surface: Option<Arc<Surface>>) -> bool {
        let fingerprint = surface.as_ref().map(|s| s.fingerprint());
        if fingerprint == self.fingerprint {
            return false;
        }
        if surface.is_some() {
            self.uploads += 1;
        }
        self.input = surface;
        self.fingerprint = fingerprint;
        true
    }

    pub fn input(&self) -> Option<&Arc<Surface>> {
        self.input.as_ref()
    }

    /// Number of times new content reached the renderer
    pub fn upload_count(&self) -> u64 {
        self.uploads
    }
}

/// Mapper plus actor state for the on-screen view
#[derive(Clone, Debug, Default)]
pub struct RenderHandle {
    mapper: Mapper,
    property: ActorProperty,
    position: Vec3,
}

impl RenderHandle {
    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    pub fn mapper_mut(&mut self) -> &mut Mapper {
        &mut self.mapper
    }

    pub fn property(&self) -> &ActorProperty {
        &self.property
    }

    pub fn property_mut(&mut self) -> &mut ActorProperty {
        &mut self.property
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Actor as handed to the primary renderer
    pub fn actor(&self, node: NodeId) -> PrimaryActor {
        PrimaryActor {
            node,
            surface: self.mapper.input.clone(),
            property: self.property,
            position: self.position,
        }
    }
}

/// Renderer-side view of a node's render handle
#[derive(Clone, Debug)]
pub struct PrimaryActor {
    pub node: NodeId,
    pub surface: Option<Arc<Surface>>,
    pub property: ActorProperty,
    pub position: Vec3,
}

impl PrimaryActor {
    /// World-space bounds, `None` for empty renders
    pub fn bounds(&self) -> Option<Aabb> {
        self.surface
            .as_ref()
            .and_then(|s| s.bounds())
            .map(|b| b.translated(self.position))
    }
}
