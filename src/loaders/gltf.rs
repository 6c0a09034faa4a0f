use anyhow::{bail, Context, Result};
use glam::{Mat4, Vec3};
use log::{debug, info, warn};
use std::path::Path;

use crate::error::{ViewerError, ViewerResult};
use crate::geometry::TriangleMesh;
use crate::traits::GeometryLoader;

/// Loads glTF/GLB files as one triangulated surface per file
#[derive(Debug, Default, Clone, Copy)]
pub struct GltfLoader;

impl GeometryLoader for GltfLoader {
    fn load(&self, path: &Path) -> ViewerResult<TriangleMesh> {
        load_gltf_mesh(path).map_err(|e| ViewerError::load(path, &e))
    }
}

/// Flattens every triangle primitive of every scene into one mesh in world space
pub fn load_gltf_mesh(path: impl AsRef<Path>) -> Result<TriangleMesh> {
    let path = path.as_ref();
    info!("Loading glTF file: {:?}", path);

    let (gltf, buffers, _images) = gltf::import(path)
        .with_context(|| format!("Failed to load glTF file: {:?}", path))?;

    debug!(
        "glTF loaded: {} scenes, {} nodes, {} meshes",
        gltf.scenes().count(),
        gltf.nodes().count(),
        gltf.meshes().count()
    );

    let mut points = Vec::new();
    let mut triangles = Vec::new();

    for scene in gltf.scenes() {
        for node in scene.nodes() {
            process_node(&node, &buffers, &Mat4::IDENTITY, &mut points, &mut triangles)?;
        }
    }

    if triangles.is_empty() {
        bail!("{:?} contains no triangles", path);
    }

    info!("Extracted {} triangles from {:?}", triangles.len(), path);
    TriangleMesh::new(points, triangles).map_err(anyhow::Error::msg)
}

/// Recursively processes glTF nodes
fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: &Mat4,
    points: &mut Vec<Vec3>,
    triangles: &mut Vec<[u32; 3]>,
) -> Result<()> {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = *parent_transform * local_transform;

    if let Some(mesh) = node.mesh() {
        process_mesh(&mesh, buffers, &global_transform, points, triangles)?;
    }

    for child in node.children() {
        process_node(&child, buffers, &global_transform, points, triangles)?;
    }

    Ok(())
}

fn process_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    transform: &Mat4,
    points: &mut Vec<Vec3>,
    triangles: &mut Vec<[u32; 3]>,
) -> Result<()> {
    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            warn!(
                "Skipping {:?} primitive in mesh {:?}",
                primitive.mode(),
                mesh.name()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
        let positions = reader
            .read_positions()
            .context("Mesh primitive has no positions")?;

        let base = points.len() as u32;
        points.extend(positions.map(|pos| transform.transform_point3(Vec3::from_array(pos))));
        let vertex_count = points.len() as u32 - base;

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            // No indices - treat as triangle list
            None => (0..vertex_count).collect(),
        };

        for tri in indices.chunks_exact(3) {
            if tri.iter().any(|&i| i >= vertex_count) {
                bail!("Mesh {:?} has an index past its {} vertices", mesh.name(), vertex_count);
            }
            triangles.push([base + tri[0], base + tri[1], base + tri[2]]);
        }
    }

    Ok(())
}
