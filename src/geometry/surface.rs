use glam::Vec3;
use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;

use super::mesh::TriangleMesh;
use crate::math::Aabb;

/// Flat-shaded vertex as uploaded to a renderer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Uniform renderable surface: the last stage of the filter pipeline
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    points: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
}

impl Surface {
    /// Indexed copy of a source mesh, connectivity untouched
    pub fn from_mesh(mesh: &TriangleMesh) -> Self {
        Self {
            points: mesh.points.clone(),
            triangles: mesh.triangles.clone(),
        }
    }

    /// Surface from independent cells; every cell keeps its own three points
    pub fn from_cells(cells: &[[Vec3; 3]]) -> Self {
        let points: Vec<Vec3> = cells.iter().flatten().copied().collect();
        let triangles = (0..cells.len() as u32)
            .map(|i| [i * 3, i * 3 + 1, i * 3 + 2])
            .collect();
        Self { points, triangles }
    }

    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            triangles: Vec::new(),
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangle_corners(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.triangles.iter().map(move |tri| {
            [
                self.points[tri[0] as usize],
                self.points[tri[1] as usize],
                self.points[tri[2] as usize],
            ]
        })
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.points)
    }

    /// Non-indexed vertex stream with per-face normals
    pub fn vertex_buffer(&self) -> Vec<Vertex> {
        self.triangle_corners()
            .flat_map(|[a, b, c]| {
                let normal = (b - a).cross(c - a).normalize_or_zero().to_array();
                [a, b, c].map(|p| Vertex {
                    position: p.to_array(),
                    normal,
                })
            })
            .collect()
    }

    /// Content hash of the uploaded bytes, used by mappers to skip re-uploads
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        hasher.write(bytemuck::cast_slice(&self.vertex_buffer()));
        hasher.write_usize(self.triangles.len());
        hasher.finish()
    }
}
