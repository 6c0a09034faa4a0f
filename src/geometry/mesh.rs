use glam::Vec3;

use crate::math::Aabb;

/// Triangulated surface as produced by a geometry loader
#[derive(Clone, Debug, PartialEq)]
pub struct TriangleMesh {
    pub points: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Build a mesh, rejecting triangles that index past the point list
    pub fn new(points: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Result<Self, String> {
        let count = points.len();
        if let Some(bad) = triangles
            .iter()
            .find(|tri| tri.iter().any(|&i| i as usize >= count))
        {
            return Err(format!(
                "triangle {:?} indexes past {} points",
                bad, count
            ));
        }
        Ok(Self { points, triangles })
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Corner positions of every triangle
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
}
