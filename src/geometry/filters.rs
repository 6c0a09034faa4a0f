use glam::Vec3;

use super::mesh::TriangleMesh;
use super::surface::Surface;
use crate::math::ClipPlane;

/// Factor by which the shrink filter pulls each triangle toward its centroid
pub const SHRINK_FACTOR: f32 = 0.5;

/// Toggles read by the filter pipeline
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FilterFlags {
    pub shrink: bool,
    pub clip: bool,
}

impl FilterFlags {
    pub fn new(shrink: bool, clip: bool) -> Self {
        Self { shrink, clip }
    }

    pub fn any(&self) -> bool {
        self.shrink || self.clip
    }
}

/// Deterministic chain turning source geometry into renderable geometry.
///
/// Stages always run in the same order: shrink, then clip, then conversion
/// to a [`Surface`]. The order the flags were toggled in never matters.
#[derive(Copy, Clone, Debug)]
pub struct FilterPipeline {
    shrink_factor: f32,
    plane: ClipPlane,
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self {
            shrink_factor: SHRINK_FACTOR,
            plane: ClipPlane::FIXED,
        }
    }
}

impl FilterPipeline {
    pub fn shrink_factor(&self) -> f32 {
        self.shrink_factor
    }

    pub fn plane(&self) -> ClipPlane {
        self.plane
    }

    pub fn apply(&self, source: &TriangleMesh, flags: FilterFlags) -> Surface {
        if !flags.any() {
            return Surface::from_mesh(source);
        }

        let mut cells: Vec<[Vec3; 3]> = source.triangle_corners().collect();
        if flags.shrink {
            cells = self.shrink(cells);
        }
        if flags.clip {
            cells = self.clip(&cells);
        }
        Surface::from_cells(&cells)
    }

    fn shrink(&self, cells: Vec<[Vec3; 3]>) -> Vec<[Vec3; 3]> {
        cells
            .into_iter()
            .map(|cell| {
                let centroid = (cell[0] + cell[1] + cell[2]) / 3.0;
                cell.map(|p| centroid + (p - centroid) * self.shrink_factor)
            })
            .collect()
    }

    fn clip(&self, cells: &[[Vec3; 3]]) -> Vec<[Vec3; 3]> {
        cells
            .iter()
            .flat_map(|cell| clip_triangle(&self.plane, cell))
            .collect()
    }
}

/// Clip one triangle against the plane, fan-triangulating what survives
fn clip_triangle(plane: &ClipPlane, cell: &[Vec3; 3]) -> Vec<[Vec3; 3]> {
    let distances = cell.map(|p| plane.signed_distance(p));
    if distances.iter().all(|&d| d >= 0.0) {
        return vec![*cell];
    }
    if distances.iter().all(|&d| d < 0.0) {
        return Vec::new();
    }

    let mut polygon: Vec<Vec3> = Vec::with_capacity(4);
    for i in 0..3 {
        let j = (i + 1) % 3;
        let (dc, dn) = (distances[i], distances[j]);
        if dc >= 0.0 {
            polygon.push(cell[i]);
        }
        if (dc > 0.0 && dn < 0.0) || (dc < 0.0 && dn > 0.0) {
            polygon.push(plane.intersect_segment(cell[i], cell[j]));
        }
    }

    if polygon.len() < 3 {
        return Vec::new();
    }
    (1..polygon.len() - 1)
        .map(|k| [polygon[0], polygon[k], polygon[k + 1]])
        .collect()
}
