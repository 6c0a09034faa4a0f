use glam::Vec3;

/// Plane used by the clip filter; geometry on the negative side is discarded
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClipPlane {
    pub origin: Vec3,
    pub normal: Vec3,
}

impl ClipPlane {
    /// The single plane every clip filter uses: through the scene origin, facing -X
    pub const FIXED: ClipPlane = ClipPlane {
        origin: Vec3::ZERO,
        normal: Vec3::NEG_X,
    };

    pub fn signed_distance(&self, point: Vec3) -> f32 {
        (point - self.origin).dot(self.normal)
    }

    /// Point where segment `a`-`b` crosses the plane
    pub fn intersect_segment(&self, a: Vec3, b: Vec3) -> Vec3 {
        let da = self.signed_distance(a);
        let db = self.signed_distance(b);
        let t = da / (da - db);
        a + (b - a) * t
    }
}
