use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounds used for camera resets and geometry checks
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Bounds of a point cloud, `None` when there are no points
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<Self> {
        points.into_iter().fold(None, |acc, &p| match acc {
            None => Some(Aabb::new(p, p)),
            Some(b) => Some(Aabb::new(b.min.min(p), b.max.max(p))),
        })
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn translated(&self, offset: Vec3) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Length of the box diagonal
    pub fn diagonal(&self) -> f32 {
        (self.max - self.min).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let points = [
            Vec3::new(-1.0, -2.0, -3.0),
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.0, 0.0, 0.0),
        ];
        let bounds = Aabb::from_points(&points).unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_aabb_from_no_points() {
        let points: [Vec3; 0] = [];
        assert!(Aabb::from_points(&points).is_none());
    }

    #[test]
    fn test_aabb_union_non_overlapping() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::splat(2.0), Vec3::splat(3.0));
        let union = a.union(&b);
        assert_eq!(union.min, Vec3::ZERO);
        assert_eq!(union.max, Vec3::splat(3.0));
    }

    #[test]
    fn test_aabb_translated_keeps_extent() {
        let a = Aabb::new(Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0));
        let moved = a.translated(Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(moved.center(), Vec3::new(2.0, 3.0, 4.0));
        assert!((moved.diagonal() - a.diagonal()).abs() < 1e-6);
    }
}
