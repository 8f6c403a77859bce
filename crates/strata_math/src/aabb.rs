use crate::Vec3;

/// Axis-aligned bounding box of a point set.
///
/// Used by the render side to keep mesh bounds current as positions change.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// An empty box (min > max, contains nothing).
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Create the smallest AABB containing every point.
    ///
    /// Returns [`Aabb::EMPTY`] for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().fold(Self::EMPTY, |aabb, p| Self {
            min: aabb.min.min(p),
            max: aabb.max.max(p),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points([
            Vec3::new(-430.0, -145.0, 0.0),
            Vec3::new(430.0, -145.0, 0.0),
            Vec3::new(430.0, 145.0, 0.0),
        ]);

        assert_eq!(aabb.min, Vec3::new(-430.0, -145.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(430.0, 145.0, 0.0));
        assert_eq!(aabb.extent(), Vec3::new(860.0, 290.0, 0.0));
    }

    #[test]
    fn test_aabb_empty() {
        let empty = Aabb::from_points(std::iter::empty());
        assert!(empty.is_empty());
    }
}
