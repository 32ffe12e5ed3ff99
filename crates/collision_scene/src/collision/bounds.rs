//! Axis-aligned bounding boxes

use crate::foundation::math::Vec3;

/// Half-width of the bounding box written when a scene has no split models
pub const SUB_MODEL_DEFAULT_EXTENT: f32 = 999_999.0;

/// Axis-Aligned Bounding Box
///
/// The default value is the "empty" box: `min` at `f32::MAX` and `max` at
/// `f32::MIN`, so the first point folded in becomes both corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            min: Vec3::repeat(f32::MAX),
            max: Vec3::repeat(f32::MIN),
        }
    }
}

impl BoundingBox {
    /// Create a new box from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box spanning `-extent..extent` on every axis
    pub fn uniform(extent: f32) -> Self {
        Self::new(Vec3::repeat(-extent), Vec3::repeat(extent))
    }

    /// Compute the tightest box around a position set
    pub fn from_positions<'a>(positions: impl IntoIterator<Item = &'a Vec3>) -> Self {
        let mut bounds = Self::default();
        bounds.compute(positions);
        bounds
    }

    /// Recompute both corners from scratch.
    ///
    /// An empty position set leaves the sentinel extremes in place.
    pub fn compute<'a>(&mut self, positions: impl IntoIterator<Item = &'a Vec3>) {
        let mut min = Vec3::repeat(f32::MAX);
        let mut max = Vec3::repeat(f32::MIN);
        for p in positions {
            min = min.inf(p);
            max = max.sup(p);
        }
        self.min = min;
        self.max = max;
    }

    /// Get the center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full size along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// True until at least one point has been folded in
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_positions_keep_sentinels() {
        let empty: [Vec3; 0] = [];
        let bounds = BoundingBox::from_positions(&empty);
        assert_eq!(bounds.min, Vec3::repeat(f32::MAX));
        assert_eq!(bounds.max, Vec3::repeat(f32::MIN));
        assert!(bounds.is_empty());
    }

    #[test]
    fn test_compute_min_max() {
        let positions = [Vec3::new(1.0, 2.0, 3.0), Vec3::new(-1.0, 5.0, 0.0)];
        let bounds = BoundingBox::from_positions(&positions);
        assert_eq!(bounds.min, Vec3::new(-1.0, 2.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 5.0, 3.0));
        assert_eq!(bounds.center(), Vec3::new(0.0, 3.5, 1.5));
    }

    #[test]
    fn test_compute_replaces_previous_extent() {
        let mut bounds = BoundingBox::uniform(SUB_MODEL_DEFAULT_EXTENT);
        bounds.compute(&[Vec3::new(4.0, 4.0, 4.0)]);
        assert_eq!(bounds.min, Vec3::new(4.0, 4.0, 4.0));
        assert_eq!(bounds.max, Vec3::new(4.0, 4.0, 4.0));
    }
}
