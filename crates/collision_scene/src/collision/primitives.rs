//! Collision triangles and the triangle/box overlap test
//!
//! Triangles index into a model's position buffer but also cache the three
//! positions, so the octree builder never needs the buffer itself.

use crate::foundation::math::Vec3;

/// Triangles whose edge cross product has a squared length below this are
/// treated as zero-area and dropped during import
pub const DEGENERATE_AREA_THRESHOLD: f32 = 0.01;

/// A triangle of a collision model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex index into the owning model's positions
    pub a: u32,
    /// Second vertex index
    pub b: u32,
    /// Third vertex index
    pub c: u32,
    /// Face normal as stored on disk
    pub normal: Vec3,
    /// Stable index of this triangle within its model; the unit the CTB table refers to
    pub id: u32,
    /// Cached positions of `a`, `b`, `c`
    pub vertices: [Vec3; 3],
}

impl Default for Triangle {
    fn default() -> Self {
        Self {
            a: 0,
            b: 0,
            c: 0,
            normal: Vec3::y(),
            id: 0,
            vertices: [Vec3::zeros(); 3],
        }
    }
}

impl Triangle {
    /// Creates a triangle from positions alone, with the face normal derived from winding
    pub fn from_vertices(id: u32, vertices: [Vec3; 3]) -> Self {
        let mut triangle = Self {
            id,
            vertices,
            ..Default::default()
        };
        let cross = triangle.edge_cross();
        if cross.magnitude_squared() > 0.0 {
            triangle.normal = cross.normalize();
        }
        triangle
    }

    /// Unnormalized cross product of the two edges leaving the first vertex
    pub fn edge_cross(&self) -> Vec3 {
        let [v0, v1, v2] = self.vertices;
        (v1 - v0).cross(&(v2 - v0))
    }

    /// True when the triangle has (near) zero area
    pub fn is_degenerate(&self) -> bool {
        self.edge_cross().magnitude_squared() < DEGENERATE_AREA_THRESHOLD
    }

    /// Vertex indices in winding order
    pub fn indices(&self) -> [u32; 3] {
        [self.a, self.b, self.c]
    }

    /// Test if this triangle overlaps an axis-aligned box
    ///
    /// Separating Axis Theorem with 13 candidate axes:
    /// - 3 box face normals
    /// - 1 triangle face normal
    /// - 9 edge/box-axis cross products
    ///
    /// Touching counts as overlap; only a strict gap separates.
    pub fn overlaps_box(&self, center: Vec3, half_extents: Vec3) -> bool {
        // Project the triangle onto an axis and get min/max
        fn project_triangle(v: &[Vec3; 3], axis: &Vec3) -> (f32, f32) {
            let p0 = axis.dot(&v[0]);
            let p1 = axis.dot(&v[1]);
            let p2 = axis.dot(&v[2]);
            (p0.min(p1).min(p2), p0.max(p1).max(p2))
        }

        // Returns true if `axis` separates the triangle from the box
        fn separates(v: &[Vec3; 3], half_extents: &Vec3, axis: &Vec3) -> bool {
            let (min, max) = project_triangle(v, axis);
            let radius = half_extents.x * axis.x.abs()
                + half_extents.y * axis.y.abs()
                + half_extents.z * axis.z.abs();
            min > radius || max < -radius
        }

        // Move the box to the origin
        let v = self.vertices.map(|p| p - center);

        let edges = [v[1] - v[0], v[2] - v[1], v[0] - v[2]];
        let box_axes = [Vec3::x(), Vec3::y(), Vec3::z()];

        for box_axis in &box_axes {
            if separates(&v, &half_extents, box_axis) {
                return false;
            }
        }

        let normal = edges[0].cross(&edges[1]);
        if separates(&v, &half_extents, &normal) {
            return false;
        }

        for edge in &edges {
            for box_axis in &box_axes {
                if separates(&v, &half_extents, &box_axis.cross(edge)) {
                    return false;
                }
            }
        }

        true
    }
}
