//! Collision geometry
//!
//! - [`primitives`] - Triangles and the triangle/box overlap test
//! - [`bounds`] - Axis-aligned bounding boxes

pub mod primitives;
pub mod bounds;

pub use primitives::{Triangle, DEGENERATE_AREA_THRESHOLD};
pub use bounds::{BoundingBox, SUB_MODEL_DEFAULT_EXTENT};
