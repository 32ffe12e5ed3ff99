//! Spatial partitioning data structures
//!
//! Builds the triangle index that the CTB table serializes.

mod octree;

pub use octree::{
    Octree, OctreeConfig, OctreeNode, ACTIVE_CHILDREN, CELL_VERTICAL_HALF_EXTENT,
    ROOT_SCALE_FACTOR,
};
