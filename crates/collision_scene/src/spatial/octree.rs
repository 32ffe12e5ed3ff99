//! Octree spatial partitioning over collision triangles
//!
//! Only the four X/Z quadrants of each cell are ever populated, so this is
//! a quadtree whose cells are columns running the full height of the scene.
//! A triangle lands in every leaf it touches; the tree is a coverage index,
//! not a partition.

use serde::{Deserialize, Serialize};

use crate::collision::Triangle;
use crate::foundation::math::Vec3;

/// Children actually created per split (of the eight octant slots)
pub const ACTIVE_CHILDREN: usize = 4;

/// Root half-extent as a fraction of the larger horizontal model width
pub const ROOT_SCALE_FACTOR: f32 = 0.68;

/// Vertical half-extent of every cell; cells are unbounded in Y
pub const CELL_VERTICAL_HALF_EXTENT: f32 = f32::MAX;

/// Configuration for octree behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// A cell holding more triangles than this is split
    pub max_triangles_per_node: usize,

    /// Maximum split level below the root's children
    pub max_depth: u32,

    /// Multiplier applied to the larger of the X/Z widths to size the root
    pub root_scale_factor: f32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_triangles_per_node: 10,
            max_depth: 6,
            root_scale_factor: ROOT_SCALE_FACTOR,
        }
    }
}

/// Single node in the octree hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct OctreeNode {
    /// Cell center
    pub position: Vec3,

    /// Cell half-extent on X and Z
    pub scale: f32,

    /// IDs of triangles overlapping this cell (leaves only)
    pub triangles: Vec<u32>,

    /// The four quadrant children, None if this is a leaf
    pub children: Option<Box<[OctreeNode; ACTIVE_CHILDREN]>>,

    /// Depth in the tree (0 = root)
    pub depth: u32,
}

impl OctreeNode {
    /// Create a new leaf node
    pub fn new(position: Vec3, scale: f32, depth: u32) -> Self {
        Self {
            position,
            scale,
            triangles: Vec::new(),
            children: None,
            depth,
        }
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Box half-extents used for the overlap test
    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(self.scale, CELL_VERTICAL_HALF_EXTENT, self.scale)
    }

    // Quadrant layout (Y is never split):
    // 0: -X, -Z
    // 1: +X, -Z
    // 2: -X, +Z
    // 3: +X, +Z
    fn child_offset(index: usize) -> Vec3 {
        let x_sign = if index & 1 == 0 { -1.0 } else { 1.0 };
        let z_sign = if index & 2 == 0 { -1.0 } else { 1.0 };
        Vec3::new(x_sign, 0.0, z_sign)
    }

    /// Subdivide this node into its four quadrant children
    fn subdivide(&mut self) {
        if self.children.is_some() {
            return;
        }

        let child_scale = self.scale * 0.5;
        let position = self.position;
        let depth = self.depth + 1;

        self.children = Some(Box::new(std::array::from_fn(|i| {
            OctreeNode::new(position + Self::child_offset(i) * child_scale, child_scale, depth)
        })));
    }

    /// Keep the triangles overlapping this cell, splitting further when crowded
    fn insert_triangles(&mut self, triangles: &[&Triangle], config: &OctreeConfig) {
        let half_extents = self.half_extents();
        let contained: Vec<&Triangle> = triangles
            .iter()
            .copied()
            .filter(|t| t.overlaps_box(self.position, half_extents))
            .collect();

        // The root's children sit at split level 0
        let level = self.depth.saturating_sub(1);

        if contained.len() > config.max_triangles_per_node && level < config.max_depth {
            self.subdivide();
            if let Some(ref mut children) = self.children {
                for child in children.iter_mut() {
                    child.insert_triangles(&contained, config);
                }
            }
        } else {
            self.triangles = contained.iter().map(|t| t.id).collect();
        }
    }

    /// Sorted, deduplicated IDs of every triangle in this subtree
    pub fn collect_triangle_ids(&self) -> Vec<u32> {
        let mut ids = Vec::new();
        self.gather_ids(&mut ids);
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    fn gather_ids(&self, ids: &mut Vec<u32>) {
        ids.extend_from_slice(&self.triangles);
        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.gather_ids(ids);
            }
        }
    }

    /// Get all leaf nodes
    pub fn get_all_leaves<'a>(&'a self, leaves: &mut Vec<&'a OctreeNode>) {
        if self.is_leaf() {
            leaves.push(self);
        } else if let Some(ref children) = self.children {
            for child in children.iter() {
                child.get_all_leaves(leaves);
            }
        }
    }

    /// Count this node and all descendants
    pub fn count_nodes(&self) -> usize {
        1 + self
            .children
            .as_ref()
            .map_or(0, |children| children.iter().map(OctreeNode::count_nodes).sum())
    }
}

/// Quad-split octree built once over a triangle set
#[derive(Debug, Clone)]
pub struct Octree {
    /// Root node covering the whole model footprint
    pub root: OctreeNode,

    /// Configuration
    config: OctreeConfig,
}

impl Octree {
    /// Build the tree: the root always splits, then every child keeps the
    /// triangles overlapping it and recurses while crowded
    pub fn build(
        root_position: Vec3,
        root_scale: f32,
        triangles: &[Triangle],
        config: OctreeConfig,
    ) -> Self {
        let mut root = OctreeNode::new(root_position, root_scale, 0);
        let all: Vec<&Triangle> = triangles.iter().collect();

        root.subdivide();
        if let Some(ref mut children) = root.children {
            for child in children.iter_mut() {
                child.insert_triangles(&all, &config);
            }
        }

        log::debug!(
            "Built octree: {} nodes over {} triangles",
            root.count_nodes(),
            triangles.len()
        );

        Self { root, config }
    }

    /// Configuration the tree was built with
    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// Get all leaf nodes
    pub fn get_all_leaves(&self) -> Vec<&OctreeNode> {
        let mut leaves = Vec::new();
        self.root.get_all_leaves(&mut leaves);
        leaves
    }
}
