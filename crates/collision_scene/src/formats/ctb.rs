//! CTB collision table: a serialized octree over one model's triangles
//!
//! The node records are a flat pre-order list. A node's children are not
//! stored as indices; each set bit of its child mask consumes the next
//! record, in ascending octant order.

use std::path::Path;

use bitflags::bitflags;

use super::binary::{BinaryReader, BinaryWriter};
use super::csb::Model;
use super::{checked_width, envelope, FormatError, FormatResult, FormatRevision};
use crate::collision::BoundingBox;
use crate::foundation::math::Vec3;
use crate::spatial::{Octree, OctreeConfig, OctreeNode};

/// `root_flag` value of the first record
pub const ROOT_NODE_FLAG: u8 = 1;

/// `root_flag` value of every other record
pub const CHILD_NODE_FLAG: u8 = 0x7F;

/// Node ids advance by this much per lowered subtree
pub const NODE_ID_STRIDE: u32 = 8;

bitflags! {
    /// One bit per octant child slot
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ChildMask: u8 {
        /// Octant 0
        const OCTANT_0 = 1 << 0;
        /// Octant 1
        const OCTANT_1 = 1 << 1;
        /// Octant 2
        const OCTANT_2 = 1 << 2;
        /// Octant 3
        const OCTANT_3 = 1 << 3;
        /// Octant 4
        const OCTANT_4 = 1 << 4;
        /// Octant 5
        const OCTANT_5 = 1 << 5;
        /// Octant 6
        const OCTANT_6 = 1 << 6;
        /// Octant 7
        const OCTANT_7 = 1 << 7;
    }
}

impl ChildMask {
    /// Mask with only `octant` set
    pub fn octant(octant: usize) -> Self {
        Self::from_bits_retain(1 << octant)
    }

    /// Number of children this mask announces
    pub fn child_count(self) -> usize {
        self.bits().count_ones() as usize
    }
}

/// One record of the table
#[derive(Debug, Clone, PartialEq)]
pub struct CtbNode {
    /// Cell center
    pub position: Vec3,
    /// Cell half-extent
    pub size: f32,
    /// Node id
    pub node_id: u32,
    /// Occupied child octants
    pub child_bits: ChildMask,
    /// [`ROOT_NODE_FLAG`] for the root, [`CHILD_NODE_FLAG`] otherwise
    pub root_flag: u8,
    /// Padding word, kept verbatim
    pub padding: u16,
    /// Sorted, deduplicated triangle ids of this subtree
    pub triangle_indices: Vec<u32>,
    /// Indices of child records in `CtbFile::nodes`
    pub children: Vec<usize>,
}

impl CtbNode {
    fn new(position: Vec3, size: f32, node_id: u32, root_flag: u8, triangle_indices: Vec<u32>) -> Self {
        Self {
            position,
            size,
            node_id,
            child_bits: ChildMask::empty(),
            root_flag,
            padding: 0,
            triangle_indices,
            children: Vec::new(),
        }
    }

    /// True for records without children
    pub fn is_leaf(&self) -> bool {
        self.child_bits.is_empty()
    }
}

/// A decoded or generated collision table
#[derive(Debug, Clone, PartialEq)]
pub struct CtbFile {
    /// Model group count, 1 in every observed file
    pub model_group_count: u32,
    /// Header copy of the root half-extent
    pub root_size: f32,
    /// Header float, 1 in every observed file
    pub unknown: f32,
    /// Header copy of the root center
    pub root_position: Vec3,
    /// Records in pre-order; the first one is the root
    pub nodes: Vec<CtbNode>,
}

impl Default for CtbFile {
    fn default() -> Self {
        Self {
            model_group_count: 1,
            root_size: 0.0,
            unknown: 1.0,
            root_position: Vec3::zeros(),
            nodes: Vec::new(),
        }
    }
}

/// Shape statistics of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CtbSummary {
    /// Record count
    pub node_count: usize,
    /// Records without children
    pub leaf_count: usize,
    /// Longest root-to-leaf path, in edges
    pub depth: usize,
    /// Triangle ids on the root record
    pub root_triangle_count: usize,
}

impl CtbFile {
    /// The root record, if any
    pub fn root(&self) -> Option<&CtbNode> {
        self.nodes.first()
    }

    /// Build a table over `model`'s triangles.
    ///
    /// A model without triangles yields a table without records.
    pub fn generate(model: &Model, config: &OctreeConfig) -> Self {
        let mut table = Self::default();
        if model.triangles.is_empty() {
            log::info!("No triangles in '{}', skipping collision table", model.name);
            return table;
        }

        let bounds = BoundingBox::from_positions(&model.positions);
        let width = bounds.size();
        let center = bounds.center();
        let root_scale = width.x.max(width.z) * config.root_scale_factor;
        let root_position = Vec3::new(center.x, 0.0, center.z);

        let octree = Octree::build(root_position, root_scale, &model.triangles, config.clone());
        table.root_size = root_scale;
        table.root_position = root_position;

        table.nodes.push(CtbNode::new(
            root_position,
            root_scale,
            0,
            ROOT_NODE_FLAG,
            octree.root.collect_triangle_ids(),
        ));

        let mut next_id = 1;
        lower(&octree.root, 0, &mut table.nodes, &mut next_id);

        log::info!(
            "Generated collision table: {} nodes over {} triangles",
            table.nodes.len(),
            model.triangles.len()
        );
        table
    }

    /// Record count, depth and root coverage
    pub fn summary(&self) -> CtbSummary {
        let mut summary = CtbSummary {
            node_count: self.nodes.len(),
            leaf_count: self.nodes.iter().filter(|n| n.is_leaf()).count(),
            root_triangle_count: self.root().map_or(0, |r| r.triangle_indices.len()),
            depth: 0,
        };

        let mut stack = if self.nodes.is_empty() { vec![] } else { vec![(0, 0)] };
        while let Some((index, depth)) = stack.pop() {
            summary.depth = summary.depth.max(depth);
            if let Some(node) = self.nodes.get(index) {
                stack.extend(node.children.iter().map(|&c| (c, depth + 1)));
            }
        }
        summary
    }

    /// Read and decode a file, unwrapping the envelope by suffix
    pub fn read_file(path: &Path, revision: FormatRevision) -> FormatResult<Self> {
        let data = envelope::read_file(path)?;
        Self::decode(&data, revision)
    }

    /// Encode and write a file, wrapping the envelope by suffix
    pub fn write_file(&self, path: &Path, revision: FormatRevision) -> FormatResult<()> {
        let data = self.encode(revision)?;
        envelope::write_file(path, &data)
    }

    /// Decode an unwrapped CTB payload
    pub fn decode(data: &[u8], revision: FormatRevision) -> FormatResult<Self> {
        let mut reader = BinaryReader::new(data, revision);

        reader.set_section("header");
        for _ in 0..3 {
            reader.read_u32("reserved")?;
        }
        let model_group_count = reader.read_u32("model_group_count")?;
        let root_size = reader.read_f32("root_size")?;
        let unknown = reader.read_f32("unknown")?;
        let root_position = reader.read_vec3("root_position")?;
        let node_count = reader.read_u32("node_count")?;
        let root_triangle_count = reader.read_u32("root_triangle_count")?;

        reader.set_section("nodes");
        let mut nodes = reader.read_array(node_count as usize, |r| {
            let position = r.read_vec3("position")?;
            let size = r.read_f32("size")?;
            let node_id = r.read_u32("node_id")?;
            let child_bits = ChildMask::from_bits_retain(r.read_u8("child_bits")?);
            let root_flag = r.read_u8("root_flag")?;
            let padding = r.read_u16("padding")?;
            let count = r.read_u32("triangle_count")?;
            Ok((
                CtbNode {
                    child_bits,
                    padding,
                    ..CtbNode::new(position, size, node_id, root_flag, Vec::new())
                },
                count,
            ))
        })?;

        reader.set_section("triangle_indices");
        for (node, count) in &mut nodes {
            node.triangle_indices = reader.read_array(*count as usize, |r| r.read_u32("index"))?;
        }

        let mut nodes: Vec<CtbNode> = nodes.into_iter().map(|(node, _)| node).collect();
        link_children(&mut nodes)?;

        if let Some(root) = nodes.first() {
            if root.size != root_size || root.position != root_position {
                log::warn!("Collision table header disagrees with its root record");
            }
            if root.triangle_indices.len() != root_triangle_count as usize {
                log::warn!(
                    "Header announces {root_triangle_count} root triangles, root holds {}",
                    root.triangle_indices.len()
                );
            }
        }

        Ok(Self {
            model_group_count,
            root_size,
            unknown,
            root_position,
            nodes,
        })
    }

    /// Encode into an unwrapped CTB payload
    pub fn encode(&self, revision: FormatRevision) -> FormatResult<Vec<u8>> {
        let mut writer = BinaryWriter::new(revision);

        let root_count = self.root().map_or(0, |r| r.triangle_indices.len());

        writer.write_zeros(12);
        writer.write_u32(self.model_group_count);
        writer.write_f32(self.root_size);
        writer.write_f32(self.unknown);
        writer.write_vec3(&self.root_position);
        writer.write_u32(checked_width("node_count", self.nodes.len(), u64::from(u32::MAX))?);
        writer.write_u32(checked_width("root_triangle_count", root_count, u64::from(u32::MAX))?);

        for node in &self.nodes {
            writer.write_vec3(&node.position);
            writer.write_f32(node.size);
            writer.write_u32(node.node_id);
            writer.write_u8(node.child_bits.bits());
            writer.write_u8(node.root_flag);
            writer.write_u16(node.padding);
            writer.write_u32(checked_width(
                "triangle_count",
                node.triangle_indices.len(),
                u64::from(u32::MAX),
            )?);
        }
        for node in &self.nodes {
            for &index in &node.triangle_indices {
                writer.write_u32(index);
            }
        }
        Ok(writer.into_inner())
    }
}

/// Append a record for every occupied child of `node`, depth first
fn lower(node: &OctreeNode, parent: usize, nodes: &mut Vec<CtbNode>, next_id: &mut u32) {
    if let Some(ref children) = node.children {
        for (octant, child) in children.iter().enumerate() {
            let triangle_indices = child.collect_triangle_ids();
            if triangle_indices.is_empty() {
                continue;
            }

            let octant_id = octant as u32;
            let node_id = if child.is_leaf() { *next_id + octant_id } else { octant_id };

            let index = nodes.len();
            nodes[parent].child_bits |= ChildMask::octant(octant);
            nodes[parent].children.push(index);
            nodes.push(CtbNode::new(
                child.position,
                child.scale,
                node_id,
                CHILD_NODE_FLAG,
                triangle_indices,
            ));

            lower(child, index, nodes, next_id);
        }
    }
    *next_id += NODE_ID_STRIDE;
}

/// Rebuild child links from the masks of a pre-order record list
fn link_children(nodes: &mut [CtbNode]) -> FormatResult<()> {
    // (record, children still expected)
    let mut open: Vec<(usize, usize)> = Vec::new();

    for index in 0..nodes.len() {
        while matches!(open.last(), Some((_, 0))) {
            open.pop();
        }

        if let Some((parent, remaining)) = open.last_mut() {
            *remaining -= 1;
            let parent = *parent;
            nodes[parent].children.push(index);
        } else if index != 0 {
            return Err(FormatError::Unsupported {
                section: "nodes",
                reason: format!("record {index} is not reachable from the root"),
            });
        }

        open.push((index, nodes[index].child_bits.child_count()));
    }

    let missing: usize = open.iter().map(|&(_, remaining)| remaining).sum();
    if missing > 0 {
        return Err(FormatError::IndexOutOfRange {
            section: "nodes",
            field: "child_bits",
            index: (nodes.len() + missing - 1) as u64,
            limit: nodes.len() as u64,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::Triangle;

    /// Flat grid of quads on the XZ plane as a combined model
    fn grid_model(n: usize) -> Model {
        let mut model = Model::combined();
        for x in 0..=n {
            for z in 0..=n {
                model.positions.push(Vec3::new(x as f32, 0.0, z as f32));
            }
        }
        let at = |x: usize, z: usize| (x * (n + 1) + z) as u32;
        for x in 0..n {
            for z in 0..n {
                for [a, b, c] in [
                    [at(x, z), at(x, z + 1), at(x + 1, z)],
                    [at(x + 1, z), at(x, z + 1), at(x + 1, z + 1)],
                ] {
                    let vertices = [a, b, c].map(|i| model.positions[i as usize]);
                    let id = model.triangles.len() as u32;
                    model.triangles.push(Triangle { a, b, c, ..Triangle::from_vertices(id, vertices) });
                }
            }
        }
        model.compute_bounds();
        model
    }

    #[test]
    fn test_empty_model_generates_no_records() {
        let table = CtbFile::generate(&Model::combined(), &OctreeConfig::default());
        assert!(table.nodes.is_empty());
    }

    #[test]
    fn test_single_quad_table() {
        let table = CtbFile::generate(&grid_model(1), &OctreeConfig::default());
        let root = table.root().unwrap();
        assert_eq!(root.root_flag, ROOT_NODE_FLAG);
        assert_eq!(root.node_id, 0);
        assert_eq!(root.triangle_indices, vec![0, 1]);
        assert!(root.child_bits.child_count() <= 4);
        assert!(table.nodes[1..].iter().all(|n| n.root_flag == CHILD_NODE_FLAG));
    }

    #[test]
    fn test_every_triangle_reaches_the_root() {
        let model = grid_model(10);
        let table = CtbFile::generate(&model, &OctreeConfig::default());
        let expected: Vec<u32> = (0..model.triangles.len() as u32).collect();
        assert_eq!(table.root().unwrap().triangle_indices, expected);
    }

    #[test]
    fn test_lists_sorted_and_masks_narrow() {
        let table = CtbFile::generate(&grid_model(10), &OctreeConfig::default());
        assert!(table.nodes.len() > 5);
        for node in &table.nodes {
            assert!(node.triangle_indices.windows(2).all(|w| w[0] < w[1]));
            assert!(node.child_bits.bits() & 0xF0 == 0);
            assert_eq!(node.child_bits.child_count(), node.children.len());
        }
    }

    #[test]
    fn test_parent_lists_cover_children() {
        let table = CtbFile::generate(&grid_model(10), &OctreeConfig::default());
        for node in &table.nodes {
            for &child in &node.children {
                for id in &table.nodes[child].triangle_indices {
                    assert!(node.triangle_indices.binary_search(id).is_ok());
                }
            }
        }
    }

    #[test]
    fn test_round_trip_both_revisions() {
        let table = CtbFile::generate(&grid_model(10), &OctreeConfig::default());
        for revision in [FormatRevision::Legacy, FormatRevision::Current] {
            let bytes = table.encode(revision).unwrap();
            assert_eq!(CtbFile::decode(&bytes, revision).unwrap(), table);
        }
    }

    #[test]
    fn test_header_root_fields_survive_without_records() {
        let table = CtbFile {
            root_size: 12.5,
            root_position: Vec3::new(3.0, 0.0, -4.0),
            ..Default::default()
        };
        for revision in [FormatRevision::Legacy, FormatRevision::Current] {
            let bytes = table.encode(revision).unwrap();
            let decoded = CtbFile::decode(&bytes, revision).unwrap();
            assert!(decoded.nodes.is_empty());
            assert_eq!(decoded.root_size, 12.5);
            assert_eq!(decoded.root_position, Vec3::new(3.0, 0.0, -4.0));
        }
    }

    #[test]
    fn test_generated_header_matches_root() {
        let table = CtbFile::generate(&grid_model(4), &OctreeConfig::default());
        let root = table.root().unwrap();
        assert_eq!(table.root_size, root.size);
        assert_eq!(table.root_position, root.position);
    }

    #[test]
    fn test_decode_links_children_from_masks() {
        let table = CtbFile::generate(&grid_model(10), &OctreeConfig::default());
        let bytes = table.encode(FormatRevision::Current).unwrap();
        let decoded = CtbFile::decode(&bytes, FormatRevision::Current).unwrap();
        for (original, decoded) in table.nodes.iter().zip(&decoded.nodes) {
            assert_eq!(original.children, decoded.children);
        }
    }

    #[test]
    fn test_child_bits_overrun_fails() {
        let mut table = CtbFile::generate(&grid_model(1), &OctreeConfig::default());
        // Announce every octant on the root, more records than exist
        table.nodes[0].child_bits = ChildMask::all();
        let bytes = table.encode(FormatRevision::Current).unwrap();
        let err = CtbFile::decode(&bytes, FormatRevision::Current).unwrap_err();
        assert!(matches!(err, FormatError::IndexOutOfRange { field: "child_bits", .. }));
    }

    #[test]
    fn test_truncated_table_fails() {
        let table = CtbFile::generate(&grid_model(2), &OctreeConfig::default());
        let bytes = table.encode(FormatRevision::Legacy).unwrap();
        let err = CtbFile::decode(&bytes[..bytes.len() - 2], FormatRevision::Legacy).unwrap_err();
        assert!(matches!(err, FormatError::UnexpectedEof { section: "triangle_indices", .. }));
    }

    #[test]
    fn test_summary() {
        let table = CtbFile::generate(&grid_model(10), &OctreeConfig::default());
        let summary = table.summary();
        assert_eq!(summary.node_count, table.nodes.len());
        assert_eq!(summary.root_triangle_count, 200);
        assert!(summary.depth >= 2);
        assert!(summary.leaf_count >= 4);
    }
}
