//! Flattened node hierarchy
//!
//! On disk the tree is a pre-order list where each node only records how
//! many children follow it. [`NodeTree`] rebuilds explicit links once, as
//! an index arena over that list.

use super::{FormatError, FormatResult};

/// One entry of the flattened pre-order node list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Node {
    /// Node id, conventionally the node's own index
    pub id: u16,
    /// Opaque per-node flags
    pub flags: u8,
    /// Number of direct children following this node in pre-order
    pub child_count: u8,
}

impl Node {
    /// Create a node with no flags
    pub fn new(id: u16, child_count: u8) -> Self {
        Self {
            id,
            flags: 0,
            child_count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Links {
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Index arena over a flat node list
///
/// Indices are positions in the list the tree was built from. Several roots
/// are allowed: nodes appended after the first complete subtree start new
/// trees of their own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeTree {
    links: Vec<Links>,
    roots: Vec<usize>,
}

impl NodeTree {
    /// Rebuild parent/child links from pre-order child counts
    pub fn from_flat(nodes: &[Node]) -> FormatResult<Self> {
        let mut links = vec![Links::default(); nodes.len()];
        let mut roots = Vec::new();

        // (node, children still expected)
        let mut open: Vec<(usize, u8)> = Vec::new();

        for (index, node) in nodes.iter().enumerate() {
            while matches!(open.last(), Some((_, 0))) {
                open.pop();
            }

            if let Some((parent, remaining)) = open.last_mut() {
                *remaining -= 1;
                links[index].parent = Some(*parent);
                links[*parent].children.push(index);
            } else {
                roots.push(index);
            }

            open.push((index, node.child_count));
        }

        let missing: usize = open.iter().map(|&(_, remaining)| usize::from(remaining)).sum();
        if missing > 0 {
            return Err(FormatError::IndexOutOfRange {
                section: "nodes",
                field: "child_count",
                index: (nodes.len() + missing - 1) as u64,
                limit: nodes.len() as u64,
            });
        }

        Ok(Self { links, roots })
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True for an empty tree
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Indices of nodes without a parent, in list order
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Parent of `index`
    pub fn parent(&self, index: usize) -> Option<usize> {
        self.links.get(index).and_then(|l| l.parent)
    }

    /// Direct children of `index`, in list order
    pub fn children(&self, index: usize) -> &[usize] {
        self.links.get(index).map_or(&[], |l| l.children.as_slice())
    }

    /// Number of ancestors of `index`
    pub fn depth(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut current = self.parent(index);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(counts: &[u8]) -> Vec<Node> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &c)| Node::new(i as u16, c))
            .collect()
    }

    #[test]
    fn test_pre_order_links() {
        // 0 ─┬─ 1 ── 2
        //    └─ 3
        let tree = NodeTree::from_flat(&flat(&[2, 1, 0, 0])).unwrap();
        assert_eq!(tree.roots(), &[0]);
        assert_eq!(tree.children(0), &[1, 3]);
        assert_eq!(tree.children(1), &[2]);
        assert_eq!(tree.parent(2), Some(1));
        assert_eq!(tree.parent(3), Some(0));
        assert_eq!(tree.depth(2), 2);
    }

    #[test]
    fn test_trailing_nodes_form_a_forest() {
        let tree = NodeTree::from_flat(&flat(&[1, 0, 0, 0])).unwrap();
        assert_eq!(tree.roots(), &[0, 2, 3]);
        assert_eq!(tree.parent(2), None);
    }

    #[test]
    fn test_child_count_overrun() {
        let err = NodeTree::from_flat(&flat(&[3, 0])).unwrap_err();
        assert!(matches!(
            err,
            FormatError::IndexOutOfRange { section: "nodes", field: "child_count", limit: 2, .. }
        ));
    }

    #[test]
    fn test_empty_list() {
        let tree = NodeTree::from_flat(&[]).unwrap();
        assert!(tree.is_empty());
        assert!(tree.roots().is_empty());
    }
}
