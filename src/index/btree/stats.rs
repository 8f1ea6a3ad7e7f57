//! Tree statistics.

use std::fmt;
use std::mem::size_of;

use crate::common::NodeId;
use crate::index::btree::node::{Key, Node, NodeKind, Record};
use crate::index::btree::tree::BPlusTree;

/// A point-in-time snapshot of a tree's shape.
///
/// Plain values, so it can be printed, compared and logged freely.
///
/// # Example
/// ```
/// use bplusdb::BPlusTree;
///
/// let mut tree = BPlusTree::new(5).unwrap();
/// for key in [20, 10, 40, 30, 50] {
///     tree.insert(key, ()).unwrap();
/// }
/// let stats = tree.stats();
/// assert_eq!(stats.keys, 5);
/// assert_eq!(stats.leaf_nodes, 2);
/// assert_eq!(stats.internal_nodes, 1);
/// println!("{}", stats);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    /// Distinct keys stored.
    pub keys: usize,

    /// Internal hops from root to leaf.
    pub height: usize,

    /// Leaf plus internal splits.
    pub splits: u64,

    pub leaf_nodes: usize,
    pub internal_nodes: usize,

    /// Bytes held by nodes and their key, child and record buffers.
    ///
    /// Counts the payload `V` inline only; anything a payload owns on the
    /// heap is the caller's and is not included. `Catalog::estimated_bytes`
    /// adds the rows for the department catalog.
    pub estimated_bytes: usize,
}

impl TreeStats {
    /// Total nodes.
    pub fn nodes(&self) -> usize {
        self.leaf_nodes + self.internal_nodes
    }

    /// Average keys per leaf (0.0 for an empty tree).
    pub fn leaf_fill(&self) -> f64 {
        if self.leaf_nodes == 0 {
            0.0
        } else {
            self.keys as f64 / self.leaf_nodes as f64
        }
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TreeStats {{ keys: {}, height: {}, splits: {}, leaves: {}, internal: {}, memory: {} bytes }}",
            self.keys,
            self.height,
            self.splits,
            self.leaf_nodes,
            self.internal_nodes,
            self.estimated_bytes
        )
    }
}

fn node_bytes<V>(node: &Node<V>) -> usize {
    let buffers = match &node.kind {
        NodeKind::Leaf { records, .. } => records.capacity() * size_of::<Record<V>>(),
        NodeKind::Internal { children } => children.capacity() * size_of::<NodeId>(),
    };
    size_of::<Node<V>>() + node.keys.capacity() * size_of::<Key>() + buffers
}

impl<V> BPlusTree<V> {
    /// Snapshot the tree's shape.
    ///
    /// Nodes are never freed, so every arena slot is part of the tree.
    pub fn stats(&self) -> TreeStats {
        let mut leaf_nodes = 0;
        let mut internal_nodes = 0;
        let mut estimated_bytes = size_of::<Self>();

        for node in self.arena.iter() {
            if node.is_leaf() {
                leaf_nodes += 1;
            } else {
                internal_nodes += 1;
            }
            estimated_bytes += node_bytes(node);
        }

        TreeStats {
            keys: self.len,
            height: self.height(),
            splits: self.splits,
            leaf_nodes,
            internal_nodes,
            estimated_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_empty() {
        let tree: BPlusTree<u64> = BPlusTree::new(5).unwrap();
        let stats = tree.stats();

        assert_eq!(stats.keys, 0);
        assert_eq!(stats.nodes(), 0);
        assert_eq!(stats.leaf_fill(), 0.0);
        assert_eq!(stats.estimated_bytes, size_of::<BPlusTree<u64>>());
    }

    #[test]
    fn test_stats_after_root_split() {
        let mut tree = BPlusTree::new(5).unwrap();
        for key in [20, 10, 40, 30, 50] {
            tree.insert(key, key as u64).unwrap();
        }

        let stats = tree.stats();
        assert_eq!(stats.keys, 5);
        assert_eq!(stats.height, 1);
        assert_eq!(stats.splits, 1);
        assert_eq!(stats.leaf_nodes, 2);
        assert_eq!(stats.internal_nodes, 1);
        assert_eq!(stats.leaf_fill(), 2.5);
    }

    #[test]
    fn test_memory_grows_with_keys() {
        let mut tree = BPlusTree::new(4).unwrap();
        tree.insert(0, 0u8).unwrap();
        let small = tree.stats().estimated_bytes;

        for key in 1..100 {
            tree.insert(key, 0u8).unwrap();
        }
        assert!(tree.stats().estimated_bytes > small);
    }

    #[test]
    fn test_stats_display() {
        let mut tree = BPlusTree::new(5).unwrap();
        for key in 0..5 {
            tree.insert(key, ()).unwrap();
        }

        let display = format!("{}", tree.stats());
        assert!(display.contains("keys: 5"));
        assert!(display.contains("height: 1"));
        assert!(display.contains("splits: 1"));
        assert!(display.contains("leaves: 2"));
    }
}
