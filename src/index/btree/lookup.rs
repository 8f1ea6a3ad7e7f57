//! Lookup engine - descent, point lookup and range scan.
//!
//! Every search starts with [`BPlusTree::descend_to_leaf`], which follows
//! routing keys from the root down to the one leaf that could hold the key.
//! Range scans then walk the leaf chain without climbing back up.

use std::iter::FusedIterator;

use tracing::trace;

use crate::common::NodeId;
use crate::index::btree::node::{Key, NodeKind, Record};
use crate::index::btree::tree::BPlusTree;

impl<V> BPlusTree<V> {
    /// Follow routing keys from `start` down to a leaf.
    ///
    /// At each internal node takes the smallest `i` with `key < keys[i]`
    /// (or the last child), so a key equal to a separator goes right.
    /// Costs O(height × B).
    pub(crate) fn descend_to_leaf(&self, start: NodeId, key: Key) -> NodeId {
        let mut current = start;
        loop {
            let node = &self.arena[current];
            let children = node.children();
            if children.is_empty() {
                trace!(key, leaf = %current, "descended to leaf");
                return current;
            }
            current = children[node.child_index_for(key)];
        }
    }

    /// Leftmost leaf, or `None` for an empty tree.
    pub(crate) fn leftmost_leaf(&self) -> Option<NodeId> {
        let mut current = self.root?;
        while let Some(&first) = self.arena[current].children().first() {
            current = first;
        }
        Some(current)
    }

    /// Mutable access to the Record in `slot` of `leaf`.
    pub(crate) fn record_mut(&mut self, leaf: NodeId, slot: usize) -> &mut Record<V> {
        match &mut self.arena[leaf].kind {
            NodeKind::Leaf { records, .. } => &mut records[slot],
            NodeKind::Internal { .. } => unreachable!("{leaf} is not a leaf"),
        }
    }

    // ========================================================================
    // Public API: Point lookup
    // ========================================================================

    /// Payload stored under `key`, if any.
    ///
    /// An empty tree answers `None` without descending.
    pub fn find(&self, key: Key) -> Option<&V> {
        let leaf = self.descend_to_leaf(self.root?, key);
        let node = &self.arena[leaf];
        let slot = node.keys.binary_search(&key).ok()?;
        Some(node.records()[slot].value())
    }

    /// Mutable payload stored under `key`, if any.
    pub fn find_mut(&mut self, key: Key) -> Option<&mut V> {
        let leaf = self.descend_to_leaf(self.root?, key);
        let slot = self.arena[leaf].keys.binary_search(&key).ok()?;
        Some(self.record_mut(leaf, slot).value_mut())
    }

    #[inline]
    pub fn contains_key(&self, key: Key) -> bool {
        self.find(key).is_some()
    }

    // ========================================================================
    // Public API: Range scan
    // ========================================================================

    /// Every `(key, payload)` with `lo <= key <= hi`, ascending.
    ///
    /// `lo > hi` and an empty tree both give an empty iterator.
    ///
    /// # Example
    /// ```
    /// use bplusdb::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3).unwrap();
    /// for key in 0..20 {
    ///     tree.insert(key, ()).unwrap();
    /// }
    /// let keys: Vec<i32> = tree.range(5, 8).map(|(k, _)| k).collect();
    /// assert_eq!(keys, vec![5, 6, 7, 8]);
    /// assert_eq!(tree.range(8, 5).count(), 0);
    /// ```
    pub fn range(&self, lo: Key, hi: Key) -> Range<'_, V> {
        let start = match self.root {
            Some(root) if lo <= hi => {
                let leaf = self.descend_to_leaf(root, lo);
                let pos = self.arena[leaf].keys.partition_point(|&k| k < lo);
                Some((leaf, pos))
            }
            _ => None,
        };

        Range {
            tree: self,
            leaf: start.map(|(leaf, _)| leaf),
            pos: start.map_or(0, |(_, pos)| pos),
            hi,
        }
    }

    /// Every `(key, payload)` in the tree, ascending.
    pub fn iter(&self) -> Range<'_, V> {
        Range {
            tree: self,
            leaf: self.leftmost_leaf(),
            pos: 0,
            hi: Key::MAX,
        }
    }
}

/// Forward-only iterator over a key range, walking the leaf chain.
///
/// Created by [`BPlusTree::range`] and [`BPlusTree::iter`]. Once it returns
/// `None` it keeps returning `None`.
pub struct Range<'a, V> {
    tree: &'a BPlusTree<V>,
    /// Leaf being scanned; `None` once the scan is over.
    leaf: Option<NodeId>,
    /// Next slot to read in `leaf`.
    pos: usize,
    /// Inclusive upper bound.
    hi: Key,
}

impl<'a, V> Iterator for Range<'a, V> {
    type Item = (Key, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        loop {
            let node = &tree.arena[self.leaf?];

            if self.pos < node.num_keys() {
                let key = node.keys[self.pos];
                if key > self.hi {
                    self.leaf = None;
                    return None;
                }
                let value = node.records()[self.pos].value();
                self.pos += 1;
                return Some((key, value));
            }

            // Leaf exhausted (or lo was past its last key): hop to the sibling
            self.leaf = node.next();
            self.pos = 0;
        }
    }
}

impl<V> FusedIterator for Range<'_, V> {}

impl<'a, V> IntoIterator for &'a BPlusTree<V> {
    type Item = (Key, &'a V);
    type IntoIter = Range<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::index::btree::BPlusTree;

    fn tree_with(order: usize, keys: &[i32]) -> BPlusTree<i32> {
        let mut tree = BPlusTree::new(order).unwrap();
        for &key in keys {
            tree.insert(key, key * 10).unwrap();
        }
        tree
    }

    #[test]
    fn test_find_on_empty_tree() {
        let tree: BPlusTree<i32> = BPlusTree::new(5).unwrap();
        assert_eq!(tree.find(0), None);
        assert!(!tree.contains_key(42));
        assert_eq!(tree.leftmost_leaf(), None);
    }

    #[test]
    fn test_find_after_splits() {
        let keys: Vec<i32> = (0..50).map(|k| k * 3).collect();
        let tree = tree_with(4, &keys);

        for &key in &keys {
            assert_eq!(tree.find(key), Some(&(key * 10)));
        }
        assert_eq!(tree.find(1), None);
        assert_eq!(tree.find(-3), None);
        assert_eq!(tree.find(1000), None);
    }

    #[test]
    fn test_find_separator_key() {
        // 30 ends up both in the root and in the right leaf
        let tree = tree_with(5, &[20, 10, 40, 30, 50]);
        let root = tree.root.unwrap();
        assert_eq!(tree.arena[root].keys, vec![30]);
        assert_eq!(tree.find(30), Some(&300));
    }

    #[test]
    fn test_find_mut_updates_payload() {
        let mut tree = tree_with(3, &[1, 2, 3, 4, 5]);
        *tree.find_mut(4).unwrap() = -1;
        assert_eq!(tree.find(4), Some(&-1));
        assert!(tree.find_mut(6).is_none());
    }

    #[test]
    fn test_range_crosses_leaves() {
        let tree = tree_with(3, &(1..=30).collect::<Vec<_>>());
        let keys: Vec<i32> = tree.range(7, 19).map(|(k, _)| k).collect();
        assert_eq!(keys, (7..=19).collect::<Vec<_>>());
    }

    #[test]
    fn test_range_starting_between_leaves() {
        // Leaves: [10 20] -> [30 40 50]; 25 lands in the left leaf but every
        // match is in the right one.
        let tree = tree_with(5, &[20, 10, 40, 30, 50]);
        let got: Vec<(i32, i32)> = tree.range(25, 45).map(|(k, v)| (k, *v)).collect();
        assert_eq!(got, vec![(30, 300), (40, 400)]);
    }

    #[test]
    fn test_range_edge_cases() {
        let tree = tree_with(5, &[20, 10, 40, 30, 50]);

        assert_eq!(tree.range(30, 30).count(), 1);
        assert_eq!(tree.range(31, 39).count(), 0);
        assert_eq!(tree.range(60, 100).count(), 0);
        assert_eq!(tree.range(50, 10).count(), 0);
        assert_eq!(tree.range(i32::MIN, i32::MAX).count(), 5);
    }

    #[test]
    fn test_range_is_fused() {
        let tree = tree_with(5, &[1, 2, 3]);
        let mut range = tree.range(1, 2);
        assert_eq!(range.next().map(|(k, _)| k), Some(1));
        assert_eq!(range.next().map(|(k, _)| k), Some(2));
        assert!(range.next().is_none());
        assert!(range.next().is_none());
    }

    #[test]
    fn test_iter_visits_everything_in_order() {
        let keys = [9, -4, 17, 0, 3, 88, -60, 12, 5, 41, 2];
        let tree = tree_with(4, &keys);

        let mut expected = keys.to_vec();
        expected.sort_unstable();
        let got: Vec<i32> = (&tree).into_iter().map(|(k, _)| k).collect();
        assert_eq!(got, expected);
    }
}
