//! Insertion and split engine.
//!
//! # Leaf split (`order = 5`, leaf capacity 4)
//! ```text
//!   full leaf [10 20 30 40] + 50
//!   buffer    [10 20 30 40 50]       split = cut(B - 1) = 2
//!   left      [10 20]  ──next──▶  right [30 40 50]
//!   promote 30 (30 stays in the right leaf too)
//! ```
//!
//! # Internal split (`order = 5`)
//! ```text
//!   buffer keys     [a b c d e]      split = cut(B) = 3
//!   left keeps      [a b]   + 3 children
//!   promote         c       (kept in neither half)
//!   sibling gets    [d e]   + 3 children
//! ```
//!
//! Leaf splits use `cut(B - 1)` and duplicate the separator; internal splits
//! use `cut(B)` and move it up. Both rules are deliberate and must stay as
//! they are.

use tracing::debug;

use crate::common::NodeId;
use crate::index::btree::node::{Key, Node, NodeKind, Record};
use crate::index::btree::tree::BPlusTree;

/// Split point for a buffer of `length` entries.
///
/// Odd lengths put the extra entry on the left.
#[inline]
pub(crate) fn cut(length: usize) -> usize {
    if length % 2 == 0 {
        length / 2
    } else {
        length / 2 + 1
    }
}

impl<V> BPlusTree<V> {
    /// Count the nodes a split starting at `leaf` will allocate.
    ///
    /// One for the leaf's new sibling, one more for every full ancestor the
    /// cascade passes through, and one for a new root if it reaches the top.
    pub(crate) fn nodes_needed_for_split(&self, leaf: NodeId) -> usize {
        let mut needed = 1;
        let mut current = self.arena[leaf].parent;

        while let Some(parent) = current {
            if !self.arena[parent].is_full(self.order) {
                return needed;
            }
            needed += 1;
            current = self.arena[parent].parent;
        }

        // Every ancestor split, so a new root is needed
        needed + 1
    }

    /// Insert into a leaf that has room, at `position`.
    pub(crate) fn insert_into_leaf(
        &mut self,
        leaf: NodeId,
        position: usize,
        key: Key,
        record: Record<V>,
    ) {
        let node = &mut self.arena[leaf];
        match &mut node.kind {
            NodeKind::Leaf { records, .. } => {
                node.keys.insert(position, key);
                records.insert(position, record);
            }
            NodeKind::Internal { .. } => unreachable!("{leaf} is not a leaf"),
        }
    }

    /// Split a full leaf while inserting `(key, record)` at `position`.
    ///
    /// The caller must already have reserved every node the cascade needs.
    pub(crate) fn split_leaf_and_insert(
        &mut self,
        leaf: NodeId,
        position: usize,
        key: Key,
        record: Record<V>,
    ) {
        self.splits += 1;
        let split = cut(self.order - 1);

        let node = &mut self.arena[leaf];
        let parent = node.parent;
        let NodeKind::Leaf { records, next } = &mut node.kind else {
            unreachable!("{leaf} is not a leaf")
        };

        // B entries in key order, then cut
        node.keys.insert(position, key);
        records.insert(position, record);
        let right_keys = node.keys.split_off(split);
        let right_records = records.split_off(split);
        let old_next = next.take();

        let right = self
            .arena
            .alloc(Node::leaf(right_keys, right_records, old_next, parent));

        if let NodeKind::Leaf { next, .. } = &mut self.arena[leaf].kind {
            *next = Some(right);
        }

        let separator = self.arena[right].keys[0];
        debug!(
            %leaf,
            %right,
            separator,
            left_keys = self.arena[leaf].num_keys(),
            right_keys = self.arena[right].num_keys(),
            "split leaf"
        );

        self.insert_into_parent(leaf, separator, right);
    }

    /// Hang `right` next to `left` under `left`'s parent, with `separator`
    /// between them, splitting upward as needed.
    fn insert_into_parent(&mut self, left: NodeId, separator: Key, right: NodeId) {
        let Some(parent) = self.arena[left].parent else {
            self.insert_into_new_root(left, separator, right);
            return;
        };

        let Some(left_index) = self.arena[parent].child_slot(left) else {
            unreachable!("{left} is missing from its parent {parent}")
        };

        if !self.arena[parent].is_full(self.order) {
            self.insert_into_node(parent, left_index, separator, right);
        } else {
            self.split_internal_and_insert(parent, left_index, separator, right);
        }
    }

    /// Insert `(separator, right)` just after child `left_index` of a node
    /// that has room.
    fn insert_into_node(&mut self, node: NodeId, left_index: usize, separator: Key, right: NodeId) {
        let parent = &mut self.arena[node];
        match &mut parent.kind {
            NodeKind::Internal { children } => {
                parent.keys.insert(left_index, separator);
                children.insert(left_index + 1, right);
            }
            NodeKind::Leaf { .. } => unreachable!("{node} is not an internal node"),
        }
        self.arena[right].parent = Some(node);
    }

    /// Split a full internal node while inserting `(separator, right)` just
    /// after child `left_index`, then push the middle key up.
    fn split_internal_and_insert(
        &mut self,
        node: NodeId,
        left_index: usize,
        separator: Key,
        right: NodeId,
    ) {
        self.splits += 1;
        let split = cut(self.order);
        self.arena[right].parent = Some(node);

        let old = &mut self.arena[node];
        let grandparent = old.parent;
        let NodeKind::Internal { children } = &mut old.kind else {
            unreachable!("{node} is not an internal node")
        };

        // B keys and B + 1 children in order
        old.keys.insert(left_index, separator);
        children.insert(left_index + 1, right);

        // Old node keeps keys [0, split - 1) and children [0, split);
        // key split - 1 moves up.
        let sibling_children = children.split_off(split);
        let mut sibling_keys = old.keys.split_off(split - 1);
        let promoted = sibling_keys.remove(0);

        let sibling = self
            .arena
            .alloc(Node::internal(sibling_keys, sibling_children, grandparent));

        for slot in 0..self.arena[sibling].children().len() {
            let child = self.arena[sibling].children()[slot];
            self.arena[child].parent = Some(sibling);
        }

        debug!(
            %node,
            %sibling,
            promoted,
            "split internal node"
        );

        self.insert_into_parent(node, promoted, sibling);
    }

    /// Grow the tree by one level.
    fn insert_into_new_root(&mut self, left: NodeId, separator: Key, right: NodeId) {
        let root = self
            .arena
            .alloc(Node::internal(vec![separator], vec![left, right], None));
        self.arena[left].parent = Some(root);
        self.arena[right].parent = Some(root);
        self.root = Some(root);

        debug!(%root, separator, height = self.height(), "new root");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(order: usize, keys: impl IntoIterator<Item = i32>) -> BPlusTree<i32> {
        let mut tree = BPlusTree::new(order).unwrap();
        for key in keys {
            tree.insert(key, key).unwrap();
        }
        tree
    }

    fn leaf_keys(tree: &BPlusTree<i32>) -> Vec<Vec<i32>> {
        let mut out = Vec::new();
        let mut current = tree.leftmost_leaf();
        while let Some(id) = current {
            out.push(tree.arena[id].keys.clone());
            current = tree.arena[id].next();
        }
        out
    }

    #[test]
    fn test_cut() {
        assert_eq!(cut(2), 1);
        assert_eq!(cut(3), 2);
        assert_eq!(cut(4), 2);
        assert_eq!(cut(5), 3);
        assert_eq!(cut(6), 3);
    }

    #[test]
    fn test_leaf_split_order_five() {
        let tree = tree_with(5, [20, 10, 40, 30, 50]);

        assert_eq!(tree.split_count(), 1);
        assert_eq!(tree.height(), 1);
        assert_eq!(leaf_keys(&tree), vec![vec![10, 20], vec![30, 40, 50]]);

        let root = tree.root.unwrap();
        assert_eq!(tree.arena[root].keys, vec![30]);
    }

    #[test]
    fn test_leaf_split_new_key_lands_left() {
        let tree = tree_with(5, [20, 30, 40, 50, 10]);
        assert_eq!(leaf_keys(&tree), vec![vec![10, 20], vec![30, 40, 50]]);

        let tree = tree_with(5, [10, 30, 40, 50, 20]);
        assert_eq!(leaf_keys(&tree), vec![vec![10, 20], vec![30, 40, 50]]);
    }

    #[test]
    fn test_leaf_split_order_four() {
        // cut(3) = 2: buffer of 4 entries splits 2 / 2
        let tree = tree_with(4, [1, 2, 3, 4]);
        assert_eq!(leaf_keys(&tree), vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(tree.arena[tree.root.unwrap()].keys, vec![3]);
    }

    #[test]
    fn test_internal_split_promotes_without_duplicating() {
        // Ascending keys at order 3: leaves hold 2 keys and split 1 / 2,
        // internal nodes hold 2 keys and split around cut(3) = 2.
        let tree = tree_with(3, 1..=5);

        assert_eq!(tree.height(), 2);
        let root = tree.root.unwrap();
        assert_eq!(tree.arena[root].keys, vec![3]);

        let children = tree.arena[root].children().to_vec();
        assert_eq!(tree.arena[children[0]].keys, vec![2]);
        assert_eq!(tree.arena[children[1]].keys, vec![4]);
        assert_eq!(leaf_keys(&tree), vec![vec![1], vec![2], vec![3], vec![4, 5]]);

        // Three leaf splits, one internal split
        assert_eq!(tree.split_count(), 4);
    }

    #[test]
    fn test_split_updates_parent_links() {
        let tree = tree_with(3, 1..=40);
        for (index, node) in tree.arena.iter().enumerate() {
            for &child in node.children() {
                assert_eq!(tree.arena[child].parent, Some(NodeId::new(index)));
            }
        }
        assert_eq!(tree.arena[tree.root.unwrap()].parent, None);
    }

    #[test]
    fn test_nodes_needed_for_split() {
        // Root leaf: sibling + new root
        let tree = tree_with(5, [1, 2, 3, 4]);
        let root = tree.root.unwrap();
        assert_eq!(tree.nodes_needed_for_split(root), 2);

        // Parent with room: just the sibling
        let tree = tree_with(5, [1, 2, 3, 4, 5]);
        let last_leaf = tree.descend_to_leaf(tree.root.unwrap(), 5);
        assert_eq!(tree.nodes_needed_for_split(last_leaf), 1);
    }

    #[test]
    fn test_nodes_needed_matches_actual_growth() {
        let mut tree: BPlusTree<i32> = BPlusTree::new(3).unwrap();
        for key in 0..200 {
            let before = tree.arena.len();
            let expected = match tree.root {
                None => 1,
                Some(root) => {
                    let leaf = tree.descend_to_leaf(root, key);
                    if tree.arena[leaf].is_full(tree.order) {
                        tree.nodes_needed_for_split(leaf)
                    } else {
                        0
                    }
                }
            };
            tree.insert(key, key).unwrap();
            assert_eq!(tree.arena.len() - before, expected, "key {key}");
        }
    }
}
