//! Node and Record - the storage units of the B+Tree.
//!
//! A [`Node`] is either a leaf or an internal node:
//! - Leaves hold one [`Record`] per key plus a link to the next leaf
//! - Internal nodes hold routing keys plus one more child than keys
//!
//! Nodes refer to each other by [`NodeId`] (an index into the tree's arena)
//! instead of by pointer, so parent and sibling links never dangle.

use crate::common::NodeId;

/// Key type stored in the tree.
pub type Key = i32;

/// Holder for the caller's payload associated with one key.
///
/// The tree never looks inside the payload. Inserting an existing key
/// overwrites the payload of the Record that is already there; a key never
/// has two Records.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<V> {
    value: V,
}

impl<V> Record<V> {
    /// Wrap a payload.
    #[inline]
    pub fn new(value: V) -> Self {
        Self { value }
    }

    /// Borrow the payload.
    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Mutably borrow the payload.
    #[inline]
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Overwrite the payload in place, returning the previous one.
    #[inline]
    pub fn replace(&mut self, value: V) -> V {
        std::mem::replace(&mut self.value, value)
    }

    /// Unwrap the payload.
    #[inline]
    pub fn into_value(self) -> V {
        self.value
    }
}

/// Variant-specific part of a node.
#[derive(Debug)]
pub(crate) enum NodeKind<V> {
    /// `records[i]` belongs to `keys[i]`; `next` is the leaf to the right.
    Leaf {
        records: Vec<Record<V>>,
        next: Option<NodeId>,
    },
    /// `children.len() == keys.len() + 1`.
    Internal { children: Vec<NodeId> },
}

/// A node of the B+Tree.
///
/// # Layout
/// ```text
///  Internal:   keys      [ k0 | k1 | k2 ]
///              children  [c0 | c1 | c2 | c3]     c_i < k_i <= c_{i+1}
///
///  Leaf:       keys      [ k0 | k1 | k2 ]
///              records   [ r0 | r1 | r2 ]  ──next──▶ (leaf to the right)
/// ```
#[derive(Debug)]
pub(crate) struct Node<V> {
    /// Strictly increasing.
    pub(crate) keys: Vec<Key>,
    /// Only used to climb during splits. `None` for the root.
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind<V>,
}

impl<V> Node<V> {
    /// Create a leaf holding one entry (the first node of a tree).
    pub(crate) fn leaf_with(order: usize, key: Key, record: Record<V>) -> Self {
        let mut keys = Vec::with_capacity(order);
        keys.push(key);
        let mut records = Vec::with_capacity(order);
        records.push(record);
        Self {
            keys,
            parent: None,
            kind: NodeKind::Leaf {
                records,
                next: None,
            },
        }
    }

    /// Create a leaf from already ordered parts.
    pub(crate) fn leaf(
        keys: Vec<Key>,
        records: Vec<Record<V>>,
        next: Option<NodeId>,
        parent: Option<NodeId>,
    ) -> Self {
        debug_assert_eq!(keys.len(), records.len());
        Self {
            keys,
            parent,
            kind: NodeKind::Leaf { records, next },
        }
    }

    /// Create an internal node from already ordered parts.
    pub(crate) fn internal(keys: Vec<Key>, children: Vec<NodeId>, parent: Option<NodeId>) -> Self {
        debug_assert_eq!(keys.len() + 1, children.len());
        Self {
            keys,
            parent,
            kind: NodeKind::Internal { children },
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    #[inline]
    pub(crate) fn num_keys(&self) -> usize {
        self.keys.len()
    }

    /// A node is full once it holds `order - 1` keys.
    #[inline]
    pub(crate) fn is_full(&self, order: usize) -> bool {
        self.keys.len() >= order - 1
    }

    /// Children of an internal node; empty for a leaf.
    #[inline]
    pub(crate) fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Internal { children } => children,
            NodeKind::Leaf { .. } => &[],
        }
    }

    /// Records of a leaf; empty for an internal node.
    #[inline]
    pub(crate) fn records(&self) -> &[Record<V>] {
        match &self.kind {
            NodeKind::Leaf { records, .. } => records,
            NodeKind::Internal { .. } => &[],
        }
    }

    /// Next leaf in the chain. Always `None` for internal nodes.
    #[inline]
    pub(crate) fn next(&self) -> Option<NodeId> {
        match &self.kind {
            NodeKind::Leaf { next, .. } => *next,
            NodeKind::Internal { .. } => None,
        }
    }

    /// Index of the child to follow when searching for `key`.
    ///
    /// This is the smallest `i` with `key < keys[i]`, or `keys.len()` when
    /// `key` is at least as large as every routing key.
    #[inline]
    pub(crate) fn child_index_for(&self, key: Key) -> usize {
        self.keys.partition_point(|&k| k <= key)
    }

    /// Position of `child` among this node's children.
    #[inline]
    pub(crate) fn child_slot(&self, child: NodeId) -> Option<usize> {
        self.children().iter().position(|&c| c == child)
    }
}
