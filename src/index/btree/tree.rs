//! BPlusTree - the tree handle.
//!
//! The [`BPlusTree`] owns:
//! - The node arena (every node the tree ever created)
//! - The root id (`None` while the tree is empty)
//! - The order `B`
//! - A split counter
//!
//! Lookups live in `lookup.rs`, the split engine in `split.rs`, and the
//! diagnostics in `stats.rs`, `validate.rs` and `printer.rs`; each adds its
//! own `impl` block to [`BPlusTree`].

use tracing::{trace, warn};

use crate::common::config::{DEFAULT_ORDER, MIN_ORDER};
use crate::common::{Error, NodeId, Result};
use crate::index::btree::arena::NodeArena;
use crate::index::btree::node::{Key, Node, Record};

/// An in-memory B+Tree mapping `i32` keys to caller payloads.
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────────────────┐
/// │                        BPlusTree                         │
/// │   root ──▶ ┌──────────┐                                  │
/// │            │   [30]   │            internal (routing)    │
/// │            └──┬────┬──┘                                  │
/// │          ┌────┘    └─────┐                               │
/// │   ┌──────▼─────┐  ┌──────▼───────┐                       │
/// │   │ [10 | 20]  │─▶│ [30 | 40 | 50]│─▶ None   leaf chain   │
/// │   └────────────┘  └──────────────┘                       │
/// │   arena: Vec<Node<V>>  (addressed by NodeId)             │
/// └──────────────────────────────────────────────────────────┘
/// ```
///
/// # Invariants
/// After every public call:
/// - All leaves sit at the same depth
/// - Every node holds at most `order - 1` keys (internal: `order` children)
/// - The leaf chain yields every key once, in ascending order
///
/// # Usage
/// ```
/// use bplusdb::BPlusTree;
///
/// let mut tree = BPlusTree::new(5).unwrap();
/// for key in [20, 10, 40, 30, 50] {
///     tree.insert(key, key * 100).unwrap();
/// }
///
/// assert_eq!(tree.find(30), Some(&3000));
/// assert_eq!(tree.height(), 1);
/// assert_eq!(tree.split_count(), 1);
///
/// let keys: Vec<i32> = tree.range(15, 35).map(|(k, _)| k).collect();
/// assert_eq!(keys, vec![20, 30]);
/// ```
pub struct BPlusTree<V> {
    /// Owns every node.
    pub(crate) arena: NodeArena<V>,

    /// Root node, or `None` for an empty tree.
    pub(crate) root: Option<NodeId>,

    /// Maximum children per internal node (immutable after construction).
    pub(crate) order: usize,

    /// Number of distinct keys.
    pub(crate) len: usize,

    /// Leaf splits plus internal splits since construction.
    pub(crate) splits: u64,
}

impl<V> BPlusTree<V> {
    /// Create an empty tree.
    ///
    /// # Errors
    /// `Error::InvalidOrder` if `order < 3`.
    pub fn new(order: usize) -> Result<Self> {
        Self::build(order, None)
    }

    /// Create an empty tree that may never hold more than `max_nodes` nodes.
    ///
    /// An insert whose split cascade would go past the limit fails with
    /// `Error::ResourceExhausted` and leaves the tree untouched.
    ///
    /// # Errors
    /// `Error::InvalidOrder` if `order < 3`.
    pub fn with_node_limit(order: usize, max_nodes: usize) -> Result<Self> {
        Self::build(order, Some(max_nodes))
    }

    fn build(order: usize, limit: Option<usize>) -> Result<Self> {
        if order < MIN_ORDER {
            return Err(Error::InvalidOrder(order));
        }

        Ok(Self {
            arena: NodeArena::new(limit),
            root: None,
            order,
            len: 0,
            splits: 0,
        })
    }

    // ========================================================================
    // Public API: Insert
    // ========================================================================

    /// Insert `value` under `key`.
    ///
    /// Returns the previous payload if `key` was already present; in that
    /// case the payload is swapped in place and the tree shape is unchanged.
    ///
    /// When the target leaf is full the leaf is split and the split may
    /// cascade up to the root, growing the tree by one level.
    ///
    /// # Errors
    /// `Error::ResourceExhausted` if the nodes the split cascade needs cannot
    /// be reserved. Nothing is modified in that case.
    pub fn insert(&mut self, key: Key, value: V) -> Result<Option<V>> {
        let Some(root) = self.root else {
            self.arena.reserve(1).inspect_err(|e| warn!(key, "insert rejected: {e}"))?;
            let leaf = self.arena.alloc(Node::leaf_with(self.order, key, Record::new(value)));
            self.root = Some(leaf);
            self.len = 1;
            trace!(key, %leaf, "started new tree");
            return Ok(None);
        };

        let leaf = self.descend_to_leaf(root, key);
        let position = match self.arena[leaf].keys.binary_search(&key) {
            Ok(slot) => {
                let old = self.record_mut(leaf, slot).replace(value);
                trace!(key, %leaf, "overwrote existing record");
                return Ok(Some(old));
            }
            Err(position) => position,
        };

        if !self.arena[leaf].is_full(self.order) {
            self.insert_into_leaf(leaf, position, key, Record::new(value));
        } else {
            let needed = self.nodes_needed_for_split(leaf);
            self.arena
                .reserve(needed)
                .inspect_err(|e| warn!(key, "insert rejected: {e}"))?;
            self.split_leaf_and_insert(leaf, position, key, Record::new(value));
        }

        self.len += 1;
        Ok(None)
    }

    // ========================================================================
    // Public API: Diagnostics
    // ========================================================================

    /// The order `B` this tree was built with.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of distinct keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of internal hops from the root to any leaf.
    ///
    /// 0 for an empty tree and for a tree whose root is a leaf. All leaves
    /// share one depth, so following the leftmost path is enough.
    pub fn height(&self) -> usize {
        let Some(mut current) = self.root else {
            return 0;
        };

        let mut height = 0;
        while let Some(&first) = self.arena[current].children().first() {
            current = first;
            height += 1;
        }
        height
    }

    /// Number of leaf and internal splits performed so far.
    #[inline]
    pub fn split_count(&self) -> u64 {
        self.splits
    }
}

impl<V> Default for BPlusTree<V> {
    fn default() -> Self {
        Self {
            arena: NodeArena::new(None),
            root: None,
            order: DEFAULT_ORDER,
            len: 0,
            splits: 0,
        }
    }
}

impl<V> std::fmt::Debug for BPlusTree<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BPlusTree")
            .field("order", &self.order)
            .field("len", &self.len)
            .field("height", &self.height())
            .field("splits", &self.splits)
            .finish()
    }
}
