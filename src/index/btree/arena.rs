//! Node arena - owning storage for every node of one tree.
//!
//! Nodes are appended and never removed, so a [`NodeId`] handed out by
//! [`NodeArena::alloc`] stays valid for the arena's whole life.
//!
//! # Reservation
//! A split cascade may allocate several nodes. The insert path calls
//! [`NodeArena::reserve`] with the exact count *before* touching any existing
//! node; once that succeeds, the `alloc` calls of the cascade cannot fail.

use std::ops::{Index, IndexMut};

use crate::common::{Error, NodeId, Result};
use crate::index::btree::node::Node;

pub(crate) struct NodeArena<V> {
    nodes: Vec<Node<V>>,
    /// Upper bound on the number of nodes, if any.
    limit: Option<usize>,
}

impl<V> NodeArena<V> {
    pub(crate) fn new(limit: Option<usize>) -> Self {
        Self {
            nodes: Vec::new(),
            limit,
        }
    }

    /// Number of nodes allocated so far.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Make room for `count` more nodes.
    ///
    /// # Errors
    /// `Error::ResourceExhausted` if the node limit would be exceeded or the
    /// allocator cannot grow the backing storage. The arena is unchanged.
    pub(crate) fn reserve(&mut self, count: usize) -> Result<()> {
        if let Some(limit) = self.limit {
            let available = limit.saturating_sub(self.nodes.len());
            if count > available {
                return Err(Error::ResourceExhausted {
                    requested: count,
                    available,
                });
            }
        }

        self.nodes
            .try_reserve(count)
            .map_err(|_| Error::ResourceExhausted {
                requested: count,
                available: 0,
            })
    }

    /// Store a node and return its id.
    ///
    /// Callers reserve first; pushing into reserved capacity never reallocates.
    #[inline]
    pub(crate) fn alloc(&mut self, node: Node<V>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Iterate over every node in allocation order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Node<V>> {
        self.nodes.iter()
    }
}

impl<V> Index<NodeId> for NodeArena<V> {
    type Output = Node<V>;

    #[inline]
    fn index(&self, id: NodeId) -> &Node<V> {
        &self.nodes[id.0]
    }
}

impl<V> IndexMut<NodeId> for NodeArena<V> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node<V> {
        &mut self.nodes[id.0]
    }
}
