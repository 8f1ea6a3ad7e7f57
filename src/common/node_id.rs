//! Node identifier type.

use std::fmt;

/// Slot of a node in a tree's node arena.
///
/// Nodes are never freed, so an id handed out by the arena stays valid for
/// the life of the tree. Parent, child and sibling links are all `NodeId`s.
///
/// # Example
/// ```
/// use bplusdb::NodeId;
///
/// let node_id = NodeId::new(5);
/// assert_eq!(node_id.to_string(), "Node(5)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn new(slot: usize) -> Self {
        NodeId(slot)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}
