//! Structural invariant checks.
//!
//! [`BPlusTree::validate`] walks the whole tree and reports the first broken
//! invariant. It is O(n) and meant for tests and debugging, not hot paths.

use crate::common::{Error, NodeId, Result};
use crate::index::btree::node::Key;
use crate::index::btree::tree::BPlusTree;

/// Key bounds a subtree must respect: `lower <= key < upper`.
#[derive(Clone, Copy)]
struct Bounds {
    lower: Option<Key>,
    upper: Option<Key>,
}

impl Bounds {
    const UNBOUNDED: Bounds = Bounds {
        lower: None,
        upper: None,
    };

    fn contains(&self, key: Key) -> bool {
        self.lower.map_or(true, |lo| key >= lo) && self.upper.map_or(true, |hi| key < hi)
    }
}

fn violation(message: String) -> Error {
    Error::InvariantViolation(message)
}

impl<V> BPlusTree<V> {
    /// Check every structural invariant.
    ///
    /// - Keys strictly increase inside each node and respect the separators above
    /// - No node holds more than `order - 1` keys; only the root may be empty
    /// - Internal nodes have one more child than keys
    /// - Parent links point back at the actual parent
    /// - All leaves are at the same depth
    /// - The leaf chain visits the leaves left to right and yields `len()` keys
    ///
    /// # Errors
    /// `Error::InvariantViolation` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let Some(root) = self.root else {
            if self.len != 0 || self.arena.len() != 0 {
                return Err(violation(format!(
                    "empty tree reports {} keys and {} nodes",
                    self.len,
                    self.arena.len()
                )));
            }
            return Ok(());
        };

        if self.arena[root].parent.is_some() {
            return Err(violation(format!("root {root} has a parent")));
        }

        // Depth-first, left to right, so leaves come out in chain order
        let mut leaves = Vec::new();
        let mut leaf_depth = None;
        let mut visited = 0;
        let mut stack = vec![(root, 0usize, Bounds::UNBOUNDED)];

        while let Some((id, depth, bounds)) = stack.pop() {
            visited += 1;
            let node = &self.arena[id];

            if node.keys.len() > self.order - 1 {
                return Err(violation(format!(
                    "{id} holds {} keys, max is {}",
                    node.keys.len(),
                    self.order - 1
                )));
            }
            if node.keys.is_empty() {
                return Err(violation(format!("{id} has no keys")));
            }
            if node.keys.windows(2).any(|w| w[0] >= w[1]) {
                return Err(violation(format!("{id} keys not strictly increasing: {:?}", node.keys)));
            }
            if let Some(&bad) = node.keys.iter().find(|&&k| !bounds.contains(k)) {
                return Err(violation(format!(
                    "{id} key {bad} outside separator bounds [{:?}, {:?})",
                    bounds.lower, bounds.upper
                )));
            }

            if node.is_leaf() {
                if node.records().len() != node.keys.len() {
                    return Err(violation(format!(
                        "leaf {id} has {} keys but {} records",
                        node.keys.len(),
                        node.records().len()
                    )));
                }
                match leaf_depth {
                    None => leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return Err(violation(format!(
                            "leaf {id} at depth {depth}, expected {expected}"
                        )));
                    }
                    Some(_) => {}
                }
                leaves.push(id);
                continue;
            }

            let children = node.children();
            if children.len() != node.keys.len() + 1 {
                return Err(violation(format!(
                    "{id} has {} keys but {} children",
                    node.keys.len(),
                    children.len()
                )));
            }

            // Push right to left so the leftmost child is popped first
            for (slot, &child) in children.iter().enumerate().rev() {
                if self.arena[child].parent != Some(id) {
                    return Err(violation(format!(
                        "{child} parent is {:?}, expected {id}",
                        self.arena[child].parent
                    )));
                }
                let child_bounds = Bounds {
                    lower: if slot == 0 { bounds.lower } else { Some(node.keys[slot - 1]) },
                    upper: node.keys.get(slot).copied().or(bounds.upper),
                };
                stack.push((child, depth + 1, child_bounds));
            }
        }

        if visited != self.arena.len() {
            return Err(violation(format!(
                "reached {visited} nodes from the root, arena holds {}",
                self.arena.len()
            )));
        }

        self.validate_leaf_chain(&leaves)
    }

    /// The chain from the leftmost leaf must match the depth-first leaf order
    /// exactly and hold `len` keys in ascending order.
    fn validate_leaf_chain(&self, leaves: &[NodeId]) -> Result<()> {
        let mut current = leaves.first().copied();
        let mut keys_seen = 0;
        let mut previous_key: Option<Key> = None;

        for &expected in leaves {
            let Some(id) = current else {
                return Err(violation(format!("leaf chain ends before {expected}")));
            };
            if id != expected {
                return Err(violation(format!("leaf chain visits {id}, expected {expected}")));
            }

            for &key in &self.arena[id].keys {
                if previous_key.is_some_and(|prev| prev >= key) {
                    return Err(violation(format!("leaf chain not ascending at key {key}")));
                }
                previous_key = Some(key);
                keys_seen += 1;
            }
            current = self.arena[id].next();
        }

        if let Some(extra) = current {
            return Err(violation(format!("leaf chain continues past the last leaf into {extra}")));
        }
        if keys_seen != self.len {
            return Err(violation(format!(
                "leaf chain holds {keys_seen} keys, tree reports {}",
                self.len
            )));
        }
        Ok(())
    }
}
