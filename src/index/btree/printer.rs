//! Text rendering of a tree's shape.
//!
//! ```text
//! 30 |
//! 10 20 | 30 40 50 |
//! ```

use std::collections::VecDeque;
use std::fmt;

use crate::index::btree::tree::BPlusTree;

const EMPTY: &str = "Empty tree.";

impl<V> BPlusTree<V> {
    /// Level-order dump: one line per level, nodes separated by `|`.
    pub fn render_levels(&self) -> String {
        let Some(root) = self.root else {
            return EMPTY.to_string();
        };

        let mut lines: Vec<String> = Vec::new();
        let mut queue = VecDeque::from([(root, 0usize)]);

        while let Some((id, depth)) = queue.pop_front() {
            if lines.len() <= depth {
                lines.push(String::new());
            }
            let line = &mut lines[depth];

            let node = &self.arena[id];
            for key in &node.keys {
                line.push_str(&key.to_string());
                line.push(' ');
            }
            line.push_str("| ");

            queue.extend(node.children().iter().map(|&child| (child, depth + 1)));
        }

        lines
            .iter()
            .map(|line| line.trim_end())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Keys of every leaf following the leaf chain, leaves separated by `|`.
    pub fn render_leaves(&self) -> String {
        let Some(mut current) = self.leftmost_leaf() else {
            return EMPTY.to_string();
        };

        let mut leaves = Vec::new();
        loop {
            let node = &self.arena[current];
            let keys: Vec<String> = node.keys.iter().map(|k| k.to_string()).collect();
            leaves.push(keys.join(" "));
            match node.next() {
                Some(next) => current = next,
                None => break,
            }
        }
        leaves.join(" | ")
    }
}

impl<V> fmt::Display for BPlusTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_levels())
    }
}
