//! B+Tree index implementation.
//!
//! An ordered, height-balanced multiway search tree with `i32` keys and
//! caller-supplied payloads, held entirely in memory.
//!
//! # Components
//! - [`BPlusTree`] - The tree handle (insert, find, range, diagnostics)
//! - [`Record`] - Holder of one payload
//! - [`Range`] - Ascending iterator over the leaf chain
//! - [`TreeStats`] - Shape snapshot
//!
//! Nodes live in an arena owned by the tree and point at each other by
//! [`NodeId`](crate::NodeId), which keeps parent links and the leaf chain
//! free of raw pointers.

mod arena;
mod lookup;
mod node;
mod printer;
mod split;
mod stats;
mod tree;
mod validate;

pub use lookup::Range;
pub use node::{Key, Record};
pub use stats::TreeStats;
pub use tree::BPlusTree;
