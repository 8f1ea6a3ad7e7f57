//! Index structures.
//!
//! - [`btree`] - In-memory B+Tree

pub mod btree;

pub use btree::{BPlusTree, Key, Range, Record, TreeStats};
